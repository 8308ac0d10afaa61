//! Analytics commands

use anyhow::Result;
use marktauto_client::{EventForm, EventType, Route};

use super::App;
use crate::AnalyticsCommands;

pub async fn handle(action: AnalyticsCommands, app: &mut App) -> Result<()> {
    match action {
        AnalyticsCommands::Show => app.show(Route::Analytics)?,
        AnalyticsCommands::Record {
            campaign_id,
            event_type,
        } => {
            let form = EventForm::for_campaign(campaign_id);
            let result = app
                .shell
                .record_event(&form, EventType::from(event_type))
                .await;
            let event = app.finish(result)?;
            println!(
                "Recorded {} for campaign {} at {}",
                event.event_type,
                event.campaign_id,
                event.occurred_at.format("%Y-%m-%d %H:%M:%S")
            );
        }
    }
    Ok(())
}
