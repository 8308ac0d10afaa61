//! Campaigns commands

use anyhow::Result;
use marktauto_client::{CampaignForm, Route};

use super::App;
use crate::CampaignCommands;

pub async fn handle(action: CampaignCommands, app: &mut App) -> Result<()> {
    match action {
        CampaignCommands::List => app.show(Route::Campaigns)?,
        CampaignCommands::Create {
            name,
            channel,
            segment_id,
            schedule,
        } => {
            let mut form = CampaignForm {
                name,
                channel,
                segment_id: Some(segment_id),
                schedule: schedule.unwrap_or_default(),
            };
            let result = app.shell.create_campaign(&mut form).await;
            let campaign = app.finish(result)?;
            println!("Created campaign: {} ({})", campaign.id, campaign.status);
        }
        CampaignCommands::Launch { id } => {
            let result = app.shell.launch_campaign(id).await;
            let campaign = app.finish(result)?;
            println!("Campaign {} is now {}", campaign.id, campaign.status);
        }
    }
    Ok(())
}
