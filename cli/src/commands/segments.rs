//! Segments commands

use anyhow::Result;
use marktauto_client::{Route, SegmentForm};

use super::App;
use crate::SegmentCommands;

pub async fn handle(action: SegmentCommands, app: &mut App) -> Result<()> {
    match action {
        SegmentCommands::List => app.show(Route::Segments)?,
        SegmentCommands::Create { name, criteria } => {
            let mut form = SegmentForm::new(name, criteria);
            let result = app.shell.create_segment(&mut form).await;
            let segment = app.finish(result)?;
            println!("Created segment: {}", segment.id);
        }
    }
    Ok(())
}
