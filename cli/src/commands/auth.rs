//! Login, register and logout

use anyhow::{bail, Result};
use marktauto_client::{AuthOutcome, LoginForm, RegisterForm};

use super::App;

pub async fn login(app: &mut App, email: String, password: String) -> Result<()> {
    let mut form = LoginForm::new(email, password);
    let result = app.shell.login(&mut form).await;
    settle(app, result)
}

pub async fn register(app: &mut App, email: String, password: String) -> Result<()> {
    let mut form = RegisterForm::new(email, password);
    let result = app.shell.register(&mut form).await;
    settle(app, result)
}

fn settle(app: &App, result: marktauto_client::Result<AuthOutcome>) -> Result<()> {
    match app.finish(result)? {
        AuthOutcome::Authenticated(_) => {
            let state = app.shell.state();
            println!(
                "{} segments, {} campaigns, {} events loaded",
                state.segments.len(),
                state.campaigns.len(),
                state.events.len()
            );
            Ok(())
        }
        AuthOutcome::Rejected(message) => bail!(message),
    }
}

pub fn logout(app: &mut App) -> Result<()> {
    let result = app.shell.logout();
    app.finish(result)?;
    println!("Logged out");
    Ok(())
}
