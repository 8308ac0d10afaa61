//! Interactive dashboard
//!
//! Reads one command per line from stdin. Paths navigate (and clear the
//! banner); the other commands act on the current session.

use anyhow::Result;
use marktauto_client::{EventForm, EventType};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::App;
use crate::output;

const HELP: &str = "\
Commands:
  /segments | /campaigns | /analytics | /login | /register | /
  launch <campaign-id>     launch a draft campaign
  view <campaign-id>       record a view
  click <campaign-id>      record a click
  reload                   refetch segments, campaigns and events
  dismiss                  clear the notification
  logout
  help
  quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Navigate(String),
    Launch(i64),
    Record(i64, EventType),
    Reload,
    Dismiss,
    Logout,
    Help,
    Quit,
    Empty,
    Invalid(String),
}

impl Line {
    pub fn parse(input: &str) -> Self {
        let mut words = input.split_whitespace();
        let Some(head) = words.next() else {
            return Line::Empty;
        };
        let id = words.next().and_then(|w| w.parse::<i64>().ok());

        match (head, id) {
            (path, _) if path.starts_with('/') => Line::Navigate(path.to_string()),
            ("launch", Some(id)) => Line::Launch(id),
            ("view", Some(id)) => Line::Record(id, EventType::View),
            ("click", Some(id)) => Line::Record(id, EventType::Click),
            ("reload", _) => Line::Reload,
            ("dismiss", _) => Line::Dismiss,
            ("logout", _) => Line::Logout,
            ("help" | "?", _) => Line::Help,
            ("quit" | "exit" | "q", _) => Line::Quit,
            _ => Line::Invalid(input.trim().to_string()),
        }
    }
}

pub async fn run(app: &mut App) -> Result<()> {
    let page = app.shell.page();
    app.format.page(&page)?;
    println!("\nType `help` for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(input) = lines.next_line().await? {
        match Line::parse(&input) {
            Line::Empty => continue,
            Line::Quit => break,
            Line::Help => println!("{HELP}"),
            Line::Invalid(cmd) => eprintln!("Unknown command: {cmd} (try `help`)"),
            line => {
                if let Some(problem) = apply(app, line).await {
                    eprintln!("{problem}");
                }
                output::notice(app.shell.notice());
                app.format.page(&app.shell.page())?;
            }
        }
    }
    Ok(())
}

/// Runs one dashboard action. Returns a line for stderr when something went
/// wrong that the banner does not already report.
async fn apply(app: &mut App, line: Line) -> Option<String> {
    match line {
        Line::Navigate(path) => app.shell.navigate(&path).err().map(|e| e.to_string()),
        Line::Launch(id) => {
            let _ = app.shell.launch_campaign(id).await;
            None
        }
        Line::Record(id, event_type) => {
            let _ = app.shell.record_event(&EventForm::for_campaign(id), event_type).await;
            None
        }
        Line::Reload => app
            .shell
            .load_all()
            .await
            .err()
            .map(|_| "Reload failed; showing the last loaded data.".to_string()),
        Line::Dismiss => {
            app.shell.dismiss_notice();
            None
        }
        Line::Logout => app.shell.logout().err().map(|e| format!("Logout failed: {e}")),
        Line::Help | Line::Quit | Line::Empty | Line::Invalid(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use marktauto_client::{ClientConfig, FileSessionStore, MemorySessionStore, SessionStore, Shell};
    use std::sync::Arc;

    fn app(session: Arc<dyn SessionStore>) -> App {
        let config = ClientConfig::new("http://127.0.0.1:9/api", "unused.json");
        App::new(Shell::new(&config, session).unwrap(), OutputFormat::Json)
    }

    #[tokio::test]
    async fn test_failed_logout_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the session file should be cannot be removed as a file
        let session: Arc<dyn SessionStore> = Arc::new(FileSessionStore::open(dir.path()));
        let mut app = app(session);

        let problem = apply(&mut app, Line::Logout).await;
        assert!(problem.unwrap().starts_with("Logout failed"));
    }

    #[tokio::test]
    async fn test_logout_reports_nothing_on_success() {
        let session: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::with_token("tok"));
        let mut app = app(session.clone());

        assert_eq!(apply(&mut app, Line::Logout).await, None);
        assert_eq!(session.token(), None);
    }

    #[tokio::test]
    async fn test_failed_reload_and_bad_path_are_reported() {
        let session: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::with_token("tok"));
        let mut app = app(session);

        assert!(apply(&mut app, Line::Reload).await.is_some());
        assert!(apply(&mut app, Line::Navigate("/settings".into())).await.is_some());
        assert_eq!(apply(&mut app, Line::Navigate("/analytics".into())).await, None);
    }

    #[test]
    fn test_parse_lines() {
        assert_eq!(Line::parse("/analytics"), Line::Navigate("/analytics".into()));
        assert_eq!(Line::parse("  launch 4 "), Line::Launch(4));
        assert_eq!(Line::parse("click 2"), Line::Record(2, EventType::Click));
        assert_eq!(Line::parse("view 2"), Line::Record(2, EventType::View));
        assert_eq!(Line::parse("   "), Line::Empty);
        assert_eq!(Line::parse("exit"), Line::Quit);
        assert_eq!(Line::parse("launch"), Line::Invalid("launch".into()));
        assert_eq!(Line::parse("view abc"), Line::Invalid("view abc".into()));
    }
}
