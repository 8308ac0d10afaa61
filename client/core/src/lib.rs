//! MarktAuto Client - Marketing Dashboard Core
//!
//! Session handling, REST API access, application state and analytics for
//! the MarktAuto marketing dashboard. Front ends (the `marktauto` CLI) render
//! the page view models this crate produces and route every user action
//! through the [`Shell`].
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                              SHELL                                  │
//! │                                                                     │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐  ┌─────────┐  │
//! │  │   Session    │  │     API      │  │   Routing    │  │  Notice │  │
//! │  │    Store     │  │    Client    │  │    Guard     │  │  Banner │  │
//! │  └──────┬───────┘  └──────┬───────┘  └──────┬───────┘  └────┬────┘  │
//! │         │                 │                 │               │       │
//! │  ┌──────▼─────────────────▼─────────────────▼───────────────▼────┐  │
//! │  │        AppState: segments / campaigns / events collections    │  │
//! │  └───────────────────────────────┬───────────────────────────────┘  │
//! │                                  │                                  │
//! │  ┌──────────────┐  ┌─────────────▼┐  ┌──────────────┐               │
//! │  │   Segments   │  │  Campaigns   │  │  Analytics   │ ◄─ aggregate  │
//! │  │     Page     │  │     Page     │  │     Page     │               │
//! │  └──────────────┘  └──────────────┘  └──────────────┘               │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

pub mod analytics;
pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod pages;
pub mod routes;
pub mod session;
pub mod shell;
pub mod state;

pub use analytics::{aggregate, totals, AnalyticsTotals, CampaignStat, CtrBand};
pub use api::ApiClient;
pub use auth::{AuthOutcome, Credentials, LoginForm, RegisterForm};
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use models::{
    Campaign, CampaignStatus, Channel, Event, EventType, NewCampaign, NewEvent, NewSegment,
    Segment,
};
pub use pages::{AnalyticsPage, CampaignForm, CampaignsPage, EventForm, Page, SegmentForm, SegmentsPage};
pub use routes::{guard, resolve, Navigation, Route};
pub use session::{FileSessionStore, MemorySessionStore, SessionStore};
pub use shell::Shell;
pub use state::{AppState, Notice, Severity};

/// Client version, sent in the user agent
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
