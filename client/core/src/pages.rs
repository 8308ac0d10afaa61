//! Page view models and their creation forms
//!
//! Pages only read from [`AppState`]; every change goes through a
//! [`Shell`](crate::Shell) action.

use serde::Serialize;

use crate::analytics::{self, AnalyticsTotals, CampaignStat};
use crate::error::{ClientError, Result};
use crate::models::{Campaign, Channel, Event, EventType, NewCampaign, NewEvent, NewSegment, Segment};
use crate::routes::Route;
use crate::state::AppState;

fn required(field: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ClientError::Validation(format!("{field} is required")));
    }
    Ok(value.to_string())
}

// =============================================================================
// Forms
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentForm {
    pub name: String,
    pub criteria: String,
}

impl SegmentForm {
    pub fn new(name: impl Into<String>, criteria: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            criteria: criteria.into(),
        }
    }

    /// Validates, then resets the form and hands back the request body
    pub fn take(&mut self) -> Result<NewSegment> {
        let params = NewSegment {
            name: required("name", &self.name)?,
            criteria: required("criteria", &self.criteria)?,
        };
        *self = Self::default();
        Ok(params)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CampaignForm {
    pub name: String,
    pub channel: String,
    pub segment_id: Option<i64>,
    /// Free text; blank means unscheduled
    pub schedule: String,
}

impl CampaignForm {
    pub fn take(&mut self) -> Result<NewCampaign> {
        let name = required("name", &self.name)?;
        let channel = Channel::from(required("channel", &self.channel)?);
        let segment_id = self
            .segment_id
            .ok_or_else(|| ClientError::Validation("segment is required".into()))?;
        let schedule = Some(self.schedule.trim())
            .filter(|s| !s.is_empty())
            .map(String::from);

        *self = Self::default();
        Ok(NewCampaign {
            name,
            channel,
            segment_id,
            schedule,
        })
    }
}

/// The analytics page's "simulate data" tool
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventForm {
    pub campaign_id: Option<i64>,
}

impl EventForm {
    pub fn for_campaign(campaign_id: i64) -> Self {
        Self {
            campaign_id: Some(campaign_id),
        }
    }

    /// Recording is disabled until a campaign is selected
    pub fn can_record(&self) -> bool {
        self.campaign_id.is_some()
    }

    pub fn event(&self, event_type: EventType) -> Result<(i64, NewEvent)> {
        let campaign_id = self
            .campaign_id
            .ok_or_else(|| ClientError::Validation("campaign is required".into()))?;
        Ok((campaign_id, NewEvent { event_type }))
    }
}

// =============================================================================
// Pages
// =============================================================================

/// `(id, name)` pair for selection lists
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentsPage {
    pub segments: Vec<Segment>,
}

impl SegmentsPage {
    pub fn build(state: &AppState) -> Self {
        Self {
            segments: state.segments.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignRow {
    #[serde(flatten)]
    pub campaign: Campaign,
    pub segment_name: Option<String>,
    pub can_launch: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignsPage {
    pub campaigns: Vec<CampaignRow>,
    pub segment_options: Vec<SelectOption>,
}

impl CampaignsPage {
    pub fn build(state: &AppState) -> Self {
        let campaigns = state
            .campaigns
            .iter()
            .map(|c| CampaignRow {
                campaign: c.clone(),
                segment_name: c
                    .segment_id
                    .and_then(|id| state.segment(id))
                    .map(|s| s.name.clone()),
                can_launch: c.can_launch(),
            })
            .collect();
        let segment_options = state
            .segments
            .iter()
            .map(|s| SelectOption {
                id: s.id,
                name: s.name.clone(),
            })
            .collect();
        Self {
            campaigns,
            segment_options,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsPage {
    pub stats: Vec<CampaignStat>,
    pub totals: AnalyticsTotals,
    pub campaign_options: Vec<SelectOption>,
    pub events: Vec<Event>,
}

impl AnalyticsPage {
    /// Recomputes statistics from the current collections
    pub fn build(state: &AppState) -> Self {
        let stats = analytics::aggregate(&state.events, &state.campaigns);
        let totals = analytics::totals(&stats);
        let campaign_options = state
            .campaigns
            .iter()
            .map(|c| SelectOption {
                id: c.id,
                name: c.name.clone(),
            })
            .collect();
        Self {
            stats,
            totals,
            campaign_options,
            events: state.events.clone(),
        }
    }
}

/// What a route renders
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "page", rename_all = "lowercase")]
pub enum Page {
    Segments(SegmentsPage),
    Campaigns(CampaignsPage),
    Analytics(AnalyticsPage),
    Login,
    Register,
}

impl Page {
    /// Builds the page for a route that already passed the guard.
    /// The root path shows the campaigns page it forwards to.
    pub fn build(route: Route, state: &AppState) -> Self {
        match route {
            Route::Segments => Page::Segments(SegmentsPage::build(state)),
            Route::Root | Route::Campaigns => Page::Campaigns(CampaignsPage::build(state)),
            Route::Analytics => Page::Analytics(AnalyticsPage::build(state)),
            Route::Login => Page::Login,
            Route::Register => Page::Register,
        }
    }

    pub fn route(&self) -> Route {
        match self {
            Page::Segments(_) => Route::Segments,
            Page::Campaigns(_) => Route::Campaigns,
            Page::Analytics(_) => Route::Analytics,
            Page::Login => Route::Login,
            Page::Register => Route::Register,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CampaignStatus;
    use chrono::Utc;

    fn state() -> AppState {
        let mut state = AppState::new();
        state.segments = vec![Segment {
            id: 1,
            name: "US adults".into(),
            criteria: "age > 25".into(),
            created_at: None,
        }];
        state.campaigns = vec![
            Campaign {
                id: 10,
                name: "Spring".into(),
                channel: Channel::Email,
                segment_id: Some(1),
                status: CampaignStatus::Draft,
                schedule: None,
                created_at: None,
            },
            Campaign {
                id: 11,
                name: "Orphan".into(),
                channel: Channel::Unknown("fax".into()),
                segment_id: Some(42),
                status: CampaignStatus::Launched,
                schedule: Some("2024-06-01T09:00".into()),
                created_at: None,
            },
        ];
        state.events = vec![Event {
            id: 1,
            campaign_id: 10,
            event_type: EventType::View,
            occurred_at: Utc::now(),
            event_metadata: None,
        }];
        state
    }

    #[test]
    fn test_segment_form_requires_fields_and_resets() {
        let mut form = SegmentForm::new("  ", "age > 25");
        assert!(matches!(form.take(), Err(ClientError::Validation(_))));
        assert_eq!(form.criteria, "age > 25");

        form.name = "Adults".into();
        let params = form.take().unwrap();
        assert_eq!(params.name, "Adults");
        assert_eq!(form, SegmentForm::default());
    }

    #[test]
    fn test_campaign_form() {
        let mut form = CampaignForm {
            name: "Spring".into(),
            channel: "email".into(),
            segment_id: None,
            schedule: "   ".into(),
        };
        assert!(form.take().is_err());

        form.segment_id = Some(1);
        let params = form.take().unwrap();
        assert_eq!(params.channel, Channel::Email);
        assert_eq!(params.schedule, None);
        assert_eq!(form, CampaignForm::default());
    }

    #[test]
    fn test_event_form_needs_campaign() {
        let form = EventForm::default();
        assert!(!form.can_record());
        assert!(form.event(EventType::View).is_err());

        let (id, event) = EventForm::for_campaign(10).event(EventType::Click).unwrap();
        assert_eq!((id, event.event_type), (10, EventType::Click));
    }

    #[test]
    fn test_campaigns_page_rows() {
        let page = CampaignsPage::build(&state());
        assert_eq!(page.campaigns[0].segment_name.as_deref(), Some("US adults"));
        assert!(page.campaigns[0].can_launch);
        assert_eq!(page.campaigns[1].segment_name, None);
        assert!(!page.campaigns[1].can_launch);
        assert_eq!(page.segment_options.len(), 1);
    }

    #[test]
    fn test_analytics_page_derives_stats() {
        let page = AnalyticsPage::build(&state());
        assert_eq!(page.stats.len(), 2);
        assert_eq!(page.stats[0].views, 1);
        assert_eq!(page.totals.views, 1);
        assert_eq!(page.campaign_options[1].name, "Orphan");
    }

    #[test]
    fn test_root_shows_campaigns() {
        let state = state();
        assert_eq!(Page::build(Route::Root, &state).route(), Route::Campaigns);
        assert_eq!(Page::build(Route::Segments, &state).route(), Route::Segments);
    }
}
