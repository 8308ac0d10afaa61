//! Campaign performance aggregation
//!
//! Pure functions over the events and campaigns collections, recomputed on
//! every render of the analytics page.

use serde::Serialize;

use crate::models::{Campaign, Event, EventType};

/// Attributed revenue per click
pub const REVENUE_PER_CLICK: u64 = 10;

/// Names longer than this are shortened for chart axes
const DISPLAY_NAME_LIMIT: usize = 12;
const DISPLAY_NAME_KEEP: usize = 10;

/// Per-campaign statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignStat {
    pub campaign_id: i64,
    pub name: String,
    pub short_name: String,
    pub views: u64,
    pub clicks: u64,
    /// Click-through rate in percent, one decimal; 0 when there are no views
    pub ctr: f64,
    pub revenue: u64,
}

impl CampaignStat {
    pub fn band(&self) -> CtrBand {
        CtrBand::of(self.ctr)
    }
}

/// Dashboard-wide totals
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalyticsTotals {
    pub views: u64,
    pub clicks: u64,
    pub revenue: u64,
    /// Total clicks over total views, in percent
    pub conversion_rate: f64,
}

/// Coarse CTR rating used to colour the breakdown table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CtrBand {
    High,
    Medium,
    Low,
}

impl CtrBand {
    pub fn of(ctr: f64) -> Self {
        if ctr > 20.0 {
            CtrBand::High
        } else if ctr > 5.0 {
            CtrBand::Medium
        } else {
            CtrBand::Low
        }
    }
}

/// One stat per campaign, in campaign order
pub fn aggregate(events: &[Event], campaigns: &[Campaign]) -> Vec<CampaignStat> {
    campaigns
        .iter()
        .map(|campaign| {
            let (views, clicks) = events
                .iter()
                .filter(|e| e.campaign_id == campaign.id)
                .fold((0, 0), |(views, clicks), e| match e.event_type {
                    EventType::View => (views + 1, clicks),
                    EventType::Click => (views, clicks + 1),
                    _ => (views, clicks),
                });

            CampaignStat {
                campaign_id: campaign.id,
                name: campaign.name.clone(),
                short_name: short_name(&campaign.name),
                views,
                clicks,
                ctr: rate(clicks, views),
                revenue: clicks * REVENUE_PER_CLICK,
            }
        })
        .collect()
}

pub fn totals(stats: &[CampaignStat]) -> AnalyticsTotals {
    let views = stats.iter().map(|s| s.views).sum();
    let clicks = stats.iter().map(|s| s.clicks).sum();
    let revenue = stats.iter().map(|s| s.revenue).sum();
    AnalyticsTotals {
        views,
        clicks,
        revenue,
        conversion_rate: rate(clicks, views),
    }
}

/// `part / whole * 100` rounded to one decimal, 0 for an empty whole
fn rate(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    let pct = part as f64 / whole as f64 * 100.0;
    (pct * 10.0).round() / 10.0
}

pub fn short_name(name: &str) -> String {
    if name.chars().count() > DISPLAY_NAME_LIMIT {
        let kept: String = name.chars().take(DISPLAY_NAME_KEEP).collect();
        format!("{kept}...")
    } else {
        name.to_string()
    }
}
