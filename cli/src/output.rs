//! Output formatting

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use marktauto_client::analytics::CampaignStat;
use marktauto_client::pages::{AnalyticsPage, CampaignsPage, SegmentsPage};
use marktauto_client::{Notice, Page, Severity};
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Yaml,
}

impl OutputFormat {
    pub fn print<T: Serialize>(&self, data: &T) -> Result<()> {
        match self {
            OutputFormat::Yaml => println!("{}", serde_yaml::to_string(data)?),
            OutputFormat::Json | OutputFormat::Table => {
                println!("{}", serde_json::to_string_pretty(data)?)
            }
        }
        Ok(())
    }

    pub fn page(&self, page: &Page) -> Result<()> {
        match self {
            OutputFormat::Table => {
                println!("{}", render_page(page));
                Ok(())
            }
            _ => self.print(page),
        }
    }
}

/// Banner line, or nothing when the notice is empty
pub fn notice(notice: &Notice) {
    if !notice.is_visible() {
        return;
    }
    let line = match notice.severity {
        Severity::Success => format!("✔ {}", notice.message).green(),
        Severity::Error => format!("✘ {}", notice.message).red(),
        Severity::Info => format!("ℹ {}", notice.message).blue(),
    };
    eprintln!("{}", line.bold());
}

pub fn render_page(page: &Page) -> String {
    match page {
        Page::Segments(p) => segments(p),
        Page::Campaigns(p) => campaigns(p),
        Page::Analytics(p) => analytics(p),
        Page::Login => format!(
            "{}\n  marktauto login --email <email> --password <password>\n  No account? marktauto register",
            "Login".bold()
        ),
        Page::Register => format!(
            "{}\n  marktauto register --email <email> --password <password>",
            "Register".bold()
        ),
    }
}

fn table<T: Tabled>(rows: Vec<T>, empty: &str) -> String {
    if rows.is_empty() {
        return format!("  {}", empty.dimmed());
    }
    Table::new(rows).with(Style::rounded()).to_string()
}

#[derive(Tabled)]
struct SegmentRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Criteria")]
    criteria: String,
}

fn segments(page: &SegmentsPage) -> String {
    let rows = page
        .segments
        .iter()
        .map(|s| SegmentRow {
            id: s.id,
            name: s.name.clone(),
            criteria: s.criteria.clone(),
        })
        .collect();
    format!(
        "{}\n{}",
        "Audience Management".bold(),
        table(rows, "No segments yet. Create one with `marktauto segments create`.")
    )
}

#[derive(Tabled)]
struct CampaignRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Channel")]
    channel: String,
    #[tabled(rename = "Segment")]
    segment: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Schedule")]
    schedule: String,
    #[tabled(rename = "Action")]
    action: String,
}

fn campaigns(page: &CampaignsPage) -> String {
    let rows = page
        .campaigns
        .iter()
        .map(|row| {
            let c = &row.campaign;
            CampaignRow {
                id: c.id,
                name: c.name.clone(),
                channel: c.channel.to_string(),
                segment: row
                    .segment_name
                    .clone()
                    .or_else(|| c.segment_id.map(|id| format!("#{id}")))
                    .unwrap_or_else(|| "-".into()),
                status: c.status.to_string(),
                schedule: c.schedule.clone().unwrap_or_else(|| "-".into()),
                action: if row.can_launch {
                    format!("launch {}", c.id)
                } else {
                    String::new()
                },
            }
        })
        .collect();
    format!(
        "{}\n{}",
        "Campaign Management".bold(),
        table(rows, "No campaigns yet. Draft one with `marktauto campaigns create`.")
    )
}

#[derive(Tabled)]
struct StatRow {
    #[tabled(rename = "Campaign")]
    name: String,
    #[tabled(rename = "Views")]
    views: u64,
    #[tabled(rename = "Clicks")]
    clicks: u64,
    #[tabled(rename = "CTR (%)")]
    ctr: f64,
    #[tabled(rename = "Rating")]
    band: String,
    #[tabled(rename = "Revenue")]
    revenue: String,
}

const BAR_WIDTH: u64 = 30;

/// Horizontal bar chart keyed by the shortened campaign name
fn bars(stats: &[CampaignStat], value: impl Fn(&CampaignStat) -> u64) -> String {
    let max = stats.iter().map(&value).max().unwrap_or(0).max(1);
    stats
        .iter()
        .map(|s| {
            let v = value(s);
            let len = (v * BAR_WIDTH / max) as usize;
            format!("  {:<13} {} {}", s.short_name, "█".repeat(len), v)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn analytics(page: &AnalyticsPage) -> String {
    let t = &page.totals;
    let kpis = format!(
        "  Total Revenue (Attr.): ${}   Total Clicks: {}   Total Views: {}   Avg Conversion: {}%",
        t.revenue, t.clicks, t.views, t.conversion_rate
    );

    let rows = page
        .stats
        .iter()
        .map(|s| StatRow {
            name: s.name.clone(),
            views: s.views,
            clicks: s.clicks,
            ctr: s.ctr,
            band: format!("{:?}", s.band()).to_lowercase(),
            revenue: format!("${}", s.revenue),
        })
        .collect();

    let mut out = vec![
        "Marketing Performance Dashboard".bold().to_string(),
        kpis,
    ];
    if !page.stats.is_empty() {
        out.push(format!("\n{}", "Campaign Effectiveness (clicks)".bold()));
        out.push(bars(&page.stats, |s| s.clicks));
        out.push(format!("\n{}", "Attributed Revenue ($10/click)".bold()));
        out.push(bars(&page.stats, |s| s.revenue));
    }
    out.push(format!("\n{}", "Campaign Performance Breakdown".bold()));
    out.push(table(rows, "No data available"));
    out.join("\n")
}
