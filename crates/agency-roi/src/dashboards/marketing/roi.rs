use super::metrics::SourceMetrics;
use crate::config::ReportingConfig;
use crate::dashboards::dates::{filter_by_date_range, month_span};
use crate::dashboards::domain::{
    AgencySpend, LeadCategory, LeadRecord, SaleRecord, DASHBOARD_CHANNELS,
};
use crate::dashboards::normalizer::normalize_agency_name;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

/// Agency filter sentinel meaning "no restriction".
const ALL_AGENCIES: &str = "all";

/// Metrics for one marketing channel within a report.
#[derive(Debug, Clone, Serialize)]
pub struct ChannelRoi {
    pub channel: String,
    pub metrics: SourceMetrics,
}

/// Dataset-wide ROI: one entry per dashboard channel plus the fold across
/// all of them.
#[derive(Debug, Clone, Serialize)]
pub struct OverallRoiReport {
    /// Month count the spend figures were scaled by.
    pub months: u32,
    pub channels: Vec<ChannelRoi>,
    pub combined: SourceMetrics,
}

/// ROI for a single agency with nested per-channel breakdowns.
#[derive(Debug, Clone, Serialize)]
pub struct AgencyRoi {
    pub account_name: String,
    pub combined: SourceMetrics,
    pub channels: Vec<ChannelRoi>,
}

/// Computes ROI across the whole filtered dataset, optionally restricted to
/// one agency. `selected_agency` of `None` or the `"all"` sentinel means no
/// restriction; for a named agency the spend figures come from its spend
/// row alone (zero when no row matches).
pub fn compute_overall_roi(
    leads: &[LeadRecord],
    sales: &[SaleRecord],
    spends: &[AgencySpend],
    selected_agency: Option<&str>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    reporting: &ReportingConfig,
) -> OverallRoiReport {
    let end = reporting.effective_end(end);
    let months = month_span(start, end, reporting.default_month_span);

    let mut leads = sales_category(&filter_by_date_range(leads, start, end));
    let mut sales = filter_by_date_range(sales, start, end);

    let selected = selected_agency.filter(|agency| *agency != ALL_AGENCIES);
    let spend_row = selected.map(|agency| {
        let normalized = normalize_agency_name(agency);
        leads.retain(|lead| normalize_agency_name(&lead.franchise) == normalized);
        sales.retain(|sale| normalize_agency_name(&sale.account_name) == normalized);

        let row = spends
            .iter()
            .find(|spend| normalize_agency_name(&spend.account_name) == normalized);
        debug!(
            agency = %agency,
            normalized = %normalized,
            leads = leads.len(),
            sales = sales.len(),
            spend_row_found = row.is_some(),
            "restricted ROI inputs to one agency"
        );
        row
    });

    let monthly_spend_for = |channel: &str| match spend_row {
        // A selected agency without a spend row contributes zero spend.
        Some(row) => row.map_or(0.0, |spend| spend.monthly_spend_for(channel)),
        None => spends
            .iter()
            .map(|spend| spend.monthly_spend_for(channel))
            .sum(),
    };

    let channels: Vec<ChannelRoi> = DASHBOARD_CHANNELS
        .iter()
        .map(|channel| {
            channel_roi(channel, &leads, &sales, monthly_spend_for(channel), months)
        })
        .collect();

    let combined = SourceMetrics::combine(channels.iter().map(|entry| &entry.metrics));
    debug!(
        months,
        total_leads = combined.total_leads,
        total_spend = combined.total_spend,
        "computed overall ROI"
    );

    OverallRoiReport {
        months,
        channels,
        combined,
    }
}

/// Computes ROI per agency, one entry per spend row in input order. An
/// agency with no matching leads or sales still produces an entry; all of
/// its count-derived metrics are zero by the zero-guard rule. Ranking is a
/// presentation concern and is left to the caller.
pub fn compute_agency_roi(
    leads: &[LeadRecord],
    sales: &[SaleRecord],
    spends: &[AgencySpend],
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    reporting: &ReportingConfig,
) -> Vec<AgencyRoi> {
    let end = reporting.effective_end(end);
    let months = month_span(start, end, reporting.default_month_span);

    let leads = sales_category(&filter_by_date_range(leads, start, end));
    let sales = filter_by_date_range(sales, start, end);

    spends
        .iter()
        .map(|spend| {
            let normalized = normalize_agency_name(&spend.account_name);
            let agency_leads: Vec<LeadRecord> = leads
                .iter()
                .filter(|lead| normalize_agency_name(&lead.franchise) == normalized)
                .cloned()
                .collect();
            let agency_sales: Vec<SaleRecord> = sales
                .iter()
                .filter(|sale| normalize_agency_name(&sale.account_name) == normalized)
                .cloned()
                .collect();

            let channels: Vec<ChannelRoi> = DASHBOARD_CHANNELS
                .iter()
                .map(|channel| {
                    channel_roi(
                        channel,
                        &agency_leads,
                        &agency_sales,
                        spend.monthly_spend_for(channel),
                        months,
                    )
                })
                .collect();

            let combined = SourceMetrics::combine(channels.iter().map(|entry| &entry.metrics));

            AgencyRoi {
                account_name: spend.account_name.clone(),
                combined,
                channels,
            }
        })
        .collect()
}

/// Sorted raw agency names for filter dropdowns.
pub fn unique_agencies(spends: &[AgencySpend]) -> Vec<String> {
    let mut names: Vec<String> = spends
        .iter()
        .map(|spend| spend.account_name.clone())
        .collect();
    names.sort();
    names.dedup();
    names
}

fn channel_roi(
    channel: &str,
    leads: &[LeadRecord],
    sales: &[SaleRecord],
    monthly_spend: f64,
    months: u32,
) -> ChannelRoi {
    let channel_leads: Vec<LeadRecord> = leads
        .iter()
        .filter(|lead| lead.source == channel)
        .cloned()
        .collect();
    let channel_sales: Vec<SaleRecord> = sales
        .iter()
        .filter(|sale| sale.lead_source.as_deref() == Some(channel))
        .cloned()
        .collect();

    ChannelRoi {
        channel: channel.to_string(),
        metrics: SourceMetrics::compute(&channel_leads, &channel_sales, monthly_spend, months),
    }
}

/// Only Sales-category leads participate in ROI computation.
fn sales_category(leads: &[LeadRecord]) -> Vec<LeadRecord> {
    leads
        .iter()
        .filter(|lead| lead.lead_type == LeadCategory::Sales)
        .cloned()
        .collect()
}
