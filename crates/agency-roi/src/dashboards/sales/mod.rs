//! Sales-dashboard aggregations: headline KPIs, lead-source breakdown, and
//! monthly revenue. Unlike the marketing ROI module these need no
//! agency-spend join.

use crate::dashboards::dates::parse_sale_date;
use crate::dashboards::domain::{LeadCategory, LeadRecord, SaleRecord};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Headline KPIs for the sales dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewMetrics {
    pub total_leads: usize,
    pub response_rate: f64,
    pub properties_sold: usize,
    pub total_revenue: f64,
    pub total_commission: f64,
    /// Average linked leads among sales that have lead linkage. Deliberately
    /// not `total_leads / properties_sold`: it measures attribution quality
    /// for linked sales, not a global ratio.
    pub leads_per_sale: f64,
}

/// One marketing channel's share of the attributed sales.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeadSourceBreakdown {
    pub source: String,
    pub count: usize,
    pub percentage: f64,
    pub revenue: f64,
    pub revenue_percentage: f64,
    pub commission: f64,
    pub commission_percentage: f64,
}

/// Revenue and sale count for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyRevenue {
    /// Human-readable label, e.g. "Mar 2025".
    pub month: String,
    pub revenue: f64,
    pub count: usize,
}

/// Computes headline KPIs. `sales` is expected to be pre-filtered by the
/// caller's agency/date selection; the lead volume and response rate always
/// cover every Sales-category lead in the snapshot.
pub fn compute_overview_metrics(sales: &[SaleRecord], leads: &[LeadRecord]) -> OverviewMetrics {
    let sales_leads: Vec<&LeadRecord> = leads
        .iter()
        .filter(|lead| lead.lead_type == LeadCategory::Sales)
        .collect();
    let total_leads = sales_leads.len();
    let responded = sales_leads.iter().filter(|lead| lead.responded()).count();
    let response_rate = if total_leads > 0 {
        responded as f64 / total_leads as f64 * 100.0
    } else {
        0.0
    };

    let linked_sales: Vec<&SaleRecord> = sales
        .iter()
        .filter(|sale| sale.sales_leads_count > 0)
        .collect();
    let linked_leads_total: u64 = linked_sales
        .iter()
        .map(|sale| u64::from(sale.sales_leads_count))
        .sum();
    let leads_per_sale = if linked_sales.is_empty() {
        0.0
    } else {
        linked_leads_total as f64 / linked_sales.len() as f64
    };

    OverviewMetrics {
        total_leads,
        response_rate,
        properties_sold: sales.len(),
        total_revenue: sales.iter().map(|sale| sale.purchase_amount).sum(),
        total_commission: sales.iter().map(|sale| sale.commission_amount).sum(),
        leads_per_sale,
    }
}

/// Groups attributed sales by channel. Sales without a channel attribution
/// are excluded, and all percentages are relative to the attributed subset,
/// so they sum to 100 whenever the subset is non-empty. Sorted descending
/// by count.
pub fn compute_lead_source_breakdown(sales: &[SaleRecord]) -> Vec<LeadSourceBreakdown> {
    let attributed: Vec<&SaleRecord> = sales
        .iter()
        .filter(|sale| {
            sale.lead_source
                .as_deref()
                .is_some_and(|source| !source.is_empty())
        })
        .collect();

    let total_count = attributed.len();
    let total_revenue: f64 = attributed.iter().map(|sale| sale.purchase_amount).sum();
    let total_commission: f64 = attributed.iter().map(|sale| sale.commission_amount).sum();

    let mut groups: BTreeMap<&str, Vec<&SaleRecord>> = BTreeMap::new();
    for sale in &attributed {
        let source = sale.lead_source.as_deref().unwrap_or_default();
        groups.entry(source).or_default().push(*sale);
    }

    let mut breakdown: Vec<LeadSourceBreakdown> = groups
        .into_iter()
        .map(|(source, group)| {
            let count = group.len();
            let revenue: f64 = group.iter().map(|sale| sale.purchase_amount).sum();
            let commission: f64 = group.iter().map(|sale| sale.commission_amount).sum();

            LeadSourceBreakdown {
                source: source.to_string(),
                count,
                percentage: share(count as f64, total_count as f64),
                revenue,
                revenue_percentage: share(revenue, total_revenue),
                commission,
                commission_percentage: share(commission, total_commission),
            }
        })
        .collect();

    breakdown.sort_by(|a, b| b.count.cmp(&a.count));
    breakdown
}

/// Groups sales by calendar month of `reported_date`, ascending. Rows whose
/// date does not parse are skipped.
pub fn compute_monthly_revenue(sales: &[SaleRecord]) -> Vec<MonthlyRevenue> {
    let mut months: BTreeMap<(i32, u32), (f64, usize)> = BTreeMap::new();
    for sale in sales {
        let Some(date) = parse_sale_date(&sale.reported_date) else {
            continue;
        };
        let entry = months.entry(month_key(date)).or_insert((0.0, 0));
        entry.0 += sale.purchase_amount;
        entry.1 += 1;
    }

    months
        .into_iter()
        .map(|((year, month), (revenue, count))| MonthlyRevenue {
            month: month_label(year, month),
            revenue,
            count,
        })
        .collect()
}

/// Restricts sales to the selected agencies by raw account name. An empty
/// selection means no restriction.
pub fn filter_by_agencies(sales: &[SaleRecord], agencies: &[String]) -> Vec<SaleRecord> {
    if agencies.is_empty() {
        return sales.to_vec();
    }

    sales
        .iter()
        .filter(|sale| agencies.iter().any(|agency| *agency == sale.account_name))
        .cloned()
        .collect()
}

/// Sorted distinct account names across the sales export.
pub fn unique_sale_agencies(sales: &[SaleRecord]) -> Vec<String> {
    let mut names: Vec<String> = sales.iter().map(|sale| sale.account_name.clone()).collect();
    names.sort();
    names.dedup();
    names
}

/// Percentage of `total` that `part` represents, 0 when the total is 0.
fn share(part: f64, total: f64) -> f64 {
    if total > 0.0 {
        part / total * 100.0
    } else {
        0.0
    }
}

fn month_key(date: NaiveDate) -> (i32, u32) {
    use chrono::Datelike;
    (date.year(), date.month())
}

fn month_label(year: i32, month: u32) -> String {
    // First of the month just to borrow chrono's month formatting.
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|date| date.format("%b %Y").to_string())
        .unwrap_or_else(|| format!("{year}-{month:02}"))
}
