use crate::dashboards::domain::{LeadRecord, SaleRecord};
use serde::Serialize;

/// Cost, response, and wastage metrics for one marketing channel over one
/// reporting window. Derived on every filter change, never stored.
///
/// Division policy: any ratio with a zero denominator is exactly `0.0`,
/// never infinity, NaN, or an error. Zero leads count as 100% wastage of
/// whatever was spent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SourceMetrics {
    pub total_leads: usize,
    pub responded_leads: usize,
    pub total_sales: usize,
    pub total_spend: f64,
    pub cost_per_lead: f64,
    pub cost_per_sale: f64,
    pub effective_cost_per_lead: f64,
    pub wasted_cost_per_lead: f64,
    pub response_rate: f64,
    pub wastage_rate: f64,
    pub wasted_spend: f64,
}

impl SourceMetrics {
    /// Computes channel metrics from leads and sales already attributed to
    /// that channel, the channel's monthly spend, and the month count of
    /// the active window.
    pub fn compute(
        leads: &[LeadRecord],
        sales: &[SaleRecord],
        monthly_spend: f64,
        months: u32,
    ) -> Self {
        let total_spend = monthly_spend * f64::from(months);
        let total_leads = leads.len();
        let responded_leads = leads.iter().filter(|lead| lead.responded()).count();
        let total_sales = sales.len();

        Self::from_totals(total_leads, responded_leads, total_sales, total_spend)
    }

    /// Folds per-channel metrics into a combined result. The five additive
    /// totals (leads, responded, sales, spend, wasted spend) are summed and
    /// every ratio is recomputed from those sums. Ratios of sums, not sums
    /// of ratios: averaging per-channel rates would weight a dead channel
    /// the same as a busy one.
    pub fn combine<'a, I>(parts: I) -> Self
    where
        I: IntoIterator<Item = &'a SourceMetrics>,
    {
        let mut total_leads = 0;
        let mut responded_leads = 0;
        let mut total_sales = 0;
        let mut total_spend = 0.0;
        let mut wasted_spend = 0.0;
        for part in parts {
            total_leads += part.total_leads;
            responded_leads += part.responded_leads;
            total_sales += part.total_sales;
            total_spend += part.total_spend;
            wasted_spend += part.wasted_spend;
        }

        let response_rate = if total_leads > 0 {
            responded_leads as f64 / total_leads as f64 * 100.0
        } else {
            0.0
        };
        let unresponded = total_leads - responded_leads;

        Self {
            total_leads,
            responded_leads,
            total_sales,
            total_spend,
            cost_per_lead: guarded_ratio(total_spend, total_leads),
            cost_per_sale: guarded_ratio(total_spend, total_sales),
            effective_cost_per_lead: guarded_ratio(total_spend, responded_leads),
            wasted_cost_per_lead: guarded_ratio(wasted_spend, unresponded),
            response_rate,
            wastage_rate: 100.0 - response_rate,
            wasted_spend,
        }
    }

    fn from_totals(
        total_leads: usize,
        responded_leads: usize,
        total_sales: usize,
        total_spend: f64,
    ) -> Self {
        let response_rate = if total_leads > 0 {
            responded_leads as f64 / total_leads as f64 * 100.0
        } else {
            0.0
        };
        let wastage_rate = 100.0 - response_rate;
        let wasted_spend = total_spend * wastage_rate / 100.0;
        let unresponded = total_leads - responded_leads;

        Self {
            total_leads,
            responded_leads,
            total_sales,
            total_spend,
            cost_per_lead: guarded_ratio(total_spend, total_leads),
            cost_per_sale: guarded_ratio(total_spend, total_sales),
            effective_cost_per_lead: guarded_ratio(total_spend, responded_leads),
            wasted_cost_per_lead: guarded_ratio(wasted_spend, unresponded),
            response_rate,
            wastage_rate,
            wasted_spend,
        }
    }
}

fn guarded_ratio(numerator: f64, denominator: usize) -> f64 {
    if denominator > 0 {
        numerator / denominator as f64
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboards::domain::{LeadCategory, AGENT_RESPONDED, CHANNEL_PROPERTY24};

    fn lead(status: &str) -> LeadRecord {
        LeadRecord {
            occurred_at: "18 Sept 2025, 03:24:24".to_string(),
            franchise: "RealNet - Sandton".to_string(),
            source: CHANNEL_PROPERTY24.to_string(),
            status: status.to_string(),
            lead_type: LeadCategory::Sales,
        }
    }

    fn sale(purchase: f64, commission: f64) -> SaleRecord {
        SaleRecord {
            id: 1,
            lead_source: Some(CHANNEL_PROPERTY24.to_string()),
            reported_date: "2025-04-02".to_string(),
            account_name: "RealNet Sandton".to_string(),
            purchase_amount: purchase,
            commission_amount: commission,
            sales_leads_count: 0,
        }
    }

    #[test]
    fn computes_reference_scenario() {
        let leads = vec![lead(AGENT_RESPONDED), lead("New")];
        let sales = vec![sale(100_000.0, 5_000.0)];

        let metrics = SourceMetrics::compute(&leads, &sales, 1_000.0, 1);

        assert_eq!(metrics.total_leads, 2);
        assert_eq!(metrics.responded_leads, 1);
        assert_eq!(metrics.total_sales, 1);
        assert_eq!(metrics.total_spend, 1_000.0);
        assert_eq!(metrics.cost_per_lead, 500.0);
        assert_eq!(metrics.cost_per_sale, 1_000.0);
        assert_eq!(metrics.effective_cost_per_lead, 1_000.0);
        assert_eq!(metrics.response_rate, 50.0);
        assert_eq!(metrics.wastage_rate, 50.0);
        assert_eq!(metrics.wasted_spend, 500.0);
        assert_eq!(metrics.wasted_cost_per_lead, 500.0);
    }

    #[test]
    fn zero_leads_is_full_wastage_with_zero_ratios() {
        let metrics = SourceMetrics::compute(&[], &[], 2_500.0, 3);

        assert_eq!(metrics.total_spend, 7_500.0);
        assert_eq!(metrics.cost_per_lead, 0.0);
        assert_eq!(metrics.cost_per_sale, 0.0);
        assert_eq!(metrics.effective_cost_per_lead, 0.0);
        assert_eq!(metrics.wasted_cost_per_lead, 0.0);
        assert_eq!(metrics.response_rate, 0.0);
        assert_eq!(metrics.wastage_rate, 100.0);
        assert_eq!(metrics.wasted_spend, 7_500.0);
    }

    #[test]
    fn compute_is_pure() {
        let leads = vec![lead(AGENT_RESPONDED), lead("New"), lead("New")];
        let sales = vec![sale(250_000.0, 12_000.0)];

        let first = SourceMetrics::compute(&leads, &sales, 900.0, 4);
        let second = SourceMetrics::compute(&leads, &sales, 900.0, 4);
        assert_eq!(first, second);
    }

    #[test]
    fn combine_uses_ratio_of_sums() {
        let busy = SourceMetrics::from_totals(10, 2, 1, 1_000.0);
        let dead = SourceMetrics::from_totals(0, 0, 0, 500.0);

        let combined = SourceMetrics::combine([&busy, &dead]);

        // 2/10, not the average of 20% and 0%.
        assert_eq!(combined.response_rate, 20.0);
        assert_eq!(combined.wastage_rate, 80.0);
        assert_eq!(combined.total_spend, 1_500.0);
        assert_eq!(combined.cost_per_lead, 150.0);
        // Wasted spend sums per-channel wastage (800 + 500), it is not
        // re-derived from the folded rate.
        assert_eq!(combined.wasted_spend, 1_300.0);
        assert_eq!(combined.wasted_cost_per_lead, 1_300.0 / 8.0);
    }

    #[test]
    fn combine_of_nothing_is_all_zero_except_wastage() {
        let combined = SourceMetrics::combine([]);
        assert_eq!(combined.total_leads, 0);
        assert_eq!(combined.total_spend, 0.0);
        assert_eq!(combined.wastage_rate, 100.0);
        assert_eq!(combined.wasted_spend, 0.0);
    }
}
