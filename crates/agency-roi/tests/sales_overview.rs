use agency_roi::dashboards::dates::filter_by_date_range;
use agency_roi::dashboards::domain::{
    LeadCategory, LeadRecord, SaleRecord, AGENT_RESPONDED, CHANNEL_PRIVATE_PROPERTY,
    CHANNEL_PROPERTY24,
};
use agency_roi::dashboards::sales::{
    compute_lead_source_breakdown, compute_monthly_revenue, compute_overview_metrics,
    filter_by_agencies, unique_sale_agencies,
};
use chrono::NaiveDate;

fn lead(status: &str, lead_type: LeadCategory) -> LeadRecord {
    LeadRecord {
        occurred_at: "5 Mar 2025, 11:30:00".to_string(),
        franchise: "RealNet - Sandton".to_string(),
        source: CHANNEL_PROPERTY24.to_string(),
        status: status.to_string(),
        lead_type,
    }
}

fn sale(
    id: i64,
    lead_source: Option<&str>,
    reported_date: &str,
    account_name: &str,
    purchase_amount: f64,
    commission_amount: f64,
    linked: u32,
) -> SaleRecord {
    SaleRecord {
        id,
        lead_source: lead_source.map(str::to_string),
        reported_date: reported_date.to_string(),
        account_name: account_name.to_string(),
        purchase_amount,
        commission_amount,
        sales_leads_count: linked,
    }
}

fn sales_fixture() -> Vec<SaleRecord> {
    vec![
        sale(1, Some(CHANNEL_PROPERTY24), "2025-01-20", "RealNet Sandton", 900_000.0, 45_000.0, 3),
        sale(2, Some(CHANNEL_PROPERTY24), "2025-02-11", "Acme Estates", 1_100_000.0, 55_000.0, 5),
        sale(
            3,
            Some(CHANNEL_PRIVATE_PROPERTY),
            "2025-02-27",
            "RealNet Sandton",
            600_000.0,
            30_000.0,
            0,
        ),
        sale(4, None, "2025-03-03", "Acme Estates", 400_000.0, 20_000.0, 0),
    ]
}

#[test]
fn overview_kpis_over_the_filtered_snapshot() {
    let leads = vec![
        lead(AGENT_RESPONDED, LeadCategory::Sales),
        lead(AGENT_RESPONDED, LeadCategory::Sales),
        lead("New", LeadCategory::Sales),
        lead(AGENT_RESPONDED, LeadCategory::Rental),
    ];
    let sales = sales_fixture();

    let overview = compute_overview_metrics(&sales, &leads);

    assert_eq!(overview.total_leads, 3);
    assert!((overview.response_rate - 200.0 / 3.0).abs() < 1e-9);
    assert_eq!(overview.properties_sold, 4);
    assert_eq!(overview.total_revenue, 3_000_000.0);
    assert_eq!(overview.total_commission, 150_000.0);
    // (3 + 5) linked leads over the two linked sales; the unlinked sales
    // stay out of the denominator.
    assert_eq!(overview.leads_per_sale, 4.0);
}

#[test]
fn breakdown_percentages_cover_the_attributed_subset() {
    let breakdown = compute_lead_source_breakdown(&sales_fixture());

    assert_eq!(breakdown.len(), 2);
    assert_eq!(breakdown[0].source, CHANNEL_PROPERTY24);
    assert_eq!(breakdown[0].count, 2);
    assert_eq!(breakdown[0].revenue, 2_000_000.0);
    assert!((breakdown[0].percentage - 200.0 / 3.0).abs() < 1e-9);
    assert!((breakdown[0].revenue_percentage - 2_000_000.0 / 2_600_000.0 * 100.0).abs() < 1e-9);

    let total_pct: f64 = breakdown.iter().map(|entry| entry.percentage).sum();
    assert!((total_pct - 100.0).abs() < 1e-9);
}

#[test]
fn monthly_revenue_groups_by_calendar_month_ascending() {
    let monthly = compute_monthly_revenue(&sales_fixture());

    assert_eq!(monthly.len(), 3);
    assert_eq!(monthly[0].month, "Jan 2025");
    assert_eq!(monthly[1].month, "Feb 2025");
    assert_eq!(monthly[1].revenue, 1_700_000.0);
    assert_eq!(monthly[1].count, 2);
    assert_eq!(monthly[2].month, "Mar 2025");
}

#[test]
fn date_and_agency_filters_compose_for_the_dashboard() {
    let sales = sales_fixture();

    let february = filter_by_date_range(
        &sales,
        NaiveDate::from_ymd_opt(2025, 2, 1),
        NaiveDate::from_ymd_opt(2025, 2, 28),
    );
    assert_eq!(february.len(), 2);

    let sandton_only = filter_by_agencies(&february, &["RealNet Sandton".to_string()]);
    assert_eq!(sandton_only.len(), 1);
    assert_eq!(sandton_only[0].id, 3);

    let overview = compute_overview_metrics(&sandton_only, &[]);
    assert_eq!(overview.properties_sold, 1);
    assert_eq!(overview.total_revenue, 600_000.0);
    assert_eq!(overview.leads_per_sale, 0.0);
}

#[test]
fn unique_sale_agencies_are_sorted_and_deduplicated() {
    assert_eq!(
        unique_sale_agencies(&sales_fixture()),
        vec!["Acme Estates".to_string(), "RealNet Sandton".to_string()]
    );
}
