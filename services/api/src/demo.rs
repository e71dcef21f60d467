use crate::infra::parse_date;
use agency_roi::config::AppConfig;
use agency_roi::dashboards::domain::{
    AgencySpend, LeadCategory, LeadRecord, SaleRecord, AGENT_RESPONDED, CHANNEL_PRIVATE_PROPERTY,
    CHANNEL_PROPERTY24,
};
use agency_roi::dashboards::ingest::{
    read_agency_spend_from_path, read_leads_from_path, read_sales_from_path,
};
use agency_roi::dashboards::marketing::{compute_agency_roi, compute_overall_roi, AgencyRoi};
use agency_roi::dashboards::sales::{
    compute_lead_source_breakdown, compute_monthly_revenue, compute_overview_metrics,
    filter_by_agencies,
};
use agency_roi::dashboards::dates::filter_by_date_range;
use agency_roi::error::AppError;
use chrono::NaiveDate;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct RoiReportArgs {
    /// Lead export CSV path
    #[arg(long)]
    pub(crate) leads_csv: PathBuf,
    /// Sales export CSV path
    #[arg(long)]
    pub(crate) sales_csv: PathBuf,
    /// Agency spend CSV path
    #[arg(long)]
    pub(crate) spend_csv: PathBuf,
    /// Restrict to one agency (raw name; omit or pass "all" for everything)
    #[arg(long)]
    pub(crate) agency: Option<String>,
    /// Window start (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) start_date: Option<NaiveDate>,
    /// Window end (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) end_date: Option<NaiveDate>,
    /// Include the per-agency breakdown in the output
    #[arg(long)]
    pub(crate) per_agency: bool,
}

#[derive(Args, Debug)]
pub(crate) struct SalesReportArgs {
    /// Sales export CSV path
    #[arg(long)]
    pub(crate) sales_csv: PathBuf,
    /// Lead export CSV path
    #[arg(long)]
    pub(crate) leads_csv: PathBuf,
    /// Restrict to these agencies (repeatable; raw account names)
    #[arg(long = "agency")]
    pub(crate) agencies: Vec<String>,
    /// Window start (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) start_date: Option<NaiveDate>,
    /// Window end (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) end_date: Option<NaiveDate>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Window start (YYYY-MM-DD); defaults to the sample dataset's span
    #[arg(long, value_parser = parse_date)]
    pub(crate) start_date: Option<NaiveDate>,
    /// Window end (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) end_date: Option<NaiveDate>,
}

pub(crate) fn run_roi_report(args: RoiReportArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;

    let leads = read_leads_from_path(&args.leads_csv)?;
    let sales = read_sales_from_path(&args.sales_csv)?;
    let spends = read_agency_spend_from_path(&args.spend_csv)?;

    let overall = compute_overall_roi(
        &leads,
        &sales,
        &spends,
        args.agency.as_deref(),
        args.start_date,
        args.end_date,
        &config.reporting,
    );

    if args.per_agency {
        #[derive(Serialize)]
        struct FullRoiReport<'a> {
            overall: &'a agency_roi::dashboards::marketing::OverallRoiReport,
            per_agency: Vec<AgencyRoi>,
        }

        let per_agency = compute_agency_roi(
            &leads,
            &sales,
            &spends,
            args.start_date,
            args.end_date,
            &config.reporting,
        );
        print_json(&FullRoiReport {
            overall: &overall,
            per_agency,
        })
    } else {
        print_json(&overall)
    }
}

pub(crate) fn run_sales_report(args: SalesReportArgs) -> Result<(), AppError> {
    let sales = read_sales_from_path(&args.sales_csv)?;
    let leads = read_leads_from_path(&args.leads_csv)?;

    let sales = filter_by_date_range(&sales, args.start_date, args.end_date);
    let sales = filter_by_agencies(&sales, &args.agencies);

    #[derive(Serialize)]
    struct SalesReport {
        overview: agency_roi::dashboards::sales::OverviewMetrics,
        lead_sources: Vec<agency_roi::dashboards::sales::LeadSourceBreakdown>,
        monthly_revenue: Vec<agency_roi::dashboards::sales::MonthlyRevenue>,
    }

    print_json(&SalesReport {
        overview: compute_overview_metrics(&sales, &leads),
        lead_sources: compute_lead_source_breakdown(&sales),
        monthly_revenue: compute_monthly_revenue(&sales),
    })
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let (leads, sales, spends) = sample_dataset();

    println!("Agency ROI dashboard demo");
    println!(
        "- {} leads, {} sales, {} spend rows in the sample dataset",
        leads.len(),
        sales.len(),
        spends.len()
    );

    let overall = compute_overall_roi(
        &leads,
        &sales,
        &spends,
        None,
        args.start_date,
        args.end_date,
        &config.reporting,
    );
    println!("\nMarketing ROI ({} month window)", overall.months);
    for channel in &overall.channels {
        println!(
            "  - {}: {} leads | {:.0}% responded | R{:.0} spend | R{:.2} per lead | R{:.0} wasted",
            channel.channel,
            channel.metrics.total_leads,
            channel.metrics.response_rate,
            channel.metrics.total_spend,
            channel.metrics.cost_per_lead,
            channel.metrics.wasted_spend
        );
    }
    println!(
        "  = combined: {} leads | {:.0}% responded | R{:.0} spend | R{:.0} wasted",
        overall.combined.total_leads,
        overall.combined.response_rate,
        overall.combined.total_spend,
        overall.combined.wasted_spend
    );

    let per_agency = compute_agency_roi(
        &leads,
        &sales,
        &spends,
        args.start_date,
        args.end_date,
        &config.reporting,
    );
    println!("\nPer-agency ROI");
    for agency in &per_agency {
        println!(
            "  - {}: {} leads | {} sales | R{:.0} spend | R{:.0} wasted",
            agency.account_name,
            agency.combined.total_leads,
            agency.combined.total_sales,
            agency.combined.total_spend,
            agency.combined.wasted_spend
        );
    }

    let overview = compute_overview_metrics(&sales, &leads);
    println!("\nSales overview");
    println!(
        "  - {} leads | {:.0}% response rate | {} properties sold",
        overview.total_leads, overview.response_rate, overview.properties_sold
    );
    println!(
        "  - R{:.0} revenue | R{:.0} commission | {:.1} leads per linked sale",
        overview.total_revenue, overview.total_commission, overview.leads_per_sale
    );

    println!("\nMonthly revenue");
    for month in compute_monthly_revenue(&sales) {
        println!(
            "  - {}: R{:.0} across {} sales",
            month.month, month.revenue, month.count
        );
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn sample_dataset() -> (Vec<LeadRecord>, Vec<SaleRecord>, Vec<AgencySpend>) {
    let lead = |occurred_at: &str, franchise: &str, source: &str, status: &str| LeadRecord {
        occurred_at: occurred_at.to_string(),
        franchise: franchise.to_string(),
        source: source.to_string(),
        status: status.to_string(),
        lead_type: LeadCategory::Sales,
    };

    let sale = |id: i64,
                lead_source: Option<&str>,
                reported_date: &str,
                account_name: &str,
                purchase_amount: f64,
                linked: u32| SaleRecord {
        id,
        lead_source: lead_source.map(str::to_string),
        reported_date: reported_date.to_string(),
        account_name: account_name.to_string(),
        purchase_amount,
        commission_amount: purchase_amount * 0.05,
        sales_leads_count: linked,
    };

    let leads = vec![
        lead("6 Jan 2025, 08:15:00", "RealNet - Sandton", CHANNEL_PROPERTY24, AGENT_RESPONDED),
        lead("9 Jan 2025, 12:40:00", "RealNet - Sandton", CHANNEL_PROPERTY24, "New"),
        lead("21 Jan 2025, 16:05:00", "RealNet - Rosebank", CHANNEL_PRIVATE_PROPERTY, AGENT_RESPONDED),
        lead("3 Feb 2025, 09:30:00", "RealNet - Rosebank", CHANNEL_PROPERTY24, AGENT_RESPONDED),
        lead("14 Feb 2025, 11:55:00", "RealNet - Sandton", CHANNEL_PRIVATE_PROPERTY, "New"),
        lead("2 Mar 2025, 10:20:00", "RealNet - Rosebank", CHANNEL_PRIVATE_PROPERTY, AGENT_RESPONDED),
    ];

    let sales = vec![
        sale(1, Some(CHANNEL_PROPERTY24), "2025-01-28", "RealNet Sandton", 1_450_000.0, 3),
        sale(2, Some(CHANNEL_PRIVATE_PROPERTY), "2025-02-19", "RealNet Rosebank", 2_100_000.0, 5),
        sale(3, None, "2025-03-07", "RealNet Sandton", 980_000.0, 0),
    ];

    let spends = vec![
        AgencySpend {
            account_name: "RealNet Sandton (Pty)".to_string(),
            p24_monthly_spend: 1_200.0,
            pp_monthly_spend: 600.0,
        },
        AgencySpend {
            account_name: "RealNet Rosebank".to_string(),
            p24_monthly_spend: 900.0,
            pp_monthly_spend: 750.0,
        },
    ];

    (leads, sales, spends)
}
