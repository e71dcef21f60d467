use crate::infra::{deserialize_optional_date, AppState};
use agency_roi::config::ReportingConfig;
use agency_roi::dashboards::dates::filter_by_date_range;
use agency_roi::dashboards::ingest::{read_agency_spend, read_leads, read_sales};
use agency_roi::dashboards::marketing::{
    compute_agency_roi, compute_overall_roi, unique_agencies, AgencyRoi, ChannelRoi, SourceMetrics,
};
use agency_roi::dashboards::sales::{
    compute_lead_source_breakdown, compute_monthly_revenue, compute_overview_metrics,
    filter_by_agencies, LeadSourceBreakdown, MonthlyRevenue, OverviewMetrics,
};
use agency_roi::error::AppError;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;

#[derive(Debug, Deserialize)]
pub(crate) struct RoiRequest {
    pub(crate) leads_csv: String,
    pub(crate) sales_csv: String,
    pub(crate) spend_csv: String,
    /// Raw agency name, or the "all" sentinel for no restriction.
    #[serde(default)]
    pub(crate) agency: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) end_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RoiOverviewResponse {
    pub(crate) start_date: Option<NaiveDate>,
    pub(crate) end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) agency: Option<String>,
    pub(crate) months: u32,
    pub(crate) channels: Vec<ChannelRoi>,
    pub(crate) combined: SourceMetrics,
}

#[derive(Debug, Serialize)]
pub(crate) struct AgencyRoiResponse {
    pub(crate) start_date: Option<NaiveDate>,
    pub(crate) end_date: Option<NaiveDate>,
    pub(crate) agencies: Vec<String>,
    pub(crate) results: Vec<AgencyRoi>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SalesOverviewRequest {
    pub(crate) sales_csv: String,
    pub(crate) leads_csv: String,
    /// Raw account names; empty means no restriction.
    #[serde(default)]
    pub(crate) agencies: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) end_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SalesOverviewResponse {
    pub(crate) overview: OverviewMetrics,
    pub(crate) lead_sources: Vec<LeadSourceBreakdown>,
    pub(crate) monthly_revenue: Vec<MonthlyRevenue>,
}

pub(crate) fn dashboard_router() -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/roi/overview", post(roi_overview_endpoint))
        .route("/api/v1/roi/agencies", post(roi_agencies_endpoint))
        .route("/api/v1/sales/overview", post(sales_overview_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn roi_overview_endpoint(
    Extension(reporting): Extension<ReportingConfig>,
    Json(payload): Json<RoiRequest>,
) -> Result<Json<RoiOverviewResponse>, AppError> {
    let RoiRequest {
        leads_csv,
        sales_csv,
        spend_csv,
        agency,
        start_date,
        end_date,
    } = payload;

    let leads = read_leads(Cursor::new(leads_csv.into_bytes()))?;
    let sales = read_sales(Cursor::new(sales_csv.into_bytes()))?;
    let spends = read_agency_spend(Cursor::new(spend_csv.into_bytes()))?;

    let report = compute_overall_roi(
        &leads,
        &sales,
        &spends,
        agency.as_deref(),
        start_date,
        end_date,
        &reporting,
    );

    Ok(Json(RoiOverviewResponse {
        start_date,
        end_date,
        agency,
        months: report.months,
        channels: report.channels,
        combined: report.combined,
    }))
}

pub(crate) async fn roi_agencies_endpoint(
    Extension(reporting): Extension<ReportingConfig>,
    Json(payload): Json<RoiRequest>,
) -> Result<Json<AgencyRoiResponse>, AppError> {
    let RoiRequest {
        leads_csv,
        sales_csv,
        spend_csv,
        agency: _,
        start_date,
        end_date,
    } = payload;

    let leads = read_leads(Cursor::new(leads_csv.into_bytes()))?;
    let sales = read_sales(Cursor::new(sales_csv.into_bytes()))?;
    let spends = read_agency_spend(Cursor::new(spend_csv.into_bytes()))?;

    let results = compute_agency_roi(&leads, &sales, &spends, start_date, end_date, &reporting);

    Ok(Json(AgencyRoiResponse {
        start_date,
        end_date,
        agencies: unique_agencies(&spends),
        results,
    }))
}

pub(crate) async fn sales_overview_endpoint(
    Json(payload): Json<SalesOverviewRequest>,
) -> Result<Json<SalesOverviewResponse>, AppError> {
    let SalesOverviewRequest {
        sales_csv,
        leads_csv,
        agencies,
        start_date,
        end_date,
    } = payload;

    let sales = read_sales(Cursor::new(sales_csv.into_bytes()))?;
    let leads = read_leads(Cursor::new(leads_csv.into_bytes()))?;

    let sales = filter_by_date_range(&sales, start_date, end_date);
    let sales = filter_by_agencies(&sales, &agencies);

    Ok(Json(SalesOverviewResponse {
        overview: compute_overview_metrics(&sales, &leads),
        lead_sources: compute_lead_source_breakdown(&sales),
        monthly_revenue: compute_monthly_revenue(&sales),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEADS_CSV: &str = "Date (SAST),Franchise,Source,Status,lead_type\n\
\"10 Jan 2025, 09:00:00\",RealNet - Sandton,Property24,Agent Responded,Sales\n\
\"12 Jan 2025, 09:00:00\",RealNet - Sandton,Property24,New,Sales\n";

    const SALES_CSV: &str = "id,lead_source,reported_date,account_name,purchase_amount,commission_amount,sales_leads_count\n\
1,Property24,2025-01-15,RealNet Sandton,100000,5000,2\n";

    const SPEND_CSV: &str = "account_name,p24_monthly_spend,pp_monthly_spend\n\
RealNet Sandton (Pty),1000,0\n";

    fn roi_request(agency: Option<&str>) -> RoiRequest {
        RoiRequest {
            leads_csv: LEADS_CSV.to_string(),
            sales_csv: SALES_CSV.to_string(),
            spend_csv: SPEND_CSV.to_string(),
            agency: agency.map(str::to_string),
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1),
            end_date: NaiveDate::from_ymd_opt(2025, 1, 31),
        }
    }

    #[tokio::test]
    async fn roi_overview_endpoint_computes_single_month_window() {
        let Json(body) = roi_overview_endpoint(
            Extension(ReportingConfig::default()),
            Json(roi_request(None)),
        )
        .await
        .expect("overview computes");

        assert_eq!(body.months, 1);
        assert_eq!(body.combined.total_leads, 2);
        assert_eq!(body.combined.total_spend, 1_000.0);
        assert_eq!(body.combined.cost_per_lead, 500.0);
        assert_eq!(body.combined.response_rate, 50.0);
    }

    #[tokio::test]
    async fn roi_overview_endpoint_rejects_malformed_csv() {
        let mut request = roi_request(None);
        request.sales_csv =
            "id,lead_source,reported_date,account_name,purchase_amount,commission_amount,sales_leads_count\nnope,,,x,,,\n"
                .to_string();

        let error = roi_overview_endpoint(Extension(ReportingConfig::default()), Json(request))
            .await
            .expect_err("bad csv rejected");
        assert!(matches!(error, AppError::Ingest(_)));
    }

    #[tokio::test]
    async fn roi_agencies_endpoint_lists_spend_agencies() {
        let Json(body) = roi_agencies_endpoint(
            Extension(ReportingConfig::default()),
            Json(roi_request(None)),
        )
        .await
        .expect("agency roi computes");

        assert_eq!(body.agencies, vec!["RealNet Sandton (Pty)".to_string()]);
        assert_eq!(body.results.len(), 1);
        assert_eq!(body.results[0].combined.total_leads, 2);
        assert_eq!(body.results[0].combined.total_sales, 1);
    }

    #[tokio::test]
    async fn sales_overview_endpoint_reports_kpis_and_breakdowns() {
        let request = SalesOverviewRequest {
            sales_csv: SALES_CSV.to_string(),
            leads_csv: LEADS_CSV.to_string(),
            agencies: Vec::new(),
            start_date: None,
            end_date: None,
        };

        let Json(body) = sales_overview_endpoint(Json(request))
            .await
            .expect("sales overview computes");

        assert_eq!(body.overview.total_leads, 2);
        assert_eq!(body.overview.properties_sold, 1);
        assert_eq!(body.overview.leads_per_sale, 2.0);
        assert_eq!(body.lead_sources.len(), 1);
        assert_eq!(body.monthly_revenue.len(), 1);
        assert_eq!(body.monthly_revenue[0].month, "Jan 2025");
    }
}
