//! Marketing-ROI computations joining leads, sales, and agency ad spend.

pub mod metrics;
pub mod roi;

pub use metrics::SourceMetrics;
pub use roi::{
    compute_agency_roi, compute_overall_roi, unique_agencies, AgencyRoi, ChannelRoi,
    OverallRoiReport,
};
