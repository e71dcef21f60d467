use serde::{Deserialize, Serialize};

/// Lead status literal that counts as a successful agent response.
pub const AGENT_RESPONDED: &str = "Agent Responded";

/// Marketing channel labels as they appear in the lead and sales exports.
pub const CHANNEL_PROPERTY24: &str = "Property24";
pub const CHANNEL_PRIVATE_PROPERTY: &str = "Private Property";

/// Channels the current dashboard reports on. The metrics engine itself is
/// channel-agnostic; this list is a product decision of the dashboard.
pub const DASHBOARD_CHANNELS: [&str; 2] = [CHANNEL_PROPERTY24, CHANNEL_PRIVATE_PROPERTY];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeadCategory {
    Sales,
    Rental,
}

impl LeadCategory {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Sales => "Sales",
            Self::Rental => "Rental",
        }
    }
}

/// One inbound lead event from the lead-forwarding export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadRecord {
    /// Verbose timestamp, e.g. "18 Sept 2025, 03:24:24".
    pub occurred_at: String,
    /// Raw agency name as forwarded, e.g. "RealNet - Sandton".
    pub franchise: String,
    /// Marketing channel that produced the lead.
    pub source: String,
    pub status: String,
    pub lead_type: LeadCategory,
}

impl LeadRecord {
    pub fn responded(&self) -> bool {
        self.status == AGENT_RESPONDED
    }
}

/// One reported sale from the sales export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub id: i64,
    /// Channel attribution; absent when the sale could not be linked back
    /// to a marketing source.
    pub lead_source: Option<String>,
    /// ISO-8601 date string.
    pub reported_date: String,
    pub account_name: String,
    pub purchase_amount: f64,
    pub commission_amount: f64,
    /// Number of leads linked to this sale.
    pub sales_leads_count: u32,
}

/// Monthly advertising spend allocation for one agency. One row per agency;
/// `account_name` is the join key (after normalization) against the lead
/// and sales exports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgencySpend {
    pub account_name: String,
    pub p24_monthly_spend: f64,
    pub pp_monthly_spend: f64,
}

impl AgencySpend {
    /// Monthly spend for a dashboard channel label. Unknown labels carry no
    /// budget line and report zero.
    pub fn monthly_spend_for(&self, channel: &str) -> f64 {
        match channel {
            CHANNEL_PROPERTY24 => self.p24_monthly_spend,
            CHANNEL_PRIVATE_PROPERTY => self.pp_monthly_spend,
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn responded_matches_exact_status_literal() {
        let mut lead = LeadRecord {
            occurred_at: "18 Sept 2025, 03:24:24".to_string(),
            franchise: "RealNet - Sandton".to_string(),
            source: CHANNEL_PROPERTY24.to_string(),
            status: AGENT_RESPONDED.to_string(),
            lead_type: LeadCategory::Sales,
        };
        assert!(lead.responded());

        lead.status = "agent responded".to_string();
        assert!(!lead.responded());
    }

    #[test]
    fn spend_lookup_by_channel_label() {
        let spend = AgencySpend {
            account_name: "RealNet Sandton".to_string(),
            p24_monthly_spend: 1500.0,
            pp_monthly_spend: 800.0,
        };
        assert_eq!(spend.monthly_spend_for(CHANNEL_PROPERTY24), 1500.0);
        assert_eq!(spend.monthly_spend_for(CHANNEL_PRIVATE_PROPERTY), 800.0);
        assert_eq!(spend.monthly_spend_for("Website"), 0.0);
    }
}
