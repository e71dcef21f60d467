//! CSV ingestion for the three dashboard sources. Header names match the
//! upstream exports; values inside a structurally valid row are taken as-is
//! and any cleanup (date parsing, name normalization) happens downstream
//! with lenient-skip semantics.

use super::domain::{AgencySpend, LeadCategory, LeadRecord, SaleRecord};
use serde::{Deserialize, Deserializer};
use std::io::Read;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to read export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid CSV data: {0}")]
    Csv(#[from] csv::Error),
}

pub fn read_leads<R: Read>(reader: R) -> Result<Vec<LeadRecord>, IngestError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for row in csv_reader.deserialize::<LeadRow>() {
        records.push(row?.into_record());
    }

    Ok(records)
}

pub fn read_sales<R: Read>(reader: R) -> Result<Vec<SaleRecord>, IngestError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for row in csv_reader.deserialize::<SaleRow>() {
        records.push(row?.into_record());
    }

    Ok(records)
}

pub fn read_agency_spend<R: Read>(reader: R) -> Result<Vec<AgencySpend>, IngestError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for row in csv_reader.deserialize::<AgencySpendRow>() {
        records.push(row?.into_record());
    }

    Ok(records)
}

pub fn read_leads_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<LeadRecord>, IngestError> {
    read_leads(std::fs::File::open(path)?)
}

pub fn read_sales_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<SaleRecord>, IngestError> {
    read_sales(std::fs::File::open(path)?)
}

pub fn read_agency_spend_from_path<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<AgencySpend>, IngestError> {
    read_agency_spend(std::fs::File::open(path)?)
}

#[derive(Debug, Deserialize)]
struct LeadRow {
    #[serde(rename = "Date (SAST)")]
    occurred_at: String,
    #[serde(rename = "Franchise")]
    franchise: String,
    #[serde(rename = "Source")]
    source: String,
    #[serde(rename = "Status")]
    status: String,
    lead_type: LeadCategory,
}

impl LeadRow {
    fn into_record(self) -> LeadRecord {
        LeadRecord {
            occurred_at: self.occurred_at,
            franchise: self.franchise,
            source: self.source,
            status: self.status,
            lead_type: self.lead_type,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SaleRow {
    id: i64,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    lead_source: Option<String>,
    reported_date: String,
    account_name: String,
    #[serde(default)]
    purchase_amount: f64,
    #[serde(default)]
    commission_amount: f64,
    #[serde(default)]
    sales_leads_count: u32,
}

impl SaleRow {
    fn into_record(self) -> SaleRecord {
        SaleRecord {
            id: self.id,
            lead_source: self.lead_source,
            reported_date: self.reported_date,
            account_name: self.account_name,
            purchase_amount: self.purchase_amount,
            commission_amount: self.commission_amount,
            sales_leads_count: self.sales_leads_count,
        }
    }
}

#[derive(Debug, Deserialize)]
struct AgencySpendRow {
    account_name: String,
    #[serde(default)]
    p24_monthly_spend: f64,
    #[serde(default)]
    pp_monthly_spend: f64,
}

impl AgencySpendRow {
    fn into_record(self) -> AgencySpend {
        AgencySpend {
            account_name: self.account_name,
            p24_monthly_spend: self.p24_monthly_spend,
            pp_monthly_spend: self.pp_monthly_spend,
        }
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
