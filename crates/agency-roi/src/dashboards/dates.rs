use super::domain::{LeadRecord, SaleRecord};
use chrono::{DateTime, Datelike, NaiveDate};

/// Parses the verbose lead timestamp, e.g. "18 Sept 2025, 03:24:24".
/// Filtering happens at day granularity, so the time-of-day portion is
/// accepted and ignored. Returns `None` for anything unparseable.
pub fn parse_lead_date(value: &str) -> Option<NaiveDate> {
    let date_part = value.trim().split(',').next()?.trim();
    let mut parts = date_part.split_whitespace();
    let day: u32 = parts.next()?.parse().ok()?;
    let month = month_number(parts.next()?)?;
    let year: i32 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parses the sales export date: RFC-3339 or plain `YYYY-MM-DD`.
pub fn parse_sale_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.date_naive());
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()
}

fn month_number(abbrev: &str) -> Option<u32> {
    // The export mixes three- and four-letter abbreviations ("Sep"/"Sept").
    let month = match abbrev {
        "Jan" => 1,
        "Feb" => 2,
        "Mar" => 3,
        "Apr" => 4,
        "May" => 5,
        "Jun" => 6,
        "Jul" => 7,
        "Aug" => 8,
        "Sep" | "Sept" => 9,
        "Oct" => 10,
        "Nov" => 11,
        "Dec" => 12,
        _ => return None,
    };
    Some(month)
}

/// Seam between the date filter and the heterogeneous row types.
pub trait DatedRecord {
    /// Day the record occurred on, or `None` when its date field does not
    /// parse.
    fn occurred_on(&self) -> Option<NaiveDate>;
}

impl DatedRecord for LeadRecord {
    fn occurred_on(&self) -> Option<NaiveDate> {
        parse_lead_date(&self.occurred_at)
    }
}

impl DatedRecord for SaleRecord {
    fn occurred_on(&self) -> Option<NaiveDate> {
        parse_sale_date(&self.reported_date)
    }
}

/// Restricts `records` to the inclusive `[start, end]` window. A `None`
/// bound is unbounded on that side; with both bounds absent the input comes
/// back unchanged, in order. Records whose date does not parse are excluded
/// rather than treated as an error.
pub fn filter_by_date_range<T>(
    records: &[T],
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Vec<T>
where
    T: DatedRecord + Clone,
{
    if start.is_none() && end.is_none() {
        return records.to_vec();
    }

    records
        .iter()
        .filter(|record| match record.occurred_on() {
            Some(date) => {
                start.map_or(true, |s| date >= s) && end.map_or(true, |e| date <= e)
            }
            None => false,
        })
        .cloned()
        .collect()
}

/// Number of calendar months spanned by the window, counting the start and
/// end months both as whole months, floored at 1. With either bound absent
/// the caller-supplied default applies (see
/// [`ReportingConfig::default_month_span`](crate::config::ReportingConfig)).
pub fn month_span(start: Option<NaiveDate>, end: Option<NaiveDate>, default: u32) -> u32 {
    let (Some(start), Some(end)) = (start, end) else {
        return default;
    };

    let months = (end.year() - start.year()) * 12 + end.month() as i32 - start.month() as i32 + 1;
    months.max(1) as u32
}
