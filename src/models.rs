use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DonorRecord {
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub blood_type: Option<String>,
    #[serde(default)]
    pub last_donation: Option<String>,
    #[serde(default)]
    pub total_donations: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BloodRequest {
    pub requester: String,
    #[serde(default)]
    pub blood_type: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub hospital: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppData {
    #[serde(default)]
    pub donors: Vec<DonorRecord>,
    #[serde(default)]
    pub requests: Vec<BloodRequest>,
}

impl AppData {
    /// Projects every stored record onto the event shape the pipeline reads.
    pub fn events(&self) -> Vec<Event> {
        self.donors
            .iter()
            .map(DonorRecord::to_event)
            .chain(self.requests.iter().map(BloodRequest::to_event))
            .collect()
    }
}

impl DonorRecord {
    pub fn to_event(&self) -> Event {
        Event {
            kind: EventKind::Donation,
            category: self.blood_type.clone(),
            timestamp: self.last_donation.as_deref().and_then(parse_timestamp),
            amount: self.total_donations,
        }
    }
}

impl BloodRequest {
    pub fn to_event(&self) -> Event {
        Event {
            kind: EventKind::Request,
            category: self.blood_type.clone(),
            timestamp: self.created_at.as_deref().and_then(parse_timestamp),
            amount: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Donation,
    Request,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub kind: EventKind,
    pub category: Option<String>,
    pub timestamp: Option<NaiveDate>,
    pub amount: u64,
}

/// Accepts RFC 3339 date-times or plain `YYYY-MM-DD` dates.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(value) = DateTime::parse_from_rfc3339(raw) {
        return Some(value.date_naive());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

#[derive(Debug, Deserialize)]
pub struct DonationPayload {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub blood_type: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RequestPayload {
    pub requester: String,
    #[serde(default)]
    pub blood_type: Option<String>,
    #[serde(default)]
    pub hospital: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ForecastQuery {
    pub months: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct OtpPayload {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct OtpVerifyPayload {
    pub email: String,
    pub code: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OtpVerifyResponse {
    pub verified: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryTotals {
    pub category: String,
    pub needed: u64,
    pub donated: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AggregateStats {
    pub per_category: Vec<CategoryTotals>,
    pub most_needed: Option<String>,
    pub most_donated: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySeries {
    pub category: String,
    pub history: Vec<u64>,
    pub predicted: Vec<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PredictiveSeries {
    pub months: Vec<String>,
    pub forecast_months: Vec<String>,
    pub supply: Vec<CategorySeries>,
    pub demand: Vec<CategorySeries>,
}
