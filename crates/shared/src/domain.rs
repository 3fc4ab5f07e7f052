use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One lookup result, not yet associated with a person.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateAddress {
    pub id: String,
    pub postcode: String,
    pub street: String,
    pub house_number: String,
    pub city: String,
    pub lat: f64,
    pub lon: f64,
}

/// A candidate address combined with the person it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookEntry {
    #[serde(flatten)]
    pub address: CandidateAddress,
    pub first_name: String,
    pub last_name: String,
    pub added_at: DateTime<Utc>,
}

impl BookEntry {
    pub fn id(&self) -> &str {
        &self.address.id
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl CandidateAddress {
    pub fn one_line(&self) -> String {
        format!(
            "{} {}, {} {}",
            self.street, self.house_number, self.postcode, self.city
        )
    }
}
