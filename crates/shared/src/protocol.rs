use serde::{Deserialize, Serialize};

use crate::{domain::CandidateAddress, error::ApiError};

pub const LOOKUP_ROUTE: &str = "/api/getAddresses";

/// Query string of the lookup endpoint. Both parameters are optional on the
/// wire so that absence can be reported as a structured error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LookupQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postcode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub streetnumber: Option<String>,
}

impl LookupQuery {
    pub fn new(postcode: impl Into<String>, streetnumber: impl Into<String>) -> Self {
        Self {
            postcode: Some(postcode.into()),
            streetnumber: Some(streetnumber.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LookupResponse {
    Ok { details: Vec<CandidateAddress> },
    Error { errormessage: String },
}

impl From<ApiError> for LookupResponse {
    fn from(value: ApiError) -> Self {
        Self::Error {
            errormessage: value.message,
        }
    }
}
