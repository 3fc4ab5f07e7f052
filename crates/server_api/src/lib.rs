use std::{sync::Arc, time::Duration};

use shared::{
    domain::CandidateAddress,
    error::ApiError,
    protocol::LookupQuery,
    validate::{
        check_digits, check_min_length, ValidationError, POSTCODE_MIN_LENGTH,
        QUERY_FIELDS_MANDATORY,
    },
};
use tracing::{debug, error, info};

pub mod provider;

pub use provider::{mock_addresses, AddressProvider, JsonFixtureProvider, MockAddressProvider};

pub const DEFAULT_LOOKUP_LATENCY: Duration = Duration::from_millis(500);

#[derive(Clone)]
pub struct LookupContext {
    pub provider: Arc<dyn AddressProvider>,
    /// Delay applied before a successful answer is returned.
    pub latency: Duration,
}

impl LookupContext {
    pub fn new(provider: Arc<dyn AddressProvider>, latency: Duration) -> Self {
        Self { provider, latency }
    }

    pub fn with_mock_provider() -> Self {
        Self::new(Arc::new(MockAddressProvider), DEFAULT_LOOKUP_LATENCY)
    }
}

/// Resolves the query to candidate addresses.
///
/// Validation runs in a fixed order: presence of both parameters, postcode
/// length, postcode digits, street number digits. The first failure wins.
pub async fn lookup_addresses(
    ctx: &LookupContext,
    query: &LookupQuery,
) -> Result<Vec<CandidateAddress>, ApiError> {
    let (postcode, street_number) = validate_query(query).map_err(|err| {
        debug!(%err, "lookup query rejected");
        ApiError::from(err)
    })?;

    let details = ctx
        .provider
        .find(postcode, street_number)
        .await
        .map_err(internal)?;

    if details.is_empty() {
        info!(postcode, street_number, "no addresses found");
        return Err(ApiError::not_found());
    }

    if !ctx.latency.is_zero() {
        tokio::time::sleep(ctx.latency).await;
    }

    info!(
        postcode,
        street_number,
        count = details.len(),
        "addresses found"
    );
    Ok(details)
}

pub fn validate_query(query: &LookupQuery) -> Result<(&str, &str), ValidationError> {
    let postcode = query.postcode.as_deref().filter(|v| !v.is_empty());
    let street_number = query.streetnumber.as_deref().filter(|v| !v.is_empty());
    let (Some(postcode), Some(street_number)) = (postcode, street_number) else {
        return Err(ValidationError::Mandatory(QUERY_FIELDS_MANDATORY));
    };

    check_min_length(postcode, "Postcode", POSTCODE_MIN_LENGTH)?;
    check_digits(postcode, "Postcode")?;
    check_digits(street_number, "Street Number")?;

    Ok((postcode, street_number))
}

fn internal(err: anyhow::Error) -> ApiError {
    error!(error = %format!("{err:#}"), "address provider failed");
    ApiError::internal()
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
