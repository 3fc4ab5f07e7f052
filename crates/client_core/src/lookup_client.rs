use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use shared::{
    domain::CandidateAddress,
    protocol::{LookupQuery, LookupResponse, LOOKUP_ROUTE},
};
use tracing::{debug, warn};
use url::Url;

use crate::error::LookupError;

#[async_trait]
pub trait AddressLookup: Send + Sync {
    /// Resolves a postcode and house number to candidates in provider order.
    ///
    /// Inputs are expected to be validated by the caller.
    async fn lookup(
        &self,
        postcode: &str,
        house_number: &str,
    ) -> Result<Vec<CandidateAddress>, LookupError>;
}

/// Upper bound on one lookup round trip, so a silent server cannot leave
/// the form loading forever.
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Talks to the lookup endpoint over HTTP.
#[derive(Clone)]
pub struct HttpLookupClient {
    http: Client,
    endpoint: Url,
    timeout: Duration,
}

impl HttpLookupClient {
    pub fn new(server_url: &str) -> anyhow::Result<Self> {
        Self::with_client(Client::new(), server_url)
    }

    pub fn with_client(http: Client, server_url: &str) -> anyhow::Result<Self> {
        let base = Url::parse(server_url)
            .with_context(|| format!("invalid lookup server url '{server_url}'"))?;
        let endpoint = base
            .join(LOOKUP_ROUTE)
            .with_context(|| format!("cannot build lookup endpoint from '{server_url}'"))?;
        Ok(Self {
            http,
            endpoint,
            timeout: DEFAULT_LOOKUP_TIMEOUT,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl AddressLookup for HttpLookupClient {
    async fn lookup(
        &self,
        postcode: &str,
        house_number: &str,
    ) -> Result<Vec<CandidateAddress>, LookupError> {
        let response = self
            .http
            .get(self.endpoint.clone())
            .query(&LookupQuery::new(postcode, house_number))
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|error| {
                warn!(%error, endpoint = %self.endpoint, "address lookup request failed");
                LookupError::Transport
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!(postcode, house_number, "lookup found no addresses");
            return Err(LookupError::NotFound);
        }

        let body: LookupResponse = response.json().await.map_err(|error| {
            warn!(%status, %error, "undecodable lookup response");
            LookupError::Transport
        })?;
        map_response(status, body)
    }
}

fn map_response(
    status: StatusCode,
    body: LookupResponse,
) -> Result<Vec<CandidateAddress>, LookupError> {
    match (status, body) {
        (status, LookupResponse::Ok { details }) if status.is_success() => {
            if details.is_empty() {
                Err(LookupError::NotFound)
            } else {
                Ok(details)
            }
        }
        (status, LookupResponse::Error { errormessage }) if status == StatusCode::BAD_REQUEST => {
            Err(LookupError::InvalidInput(errormessage))
        }
        (status, _) => {
            warn!(%status, "unexpected lookup response");
            Err(LookupError::Transport)
        }
    }
}

#[cfg(test)]
#[path = "tests/lookup_client_tests.rs"]
mod tests;
