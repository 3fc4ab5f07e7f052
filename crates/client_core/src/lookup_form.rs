//! The "find an address" form as an explicit state machine.
//!
//! `Idle -> Loading -> Idle`, with the outcome of the last lookup kept in
//! `addresses` (success) or `error` (failure). A lookup is split into
//! [`LookupForm::begin_lookup`] and [`LookupForm::finish_lookup`] so callers
//! that drive the request themselves can do so; the request token handed
//! out by `begin_lookup` lets `finish_lookup` drop answers that are no
//! longer wanted.

use shared::{
    domain::CandidateAddress,
    validate::{validate, ValidationError, LOOKUP_FIELDS_MANDATORY, POSTCODE_MIN_LENGTH},
};
use tracing::debug;

use crate::{error::LookupError, lookup_client::AddressLookup};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupFields {
    pub post_code: String,
    pub house_number: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonFields {
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestToken(u64);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LookupStatus {
    #[default]
    Idle,
    Loading {
        request: RequestToken,
    },
}

/// An issued lookup request. Carries the inputs as they were when the
/// request started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTicket {
    pub token: RequestToken,
    pub postcode: String,
    pub house_number: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupOutcome {
    /// Candidates were stored.
    Found(usize),
    /// The lookup client failed; the message is in `error`.
    Failed,
    /// Field validation failed; no request was issued.
    Invalid,
    /// A lookup was already in flight; the submit was dropped.
    Busy,
    /// The answer belonged to a request that is no longer current.
    Stale,
}

#[derive(Debug, Default)]
pub struct LookupForm {
    pub lookup_fields: LookupFields,
    pub person: PersonFields,
    selected_address: Option<String>,
    error: Option<String>,
    addresses: Vec<CandidateAddress>,
    status: LookupStatus,
    last_request: u64,
}

impl LookupForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> LookupStatus {
        self.status
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.status, LookupStatus::Loading { .. })
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn addresses(&self) -> &[CandidateAddress] {
        &self.addresses
    }

    pub fn selected_address(&self) -> Option<&str> {
        self.selected_address.as_deref()
    }

    pub fn selected_candidate(&self) -> Option<&CandidateAddress> {
        let selected = self.selected_address.as_deref()?;
        self.addresses.iter().find(|a| a.id == selected)
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Marks a candidate as chosen. Whether it exists is checked on commit.
    pub fn select_candidate(&mut self, id: impl Into<String>) {
        let id = id.into();
        self.selected_address = (!id.is_empty()).then_some(id);
    }

    pub fn begin_lookup(&mut self) -> Result<LookupTicket, LookupOutcome> {
        if self.is_loading() {
            debug!("lookup already in flight; dropping submit");
            return Err(LookupOutcome::Busy);
        }

        self.error = None;
        self.addresses.clear();
        self.selected_address = None;

        if let Err(err) = self.validate_fields() {
            self.error = Some(err.to_string());
            return Err(LookupOutcome::Invalid);
        }

        self.last_request += 1;
        let token = RequestToken(self.last_request);
        self.status = LookupStatus::Loading { request: token };
        Ok(LookupTicket {
            token,
            postcode: self.lookup_fields.post_code.clone(),
            house_number: self.lookup_fields.house_number.clone(),
        })
    }

    pub fn finish_lookup(
        &mut self,
        ticket: &LookupTicket,
        result: Result<Vec<CandidateAddress>, LookupError>,
    ) -> LookupOutcome {
        if self.status != (LookupStatus::Loading { request: ticket.token }) {
            debug!(request = ticket.token.0, "ignoring stale lookup response");
            return LookupOutcome::Stale;
        }
        self.status = LookupStatus::Idle;

        match result {
            Ok(addresses) => {
                let count = addresses.len();
                self.addresses = addresses;
                self.selected_address = None;
                LookupOutcome::Found(count)
            }
            Err(err) => {
                self.addresses.clear();
                self.error = Some(err.to_string());
                LookupOutcome::Failed
            }
        }
    }

    pub async fn submit_lookup<L>(&mut self, client: &L) -> LookupOutcome
    where
        L: AddressLookup + ?Sized,
    {
        let ticket = match self.begin_lookup() {
            Ok(ticket) => ticket,
            Err(outcome) => return outcome,
        };
        let result = client.lookup(&ticket.postcode, &ticket.house_number).await;
        self.finish_lookup(&ticket, result)
    }

    /// Clears every field, the candidates and the error. A lookup still in
    /// flight becomes stale.
    pub fn reset(&mut self) {
        self.lookup_fields = LookupFields::default();
        self.person = PersonFields::default();
        self.selected_address = None;
        self.error = None;
        self.addresses.clear();
        self.status = LookupStatus::Idle;
    }

    fn validate_fields(&self) -> Result<(), ValidationError> {
        let LookupFields {
            post_code,
            house_number,
        } = &self.lookup_fields;
        if post_code.is_empty() || house_number.is_empty() {
            return Err(ValidationError::Mandatory(LOOKUP_FIELDS_MANDATORY));
        }
        validate(post_code, "Postcode", Some(POSTCODE_MIN_LENGTH))?;
        validate(house_number, "House number", None)
    }
}

#[cfg(test)]
#[path = "tests/lookup_form_tests.rs"]
mod tests;
