use chrono::{DateTime, Utc};
use shared::domain::{BookEntry, CandidateAddress};

use crate::{error::SelectionError, lookup_form::PersonFields};

/// Builds the book entry for the selected candidate.
///
/// A selection that names an id missing from a non-empty candidate list is
/// reported as `SelectionNotFound` before the name fields are looked at.
pub fn commit(
    person: &PersonFields,
    selected_id: Option<&str>,
    candidates: &[CandidateAddress],
    added_at: DateTime<Utc>,
) -> Result<BookEntry, SelectionError> {
    let selected_id = selected_id.filter(|id| !id.is_empty());
    let found = selected_id.and_then(|id| candidates.iter().find(|c| c.id == id));

    if selected_id.is_some() && !candidates.is_empty() && found.is_none() {
        return Err(SelectionError::SelectionNotFound);
    }
    if person.first_name.is_empty() || person.last_name.is_empty() {
        return Err(SelectionError::MissingPersonInfo);
    }
    let Some(address) = found else {
        return Err(SelectionError::NoSelection);
    };

    Ok(BookEntry {
        address: address.clone(),
        first_name: person.first_name.clone(),
        last_name: person.last_name.clone(),
        added_at,
    })
}

#[cfg(test)]
#[path = "tests/person_form_tests.rs"]
mod tests;
