use shared::error::NO_RESULTS_MESSAGE;
use thiserror::Error;

/// Failure of a single address lookup. The display text is what the form
/// shows; every variant can be retried by submitting again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("{}", NO_RESULTS_MESSAGE)]
    NotFound,
    #[error("{0}")]
    InvalidInput(String),
    #[error("An error occurred while fetching addresses")]
    Transport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("First name and last name fields mandatory!")]
    MissingPersonInfo,
    #[error("No address selected, try to select an address or find one if you haven't")]
    NoSelection,
    #[error("Selected address not found")]
    SelectionNotFound,
}

#[derive(Debug, Error)]
pub enum BookError {
    #[error("This address is already in your address book!")]
    DuplicateEntry { id: String },
    #[error("Could not load the saved address book")]
    Load(#[source] anyhow::Error),
    #[error("Could not update the saved address book")]
    Persistence(#[source] anyhow::Error),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error(transparent)]
    Book(#[from] BookError),
}
