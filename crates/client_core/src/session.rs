use chrono::Utc;
use shared::domain::BookEntry;
use storage::BookPersistence;
use tracing::info;

use crate::{
    address_book::AddressBook,
    error::{BookError, SessionError},
    lookup_client::AddressLookup,
    lookup_form::{LookupForm, LookupOutcome},
    person_form::commit,
};

/// One user's lookup-and-add workflow over an open address book.
///
/// Every failure is written to the form's `error` as well as returned, and
/// the session is always left idle and usable.
pub struct AddressBookSession<L, P> {
    lookup: L,
    form: LookupForm,
    book: AddressBook<P>,
}

impl<L, P> AddressBookSession<L, P>
where
    L: AddressLookup,
    P: BookPersistence,
{
    pub fn new(lookup: L, book: AddressBook<P>) -> Self {
        Self {
            lookup,
            form: LookupForm::new(),
            book,
        }
    }

    pub fn form(&self) -> &LookupForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut LookupForm {
        &mut self.form
    }

    pub fn book(&self) -> &AddressBook<P> {
        &self.book
    }

    pub async fn submit_lookup(&mut self) -> LookupOutcome {
        self.form.submit_lookup(&self.lookup).await
    }

    pub fn select_candidate(&mut self, id: impl Into<String>) {
        self.form.select_candidate(id);
    }

    /// Commits the selected candidate with the person fields into the book
    /// and resets the form.
    pub async fn add_selected(&mut self) -> Result<BookEntry, SessionError> {
        self.form.clear_error();

        let entry = commit(
            &self.form.person,
            self.form.selected_address(),
            self.form.addresses(),
            Utc::now(),
        )
        .map_err(|err| {
            self.form.set_error(err.to_string());
            err
        })?;

        if let Err(err) = self.book.add(entry.clone()).await {
            self.form.set_error(err.to_string());
            return Err(err.into());
        }

        info!(id = entry.id(), "entry added to address book");
        self.form.reset();
        Ok(entry)
    }

    /// Clears the form only; the book is untouched.
    pub fn clear_form(&mut self) {
        self.form.reset();
    }

    pub async fn remove_entry(&mut self, id: &str) -> Result<bool, BookError> {
        self.book.remove(id).await.map_err(|err| {
            self.form.set_error(err.to_string());
            err
        })
    }

    pub async fn clear_book(&mut self) -> Result<(), BookError> {
        self.book.clear().await.map_err(|err| {
            self.form.set_error(err.to_string());
            err
        })?;
        info!("address book cleared");
        Ok(())
    }

    pub fn entries(&self) -> Vec<BookEntry> {
        self.book.list()
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
