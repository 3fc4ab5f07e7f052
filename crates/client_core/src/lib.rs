//! Client side of the address book: the lookup client, the two form
//! controllers, the address book store and the session tying them together.

pub mod address_book;
pub mod error;
pub mod lookup_client;
pub mod lookup_form;
pub mod person_form;
pub mod session;

pub use address_book::AddressBook;
pub use error::{BookError, LookupError, SelectionError, SessionError};
pub use lookup_client::{AddressLookup, HttpLookupClient};
pub use lookup_form::{
    LookupFields, LookupForm, LookupOutcome, LookupStatus, LookupTicket, PersonFields,
    RequestToken,
};
pub use person_form::commit;
pub use session::AddressBookSession;
