//! Client-side state for the availability form: the store boundary and its
//! bindings, the form controller, the list view model and the shell that
//! owns them.

mod collation;
pub mod error;
pub mod form;
pub mod list_view;
pub mod shell;
pub mod store;

pub use error::{FormError, StoreError};
pub use form::{Field, FormController, FormFields, FormSnapshot};
pub use list_view::{list_entries, sorted_view, DateChip, ListEntry, EMPTY_HINT, EMPTY_TITLE};
pub use shell::{AppShell, FetchTicket, View};
pub use store::{InMemoryStore, LocalStore, RemoteStore, SubmissionStore};

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod store_tests;
