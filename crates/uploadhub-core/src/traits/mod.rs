//! Collaborator traits defined in `uploadhub-core` and implemented by other
//! crates.

pub mod ledger;
pub mod object_store;

pub use ledger::MetadataLedger;
pub use object_store::ObjectStore;
