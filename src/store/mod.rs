//! Persistence collaborators.
//!
//! Contact persistence goes through [`contacts::ContactStore`] so the import
//! pipeline and the export serializer talk to one explicit boundary instead
//! of scattering queries. Template and campaign queries live in their route
//! handlers.

pub mod contacts;

pub use contacts::{ContactChanges, ContactStore};
