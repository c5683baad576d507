//! Back-office state controllers.
//!
//! Each controller holds the collection it manages plus loading/error flags,
//! drives the repositories in `storefront_db`, and only changes its held
//! items after the store confirms a write.

pub mod custom_solutions;
pub mod outcome;
pub mod state;
pub mod templates;

pub use custom_solutions::CustomSolutionsController;
pub use outcome::{BulkDeleteReport, ErrorKind, MutationOutcome};
pub use state::SyncState;
pub use templates::TemplatesController;
