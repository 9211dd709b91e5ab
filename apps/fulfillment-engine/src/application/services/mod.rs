//! Application Services
//!
//! Long-lived helpers shared by the use cases.

mod post_commit;

pub use post_commit::PostCommitDispatcher;
