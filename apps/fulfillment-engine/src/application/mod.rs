//! Application Layer
//!
//! The application layer orchestrates domain logic through use cases.
//! It defines:
//!
//! - **Ports**: Interfaces for the quote provider, ledger, order store and listeners
//! - **Services**: Post-commit side-effect dispatch
//! - **Use Cases**: Settlement, sweeping, placement and cancellation
//! - **DTOs**: Data transfer objects for use case inputs and outputs

pub mod dto;
pub mod ports;
pub mod services;
pub mod use_cases;

pub use dto::*;
pub use ports::*;
pub use services::*;
pub use use_cases::*;
