//! Data Transfer Objects (DTOs)
//!
//! DTOs are used for API boundaries and use case inputs/outputs.

mod order_dto;
mod sweep_dto;

pub use order_dto::{OrderAck, OrderDto, OrderSubmission};
pub use sweep_dto::{SweepFailure, SweepReport};
