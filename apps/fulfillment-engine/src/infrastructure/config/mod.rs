//! Infrastructure Configuration
//!
//! Dependency injection container wiring the adapters to the use cases.

mod container;

pub use container::{Container, InMemoryContainer, InMemoryListeners};
