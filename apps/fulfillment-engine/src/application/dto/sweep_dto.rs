//! Sweep report DTOs

use serde::{Deserialize, Serialize};

use crate::error::ErrorCode;

/// An order whose processing failed during a sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepFailure {
    /// Order ID.
    pub order_id: String,
    /// Error code.
    pub code: ErrorCode,
    /// Error message.
    pub message: String,
}

/// Summary of one sweep pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepReport {
    /// Open orders found at the start of the pass.
    pub total: usize,
    /// Orders fulfilled.
    pub fulfilled: usize,
    /// Orders cancelled for shortfall.
    pub cancelled: usize,
    /// Orders whose price condition was not met.
    pub still_open: usize,
    /// Orders settled by someone else between listing and processing.
    pub skipped: usize,
    /// Orders whose processing failed.
    pub failures: Vec<SweepFailure>,
}

impl SweepReport {
    /// Number of failed orders.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Check if every order was processed without error.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Failures that the next sweep may resolve.
    #[must_use]
    pub fn retryable_failures(&self) -> usize {
        self.failures.iter().filter(|f| f.code.is_retryable()).count()
    }
}
