//! # Error Types
//!
//! Domain-specific error types for gemstock-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  gemstock-core errors (this file)                                      │
//! │  ├── CoreError        - Product lifecycle failures                     │
//! │  ├── ValidationError  - Input validation failures                      │
//! │  └── ImportError      - Bulk import file rejected                      │
//! │                                                                         │
//! │  gemstock-db errors (separate crate)                                   │
//! │  └── DbError          - Local Store failures                           │
//! │                                                                         │
//! │  gemstock-sync errors (separate crate)                                 │
//! │  └── SyncError        - Push / pull failures (never fatal)             │
//! │                                                                         │
//! │  App errors                                                            │
//! │  └── AppError         - What the UI sees (code + message)              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::types::ProductStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Product lifecycle errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No product with this id in the collection.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// The requested status change does not apply to the product's state.
    ///
    /// ## When This Occurs
    /// - Selling an item that is already sold
    /// - Reverting a sale on an in-stock item
    /// - Returning an item that was never sold, or returning it twice
    #[error("Cannot {action} product {id}: it is {status}")]
    InvalidTransition {
        id: String,
        action: &'static str,
        status: ProductStatus,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Bulk import rejected (wraps ImportError).
    #[error("Import failed: {0}")]
    Import(#[from] ImportError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before a draft is turned into a stored record.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Two dates are in the wrong order.
    #[error("{field} cannot be earlier than {other}")]
    DateOrder { field: String, other: String },
}

// =============================================================================
// Import Error
// =============================================================================

/// Reasons a bulk import file is refused.
#[derive(Debug, Error)]
pub enum ImportError {
    /// Not valid JSON, or an element is not a product record.
    #[error("file is not a valid product export: {0}")]
    Malformed(String),

    /// Valid JSON, but the top-level value is not an array.
    #[error("file must contain a JSON array of products")]
    NotAnArray,

    /// An empty array: importing it could only erase data.
    #[error("file contains no products")]
    Empty,
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
