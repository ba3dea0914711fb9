//! Error Types
//!
//! This module defines the error type shared by every part of the flythrough core.
//!
//! # Overview
//!
//! [`FlythroughError`] distinguishes the failure classes the controller treats
//! differently:
//! - Construction failures, recovered locally by the outline fallback
//! - Invalid parameters, rejected at the controller boundary
//! - Resource disposal failures, logged and reported but never blocking
//! - Render failures, counted as dropped frames by the frame driver
//! - Ambient I/O, image decoding and configuration errors
//!
//! # Usage
//!
//! All fallible APIs return [`Result<T>`], an alias for
//! `std::result::Result<T, FlythroughError>`.
//!
//! ```rust,ignore
//! use flythrough::errors::{FlythroughError, Result};
//!
//! fn check_speed(speed: f64) -> Result<()> {
//!     if speed <= 0.0 {
//!         return Err(FlythroughError::invalid("speed", "must be positive"));
//!     }
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// The main error type for the flythrough core.
#[derive(Error, Debug)]
pub enum FlythroughError {
    // ========================================================================
    // Generation & Residency Errors
    // ========================================================================
    /// Building or uploading a geometry/material failed.
    #[error("Asset construction failed: {0}")]
    Construction(String),

    /// Releasing a GPU-resident resource failed.
    #[error("Resource disposal failed: {0}")]
    ResourceDisposal(String),

    /// The backend failed to render a frame.
    #[error("Render failed: {0}")]
    Render(String),

    // ========================================================================
    // Boundary Errors
    // ========================================================================
    /// A parameter passed across the controller boundary is out of domain.
    #[error("Invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Name of the rejected parameter
        name: &'static str,
        /// Why it was rejected
        reason: String,
    },

    // ========================================================================
    // Ambient Errors
    // ========================================================================
    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image decoding error.
    #[error("Texture decode error: {0}")]
    TextureDecode(String),

    /// Settings parsing error.
    #[error("Config parse error: {0}")]
    Config(#[from] serde_json::Error),
}

impl FlythroughError {
    /// Shorthand for [`FlythroughError::InvalidParameter`].
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// Returns `true` for errors the generator recovers from with the outline treatment.
    #[must_use]
    pub fn is_construction(&self) -> bool {
        matches!(self, Self::Construction(_))
    }
}

impl From<image::ImageError> for FlythroughError {
    fn from(err: image::ImageError) -> Self {
        FlythroughError::TextureDecode(err.to_string())
    }
}

/// Alias for `Result<T, FlythroughError>`.
pub type Result<T> = std::result::Result<T, FlythroughError>;
