//! Foundation types for the pyscope analysis core.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`TextRange`], [`TextSize`] - Source positions (byte offsets)
//! - [`LineCol`], [`LineIndex`] - Line/column conversion
//! - [`Position`], [`Span`], [`Location`] - Line/column positions for entities
//! - Domain constants (file extensions, recognized names)
//!
//! This module has NO dependencies on other pyscope modules.

pub mod constants;
mod position;
mod span;

pub use position::{Location, Position, Span};
pub use span::{LineCol, LineIndex, TextRange, TextSize};

// Re-export text-size types for convenience
pub use text_size;
