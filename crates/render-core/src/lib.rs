//! Core rendering abstractions for fixed-layout to PDF conversion.
//!
//! This crate provides the pieces every PDF backend shares:
//! - `PageRenderer` trait: create destination pages, draw page content, finish
//! - `RenderError`, with conversions from font and resource errors
//! - Coordinate helpers for the top-left source origin

mod error;
mod traits;
pub mod utils;

pub use error::RenderError;
pub use traits::{PageHandle, PageRenderer};
