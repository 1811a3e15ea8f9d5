//! Type tree to JSON Schema transformation
//!
//! This module converts inferred type trees into JSON-Schema-style
//! values with format detection for literal strings.

pub mod transform;

pub use transform::{detect_format, transform};
