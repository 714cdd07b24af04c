//! Infrastructure layer - cross-cutting plumbing.
//!
//! - Error types

pub mod error;
