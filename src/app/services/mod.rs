//! Services layer - business operations and external collaborators.
//!
//! This module contains:
//! - Syntax classification and highlighting
//! - History persistence
//! - File loading
//! - The remote code-execution client

pub mod executor;
pub mod file_loader;
pub mod history;
pub mod syntax;
