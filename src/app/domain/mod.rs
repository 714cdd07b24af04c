//! Domain layer - core data structures and types.
//!
//! This module contains the fundamental domain models:
//! - SourceDocument and the RevealCursor into it
//! - Presentation settings
//! - Message types for the input router

pub mod cursor;
pub mod document;
pub mod messages;
pub mod settings;

pub use cursor::RevealCursor;
pub use document::SourceDocument;
pub use messages::Message;
pub use settings::{RevealSettings, Skin};
