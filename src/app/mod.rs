//! Application layer - organized by Clean Architecture principles.
//!
//! # Structure
//!
//! - `domain/` - Core data structures (SourceDocument, RevealCursor, Settings, Messages)
//! - `controllers/` - Orchestration (RevealEngine, HighlightCache, autoplay, key routing)
//! - `services/` - Business operations (syntax, history, file loading, execution client)
//! - `infrastructure/` - Cross-cutting plumbing (error)
//! - `state.rs` - Presenter tying the engine to history, settings and execution

pub mod controllers;
pub mod domain;
pub mod infrastructure;
pub mod services;
pub mod state;

// Re-exports for convenient external access
pub use controllers::autoplay::{IntervalScheduler, Scheduler, TimerId};
pub use controllers::cache::{CacheKey, CacheStats, HighlightCache};
pub use controllers::reveal::{LoadKind, RevealEngine, RevealEvent, RevealObserver, RevealStatus, TickOutcome};
pub use controllers::router::{Key, KeyInput, route_key};
pub use domain::{Message, RevealCursor, RevealSettings, Skin, SourceDocument};
pub use infrastructure::error::{AppError, Result};
pub use services::executor::{ExecuteError, ExecutionResult, RemoteExecutor};
pub use services::history::{FileHistory, HistoryRecord, HistoryStore};
pub use services::syntax::styled::{RenderTier, StyledText, Token, TokenClass};
pub use services::syntax::{Highlight, HighlightEngine, classify, complete_syntax, language_name};
pub use state::{ExecutionOutcome, Notice, NoticeLevel, PresentationEngine, Presenter};
