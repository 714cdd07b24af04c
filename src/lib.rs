//! Progressive "typing" reveal of source files for live presentations.
//!
//! A [`RevealEngine`] walks a cursor through a document one character at a
//! time and renders the revealed prefix through a tiered syntax highlighter,
//! memoizing each prefix until the document changes. [`Presenter`] adds the
//! page-level pieces: history, settings, edit mode and remote code execution.

pub mod app;

pub use app::*;
