//! Controllers layer - orchestration and coordination.
//!
//! This module contains controllers that coordinate between
//! domain models and services:
//! - The reveal engine and its highlight cache
//! - Autoplay scheduling
//! - Key routing

pub mod autoplay;
pub mod cache;
pub mod reveal;
pub mod router;
