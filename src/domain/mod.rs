//! Domain layer - Core types shared by the router and the adapters
//!
//! This layer contains:
//! - Entities: Messages, commands, menu buttons and prepared responses
//! - Traits: Abstractions for infrastructure (Bot)

pub mod entities;
pub mod traits;
