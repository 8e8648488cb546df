//! Application layer - Command routing
//!
//! This layer contains:
//! - Services: command table and the menu responses
//! - Errors: Domain-specific errors
//! - Messaging: Message parsing and dispatching

pub mod errors;
pub mod services;
pub mod messaging;
