//! Application services - Command table and menu responses

pub mod command_service;
pub mod menu_service;

pub use command_service::CommandService;
pub use menu_service::{game_keyboard, MenuService};
