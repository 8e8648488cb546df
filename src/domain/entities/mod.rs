//! Domain entities - Core business objects

pub mod user;
pub mod message;
pub mod command;
pub mod menu;

pub use user::User;
pub use message::{Message, Content};
pub use command::{Command, CommandHandler, CommandRegistry};
pub use menu::{CommandResponse, InlineKeyboard, MenuButton, MiniAppUrl, ParseMode};
