pub mod commands;
pub mod config;
pub mod data;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod paynow;
pub mod report;
pub mod steam;
pub mod validation;

pub const BOT_NAME: &str = "support_ticket_bot";
pub const COMMAND_TARGET: &str = "support_ticket_bot::command";
pub const ERROR_TARGET: &str = "support_ticket_bot::error";
pub const EVENT_TARGET: &str = "support_ticket_bot::handlers";
pub const CONSOLE_TARGET: &str = "support_ticket_bot";
pub const HTTP_TARGET: &str = "support_ticket_bot::http";

pub use config::{BotConfig, SlugVocabulary};
pub use data::{Data, DataInner};
pub use error::{BotError, BotResult};
pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;
