pub mod errors;
pub mod id;
pub mod types;

pub use errors::{ChatError, ConfigError};
pub use id::{new_id, provisional_id, ChatId};
pub use types::{ChatSession, Message, Role, ToolMode};

pub type Result<T> = std::result::Result<T, ChatError>;
