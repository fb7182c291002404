//! Configuration schema types for the chat client.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod chat;
mod generation;
mod persistence;
mod system;
mod tools;

pub use chat::*;
pub use generation::*;
pub use persistence::*;
pub use system::*;
pub use tools::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration.
///
/// Only override what you want to change.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OapConfig {
    pub generation: GenerationConfig,
    pub tools: ToolsConfig,
    pub persistence: PersistenceConfig,
    pub chat: ChatConfig,
    pub logging: LoggingConfig,
}
