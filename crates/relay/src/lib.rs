pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod relay;
pub mod server;

pub use config::RelayConfig;
pub use error::{ConfigError, RelayError};
pub use relay::{PromptRequest, RelayService, Reply};
