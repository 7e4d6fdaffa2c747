//! Configuration file loading for interview-funnel
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `FUNNEL_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./funnel.toml` or `./.funnel.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/interview-funnel/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    FileAccountsConfig, FileAnthropicConfig, FileConfig, FileInterviewConfig, FileLoggingConfig,
    FileOpenAiConfig, FileProvidersConfig, FileReportsConfig, FileServerConfig, FileStoreConfig,
    ProviderKind, StoreBackend,
};
pub use loader::{ConfigLoader, ENV_PREFIX};
