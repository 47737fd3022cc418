//! Service adapters: HTTP, filesystem and async runtime implementations.

pub mod http;
pub mod runtime;
pub mod settings;
pub mod storage;

pub use http::{ApiError, HttpBackend};
pub use runtime::{AppMessage, AsyncRuntime};
pub use settings::{
    ensure_log_dir, ensure_settings_file, get_log_dir, get_settings_path, get_storage_path,
    load_config, load_or_init_config, ConfigError,
};
pub use storage::{FileStorage, MemoryStorage};
