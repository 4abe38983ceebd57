//! Bind typed configuration structs from environment variables and `.env`
//! files using per-field declaration tags.
//!
//! ```no_run
//! use std::time::Duration;
//!
//! envtag::env_config! {
//!     #[derive(Debug, Default)]
//!     pub struct AppConfig {
//!         pub server_port: u16 = "SERVER_PORT,8080",
//!         pub db_password: String = "DB_PASSWORD,required",
//!         pub timeout: Duration = "TIMEOUT,30s",
//!     }
//! }
//!
//! let mut config = AppConfig::default();
//! envtag::load(&mut config)?;
//! println!("{}", envtag::sprint(&config));
//! # Ok::<(), envtag::ConfigError>(())
//! ```

pub mod config;
mod macros;

pub use config::{
    find_and_load, load, load_from_env, load_from_file, load_from_files, load_with, must_load,
    source, sprint, Binder, ConfigError, EnvConfig, Field, FieldKind, FieldRef, FieldValue,
    LoadOptions, Loader, Report,
};
