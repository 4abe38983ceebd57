//! Tag-driven configuration binding from the environment and `.env` files.

mod binder;
mod coerce;
mod duration;
mod error;
mod field;
mod file;
mod loader;
mod report;
pub mod source;
mod tag;

pub use binder::Binder;
pub use coerce::{parse_bool, parse_list, CoerceError};
pub use duration::{format_duration, parse_duration, DurationError};
pub use error::ConfigError;
pub use field::{EnvConfig, Field, FieldKind, FieldRef, FieldValue};
pub use file::EnvFile;
pub use loader::{
    find_and_load, load, load_from_env, load_from_file, load_from_files, load_with, must_load,
    search_paths, LoadOptions, Loader, DEFAULT_ENV_FILE, ENV_FILE_VAR,
};
pub use report::{is_sensitive, sprint, Report, ReportEntry, MASK, SENSITIVE_KEYWORDS};
pub use source::{EnvMap, EnvSource, ProcessEnv};
pub use tag::{split_tag, Declaration, DefaultSpec, REQUIRED_MARKER};
