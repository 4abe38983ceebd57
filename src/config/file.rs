//! `.env` file source.

use std::path::{Path, PathBuf};

use super::source::EnvMap;
use super::ConfigError;

/// A `.env`-style file of `KEY=value` lines.
///
/// Files can be marked as required or optional. Required files that don't exist
/// cause an error; optional files that don't exist are silently skipped.
#[derive(Debug, Clone)]
pub struct EnvFile {
    path: PathBuf,
    required: bool,
}

impl EnvFile {
    pub fn new(path: impl AsRef<Path>, required: bool) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            required,
        }
    }

    /// Reads the file into a map, without touching the process environment.
    ///
    /// Returns an empty map if the file doesn't exist and is optional.
    pub fn read(&self) -> Result<EnvMap, ConfigError> {
        Ok(read_env_file(&self.path, self.required)?.unwrap_or_default())
    }
}

/// Loads and parses an env file.
///
/// Returns `Ok(None)` if the file doesn't exist and `required` is false.
fn read_env_file(path: &Path, required: bool) -> Result<Option<EnvMap>, ConfigError> {
    let iter = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter,
        Err(dotenvy::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            if required {
                return Err(ConfigError::FileNotFound(path.to_path_buf()));
            }
            tracing::debug!(path = %path.display(), "optional env file not found");
            return Ok(None);
        }
        Err(e) => return Err(map_dotenv_error(path, e)),
    };

    let mut vars = EnvMap::new();
    for item in iter {
        let (name, value) = item.map_err(|e| map_dotenv_error(path, e))?;
        vars.insert(name, value);
    }

    tracing::debug!(path = %path.display(), count = vars.len(), "loaded env file");
    Ok(Some(vars))
}

fn map_dotenv_error(path: &Path, err: dotenvy::Error) -> ConfigError {
    match err {
        dotenvy::Error::LineParse(_, position) => ConfigError::ParseError {
            path: path.to_path_buf(),
            position,
        },
        dotenvy::Error::Io(source) => ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        },
        _ => ConfigError::InvalidEnvFile(path.to_path_buf()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::source::EnvSource;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_env_file_loads_valid_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "# comment").unwrap();
        writeln!(file, "SERVER_PORT=9000").unwrap();
        writeln!(file, "DB_HOST=\"db.internal\"").unwrap();

        let vars = EnvFile::new(file.path(), true).read().unwrap();

        assert_eq!(vars.len(), 2);
        assert_eq!(vars.get("SERVER_PORT").unwrap().as_deref(), Some("9000"));
        assert_eq!(vars.get("DB_HOST").unwrap().as_deref(), Some("db.internal"));
    }

    #[test]
    fn test_env_file_required_missing() {
        let result = EnvFile::new("/nonexistent/path/.env", true).read();

        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_env_file_optional_missing() {
        let vars = EnvFile::new("/nonexistent/path/.env", false).read().unwrap();

        assert!(vars.is_empty());
    }

    #[test]
    fn test_env_file_parse_error_hides_line() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "GOOD=1").unwrap();
        writeln!(file, "BAD LINE hunter2").unwrap();

        let err = EnvFile::new(file.path(), true).read().unwrap_err();

        assert!(matches!(err, ConfigError::ParseError { .. }));
        assert!(!err.to_string().contains("hunter2"));
    }
}
