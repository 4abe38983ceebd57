use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::binder::Binder;
use super::field::EnvConfig;
use super::file::EnvFile;
use super::source::{EnvMap, ProcessEnv};
use super::ConfigError;

/// File loaded on a best-effort basis by [`load`] when no files are given.
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Variable naming an extra env file for [`find_and_load`] to try.
pub const ENV_FILE_VAR: &str = "ENV_FILE";

const SEARCH_PATHS: &[&str] = &[".env", "../.env", "../../.env", "config/.env", "env/.env"];

/// Where file-sourced variables come from.
#[derive(Debug)]
enum FileSource {
    File(EnvFile),
    /// First readable candidate wins; failures are skipped.
    Discover(Vec<PathBuf>),
    Vars(EnvMap),
}

/// Builder for loading a configuration from env files and the environment.
///
/// Variables from files are merged in registration order, later files
/// overriding earlier ones. The process environment, when enabled, wins over
/// every file; tag defaults apply last.
///
/// ## Example
///
/// ```no_run
/// use envtag::{env_config, Loader};
///
/// env_config! {
///     #[derive(Debug, Default)]
///     struct AppConfig {
///         name: String = "APP_NAME,demo",
///         port: u16 = "APP_PORT,8080",
///     }
/// }
///
/// let config: AppConfig = Loader::builder()
///     .with_file("config/default.env", true)
///     .with_file("config/local.env", false)
///     .build()?;
/// # Ok::<(), envtag::ConfigError>(())
/// ```
#[derive(Debug)]
#[must_use = "loaders do nothing until .bind() or .build() is called"]
pub struct Loader {
    sources: Vec<FileSource>,
    use_system: bool,
}

impl Default for Loader {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            use_system: true,
        }
    }
}

impl Loader {
    /// Creates a loader that reads the process environment and no files.
    pub fn builder() -> Self {
        Self::default()
    }

    /// Adds an env file to be loaded.
    ///
    /// If `required` is `true`, loading fails when the file doesn't exist.
    /// Optional files that are missing are silently skipped; any other
    /// problem with them is still an error.
    pub fn with_file(mut self, path: impl AsRef<Path>, required: bool) -> Self {
        self.sources.push(FileSource::File(EnvFile::new(path, required)));
        self
    }

    /// Adds a list of candidate files, of which only the first one that
    /// exists and parses is loaded.
    ///
    /// Nothing here can fail: unreadable candidates are logged and skipped,
    /// and finding none is not an error.
    pub fn with_discovery<P: AsRef<Path>>(mut self, candidates: impl IntoIterator<Item = P>) -> Self {
        let candidates = candidates
            .into_iter()
            .map(|path| path.as_ref().to_path_buf())
            .collect();
        self.sources.push(FileSource::Discover(candidates));
        self
    }

    /// Adds variables directly, as if they came from a file at this position.
    pub fn with_vars<K, V>(mut self, vars: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.sources.push(FileSource::Vars(vars.into_iter().collect()));
        self
    }

    /// Sets whether the process environment is consulted. Defaults to `true`.
    ///
    /// When disabled, only file variables and tag defaults are used.
    pub fn with_system_env(mut self, enabled: bool) -> Self {
        self.use_system = enabled;
        self
    }

    /// Loads all files, then binds `target`.
    pub fn bind<T: EnvConfig + ?Sized>(self, target: &mut T) -> Result<(), ConfigError> {
        let overlay = self.read_sources()?;

        let mut binder = Binder::new();
        if self.use_system {
            binder = binder.with_source(ProcessEnv);
        }
        binder.with_source(overlay).bind(target)
    }

    /// Loads all files and binds a fresh `T::default()`.
    pub fn build<T: EnvConfig + Default>(self) -> Result<T, ConfigError> {
        let mut config = T::default();
        self.bind(&mut config)?;
        Ok(config)
    }

    fn read_sources(&self) -> Result<EnvMap, ConfigError> {
        let mut merged = EnvMap::new();

        for source in &self.sources {
            match source {
                FileSource::File(file) => merged.merge(file.read()?),
                FileSource::Discover(candidates) => merged.merge(discover(candidates)),
                FileSource::Vars(vars) => merged.merge(vars.clone()),
            }
        }

        Ok(merged)
    }
}

fn discover(candidates: &[PathBuf]) -> EnvMap {
    for path in candidates {
        if !path.is_file() {
            tracing::trace!(path = %path.display(), "env file candidate not present");
            continue;
        }
        match EnvFile::new(path, true).read() {
            Ok(vars) => {
                tracing::debug!(path = %path.display(), "using discovered env file");
                return vars;
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "skipping unusable env file");
            }
        }
    }

    tracing::debug!("no env file found, using environment only");
    EnvMap::new()
}

/// Candidate files searched by [`find_and_load`], in order.
///
/// The conventional locations come first, followed by the path in
/// `$ENV_FILE` when it is set.
pub fn search_paths() -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = SEARCH_PATHS.iter().map(PathBuf::from).collect();
    if let Some(path) = std::env::var_os(ENV_FILE_VAR).filter(|path| !path.is_empty()) {
        paths.push(PathBuf::from(path));
    }
    paths
}

/// Options for [`load_with`].
///
/// Can be read from TOML:
///
/// ```
/// let options = envtag::LoadOptions::from_toml_str(r#"
///     env_files = ["base.env", "local.env"]
///     use_system = false
/// "#)?;
/// assert_eq!(options.env_files.len(), 2);
/// assert!(!options.use_system);
/// # Ok::<(), toml::de::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// Files to load in order. When empty, `.env` is tried best-effort.
    pub env_files: Vec<PathBuf>,
    /// Whether to consult the process environment.
    pub use_system: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            env_files: Vec::new(),
            use_system: true,
        }
    }
}

impl LoadOptions {
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| match source.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound(path.to_path_buf()),
            _ => ConfigError::ReadError {
                path: path.to_path_buf(),
                source,
            },
        })?;
        Self::from_toml_str(&contents).map_err(|source| ConfigError::OptionsParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl From<LoadOptions> for Loader {
    fn from(options: LoadOptions) -> Self {
        let loader = Loader::builder().with_system_env(options.use_system);
        if options.env_files.is_empty() {
            return loader.with_discovery([DEFAULT_ENV_FILE]);
        }
        options
            .env_files
            .into_iter()
            .fold(loader, |loader, path| loader.with_file(path, true))
    }
}

/// Binds `config` from the environment, after trying `.env` in the current
/// directory. A missing or broken `.env` is ignored.
pub fn load<T: EnvConfig + ?Sized>(config: &mut T) -> Result<(), ConfigError> {
    load_with(config, LoadOptions::default())
}

/// Binds `config` according to `options`.
///
/// Listed files must all exist.
pub fn load_with<T: EnvConfig + ?Sized>(config: &mut T, options: LoadOptions) -> Result<(), ConfigError> {
    Loader::from(options).bind(config)
}

/// Binds `config` from the process environment only; no file is read.
pub fn load_from_env<T: EnvConfig + ?Sized>(config: &mut T) -> Result<(), ConfigError> {
    Loader::builder().bind(config)
}

/// Binds `config` after loading one env file, which must exist.
pub fn load_from_file<T: EnvConfig + ?Sized>(
    config: &mut T,
    path: impl AsRef<Path>,
) -> Result<(), ConfigError> {
    Loader::builder().with_file(path, true).bind(config)
}

/// Binds `config` after loading several env files; later files override
/// earlier ones, and all must exist.
pub fn load_from_files<T, P>(config: &mut T, paths: impl IntoIterator<Item = P>) -> Result<(), ConfigError>
where
    T: EnvConfig + ?Sized,
    P: AsRef<Path>,
{
    paths
        .into_iter()
        .fold(Loader::builder(), |loader, path| loader.with_file(path, true))
        .bind(config)
}

/// Binds `config` after loading the first env file found in
/// [`search_paths`]. Finding no file is not an error.
pub fn find_and_load<T: EnvConfig + ?Sized>(config: &mut T) -> Result<(), ConfigError> {
    Loader::builder().with_discovery(search_paths()).bind(config)
}

/// Like [`load`], but panics if the configuration cannot be loaded.
///
/// # Panics
///
/// Panics with the error message on any load or validation failure.
pub fn must_load<T: EnvConfig + ?Sized>(config: &mut T) {
    if let Err(err) = load(config) {
        panic!("failed to load configuration: {err}");
    }
}
