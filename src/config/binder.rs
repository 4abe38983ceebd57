//! Tag-driven field binding.

use super::coerce;
use super::field::EnvConfig;
use super::source::{EnvSource, ProcessEnv};
use super::tag::{Declaration, DefaultSpec};
use super::ConfigError;

/// Binds tagged fields from an ordered list of environment sources.
///
/// For every tagged field the binder asks each source in turn and takes the
/// first non-empty value. When no source has one, the tag's default is used;
/// `required` tags are collected and reported together once every field has
/// been visited. Untagged fields are never written.
///
/// ## Example
///
/// ```
/// use envtag::{env_config, source, Binder};
///
/// env_config! {
///     #[derive(Debug, Default)]
///     struct Server {
///         port: u16 = "PORT,8080",
///         host: String = "HOST,localhost",
///     }
/// }
///
/// let mut server = Server::default();
/// Binder::new()
///     .with_source(source::from_fn(|name| (name == "PORT").then(|| "9000".to_string())))
///     .bind(&mut server)?;
///
/// assert_eq!(server.port, 9000);
/// assert_eq!(server.host, "localhost");
/// # Ok::<(), envtag::ConfigError>(())
/// ```
///
/// Only records can be bound; anything else is rejected at compile time:
///
/// ```compile_fail
/// let mut port = 0_u16;
/// envtag::Binder::system().bind(&mut port)?;
/// # Ok::<(), envtag::ConfigError>(())
/// ```
#[derive(Debug, Default)]
#[must_use = "a binder does nothing until .bind() is called"]
pub struct Binder<'a> {
    sources: Vec<Box<dyn EnvSource + 'a>>,
}

impl<'a> Binder<'a> {
    /// Creates a binder with no sources; only tag defaults apply.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a binder that reads the process environment.
    pub fn system() -> Self {
        Self::new().with_source(ProcessEnv)
    }

    /// Adds a source. Sources added earlier take precedence.
    pub fn with_source(mut self, source: impl EnvSource + 'a) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Binds every tagged field of `target`.
    ///
    /// Coercion failures stop binding at the offending field; fields before
    /// it keep their new values. Missing required variables do not stop the
    /// pass and are reported in one [`ConfigError::MissingRequired`].
    pub fn bind<T: EnvConfig + ?Sized>(&self, target: &mut T) -> Result<(), ConfigError> {
        let mut missing = Vec::new();

        for mut field in target.fields_mut() {
            let Some(tag) = field.tag() else {
                tracing::trace!(field = field.name(), "skipping untagged field");
                continue;
            };
            let decl = Declaration::parse(tag);
            let variable = decl.variable();

            let resolved = match self.lookup(variable)? {
                Some(value) => {
                    tracing::debug!(field = field.name(), variable, "resolved from environment");
                    value
                }
                None => match decl.default() {
                    Some(DefaultSpec::Required) => {
                        tracing::debug!(field = field.name(), variable, "required variable missing");
                        missing.push(variable.to_string());
                        continue;
                    }
                    Some(DefaultSpec::Value(default)) => {
                        tracing::debug!(field = field.name(), variable, "resolved from default");
                        default.to_string()
                    }
                    None => {
                        tracing::trace!(field = field.name(), variable, "no value, leaving field unchanged");
                        continue;
                    }
                },
            };

            let name = field.name();
            coerce::assign(field.value_mut(), &resolved)
                .map_err(|source| ConfigError::InvalidField { field: name, source })?;
        }

        if !missing.is_empty() {
            return Err(ConfigError::MissingRequired(missing));
        }

        Ok(())
    }

    /// First non-empty value across the sources, in order.
    fn lookup(&self, name: &str) -> Result<Option<String>, ConfigError> {
        for source in &self.sources {
            if let Some(value) = source.get(name)? {
                if !value.is_empty() {
                    return Ok(Some(value));
                }
            }
        }
        Ok(None)
    }
}
