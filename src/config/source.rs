use std::collections::HashMap;
use std::env::VarError;
use std::fmt;

use super::ConfigError;

/// A place the binder can look variables up.
///
/// Returning `Ok(Some(""))` is the same as returning `Ok(None)`: both mean
/// the variable has no value in this source. An error aborts binding.
pub trait EnvSource: Send + Sync + fmt::Debug {
    fn get(&self, name: &str) -> Result<Option<String>, ConfigError>;
}

/// The process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn get(&self, name: &str) -> Result<Option<String>, ConfigError> {
        match std::env::var(name) {
            Ok(value) => Ok(Some(value)),
            Err(VarError::NotPresent) => Ok(None),
            Err(VarError::NotUnicode(_)) => Err(ConfigError::NotUnicode(name.to_string())),
        }
    }
}

/// An in-memory set of variables, such as the contents of `.env` files.
///
/// Later insertions replace earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvMap {
    vars: HashMap<String, String>,
}

impl EnvMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }

    /// Merges `overlay` into this map, with `overlay` winning on conflicts.
    pub fn merge(&mut self, overlay: EnvMap) {
        self.vars.extend(overlay.vars);
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnvMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for EnvMap {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.insert(name, value);
        }
    }
}

impl EnvSource for EnvMap {
    fn get(&self, name: &str) -> Result<Option<String>, ConfigError> {
        Ok(self.vars.get(name).cloned())
    }
}

/// A lookup backed by a closure.
pub struct FnSource<F>(F);

/// Wraps a lookup function as an [`EnvSource`].
pub fn from_fn<F>(lookup: F) -> FnSource<F>
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    FnSource(lookup)
}

impl<F> EnvSource for FnSource<F>
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    fn get(&self, name: &str) -> Result<Option<String>, ConfigError> {
        Ok((self.0)(name))
    }
}

impl<F> fmt::Debug for FnSource<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnSource(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_map_later_insert_wins() {
        let mut map: EnvMap = [("PORT", "8080"), ("HOST", "localhost")].into_iter().collect();
        map.merge([("PORT", "9090")].into_iter().collect());

        assert_eq!(map.get("PORT").unwrap().as_deref(), Some("9090"));
        assert_eq!(map.get("HOST").unwrap().as_deref(), Some("localhost"));
        assert_eq!(map.get("MISSING").unwrap(), None);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_fn_source_delegates() {
        let source = from_fn(|name| (name == "MODE").then(|| "fast".to_string()));
        assert_eq!(source.get("MODE").unwrap().as_deref(), Some("fast"));
        assert_eq!(source.get("OTHER").unwrap(), None);
    }
}
