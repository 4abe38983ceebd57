//! Declaration tag parsing.
//!
//! A tag has the form `NAME`, `NAME,default` or `NAME,required`. Only the
//! first comma separates the variable name from its default, so list
//! defaults such as `HOSTS,localhost,127.0.0.1` keep every element.

/// Marker that turns a tag's default slot into a required-field check.
pub const REQUIRED_MARKER: &str = "required";

/// Splits a tag at its first comma.
///
/// Everything after the first comma is returned verbatim, including any
/// further commas and surrounding whitespace.
pub fn split_tag(tag: &str) -> (&str, Option<&str>) {
    match tag.split_once(',') {
        Some((name, rest)) => (name, Some(rest)),
        None => (tag, None),
    }
}

/// What a tag says to do when its variable has no value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultSpec<'a> {
    /// The variable must be set; binding reports it as missing otherwise.
    Required,
    /// Literal fallback value, still raw (lists are not split yet).
    Value(&'a str),
}

/// A parsed declaration tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Declaration<'a> {
    variable: &'a str,
    default: Option<DefaultSpec<'a>>,
}

impl<'a> Declaration<'a> {
    pub fn parse(tag: &'a str) -> Self {
        let (variable, rest) = split_tag(tag);
        let default = rest.map(|rest| {
            if rest == REQUIRED_MARKER {
                DefaultSpec::Required
            } else {
                DefaultSpec::Value(rest)
            }
        });
        Self { variable, default }
    }

    /// Name of the environment variable to read.
    pub fn variable(&self) -> &'a str {
        self.variable
    }

    pub fn default(&self) -> Option<DefaultSpec<'a>> {
        self.default
    }

    pub fn is_required(&self) -> bool {
        matches!(self.default, Some(DefaultSpec::Required))
    }
}
