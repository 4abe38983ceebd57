//! Human-readable dump of a bound configuration.
//!
//! Values of fields that look sensitive are replaced by [`MASK`], so the
//! report is safe to log at startup.

use std::fmt;
use std::time::Duration;

use super::duration::format_duration;
use super::field::{EnvConfig, FieldKind, FieldRef};
use super::tag::split_tag;

/// Replacement text for masked values.
pub const MASK: &str = "***MASKED***";

/// Name fragments that mark a field as sensitive, matched case-insensitively.
pub const SENSITIVE_KEYWORDS: &[&str] = &[
    "password",
    "secret",
    "key",
    "token",
    "credential",
    "auth",
    "pass",
    "pwd",
    "access",
    "private",
];

const HEADER: &str = "Environment Configuration:";
const DIVIDER: &str = "==========================";
const NAME_WIDTH: usize = 20;

/// Whether a field or variable name contains a sensitive keyword.
pub fn is_sensitive(name: &str) -> bool {
    let name = name.to_lowercase();
    SENSITIVE_KEYWORDS.iter().any(|keyword| name.contains(keyword))
}

/// One line of a [`Report`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    pub variable: String,
    pub value: String,
    pub masked: bool,
}

/// Masked listing of every tagged field of a configuration, in declaration order.
///
/// ```
/// envtag::env_config! {
///     #[derive(Default)]
///     struct Db {
///         port: u16 = "DB_PORT,5432",
///         password: String = "DB_PASSWORD",
///     }
/// }
///
/// let db = Db { port: 5432, password: "hunter2".into() };
/// let report = envtag::Report::new(&db).to_string();
/// assert!(report.contains("DB_PORT             : 5432"));
/// assert!(report.contains("DB_PASSWORD         : ***MASKED***"));
/// assert!(!report.contains("hunter2"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    entries: Vec<ReportEntry>,
}

impl Report {
    pub fn new<T: EnvConfig + ?Sized>(config: &T) -> Self {
        let entries = config
            .fields()
            .into_iter()
            .filter_map(|field| entry(&field))
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }
}

fn entry(field: &FieldRef<'_>) -> Option<ReportEntry> {
    let (variable, _) = split_tag(field.tag()?);
    let masked = is_sensitive(field.name()) || is_sensitive(variable);
    let value = if masked {
        MASK.to_string()
    } else {
        render(field)
    };
    Some(ReportEntry {
        variable: variable.to_string(),
        value,
        masked,
    })
}

fn render(field: &FieldRef<'_>) -> String {
    let value = field.value();
    let any = value.as_any();
    let rendered = match field.kind() {
        FieldKind::String => any.downcast_ref::<String>().cloned(),
        FieldKind::Duration => any.downcast_ref::<Duration>().map(|d| format_duration(*d)),
        FieldKind::StringList => any
            .downcast_ref::<Vec<String>>()
            .map(|list| format!("[{}]", list.join(", "))),
        _ => None,
    };
    rendered.unwrap_or_else(|| format!("{value:?}"))
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{HEADER}")?;
        writeln!(f, "{DIVIDER}")?;
        for entry in &self.entries {
            writeln!(f, "{:<width$}: {}", entry.variable, entry.value, width = NAME_WIDTH)?;
        }
        Ok(())
    }
}

/// Renders the masked report of `config` as a string.
pub fn sprint<T: EnvConfig + ?Sized>(config: &T) -> String {
    Report::new(config).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env_config;

    #[test]
    fn test_sensitive_names() {
        for name in ["apiKey", "DB_PASSWORD", "auth_header", "AccessLevel", "private_dir", "pwd"] {
            assert!(is_sensitive(name), "{name}");
        }
        for name in ["Port", "DB_HOST", "timeout", "allowed_hosts"] {
            assert!(!is_sensitive(name), "{name}");
        }
    }

    env_config! {
        #[derive(Debug, Default)]
        struct Sample {
            server_port: String = "SERVER_PORT,8080",
            db_password: String = "DB_PASSWORD,required",
            max_users: i32 = "MAX_USERS,100",
            debug_mode: bool = "DEBUG_MODE",
            timeout: Duration = "TIMEOUT,30s",
            allowed_hosts: Vec<String> = "ALLOWED_HOSTS,localhost,127.0.0.1",
            api_key: String = "API_KEY",
            ratio: f64 = "RATIO",
            internal: String,
        }
    }

    fn sample() -> Sample {
        Sample {
            server_port: "8080".into(),
            db_password: "secret123".into(),
            max_users: 100,
            debug_mode: true,
            timeout: Duration::from_secs(300),
            allowed_hosts: vec!["localhost".into(), "127.0.0.1".into()],
            api_key: String::new(),
            ratio: 0.5,
            internal: "hidden".into(),
        }
    }

    #[test]
    fn test_report_layout() {
        let expected = "\
Environment Configuration:
==========================
SERVER_PORT         : 8080
DB_PASSWORD         : ***MASKED***
MAX_USERS           : 100
DEBUG_MODE          : true
TIMEOUT             : 5m0s
ALLOWED_HOSTS       : [localhost, 127.0.0.1]
API_KEY             : ***MASKED***
RATIO               : 0.5
";
        assert_eq!(sprint(&sample()), expected);
    }

    #[test]
    fn test_report_skips_untagged_fields() {
        let report = Report::new(&sample());

        assert_eq!(report.entries().len(), 8);
        assert!(!report.to_string().contains("hidden"));
    }

    #[test]
    fn test_report_marks_masked_entries() {
        let report = Report::new(&sample());
        let masked: Vec<_> = report
            .entries()
            .iter()
            .filter(|entry| entry.masked)
            .map(|entry| entry.variable.as_str())
            .collect();

        assert_eq!(masked, ["DB_PASSWORD", "API_KEY"]);
    }

    env_config! {
        #[derive(Debug, Default)]
        struct LongNames {
            very_long_variable: String = "A_VARIABLE_NAME_LONGER_THAN_TWENTY,x",
        }
    }

    #[test]
    fn test_long_names_are_not_truncated() {
        let cfg = LongNames {
            very_long_variable: "x".into(),
        };
        assert!(sprint(&cfg).contains("A_VARIABLE_NAME_LONGER_THAN_TWENTY: x\n"));
    }
}
