//! Field registration.
//!
//! Types opt into binding by implementing [`EnvConfig`], which lists every
//! field together with its declaration tag. The [`env_config!`] macro writes
//! the implementation from a struct definition; hand-written impls work the
//! same way.
//!
//! [`env_config!`]: crate::env_config

use std::any::{self, Any};
use std::fmt;
use std::time::Duration;

/// A value that can sit behind a registered field.
///
/// Implemented for every `'static + Debug` type. Whether the binder can
/// actually assign to it is decided at bind time by [`FieldKind::of`].
pub trait FieldValue: Any + fmt::Debug {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn type_name(&self) -> &'static str;
}

impl<T: Any + fmt::Debug> FieldValue for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn type_name(&self) -> &'static str {
        any::type_name::<T>()
    }
}

/// Semantic type of a field, as seen by the coercer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Int,
    Bool,
    Float,
    StringList,
    Duration,
    Unsupported,
}

macro_rules! is_any_of {
    ($value:expr, $($ty:ty),+ $(,)?) => {
        $($value.is::<$ty>())||+
    };
}

impl FieldKind {
    pub fn of(value: &dyn FieldValue) -> Self {
        let value = value.as_any();
        // Duration comes first so it never falls through to a numeric kind.
        if value.is::<Duration>() {
            FieldKind::Duration
        } else if value.is::<String>() {
            FieldKind::String
        } else if is_any_of!(value, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize)
        {
            FieldKind::Int
        } else if value.is::<bool>() {
            FieldKind::Bool
        } else if is_any_of!(value, f32, f64) {
            FieldKind::Float
        } else if value.is::<Vec<String>>() {
            FieldKind::StringList
        } else {
            FieldKind::Unsupported
        }
    }
}

/// Mutable view of one registered field, handed to the binder.
pub struct Field<'a> {
    name: &'static str,
    tag: Option<&'static str>,
    value: &'a mut dyn FieldValue,
}

impl<'a> Field<'a> {
    pub fn new(name: &'static str, tag: Option<&'static str>, value: &'a mut dyn FieldValue) -> Self {
        Self { name, tag, value }
    }

    /// Rust field name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Declaration tag, or `None` when the field is not bound. An empty tag
    /// counts as no tag.
    pub fn tag(&self) -> Option<&'static str> {
        self.tag.filter(|tag| !tag.is_empty())
    }

    pub fn kind(&self) -> FieldKind {
        FieldKind::of(&*self.value)
    }

    pub fn value_mut(&mut self) -> &mut dyn FieldValue {
        &mut *self.value
    }
}

impl fmt::Debug for Field<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("tag", &self.tag)
            .field("value", &self.value)
            .finish()
    }
}

/// Read-only view of one registered field, used for display.
#[derive(Debug, Clone, Copy)]
pub struct FieldRef<'a> {
    name: &'static str,
    tag: Option<&'static str>,
    value: &'a dyn FieldValue,
}

impl<'a> FieldRef<'a> {
    pub fn new(name: &'static str, tag: Option<&'static str>, value: &'a dyn FieldValue) -> Self {
        Self { name, tag, value }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn tag(&self) -> Option<&'static str> {
        self.tag.filter(|tag| !tag.is_empty())
    }

    pub fn kind(&self) -> FieldKind {
        FieldKind::of(self.value)
    }

    pub fn value(&self) -> &'a dyn FieldValue {
        self.value
    }
}

/// A flat record whose fields can be bound from the environment.
///
/// Both methods must list the same fields in the same order.
pub trait EnvConfig {
    fn fields_mut(&mut self) -> Vec<Field<'_>>;

    fn fields(&self) -> Vec<FieldRef<'_>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_of_supported_types() {
        assert_eq!(FieldKind::of(&String::new()), FieldKind::String);
        assert_eq!(FieldKind::of(&0_i8), FieldKind::Int);
        assert_eq!(FieldKind::of(&0_u16), FieldKind::Int);
        assert_eq!(FieldKind::of(&0_usize), FieldKind::Int);
        assert_eq!(FieldKind::of(&false), FieldKind::Bool);
        assert_eq!(FieldKind::of(&0.0_f32), FieldKind::Float);
        assert_eq!(FieldKind::of(&Vec::<String>::new()), FieldKind::StringList);
        assert_eq!(FieldKind::of(&Duration::ZERO), FieldKind::Duration);
    }

    #[test]
    fn test_kind_of_unsupported_types() {
        assert_eq!(FieldKind::of(&(1.0_f64, 2.0_f64)), FieldKind::Unsupported);
        assert_eq!(FieldKind::of(&vec![1_i32]), FieldKind::Unsupported);
        assert_eq!(FieldKind::of(&Some(String::new())), FieldKind::Unsupported);
    }

    #[test]
    fn test_empty_tag_counts_as_untagged() {
        let mut value = String::new();
        let field = Field::new("name", Some(""), &mut value);
        assert_eq!(field.tag(), None);
        assert_eq!(field.kind(), FieldKind::String);
    }
}
