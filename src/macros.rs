/// Declares a struct and registers its fields for binding.
///
/// Each field may carry a declaration tag after `=`: `"NAME"`, `"NAME,default"`
/// or `"NAME,required"`. Fields without a tag are part of the struct but are
/// not registered, so they are never bound or displayed and can be of any type.
///
/// ```
/// use std::time::Duration;
///
/// envtag::env_config! {
///     #[derive(Debug, Default)]
///     pub struct AppConfig {
///         pub server_port: u16 = "SERVER_PORT,8080",
///         pub db_password: String = "DB_PASSWORD,required",
///         pub timeout: Duration = "TIMEOUT,30s",
///         pub allowed_hosts: Vec<String> = "ALLOWED_HOSTS,localhost,127.0.0.1",
///         /// Filled in by the application, not the environment.
///         pub started_by: String,
///     }
/// }
///
/// use envtag::EnvConfig;
///
/// let config = AppConfig::default();
/// let tags: Vec<_> = config.fields().iter().map(|f| f.tag()).collect();
/// assert_eq!(tags.len(), 4);
/// assert_eq!(tags[0], Some("SERVER_PORT,8080"));
/// ```
#[macro_export]
macro_rules! env_config {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty $(= $tag:literal)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
        }

        impl $crate::EnvConfig for $name {
            #[allow(unused_mut)]
            fn fields_mut(&mut self) -> ::std::vec::Vec<$crate::Field<'_>> {
                let mut fields = ::std::vec::Vec::new();
                $(
                    $crate::__env_field!(@mut fields, self.$field $(, $tag)?);
                )*
                fields
            }

            #[allow(unused_mut)]
            fn fields(&self) -> ::std::vec::Vec<$crate::FieldRef<'_>> {
                let mut fields = ::std::vec::Vec::new();
                $(
                    $crate::__env_field!(@ref fields, self.$field $(, $tag)?);
                )*
                fields
            }
        }
    };
}

/// Pushes one field onto a registration list. Untagged fields are left out,
/// so their type needs no `Debug` or `'static` bound.
#[doc(hidden)]
#[macro_export]
macro_rules! __env_field {
    (@mut $fields:ident, $this:ident . $field:ident) => {};
    (@mut $fields:ident, $this:ident . $field:ident, $tag:literal) => {
        $fields.push($crate::Field::new(
            ::std::stringify!($field),
            ::std::option::Option::Some($tag),
            &mut $this.$field,
        ));
    };
    (@ref $fields:ident, $this:ident . $field:ident) => {};
    (@ref $fields:ident, $this:ident . $field:ident, $tag:literal) => {
        $fields.push($crate::FieldRef::new(
            ::std::stringify!($field),
            ::std::option::Option::Some($tag),
            &$this.$field,
        ));
    };
}
