//! Populate configuration structs from environment variables.
//!
//! Each settable field is looked up as `PREFIX_FIELD` (uppercased). A field
//! with an override name is looked up under that name instead, and also
//! without the prefix when the prefixed key is empty. Defaults fill in what
//! the environment leaves empty, and required fields without any value stop
//! the parse.
//!
//! ```rust
//! use envconf::{EnvConf, MockEnv};
//!
//! #[derive(Debug, Default, EnvConf)]
//! pub struct Config {
//!     #[envconf(default = "8080", required = "true")]
//!     pub port: i32,
//!     #[envconf(vudou = "service_name", required = "true")]
//!     pub name: String,
//!     pub items: Vec<String>,
//! }
//!
//! let env = MockEnv::new()
//!     .with("APP_PORT", "9090")
//!     .with("SERVICE_NAME", "billing")
//!     .with("APP_ITEMS", "a,b,c");
//!
//! let mut config = Config::default();
//! envconf::parse_from("APP", &mut config, &env).unwrap();
//!
//! assert_eq!(config.port, 9090);
//! assert_eq!(config.name, "billing");
//! assert_eq!(config.items, ["a", "b", "c"]);
//! ```

extern crate self as envconf;

pub mod coerce;
pub mod error;
pub mod field;
pub mod parser;
pub mod resolver;
pub mod slot;
pub mod source;
pub mod version;

// Re-export main types
pub use coerce::Value;
pub use error::{CoerceError, ConfigError};
pub use field::{FieldDescriptor, Kind, RecordDescriptor};
pub use parser::{format_config_error, must_parse, must_parse_from, parse, parse_from};
pub use resolver::{Resolved, ValueSource};
pub use slot::Slot;
pub use source::{EnvSource, MockEnv, NotUnicode, StdEnv};
pub use version::{GIT_COMMIT, GIT_DESCRIBE, VERSION, VERSION_PRERELEASE, human_version};

// Re-export macro
#[cfg(feature = "derive")]
pub use envconf_macros::EnvConf;

/// A struct that can be populated from environment variables.
///
/// Usually derived with `#[derive(EnvConf)]`. Hand-written impls must keep
/// `slot` in step with `descriptor`: index `i` of the descriptor maps to
/// `slot(i)`, and fields of [`Kind::Unsupported`] have no slot.
pub trait Spec {
    /// Settable fields in declaration order. Built fresh on every call.
    fn descriptor() -> RecordDescriptor;

    /// Exclusive access to the field at `index` of the descriptor
    fn slot(&mut self, index: usize) -> Option<Slot<'_>>;
}
