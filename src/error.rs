use colored::Colorize;
use std::fmt;

/// Errors that stop a parse
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The struct's descriptor and its writable slots disagree
    InvalidSpecification { field: String },
    /// A required field has no environment value, fallback or default
    RequiredValueMissing { key: String },
    /// A value could not be converted to the field's type
    Conversion {
        key: String,
        field: String,
        type_name: String,
        value: String,
    },
}

impl ConfigError {
    /// Environment key the error is attributed to, if any
    pub fn key(&self) -> Option<&str> {
        match self {
            ConfigError::InvalidSpecification { .. } => None,
            ConfigError::RequiredValueMissing { key } => Some(key),
            ConfigError::Conversion { key, .. } => Some(key),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidSpecification { field } => {
                write!(
                    f,
                    "invalid specification: field {} has no writable slot for its declared type",
                    field.magenta().bold()
                )
            }
            ConfigError::RequiredValueMissing { key } => {
                write!(f, "required key {} missing value", key.magenta().bold())
            }
            ConfigError::Conversion {
                key,
                field,
                type_name,
                value,
            } => {
                write!(
                    f,
                    "assigning {} to {}: converting {} to type {}",
                    key.magenta().bold(),
                    field,
                    format!("'{}'", value).red(),
                    type_name.cyan(),
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Failure inside the coercer, before the key and field are known
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoerceError {
    pub value: String,
}

impl CoerceError {
    pub(crate) fn new(value: &str) -> Self {
        Self {
            value: value.to_string(),
        }
    }
}

impl fmt::Display for CoerceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot convert '{}'", self.value)
    }
}

impl std::error::Error for CoerceError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_value_missing() {
        colored::control::set_override(false);

        let error = ConfigError::RequiredValueMissing {
            key: "APP_X".to_string(),
        };

        assert_eq!(error.to_string(), "required key APP_X missing value");
        assert_eq!(error.key(), Some("APP_X"));
    }

    #[test]
    fn test_conversion() {
        colored::control::set_override(false);

        let error = ConfigError::Conversion {
            key: "APP_ENABLED".to_string(),
            field: "enabled".to_string(),
            type_name: "bool".to_string(),
            value: "notabool".to_string(),
        };

        assert_eq!(
            error.to_string(),
            "assigning APP_ENABLED to enabled: converting 'notabool' to type bool"
        );
        assert_eq!(error.key(), Some("APP_ENABLED"));
    }

    #[test]
    fn test_invalid_specification() {
        colored::control::set_override(false);

        let error = ConfigError::InvalidSpecification {
            field: "port".to_string(),
        };

        let output = error.to_string();
        assert!(output.starts_with("invalid specification"));
        assert!(output.contains("port"));
        assert_eq!(error.key(), None);
    }

    #[test]
    fn test_clone_and_eq() {
        let error1 = ConfigError::RequiredValueMissing {
            key: "TEST".to_string(),
        };
        let error2 = error1.clone();

        assert_eq!(error1, error2);
    }

    #[test]
    fn test_debug_format() {
        let error = ConfigError::Conversion {
            key: "APP_PORT".to_string(),
            field: "port".to_string(),
            type_name: "i8".to_string(),
            value: "300".to_string(),
        };

        let debug_output = format!("{:?}", error);
        assert!(debug_output.contains("Conversion"));
        assert!(debug_output.contains("APP_PORT"));
    }

    #[test]
    fn test_coerce_error_display() {
        assert_eq!(CoerceError::new("0x").to_string(), "cannot convert '0x'");
    }
}
