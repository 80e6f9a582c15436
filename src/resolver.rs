use crate::error::ConfigError;
use crate::field::FieldDescriptor;
use crate::source::{EnvSource, NotUnicode};
use std::fmt;

/// Where an effective value was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ValueSource {
    /// `PREFIX_NAME`
    Primary,
    /// Prefix-less `NAME`, only tried for fields with an override name
    Fallback,
    /// The field's declared default
    Default,
}

impl fmt::Display for ValueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary => write!(f, "primary"),
            Self::Fallback => write!(f, "fallback"),
            Self::Default => write!(f, "default"),
        }
    }
}

/// The effective raw value of a field and the key it is attributed to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub key: String,
    pub value: String,
    pub source: ValueSource,
}

/// `UPPER(prefix + "_" + effective name)`
pub fn primary_key(prefix: &str, field: &FieldDescriptor) -> String {
    format!("{}_{}", prefix, field.effective_name()).to_uppercase()
}

/// `UPPER(override name)`, or `None` when the field has no override
pub fn fallback_key(field: &FieldDescriptor) -> Option<String> {
    field.override_name.as_deref().map(str::to_uppercase)
}

/// Compute the effective raw value for `field`.
///
/// Order: prefixed key, then the prefix-less key if an override name is
/// declared, then the default. Empty values count as unset. Returns `Ok(None)`
/// when nothing was found for an optional field.
///
/// The returned key is always the primary key; [`ValueSource`] tells where the
/// value actually came from.
pub fn resolve<E>(
    prefix: &str,
    field: &FieldDescriptor,
    env: &E,
) -> Result<Option<Resolved>, ConfigError>
where
    E: EnvSource + ?Sized,
{
    let key = primary_key(prefix, field);
    if let Some(value) = lookup(env, field, &key, &key)? {
        return Ok(Some(Resolved {
            key,
            value,
            source: ValueSource::Primary,
        }));
    }

    if let Some(fallback) = fallback_key(field) {
        if let Some(value) = lookup(env, field, &fallback, &key)? {
            return Ok(Some(Resolved {
                key,
                value,
                source: ValueSource::Fallback,
            }));
        }
    }

    if let Some(default) = field.default_value.as_deref().filter(|d| !d.is_empty()) {
        return Ok(Some(Resolved {
            key,
            value: default.to_string(),
            source: ValueSource::Default,
        }));
    }

    if field.required {
        return Err(ConfigError::RequiredValueMissing { key });
    }
    Ok(None)
}

/// Non-empty value under `key`. Values that are not valid unicode fail the
/// field instead of reading as unset.
fn lookup<E>(
    env: &E,
    field: &FieldDescriptor,
    key: &str,
    attributed_key: &str,
) -> Result<Option<String>, ConfigError>
where
    E: EnvSource + ?Sized,
{
    match env.lookup(key) {
        Ok(value) => Ok(value.filter(|v| !v.is_empty())),
        Err(NotUnicode(lossy)) => Err(ConfigError::Conversion {
            key: attributed_key.to_string(),
            field: field.effective_name().to_string(),
            type_name: field.type_name.clone(),
            value: lossy,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Kind;
    use crate::source::MockEnv;

    fn name_field() -> FieldDescriptor {
        FieldDescriptor::new("name", Kind::String)
    }

    #[test]
    fn test_primary_key_is_uppercased() {
        let field = FieldDescriptor::new("max_conns", Kind::Integer);
        assert_eq!(primary_key("app", &field), "APP_MAX_CONNS");
    }

    #[test]
    fn test_primary_key_uses_override() {
        let field = name_field().override_name("service_name");
        assert_eq!(primary_key("APP", &field), "APP_SERVICE_NAME");
        assert_eq!(fallback_key(&field).as_deref(), Some("SERVICE_NAME"));
    }

    #[test]
    fn test_no_fallback_without_override() {
        assert_eq!(fallback_key(&name_field()), None);

        let env = MockEnv::new().with("NAME", "ignored");
        assert_eq!(resolve("APP", &name_field(), &env), Ok(None));
    }

    #[test]
    fn test_primary_value_wins() {
        let field = name_field()
            .override_name("service_name")
            .default_value("fallback-default");
        let env = MockEnv::new()
            .with("APP_SERVICE_NAME", "primary")
            .with("SERVICE_NAME", "prefixless");

        let resolved = resolve("APP", &field, &env).unwrap().unwrap();
        assert_eq!(resolved.key, "APP_SERVICE_NAME");
        assert_eq!(resolved.value, "primary");
        assert_eq!(resolved.source, ValueSource::Primary);
    }

    #[test]
    fn test_fallback_used_when_primary_missing() {
        let field = name_field().override_name("SERVICE_NAME").required(true);
        let env = MockEnv::new().with("SERVICE_NAME", "billing");

        let resolved = resolve("APP", &field, &env).unwrap().unwrap();
        assert_eq!(resolved.key, "APP_SERVICE_NAME");
        assert_eq!(resolved.value, "billing");
        assert_eq!(resolved.source, ValueSource::Fallback);
    }

    #[test]
    fn test_empty_primary_falls_through() {
        let field = name_field().override_name("SERVICE_NAME");
        let env = MockEnv::new()
            .with("APP_SERVICE_NAME", "")
            .with("SERVICE_NAME", "billing");

        let resolved = resolve("APP", &field, &env).unwrap().unwrap();
        assert_eq!(resolved.value, "billing");
    }

    #[test]
    fn test_default_used_only_when_env_empty() {
        let field = FieldDescriptor::new("port", Kind::Integer).default_value("8080");

        let resolved = resolve("APP", &field, &MockEnv::new()).unwrap().unwrap();
        assert_eq!(resolved.key, "APP_PORT");
        assert_eq!(resolved.value, "8080");
        assert_eq!(resolved.source, ValueSource::Default);

        let env = MockEnv::new().with("APP_PORT", "9090");
        let resolved = resolve("APP", &field, &env).unwrap().unwrap();
        assert_eq!(resolved.value, "9090");
        assert_eq!(resolved.source, ValueSource::Primary);
    }

    #[test]
    fn test_required_missing_names_primary_key() {
        let field = FieldDescriptor::new("x", Kind::String)
            .override_name("other_x")
            .required(true);

        let err = resolve("APP", &field, &MockEnv::new()).unwrap_err();
        assert_eq!(
            err,
            ConfigError::RequiredValueMissing {
                key: "APP_OTHER_X".to_string()
            }
        );
    }

    #[test]
    fn test_optional_missing_is_none() {
        let field = FieldDescriptor::new("x", Kind::String);
        assert_eq!(resolve("APP", &field, &MockEnv::new()), Ok(None));
    }

    #[test]
    fn test_resolve_with_closure_source() {
        let field = FieldDescriptor::new("region", Kind::String);
        let lookup = |key: &str| (key == "SVC_REGION").then(|| "eu-west-1".to_string());

        let resolved = resolve("svc", &field, &lookup).unwrap().unwrap();
        assert_eq!(resolved.value, "eu-west-1");
    }

    /// Hands out a value that failed unicode decoding
    struct Undecodable;

    impl EnvSource for Undecodable {
        fn get(&self, _key: &str) -> Option<String> {
            None
        }

        fn lookup(&self, key: &str) -> Result<Option<String>, NotUnicode> {
            if key == "SERVICE_NAME" {
                Err(NotUnicode("bill\u{FFFD}ing".to_string()))
            } else {
                Ok(None)
            }
        }
    }

    #[test]
    fn test_non_unicode_value_is_conversion_error() {
        let field = name_field().override_name("service_name").required(true);

        let err = resolve("APP", &field, &Undecodable).unwrap_err();

        assert_eq!(
            err,
            ConfigError::Conversion {
                key: "APP_SERVICE_NAME".to_string(),
                field: "service_name".to_string(),
                type_name: "String".to_string(),
                value: "bill\u{FFFD}ing".to_string(),
            }
        );
    }
}
