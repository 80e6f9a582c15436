use crate::Spec;
use crate::coerce::coerce;
use crate::error::ConfigError;
use crate::field::FieldDescriptor;
use crate::resolver::{Resolved, resolve};
use crate::source::{EnvSource, StdEnv};
use colored::Colorize;

/// Populate `spec` from the process environment.
///
/// Returns the number of fields that were written. Stops at the first error;
/// fields written before it keep their new values.
///
/// # Example
/// ```rust
/// use envconf::EnvConf;
///
/// #[derive(Default, EnvConf)]
/// pub struct Config {
///     #[envconf(default = "8080")]
///     pub port: i32,
/// }
///
/// let mut config = Config::default();
/// envconf::parse("envconf_doc_example", &mut config).unwrap();
/// assert_eq!(config.port, 8080);
/// ```
pub fn parse<S: Spec>(prefix: &str, spec: &mut S) -> Result<usize, ConfigError> {
    parse_from(prefix, spec, &StdEnv)
}

/// Populate `spec` from an arbitrary environment source
pub fn parse_from<S, E>(prefix: &str, spec: &mut S, env: &E) -> Result<usize, ConfigError>
where
    S: Spec,
    E: EnvSource + ?Sized,
{
    let descriptor = S::descriptor();
    let mut written = 0;

    for (index, field) in descriptor.iter().enumerate() {
        if !field.kind.is_supported() {
            tracing::trace!(field = %field.name, "skipping field with unsupported type");
            continue;
        }

        let Some(resolved) = resolve(prefix, field, env)? else {
            tracing::trace!(field = %field.name, "no value, leaving field untouched");
            continue;
        };

        if assign(spec, index, field, &resolved)? {
            written += 1;
            tracing::debug!(
                field = %field.name,
                key = %resolved.key,
                source = %resolved.source,
                "field set from environment"
            );
        }
    }

    Ok(written)
}

/// Coerce a resolved value and store it in the field's slot.
///
/// Returns whether the field was written.
fn assign<S: Spec>(
    spec: &mut S,
    index: usize,
    field: &FieldDescriptor,
    resolved: &Resolved,
) -> Result<bool, ConfigError> {
    let value = match coerce(&resolved.value, field.kind, field.bit_width) {
        Ok(Some(value)) => value,
        Ok(None) => return Ok(false),
        Err(e) => {
            return Err(ConfigError::Conversion {
                key: resolved.key.clone(),
                field: field.effective_name().to_string(),
                type_name: field.type_name.clone(),
                value: e.value,
            });
        }
    };

    let invalid = || ConfigError::InvalidSpecification {
        field: field.name.clone(),
    };
    let slot = spec.slot(index).ok_or_else(invalid)?;
    if slot.kind() != field.kind {
        return Err(invalid());
    }

    match slot.store(value) {
        Ok(()) => Ok(true),
        // Descriptor claims a wider integer than the field holds
        Err(_) => Err(ConfigError::Conversion {
            key: resolved.key.clone(),
            field: field.effective_name().to_string(),
            type_name: field.type_name.clone(),
            value: resolved.value.clone(),
        }),
    }
}

/// Populate `spec` from the process environment, panicking on any error
pub fn must_parse<S: Spec>(prefix: &str, spec: &mut S) -> usize {
    must_parse_from(prefix, spec, &StdEnv)
}

/// Populate `spec` from `env`, panicking on any error
pub fn must_parse_from<S, E>(prefix: &str, spec: &mut S, env: &E) -> usize
where
    S: Spec,
    E: EnvSource + ?Sized,
{
    match parse_from(prefix, spec, env) {
        Ok(written) => written,
        Err(e) => panic!("{}", format_config_error(&e)),
    }
}

/// Format an error the way `must_parse` reports it
pub fn format_config_error(error: &ConfigError) -> String {
    format!("{} {}", "Configuration failed:".yellow().bold(), error)
}
