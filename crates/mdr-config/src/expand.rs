//! Environment variable and home directory expansion for configuration strings.

use crate::ConfigError;

/// Expand environment variable references in a string.
///
/// Supports:
/// - `${VAR}` - expands to the value of VAR, errors if unset
/// - `${VAR:-default}` - expands to VAR if set, otherwise uses default
///
/// Strings without a `${` are returned unchanged, so a bare `$` in a path
/// is taken literally.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    let lookup = |var: &str| std::env::var(var).map(Some);
    match shellexpand::env_with_context(value, lookup) {
        Ok(expanded) => Ok(expanded.into_owned()),
        Err(e) => Err(ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{}}} not set", e.var_name),
        }),
    }
}

/// Expand a path field: environment variables first, then a leading `~`.
///
/// `~` is replaced with `$HOME` only when it is the whole path or followed by a
/// separator. Without `$HOME` the path is left as written.
pub(crate) fn expand_path(value: &str, field: &str) -> Result<String, ConfigError> {
    let expanded = expand_env(value, field)?;
    let home_dir = || std::env::var("HOME").ok();
    Ok(shellexpand::tilde_with_context(expanded.as_str(), home_dir).into_owned())
}
