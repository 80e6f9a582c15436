/// Semantic version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Pre-release marker such as "dev", "beta" or "rc1". Empty for a final release.
pub const VERSION_PRERELEASE: &str = "";

/// Git commit the crate was compiled from, set through `ENVCONF_GIT_COMMIT` at build time
pub const GIT_COMMIT: Option<&str> = option_env!("ENVCONF_GIT_COMMIT");

/// `git describe` output, set through `ENVCONF_GIT_DESCRIBE` at build time
pub const GIT_DESCRIBE: Option<&str> = option_env!("ENVCONF_GIT_DESCRIBE");

/// Version string for humans, e.g. `0.1.0-dev (abc1234)`
pub fn human_version() -> String {
    format_version(VERSION, VERSION_PRERELEASE, GIT_DESCRIBE.or(GIT_COMMIT))
}

fn format_version(version: &str, prerelease: &str, revision: Option<&str>) -> String {
    let mut out = version.to_string();
    if !prerelease.is_empty() {
        out.push('-');
        out.push_str(prerelease);
    }
    if let Some(rev) = revision.filter(|r| !r.is_empty()) {
        out.push_str(&format!(" ({})", rev));
    }
    out
}
