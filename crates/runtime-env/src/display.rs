//! Display names for environments.
//!
//! The formatter never fails: every missing field has a fallback, and the
//! result always contains at least the runtime label.

use std::path::Path;
use std::sync::OnceLock;

use log::debug;
use regex::Regex;

use crate::classify::is_conda_environment_without_python;
use crate::config::DEFAULT_RUNTIME_LABEL;
use crate::environment::{Environment, EnvironmentRecord, NormalizedEnvironment};
use crate::kind::EnvironmentKind;
use crate::resolver::EnvironmentInfo;

/// Last component of `path`, or an empty string.
pub fn basename(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn version_prefix() -> &'static Regex {
    static VERSION_PREFIX: OnceLock<Regex> = OnceLock::new();
    VERSION_PREFIX.get_or_init(|| {
        Regex::new(r"^\s*v?(\d+)(?:\.(\d+))?(?:\.(\d+))?").expect("version pattern is valid")
    })
}

/// Reduce a version string to its numeric `major[.minor[.micro]]` prefix.
///
/// Build tags, compiler info and pre-release suffixes are dropped so the
/// result is safe to show or report. Returns an empty string when the input
/// has no leading number.
pub fn telemetry_safe_version(raw: &str) -> String {
    let Some(caps) = version_prefix().captures(raw) else {
        return String::new();
    };
    caps.iter()
        .skip(1)
        .map_while(|group| group.map(|m| m.as_str()))
        .collect::<Vec<_>>()
        .join(".")
}

/// Render a path for logs, replacing the home directory with `~`.
pub fn display_path(path: &Path, shorten_home: bool) -> String {
    if shorten_home {
        if let Some(home) = dirs::home_dir() {
            if let Ok(rest) = path.strip_prefix(&home) {
                if rest.as_os_str().is_empty() {
                    return "~".to_string();
                }
                return Path::new("~").join(rest).to_string_lossy().into_owned();
            }
        }
    }
    path.to_string_lossy().into_owned()
}

/// `runtime_label` falls back to [`DEFAULT_RUNTIME_LABEL`] when blank so the
/// result is never empty.
fn base_label(runtime_label: &str, version: &str) -> String {
    let runtime_label = match runtime_label.trim() {
        "" => DEFAULT_RUNTIME_LABEL,
        label => label,
    };
    if version.is_empty() {
        runtime_label.to_string()
    } else {
        format!("{runtime_label} {version}")
    }
}

/// Display name for a resolved environment.
///
/// `"myenv (Python 3.11.4)"`, `"Python 3"`, or just `"envX"` for a conda
/// env with no interpreter.
pub fn format_resolved(env: &Environment, runtime_label: &str) -> String {
    let version = env.version.as_ref().map(|v| v.dotted()).unwrap_or_default();
    let env_name = env.folder().map(basename).unwrap_or_default();
    let label = base_label(runtime_label, &version);

    if env_name.is_empty() {
        label
    } else if is_conda_environment_without_python(env) {
        env_name
    } else {
        format!("{env_name} ({label})")
    }
}

/// Display name for a normalized record.
///
/// `version` is the raw version string (from the resolver cache); it is
/// sanitized with [`telemetry_safe_version`] before use.
pub fn format_normalized(
    env: &NormalizedEnvironment,
    version: Option<&str>,
    runtime_label: &str,
) -> String {
    let version = version.map(telemetry_safe_version).unwrap_or_default();
    let label = base_label(runtime_label, version.trim());

    let is_conda = env.env_type == Some(EnvironmentKind::Conda);
    let without_python = is_conda && env.is_conda_env_without_python;

    // Conda envs created by path only have no explicit name.
    let env_name = match env.env_name.as_deref() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ if is_conda => env.env_path.as_deref().map(basename).unwrap_or_default(),
        _ => String::new(),
    };

    if without_python && !env_name.is_empty() {
        return env_name;
    }

    let mut details = Vec::with_capacity(2);
    if !env_name.is_empty() {
        details.push(env_name);
    }
    match env.env_type {
        Some(kind) if kind != EnvironmentKind::Unknown => details.push(kind.label().to_string()),
        _ => {}
    }

    if details.is_empty() {
        label
    } else {
        format!("{label} ({})", details.join(": "))
            .trim()
            .to_string()
    }
}

/// Display name for either record shape.
///
/// Normalized records read their version from `info`'s cache. An
/// uninitialized cache is treated as "no version".
pub fn format_display_name(record: &EnvironmentRecord, info: &EnvironmentInfo) -> String {
    let runtime_label = &info.config().runtime_label;
    match record {
        EnvironmentRecord::Resolved(env) => format_resolved(env, runtime_label),
        EnvironmentRecord::Normalized(env) => {
            let version = match info.cached_version(Some(&env.id)) {
                Ok(version) => version,
                Err(e) => {
                    debug!("No cached version for display name: {e}");
                    None
                }
            };
            format_normalized(env, version.as_deref(), runtime_label)
        }
    }
}
