//! Environment classification from tool tags.

use crate::environment::Environment;
use crate::kind::EnvironmentKind;

/// Tool tags checked first, in precedence order. Exact, case-sensitive.
///
/// `VirtualEnvWrapper` precedes `VirtualEnv` so wrapper-managed envs are
/// never reported as plain virtualenvs.
const TOOL_PRIORITY: [(&str, EnvironmentKind); 7] = [
    ("Conda", EnvironmentKind::Conda),
    ("Pyenv", EnvironmentKind::Pyenv),
    ("Pipenv", EnvironmentKind::Pipenv),
    ("Poetry", EnvironmentKind::Poetry),
    ("VirtualEnvWrapper", EnvironmentKind::VirtualEnvWrapper),
    ("VirtualEnv", EnvironmentKind::VirtualEnv),
    ("Venv", EnvironmentKind::Venv),
];

/// Classify an environment into a single [`EnvironmentKind`].
///
/// 1. `environment.type == "Conda"` wins outright.
/// 2. The first tag of [`TOOL_PRIORITY`] present in `tools` (exact match).
/// 3. The first kind, in declaration order, whose label matches a tag
///    ignoring ASCII case.
/// 4. `Unknown`.
///
/// The order of `tools` never matters.
pub fn classify(env: &Environment) -> EnvironmentKind {
    if env.environment_type() == Some("Conda") {
        return EnvironmentKind::Conda;
    }

    let has_tag = |tag: &str| env.tools.iter().any(|t| t == tag);
    if let Some((_, kind)) = TOOL_PRIORITY.iter().find(|&&(tag, _)| has_tag(tag)) {
        return *kind;
    }

    EnvironmentKind::ALL
        .into_iter()
        .find(|kind| {
            env.tools
                .iter()
                .any(|t| t.eq_ignore_ascii_case(kind.label()))
        })
        .unwrap_or(EnvironmentKind::Unknown)
}

/// True when the environment classifies as conda and has no interpreter.
pub fn is_conda_environment_without_python(env: &Environment) -> bool {
    classify(env) == EnvironmentKind::Conda && env.executable.uri.is_none()
}
