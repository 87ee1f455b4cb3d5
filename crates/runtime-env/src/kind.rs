//! Environment kinds reported by the discovery service.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The category of a Python environment.
///
/// Labels match the tool tags the discovery service emits (`"Conda"`,
/// `"VirtualEnvWrapper"`, ...). Serialized as the label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EnvironmentKind {
    #[default]
    Unknown,
    Conda,
    Pipenv,
    Poetry,
    Pyenv,
    Venv,
    VirtualEnv,
    VirtualEnvWrapper,
}

impl EnvironmentKind {
    /// Every kind, in declaration order.
    pub const ALL: [EnvironmentKind; 8] = [
        EnvironmentKind::Unknown,
        EnvironmentKind::Conda,
        EnvironmentKind::Pipenv,
        EnvironmentKind::Poetry,
        EnvironmentKind::Pyenv,
        EnvironmentKind::Venv,
        EnvironmentKind::VirtualEnv,
        EnvironmentKind::VirtualEnvWrapper,
    ];

    pub fn label(self) -> &'static str {
        match self {
            EnvironmentKind::Unknown => "Unknown",
            EnvironmentKind::Conda => "Conda",
            EnvironmentKind::Pipenv => "Pipenv",
            EnvironmentKind::Poetry => "Poetry",
            EnvironmentKind::Pyenv => "Pyenv",
            EnvironmentKind::Venv => "Venv",
            EnvironmentKind::VirtualEnv => "VirtualEnv",
            EnvironmentKind::VirtualEnvWrapper => "VirtualEnvWrapper",
        }
    }
}

impl fmt::Display for EnvironmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a string is not the label of any kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized environment kind: {0}")]
pub struct ParseKindError(pub String);

impl FromStr for EnvironmentKind {
    type Err = ParseKindError;

    /// Case-insensitive match against the kind labels.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EnvironmentKind::ALL
            .into_iter()
            .find(|kind| kind.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseKindError(s.to_string()))
    }
}

impl Serialize for EnvironmentKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

// Unrecognized labels become `Unknown` rather than failing the whole record.
impl<'de> Deserialize<'de> for EnvironmentKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(raw.parse().unwrap_or_default())
    }
}
