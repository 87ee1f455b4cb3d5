//! Environment records as reported by the discovery service.
//!
//! Two record shapes describe the same environment: the resolved shape
//! ([`Environment`]), which carries an `executable`, and the older
//! normalized shape ([`NormalizedEnvironment`]), which carries a classified
//! `envType` instead. [`EnvironmentRecord`] picks one of the two when a
//! record is deserialized and nothing downstream re-checks.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};

use crate::kind::EnvironmentKind;

/// Interpreter executable of a resolved environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Executable {
    /// Path to the interpreter. `None` for a conda env with no python.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sys_prefix: Option<PathBuf>,
}

/// The directory-style environment an interpreter lives in, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentDetails {
    /// Raw type discriminator, e.g. `"Conda"`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub env_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_uri: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentVersion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minor: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub micro: Option<u32>,
    /// Full `sys.version` string reported by the interpreter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sys_version: Option<String>,
}

impl EnvironmentVersion {
    /// Dotted `major[.minor[.micro]]`.
    ///
    /// Each component is only included when the one before it is present,
    /// so a missing minor drops the micro too.
    pub fn dotted(&self) -> String {
        let mut parts = Vec::with_capacity(3);
        if let Some(major) = self.major {
            parts.push(major.to_string());
            if let Some(minor) = self.minor {
                parts.push(minor.to_string());
                if let Some(micro) = self.micro {
                    parts.push(micro.to_string());
                }
            }
        }
        parts.join(".")
    }

    /// `sys_version` when reported, otherwise [`dotted`](Self::dotted).
    /// `None` when neither yields any text.
    pub fn version_string(&self) -> Option<String> {
        let raw = match self.sys_version.as_deref().map(str::trim) {
            Some(sys) if !sys.is_empty() => sys.to_string(),
            _ => self.dotted(),
        };
        (!raw.is_empty()).then_some(raw)
    }
}

/// A resolved environment record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    #[serde(default)]
    pub id: String,
    pub executable: Executable,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<EnvironmentDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<EnvironmentVersion>,
    /// Tags of the tools that created or manage this environment.
    #[serde(default)]
    pub tools: Vec<String>,
}

impl Environment {
    /// The raw `environment.type` discriminator, if any.
    pub fn environment_type(&self) -> Option<&str> {
        self.environment.as_ref()?.env_type.as_deref()
    }

    pub fn folder(&self) -> Option<&Path> {
        self.environment.as_ref()?.folder_uri.as_deref()
    }

    pub fn sys_prefix(&self) -> Option<&Path> {
        self.executable.sys_prefix.as_deref()
    }
}

/// A record in the normalized shape, looked up by `id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedEnvironment {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env_type: Option<EnvironmentKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env_path: Option<PathBuf>,
    #[serde(default)]
    pub is_conda_env_without_python: bool,
}

/// Either record shape. Deserialization discriminates on the presence of
/// an `executable` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum EnvironmentRecord {
    Resolved(Environment),
    Normalized(NormalizedEnvironment),
}

impl EnvironmentRecord {
    pub fn id(&self) -> &str {
        match self {
            EnvironmentRecord::Resolved(env) => &env.id,
            EnvironmentRecord::Normalized(env) => &env.id,
        }
    }
}

impl From<Environment> for EnvironmentRecord {
    fn from(env: Environment) -> Self {
        EnvironmentRecord::Resolved(env)
    }
}

impl From<NormalizedEnvironment> for EnvironmentRecord {
    fn from(env: NormalizedEnvironment) -> Self {
        EnvironmentRecord::Normalized(env)
    }
}

impl<'de> Deserialize<'de> for EnvironmentRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error;

        let value = serde_json::Value::deserialize(deserializer)?;
        let has_executable = value
            .as_object()
            .map(|obj| obj.contains_key("executable"))
            .ok_or_else(|| D::Error::custom("environment record must be an object"))?;

        if has_executable {
            serde_json::from_value(value)
                .map(EnvironmentRecord::Resolved)
                .map_err(D::Error::custom)
        } else {
            serde_json::from_value(value)
                .map(EnvironmentRecord::Normalized)
                .map_err(D::Error::custom)
        }
    }
}
