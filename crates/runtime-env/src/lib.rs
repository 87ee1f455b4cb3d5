//! Python environment metadata for display and classification.
//!
//! This crate turns environment records reported by a discovery service
//! into presentation facts without re-running discovery. It includes:
//!
//! - Classification of an environment into one [`EnvironmentKind`] from its
//!   tool tags
//! - Display names ("myenv (Python 3.11.4)") for both record shapes
//! - An [`EnvironmentInfo`] context with synchronous cached lookups and
//!   async lookups that fall back to the live service
//!
//! # Cached vs. live lookups
//!
//! The `cached_*` accessors read the collection of already-discovered
//! environments and fail with [`EnvInfoError::Uninitialized`] if no resolver
//! was installed. The async accessors try the same cache, then resolve the
//! id through the service, logging a warning when nothing is found.
//!
//! ```ignore
//! use runtime_env::{EnvironmentInfo, LazyApi};
//!
//! let info = EnvironmentInfo::new(Arc::new(LazyApi::new(connect)));
//! info.set_resolver(api);
//! let name = info.display_name(&record);
//! let prefix = info.sys_prefix(Some(&record_id)).await?;
//! ```

pub mod classify;
pub mod config;
pub mod display;
pub mod environment;
pub mod error;
pub mod kind;
pub mod resolver;

// Re-export key types
pub use classify::{classify, is_conda_environment_without_python};
pub use config::DisplayConfig;
pub use display::format_display_name;
pub use environment::{
    Environment, EnvironmentDetails, EnvironmentRecord, EnvironmentVersion, Executable,
    NormalizedEnvironment,
};
pub use error::EnvInfoError;
pub use kind::EnvironmentKind;
pub use resolver::{ApiProvider, EnvironmentApi, EnvironmentInfo, EnvironmentSummary, LazyApi};
