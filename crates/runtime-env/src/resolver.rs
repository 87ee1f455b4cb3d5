//! Cached and live access to the environment discovery service.
//!
//! [`EnvironmentInfo`] holds the resolver handle that the synchronous
//! `cached_*` accessors read from, plus an [`ApiProvider`] the async
//! accessors use to reach the live service when the cache has nothing.
//!
//! ```ignore
//! let info = EnvironmentInfo::new(Arc::new(LazyApi::new(connect_discovery)));
//! info.set_resolver(api.clone());
//!
//! // Best effort, never touches the service
//! let version = info.cached_version(Some(&id))?;
//!
//! // Authoritative, falls back to a live resolve
//! let prefix = info.sys_prefix(Some(&id)).await?;
//! ```

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use futures::future::{self, BoxFuture, FutureExt};
use log::{debug, warn};
use serde::Serialize;
use tokio::sync::OnceCell;

use crate::classify::classify;
use crate::config::DisplayConfig;
use crate::display::{display_path, format_display_name, format_resolved};
use crate::environment::{Environment, EnvironmentRecord};
use crate::error::{EnvInfoError, Result};
use crate::kind::EnvironmentKind;

/// A live handle to the discovery service.
pub trait EnvironmentApi: Send + Sync {
    /// Snapshot of the environments the service has already discovered.
    fn known_environments(&self) -> Vec<Environment>;

    /// Resolve an environment by id. `Ok(None)` if the id is not recognized.
    fn resolve_environment<'a>(
        &'a self,
        id: &'a str,
    ) -> BoxFuture<'a, anyhow::Result<Option<Environment>>>;
}

/// Source of the [`EnvironmentApi`] handle. Acquisition may be slow the
/// first time and should be cheap afterwards.
pub trait ApiProvider: Send + Sync {
    fn acquire(&self) -> BoxFuture<'_, anyhow::Result<Arc<dyn EnvironmentApi>>>;
}

/// An already-connected handle is its own provider.
impl ApiProvider for Arc<dyn EnvironmentApi> {
    fn acquire(&self) -> BoxFuture<'_, anyhow::Result<Arc<dyn EnvironmentApi>>> {
        future::ready(Ok(Arc::clone(self))).boxed()
    }
}

type ApiInit =
    Box<dyn Fn() -> BoxFuture<'static, anyhow::Result<Arc<dyn EnvironmentApi>>> + Send + Sync>;

/// Provider that runs an async initializer once and reuses its handle.
///
/// A failed initialization is not cached; the next `acquire` retries.
pub struct LazyApi {
    init: ApiInit,
    api: OnceCell<Arc<dyn EnvironmentApi>>,
}

impl LazyApi {
    pub fn new<F, Fut>(init: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Arc<dyn EnvironmentApi>>> + Send + 'static,
    {
        Self {
            init: Box::new(move || init().boxed()),
            api: OnceCell::new(),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.api.initialized()
    }
}

impl ApiProvider for LazyApi {
    fn acquire(&self) -> BoxFuture<'_, anyhow::Result<Arc<dyn EnvironmentApi>>> {
        async move {
            self.api
                .get_or_try_init(|| (self.init)())
                .await
                .cloned()
        }
        .boxed()
    }
}

/// Presentation facts for one environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvironmentSummary {
    pub id: String,
    pub display_name: String,
    pub kind: EnvironmentKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sys_prefix: Option<PathBuf>,
}

fn version_of(env: &Environment) -> Option<String> {
    env.version.as_ref()?.version_string()
}

fn sys_prefix_of(env: &Environment) -> Option<PathBuf> {
    env.executable.sys_prefix.clone()
}

/// Context shared by everything that needs environment metadata.
pub struct EnvironmentInfo {
    config: DisplayConfig,
    provider: Arc<dyn ApiProvider>,
    /// Set once at startup, read by the `cached_*` accessors.
    resolver: RwLock<Option<Arc<dyn EnvironmentApi>>>,
}

impl EnvironmentInfo {
    pub fn new(provider: Arc<dyn ApiProvider>) -> Self {
        Self::with_config(provider, DisplayConfig::default())
    }

    pub fn with_config(provider: Arc<dyn ApiProvider>, config: DisplayConfig) -> Self {
        Self {
            config,
            provider,
            resolver: RwLock::new(None),
        }
    }

    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    /// Install the handle the cached accessors read from. May be called
    /// again to replace it.
    pub fn set_resolver(&self, handle: Arc<dyn EnvironmentApi>) {
        *self
            .resolver
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(handle);
    }

    fn resolver(&self) -> Option<Arc<dyn EnvironmentApi>> {
        self.resolver
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn lookup_known<T>(
        resolver: &dyn EnvironmentApi,
        id: &str,
        field: impl Fn(&Environment) -> Option<T>,
    ) -> Option<T> {
        resolver
            .known_environments()
            .iter()
            .find(|env| env.id == id)
            .and_then(field)
    }

    fn cached<T>(
        &self,
        id: Option<&str>,
        field: impl Fn(&Environment) -> Option<T>,
    ) -> Result<Option<T>> {
        let Some(id) = id else {
            return Ok(None);
        };
        let resolver = self.resolver().ok_or(EnvInfoError::Uninitialized)?;
        Ok(Self::lookup_known(resolver.as_ref(), id, field))
    }

    /// Version string of a known environment.
    ///
    /// # Errors
    /// [`EnvInfoError::Uninitialized`] if [`set_resolver`](Self::set_resolver)
    /// has not been called. A missing `id` returns `Ok(None)` first.
    pub fn cached_version(&self, id: Option<&str>) -> Result<Option<String>> {
        self.cached(id, version_of)
    }

    pub fn cached_sys_prefix(&self, id: Option<&str>) -> Result<Option<PathBuf>> {
        self.cached(id, sys_prefix_of)
    }

    pub fn cached_environment(&self, id: Option<&str>) -> Result<Option<Environment>> {
        self.cached(id, |env| Some(env.clone()))
    }

    /// Cache first, then a live resolve. An uninitialized cache is skipped
    /// rather than reported. Not-found is logged and returned as `None`.
    async fn resolve_field<T>(
        &self,
        id: Option<&str>,
        what: &str,
        field: impl Fn(&Environment) -> Option<T>,
    ) -> Result<Option<T>> {
        let Some(id) = id else {
            return Ok(None);
        };

        if let Some(resolver) = self.resolver() {
            if let Some(value) = Self::lookup_known(resolver.as_ref(), id, &field) {
                debug!("Cache hit for {what} of {}", self.display_id(id));
                return Ok(Some(value));
            }
        }

        let api = self.provider.acquire().await?;
        debug!("Resolving {what} of {} via live API", self.display_id(id));
        let value = api.resolve_environment(id).await?.as_ref().and_then(field);

        if value.is_none() {
            warn!("Unable to resolve {what} for environment {}", self.display_id(id));
        }
        Ok(value)
    }

    pub async fn version(&self, id: Option<&str>) -> Result<Option<String>> {
        self.resolve_field(id, "version", version_of).await
    }

    pub async fn sys_prefix(&self, id: Option<&str>) -> Result<Option<PathBuf>> {
        self.resolve_field(id, "sys prefix", sys_prefix_of).await
    }

    pub async fn environment(&self, id: Option<&str>) -> Result<Option<Environment>> {
        self.resolve_field(id, "environment", |env| Some(env.clone()))
            .await
    }

    /// Resolve an environment and collect its presentation facts.
    pub async fn describe(&self, id: &str) -> Result<Option<EnvironmentSummary>> {
        let Some(env) = self.environment(Some(id)).await? else {
            return Ok(None);
        };
        Ok(Some(EnvironmentSummary {
            id: env.id.clone(),
            display_name: format_resolved(&env, &self.config.runtime_label),
            kind: classify(&env),
            version: version_of(&env),
            sys_prefix: sys_prefix_of(&env),
        }))
    }

    pub fn display_name(&self, record: &EnvironmentRecord) -> String {
        format_display_name(record, self)
    }

    fn display_id(&self, id: &str) -> String {
        display_path(Path::new(id), self.config.shorten_home)
    }
}
