//! Integration tests for display names and lookups over JSON records.
//!
//! Records are written the way the discovery service reports them
//! (camelCase JSON) and go through the public API only.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures::future::{self, BoxFuture, FutureExt};
use runtime_env::{
    classify, DisplayConfig, EnvInfoError, Environment, EnvironmentApi, EnvironmentInfo,
    EnvironmentKind, EnvironmentRecord,
};
use serde_json::json;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Discovery service stub backed by JSON fixtures.
struct FixtureApi {
    known: Vec<Environment>,
    live: HashMap<String, Environment>,
    resolve_calls: AtomicUsize,
}

impl FixtureApi {
    fn new(known: Vec<serde_json::Value>, live: Vec<serde_json::Value>) -> Arc<Self> {
        let parse = |v: serde_json::Value| -> Environment { serde_json::from_value(v).unwrap() };
        Arc::new(Self {
            known: known.into_iter().map(parse).collect(),
            live: live
                .into_iter()
                .map(parse)
                .map(|env| (env.id.clone(), env))
                .collect(),
            resolve_calls: AtomicUsize::new(0),
        })
    }
}

impl EnvironmentApi for FixtureApi {
    fn known_environments(&self) -> Vec<Environment> {
        self.known.clone()
    }

    fn resolve_environment<'a>(
        &'a self,
        id: &'a str,
    ) -> BoxFuture<'a, anyhow::Result<Option<Environment>>> {
        self.resolve_calls.fetch_add(1, Ordering::SeqCst);
        future::ready(Ok(self.live.get(id).cloned())).boxed()
    }
}

fn runtime_config() -> DisplayConfig {
    DisplayConfig {
        runtime_label: "Runtime".to_string(),
        shorten_home: false,
    }
}

fn info_with(api: &Arc<FixtureApi>) -> EnvironmentInfo {
    let handle: Arc<dyn EnvironmentApi> = api.clone();
    EnvironmentInfo::with_config(Arc::new(handle), runtime_config())
}

fn conda_foo() -> serde_json::Value {
    json!({
        "id": "/opt/conda/envs/foo",
        "executable": {
            "uri": "/opt/conda/envs/foo/bin/python",
            "sysPrefix": "/opt/conda/envs/foo"
        },
        "environment": { "type": "Conda", "name": "foo", "folderUri": "/opt/conda/envs/foo" },
        "version": {
            "major": 3,
            "minor": 10,
            "micro": 13,
            "sysVersion": "3.10.13 | packaged by conda-forge |"
        },
        "tools": ["Conda"]
    })
}

#[test]
fn test_resolved_record_display_name() {
    init_logging();
    let api = FixtureApi::new(vec![], vec![]);
    let info = info_with(&api);

    let record: EnvironmentRecord = serde_json::from_value(json!({
        "id": "/home/me/envs/myenv/bin/python",
        "executable": { "uri": "/home/me/envs/myenv/bin/python" },
        "environment": { "folderUri": "/home/me/envs/myenv" },
        "version": { "major": 3, "minor": 11, "micro": 4 },
        "tools": ["VirtualEnv"]
    }))
    .unwrap();

    assert_eq!(info.display_name(&record), "myenv (Runtime 3.11.4)");
}

#[test]
fn test_conda_without_python_record_is_bare_name() {
    let api = FixtureApi::new(vec![], vec![]);
    let info = info_with(&api);

    let record: EnvironmentRecord = serde_json::from_value(json!({
        "id": "/opt/conda/envs/envX",
        "executable": {},
        "environment": { "type": "Conda", "folderUri": "/opt/conda/envs/envX" },
        "tools": []
    }))
    .unwrap();

    assert_eq!(info.display_name(&record), "envX");
}

#[test]
fn test_normalized_record_uses_cached_version() {
    init_logging();
    let api = FixtureApi::new(vec![conda_foo()], vec![]);
    let info = info_with(&api);
    info.set_resolver(api.clone());

    let record: EnvironmentRecord = serde_json::from_value(json!({
        "id": "/opt/conda/envs/foo",
        "envType": "Conda",
        "envPath": "/opt/conda/envs/foo"
    }))
    .unwrap();

    // sysVersion is reduced to its numeric prefix.
    assert_eq!(info.display_name(&record), "Runtime 3.10.13 (foo: Conda)");
}

#[test]
fn test_classify_fixture() {
    let env: Environment = serde_json::from_value(json!({
        "id": "wrapped",
        "executable": { "uri": "/home/me/.virtualenvs/wrapped/bin/python" },
        "tools": ["VirtualEnv", "VirtualEnvWrapper"]
    }))
    .unwrap();
    assert_eq!(classify(&env), EnvironmentKind::VirtualEnvWrapper);
}

#[test]
fn test_uninitialized_cache_is_an_error_but_missing_id_is_not() {
    let api = FixtureApi::new(vec![conda_foo()], vec![]);
    let info = info_with(&api);

    assert!(matches!(
        info.cached_environment(Some("/opt/conda/envs/foo")),
        Err(EnvInfoError::Uninitialized)
    ));
    assert!(info.cached_sys_prefix(None).unwrap().is_none());

    info.set_resolver(api.clone());
    assert_eq!(
        info.cached_sys_prefix(Some("/opt/conda/envs/foo")).unwrap(),
        Some(PathBuf::from("/opt/conda/envs/foo"))
    );
    assert!(info.cached_environment(Some("/nowhere")).unwrap().is_none());
}

#[tokio::test]
async fn test_cached_version_skips_live_resolver() {
    init_logging();
    let api = FixtureApi::new(vec![conda_foo()], vec![conda_foo()]);
    let info = info_with(&api);
    info.set_resolver(api.clone());

    let version = info.version(Some("/opt/conda/envs/foo")).await.unwrap();
    assert_eq!(
        version.as_deref(),
        Some("3.10.13 | packaged by conda-forge |")
    );
    assert_eq!(api.resolve_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_live_resolve_when_not_cached() {
    init_logging();
    let api = FixtureApi::new(vec![], vec![conda_foo()]);
    let info = info_with(&api);
    info.set_resolver(api.clone());

    let prefix = info.sys_prefix(Some("/opt/conda/envs/foo")).await.unwrap();
    assert_eq!(prefix, Some(PathBuf::from("/opt/conda/envs/foo")));
    assert_eq!(api.resolve_calls.load(Ordering::SeqCst), 1);

    // Unknown ids come back empty, once per call, without an error.
    assert!(info.version(Some("/nowhere")).await.unwrap().is_none());
    assert!(info.version(Some("/nowhere")).await.unwrap().is_none());
    assert_eq!(api.resolve_calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_describe_serializes() {
    let api = FixtureApi::new(vec![], vec![conda_foo()]);
    let info = info_with(&api);

    let summary = info
        .describe("/opt/conda/envs/foo")
        .await
        .unwrap()
        .expect("fixture should resolve");
    assert_eq!(
        serde_json::to_value(&summary).unwrap(),
        json!({
            "id": "/opt/conda/envs/foo",
            "display_name": "foo (Runtime 3.10.13)",
            "kind": "Conda",
            "version": "3.10.13 | packaged by conda-forge |",
            "sys_prefix": "/opt/conda/envs/foo"
        })
    );
}

#[test]
fn test_config_from_file() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("runtime-env.json");
    std::fs::write(&path, r#"{"runtime_label": "CPython", "shorten_home": false}"#)
        .expect("Failed to write config");

    let config = DisplayConfig::load_from(&path).unwrap();
    assert_eq!(config.runtime_label, "CPython");
    assert!(!config.shorten_home);

    std::fs::write(&path, "not json").expect("Failed to write config");
    assert!(matches!(
        DisplayConfig::load_from(&path),
        Err(EnvInfoError::Config { .. })
    ));
    assert!(matches!(
        DisplayConfig::load_from(&dir.path().join("missing.json")),
        Err(EnvInfoError::Config { .. })
    ));
}
