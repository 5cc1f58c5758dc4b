//! Thread-safe join point between contributing modules and formatters.
//!
//! Modules call [`DocRegistry::register_spec`] and
//! [`DocRegistry::configure_api`] during startup, in any order and from any
//! thread. Rendering takes a [`Snapshot`] - a point-in-time copy of both
//! maps - under the lock, then releases it before any reflection or
//! serialization work runs, so long renders never block registrations.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::spec::ApiSpec;

/// Mount and enablement state for one registered API.
///
/// A spec without a config (or with a disabled one) is excluded from every
/// rendered document; that is the normal off switch, not an error.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base path prefix every endpoint path is appended to.
    pub path: String,
    /// Whether the API appears in rendered documents.
    pub enabled: bool,
    /// Overrides the spec's title in rendered output.
    pub title: Option<String>,
    /// Overrides the spec's version in rendered output.
    pub version: Option<String>,
    /// Headers the host server should attach to documentation responses.
    /// Stored and surfaced; never consumed by the rendering core.
    pub headers: BTreeMap<String, String>,
}

impl ApiConfig {
    /// Creates an enabled config mounting the API under `path`.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            enabled: true,
            title: None,
            version: None,
            headers: BTreeMap::new(),
        }
    }

    /// Excludes the API from rendered documents.
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Overrides the spec's title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Overrides the spec's version.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Adds a header for the host server to attach to doc responses.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

#[derive(Debug, Default)]
struct RegistryState {
    specs: BTreeMap<String, Arc<ApiSpec>>,
    configs: BTreeMap<String, ApiConfig>,
}

/// Process-lifetime store of contributed specs and their configurations.
///
/// An owned instance rather than process-global state: the server's
/// composition code creates one (or several, for independent documentation
/// surfaces) and shares it with its modules.
///
/// ## Examples
///
/// ```rust
/// use apidoc::{ApiConfig, ApiSpec, DocRegistry};
///
/// let registry = DocRegistry::new();
/// registry.register_spec(ApiSpec::new("auth", "Auth API", "1.0.0"));
/// registry.configure_api("auth", ApiConfig::new("/api/auth"));
///
/// let snapshot = registry.snapshot();
/// assert!(snapshot.spec("auth").is_some());
/// ```
#[derive(Debug, Default)]
pub struct DocRegistry {
    inner: Mutex<RegistryState>,
}

impl DocRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or wholesale-replaces the spec registered under its id.
    ///
    /// Safe to call concurrently from independently-initializing modules.
    /// For the same id the last writer wins; callers are expected to
    /// register each id once.
    pub fn register_spec(&self, spec: ApiSpec) {
        let mut state = self.lock();
        debug!(id = %spec.id, endpoints = spec.endpoints.len(), "registered api spec");
        state.specs.insert(spec.id.clone(), Arc::new(spec));
    }

    /// Inserts or replaces the configuration for an API id. Independent of
    /// spec registration; either may arrive first.
    pub fn configure_api(&self, id: impl Into<String>, config: ApiConfig) {
        let id = id.into();
        let mut state = self.lock();
        debug!(id = %id, path = %config.path, enabled = config.enabled, "configured api");
        state.configs.insert(id, config);
    }

    /// Takes a point-in-time, read-only copy of both maps.
    ///
    /// The copy is made under the lock so a formatter never observes a torn
    /// state; the lock is released before the snapshot is consumed.
    pub fn snapshot(&self) -> Snapshot {
        let state = self.lock();
        Snapshot {
            specs: state.specs.clone(),
            configs: state.configs.clone(),
        }
    }

    // Registration is last-writer-wins, so a panicked writer cannot leave a
    // torn entry; recover the data from a poisoned lock.
    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A point-in-time view of registered specs and configs.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    specs: BTreeMap<String, Arc<ApiSpec>>,
    configs: BTreeMap<String, ApiConfig>,
}

impl Snapshot {
    /// Looks up a registered spec.
    pub fn spec(&self, id: &str) -> Option<&ApiSpec> {
        self.specs.get(id).map(Arc::as_ref)
    }

    /// Looks up a registered config.
    pub fn config(&self, id: &str) -> Option<&ApiConfig> {
        self.configs.get(id)
    }

    /// Iterates `(id, config, spec)` for every API that is enabled and has
    /// both a spec and a config, in id order.
    pub fn enabled_apis(&self) -> impl Iterator<Item = (&str, &ApiConfig, &ApiSpec)> {
        self.configs
            .iter()
            .filter(|(_, config)| config.enabled)
            .filter_map(|(id, config)| {
                self.specs
                    .get(id)
                    .map(|spec| (id.as_str(), config, spec.as_ref()))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::RestMethod;
    use crate::spec::Endpoint;
    use tracing_test::traced_test;

    fn spec(id: &str) -> ApiSpec {
        ApiSpec::new(id, format!("{id} API"), "1.0.0")
            .add_endpoint(Endpoint::new(RestMethod::Get, "/ping"))
    }

    #[test]
    fn test_register_and_snapshot() {
        let registry = DocRegistry::new();
        registry.register_spec(spec("alpha"));
        registry.configure_api("alpha", ApiConfig::new("/api/alpha"));

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.spec("alpha").unwrap().title, "alpha API");
        assert_eq!(snapshot.config("alpha").unwrap().path, "/api/alpha");
    }

    #[test]
    fn test_reregistration_overwrites() {
        let registry = DocRegistry::new();
        registry.register_spec(spec("alpha"));
        registry.register_spec(ApiSpec::new("alpha", "Replaced", "2.0.0"));

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.spec("alpha").unwrap().title, "Replaced");
        assert!(snapshot.spec("alpha").unwrap().endpoints.is_empty());
    }

    #[test]
    fn test_snapshot_is_isolated_from_later_writes() {
        let registry = DocRegistry::new();
        registry.register_spec(spec("alpha"));

        let snapshot = registry.snapshot();
        registry.register_spec(spec("beta"));

        assert!(snapshot.spec("beta").is_none());
        assert!(registry.snapshot().spec("beta").is_some());
    }

    #[test]
    fn test_enabled_apis_filters_disabled_and_unconfigured() {
        let registry = DocRegistry::new();
        registry.register_spec(spec("on"));
        registry.configure_api("on", ApiConfig::new("/on"));
        registry.register_spec(spec("off"));
        registry.configure_api("off", ApiConfig::new("/off").disabled());
        registry.register_spec(spec("unconfigured"));
        registry.configure_api("ghost", ApiConfig::new("/ghost"));

        let snapshot = registry.snapshot();
        let ids: Vec<_> = snapshot.enabled_apis().map(|(id, _, _)| id).collect();
        assert_eq!(ids, ["on"]);
    }

    #[test]
    fn test_config_reconfiguration_overwrites() {
        let registry = DocRegistry::new();
        registry.register_spec(spec("alpha"));
        registry.configure_api("alpha", ApiConfig::new("/v1"));
        registry.configure_api("alpha", ApiConfig::new("/v1").disabled());

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.enabled_apis().count(), 0);
    }

    #[test]
    fn test_concurrent_registration_loses_nothing() {
        let registry = Arc::new(DocRegistry::new());
        let handles: Vec<_> = (0..16)
            .map(|n| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    let id = format!("api_{n}");
                    registry.register_spec(spec(&id));
                    registry.configure_api(&id, ApiConfig::new(format!("/api/{n}")));
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.enabled_apis().count(), 16);
    }

    #[test]
    fn test_config_headers_are_surfaced() {
        let registry = DocRegistry::new();
        registry.register_spec(spec("alpha"));
        registry.configure_api(
            "alpha",
            ApiConfig::new("/api/alpha")
                .with_header("Cache-Control", "no-store")
                .with_header("X-Docs", "alpha"),
        );

        let snapshot = registry.snapshot();
        let headers = &snapshot.config("alpha").unwrap().headers;
        assert_eq!(headers["Cache-Control"], "no-store");
        assert_eq!(headers["X-Docs"], "alpha");
    }

    #[traced_test]
    #[test]
    fn test_registration_is_logged() {
        let registry = DocRegistry::new();
        registry.register_spec(spec("alpha"));
        registry.configure_api("alpha", ApiConfig::new("/api/alpha"));

        assert!(logs_contain("registered api spec"));
        assert!(logs_contain("configured api"));
    }
}
