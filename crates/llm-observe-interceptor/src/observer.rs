//! The observation context: installation, control, status and query.

use std::fmt;
use std::sync::{Arc, Mutex, OnceLock};

use llm_observe_core::{CallRecord, ObserveConfig, Result};
use llm_observe_observability::spans;
use llm_observe_transport::{Destination, Dispatcher, HttpConfig, HttpTransport, Transport};
use serde::Serialize;

use crate::TRACING_TARGET;
use crate::chat::{ChatCompletions, ObservedChat, ObservedConstructor};
use crate::generation::{self, GenerationFn, GenerationFunctions, GenerationKind, GenerationResult};
use crate::state::PatchState;

/// Placeholder reported by [`Observer::status`] when a token is configured.
pub const MASKED_TOKEN: &str = "***";

static GLOBAL: OnceLock<Observer> = OnceLock::new();

/// Builds the transport at install time from the observer's configuration.
pub type TransportFactory =
    Arc<dyn Fn(&ObserveConfig) -> Result<Arc<dyn Transport>> + Send + Sync>;

/// Default factory: a reqwest client bounded by the configured timeout.
pub fn http_transport_factory() -> TransportFactory {
    Arc::new(|config: &ObserveConfig| -> Result<Arc<dyn Transport>> {
        let transport = HttpTransport::new(HttpConfig::from(config))?;
        Ok(Arc::new(transport))
    })
}

/// Outcome of [`Observer::install`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    Installed,
    AlreadyInstalled,
    /// Installation failed; new wrappers pass calls through unobserved.
    Failed,
}

impl InstallOutcome {
    pub fn is_installed(self) -> bool {
        !matches!(self, Self::Failed)
    }
}

/// Snapshot returned by [`Observer::status`]. Never holds the raw token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObserverStatus {
    pub enabled: bool,
    pub installed: bool,
    pub debug: bool,
    pub url: Option<String>,
    pub token: Option<&'static str>,
}

struct ObserverInner {
    state: PatchState,
    config: ObserveConfig,
    destination: Option<Destination>,
    transport: OnceLock<Arc<dyn Transport>>,
    transport_factory: TransportFactory,
    install_lock: Mutex<()>,
}

/// Owns one isolated observation setup.
///
/// Cloning is cheap and every clone shares the same state. Hosts that want a
/// single process-wide instance use [`Observer::global`]; tests build their
/// own with an injected transport.
///
/// ```
/// # tokio_test::block_on(async {
/// use std::sync::Arc;
///
/// use llm_observe_interceptor::{InstallOutcome, Observer};
/// use llm_observe_transport::InMemoryTransport;
///
/// let transport = Arc::new(InMemoryTransport::new());
/// let observer = Observer::builder()
///     .url("http://localhost:9999")
///     .token("secret")
///     .transport(transport.clone())
///     .build();
///
/// assert_eq!(observer.enable(), InstallOutcome::Installed);
/// assert_eq!(observer.enable(), InstallOutcome::AlreadyInstalled);
/// assert_eq!(observer.status().token, Some("***"));
/// # })
/// ```
#[derive(Clone)]
pub struct Observer {
    inner: Arc<ObserverInner>,
}

impl Observer {
    pub fn builder() -> ObserverBuilder {
        ObserverBuilder::new()
    }

    pub fn new(config: ObserveConfig) -> Self {
        Self::builder().config(config).build()
    }

    /// Builds an observer from the `LLM_OBSERVE_*` environment variables.
    pub fn from_env() -> Self {
        Self::new(ObserveConfig::from_env())
    }

    /// The process-wide observer, built from the environment on first use.
    pub fn global() -> &'static Observer {
        GLOBAL.get_or_init(Self::from_env)
    }

    /// Installs the observation layer. Idempotent.
    ///
    /// Builds the transport through the factory unless one was injected.
    /// Failure is reported as a warning and leaves the observer uninstalled,
    /// so a later call retries.
    pub fn install(&self) -> InstallOutcome {
        let _span = spans::install().entered();
        let _guard = self
            .inner
            .install_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if self.inner.state.is_installed() {
            if self.is_debug() {
                tracing::info!(target: TRACING_TARGET, "Observation layer already installed");
            }
            return InstallOutcome::AlreadyInstalled;
        }

        if self.inner.transport.get().is_none() {
            match (self.inner.transport_factory)(&self.inner.config) {
                Ok(transport) => {
                    let _ = self.inner.transport.set(transport);
                }
                Err(err) => {
                    tracing::warn!(
                        target: TRACING_TARGET,
                        error = %err,
                        "Failed to install observation layer, calls pass through unobserved"
                    );
                    return InstallOutcome::Failed;
                }
            }
        }

        self.inner.state.mark_installed();
        tracing::debug!(
            target: TRACING_TARGET,
            endpoint = self.endpoint().unwrap_or("unconfigured"),
            "Observation layer installed"
        );
        InstallOutcome::Installed
    }

    /// Turns observation on, installing on first use.
    pub fn enable(&self) -> InstallOutcome {
        self.inner.state.set_enabled(true);
        if self.inner.state.is_installed() {
            return InstallOutcome::AlreadyInstalled;
        }
        self.install()
    }

    /// Turns observation off for wrappers created from now on.
    ///
    /// Existing wrappers keep recording; nothing is uninstalled.
    pub fn disable(&self) {
        self.inner.state.set_enabled(false);
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.state.is_enabled()
    }

    pub fn is_installed(&self) -> bool {
        self.inner.state.is_installed()
    }

    pub fn set_debug(&self, debug: bool) {
        self.inner.state.set_debug(debug);
    }

    pub fn is_debug(&self) -> bool {
        self.inner.state.is_debug()
    }

    pub fn config(&self) -> &ObserveConfig {
        &self.inner.config
    }

    /// The resolved collection endpoint, when a URL and token are configured.
    pub fn endpoint(&self) -> Option<&str> {
        self.inner.destination.as_ref().map(Destination::endpoint)
    }

    pub fn status(&self) -> ObserverStatus {
        let config = &self.inner.config;
        ObserverStatus {
            enabled: self.is_enabled(),
            installed: self.is_installed(),
            debug: self.is_debug(),
            url: config.url.clone(),
            token: config
                .token
                .as_deref()
                .filter(|token| !token.is_empty())
                .map(|_| MASKED_TOKEN),
        }
    }

    /// Wraps a chat client. Pass-through unless installed and enabled.
    pub fn instrument_chat<C: ChatCompletions>(&self, client: C) -> ObservedChat<C> {
        if self.inner.state.is_active() {
            ObservedChat::observed(client, self.clone())
        } else {
            self.note_passthrough("chat client");
            ObservedChat::passthrough(client)
        }
    }

    /// Wraps a client constructor so every client it builds is instrumented.
    pub fn chat_constructor<F>(&self, construct: F) -> ObservedConstructor<F> {
        ObservedConstructor::new(construct, self.clone())
    }

    /// Wraps one generation function. Pass-through unless installed and enabled.
    pub fn wrap_generation<P, R, E>(
        &self,
        kind: GenerationKind,
        function: GenerationFn<P, R, E>,
    ) -> GenerationFn<P, R, E>
    where
        P: Serialize + fmt::Debug + Send + 'static,
        R: GenerationResult + Send + 'static,
        E: fmt::Display + Send + 'static,
    {
        if self.inner.state.is_active() {
            generation::observe(self.clone(), kind, function)
        } else {
            self.note_passthrough(kind.method());
            function
        }
    }

    /// Wraps every function in the table and hands back the wrapped table.
    ///
    /// Callers must use the returned functions in place of the originals;
    /// the originals stay unobserved.
    pub fn wrap_generation_functions<P, R, E>(
        &self,
        functions: GenerationFunctions<P, R, E>,
    ) -> GenerationFunctions<P, R, E>
    where
        P: Serialize + fmt::Debug + Send + 'static,
        R: GenerationResult + Send + 'static,
        E: fmt::Display + Send + 'static,
    {
        functions
            .into_map()
            .into_iter()
            .map(|(kind, function)| (kind, self.wrap_generation(kind, function)))
            .collect()
    }

    /// Fetches up to `limit` recent records, most recent first.
    ///
    /// Works without installing. Empty when unconfigured or on any failure.
    pub async fn get_recent(&self, limit: usize) -> Vec<CallRecord> {
        let Some(destination) = self.inner.destination.as_ref() else {
            return Vec::new();
        };

        let transport = match self.inner.transport.get() {
            Some(transport) => Arc::clone(transport),
            None => match (self.inner.transport_factory)(&self.inner.config) {
                Ok(transport) => transport,
                Err(err) => {
                    if self.is_debug() {
                        tracing::warn!(target: TRACING_TARGET, error = %err, "Failed to create transport");
                    }
                    return Vec::new();
                }
            },
        };

        Dispatcher::new(transport.as_ref(), Some(destination))
            .with_debug(self.is_debug())
            .recent(limit)
            .await
    }

    /// Hands a completed record to the dispatcher. Never fails.
    pub async fn dispatch(&self, record: CallRecord) {
        let Some(transport) = self.inner.transport.get() else {
            return;
        };
        Dispatcher::new(transport.as_ref(), self.inner.destination.as_ref())
            .with_debug(self.is_debug())
            .send(record)
            .await;
    }

    fn note_passthrough(&self, surface: &str) {
        if self.is_debug() {
            tracing::info!(
                target: TRACING_TARGET,
                surface,
                installed = self.is_installed(),
                enabled = self.is_enabled(),
                "Observation inactive, wrapper passes calls through"
            );
        }
    }
}

impl fmt::Debug for Observer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observer")
            .field("status", &self.status())
            .field("destination", &self.inner.destination)
            .finish()
    }
}

/// Builder for [`Observer`].
///
/// `build` installs right away when the configuration is enabled.
#[derive(Default)]
pub struct ObserverBuilder {
    config: ObserveConfig,
    transport: Option<Arc<dyn Transport>>,
    transport_factory: Option<TransportFactory>,
}

impl ObserverBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: ObserveConfig) -> Self {
        self.config = config;
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.config.url = Some(url.into());
        self
    }

    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.config.token = Some(token.into());
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.config.debug = debug;
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.config.enabled = enabled;
        self
    }

    pub fn http_timeout(mut self, timeout_secs: u64) -> Self {
        self.config.http_timeout = timeout_secs;
        self
    }

    /// Uses this transport instead of building the HTTP one.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Builds the transport with `factory` on install instead of the HTTP
    /// default. Ignored when a transport is injected directly.
    pub fn transport_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn(&ObserveConfig) -> Result<Arc<dyn Transport>> + Send + Sync + 'static,
    {
        self.transport_factory = Some(Arc::new(factory));
        self
    }

    pub fn build(self) -> Observer {
        let transport = OnceLock::new();
        if let Some(injected) = self.transport {
            let _ = transport.set(injected);
        }

        let observer = Observer {
            inner: Arc::new(ObserverInner {
                state: PatchState::new(self.config.enabled, self.config.debug),
                destination: Destination::from_config(&self.config),
                config: self.config,
                transport,
                transport_factory: self
                    .transport_factory
                    .unwrap_or_else(http_transport_factory),
                install_lock: Mutex::new(()),
            }),
        };

        if observer.is_enabled() {
            observer.install();
        }
        observer
    }
}
