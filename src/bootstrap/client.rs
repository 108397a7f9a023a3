//! Resilient engine construction.
//!
//! # States
//! - Idle: nothing done yet
//! - Resolving: asking the cache for a local WSDL path
//! - Constructing: building the engine from that path
//! - Succeeded / Failed: terminal
//!
//! # State Transitions
//! ```text
//! Idle → Resolving(force = false)
//! Resolving → Constructing: cache returned a path
//! Resolving → Failed: FetchError (the cache already spent its own budget)
//! Constructing → Succeeded: engine built
//! Constructing → Resolving(force = true): RemoteFault, attempts left
//! Constructing → Failed: RemoteFault with no attempts left, or other engine error
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use crate::bootstrap::engine::{EngineError, SoapEngine};
use crate::cache::WsdlCache;
use crate::config::schema::{BootstrapConfig, BootstrapDefaults, RetryConfig};
use crate::error::{BootstrapError, BootstrapResult, ConfigError};
use crate::resilience::backoff::backoff_delay;
use crate::transport::{configure, ClientOptions, EngineOptions, HttpFetcher, ProxyRegistry};

/// Bootstrap progress. Terminal states carry the outcome.
#[derive(Debug)]
pub enum BootstrapState<C> {
    Idle,
    Resolving { force_refresh: bool },
    Constructing { wsdl: PathBuf },
    Succeeded(C),
    Failed(BootstrapError),
}

impl<C> BootstrapState<C> {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Resolving { .. } => "resolving",
            Self::Constructing { .. } => "constructing",
            Self::Succeeded(_) => "succeeded",
            Self::Failed(_) => "failed",
        }
    }
}

/// Builds a SOAP engine client from a cached WSDL, refreshing the cache and
/// retrying when the engine reports a SOAP fault.
pub struct ResilientBootstrap<E> {
    cache: WsdlCache,
    engine: E,
    engine_options: EngineOptions,
    defaults: BootstrapDefaults,
    retry: RetryConfig,
}

impl<E: SoapEngine> ResilientBootstrap<E> {
    pub fn new(cache: WsdlCache, engine: E, engine_options: EngineOptions) -> Self {
        Self {
            cache,
            engine,
            engine_options,
            defaults: BootstrapDefaults::default(),
            retry: RetryConfig::default(),
        }
    }

    /// Wire everything from a loaded config: proxies, defaults, cache and
    /// retry settings. `options` are the caller's client options; the
    /// config's own `[options]` table is not merged in.
    pub fn from_config(
        config: &BootstrapConfig,
        options: ClientOptions,
        engine: E,
    ) -> BootstrapResult<Self> {
        let registry = ProxyRegistry::new(config.proxies.clone());
        let transport = configure(options, &registry, &config.defaults)?;
        let fetcher = HttpFetcher::new(&transport.client)?;
        let cache = WsdlCache::from_config(&config.cache, Arc::new(fetcher));

        Ok(Self::new(cache, engine, transport.engine)
            .with_defaults(config.defaults.clone())
            .with_retry(config.bootstrap.retry.clone()))
    }

    pub fn with_defaults(mut self, defaults: BootstrapDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn cache(&self) -> &WsdlCache {
        &self.cache
    }

    pub fn engine_options(&self) -> &EngineOptions {
        &self.engine_options
    }

    /// Construct the engine client for `source`, or for the default WSDL
    /// when `source` is `None`.
    pub fn construct(&self, source: Option<&str>) -> BootstrapResult<E::Client> {
        let source = match source.or(self.defaults.wsdl.as_deref()) {
            Some(source) => source,
            None => return Err(ConfigError::MissingWsdl.into()),
        };

        let span = tracing::info_span!("bootstrap", source);
        let _enter = span.enter();

        let mut attempts = 0;
        let mut state = BootstrapState::Idle;
        loop {
            state = match self.step(source, state, &mut attempts) {
                BootstrapState::Succeeded(client) => {
                    tracing::info!(attempts, "Engine constructed");
                    return Ok(client);
                }
                BootstrapState::Failed(e) => {
                    tracing::error!(attempts, error = %e, "Bootstrap failed");
                    return Err(e);
                }
                next => {
                    tracing::debug!(state = next.name(), "Bootstrap transition");
                    next
                }
            };
        }
    }

    fn step(
        &self,
        source: &str,
        state: BootstrapState<E::Client>,
        attempts: &mut u32,
    ) -> BootstrapState<E::Client> {
        match state {
            BootstrapState::Idle => BootstrapState::Resolving {
                force_refresh: false,
            },
            BootstrapState::Resolving { force_refresh } => {
                match self.cache.resolve(source, force_refresh) {
                    Ok(wsdl) => BootstrapState::Constructing { wsdl },
                    Err(e) => BootstrapState::Failed(e.into()),
                }
            }
            BootstrapState::Constructing { wsdl } => {
                *attempts += 1;
                match self.engine.construct(&wsdl, &self.engine_options) {
                    Ok(client) => BootstrapState::Succeeded(client),
                    Err(EngineError::Fault(fault)) => {
                        if *attempts >= self.retry.max_attempts.max(1) {
                            return BootstrapState::Failed(BootstrapError::FaultRetriesExhausted {
                                attempts: *attempts,
                                last_fault: fault,
                            });
                        }

                        let delay = backoff_delay(*attempts, &self.retry);
                        tracing::warn!(
                            attempt = *attempts,
                            delay_ms = delay.as_millis() as u64,
                            fault = %fault,
                            "Engine raised a SOAP fault, refreshing WSDL"
                        );
                        thread::sleep(delay);

                        BootstrapState::Resolving {
                            force_refresh: true,
                        }
                    }
                    Err(EngineError::Other(message)) => {
                        BootstrapState::Failed(BootstrapError::Engine(message))
                    }
                }
            }
            terminal => terminal,
        }
    }
}

impl<E> std::fmt::Debug for ResilientBootstrap<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResilientBootstrap")
            .field("cache", &self.cache)
            .field("default_wsdl", &self.defaults.wsdl)
            .field("max_attempts", &self.retry.max_attempts)
            .finish()
    }
}

/// One-shot bootstrap with default settings: no known proxies, no class map
/// defaults, default cache and retry budgets.
pub fn bootstrap<E: SoapEngine>(
    cache_dir: impl Into<PathBuf>,
    options: ClientOptions,
    source: &str,
    engine: E,
) -> BootstrapResult<E::Client> {
    let transport = configure(options, &ProxyRegistry::default(), &BootstrapDefaults::default())?;
    let fetcher = HttpFetcher::new(&transport.client)?;
    let cache = WsdlCache::new(cache_dir, Arc::new(fetcher));

    ResilientBootstrap::new(cache, engine, transport.engine).construct(Some(source))
}
