//! End-to-end bootstrap scenarios against a mock WSDL server.

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use wsdl_bootstrap::bootstrap::ResilientBootstrap;
use wsdl_bootstrap::config::{BootstrapConfig, RetryConfig};
use wsdl_bootstrap::transport::{configure, HttpFetcher, ProxyRegistry};
use wsdl_bootstrap::{bootstrap, BootstrapError, ClientOptions, FetchError, WsdlCache};

mod common;

use common::{seed_cache, start_wsdl_server, RecordingEngine, WSDL_BODY};

fn no_delay(max_attempts: u32) -> RetryConfig {
    RetryConfig {
        max_attempts,
        base_delay_ms: 0,
        max_delay_ms: 0,
    }
}

fn resilient(
    cache_dir: &std::path::Path,
    engine: RecordingEngine,
) -> ResilientBootstrap<RecordingEngine> {
    let transport = configure(
        ClientOptions::new(),
        &ProxyRegistry::default(),
        &Default::default(),
    )
    .unwrap();
    let fetcher = HttpFetcher::new(&transport.client).unwrap();
    let cache = WsdlCache::new(cache_dir, Arc::new(fetcher));
    ResilientBootstrap::new(cache, engine, transport.engine).with_retry(no_delay(5))
}

#[test]
fn test_empty_cache_fetches_once_and_constructs() {
    let dir = tempfile::tempdir().unwrap();
    let (server, mock) = start_wsdl_server("/ws.wsdl", WSDL_BODY, 1);
    let source = format!("{}/ws.wsdl", server.url());
    let engine = RecordingEngine::new();

    let handle = bootstrap(dir.path(), ClientOptions::new(), &source, engine.clone()).unwrap();

    mock.assert();
    assert_eq!(handle.contents, WSDL_BODY);
    assert_eq!(engine.constructs(), 1);

    let entries: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "wsdl"))
        .collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn test_fresh_cache_is_reused_without_fetch() {
    let dir = tempfile::tempdir().unwrap();
    let (server, mock) = start_wsdl_server("/ws.wsdl", "<remote/>", 0);
    let source = format!("{}/ws.wsdl", server.url());
    seed_cache(dir.path(), &source, WSDL_BODY, Duration::from_secs(30 * 60));

    let engine = RecordingEngine::new();
    let handle = resilient(dir.path(), engine.clone())
        .construct(Some(&source))
        .unwrap();

    mock.assert();
    assert_eq!(handle.contents, WSDL_BODY);
}

#[test]
fn test_stale_cache_is_refetched_and_overwritten() {
    let dir = tempfile::tempdir().unwrap();
    let (server, mock) = start_wsdl_server("/ws.wsdl", WSDL_BODY, 1);
    let source = format!("{}/ws.wsdl", server.url());
    let path = seed_cache(dir.path(), &source, "<old/>", Duration::from_secs(2 * 3600));

    let handle = resilient(dir.path(), RecordingEngine::new())
        .construct(Some(&source))
        .unwrap();

    mock.assert();
    assert_eq!(handle.wsdl, path);
    assert_eq!(fs::read_to_string(&path).unwrap(), WSDL_BODY);
}

#[test]
fn test_fault_on_fresh_cache_forces_refetch() {
    let dir = tempfile::tempdir().unwrap();
    let (server, mock) = start_wsdl_server("/ws.wsdl", WSDL_BODY, 1);
    let source = format!("{}/ws.wsdl", server.url());
    seed_cache(dir.path(), &source, "<outdated/>", Duration::from_secs(60));

    let engine = RecordingEngine::faulting(1);
    let handle = resilient(dir.path(), engine.clone())
        .construct(Some(&source))
        .unwrap();

    mock.assert();
    assert_eq!(engine.constructs(), 2);
    assert_eq!(handle.contents, WSDL_BODY);
}

#[test]
fn test_fault_with_failing_refetch_surfaces_fetch_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/ws.wsdl")
        .with_status(500)
        .expect(1)
        .create();
    let source = format!("{}/ws.wsdl", server.url());
    let path = seed_cache(dir.path(), &source, "<outdated/>", Duration::from_secs(60));

    let engine = RecordingEngine::faulting(1);
    let err = resilient(dir.path(), engine.clone())
        .construct(Some(&source))
        .unwrap_err();

    mock.assert();
    assert!(matches!(err, BootstrapError::Fetch(FetchError::Exhausted { .. })));
    assert_eq!(engine.constructs(), 1);
    // The failed refresh did not clobber the previous copy.
    assert_eq!(fs::read_to_string(path).unwrap(), "<outdated/>");
}

#[test]
fn test_repeated_forced_fetches_are_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let (server, mock) = start_wsdl_server("/ws.wsdl", WSDL_BODY, 2);
    let source = format!("{}/ws.wsdl", server.url());

    let cache = resilient(dir.path(), RecordingEngine::new()).cache().clone();
    let first = fs::read(cache.resolve(&source, true).unwrap()).unwrap();
    let second = fs::read(cache.resolve(&source, true).unwrap()).unwrap();

    mock.assert();
    assert_eq!(first, second);
}

#[test]
fn test_from_config_applies_retry_bound() {
    let dir = tempfile::tempdir().unwrap();
    let (server, mock) = start_wsdl_server("/ws.wsdl", WSDL_BODY, 2);
    let source = format!("{}/ws.wsdl", server.url());

    let mut config = BootstrapConfig::default();
    config.cache.dir = dir.path().to_path_buf();
    config.bootstrap.retry = no_delay(2);

    let engine = RecordingEngine::faulting(10);
    let err = ResilientBootstrap::from_config(&config, ClientOptions::new(), engine.clone())
        .unwrap()
        .construct(Some(&source))
        .unwrap_err();

    mock.assert();
    assert!(matches!(
        err,
        BootstrapError::FaultRetriesExhausted { attempts: 2, .. }
    ));
    assert_eq!(engine.constructs(), 2);
}
