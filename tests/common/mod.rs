//! Shared utilities for integration tests.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

use wsdl_bootstrap::cache::cache_file_name;
use wsdl_bootstrap::{EngineError, EngineOptions, RemoteFault, SoapEngine};

pub const WSDL_BODY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<definitions xmlns="http://schemas.xmlsoap.org/wsdl/" name="EAISTO"/>"#;

/// Start a mock server answering `GET path` with `body`, expecting `hits` calls.
#[allow(dead_code)]
pub fn start_wsdl_server(path: &str, body: &str, hits: usize) -> (mockito::ServerGuard, mockito::Mock) {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", path)
        .with_status(200)
        .with_header("content-type", "text/xml")
        .with_body(body)
        .expect(hits)
        .create();
    (server, mock)
}

/// Write a cache entry for `source` as if it had been fetched `age` ago.
#[allow(dead_code)]
pub fn seed_cache(dir: &Path, source: &str, body: &str, age: Duration) -> PathBuf {
    let path = dir.join(cache_file_name(source));
    fs::write(&path, body).unwrap();
    File::options()
        .write(true)
        .open(&path)
        .unwrap()
        .set_modified(SystemTime::now() - age)
        .unwrap();
    path
}

/// What the engine handed back to the caller.
#[derive(Debug)]
#[allow(dead_code)]
pub struct EngineHandle {
    pub wsdl: PathBuf,
    pub contents: String,
}

#[derive(Default)]
struct EngineLog {
    constructs: AtomicU32,
    faults_left: AtomicU32,
    options: Mutex<Vec<EngineOptions>>,
}

/// Engine stub that reads the cached WSDL, records options, and raises a
/// SOAP fault for the first `faults` constructions.
#[derive(Clone, Default)]
pub struct RecordingEngine {
    log: Arc<EngineLog>,
}

#[allow(dead_code)]
impl RecordingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn faulting(faults: u32) -> Self {
        let engine = Self::default();
        engine.log.faults_left.store(faults, Ordering::SeqCst);
        engine
    }

    pub fn constructs(&self) -> u32 {
        self.log.constructs.load(Ordering::SeqCst)
    }

    pub fn last_options(&self) -> Option<EngineOptions> {
        self.log.options.lock().unwrap().last().cloned()
    }
}

impl SoapEngine for RecordingEngine {
    type Client = EngineHandle;

    fn construct(&self, wsdl: &Path, options: &EngineOptions) -> Result<EngineHandle, EngineError> {
        self.log.constructs.fetch_add(1, Ordering::SeqCst);
        self.log.options.lock().unwrap().push(options.clone());

        let faults_left = self.log.faults_left.load(Ordering::SeqCst);
        if faults_left > 0 {
            self.log.faults_left.store(faults_left - 1, Ordering::SeqCst);
            return Err(RemoteFault::new("WSDL", "Parsing WSDL: couldn't load").into());
        }

        let contents = fs::read_to_string(wsdl).map_err(|e| EngineError::Other(e.to_string()))?;
        Ok(EngineHandle {
            wsdl: wsdl.to_path_buf(),
            contents,
        })
    }
}
