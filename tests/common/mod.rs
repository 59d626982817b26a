#![allow(dead_code)]

use std::process::{Command, Output};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tempfile::TempDir;

use joinmatch::api::{ApiError, HttpRequest, HttpResponse, HttpTransport};
use joinmatch::feed::{PageFetcher, PageRequest, PageResult};
use joinmatch::search::SearchBackend;

pub fn page<T>(items: Vec<T>, last: bool) -> PageResult<T> {
    PageResult::new(items, last)
}

pub fn letters(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Shared record of the requests a fake received.
#[derive(Clone)]
pub struct CallLog<R> {
    calls: Arc<Mutex<Vec<R>>>,
}

impl<R: Clone> CallLog<R> {
    fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn push(&self, call: R) {
        self.calls.lock().push(call);
    }

    pub fn count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn all(&self) -> Vec<R> {
        self.calls.lock().clone()
    }

    pub fn last(&self) -> Option<R> {
        self.calls.lock().last().cloned()
    }
}

impl CallLog<PageRequest> {
    pub fn page_indices(&self) -> Vec<u32> {
        self.calls.lock().iter().map(|r| r.page_index()).collect()
    }
}

type PageScript<T> =
    Box<dyn Fn(&PageRequest) -> (Duration, Result<PageResult<T>, ApiError>) + Send + Sync>;

/// A page fetcher answering from a closure, optionally after a delay.
pub struct ScriptedFetcher<T> {
    log: CallLog<PageRequest>,
    script: PageScript<T>,
}

impl<T> ScriptedFetcher<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new<F>(script: F) -> (Self, CallLog<PageRequest>)
    where
        F: Fn(&PageRequest) -> (Duration, Result<PageResult<T>, ApiError>) + Send + Sync + 'static,
    {
        let log = CallLog::new();
        (
            Self {
                log: log.clone(),
                script: Box::new(script),
            },
            log,
        )
    }

    /// Serve `pages` in order, immediately; the last one is marked last.
    pub fn pages(pages: Vec<Vec<T>>) -> (Self, CallLog<PageRequest>) {
        let total = pages.len();
        Self::new(move |request| {
            let index = request.page_index() as usize;
            let items = pages.get(index).cloned().unwrap_or_default();
            (Duration::ZERO, Ok(page(items, index + 1 >= total)))
        })
    }
}

impl<T> PageFetcher for ScriptedFetcher<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Item = T;

    async fn fetch_page(&self, request: &PageRequest) -> Result<PageResult<T>, ApiError> {
        self.log.push(request.clone());
        let (delay, result) = (self.script)(request);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        result
    }
}

type SearchScript<T> = Box<dyn Fn(&str) -> (Duration, Result<Vec<T>, ApiError>) + Send + Sync>;

/// A search backend answering from a closure, optionally after a delay.
pub struct ScriptedSearch<T> {
    log: CallLog<String>,
    script: SearchScript<T>,
}

impl<T> ScriptedSearch<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new<F>(script: F) -> (Self, CallLog<String>)
    where
        F: Fn(&str) -> (Duration, Result<Vec<T>, ApiError>) + Send + Sync + 'static,
    {
        let log = CallLog::new();
        (
            Self {
                log: log.clone(),
                script: Box::new(script),
            },
            log,
        )
    }
}

impl<T> SearchBackend for ScriptedSearch<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Item = T;

    async fn search(&self, query: &str) -> Result<Vec<T>, ApiError> {
        self.log.push(query.to_string());
        let (delay, result) = (self.script)(query);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        result
    }
}

type Responder = Box<dyn Fn(&HttpRequest) -> Result<HttpResponse, ApiError> + Send + Sync>;

/// An HTTP transport that records requests and answers from a closure.
pub struct MockTransport {
    log: CallLog<HttpRequest>,
    responder: Responder,
}

impl MockTransport {
    pub fn new<F>(responder: F) -> (Self, CallLog<HttpRequest>)
    where
        F: Fn(&HttpRequest) -> Result<HttpResponse, ApiError> + Send + Sync + 'static,
    {
        let log = CallLog::new();
        (
            Self {
                log: log.clone(),
                responder: Box::new(responder),
            },
            log,
        )
    }

    /// Answer every request with `status` and `body`.
    pub fn fixed(status: u16, body: &str) -> (Self, CallLog<HttpRequest>) {
        let body = body.to_string();
        Self::new(move |_| {
            let status = http::StatusCode::from_u16(status).expect("valid status");
            Ok(HttpResponse::new(status, body.clone()))
        })
    }
}

impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.log.push(request.clone());
        (self.responder)(&request)
    }
}

/// Runs the `joinmatch` binary against an isolated config directory.
pub struct JoinMatchTest {
    pub temp_dir: TempDir,
}

impl JoinMatchTest {
    pub fn new() -> Self {
        JoinMatchTest {
            temp_dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    pub fn config_dir(&self) -> std::path::PathBuf {
        self.temp_dir.path().join(".joinmatch")
    }

    pub fn write_config(&self, yaml: &str) {
        std::fs::create_dir_all(self.config_dir()).expect("Failed to create config dir");
        std::fs::write(self.config_dir().join("config.yaml"), yaml)
            .expect("Failed to write config");
    }

    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_joinmatch"))
            .args(args)
            .current_dir(self.temp_dir.path())
            .env_remove("JOINMATCH_ROOT")
            .env_remove("JOINMATCH_API_URL")
            .env_remove("JOINMATCH_TOKEN")
            .env("NO_COLOR", "1")
            .output()
            .expect("Failed to execute joinmatch command")
    }

    pub fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args);
        if !output.status.success() {
            panic!(
                "Command {:?} failed with status {:?}\nstdout: {}\nstderr: {}",
                args,
                output.status,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    pub fn run_failure(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            !output.status.success(),
            "Command {:?} should have failed\nstdout: {}",
            args,
            String::from_utf8_lossy(&output.stdout)
        );
        String::from_utf8_lossy(&output.stderr).to_string()
    }
}

/// Restores an environment variable when dropped.
///
/// Tests using this must be `#[serial]`; the environment is process-global.
pub struct EnvGuard {
    key: String,
    original: Option<std::ffi::OsString>,
}

impl EnvGuard {
    /// Snapshot `key`, then set it to `value`.
    ///
    /// # Safety
    /// Calls `std::env::set_var`, which races with any other thread touching
    /// the environment. Callers must be marked `#[serial]`.
    pub unsafe fn set(key: &str, value: impl AsRef<std::ffi::OsStr>) -> Self {
        let guard = Self {
            key: key.to_string(),
            original: std::env::var_os(key),
        };
        unsafe { std::env::set_var(key, value) };
        guard
    }

    /// Snapshot `key`, then remove it.
    ///
    /// # Safety
    /// Same contract as [`EnvGuard::set`].
    pub unsafe fn remove(key: &str) -> Self {
        let guard = Self {
            key: key.to_string(),
            original: std::env::var_os(key),
        };
        unsafe { std::env::remove_var(key) };
        guard
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        // SAFETY: the guard was created through `set` or `remove`, whose
        // callers are #[serial].
        match &self.original {
            Some(val) => unsafe { std::env::set_var(&self.key, val) },
            None => unsafe { std::env::remove_var(&self.key) },
        }
    }
}
