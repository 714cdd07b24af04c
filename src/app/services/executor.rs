use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;

use thiserror::Error;
use tracing::{debug, warn};

/// Extra seconds the HTTP client waits beyond the service's own run timeout.
const HTTP_GRACE_SECS: u64 = 5;

#[derive(Debug, Serialize)]
struct ExecuteRequest<'a> {
    code: &'a str,
    timeout: u64,
}

/// Service reply. A run that exits non-zero is still an `Ok` reply with
/// `success == false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ExecutionResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub stdout: String,
    #[serde(default)]
    pub stderr: String,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub returncode: i32,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecuteError {
    #[error("an execution is already in progress")]
    Busy,

    #[error("no code has been revealed yet")]
    EmptyCode,

    #[error("failed to reach execution service: {0}")]
    Network(String),

    #[error("execution service returned {code} {reason}")]
    Status { code: i32, reason: String },

    #[error("malformed execution response: {0}")]
    MalformedResponse(String),
}

/// Holds the busy flag for one request and clears it on drop, whatever the outcome.
pub struct BusyGuard {
    flag: Arc<AtomicBool>,
}

impl BusyGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag: Arc::clone(flag) })
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Client for the `POST /api/execute` service. Only one request may be in
/// flight; a second caller gets [`ExecuteError::Busy`] instead of queueing.
#[derive(Clone)]
pub struct RemoteExecutor {
    endpoint: String,
    timeout_secs: u64,
    busy: Arc<AtomicBool>,
}

impl RemoteExecutor {
    pub fn new(endpoint: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout_secs,
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Run `code` and block until the service answers.
    pub fn execute(&self, code: &str) -> Result<ExecutionResult, ExecuteError> {
        let guard = self.begin(code)?;
        let result = self.send(code);
        drop(guard);
        result
    }

    /// Run `code` on a background thread and hand the outcome to `on_done`.
    /// The busy check happens before the thread starts and the flag is
    /// released before `on_done` runs.
    pub fn spawn<F>(&self, code: String, on_done: F) -> Result<JoinHandle<()>, ExecuteError>
    where
        F: FnOnce(Result<ExecutionResult, ExecuteError>) + Send + 'static,
    {
        let guard = self.begin(&code)?;
        let client = self.clone();
        Ok(std::thread::spawn(move || {
            let result = client.send(&code);
            drop(guard);
            on_done(result);
        }))
    }

    fn begin(&self, code: &str) -> Result<BusyGuard, ExecuteError> {
        if code.is_empty() {
            return Err(ExecuteError::EmptyCode);
        }
        BusyGuard::acquire(&self.busy).ok_or(ExecuteError::Busy)
    }

    fn send(&self, code: &str) -> Result<ExecutionResult, ExecuteError> {
        debug!(endpoint = %self.endpoint, bytes = code.len(), "sending code for execution");
        let request = ExecuteRequest {
            code,
            timeout: self.timeout_secs,
        };

        let response = minreq::post(&self.endpoint)
            .with_timeout(self.timeout_secs + HTTP_GRACE_SECS)
            .with_json(&request)
            .map_err(|e| ExecuteError::MalformedResponse(format!("could not encode request: {}", e)))?
            .send()
            .map_err(|e| {
                warn!(error = %e, "execution request failed");
                ExecuteError::Network(e.to_string())
            })?;

        if !(200..300).contains(&response.status_code) {
            return Err(ExecuteError::Status {
                code: response.status_code,
                reason: response.reason_phrase.clone(),
            });
        }

        response
            .json::<ExecutionResult>()
            .map_err(|e| ExecuteError::MalformedResponse(e.to_string()))
    }

    #[cfg(test)]
    fn hold_busy(&self) -> Option<BusyGuard> {
        BusyGuard::acquire(&self.busy)
    }
}
