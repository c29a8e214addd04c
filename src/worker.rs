use crate::pipeline;
use crate::types::{LayoutConfig, LayoutResult, Member, NodeRect, Viewport};
use crate::visibility::filter_visible;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tracing::{debug, warn};

/// Practical ceiling on nodes per request. Trees past this size are still
/// computed, just synchronously on the caller's thread.
pub const MAX_REQUEST_NODES: usize = 2000;

/// Visibility checks below this node count stay on the caller's thread; the
/// filter is cheap enough to run uncoalesced on scroll.
pub const VISIBILITY_OFFLOAD_THRESHOLD: usize = 500;

// Bounded wait before a request falls back to synchronous recomputation
const REQUEST_TIMEOUT: Duration = Duration::from_secs(2);
const INIT_TIMEOUT: Duration = Duration::from_secs(2);

// ===== Wire protocol =====

// Messages host -> worker. JSON-serializable with a `type` discriminator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HostMessage {
    Init,
    #[serde(rename_all = "camelCase")]
    TreeLayout {
        request_id: u64,
        nodes: Vec<Member>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        root_id: Option<String>,
        #[serde(default)]
        config: LayoutConfig,
    },
    #[serde(rename_all = "camelCase")]
    VisibilityCheck {
        request_id: u64,
        view_rect: Viewport,
        nodes: Vec<NodeRect>,
    },
    TestAlive,
}

// Messages worker -> host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WorkerMessage {
    #[serde(rename_all = "camelCase")]
    StatusReport { status: WorkerStatus },
    #[serde(rename_all = "camelCase")]
    TreeLayout {
        request_id: u64,
        success: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<LayoutResult>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    VisibilityCheck {
        request_id: u64,
        success: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<VisibleSet>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    AliveResponse { timestamp: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkerStatus {
    Ready,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibleSet {
    pub visible_nodes: Vec<String>,
}

// ===== Bridge state machine =====

// Uninitialized -> Ready <-> Busy, Terminated terminal from any state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeState {
    Uninitialized,
    Ready,
    Busy,
    Terminated,
}

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("failed to spawn worker thread: {0}")]
    SpawnFailed(#[from] std::io::Error),
    #[error("worker terminated")]
    Terminated,
    #[error("worker request timed out")]
    Timeout,
    #[error("worker reported: {0}")]
    Worker(String),
    #[error("protocol violation: {0}")]
    Protocol(String),
}

// ===== Worker handle =====

/// A background layout worker on a dedicated thread, driven over channels by
/// the typed request/response protocol above. Every request carries an id and
/// late responses for superseded ids are discarded.
pub struct LayoutWorker {
    tx: Option<Sender<HostMessage>>,
    rx: Receiver<WorkerMessage>,
    state: Arc<RwLock<BridgeState>>,
    next_request_id: u64,
    handle: Option<JoinHandle<()>>,
}

impl LayoutWorker {
    /// Spawn the worker thread and wait for its ready report.
    pub fn spawn() -> Result<LayoutWorker, BridgeError> {
        let (host_tx, worker_rx) = mpsc::channel::<HostMessage>();
        let (worker_tx, host_rx) = mpsc::channel::<WorkerMessage>();
        let state = Arc::new(RwLock::new(BridgeState::Uninitialized));

        let thread_state = state.clone();
        let handle = thread::Builder::new()
            .name("pedigree-layout-worker".to_string())
            .spawn(move || worker_loop(worker_rx, worker_tx, thread_state))?;

        let mut worker = LayoutWorker {
            tx: Some(host_tx),
            rx: host_rx,
            state,
            next_request_id: 0,
            handle: Some(handle),
        };

        worker.send(HostMessage::Init)?;
        match worker.rx.recv_timeout(INIT_TIMEOUT) {
            Ok(WorkerMessage::StatusReport {
                status: WorkerStatus::Ready,
            }) => Ok(worker),
            Ok(other) => Err(BridgeError::Protocol(format!(
                "unexpected init reply: {:?}",
                other
            ))),
            Err(RecvTimeoutError::Timeout) => Err(BridgeError::Timeout),
            Err(RecvTimeoutError::Disconnected) => Err(BridgeError::Terminated),
        }
    }

    pub fn state(&self) -> BridgeState {
        *self.state.read()
    }

    /// Request a full tree layout off the UI thread.
    pub fn layout(
        &mut self,
        nodes: Vec<Member>,
        root_id: Option<String>,
        config: LayoutConfig,
    ) -> Result<LayoutResult, BridgeError> {
        let request_id = self.next_request_id();
        self.send(HostMessage::TreeLayout {
            request_id,
            nodes,
            root_id,
            config,
        })?;

        self.await_response(request_id, |message| match message {
            WorkerMessage::TreeLayout {
                request_id: id,
                success,
                data,
                error,
            } => Some((id, success, data, error)),
            _ => None,
        })
    }

    /// Request a visibility check off the UI thread.
    pub fn visibility_check(
        &mut self,
        view_rect: Viewport,
        nodes: Vec<NodeRect>,
    ) -> Result<Vec<String>, BridgeError> {
        let request_id = self.next_request_id();
        self.send(HostMessage::VisibilityCheck {
            request_id,
            view_rect,
            nodes,
        })?;

        let set = self.await_response(request_id, |message| match message {
            WorkerMessage::VisibilityCheck {
                request_id: id,
                success,
                data,
                error,
            } => Some((id, success, data, error)),
            _ => None,
        })?;
        Ok(set.visible_nodes)
    }

    /// Liveness probe; answers with the worker's clock in unix milliseconds.
    pub fn test_alive(&mut self) -> Result<u64, BridgeError> {
        self.send(HostMessage::TestAlive)?;
        let deadline = Instant::now() + REQUEST_TIMEOUT;
        loop {
            let remaining = deadline
                .checked_duration_since(Instant::now())
                .ok_or(BridgeError::Timeout)?;
            match self.rx.recv_timeout(remaining) {
                Ok(WorkerMessage::AliveResponse { timestamp }) => return Ok(timestamp),
                Ok(_) => continue, // stale response from a superseded request
                Err(RecvTimeoutError::Timeout) => return Err(BridgeError::Timeout),
                Err(RecvTimeoutError::Disconnected) => return Err(self.mark_terminated()),
            }
        }
    }

    fn next_request_id(&mut self) -> u64 {
        self.next_request_id += 1;
        self.next_request_id
    }

    fn send(&mut self, message: HostMessage) -> Result<(), BridgeError> {
        let sent = match &self.tx {
            Some(tx) => tx.send(message).is_ok(),
            None => return Err(BridgeError::Terminated),
        };
        if sent {
            Ok(())
        } else {
            Err(self.mark_terminated())
        }
    }

    // Wait for the response matching `request_id`, discarding stale ones. A
    // new request implicitly supersedes any in-flight one.
    fn await_response<T>(
        &mut self,
        request_id: u64,
        extract: impl Fn(WorkerMessage) -> Option<(u64, bool, Option<T>, Option<String>)>,
    ) -> Result<T, BridgeError> {
        let deadline = Instant::now() + REQUEST_TIMEOUT;
        loop {
            let remaining = deadline
                .checked_duration_since(Instant::now())
                .ok_or(BridgeError::Timeout)?;
            let message = match self.rx.recv_timeout(remaining) {
                Ok(message) => message,
                Err(RecvTimeoutError::Timeout) => return Err(BridgeError::Timeout),
                Err(RecvTimeoutError::Disconnected) => return Err(self.mark_terminated()),
            };

            match extract(message) {
                Some((id, _, _, _)) if id != request_id => {
                    debug!(stale = id, current = request_id, "discarding stale response");
                }
                Some((_, true, Some(data), _)) => return Ok(data),
                Some((_, true, None, _)) => {
                    return Err(BridgeError::Protocol("missing response payload".to_string()))
                }
                Some((_, false, _, error)) => {
                    return Err(BridgeError::Worker(error.unwrap_or_default()))
                }
                None => continue, // unrelated message kind
            }
        }
    }

    fn mark_terminated(&mut self) -> BridgeError {
        *self.state.write() = BridgeState::Terminated;
        BridgeError::Terminated
    }
}

impl Drop for LayoutWorker {
    fn drop(&mut self) {
        // Hang up first so the worker's recv loop exits, then join
        self.tx.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

// ===== Worker side =====

fn worker_loop(
    rx: Receiver<HostMessage>,
    tx: Sender<WorkerMessage>,
    state: Arc<RwLock<BridgeState>>,
) {
    while let Ok(message) = rx.recv() {
        let reply = match message {
            HostMessage::Init => {
                *state.write() = BridgeState::Ready;
                WorkerMessage::StatusReport {
                    status: WorkerStatus::Ready,
                }
            }
            HostMessage::TreeLayout {
                request_id,
                nodes,
                root_id,
                config,
            } => {
                *state.write() = BridgeState::Busy;
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                    handle_tree_layout(&nodes, root_id.as_deref(), &config)
                }));
                *state.write() = BridgeState::Ready;

                match outcome {
                    Ok(Ok(result)) => WorkerMessage::TreeLayout {
                        request_id,
                        success: true,
                        data: Some(result),
                        error: None,
                    },
                    Ok(Err(error)) => WorkerMessage::TreeLayout {
                        request_id,
                        success: false,
                        data: None,
                        error: Some(error),
                    },
                    Err(_) => WorkerMessage::TreeLayout {
                        request_id,
                        success: false,
                        data: None,
                        error: Some("layout computation panicked".to_string()),
                    },
                }
            }
            HostMessage::VisibilityCheck {
                request_id,
                view_rect,
                nodes,
            } => {
                *state.write() = BridgeState::Busy;
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                    handle_visibility(&nodes, &view_rect)
                }));
                *state.write() = BridgeState::Ready;

                match outcome {
                    Ok(Ok(set)) => WorkerMessage::VisibilityCheck {
                        request_id,
                        success: true,
                        data: Some(set),
                        error: None,
                    },
                    Ok(Err(error)) => WorkerMessage::VisibilityCheck {
                        request_id,
                        success: false,
                        data: None,
                        error: Some(error),
                    },
                    Err(_) => WorkerMessage::VisibilityCheck {
                        request_id,
                        success: false,
                        data: None,
                        error: Some("visibility check panicked".to_string()),
                    },
                }
            }
            HostMessage::TestAlive => WorkerMessage::AliveResponse {
                timestamp: unix_millis(),
            },
        };

        if tx.send(reply).is_err() {
            break;
        }
    }

    *state.write() = BridgeState::Terminated;
}

// Same pipeline function the synchronous path calls; the worker adds only the
// request-size guard and error reporting
fn handle_tree_layout(
    nodes: &[Member],
    root_id: Option<&str>,
    config: &LayoutConfig,
) -> Result<LayoutResult, String> {
    if nodes.is_empty() {
        return Err("empty node list".to_string());
    }
    if nodes.len() > MAX_REQUEST_NODES {
        return Err(format!(
            "request of {} nodes exceeds the {} node ceiling",
            nodes.len(),
            MAX_REQUEST_NODES
        ));
    }

    Ok(pipeline::compute_layout(nodes, root_id, config))
}

fn handle_visibility(nodes: &[NodeRect], view_rect: &Viewport) -> Result<VisibleSet, String> {
    if nodes.is_empty() {
        return Err("empty node list".to_string());
    }

    let visible_nodes = filter_visible(nodes, view_rect)
        .into_iter()
        .map(str::to_string)
        .collect();
    Ok(VisibleSet { visible_nodes })
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

// ===== Bridge with synchronous fallback =====

/// The caller-facing execution strategy: offload to the worker when it exists,
/// otherwise (or whenever the worker fails, times out or dies) run the
/// identical pure functions on the calling thread. Failure is invisible to
/// the caller; only the execution context differs.
pub struct LayoutBridge {
    worker: Option<LayoutWorker>,
}

impl LayoutBridge {
    pub fn new() -> Self {
        match LayoutWorker::spawn() {
            Ok(worker) => LayoutBridge {
                worker: Some(worker),
            },
            Err(error) => {
                warn!(%error, "worker unavailable, staying synchronous");
                LayoutBridge { worker: None }
            }
        }
    }

    /// Whether computation currently runs off the calling thread.
    pub fn is_offloaded(&self) -> bool {
        self.worker.is_some()
    }

    /// Compute a full layout, off-thread when possible.
    pub fn layout(
        &mut self,
        members: &[Member],
        root_id: Option<&str>,
        config: &LayoutConfig,
    ) -> LayoutResult {
        if members.len() <= MAX_REQUEST_NODES {
            if let Some(worker) = self.worker.as_mut() {
                match worker.layout(members.to_vec(), root_id.map(str::to_string), *config) {
                    Ok(result) => return result,
                    Err(error) => {
                        warn!(%error, "worker layout failed, recomputing synchronously");
                        if matches!(error, BridgeError::Terminated) {
                            self.worker = None;
                        }
                    }
                }
            }
        }

        pipeline::compute_layout(members, root_id, config)
    }

    /// Visibility check. Small node sets are always filtered on the calling
    /// thread; only large ones are worth a round-trip to the worker.
    pub fn visibility_check(&mut self, nodes: &[NodeRect], viewport: &Viewport) -> Vec<String> {
        if nodes.len() > VISIBILITY_OFFLOAD_THRESHOLD {
            if let Some(worker) = self.worker.as_mut() {
                match worker.visibility_check(*viewport, nodes.to_vec()) {
                    Ok(visible) => return visible,
                    Err(error) => {
                        warn!(%error, "worker visibility check failed, filtering synchronously");
                        if matches!(error, BridgeError::Terminated) {
                            self.worker = None;
                        }
                    }
                }
            }
        }

        filter_visible(nodes, viewport)
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}

impl Default for LayoutBridge {
    fn default() -> Self {
        LayoutBridge::new()
    }
}
