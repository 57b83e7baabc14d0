//! Test doubles for the backend contract.

use std::collections::VecDeque;
use std::io;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

use async_trait::async_trait;
use tokio::io::{AsyncRead, ReadBuf};
use tokio::sync::Mutex;

use crate::connection::{ConnectionHandle, ConnectionManager};
use crate::errors::ConnectionError;
use batch_indexer_repository::{
    BackendClient, BackendConnector, BackendError, BulkItemResponse, BulkResponse, RequestBuilder,
    RequestError,
};
use batch_indexer_shared::PendingOperation;

/// Request builder that accepts any payload and records its arguments.
pub(crate) struct PassthroughBuilder {
    calls: std::sync::Mutex<Vec<(String, String, String, String)>>,
}

impl PassthroughBuilder {
    pub(crate) fn new() -> Self {
        Self {
            calls: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn calls(&self) -> Vec<(String, String, String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

impl RequestBuilder for PassthroughBuilder {
    fn build_index_operation(
        &self,
        payload: &str,
        index: &str,
        doc_type: &str,
        id: &str,
    ) -> Result<PendingOperation, RequestError> {
        self.calls.lock().unwrap().push((
            payload.to_string(),
            index.to_string(),
            doc_type.to_string(),
            id.to_string(),
        ));
        Ok(PendingOperation::new(index, doc_type, id, payload))
    }
}

/// Backend client with scripted bulk responses.
///
/// When no response is queued, every item of the batch succeeds.
pub(crate) struct MockBackend {
    responses: Mutex<VecDeque<Result<BulkResponse, BackendError>>>,
    batches: Mutex<Vec<Vec<PendingOperation>>>,
    bulk_calls: AtomicUsize,
    closed: Arc<AtomicUsize>,
}

impl MockBackend {
    pub(crate) fn new() -> Self {
        Self::with_close_counter(Arc::new(AtomicUsize::new(0)))
    }

    pub(crate) fn with_close_counter(closed: Arc<AtomicUsize>) -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            batches: Mutex::new(Vec::new()),
            bulk_calls: AtomicUsize::new(0),
            closed,
        }
    }

    pub(crate) async fn push_response(&self, response: Result<BulkResponse, BackendError>) {
        self.responses.lock().await.push_back(response);
    }

    pub(crate) fn bulk_calls(&self) -> usize {
        self.bulk_calls.load(Ordering::SeqCst)
    }

    pub(crate) async fn last_batch(&self) -> Vec<PendingOperation> {
        self.batches.lock().await.last().cloned().unwrap_or_default()
    }

    pub(crate) async fn sent_ids(&self) -> Vec<String> {
        self.batches
            .lock()
            .await
            .iter()
            .flatten()
            .map(|op| op.id.clone())
            .collect()
    }
}

#[async_trait]
impl BackendClient for MockBackend {
    async fn execute_bulk(
        &self,
        operations: &[PendingOperation],
    ) -> Result<BulkResponse, BackendError> {
        self.bulk_calls.fetch_add(1, Ordering::SeqCst);
        self.batches.lock().await.push(operations.to_vec());

        match self.responses.lock().await.pop_front() {
            Some(response) => response,
            None => Ok(BulkResponse::new(
                1,
                operations
                    .iter()
                    .map(|op| BulkItemResponse::success(op.index.clone(), op.id.clone(), 201))
                    .collect(),
            )),
        }
    }

    async fn health_check(&self) -> Result<bool, BackendError> {
        Ok(true)
    }

    async fn close(&self) {
        self.closed.fetch_add(1, Ordering::SeqCst);
    }
}

/// Connection manager around a single [`MockBackend`].
pub(crate) struct MockConnectionManager {
    backend: Arc<MockBackend>,
    connected: AtomicBool,
    fail_reinit: AtomicBool,
    reinit_count: AtomicUsize,
    generation: AtomicU64,
    last_failed_generation: std::sync::Mutex<Option<u64>>,
}

impl MockConnectionManager {
    pub(crate) fn new(backend: Arc<MockBackend>) -> Self {
        Self {
            backend,
            connected: AtomicBool::new(true),
            fail_reinit: AtomicBool::new(false),
            reinit_count: AtomicUsize::new(0),
            generation: AtomicU64::new(1),
            last_failed_generation: std::sync::Mutex::new(None),
        }
    }

    /// Generation passed to the last `reinitialize_from`.
    pub(crate) fn last_failed_generation(&self) -> Option<u64> {
        *self.last_failed_generation.lock().unwrap()
    }

    pub(crate) fn reinit_count(&self) -> usize {
        self.reinit_count.load(Ordering::SeqCst)
    }

    pub(crate) fn fail_reinitialize(&self) {
        self.fail_reinit.store(true, Ordering::SeqCst);
    }

    pub(crate) fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
    }
}

#[async_trait]
impl ConnectionManager for MockConnectionManager {
    async fn handle(&self) -> Result<ConnectionHandle, ConnectionError> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(ConnectionError::unavailable("mock disconnected"));
        }
        let client: Arc<dyn BackendClient> = self.backend.clone();
        Ok(ConnectionHandle::new(
            client,
            self.generation.load(Ordering::SeqCst),
        ))
    }

    async fn reinitialize(&self) -> Result<(), ConnectionError> {
        self.reinit_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_reinit.load(Ordering::SeqCst) {
            return Err(ConnectionError::reconnect_failed(3, "mock reconnect failure"));
        }
        self.connected.store(true, Ordering::SeqCst);
        self.generation.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn reinitialize_from(&self, failed_generation: u64) -> Result<(), ConnectionError> {
        *self.last_failed_generation.lock().unwrap() = Some(failed_generation);
        self.reinitialize().await
    }
}

/// Connector that fails with queued errors before producing mock clients.
pub(crate) struct ScriptedConnector {
    failures: std::sync::Mutex<VecDeque<BackendError>>,
    connects: AtomicUsize,
    closed: Arc<AtomicUsize>,
}

impl ScriptedConnector {
    pub(crate) fn new() -> Self {
        Self {
            failures: std::sync::Mutex::new(VecDeque::new()),
            connects: AtomicUsize::new(0),
            closed: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub(crate) fn fail_next(&self, error: BackendError) {
        self.failures.lock().unwrap().push_back(error);
    }

    pub(crate) fn connect_count(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub(crate) fn close_count(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BackendConnector for ScriptedConnector {
    async fn connect(&self) -> Result<Arc<dyn BackendClient>, BackendError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        let failure = self.failures.lock().unwrap().pop_front();
        match failure {
            Some(error) => Err(error),
            None => Ok(Arc::new(MockBackend::with_close_counter(self.closed.clone()))),
        }
    }
}

/// Reader that yields `data` once and then fails every read.
pub(crate) struct FailingReader {
    data: Option<&'static [u8]>,
}

impl FailingReader {
    pub(crate) fn new(data: &'static [u8]) -> Self {
        Self { data: Some(data) }
    }
}

impl AsyncRead for FailingReader {
    fn poll_read(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match self.data.take() {
            Some(data) => {
                buf.put_slice(data);
                Poll::Ready(Ok(()))
            }
            None => Poll::Ready(Err(io::Error::new(
                io::ErrorKind::ConnectionReset,
                "stream reset",
            ))),
        }
    }
}
