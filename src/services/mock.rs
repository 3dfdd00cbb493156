//! Mock services for testing the workflow without wallet or chain access.

use super::{
    AddCreditRequest, AllowanceService, ApprovalRequest, ServiceRejected, TransactionService,
};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Two-sided gate for holding a mock call in flight.
///
/// The mock signals `entered` when the call starts and then parks on
/// `release`; tests use this to observe and control a pending operation.
#[derive(Debug, Default)]
pub struct CallGate {
    entered: Notify,
    release: Notify,
}

impl CallGate {
    pub fn new() -> Arc<Self> {
        Arc::new(CallGate::default())
    }

    /// Wait until a gated call has started.
    pub async fn wait_entered(&self) {
        self.entered.notified().await;
    }

    /// Let the gated call settle.
    pub fn release(&self) {
        self.release.notify_one();
    }

    async fn pass(&self) {
        self.entered.notify_one();
        self.release.notified().await;
    }
}

/// Mock allowance service with a configurable outcome and call recording.
#[derive(Default)]
pub struct MockAllowanceService {
    reject_with: Option<String>,
    gate: Option<Arc<CallGate>>,
    calls: AtomicUsize,
    requests: Mutex<Vec<ApprovalRequest>>,
}

impl MockAllowanceService {
    /// Mock that fulfills every approval.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every approval with the given reason.
    pub fn rejecting(reason: impl Into<String>) -> Self {
        MockAllowanceService {
            reject_with: Some(reason.into()),
            ..Self::default()
        }
    }

    /// Hold each call on the gate until released.
    pub fn with_gate(mut self, gate: Arc<CallGate>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Number of approve calls received.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Requests received, in order.
    pub fn requests(&self) -> Vec<ApprovalRequest> {
        self.requests.lock().expect("mock lock poisoned").clone()
    }
}

#[async_trait]
impl AllowanceService for MockAllowanceService {
    async fn approve(&self, request: ApprovalRequest) -> Result<(), ServiceRejected> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .expect("mock lock poisoned")
            .push(request);
        if let Some(gate) = &self.gate {
            gate.pass().await;
        }
        match &self.reject_with {
            Some(reason) => Err(ServiceRejected::new(reason.clone())),
            None => Ok(()),
        }
    }
}

/// Mock transaction service with a configurable outcome and call recording.
#[derive(Default)]
pub struct MockTransactionService {
    reject_with: Option<String>,
    gate: Option<Arc<CallGate>>,
    calls: AtomicUsize,
    requests: Mutex<Vec<AddCreditRequest>>,
}

impl MockTransactionService {
    /// Mock that fulfills every submission.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every submission with the given reason.
    pub fn rejecting(reason: impl Into<String>) -> Self {
        MockTransactionService {
            reject_with: Some(reason.into()),
            ..Self::default()
        }
    }

    /// Hold each call on the gate until released.
    pub fn with_gate(mut self, gate: Arc<CallGate>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Number of add_credit calls received.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Requests received, in order.
    pub fn requests(&self) -> Vec<AddCreditRequest> {
        self.requests.lock().expect("mock lock poisoned").clone()
    }
}

#[async_trait]
impl TransactionService for MockTransactionService {
    async fn add_credit(&self, request: AddCreditRequest) -> Result<(), ServiceRejected> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .expect("mock lock poisoned")
            .push(request);
        if let Some(gate) = &self.gate {
            gate.pass().await;
        }
        match &self.reject_with {
            Some(reason) => Err(ServiceRejected::new(reason.clone())),
            None => Ok(()),
        }
    }
}
