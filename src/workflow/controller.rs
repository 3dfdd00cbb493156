//! Workflow controller orchestrating the add-credit transaction flow.
//!
//! Reads one store snapshot at entry, keeps user edits in local form state,
//! and delegates approval and submission to injected services. All failure
//! paths settle into a phase transition or a local abort; nothing escapes
//! uncaught.

use super::{ActionOutcome, FormState, Mode, Phase, WorkflowAction};
use crate::config::Config;
use crate::domain::{to_display_units, to_raw_units, CreditLine, Network, Position, Token};
use crate::error::WorkflowError;
use crate::services::{
    AddCreditRequest, AddressValidator, AllowanceService, ApprovalRequest, TransactionService,
};
use crate::store::{PositionKey, Store, UserRole};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// Callback invoked when a terminal state is dismissed.
pub type CloseCallback = Box<dyn Fn() + Send + Sync>;

/// Injected collaborators, the DI container for one workflow instance.
#[derive(Clone)]
pub struct WorkflowServices {
    pub store: Arc<dyn Store>,
    pub allowance: Arc<dyn AllowanceService>,
    pub transactions: Arc<dyn TransactionService>,
    pub validator: Arc<dyn AddressValidator>,
    pub config: Config,
}

/// Handle for marking a workflow instance as gone.
///
/// Cloneable so the owner of the modal lifecycle can keep it after handing
/// the workflow to tasks; disposal makes any in-flight result ignorable.
#[derive(Debug, Clone)]
pub struct DisposeHandle(Arc<AtomicBool>);

impl DisposeHandle {
    pub fn dispose(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_disposed(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
struct Inner {
    phase: Phase,
    approved: bool,
    form: FormState,
}

/// Resets the in-flight flag when an approve/submit path unwinds.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// State machine for adding or accepting a credit position on a line.
///
/// One instance per open transaction modal; no state is shared across
/// instances. Methods take `&self` so a pending operation and further UI
/// events can coexist; at most one approve/submit is in flight at a time.
pub struct CreditWorkflow {
    services: WorkflowServices,
    on_close: Option<CloseCallback>,
    mode: Mode,
    network: Network,
    line: CreditLine,
    position: Option<Position>,
    state: Mutex<Inner>,
    in_flight: AtomicBool,
    disposed: Arc<AtomicBool>,
}

impl CreditWorkflow {
    /// Enter the workflow from the current store snapshot.
    ///
    /// Accept mode is chosen when `accepting_offer` is forced or the wallet
    /// is the borrower on an already-selected position; its fields are
    /// prefilled from that position. Propose mode starts editable with the
    /// wallet address as the default lender.
    ///
    /// # Errors
    /// Returns `MissingSelection` when no line is selected, no token can be
    /// resolved in propose mode, or accept mode lacks a loaded position.
    pub fn enter(
        services: WorkflowServices,
        on_close: Option<CloseCallback>,
        accepting_offer: bool,
    ) -> Result<Self, WorkflowError> {
        let snapshot = services.store.snapshot();
        let line = snapshot
            .selected_line
            .clone()
            .ok_or_else(|| WorkflowError::MissingSelection("credit line".to_string()))?;

        let accept = accepting_offer
            || (snapshot.user_role == UserRole::Borrower && snapshot.selected_position.is_some());

        let (mode, position, form) = if accept {
            let position = snapshot
                .selected_position
                .clone()
                .ok_or_else(|| WorkflowError::MissingSelection("position".to_string()))?;
            let form = FormState {
                amount: to_display_units(&position.deposit, position.token.decimals),
                drate: position.drate.clone(),
                frate: position.frate.clone(),
                lender: position.lender.as_str().to_string(),
                token: position.token.clone(),
            };
            (Mode::Accept, Some(position), form)
        } else {
            let token = snapshot
                .selected_token
                .clone()
                .or_else(|| {
                    snapshot
                        .tokens
                        .iter()
                        .find(|t| t.address == services.config.default_token_address)
                        .cloned()
                })
                .or_else(|| snapshot.tokens.first().cloned())
                .ok_or_else(|| WorkflowError::MissingSelection("token".to_string()))?;
            let form = FormState {
                amount: "1".to_string(),
                drate: "0.00".to_string(),
                frate: "0.00".to_string(),
                lender: snapshot
                    .wallet_address
                    .clone()
                    .map(|a| a.0)
                    .unwrap_or_default(),
                token: token.to_ref(),
            };
            (Mode::Propose, None, form)
        };

        let phase = if line.is_active() {
            Phase::Editing
        } else {
            tracing::debug!(line = %line.id, status = ?line.status, "entered with inactive line");
            Phase::BadLine
        };

        Ok(CreditWorkflow {
            services,
            on_close,
            mode,
            network: snapshot.network,
            line,
            position,
            state: Mutex::new(Inner {
                phase,
                approved: false,
                form,
            }),
            in_flight: AtomicBool::new(false),
            disposed: Arc::new(AtomicBool::new(false)),
        })
    }

    fn inner(&self) -> MutexGuard<'_, Inner> {
        self.state.lock().expect("workflow state lock poisoned")
    }

    /// Current phase, for the presentation layer.
    pub fn phase(&self) -> Phase {
        self.inner().phase
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Whether the spending allowance has been approved this session.
    pub fn approved(&self) -> bool {
        self.inner().approved
    }

    /// Whether an approve/submit is currently in flight.
    pub fn in_flight(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Snapshot of the current form state.
    pub fn form(&self) -> FormState {
        self.inner().form.clone()
    }

    /// The line this workflow was entered against.
    pub fn line(&self) -> &CreditLine {
        &self.line
    }

    /// Actions currently offered: accept mode exposes only `Accept`; propose
    /// mode gates `Deposit` behind a fulfilled `Approve`.
    pub fn available_actions(&self) -> Vec<WorkflowAction> {
        let inner = self.inner();
        if inner.phase != Phase::Editing {
            return Vec::new();
        }
        match self.mode {
            Mode::Accept => vec![WorkflowAction::Accept],
            Mode::Propose if inner.approved => vec![WorkflowAction::Deposit],
            Mode::Propose => vec![WorkflowAction::Approve],
        }
    }

    /// Handle for discarding late results after the modal is gone.
    pub fn dispose_handle(&self) -> DisposeHandle {
        DisposeHandle(Arc::clone(&self.disposed))
    }

    /// Mark this instance as gone; see [`DisposeHandle`].
    pub fn dispose(&self) {
        self.disposed.store(true, Ordering::SeqCst);
    }

    fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    // Field setters apply only while editing in propose mode; accept-mode
    // fields are fixed by the accepted position.

    pub fn set_amount(&self, amount: &str) {
        self.edit(|form| form.amount = amount.to_string());
    }

    pub fn set_drate(&self, rate: &str) {
        if self.rate_exceeds_max(rate) {
            return;
        }
        self.edit(|form| form.drate = rate.to_string());
    }

    pub fn set_frate(&self, rate: &str) {
        if self.rate_exceeds_max(rate) {
            return;
        }
        self.edit(|form| form.frate = rate.to_string());
    }

    pub fn set_lender(&self, lender: &str) {
        self.edit(|form| form.lender = lender.to_string());
    }

    pub fn set_token(&self, token: &Token) {
        self.edit(|form| form.token = token.to_ref());
    }

    fn edit(&self, apply: impl FnOnce(&mut FormState)) {
        if self.mode == Mode::Accept {
            tracing::debug!("edit ignored: accept-mode fields are read-only");
            return;
        }
        let mut inner = self.inner();
        if inner.phase != Phase::Editing {
            return;
        }
        apply(&mut inner.form);
    }

    /// Rates are capped at the configured maximum; partial or non-numeric
    /// input is kept and rejected later at submission.
    fn rate_exceeds_max(&self, rate: &str) -> bool {
        match Decimal::from_str(rate.trim()) {
            Ok(value) if value > self.services.config.max_interest_rate => {
                tracing::debug!(rate = rate, "rate above configured maximum, ignored");
                true
            }
            _ => false,
        }
    }

    /// Request a spending allowance for the target amount (propose mode).
    ///
    /// A rejected approval returns to `Editing` with `approved` unchanged and
    /// no error phase; the rejection is still reported in the outcome and
    /// logged.
    pub async fn approve(&self) -> ActionOutcome {
        if self.mode == Mode::Accept {
            return ActionOutcome::NotAvailable;
        }
        // In-flight wins over the phase check: a duplicate call while the
        // first is pending reports AlreadyPending, not NotAvailable.
        if self.in_flight.swap(true, Ordering::SeqCst) {
            return ActionOutcome::AlreadyPending;
        }
        let _guard = InFlight(&self.in_flight);
        if self.inner().phase != Phase::Editing {
            return ActionOutcome::NotAvailable;
        }

        let request = {
            let mut inner = self.inner();
            let amount = match to_raw_units(&inner.form.amount, inner.form.token.decimals) {
                Ok(amount) => amount,
                Err(err) => {
                    tracing::debug!(error = %err, "approval aborted: invalid amount");
                    return ActionOutcome::Aborted(err.into());
                }
            };
            inner.phase = Phase::Approving;
            ApprovalRequest {
                spender_address: self.line.id.clone(),
                token_address: inner.form.token.address.clone(),
                amount,
                network: self.network.clone(),
            }
        };

        let result = self.services.allowance.approve(request).await;

        if self.is_disposed() {
            return ActionOutcome::Disposed;
        }

        let mut inner = self.inner();
        inner.phase = Phase::Editing;
        match result {
            Ok(()) => {
                inner.approved = true;
                tracing::info!(line = %self.line.id, "spending allowance approved");
                ActionOutcome::Fulfilled
            }
            Err(err) => {
                tracing::warn!(line = %self.line.id, error = %err, "allowance approval rejected");
                ActionOutcome::Rejected
            }
        }
    }

    /// Submit the add-credit transaction ("deposit" in propose mode,
    /// "accept" in accept mode).
    ///
    /// A fulfilled accept also publishes the position with its principal
    /// increased by the submitted amount, keyed by `(position_id,
    /// line_address)`.
    pub async fn submit(&self) -> ActionOutcome {
        // In-flight wins over the phase check, same as approve.
        if self.in_flight.swap(true, Ordering::SeqCst) {
            return ActionOutcome::AlreadyPending;
        }
        let _guard = InFlight(&self.in_flight);
        {
            let inner = self.inner();
            if inner.phase != Phase::Editing {
                return ActionOutcome::NotAvailable;
            }
            if self.mode == Mode::Propose && !inner.approved {
                return ActionOutcome::NotAvailable;
            }
        }

        let form = {
            let mut inner = self.inner();
            if inner.form.drate.is_empty() || inner.form.frate.is_empty() {
                return ActionOutcome::Aborted(WorkflowError::MissingSelection(
                    "rates".to_string(),
                ));
            }
            if inner.form.lender.is_empty() {
                return ActionOutcome::Aborted(WorkflowError::MissingSelection(
                    "lender address".to_string(),
                ));
            }
            if self.mode == Mode::Accept && self.position.is_none() {
                return ActionOutcome::Aborted(WorkflowError::MissingSelection(
                    "position".to_string(),
                ));
            }
            inner.phase = Phase::Submitting;
            inner.form.clone()
        };

        let lender = match self.services.validator.checksum(&form.lender).await {
            Some(address) => address,
            None => {
                if self.is_disposed() {
                    return ActionOutcome::Disposed;
                }
                tracing::debug!(lender = %form.lender, "submit aborted: invalid lender address");
                self.inner().phase = Phase::Editing;
                return ActionOutcome::Aborted(WorkflowError::InvalidAddress(form.lender));
            }
        };
        if self.is_disposed() {
            return ActionOutcome::Disposed;
        }

        let converted = to_raw_units(&form.drate, self.services.config.rate_decimals)
            .and_then(|drate| {
                to_raw_units(&form.frate, self.services.config.rate_decimals)
                    .map(|frate| (drate, frate))
            })
            .and_then(|(drate, frate)| {
                to_raw_units(&form.amount, form.token.decimals)
                    .map(|amount| (drate, frate, amount))
            });
        let (drate, frate, amount) = match converted {
            Ok(parts) => parts,
            Err(err) => {
                tracing::debug!(error = %err, "submit aborted: invalid amount or rate");
                self.inner().phase = Phase::Editing;
                return ActionOutcome::Aborted(err.into());
            }
        };

        let request = AddCreditRequest {
            line_address: self.line.id.clone(),
            drate,
            frate,
            amount: amount.clone(),
            token: form.token.address.clone(),
            lender,
            network: self.network.clone(),
            dry_run: false,
        };
        tracing::debug!(line = %self.line.id, amount = %amount, mode = ?self.mode, "submitting add-credit transaction");

        let result = self.services.transactions.add_credit(request).await;

        if self.is_disposed() {
            return ActionOutcome::Disposed;
        }

        match result {
            Err(err) => {
                tracing::warn!(line = %self.line.id, error = %err, "add-credit transaction rejected");
                self.inner().phase = Phase::Failed;
                ActionOutcome::Rejected
            }
            Ok(()) => {
                if let (Mode::Accept, Some(position)) = (self.mode, &self.position) {
                    let updated = position.with_principal_delta(&amount);
                    let key = PositionKey {
                        position_id: position.id.clone(),
                        line_address: self.line.id.clone(),
                    };
                    if let Err(err) = self.services.store.publish_position(key, updated).await {
                        // The chain transaction landed; a stale cache is the
                        // store's problem to reconcile.
                        tracing::warn!(position = %position.id, error = %err, "failed to publish updated position");
                    }
                    if self.is_disposed() {
                        return ActionOutcome::Disposed;
                    }
                }
                tracing::info!(line = %self.line.id, mode = ?self.mode, "add-credit transaction fulfilled");
                self.inner().phase = Phase::Succeeded;
                ActionOutcome::Fulfilled
            }
        }
    }

    /// Dismiss a terminal state.
    ///
    /// Invokes the close callback when one was provided; otherwise resets to
    /// `Editing` so the workflow is re-enterable. `BadLine` can only be
    /// escaped via the callback, since the line is still inactive.
    pub fn dismiss(&self) {
        let close = {
            let mut inner = self.inner();
            match inner.phase {
                Phase::Succeeded | Phase::Failed => {
                    if self.on_close.is_some() {
                        true
                    } else {
                        inner.phase = Phase::Editing;
                        false
                    }
                }
                Phase::BadLine => self.on_close.is_some(),
                _ => false,
            }
        };
        if close {
            if let Some(callback) = &self.on_close {
                callback();
            }
        }
    }
}
