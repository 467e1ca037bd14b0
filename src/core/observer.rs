//! Ledger observers
//!
//! - [`TracingObserver`] logs every event; the server installs it by default.
//! - [`RecordingObserver`] keeps the sequence of events for assertions.
//! - [`BlockingObserver`] parks the calling thread at chosen checkpoints
//!   until released. Because observers run while the ledger holds its locks,
//!   a parked thread keeps those locks held, which lets tests prove that
//!   competing callers really wait.

use crate::core::traits::LedgerObserver;
use crate::types::{Account, AccountId, LedgerEvent};
use dashmap::DashMap;
use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Emits a `tracing` debug event for each ledger event
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl LedgerObserver for TracingObserver {
    fn on_event(&self, event: LedgerEvent, account: &Account) {
        debug!(%event, id = %account.id, balance = %account.balance, "ledger event");
    }
}

/// Records `(event, id)` pairs in the order they were fired
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<(LedgerEvent, AccountId)>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<(LedgerEvent, AccountId)> {
        self.events.lock().clone()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl LedgerObserver for RecordingObserver {
    fn on_event(&self, event: LedgerEvent, account: &Account) {
        self.events.lock().push((event, account.id));
    }
}

/// Point at which a [`BlockingObserver`] can park the calling thread
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Checkpoint {
    /// Any `CREATED` event
    Creation,
    /// Any `DELETED` event
    Deletion,
    /// `LOADED` for one account
    Load(AccountId),
    /// `UPDATED` for one account
    Update(AccountId),
}

impl Checkpoint {
    fn for_event(event: LedgerEvent, id: AccountId) -> Self {
        match event {
            LedgerEvent::Created => Checkpoint::Creation,
            LedgerEvent::Deleted => Checkpoint::Deletion,
            LedgerEvent::Loaded => Checkpoint::Load(id),
            LedgerEvent::Updated => Checkpoint::Update(id),
        }
    }
}

#[derive(Debug, Default)]
struct GateState {
    open: bool,
    waiting: usize,
}

#[derive(Debug, Default)]
struct Gate {
    state: Mutex<GateState>,
    changed: Condvar,
}

impl Gate {
    fn pass(&self) {
        let mut state = self.state.lock();
        state.waiting += 1;
        self.changed.notify_all();
        while !state.open {
            self.changed.wait(&mut state);
        }
        state.waiting -= 1;
    }

    fn open(&self) {
        self.state.lock().open = true;
        self.changed.notify_all();
    }

    fn wait_for_waiters(&self, count: usize, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut state = self.state.lock();
        while state.waiting < count {
            if self.changed.wait_until(&mut state, deadline).timed_out() {
                return state.waiting >= count;
            }
        }
        true
    }
}

/// Observer that parks threads at blocked checkpoints
///
/// Checkpoints are open unless [`BlockingObserver::block`] closes them.
/// Threads arriving at a closed checkpoint wait, with the ledger's locks
/// still held, until [`BlockingObserver::release`] opens it again.
#[derive(Debug, Default)]
pub struct BlockingObserver {
    gates: DashMap<Checkpoint, Arc<Gate>>,
}

impl BlockingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Close a checkpoint; later arrivals wait until it is released
    pub fn block(&self, checkpoint: Checkpoint) {
        self.gates.entry(checkpoint).or_insert_with(Arc::default);
    }

    /// Open a checkpoint and wake every thread parked at it
    pub fn release(&self, checkpoint: Checkpoint) {
        if let Some((_, gate)) = self.gates.remove(&checkpoint) {
            gate.open();
        }
    }

    pub fn release_all(&self) {
        let checkpoints: Vec<Checkpoint> =
            self.gates.iter().map(|entry| *entry.key()).collect();
        for checkpoint in checkpoints {
            self.release(checkpoint);
        }
    }

    /// Wait until `count` threads are parked at a blocked checkpoint
    ///
    /// Returns `false` on timeout or if the checkpoint is not blocked.
    pub fn wait_for_parked(
        &self,
        checkpoint: Checkpoint,
        count: usize,
        timeout: Duration,
    ) -> bool {
        // Clone the gate out so the map shard is not held while waiting
        let gate = self.gates.get(&checkpoint).map(|entry| Arc::clone(entry.value()));
        match gate {
            Some(gate) => gate.wait_for_waiters(count, timeout),
            None => false,
        }
    }
}

impl LedgerObserver for BlockingObserver {
    fn on_event(&self, event: LedgerEvent, account: &Account) {
        let checkpoint = Checkpoint::for_event(event, account.id);
        let gate = self.gates.get(&checkpoint).map(|entry| Arc::clone(entry.value()));
        if let Some(gate) = gate {
            debug!(?checkpoint, "parked at blocked checkpoint");
            gate.pass();
        }
    }
}
