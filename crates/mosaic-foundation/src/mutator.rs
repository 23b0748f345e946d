//! Priority-based mutual exclusion for gesture-driven state.
//!
//! Follows the shape of Jetpack Compose's `MutatorMutex`: at most one mutator
//! (usually a drag gesture) owns a piece of state at a time. A request with a
//! strictly higher priority cancels the current holder. Anything else waits in
//! line until the holder releases, unless the caller asks for an immediate
//! takeover.
//!
//! Everything here is single-threaded. A "suspended" drag is simply a token
//! that stays active between pointer events; callers hand the token back on
//! every delta and the arbiter decides whether the mutation may run.

use smallvec::SmallVec;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use thiserror::Error;

/// Priority of a mutator. Higher priorities preempt lower ones.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MutatePriority {
    /// Programmatic mutations with no particular urgency.
    #[default]
    Default,
    /// Mutations driven by the user, such as a drag gesture.
    UserInput,
    /// Mutations that user input must not interrupt.
    PreventUserInput,
}

/// Handle identifying one acquisition of a [`DragArbiter`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MutatorToken {
    id: u64,
    priority: MutatePriority,
}

impl MutatorToken {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn priority(&self) -> MutatePriority {
        self.priority
    }
}

/// Observable state of the arbiter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArbiterState {
    Idle,
    Dragging(MutatePriority),
}

/// Result of [`DragArbiter::acquire`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Acquisition {
    /// The token holds the arbiter now.
    Granted(MutatorToken),
    /// The token waits until the current holder releases.
    Queued(MutatorToken),
}

impl Acquisition {
    pub fn token(&self) -> MutatorToken {
        match self {
            Acquisition::Granted(token) | Acquisition::Queued(token) => *token,
        }
    }

    pub fn is_granted(&self) -> bool {
        matches!(self, Acquisition::Granted(_))
    }
}

/// Where a token currently stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenStatus {
    Active,
    Queued,
    /// Preempted and not yet acknowledged by its owner.
    Cancelled,
    /// Released, withdrawn, or never issued by this arbiter.
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ArbiterError {
    #[error("arbiter is held at {holder:?} priority, request at {requested:?} cannot take over")]
    Busy {
        holder: MutatePriority,
        requested: MutatePriority,
    },
    #[error("mutator {id} was cancelled by a higher priority request")]
    Cancelled { id: u64 },
    #[error("mutator {id} does not hold the arbiter")]
    NotHolder { id: u64 },
}

type CancelHandler = Box<dyn FnOnce()>;

struct Entry {
    token: MutatorToken,
    on_cancel: Option<CancelHandler>,
}

impl Entry {
    fn new(token: MutatorToken) -> Self {
        Self {
            token,
            on_cancel: None,
        }
    }
}

#[derive(Default)]
struct ArbiterInner {
    holder: Option<Entry>,
    /// Highest priority first, FIFO within a priority.
    waiting: VecDeque<Entry>,
    /// Preempted tokens whose owners have not called `release` yet, oldest
    /// first. Holds at most [`DragArbiter::CANCELLED_HISTORY`] ids.
    cancelled: SmallVec<[u64; 4]>,
}

impl ArbiterInner {
    /// Installs `token` as holder and returns the preempted holder's cleanup.
    fn take_over(&mut self, token: MutatorToken) -> Option<CancelHandler> {
        let previous = self.holder.replace(Entry::new(token))?;
        log::debug!(
            "mutator {} ({:?}) preempted by {} ({:?})",
            previous.token.id,
            previous.token.priority,
            token.id,
            token.priority
        );
        if self.cancelled.len() >= DragArbiter::CANCELLED_HISTORY {
            let forgotten = self.cancelled.remove(0);
            log::warn!("mutator {} never acknowledged its cancellation", forgotten);
        }
        self.cancelled.push(previous.token.id);
        previous.on_cancel
    }

    fn enqueue(&mut self, token: MutatorToken) {
        let index = self
            .waiting
            .iter()
            .position(|entry| entry.token.priority < token.priority)
            .unwrap_or(self.waiting.len());
        self.waiting.insert(index, Entry::new(token));
    }

    fn entry_mut(&mut self, token: MutatorToken) -> Option<&mut Entry> {
        if let Some(holder) = self.holder.as_mut().filter(|h| h.token == token) {
            return Some(holder);
        }
        self.waiting.iter_mut().find(|entry| entry.token == token)
    }

    fn status(&self, token: MutatorToken) -> TokenStatus {
        if self.holder.as_ref().is_some_and(|h| h.token == token) {
            TokenStatus::Active
        } else if self.waiting.iter().any(|entry| entry.token == token) {
            TokenStatus::Queued
        } else if self.cancelled.contains(&token.id) {
            TokenStatus::Cancelled
        } else {
            TokenStatus::Finished
        }
    }

    fn rejection(&self, token: MutatorToken) -> ArbiterError {
        if self.cancelled.contains(&token.id) {
            ArbiterError::Cancelled { id: token.id }
        } else {
            ArbiterError::NotHolder { id: token.id }
        }
    }
}

/// Grants exclusive, priority-ordered access to a single mutable resource.
///
/// The arbiter does not own the resource. Callers route every mutation
/// through [`with_mutator`](Self::with_mutator) (or the one-shot
/// [`mutate`](Self::mutate)), which only runs while the given token holds the
/// arbiter.
pub struct DragArbiter {
    next_id: Cell<u64>,
    inner: RefCell<ArbiterInner>,
}

impl Default for DragArbiter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DragArbiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("DragArbiter")
            .field("holder", &inner.holder.as_ref().map(|h| h.token))
            .field("waiting", &inner.waiting.len())
            .field("cancelled", &inner.cancelled)
            .finish()
    }
}

impl DragArbiter {
    /// Number of unacknowledged cancellations remembered. Past this the
    /// oldest preempted token reports [`TokenStatus::Finished`].
    pub const CANCELLED_HISTORY: usize = 16;

    pub fn new() -> Self {
        Self {
            next_id: Cell::new(1),
            inner: RefCell::new(ArbiterInner::default()),
        }
    }

    fn issue(&self, priority: MutatePriority) -> MutatorToken {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        MutatorToken { id, priority }
    }

    /// Current state of the arbiter.
    pub fn state(&self) -> ArbiterState {
        match self.inner.borrow().holder.as_ref() {
            Some(holder) => ArbiterState::Dragging(holder.token.priority),
            None => ArbiterState::Idle,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.inner.borrow().holder.is_none()
    }

    /// The token currently holding the arbiter, if any.
    pub fn holder(&self) -> Option<MutatorToken> {
        self.inner.borrow().holder.as_ref().map(|h| h.token)
    }

    pub fn status(&self, token: MutatorToken) -> TokenStatus {
        self.inner.borrow().status(token)
    }

    /// Requests the arbiter at `priority`.
    ///
    /// Granted at once when idle or when the holder has a strictly lower
    /// priority (the holder is cancelled and its cleanup runs before this
    /// returns). Otherwise the request is queued.
    ///
    /// Owners of a granted token must [`release`](Self::release) it even
    /// after it was cancelled; the arbiter only remembers the last
    /// [`CANCELLED_HISTORY`](Self::CANCELLED_HISTORY) cancellations.
    pub fn acquire(&self, priority: MutatePriority) -> Acquisition {
        let token = self.issue(priority);
        let cleanup = {
            let mut inner = self.inner.borrow_mut();
            match inner.holder.as_ref().map(|h| h.token.priority) {
                Some(holder) if holder >= priority => {
                    log::debug!("mutator {} queued behind {:?} holder", token.id, holder);
                    inner.enqueue(token);
                    return Acquisition::Queued(token);
                }
                _ => inner.take_over(token),
            }
        };
        log::debug!("mutator {} acquired at {:?}", token.id, priority);
        run_cleanup(cleanup);
        Acquisition::Granted(token)
    }

    /// Takes the arbiter regardless of the holder's priority.
    pub fn acquire_immediately(&self, priority: MutatePriority) -> MutatorToken {
        let token = self.issue(priority);
        let cleanup = self.inner.borrow_mut().take_over(token);
        log::debug!("mutator {} took over at {:?}", token.id, priority);
        run_cleanup(cleanup);
        token
    }

    /// Like [`acquire`](Self::acquire) but fails instead of queuing.
    pub fn try_acquire(&self, priority: MutatePriority) -> Result<MutatorToken, ArbiterError> {
        let cleanup = {
            let mut inner = self.inner.borrow_mut();
            if let Some(holder) = inner.holder.as_ref().map(|h| h.token.priority) {
                if holder >= priority {
                    return Err(ArbiterError::Busy {
                        holder,
                        requested: priority,
                    });
                }
            }
            let token = self.issue(priority);
            (token, inner.take_over(token))
        };
        run_cleanup(cleanup.1);
        Ok(cleanup.0)
    }

    /// Registers cleanup to run if `token` is preempted. Replaces any
    /// previously registered handler.
    pub fn on_cancel(
        &self,
        token: MutatorToken,
        handler: impl FnOnce() + 'static,
    ) -> Result<(), ArbiterError> {
        let mut inner = self.inner.borrow_mut();
        match inner.entry_mut(token) {
            Some(entry) => {
                entry.on_cancel = Some(Box::new(handler));
                Ok(())
            }
            None => Err(inner.rejection(token)),
        }
    }

    /// Runs `mutation` if `token` holds the arbiter.
    ///
    /// No internal borrow is held while `mutation` runs, so it may call back
    /// into the arbiter.
    pub fn with_mutator<R>(
        &self,
        token: MutatorToken,
        mutation: impl FnOnce() -> R,
    ) -> Result<R, ArbiterError> {
        {
            let inner = self.inner.borrow();
            if inner.status(token) != TokenStatus::Active {
                return Err(inner.rejection(token));
            }
        }
        Ok(mutation())
    }

    /// Gives up `token`.
    ///
    /// Releasing the holder promotes the next waiting request and returns it.
    /// Releasing a queued token withdraws it. Releasing a cancelled token
    /// acknowledges the cancellation and reports it as an error.
    pub fn release(&self, token: MutatorToken) -> Result<Option<MutatorToken>, ArbiterError> {
        let mut inner = self.inner.borrow_mut();
        match inner.status(token) {
            TokenStatus::Active => {
                inner.holder = inner.waiting.pop_front();
                let promoted = inner.holder.as_ref().map(|h| h.token);
                match promoted {
                    Some(next) => log::debug!("mutator {} released, {} promoted", token.id, next.id),
                    None => log::debug!("mutator {} released", token.id),
                }
                Ok(promoted)
            }
            TokenStatus::Queued => {
                inner.waiting.retain(|entry| entry.token != token);
                log::debug!("mutator {} withdrawn from queue", token.id);
                Ok(None)
            }
            TokenStatus::Cancelled => {
                inner.cancelled.retain(|id| *id != token.id);
                Err(ArbiterError::Cancelled { id: token.id })
            }
            TokenStatus::Finished => Err(ArbiterError::NotHolder { id: token.id }),
        }
    }

    /// One-shot mutation: acquire without queuing, run, release.
    pub fn mutate<R>(
        &self,
        priority: MutatePriority,
        mutation: impl FnOnce(MutatorToken) -> R,
    ) -> Result<R, ArbiterError> {
        let token = self.try_acquire(priority)?;
        let result = mutation(token);
        match self.release(token) {
            // The mutation already ran; a takeover from inside it only means
            // there is nothing left to hand back.
            Ok(_) | Err(ArbiterError::Cancelled { .. }) => Ok(result),
            Err(err) => Err(err),
        }
    }
}

fn run_cleanup(cleanup: Option<CancelHandler>) {
    if let Some(cleanup) = cleanup {
        cleanup();
    }
}
