//! ## twinmode-core::time
//! **Dual-mode clock with deterministic timers**
//!
//! `Clock::create()` reads wall-clock time and schedules timers on the tokio
//! runtime. `Clock::create_null()` keeps a logical millisecond counter that only
//! moves when a test drives it with one of the `advance_*` operations.
//!
//! ### Null-mode guarantees:
//! - Timers fire in `(deadline, insertion order)` order
//! - Time does not move while a raced operation or a clock wait is still
//!   being woken; the next deadline fires only once they have settled
//! - In `race_with_timeout`, an operation that settles at the same logical
//!   instant as the timeout wins
//!
//! Settling is judged on a current-thread runtime, which is what
//! `#[tokio::test]` provides.

mod timers;

use std::fmt;
use std::future::{self, Future};
use std::pin::{pin, Pin};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll, Wake, Waker};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::oneshot;
use tokio::task::AbortHandle;
use tracing::{debug, trace};

use crate::error::ClockError;
use timers::{TimerCallback, TimerQueue};

/// Upper bound on timer firings in a single `advance_*` call.
pub const MAX_TIMER_FIRINGS: usize = 10_000;

/// Upper bound on scheduler passes spent waiting for woken work to settle.
pub const MAX_SETTLE_PASSES: usize = 10_000;

/// Consecutive passes without a tracked wake that count as settled.
const QUIET_PASSES: usize = 2;

/// Time source and timer scheduler, either live or null.
#[derive(Clone)]
pub struct Clock {
    inner: ClockInner,
}

#[derive(Clone)]
enum ClockInner {
    Live,
    Null(Arc<NullState>),
}

struct NullState {
    queue: Mutex<TimerQueue>,
    /// Bumped every time a tracked future is woken.
    wakes: AtomicU64,
}

/// Forwards a wake to the task and records that tracked work is runnable.
struct CountingWaker {
    state: Arc<NullState>,
    waker: Waker,
}

impl Wake for CountingWaker {
    fn wake(self: Arc<Self>) {
        self.wake_by_ref();
    }

    fn wake_by_ref(self: &Arc<Self>) {
        self.state.wakes.fetch_add(1, Ordering::SeqCst);
        self.waker.wake_by_ref();
    }
}

/// Opaque handle for cancelling a timer.
#[derive(Debug)]
pub struct TimerHandle(HandleInner);

#[derive(Debug)]
enum HandleInner {
    Null(u64),
    Live(AbortHandle),
}

/// Cancels its timer when dropped. Cancelling a fired timer does nothing.
struct TimerGuard<'a> {
    clock: &'a Clock,
    handle: TimerHandle,
}

impl Drop for TimerGuard<'_> {
    fn drop(&mut self) {
        self.clock.cancel_timer(&self.handle);
    }
}

impl Clock {
    /// Creates a clock backed by wall-clock time and tokio timers.
    pub fn create() -> Self {
        Self {
            inner: ClockInner::Live,
        }
    }

    /// Creates a null clock starting at logical time zero.
    pub fn create_null() -> Self {
        Self::create_null_at(0)
    }

    /// Creates a null clock starting at `start_ms`.
    pub fn create_null_at(start_ms: u64) -> Self {
        Self {
            inner: ClockInner::Null(Arc::new(NullState {
                queue: Mutex::new(TimerQueue::new(start_ms)),
                wakes: AtomicU64::new(0),
            })),
        }
    }

    /// Current time in milliseconds: Unix time when live, logical time when null.
    pub fn now(&self) -> u64 {
        match &self.inner {
            ClockInner::Live => chrono::Utc::now().timestamp_millis().max(0) as u64,
            ClockInner::Null(state) => state.queue.lock().now(),
        }
    }

    /// Number of timers waiting to fire. Live timers belong to the runtime
    /// and are not counted.
    pub fn pending_timers(&self) -> usize {
        match &self.inner {
            ClockInner::Live => 0,
            ClockInner::Null(state) => state.queue.lock().len(),
        }
    }

    /// Schedules `callback` to run after `delay_ms` milliseconds.
    ///
    /// # Panics
    /// A live clock spawns onto the tokio runtime and panics outside of one.
    pub fn set_timer<F>(&self, delay_ms: i64, callback: F) -> Result<TimerHandle, ClockError>
    where
        F: FnOnce() + Send + 'static,
    {
        let delay_ms = u64::try_from(delay_ms).map_err(|_| ClockError::NegativeDelay(delay_ms))?;
        Ok(self.schedule(delay_ms, Box::new(callback)))
    }

    /// Cancels a pending timer. Cancelling a fired or already-cancelled timer
    /// does nothing.
    pub fn cancel_timer(&self, handle: &TimerHandle) {
        match (&self.inner, &handle.0) {
            (ClockInner::Null(state), HandleInner::Null(seq)) => {
                if state.queue.lock().cancel(*seq) {
                    trace!(seq, "timer cancelled");
                }
            }
            (ClockInner::Live, HandleInner::Live(abort)) => abort.abort(),
            _ => {}
        }
    }

    /// Completes once `ms` milliseconds of clock time have passed. Dropping
    /// the wait early cancels its timer.
    pub async fn wait_async(&self, ms: u64) {
        let (tx, rx) = oneshot::channel();
        let _timer = TimerGuard {
            clock: self,
            handle: self.schedule(
                ms,
                Box::new(move || {
                    let _ = tx.send(());
                }),
            ),
        };
        let mut rx = pin!(rx);
        let _ = future::poll_fn(|cx| self.poll_tracked(rx.as_mut(), cx)).await;
    }

    /// Races `operation` against a timer of `timeout_ms`.
    ///
    /// If the operation settles first its output is returned and the timer is
    /// cancelled. If the timer fires first, the output of `on_timeout` is
    /// returned instead and the operation is not polled again. Cancelling
    /// the underlying work is the caller's job. Pass `&mut operation` to keep
    /// the operation alive after a timeout; passed by value it is dropped.
    pub async fn race_with_timeout<T, Op, OnTimeout, Fallback>(
        &self,
        timeout_ms: u64,
        operation: Op,
        on_timeout: OnTimeout,
    ) -> T
    where
        Op: Future<Output = T>,
        OnTimeout: FnOnce() -> Fallback,
        Fallback: Future<Output = T>,
    {
        let mut operation = pin!(operation);
        let mut operation = pin!(future::poll_fn(move |cx| {
            self.poll_tracked(operation.as_mut(), cx)
        }));

        // An operation that is already settled wins outright. Polling it before
        // the timer exists also lets it register its own timers first.
        if let Poll::Ready(output) = futures::poll!(operation.as_mut()) {
            return output;
        }

        let (fired_tx, fired_rx) = oneshot::channel::<()>();
        let _timer = TimerGuard {
            clock: self,
            handle: self.schedule(
                timeout_ms,
                Box::new(move || {
                    let _ = fired_tx.send(());
                }),
            ),
        };

        tokio::select! {
            biased;
            output = operation => output,
            Ok(()) = fired_rx => {
                debug!(timeout_ms, "operation did not settle before timeout");
                on_timeout().await
            }
        }
    }

    /// Fires every timer sharing the earliest pending deadline. Returns the
    /// number of callbacks run.
    pub async fn advance_to_next_timer_async(&self) -> Result<usize, ClockError> {
        let state = self.null_state()?;
        settle(state).await?;
        let fired = run_next_deadline(state, None);
        settle(state).await?;
        Ok(fired)
    }

    /// Fires timers in order until none remain, including timers scheduled by
    /// the callbacks themselves.
    pub async fn advance_all_timers_async(&self) -> Result<usize, ClockError> {
        let state = self.null_state()?;
        let mut fired = 0;
        loop {
            settle(state).await?;
            let batch = run_next_deadline(state, None);
            if batch == 0 {
                break;
            }
            fired += batch;
            if fired > MAX_TIMER_FIRINGS {
                return Err(ClockError::RunawayTimers(fired));
            }
        }
        debug!(fired, now = state.queue.lock().now(), "advanced through all timers");
        Ok(fired)
    }

    /// Fires every timer due within the next `ms` milliseconds, then sets the
    /// clock to exactly `now + ms`.
    pub async fn advance_by_async(&self, ms: u64) -> Result<usize, ClockError> {
        let state = self.null_state()?;
        let target = state.queue.lock().now().saturating_add(ms);
        let mut fired = 0;
        loop {
            settle(state).await?;
            let batch = run_next_deadline(state, Some(target));
            if batch == 0 {
                break;
            }
            fired += batch;
            if fired > MAX_TIMER_FIRINGS {
                return Err(ClockError::RunawayTimers(fired));
            }
        }
        state.queue.lock().advance_to(target);
        settle(state).await?;
        Ok(fired)
    }

    fn schedule(&self, delay_ms: u64, callback: TimerCallback) -> TimerHandle {
        match &self.inner {
            ClockInner::Live => {
                let task = tokio::spawn(async move {
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                    callback();
                });
                TimerHandle(HandleInner::Live(task.abort_handle()))
            }
            ClockInner::Null(state) => {
                let seq = state.queue.lock().schedule(delay_ms, callback);
                trace!(seq, delay_ms, "timer scheduled");
                TimerHandle(HandleInner::Null(seq))
            }
        }
    }

    /// Polls `future` so that its wakes are visible to `settle`.
    fn poll_tracked<F>(&self, future: Pin<&mut F>, cx: &mut Context<'_>) -> Poll<F::Output>
    where
        F: Future + ?Sized,
    {
        match &self.inner {
            ClockInner::Live => future.poll(cx),
            ClockInner::Null(state) => {
                let waker = Waker::from(Arc::new(CountingWaker {
                    state: Arc::clone(state),
                    waker: cx.waker().clone(),
                }));
                future.poll(&mut Context::from_waker(&waker))
            }
        }
    }

    fn null_state(&self) -> Result<&Arc<NullState>, ClockError> {
        match &self.inner {
            ClockInner::Null(state) => Ok(state),
            ClockInner::Live => Err(ClockError::NotNullable),
        }
    }
}

impl fmt::Debug for Clock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner {
            ClockInner::Live => f.write_str("Clock::Live"),
            ClockInner::Null(state) => {
                let queue = state.queue.lock();
                f.debug_struct("Clock::Null")
                    .field("now", &queue.now())
                    .field("pending", &queue.len())
                    .finish()
            }
        }
    }
}

/// Pops one deadline group and runs its callbacks outside the lock, so a
/// callback may schedule further timers.
fn run_next_deadline(state: &NullState, limit: Option<u64>) -> usize {
    let due = state.queue.lock().pop_next_deadline(limit);
    let fired = due.len();
    for (key, callback) in due {
        trace!(seq = key.seq, deadline = key.deadline, "timer fired");
        callback();
    }
    fired
}

/// Yields until tracked futures stop being woken: every raced operation and
/// clock wait has either finished or is blocked on something that only a
/// later timer can release.
async fn settle(state: &NullState) -> Result<(), ClockError> {
    let mut quiet = 0;
    for _ in 0..MAX_SETTLE_PASSES {
        let before = state.wakes.load(Ordering::SeqCst);
        tokio::task::yield_now().await;
        if state.wakes.load(Ordering::SeqCst) == before {
            quiet += 1;
            if quiet == QUIET_PASSES {
                return Ok(());
            }
        } else {
            quiet = 0;
        }
    }
    Err(ClockError::Unsettled(MAX_SETTLE_PASSES))
}
