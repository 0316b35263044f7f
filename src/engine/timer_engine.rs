//! Timer engine: runs a [`TimerMachine`] against the clock
//!
//! Events go through one FIFO queue drained by one thread at a time, so every
//! event settles (actions, guards, tick source, listeners) before the next one
//! starts. `send` returns once its own event has settled, even when another
//! thread is draining. A listener that sends from inside its callback only
//! enqueues; the event is handled once the current one has settled.

use std::{
    collections::VecDeque,
    sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError, Weak},
    thread::{self, ThreadId},
    time::Duration,
};

use tokio::{sync::watch, time::Instant};
use tracing::{debug, info};

use super::ticker::{IntervalTicker, TickGuard, TickSource};
use crate::{
    config::TimerOptions,
    error::TimerError,
    machine::{MachineEvent, TimerEvent, TimerMachine, TimerSnapshot, TimerStatus},
};

type Listener = Arc<dyn Fn(&TimerSnapshot) + Send + Sync>;

/// A running countdown. Cloning yields another handle to the same timer.
#[derive(Clone)]
pub struct TimerEngine {
    inner: Arc<EngineInner>,
}

struct EngineInner {
    core: Mutex<EngineCore>,
    /// Signalled whenever `EngineCore::settled` advances or the drainer leaves
    settled: Condvar,
    listeners: Mutex<Listeners>,
    snapshot_tx: watch::Sender<TimerSnapshot>,
    tick_source: Box<dyn TickSource>,
    tick_period: Duration,
}

struct EngineCore {
    machine: TimerMachine,
    queue: VecDeque<(u64, MachineEvent)>,
    /// Sequence number handed to the last queued event
    queued: u64,
    /// Sequence number of the last fully settled event
    settled: u64,
    /// Thread currently draining the queue
    drainer: Option<ThreadId>,
    /// Present while the machine is `Running`
    ticker: Option<TickGuard>,
}

/// Tick source work decided under the core lock and carried out after it is
/// released
enum TickerChange {
    Start,
    Stop(TickGuard),
}

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(u64, Listener)>,
}

/// Handle returned by [`TimerEngine::subscribe`]
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    engine: Weak<EngineInner>,
}

impl Subscription {
    /// Stop delivering snapshots to this listener
    pub fn unsubscribe(self) {
        if let Some(inner) = self.engine.upgrade() {
            lock(&inner.listeners).entries.retain(|(id, _)| *id != self.id);
        }
    }
}

/// Build a timer engine ticking on the current tokio runtime
pub fn create_timer(options: TimerOptions) -> Result<TimerEngine, TimerError> {
    TimerEngine::new(options)
}

impl TimerEngine {
    /// Create a timer that starts counting immediately, ticking on the current
    /// tokio runtime.
    pub fn new(options: TimerOptions) -> Result<Self, TimerError> {
        options.validate()?;
        Self::with_tick_source(options, IntervalTicker::from_current()?)
    }

    /// Create a timer driven by a custom tick source
    pub fn with_tick_source(
        options: TimerOptions,
        tick_source: impl TickSource,
    ) -> Result<Self, TimerError> {
        options.validate()?;
        let tick_period = options.tick_period()?;

        let machine = TimerMachine::new(&options, Instant::now());
        let (snapshot_tx, _) = watch::channel(machine.snapshot());
        let inner = Arc::new(EngineInner {
            core: Mutex::new(EngineCore {
                machine,
                queue: VecDeque::new(),
                queued: 0,
                settled: 0,
                drainer: None,
                ticker: None,
            }),
            settled: Condvar::new(),
            listeners: Mutex::new(Listeners::default()),
            snapshot_tx,
            tick_source: Box::new(tick_source),
            tick_period,
        });

        // Acquire the first tick source as the drainer, so ticks it fires
        // straight away queue up behind it
        let change = {
            let mut core = lock(&inner.core);
            core.drainer = Some(thread::current().id());
            info!(
                duration = options.duration,
                interval = options.interval,
                state = %core.machine.status(),
                "Timer created"
            );
            EngineInner::ticker_change(&mut core)
        };
        let drain = DrainGuard { inner: &inner, armed: true };
        if let Some(change) = change {
            inner.apply_ticker_change(change);
        }
        inner.drain(drain);

        Ok(Self { inner })
    }

    /// Send an event to the timer. Returns once the event has settled, unless
    /// called from inside a listener, where it is queued behind the current one.
    pub fn send(&self, event: TimerEvent) {
        self.inner.dispatch(event.into());
    }

    /// Current state and context, without side effects
    pub fn snapshot(&self) -> TimerSnapshot {
        lock(&self.inner.core).machine.snapshot()
    }

    pub fn status(&self) -> TimerStatus {
        lock(&self.inner.core).machine.status()
    }

    /// Whether a tick source is currently held
    pub fn is_ticking(&self) -> bool {
        lock(&self.inner.core).ticker.is_some()
    }

    /// Register a listener called with the snapshot after every handled event
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&TimerSnapshot) + Send + Sync + 'static,
    {
        let listener: Listener = Arc::new(listener);
        let mut listeners = lock(&self.inner.listeners);
        let id = listeners.next_id;
        listeners.next_id += 1;
        listeners.entries.push((id, listener));

        Subscription {
            id,
            engine: Arc::downgrade(&self.inner),
        }
    }

    /// Channel that always holds the latest snapshot
    pub fn watch(&self) -> watch::Receiver<TimerSnapshot> {
        self.inner.snapshot_tx.subscribe()
    }

    #[cfg(test)]
    pub(crate) fn tick(&self) {
        self.inner.dispatch(MachineEvent::Tick);
    }
}

impl EngineInner {
    fn dispatch(self: &Arc<Self>, event: MachineEvent) {
        let me = thread::current().id();
        {
            let mut core = lock(&self.core);
            core.queued += 1;
            let seq = core.queued;
            core.queue.push_back((seq, event));

            loop {
                match core.drainer {
                    None => {
                        core.drainer = Some(me);
                        break;
                    }
                    // Sent from a listener: the running drain picks it up
                    Some(drainer) if drainer == me => return,
                    Some(_) => {
                        core = self
                            .settled
                            .wait_while(core, |core| core.settled < seq && core.drainer.is_some())
                            .unwrap_or_else(PoisonError::into_inner);
                        if core.settled >= seq {
                            return;
                        }
                        // The drainer left without reaching this event; take over
                    }
                }
            }
        }

        self.drain(DrainGuard { inner: self, armed: true });
    }

    /// Process queued events until the queue is empty. The caller holds the
    /// drainer role, which `drain` gives up on return.
    fn drain(self: &Arc<Self>, mut drain: DrainGuard<'_>) {
        loop {
            let (seq, settled, change) = {
                let mut core = lock(&self.core);
                let Some((seq, event)) = core.queue.pop_front() else {
                    core.drainer = None;
                    drain.armed = false;
                    drop(core);
                    self.settled.notify_all();
                    return;
                };
                match Self::step(&mut core, event) {
                    Some((snapshot, change)) => (seq, Some(snapshot), change),
                    None => (seq, None, None),
                }
            };

            if let Some(change) = change {
                self.apply_ticker_change(change);
            }
            if let Some(snapshot) = settled {
                self.snapshot_tx.send_replace(snapshot.clone());
                self.notify(&snapshot);
            }

            lock(&self.core).settled = seq;
            self.settled.notify_all();
        }
    }

    /// Run one event through the machine. Returns the new snapshot and any
    /// tick source work when the event was handled.
    fn step(
        core: &mut EngineCore,
        event: MachineEvent,
    ) -> Option<(TimerSnapshot, Option<TickerChange>)> {
        let before = core.machine.status();
        if !core.machine.transition(event, Instant::now()) {
            return None;
        }

        let after = core.machine.status();
        if before != after {
            let context = core.machine.context();
            info!(
                from = %before,
                to = %after,
                elapsed = context.elapsed,
                duration = context.duration,
                "Timer state changed"
            );
        }

        let change = Self::ticker_change(core);
        Some((core.machine.snapshot(), change))
    }

    /// What the tick source needs so it is held exactly while running. Only
    /// the drainer (or the constructor) calls this, so the decision cannot go
    /// stale before it is applied.
    fn ticker_change(core: &mut EngineCore) -> Option<TickerChange> {
        let running = core.machine.status().is_running();

        if running && core.ticker.is_none() {
            Some(TickerChange::Start)
        } else if !running {
            core.ticker.take().map(TickerChange::Stop)
        } else {
            None
        }
    }

    /// Start or stop the tick source with no engine lock held
    fn apply_ticker_change(self: &Arc<Self>, change: TickerChange) {
        match change {
            TickerChange::Start => {
                let engine = Arc::downgrade(self);
                let guard = self.tick_source.start(
                    self.tick_period,
                    Arc::new(move || {
                        if let Some(inner) = engine.upgrade() {
                            inner.dispatch(MachineEvent::Tick);
                        }
                    }),
                );
                lock(&self.core).ticker = Some(guard);
                debug!(period = ?self.tick_period, "Tick source started");
            }
            TickerChange::Stop(guard) => {
                drop(guard);
                debug!("Tick source stopped");
            }
        }
    }

    fn notify(&self, snapshot: &TimerSnapshot) {
        let listeners: Vec<Listener> = lock(&self.listeners)
            .entries
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in listeners {
            listener(snapshot);
        }
    }
}

/// Releases the drain role if a listener panics mid-drain; a waiting sender
/// then takes over the queue.
struct DrainGuard<'a> {
    inner: &'a EngineInner,
    armed: bool,
}

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            lock(&self.inner.core).drainer = None;
            self.inner.settled.notify_all();
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
