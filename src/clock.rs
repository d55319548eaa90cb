//! Clock signals and tick synchronization.
//!
//! A [`Clock`] is the shared notion of elapsed time for one emulated machine:
//! it hands out a monotonically increasing tick count and lets consumers block
//! until a scheduled tick arrives. The CPU awaits its cycle count on the
//! clock after every instruction, and peripheral emulators can share the same
//! clock (usually through a [`Divider`]) so the whole machine stays in phase.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError, Weak};
use std::thread;
use std::time::Duration;

use log::debug;

/// Period of the NTSC master oscillator, ~21.477 MHz.
pub const DEFAULT_MASTER_PERIOD: Duration = Duration::from_nanos(46);

/// Master ticks per CPU tick; divides the NTSC master down to ~1.79 MHz.
pub const DEFAULT_CPU_DIVISOR: u64 = 12;

/// A clock signal for an emulated IC.
///
/// Methods take `&self`: a clock is shared between its producer and any
/// number of consumers, so implementations use interior mutability.
///
/// The tick counter is monotonically non-decreasing and advances only while
/// the clock is running. Clock operations do not fail.
pub trait Clock {
    /// Current value of the tick counter.
    fn ticks(&self) -> u64;

    /// Starts the clock and returns the tick count at start. A no-op
    /// returning the current count when already running.
    fn start(&self) -> u64;

    /// Pauses the clock. A no-op when already stopped.
    fn stop(&self);

    /// Blocks the caller until `ticks() >= tick`, returning the count
    /// observed on release. Returns immediately if the tick has already
    /// passed.
    fn wait(&self, tick: u64) -> u64;
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn ticks(&self) -> u64 {
        (**self).ticks()
    }

    fn start(&self) -> u64 {
        (**self).start()
    }

    fn stop(&self) {
        (**self).stop()
    }

    fn wait(&self, tick: u64) -> u64 {
        (**self).wait(tick)
    }
}

struct ClockState {
    ticks: u64,
    running: bool,
    /// Bumped on every start so a producer from a previous start/stop cycle
    /// can tell it has been superseded.
    era: u64,
}

struct Shared {
    state: Mutex<ClockState>,
    arrived: Condvar,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, ClockState> {
        // A poisoned clock still tells the time.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A wall-clock-driven [`Clock`] that increments once per configured period.
///
/// While running, a background thread advances the counter and wakes every
/// waiter whose target has been reached. The producer and the waiters share
/// one mutex, so a waiter that observes `ticks() < target` is guaranteed to
/// be woken when the producer reaches the target.
///
/// `ThreadClock` is cheap to clone; clones share the same counter.
///
/// Stopping the clock freezes the counter. Outstanding waiters stay blocked
/// until the clock is started again; hosts should park their consumers before
/// stopping.
///
/// At nanosecond periods the host OS cannot sleep precisely, so the real tick
/// rate is best-effort; the contract (monotonicity, wake-on-reach) holds
/// regardless.
#[derive(Clone)]
pub struct ThreadClock {
    period: Duration,
    shared: Arc<Shared>,
}

impl ThreadClock {
    /// A stopped clock with a zero tick counter, incrementing every `period`
    /// once started.
    pub fn new(period: Duration) -> Self {
        ThreadClock {
            period,
            shared: Arc::new(Shared {
                state: Mutex::new(ClockState {
                    ticks: 0,
                    running: false,
                    era: 0,
                }),
                arrived: Condvar::new(),
            }),
        }
    }
}

impl Clock for ThreadClock {
    fn ticks(&self) -> u64 {
        self.shared.lock().ticks
    }

    fn start(&self) -> u64 {
        let mut state = self.shared.lock();
        if state.running {
            return state.ticks;
        }

        state.running = true;
        state.era += 1;
        let ticks = state.ticks;
        debug!("clock started at tick {ticks}");

        let shared = Arc::downgrade(&self.shared);
        let period = self.period;
        let era = state.era;
        thread::spawn(move || run_producer(shared, period, era));

        ticks
    }

    fn stop(&self) {
        let mut state = self.shared.lock();
        if state.running {
            state.running = false;
            debug!("clock stopped at tick {}", state.ticks);
        }
    }

    fn wait(&self, tick: u64) -> u64 {
        let mut state = self.shared.lock();
        while state.ticks < tick {
            state = self
                .shared
                .arrived
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
        state.ticks
    }
}

fn run_producer(shared: Weak<Shared>, period: Duration, era: u64) {
    loop {
        thread::sleep(period);

        // The clock may have been dropped, stopped, or restarted (which
        // hands the counter to a newer producer).
        let Some(shared) = shared.upgrade() else {
            return;
        };
        let mut state = shared.lock();
        if !state.running || state.era != era {
            return;
        }

        state.ticks += 1;
        drop(state);
        shared.arrived.notify_all();
    }
}

/// Divides a master [`Clock`] down to a slower tick domain.
///
/// `ticks()` is `master.ticks() / divisor` (integer division); waiting for
/// tick `t` waits for master tick `t * divisor`.
///
/// # Examples
///
/// ```
/// use m6502::{Clock, Divider, ThreadClock};
/// use m6502::{DEFAULT_CPU_DIVISOR, DEFAULT_MASTER_PERIOD};
///
/// // The NES CPU clock: the NTSC master divided down to ~1.79 MHz.
/// let master = ThreadClock::new(DEFAULT_MASTER_PERIOD);
/// let cpu_clock = Divider::new(master, DEFAULT_CPU_DIVISOR);
/// assert_eq!(cpu_clock.ticks(), 0);
/// ```
#[derive(Clone)]
pub struct Divider<C> {
    master: C,
    divisor: u64,
}

impl<C: Clock> Divider<C> {
    /// Wraps `master`, dividing its rate by `divisor`.
    ///
    /// # Panics
    ///
    /// Panics if `divisor` is zero.
    pub fn new(master: C, divisor: u64) -> Self {
        assert!(divisor > 0, "clock divisor must be non-zero");
        Divider { master, divisor }
    }
}

impl<C: Clock> Clock for Divider<C> {
    fn ticks(&self) -> u64 {
        self.master.ticks() / self.divisor
    }

    fn start(&self) -> u64 {
        self.master.start() / self.divisor
    }

    fn stop(&self) {
        self.master.stop()
    }

    fn wait(&self, tick: u64) -> u64 {
        self.master.wait(tick * self.divisor) / self.divisor
    }
}

/// A logical [`Clock`] that never sleeps.
///
/// `wait` advances the counter straight to the requested tick, so emulated
/// code runs at host speed while cycle accounting stays intact. Intended for
/// headless runs and deterministic tests.
#[derive(Default)]
pub struct FreeClock {
    ticks: AtomicU64,
}

impl FreeClock {
    /// A logical clock starting at tick zero.
    pub fn new() -> Self {
        FreeClock::default()
    }
}

impl Clock for FreeClock {
    fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Acquire)
    }

    fn start(&self) -> u64 {
        self.ticks()
    }

    fn stop(&self) {}

    fn wait(&self, tick: u64) -> u64 {
        self.ticks.fetch_max(tick, Ordering::AcqRel).max(tick)
    }
}
