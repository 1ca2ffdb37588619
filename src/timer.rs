use crate::metrics::format_time;
use crate::settings::Mode;
use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Source of the current instant
pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Clone, Debug)]
pub struct ManualClock {
    origin: Instant,
    offset: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Rc::new(Cell::new(Duration::ZERO)),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.offset.set(self.offset.get() + by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.offset.get()
    }
}

/// Held for exactly as long as the timer is running
#[derive(Debug)]
struct RunningSpan {
    started_at: Instant,
}

/// Whole seconds elapsed since the first keystroke of an attempt
#[derive(Debug)]
pub struct Timer<C: Clock = SystemClock> {
    clock: C,
    mode: Mode,
    running: Option<RunningSpan>,
    elapsed_secs: u64,
}

impl Timer<SystemClock> {
    pub fn new(mode: Mode) -> Self {
        Self::with_clock(mode, SystemClock)
    }
}

impl<C: Clock> Timer<C> {
    pub fn with_clock(mode: Mode, clock: C) -> Self {
        Self {
            clock,
            mode,
            running: None,
            elapsed_secs: 0,
        }
    }

    pub fn start(&mut self) {
        self.running = Some(RunningSpan {
            started_at: self.clock.now(),
        });
        self.elapsed_secs = 0;
    }

    /// Recomputes elapsed time; does nothing unless running
    pub fn tick(&mut self) {
        let Some(span) = &self.running else {
            return;
        };
        let mut secs = self
            .clock
            .now()
            .saturating_duration_since(span.started_at)
            .as_secs();
        if let Some(limit) = self.mode.time_limit_secs() {
            secs = secs.min(limit);
        }
        self.elapsed_secs = self.elapsed_secs.max(secs);
    }

    /// Freezes elapsed time at its current value
    pub fn stop(&mut self) {
        self.running = None;
    }

    pub fn reset(&mut self) {
        self.running = None;
        self.elapsed_secs = 0;
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    pub fn is_time_up(&self) -> bool {
        self.mode
            .time_limit_secs()
            .is_some_and(|limit| self.elapsed_secs >= limit)
    }

    pub fn formatted(&self) -> String {
        format_time(self.elapsed_secs, self.mode)
    }
}
