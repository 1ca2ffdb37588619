use std::cell::Cell;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent};

/// Refresh interval while an attempt is running
pub const TICK_RATE_MS: u64 = 100;

#[derive(Clone, Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

impl AppEvent {
    /// Terminal events the app cares about; mouse, focus and paste are dropped
    fn from_terminal(event: CtEvent) -> Option<Self> {
        match event {
            CtEvent::Key(key) => Some(AppEvent::Key(key)),
            CtEvent::Resize(_, _) => Some(AppEvent::Resize),
            _ => None,
        }
    }
}

pub trait EventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError>;

    /// Block until an event arrives; None once the source is gone
    fn recv(&self) -> Option<AppEvent>;
}

/// Events delivered over a channel, fed by the terminal reader or by a test
pub struct ChannelEventSource {
    rx: Receiver<AppEvent>,
}

impl ChannelEventSource {
    pub fn new(rx: Receiver<AppEvent>) -> Self {
        Self { rx }
    }

    /// Reads crossterm events on a background thread
    pub fn terminal() -> Self {
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || forward_terminal_events(tx));
        Self::new(rx)
    }
}

fn forward_terminal_events(tx: Sender<AppEvent>) {
    loop {
        let event = match event::read() {
            Ok(event) => event,
            Err(err) => {
                tracing::warn!(error = %err, "terminal event stream closed");
                return;
            }
        };
        if let Some(event) = AppEvent::from_terminal(event) {
            // receiver gone means the app has quit
            if tx.send(event).is_err() {
                return;
            }
        }
    }
}

impl EventSource for ChannelEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }

    fn recv(&self) -> Option<AppEvent> {
        self.rx.recv().ok()
    }
}

pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Default for FixedTicker {
    fn default() -> Self {
        Self::new(Duration::from_millis(TICK_RATE_MS))
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Hands the event loop one event at a time, inserting ticks on a fixed cadence
pub struct Runner<E: EventSource, T: Ticker> {
    event_source: E,
    ticker: T,
    /// when the next Tick is due; None while not ticking
    next_tick: Cell<Option<Instant>>,
}

impl<E: EventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
            next_tick: Cell::new(None),
        }
    }

    /// Next event, or Tick once the tick deadline passes.
    ///
    /// The deadline does not move when events arrive, so a steady stream
    /// of keys cannot hold ticks back.
    pub fn step(&self) -> AppEvent {
        let now = Instant::now();
        let deadline = self
            .next_tick
            .get()
            .unwrap_or_else(|| now + self.ticker.interval());

        if now >= deadline {
            self.schedule_after(deadline, now);
            return AppEvent::Tick;
        }
        self.next_tick.set(Some(deadline));

        match self.event_source.recv_timeout(deadline - now) {
            Ok(event) => event,
            Err(RecvTimeoutError::Timeout) => {
                self.schedule_after(deadline, Instant::now());
                AppEvent::Tick
            }
            Err(RecvTimeoutError::Disconnected) => {
                // no more input, keep the cadence anyway
                std::thread::sleep(deadline.saturating_duration_since(Instant::now()));
                self.schedule_after(deadline, Instant::now());
                AppEvent::Tick
            }
        }
    }

    fn schedule_after(&self, deadline: Instant, now: Instant) {
        let interval = self.ticker.interval();
        let next = deadline + interval;
        // after a long stall, restart the cadence instead of bursting ticks
        self.next_tick
            .set(Some(if next <= now { now + interval } else { next }));
    }

    /// Ticks only while `ticking`; otherwise blocks on input and returns
    /// None once the input is closed
    pub fn next_event(&self, ticking: bool) -> Option<AppEvent> {
        if ticking {
            Some(self.step())
        } else {
            self.next_tick.set(None);
            self.event_source.recv()
        }
    }
}
