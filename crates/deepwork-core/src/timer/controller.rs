//! Async driver for the countdown.
//!
//! The engine does not own a clock. The controller wraps it with one: a
//! spawned task ticks the shared engine once per second and forwards
//! events over a channel. Every command that leaves the Running state
//! aborts the pending ticker before touching the engine, so a stale
//! callback can never mutate the new state; the loop itself also exits as
//! soon as the engine stops running.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio::time;

use super::engine::TimerEngine;
use super::mode::DurationUpdate;
use crate::events::Event;

pub struct TimerController {
    engine: Arc<Mutex<TimerEngine>>,
    events: mpsc::UnboundedSender<Event>,
    ticker: Arc<Mutex<Option<JoinHandle<()>>>>,
    tick_interval: Duration,
}

impl TimerController {
    /// Wrap an engine with a 1-second clock. Returns the controller and
    /// the receiving end of its event stream.
    pub fn new(engine: TimerEngine) -> (Self, mpsc::UnboundedReceiver<Event>) {
        Self::with_interval(engine, Duration::from_secs(1))
    }

    /// Same, with a custom tick interval for compressed-clock tests.
    pub fn with_interval(
        engine: TimerEngine,
        tick_interval: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<Event>) {
        let (events, rx) = mpsc::unbounded_channel();
        let controller = Self {
            engine: Arc::new(Mutex::new(engine)),
            events,
            ticker: Arc::new(Mutex::new(None)),
            tick_interval,
        };
        (controller, rx)
    }

    /// Snapshot of the current engine state.
    pub async fn state(&self) -> TimerEngine {
        self.engine.lock().await.clone()
    }

    pub async fn snapshot(&self) -> Event {
        self.engine.lock().await.snapshot()
    }

    pub async fn start(&self) {
        let event = self.engine.lock().await.start();
        if let Some(event) = event {
            self.emit(event);
            self.spawn_ticker().await;
        }
    }

    pub async fn pause(&self) {
        self.cancel_ticker().await;
        let event = self.engine.lock().await.pause();
        if let Some(event) = event {
            self.emit(event);
        }
    }

    pub async fn reset(&self) {
        self.cancel_ticker().await;
        let event = self.engine.lock().await.reset();
        if let Some(event) = event {
            self.emit(event);
        }
    }

    pub async fn switch_mode(&self, mode_id: &str) {
        self.cancel_ticker().await;
        let event = self.engine.lock().await.switch_mode(mode_id);
        if let Some(event) = event {
            self.emit(event);
        }
    }

    pub async fn finish_session(&self) {
        self.cancel_ticker().await;
        let event = self.engine.lock().await.finish_session();
        if let Some(event) = event {
            self.emit(event);
        }
    }

    /// Durations may change mid-countdown; the ticker keeps running.
    pub async fn update_durations(&self, update: DurationUpdate) {
        let event = self.engine.lock().await.update_durations(update);
        if let Some(event) = event {
            self.emit(event);
        }
    }

    async fn spawn_ticker(&self) {
        let mut guard = self.ticker.lock().await;
        if let Some(handle) = guard.take() {
            handle.abort();
        }

        let engine = self.engine.clone();
        let events = self.events.clone();
        let tick_interval = self.tick_interval;

        let handle = tokio::spawn(async move {
            let mut interval = time::interval(tick_interval);
            // The first interval tick completes immediately; the countdown
            // starts one full interval later.
            interval.tick().await;
            loop {
                interval.tick().await;
                let event = {
                    let mut engine = engine.lock().await;
                    if !engine.is_running() {
                        break;
                    }
                    engine.tick()
                };
                if let Some(event) = event {
                    let completed = matches!(event, Event::NaturalCompletion { .. });
                    if events.send(event).is_err() {
                        log::warn!("event receiver dropped, stopping ticker");
                        break;
                    }
                    if completed {
                        break;
                    }
                }
            }
        });
        *guard = Some(handle);
    }

    async fn cancel_ticker(&self) {
        if let Some(handle) = self.ticker.lock().await.take() {
            handle.abort();
        }
    }

    fn emit(&self, event: Event) {
        let _ = self.events.send(event);
    }
}
