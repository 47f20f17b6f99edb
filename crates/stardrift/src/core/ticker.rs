use std::borrow::BorrowMut;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use log::debug;

use crate::api::backdrop::Backdrop;
use crate::api::headless::HeadlessHost;
use crate::api::host::Host;

/// Fixed-rate native driver for a backdrop on a [`HeadlessHost`].
///
/// Plays the role of the browser's frame clock: every period it sets the
/// host clock, takes the pending frame and fires the callback. Stops when
/// the channel receives a message or disconnects, or when the backdrop
/// stops requesting frames.
#[derive(Debug, Clone, Copy)]
pub struct Ticker {
    period: Duration,
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Self { period }
    }

    pub fn from_hz(hz: u32) -> Self {
        Self::new(Duration::from_secs_f64(1.0 / hz.max(1) as f64))
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Run until stopped. Returns the number of frame callbacks fired.
    pub fn run<H>(&self, backdrop: &mut Backdrop<H>, stop: &Receiver<()>) -> u64
    where
        H: Host + BorrowMut<HeadlessHost>,
    {
        let started = Instant::now();
        let mut fired = 0;
        loop {
            match stop.recv_timeout(self.period) {
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                Err(RecvTimeoutError::Timeout) => {}
            }

            let host = <H as BorrowMut<HeadlessHost>>::borrow_mut(backdrop.host_mut());
            host.set_now(started.elapsed().as_secs_f64() * 1000.0);
            if host.take_pending_frame().is_none() {
                debug!("no frame pending; ticker stopping");
                break;
            }
            backdrop.on_frame();
            fired += 1;
        }
        fired
    }
}

impl Default for Ticker {
    fn default() -> Self {
        Self::from_hz(60)
    }
}
