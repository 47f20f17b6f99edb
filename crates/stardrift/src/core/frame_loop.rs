use log::{debug, warn};

use crate::api::host::{FrameHandle, FrameScheduler};

/// Lifecycle of the self-rescheduling frame callback.
///
/// ```text
/// Idle -> Scheduled -> Running -> Scheduled -> ... -> Cancelled
///            \___________________________________/
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Not started, or stopped because the scheduler refused a request.
    /// [`RenderLoop::start`] leaves this state.
    Idle,
    /// A frame callback is pending under this handle.
    Scheduled(FrameHandle),
    /// Inside a tick.
    Running,
    /// Torn down. Callbacks that still fire are ignored.
    Cancelled,
}

/// Owner of the single pending frame handle.
#[derive(Debug)]
pub struct RenderLoop {
    state: LoopState,
}

impl RenderLoop {
    pub fn new() -> Self {
        Self {
            state: LoopState::Idle,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, LoopState::Scheduled(_) | LoopState::Running)
    }

    /// Idle/Cancelled -> Scheduled. Returns false if already active or the
    /// scheduler refused.
    pub fn start<S: FrameScheduler + ?Sized>(&mut self, scheduler: &mut S) -> bool {
        if self.is_active() {
            return false;
        }
        self.schedule(scheduler)
    }

    /// Scheduled -> Running, called when the frame callback fires. Returns
    /// false when the callback must not tick (cancelled, or never started).
    pub fn begin_tick(&mut self) -> bool {
        match self.state {
            LoopState::Scheduled(_) => {
                self.state = LoopState::Running;
                true
            }
            LoopState::Running => {
                warn!("frame callback re-entered while running");
                false
            }
            LoopState::Idle | LoopState::Cancelled => false,
        }
    }

    /// Running -> Scheduled. Reschedules unconditionally; a no-op if the loop
    /// was cancelled during the tick.
    pub fn finish_tick<S: FrameScheduler + ?Sized>(&mut self, scheduler: &mut S) {
        if self.state == LoopState::Running {
            self.schedule(scheduler);
        }
    }

    /// Any -> Cancelled, cancelling the pending handle if there is one.
    pub fn cancel<S: FrameScheduler + ?Sized>(&mut self, scheduler: &mut S) {
        if let LoopState::Scheduled(handle) = self.state {
            scheduler.cancel_frame(handle);
            debug!("cancelled frame {:?}", handle);
        }
        self.state = LoopState::Cancelled;
    }

    fn schedule<S: FrameScheduler + ?Sized>(&mut self, scheduler: &mut S) -> bool {
        match scheduler.request_frame() {
            Some(handle) => {
                self.state = LoopState::Scheduled(handle);
                true
            }
            None => {
                warn!("host refused to schedule a frame; render loop idle until restarted");
                self.state = LoopState::Idle;
                false
            }
        }
    }
}

impl Default for RenderLoop {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Spy {
        next: u64,
        requested: Vec<FrameHandle>,
        cancelled: Vec<FrameHandle>,
        refuse: bool,
    }

    impl FrameScheduler for Spy {
        fn request_frame(&mut self) -> Option<FrameHandle> {
            if self.refuse {
                return None;
            }
            self.next += 1;
            let h = FrameHandle(self.next);
            self.requested.push(h);
            Some(h)
        }

        fn cancel_frame(&mut self, handle: FrameHandle) {
            self.cancelled.push(handle);
        }
    }

    #[test]
    fn full_cycle() {
        let mut spy = Spy::default();
        let mut lp = RenderLoop::new();
        assert_eq!(lp.state(), LoopState::Idle);

        assert!(lp.start(&mut spy));
        assert_eq!(lp.state(), LoopState::Scheduled(FrameHandle(1)));

        assert!(lp.begin_tick());
        assert_eq!(lp.state(), LoopState::Running);
        lp.finish_tick(&mut spy);
        assert_eq!(lp.state(), LoopState::Scheduled(FrameHandle(2)));

        lp.cancel(&mut spy);
        assert_eq!(lp.state(), LoopState::Cancelled);
        assert_eq!(spy.cancelled, vec![FrameHandle(2)]);
    }

    #[test]
    fn tick_after_cancel_is_ignored() {
        let mut spy = Spy::default();
        let mut lp = RenderLoop::new();
        lp.start(&mut spy);
        lp.cancel(&mut spy);
        assert!(!lp.begin_tick());
        lp.finish_tick(&mut spy);
        assert_eq!(lp.state(), LoopState::Cancelled);
        assert_eq!(spy.requested.len(), 1);
    }

    #[test]
    fn cancel_during_tick_stops_reschedule() {
        let mut spy = Spy::default();
        let mut lp = RenderLoop::new();
        lp.start(&mut spy);
        assert!(lp.begin_tick());
        lp.cancel(&mut spy);
        lp.finish_tick(&mut spy);
        assert_eq!(lp.state(), LoopState::Cancelled);
        assert_eq!(spy.requested.len(), 1);
        assert!(spy.cancelled.is_empty());
    }

    #[test]
    fn start_twice_does_not_double_schedule() {
        let mut spy = Spy::default();
        let mut lp = RenderLoop::new();
        assert!(lp.start(&mut spy));
        assert!(!lp.start(&mut spy));
        assert_eq!(spy.requested.len(), 1);
    }

    #[test]
    fn restart_after_cancel() {
        let mut spy = Spy::default();
        let mut lp = RenderLoop::new();
        lp.start(&mut spy);
        lp.cancel(&mut spy);
        assert!(lp.start(&mut spy));
        assert!(lp.is_active());
    }

    #[test]
    fn refused_schedule_goes_idle() {
        let mut spy = Spy { refuse: true, ..Default::default() };
        let mut lp = RenderLoop::new();
        assert!(!lp.start(&mut spy));
        assert_eq!(lp.state(), LoopState::Idle);
    }

    #[test]
    fn refused_reschedule_can_be_restarted() {
        let mut spy = Spy::default();
        let mut lp = RenderLoop::new();
        lp.start(&mut spy);
        assert!(lp.begin_tick());
        spy.refuse = true;
        lp.finish_tick(&mut spy);
        assert_eq!(lp.state(), LoopState::Idle);

        spy.refuse = false;
        assert!(lp.start(&mut spy));
        assert!(matches!(lp.state(), LoopState::Scheduled(_)));
    }

    #[test]
    fn tick_without_start_is_ignored() {
        let mut lp = RenderLoop::new();
        assert!(!lp.begin_tick());
    }
}
