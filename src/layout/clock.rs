use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

impl FrameHandle {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Host animation clock the driver schedules its steps against.
pub trait FrameClock {
    fn request_frame(&mut self) -> FrameHandle;
    fn cancel_frame(&mut self, handle: FrameHandle);
}

#[derive(Default)]
struct ManualClockState {
    next: u64,
    pending: VecDeque<FrameHandle>,
    cancelled: usize,
}

/// Clock advanced by hand. Clones share state, so a caller can keep a clone
/// to fire frames and inspect what the driver left scheduled.
#[derive(Clone, Default)]
pub struct ManualClock {
    state: Rc<RefCell<ManualClockState>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes the oldest pending frame. The caller then runs the frame
    /// callback, normally `SimulationDriver::on_frame`.
    pub fn fire(&self) -> Option<FrameHandle> {
        self.state.borrow_mut().pending.pop_front()
    }

    pub fn pending_frames(&self) -> usize {
        self.state.borrow().pending.len()
    }

    pub fn cancelled_frames(&self) -> usize {
        self.state.borrow().cancelled
    }
}

impl FrameClock for ManualClock {
    fn request_frame(&mut self) -> FrameHandle {
        let mut state = self.state.borrow_mut();
        state.next += 1;
        let handle = FrameHandle(state.next);
        state.pending.push_back(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let mut state = self.state.borrow_mut();
        let before = state.pending.len();
        state.pending.retain(|pending| *pending != handle);
        if state.pending.len() != before {
            state.cancelled += 1;
        }
    }
}
