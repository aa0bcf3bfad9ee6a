use eframe::egui::Context;

use campaign_graph::layout::{FrameClock, FrameHandle};

pub struct EguiFrameClock {
    ctx: Context,
    next: u64,
}

impl EguiFrameClock {
    pub fn new(ctx: Context) -> Self {
        Self { ctx, next: 0 }
    }
}

impl FrameClock for EguiFrameClock {
    fn request_frame(&mut self) -> FrameHandle {
        self.next += 1;
        self.ctx.request_repaint();
        FrameHandle::new(self.next)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        tracing::trace!(frame = handle.raw(), "dropping frame request");
    }
}
