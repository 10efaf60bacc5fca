use gloo::render::request_animation_frame;
use gloo::timers::callback::Timeout;

use crate::handle::AnimationHandle;
use crate::scheduler::{FrameCallback, Scheduler, TimerCallback};

/// `setTimeout` / `requestAnimationFrame` on the page's window.
///
/// The gloo handles clear their browser request when dropped, so each
/// `AnimationHandle` only has to own one.
#[derive(Debug, Default)]
pub struct BrowserScheduler;

impl Scheduler for BrowserScheduler {
    fn set_timeout(&self, delay_ms: u32, callback: TimerCallback) -> AnimationHandle {
        let timeout = Timeout::new(delay_ms, callback);
        AnimationHandle::new(move || drop(timeout))
    }

    fn request_frame(&self, callback: FrameCallback) -> AnimationHandle {
        let frame = request_animation_frame(callback);
        AnimationHandle::new(move || drop(frame))
    }
}
