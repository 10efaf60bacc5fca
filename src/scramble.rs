//! Headline "shrink, then regrow" scramble transition.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::config::ScrambleTiming;
use crate::handle::AnimationHandle;
use crate::scheduler::Scheduler;

/// Receives every rendered string.
pub type TextSink = Box<dyn FnMut(&str)>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScramblePhase {
    Idle,
    /// `remaining` characters are still on screen.
    Shrinking { remaining: usize },
    /// The first `shown` characters of the target are on screen.
    Growing { shown: usize },
}

struct ScrambleState {
    rendered: String,
    target: String,
    phase: ScramblePhase,
    timer: Option<AnimationHandle>,
    rng: fastrand::Rng,
}

struct ScrambleShared {
    scheduler: Rc<dyn Scheduler>,
    timing: ScrambleTiming,
    state: RefCell<ScrambleState>,
    sink: RefCell<TextSink>,
}

/// Animates a headline toward a target string.
///
/// The text first loses one character per shrink step, the survivors
/// replaced by random capitals, then regrows one real target character per
/// grow step. Targets that arrive while shrinking are picked up when growth
/// starts. A target that arrives while growing and no longer extends the
/// visible prefix restarts the shrink from the current text.
pub struct ScrambleText {
    shared: Rc<ScrambleShared>,
}

impl ScrambleText {
    pub fn new(
        scheduler: Rc<dyn Scheduler>,
        timing: ScrambleTiming,
        initial: &str,
        sink: TextSink,
    ) -> Self {
        let shared = Rc::new(ScrambleShared {
            scheduler,
            timing,
            state: RefCell::new(ScrambleState {
                rendered: initial.to_string(),
                target: initial.to_string(),
                phase: ScramblePhase::Idle,
                timer: None,
                rng: fastrand::Rng::new(),
            }),
            sink: RefCell::new(sink),
        });
        let text = Self { shared };
        text.emit(initial);
        text
    }

    pub fn rendered(&self) -> String {
        self.shared.state.borrow().rendered.clone()
    }

    pub fn target(&self) -> String {
        self.shared.state.borrow().target.clone()
    }

    pub fn phase(&self) -> ScramblePhase {
        self.shared.state.borrow().phase
    }

    pub fn is_animating(&self) -> bool {
        self.phase() != ScramblePhase::Idle
    }

    pub fn set_target(&self, target: &str) {
        let restart = {
            let mut st = self.shared.state.borrow_mut();
            st.target = target.to_string();
            let phase = st.phase;
            match phase {
                ScramblePhase::Idle => st.rendered != st.target,
                ScramblePhase::Shrinking { .. } => false,
                ScramblePhase::Growing { shown } => {
                    if st.target.starts_with(st.rendered.as_str()) {
                        false
                    } else {
                        st.timer = None;
                        st.phase = ScramblePhase::Shrinking { remaining: shown };
                        true
                    }
                }
            }
        };
        if restart {
            let mut st = self.shared.state.borrow_mut();
            if st.phase == ScramblePhase::Idle {
                let remaining = st.rendered.chars().count();
                st.phase = ScramblePhase::Shrinking { remaining };
            }
            drop(st);
            log::debug!("scrambling headline toward {target:?}");
            Self::step(&self.shared);
        }
    }

    /// Cancels the pending step and freezes the text where it is.
    pub fn stop(&self) {
        let mut st = self.shared.state.borrow_mut();
        st.timer = None;
        st.phase = ScramblePhase::Idle;
    }

    fn schedule(shared: &Rc<ScrambleShared>, delay_ms: u32) -> AnimationHandle {
        let weak: Weak<ScrambleShared> = Rc::downgrade(shared);
        shared.scheduler.set_timeout(
            delay_ms,
            Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    Self::step(&shared);
                }
            }),
        )
    }

    fn step(shared: &Rc<ScrambleShared>) {
        let emitted = {
            let mut guard = shared.state.borrow_mut();
            let st = &mut *guard;
            st.timer = None;
            match st.phase {
                ScramblePhase::Idle => return,
                ScramblePhase::Shrinking { remaining } if remaining > 0 => {
                    let remaining = remaining - 1;
                    st.rendered = (0..remaining).map(|_| st.rng.uppercase()).collect();
                    st.phase = ScramblePhase::Shrinking { remaining };
                    st.timer = Some(Self::schedule(shared, shared.timing.shrink_delay_ms));
                    st.rendered.clone()
                }
                ScramblePhase::Shrinking { .. } => match Self::grow(shared, st, 0) {
                    Some(text) => text,
                    None => return,
                },
                ScramblePhase::Growing { shown } => match Self::grow(shared, st, shown) {
                    Some(text) => text,
                    None => return,
                },
            }
        };
        Self::emit_shared(shared, &emitted);
    }

    /// Reveals one more target character. Returns `None` once there is
    /// nothing left to reveal.
    fn grow(shared: &Rc<ScrambleShared>, st: &mut ScrambleState, shown: usize) -> Option<String> {
        let target_len = st.target.chars().count();
        if shown >= target_len {
            st.phase = ScramblePhase::Idle;
            return None;
        }
        let shown = shown + 1;
        st.rendered = st.target.chars().take(shown).collect();
        if shown == target_len {
            st.phase = ScramblePhase::Idle;
        } else {
            st.phase = ScramblePhase::Growing { shown };
            st.timer = Some(Self::schedule(shared, shared.timing.grow_delay_ms));
        }
        Some(st.rendered.clone())
    }

    fn emit(&self, text: &str) {
        Self::emit_shared(&self.shared, text);
    }

    fn emit_shared(shared: &ScrambleShared, text: &str) {
        let mut sink = shared.sink.borrow_mut();
        (&mut *sink)(text);
    }
}
