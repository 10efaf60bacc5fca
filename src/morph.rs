//! Background outline morphing.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use kurbo::BezPath;

use crate::config::MorphConfig;
use crate::handle::AnimationHandle;
use crate::scheduler::Scheduler;
use crate::scramble::TextSink;
use crate::section::SectionId;
use crate::shape::{compatible, lerp_compatible, CubicOutline, ShapeTable};

enum Plan {
    Direct { from: BezPath, to: BezPath },
    Normalized { from: CubicOutline, to: CubicOutline },
}

impl Plan {
    fn sample(&self, t: f64) -> BezPath {
        match self {
            Plan::Direct { from, to } => lerp_compatible(from, to, t),
            Plan::Normalized { from, to } => from.lerp(to, t),
        }
    }
}

struct Transition {
    plan: Plan,
    target: BezPath,
    started_at: Option<f64>,
}

struct MorphState {
    section: SectionId,
    displayed: BezPath,
    transition: Option<Transition>,
    frame: Option<AnimationHandle>,
    cuts: u64,
}

struct MorphShared {
    scheduler: Rc<dyn Scheduler>,
    table: Rc<ShapeTable>,
    config: MorphConfig,
    state: RefCell<MorphState>,
    sink: RefCell<TextSink>,
}

/// Interpolates the background outline toward the active section's shape.
///
/// Outputs SVG path data to the sink once per frame while a morph runs.
/// Outlines with the same element sequence morph point by point; others are
/// resampled to a common cubic structure, or cut straight to the target when
/// `normalize_incompatible` is off.
pub struct ShapeMorph {
    shared: Rc<MorphShared>,
}

impl ShapeMorph {
    pub fn new(
        scheduler: Rc<dyn Scheduler>,
        table: Rc<ShapeTable>,
        config: MorphConfig,
        initial: SectionId,
        sink: TextSink,
    ) -> Self {
        let displayed = table.outline(initial).clone();
        let shared = Rc::new(MorphShared {
            scheduler,
            table,
            config,
            state: RefCell::new(MorphState {
                section: initial,
                displayed,
                transition: None,
                frame: None,
                cuts: 0,
            }),
            sink: RefCell::new(sink),
        });
        let morph = Self { shared };
        morph.emit_displayed();
        morph
    }

    pub fn section(&self) -> SectionId {
        self.shared.state.borrow().section
    }

    pub fn is_animating(&self) -> bool {
        self.shared.state.borrow().transition.is_some()
    }

    /// Number of morphs that fell back to an abrupt cut.
    pub fn cuts(&self) -> u64 {
        self.shared.state.borrow().cuts
    }

    pub fn displayed_svg(&self) -> String {
        self.shared.state.borrow().displayed.to_svg()
    }

    /// Starts morphing from whatever is on screen toward `section`'s outline.
    pub fn set_section(&self, section: SectionId) {
        {
            let mut st = self.shared.state.borrow_mut();
            if st.section == section {
                return;
            }
            st.section = section;
            st.frame = None;

            let from = st.displayed.clone();
            let to = self.shared.table.outline(section).clone();
            let plan = if compatible(&from, &to) {
                Some(Plan::Direct { from, to: to.clone() })
            } else if self.shared.config.normalize_incompatible {
                let (from, to) =
                    CubicOutline::equalize(CubicOutline::from_path(&from), CubicOutline::from_path(&to));
                Some(Plan::Normalized { from, to })
            } else {
                None
            };

            match plan {
                Some(plan) => {
                    log::debug!("morphing outline to {section}");
                    st.transition = Some(Transition { plan, target: to, started_at: None });
                    st.frame = Some(Self::request(&self.shared));
                    return;
                }
                None => {
                    log::debug!("outline for {section} is not morphable; cutting");
                    st.transition = None;
                    st.displayed = to;
                    st.cuts += 1;
                }
            }
        }
        self.emit_displayed();
    }

    /// Cancels any in-flight morph, leaving the current geometry on screen.
    pub fn stop(&self) {
        let mut st = self.shared.state.borrow_mut();
        st.frame = None;
        st.transition = None;
    }

    fn request(shared: &Rc<MorphShared>) -> AnimationHandle {
        let weak = Rc::downgrade(shared);
        shared.scheduler.request_frame(Box::new(move |ts| Self::on_frame(&weak, ts)))
    }

    fn on_frame(weak: &Weak<MorphShared>, ts: f64) {
        let Some(shared) = weak.upgrade() else { return };
        let svg = {
            let mut guard = shared.state.borrow_mut();
            let st = &mut *guard;
            st.frame = None;
            let Some(transition) = st.transition.as_mut() else { return };
            let started = *transition.started_at.get_or_insert(ts);
            let progress = ((ts - started) / shared.config.duration_ms).clamp(0.0, 1.0);
            if progress >= 1.0 {
                st.displayed = transition.target.clone();
                st.transition = None;
            } else {
                st.displayed = transition.plan.sample(shared.config.ease.apply(progress));
                st.frame = Some(Self::request(&shared));
            }
            st.displayed.to_svg()
        };
        let mut sink = shared.sink.borrow_mut();
        (&mut *sink)(&svg);
    }

    fn emit_displayed(&self) {
        let svg = self.displayed_svg();
        let mut sink = self.shared.sink.borrow_mut();
        (&mut *sink)(&svg);
    }
}
