//! Page composition: one active-section cell feeding every animator.

use std::rc::Rc;

use crate::config::PageConfig;
use crate::error::Result;
use crate::handle::Subscription;
use crate::morph::ShapeMorph;
use crate::scheduler::Scheduler;
use crate::scramble::{ScrambleText, TextSink};
use crate::section::SectionId;
use crate::shape::ShapeTable;
use crate::state::SectionCell;
use crate::visibility::{SectionVisibilityTracker, VisibilitySource};
use crate::wave::{DrawSurface, Viewport, WaveRenderer};

/// Everything the page needs from its host environment.
pub struct PageHost {
    pub scheduler: Rc<dyn Scheduler>,
    pub viewport: Rc<dyn Viewport>,
    pub visibility: Rc<dyn VisibilitySource>,
    /// `None` when the host has no 2D drawing context; the wave is skipped.
    pub wave_surface: Option<Box<dyn DrawSurface>>,
    /// Receives headline text.
    pub headline: TextSink,
    /// Receives background outline path data.
    pub outline: TextSink,
    /// Told which nav entry to highlight.
    pub nav: Option<Box<dyn FnMut(SectionId)>>,
}

pub struct AppController {
    active: SectionCell,
    headline: Rc<ScrambleText>,
    morph: Rc<ShapeMorph>,
    wave: Option<WaveRenderer>,
    tracker: SectionVisibilityTracker,
    subscriptions: Vec<Subscription>,
    mounted: bool,
}

impl AppController {
    /// Validates configuration and outlines, then starts every component.
    ///
    /// Configuration errors abort the mount. Missing host capabilities only
    /// disable the component that needs them.
    pub fn mount(host: PageHost, config: &PageConfig) -> Result<Self> {
        config.validate()?;
        let table = Rc::new(ShapeTable::with_overrides(&config.outlines)?);
        let PageHost { scheduler, viewport, visibility, wave_surface, headline, outline, nav } = host;

        let initial = SectionId::first();
        let active = SectionCell::new(initial);

        let headline =
            Rc::new(ScrambleText::new(scheduler.clone(), config.scramble, initial.label(), headline));
        let morph = Rc::new(ShapeMorph::new(scheduler.clone(), table, config.morph, initial, outline));

        let mut subscriptions = Vec::new();
        {
            let headline = headline.clone();
            subscriptions.push(active.subscribe(move |section| headline.set_target(section.label())));
        }
        {
            let morph = morph.clone();
            subscriptions.push(active.subscribe(move |section| morph.set_section(section)));
        }
        if let Some(mut nav) = nav {
            nav(initial);
            subscriptions.push(active.subscribe(nav));
        }

        let wave = match wave_surface {
            Some(surface) => {
                Some(WaveRenderer::mount(scheduler, viewport, surface, config.wave.clone()))
            }
            None => {
                log::warn!("no 2D drawing context; wave disabled");
                None
            }
        };

        let tracker =
            SectionVisibilityTracker::mount(visibility.as_ref(), &SectionId::ALL, &config.visibility, active.clone());

        log::info!("page mounted on {initial}");
        Ok(Self { active, headline, morph, wave, tracker, subscriptions, mounted: true })
    }

    pub fn active_section(&self) -> SectionId {
        self.active.get()
    }

    pub fn headline(&self) -> &ScrambleText {
        &self.headline
    }

    pub fn morph(&self) -> &ShapeMorph {
        &self.morph
    }

    pub fn wave(&self) -> Option<&WaveRenderer> {
        self.wave.as_ref()
    }

    pub fn is_tracking(&self) -> bool {
        self.tracker.is_observing()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Stops observation, every pending timer and frame request, and the
    /// resize listener. Safe to call more than once.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        self.tracker.unmount();
        self.subscriptions.clear();
        self.headline.stop();
        self.morph.stop();
        if let Some(wave) = self.wave.take() {
            wave.unmount();
        }
        log::info!("page unmounted");
    }
}

impl Drop for AppController {
    fn drop(&mut self) {
        self.unmount();
    }
}
