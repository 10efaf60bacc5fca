//! Tracks which section the reader is looking at.

use std::collections::HashSet;

use crate::config::VisibilityOptions;
use crate::error::Result;
use crate::handle::Subscription;
use crate::section::SectionId;
use crate::state::SectionCell;

/// One region's visibility change, as reported by the host.
#[derive(Clone, Debug, PartialEq)]
pub struct IntersectionEntry {
    /// Element id of the observed region.
    pub target_id: String,
    pub is_intersecting: bool,
    pub ratio: f64,
}

impl IntersectionEntry {
    pub fn past_threshold(&self, threshold: f64) -> bool {
        self.is_intersecting && self.ratio >= threshold
    }
}

pub type BatchCallback = Box<dyn FnMut(Vec<IntersectionEntry>)>;

/// Host facility that reports region visibility in batches.
pub trait VisibilitySource {
    /// Starts observing the regions of `sections`. Dropping the returned
    /// subscription must stop every observation.
    fn observe(
        &self,
        sections: &[SectionId],
        options: &VisibilityOptions,
        on_batch: BatchCallback,
    ) -> Result<Subscription>;
}

/// Regions last reported at or past the threshold.
///
/// A region leaving the viewport still reports `is_intersecting` with a
/// falling ratio; only a below-to-above change counts as entering.
#[derive(Debug, Default)]
pub struct RegionStates {
    above: HashSet<SectionId>,
}

impl RegionStates {
    /// Records `entry` for `section`. True when the region just rose past
    /// `threshold`.
    pub fn record(&mut self, section: SectionId, entry: &IntersectionEntry, threshold: f64) -> bool {
        if entry.past_threshold(threshold) {
            self.above.insert(section)
        } else {
            self.above.remove(&section);
            false
        }
    }

    pub fn is_above(&self, section: SectionId) -> bool {
        self.above.contains(&section)
    }
}

/// Applies one batch in arrival order. Every region that rose past the
/// threshold is written to the cell, so the last one wins. Returns the
/// sections that were written.
pub fn apply_batch(
    cell: &SectionCell,
    regions: &mut RegionStates,
    entries: &[IntersectionEntry],
    threshold: f64,
) -> Vec<SectionId> {
    let mut written = Vec::new();
    for entry in entries {
        match entry.target_id.parse::<SectionId>() {
            Ok(section) => {
                if regions.record(section, entry, threshold) {
                    cell.set(section);
                    written.push(section);
                }
            }
            Err(_) => log::warn!("intersection reported for unknown region `{}`", entry.target_id),
        }
    }
    written
}

/// Owns the visibility observation for the page.
///
/// When the host cannot observe visibility the tracker stays inert and the
/// active section keeps its initial value.
pub struct SectionVisibilityTracker {
    observation: Option<Subscription>,
}

impl SectionVisibilityTracker {
    pub fn mount(
        source: &dyn VisibilitySource,
        sections: &[SectionId],
        options: &VisibilityOptions,
        cell: SectionCell,
    ) -> Self {
        let threshold = options.threshold;
        let mut regions = RegionStates::default();
        let on_batch: BatchCallback = Box::new(move |entries| {
            apply_batch(&cell, &mut regions, &entries, threshold);
        });
        let observation = match source.observe(sections, options, on_batch) {
            Ok(sub) => Some(sub),
            Err(err) => {
                log::warn!("section tracking disabled: {err}");
                None
            }
        };
        Self { observation }
    }

    pub fn is_observing(&self) -> bool {
        self.observation.is_some()
    }

    pub fn unmount(&mut self) {
        if let Some(observation) = self.observation.take() {
            observation.unsubscribe();
        }
    }
}
