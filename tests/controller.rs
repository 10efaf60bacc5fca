#![cfg(not(target_arch = "wasm32"))]

mod support;

use rstest::rstest;
use scroll_portfolio::shape::ShapeTable;
use scroll_portfolio::{AppController, PageConfig, PortfolioError, SectionId};
use support::{hidden, partly, visible, FakeVisibility, Harness};

const FRAME_MS: f64 = 16.0;

fn mount() -> (Harness, AppController) {
    let (harness, host) = Harness::new();
    let page = AppController::mount(host, &PageConfig::default()).unwrap();
    (harness, page)
}

/// Runs frames (and the timers falling between them) for `ms` of virtual time.
fn run_for(harness: &Harness, ms: f64) {
    let mut elapsed = 0.0;
    while elapsed < ms {
        harness.clock.tick_frame(FRAME_MS);
        elapsed += FRAME_MS;
    }
}

#[test]
fn mounts_on_first_section() {
    let (harness, page) = mount();
    assert_eq!(page.active_section(), SectionId::Profile);
    assert_eq!(harness.last_headline(), "PROFILE");
    assert_eq!(*harness.nav.borrow(), vec![SectionId::Profile]);
    assert_eq!(*harness.visibility.observed.borrow(), SectionId::ALL.to_vec());
    let options = harness.visibility.last_options.borrow().clone().unwrap();
    assert_eq!(options.threshold, 0.5);
    assert_eq!(options.root_margin, "0px");
    assert!(page.is_tracking());
    assert!(page.wave().is_some());
}

#[rstest]
fn intersecting_section_becomes_active(
    #[values(SectionId::SkillSet, SectionId::Timeline, SectionId::Project, SectionId::Contact)] section: SectionId,
) {
    let (harness, page) = mount();
    harness.visibility.scroll_to(section);
    assert_eq!(page.active_section(), section);
    assert_eq!(harness.nav.borrow().last(), Some(&section));
}

#[test]
fn hidden_entries_do_not_change_active_section() {
    let (harness, page) = mount();
    harness.visibility.deliver(vec![hidden(SectionId::Contact)]);
    assert_eq!(page.active_section(), SectionId::Profile);
}

#[test]
fn region_scrolling_out_does_not_take_focus() {
    let (harness, page) = mount();
    harness.visibility.scroll_to(SectionId::Project);
    harness.visibility.scroll_to(SectionId::Timeline);
    harness.visibility.deliver(vec![partly(SectionId::Project, 0.4995)]);
    assert_eq!(page.active_section(), SectionId::Timeline);

    harness.visibility.deliver(vec![hidden(SectionId::Project)]);
    harness.visibility.scroll_to(SectionId::Project);
    assert_eq!(page.active_section(), SectionId::Project);
}

#[test]
fn scrolling_to_timeline_animates_headline_and_outline() {
    let (harness, page) = mount();
    let table = ShapeTable::builtin().unwrap();
    let timeline_svg = table.outline(SectionId::Timeline).to_svg();

    harness.visibility.scroll_to(SectionId::Timeline);
    assert_eq!(page.active_section(), SectionId::Timeline);
    assert!(page.headline().is_animating());
    assert!(page.morph().is_animating());

    // Half way through the morph the outline is neither end.
    run_for(&harness, 500.0);
    let mid = harness.outline.borrow().last().cloned().unwrap();
    assert_ne!(mid, timeline_svg);
    assert_ne!(mid, table.outline(SectionId::Profile).to_svg());

    run_for(&harness, 600.0);
    assert!(!page.morph().is_animating());
    assert_eq!(harness.outline.borrow().last(), Some(&timeline_svg));
    assert_eq!(page.headline().rendered(), "TIMELINE");
    assert_eq!(harness.last_headline(), "TIMELINE");
}

#[test]
fn morph_takes_the_configured_duration() {
    let (harness, page) = mount();
    harness.visibility.scroll_to(SectionId::Contact);
    // The first frame pins the start time, so the morph ends one
    // duration after it.
    run_for(&harness, 1000.0);
    assert!(page.morph().is_animating());
    run_for(&harness, 2.0 * FRAME_MS);
    assert!(!page.morph().is_animating());
}

#[test]
fn rapid_skill_set_then_project_settles_on_project() {
    let (harness, page) = mount();
    harness.visibility.scroll_to(SectionId::SkillSet);
    harness.clock.advance(60.0);
    assert!(page.headline().is_animating());
    harness.visibility.scroll_to(SectionId::Project);

    harness.clock.run_timers(5_000.0);
    assert_eq!(page.headline().rendered(), "PROJECT");
    assert!(harness.headline.borrow().iter().all(|s| s != "SKILL SET"));
}

#[test]
fn batch_with_several_crossings_is_last_write_wins() {
    let (harness, page) = mount();
    harness.visibility.deliver(vec![visible(SectionId::SkillSet), visible(SectionId::Project)]);
    assert_eq!(page.active_section(), SectionId::Project);
    assert_eq!(
        *harness.nav.borrow(),
        vec![SectionId::Profile, SectionId::SkillSet, SectionId::Project]
    );
    harness.clock.run_timers(5_000.0);
    assert_eq!(page.headline().rendered(), "PROJECT");
}

#[test]
fn unmount_mid_animation_stops_every_callback() {
    let (harness, mut page) = mount();
    harness.visibility.scroll_to(SectionId::Timeline);
    run_for(&harness, 100.0);
    assert!(page.headline().is_animating());
    assert!(page.morph().is_animating());

    page.unmount();
    assert_eq!(harness.clock.pending_timers(), 0);
    assert_eq!(harness.clock.pending_frames(), 0);
    assert_eq!(harness.viewport.listener_count(), 0);
    assert!(!harness.visibility.is_observing());

    let timers = harness.clock.timers_fired();
    let frames = harness.clock.frames_fired();
    let writes = harness.surface.borrow().writes();
    let headline_len = harness.headline.borrow().len();
    let outline_len = harness.outline.borrow().len();

    harness.visibility.scroll_to(SectionId::Contact);
    harness.viewport.resize_to(400.0);
    run_for(&harness, 2_000.0);

    assert_eq!(harness.clock.timers_fired(), timers);
    assert_eq!(harness.clock.frames_fired(), frames);
    assert_eq!(harness.surface.borrow().writes(), writes);
    assert_eq!(harness.headline.borrow().len(), headline_len);
    assert_eq!(harness.outline.borrow().len(), outline_len);
    assert!(!page.is_mounted());
}

#[test]
fn repeated_mount_cycles_leave_nothing_behind() {
    for _ in 0..5 {
        let (harness, page) = mount();
        harness.visibility.scroll_to(SectionId::Project);
        run_for(&harness, 80.0);
        drop(page);
        assert_eq!(harness.clock.pending_timers(), 0);
        assert_eq!(harness.clock.pending_frames(), 0);
        assert_eq!(harness.viewport.listener_count(), 0);
        assert!(!harness.visibility.is_observing());
    }
}

#[test]
fn missing_visibility_support_keeps_initial_section() {
    let (harness, host) = Harness::build(FakeVisibility::unsupported(), true);
    let page = AppController::mount(host, &PageConfig::default()).unwrap();
    assert!(!page.is_tracking());
    harness.visibility.scroll_to(SectionId::Contact);
    assert_eq!(page.active_section(), SectionId::Profile);
    // The wave does not depend on tracking.
    run_for(&harness, 100.0);
    assert!(page.wave().unwrap().frames_drawn() > 1);
}

#[test]
fn missing_drawing_context_skips_wave_only() {
    let (harness, host) = Harness::build(FakeVisibility::new(), false);
    let page = AppController::mount(host, &PageConfig::default()).unwrap();
    assert!(page.wave().is_none());
    assert_eq!(harness.viewport.listener_count(), 0);
    harness.visibility.scroll_to(SectionId::Timeline);
    harness.clock.run_timers(5_000.0);
    assert_eq!(page.headline().rendered(), "TIMELINE");
}

#[test]
fn invalid_outline_override_aborts_mount() {
    let (harness, host) = Harness::new();
    let config = PageConfig::from_json(r#"{"outlines": {"PROJECT": "not a path"}}"#).unwrap();
    let err = AppController::mount(host, &config).err().unwrap();
    assert!(matches!(err, PortfolioError::InvalidOutline { section: SectionId::Project, .. }));
    assert!(!harness.visibility.is_observing());
    assert_eq!(harness.clock.pending_frames(), 0);
}

#[test]
fn invalid_config_aborts_mount() {
    let (_harness, host) = Harness::new();
    let mut config = PageConfig::default();
    config.morph.duration_ms = 0.0;
    assert!(matches!(AppController::mount(host, &config), Err(PortfolioError::InvalidConfig(_))));
}
