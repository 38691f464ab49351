// Authoring state machine decisions, independent of the viewer.

use glam::Vec3;
use tour_core::{
    AuthoringFsm, AuthoringState, ClickAction, HotspotHit, HotspotId, ImageSource, LinkChoice,
    Notice, SceneId, TourModel,
};

fn ids() -> (SceneId, SceneId, HotspotId) {
    let mut model = TourModel::new();
    let a = model.add_scene(ImageSource::new("a"), "a");
    let b = model.add_scene(ImageSource::new("b"), "b");
    let h = model.add_hotspot(a, Vec3::NEG_Z).unwrap();
    (a, b, h)
}

#[test]
fn toggle_flips_between_idle_and_placing() {
    let mut fsm = AuthoringFsm::new();
    assert_eq!(fsm.state(), AuthoringState::Idle);
    assert_eq!(
        fsm.toggle_placement(false),
        Some(Notice::placement_enabled())
    );
    assert!(fsm.is_placing());
    assert_eq!(
        fsm.toggle_placement(false),
        Some(Notice::placement_cancelled())
    );
    assert_eq!(fsm.state(), AuthoringState::Idle);
}

#[test]
fn toggle_is_ignored_while_transitioning() {
    let mut fsm = AuthoringFsm::new();
    assert_eq!(fsm.toggle_placement(true), None);
    assert_eq!(fsm.state(), AuthoringState::Idle);
}

#[test]
fn empty_click_places_only_in_placement_mode() {
    let mut fsm = AuthoringFsm::new();
    assert_eq!(fsm.click(None, false), ClickAction::Ignored);
    fsm.toggle_placement(false);
    assert_eq!(fsm.click(None, false), ClickAction::Place);
    // still placing until the viewer confirms
    assert!(fsm.is_placing());
    assert_eq!(fsm.placement_done(), Notice::hotspot_added());
    assert_eq!(fsm.state(), AuthoringState::Idle);
}

#[test]
fn linked_hit_navigates_from_any_mode() {
    let (_, b, h) = ids();
    let hit = HotspotHit {
        hotspot: h,
        target: Some(b),
    };
    let mut fsm = AuthoringFsm::new();
    fsm.toggle_placement(false);
    assert_eq!(fsm.click(Some(hit), false), ClickAction::Navigate(b));
    assert_eq!(fsm.state(), AuthoringState::Idle);
}

#[test]
fn unlinked_hit_awaits_link_target() {
    let (_, b, h) = ids();
    let mut fsm = AuthoringFsm::new();
    let hit = HotspotHit {
        hotspot: h,
        target: None,
    };
    assert_eq!(fsm.click(Some(hit), false), ClickAction::ChooseLinkTarget(h));
    assert_eq!(fsm.pending_link(), Some(h));

    // clicking empty space keeps the selection open
    assert_eq!(fsm.click(None, false), ClickAction::Ignored);
    assert_eq!(fsm.pending_link(), Some(h));

    assert_eq!(
        fsm.select_link_target(Some(b)),
        Some(LinkChoice::Link {
            hotspot: h,
            target: b
        })
    );
    assert_eq!(fsm.state(), AuthoringState::Idle);
    assert_eq!(fsm.select_link_target(Some(b)), None);
}

#[test]
fn dismissing_the_picker_returns_to_idle() {
    let (_, _, h) = ids();
    let mut fsm = AuthoringFsm::new();
    fsm.click(
        Some(HotspotHit {
            hotspot: h,
            target: None,
        }),
        false,
    );
    assert_eq!(fsm.select_link_target(None), Some(LinkChoice::Dismissed(h)));
    assert_eq!(fsm.state(), AuthoringState::Idle);
}

#[test]
fn toggle_from_pending_link_enters_placement() {
    let (_, _, h) = ids();
    let mut fsm = AuthoringFsm::new();
    fsm.click(
        Some(HotspotHit {
            hotspot: h,
            target: None,
        }),
        false,
    );
    assert_eq!(
        fsm.toggle_placement(false),
        Some(Notice::placement_enabled())
    );
    assert!(fsm.is_placing());
    assert_eq!(fsm.pending_link(), None);
}

#[test]
fn clicks_during_transition_change_nothing() {
    let (_, b, h) = ids();
    let mut fsm = AuthoringFsm::new();
    fsm.toggle_placement(false);
    let hit = HotspotHit {
        hotspot: h,
        target: Some(b),
    };
    assert_eq!(fsm.click(Some(hit), true), ClickAction::Ignored);
    assert_eq!(fsm.click(None, true), ClickAction::Ignored);
    assert!(fsm.is_placing());
}

#[test]
fn cancel_reports_only_when_placing() {
    let (_, _, h) = ids();
    let mut fsm = AuthoringFsm::new();
    assert_eq!(fsm.cancel(), None);
    fsm.click(
        Some(HotspotHit {
            hotspot: h,
            target: None,
        }),
        false,
    );
    assert_eq!(fsm.cancel(), None);
    assert_eq!(fsm.state(), AuthoringState::Idle);
    fsm.toggle_placement(false);
    assert_eq!(fsm.cancel(), Some(Notice::placement_cancelled()));
}
