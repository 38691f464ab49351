// Tour model: scene/hotspot creation, linking and revision tracking.

use glam::Vec3;
use tour_core::{ImageSource, LinkOutcome, TourError, TourModel, DEFAULT_HOTSPOT_TITLE};

fn two_scenes() -> (TourModel, tour_core::SceneId, tour_core::SceneId) {
    let mut model = TourModel::new();
    let a = model.add_scene(ImageSource::new("blob:a"), "lobby.jpg");
    let b = model.add_scene(ImageSource::new("blob:b"), "garden.jpg");
    (model, a, b)
}

#[test]
fn scenes_keep_upload_order_and_distinct_ids() {
    let (model, a, b) = two_scenes();
    assert_ne!(a, b);
    let names: Vec<&str> = model.scenes().iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["lobby.jpg", "garden.jpg"]);
    assert_eq!(model.scene(b).map(|s| s.image.as_str()), Some("blob:b"));
    assert!(model.scene(a).unwrap().hotspots.is_empty());
    assert_eq!(model.len(), 2);
}

#[test]
fn new_hotspot_is_unlinked_with_default_title() {
    let (mut model, a, _) = two_scenes();
    let h = model.add_hotspot(a, Vec3::new(0.0, 0.0, -500.0)).unwrap();
    let hotspot = model.hotspot(h).unwrap();
    assert_eq!(hotspot.target, None);
    assert_eq!(hotspot.title, DEFAULT_HOTSPOT_TITLE);
    assert_eq!(model.hotspot_owner(h), Some(a));
    assert_eq!(model.scene(a).unwrap().hotspots.len(), 1);
}

#[test]
fn hotspot_on_unknown_scene_is_rejected() {
    let (mut model, a, _) = two_scenes();
    let mut other = TourModel::new();
    other.add_scene(ImageSource::new("x"), "x");
    other.add_scene(ImageSource::new("y"), "y");
    let foreign = other.add_scene(ImageSource::new("z"), "z");
    let before = model.revision();
    assert_eq!(
        model.add_hotspot(foreign, Vec3::ZERO),
        Err(TourError::UnknownScene(foreign))
    );
    assert_eq!(model.revision(), before);
    assert!(model.scene(a).unwrap().hotspots.is_empty());
}

#[test]
fn linking_twice_to_same_scene_changes_nothing() {
    let (mut model, a, b) = two_scenes();
    let h = model.add_hotspot(a, Vec3::NEG_Z * 500.0).unwrap();
    assert_eq!(model.link_hotspot(h, b), Ok(LinkOutcome::Linked));
    let rev = model.revision();
    let snapshot = model.scene(a).cloned();

    assert_eq!(model.link_hotspot(h, b), Ok(LinkOutcome::Unchanged));
    assert_eq!(model.revision(), rev);
    assert_eq!(model.scene(a).cloned(), snapshot);
    assert_eq!(model.hotspot(h).unwrap().target, Some(b));
}

#[test]
fn link_to_unknown_scene_leaves_hotspot_unlinked() {
    let (mut model, a, _) = two_scenes();
    let h = model.add_hotspot(a, Vec3::NEG_Z).unwrap();
    let mut bigger = TourModel::new();
    for i in 0..5 {
        bigger.add_scene(ImageSource::new(format!("s{i}")), "s");
    }
    let missing = bigger.scenes()[4].id;
    assert_eq!(
        model.link_hotspot(h, missing),
        Err(TourError::UnknownScene(missing))
    );
    assert_eq!(model.hotspot(h).unwrap().target, None);
}

#[test]
fn link_unknown_hotspot_is_an_error() {
    let (mut model, a, b) = two_scenes();
    let mut other = TourModel::new();
    let s = other.add_scene(ImageSource::new("o"), "o");
    other.add_hotspot(s, Vec3::X).unwrap();
    let stray = other.add_hotspot(s, Vec3::Y).unwrap();
    model.add_hotspot(a, Vec3::Z).unwrap();
    assert_eq!(
        model.link_hotspot(stray, b),
        Err(TourError::UnknownHotspot(stray))
    );
}

#[test]
fn revision_moves_on_every_effective_mutation() {
    let mut model = TourModel::new();
    let r0 = model.revision();
    let a = model.add_scene(ImageSource::new("a"), "a");
    let b = model.add_scene(ImageSource::new("b"), "b");
    let r1 = model.revision();
    assert!(r1 > r0);
    let h = model.add_hotspot(a, Vec3::X).unwrap();
    let r2 = model.revision();
    assert!(r2 > r1);
    model.link_hotspot(h, b).unwrap();
    assert!(model.revision() > r2);
}

#[test]
fn link_candidates_exclude_active_scene() {
    let (mut model, a, b) = two_scenes();
    let c = model.add_scene(ImageSource::new("blob:c"), "attic.jpg");
    let ids: Vec<_> = model.link_candidates(Some(b)).map(|s| s.id).collect();
    assert_eq!(ids, vec![a, c]);
    assert_eq!(model.link_candidates(None).count(), 3);
}
