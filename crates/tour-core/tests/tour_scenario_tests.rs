// End-to-end authoring walk: upload, place, link, navigate.

mod common;

use common::{ManualLoader, CENTER};
use tour_core::{
    AuthoringState, ClickAction, ImageSource, LinkOutcome, Notice, TextureHandle, TourApp,
    TransitionTick, ViewerConfig, LINKED_MARKER_COLOR, PANORAMA_RADIUS, UNLINKED_MARKER_COLOR,
};

fn app() -> TourApp<ManualLoader> {
    let mut app = TourApp::new(ManualLoader::default(), ViewerConfig::default());
    app.resize(800.0, 600.0);
    app
}

#[test]
fn author_and_walk_a_two_scene_tour() {
    let mut app = app();

    // first upload becomes active, second does not
    let lobby = app.upload(ImageSource::new("blob:lobby"), "lobby.jpg");
    assert_eq!(app.active_scene_id(), Some(lobby));
    let garden = app.upload(ImageSource::new("blob:garden"), "garden.jpg");
    assert_eq!(app.active_scene_id(), Some(lobby));
    assert_eq!(app.viewer().loader().requests, 1);
    assert_eq!(app.viewer().graph().panoramas().count(), 1);
    assert_eq!(
        app.drain_notices(),
        vec![
            Notice::image_uploaded("lobby.jpg"),
            Notice::image_uploaded("garden.jpg")
        ]
    );
    app.tick();

    // place a hotspot straight ahead
    app.toggle_placement();
    assert_eq!(app.authoring_state(), AuthoringState::Placing);
    app.pointer_down(CENTER);
    assert_eq!(app.pointer_up(CENTER), Some(ClickAction::Place));
    assert_eq!(app.authoring_state(), AuthoringState::Idle);

    let hotspot = app.active_scene().unwrap().hotspots[0].clone();
    assert!((hotspot.position.length() - PANORAMA_RADIUS).abs() < 1e-2);
    assert!(hotspot.position.z < -499.0);
    assert_eq!(hotspot.target, None);
    let marker = app.viewer().graph().marker_for(hotspot.id).unwrap();
    assert_eq!(marker.color, UNLINKED_MARKER_COLOR);
    // the edit rebuilt the graph without reloading the panorama
    assert_eq!(app.viewer().loader().requests, 1);
    assert_eq!(
        app.drain_notices(),
        vec![Notice::placement_enabled(), Notice::hotspot_added()]
    );

    // clicking the unlinked marker asks for a target
    assert_eq!(
        app.click(CENTER),
        ClickAction::ChooseLinkTarget(hotspot.id)
    );
    let candidates: Vec<_> = app.link_candidates().iter().map(|s| s.id).collect();
    assert_eq!(candidates, vec![garden]);
    assert_eq!(
        app.select_link_target(Some(garden)),
        Ok(Some(LinkOutcome::Linked))
    );
    assert_eq!(
        app.viewer().graph().marker_for(hotspot.id).unwrap().color,
        LINKED_MARKER_COLOR
    );
    assert_eq!(app.drain_notices(), vec![Notice::hotspot_linked("garden.jpg")]);

    // clicking the linked marker crossfades to the garden
    assert_eq!(app.click(CENTER), ClickAction::Navigate(garden));
    assert!(app.is_transitioning());
    assert_eq!(app.active_scene_id(), Some(lobby));
    assert_eq!(app.viewer().graph().panoramas().count(), 2);

    // a second click mid-fade is swallowed
    assert_eq!(app.click(CENTER), ClickAction::Ignored);
    assert_eq!(app.viewer().graph().panoramas().count(), 2);

    let incoming = TextureHandle::from_raw(1);
    app.viewer_mut().loader_mut().finish(incoming);

    let mut finished = false;
    for _ in 0..60 {
        match app.tick() {
            TransitionTick::Running { .. } => {
                assert_eq!(app.active_scene_id(), Some(lobby));
                let m = app.viewer().graph().marker_for(hotspot.id).unwrap();
                assert!(m.opacity < ViewerConfig::default().marker_opacity);
            }
            TransitionTick::Finished(_) => {
                finished = true;
                break;
            }
            TransitionTick::Idle => panic!("fade stopped early"),
        }
    }
    assert!(finished);
    assert!(!app.is_transitioning());
    assert_eq!(app.active_scene_id(), Some(garden));

    let graph = app.viewer().graph();
    assert_eq!(graph.len(), 1);
    let pano = graph.panoramas().next().unwrap();
    assert_eq!(pano.texture(), Some(incoming));
    assert_eq!(pano.opacity, 1.0);
    assert_eq!(
        app.viewer().loader().released,
        vec![TextureHandle::from_raw(0)]
    );

    // the lobby's link survives the walk
    let lobby_scene = app.model().scene(lobby).unwrap();
    assert_eq!(lobby_scene.hotspots[0].target, Some(garden));
    assert!(app.drain_notices().is_empty());
}
