// Hit-testing against the retained scene graph.

mod common;

use common::{CENTER, VIEWPORT};
use glam::{Vec2, Vec3};
use tour_core::picker::{pick_ray, pick_screen};
use tour_core::{
    ray_sphere, Camera, HotspotId, ImageSource, MeshKind, Ray, SceneGraph, TextureHandle,
    TourModel, PANORAMA_RADIUS,
};

// Hotspot ids can only be minted by a model.
fn hotspot_ids(n: usize) -> Vec<HotspotId> {
    let mut model = TourModel::new();
    let s = model.add_scene(ImageSource::new("s"), "s");
    (0..n)
        .map(|i| model.add_hotspot(s, Vec3::X * i as f32).unwrap())
        .collect()
}

fn graph_with_panorama() -> SceneGraph {
    let mut model = TourModel::new();
    let s = model.add_scene(ImageSource::new("s"), "s");
    let mut graph = SceneGraph::new();
    graph.add_panorama(s, TextureHandle::from_raw(0), 1.0);
    graph
}

fn forward_ray() -> Ray {
    Ray::new(Vec3::ZERO, Vec3::NEG_Z)
}

#[test]
fn ray_sphere_hits_front_surface() {
    let t = ray_sphere(&forward_ray(), Vec3::new(0.0, 0.0, -5.0), 2.0).unwrap();
    assert!((t - 3.0).abs() < 1e-5);
}

#[test]
fn ray_sphere_miss() {
    let ray = Ray::new(Vec3::ZERO, Vec3::X);
    assert!(ray_sphere(&ray, Vec3::new(0.0, 0.0, 5.0), 2.0).is_none());
}

#[test]
fn ray_sphere_behind_origin_is_not_a_hit() {
    assert!(ray_sphere(&forward_ray(), Vec3::new(0.0, 0.0, 5.0), 2.0).is_none());
}

#[test]
fn ray_from_inside_hits_far_wall() {
    let t = ray_sphere(&forward_ray(), Vec3::ZERO, PANORAMA_RADIUS).unwrap();
    assert!((t - PANORAMA_RADIUS).abs() < 1e-2);
}

#[test]
fn panorama_alone_never_picks() {
    let graph = graph_with_panorama();
    // the sphere is under every ray...
    let hits = graph.intersect(&forward_ray());
    assert_eq!(hits.len(), 1);
    assert!(matches!(hits[0].kind, MeshKind::Panorama { .. }));
    // ...but it is not a hotspot
    assert_eq!(pick_ray(&graph, &forward_ray()), None);
}

#[test]
fn nearest_marker_wins() {
    let ids = hotspot_ids(2);
    let mut graph = graph_with_panorama();
    graph.add_marker(ids[0], Vec3::new(0.0, 0.0, -480.0), [1.0; 3], 0.8);
    graph.add_marker(ids[1], Vec3::new(0.0, 0.0, -100.0), [1.0; 3], 0.8);
    assert_eq!(pick_ray(&graph, &forward_ray()), Some(ids[1]));
}

#[test]
fn coincident_markers_resolve_to_first_inserted() {
    let ids = hotspot_ids(3);
    let mut graph = graph_with_panorama();
    let p = Vec3::new(0.0, 0.0, -500.0);
    graph.add_marker(ids[2], p, [1.0; 3], 0.8);
    graph.add_marker(ids[0], p, [1.0; 3], 0.8);
    graph.add_marker(ids[1], p, [1.0; 3], 0.8);
    assert_eq!(pick_ray(&graph, &forward_ray()), Some(ids[2]));
}

#[test]
fn screen_pick_uses_camera_orientation() {
    let ids = hotspot_ids(1);
    let mut graph = graph_with_panorama();
    graph.add_marker(ids[0], Vec3::new(-500.0, 0.0, 0.0), [1.0; 3], 0.8);
    let mut cam = Camera {
        aspect: VIEWPORT.x / VIEWPORT.y,
        ..Camera::default()
    };
    assert_eq!(pick_screen(&graph, &cam, CENTER, VIEWPORT), None);
    // turn to face -X
    cam.set_orientation(std::f32::consts::FRAC_PI_2, 0.0);
    assert_eq!(pick_screen(&graph, &cam, CENTER, VIEWPORT), Some(ids[0]));
    assert_eq!(pick_screen(&graph, &cam, Vec2::new(10.0, 10.0), VIEWPORT), None);
}

#[test]
fn panoramas_stay_ahead_of_markers_in_draw_order() {
    let ids = hotspot_ids(1);
    let mut model = TourModel::new();
    let s = model.add_scene(ImageSource::new("s"), "s");
    let mut graph = SceneGraph::new();
    let first = graph.add_panorama(s, TextureHandle::from_raw(0), 1.0);
    let marker = graph.add_marker(ids[0], Vec3::NEG_Z * 500.0, [1.0; 3], 0.8);
    let second = graph.add_panorama(s, TextureHandle::from_raw(1), 0.0);
    let order: Vec<_> = graph.meshes().iter().map(|m| m.id).collect();
    assert_eq!(order, vec![first, second, marker]);
}

#[test]
fn mesh_setters_touch_only_their_mesh() {
    let ids = hotspot_ids(2);
    let mut graph = SceneGraph::new();
    let a = graph.add_marker(ids[0], Vec3::X, [1.0; 3], 0.8);
    let b = graph.add_marker(ids[1], Vec3::Y, [1.0; 3], 0.8);
    assert!(graph.set_color(a, [0.0, 1.0, 0.0]));
    assert!(graph.set_position(a, Vec3::Z));
    assert!(graph.set_opacity(a, 2.0));
    let ma = graph.mesh(a).unwrap();
    assert_eq!(ma.color, [0.0, 1.0, 0.0]);
    assert_eq!(ma.position, Vec3::Z);
    assert_eq!(ma.opacity, 1.0);
    let mb = graph.mesh(b).unwrap();
    assert_eq!(mb.position, Vec3::Y);
    assert_eq!(mb.opacity, 0.8);

    graph.remove(a);
    assert!(!graph.set_opacity(a, 0.5));
    assert_eq!(graph.marker_for(ids[1]).map(|m| m.id), Some(b));
}
