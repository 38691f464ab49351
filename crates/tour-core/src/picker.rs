use crate::camera::{Camera, Ray};
use crate::graph::{MeshKind, SceneGraph};
use crate::model::HotspotId;
use glam::Vec2;

/// Hotspot marker under `ray`, if any.
///
/// Ordering contract:
/// - The panorama sphere never matches, even though every ray hits it.
/// - Otherwise the smallest ray parameter wins.
/// - Markers hit at exactly the same distance resolve to the one added to
///   the graph first.
pub fn pick_ray(graph: &SceneGraph, ray: &Ray) -> Option<HotspotId> {
    graph.intersect(ray).into_iter().find_map(|hit| match hit.kind {
        MeshKind::Marker { hotspot } => Some(hotspot),
        MeshKind::Panorama { .. } => None,
    })
}

/// Screen picking wrapper over [`pick_ray`].
pub fn pick_screen(
    graph: &SceneGraph,
    camera: &Camera,
    screen: Vec2,
    viewport: Vec2,
) -> Option<HotspotId> {
    let ray = camera.screen_ray(screen, viewport)?;
    pick_ray(graph, &ray)
}
