//! Retained scene graph drawn by the renderer.
//!
//! The graph is a disposable projection of the active scene: the viewer
//! rebuilds it from the model rather than patching it from input handlers.
//! It holds panorama spheres (textured, viewed from inside) and hotspot
//! markers (small coloured spheres), each with its own opacity.

use crate::camera::Ray;
use crate::constants::{MARKER_RADIUS, PANORAMA_RADIUS};
use crate::model::{HotspotId, SceneId};
use crate::texture::TextureHandle;
use glam::Vec3;
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshId(u64);

impl MeshId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MeshKind {
    Panorama {
        scene: SceneId,
        texture: TextureHandle,
    },
    Marker {
        hotspot: HotspotId,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
    pub id: MeshId,
    pub kind: MeshKind,
    pub position: Vec3,
    pub radius: f32,
    pub color: [f32; 3],
    pub opacity: f32,
}

impl Mesh {
    pub fn is_panorama(&self) -> bool {
        matches!(self.kind, MeshKind::Panorama { .. })
    }

    pub fn hotspot(&self) -> Option<HotspotId> {
        match self.kind {
            MeshKind::Marker { hotspot } => Some(hotspot),
            MeshKind::Panorama { .. } => None,
        }
    }

    pub fn texture(&self) -> Option<TextureHandle> {
        match self.kind {
            MeshKind::Panorama { texture, .. } => Some(texture),
            MeshKind::Marker { .. } => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    pub mesh: MeshId,
    pub kind: MeshKind,
    pub t: f32,
}

/// Nearest non-negative ray parameter at which `ray` meets the sphere.
///
/// Rays starting inside the sphere hit its far wall, which is how the eye
/// sees the panorama sphere it sits in. `ray.dir` must be normalized.
#[inline]
pub fn ray_sphere(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray.origin - center;
    let b = oc.dot(ray.dir);
    let c = oc.dot(oc) - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let sq = disc.sqrt();
    let near = -b - sq;
    if near >= 0.0 {
        return Some(near);
    }
    let far = -b + sq;
    (far >= 0.0).then_some(far)
}

#[derive(Debug, Default)]
pub struct SceneGraph {
    // draw order: panoramas first, then markers in insertion order
    meshes: Vec<Mesh>,
    next_id: u64,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    pub fn mesh(&self, id: MeshId) -> Option<&Mesh> {
        self.meshes.iter().find(|m| m.id == id)
    }

    pub fn panoramas(&self) -> impl Iterator<Item = &Mesh> {
        self.meshes.iter().filter(|m| m.is_panorama())
    }

    pub fn markers(&self) -> impl Iterator<Item = &Mesh> {
        self.meshes.iter().filter(|m| !m.is_panorama())
    }

    /// Meshes in draw order, each paired with the alpha to blend it with.
    ///
    /// Blended back to front over an opaque clear, the bottom panorama of a
    /// crossfade is laid down opaque so that a panorama at opacity `p` drawn
    /// over it leaves `p * incoming + (1 - p) * outgoing`. A lone panorama
    /// keeps its own opacity and fades in from the clear colour.
    pub fn draw_list(&self) -> impl Iterator<Item = (&Mesh, f32)> {
        let mut panoramas = self.panoramas();
        let base = panoramas.next().map(|m| m.id);
        let base = if panoramas.next().is_some() { base } else { None };
        self.meshes.iter().map(move |m| {
            let alpha = if Some(m.id) == base { 1.0 } else { m.opacity };
            (m, alpha)
        })
    }

    pub fn marker_for(&self, hotspot: HotspotId) -> Option<&Mesh> {
        self.markers().find(|m| m.hotspot() == Some(hotspot))
    }

    fn push(
        &mut self,
        kind: MeshKind,
        position: Vec3,
        radius: f32,
        color: [f32; 3],
        opacity: f32,
    ) -> MeshId {
        let id = MeshId(self.next_id);
        self.next_id += 1;
        self.meshes.push(Mesh {
            id,
            kind,
            position,
            radius,
            color,
            opacity,
        });
        id
    }

    /// Panoramas are drawn before any marker regardless of insertion time.
    pub fn add_panorama(
        &mut self,
        scene: SceneId,
        texture: TextureHandle,
        opacity: f32,
    ) -> MeshId {
        let id = self.push(
            MeshKind::Panorama { scene, texture },
            Vec3::ZERO,
            PANORAMA_RADIUS,
            [1.0, 1.0, 1.0],
            opacity,
        );
        // keep panoramas ahead of markers so the renderer can draw in order
        let first_marker = self.meshes.iter().position(|m| !m.is_panorama());
        if let Some(at) = first_marker {
            if let Some(mesh) = self.meshes.pop() {
                self.meshes.insert(at, mesh);
            }
        }
        id
    }

    pub fn add_marker(
        &mut self,
        hotspot: HotspotId,
        position: Vec3,
        color: [f32; 3],
        opacity: f32,
    ) -> MeshId {
        self.push(
            MeshKind::Marker { hotspot },
            position,
            MARKER_RADIUS,
            color,
            opacity,
        )
    }

    pub fn remove(&mut self, id: MeshId) -> Option<Mesh> {
        let at = self.meshes.iter().position(|m| m.id == id)?;
        Some(self.meshes.remove(at))
    }

    /// Remove every marker, returning how many were dropped.
    pub fn remove_markers(&mut self) -> usize {
        let before = self.meshes.len();
        self.meshes.retain(|m| m.is_panorama());
        before - self.meshes.len()
    }

    /// Empty the graph, handing back the removed meshes for disposal.
    pub fn clear(&mut self) -> Vec<Mesh> {
        std::mem::take(&mut self.meshes)
    }

    pub fn set_opacity(&mut self, id: MeshId, opacity: f32) -> bool {
        match self.meshes.iter_mut().find(|m| m.id == id) {
            Some(m) => {
                m.opacity = opacity.clamp(0.0, 1.0);
                true
            }
            None => false,
        }
    }

    pub fn set_color(&mut self, id: MeshId, color: [f32; 3]) -> bool {
        match self.meshes.iter_mut().find(|m| m.id == id) {
            Some(m) => {
                m.color = color;
                true
            }
            None => false,
        }
    }

    pub fn set_position(&mut self, id: MeshId, position: Vec3) -> bool {
        match self.meshes.iter_mut().find(|m| m.id == id) {
            Some(m) => {
                m.position = position;
                true
            }
            None => false,
        }
    }

    pub fn set_marker_opacity(&mut self, opacity: f32) {
        let o = opacity.clamp(0.0, 1.0);
        for m in self.meshes.iter_mut().filter(|m| !m.is_panorama()) {
            m.opacity = o;
        }
    }

    /// Every mesh under `ray`, nearest first.
    ///
    /// Equal distances keep insertion order (lower mesh id first).
    pub fn intersect(&self, ray: &Ray) -> SmallVec<[RayHit; 4]> {
        let mut hits: SmallVec<[RayHit; 4]> = self
            .meshes
            .iter()
            .filter_map(|m| {
                ray_sphere(ray, m.position, m.radius).map(|t| RayHit {
                    mesh: m.id,
                    kind: m.kind,
                    t,
                })
            })
            .collect();
        hits.sort_by(|a, b| a.t.total_cmp(&b.t).then_with(|| a.mesh.cmp(&b.mesh)));
        hits
    }
}
