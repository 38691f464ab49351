//! In-memory tour data: scenes, their hotspots and the links between them.
//!
//! The model is only ever mutated through [`TourModel::add_scene`],
//! [`TourModel::add_hotspot`] and [`TourModel::link_hotspot`]. Scenes and
//! hotspots are never removed, so a hotspot's target always names a scene
//! that exists.

use crate::constants::DEFAULT_HOTSPOT_TITLE;
use crate::error::TourError;
use fnv::FnvHashMap;
use glam::Vec3;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SceneId(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HotspotId(u64);

impl SceneId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl HotspotId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scene-{}", self.0)
    }
}

impl fmt::Display for HotspotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hotspot-{}", self.0)
    }
}

/// Opaque handle to an uploaded image (an object URL on the web).
///
/// The core never inspects it; it is only handed to a texture loader.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ImageSource(String);

impl ImageSource {
    pub fn new(source: impl Into<String>) -> Self {
        Self(source.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Hotspot {
    pub id: HotspotId,
    pub position: Vec3,
    pub target: Option<SceneId>,
    pub title: String,
}

impl Hotspot {
    pub fn is_linked(&self) -> bool {
        self.target.is_some()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    pub id: SceneId,
    pub image: ImageSource,
    pub name: String,
    pub hotspots: Vec<Hotspot>,
}

impl Scene {
    pub fn hotspot(&self, id: HotspotId) -> Option<&Hotspot> {
        self.hotspots.iter().find(|h| h.id == id)
    }
}

/// Result of [`TourModel::link_hotspot`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkOutcome {
    Linked,
    /// The hotspot already pointed at the requested scene.
    Unchanged,
}

#[derive(Debug, Default)]
pub struct TourModel {
    scenes: Vec<Scene>,
    scene_index: FnvHashMap<SceneId, usize>,
    // hotspot -> owning scene; a hotspot never moves between scenes
    hotspot_owner: FnvHashMap<HotspotId, SceneId>,
    next_scene: u64,
    next_hotspot: u64,
    revision: u64,
}

impl TourModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Monotonic counter bumped by every mutation that changed the model.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    /// Scenes in upload order.
    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    pub fn scene(&self, id: SceneId) -> Option<&Scene> {
        self.scene_index.get(&id).map(|&i| &self.scenes[i])
    }

    pub fn contains_scene(&self, id: SceneId) -> bool {
        self.scene_index.contains_key(&id)
    }

    pub fn hotspot(&self, id: HotspotId) -> Option<&Hotspot> {
        let owner = self.hotspot_owner.get(&id)?;
        self.scene(*owner)?.hotspot(id)
    }

    pub fn hotspot_owner(&self, id: HotspotId) -> Option<SceneId> {
        self.hotspot_owner.get(&id).copied()
    }

    /// Scenes a hotspot in `active` may link to: every scene except `active`.
    pub fn link_candidates(&self, active: Option<SceneId>) -> impl Iterator<Item = &Scene> {
        self.scenes.iter().filter(move |s| Some(s.id) != active)
    }

    pub fn add_scene(&mut self, image: ImageSource, name: impl Into<String>) -> SceneId {
        let id = SceneId(self.next_scene);
        self.next_scene += 1;
        let name = name.into();
        log::info!("[tour] add scene {} ({})", id, name);
        self.scene_index.insert(id, self.scenes.len());
        self.scenes.push(Scene {
            id,
            image,
            name,
            hotspots: Vec::new(),
        });
        self.revision += 1;
        id
    }

    /// Append an unlinked hotspot with the default title to `scene`.
    pub fn add_hotspot(&mut self, scene: SceneId, position: Vec3) -> Result<HotspotId, TourError> {
        let idx = *self
            .scene_index
            .get(&scene)
            .ok_or(TourError::UnknownScene(scene))?;
        let id = HotspotId(self.next_hotspot);
        self.next_hotspot += 1;
        self.scenes[idx].hotspots.push(Hotspot {
            id,
            position,
            target: None,
            title: DEFAULT_HOTSPOT_TITLE.to_string(),
        });
        self.hotspot_owner.insert(id, scene);
        self.revision += 1;
        log::info!(
            "[tour] add {} to {} at ({:.1},{:.1},{:.1})",
            id,
            scene,
            position.x,
            position.y,
            position.z
        );
        Ok(id)
    }

    /// Point `hotspot` at `target`. Re-linking to the same scene is a no-op.
    pub fn link_hotspot(
        &mut self,
        hotspot: HotspotId,
        target: SceneId,
    ) -> Result<LinkOutcome, TourError> {
        if !self.contains_scene(target) {
            return Err(TourError::UnknownScene(target));
        }
        let owner = *self
            .hotspot_owner
            .get(&hotspot)
            .ok_or(TourError::UnknownHotspot(hotspot))?;
        let idx = *self
            .scene_index
            .get(&owner)
            .ok_or(TourError::UnknownScene(owner))?;
        let h = self.scenes[idx]
            .hotspots
            .iter_mut()
            .find(|h| h.id == hotspot)
            .ok_or(TourError::UnknownHotspot(hotspot))?;
        if h.target == Some(target) {
            return Ok(LinkOutcome::Unchanged);
        }
        h.target = Some(target);
        self.revision += 1;
        log::info!("[tour] link {} -> {}", hotspot, target);
        Ok(LinkOutcome::Linked)
    }
}
