//! Viewer orchestration for the active scene.
//!
//! The viewer owns everything that is view state rather than tour data: the
//! scene graph, camera, look controller, authoring machine and crossfade
//! animator. The [`TourModel`] is passed into each operation by the state
//! holder that owns it, and the graph is rebuilt from the model whenever the
//! model's revision moves.

use crate::authoring::{AuthoringFsm, AuthoringState, ClickAction, HotspotHit, LinkChoice};
use crate::camera::Camera;
use crate::constants::{
    LINKED_MARKER_COLOR, LOOK_SENSITIVITY, MARKER_OPACITY, PANORAMA_RADIUS, TRANSITION_STEP,
    UNLINKED_MARKER_COLOR,
};
use crate::error::TourError;
use crate::graph::{MeshId, MeshKind, SceneGraph};
use crate::look::{LookController, Release};
use crate::model::{HotspotId, ImageSource, LinkOutcome, Scene, SceneId, TourModel};
use crate::notice::Notice;
use crate::picker;
use crate::texture::{TextureHandle, TextureLoader, TextureStatus};
use crate::transition::{crossfade_opacity, TransitionAnimator, TransitionTick};
use glam::Vec2;
use smallvec::SmallVec;

/// Runtime tunables; `Default` takes the values from [`crate::constants`].
#[derive(Clone, Debug)]
pub struct ViewerConfig {
    pub look_sensitivity: f32,
    pub transition_step: f32,
    pub sphere_radius: f32,
    pub marker_opacity: f32,
    pub linked_color: [f32; 3],
    pub unlinked_color: [f32; 3],
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            look_sensitivity: LOOK_SENSITIVITY,
            transition_step: TRANSITION_STEP,
            sphere_radius: PANORAMA_RADIUS,
            marker_opacity: MARKER_OPACITY,
            linked_color: LINKED_MARKER_COLOR,
            unlinked_color: UNLINKED_MARKER_COLOR,
        }
    }
}

pub struct Viewer<L: TextureLoader> {
    config: ViewerConfig,
    loader: L,
    graph: SceneGraph,
    camera: Camera,
    look: LookController,
    authoring: AuthoringFsm,
    animator: TransitionAnimator,
    active_scene: Option<SceneId>,
    // sphere currently shown (the outgoing one while a fade runs)
    panorama: Option<MeshId>,
    synced_revision: Option<u64>,
    // handles still loading; polled once per tick
    watched: SmallVec<[TextureHandle; 2]>,
    notices: Vec<Notice>,
    viewport: Vec2,
    disposed: bool,
}

impl<L: TextureLoader> Viewer<L> {
    pub fn new(loader: L, config: ViewerConfig) -> Self {
        Self {
            look: LookController::new(config.look_sensitivity),
            animator: TransitionAnimator::new(config.transition_step),
            config,
            loader,
            graph: SceneGraph::new(),
            camera: Camera::default(),
            authoring: AuthoringFsm::new(),
            active_scene: None,
            panorama: None,
            synced_revision: None,
            watched: SmallVec::new(),
            notices: Vec::new(),
            viewport: Vec2::ONE,
            disposed: false,
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    pub fn loader_mut(&mut self) -> &mut L {
        &mut self.loader
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    /// Externally visible active scene. During a crossfade this stays on the
    /// outgoing scene until the fade has fully completed.
    pub fn active_scene(&self) -> Option<SceneId> {
        self.active_scene
    }

    pub fn is_transitioning(&self) -> bool {
        self.animator.is_active()
    }

    pub fn transition_progress(&self) -> Option<f32> {
        self.animator.progress()
    }

    pub fn authoring_state(&self) -> AuthoringState {
        self.authoring.state()
    }

    pub fn is_look_engaged(&self) -> bool {
        self.look.is_engaged()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn push_notice(&mut self, notice: Notice) {
        log::info!("[tour] notice: {} - {}", notice.title, notice.description);
        self.notices.push(notice);
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Scenes a pending hotspot may be linked to.
    pub fn link_candidates<'m>(&self, model: &'m TourModel) -> Vec<&'m Scene> {
        model.link_candidates(self.active_scene).collect()
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        self.viewport = Vec2::new(width, height);
        self.camera.aspect = width / height;
    }

    pub fn set_camera_orientation(&mut self, yaw: f32, pitch: f32) {
        self.camera.set_orientation(yaw, pitch);
    }

    // ---------------- Scene activation ----------------

    /// Show `id` immediately, without a crossfade.
    pub fn activate_scene(&mut self, model: &TourModel, id: SceneId) -> bool {
        if self.disposed || self.is_transitioning() {
            return false;
        }
        if !model.contains_scene(id) {
            log::warn!("[tour] cannot activate unknown {}", id);
            return false;
        }
        if self.active_scene == Some(id) {
            return false;
        }
        // a pending link belongs to the scene we are leaving
        if self.authoring.pending_link().is_some() {
            self.authoring.cancel();
        }
        log::info!("[tour] activate {}", id);
        self.active_scene = Some(id);
        self.camera.set_orientation(0.0, 0.0);
        self.rebuild(model);
        true
    }

    /// Tear down the graph and rebuild it from `(active scene, hotspots)`.
    ///
    /// The panorama texture of the scene being rebuilt is kept so a hotspot
    /// edit does not reload the image.
    fn rebuild(&mut self, model: &TourModel) {
        let Some(active) = self.active_scene else {
            self.teardown();
            self.synced_revision = Some(model.revision());
            return;
        };
        let Some(scene) = model.scene(active) else {
            debug_assert!(false, "active scene {} missing from model", active);
            log::warn!("[tour] active {} missing from model", active);
            return;
        };
        let reuse = self.graph.panoramas().find_map(|m| match m.kind {
            MeshKind::Panorama { scene, texture } if scene == active => Some(texture),
            _ => None,
        });
        for mesh in self.graph.clear() {
            if let Some(tex) = mesh.texture() {
                if Some(tex) != reuse {
                    self.release_texture(tex);
                }
            }
        }
        let texture = match reuse {
            Some(t) => t,
            None => self.request_texture(&scene.image),
        };
        self.panorama = Some(self.graph.add_panorama(active, texture, 1.0));
        self.add_markers(scene);
        self.synced_revision = Some(model.revision());
        log::debug!(
            "[tour] rebuilt {} with {} marker(s)",
            active,
            scene.hotspots.len()
        );
    }

    fn add_markers(&mut self, scene: &Scene) {
        for h in &scene.hotspots {
            let color = if h.is_linked() {
                self.config.linked_color
            } else {
                self.config.unlinked_color
            };
            self.graph
                .add_marker(h.id, h.position, color, self.config.marker_opacity);
        }
    }

    fn teardown(&mut self) {
        for mesh in self.graph.clear() {
            if let Some(tex) = mesh.texture() {
                self.release_texture(tex);
            }
        }
        self.panorama = None;
    }

    fn request_texture(&mut self, source: &ImageSource) -> TextureHandle {
        let handle = self.loader.begin_load(source);
        log::debug!("[texture] requested {:?}", handle);
        self.watched.push(handle);
        handle
    }

    fn release_texture(&mut self, handle: TextureHandle) {
        self.loader.release(handle);
        self.watched.retain(|h| *h != handle);
    }

    fn poll_textures(&mut self) {
        let loader = &self.loader;
        self.watched.retain(|h| match loader.status(*h) {
            TextureStatus::Loading => true,
            TextureStatus::Ready => {
                log::debug!("[texture] {:?} ready", h);
                false
            }
            TextureStatus::Failed(reason) => {
                log::warn!("[texture] {:?} failed, rendering blank: {}", h, reason);
                false
            }
            TextureStatus::Released => false,
        });
    }

    // ---------------- Pointer input ----------------

    pub fn pointer_down(&mut self, pos: Vec2) {
        if self.disposed {
            return;
        }
        let frozen = self.is_transitioning();
        self.look.pointer_down(pos, frozen);
    }

    pub fn pointer_move(&mut self, pos: Vec2) {
        if self.disposed {
            return;
        }
        let frozen = self.is_transitioning();
        self.look.pointer_move(pos, &mut self.camera, frozen);
    }

    /// Release the pointer; a press that did not drag is treated as a click.
    pub fn pointer_up(&mut self, model: &mut TourModel, pos: Vec2) -> Option<ClickAction> {
        if self.disposed {
            return None;
        }
        match self.look.pointer_up() {
            Release::Click => Some(self.click(model, pos)),
            Release::Drag | Release::Idle => None,
        }
    }

    pub fn pointer_leave(&mut self) {
        self.look.pointer_leave();
    }

    /// Resolve a discrete click at `pos` (surface pixels).
    pub fn click(&mut self, model: &mut TourModel, pos: Vec2) -> ClickAction {
        if self.disposed {
            return ClickAction::Ignored;
        }
        let transitioning = self.is_transitioning();
        let hit = if transitioning {
            None
        } else {
            self.hit_at(model, pos)
        };
        let action = self.authoring.click(hit, transitioning);
        match action {
            ClickAction::Place => match self.place_hotspot(model, pos) {
                Ok(_) => {
                    let notice = self.authoring.placement_done();
                    self.push_notice(notice);
                }
                Err(e) => {
                    log::warn!("[authoring] placement failed: {}", e);
                    self.authoring.cancel();
                }
            },
            ClickAction::Navigate(target) => {
                if !self.start_transition(model, target) {
                    return ClickAction::Ignored;
                }
            }
            ClickAction::ChooseLinkTarget(h) => {
                log::info!("[authoring] choose link target for {}", h);
            }
            ClickAction::Ignored => {}
        }
        action
    }

    fn hit_at(&self, model: &TourModel, pos: Vec2) -> Option<HotspotHit> {
        let hotspot = picker::pick_screen(&self.graph, &self.camera, pos, self.viewport)?;
        match model.hotspot(hotspot) {
            Some(h) => Some(HotspotHit {
                hotspot,
                target: h.target,
            }),
            None => {
                debug_assert!(false, "marker for unknown {}", hotspot);
                log::warn!("[tour] marker for unknown {}", hotspot);
                None
            }
        }
    }

    fn place_hotspot(&mut self, model: &mut TourModel, pos: Vec2) -> Result<HotspotId, TourError> {
        let scene = self.active_scene.ok_or(TourError::NoActiveScene)?;
        let dir = self
            .camera
            .screen_ray(pos, self.viewport)
            .map(|r| r.dir)
            .unwrap_or_else(|| self.camera.forward());
        let id = model.add_hotspot(scene, dir * self.config.sphere_radius)?;
        self.rebuild(model);
        Ok(id)
    }

    // ---------------- Authoring ----------------

    pub fn toggle_placement(&mut self) {
        if self.disposed {
            return;
        }
        if let Some(notice) = self.authoring.toggle_placement(self.is_transitioning()) {
            self.push_notice(notice);
        }
    }

    pub fn cancel_authoring(&mut self) {
        if let Some(notice) = self.authoring.cancel() {
            self.push_notice(notice);
        }
    }

    /// Finish a pending link selection; `None` dismisses it.
    ///
    /// Returns `Ok(None)` when nothing was pending or the selection was
    /// dismissed. An unknown target ends the selection with an error and the
    /// hotspot stays unlinked.
    pub fn select_link_target(
        &mut self,
        model: &mut TourModel,
        target: Option<SceneId>,
    ) -> Result<Option<LinkOutcome>, TourError> {
        if self.disposed || self.is_transitioning() {
            return Ok(None);
        }
        match self.authoring.select_link_target(target) {
            None => Ok(None),
            Some(LinkChoice::Dismissed(h)) => {
                log::info!("[authoring] link selection for {} dismissed", h);
                Ok(None)
            }
            Some(LinkChoice::Link { hotspot, target }) => {
                let outcome = model.link_hotspot(hotspot, target)?;
                let name = model
                    .scene(target)
                    .map(|s| s.name.clone())
                    .unwrap_or_default();
                self.push_notice(Notice::hotspot_linked(&name));
                if outcome == LinkOutcome::Linked {
                    self.rebuild(model);
                }
                Ok(Some(outcome))
            }
        }
    }

    // ---------------- Transitions ----------------

    /// Begin a crossfade to `target`.
    ///
    /// No-op while a fade is running, for an unknown scene or for the scene
    /// already shown.
    pub fn start_transition(&mut self, model: &TourModel, target: SceneId) -> bool {
        if self.disposed || self.animator.is_active() {
            return false;
        }
        let Some(scene) = model.scene(target) else {
            log::warn!("[transition] unknown target {}", target);
            return false;
        };
        if self.active_scene == Some(target) {
            log::debug!("[transition] {} already shown", target);
            return false;
        }
        let texture = self.request_texture(&scene.image);
        let incoming = self.graph.add_panorama(target, texture, 0.0);
        self.animator.begin(target, self.panorama, incoming)
    }

    /// One display-refresh step: advance the fade, poll textures, and apply
    /// any model change that arrived since the last rebuild.
    pub fn tick(&mut self, model: &TourModel) -> TransitionTick {
        if self.disposed {
            return TransitionTick::Idle;
        }
        self.poll_textures();
        let step = self.animator.tick(&mut self.graph);
        match &step {
            TransitionTick::Running { progress } => {
                let (outgoing, _) = crossfade_opacity(*progress);
                self.graph
                    .set_marker_opacity(self.config.marker_opacity * outgoing);
            }
            TransitionTick::Finished(done) => {
                if let Some(tex) = done.outgoing.as_ref().and_then(|m| m.texture()) {
                    self.release_texture(tex);
                }
                self.graph.remove_markers();
                self.panorama = Some(done.incoming);
                // the animator has already cleared; only now publish the id
                self.active_scene = Some(done.target);
                match model.scene(done.target) {
                    Some(scene) => self.add_markers(scene),
                    None => log::warn!("[transition] target {} vanished", done.target),
                }
                self.synced_revision = Some(model.revision());
            }
            TransitionTick::Idle => {}
        }
        if !self.is_transitioning()
            && self.active_scene.is_some()
            && self.synced_revision != Some(model.revision())
        {
            self.rebuild(model);
        }
        step
    }

    /// Unmount: drop the running fade and release everything the graph owns.
    /// Every later call is a no-op.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.animator.cancel();
        self.teardown();
        for h in std::mem::take(&mut self.watched) {
            self.loader.release(h);
        }
        self.look.pointer_leave();
        self.authoring.cancel();
        self.disposed = true;
        log::info!("[tour] viewer disposed");
    }
}
