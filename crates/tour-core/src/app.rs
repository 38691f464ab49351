use crate::authoring::{AuthoringState, ClickAction};
use crate::error::TourError;
use crate::model::{ImageSource, LinkOutcome, Scene, SceneId, TourModel};
use crate::notice::Notice;
use crate::texture::TextureLoader;
use crate::transition::TransitionTick;
use crate::viewer::{Viewer, ViewerConfig};
use glam::Vec2;

/// Top-level state holder: owns the tour and the viewer showing it.
///
/// Front-ends talk to this type only; it passes the model down into each
/// viewer operation.
pub struct TourApp<L: TextureLoader> {
    model: TourModel,
    viewer: Viewer<L>,
}

impl<L: TextureLoader> TourApp<L> {
    pub fn new(loader: L, config: ViewerConfig) -> Self {
        Self {
            model: TourModel::new(),
            viewer: Viewer::new(loader, config),
        }
    }

    pub fn model(&self) -> &TourModel {
        &self.model
    }

    pub fn viewer(&self) -> &Viewer<L> {
        &self.viewer
    }

    pub fn viewer_mut(&mut self) -> &mut Viewer<L> {
        &mut self.viewer
    }

    pub fn scenes(&self) -> &[Scene] {
        self.model.scenes()
    }

    pub fn active_scene_id(&self) -> Option<SceneId> {
        self.viewer.active_scene()
    }

    pub fn active_scene(&self) -> Option<&Scene> {
        self.model.scene(self.viewer.active_scene()?)
    }

    pub fn authoring_state(&self) -> AuthoringState {
        self.viewer.authoring_state()
    }

    pub fn is_transitioning(&self) -> bool {
        self.viewer.is_transitioning()
    }

    /// Add an uploaded image as a new scene. The first scene becomes active.
    pub fn upload(&mut self, image: ImageSource, name: &str) -> SceneId {
        let id = self.model.add_scene(image, name);
        self.viewer.push_notice(Notice::image_uploaded(name));
        if self.viewer.active_scene().is_none() {
            self.viewer.activate_scene(&self.model, id);
        }
        id
    }

    /// Sidebar selection: switch without a crossfade.
    pub fn select_scene(&mut self, id: SceneId) -> bool {
        self.viewer.activate_scene(&self.model, id)
    }

    pub fn toggle_placement(&mut self) {
        self.viewer.toggle_placement();
    }

    pub fn cancel_authoring(&mut self) {
        self.viewer.cancel_authoring();
    }

    pub fn link_candidates(&self) -> Vec<&Scene> {
        self.viewer.link_candidates(&self.model)
    }

    pub fn select_link_target(
        &mut self,
        target: Option<SceneId>,
    ) -> Result<Option<LinkOutcome>, TourError> {
        self.viewer.select_link_target(&mut self.model, target)
    }

    pub fn pointer_down(&mut self, pos: Vec2) {
        self.viewer.pointer_down(pos);
    }

    pub fn pointer_move(&mut self, pos: Vec2) {
        self.viewer.pointer_move(pos);
    }

    pub fn pointer_up(&mut self, pos: Vec2) -> Option<ClickAction> {
        self.viewer.pointer_up(&mut self.model, pos)
    }

    pub fn pointer_leave(&mut self) {
        self.viewer.pointer_leave();
    }

    pub fn click(&mut self, pos: Vec2) -> ClickAction {
        self.viewer.click(&mut self.model, pos)
    }

    pub fn tick(&mut self) -> TransitionTick {
        self.viewer.tick(&self.model)
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewer.resize(width, height);
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.viewer.drain_notices()
    }

    pub fn dispose(&mut self) {
        self.viewer.dispose();
    }

    /// Replace the viewer with a fresh one drawing through `loader`.
    ///
    /// The tour survives: the new viewer shows the scene that was active
    /// before, or the first scene if none was. The old viewer is disposed
    /// first if it was still mounted.
    pub fn remount(&mut self, loader: L) {
        let config = self.viewer.config().clone();
        let viewport = self.viewer.viewport();
        let shown = self
            .viewer
            .active_scene()
            .or_else(|| self.model.scenes().first().map(|s| s.id));
        self.viewer.dispose();
        self.viewer = Viewer::new(loader, config);
        self.viewer.resize(viewport.x, viewport.y);
        if let Some(id) = shown {
            self.viewer.activate_scene(&self.model, id);
        }
        log::info!("[tour] viewer remounted on {:?}", shown);
    }
}
