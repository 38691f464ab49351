//! Crossfade between the current panorama sphere and an incoming one.
//!
//! Both spheres live in the graph for the whole fade. Progress advances by a
//! fixed step per display refresh; when it reaches 1 the outgoing sphere is
//! removed and handed back to the caller for disposal.

use crate::constants::TRANSITION_STEP;
use crate::graph::{Mesh, MeshId, SceneGraph};
use crate::model::SceneId;

/// Opacities `(outgoing, incoming)` at `progress`, clamped to `[0, 1]`.
#[inline]
pub fn crossfade_opacity(progress: f32) -> (f32, f32) {
    let p = progress.clamp(0.0, 1.0);
    (1.0 - p, p)
}

#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    pub target: SceneId,
    pub progress: f32,
    pub outgoing: Option<MeshId>,
    pub incoming: MeshId,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TransitionTick {
    Idle,
    Running { progress: f32 },
    Finished(Finished),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Finished {
    pub target: SceneId,
    pub incoming: MeshId,
    /// The removed outgoing sphere; its texture is the caller's to release.
    pub outgoing: Option<Mesh>,
}

#[derive(Clone, Debug)]
pub struct TransitionAnimator {
    active: Option<Transition>,
    step: f32,
}

impl Default for TransitionAnimator {
    fn default() -> Self {
        Self::new(TRANSITION_STEP)
    }
}

impl TransitionAnimator {
    pub fn new(step: f32) -> Self {
        Self {
            active: None,
            step: step.max(f32::EPSILON),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<&Transition> {
        self.active.as_ref()
    }

    pub fn progress(&self) -> Option<f32> {
        self.active.as_ref().map(|t| t.progress)
    }

    /// Start fading from `outgoing` to `incoming`, which the caller has
    /// already added to the graph at opacity 0. Refused while another fade
    /// is running.
    pub fn begin(&mut self, target: SceneId, outgoing: Option<MeshId>, incoming: MeshId) -> bool {
        if self.active.is_some() {
            log::debug!("[transition] already running, {} ignored", target);
            return false;
        }
        log::info!("[transition] begin -> {}", target);
        self.active = Some(Transition {
            target,
            progress: 0.0,
            outgoing,
            incoming,
        });
        true
    }

    /// One display-refresh step.
    pub fn tick(&mut self, graph: &mut SceneGraph) -> TransitionTick {
        let Some(t) = self.active.as_mut() else {
            return TransitionTick::Idle;
        };
        t.progress = (t.progress + self.step).min(1.0);
        let (out_a, in_a) = crossfade_opacity(t.progress);
        if let Some(out) = t.outgoing {
            graph.set_opacity(out, out_a);
        }
        graph.set_opacity(t.incoming, in_a);
        if t.progress < 1.0 {
            return TransitionTick::Running {
                progress: t.progress,
            };
        }

        let Some(done) = self.active.take() else {
            return TransitionTick::Idle;
        };
        let outgoing = done.outgoing.and_then(|id| graph.remove(id));
        log::info!("[transition] finished -> {}", done.target);
        TransitionTick::Finished(Finished {
            target: done.target,
            incoming: done.incoming,
            outgoing,
        })
    }

    /// Drop the running fade without touching the graph (used on dispose).
    pub fn cancel(&mut self) -> Option<Transition> {
        self.active.take()
    }
}
