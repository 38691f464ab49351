use crate::camera::Camera;
use crate::constants::{CLICK_DRAG_TOLERANCE_PX, LOOK_SENSITIVITY};
use glam::Vec2;

/// Drag-to-look state for one pointer press.
#[derive(Clone, Copy, Debug)]
pub struct LookController {
    engaged: bool,
    last: Vec2,
    travel: f32,
    sensitivity: f32,
}

impl Default for LookController {
    fn default() -> Self {
        Self::new(LOOK_SENSITIVITY)
    }
}

/// What a pointer release amounted to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Release {
    /// Press and release within the click tolerance.
    Click,
    /// The pointer travelled far enough to count as a look drag.
    Drag,
    /// No press was being tracked.
    Idle,
}

impl LookController {
    pub fn new(sensitivity: f32) -> Self {
        Self {
            engaged: false,
            last: Vec2::ZERO,
            travel: 0.0,
            sensitivity,
        }
    }

    pub fn is_engaged(&self) -> bool {
        self.engaged
    }

    pub fn pointer_down(&mut self, pos: Vec2, frozen: bool) {
        if frozen {
            return;
        }
        self.engaged = true;
        self.last = pos;
        self.travel = 0.0;
    }

    pub fn pointer_move(&mut self, pos: Vec2, camera: &mut Camera, frozen: bool) {
        if frozen || !self.engaged {
            return;
        }
        let delta = pos - self.last;
        camera.rotate(-delta.x * self.sensitivity, -delta.y * self.sensitivity);
        self.travel += delta.length();
        self.last = pos;
    }

    /// Always processed, even while frozen, so a release during a
    /// transition cannot leave the controller engaged.
    pub fn pointer_up(&mut self) -> Release {
        if !self.engaged {
            return Release::Idle;
        }
        self.engaged = false;
        if self.travel <= CLICK_DRAG_TOLERANCE_PX {
            Release::Click
        } else {
            log::debug!("[look] drag released after {:.1}px", self.travel);
            Release::Drag
        }
    }

    pub fn pointer_leave(&mut self) {
        self.engaged = false;
    }
}
