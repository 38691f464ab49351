//! Hotspot authoring state machine.
//!
//! The machine only decides; it never touches the model. The viewer performs
//! the resulting [`ClickAction`] and reports back (e.g. with
//! [`AuthoringFsm::placement_done`]) so the mode flags can never drift from
//! what actually happened.

use crate::model::{HotspotId, SceneId};
use crate::notice::Notice;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AuthoringState {
    #[default]
    Idle,
    Placing,
    AwaitingLinkTarget(HotspotId),
}

/// The marker a click landed on, with its current link.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HotspotHit {
    pub hotspot: HotspotId,
    pub target: Option<SceneId>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickAction {
    Ignored,
    /// Create a hotspot where the click ray meets the panorama sphere.
    Place,
    Navigate(SceneId),
    /// Show the link-target picker for this hotspot.
    ChooseLinkTarget(HotspotId),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkChoice {
    Link { hotspot: HotspotId, target: SceneId },
    Dismissed(HotspotId),
}

#[derive(Clone, Copy, Debug, Default)]
pub struct AuthoringFsm {
    state: AuthoringState,
}

impl AuthoringFsm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> AuthoringState {
        self.state
    }

    pub fn is_placing(&self) -> bool {
        self.state == AuthoringState::Placing
    }

    pub fn pending_link(&self) -> Option<HotspotId> {
        match self.state {
            AuthoringState::AwaitingLinkTarget(h) => Some(h),
            _ => None,
        }
    }

    fn set(&mut self, next: AuthoringState) {
        if self.state != next {
            log::debug!("[authoring] {:?} -> {:?}", self.state, next);
            self.state = next;
        }
    }

    pub fn toggle_placement(&mut self, transitioning: bool) -> Option<Notice> {
        if transitioning {
            log::debug!("[authoring] toggle ignored during transition");
            return None;
        }
        match self.state {
            AuthoringState::Placing => {
                self.set(AuthoringState::Idle);
                Some(Notice::placement_cancelled())
            }
            AuthoringState::Idle | AuthoringState::AwaitingLinkTarget(_) => {
                self.set(AuthoringState::Placing);
                Some(Notice::placement_enabled())
            }
        }
    }

    /// Return to `Idle` from any state.
    pub fn cancel(&mut self) -> Option<Notice> {
        let was_placing = self.is_placing();
        self.set(AuthoringState::Idle);
        was_placing.then(Notice::placement_cancelled)
    }

    pub fn click(&mut self, hit: Option<HotspotHit>, transitioning: bool) -> ClickAction {
        if transitioning {
            return ClickAction::Ignored;
        }
        match hit {
            Some(HotspotHit {
                target: Some(target),
                ..
            }) => {
                self.set(AuthoringState::Idle);
                ClickAction::Navigate(target)
            }
            Some(HotspotHit {
                hotspot,
                target: None,
            }) => {
                self.set(AuthoringState::AwaitingLinkTarget(hotspot));
                ClickAction::ChooseLinkTarget(hotspot)
            }
            None if self.is_placing() => ClickAction::Place,
            None => ClickAction::Ignored,
        }
    }

    /// The viewer created the hotspot requested by [`ClickAction::Place`].
    pub fn placement_done(&mut self) -> Notice {
        self.set(AuthoringState::Idle);
        Notice::hotspot_added()
    }

    /// Resolve the pending link selection. `None` target is a dismissal.
    ///
    /// Returns `None` when no selection was pending.
    pub fn select_link_target(&mut self, target: Option<SceneId>) -> Option<LinkChoice> {
        let hotspot = self.pending_link()?;
        self.set(AuthoringState::Idle);
        Some(match target {
            Some(target) => LinkChoice::Link { hotspot, target },
            None => LinkChoice::Dismissed(hotspot),
        })
    }
}
