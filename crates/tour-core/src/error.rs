use crate::model::{HotspotId, SceneId};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TourError {
    #[error("unknown scene {0}")]
    UnknownScene(SceneId),
    #[error("unknown hotspot {0}")]
    UnknownHotspot(HotspotId),
    #[error("no active scene")]
    NoActiveScene,
}
