//! Seam between the core and whatever decodes and uploads panorama images.
//!
//! Loads are fire-and-forget: `begin_load` returns immediately with a handle
//! and the render loop polls `status` each frame. Releasing a handle cancels
//! a load that is still in flight.

use crate::model::ImageSource;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureHandle(u64);

impl TextureHandle {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TextureStatus {
    Loading,
    Ready,
    /// The sphere renders blank; this is logged, never fatal.
    Failed(String),
    /// Unknown or already released handle.
    Released,
}

pub trait TextureLoader {
    fn begin_load(&mut self, source: &ImageSource) -> TextureHandle;
    fn status(&self, handle: TextureHandle) -> TextureStatus;
    fn release(&mut self, handle: TextureHandle);
}
