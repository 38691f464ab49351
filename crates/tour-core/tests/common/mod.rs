// Shared test helpers: a texture loader driven by hand and a few screen
// coordinate conveniences.

#![allow(dead_code)]

use glam::Vec2;
use std::collections::HashMap;
use tour_core::{ImageSource, TextureHandle, TextureLoader, TextureStatus};

pub const VIEWPORT: Vec2 = Vec2::new(800.0, 600.0);
pub const CENTER: Vec2 = Vec2::new(400.0, 300.0);

#[derive(Default)]
pub struct ManualLoader {
    next: u64,
    pub statuses: HashMap<TextureHandle, TextureStatus>,
    pub sources: HashMap<TextureHandle, ImageSource>,
    pub released: Vec<TextureHandle>,
    pub requests: usize,
}

impl ManualLoader {
    pub fn finish(&mut self, handle: TextureHandle) {
        self.statuses.insert(handle, TextureStatus::Ready);
    }

    pub fn fail(&mut self, handle: TextureHandle, reason: &str) {
        self.statuses
            .insert(handle, TextureStatus::Failed(reason.to_string()));
    }

    pub fn live(&self) -> usize {
        self.statuses
            .values()
            .filter(|s| **s != TextureStatus::Released)
            .count()
    }
}

impl TextureLoader for ManualLoader {
    fn begin_load(&mut self, source: &ImageSource) -> TextureHandle {
        let handle = TextureHandle::from_raw(self.next);
        self.next += 1;
        self.requests += 1;
        self.statuses.insert(handle, TextureStatus::Loading);
        self.sources.insert(handle, source.clone());
        handle
    }

    fn status(&self, handle: TextureHandle) -> TextureStatus {
        self.statuses
            .get(&handle)
            .cloned()
            .unwrap_or(TextureStatus::Released)
    }

    fn release(&mut self, handle: TextureHandle) {
        self.statuses.insert(handle, TextureStatus::Released);
        self.released.push(handle);
    }
}

/// A screen corner far enough from the centre that no marker placed at the
/// centre can be under it.
pub fn off_center() -> Vec2 {
    Vec2::new(60.0, 60.0)
}
