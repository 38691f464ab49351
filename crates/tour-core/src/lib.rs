pub mod app;
pub mod authoring;
pub mod camera;
pub mod constants;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod look;
pub mod model;
pub mod notice;
pub mod picker;
pub mod texture;
pub mod transition;
pub mod viewer;

pub static PANORAMA_WGSL: &str = include_str!("../shaders/panorama.wgsl");

pub use app::*;
pub use authoring::*;
pub use camera::*;
pub use constants::*;
pub use error::*;
pub use geometry::*;
pub use graph::*;
pub use look::*;
pub use model::*;
pub use notice::*;
pub use texture::*;
pub use transition::*;
pub use viewer::*;
