use glam::Vec2;
use web_sys as web;

/// Keys the tour responds to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyCommand {
    /// Leave placement or link selection.
    Cancel,
    TogglePlacement,
}

#[inline]
pub fn key_command(key: &str) -> Option<KeyCommand> {
    match key {
        "Escape" => Some(KeyCommand::Cancel),
        "p" | "P" => Some(KeyCommand::TogglePlacement),
        _ => None,
    }
}

/// Map a CSS-pixel offset inside an element to its backing-store pixels.
///
/// An element with no layout size maps everything to the origin.
#[inline]
pub fn css_to_backing_px(css: Vec2, css_size: Vec2, backing: Vec2) -> Vec2 {
    if css_size.x <= 0.0 || css_size.y <= 0.0 {
        return Vec2::ZERO;
    }
    css / css_size * backing
}

/// Backing-store size for a CSS box at the given device pixel ratio, never
/// smaller than 1x1.
#[inline]
pub fn backing_size(css_w: f64, css_h: f64, dpr: f64) -> (u32, u32) {
    let w = (css_w * dpr).max(0.0) as u32;
    let h = (css_h * dpr).max(0.0) as u32;
    (w.max(1), h.max(1))
}

/// Display name for an uploaded file: the base name without any directory
/// part. Blank names fall back to `"{prefix} {n}"` with a 1-based `n`.
pub fn display_name(file_name: &str, prefix: &str, index: usize) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();
    if base.is_empty() {
        format!("{} {}", prefix, index + 1)
    } else {
        base.to_string()
    }
}

// ---------------- Pointer helpers ----------------
#[inline]
pub fn pointer_canvas_px(ev: &web::MouseEvent, canvas: &web::HtmlCanvasElement) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    css_to_backing_px(
        Vec2::new(
            ev.client_x() as f32 - rect.left() as f32,
            ev.client_y() as f32 - rect.top() as f32,
        ),
        Vec2::new(rect.width() as f32, rect.height() as f32),
        Vec2::new(canvas.width() as f32, canvas.height() as f32),
    )
}

/// Only images are accepted as panoramas; the content itself is not checked.
#[inline]
pub fn is_image_mime(mime: &str) -> bool {
    mime.starts_with("image/")
}
