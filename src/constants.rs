// DOM contract with index.html. Elements other than the canvas are optional;
// missing ones only disable the matching control.
pub const CANVAS_ID: &str = "tour-canvas";
pub const UPLOAD_INPUT_ID: &str = "upload-input";
pub const PLACE_BUTTON_ID: &str = "place-hotspot";
pub const SCENE_LIST_ID: &str = "scene-list";
pub const EMPTY_STATE_ID: &str = "empty-state";
pub const LINK_PICKER_ID: &str = "link-picker";
pub const LINK_OPTIONS_ID: &str = "link-options";
pub const LINK_CANCEL_ID: &str = "link-cancel";
pub const TOAST_STACK_ID: &str = "toasts";

// CSS classes toggled from Rust
pub const HIDDEN_CLASS: &str = "hidden";
pub const ACTIVE_CLASS: &str = "active";
pub const PLACING_CURSOR_CLASS: &str = "placing";

// Toasts disappear after this long
pub const TOAST_MS: i32 = 3000;

// Fallback label when a file has no usable name
pub const UNNAMED_SCENE_PREFIX: &str = "Scene";
