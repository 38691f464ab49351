// Host-side tests for the DOM contract and shared tuning constants.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}

use constants::*;
use tour_core::*;

#[test]
fn dom_ids_are_distinct() {
    let ids = [
        CANVAS_ID,
        UPLOAD_INPUT_ID,
        PLACE_BUTTON_ID,
        SCENE_LIST_ID,
        EMPTY_STATE_ID,
        LINK_PICKER_ID,
        LINK_OPTIONS_ID,
        LINK_CANCEL_ID,
        TOAST_STACK_ID,
    ];
    for (i, a) in ids.iter().enumerate() {
        assert!(!a.is_empty());
        for b in &ids[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn toasts_linger_for_three_seconds() {
    assert_eq!(TOAST_MS, 3000);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn markers_fit_inside_the_panorama() {
    assert!(MARKER_RADIUS > 0.0);
    assert!(MARKER_RADIUS < PANORAMA_RADIUS);
    // the far plane must keep the whole sphere visible
    assert!(CAMERA_ZFAR > PANORAMA_RADIUS);
    assert!(CAMERA_ZNEAR > 0.0 && CAMERA_ZNEAR < MARKER_RADIUS);
    assert!(MARKER_OPACITY > 0.0 && MARKER_OPACITY <= 1.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn interaction_tuning_is_sane() {
    assert!(LOOK_SENSITIVITY > 0.0);
    assert!(CLICK_DRAG_TOLERANCE_PX >= 0.0);
    assert!(TRANSITION_STEP > 0.0 && TRANSITION_STEP <= 1.0);
    assert!(CAMERA_FOV_Y_DEG > 0.0 && CAMERA_FOV_Y_DEG < 180.0);
    assert_ne!(LINKED_MARKER_COLOR, UNLINKED_MARKER_COLOR);
}
