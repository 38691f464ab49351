use crate::constants::*;
use crate::dom;
use crate::texture::WebTextureLoader;
use std::cell::RefCell;
use std::rc::Rc;
use tour_core::{AuthoringState, Notice, SceneId, TourApp};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub type SharedApp = Rc<RefCell<TourApp<WebTextureLoader>>>;

const SCENE_ATTR: &str = "data-scene";

/// Everything the side panels depend on; they are rebuilt only when it
/// changes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PanelKey {
    revision: u64,
    active: Option<SceneId>,
    authoring: AuthoringState,
    transitioning: bool,
}

impl PanelKey {
    pub fn of(app: &TourApp<WebTextureLoader>) -> Self {
        Self {
            revision: app.model().revision(),
            active: app.active_scene_id(),
            authoring: app.authoring_state(),
            transitioning: app.is_transitioning(),
        }
    }
}

pub fn refresh_panels(
    document: &web::Document,
    canvas: &web::HtmlCanvasElement,
    app: &TourApp<WebTextureLoader>,
) {
    render_scene_list(document, app);
    render_link_picker(document, app);
    render_place_button(document, canvas, app);
    if let Some(empty) = document.get_element_by_id(EMPTY_STATE_ID) {
        dom::set_hidden(&empty, app.active_scene_id().is_some());
    }
}

/// Sidebar: every scene in upload order, the active one highlighted.
fn render_scene_list(document: &web::Document, app: &TourApp<WebTextureLoader>) {
    let Some(list) = document.get_element_by_id(SCENE_LIST_ID) else {
        return;
    };
    dom::clear_children(&list);
    let active = app.active_scene_id();
    for scene in app.scenes() {
        let Some(item) = dom::element_with_text(document, "li", "scene-item", &scene.name) else {
            continue;
        };
        _ = item.set_attribute(SCENE_ATTR, &scene.id.raw().to_string());
        dom::set_class(&item, ACTIVE_CLASS, Some(scene.id) == active);
        let linked = scene.hotspots.iter().filter(|h| h.is_linked()).count();
        if !scene.hotspots.is_empty() {
            let badge = format!("{}/{}", linked, scene.hotspots.len());
            if let Some(b) = dom::element_with_text(document, "span", "hotspot-count", &badge) {
                _ = item.append_child(&b);
            }
        }
        _ = list.append_child(&item);
    }
}

/// Link-target dialog, shown while a hotspot waits for its target.
fn render_link_picker(document: &web::Document, app: &TourApp<WebTextureLoader>) {
    let Some(picker) = document.get_element_by_id(LINK_PICKER_ID) else {
        return;
    };
    let pending = matches!(app.authoring_state(), AuthoringState::AwaitingLinkTarget(_));
    dom::set_hidden(&picker, !pending);
    let Some(options) = document.get_element_by_id(LINK_OPTIONS_ID) else {
        return;
    };
    dom::clear_children(&options);
    if !pending {
        return;
    }
    let candidates = app.link_candidates();
    if candidates.is_empty() {
        if let Some(note) = dom::element_with_text(
            document,
            "p",
            "link-empty",
            "Upload another image to link this hotspot to it",
        ) {
            _ = options.append_child(&note);
        }
        return;
    }
    for scene in candidates {
        if let Some(btn) = dom::element_with_text(document, "button", "link-option", &scene.name) {
            _ = btn.set_attribute(SCENE_ATTR, &scene.id.raw().to_string());
            _ = options.append_child(&btn);
        }
    }
}

fn render_place_button(
    document: &web::Document,
    canvas: &web::HtmlCanvasElement,
    app: &TourApp<WebTextureLoader>,
) {
    let placing = app.authoring_state() == AuthoringState::Placing;
    dom::set_class(canvas, PLACING_CURSOR_CLASS, placing);
    let Some(button) = document.get_element_by_id(PLACE_BUTTON_ID) else {
        return;
    };
    dom::set_class(&button, ACTIVE_CLASS, placing);
    let label = if placing { "Cancel hotspot" } else { "Add hotspot" };
    _ = button.set_attribute("aria-label", label);
    _ = button.set_attribute("title", label);
    if let Ok(b) = button.dyn_into::<web::HtmlButtonElement>() {
        b.set_disabled(app.active_scene_id().is_none() || app.is_transitioning());
    }
}

/// Scene id carried by the clicked element or its nearest tagged ancestor.
pub fn scene_from_event(ev: &web::Event, app: &TourApp<WebTextureLoader>) -> Option<SceneId> {
    let target = ev.target()?.dyn_into::<web::Element>().ok()?;
    let tagged = target.closest(&format!("[{}]", SCENE_ATTR)).ok()??;
    let raw: u64 = tagged.get_attribute(SCENE_ATTR)?.parse().ok()?;
    app.scenes().iter().map(|s| s.id).find(|id| id.raw() == raw)
}

pub fn show_toast(document: &web::Document, notice: &Notice) {
    let Some(stack) = document.get_element_by_id(TOAST_STACK_ID) else {
        log::info!("[toast] {}: {}", notice.title, notice.description);
        return;
    };
    let Some(toast) = dom::element_with_text(document, "div", "toast", "") else {
        return;
    };
    if let Some(t) = dom::element_with_text(document, "strong", "toast-title", &notice.title) {
        _ = toast.append_child(&t);
    }
    if let Some(d) = dom::element_with_text(document, "p", "toast-description", &notice.description)
    {
        _ = toast.append_child(&d);
    }
    _ = stack.append_child(&toast);

    let expire = Closure::once_into_js(move || toast.remove());
    if let Some(w) = web::window() {
        _ = w.set_timeout_with_callback_and_timeout_and_arguments_0(
            expire.unchecked_ref(),
            TOAST_MS,
        );
    }
}
