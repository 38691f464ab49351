use crate::constants::*;
use crate::frame::{self, FrameLoop};
use crate::input::{self, KeyCommand};
use crate::texture::WebTextureLoader;
use crate::ui::{self, SharedApp};
use std::cell::RefCell;
use std::rc::Rc;
use tour_core::ImageSource;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::convert::FromWasmAbi;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

#[derive(Clone)]
pub struct InputWiring {
    pub document: web::Document,
    pub canvas: web::HtmlCanvasElement,
    pub app: SharedApp,
    // blob: URLs handed out for uploads, revoked when the page is discarded
    pub object_urls: Rc<RefCell<Vec<String>>>,
    // None while the page is hidden
    pub frame_loop: Rc<RefCell<Option<FrameLoop>>>,
}

pub fn wire_input_handlers(w: InputWiring) {
    wire_pointerdown(&w);
    wire_pointermove(&w);
    wire_pointerup(&w);
    wire_pointerleave(&w);
    wire_keydown(&w);
}

fn listen<E: FromWasmAbi + 'static>(
    target: &web::EventTarget,
    event: &str,
    handler: impl FnMut(E) + 'static,
) {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(E)>);
    _ = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
    closure.forget();
}

fn wire_pointerdown(w: &InputWiring) {
    let w2 = w.clone();
    listen(&w.canvas, "pointerdown", move |ev: web::PointerEvent| {
        if ev.button() != 0 {
            return;
        }
        let pos = input::pointer_canvas_px(&ev, &w2.canvas);
        w2.app.borrow_mut().pointer_down(pos);
        _ = w2.canvas.set_pointer_capture(ev.pointer_id());
        ev.prevent_default();
    });
}

fn wire_pointermove(w: &InputWiring) {
    let w2 = w.clone();
    if let Some(wnd) = web::window() {
        listen(&wnd, "pointermove", move |ev: web::PointerEvent| {
            let pos = input::pointer_canvas_px(&ev, &w2.canvas);
            w2.app.borrow_mut().pointer_move(pos);
        });
    }
}

fn wire_pointerup(w: &InputWiring) {
    let w2 = w.clone();
    if let Some(wnd) = web::window() {
        listen(&wnd, "pointerup", move |ev: web::PointerEvent| {
            let pos = input::pointer_canvas_px(&ev, &w2.canvas);
            let action = w2.app.borrow_mut().pointer_up(pos);
            if let Some(action) = action {
                log::debug!("[mouse] click at ({:.0},{:.0}) -> {:?}", pos.x, pos.y, action);
            }
            _ = w2.canvas.release_pointer_capture(ev.pointer_id());
        });
    }
}

fn wire_pointerleave(w: &InputWiring) {
    for event in ["pointerleave", "pointercancel"] {
        let w2 = w.clone();
        listen(&w.canvas, event, move |_ev: web::PointerEvent| {
            w2.app.borrow_mut().pointer_leave();
        });
    }
}

fn wire_keydown(w: &InputWiring) {
    let w2 = w.clone();
    if let Some(wnd) = web::window() {
        listen(&wnd, "keydown", move |ev: web::KeyboardEvent| {
            if ev.repeat() || ev.ctrl_key() || ev.meta_key() || ev.alt_key() {
                return;
            }
            match input::key_command(&ev.key()) {
                Some(KeyCommand::Cancel) => {
                    let mut app = w2.app.borrow_mut();
                    // Escape closes a pending link picker as a dismissal
                    if let Err(e) = app.select_link_target(None) {
                        log::warn!("[keys] dismiss failed: {}", e);
                    }
                    app.cancel_authoring();
                }
                Some(KeyCommand::TogglePlacement) => w2.app.borrow_mut().toggle_placement(),
                None => return,
            }
            ev.prevent_default();
        });
    }
}

// ---------------- Chrome: buttons, lists, uploads ----------------

pub fn wire_controls(document: &web::Document, w: InputWiring) {
    let app = w.app.clone();
    crate::dom::add_click_listener(document, PLACE_BUTTON_ID, move || {
        app.borrow_mut().toggle_placement();
    });

    let app = w.app.clone();
    crate::dom::add_click_listener(document, LINK_CANCEL_ID, move || {
        if let Err(e) = app.borrow_mut().select_link_target(None) {
            log::warn!("[link] dismiss failed: {}", e);
        }
    });

    if let Some(list) = document.get_element_by_id(SCENE_LIST_ID) {
        let app = w.app.clone();
        listen(&list, "click", move |ev: web::Event| {
            let mut app = app.borrow_mut();
            if let Some(id) = ui::scene_from_event(&ev, &app) {
                if !app.select_scene(id) {
                    log::debug!("[sidebar] {} not selectable now", id);
                }
            }
        });
    }

    if let Some(options) = document.get_element_by_id(LINK_OPTIONS_ID) {
        let app = w.app.clone();
        listen(&options, "click", move |ev: web::Event| {
            let mut app = app.borrow_mut();
            let Some(id) = ui::scene_from_event(&ev, &app) else {
                return;
            };
            match app.select_link_target(Some(id)) {
                Ok(outcome) => log::info!("[link] -> {} ({:?})", id, outcome),
                Err(e) => log::warn!("[link] {}", e),
            }
        });
    }

    wire_upload_input(document, &w);
    wire_drop_target(document, &w);
    wire_pagehide(&w);
    wire_pageshow(&w);
}

/// Add every image file in `files` as a scene.
fn upload_files(w: &InputWiring, files: &web::FileList) {
    let mut app = w.app.borrow_mut();
    for i in 0..files.length() {
        let Some(file) = files.get(i) else {
            continue;
        };
        if !input::is_image_mime(&file.type_()) {
            log::warn!("[upload] skipped {} ({})", file.name(), file.type_());
            continue;
        }
        let url = match web::Url::create_object_url_with_blob(&file) {
            Ok(u) => u,
            Err(e) => {
                log::error!("[upload] object URL for {} failed: {:?}", file.name(), e);
                continue;
            }
        };
        let name = input::display_name(&file.name(), UNNAMED_SCENE_PREFIX, app.scenes().len());
        w.object_urls.borrow_mut().push(url.clone());
        app.upload(ImageSource::new(url), &name);
    }
}

fn wire_upload_input(document: &web::Document, w: &InputWiring) {
    let Some(el) = document.get_element_by_id(UPLOAD_INPUT_ID) else {
        log::warn!("[dom] #{} not found; uploads disabled", UPLOAD_INPUT_ID);
        return;
    };
    let Ok(upload) = el.dyn_into::<web::HtmlInputElement>() else {
        log::warn!("[dom] #{} is not an <input>", UPLOAD_INPUT_ID);
        return;
    };
    let w2 = w.clone();
    let input_el = upload.clone();
    listen(&upload, "change", move |_ev: web::Event| {
        if let Some(files) = input_el.files() {
            upload_files(&w2, &files);
        }
        // allow picking the same file again
        input_el.set_value("");
    });
}

fn wire_drop_target(document: &web::Document, w: &InputWiring) {
    let Some(body) = document.body() else {
        return;
    };
    listen(&body, "dragover", move |ev: web::DragEvent| {
        ev.prevent_default();
    });
    let w2 = w.clone();
    listen(&body, "drop", move |ev: web::DragEvent| {
        ev.prevent_default();
        if let Some(files) = ev.data_transfer().and_then(|dt| dt.files()) {
            upload_files(&w2, &files);
        }
    });
}

fn wire_pagehide(w: &InputWiring) {
    let w2 = w.clone();
    if let Some(wnd) = web::window() {
        listen(&wnd, "pagehide", move |ev: web::PageTransitionEvent| {
            // drops the GPU state along with the loop
            w2.frame_loop.borrow_mut().take();
            w2.app.borrow_mut().dispose();
            // a cached page may come back and reload its scenes from these
            if !ev.persisted() {
                for url in w2.object_urls.borrow_mut().drain(..) {
                    _ = web::Url::revoke_object_url(&url);
                }
            }
            log::info!("[tour] page hidden, viewer disposed");
        });
    }
}

fn wire_pageshow(w: &InputWiring) {
    let w2 = w.clone();
    if let Some(wnd) = web::window() {
        listen(&wnd, "pageshow", move |ev: web::PageTransitionEvent| {
            // the first load mounts from init
            if !ev.persisted() {
                return;
            }
            w2.app.borrow_mut().remount(WebTextureLoader::default());
            log::info!("[tour] page restored, remounting viewer");
            spawn_local(frame::mount(w2.clone()));
        });
    }
}
