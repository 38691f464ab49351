use crate::constants::HIDDEN_CLASS;
use crate::input;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn add_click_listener(
    document: &web::Document,
    element_id: &str,
    mut handler: impl FnMut() + 'static,
) {
    if let Some(el) = document.get_element_by_id(element_id) {
        let closure = Closure::wrap(Box::new(move || handler()) as Box<dyn FnMut()>);
        _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    } else {
        log::warn!("[dom] #{} not found; control disabled", element_id);
    }
}

/// Resize the canvas backing store to its CSS box times devicePixelRatio.
/// Returns the new size in backing pixels.
pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) -> (u32, u32) {
    let dpr = web::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
    let rect = canvas.get_bounding_client_rect();
    let (w, h) = input::backing_size(rect.width(), rect.height(), dpr);
    if canvas.width() != w || canvas.height() != h {
        canvas.set_width(w);
        canvas.set_height(h);
    }
    (w, h)
}

#[inline]
pub fn set_hidden(el: &web::Element, hidden: bool) {
    let cl = el.class_list();
    _ = if hidden {
        cl.add_1(HIDDEN_CLASS)
    } else {
        cl.remove_1(HIDDEN_CLASS)
    };
}

#[inline]
pub fn set_class(el: &web::Element, class: &str, on: bool) {
    _ = el.class_list().toggle_with_force(class, on);
}

#[inline]
pub fn clear_children(el: &web::Element) {
    el.set_inner_html("");
}

/// `<tag class=...>text</tag>`, or `None` if the document refuses to create it.
pub fn element_with_text(
    document: &web::Document,
    tag: &str,
    class: &str,
    text: &str,
) -> Option<web::Element> {
    let el = document.create_element(tag).ok()?;
    if !class.is_empty() {
        el.set_class_name(class);
    }
    el.set_text_content(Some(text));
    Some(el)
}
