#![cfg(target_arch = "wasm32")]
use std::cell::RefCell;
use std::rc::Rc;
use tour_core::{TourApp, ViewerConfig};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod constants;
mod dom;
mod events;
mod frame;
mod input;
mod render;
mod texture;
mod ui;

use constants::CANVAS_ID;
use texture::WebTextureLoader;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("tour-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let canvas: web::HtmlCanvasElement = document
        .get_element_by_id(CANVAS_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", CANVAS_ID))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

    // Maintain canvas internal pixel size to match CSS size * devicePixelRatio
    frame::wire_canvas_resize(&canvas);

    let app = Rc::new(RefCell::new(TourApp::new(
        WebTextureLoader::default(),
        ViewerConfig::default(),
    )));
    app.borrow_mut()
        .resize(canvas.width() as f32, canvas.height() as f32);

    let wiring = events::InputWiring {
        document: document.clone(),
        canvas: canvas.clone(),
        app,
        object_urls: Rc::new(RefCell::new(Vec::new())),
        frame_loop: Rc::new(RefCell::new(None)),
    };
    events::wire_input_handlers(wiring.clone());
    events::wire_controls(&document, wiring.clone());

    frame::mount(wiring).await;
    Ok(())
}
