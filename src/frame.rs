use crate::dom;
use crate::events::InputWiring;
use crate::render;
use crate::ui::{self, PanelKey, SharedApp};
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tour_core::TransitionTick;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext<'a> {
    pub app: SharedApp,
    pub document: web::Document,
    pub canvas: web::HtmlCanvasElement,
    pub gpu: Option<render::GpuState<'a>>,
    pub panels: Option<PanelKey>,
    pub last_instant: Instant,
    pub slow_frames: u32,
}

impl<'a> FrameContext<'a> {
    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt = now - self.last_instant;
        self.last_instant = now;
        // fade progress is per refresh, not per second
        if dt.as_millis() > 100 {
            self.slow_frames += 1;
            if self.slow_frames % 60 == 1 {
                log::debug!("[frame] slow frame {} ms", dt.as_millis());
            }
        }

        let (w, h) = (self.canvas.width(), self.canvas.height());
        let mut app = self.app.borrow_mut();
        app.resize(w as f32, h as f32);
        if let TransitionTick::Finished(done) = app.tick() {
            log::info!("[frame] now showing {}", done.target);
        }

        for notice in app.drain_notices() {
            ui::show_toast(&self.document, &notice);
        }
        let key = PanelKey::of(&app);
        if self.panels != Some(key) {
            ui::refresh_panels(&self.document, &self.canvas, &app);
            self.panels = Some(key);
        }

        if let Some(g) = &mut self.gpu {
            g.resize_if_needed(w, h);
            let viewer = app.viewer();
            if let Err(e) = g.render(viewer.graph(), viewer.camera(), viewer.loader()) {
                log::error!("render error: {:?}", e);
            }
        }
    }
}

pub async fn init_gpu(canvas: &web::HtmlCanvasElement) -> Option<render::GpuState<'static>> {
    match render::GpuState::new(canvas.clone()).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

/// Bring up the GPU and start drawing `w.app`, replacing any running loop.
///
/// Without WebGPU the tour still works; nothing is drawn.
pub async fn mount(w: InputWiring) {
    let gpu = init_gpu(&w.canvas).await;
    // hidden again while the adapter was being requested
    if w.app.borrow().viewer().is_disposed() {
        log::info!("[frame] viewer gone before GPU was ready");
        return;
    }
    let frame_ctx = FrameContext {
        app: w.app.clone(),
        document: w.document.clone(),
        canvas: w.canvas.clone(),
        gpu,
        panels: None,
        last_instant: Instant::now(),
        slow_frames: 0,
    };
    *w.frame_loop.borrow_mut() = Some(start_loop(frame_ctx));
}

type Tick = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// A running requestAnimationFrame loop.
///
/// The loop holds only weak references to its frame context, so dropping
/// this handle frees the GPU state and stops the loop.
pub struct FrameLoop {
    _frame_ctx: Rc<RefCell<FrameContext<'static>>>,
    _tick: Tick,
    pending: Rc<Cell<Option<i32>>>,
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        if let (Some(id), Some(w)) = (self.pending.take(), web::window()) {
            _ = w.cancel_animation_frame(id);
        }
        log::info!("[frame] loop stopped");
    }
}

pub fn start_loop(frame_ctx: FrameContext<'static>) -> FrameLoop {
    let frame_ctx = Rc::new(RefCell::new(frame_ctx));
    let tick: Tick = Rc::new(RefCell::new(None));
    let pending = Rc::new(Cell::new(None));

    let weak_ctx = Rc::downgrade(&frame_ctx);
    let weak_tick = Rc::downgrade(&tick);
    let pending_cb = pending.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        pending_cb.set(None);
        let (Some(ctx), Some(tick)) = (weak_ctx.upgrade(), weak_tick.upgrade()) else {
            return;
        };
        ctx.borrow_mut().frame();
        request_frame(&tick, &pending_cb);
    }) as Box<dyn FnMut()>));
    request_frame(&tick, &pending);

    FrameLoop {
        _frame_ctx: frame_ctx,
        _tick: tick,
        pending,
    }
}

fn request_frame(tick: &Tick, pending: &Cell<Option<i32>>) {
    let Some(w) = web::window() else {
        return;
    };
    if let Some(cb) = tick.borrow().as_ref() {
        match w.request_animation_frame(cb.as_ref().unchecked_ref()) {
            Ok(id) => pending.set(Some(id)),
            Err(e) => log::error!("[frame] requestAnimationFrame failed: {:?}", e),
        }
    }
}

/// Keep the canvas backing store in step with its layout size.
pub fn wire_canvas_resize(canvas: &web::HtmlCanvasElement) {
    dom::sync_canvas_backing_size(canvas);
    let canvas_resize = canvas.clone();
    let resize_closure = Closure::wrap(Box::new(move || {
        let (w, h) = dom::sync_canvas_backing_size(&canvas_resize);
        log::debug!("[frame] canvas {}x{}", w, h);
    }) as Box<dyn FnMut()>);
    if let Some(window) = web::window() {
        _ = window
            .add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref());
    }
    resize_closure.forget();
}
