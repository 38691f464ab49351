use fnv::FnvHashMap;
use std::cell::RefCell;
use std::rc::Rc;
use tour_core::{ImageSource, TextureHandle, TextureLoader, TextureStatus};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

enum Slot {
    Loading,
    Decoded(web::HtmlImageElement),
    Uploaded,
    Failed(String),
}

/// Decodes panorama images off the frame loop.
///
/// Each load runs as its own future and reports into a shared slot map that
/// the frame polls. A released handle loses its slot, so a decode finishing
/// afterwards has nowhere to land and is dropped.
#[derive(Default)]
pub struct WebTextureLoader {
    next: u64,
    slots: Rc<RefCell<FnvHashMap<TextureHandle, Slot>>>,
}

async fn decode_image(url: &str) -> anyhow::Result<web::HtmlImageElement> {
    let img = web::HtmlImageElement::new().map_err(|e| anyhow::anyhow!("{:?}", e))?;
    img.set_cross_origin(Some("anonymous"));
    img.set_src(url);
    JsFuture::from(img.decode())
        .await
        .map_err(|e| anyhow::anyhow!("decode {} failed: {:?}", url, e))?;
    Ok(img)
}

impl WebTextureLoader {
    /// Hand decoded images to the renderer, once each.
    pub fn take_decoded(&self) -> Vec<(TextureHandle, web::HtmlImageElement)> {
        let mut slots = self.slots.borrow_mut();
        let mut out = Vec::new();
        for (handle, slot) in slots.iter_mut() {
            if !matches!(slot, Slot::Decoded(_)) {
                continue;
            }
            if let Slot::Decoded(img) = std::mem::replace(slot, Slot::Uploaded) {
                out.push((*handle, img));
            }
        }
        out
    }
}

impl TextureLoader for WebTextureLoader {
    fn begin_load(&mut self, source: &ImageSource) -> TextureHandle {
        let handle = TextureHandle::from_raw(self.next);
        self.next += 1;
        self.slots.borrow_mut().insert(handle, Slot::Loading);

        let slots = self.slots.clone();
        let url = source.as_str().to_string();
        spawn_local(async move {
            let result = decode_image(&url).await;
            let mut slots = slots.borrow_mut();
            let Some(slot) = slots.get_mut(&handle) else {
                log::debug!("[texture] {:?} released before decode finished", handle);
                return;
            };
            *slot = match result {
                Ok(img) => Slot::Decoded(img),
                Err(e) => Slot::Failed(e.to_string()),
            };
        });
        handle
    }

    fn status(&self, handle: TextureHandle) -> TextureStatus {
        match self.slots.borrow().get(&handle) {
            Some(Slot::Loading) => TextureStatus::Loading,
            Some(Slot::Decoded(_)) | Some(Slot::Uploaded) => TextureStatus::Ready,
            Some(Slot::Failed(reason)) => TextureStatus::Failed(reason.clone()),
            None => TextureStatus::Released,
        }
    }

    fn release(&mut self, handle: TextureHandle) {
        self.slots.borrow_mut().remove(&handle);
    }
}
