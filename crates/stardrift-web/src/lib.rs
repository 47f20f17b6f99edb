pub mod canvas;
pub mod host;

pub use canvas::CanvasSurface;
pub use host::{BackdropSlot, WebHost};

use std::cell::RefCell;
use std::rc::Rc;

use stardrift::{Backdrop, BackdropConfig, Rng, StardriftError};
use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

/// A mounted backdrop, returned to JS by [`mount_backdrop`].
///
/// Every browser callback holds only a weak reference, so freeing the handle
/// (or calling [`BackdropHandle::unmount`]) tears the backdrop down.
#[wasm_bindgen]
pub struct BackdropHandle {
    slot: BackdropSlot,
}

#[wasm_bindgen]
impl BackdropHandle {
    /// Cancel the pending frame and remove every listener. Safe to call more
    /// than once.
    pub fn unmount(&self) {
        let taken = match self.slot.try_borrow_mut() {
            Ok(mut slot) => slot.take(),
            Err(_) => {
                log::warn!("unmount called from inside a backdrop callback; ignored");
                return;
            }
        };
        // Dropped outside the borrow so teardown never re-enters the slot.
        drop(taken);
    }

    #[wasm_bindgen(js_name = isMounted)]
    pub fn is_mounted(&self) -> bool {
        self.slot
            .try_borrow()
            .map(|slot| slot.as_ref().is_some_and(|b| b.is_mounted()))
            .unwrap_or(true)
    }

    /// Completed draws since mount.
    pub fn draws(&self) -> f64 {
        self.slot
            .try_borrow()
            .ok()
            .and_then(|slot| slot.as_ref().map(|b| b.stats().draws as f64))
            .unwrap_or(0.0)
    }
}

/// Mount a backdrop on `canvas`, which should be the sole child of the
/// container it fills. `config_json` is an optional `BackdropConfig` object.
#[wasm_bindgen(js_name = mountBackdrop)]
pub fn mount_backdrop(
    canvas: HtmlCanvasElement,
    config_json: Option<String>,
) -> Result<BackdropHandle, JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let config = match config_json.as_deref() {
        Some(json) => BackdropConfig::from_json(json).map_err(to_js)?,
        None => BackdropConfig::default(),
    };
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;

    let slot: BackdropSlot = Rc::new(RefCell::new(None));
    let host = WebHost::new(
        window,
        canvas,
        config.theme_variable.clone(),
        Rc::downgrade(&slot),
    )?;
    let seed = config.seed.unwrap_or_else(random_seed);
    let mut backdrop =
        Backdrop::with_rng(host, config, Box::new(Rng::new(seed))).map_err(to_js)?;

    // Callbacks only fire from the browser's event loop, never during mount.
    backdrop.mount();
    for event in backdrop.host().initial_events() {
        backdrop.handle_event(event);
    }
    *slot.borrow_mut() = Some(backdrop);

    Ok(BackdropHandle { slot })
}

fn random_seed() -> u64 {
    (js_sys::Math::random() * u64::MAX as f64) as u64
}

fn to_js(err: StardriftError) -> JsValue {
    JsValue::from_str(&err.to_string())
}
