#![cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

mod calendar;
mod dom;
mod panel;
mod render;
mod transition;

pub use calendar::RaceCalendarWidget;
pub use panel::TrackPanel;
pub use transition::PageTransitions;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("trackside-web starting");
    Ok(())
}
