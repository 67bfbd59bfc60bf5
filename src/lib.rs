pub mod blocks;
pub mod config;
pub mod logging;
pub mod models;
pub mod outline;
pub mod state;
pub mod storage;
pub mod util;

mod app;
mod components;
mod editor;
mod pages;

use crate::app::App;
use crate::config::AppConfig;
use leptos::prelude::*;

// Needed for `#[wasm_bindgen(start)]` on the wasm entrypoint.
#[cfg(all(target_arch = "wasm32", not(test)))]
use wasm_bindgen::prelude::wasm_bindgen;

// Only register the WASM start function for normal builds (not for tests),
// otherwise wasm-bindgen-test will end up with multiple entry symbols.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() {
    console_error_panic_hook::set_once();

    let config = AppConfig::new();
    logging::init(config.log_level);
    log::info!("storing notes under {:?}", config.storage_prefix);

    mount_to_body(move || view! { <App config=config /> });
}
