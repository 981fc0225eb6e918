pub mod runner;

pub use runner::{JsPlanetSource, StarMapRunner};

use std::cell::RefCell;
use wasm_bindgen::prelude::*;
use starmap_engine::{InputEvent, ViewConfig};

thread_local! {
    static RUNNER: RefCell<Option<StarMapRunner>> = RefCell::new(None);
}

/// Run `f` against the runner. None (and a warning) before `starmap_init`.
fn with_runner<R>(f: impl FnOnce(&mut StarMapRunner) -> R) -> Option<R> {
    RUNNER.with(|cell| {
        let mut borrow = cell.borrow_mut();
        match borrow.as_mut() {
            Some(runner) => Some(f(runner)),
            None => {
                log::warn!("star map not initialized; call starmap_init() first");
                None
            }
        }
    })
}

/// Create the view. `config_json` may be empty or a partial `ViewConfig`.
#[wasm_bindgen]
pub fn starmap_init(config_json: &str) {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"starmap: logger already installed".into());
    }

    let config = if config_json.trim().is_empty() {
        ViewConfig::default()
    } else {
        ViewConfig::from_json(config_json).unwrap_or_else(|err| {
            log::warn!("invalid view config, using defaults: {}", err);
            ViewConfig::default()
        })
    };
    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(StarMapRunner::new(config));
    });
    log::info!("starmap: initialized");
}

/// Register the JS planet fetcher: `(starJson: string) => Promise<string | null>`.
#[wasm_bindgen]
pub fn starmap_set_planet_source(fetch_fn: js_sys::Function) {
    with_runner(|r| r.set_source(JsPlanetSource::new(fetch_fn)));
}

/// Mount with a JSON star array. Returns the number of stars placed.
#[wasm_bindgen]
pub fn starmap_mount(stars_json: &str, fullscreen: bool) -> u32 {
    with_runner(|r| match r.mount(stars_json, fullscreen) {
        Ok(placed) => placed as u32,
        Err(err) => {
            log::warn!("could not parse star list: {}", err);
            0
        }
    })
    .unwrap_or(0)
}

/// Tear down the view. Returns the number of objects disposed.
#[wasm_bindgen]
pub fn starmap_unmount() -> u32 {
    with_runner(|r| r.unmount().objects as u32).unwrap_or(0)
}

#[wasm_bindgen]
pub fn starmap_tick(dt: f32) {
    with_runner(|r| r.tick(dt));
}

#[wasm_bindgen]
pub fn starmap_select(star_index: u32) -> bool {
    with_runner(|r| r.select(star_index as usize).is_ok()).unwrap_or(false)
}

#[wasm_bindgen]
pub fn starmap_return_to_overview() {
    with_runner(|r| r.return_to_overview());
}

// ---- Input ----

#[wasm_bindgen]
pub fn starmap_pointer_down(x: f32, y: f32, time_ms: f64) {
    with_runner(|r| r.push_input(InputEvent::PointerDown { x, y, time_ms }));
}

#[wasm_bindgen]
pub fn starmap_pointer_up(x: f32, y: f32, time_ms: f64) {
    with_runner(|r| r.push_input(InputEvent::PointerUp { x, y, time_ms }));
}

#[wasm_bindgen]
pub fn starmap_pointer_move(x: f32, y: f32) {
    with_runner(|r| r.push_input(InputEvent::PointerMove { x, y }));
}

#[wasm_bindgen]
pub fn starmap_wheel(delta_y: f32) {
    with_runner(|r| r.push_input(InputEvent::Wheel { delta_y }));
}

#[wasm_bindgen]
pub fn starmap_key_down(key_code: u32) {
    with_runner(|r| r.push_input(InputEvent::KeyDown { key_code }));
}

#[wasm_bindgen]
pub fn starmap_resize(width: f32, height: f32) {
    with_runner(|r| r.push_input(InputEvent::Resize { width, height }));
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn get_header_ptr() -> *const f32 {
    with_runner(|r| r.header_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_instances_ptr() -> *const f32 {
    with_runner(|r| r.instances_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_instance_count() -> u32 {
    with_runner(|r| r.instance_count()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_labels_ptr() -> *const f32 {
    with_runner(|r| r.labels_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_label_count() -> u32 {
    with_runner(|r| r.label_count()).unwrap_or(0)
}

/// Text for a label slot as found in the label buffer.
#[wasm_bindgen]
pub fn get_label_text(slot: u32) -> Option<String> {
    with_runner(|r| r.label_text(slot)).flatten()
}

#[wasm_bindgen]
pub fn get_host_events_ptr() -> *const f32 {
    with_runner(|r| r.host_events_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_host_event_count() -> u32 {
    with_runner(|r| r.host_event_count()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_starfield_ptr() -> *const f32 {
    with_runner(|r| r.starfield_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_starfield_point_count() -> u32 {
    with_runner(|r| r.starfield_point_count()).unwrap_or(0)
}

// ---- Capacity accessors ----

#[wasm_bindgen]
pub fn get_max_instances() -> u32 {
    with_runner(|r| r.max_instances()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_max_labels() -> u32 {
    with_runner(|r| r.max_labels()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_max_events() -> u32 {
    with_runner(|r| r.max_events()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_buffer_total_floats() -> u32 {
    with_runner(|r| r.buffer_total_floats()).unwrap_or(0)
}
