use futures::future::{FutureExt, LocalBoxFuture};
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use starmap_engine::{
    planets_from_json, run_fetch, stars_from_json, DisposalReport, FetchCompletion, FetchError,
    FetchTicket, InputEvent, MountOptions, Planet, PlanetSource, SelectError, Star, StarMap,
    ViewConfig,
};

/// Planet source backed by a host JavaScript function.
///
/// The function receives the star record as a JSON string and returns a
/// Promise (or a plain value) resolving to a JSON array of planets.
/// `null` / `undefined` means the star has no entry.
pub struct JsPlanetSource {
    fetch_fn: js_sys::Function,
}

impl JsPlanetSource {
    pub fn new(fetch_fn: js_sys::Function) -> Self {
        Self { fetch_fn }
    }
}

fn network_error(err: JsValue) -> FetchError {
    FetchError::Network(err.as_string().unwrap_or_else(|| format!("{:?}", err)))
}

impl PlanetSource for JsPlanetSource {
    fn fetch_planets(&self, star: &Star) -> LocalBoxFuture<'static, Result<Vec<Planet>, FetchError>> {
        let fetch_fn = self.fetch_fn.clone();
        let name = star.display_name().to_string();
        let payload = serde_json::to_string(star);
        async move {
            let payload = payload.map_err(|e| FetchError::Decode(e.to_string()))?;
            let value = fetch_fn
                .call1(&JsValue::NULL, &JsValue::from_str(&payload))
                .map_err(network_error)?;
            let resolved = JsFuture::from(js_sys::Promise::resolve(&value))
                .await
                .map_err(network_error)?;
            if resolved.is_null() || resolved.is_undefined() {
                return Err(FetchError::NotFound(name));
            }
            let text = resolved
                .as_string()
                .ok_or_else(|| FetchError::Decode("planet source must resolve to a JSON string".into()))?;
            planets_from_json(&text).map_err(|e| FetchError::Decode(e.to_string()))
        }
        .boxed_local()
    }
}

/// Owns the view and dispatches its planet requests onto the browser's
/// microtask queue.
///
/// `lib.rs` keeps one runner in a `thread_local!` and exports free
/// functions via `#[wasm_bindgen]`, because wasm-bindgen cannot export
/// the engine's types directly.
pub struct StarMapRunner {
    view: StarMap,
    source: Option<JsPlanetSource>,
}

impl StarMapRunner {
    pub fn new(config: ViewConfig) -> Self {
        Self {
            view: StarMap::new(config),
            source: None,
        }
    }

    pub fn set_source(&mut self, source: JsPlanetSource) {
        self.source = Some(source);
    }

    /// Mount with a JSON star list. Returns the number of stars placed.
    pub fn mount(&mut self, stars_json: &str, fullscreen: bool) -> Result<usize, serde_json::Error> {
        let stars = stars_from_json(stars_json)?;
        Ok(self.view.mount(MountOptions { stars, fullscreen }))
    }

    pub fn unmount(&mut self) -> DisposalReport {
        self.view.unmount()
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.view.push_input(event);
    }

    /// Run one frame, then start any planet requests it issued.
    pub fn tick(&mut self, dt: f32) {
        self.view.tick(dt);
        self.dispatch_fetches();
    }

    pub fn select(&mut self, star_index: usize) -> Result<(), SelectError> {
        let selected = self.view.select(star_index);
        self.dispatch_fetches();
        selected
    }

    pub fn return_to_overview(&mut self) {
        self.view.return_to_overview();
    }

    fn dispatch_fetches(&mut self) {
        let tickets = self.view.take_fetch_requests();
        if tickets.is_empty() {
            return;
        }
        let inbox = self.view.inbox();
        match &self.source {
            Some(source) => {
                for ticket in tickets {
                    wasm_bindgen_futures::spawn_local(run_fetch(source, ticket, inbox.clone()));
                }
            }
            None => {
                for FetchTicket { generation, star_index, .. } in tickets {
                    log::warn!("no planet source registered; star #{} shown alone", star_index);
                    inbox.post(FetchCompletion {
                        generation,
                        star_index,
                        result: Err(FetchError::Network("no planet source registered".into())),
                    });
                }
            }
        }
    }

    pub fn view(&self) -> &StarMap {
        &self.view
    }

    // ---- Pointer accessors for shared-memory reads ----

    pub fn header_ptr(&self) -> *const f32 {
        self.view.header_ptr()
    }

    pub fn instances_ptr(&self) -> *const f32 {
        self.view.instances_ptr()
    }

    pub fn instance_count(&self) -> u32 {
        self.view.instances().instance_count()
    }

    pub fn labels_ptr(&self) -> *const f32 {
        self.view.labels_ptr()
    }

    pub fn label_count(&self) -> u32 {
        self.view.labels().len() as u32
    }

    pub fn label_text(&self, slot: u32) -> Option<String> {
        self.view.label_text(slot).map(str::to_string)
    }

    pub fn host_events_ptr(&self) -> *const f32 {
        self.view.host_events_ptr()
    }

    pub fn host_event_count(&self) -> u32 {
        self.view.host_events().len() as u32
    }

    pub fn starfield_ptr(&self) -> *const f32 {
        self.view.starfield_ptr()
    }

    pub fn starfield_point_count(&self) -> u32 {
        (self.view.starfield_points().len() / 3) as u32
    }

    // ---- Capacity accessors (read by TypeScript via wasm_bindgen exports) ----

    pub fn max_instances(&self) -> u32 {
        self.view.layout().max_instances as u32
    }

    pub fn max_labels(&self) -> u32 {
        self.view.layout().max_labels as u32
    }

    pub fn max_events(&self) -> u32 {
        self.view.layout().max_events as u32
    }

    pub fn buffer_total_floats(&self) -> u32 {
        self.view.layout().buffer_total_floats as u32
    }
}
