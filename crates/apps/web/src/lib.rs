//! Browser entry point of the school map.
//!
//! The host page loads Leaflet (plus markercluster), calls `boot`, and the
//! rest is driven by DOM events and the route animation timer.

use std::cell::RefCell;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

use catalog::SchoolCatalog;
use foundation::SchoolId;
use runtime::TimerHandle;
use tour::{TickOutcome, TourNavigator};
use tracing::{debug, error};
use tracing_subscriber::layer::SubscriberExt;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

pub mod config;
pub mod dom;
pub mod leaflet;
pub mod load;
pub mod markup;
pub mod startup;
pub mod timer;

pub use config::ViewerConfig;

use dom::{Dom, Handlers};
use startup::PageSink;
use leaflet::LeafletMap;
use timer::BrowserTimer;

// Guard against double initialization of global state (hot reload, repeated boot).
static INITIALIZED: AtomicBool = AtomicBool::new(false);
static BOOTED: AtomicBool = AtomicBool::new(false);
static PANIC_HOOK_SET: OnceLock<()> = OnceLock::new();
static LOGGING_SET: OnceLock<()> = OnceLock::new();

/// Everything that exists once the schools are loaded.
struct App {
    config: ViewerConfig,
    catalog: SchoolCatalog,
    navigator: TourNavigator,
    map: LeafletMap,
    timers: BrowserTimer,
    dom: Dom,
}

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
}

/// Runs `f` against the loaded app. Before loading finishes, or while a
/// handler further up the stack holds the app, this is a no-op.
fn with_app<F, R>(f: F) -> R
where
    F: FnOnce(&mut App) -> R,
    R: Default,
{
    APP.try_with(|cell| match cell.try_borrow_mut() {
        Ok(mut slot) => slot.as_mut().map(f).unwrap_or_default(),
        Err(_) => {
            debug!("app busy; event dropped");
            R::default()
        }
    })
    .unwrap_or_default()
}

fn init_panic_hook() {
    PANIC_HOOK_SET.get_or_init(|| {
        console_error_panic_hook::set_once();
    });
}

/// Routes `tracing` events to the browser console. Only the first call installs
/// a subscriber; the level is fixed from then on.
fn init_logging(level: tracing::Level) {
    LOGGING_SET.get_or_init(|| {
        let layer = tracing_wasm::WASMLayer::new(
            tracing_wasm::WASMLayerConfigBuilder::new()
                .set_max_level(level)
                .set_report_logs_in_timings(false)
                .build(),
        );
        let subscriber = tracing_subscriber::registry().with(layer);
        if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
            web_sys::console::warn_1(&JsValue::from_str(&err.to_string()));
        }
    });
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    if INITIALIZED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }
    init_panic_hook();
    Ok(())
}

/// Builds the map and starts loading the schools.
///
/// `config_json` is an optional JSON object of `ViewerConfig` overrides.
/// Fails on invalid config, missing required elements, or a second call.
/// A failed load is reported on the status line, not here.
#[wasm_bindgen]
pub fn boot(config_json: Option<String>) -> Result<(), JsValue> {
    let config = match config_json.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => ViewerConfig::from_json_str(raw)
            .map_err(|e| JsValue::from_str(&format!("invalid config: {e}")))?,
        _ => ViewerConfig::default(),
    };
    if BOOTED.load(Ordering::SeqCst) {
        return Err(JsValue::from_str("school map already booted"));
    }
    init_logging(config.max_log_level());

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let mut dom = Dom::lookup(&document, &config.elements)?;
    dom.set_status(&config.messages.loading);
    let map = LeafletMap::new(&config, handle_select)?;
    BOOTED.store(true, Ordering::SeqCst);

    spawn_local(async move {
        let loaded = load::fetch_catalog(&config.data_url).await;
        match loaded {
            Ok(catalog) => install(config, window, dom, map, catalog),
            Err(err) => {
                error!(url = %config.data_url, %err, "loading schools failed");
                dom.set_status(&config.messages.load_failed);
            }
        }
    });
    Ok(())
}

fn install(
    config: ViewerConfig,
    window: web_sys::Window,
    mut dom: Dom,
    mut map: LeafletMap,
    catalog: SchoolCatalog,
) {
    let mut timers = BrowserTimer::new(window, handle_tick);
    let handlers = Handlers {
        on_search: handle_search,
        on_list_click: handle_select,
        on_next: handle_next,
        on_reset: handle_reset,
    };
    let installed = startup::install(&config, &catalog, &mut map, &mut timers, &mut dom, |dom| {
        dom.wire(handlers)
    });
    match installed {
        Ok(navigator) => {
            let app = App {
                config,
                catalog,
                navigator,
                map,
                timers,
                dom,
            };
            APP.with(|cell| *cell.borrow_mut() = Some(app));
        }
        Err(err) => error!(?err, "school map setup failed"),
    }
}

impl App {
    fn apply_filter(&mut self, raw: &str) -> usize {
        startup::apply_filter(&self.config, &self.catalog, raw, &mut self.dom)
    }

    fn select(&mut self, id: &SchoolId) -> bool {
        let Some(school) = self.catalog.get(id) else {
            debug!(school = %id, "select: unknown school");
            return false;
        };
        self.navigator.select(&mut self.map, &mut self.timers, school);
        true
    }
}

fn handle_search(raw: &str) {
    with_app(|app| app.apply_filter(raw));
}

fn handle_select(id: &SchoolId) {
    with_app(|app| app.select(id));
}

fn handle_next() {
    with_app(|app| {
        app.navigator.next(&mut app.map, &mut app.timers);
    });
}

fn handle_reset() {
    with_app(|app| {
        app.navigator.reset_route(&mut app.map, &mut app.timers);
    });
}

fn handle_tick(handle: TimerHandle) {
    let outcome =
        with_app(|app| Some(app.navigator.on_tick(&mut app.map, &mut app.timers, handle)));
    if let Some(TickOutcome::LineMissing) = outcome {
        debug!(?handle, "route line vanished mid-animation");
    }
}

/// Filters the list by name or city and returns how many schools are shown.
#[wasm_bindgen]
pub fn apply_filter(query: &str) -> usize {
    with_app(|app| app.apply_filter(query))
}

/// Focuses a school by id, as a list click does. Returns `false` for unknown ids.
#[wasm_bindgen]
pub fn select_school(id: &str) -> bool {
    with_app(|app| app.select(&SchoolId::from(id)))
}

/// Advances the tour and returns the id of the school it selected.
#[wasm_bindgen]
pub fn next_in_tour() -> Option<String> {
    with_app(|app| {
        app.navigator
            .next(&mut app.map, &mut app.timers)
            .map(|school| school.id.to_string())
    })
}

#[wasm_bindgen]
pub fn reset_route() {
    handle_reset();
}
