//! What happens once the schools are loaded: page wiring, markers, first view,
//! list, status and the opening tour. Nothing here touches the browser, so the
//! whole sequence runs against the in-memory map in tests.

use catalog::{SchoolCatalog, SearchQuery, filter_schools};
use layers::{MapSurface, MarkerSpec};
use runtime::IntervalTimer;
use tour::{RouteController, TourNavigator, ordered_sequence};
use tracing::info;

use crate::config::ViewerConfig;
use crate::markup;

/// Receives the status line and the list markup.
pub trait PageSink {
    fn set_status(&mut self, text: &str);
    fn set_list_html(&mut self, html: &str);
}

/// Wires the page, then fills the map and starts the tour.
///
/// `wire` runs before anything reaches the map. If it fails, the status shows
/// the load failure and no partial UI is left behind.
pub fn install<M, T, S, E, W>(
    config: &ViewerConfig,
    catalog: &SchoolCatalog,
    map: &mut M,
    timers: &mut T,
    page: &mut S,
    wire: W,
) -> Result<TourNavigator, E>
where
    M: MapSurface + ?Sized,
    T: IntervalTimer + ?Sized,
    S: PageSink,
    W: FnOnce(&mut S) -> Result<(), E>,
{
    if let Err(err) = wire(page) {
        page.set_status(&config.messages.load_failed);
        return Err(err);
    }

    for school in catalog.schools() {
        map.add_marker(MarkerSpec {
            id: school.id.clone(),
            position: school.position,
            popup_html: markup::popup_html(school, &config.messages),
        });
    }
    if catalog.len() >= 2 {
        if let Some(bounds) = catalog.bounds() {
            map.fit_bounds(bounds.pad(config.fit_padding));
        }
    }
    render_initial(config, catalog, page);

    let route = RouteController::with_settings(
        ordered_sequence(catalog.schools()),
        config.tick_interval_ms,
        config.route_style.into(),
    );
    info!(
        schools = catalog.len(),
        on_route = route.sequence().len(),
        "school map ready"
    );
    let mut navigator = TourNavigator::new(route).with_select_zoom(config.select_zoom);
    navigator.start(map, timers);
    Ok(navigator)
}

/// Full list plus the "loaded" status, or "no results" for an empty catalog.
pub fn render_initial<S>(config: &ViewerConfig, catalog: &SchoolCatalog, page: &mut S)
where
    S: PageSink + ?Sized,
{
    let messages = &config.messages;
    page.set_list_html(&markup::list_html(catalog.schools(), messages));
    if catalog.is_empty() {
        page.set_status(&messages.no_results);
    } else {
        page.set_status(&messages.loaded(catalog.len()));
    }
}

/// Re-renders the list for `raw` and returns how many schools are shown.
pub fn apply_filter<S>(
    config: &ViewerConfig,
    catalog: &SchoolCatalog,
    raw: &str,
    page: &mut S,
) -> usize
where
    S: PageSink + ?Sized,
{
    let query = SearchQuery::parse(raw);
    let shown = filter_schools(catalog.schools(), &query);
    let messages = &config.messages;
    page.set_list_html(&markup::list_html(shown.iter().copied(), messages));
    page.set_status(&messages.showing(shown.len(), catalog.len()));
    shown.len()
}
