//! Leaflet bindings and the `MapSurface` implementation backed by them.
//!
//! Leaflet and the markercluster plugin are loaded by the host page as
//! globals; nothing here bundles them.

use std::collections::BTreeMap;

use foundation::{LatLng, LatLngBounds, SchoolId};
use layers::{LayerId, MapView, MarkerLayer, MarkerSpec, PathLayer, PolylineStyle};
use tracing::warn;
use wasm_bindgen::prelude::*;

use crate::config::ViewerConfig;

#[wasm_bindgen]
extern "C" {
    #[derive(Debug, Clone)]
    pub type LMap;

    #[derive(Debug, Clone)]
    pub type LMarker;

    #[derive(Debug, Clone)]
    pub type LPolyline;

    #[derive(Debug, Clone)]
    pub type LCluster;

    #[derive(Debug, Clone)]
    pub type LTileLayer;

    #[wasm_bindgen(catch, js_namespace = L, js_name = map)]
    fn l_map(id: &str, options: &JsValue) -> Result<LMap, JsValue>;

    #[wasm_bindgen(js_namespace = L, js_name = tileLayer)]
    fn l_tile_layer(url: &str, options: &JsValue) -> LTileLayer;

    #[wasm_bindgen(catch, js_namespace = L, js_name = markerClusterGroup)]
    fn l_marker_cluster_group(options: &JsValue) -> Result<LCluster, JsValue>;

    #[wasm_bindgen(js_namespace = L, js_name = marker)]
    fn l_marker(latlng: &JsValue) -> LMarker;

    #[wasm_bindgen(js_namespace = L, js_name = polyline)]
    fn l_polyline(latlngs: &JsValue, options: &JsValue) -> LPolyline;

    #[wasm_bindgen(method, js_name = setView)]
    fn set_view(this: &LMap, center: &JsValue, zoom: f64);

    #[wasm_bindgen(method, js_name = fitBounds)]
    fn fit_bounds(this: &LMap, bounds: &JsValue);

    #[wasm_bindgen(method, js_name = addLayer)]
    fn add_layer(this: &LMap, layer: &JsValue);

    #[wasm_bindgen(method, js_name = removeLayer)]
    fn remove_layer(this: &LMap, layer: &JsValue);

    #[wasm_bindgen(method, js_name = addTo)]
    fn add_to(this: &LTileLayer, map: &LMap);

    #[wasm_bindgen(method, js_name = bindPopup)]
    fn bind_popup(this: &LMarker, html: &str);

    #[wasm_bindgen(method, js_name = openPopup)]
    fn open_popup(this: &LMarker);

    #[wasm_bindgen(method)]
    fn on(this: &LMarker, event: &str, handler: &js_sys::Function);

    #[wasm_bindgen(method, js_name = addLayer)]
    fn add_marker(this: &LCluster, marker: &LMarker);

    #[wasm_bindgen(method, js_name = zoomToShowLayer)]
    fn zoom_to_show_layer(this: &LCluster, marker: &LMarker, callback: &JsValue);

    #[wasm_bindgen(method, js_name = addLatLng)]
    fn add_lat_lng(this: &LPolyline, latlng: &JsValue);
}

fn latlng(p: LatLng) -> JsValue {
    js_sys::Array::of2(&JsValue::from_f64(p.lat), &JsValue::from_f64(p.lng)).into()
}

fn options(pairs: &[(&str, JsValue)]) -> JsValue {
    let obj = js_sys::Object::new();
    for (key, value) in pairs {
        // Setting a plain data property on a fresh object cannot throw.
        let _ = js_sys::Reflect::set(&obj, &JsValue::from_str(key), value);
    }
    obj.into()
}

/// The live map widget.
///
/// Markers go into a cluster group when the markercluster plugin is present
/// and straight onto the map otherwise.
pub struct LeafletMap {
    map: LMap,
    cluster: Option<LCluster>,
    markers: BTreeMap<SchoolId, LMarker>,
    lines: BTreeMap<LayerId, LPolyline>,
    next_layer: u64,
    on_marker_click: fn(&SchoolId),
    click_handlers: Vec<Closure<dyn FnMut()>>,
}

impl LeafletMap {
    /// Creates the map inside the element `config.elements.map`, adds the tile
    /// layer and centers on the initial view.
    pub fn new(config: &ViewerConfig, on_marker_click: fn(&SchoolId)) -> Result<Self, JsValue> {
        let map = l_map(
            &config.elements.map,
            &options(&[("scrollWheelZoom", JsValue::TRUE)]),
        )?;
        let [lat, lng] = config.initial_center;
        map.set_view(&latlng(LatLng::new(lat, lng)), config.initial_zoom);

        let tiles = l_tile_layer(
            &config.tile_url,
            &options(&[
                ("maxZoom", JsValue::from_f64(config.max_zoom)),
                ("attribution", JsValue::from_str(&config.tile_attribution)),
            ]),
        );
        tiles.add_to(&map);

        let cluster_options = options(&[
            ("chunkedLoading", JsValue::TRUE),
            ("showCoverageOnHover", JsValue::FALSE),
            ("spiderfyOnMaxZoom", JsValue::TRUE),
        ]);
        let cluster = match l_marker_cluster_group(&cluster_options) {
            Ok(cluster) => {
                map.add_layer(&cluster);
                Some(cluster)
            }
            Err(err) => {
                warn!(?err, "markerClusterGroup unavailable; markers will not cluster");
                None
            }
        };

        Ok(Self {
            map,
            cluster,
            markers: BTreeMap::new(),
            lines: BTreeMap::new(),
            next_layer: 1,
            on_marker_click,
            click_handlers: Vec::new(),
        })
    }
}

impl MapView for LeafletMap {
    fn set_view(&mut self, center: LatLng, zoom: f64) {
        self.map.set_view(&latlng(center), zoom);
    }

    fn fit_bounds(&mut self, bounds: LatLngBounds) {
        let corners = js_sys::Array::of2(&latlng(bounds.south_west), &latlng(bounds.north_east));
        self.map.fit_bounds(&corners);
    }
}

impl PathLayer for LeafletMap {
    fn add_polyline(&mut self, points: &[LatLng], style: PolylineStyle) -> LayerId {
        let latlngs: js_sys::Array = points.iter().map(|p| latlng(*p)).collect();
        let line = l_polyline(
            &latlngs,
            &options(&[
                ("weight", JsValue::from_f64(style.weight)),
                ("opacity", JsValue::from_f64(style.opacity)),
            ]),
        );
        self.map.add_layer(&line);

        let id = LayerId(self.next_layer);
        self.next_layer += 1;
        self.lines.insert(id, line);
        id
    }

    fn append_point(&mut self, line: LayerId, point: LatLng) -> bool {
        match self.lines.get(&line) {
            Some(polyline) => {
                polyline.add_lat_lng(&latlng(point));
                true
            }
            None => false,
        }
    }

    fn remove_layer(&mut self, layer: LayerId) {
        if let Some(polyline) = self.lines.remove(&layer) {
            self.map.remove_layer(&polyline);
        }
    }

    fn has_layer(&self, layer: LayerId) -> bool {
        self.lines.contains_key(&layer)
    }
}

impl MarkerLayer for LeafletMap {
    fn add_marker(&mut self, entry: MarkerSpec) {
        let marker = l_marker(&latlng(entry.position));
        marker.bind_popup(&entry.popup_html);

        let on_click = self.on_marker_click;
        let id = entry.id.clone();
        let handler = Closure::<dyn FnMut()>::new(move || on_click(&id));
        marker.on("click", handler.as_ref().unchecked_ref());
        self.click_handlers.push(handler);

        match &self.cluster {
            Some(cluster) => cluster.add_marker(&marker),
            None => self.map.add_layer(&marker),
        }
        self.markers.insert(entry.id, marker);
    }

    fn reveal_marker(&mut self, id: &SchoolId) -> bool {
        let Some(marker) = self.markers.get(id) else {
            return false;
        };
        match &self.cluster {
            Some(cluster) => {
                let target = marker.clone();
                let open = Closure::once_into_js(move || target.open_popup());
                cluster.zoom_to_show_layer(marker, &open);
            }
            None => marker.open_popup(),
        }
        true
    }
}
