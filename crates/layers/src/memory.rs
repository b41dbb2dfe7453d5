use std::collections::BTreeMap;

use foundation::{LatLng, LatLngBounds, SchoolId};

use crate::layer::LayerId;
use crate::surface::{MapView, MarkerLayer, MarkerSpec, PathLayer};
use crate::symbology::PolylineStyle;

#[derive(Debug, Clone, PartialEq)]
pub struct PolylineSnapshot {
    pub points: Vec<LatLng>,
    pub style: PolylineStyle,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewSnapshot {
    pub center: LatLng,
    pub zoom: f64,
}

/// Headless map surface that records every call.
///
/// Used by tests and by anything that drives the tour without a browser.
#[derive(Debug, Default)]
pub struct InMemoryMap {
    next_layer: u64,
    polylines: BTreeMap<LayerId, PolylineSnapshot>,
    markers: BTreeMap<SchoolId, MarkerSpec>,
    view: Option<ViewSnapshot>,
    fitted: Option<LatLngBounds>,
    open_popup: Option<SchoolId>,
    polylines_created: u64,
}

impl InMemoryMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn polyline(&self, id: LayerId) -> Option<&PolylineSnapshot> {
        self.polylines.get(&id)
    }

    pub fn polyline_count(&self) -> usize {
        self.polylines.len()
    }

    /// Points of the only polyline on the map, if exactly one exists.
    pub fn single_polyline_points(&self) -> Option<&[LatLng]> {
        if self.polylines.len() != 1 {
            return None;
        }
        self.polylines.values().next().map(|p| p.points.as_slice())
    }

    pub fn polylines_created(&self) -> u64 {
        self.polylines_created
    }

    pub fn marker(&self, id: &SchoolId) -> Option<&MarkerSpec> {
        self.markers.get(id)
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    pub fn view(&self) -> Option<ViewSnapshot> {
        self.view
    }

    pub fn fitted_bounds(&self) -> Option<LatLngBounds> {
        self.fitted
    }

    pub fn open_popup(&self) -> Option<&SchoolId> {
        self.open_popup.as_ref()
    }
}

impl MapView for InMemoryMap {
    fn set_view(&mut self, center: LatLng, zoom: f64) {
        self.view = Some(ViewSnapshot { center, zoom });
    }

    fn fit_bounds(&mut self, bounds: LatLngBounds) {
        self.fitted = Some(bounds);
    }
}

impl PathLayer for InMemoryMap {
    fn add_polyline(&mut self, points: &[LatLng], style: PolylineStyle) -> LayerId {
        let id = LayerId(self.next_layer);
        self.next_layer = self.next_layer.wrapping_add(1);
        self.polylines.insert(
            id,
            PolylineSnapshot {
                points: points.to_vec(),
                style,
            },
        );
        self.polylines_created += 1;
        id
    }

    fn append_point(&mut self, line: LayerId, point: LatLng) -> bool {
        let Some(poly) = self.polylines.get_mut(&line) else {
            return false;
        };
        poly.points.push(point);
        true
    }

    fn remove_layer(&mut self, layer: LayerId) {
        self.polylines.remove(&layer);
    }

    fn has_layer(&self, layer: LayerId) -> bool {
        self.polylines.contains_key(&layer)
    }
}

impl MarkerLayer for InMemoryMap {
    fn add_marker(&mut self, marker: MarkerSpec) {
        self.markers.insert(marker.id.clone(), marker);
    }

    fn reveal_marker(&mut self, id: &SchoolId) -> bool {
        if !self.markers.contains_key(id) {
            return false;
        }
        self.open_popup = Some(id.clone());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::InMemoryMap;
    use crate::surface::{MapView, MarkerLayer, MarkerSpec, PathLayer};
    use crate::symbology::PolylineStyle;
    use foundation::{LatLng, SchoolId};

    #[test]
    fn append_grows_existing_line_only() {
        let mut map = InMemoryMap::new();
        let line = map.add_polyline(&[LatLng::new(1.0, 1.0)], PolylineStyle::default());
        assert!(map.append_point(line, LatLng::new(2.0, 2.0)));
        assert_eq!(map.polyline(line).map(|p| p.points.len()), Some(2));

        map.remove_layer(line);
        assert!(!map.has_layer(line));
        assert!(!map.append_point(line, LatLng::new(3.0, 3.0)));
    }

    #[test]
    fn layer_ids_are_not_reused() {
        let mut map = InMemoryMap::new();
        let a = map.add_polyline(&[], PolylineStyle::default());
        map.remove_layer(a);
        let b = map.add_polyline(&[], PolylineStyle::default());
        assert_ne!(a, b);
        assert_eq!(map.polylines_created(), 2);
        assert_eq!(map.polyline_count(), 1);
    }

    #[test]
    fn reveal_opens_popup_of_known_marker() {
        let mut map = InMemoryMap::new();
        let id = SchoolId::from("a");
        map.add_marker(MarkerSpec {
            id: id.clone(),
            position: LatLng::new(42.0, 23.0),
            popup_html: "<b>a</b>".to_string(),
        });
        assert!(!map.reveal_marker(&SchoolId::from("missing")));
        assert!(map.open_popup().is_none());
        assert!(map.reveal_marker(&id));
        assert_eq!(map.open_popup(), Some(&id));
    }

    #[test]
    fn set_view_records_center_and_zoom() {
        let mut map = InMemoryMap::new();
        map.set_view(LatLng::new(42.7, 25.3), 7.0);
        let v = map.view().expect("view");
        assert_eq!(v.center, LatLng::new(42.7, 25.3));
        assert_eq!(v.zoom, 7.0);
    }
}
