use foundation::{LatLng, LatLngBounds, SchoolId};

use crate::layer::LayerId;
use crate::symbology::PolylineStyle;

/// Camera of the map widget.
pub trait MapView {
    fn set_view(&mut self, center: LatLng, zoom: f64);
    fn fit_bounds(&mut self, bounds: LatLngBounds);
}

/// Line-layer primitive: create from points, grow one point at a time, remove.
pub trait PathLayer {
    fn add_polyline(&mut self, points: &[LatLng], style: PolylineStyle) -> LayerId;

    /// Appends `point` to the end of `line`.
    ///
    /// Returns `false` if the layer is no longer on the map.
    fn append_point(&mut self, line: LayerId, point: LatLng) -> bool;

    /// Removing an unknown layer is a no-op.
    fn remove_layer(&mut self, layer: LayerId);

    fn has_layer(&self, layer: LayerId) -> bool;
}

/// A point marker with popup content, keyed by the school it represents.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    pub id: SchoolId,
    pub position: LatLng,
    pub popup_html: String,
}

/// Clustering container for school markers.
pub trait MarkerLayer {
    fn add_marker(&mut self, marker: MarkerSpec);

    /// Zooms until the marker is out of its cluster, then opens its popup.
    ///
    /// Returns `false` if no marker is registered under `id`.
    fn reveal_marker(&mut self, id: &SchoolId) -> bool;
}

/// Everything the tour needs from a map widget.
pub trait MapSurface: MapView + PathLayer + MarkerLayer {}

impl<T: MapView + PathLayer + MarkerLayer> MapSurface for T {}
