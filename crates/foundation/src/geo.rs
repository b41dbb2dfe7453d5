/// Geographic primitives in WGS84 degrees.
///
/// Order is always `(lat, lng)`, matching what the map widget expects.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        LatLng { lat, lng }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    /// Finite, with latitude in `[-90, 90]` and longitude in `[-180, 180]`.
    pub fn is_valid(&self) -> bool {
        self.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

/// Lat/lng bounding box.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LatLngBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl LatLngBounds {
    pub fn new(south_west: LatLng, north_east: LatLng) -> Self {
        LatLngBounds {
            south_west,
            north_east,
        }
    }

    /// Smallest box containing every point, or `None` for an empty input.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = LatLng>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut b = LatLngBounds::new(first, first);
        for p in iter {
            b.extend(p);
        }
        Some(b)
    }

    pub fn extend(&mut self, p: LatLng) {
        self.south_west.lat = self.south_west.lat.min(p.lat);
        self.south_west.lng = self.south_west.lng.min(p.lng);
        self.north_east.lat = self.north_east.lat.max(p.lat);
        self.north_east.lng = self.north_east.lng.max(p.lng);
    }

    pub fn contains(&self, p: LatLng) -> bool {
        p.lat >= self.south_west.lat
            && p.lat <= self.north_east.lat
            && p.lng >= self.south_west.lng
            && p.lng <= self.north_east.lng
    }

    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south_west.lat + self.north_east.lat) * 0.5,
            (self.south_west.lng + self.north_east.lng) * 0.5,
        )
    }

    /// Grows the box on every side by `ratio` of its span.
    pub fn pad(&self, ratio: f64) -> Self {
        let d_lat = (self.north_east.lat - self.south_west.lat).abs() * ratio;
        let d_lng = (self.north_east.lng - self.south_west.lng).abs() * ratio;
        LatLngBounds::new(
            LatLng::new(self.south_west.lat - d_lat, self.south_west.lng - d_lng),
            LatLng::new(self.north_east.lat + d_lat, self.north_east.lng + d_lng),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{LatLng, LatLngBounds};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn bounds_of_empty_input_is_none() {
        assert!(LatLngBounds::from_points(Vec::new()).is_none());
    }

    #[test]
    fn bounds_cover_all_points() {
        let pts = [
            LatLng::new(42.69, 23.32),
            LatLng::new(43.21, 27.91),
            LatLng::new(42.14, 24.75),
        ];
        let b = LatLngBounds::from_points(pts).expect("bounds");
        assert_eq!(b.south_west, LatLng::new(42.14, 23.32));
        assert_eq!(b.north_east, LatLng::new(43.21, 27.91));
        assert!(pts.iter().all(|p| b.contains(*p)));
    }

    #[test]
    fn pad_grows_each_side_by_ratio() {
        let b = LatLngBounds::new(LatLng::new(0.0, 10.0), LatLng::new(10.0, 20.0)).pad(0.2);
        assert_close(b.south_west.lat, -2.0, 1e-12);
        assert_close(b.south_west.lng, 8.0, 1e-12);
        assert_close(b.north_east.lat, 12.0, 1e-12);
        assert_close(b.north_east.lng, 22.0, 1e-12);
        assert_eq!(b.center(), LatLng::new(5.0, 15.0));
    }

    #[test]
    fn validity_rejects_out_of_range_and_nan() {
        assert!(LatLng::new(42.7, 25.3).is_valid());
        assert!(!LatLng::new(91.0, 0.0).is_valid());
        assert!(!LatLng::new(0.0, -181.0).is_valid());
        assert!(!LatLng::new(f64::NAN, 0.0).is_valid());
    }
}
