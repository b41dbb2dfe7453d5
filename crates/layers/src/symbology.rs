/// Stroke style of a route polyline.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PolylineStyle {
    /// Stroke width in CSS pixels.
    pub weight: f64,
    pub opacity: f64,
}

impl PolylineStyle {
    pub const fn new(weight: f64, opacity: f64) -> Self {
        Self { weight, opacity }
    }
}

impl Default for PolylineStyle {
    fn default() -> Self {
        Self {
            weight: 4.0,
            opacity: 0.9,
        }
    }
}
