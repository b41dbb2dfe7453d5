use serde::{Deserialize, Serialize};

/// Viewer settings. Every field has a default, so a host page only passes the
/// keys it wants to change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub data_url: String,
    /// `[lat, lng]`
    pub initial_center: [f64; 2],
    pub initial_zoom: f64,
    /// Zoom used when focusing one school.
    pub select_zoom: f64,
    pub tile_url: String,
    pub tile_attribution: String,
    pub max_zoom: f64,
    pub tick_interval_ms: u32,
    pub route_style: RouteStyleConfig,
    /// Extra margin around all schools when fitting the first view.
    pub fit_padding: f64,
    pub log_level: String,
    pub elements: ElementIds,
    pub messages: Messages,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            data_url: "data/schools.json".to_string(),
            initial_center: [42.7, 25.3],
            initial_zoom: 7.0,
            select_zoom: tour::DEFAULT_SELECT_ZOOM,
            tile_url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            tile_attribution: "&copy; OpenStreetMap".to_string(),
            max_zoom: 19.0,
            tick_interval_ms: tour::DEFAULT_TICK_INTERVAL_MS,
            route_style: RouteStyleConfig::default(),
            fit_padding: 0.2,
            log_level: "info".to_string(),
            elements: ElementIds::default(),
            messages: Messages::default(),
        }
    }
}

impl ViewerConfig {
    /// Parses a JSON object; missing keys keep their defaults.
    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Most verbose level sent to the console; unknown names mean `info`.
    pub fn max_log_level(&self) -> tracing::Level {
        self.log_level
            .trim()
            .parse::<tracing::Level>()
            .unwrap_or(tracing::Level::INFO)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteStyleConfig {
    pub weight: f64,
    pub opacity: f64,
}

impl Default for RouteStyleConfig {
    fn default() -> Self {
        let style = layers::PolylineStyle::default();
        Self {
            weight: style.weight,
            opacity: style.opacity,
        }
    }
}

impl From<RouteStyleConfig> for layers::PolylineStyle {
    fn from(c: RouteStyleConfig) -> Self {
        layers::PolylineStyle::new(c.weight, c.opacity)
    }
}

/// DOM ids of the page controls. The buttons and search box are optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementIds {
    pub map: String,
    pub status: String,
    pub list: String,
    pub search: String,
    pub next_button: String,
    pub reset_button: String,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            map: "map".to_string(),
            status: "status".to_string(),
            list: "schoolList".to_string(),
            search: "search".to_string(),
            next_button: "nextBtn".to_string(),
            reset_button: "resetRouteBtn".to_string(),
        }
    }
}

/// User-facing strings. `{count}`, `{shown}`, `{total}` and `{order}` are
/// substituted where they appear.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub loading: String,
    pub loaded: String,
    pub showing: String,
    pub no_results: String,
    pub load_failed: String,
    pub open_link: String,
    pub route_label: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            loading: "Loading schools…".to_string(),
            loaded: "Schools loaded: {count}".to_string(),
            showing: "Showing: {shown} / {total}".to_string(),
            no_results: "No results.".to_string(),
            load_failed: "Loading failed. Check that data/schools.json is published correctly."
                .to_string(),
            open_link: "Open publication/materials".to_string(),
            route_label: "Route #{order}".to_string(),
        }
    }
}

impl Messages {
    pub fn loaded(&self, count: usize) -> String {
        self.loaded.replace("{count}", &count.to_string())
    }

    pub fn showing(&self, shown: usize, total: usize) -> String {
        self.showing
            .replace("{shown}", &shown.to_string())
            .replace("{total}", &total.to_string())
    }

    pub fn route_label(&self, order: u32) -> String {
        self.route_label.replace("{order}", &order.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::ViewerConfig;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_object_is_the_default() {
        let cfg = ViewerConfig::from_json_str("{}").expect("parse");
        assert_eq!(cfg, ViewerConfig::default());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let cfg = ViewerConfig::from_json_str(
            r#"{"data_url":"other.json","route_style":{"weight":6},"messages":{"no_results":"Nothing"}}"#,
        )
        .expect("parse");
        assert_eq!(cfg.data_url, "other.json");
        assert_eq!(cfg.route_style.weight, 6.0);
        assert_eq!(cfg.route_style.opacity, 0.9);
        assert_eq!(cfg.messages.no_results, "Nothing");
        assert_eq!(cfg.messages.loading, "Loading schools…");
        assert_eq!(cfg.tick_interval_ms, 120);
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(ViewerConfig::from_json_str("{oops").is_err());
    }

    #[test]
    fn message_templates_substitute_counts() {
        let m = ViewerConfig::default().messages;
        assert_eq!(m.showing(3, 10), "Showing: 3 / 10");
        assert_eq!(m.loaded(7), "Schools loaded: 7");
        assert_eq!(m.route_label(4), "Route #4");
    }

    #[test]
    fn unknown_log_level_falls_back_to_info() {
        let mut cfg = ViewerConfig::default();
        cfg.log_level = "chatty".to_string();
        assert_eq!(cfg.max_log_level(), tracing::Level::INFO);
        cfg.log_level = "debug".to_string();
        assert_eq!(cfg.max_log_level(), tracing::Level::DEBUG);
    }
}
