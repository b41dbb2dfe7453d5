//! The school tour: route order, animated route drawing, and navigation.

pub mod navigation;
pub mod ordering;
pub mod route;

pub use navigation::{DEFAULT_SELECT_ZOOM, TourNavigator};
pub use ordering::{OrderedSequence, compare_names, ordered_sequence};
pub use route::{
    DEFAULT_TICK_INTERVAL_MS, DrawOptions, DrawOutcome, RouteController, RoutePhase, TickOutcome,
};
