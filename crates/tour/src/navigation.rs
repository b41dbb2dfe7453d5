use catalog::School;
use layers::MapSurface;
use runtime::{IntervalTimer, TimerHandle};
use tracing::debug;

use crate::route::{DrawOptions, DrawOutcome, RouteController, TickOutcome};

/// Zoom level used when focusing a single school.
pub const DEFAULT_SELECT_ZOOM: f64 = 12.0;

/// Turns user actions (list click, marker click, "next", "reset") into route
/// and map focus changes.
///
/// `cursor` points at the school the next "next" action selects. It stays in
/// `[0, len)` while the route has schools and is ignored otherwise.
#[derive(Debug)]
pub struct TourNavigator {
    route: RouteController,
    cursor: usize,
    select_zoom: f64,
}

impl TourNavigator {
    pub fn new(route: RouteController) -> Self {
        Self {
            route,
            cursor: 0,
            select_zoom: DEFAULT_SELECT_ZOOM,
        }
    }

    pub fn with_select_zoom(mut self, zoom: f64) -> Self {
        self.select_zoom = zoom;
        self
    }

    pub fn route(&self) -> &RouteController {
        &self.route
    }

    pub fn cursor(&self) -> Option<usize> {
        if self.route.sequence().is_empty() {
            None
        } else {
            Some(self.cursor)
        }
    }

    /// Startup: shows the whole route when there is one to show.
    pub fn start<M, T>(&mut self, map: &mut M, timers: &mut T) -> DrawOutcome
    where
        M: MapSurface + ?Sized,
        T: IntervalTimer + ?Sized,
    {
        if self.route.sequence().len() < 2 {
            return DrawOutcome::Empty;
        }
        self.cursor = 0;
        self.route.draw_full(map, timers, DrawOptions::ANIMATED)
    }

    /// Focuses `school` and, when it is on the route, draws the route up to it.
    pub fn select<M, T>(
        &mut self,
        map: &mut M,
        timers: &mut T,
        school: &School,
    ) -> Option<DrawOutcome>
    where
        M: MapSurface + ?Sized,
        T: IntervalTimer + ?Sized,
    {
        map.set_view(school.position, self.select_zoom);
        if !map.reveal_marker(&school.id) {
            debug!(school = %school.id, "select: no marker for school");
        }

        let order = school.order?;
        if let Some(idx) = self.route.sequence().position_of_id(&school.id) {
            self.cursor = idx;
        }
        Some(self.route.draw_to_order(map, timers, order, DrawOptions::ANIMATED))
    }

    /// Selects the school under the cursor, then advances the cursor cyclically.
    ///
    /// Returns the selected school, or `None` when the route is empty.
    pub fn next<M, T>(&mut self, map: &mut M, timers: &mut T) -> Option<School>
    where
        M: MapSurface + ?Sized,
        T: IntervalTimer + ?Sized,
    {
        let len = self.route.sequence().len();
        if len == 0 {
            return None;
        }
        let school = self.route.sequence().get(self.cursor % len)?.clone();
        self.select(map, timers, &school);
        self.cursor = (self.cursor + 1) % len;
        Some(school)
    }

    /// Redraws the whole route, whatever the cursor says.
    pub fn reset_route<M, T>(&mut self, map: &mut M, timers: &mut T) -> DrawOutcome
    where
        M: MapSurface + ?Sized,
        T: IntervalTimer + ?Sized,
    {
        self.route.draw_full(map, timers, DrawOptions::ANIMATED)
    }

    pub fn on_tick<M, T>(&mut self, map: &mut M, timers: &mut T, tick: TimerHandle) -> TickOutcome
    where
        M: MapSurface + ?Sized,
        T: IntervalTimer + ?Sized,
    {
        self.route.on_tick(map, timers, tick)
    }

    /// Tears the route down: cancels the animation and removes the line.
    pub fn shutdown<M, T>(&mut self, map: &mut M, timers: &mut T)
    where
        M: MapSurface + ?Sized,
        T: IntervalTimer + ?Sized,
    {
        self.route.clear(map, timers);
    }
}
