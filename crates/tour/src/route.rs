//! Route drawing and its animation state machine.
//!
//! The controller is the only owner of the route polyline and of the animation
//! timer. Every draw request goes through one transition:
//! release whatever is held (cancel timer, remove line) -> `Idle` -> acquire the
//! new line and, when animating, exactly one new timer.

use foundation::{LatLng, SchoolId};
use layers::{LayerId, PathLayer, PolylineStyle};
use runtime::{IntervalTimer, TimerHandle};
use tracing::debug;

use crate::ordering::OrderedSequence;

/// Delay between two appended points while animating.
pub const DEFAULT_TICK_INTERVAL_MS: u32 = 120;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DrawOptions {
    pub animate: bool,
}

impl DrawOptions {
    pub const ANIMATED: DrawOptions = DrawOptions { animate: true };
    pub const INSTANT: DrawOptions = DrawOptions { animate: false };
}

impl Default for DrawOptions {
    fn default() -> Self {
        Self::ANIMATED
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RoutePhase {
    /// No line on the map, no timer.
    Idle,
    /// A complete line is on the map.
    Drawn { line: LayerId },
    /// `drawn` of `target_len` points are on the map; one timer is running.
    Animating {
        line: LayerId,
        timer: TimerHandle,
        drawn: usize,
        target_len: usize,
    },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DrawOutcome {
    /// Fewer than two points in the requested prefix; nothing was drawn.
    Empty,
    Drawn { points: usize },
    Animating { points: usize },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    Advanced { drawn: usize, target_len: usize },
    /// The last point was appended and the timer cancelled.
    Finished,
    /// The tick came from a timer that is not the current animation's.
    Stale,
    /// The line vanished from the map; the animation cancelled itself.
    LineMissing,
}

#[derive(Debug)]
pub struct RouteController {
    sequence: OrderedSequence,
    path: Vec<LatLng>,
    phase: RoutePhase,
    tick_interval_ms: u32,
    style: PolylineStyle,
}

impl RouteController {
    pub fn new(sequence: OrderedSequence) -> Self {
        Self::with_settings(sequence, DEFAULT_TICK_INTERVAL_MS, PolylineStyle::default())
    }

    pub fn with_settings(
        sequence: OrderedSequence,
        tick_interval_ms: u32,
        style: PolylineStyle,
    ) -> Self {
        let path = sequence.coordinates();
        Self {
            sequence,
            path,
            phase: RoutePhase::Idle,
            tick_interval_ms: tick_interval_ms.max(1),
            style,
        }
    }

    pub fn sequence(&self) -> &OrderedSequence {
        &self.sequence
    }

    pub fn phase(&self) -> RoutePhase {
        self.phase
    }

    pub fn line(&self) -> Option<LayerId> {
        match self.phase {
            RoutePhase::Idle => None,
            RoutePhase::Drawn { line } | RoutePhase::Animating { line, .. } => Some(line),
        }
    }

    pub fn timer(&self) -> Option<TimerHandle> {
        match self.phase {
            RoutePhase::Animating { timer, .. } => Some(timer),
            _ => None,
        }
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.phase, RoutePhase::Animating { .. })
    }

    /// Resolves a requested index to the last position of the prefix to draw.
    ///
    /// `None` targets the full route; negative values clamp to 0 and values past
    /// the end clamp to the last index. An empty sequence has no target.
    pub fn target_index(&self, index: Option<isize>) -> Option<usize> {
        let last = self.path.len().checked_sub(1)?;
        Some(match index {
            None => last,
            Some(i) if i < 0 => 0,
            Some(i) => (i as usize).min(last),
        })
    }

    pub fn draw_to_index<M, T>(
        &mut self,
        map: &mut M,
        timers: &mut T,
        index: Option<isize>,
        options: DrawOptions,
    ) -> DrawOutcome
    where
        M: PathLayer + ?Sized,
        T: IntervalTimer + ?Sized,
    {
        self.clear(map, timers);

        let Some(target) = self.target_index(index) else {
            debug!("route: empty sequence, nothing to draw");
            return DrawOutcome::Empty;
        };
        let points = &self.path[..=target];
        if points.len() < 2 {
            debug!(index = target, "route: single point prefix, nothing to draw");
            return DrawOutcome::Empty;
        }

        if !options.animate {
            let line = map.add_polyline(points, self.style);
            self.phase = RoutePhase::Drawn { line };
            debug!(points = points.len(), "route: drawn");
            return DrawOutcome::Drawn {
                points: points.len(),
            };
        }

        let line = map.add_polyline(&points[..1], self.style);
        let timer = timers.start(self.tick_interval_ms);
        self.phase = RoutePhase::Animating {
            line,
            timer,
            drawn: 1,
            target_len: points.len(),
        };
        debug!(points = points.len(), timer = timer.0, "route: animating");
        DrawOutcome::Animating {
            points: points.len(),
        }
    }

    pub fn draw_full<M, T>(
        &mut self,
        map: &mut M,
        timers: &mut T,
        options: DrawOptions,
    ) -> DrawOutcome
    where
        M: PathLayer + ?Sized,
        T: IntervalTimer + ?Sized,
    {
        self.draw_to_index(map, timers, None, options)
    }

    /// Draws up to the school carrying `order`; an unknown order draws the full route.
    pub fn draw_to_order<M, T>(
        &mut self,
        map: &mut M,
        timers: &mut T,
        order: u32,
        options: DrawOptions,
    ) -> DrawOutcome
    where
        M: PathLayer + ?Sized,
        T: IntervalTimer + ?Sized,
    {
        match self.sequence.position_of_order(order) {
            Some(idx) => self.draw_to_index(map, timers, Some(idx as isize), options),
            None => {
                debug!(order, "route: order not on route, drawing full route");
                self.draw_full(map, timers, options)
            }
        }
    }

    /// Draws up to the school `id`; an unknown id draws the full route.
    pub fn draw_to_school_id<M, T>(
        &mut self,
        map: &mut M,
        timers: &mut T,
        id: &SchoolId,
        options: DrawOptions,
    ) -> DrawOutcome
    where
        M: PathLayer + ?Sized,
        T: IntervalTimer + ?Sized,
    {
        match self.sequence.position_of_id(id) {
            Some(idx) => self.draw_to_index(map, timers, Some(idx as isize), options),
            None => {
                debug!(school = %id, "route: school not on route, drawing full route");
                self.draw_full(map, timers, options)
            }
        }
    }

    /// Cancels the animation and removes the line. A no-op when idle.
    pub fn clear<M, T>(&mut self, map: &mut M, timers: &mut T)
    where
        M: PathLayer + ?Sized,
        T: IntervalTimer + ?Sized,
    {
        match std::mem::replace(&mut self.phase, RoutePhase::Idle) {
            RoutePhase::Idle => {}
            RoutePhase::Drawn { line } => map.remove_layer(line),
            RoutePhase::Animating { line, timer, .. } => {
                timers.cancel(timer);
                map.remove_layer(line);
            }
        }
    }

    /// Appends the next point of the running animation.
    pub fn on_tick<M, T>(&mut self, map: &mut M, timers: &mut T, tick: TimerHandle) -> TickOutcome
    where
        M: PathLayer + ?Sized,
        T: IntervalTimer + ?Sized,
    {
        let RoutePhase::Animating {
            line,
            timer,
            drawn,
            target_len,
        } = self.phase
        else {
            timers.cancel(tick);
            return TickOutcome::Stale;
        };
        if tick != timer {
            timers.cancel(tick);
            return TickOutcome::Stale;
        }

        if drawn >= target_len {
            timers.cancel(timer);
            self.phase = RoutePhase::Drawn { line };
            return TickOutcome::Finished;
        }
        if !map.has_layer(line) || !map.append_point(line, self.path[drawn]) {
            timers.cancel(timer);
            self.phase = RoutePhase::Idle;
            debug!("route: line removed mid-animation, stopping");
            return TickOutcome::LineMissing;
        }

        let drawn = drawn + 1;
        if drawn >= target_len {
            timers.cancel(timer);
            self.phase = RoutePhase::Drawn { line };
            debug!(points = drawn, "route: animation finished");
            return TickOutcome::Finished;
        }

        self.phase = RoutePhase::Animating {
            line,
            timer,
            drawn,
            target_len,
        };
        TickOutcome::Advanced { drawn, target_len }
    }
}

#[cfg(test)]
mod tests {
    use super::{DrawOptions, DrawOutcome, RouteController, RoutePhase, TickOutcome};
    use crate::ordering::ordered_sequence;
    use catalog::School;
    use foundation::{LatLng, SchoolId};
    use layers::{InMemoryMap, PathLayer};
    use runtime::{IntervalTimer, ManualTimer};

    fn school(id: &str, order: Option<u32>, lat: f64) -> School {
        School {
            id: SchoolId::from(id),
            name: format!("School {id}"),
            city: String::new(),
            description: String::new(),
            photo: None,
            link: None,
            position: LatLng::new(lat, 25.0),
            order,
        }
    }

    fn controller(n: u32) -> RouteController {
        let schools: Vec<_> = (1..=n)
            .map(|i| school(&i.to_string(), Some(i), 40.0 + i as f64))
            .collect();
        RouteController::new(ordered_sequence(&schools))
    }

    fn lats(points: &[LatLng]) -> Vec<f64> {
        points.iter().map(|p| p.lat).collect()
    }

    /// Delivers ticks until the route stops animating; returns the tick count.
    fn run_to_end(
        route: &mut RouteController,
        map: &mut InMemoryMap,
        timers: &mut ManualTimer,
    ) -> usize {
        let mut ticks = 0;
        while let Some(t) = route.timer() {
            route.on_tick(map, timers, t);
            ticks += 1;
            assert!(ticks < 1_000, "animation did not terminate");
        }
        ticks
    }

    #[test]
    fn instant_full_draw_places_every_point() {
        let mut route = controller(4);
        let (mut map, mut timers) = (InMemoryMap::new(), ManualTimer::new());
        let out = route.draw_full(&mut map, &mut timers, DrawOptions::INSTANT);
        assert_eq!(out, DrawOutcome::Drawn { points: 4 });
        assert_eq!(
            map.single_polyline_points().map(lats),
            Some(vec![41.0, 42.0, 43.0, 44.0])
        );
        assert_eq!(timers.active_count(), 0);
    }

    #[test]
    fn animation_appends_one_point_per_tick_then_stops() {
        let mut route = controller(4);
        let (mut map, mut timers) = (InMemoryMap::new(), ManualTimer::new());
        let out = route.draw_full(&mut map, &mut timers, DrawOptions::ANIMATED);
        assert_eq!(out, DrawOutcome::Animating { points: 4 });
        assert_eq!(map.single_polyline_points().map(<[LatLng]>::len), Some(1));
        assert_eq!(timers.active_count(), 1);
        assert_eq!(timers.interval_ms(route.timer().expect("timer")), Some(120));

        let t = route.timer().expect("timer");
        assert_eq!(
            route.on_tick(&mut map, &mut timers, t),
            TickOutcome::Advanced { drawn: 2, target_len: 4 }
        );
        assert_eq!(map.single_polyline_points().map(<[LatLng]>::len), Some(2));

        assert!(route.is_animating());
        assert_eq!(run_to_end(&mut route, &mut map, &mut timers), 2);
        assert!(!route.is_animating());
        assert_eq!(
            map.single_polyline_points().map(lats),
            Some(vec![41.0, 42.0, 43.0, 44.0])
        );
        assert_eq!(timers.active_count(), 0);
        assert!(matches!(route.phase(), RoutePhase::Drawn { .. }));
    }

    #[test]
    fn index_past_end_clamps_to_last() {
        let mut route = controller(3);
        let (mut map, mut timers) = (InMemoryMap::new(), ManualTimer::new());
        route.draw_to_index(&mut map, &mut timers, Some(99), DrawOptions::INSTANT);
        assert_eq!(map.single_polyline_points().map(<[LatLng]>::len), Some(3));
        assert_eq!(route.target_index(Some(99)), Some(2));
    }

    #[test]
    fn negative_index_clamps_to_first_and_draws_nothing() {
        let mut route = controller(3);
        let (mut map, mut timers) = (InMemoryMap::new(), ManualTimer::new());
        assert_eq!(route.target_index(Some(-5)), Some(0));
        let out = route.draw_to_index(&mut map, &mut timers, Some(-5), DrawOptions::INSTANT);
        assert_eq!(out, DrawOutcome::Empty);
        assert_eq!(map.polyline_count(), 0);
        assert_eq!(route.phase(), RoutePhase::Idle);
    }

    #[test]
    fn prefix_is_inclusive_of_target() {
        let mut route = controller(5);
        let (mut map, mut timers) = (InMemoryMap::new(), ManualTimer::new());
        route.draw_to_index(&mut map, &mut timers, Some(2), DrawOptions::INSTANT);
        assert_eq!(map.single_polyline_points().map(lats), Some(vec![41.0, 42.0, 43.0]));
    }

    #[test]
    fn empty_sequence_draws_nothing() {
        let mut route = RouteController::new(ordered_sequence(&[]));
        let (mut map, mut timers) = (InMemoryMap::new(), ManualTimer::new());
        assert_eq!(route.target_index(None), None);
        let out = route.draw_full(&mut map, &mut timers, DrawOptions::ANIMATED);
        assert_eq!(out, DrawOutcome::Empty);
        assert_eq!(map.polyline_count(), 0);
        assert_eq!(timers.active_count(), 0);
    }

    #[test]
    fn redraw_during_animation_leaves_one_line_and_one_timer() {
        let mut route = controller(6);
        let (mut map, mut timers) = (InMemoryMap::new(), ManualTimer::new());
        route.draw_full(&mut map, &mut timers, DrawOptions::ANIMATED);
        let first = route.timer().expect("timer");
        route.on_tick(&mut map, &mut timers, first);

        route.draw_to_order(&mut map, &mut timers, 3, DrawOptions::ANIMATED);
        let fifth = SchoolId::from("5");
        route.draw_to_school_id(&mut map, &mut timers, &fifth, DrawOptions::ANIMATED);
        route.draw_full(&mut map, &mut timers, DrawOptions::ANIMATED);

        assert_eq!(map.polyline_count(), 1);
        assert_eq!(timers.active_count(), 1);
        assert!(!timers.is_active(first));
        assert_eq!(map.polylines_created(), 4);
    }

    #[test]
    fn stale_tick_is_ignored_and_cancelled() {
        let mut route = controller(4);
        let (mut map, mut timers) = (InMemoryMap::new(), ManualTimer::new());
        route.draw_full(&mut map, &mut timers, DrawOptions::ANIMATED);
        let old = route.timer().expect("timer");
        route.draw_full(&mut map, &mut timers, DrawOptions::ANIMATED);

        assert_eq!(route.on_tick(&mut map, &mut timers, old), TickOutcome::Stale);
        assert_eq!(map.single_polyline_points().map(<[LatLng]>::len), Some(1));
        assert_eq!(timers.active_count(), 1);
    }

    #[test]
    fn removed_line_stops_animation() {
        let mut route = controller(4);
        let (mut map, mut timers) = (InMemoryMap::new(), ManualTimer::new());
        route.draw_full(&mut map, &mut timers, DrawOptions::ANIMATED);
        let line = route.line().expect("line");
        let t = route.timer().expect("timer");
        map.remove_layer(line);

        assert_eq!(route.on_tick(&mut map, &mut timers, t), TickOutcome::LineMissing);
        assert_eq!(route.phase(), RoutePhase::Idle);
        assert_eq!(timers.active_count(), 0);
    }

    #[test]
    fn unknown_order_or_id_matches_full_route() {
        let (mut map_full, mut timers_full) = (InMemoryMap::new(), ManualTimer::new());
        let mut full = controller(4);
        full.draw_full(&mut map_full, &mut timers_full, DrawOptions::INSTANT);
        let expected = map_full.single_polyline_points().map(<[LatLng]>::to_vec);

        let (mut map, mut timers) = (InMemoryMap::new(), ManualTimer::new());
        let mut route = controller(4);
        route.draw_to_order(&mut map, &mut timers, 42, DrawOptions::INSTANT);
        assert_eq!(map.single_polyline_points().map(<[LatLng]>::to_vec), expected);

        let ghost = SchoolId::from("ghost");
        route.draw_to_school_id(&mut map, &mut timers, &ghost, DrawOptions::INSTANT);
        assert_eq!(map.single_polyline_points().map(<[LatLng]>::to_vec), expected);
    }

    #[test]
    fn order_lookup_uses_sorted_positions() {
        // id 1 has order 2, id 2 has order 1: the route runs 2 -> 1.
        let schools = vec![school("1", Some(2), 10.0), school("2", Some(1), 20.0)];
        let mut route = RouteController::new(ordered_sequence(&schools));
        let (mut map, mut timers) = (InMemoryMap::new(), ManualTimer::new());

        let out = route.draw_to_order(&mut map, &mut timers, 1, DrawOptions::INSTANT);
        assert_eq!(out, DrawOutcome::Empty);
        assert_eq!(map.polyline_count(), 0);

        route.draw_full(&mut map, &mut timers, DrawOptions::INSTANT);
        assert_eq!(map.single_polyline_points().map(lats), Some(vec![20.0, 10.0]));
    }

    #[test]
    fn clear_is_a_noop_when_idle() {
        let mut route = controller(3);
        let (mut map, mut timers) = (InMemoryMap::new(), ManualTimer::new());
        route.clear(&mut map, &mut timers);
        assert_eq!(route.phase(), RoutePhase::Idle);
        assert_eq!(timers.cancelled_count(), 0);

        route.draw_full(&mut map, &mut timers, DrawOptions::ANIMATED);
        route.clear(&mut map, &mut timers);
        assert_eq!(map.polyline_count(), 0);
        assert_eq!(timers.active_count(), 0);
    }

    #[test]
    fn two_point_animation_finishes_on_first_tick() {
        let mut route = controller(2);
        let (mut map, mut timers) = (InMemoryMap::new(), ManualTimer::new());
        route.draw_full(&mut map, &mut timers, DrawOptions::ANIMATED);
        let t = route.timer().expect("timer");
        assert_eq!(route.on_tick(&mut map, &mut timers, t), TickOutcome::Finished);
        assert_eq!(timers.active_count(), 0);
        assert_eq!(map.single_polyline_points().map(<[LatLng]>::len), Some(2));
    }
}
