use std::collections::BTreeMap;

/// Identifies one repeating timer started through an [`IntervalTimer`].
///
/// Handles are never reused within a timer service, so a tick carrying an old
/// handle can always be told apart from the current one.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerHandle(pub u64);

/// Repeating timer service.
///
/// Starting a timer only registers it; delivering ticks back to the owner is
/// the job of the event loop that hosts the service. Cancelling an unknown or
/// already-cancelled handle is a no-op.
pub trait IntervalTimer {
    fn start(&mut self, interval_ms: u32) -> TimerHandle;
    fn cancel(&mut self, handle: TimerHandle);
    fn is_active(&self, handle: TimerHandle) -> bool;
}

/// Deterministic timer driven by hand.
///
/// Nothing fires on its own: callers list the active handles and deliver the
/// ticks themselves, which makes animations replayable tick by tick.
#[derive(Debug, Default)]
pub struct ManualTimer {
    next_id: u64,
    active: BTreeMap<TimerHandle, u32>,
    started: u64,
    cancelled: u64,
}

impl ManualTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Active handles in start order.
    pub fn active(&self) -> Vec<TimerHandle> {
        self.active.keys().copied().collect()
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn interval_ms(&self, handle: TimerHandle) -> Option<u32> {
        self.active.get(&handle).copied()
    }

    /// Total timers ever started.
    pub fn started_count(&self) -> u64 {
        self.started
    }

    /// Total timers cancelled while still active.
    pub fn cancelled_count(&self) -> u64 {
        self.cancelled
    }
}

impl IntervalTimer for ManualTimer {
    fn start(&mut self, interval_ms: u32) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.active.insert(handle, interval_ms);
        self.started += 1;
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if self.active.remove(&handle).is_some() {
            self.cancelled += 1;
        }
    }

    fn is_active(&self, handle: TimerHandle) -> bool {
        self.active.contains_key(&handle)
    }
}
