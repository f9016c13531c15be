//! Debounced change notifications
//!
//! Every color change schedules a [ChangeEvent]. A newer event replaces a pending one and
//! restarts the quiet period, so a burst of changes produces a single delivery carrying the last
//! color. Nothing here blocks or spawns; the host calls [ChangeNotifier::poll] from its own event
//! loop, using [ChangeNotifier::next_deadline] to know when.
use core::cell::Cell;
use core::fmt::{Debug, Formatter};
use std::rc::Rc;
use std::time::{Duration, Instant};

use log::trace;
use serde::{Deserialize, Serialize};

use crate::color::ColorState;
use crate::interaction::InteractionState;

/// Quiet period used when none is configured
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(12);

/// Snapshot of the control handed to change callbacks
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEvent {
    /// Hue in degrees
    pub hue: f32,
    /// Saturation in the active color space
    pub saturation: f32,
    /// The third channel, named for HSL hosts
    pub lightness: f32,
    /// The third channel, named for HSV hosts
    pub value: f32,
    /// Red channel
    pub red: u8,
    /// Green channel
    pub green: u8,
    /// Blue channel
    pub blue: u8,
    /// Last pointer x, if the pointer has been seen
    pub x: Option<f32>,
    /// Last pointer y, if the pointer has been seen
    pub y: Option<f32>,
    /// Whether the last pointer sample was a touch
    pub is_touch: bool,
}

impl ChangeEvent {
    /// Captures the color and pointer state as they are right now
    pub fn snapshot(color: &ColorState, pointer: &InteractionState) -> Self {
        let rgb = color.rgb();
        Self {
            hue: color.hue(),
            saturation: color.saturation(),
            lightness: color.third(),
            value: color.third(),
            red: rgb.r,
            green: rgb.g,
            blue: rgb.b,
            x: pointer.last.map(|p| p.x),
            y: pointer.last.map(|p| p.y),
            is_touch: pointer.is_touch,
        }
    }
}

/// A source of the current time
pub trait Clock {
    /// The current instant
    fn now(&self) -> Instant;
}

/// The real monotonic clock
#[derive(Default, Clone, Copy, Debug)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Clone, Debug)]
pub struct ManualClock {
    now: Rc<Cell<Instant>>
}

impl ManualClock {
    /// Creates a clock frozen at the current instant
    pub fn new() -> Self {
        Self {
            now: Rc::new(Cell::new(Instant::now()))
        }
    }

    /// Moves time forward
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

/// A single cancellable pending value with a deadline
#[derive(Clone, Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(Instant, T)>
}

impl<T> Debouncer<T> {
    /// Creates an idle debouncer with the given quiet period
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None
        }
    }

    /// The quiet period
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Replaces any pending value and restarts the quiet period from `now`
    pub fn schedule(&mut self, value: T, now: Instant) {
        self.pending = Some((now + self.delay, value));
    }

    /// Takes the pending value once its deadline has passed
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        if self.deadline().is_some_and(|deadline| now >= deadline) {
            self.take()
        } else {
            None
        }
    }

    /// Takes the pending value regardless of its deadline
    pub fn take(&mut self) -> Option<T> {
        self.pending.take().map(|(_, value)| value)
    }

    /// Drops the pending value
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// When the pending value becomes due
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(deadline, _)| *deadline)
    }

    /// True while a value is waiting
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Callback invoked with each delivered change
pub type ChangeCallback = Box<dyn FnMut(&ChangeEvent)>;

/// Debounces [ChangeEvent]s and hands them to a callback
pub struct ChangeNotifier<C: Clock> {
    clock: C,
    debouncer: Debouncer<ChangeEvent>,
    callback: Option<ChangeCallback>
}

impl<C: Clock> Debug for ChangeNotifier<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("debouncer", &self.debouncer)
            .field("callback", &self.callback.is_some())
            .finish()
    }
}

impl<C: Clock> ChangeNotifier<C> {
    /// Creates a notifier without a callback
    pub fn new(clock: C, delay: Duration) -> Self {
        Self {
            clock,
            debouncer: Debouncer::new(delay),
            callback: None
        }
    }

    /// Installs or replaces the callback
    pub fn set_callback(&mut self, callback: impl FnMut(&ChangeEvent) + 'static) {
        self.callback = Some(Box::new(callback));
    }

    /// Removes the callback. Events are still debounced and returned from [Self::poll].
    pub fn clear_callback(&mut self) {
        self.callback = None;
    }

    /// The clock deadlines are measured against
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Schedules an event, superseding any pending one
    pub fn notify(&mut self, event: ChangeEvent) {
        trace!("Scheduling change event {:?}", event);
        self.debouncer.schedule(event, self.clock.now());
    }

    /// Delivers the pending event if its quiet period is over
    pub fn poll(&mut self) -> Option<ChangeEvent> {
        let event = self.debouncer.poll(self.clock.now())?;
        Some(self.deliver(event))
    }

    /// Delivers the pending event right away
    pub fn flush(&mut self) -> Option<ChangeEvent> {
        let event = self.debouncer.take()?;
        Some(self.deliver(event))
    }

    /// Drops the pending event without delivering it
    pub fn cancel(&mut self) {
        self.debouncer.cancel();
    }

    /// When the pending event becomes due
    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    fn deliver(&mut self, event: ChangeEvent) -> ChangeEvent {
        if let Some(callback) = self.callback.as_mut() {
            callback(&event);
        }
        event
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorSpace;

    fn event(hue: f32) -> ChangeEvent {
        ChangeEvent::snapshot(&ColorState::new(ColorSpace::Hsl, hue, 1.0, 0.5), &InteractionState::default())
    }

    #[test]
    fn debouncer_waits_for_quiet() {
        let start = Instant::now();
        let mut debounce = Debouncer::new(Duration::from_millis(10));
        assert!(!debounce.is_pending());

        debounce.schedule(1, start);
        assert_eq!(debounce.poll(start + Duration::from_millis(5)), None);
        debounce.schedule(2, start + Duration::from_millis(5));
        assert_eq!(debounce.deadline(), Some(start + Duration::from_millis(15)));
        assert_eq!(debounce.poll(start + Duration::from_millis(12)), None);
        assert_eq!(debounce.poll(start + Duration::from_millis(15)), Some(2));
        assert_eq!(debounce.poll(start + Duration::from_millis(30)), None);

        debounce.schedule(3, start);
        debounce.cancel();
        assert_eq!(debounce.take(), None);
    }

    #[test]
    fn burst_delivers_only_the_last_event() {
        let clock = ManualClock::new();
        let delivered = Rc::new(Cell::new(0usize));
        let last_hue = Rc::new(Cell::new(-1.0f32));

        let mut notifier = ChangeNotifier::new(clock.clone(), DEFAULT_DEBOUNCE);
        let (count, hue) = (delivered.clone(), last_hue.clone());
        notifier.set_callback(move |event| {
            count.set(count.get() + 1);
            hue.set(event.hue);
        });

        for h in [10.0, 20.0, 30.0] {
            notifier.notify(event(h));
            clock.advance(Duration::from_millis(5));
            assert!(notifier.poll().is_none());
        }

        clock.advance(DEFAULT_DEBOUNCE);
        assert_eq!(notifier.poll().map(|e| e.hue), Some(30.0));
        assert_eq!(delivered.get(), 1);
        assert_eq!(last_hue.get(), 30.0);
        assert!(notifier.next_deadline().is_none());
    }

    #[test]
    fn flush_skips_the_wait() {
        let mut notifier = ChangeNotifier::new(ManualClock::new(), Duration::from_secs(60));
        notifier.notify(event(42.0));
        assert!(notifier.poll().is_none());
        assert_eq!(notifier.flush().map(|e| e.hue), Some(42.0));
        assert!(notifier.flush().is_none());
    }

    #[test]
    fn snapshot_carries_both_third_channel_names() {
        let color = ColorState::new(ColorSpace::Hsv, 200.0, 0.5, 0.25);
        let pointer = InteractionState {
            last: Some(crate::geometry::Point::new(3.0, 4.0)),
            is_touch: true,
            ..Default::default()
        };
        let event = ChangeEvent::snapshot(&color, &pointer);
        assert_eq!(event.lightness, 0.25);
        assert_eq!(event.value, 0.25);
        assert_eq!((event.red, event.green, event.blue), (color.rgb().r, color.rgb().g, color.rgb().b));
        assert_eq!((event.x, event.y), (Some(3.0), Some(4.0)));

        let json = serde_json::to_value(event).unwrap_or_default();
        assert_eq!(json["isTouch"], serde_json::Value::Bool(true));
        assert_eq!(json["red"], serde_json::json!(event.red));
    }
}
