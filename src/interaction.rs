//! Pointer and keyboard state machine
//!
//! The controller turns clean pointer samples and key commands into [ColorState] updates. It
//! never draws or notifies by itself; each input returns a [Response] telling the owner what to
//! do next.
use log::trace;
use serde::{Deserialize, Serialize};

use crate::color::ColorState;
use crate::geometry::*;
use crate::layout::Layout;

/// What the pointer is currently doing
#[derive(Default, Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum DragMode {
    /// No gesture in progress
    #[default]
    Idle,
    /// The hue knob is being dragged
    DraggingHue,
    /// The lightness knob is being dragged
    DraggingLightness
}

/// A pointer position in control coordinates
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct PointerSample {
    /// Horizontal offset from the left edge
    pub x: f32,
    /// Vertical offset from the top edge
    pub y: f32,
    /// Whether the sample came from a touch screen
    pub is_touch: bool
}

impl PointerSample {
    /// A mouse or pen sample
    pub const fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            is_touch: false
        }
    }

    /// A touch sample
    pub const fn touch(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            is_touch: true
        }
    }

    /// The sample as a point
    pub const fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Cursor the host should show over the control
#[derive(Default, Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Cursor {
    /// Nothing interactive under the pointer
    #[default]
    Default,
    /// Over a knob
    Pointer,
    /// Over the hue ring
    Crosshair
}

/// One of the adjustable color components
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Hue angle
    Hue,
    /// Saturation
    Saturation,
    /// Lightness or value
    Lightness
}

/// A semantic key press
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum KeyCommand {
    /// Raise the component by its delta
    Increase(Axis),
    /// Lower the component by its delta
    Decrease(Axis)
}

/// Key codes for each [KeyCommand], as reported by the host platform
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct KeyBindings {
    /// Lowers the hue, page up by default
    pub hue_decrease: u32,
    /// Raises the hue, page down by default
    pub hue_increase: u32,
    /// Lowers the saturation, left arrow by default
    pub saturation_decrease: u32,
    /// Raises the saturation, right arrow by default
    pub saturation_increase: u32,
    /// Raises the lightness, up arrow by default
    pub lightness_increase: u32,
    /// Lowers the lightness, down arrow by default
    pub lightness_decrease: u32,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            hue_decrease: 33,
            hue_increase: 34,
            saturation_decrease: 37,
            saturation_increase: 39,
            lightness_increase: 38,
            lightness_decrease: 40,
        }
    }
}

impl KeyBindings {
    /// Maps a key code to its command. When two commands share a code, hue wins over saturation
    /// and saturation over lightness.
    pub fn resolve(&self, code: u32) -> Option<KeyCommand> {
        [
            (self.hue_decrease, KeyCommand::Decrease(Axis::Hue)),
            (self.hue_increase, KeyCommand::Increase(Axis::Hue)),
            (self.saturation_decrease, KeyCommand::Decrease(Axis::Saturation)),
            (self.saturation_increase, KeyCommand::Increase(Axis::Saturation)),
            (self.lightness_increase, KeyCommand::Increase(Axis::Lightness)),
            (self.lightness_decrease, KeyCommand::Decrease(Axis::Lightness)),
        ]
        .into_iter()
        .find(|(bound, _)| *bound == code)
        .map(|(_, command)| command)
    }
}

/// Step sizes for keyboard adjustments
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct KeyDeltas {
    /// Degrees per hue step
    pub hue: f32,
    /// Percent per saturation step
    pub saturation: f32,
    /// Percent per lightness step
    pub lightness: f32,
    /// Multiplier applied while the modifier key is held
    pub modifier_factor: f32,
}

impl Default for KeyDeltas {
    fn default() -> Self {
        Self {
            hue: 1.0,
            saturation: 1.0,
            lightness: 1.0,
            modifier_factor: 10.0,
        }
    }
}

/// Which parts of the control respond to input
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Features {
    /// The lightness ring and knob are shown
    pub lightness: bool,
    /// Dragging the hue knob inward changes saturation
    pub saturation: bool,
    /// Clicking the lightness ring outside of its knob sets lightness
    pub lightness_clickable: bool,
    /// Keyboard commands are accepted
    pub keys: bool,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            lightness: true,
            saturation: true,
            lightness_clickable: false,
            keys: true,
        }
    }
}

/// What lies under a point, in priority order
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Hit {
    /// The hue knob
    HueKnob,
    /// The lightness knob
    LightnessKnob,
    /// The hue ring, at the given hue
    HueRing(f32),
    /// The lightness ring, at the given lightness. Only reported when the ring is clickable.
    LightnessRing(f32),
    /// Anything else
    Nothing
}

/// What the owner of a controller has to do after an input
#[derive(Default, Clone, Copy, PartialEq, Eq, Debug)]
pub struct Response {
    /// The color changed: redraw the overlay and schedule a notification
    pub color_changed: bool,
    /// Only the knob selection changed: redraw the overlay
    pub redraw: bool,
    /// Cursor hint for the host, on pointer input
    pub cursor: Option<Cursor>
}

impl Response {
    const fn changed() -> Self {
        Self {
            color_changed: true,
            redraw: true,
            cursor: None
        }
    }

    const fn redraw() -> Self {
        Self {
            color_changed: false,
            redraw: true,
            cursor: None
        }
    }

    const fn with_cursor(self, cursor: Cursor) -> Self {
        Self {
            cursor: Some(cursor),
            ..self
        }
    }
}

/// The ephemeral per-gesture state
#[derive(Default, Clone, Copy, PartialEq, Debug)]
pub struct InteractionState {
    /// Current gesture
    pub mode: DragMode,
    /// Last pointer position seen, if any
    pub last: Option<Point>,
    /// Whether the last pointer sample was a touch
    pub is_touch: bool
}

/// The pointer and keyboard state machine
#[derive(Default, Clone, Debug)]
pub struct InteractionController {
    state: InteractionState
}

impl InteractionController {
    /// Creates an idle controller
    pub fn new() -> Self {
        Self::default()
    }

    /// The current gesture and pointer state
    pub const fn state(&self) -> &InteractionState {
        &self.state
    }

    /// The current gesture
    pub const fn mode(&self) -> DragMode {
        self.state.mode
    }

    /// Finds what lies under `point` for the current color
    pub fn hit_test(&self, point: &Point, layout: &Layout, features: &Features, color: &ColorState) -> Hit {
        let knob = layout.hue_knob(color.hue(), features.saturation.then_some(color.saturation()));
        if knob.contains(point) {
            return Hit::HueKnob;
        }

        if features.lightness && layout.lightness_knob_radius > 0.0 && layout.lightness_knob(color.third()).contains(point) {
            return Hit::LightnessKnob;
        }

        let p = polar(&layout.center, point);
        if layout.hue_ring().contains(point) {
            return Hit::HueRing(angle_to_hue(p.angle));
        }

        match layout.lightness_ring() {
            Some(ring) if features.lightness && features.lightness_clickable && ring.contains(point) => {
                Hit::LightnessRing(angle_to_lightness(p.angle))
            },
            _ => Hit::Nothing
        }
    }

    fn track(&mut self, sample: &PointerSample) {
        self.state.last = Some(sample.point());
        self.state.is_touch = sample.is_touch;
    }

    /// Starts a drag on a knob, or jumps to the clicked position on a ring
    pub fn pointer_down(&mut self, sample: &PointerSample, layout: &Layout, features: &Features, color: &mut ColorState) -> Response {
        self.track(sample);
        let hit = self.hit_test(&sample.point(), layout, features, color);
        trace!("Pointer down at ({}, {}) hit {:?}", sample.x, sample.y, hit);

        let response = match hit {
            Hit::HueKnob => {
                self.state.mode = DragMode::DraggingHue;
                Response::redraw()
            },
            Hit::LightnessKnob => {
                self.state.mode = DragMode::DraggingLightness;
                Response::redraw()
            },
            Hit::HueRing(hue) => {
                color.set_hue(hue);
                Response::changed()
            },
            Hit::LightnessRing(lightness) => {
                color.set_third(lightness);
                Response::changed()
            },
            Hit::Nothing => Response::default()
        };
        response.with_cursor(Cursor::Default)
    }

    /// Follows a drag, or reports the hover cursor while idle
    pub fn pointer_move(&mut self, sample: &PointerSample, layout: &Layout, features: &Features, color: &mut ColorState) -> Response {
        self.track(sample);
        let point = sample.point();
        let p = polar(&layout.center, &point);

        match self.state.mode {
            DragMode::DraggingHue => {
                let saturation = if features.saturation {
                    layout.saturation_from_distance(p.distance)
                } else {
                    color.saturation()
                };
                color.set(angle_to_hue(p.angle), saturation, color.third());
                trace!("Dragged hue to {} at saturation {}", color.hue(), color.saturation());
                Response::changed()
            },
            DragMode::DraggingLightness if !features.lightness => self.end_gesture("move"),
            DragMode::DraggingLightness => {
                color.set_third(angle_to_lightness(p.angle));
                trace!("Dragged lightness to {}", color.third());
                Response::changed()
            },
            DragMode::Idle => {
                let cursor = match self.hit_test(&point, layout, features, color) {
                    Hit::HueKnob | Hit::LightnessKnob => Cursor::Pointer,
                    Hit::HueRing(_) => Cursor::Crosshair,
                    Hit::LightnessRing(_) | Hit::Nothing => Cursor::Default
                };
                Response::default().with_cursor(cursor)
            }
        }
    }

    /// Ends a drag
    pub fn pointer_up(&mut self) -> Response {
        self.end_gesture("up")
    }

    /// Abandons a drag, e.g. when the host loses the pointer
    pub fn cancel(&mut self) -> Response {
        self.end_gesture("cancel")
    }

    fn end_gesture(&mut self, why: &str) -> Response {
        let was = self.state.mode;
        self.state.mode = DragMode::Idle;
        trace!("Pointer {why} ended {:?}", was);
        let response = match was {
            DragMode::Idle => Response::default(),
            _ => Response::redraw()
        };
        response.with_cursor(Cursor::Default)
    }

    /// Applies a key command, scaled by the modifier factor while the modifier is held
    ///
    /// Commands for disabled axes, or any command while keys are disabled, are ignored.
    pub fn key(&mut self, command: KeyCommand, modifier: bool, features: &Features, deltas: &KeyDeltas, color: &mut ColorState) -> Response {
        if !features.keys {
            return Response::default();
        }

        let (axis, sign) = match command {
            KeyCommand::Increase(axis) => (axis, 1.0),
            KeyCommand::Decrease(axis) => (axis, -1.0)
        };
        let factor = if modifier { deltas.modifier_factor } else { 1.0 };

        match axis {
            Axis::Hue => color.set_hue(color.hue() + sign * deltas.hue * factor),
            Axis::Saturation if features.saturation => {
                color.set_saturation(color.saturation() + sign * deltas.saturation * factor * 0.01)
            },
            Axis::Lightness if features.lightness => {
                color.set_third(color.third() + sign * deltas.lightness * factor * 0.01)
            },
            _ => return Response::default()
        }
        trace!("Key {:?} moved color to {:?}", command, color.rgb());
        Response::changed()
    }
}
