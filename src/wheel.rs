//! The public control
use std::time::Instant;

use log::debug;
use rgb::Rgb;

use crate::color::{ColorSpace, ColorState, Hsl, Hsv};
use crate::gradient::GradientTable;
use crate::interaction::*;
use crate::layout::*;
use crate::notify::*;
use crate::options::WheelOptions;
use crate::pixbuf::Pixmap;
use crate::render::{Renderer, Style};

/// Largest accepted gradient quality
pub const MAX_QUALITY: usize = 64;

/// A hue ring color picker
///
/// The wheel owns the color, its geometry and both render layers. Feed it pointer and key input
/// with the `on_*` methods, read the frame back with [HueWheel::compose], and call
/// [HueWheel::poll] from the host's event loop to deliver debounced change notifications.
#[derive(Debug)]
pub struct HueWheel<C: Clock = SystemClock> {
    sizing: Sizing,
    features: Features,
    style: Style,
    deltas: KeyDeltas,
    bindings: KeyBindings,
    focusable: bool,
    color: ColorState,
    layout: Layout,
    gradient: GradientTable,
    renderer: Renderer,
    controller: InteractionController,
    notifier: ChangeNotifier<C>
}

impl HueWheel<SystemClock> {
    /// Creates a wheel on the system clock
    pub fn new(options: WheelOptions) -> Self {
        Self::with_clock(options, SystemClock)
    }
}

impl Default for HueWheel<SystemClock> {
    fn default() -> Self {
        Self::new(WheelOptions::default())
    }
}

impl<C: Clock> HueWheel<C> {
    /// Creates a wheel measuring debounce deadlines against `clock`
    ///
    /// Both layers are drawn right away and one initial notification is scheduled.
    pub fn with_clock(options: WheelOptions, clock: C) -> Self {
        let features = options.features();
        let sizing = options.sizing();
        let style = options.style();
        let layout = Layout::new(&sizing, features.lightness);
        let gradient = GradientTable::new(options.quality.min(MAX_QUALITY), features.lightness);
        let renderer = Renderer::new(&layout, &gradient, &style);

        let mut wheel = Self {
            sizing,
            features,
            style,
            deltas: options.key_deltas,
            bindings: options.key_bindings,
            focusable: options.tabable,
            color: options.initial_color(),
            layout,
            gradient,
            renderer,
            controller: InteractionController::new(),
            notifier: ChangeNotifier::new(clock, options.debounce)
        };
        wheel.redraw();
        wheel.notify();
        wheel
    }

    /// Installs the change callback, builder style
    pub fn with_on_change(mut self, callback: impl FnMut(&ChangeEvent) + 'static) -> Self {
        self.set_on_change(callback);
        self
    }

    /// Installs or replaces the change callback
    pub fn set_on_change(&mut self, callback: impl FnMut(&ChangeEvent) + 'static) {
        self.notifier.set_callback(callback);
    }

    fn redraw(&mut self) {
        self.renderer.redraw(&self.layout, &self.style, &self.color, &self.features, self.controller.mode());
    }

    fn notify(&mut self) {
        self.notifier.notify(ChangeEvent::snapshot(&self.color, self.controller.state()));
    }

    fn commit(&mut self) {
        self.redraw();
        self.notify();
    }

    fn relayout(&mut self) {
        self.layout = Layout::new(&self.sizing, self.features.lightness);
        self.renderer.rebuild_background(&self.layout, &self.gradient, &self.style);
        self.redraw();
    }

    fn respond(&mut self, response: Response) -> Response {
        if response.color_changed {
            self.commit();
        } else if response.redraw {
            self.redraw();
        }
        response
    }

    /// The full color state in the active space
    pub const fn color(&self) -> &ColorState {
        &self.color
    }

    /// Sets hue, saturation and lightness or value in the active space
    pub fn set_color(&mut self, hue: f32, saturation: f32, third: f32) {
        self.color.set(hue, saturation, third);
        self.commit();
    }

    /// The color in HSL, whatever the active space
    pub fn hsl(&self) -> Hsl {
        self.color.hsl()
    }

    /// Sets the color from HSL components
    pub fn set_hsl(&mut self, hue: f32, saturation: f32, lightness: f32) {
        self.color.set_in(ColorSpace::Hsl, hue, saturation, lightness);
        self.commit();
    }

    /// The color in HSV, whatever the active space
    pub fn hsv(&self) -> Hsv {
        self.color.hsv()
    }

    /// Sets the color from HSV components
    pub fn set_hsv(&mut self, hue: f32, saturation: f32, value: f32) {
        self.color.set_in(ColorSpace::Hsv, hue, saturation, value);
        self.commit();
    }

    /// The color as 8 bit RGB
    pub const fn rgb(&self) -> Rgb<u8> {
        self.color.rgb()
    }

    /// Sets the color from RGB components, which are rounded and clamped to `[0, 255]`
    pub fn set_rgb(&mut self, r: f32, g: f32, b: f32) {
        self.color.set_rgb(r, g, b);
        self.commit();
    }

    /// The active color space
    pub const fn color_space(&self) -> ColorSpace {
        self.color.space()
    }

    /// Switches color space, keeping the RGB color. Switching to the active space does nothing.
    pub fn set_color_space(&mut self, space: ColorSpace) {
        if self.color.set_space(space) {
            self.commit();
        }
    }

    /// Switches color space by name, `"hsl"` or `"hsv"`. Other names are ignored.
    ///
    /// Returns the active space afterwards.
    pub fn set_color_space_named(&mut self, name: &str) -> ColorSpace {
        match name.parse() {
            Ok(space) => self.set_color_space(space),
            Err(err) => debug!("Keeping {}: {err}", self.color_space())
        }
        self.color_space()
    }

    /// Whether the current color is shown in the middle
    pub const fn show_swatch(&self) -> bool {
        self.style.show_swatch
    }

    /// Shows or hides the center swatch
    pub fn set_show_swatch(&mut self, show: bool) {
        self.style.show_swatch = show;
        self.redraw();
    }

    /// Whether the lightness ring is shown
    pub const fn lightness_ring(&self) -> bool {
        self.features.lightness
    }

    /// Shows or hides the lightness ring, which rebuilds the layout and background
    pub fn set_lightness_ring(&mut self, enabled: bool) {
        if self.features.lightness == enabled {
            return;
        }
        self.features.lightness = enabled;
        if !enabled && self.controller.mode() == DragMode::DraggingLightness {
            self.controller.cancel();
        }
        self.gradient = GradientTable::new(self.gradient.quality(), enabled);
        self.relayout();
    }

    /// Whether dragging the hue knob changes saturation
    pub const fn saturation_adjust(&self) -> bool {
        self.features.saturation
    }

    /// Enables or disables saturation changes from the hue knob
    pub fn set_saturation_adjust(&mut self, enabled: bool) {
        self.features.saturation = enabled;
        self.redraw();
    }

    /// Whether clicking the lightness ring sets lightness
    pub const fn lightness_clickable(&self) -> bool {
        self.features.lightness_clickable
    }

    /// Makes the lightness ring clickable
    pub fn set_lightness_clickable(&mut self, clickable: bool) {
        self.features.lightness_clickable = clickable;
    }

    /// Hue ring thickness
    pub const fn hue_thickness(&self) -> f32 {
        self.sizing.hue_thickness
    }

    /// Sets the hue ring thickness, clamped to `[3, floor(0.3 * diameter)]`
    pub fn set_hue_thickness(&mut self, thickness: f32) {
        self.sizing.hue_thickness = clamp_hue_thickness(thickness, self.sizing.diameter);
        self.relayout();
    }

    /// Lightness ring thickness
    pub const fn lightness_thickness(&self) -> f32 {
        self.sizing.lightness_thickness
    }

    /// Sets the lightness ring thickness, clamped to `[3, floor(0.2 * diameter)]`
    pub fn set_lightness_thickness(&mut self, thickness: f32) {
        self.sizing.lightness_thickness = clamp_lightness_thickness(thickness, self.sizing.diameter);
        self.relayout();
    }

    /// Center swatch radius as a fraction of the space inside the hue ring
    pub const fn swatch_radius(&self) -> f32 {
        self.sizing.color_spot_width
    }

    /// Sets the center swatch radius fraction, clamped to `[0, 1]`
    pub fn set_swatch_radius(&mut self, fraction: f32) {
        self.sizing.color_spot_width = crate::color::clamp_unit(fraction);
        self.layout = Layout::new(&self.sizing, self.features.lightness);
        self.redraw();
    }

    /// Width and height of the control
    pub const fn diameter(&self) -> f32 {
        self.sizing.diameter
    }

    /// Resizes the control. Ring thicknesses are clamped into the new size's ranges.
    pub fn set_diameter(&mut self, diameter: f32) {
        let diameter = clamp_diameter(diameter);
        self.sizing.diameter = diameter;
        self.sizing.hue_thickness = clamp_hue_thickness(self.sizing.hue_thickness, diameter);
        self.sizing.lightness_thickness = clamp_lightness_thickness(self.sizing.lightness_thickness, diameter);
        self.relayout();
    }

    /// Gradient samples per degree
    pub const fn quality(&self) -> usize {
        self.gradient.quality()
    }

    /// Rebuilds the gradients at a new quality, clamped to `[1, 64]`
    pub fn set_quality(&mut self, quality: usize) {
        let quality = quality.clamp(1, MAX_QUALITY);
        if quality == self.gradient.quality() {
            return;
        }
        self.gradient = GradientTable::new(quality, self.features.lightness);
        self.renderer.rebuild_background(&self.layout, &self.gradient, &self.style);
    }

    /// Width of the shadow around the rings
    pub const fn shadow_blur(&self) -> f32 {
        self.sizing.shadow_blur
    }

    /// Sets the shadow width; 0 turns the shadow off
    pub fn set_shadow_blur(&mut self, blur: f32) {
        self.sizing.shadow_blur = if blur.is_nan() { 0.0 } else { blur.max(0.0) };
        self.relayout();
    }

    /// Whether the host should make the control reachable with tab
    pub const fn is_focusable(&self) -> bool {
        self.focusable
    }

    /// Handles a pointer press
    pub fn on_pointer_down(&mut self, sample: PointerSample) -> Response {
        let response = self.controller.pointer_down(&sample, &self.layout, &self.features, &mut self.color);
        self.respond(response)
    }

    /// Handles pointer movement, both while dragging and while hovering
    pub fn on_pointer_move(&mut self, sample: PointerSample) -> Response {
        let response = self.controller.pointer_move(&sample, &self.layout, &self.features, &mut self.color);
        self.respond(response)
    }

    /// Handles a pointer release
    pub fn on_pointer_up(&mut self) -> Response {
        let response = self.controller.pointer_up();
        self.respond(response)
    }

    /// Handles the host losing the pointer mid-gesture
    pub fn on_pointer_cancel(&mut self) -> Response {
        let response = self.controller.cancel();
        self.respond(response)
    }

    /// Handles a semantic key command. Returns true if the color changed.
    pub fn on_key(&mut self, command: KeyCommand, modifier: bool) -> bool {
        let response = self.controller.key(command, modifier, &self.features, &self.deltas, &mut self.color);
        self.respond(response).color_changed
    }

    /// Handles a raw key code through the configured bindings. Returns true if the color changed.
    pub fn on_key_code(&mut self, code: u32, modifier: bool) -> bool {
        match self.bindings.resolve(code) {
            Some(command) => self.on_key(command, modifier),
            None => false
        }
    }

    /// The current gesture
    pub const fn interaction_mode(&self) -> DragMode {
        self.controller.mode()
    }

    /// The derived geometry
    pub const fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Delivers the pending change if its quiet period is over
    pub fn poll(&mut self) -> Option<ChangeEvent> {
        self.notifier.poll()
    }

    /// When the pending change becomes due, if there is one
    pub fn next_notification_deadline(&self) -> Option<Instant> {
        self.notifier.next_deadline()
    }

    /// Delivers the pending change right away
    pub fn flush_notification(&mut self) -> Option<ChangeEvent> {
        self.notifier.flush()
    }

    /// The cached static layer
    pub fn background(&self) -> &Pixmap {
        self.renderer.background()
    }

    /// The dynamic layer
    pub fn overlay(&self) -> &Pixmap {
        self.renderer.overlay()
    }

    /// Both layers as a single frame
    pub fn compose(&self) -> Pixmap {
        self.renderer.compose()
    }

    /// How many times the background has been drawn
    pub const fn background_builds(&self) -> usize {
        self.renderer.background_builds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    fn wheel() -> (HueWheel<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let mut wheel = HueWheel::with_clock(WheelOptions::default(), clock.clone());
        wheel.flush_notification();
        (wheel, clock)
    }

    fn approx_eq(a: f32, b: f32) {
        assert!((a - b).abs() < 1e-3, "expected {b}, got {a}");
    }

    #[test]
    fn construction_schedules_one_notification() {
        let clock = ManualClock::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let mut wheel = HueWheel::with_clock(WheelOptions::default(), clock.clone())
            .with_on_change(move |e| sink.borrow_mut().push(*e));

        assert!(wheel.poll().is_none());
        assert!(wheel.next_notification_deadline().is_some());
        clock.advance(Duration::from_millis(12));
        let event = wheel.poll();
        assert_eq!(event.map(|e| (e.red, e.green, e.blue)), Some((255, 0, 0)));
        assert_eq!(event.and_then(|e| e.x), None);
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn drag_to_ninety_degrees() {
        let (mut wheel, _) = wheel();
        wheel.on_pointer_down(PointerSample::new(185.0, 125.0));
        assert_eq!(wheel.interaction_mode(), DragMode::DraggingHue);
        wheel.on_pointer_move(PointerSample::new(125.0, 200.0));
        wheel.on_pointer_up();

        approx_eq(wheel.color().hue(), 90.0);
        assert_eq!(wheel.interaction_mode(), DragMode::Idle);

        let before = *wheel.color();
        wheel.on_pointer_move(PointerSample::new(200.0, 125.0));
        assert_eq!(*wheel.color(), before);
    }

    #[test]
    fn burst_of_changes_notifies_once_with_the_last() {
        let (mut wheel, clock) = wheel();
        let count = Rc::new(RefCell::new(0));
        let counter = count.clone();
        wheel.set_on_change(move |_| *counter.borrow_mut() += 1);

        wheel.set_color(10.0, 1.0, 0.5);
        clock.advance(Duration::from_millis(4));
        wheel.set_color(20.0, 1.0, 0.5);
        clock.advance(Duration::from_millis(4));
        wheel.set_rgb(0.0, 0.0, 255.0);
        clock.advance(Duration::from_millis(4));
        assert!(wheel.poll().is_none());

        clock.advance(Duration::from_millis(12));
        let event = wheel.poll();
        assert_eq!(event.map(|e| e.blue), Some(255));
        assert_eq!(event.map(|e| e.hue), Some(240.0));
        assert!(wheel.poll().is_none());
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn interaction_reuses_the_background() {
        let (mut wheel, _) = wheel();
        let builds = wheel.background_builds();
        wheel.on_pointer_down(PointerSample::new(185.0, 125.0));
        for y in 130..200 {
            wheel.on_pointer_move(PointerSample::new(185.0, y as f32));
        }
        wheel.on_pointer_up();
        wheel.on_key_code(34, false);
        assert_eq!(wheel.background_builds(), builds);

        wheel.set_hue_thickness(20.0);
        assert_eq!(wheel.background_builds(), builds + 1);
    }

    #[test]
    fn keyboard_adjusts_the_color() {
        let (mut wheel, _) = wheel();
        assert!(wheel.on_key_code(33, false));
        approx_eq(wheel.color().hue(), 359.0);
        assert!(wheel.on_key_code(34, true));
        approx_eq(wheel.color().hue(), 9.0);
        assert!(wheel.on_key_code(40, true));
        approx_eq(wheel.color().third(), 0.4);
        assert!(!wheel.on_key_code(65, false));
        assert!(wheel.flush_notification().is_some());
    }

    #[test]
    fn clickable_lightness_ring() {
        let (mut wheel, _) = wheel();
        wheel.on_pointer_down(PointerSample::new(244.75, 125.0));
        approx_eq(wheel.color().third(), 0.5);
        assert!(wheel.flush_notification().is_none());

        wheel.set_lightness_clickable(true);
        let response = wheel.on_pointer_down(PointerSample::new(244.75, 125.0));
        assert!(response.color_changed);
        approx_eq(wheel.color().third(), 0.75);
        let event = wheel.flush_notification();
        assert_eq!(event.map(|e| e.lightness), Some(wheel.color().third()));
        assert_eq!(event.and_then(|e| e.x), Some(244.75));
    }

    #[test]
    fn achromatic_space_round_trip() {
        let (mut wheel, _) = wheel();
        wheel.set_color(30.0, 0.0, 0.5);
        let rgb = wheel.rgb();
        wheel.set_color_space(ColorSpace::Hsv);
        assert_eq!(wheel.set_color_space_named("hsl"), ColorSpace::Hsl);
        assert_eq!(wheel.color().saturation(), 0.0);
        assert!((wheel.color().third() - 0.5).abs() <= 1.0 / 255.0);
        assert_eq!(wheel.rgb(), rgb);
    }

    #[test]
    fn unknown_color_space_names_are_ignored() {
        let (mut wheel, _) = wheel();
        assert_eq!(wheel.set_color_space_named("cmyk"), ColorSpace::Hsl);
        assert!(wheel.flush_notification().is_none());
        wheel.set_color_space(ColorSpace::Hsl);
        assert!(wheel.flush_notification().is_none());
    }

    #[test]
    fn explicit_space_accessors() {
        let (mut wheel, _) = wheel();
        wheel.set_hsv(120.0, 1.0, 1.0);
        assert_eq!(wheel.rgb(), Rgb::new(0, 255, 0));
        approx_eq(wheel.hsl().lightness, 0.5);
        approx_eq(wheel.hsv().value, 1.0);

        wheel.set_hsl(0.0, 1.0, 0.25);
        assert_eq!(wheel.rgb(), Rgb::new(128, 0, 0));
    }

    #[test]
    fn setters_clamp() {
        let (mut wheel, _) = wheel();
        wheel.set_hue_thickness(1000.0);
        assert_eq!(wheel.hue_thickness(), 75.0);
        wheel.set_lightness_thickness(0.0);
        assert_eq!(wheel.lightness_thickness(), 3.0);
        wheel.set_swatch_radius(2.0);
        assert_eq!(wheel.swatch_radius(), 1.0);
        wheel.set_quality(0);
        assert_eq!(wheel.quality(), 1);
        wheel.set_diameter(100.0);
        assert_eq!(wheel.background().width(), 100);
        assert_eq!(wheel.hue_thickness(), 30.0);
        wheel.set_shadow_blur(-3.0);
        assert_eq!(wheel.shadow_blur(), 0.0);
    }

    #[test]
    fn construction_clamps_geometry() {
        let options = WheelOptions::from_json(r#"{"thicknessHue": 1000, "thicknessLuma": 900}"#).unwrap();
        let mut wheel = HueWheel::with_clock(options, ManualClock::new());
        assert_eq!(wheel.hue_thickness(), 75.0);
        assert_eq!(wheel.lightness_thickness(), 50.0);
        assert!(wheel.layout().hue_radius > 0.0);
        assert!(wheel.layout().lightness_radius > 0.0);

        wheel.on_pointer_down(PointerSample::new(125.0, 125.0));
        assert_ne!(wheel.interaction_mode(), DragMode::DraggingLightness);

        let options = WheelOptions::from_json(r#"{"diameter": 4, "thicknessHue": 50}"#).unwrap();
        let wheel = HueWheel::with_clock(options, ManualClock::new());
        assert_eq!(wheel.diameter(), MIN_DIAMETER);
        assert_eq!(wheel.background().width(), 16);
        assert_eq!(wheel.hue_thickness(), 4.0);
        assert_eq!(wheel.lightness_thickness(), 3.0);
    }

    #[test]
    fn hiding_the_lightness_ring_ends_its_drag() {
        let (mut wheel, _) = wheel();
        wheel.on_pointer_down(PointerSample::new(126.0, 5.5));
        assert_eq!(wheel.interaction_mode(), DragMode::DraggingLightness);

        wheel.set_lightness_ring(false);
        assert_eq!(wheel.interaction_mode(), DragMode::Idle);
        let third = wheel.color().third();
        let response = wheel.on_pointer_move(PointerSample::new(240.0, 125.0));
        assert!(!response.color_changed);
        assert_eq!(wheel.color().third(), third);
    }

    #[test]
    fn toggling_the_lightness_ring() {
        let (mut wheel, _) = wheel();
        let with_ring = wheel.layout().hue_radius;
        wheel.set_lightness_ring(false);
        assert!(wheel.layout().lightness_ring().is_none());
        assert!(wheel.layout().hue_radius > with_ring);
        assert!(!wheel.on_key(KeyCommand::Increase(Axis::Lightness), false));
        wheel.set_lightness_ring(true);
        approx_eq(wheel.layout().hue_radius, with_ring);
    }
}
