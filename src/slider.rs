//! Stepped slider along either axis.
//!
//! The slider keeps an [`AnchorLayout`] describing its parts (track, fill,
//! thumb). Every value or size change re-pins the thumb, which replaces the
//! previous pin, and painting reads positions back from the pins. Pointer
//! positions are mapped to values with the axis helpers in
//! [`crate::geometry`] and snapped with [`crate::quantize`].

use floem::kurbo::{Circle, Point, Rect};
use floem::peniko::Color;
use floem::reactive::{RwSignal, SignalGet, SignalUpdate};
use floem::views::Decorators;
use floem::{
    context::{ComputeLayoutCx, EventCx, PaintCx, UpdateCx},
    event::{Event, EventPropagation},
    keyboard::{Key, NamedKey},
    View, ViewId,
};
use floem_renderer::Renderer;
use tracing::debug;

use crate::constants;
use crate::geometry::{
    anchor_coordinate, bottom_edge_for, center_for, coordinate, edge_far, edge_near, extent_for,
    point_on, size, span_rect, top_edge_for, Attribute, Axis,
};
use crate::layout::{
    attach_subview, pin_between, pin_constant, pin_to_parent, AnchorLayout, LayoutEngine, NodeId,
    Pin,
};
use crate::props::{PropertyChange, SliderConfig, SliderProps};
use crate::quantize::snap;

/// Position of `value` within `min..=max`, clamped to 0–1. Empty ranges sit at 0.
pub fn value_fraction(value: f64, min: f64, max: f64) -> f64 {
    let span = max - min;
    if !(span > 0.0) || !value.is_finite() {
        return 0.0;
    }
    ((value - min) / span).max(0.0).min(1.0)
}

/// Snap `raw` to the configured grid and keep it inside the range.
pub fn constrain_value(raw: f64, config: &SliderConfig) -> f64 {
    let lo = config.min.min(config.max);
    let hi = config.max.max(config.min);
    snap(raw, config.min, config.step, config.snap).max(lo).min(hi)
}

/// Value under `position` for a slider occupying `bounds` along `axis`.
///
/// The thumb center travels from `thumb_radius` inside the far edge to
/// `thumb_radius` inside the near edge. Returns `None` if there is no room
/// to travel.
pub fn value_at(
    position: Point,
    bounds: Rect,
    axis: Axis,
    thumb_radius: f64,
    config: &SliderConfig,
) -> Option<f64> {
    let usable = size(bounds, axis) - 2.0 * thumb_radius;
    if !(usable > 0.0) {
        return None;
    }
    let inward = bottom_edge_for(axis).inward_sign();
    let distance = (coordinate(position, axis) - edge_far(bounds, axis)) * inward;
    let fraction = ((distance - thumb_radius) / usable).max(0.0).min(1.0);
    let raw = config.min + fraction * (config.max - config.min);
    Some(constrain_value(raw, config))
}

/// Fold `change` into `config`.
///
/// When a range, step or snap change leaves the current value off the grid
/// or out of range, returns the corrected value. The config is not updated
/// with it; committing is up to the caller.
pub fn apply_change(config: &mut SliderConfig, change: PropertyChange) -> Option<f64> {
    match change {
        PropertyChange::Value(v) => config.value = v,
        PropertyChange::Enabled(e) => config.enabled = e,
        PropertyChange::Min(v) => config.min = v,
        PropertyChange::Max(v) => config.max = v,
        PropertyChange::Step(s) => config.step = s,
        PropertyChange::Snap(m) => config.snap = m,
    }
    if matches!(change, PropertyChange::Value(_) | PropertyChange::Enabled(_))
        || !config.value.is_finite()
    {
        return None;
    }
    let fixed = constrain_value(config.value, config);
    let tolerance = f64::EPSILON * config.value.abs().max(1.0) * 4.0;
    ((fixed - config.value).abs() > tolerance).then_some(fixed)
}

/// Value one keyboard increment away from `value`.
pub fn nudge(value: f64, config: &SliderConfig, increase: bool) -> f64 {
    let delta = config
        .step
        .filter(|s| s.is_normal() && *s > 0.0)
        .unwrap_or((config.max - config.min).abs() * constants::KEY_FRACTION);
    let raw = if increase { value + delta } else { value - delta };
    constrain_value(raw, config)
}

/// The slider's part tree and the pins between the parts.
#[derive(Debug)]
pub struct SliderAnchors {
    axis: Axis,
    layout: AnchorLayout,
    root: NodeId,
    track: NodeId,
    fill: NodeId,
    thumb: NodeId,
}

impl SliderAnchors {
    pub fn new(axis: Axis, thumb_radius: f64) -> Self {
        let across = axis.perpendicular();
        let near = top_edge_for(axis);
        let far = bottom_edge_for(axis);

        let mut layout = AnchorLayout::new();
        let root = layout.add_node();
        let track = layout.add_node();
        let fill = layout.add_node();
        let thumb = layout.add_node();

        // Track: inset by the thumb radius at both ends, centered across.
        attach_subview(&mut layout, root, track, &[center_for(across)]);
        pin_to_parent(&mut layout, root, track, far, far.inward_sign() * thumb_radius);
        pin_to_parent(&mut layout, root, track, near, near.inward_sign() * thumb_radius);
        pin_constant(&mut layout, track, extent_for(across), constants::TRACK_THICKNESS);

        // Fill: from the track's far end up to the thumb center.
        attach_subview(&mut layout, track, fill, &[far, center_for(across)]);
        pin_between(&mut layout, fill, near, thumb, Some(center_for(axis)), 0.0);

        attach_subview(&mut layout, root, thumb, &[center_for(across)]);
        pin_constant(&mut layout, thumb, Attribute::Width, 2.0 * thumb_radius);
        pin_constant(&mut layout, thumb, Attribute::Height, 2.0 * thumb_radius);

        debug!(?axis, constraints = layout.active().count(), "built slider anchors");

        let mut anchors = Self {
            axis,
            layout,
            root,
            track,
            fill,
            thumb,
        };
        anchors.place_thumb(0.0, 0.0, thumb_radius);
        anchors
    }

    pub fn layout(&self) -> &AnchorLayout {
        &self.layout
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn thumb(&self) -> NodeId {
        self.thumb
    }

    /// Pin the thumb center `fraction` of the way along a slider `length` long.
    pub fn place_thumb(&mut self, fraction: f64, length: f64, thumb_radius: f64) {
        let far = bottom_edge_for(self.axis);
        let usable = (length - 2.0 * thumb_radius).max(0.0);
        let distance = thumb_radius + fraction * usable;
        Pin::new(self.thumb, center_for(self.axis))
            .to_attribute(self.root, far)
            .offset(far.inward_sign() * distance)
            .identifier(constants::THUMB_PIN)
            .apply(&mut self.layout);
    }

    /// Constant of the pin on `item.attribute` stored in `owner`, 0 if absent.
    fn pinned(&self, owner: NodeId, item: NodeId, attribute: Attribute) -> f64 {
        self.layout
            .constraints(owner)
            .iter()
            .find(|c| c.first_item == item && c.first_attribute == attribute)
            .map_or(0.0, |c| c.constant)
    }

    fn across_center(&self, bounds: Rect) -> f64 {
        anchor_coordinate(bounds, center_for(self.axis.perpendicular())).unwrap_or_default()
    }

    fn thumb_along(&self, bounds: Rect) -> f64 {
        let offset = self
            .layout
            .find(self.thumb, constants::THUMB_PIN)
            .map_or(0.0, |c| c.constant);
        edge_far(bounds, self.axis) + offset
    }

    pub fn thumb_center(&self, bounds: Rect) -> Point {
        point_on(self.axis, self.thumb_along(bounds), self.across_center(bounds))
    }

    pub fn track_rect(&self, bounds: Rect) -> Rect {
        let axis = self.axis;
        let from = edge_far(bounds, axis) + self.pinned(self.root, self.track, bottom_edge_for(axis));
        let to = edge_near(bounds, axis) + self.pinned(self.root, self.track, top_edge_for(axis));
        let thickness = self.pinned(self.track, self.track, extent_for(axis.perpendicular()));
        span_rect(axis, from, to, self.across_center(bounds), thickness)
    }

    pub fn fill_rect(&self, bounds: Rect) -> Rect {
        let axis = self.axis;
        let track = self.track_rect(bounds);
        let from = edge_far(track, axis) + self.pinned(self.track, self.fill, bottom_edge_for(axis));
        let to = self.thumb_along(bounds) + self.pinned(self.fill, self.fill, top_edge_for(axis));
        span_rect(
            axis,
            from,
            to,
            self.across_center(bounds),
            size(track, axis.perpendicular()),
        )
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        if disabled {
            if self.layout.overlay(self.root).is_none() {
                let veil = self.layout.add_node();
                self.layout.set_overlay(self.root, veil);
            }
        } else {
            self.layout.clear_overlay(self.root);
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.layout.overlay(self.root).is_some()
    }
}

pub struct StepSlider {
    id: ViewId,
    axis: Axis,
    held: bool,
    config: SliderConfig,
    size: floem::taffy::prelude::Size<f32>,
    on_change: Option<Box<dyn Fn(f64)>>,
    anchors: SliderAnchors,
}

/// Creates a continuous 0–1 slider along `axis` bound to `value`.
pub fn slider(value: RwSignal<f64>, axis: Axis) -> StepSlider {
    let config = SliderConfig::default().with_value(value.get_untracked());
    step_slider(SliderProps::with_value_signal(value, config), axis)
}

/// Creates a slider along `axis` driven by `props`.
///
/// The axis is fixed for the lifetime of the view; everything in `props`
/// may change at any time.
pub fn step_slider(props: SliderProps, axis: Axis) -> StepSlider {
    let id = ViewId::new();

    props.subscribe_all(move |change| id.update_state(change));

    let value = props.value;
    let config = props.snapshot();
    let mut anchors = SliderAnchors::new(axis, constants::THUMB_RADIUS);
    anchors.set_disabled(!config.enabled);

    StepSlider {
        id,
        axis,
        held: false,
        config,
        size: Default::default(),
        on_change: Some(Box::new(move |v| {
            if value.get_untracked() != v {
                value.set(v);
            }
        })),
        anchors,
    }
    .style(move |s| {
        let s = s
            .border_radius(constants::THUMB_RADIUS as f32)
            .cursor(floem::style::CursorStyle::Pointer);
        match axis {
            Axis::Horizontal => s
                .height(constants::SLIDER_THICKNESS)
                .min_width(constants::MIN_LENGTH),
            Axis::Vertical => s
                .width(constants::SLIDER_THICKNESS)
                .min_height(constants::MIN_LENGTH),
        }
    })
}

impl StepSlider {
    pub fn axis(&self) -> Axis {
        self.axis
    }

    fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.size.width as f64, self.size.height as f64)
    }

    fn place_thumb(&mut self) {
        let fraction = value_fraction(self.config.value, self.config.min, self.config.max);
        let length = size(self.bounds(), self.axis);
        self.anchors
            .place_thumb(fraction, length, constants::THUMB_RADIUS);
    }

    fn apply(&mut self, change: PropertyChange) {
        let corrected = apply_change(&mut self.config, change);
        if let PropertyChange::Enabled(e) = change {
            self.held = false;
            self.anchors.set_disabled(!e);
        }
        self.place_thumb();
        if let Some(value) = corrected {
            self.commit(value);
        }
    }

    fn commit(&mut self, value: f64) {
        if value == self.config.value {
            return;
        }
        debug!(value, axis = ?self.axis, "slider value changed");
        self.config.value = value;
        self.place_thumb();
        if let Some(cb) = &self.on_change {
            cb(value);
        }
        self.id.request_layout();
    }

    fn update_from_pointer(&mut self, pos: Point) {
        if let Some(v) = value_at(
            pos,
            self.bounds(),
            self.axis,
            constants::THUMB_RADIUS,
            &self.config,
        ) {
            self.commit(v);
        }
    }

    fn handle_key(&mut self, key: &Key) -> bool {
        let target = match (key, self.axis) {
            (Key::Named(NamedKey::ArrowRight), Axis::Horizontal)
            | (Key::Named(NamedKey::ArrowUp), Axis::Vertical) => {
                nudge(self.config.value, &self.config, true)
            }
            (Key::Named(NamedKey::ArrowLeft), Axis::Horizontal)
            | (Key::Named(NamedKey::ArrowDown), Axis::Vertical) => {
                nudge(self.config.value, &self.config, false)
            }
            (Key::Named(NamedKey::Home), _) => constrain_value(self.config.min, &self.config),
            (Key::Named(NamedKey::End), _) => constrain_value(self.config.max, &self.config),
            _ => return false,
        };
        self.commit(target);
        true
    }
}

impl View for StepSlider {
    fn id(&self) -> ViewId {
        self.id
    }

    fn update(&mut self, _cx: &mut UpdateCx, state: Box<dyn std::any::Any>) {
        if let Ok(change) = state.downcast::<PropertyChange>() {
            self.apply(*change);
            self.id.request_layout();
        }
    }

    fn event_before_children(&mut self, cx: &mut EventCx, event: &Event) -> EventPropagation {
        if !self.config.enabled {
            return EventPropagation::Continue;
        }
        match event {
            Event::PointerDown(e) => {
                cx.update_active(self.id());
                self.id.request_focus();
                self.held = true;
                self.update_from_pointer(e.pos);
                EventPropagation::Stop
            }
            Event::PointerMove(e) => {
                if self.held {
                    self.update_from_pointer(e.pos);
                    EventPropagation::Stop
                } else {
                    EventPropagation::Continue
                }
            }
            Event::PointerUp(_) => {
                self.held = false;
                EventPropagation::Continue
            }
            Event::FocusLost => {
                self.held = false;
                EventPropagation::Continue
            }
            Event::KeyDown(ke) => {
                if self.handle_key(&ke.key.logical_key) {
                    EventPropagation::Stop
                } else {
                    EventPropagation::Continue
                }
            }
            _ => EventPropagation::Continue,
        }
    }

    fn compute_layout(&mut self, _cx: &mut ComputeLayoutCx) -> Option<Rect> {
        let layout = self.id.get_layout().unwrap_or_default();
        if layout.size != self.size {
            self.size = layout.size;
            self.place_thumb();
        }
        None
    }

    fn paint(&mut self, cx: &mut PaintCx) {
        let bounds = self.bounds();
        if bounds.width() == 0.0 || bounds.height() == 0.0 {
            return;
        }
        let radius = constants::TRACK_THICKNESS / 2.0;

        cx.fill(
            &self.anchors.track_rect(bounds).to_rounded_rect(radius),
            constants::TRACK_COLOR,
            0.0,
        );
        cx.fill(
            &self.anchors.fill_rect(bounds).to_rounded_rect(radius),
            constants::FILL_COLOR,
            0.0,
        );

        // Thumb (filled disc with a ring)
        let center = self.anchors.thumb_center(bounds);
        let r = constants::THUMB_RADIUS;
        cx.fill(&Circle::new(center, r), Color::WHITE, 0.0);
        cx.stroke(
            &Circle::new(center, r),
            Color::rgba8(0, 0, 0, 80),
            &floem::kurbo::Stroke::new(1.0),
        );
        cx.stroke(
            &Circle::new(center, r - 3.0),
            constants::FILL_COLOR,
            &floem::kurbo::Stroke::new(2.0),
        );

        if self.anchors.is_disabled() {
            cx.fill(
                &bounds.to_rounded_rect(constants::THUMB_RADIUS),
                constants::DISABLED_VEIL,
                0.0,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantize::SnapMode;

    const R: f64 = constants::THUMB_RADIUS;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn fraction_handles_degenerate_ranges() {
        assert_eq!(value_fraction(0.5, 0.0, 1.0), 0.5);
        assert_eq!(value_fraction(2.0, 0.0, 1.0), 1.0);
        assert_eq!(value_fraction(0.5, 1.0, 1.0), 0.0);
        assert_eq!(value_fraction(0.5, 1.0, 0.0), 0.0);
        assert_eq!(value_fraction(f64::NAN, 0.0, 1.0), 0.0);
    }

    #[test]
    fn horizontal_value_grows_rightwards() {
        let bounds = Rect::new(0.0, 0.0, 100.0 + 2.0 * R, 16.0);
        let config = SliderConfig::default();
        let at = |x: f64| value_at(Point::new(x, 8.0), bounds, Axis::Horizontal, R, &config);
        assert_eq!(at(0.0), Some(0.0));
        assert!(close(at(R + 25.0).unwrap_or(-1.0), 0.25));
        assert_eq!(at(500.0), Some(1.0));
    }

    #[test]
    fn vertical_value_grows_upwards() {
        let bounds = Rect::new(0.0, 0.0, 16.0, 100.0 + 2.0 * R);
        let config = SliderConfig::default();
        let at = |y: f64| value_at(Point::new(8.0, y), bounds, Axis::Vertical, R, &config);
        assert_eq!(at(bounds.height()), Some(0.0));
        assert!(close(at(R + 25.0).unwrap_or(-1.0), 0.75));
        assert_eq!(at(0.0), Some(1.0));
    }

    #[test]
    fn pointer_values_snap_to_steps() {
        let bounds = Rect::new(0.0, 0.0, 100.0 + 2.0 * R, 16.0);
        let config = SliderConfig::default().with_range(0.0, 10.0).with_step(2.0);
        let v = value_at(Point::new(R + 73.0, 8.0), bounds, Axis::Horizontal, R, &config);
        assert_eq!(v, Some(8.0));
        let truncating = config.with_snap(SnapMode::Truncate);
        let v = value_at(Point::new(R + 73.0, 8.0), bounds, Axis::Horizontal, R, &truncating);
        assert!(close(v.unwrap_or(-1.0), 6.0));
    }

    #[test]
    fn no_travel_room_yields_nothing() {
        let bounds = Rect::new(0.0, 0.0, 2.0 * R, 16.0);
        let config = SliderConfig::default();
        assert_eq!(value_at(Point::ZERO, bounds, Axis::Horizontal, R, &config), None);
    }

    #[test]
    fn snapped_values_stay_in_range() {
        let config = SliderConfig::default().with_range(0.0, 9.0).with_step(4.0);
        assert_eq!(constrain_value(8.9, &config), 8.0);
        assert_eq!(constrain_value(11.0, &config), 9.0);
        assert_eq!(constrain_value(-3.0, &config), 0.0);
    }

    #[test]
    fn range_and_step_changes_refit_the_value() {
        let mut config = SliderConfig::default().with_range(0.0, 10.0).with_value(7.0);
        assert_eq!(apply_change(&mut config, PropertyChange::Max(5.0)), Some(5.0));
        assert_eq!(config.max, 5.0);

        let mut config = SliderConfig::default().with_range(0.0, 10.0).with_value(7.0);
        assert_eq!(apply_change(&mut config, PropertyChange::Min(8.0)), Some(8.0));

        let mut config = SliderConfig::default().with_range(0.0, 10.0).with_value(7.0);
        assert_eq!(apply_change(&mut config, PropertyChange::Step(Some(4.0))), Some(8.0));
        assert_eq!(config.step, Some(4.0));
    }

    #[test]
    fn fitting_values_are_left_alone() {
        let mut config = SliderConfig::default().with_range(0.0, 1.0).with_value(0.3);
        assert_eq!(apply_change(&mut config, PropertyChange::Step(Some(0.1))), None);
        assert_eq!(apply_change(&mut config, PropertyChange::Value(0.35)), None);
        assert_eq!(config.value, 0.35);
        assert_eq!(apply_change(&mut config, PropertyChange::Enabled(false)), None);
        assert!(!config.enabled);
    }

    #[test]
    fn keyboard_nudges_by_step_or_percent() {
        let stepped = SliderConfig::default().with_range(0.0, 10.0).with_step(2.0);
        assert_eq!(nudge(4.0, &stepped, true), 6.0);
        assert_eq!(nudge(0.0, &stepped, false), 0.0);
        let continuous = SliderConfig::default().with_range(0.0, 200.0);
        assert!(close(nudge(100.0, &continuous, true), 102.0));
    }

    #[test]
    fn thumb_repin_replaces_previous_pin() {
        let mut anchors = SliderAnchors::new(Axis::Horizontal, R);
        anchors.place_thumb(0.5, 100.0 + 2.0 * R, R);
        anchors.place_thumb(0.25, 100.0 + 2.0 * R, R);
        let pins: Vec<_> = anchors
            .layout()
            .constraints(anchors.thumb())
            .iter()
            .filter(|c| c.identifier.as_deref() == Some(constants::THUMB_PIN))
            .collect();
        assert_eq!(pins.len(), 1);
        assert!(close(pins[0].constant, R + 25.0));
    }

    #[test]
    fn parts_resolve_horizontally() {
        let bounds = Rect::new(0.0, 0.0, 100.0 + 2.0 * R, 16.0);
        let mut anchors = SliderAnchors::new(Axis::Horizontal, R);
        anchors.place_thumb(0.5, bounds.width(), R);
        assert_eq!(anchors.thumb_center(bounds), Point::new(R + 50.0, 8.0));
        assert_eq!(anchors.track_rect(bounds), Rect::new(R, 6.0, R + 100.0, 10.0));
        assert_eq!(anchors.fill_rect(bounds), Rect::new(R, 6.0, R + 50.0, 10.0));
    }

    #[test]
    fn parts_resolve_vertically() {
        let bounds = Rect::new(0.0, 0.0, 16.0, 100.0 + 2.0 * R);
        let mut anchors = SliderAnchors::new(Axis::Vertical, R);
        anchors.place_thumb(0.25, bounds.height(), R);
        assert_eq!(anchors.thumb_center(bounds), Point::new(8.0, R + 75.0));
        assert_eq!(anchors.track_rect(bounds), Rect::new(6.0, R, 10.0, R + 100.0));
        assert_eq!(anchors.fill_rect(bounds), Rect::new(6.0, R + 75.0, 10.0, R + 100.0));
    }

    #[test]
    fn disabling_owns_a_single_overlay() {
        let mut anchors = SliderAnchors::new(Axis::Horizontal, R);
        let before = anchors.layout().active().count();
        anchors.set_disabled(true);
        anchors.set_disabled(true);
        assert!(anchors.is_disabled());
        assert_eq!(anchors.layout().active().count(), before + 4);
        anchors.set_disabled(false);
        assert!(!anchors.is_disabled());
        assert_eq!(anchors.layout().active().count(), before);
    }
}
