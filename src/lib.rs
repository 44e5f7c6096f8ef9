//! # floem-stepper
//!
//! A stepped slider widget for [Floem](https://github.com/lapce/floem) that
//! works the same horizontally and vertically.
//!
//! The widget is built from three small pieces that are useful on their own:
//!
//! - [`geometry`]: axis-agnostic edge, center and sign lookups.
//! - [`quantize`]: truncating and rounding values onto a step grid.
//! - [`layout`]: anchor pinning that replaces, rather than stacks,
//!   constraints with the same signature.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use floem::prelude::*;
//! use floem_stepper::{step_slider, Axis, SliderConfig, SliderProps};
//!
//! let props = SliderProps::from_config(SliderConfig::default().with_range(0.0, 10.0).with_step(1.0));
//! // Use `step_slider(props, Axis::Vertical)` in your Floem view tree.
//! ```

pub mod constants;
pub mod geometry;
pub mod layout;
pub mod props;
pub mod quantize;
mod slider;

pub use geometry::{Attribute, Axis, AxisRole};
pub use layout::{
    attach_subview, pin_between, pin_constant, pin_to_parent, AnchorLayout, Constraint,
    LayoutEngine, NodeId, Pin, Priority, Relation, Signature,
};
pub use props::{PropertyChange, SliderConfig, SliderProperty, SliderProps};
pub use quantize::{SnapMode, StepValue};
pub use slider::{
    apply_change, constrain_value, nudge, slider, step_slider, value_at, value_fraction,
    SliderAnchors, StepSlider,
};
