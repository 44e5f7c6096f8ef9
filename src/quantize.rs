//! Step quantization for slider values.
//!
//! A step that is zero, negative, subnormal or non-finite means the slider
//! is continuous and values pass through untouched.

/// How a raw position snaps to the step grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SnapMode {
    /// Nearest grid line, ties away from zero.
    #[default]
    Round,
    /// Grid line below, by remainder.
    Truncate,
}

fn usable_step(step: f64) -> bool {
    step.is_normal() && step > 0.0
}

/// `value - (value % step)`, using the sign-preserving remainder.
pub fn truncate(value: f64, step: f64) -> f64 {
    if !usable_step(step) || !value.is_finite() {
        return value;
    }
    value - value % step
}

/// Ratios at or past this are already integral in f64.
const INTEGRAL_RATIO: f64 = 4_503_599_627_370_496.0; // 2^52

/// Nearest multiple of `step`.
pub fn round(value: f64, step: f64) -> f64 {
    if !usable_step(step) || !value.is_finite() {
        return value;
    }
    let q = value / step;
    if !q.is_finite() || q.abs() >= INTEGRAL_RATIO {
        return value;
    }
    q.round() * step
}

/// Quantize `value` on a grid anchored at `origin` rather than zero.
pub fn snap(value: f64, origin: f64, step: Option<f64>, mode: SnapMode) -> f64 {
    let Some(step) = step else {
        return value;
    };
    let offset = value - origin;
    let snapped = match mode {
        SnapMode::Round => round(offset, step),
        SnapMode::Truncate => truncate(offset, step),
    };
    origin + snapped
}

/// A continuous value paired with its step grid.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StepValue {
    pub value: f64,
    pub step: Option<f64>,
}

impl StepValue {
    pub fn new(value: f64, step: Option<f64>) -> Self {
        Self { value, step }
    }

    pub fn continuous(value: f64) -> Self {
        Self { value, step: None }
    }

    pub fn truncated(&self) -> f64 {
        self.step.map_or(self.value, |s| truncate(self.value, s))
    }

    pub fn rounded(&self) -> f64 {
        self.step.map_or(self.value, |s| round(self.value, s))
    }

    pub fn quantized(&self, mode: SnapMode) -> f64 {
        match mode {
            SnapMode::Round => self.rounded(),
            SnapMode::Truncate => self.truncated(),
        }
    }
}
