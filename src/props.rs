//! Observable slider configuration.
//!
//! Every observable field is listed in [`SliderProperty`] and backed by its
//! own signal, so observers subscribe to exactly the fields they render.

use floem::reactive::{create_effect, RwSignal, SignalGet};

use crate::quantize::SnapMode;

/// Plain-data slider settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderConfig {
    pub value: f64,
    pub min: f64,
    pub max: f64,
    /// `None` for a continuous slider.
    pub step: Option<f64>,
    pub snap: SnapMode,
    pub enabled: bool,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            value: 0.0,
            min: 0.0,
            max: 1.0,
            step: None,
            snap: SnapMode::Round,
            enabled: true,
        }
    }
}

impl SliderConfig {
    pub fn with_value(mut self, value: f64) -> Self {
        self.value = value;
        self
    }

    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    pub fn with_step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
    }

    pub fn with_snap(mut self, snap: SnapMode) -> Self {
        self.snap = snap;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SliderProperty {
    Value,
    Min,
    Max,
    Step,
    Snap,
    Enabled,
}

impl SliderProperty {
    pub const ALL: [SliderProperty; 6] = [
        SliderProperty::Value,
        SliderProperty::Min,
        SliderProperty::Max,
        SliderProperty::Step,
        SliderProperty::Snap,
        SliderProperty::Enabled,
    ];
}

/// A property together with its new value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropertyChange {
    Value(f64),
    Min(f64),
    Max(f64),
    Step(Option<f64>),
    Snap(SnapMode),
    Enabled(bool),
}

impl PropertyChange {
    pub fn property(&self) -> SliderProperty {
        match self {
            PropertyChange::Value(_) => SliderProperty::Value,
            PropertyChange::Min(_) => SliderProperty::Min,
            PropertyChange::Max(_) => SliderProperty::Max,
            PropertyChange::Step(_) => SliderProperty::Step,
            PropertyChange::Snap(_) => SliderProperty::Snap,
            PropertyChange::Enabled(_) => SliderProperty::Enabled,
        }
    }
}

/// Reactive slider settings, one signal per field.
#[derive(Clone, Copy)]
pub struct SliderProps {
    pub value: RwSignal<f64>,
    pub min: RwSignal<f64>,
    pub max: RwSignal<f64>,
    pub step: RwSignal<Option<f64>>,
    pub snap: RwSignal<SnapMode>,
    pub enabled: RwSignal<bool>,
}

impl Default for SliderProps {
    fn default() -> Self {
        Self::from_config(SliderConfig::default())
    }
}

impl SliderProps {
    pub fn from_config(config: SliderConfig) -> Self {
        Self {
            value: RwSignal::new(config.value),
            min: RwSignal::new(config.min),
            max: RwSignal::new(config.max),
            step: RwSignal::new(config.step),
            snap: RwSignal::new(config.snap),
            enabled: RwSignal::new(config.enabled),
        }
    }

    /// Wrap an existing value signal, taking everything else from `config`.
    pub fn with_value_signal(value: RwSignal<f64>, config: SliderConfig) -> Self {
        Self {
            value,
            ..Self::from_config(config)
        }
    }

    /// Current settings, without tracking.
    pub fn snapshot(&self) -> SliderConfig {
        SliderConfig {
            value: self.value.get_untracked(),
            min: self.min.get_untracked(),
            max: self.max.get_untracked(),
            step: self.step.get_untracked(),
            snap: self.snap.get_untracked(),
            enabled: self.enabled.get_untracked(),
        }
    }

    /// Read one property, tracking it in the current reactive scope.
    pub fn read(&self, property: SliderProperty) -> PropertyChange {
        match property {
            SliderProperty::Value => PropertyChange::Value(self.value.get()),
            SliderProperty::Min => PropertyChange::Min(self.min.get()),
            SliderProperty::Max => PropertyChange::Max(self.max.get()),
            SliderProperty::Step => PropertyChange::Step(self.step.get()),
            SliderProperty::Snap => PropertyChange::Snap(self.snap.get()),
            SliderProperty::Enabled => PropertyChange::Enabled(self.enabled.get()),
        }
    }

    /// Call `on_change` with the property's value now and after every change.
    pub fn subscribe(
        &self,
        property: SliderProperty,
        on_change: impl Fn(PropertyChange) + 'static,
    ) {
        let props = *self;
        create_effect(move |_| on_change(props.read(property)));
    }

    pub fn subscribe_all(&self, on_change: impl Fn(PropertyChange) + Clone + 'static) {
        for property in SliderProperty::ALL {
            self.subscribe(property, on_change.clone());
        }
    }
}
