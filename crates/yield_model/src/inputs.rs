//! Operator controls and the clamped input vector they produce.

use serde::Serialize;

use crate::dataset::FEATURE_COUNT;

/// A bounded slider.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Control {
    pub name: &'static str,
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    pub default: f64,
    pub step: f64,
    /// Decimal places shown for this control.
    pub precision: usize,
}

impl Control {
    /// Clamp into range and snap onto the step grid. Non-finite input falls
    /// back to the default.
    pub fn clamp(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return self.default;
        }

        let bounded = value.clamp(self.min, self.max);
        let steps = ((bounded - self.min) / self.step).round();
        let snapped = (self.min + steps * self.step).min(self.max);

        let scale = 10f64.powi(self.precision as i32);
        (snapped * scale).round() / scale
    }

    pub fn format(&self, value: f64) -> String {
        format!("{:.*}", self.precision, value)
    }
}

pub const RAINFALL: Control = Control {
    name: "rainfall",
    label: "Rainfall (mm)",
    min: 200.0,
    max: 1000.0,
    default: 500.0,
    step: 1.0,
    precision: 0,
};

pub const TEMPERATURE: Control = Control {
    name: "temperature",
    label: "Temperature (°C)",
    min: 20.0,
    max: 30.0,
    default: 24.0,
    step: 0.1,
    precision: 1,
};

pub const SOIL_NITROGEN: Control = Control {
    name: "soil_nitrogen",
    label: "Soil Nitrogen (mg/kg)",
    min: 20.0,
    max: 40.0,
    default: 30.0,
    step: 1.0,
    precision: 0,
};

/// Controls in model feature order.
pub const CONTROLS: [Control; FEATURE_COUNT] = [RAINFALL, TEMPERATURE, SOIL_NITROGEN];

/// Current control values. Always within bounds: every constructor clamps.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct InputVector {
    rainfall_mm: f64,
    temperature_c: f64,
    soil_nitrogen_mgkg: f64,
}

impl InputVector {
    pub fn new(rainfall_mm: f64, temperature_c: f64, soil_nitrogen_mgkg: f64) -> Self {
        Self {
            rainfall_mm: RAINFALL.clamp(rainfall_mm),
            temperature_c: TEMPERATURE.clamp(temperature_c),
            soil_nitrogen_mgkg: SOIL_NITROGEN.clamp(soil_nitrogen_mgkg),
        }
    }

    /// Missing values take the control default.
    pub fn from_partial(
        rainfall_mm: Option<f64>,
        temperature_c: Option<f64>,
        soil_nitrogen_mgkg: Option<f64>,
    ) -> Self {
        Self::new(
            rainfall_mm.unwrap_or(RAINFALL.default),
            temperature_c.unwrap_or(TEMPERATURE.default),
            soil_nitrogen_mgkg.unwrap_or(SOIL_NITROGEN.default),
        )
    }

    pub fn rainfall_mm(&self) -> f64 {
        self.rainfall_mm
    }

    pub fn temperature_c(&self) -> f64 {
        self.temperature_c
    }

    pub fn soil_nitrogen_mgkg(&self) -> f64 {
        self.soil_nitrogen_mgkg
    }

    pub fn as_features(&self) -> [f64; FEATURE_COUNT] {
        [self.rainfall_mm, self.temperature_c, self.soil_nitrogen_mgkg]
    }

    /// Query string reproducing this input, e.g. for the report download link.
    pub fn to_query(&self) -> String {
        format!(
            "{}={}&{}={}&{}={}",
            RAINFALL.name,
            RAINFALL.format(self.rainfall_mm),
            TEMPERATURE.name,
            TEMPERATURE.format(self.temperature_c),
            SOIL_NITROGEN.name,
            SOIL_NITROGEN.format(self.soil_nitrogen_mgkg),
        )
    }
}

impl Default for InputVector {
    fn default() -> Self {
        Self::new(RAINFALL.default, TEMPERATURE.default, SOIL_NITROGEN.default)
    }
}
