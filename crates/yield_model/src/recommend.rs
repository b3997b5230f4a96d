//! Sustainability advisories derived from the prediction and inputs.

use serde::{Deserialize, Serialize};

/// Yield below which low-yield advice applies (tons/ha).
pub const LOW_YIELD_TONS_HA: f64 = 3.5;
/// Rainfall below which irrigation should increase (mm).
pub const DRY_RAINFALL_MM: f64 = 450.0;
/// Rainfall above which irrigation should decrease (mm).
pub const WET_RAINFALL_MM: f64 = 700.0;
/// Soil nitrogen below which fertilizer is advised (mg/kg).
pub const NITROGEN_FLOOR_MGKG: f64 = 30.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Advisory {
    IncreaseIrrigation,
    ApplyNitrogenFertilizer,
    ReduceIrrigation,
}

impl Advisory {
    pub fn headline(&self) -> &'static str {
        match self {
            Advisory::IncreaseIrrigation => "Increase Irrigation",
            Advisory::ApplyNitrogenFertilizer => "Improve Soil Fertility",
            Advisory::ReduceIrrigation => "Reduce Water Usage",
        }
    }

    pub fn detail(&self) -> &'static str {
        match self {
            Advisory::IncreaseIrrigation => "Use drip irrigation for 15% water savings.",
            Advisory::ApplyNitrogenFertilizer => "Apply 25-35 kg/ha nitrogen fertilizer.",
            Advisory::ReduceIrrigation => "Optimize irrigation to save 10-15% water.",
        }
    }

    /// Line used in the downloadable report.
    pub fn report_line(&self) -> &'static str {
        match self {
            Advisory::IncreaseIrrigation => "Increase irrigation with drip systems.",
            Advisory::ApplyNitrogenFertilizer => "Apply 25-35 kg/ha nitrogen fertilizer.",
            Advisory::ReduceIrrigation => "Reduce irrigation to conserve water.",
        }
    }
}

/// Decision table thresholds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisoryThresholds {
    pub low_yield_tons_ha: f64,
    pub dry_rainfall_mm: f64,
    pub wet_rainfall_mm: f64,
    pub nitrogen_floor_mgkg: f64,
}

impl Default for AdvisoryThresholds {
    fn default() -> Self {
        Self {
            low_yield_tons_ha: LOW_YIELD_TONS_HA,
            dry_rainfall_mm: DRY_RAINFALL_MM,
            wet_rainfall_mm: WET_RAINFALL_MM,
            nitrogen_floor_mgkg: NITROGEN_FLOOR_MGKG,
        }
    }
}

impl AdvisoryThresholds {
    /// Evaluate the decision table. Low-yield advice (irrigation, then
    /// fertilizer) and high-rainfall advice are mutually exclusive.
    pub fn evaluate(&self, prediction: f64, rainfall_mm: f64, soil_nitrogen_mgkg: f64) -> Vec<Advisory> {
        let mut advisories = Vec::new();

        if prediction < self.low_yield_tons_ha {
            if rainfall_mm < self.dry_rainfall_mm {
                advisories.push(Advisory::IncreaseIrrigation);
            }
            if soil_nitrogen_mgkg < self.nitrogen_floor_mgkg {
                advisories.push(Advisory::ApplyNitrogenFertilizer);
            }
        } else if rainfall_mm > self.wet_rainfall_mm {
            advisories.push(Advisory::ReduceIrrigation);
        }

        advisories
    }
}
