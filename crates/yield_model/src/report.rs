//! Render pass: prediction, advisories, importances and the text report.

use serde::Serialize;

use crate::context::DashboardContext;
use crate::dataset::FEATURE_COUNT;
use crate::inputs::{InputVector, RAINFALL, SOIL_NITROGEN, TEMPERATURE};
use crate::recommend::Advisory;

pub const REPORT_FILENAME: &str = "yield_report.txt";
pub const REPORT_CONTENT_TYPE: &str = "text/plain";

/// Display names for the importance chart, in feature order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = ["Rainfall", "Temperature", "Soil Nitrogen"];

pub const IMPORTANCE_CHART_TITLE: &str = "What Factors Affect Yield the Most?";

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FeatureImportance {
    pub feature: &'static str,
    pub importance: f64,
}

/// Everything one render pass produces.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReportView {
    pub input: InputVector,
    pub prediction: f64,
    pub prediction_display: String,
    pub advisories: Vec<Advisory>,
    pub feature_importances: Vec<FeatureImportance>,
    pub report_text: String,
}

/// Pure function of the context and input; no state is touched.
pub fn render(ctx: &DashboardContext, input: InputVector) -> ReportView {
    let prediction = ctx.predict(&input);
    let advisories = ctx.recommend(prediction, &input);

    let feature_importances = FEATURE_NAMES
        .iter()
        .zip(ctx.model().feature_importances())
        .map(|(&feature, &importance)| FeatureImportance {
            feature,
            importance,
        })
        .collect();

    ReportView {
        input,
        prediction,
        prediction_display: format_prediction(prediction),
        report_text: report_text(&input, prediction, &advisories),
        advisories,
        feature_importances,
    }
}

pub fn format_prediction(prediction: f64) -> String {
    format!("{prediction:.2} tons/ha")
}

/// Plain-text report offered for download.
pub fn report_text(input: &InputVector, prediction: f64, advisories: &[Advisory]) -> String {
    let mut report = format!(
        "
Crop Yield Prediction Report
----------------------------
Rainfall: {} mm
Temperature: {} °C
Soil Nitrogen: {} mg/kg
Predicted Yield: {}

Recommendations:
",
        RAINFALL.format(input.rainfall_mm()),
        TEMPERATURE.format(input.temperature_c()),
        SOIL_NITROGEN.format(input.soil_nitrogen_mgkg()),
        format_prediction(prediction),
    );

    for advisory in advisories {
        report.push_str("- ");
        report.push_str(advisory.report_line());
        report.push('\n');
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_prediction() {
        assert_eq!(format_prediction(3.456), "3.46 tons/ha");
        assert_eq!(format_prediction(4.0), "4.00 tons/ha");
    }

    #[test]
    fn test_report_layout() {
        let input = InputVector::new(400.0, 22.5, 25.0);
        let advisories = [Advisory::IncreaseIrrigation, Advisory::ApplyNitrogenFertilizer];

        let expected = "
Crop Yield Prediction Report
----------------------------
Rainfall: 400 mm
Temperature: 22.5 °C
Soil Nitrogen: 25 mg/kg
Predicted Yield: 3.00 tons/ha

Recommendations:
- Increase irrigation with drip systems.
- Apply 25-35 kg/ha nitrogen fertilizer.
";
        assert_eq!(report_text(&input, 3.0, &advisories), expected);
    }

    #[test]
    fn test_report_without_advisories() {
        let report = report_text(&InputVector::default(), 4.0, &[]);
        assert!(report.ends_with("Recommendations:\n"));
        assert!(report.contains("Temperature: 24.0 °C\n"));
    }
}
