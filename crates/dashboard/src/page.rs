//! Server-side HTML for the dashboard page.

use cropyield_model::report::IMPORTANCE_CHART_TITLE;
use cropyield_model::{Control, Observation, ReportView, CONTROLS, REPORT_FILENAME};

const STYLE: &str = r#"
        body { font-family: Arial, sans-serif; margin: 0; background: #f5f5f5; color: #222; }
        .layout { display: flex; min-height: 100vh; }
        aside { width: 300px; padding: 24px; background: #fff; border-right: 1px solid #ddd; }
        main { flex: 1; padding: 24px 40px; }
        h1 { text-align: center; color: green; }
        .tagline { background: #e6f4ea; border-left: 4px solid #4CAF50; padding: 10px; }
        .control { margin-bottom: 18px; }
        .control label { display: block; font-weight: bold; }
        .metric { font-size: 2em; font-weight: bold; }
        .bar-row { display: flex; align-items: center; margin: 6px 0; }
        .bar-label { width: 130px; }
        .bar { background: #4CAF50; height: 18px; }
        .bar-value { margin-left: 8px; font-family: monospace; }
        table { border-collapse: collapse; }
        th, td { border: 1px solid #ccc; padding: 4px 10px; text-align: right; }
        footer { text-align: center; color: darkgreen; margin: 30px 0; }
"#;

/// Full dashboard page for one render pass.
pub fn render_page(view: &ReportView, observations: &[Observation]) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>AI Crop Yield Dashboard</title>
    <style>{STYLE}</style>
</head>
<body>
<div class="layout">
    <aside>
        <h2>Enter Environmental Conditions</h2>
        {sidebar}
    </aside>
    <main>
        <h1>Sustainable Agriculture AI Dashboard</h1>
        <p class="tagline">Using AI for Better Farming &amp; Sustainability!</p>

        <h2>Predicted Wheat Yield</h2>
        <div>Predicted Yield</div>
        <div class="metric">{prediction}</div>

        <h2>Sustainability Recommendations</h2>
        {advisories}

        <h2>Feature Importance</h2>
        {chart}

        <h2>Reference Data</h2>
        {table}

        <h2>Download Your Report</h2>
        <a href="/report?{query}" download="{filename}"><button type="button">Download Report</button></a>

        <footer><h4>Built with AI for Sustainable Farming</h4></footer>
    </main>
</div>
</body>
</html>
"#,
        sidebar = render_controls(view),
        prediction = view.prediction_display,
        advisories = render_advisories(view),
        chart = render_importance_chart(view),
        table = render_observations(observations),
        query = view.input.to_query(),
        filename = REPORT_FILENAME,
    )
}

fn render_controls(view: &ReportView) -> String {
    let values = view.input.as_features();
    let mut html = String::from(r#"<form method="get" action="/">"#);

    for (control, value) in CONTROLS.iter().zip(values) {
        html.push_str(&render_slider(control, value));
    }

    html.push_str(r#"<button type="submit">Predict</button></form>"#);
    html
}

fn render_slider(control: &Control, value: f64) -> String {
    format!(
        r#"<div class="control"><label for="{name}">{label}: <output>{display}</output></label><input type="range" id="{name}" name="{name}" min="{min}" max="{max}" step="{step}" value="{display}" oninput="this.previousElementSibling.lastElementChild.value = this.value" onchange="this.form.submit()"></div>"#,
        name = control.name,
        label = control.label,
        display = control.format(value),
        min = control.format(control.min),
        max = control.format(control.max),
        step = control.step,
    )
}

fn render_advisories(view: &ReportView) -> String {
    let mut html = String::from("<details open><summary>Suggested Actions</summary><ul>");

    if view.advisories.is_empty() {
        html.push_str("<li>No action needed for these conditions.</li>");
    }
    for advisory in &view.advisories {
        html.push_str(&format!(
            "<li><strong>{}</strong>: {}</li>",
            advisory.headline(),
            advisory.detail()
        ));
    }

    html.push_str("</ul></details>");
    html
}

fn render_importance_chart(view: &ReportView) -> String {
    let max = view
        .feature_importances
        .iter()
        .map(|f| f.importance)
        .fold(0.0_f64, f64::max);

    let mut html = format!(r#"<figure><figcaption>{IMPORTANCE_CHART_TITLE}</figcaption>"#);
    for entry in &view.feature_importances {
        let width = if max > 0.0 {
            entry.importance / max * 100.0
        } else {
            0.0
        };
        html.push_str(&format!(
            r#"<div class="bar-row"><span class="bar-label">{}</span><div class="bar" style="width: {:.1}%"></div><span class="bar-value">{:.3}</span></div>"#,
            entry.feature, width, entry.importance
        ));
    }
    html.push_str("</figure>");
    html
}

fn render_observations(observations: &[Observation]) -> String {
    let mut html = String::from(
        "<table><thead><tr><th>Rainfall_mm</th><th>Temperature_C</th><th>Soil_Nitrogen_mgkg</th><th>Yield_tons_ha</th></tr></thead><tbody>",
    );

    for obs in observations {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{:.1}</td><td>{}</td><td>{}</td></tr>",
            obs.rainfall_mm, obs.temperature_c, obs.soil_nitrogen_mgkg, obs.yield_tons_ha
        ));
    }

    html.push_str("</tbody></table>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use cropyield_model::{Advisory, FeatureImportance, InputVector};

    fn sample_view(advisories: Vec<Advisory>) -> ReportView {
        ReportView {
            input: InputVector::new(420.0, 22.4, 26.0),
            prediction: 3.14159,
            prediction_display: "3.14 tons/ha".to_string(),
            advisories,
            feature_importances: vec![
                FeatureImportance {
                    feature: "Rainfall",
                    importance: 0.6,
                },
                FeatureImportance {
                    feature: "Temperature",
                    importance: 0.1,
                },
                FeatureImportance {
                    feature: "Soil Nitrogen",
                    importance: 0.3,
                },
            ],
            report_text: String::new(),
        }
    }

    #[test]
    fn test_page_sections() {
        let observations = [Observation {
            rainfall_mm: 581.0,
            temperature_c: 29.0,
            soil_nitrogen_mgkg: 32.0,
            yield_tons_ha: 3.18,
        }];
        let html = render_page(&sample_view(vec![]), &observations);

        assert!(html.contains("Sustainable Agriculture AI Dashboard"));
        assert!(html.contains(r#"<div class="metric">3.14 tons/ha</div>"#));
        assert!(html.contains("What Factors Affect Yield the Most?"));
        assert!(html.contains("<td>581</td><td>29.0</td><td>32</td><td>3.18</td>"));
        assert!(html.contains(
            r#"href="/report?rainfall=420&temperature=22.4&soil_nitrogen=26" download="yield_report.txt""#
        ));
        assert!(html.contains("No action needed"));
    }

    #[test]
    fn test_sliders_carry_bounds_and_values() {
        let html = render_controls(&sample_view(vec![]));

        assert!(html.contains(r#"name="rainfall" min="200" max="1000" step="1" value="420""#));
        assert!(html.contains(r#"name="temperature" min="20.0" max="30.0" step="0.1" value="22.4""#));
        assert!(html.contains(r#"name="soil_nitrogen" min="20" max="40" step="1" value="26""#));
    }

    #[test]
    fn test_advisory_panel() {
        let html = render_advisories(&sample_view(vec![
            Advisory::IncreaseIrrigation,
            Advisory::ApplyNitrogenFertilizer,
        ]));

        assert!(html.contains(
            "<strong>Increase Irrigation</strong>: Use drip irrigation for 15% water savings."
        ));
        assert!(html.contains("<strong>Improve Soil Fertility</strong>"));
        assert!(!html.contains("No action needed"));
    }

    #[test]
    fn test_chart_scales_to_largest_score() {
        let html = render_importance_chart(&sample_view(vec![]));

        assert!(html.contains(r#"style="width: 100.0%""#));
        assert!(html.contains(r#"<span class="bar-value">0.300</span>"#));
        assert!(html.contains(r#"style="width: 50.0%""#));
    }
}
