use cropyield_model::{
    render, Advisory, AdvisoryThresholds, DashboardContext, ForestConfig, InputVector,
};
use once_cell::sync::Lazy;
use proptest::prelude::*;
use std::path::PathBuf;

// Property-based tests for the render pass
// Trained once; every case shares the same immutable context.

static CONTEXT: Lazy<DashboardContext> = Lazy::new(|| {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data/wheat_yield_data.csv");
    let config = ForestConfig {
        n_estimators: 25,
        ..ForestConfig::default()
    };
    DashboardContext::initialize(path, &config, AdvisoryThresholds::default())
        .expect("bundled dataset should train")
});

fn arbitrary_input() -> impl Strategy<Value = InputVector> {
    (200.0f64..=1000.0, 20.0f64..=30.0, 20.0f64..=40.0)
        .prop_map(|(rainfall, temperature, nitrogen)| InputVector::new(rainfall, temperature, nitrogen))
}

proptest! {
    #[test]
    fn prediction_is_finite_and_repeatable(input in arbitrary_input()) {
        let first = CONTEXT.predict(&input);
        let second = CONTEXT.predict(&input);

        prop_assert!(first.is_finite());
        prop_assert!(first >= 0.0);
        prop_assert_eq!(first.to_bits(), second.to_bits());
    }
}

proptest! {
    #[test]
    fn render_is_pure(input in arbitrary_input()) {
        let first = render(&CONTEXT, input);
        let second = render(&CONTEXT, input);

        prop_assert_eq!(first, second);
    }
}

proptest! {
    #[test]
    fn inputs_always_within_bounds(
        rainfall in any::<f64>(),
        temperature in any::<f64>(),
        nitrogen in any::<f64>(),
    ) {
        let input = InputVector::new(rainfall, temperature, nitrogen);

        prop_assert!((200.0..=1000.0).contains(&input.rainfall_mm()));
        prop_assert!((20.0..=30.0).contains(&input.temperature_c()));
        prop_assert!((20.0..=40.0).contains(&input.soil_nitrogen_mgkg()));
    }
}

proptest! {
    #[test]
    fn advisory_branches_are_exclusive(
        prediction in 0.0f64..8.0,
        rainfall in 200.0f64..=1000.0,
        nitrogen in 20.0f64..=40.0,
    ) {
        let advisories = AdvisoryThresholds::default().evaluate(prediction, rainfall, nitrogen);

        let reduces = advisories.contains(&Advisory::ReduceIrrigation);
        let low_yield_advice = advisories.contains(&Advisory::IncreaseIrrigation)
            || advisories.contains(&Advisory::ApplyNitrogenFertilizer);

        prop_assert!(!(reduces && low_yield_advice));
        prop_assert!(advisories.len() <= 2);
        if prediction < 3.5 {
            prop_assert!(!reduces);
        } else {
            prop_assert!(!low_yield_advice);
        }
    }
}
