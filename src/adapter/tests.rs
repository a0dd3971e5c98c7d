// Adapter tests against realistic result-file layouts
//
// Each test builds the datasets a solver export would contain and checks the
// signal each model's adapter picks for a test variant.

use super::*;
use crate::container::{Dataset, JsonContainer, MemoryContainer};
use serde_json::json;

fn time(n: usize) -> Dataset {
    Dataset::vector((0..n).map(|i| i as f64 * 0.1).collect())
}

fn rows(data: &[&[f64]]) -> Dataset {
    Dataset::from_rows(&data.iter().map(|r| r.to_vec()).collect::<Vec<_>>()).unwrap()
}

/// Quaternion rows for rotations about +y
fn quaternions_about_y(angles: &[f64]) -> Dataset {
    let rows: Vec<Vec<f64>> = angles
        .iter()
        .map(|a| vec![(a / 2.0).cos(), 0.0, (a / 2.0).sin(), 0.0])
        .collect();
    Dataset::from_rows(&rows).unwrap()
}

fn assert_close(actual: &[f64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len());
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < 1e-12, "{a} != {e}");
    }
}

#[test]
fn test_f3of_dt1_surge_of_base() {
    let c = MemoryContainer::new("dt1.json")
        .with("/results/time/time", time(3))
        .with(
            "/results/model/bodies/body1/position",
            rows(&[&[0.5, 0.0, -9.0], &[0.25, 0.0, -9.0], &[0.0, 0.0, -9.0]]),
        );
    let sig = adapter_for(ModelKind::F3of)
        .extract(&c, &"decay_dt1".into())
        .unwrap();
    assert_eq!(sig.series.values(), &[0.5, 0.25, 0.0]);
    assert_eq!(sig.unit_label, "Surge (m)");
}

#[test]
fn test_f3of_dt2_prefers_angle_field() {
    let c = MemoryContainer::new("dt2.json")
        .with("/results/time", time(2))
        .with(
            "/results/bodies/body1/orientation_xyz",
            rows(&[&[0.0, 0.1, 0.0], &[0.0, 0.05, 0.0]]),
        )
        .with(
            "/results/bodies/body1/orientation_quaternion",
            quaternions_about_y(&[0.9, 0.9]),
        );
    let sig = adapter_for(ModelKind::F3of)
        .extract(&c, &"decay_dt2".into())
        .unwrap();
    assert_eq!(sig.series.values(), &[0.1, 0.05]);
    assert_eq!(sig.unit_label, "Pitch (rad)");
}

#[test]
fn test_f3of_dt2_quaternion_fallback_uses_cardan() {
    let angles = [0.2, -0.1, 0.0];
    let c = MemoryContainer::new("dt2.json")
        .with("/time", time(3))
        .with(
            "/results/model/bodies/body1/orientation_quaternion",
            quaternions_about_y(&angles),
        );
    let sig = adapter_for(ModelKind::F3of)
        .extract(&c, &"decay_dt2".into())
        .unwrap();
    assert_close(sig.series.values(), &angles);
}

#[test]
fn test_f3of_dt3_bundles_both_flaps() {
    let c = MemoryContainer::new("dt3.json")
        .with("/results/time/time", time(2))
        .with(
            "/results/model/bodies/body2/orientation_xyz",
            rows(&[&[0.0, 0.3, 0.0], &[0.0, 0.2, 0.0]]),
        )
        .with(
            "/results/model/bodies/body3/orientation_quaternion",
            quaternions_about_y(&[-0.3, -0.2]),
        );
    let adapter = adapter_for(ModelKind::F3of);
    let bundle = adapter.extract_bundle(&c, &"decay_dt3".into()).unwrap();

    assert_eq!(bundle.names().collect::<Vec<_>>(), vec!["fore", "aft"]);
    assert_eq!(bundle.get("fore").unwrap().series.values(), &[0.3, 0.2]);
    assert_close(bundle.get("aft").unwrap().series.values(), &[-0.3, -0.2]);

    // Single extraction returns the primary (fore) flap
    let primary = adapter.extract(&c, &"decay_dt3".into()).unwrap();
    assert_eq!(primary.series.values(), &[0.3, 0.2]);
}

#[test]
fn test_f3of_dt3_missing_aft_flap_fails() {
    let c = MemoryContainer::new("dt3.json")
        .with("/results/time/time", time(2))
        .with(
            "/results/model/bodies/body2/orientation_xyz",
            rows(&[&[0.0, 0.3, 0.0], &[0.0, 0.2, 0.0]]),
        );
    let err = adapter_for(ModelKind::F3of)
        .extract_bundle(&c, &"decay_dt3".into())
        .unwrap_err();
    assert!(matches!(err, RegressError::SignalNotFound { ref body, .. } if body == "body3"));
}

#[test]
fn test_available_extraction_leaves_out_missing_flap() {
    let c = MemoryContainer::new("dt3.json")
        .with("/results/time/time", time(2))
        .with(
            "/results/model/bodies/body2/orientation_xyz",
            rows(&[&[0.0, 0.3, 0.0], &[0.0, 0.2, 0.0]]),
        );
    let adapter = adapter_for(ModelKind::F3of);
    let bundle = adapter.extract_available(&c, &"decay_dt3".into()).unwrap();
    assert_eq!(bundle.names().collect::<Vec<_>>(), vec!["fore"]);
    assert_eq!(
        bundle.get("fore").unwrap().source.as_deref(),
        Some("/results/model/bodies/body2/orientation_xyz")
    );

    let empty = MemoryContainer::new("dt3.json").with("/results/time/time", time(2));
    let err = adapter.extract_available(&empty, &"decay_dt3".into()).unwrap_err();
    assert!(matches!(err, RegressError::SignalNotFound { ref body, .. } if body == "body2"));
}

#[test]
fn test_oswec_matrix_quaternion_fallback() {
    let angles = [0.4, 0.1];
    let c = MemoryContainer::new("oswec.json")
        .with("/results/time/time", time(2))
        .with(
            "/results/model/bodies/body1/orientation",
            quaternions_about_y(&angles),
        )
        // Not consulted: OSWEC only probes `orientation` for quaternions
        .with(
            "/results/model/bodies/body1/orientation_quaternion",
            quaternions_about_y(&[1.0, 1.0]),
        );
    let sig = adapter_for(ModelKind::Oswec)
        .extract(&c, &"decay".into())
        .unwrap();
    assert_close(sig.series.values(), &angles);
    assert_eq!(sig.unit_label, "Pitch (rad)");
}

#[test]
fn test_oswec_heave_fallback() {
    let c = MemoryContainer::new("oswec.json")
        .with("/results/time/time", time(3))
        .with(
            "/results/bodies/body1/z",
            Dataset::vector(vec![-1.0, -0.8, -0.9]),
        );
    let sig = adapter_for(ModelKind::Oswec)
        .extract(&c, &"decay".into())
        .unwrap();
    assert_eq!(sig.series.values(), &[-1.0, -0.8, -0.9]);
    assert_eq!(sig.unit_label, "Heave (m)");
}

#[test]
fn test_oswec_five_column_orientation_is_not_a_quaternion() {
    let c = MemoryContainer::new("oswec.json")
        .with("/results/time/time", time(1))
        .with(
            "/results/model/bodies/body1/orientation",
            rows(&[&[1.0, 0.0, 0.0, 0.0, 0.0]]),
        );
    let err = adapter_for(ModelKind::Oswec)
        .extract(&c, &"decay".into())
        .unwrap_err();
    assert!(matches!(err, RegressError::SignalNotFound { .. }));
}

#[test]
fn test_sphere_heave_from_json_container() {
    let c = JsonContainer::from_value(
        "sphere.json",
        json!({
            "results": {
                "time": { "time": [0.0, 0.5, 1.0] },
                "model": { "bodies": { "body1": {
                    "position": [[0.0, 0.0, 5.0], [0.0, 0.0, 2.0], [0.0, 0.0, -1.0]]
                } } }
            }
        }),
    );
    let sig = adapter_for(ModelKind::IeaSphere)
        .extract(&c, &"decay".into())
        .unwrap();
    assert_eq!(sig.series.time(), &[0.0, 0.5, 1.0]);
    assert_eq!(sig.series.values(), &[5.0, 2.0, -1.0]);
}

#[test]
fn test_rm3_bundle_float_and_plate() {
    let c = MemoryContainer::new("rm3.json")
        .with("/results/time/time", time(2))
        .with(
            "/results/model/bodies/body1/position",
            rows(&[&[0.0, 0.0, 1.0], &[0.0, 0.0, 0.5]]),
        )
        .with(
            "/results/bodies/body2/position",
            rows(&[&[0.0, 0.0, -21.0], &[0.0, 0.0, -21.5]]),
        );
    let bundle = adapter_for(ModelKind::Rm3)
        .extract_bundle(&c, &"decay".into())
        .unwrap();
    assert_eq!(bundle.primary().unwrap().0, "float");
    assert_eq!(bundle.get("plate").unwrap().series.values(), &[-21.0, -21.5]);
}

#[test]
fn test_single_strategy_bundle_named_after_quantity() {
    let c = MemoryContainer::new("sphere.json")
        .with("/results/time/time", time(1))
        .with("/results/bodies/body1/z", Dataset::vector(vec![0.3]));
    let bundle = adapter_for(ModelKind::IeaSphere)
        .extract_bundle(&c, &"decay".into())
        .unwrap();
    assert_eq!(bundle.names().collect::<Vec<_>>(), vec!["heave"]);
}

#[test]
fn test_missing_time_vector() {
    let c = MemoryContainer::new("empty.json");
    let err = adapter_for(ModelKind::Rm3)
        .extract(&c, &"decay".into())
        .unwrap_err();
    assert!(matches!(err, RegressError::TimeVectorNotFound { .. }));
}

#[test]
fn test_unmapped_variant_falls_back_to_default() {
    let c = MemoryContainer::new("f3of.json")
        .with("/results/time/time", time(2))
        .with(
            "/results/bodies/body1/position",
            rows(&[&[1.0, 0.0, 0.0], &[2.0, 0.0, 0.0]]),
        );
    let sig = adapter_for(ModelKind::F3of)
        .extract(&c, &"decay_dt9".into())
        .unwrap();
    assert_eq!(sig.unit_label, "Surge (m)");
}

#[test]
fn test_unsupported_variant_is_an_error() {
    let c = MemoryContainer::new("f3of.json").with("/results/time/time", time(1));
    let err = adapter_for(ModelKind::F3of)
        .extract(&c, &"regular_waves".into())
        .unwrap_err();
    assert!(matches!(err, RegressError::UnsupportedVariant { .. }));
    assert!(err.is_configuration());
}

#[test]
fn test_extraction_is_deterministic() {
    let c = MemoryContainer::new("rm3.json")
        .with("/results/time/time", time(2))
        .with("/results/bodies/body1/z", Dataset::vector(vec![0.1, 0.2]))
        .with("/results/bodies/body2/z", Dataset::vector(vec![0.3, 0.4]));
    let adapter = adapter_for(ModelKind::Rm3);
    let a = adapter.extract_bundle(&c, &"decay".into()).unwrap();
    let b = adapter.extract_bundle(&c, &"decay".into()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_registry_matches_model() {
    for model in ModelKind::ALL {
        assert_eq!(adapter_for(model).model(), model);
    }
}

#[test]
fn test_model_variant_parsing() {
    let mv: ModelVariant = "F3OF/Decay_DT3".parse().unwrap();
    assert_eq!(mv.model, ModelKind::F3of);
    assert_eq!(mv.variant.as_str(), "decay_dt3");
    assert_eq!(mv.to_string(), "f3of/decay_dt3");

    let sphere: ModelVariant = "sphere/decay".parse().unwrap();
    assert_eq!(sphere.model, ModelKind::IeaSphere);

    assert!("rm3".parse::<ModelVariant>().is_err());
    assert!("wecsim/decay".parse::<ModelVariant>().is_err());
    assert!("rm3/".parse::<ModelVariant>().is_err());
}
