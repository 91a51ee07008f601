use approx::assert_relative_eq;
use fmm_series_rs::{
    ExpansionConfig, FarFieldExpansion, LocalExpansion, SeriesExpansionAux, Vector3D,
};
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rstest::{fixture, rstest};
use std::sync::Arc;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[fixture]
fn coulomb_aux() -> Arc<SeriesExpansionAux> {
    Arc::new(SeriesExpansionAux::from_config(&ExpansionConfig::default()).unwrap())
}

fn cluster(seed: u64, count: usize, center: Vector3D, half_width: f64) -> (Vec<Vector3D>, Vec<f64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let points = (0..count)
        .map(|_| {
            center
                + Vector3D::new(
                    rng.gen_range(-half_width..half_width),
                    rng.gen_range(-half_width..half_width),
                    rng.gen_range(-half_width..half_width),
                )
        })
        .collect();
    let weights = (0..count).map(|_| rng.gen_range(0.5..1.5)).collect();
    (points, weights)
}

fn direct_sum(points: &[Vector3D], weights: &[f64], target: Vector3D, power: f64) -> f64 {
    points
        .iter()
        .zip(weights)
        .map(|(p, w)| w * p.distance(&target).powf(-power))
        .sum()
}

fn far_field_of(
    aux: &Arc<SeriesExpansionAux>,
    center: Vector3D,
    points: &[Vector3D],
    weights: &[f64],
    order: usize,
) -> FarFieldExpansion {
    let mut far = FarFieldExpansion::new(center, aux.clone());
    for (p, w) in points.iter().zip(weights) {
        far.accumulate(*p, *w, order).unwrap();
    }
    far
}

/// Largest relative difference between the local expansion produced by
/// far-to-local translation and the far field itself, over points near the
/// local center
fn far_to_local_error(aux: &Arc<SeriesExpansionAux>, truncation_order: usize) -> f64 {
    let far_center = Vector3D::origin();
    let local_center = Vector3D::new(2.0, 2.5, 1.5);
    let (points, weights) = cluster(42, 10, far_center, 0.1);
    let far = far_field_of(aux, far_center, &points, &weights, truncation_order);

    let mut local = LocalExpansion::new(local_center, aux.clone());
    far.translate_to_local(&mut local, truncation_order).unwrap();
    assert_eq!(local.order(), Some(truncation_order));

    let (targets, _) = cluster(43, 20, local_center, 0.1);
    targets
        .iter()
        .map(|t| {
            let expected = far.evaluate_field(*t, truncation_order).unwrap();
            let actual = local.evaluate_field(*t, truncation_order).unwrap();
            (actual - expected).abs() / expected.abs()
        })
        .fold(0.0, f64::max)
}

#[rstest]
#[case(2, 1e-2)]
#[case(4, 1e-4)]
#[case(6, 1e-5)]
fn test_far_to_local_matches_far_field(
    coulomb_aux: Arc<SeriesExpansionAux>,
    #[case] truncation_order: usize,
    #[case] tolerance: f64,
) {
    init_logging();
    let error = far_to_local_error(&coulomb_aux, truncation_order);
    assert!(
        error <= tolerance,
        "order {} relative error {} above {}",
        truncation_order,
        error,
        tolerance
    );
}

#[rstest]
fn test_far_to_local_error_shrinks_with_order(coulomb_aux: Arc<SeriesExpansionAux>) {
    let low = far_to_local_error(&coulomb_aux, 2);
    let high = far_to_local_error(&coulomb_aux, 6);
    assert!(high < low, "order 6 error {} not below order 2 error {}", high, low);
}

#[rstest]
#[case(1.0)]
#[case(2.0)]
fn test_far_to_local_matches_direct_sum(#[case] power: f64) {
    let aux = Arc::new(SeriesExpansionAux::new(power, 8).unwrap());
    let far_center = Vector3D::new(-1.0, 0.5, 0.0);
    let local_center = Vector3D::new(3.0, -2.0, 2.5);
    let (points, weights) = cluster(5, 30, far_center, 0.2);
    let far = far_field_of(&aux, far_center, &points, &weights, 8);

    let mut local = LocalExpansion::new(local_center, aux);
    far.translate_to_local(&mut local, 8).unwrap();

    let (targets, _) = cluster(6, 10, local_center, 0.2);
    for t in targets {
        assert_relative_eq!(
            local.evaluate_field(t, 8).unwrap(),
            direct_sum(&points, &weights, t, power),
            max_relative = 1e-8
        );
    }
}

#[rstest]
fn test_far_to_local_accumulates_into_target(coulomb_aux: Arc<SeriesExpansionAux>) {
    let local_center = Vector3D::new(0.0, 0.0, 4.0);
    let (left, left_weights) = cluster(1, 6, Vector3D::new(-3.0, 0.0, 0.0), 0.2);
    let (right, right_weights) = cluster(2, 6, Vector3D::new(3.0, 0.0, 0.0), 0.2);

    let left_far = far_field_of(&coulomb_aux, Vector3D::new(-3.0, 0.0, 0.0), &left, &left_weights, 8);
    let right_far = far_field_of(&coulomb_aux, Vector3D::new(3.0, 0.0, 0.0), &right, &right_weights, 8);
    let empty = FarFieldExpansion::new(Vector3D::new(0.0, 3.0, 0.0), coulomb_aux.clone());

    let mut local = LocalExpansion::new(local_center, coulomb_aux);
    empty.translate_to_local(&mut local, 8).unwrap();
    assert_eq!(local.order(), None);

    left_far.translate_to_local(&mut local, 8).unwrap();
    right_far.translate_to_local(&mut local, 8).unwrap();

    let target = local_center + Vector3D::new(0.1, -0.1, 0.05);
    let exact = direct_sum(&left, &left_weights, target, 1.0)
        + direct_sum(&right, &right_weights, target, 1.0);
    assert_relative_eq!(local.evaluate_field(target, 8).unwrap(), exact, max_relative = 1e-6);
}

#[rstest]
fn test_far_to_local_keeps_higher_target_order(coulomb_aux: Arc<SeriesExpansionAux>) {
    let far_center = Vector3D::new(-3.0, 1.0, 0.0);
    let local_center = Vector3D::new(1.0, -1.0, 2.0);
    let (points, weights) = cluster(31, 5, far_center, 0.2);
    let far = far_field_of(&coulomb_aux, far_center, &points, &weights, 6);

    let mut local = LocalExpansion::new(local_center, coulomb_aux.clone());
    far.translate_to_local(&mut local, 6).unwrap();
    assert_eq!(local.order(), Some(6));

    far.translate_to_local(&mut local, 2).unwrap();
    assert_eq!(local.order(), Some(6));

    // A lower target order is still raised
    let mut fresh = LocalExpansion::new(local_center, coulomb_aux);
    fresh.set_order(1);
    far.translate_to_local(&mut fresh, 4).unwrap();
    assert_eq!(fresh.order(), Some(4));
}

#[rstest]
fn test_direct_local_accumulation(coulomb_aux: Arc<SeriesExpansionAux>) {
    let local_center = Vector3D::new(0.5, 0.5, 0.5);
    let (points, weights) = cluster(9, 12, Vector3D::new(-4.0, 3.0, 5.0), 0.5);

    let mut data = Array2::zeros((points.len(), 3));
    for (row, p) in points.iter().enumerate() {
        data[[row, 0]] = p.x;
        data[[row, 1]] = p.y;
        data[[row, 2]] = p.z;
    }
    let weight_array = Array1::from(weights.clone());

    let mut local = LocalExpansion::new(local_center, coulomb_aux);
    local
        .accumulate_coeffs(data.view(), weight_array.view(), 0..points.len(), 8)
        .unwrap();

    let (targets, _) = cluster(10, 16, local_center, 0.25);
    let mut target_data = Array2::zeros((targets.len(), 3));
    for (row, t) in targets.iter().enumerate() {
        target_data[[row, 0]] = t.x;
        target_data[[row, 1]] = t.y;
        target_data[[row, 2]] = t.z;
    }

    let values = local.evaluate_fields(target_data.view(), 8).unwrap();
    for (t, value) in targets.iter().zip(values) {
        assert_relative_eq!(value, direct_sum(&points, &weights, *t, 1.0), max_relative = 1e-9);
    }
}

#[rstest]
fn test_tree_pass_pipeline(coulomb_aux: Arc<SeriesExpansionAux>) {
    init_logging();
    let order = 8;

    // Upward pass: two leaves merged into their parent
    let parent_center = Vector3D::origin();
    let leaf_centers = [Vector3D::new(0.2, 0.2, 0.2), Vector3D::new(-0.2, -0.2, -0.2)];
    let mut parent = FarFieldExpansion::new(parent_center, coulomb_aux.clone());
    let mut all_points = Vec::new();
    let mut all_weights = Vec::new();
    for (seed, center) in leaf_centers.iter().enumerate() {
        let (points, weights) = cluster(seed as u64 + 50, 10, *center, 0.1);
        let leaf = far_field_of(&coulomb_aux, *center, &points, &weights, order);
        parent.translate_from_far_field(&leaf).unwrap();
        all_points.extend(points);
        all_weights.extend(weights);
    }

    // Interaction: parent applied to a well-separated region
    let region_center = Vector3D::new(4.0, 3.0, 3.5);
    let mut region = LocalExpansion::new(region_center, coulomb_aux.clone());
    parent.translate_to_local(&mut region, order).unwrap();

    // Downward pass: region pushed to one of its children
    let child_center = region_center + Vector3D::new(0.15, -0.1, 0.1);
    let mut child = LocalExpansion::new(child_center, coulomb_aux);
    region.translate_to_local(&mut child).unwrap();
    assert_eq!(child.order(), Some(order));

    let (targets, _) = cluster(77, 10, child_center, 0.05);
    for t in targets {
        assert_relative_eq!(
            child.evaluate_field(t, order).unwrap(),
            direct_sum(&all_points, &all_weights, t, 1.0),
            max_relative = 1e-6
        );
    }
}

#[test]
fn test_shared_tables_across_threads() {
    let aux = Arc::new(SeriesExpansionAux::new(1.0, 5).unwrap());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let aux = Arc::clone(&aux);
            std::thread::spawn(move || {
                let center = Vector3D::new(i as f64 * 10.0, 0.0, 0.0);
                let mut far = FarFieldExpansion::new(center, aux);
                far.accumulate(center + Vector3D::new(0.1, 0.1, 0.0), 1.0, 5).unwrap();
                far.evaluate_field(center + Vector3D::new(0.0, 0.0, 3.0), 5).unwrap()
            })
        })
        .collect();

    let values: Vec<f64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for value in &values {
        assert_eq!(value.to_bits(), values[0].to_bits());
    }
}
