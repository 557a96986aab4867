//! Sequential proximity clustering used by the table detector to build grid
//! candidates out of unordered line-segment endpoints.

/// Snap-and-dedupe a sorted multiset of coordinates: walk the sorted values,
/// folding each into the running cluster if it is within `tolerance` of the
/// cluster's current mean, otherwise starting a new cluster. Each cluster
/// collapses to its arithmetic mean.
///
/// This is distinct from a fixed-tolerance-to-last-value walk: the
/// comparison point is the cluster's mean-so-far, so a long run of values
/// drifting slowly does not escape tolerance of its own start.
pub fn snap_and_dedupe(values: &[f64], tolerance: f64) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());

    let mut positions = Vec::new();
    let mut cluster_sum = sorted[0];
    let mut cluster_count = 1u32;

    for &v in &sorted[1..] {
        let mean = cluster_sum / f64::from(cluster_count);
        if (v - mean).abs() <= tolerance {
            cluster_sum += v;
            cluster_count += 1;
        } else {
            positions.push(cluster_sum / f64::from(cluster_count));
            cluster_sum = v;
            cluster_count = 1;
        }
    }
    positions.push(cluster_sum / f64::from(cluster_count));
    positions
}

/// Group a sorted list of `(primary, secondary)` pairs by gaps in their
/// secondary coordinate wider than `gap`. Used to split lines sharing an
/// orientation into independent sub-grid clusters along their perpendicular
/// axis (e.g. clustering horizontal lines by their `top`).
pub fn cluster_by_gap(mut values: Vec<f64>, gap: f64) -> Vec<Vec<f64>> {
    if values.is_empty() {
        return Vec::new();
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let mut groups: Vec<Vec<f64>> = vec![vec![values[0]]];
    for &v in &values[1..] {
        let last = *groups.last().unwrap().last().unwrap();
        if v - last > gap {
            groups.push(vec![v]);
        } else {
            groups.last_mut().unwrap().push(v);
        }
    }
    groups
}
