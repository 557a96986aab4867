//! Grid candidate construction: turns the endpoints of horizontal and
//! vertical line segments into candidate row/column boundaries.

use crate::clustering::{cluster_by_gap, snap_and_dedupe};
use crate::geometry::{LineSegment, Rect};

/// A `(XPositions, YPositions)` pair proposed by the detector before
/// validation, together with the bounding rectangle they imply.
#[derive(Debug, Clone)]
pub struct GridCandidate {
    pub x_positions: Vec<f64>,
    pub y_positions: Vec<f64>,
    pub bounds: Rect,
}

fn bounds_from_positions(x_positions: &[f64], y_positions: &[f64]) -> Rect {
    Rect::new(
        x_positions[0],
        y_positions[0],
        *x_positions.last().unwrap(),
        *y_positions.last().unwrap(),
    )
}

/// Build one candidate from the full set of horizontal/vertical lines.
/// Returns `None` if either axis snaps to fewer than 2 positions.
pub fn build_global_candidate(h_lines: &[LineSegment], v_lines: &[LineSegment], tolerance: f64) -> Option<GridCandidate> {
    let xs: Vec<f64> = v_lines.iter().map(|l| l.x1).collect();
    let ys: Vec<f64> = h_lines.iter().map(|l| l.y1).collect();

    let x_positions = snap_and_dedupe(&xs, tolerance);
    let y_positions = snap_and_dedupe(&ys, tolerance);

    if x_positions.len() < 2 || y_positions.len() < 2 {
        return None;
    }
    let bounds = bounds_from_positions(&x_positions, &y_positions);
    Some(GridCandidate { x_positions, y_positions, bounds })
}

/// When the global candidate fails validation, split lines along their
/// secondary axis (gap `3 * tolerance`) and pair every horizontal cluster
/// with every vertical cluster whose (tolerance-inflated) bounding boxes
/// overlap.
pub fn build_subgrid_candidates(h_lines: &[LineSegment], v_lines: &[LineSegment], tolerance: f64) -> Vec<GridCandidate> {
    let gap = tolerance * 3.0;

    // Cluster horizontal lines by their x-span (secondary axis for a
    // horizontal line is its horizontal extent); cluster vertical lines by
    // their y-span likewise. We cluster on the midpoint of the secondary
    // extent so a line's cluster membership is a single scalar.
    let h_secondary: Vec<f64> = h_lines.iter().map(|l| (l.x1 + l.x2) / 2.0).collect();
    let v_secondary: Vec<f64> = v_lines.iter().map(|l| (l.y1 + l.y2) / 2.0).collect();

    let h_groups = cluster_by_gap(h_secondary.clone(), gap);
    let v_groups = cluster_by_gap(v_secondary.clone(), gap);

    // Re-derive index membership for each group (cluster_by_gap only
    // returns values, not indices) by matching back against the input.
    let h_clusters: Vec<Vec<&LineSegment>> = h_groups
        .iter()
        .map(|group| {
            h_lines
                .iter()
                .filter(|l| group.contains(&((l.x1 + l.x2) / 2.0)))
                .collect()
        })
        .collect();
    let v_clusters: Vec<Vec<&LineSegment>> = v_groups
        .iter()
        .map(|group| {
            v_lines
                .iter()
                .filter(|l| group.contains(&((l.y1 + l.y2) / 2.0)))
                .collect()
        })
        .collect();

    let cluster_bounds = |lines: &[&LineSegment], horizontal: bool| -> Rect {
        if horizontal {
            let left = lines.iter().map(|l| l.x1).fold(f64::INFINITY, f64::min);
            let right = lines.iter().map(|l| l.x2).fold(f64::NEG_INFINITY, f64::max);
            let top = lines.iter().map(|l| l.y1).fold(f64::INFINITY, f64::min);
            let bottom = lines.iter().map(|l| l.y1).fold(f64::NEG_INFINITY, f64::max);
            Rect::new(left, top, right, bottom)
        } else {
            let top = lines.iter().map(|l| l.y1).fold(f64::INFINITY, f64::min);
            let bottom = lines.iter().map(|l| l.y2).fold(f64::NEG_INFINITY, f64::max);
            let left = lines.iter().map(|l| l.x1).fold(f64::INFINITY, f64::min);
            let right = lines.iter().map(|l| l.x1).fold(f64::NEG_INFINITY, f64::max);
            Rect::new(left, top, right, bottom)
        }
    };

    let mut candidates = Vec::new();
    for h_cluster in &h_clusters {
        if h_cluster.is_empty() {
            continue;
        }
        let h_box = cluster_bounds(h_cluster, true).inflate(tolerance);
        for v_cluster in &v_clusters {
            if v_cluster.is_empty() {
                continue;
            }
            let v_box = cluster_bounds(v_cluster, false).inflate(tolerance);
            if !h_box.intersects(&v_box) {
                continue;
            }
            let h_owned: Vec<LineSegment> = h_cluster.iter().map(|l| (*l).clone()).collect();
            let v_owned: Vec<LineSegment> = v_cluster.iter().map(|l| (*l).clone()).collect();
            if let Some(candidate) = build_global_candidate(&h_owned, &v_owned, tolerance) {
                candidates.push(candidate);
            }
        }
    }
    candidates
}
