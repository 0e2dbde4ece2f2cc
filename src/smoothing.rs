//! 1-2-1 spatial smoothing.
//!
//! Applies a repeated `[0.25, 0.5, 0.25]` stencil along chosen axes of a 2-D
//! field. Each axis carries its own boundary rule: periodic wrap (required
//! for longitude) or reflective edge replication. Missing values (NaN) are
//! preserved: the mask observed on entry is re-applied to the result, and
//! single-cell gaps next to valid data are filled for the duration of the
//! stencil so that valid cells adjacent to missing data still smooth over
//! defined neighbours.

use ndarray::{Array2, Axis};

/// Boundary handling for one smoothing axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundaryRule {
    /// Wrap around (longitude)
    Periodic,
    /// Replicate the edge value
    Reflective,
}

/// One axis to smooth along, with its boundary rule.
#[derive(Clone, Copy, Debug)]
pub struct SmoothAxis {
    pub axis: Axis,
    pub boundary: BoundaryRule,
}

impl SmoothAxis {
    /// Smooth along rows (the latitude index of model fields), reflective.
    pub fn lat() -> Self {
        Self {
            axis: Axis(0),
            boundary: BoundaryRule::Reflective,
        }
    }

    /// Smooth along columns (the longitude index of model fields), periodic.
    pub fn lon() -> Self {
        Self {
            axis: Axis(1),
            boundary: BoundaryRule::Periodic,
        }
    }
}

/// Apply `n_smooths` passes of the 1-2-1 stencil along each axis in turn.
///
/// Output shape and dimension order match the input; NaNs present in the
/// input are NaN in the output. Zero passes returns a copy of the input.
pub fn smooth121(field: &Array2<f64>, axes: &[SmoothAxis], n_smooths: usize) -> Array2<f64> {
    let mask: Vec<bool> = field.iter().map(|v| v.is_nan()).collect();
    let mut out = field.clone();

    for spec in axes {
        for _ in 0..n_smooths {
            out = smooth_once(&out, spec);
        }
    }

    // restore the original missing-value mask
    for (v, &missing) in out.iter_mut().zip(mask.iter()) {
        if missing {
            *v = f64::NAN;
        }
    }
    out
}

fn smooth_once(field: &Array2<f64>, spec: &SmoothAxis) -> Array2<f64> {
    let mut out = field.clone();

    let mut lane_buf: Vec<f64> = Vec::new();
    for (lane, mut out_lane) in field
        .lanes(spec.axis)
        .into_iter()
        .zip(out.lanes_mut(spec.axis))
    {
        let n = lane.len();
        // pad with one cell at each end according to the boundary rule
        lane_buf.clear();
        lane_buf.reserve(n + 2);
        match spec.boundary {
            BoundaryRule::Periodic => lane_buf.push(lane[n - 1]),
            BoundaryRule::Reflective => lane_buf.push(lane[0]),
        }
        lane_buf.extend(lane.iter().copied());
        match spec.boundary {
            BoundaryRule::Periodic => lane_buf.push(lane[0]),
            BoundaryRule::Reflective => lane_buf.push(lane[n - 1]),
        }

        fill_single_gaps(&mut lane_buf);

        for i in 0..n {
            out_lane[i] =
                0.25 * lane_buf[i] + 0.5 * lane_buf[i + 1] + 0.25 * lane_buf[i + 2];
        }
    }
    out
}

/// Backward then forward fill of NaN cells, one step each. Isolated gaps
/// borrow a neighbour's value; gaps of three or more cells keep NaN in
/// their interior.
fn fill_single_gaps(buf: &mut [f64]) {
    let n = buf.len();
    // backward fill: take the next value
    let snapshot: Vec<f64> = buf.to_vec();
    for i in 0..n - 1 {
        if snapshot[i].is_nan() && !snapshot[i + 1].is_nan() {
            buf[i] = snapshot[i + 1];
        }
    }
    // forward fill: take the previous value
    let snapshot: Vec<f64> = buf.to_vec();
    for i in 1..n {
        if snapshot[i].is_nan() && !snapshot[i - 1].is_nan() {
            buf[i] = snapshot[i - 1];
        }
    }
}
