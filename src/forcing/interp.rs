//! Bilinear regridding of climatology fields.

use ndarray::{Array1, Array2};
use thiserror::Error;

/// Error type for interpolator construction.
#[derive(Debug, Error)]
pub enum InterpError {
    /// Axis values must strictly increase
    #[error("axis {axis} is not strictly increasing")]
    NonMonotonicAxis { axis: &'static str },

    /// Field shape does not match the axes
    #[error("field shaped ({rows}, {cols}) does not match axes ({ny}, {nx})")]
    ShapeMismatch {
        rows: usize,
        cols: usize,
        ny: usize,
        nx: usize,
    },

    /// Axis too short for interpolation
    #[error("axis {axis} has {len} points, need at least 2")]
    AxisTooShort { axis: &'static str, len: usize },
}

/// Bilinear interpolator over a rectilinear (latitude × longitude) field.
///
/// Targets outside the source domain clamp to the edge value; source axes
/// must be strictly increasing.
#[derive(Clone, Debug)]
pub struct BilinearInterpolator {
    x: Array1<f64>,
    y: Array1<f64>,
    /// Values shaped (y, x)
    values: Array2<f64>,
}

impl BilinearInterpolator {
    /// Build an interpolator from source axes and a (y × x) field.
    pub fn new(
        x: Array1<f64>,
        y: Array1<f64>,
        values: Array2<f64>,
    ) -> Result<Self, InterpError> {
        if x.len() < 2 {
            return Err(InterpError::AxisTooShort {
                axis: "X",
                len: x.len(),
            });
        }
        if y.len() < 2 {
            return Err(InterpError::AxisTooShort {
                axis: "Y",
                len: y.len(),
            });
        }
        if !strictly_increasing(&x) {
            return Err(InterpError::NonMonotonicAxis { axis: "X" });
        }
        if !strictly_increasing(&y) {
            return Err(InterpError::NonMonotonicAxis { axis: "Y" });
        }
        let (rows, cols) = values.dim();
        if rows != y.len() || cols != x.len() {
            return Err(InterpError::ShapeMismatch {
                rows,
                cols,
                ny: y.len(),
                nx: x.len(),
            });
        }
        Ok(Self { x, y, values })
    }

    /// Interpolate onto target axes, returning a (y_new × x_new) field.
    pub fn interpolate_onto(&self, x_new: &Array1<f64>, y_new: &Array1<f64>) -> Array2<f64> {
        let x_cells: Vec<(usize, f64)> = x_new.iter().map(|&x| bracket(&self.x, x)).collect();
        let y_cells: Vec<(usize, f64)> = y_new.iter().map(|&y| bracket(&self.y, y)).collect();

        let mut out = Array2::zeros((y_new.len(), x_new.len()));
        for (jj, &(j, ty)) in y_cells.iter().enumerate() {
            for (ii, &(i, tx)) in x_cells.iter().enumerate() {
                let v00 = self.values[(j, i)];
                let v01 = self.values[(j, i + 1)];
                let v10 = self.values[(j + 1, i)];
                let v11 = self.values[(j + 1, i + 1)];
                let lo = v00 + tx * (v01 - v00);
                let hi = v10 + tx * (v11 - v10);
                out[(jj, ii)] = lo + ty * (hi - lo);
            }
        }
        out
    }
}

fn strictly_increasing(axis: &Array1<f64>) -> bool {
    axis.windows(2).into_iter().all(|w| w[1] > w[0])
}

/// Find the cell index and fractional position of `target` on `axis`,
/// clamping beyond the first/last cell.
fn bracket(axis: &Array1<f64>, target: f64) -> (usize, f64) {
    let n = axis.len();
    if target <= axis[0] {
        return (0, 0.0);
    }
    if target >= axis[n - 1] {
        return (n - 2, 1.0);
    }
    // binary search for the left cell edge
    let mut lo = 0;
    let mut hi = n - 1;
    while hi - lo > 1 {
        let mid = (lo + hi) / 2;
        if axis[mid] <= target {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    let t = (target - axis[lo]) / (axis[lo + 1] - axis[lo]);
    (lo, t)
}
