use ndarray::{ArrayViewD, Axis};

use crate::foundation::error::{ConformError, ConformResult};

/// How far a conformed buffer is from a reference edit.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Comparison {
    /// Euclidean norm of `expected - actual` over all elements.
    pub l2_distance: f64,
    pub max_abs_diff: f64,
    /// Frames (along `Axis(0)`) with at least one differing element.
    pub mismatched_frames: Vec<usize>,
}

impl Comparison {
    pub fn is_exact(&self) -> bool {
        self.mismatched_frames.is_empty()
    }
}

pub fn compare(
    expected: ArrayViewD<'_, f64>,
    actual: ArrayViewD<'_, f64>,
) -> ConformResult<Comparison> {
    if expected.shape() != actual.shape() {
        return Err(ConformError::shape_mismatch(format!(
            "reference is {:?}, conformed output is {:?}",
            expected.shape(),
            actual.shape()
        )));
    }

    let mut sum_sq = 0.0f64;
    let mut max_abs_diff = 0.0f64;
    for (e, a) in expected.iter().zip(actual.iter()) {
        let d = e - a;
        sum_sq += d * d;
        max_abs_diff = max_abs_diff.max(d.abs());
    }

    let mismatched_frames = if expected.ndim() == 0 {
        Vec::new()
    } else {
        expected
            .axis_iter(Axis(0))
            .zip(actual.axis_iter(Axis(0)))
            .enumerate()
            .filter(|(_, (e, a))| e != a)
            .map(|(i, _)| i)
            .collect()
    };

    Ok(Comparison {
        l2_distance: sum_sq.sqrt(),
        max_abs_diff,
        mismatched_frames,
    })
}
