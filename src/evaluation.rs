//! Quality measures for separated sources
//!
//! ICA recovers sources only up to order and sign, so estimated rows are compared to
//! reference signals through the absolute Pearson correlation and a best one-to-one
//! assignment. Non-Gaussianity of a single signal can be checked with [`kurtosis`] and
//! [`negentropy`].
use ndarray::{Array2, ArrayBase, Axis, Data, Ix1, Ix2};

use crate::Float;

/// Expected value of `log(cosh(v))` for a standard normal `v`
const GAUSSIAN_LOGCOSH: f64 = 0.374_567;

// Problems up to this size are solved exhaustively
const EXHAUSTIVE_LIMIT: usize = 8;

// Rows centered and scaled to unit norm, constant rows stay zero
fn normalized_rows<F: Float, D: Data<Elem = F>>(x: &ArrayBase<D, Ix2>) -> Array2<F> {
    let mut out = x.to_owned();
    for mut row in out.rows_mut() {
        let mean = row.mean().unwrap_or_else(F::zero);
        row.mapv_inplace(|v| v - mean);
        let norm = row.dot(&row).sqrt();
        if norm > F::epsilon() {
            row.mapv_inplace(|v| v / norm);
        } else {
            row.fill(F::zero());
        }
    }
    out
}

/// Absolute Pearson correlation between every row of `a` and every row of `b`
///
/// Entry `(i, j)` compares row `i` of `a` with row `j` of `b`. Rows without variance have
/// zero correlation with everything.
///
/// # Panics
///
/// If `a` and `b` do not have the same number of columns
pub fn abs_correlation_matrix<F, D1, D2>(a: &ArrayBase<D1, Ix2>, b: &ArrayBase<D2, Ix2>) -> Array2<F>
where
    F: Float,
    D1: Data<Elem = F>,
    D2: Data<Elem = F>,
{
    assert_eq!(
        a.ncols(),
        b.ncols(),
        "signals must have the same number of samples"
    );
    let a = normalized_rows(a);
    let b = normalized_rows(b);

    a.dot(&b.t()).mapv(|c| c.abs().min(F::one()))
}

/// Match estimated components to reference sources
///
/// Returns `(estimated row, reference row, absolute correlation)` for the one-to-one
/// assignment with the largest total correlation, sorted by reference row. Small problems are
/// solved exhaustively, larger ones greedily.
pub fn match_components<F, D1, D2>(
    estimated: &ArrayBase<D1, Ix2>,
    reference: &ArrayBase<D2, Ix2>,
) -> Vec<(usize, usize, F)>
where
    F: Float,
    D1: Data<Elem = F>,
    D2: Data<Elem = F>,
{
    let corr = abs_correlation_matrix(estimated, reference);

    // Assign every column to a distinct row, transposing if there are fewer rows
    let transposed = corr.nrows() < corr.ncols();
    let corr = if transposed {
        corr.reversed_axes()
    } else {
        corr
    };

    let assignment = if corr.ncols() <= EXHAUSTIVE_LIMIT {
        exhaustive_assignment(&corr)
    } else {
        greedy_assignment(&corr)
    };

    let mut matches: Vec<_> = assignment
        .into_iter()
        .enumerate()
        .map(|(col, row)| {
            let c = corr[(row, col)];
            if transposed {
                (col, row, c)
            } else {
                (row, col, c)
            }
        })
        .collect();
    matches.sort_by_key(|m| m.1);
    matches
}

// Row chosen for every column
fn exhaustive_assignment<F: Float>(corr: &Array2<F>) -> Vec<usize> {
    fn search<F: Float>(
        corr: &Array2<F>,
        col: usize,
        used: &mut Vec<bool>,
        current: &mut Vec<usize>,
        score: F,
        best: &mut (F, Vec<usize>),
    ) {
        if col == corr.ncols() {
            if score > best.0 || best.1.is_empty() {
                *best = (score, current.clone());
            }
            return;
        }
        for row in 0..corr.nrows() {
            if used[row] {
                continue;
            }
            used[row] = true;
            current.push(row);
            search(corr, col + 1, used, current, score + corr[(row, col)], best);
            current.pop();
            used[row] = false;
        }
    }

    let mut best = (F::zero(), Vec::new());
    search(
        corr,
        0,
        &mut vec![false; corr.nrows()],
        &mut Vec::with_capacity(corr.ncols()),
        F::zero(),
        &mut best,
    );
    best.1
}

fn greedy_assignment<F: Float>(corr: &Array2<F>) -> Vec<usize> {
    let mut assignment = vec![usize::MAX; corr.ncols()];
    let mut used_rows = vec![false; corr.nrows()];

    for _ in 0..corr.ncols() {
        let mut best: Option<(usize, usize, F)> = None;
        for ((row, col), &c) in corr.indexed_iter() {
            if used_rows[row] || assignment[col] != usize::MAX {
                continue;
            }
            if best.map_or(true, |(_, _, b)| c > b) {
                best = Some((row, col, c));
            }
        }
        if let Some((row, col, _)) = best {
            used_rows[row] = true;
            assignment[col] = row;
        }
    }

    assignment
}

/// Excess kurtosis, zero for a Gaussian signal
pub fn kurtosis<F: Float, D: Data<Elem = F>>(signal: &ArrayBase<D, Ix1>) -> F {
    let mean = match signal.mean() {
        Some(mean) => mean,
        None => return F::zero(),
    };
    let centered = signal.mapv(|v| v - mean);
    let m2 = centered.mapv(|v| v * v).mean().unwrap_or_else(F::zero);
    let m4 = centered.mapv(|v| v.powi(4)).mean().unwrap_or_else(F::zero);
    if m2 <= F::epsilon() {
        return F::zero();
    }

    m4 / (m2 * m2) - F::cast(3.)
}

/// Negentropy approximation `(E{log cosh(y)} - E{log cosh(v)})²` of the standardized signal
/// `y` against a standard normal `v`
pub fn negentropy<F: Float, D: Data<Elem = F>>(signal: &ArrayBase<D, Ix1>) -> F {
    let standardized = normalized_rows(&signal.view().insert_axis(Axis(0)));
    let scale = F::cast(signal.len()).sqrt();
    let row = standardized.row(0);
    if row.iter().all(|v| v.is_zero()) {
        return F::zero();
    }
    let logcosh = row
        .mapv(|v| (v * scale).cosh().ln())
        .mean()
        .unwrap_or_else(F::zero);

    (logcosh - F::cast(GAUSSIAN_LOGCOSH)).powi(2)
}
