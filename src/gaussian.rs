//! Gaussian elimination over the frontier's constraint systems.
//!
//! A region's equations form `Ax = b` where each x is a hidden cell
//! (0 = safe, 1 = mine). Rows are reduced over the reals with partial
//! pivoting; integer semantics are recovered afterwards by tolerance
//! comparison. Rows left with a single variable force that cell.

/// Tolerance for every floating-point comparison in the reducer and the
/// enumerator.
pub const EPSILON: f64 = 1e-5;

#[inline(always)]
pub fn approx_eq(lhs: f64, rhs: f64) -> bool {
    (lhs - rhs).abs() < EPSILON
}

#[inline(always)]
pub fn is_zero(value: f64) -> bool {
    value.abs() < EPSILON
}

#[inline(always)]
pub fn greater(lhs: f64, rhs: f64) -> bool {
    lhs - rhs > EPSILON
}

#[inline(always)]
pub fn less(lhs: f64, rhs: f64) -> bool {
    rhs - lhs > EPSILON
}

/// Reduce `matrix` (n variable columns plus a trailing rhs column) to
/// reduced row-echelon form in place, truncating to its pivot rows, and
/// return the variables the reduction forces as `(column, is_mine)` pairs.
///
/// A row reduced to a single variable with rhs outside {0, 1} means the
/// caller built a contradictory system; that is a contract violation and
/// panics.
pub fn eliminate(matrix: &mut Vec<Vec<f64>>) -> Vec<(usize, bool)> {
    let row_count = matrix.len();
    if row_count == 0 {
        return Vec::new();
    }
    let width = matrix[0].len();
    debug_assert!(width >= 2);
    debug_assert!(matrix.iter().all(|row| row.len() == width));

    let mut pivot_count = 0usize;
    for column in 0..width - 1 {
        // Partial pivoting: the not-yet-fixed row with the largest
        // magnitude in this column.
        let mut best = pivot_count;
        for row in pivot_count + 1..row_count {
            if greater(matrix[row][column].abs(), matrix[best][column].abs()) {
                best = row;
            }
        }
        if is_zero(matrix[best][column]) {
            // Free variable.
            continue;
        }
        matrix.swap(pivot_count, best);

        let pivot = matrix[pivot_count][column];
        for row in 0..row_count {
            if row == pivot_count || is_zero(matrix[row][column]) {
                continue;
            }
            let factor = matrix[row][column] / pivot;
            for index in 0..width {
                let delta = factor * matrix[pivot_count][index];
                matrix[row][index] -= delta;
            }
        }
        let scale = 1.0 / pivot;
        for value in &mut matrix[pivot_count] {
            *value *= scale;
        }

        pivot_count += 1;
        if pivot_count == row_count {
            break;
        }
    }
    matrix.truncate(pivot_count);

    let mut forced = Vec::new();
    for row in matrix.iter() {
        let mut single = None;
        for column in 0..width - 1 {
            if is_zero(row[column]) {
                continue;
            }
            if single.is_none() {
                single = Some(column);
            } else {
                single = None;
                break;
            }
        }
        let Some(column) = single else { continue };
        let rhs = row[width - 1];
        if is_zero(rhs) {
            forced.push((column, false));
        } else if approx_eq(rhs, 1.0) {
            forced.push((column, true));
        } else {
            panic!("contradictory constraint system: x{} = {}", column, rhs);
        }
    }
    forced
}
