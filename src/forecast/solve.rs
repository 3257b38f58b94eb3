//! Dense least squares via normal equations.
//!
//! The regressions here are tiny (a handful of lag columns), so a plain
//! Gaussian elimination with partial pivoting is enough; no linear algebra
//! dependency is warranted at this size.

use crate::error::AppError;

/// Solve min ||X b - y|| for b. `rows` are the rows of X, all of equal
/// length. Errors when the normal equations are singular.
pub(crate) fn least_squares(rows: &[Vec<f64>], y: &[f64]) -> Result<Vec<f64>, AppError> {
    let n = rows.len();
    if n == 0 || n != y.len() {
        return Err(AppError::Singular);
    }
    let k = rows[0].len();
    if k == 0 || n < k {
        return Err(AppError::Singular);
    }

    // Normal equations: A = X'X (k x k), b = X'y
    let mut a = vec![vec![0.0f64; k]; k];
    let mut b = vec![0.0f64; k];
    for (row, &yi) in rows.iter().zip(y.iter()) {
        for i in 0..k {
            b[i] += row[i] * yi;
            for j in i..k {
                a[i][j] += row[i] * row[j];
            }
        }
    }
    // Mirror the upper triangle
    for i in 0..k {
        for j in 0..i {
            a[i][j] = a[j][i];
        }
    }

    solve_system(&mut a, &mut b)?;
    Ok(b)
}

/// In-place Gaussian elimination with partial pivoting. On success `b` holds
/// the solution.
fn solve_system(a: &mut [Vec<f64>], b: &mut [f64]) -> Result<(), AppError> {
    let k = b.len();
    let scale: f64 = a
        .iter()
        .map(|row| row.iter().fold(0.0f64, |m, v| m.max(v.abs())))
        .fold(0.0f64, f64::max);
    let tol = 1e-12 * (1.0 + scale);

    for col in 0..k {
        // Partial pivot
        let mut pivot_row = col;
        let mut pivot_val = a[col][col].abs();
        for row in (col + 1)..k {
            let v = a[row][col].abs();
            if v > pivot_val {
                pivot_row = row;
                pivot_val = v;
            }
        }
        if pivot_val < tol {
            return Err(AppError::Singular);
        }
        if pivot_row != col {
            a.swap(pivot_row, col);
            b.swap(pivot_row, col);
        }

        for row in (col + 1)..k {
            let factor = a[row][col] / a[col][col];
            if factor == 0.0 {
                continue;
            }
            for j in col..k {
                a[row][j] -= factor * a[col][j];
            }
            b[row] -= factor * b[col];
        }
    }

    // Back substitution
    for col in (0..k).rev() {
        let mut sum = b[col];
        for j in (col + 1)..k {
            sum -= a[col][j] * b[j];
        }
        b[col] = sum / a[col][col];
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_line_fit() {
        // y = 2 + 3x
        let rows: Vec<Vec<f64>> = (0..10).map(|x| vec![1.0, x as f64]).collect();
        let y: Vec<f64> = (0..10).map(|x| 2.0 + 3.0 * x as f64).collect();
        let beta = least_squares(&rows, &y).unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-9);
        assert!((beta[1] - 3.0).abs() < 1e-9);
    }

    #[test]
    fn overdetermined_noisy_fit() {
        // y = 1 + 2a - b with symmetric perturbation that cancels in the fit
        let rows = vec![
            vec![1.0, 0.0, 0.0],
            vec![1.0, 1.0, 0.0],
            vec![1.0, 0.0, 1.0],
            vec![1.0, 1.0, 1.0],
            vec![1.0, 2.0, 1.0],
        ];
        let y: Vec<f64> = rows.iter().map(|r| 1.0 + 2.0 * r[1] - r[2]).collect();
        let beta = least_squares(&rows, &y).unwrap();
        assert!((beta[0] - 1.0).abs() < 1e-9);
        assert!((beta[1] - 2.0).abs() < 1e-9);
        assert!((beta[2] + 1.0).abs() < 1e-9);
    }

    #[test]
    fn singular_duplicate_columns() {
        let rows = vec![
            vec![1.0, 2.0, 2.0],
            vec![1.0, 3.0, 3.0],
            vec![1.0, 4.0, 4.0],
        ];
        let y = vec![1.0, 2.0, 3.0];
        assert!(matches!(
            least_squares(&rows, &y),
            Err(AppError::Singular)
        ));
    }

    #[test]
    fn underdetermined_is_singular() {
        let rows = vec![vec![1.0, 2.0, 3.0]];
        let y = vec![1.0];
        assert!(matches!(least_squares(&rows, &y), Err(AppError::Singular)));
    }

    #[test]
    fn empty_input_is_singular() {
        assert!(matches!(least_squares(&[], &[]), Err(AppError::Singular)));
    }

    #[test]
    fn pivoting_handles_zero_leading_entry() {
        // First diagonal entry of X'X would be fine, but make the system need
        // a swap inside elimination.
        let rows = vec![vec![0.0, 1.0], vec![1.0, 0.0], vec![1.0, 1.0]];
        let y = vec![2.0, 3.0, 5.0];
        let beta = least_squares(&rows, &y).unwrap();
        assert!((beta[0] - 3.0).abs() < 1e-9);
        assert!((beta[1] - 2.0).abs() < 1e-9);
    }
}
