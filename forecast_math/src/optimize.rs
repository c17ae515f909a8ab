//! Derivative-free minimization with the Nelder-Mead simplex method.
//!
//! Coordinates are clamped into optional box bounds after every move. The
//! objective may return `f64::INFINITY` (or NaN, treated the same way) to mark
//! points outside a feasible region; the simplex then moves away from them.

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

const REFLECTION: f64 = 1.0;
const EXPANSION: f64 = 2.0;
const CONTRACTION: f64 = 0.5;
const SHRINK: f64 = 0.5;

/// Stopping rules for [`nelder_mead`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NelderMeadConfig {
    /// Iteration cap
    pub max_iterations: usize,
    /// Largest allowed coordinate distance between the best vertex and any other
    pub x_tolerance: f64,
    /// Largest allowed objective spread across the simplex
    pub f_tolerance: f64,
}

impl Default for NelderMeadConfig {
    fn default() -> Self {
        Self {
            max_iterations: 5000,
            x_tolerance: 1e-6,
            f_tolerance: 1e-8,
        }
    }
}

impl NelderMeadConfig {
    /// Check that the stopping rules can actually terminate
    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(MathError::InvalidInput(
                "max_iterations must be greater than zero".to_string(),
            ));
        }
        if !(self.x_tolerance > 0.0 && self.f_tolerance > 0.0) {
            return Err(MathError::InvalidInput(
                "Tolerances must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Outcome of a minimization
#[derive(Debug, Clone, PartialEq)]
pub struct Minimum {
    /// Best point found
    pub point: Vec<f64>,
    /// Objective value at `point`
    pub value: f64,
    /// Iterations performed
    pub iterations: usize,
    /// Whether both tolerances were met before the iteration cap
    pub converged: bool,
}

fn clamp_into(point: &mut [f64], bounds: Option<&[(f64, f64)]>) {
    if let Some(bounds) = bounds {
        for (x, &(lo, hi)) in point.iter_mut().zip(bounds) {
            *x = x.clamp(lo, hi);
        }
    }
}

fn along(from: &[f64], to: &[f64], t: f64) -> Vec<f64> {
    from.iter().zip(to).map(|(a, b)| a + t * (b - a)).collect()
}

/// Minimize `objective` starting from `initial`.
///
/// Returns an error for an empty starting point, mismatched bounds, or a
/// starting point whose objective value is not finite. Running out of
/// iterations is not an error; check [`Minimum::converged`].
pub fn nelder_mead<F>(
    objective: F,
    initial: &[f64],
    bounds: Option<&[(f64, f64)]>,
    config: &NelderMeadConfig,
) -> Result<Minimum>
where
    F: Fn(&[f64]) -> f64,
{
    let n = initial.len();
    if n == 0 {
        return Err(MathError::InvalidInput(
            "Cannot optimize over zero parameters".to_string(),
        ));
    }
    if let Some(b) = bounds {
        if b.len() != n {
            return Err(MathError::InvalidInput(format!(
                "Expected {} bounds, got {}",
                n,
                b.len()
            )));
        }
        if b.iter().any(|(lo, hi)| lo > hi) {
            return Err(MathError::InvalidInput(
                "Lower bound exceeds upper bound".to_string(),
            ));
        }
    }
    config.validate()?;

    let eval = |x: &[f64]| {
        let v = objective(x);
        if v.is_nan() {
            f64::INFINITY
        } else {
            v
        }
    };

    let mut start = initial.to_vec();
    clamp_into(&mut start, bounds);
    let start_value = eval(&start);
    if !start_value.is_finite() {
        return Err(MathError::OptimizationError(
            "Objective is not finite at the starting point".to_string(),
        ));
    }

    let mut simplex = Vec::with_capacity(n + 1);
    let mut values = Vec::with_capacity(n + 1);
    simplex.push(start.clone());
    values.push(start_value);
    for i in 0..n {
        let step = if start[i] != 0.0 { 0.05 * start[i] } else { 0.00025 };
        let mut vertex = start.clone();
        vertex[i] += step;
        clamp_into(&mut vertex, bounds);
        if vertex[i] == start[i] {
            vertex[i] -= step;
            clamp_into(&mut vertex, bounds);
        }
        values.push(eval(&vertex));
        simplex.push(vertex);
    }

    let mut iterations = 0;
    let mut converged = false;

    while iterations < config.max_iterations {
        // Order vertices best-first
        let mut order: Vec<usize> = (0..=n).collect();
        order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
        simplex = order.iter().map(|&i| simplex[i].clone()).collect();
        values = order.iter().map(|&i| values[i]).collect();

        let best = &simplex[0];
        let x_spread = simplex[1..]
            .iter()
            .flat_map(|v| v.iter().zip(best).map(|(a, b)| (a - b).abs()))
            .fold(0.0_f64, f64::max);
        let f_spread = values[1..]
            .iter()
            .map(|v| (v - values[0]).abs())
            .fold(0.0_f64, f64::max);
        if x_spread <= config.x_tolerance && f_spread <= config.f_tolerance {
            converged = true;
            break;
        }

        iterations += 1;

        let mut centroid = vec![0.0; n];
        for vertex in &simplex[..n] {
            for (c, x) in centroid.iter_mut().zip(vertex) {
                *c += x / n as f64;
            }
        }

        let worst = simplex[n].clone();
        let worst_value = values[n];

        let mut reflected = along(&centroid, &worst, -REFLECTION);
        clamp_into(&mut reflected, bounds);
        let reflected_value = eval(&reflected);

        if reflected_value < values[0] {
            let mut expanded = along(&centroid, &reflected, EXPANSION);
            clamp_into(&mut expanded, bounds);
            let expanded_value = eval(&expanded);
            if expanded_value < reflected_value {
                simplex[n] = expanded;
                values[n] = expanded_value;
            } else {
                simplex[n] = reflected;
                values[n] = reflected_value;
            }
            continue;
        }

        if reflected_value < values[n - 1] {
            simplex[n] = reflected;
            values[n] = reflected_value;
            continue;
        }

        let (target, target_value) = if reflected_value < worst_value {
            (reflected, reflected_value)
        } else {
            (worst, worst_value)
        };
        let mut contracted = along(&centroid, &target, CONTRACTION);
        clamp_into(&mut contracted, bounds);
        let contracted_value = eval(&contracted);

        if contracted_value <= target_value {
            simplex[n] = contracted;
            values[n] = contracted_value;
            continue;
        }

        let best = simplex[0].clone();
        for i in 1..=n {
            let mut shrunk = along(&best, &simplex[i], SHRINK);
            clamp_into(&mut shrunk, bounds);
            values[i] = eval(&shrunk);
            simplex[i] = shrunk;
        }
    }

    let best = (0..=n)
        .min_by(|&a, &b| values[a].total_cmp(&values[b]))
        .unwrap_or(0);

    Ok(Minimum {
        point: simplex[best].clone(),
        value: values[best],
        iterations,
        converged,
    })
}
