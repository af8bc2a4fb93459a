/*
    Nyx, blazing fast astrodynamics
    Copyright (C) 2023 Christopher Rabotin <christopher.rabotin@gmail.com>

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU Affero General Public License as published
    by the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU Affero General Public License for more details.

    You should have received a copy of the GNU Affero General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/

use super::{RK, RK4Fixed};
use crate::linalg::SVector;
use crate::time::{Duration, Epoch, Unit};

/// Integrates the provided derivative from `t_old` to `t_new` with the classical RK4.
///
/// The interval is split into the smallest number of equal sub-steps such that none is longer than `max_step`
/// (at least one sub-step). The derivative is expressed per `unit` of time, e.g. radians per day when `unit` is
/// `Unit::Day`. A zero `max_step` leads to a single step over the whole interval.
///
/// Sub-step boundaries are computed in integer nanoseconds, and the last one is exactly `t_new`: two calls with the
/// same inputs return bit-identical results.
pub fn integrate<const N: usize, F, E>(
    derivative: F,
    t_old: Epoch,
    y0: &SVector<f64, N>,
    t_new: Epoch,
    max_step: Duration,
    unit: Unit,
) -> Result<SVector<f64, N>, E>
where
    F: Fn(Epoch, &SVector<f64, N>) -> Result<SVector<f64, N>, E>,
{
    integrate_with::<RK4Fixed, N, F, E>(derivative, t_old, y0, t_new, max_step, unit)
}

/// Same as `integrate` but with any fixed step Runge Kutta tableau.
pub fn integrate_with<R: RK, const N: usize, F, E>(
    derivative: F,
    t_old: Epoch,
    y0: &SVector<f64, N>,
    t_new: Epoch,
    max_step: Duration,
    unit: Unit,
) -> Result<SVector<f64, N>, E>
where
    F: Fn(Epoch, &SVector<f64, N>) -> Result<SVector<f64, N>, E>,
{
    if t_new == t_old {
        return Ok(*y0);
    }

    let total_ns = (t_new - t_old).total_nanoseconds();
    let num_steps = substep_count(total_ns, max_step.total_nanoseconds().abs());

    let mut y = *y0;
    let mut t_i = t_old;
    for step_no in 1..=num_steps {
        let t_next = if step_no == num_steps {
            t_new
        } else {
            t_old + Duration::from_total_nanoseconds(total_ns * step_no / num_steps)
        };
        y = single_step::<R, N, F, E>(&derivative, t_i, &y, t_next - t_i, unit)?;
        t_i = t_next;
    }

    Ok(y)
}

/// Smallest number of equal sub-steps such that each is at most `max_ns` long.
fn substep_count(total_ns: i128, max_ns: i128) -> i128 {
    if max_ns == 0 {
        return 1;
    }
    let span = total_ns.abs();
    ((span + max_ns - 1) / max_ns).max(1)
}

/// Performs one explicit Runge Kutta step of duration `step` from `(t, y)`.
fn single_step<R: RK, const N: usize, F, E>(
    derivative: &F,
    t: Epoch,
    y: &SVector<f64, N>,
    step: Duration,
    unit: Unit,
) -> Result<SVector<f64, N>, E>
where
    F: Fn(Epoch, &SVector<f64, N>) -> Result<SVector<f64, N>, E>,
{
    let h = step.to_unit(unit);
    let mut k = Vec::with_capacity(R::STAGES);
    k.push(derivative(t, y)?);

    let mut a_idx: usize = 0;
    for i in 0..(R::STAGES - 1) {
        // c_i is the sum of the a_ij of this row, and w_i = \sum_j a_ij k_j
        let mut ci: f64 = 0.0;
        let mut wi = SVector::<f64, N>::zeros();
        for kj in &k[0..i + 1] {
            let a_ij = R::A_COEFFS[a_idx];
            ci += a_ij;
            wi += a_ij * kj;
            a_idx += 1;
        }
        k.push(derivative(t + step * ci, &(y + h * wi))?);
    }

    let mut next_state = *y;
    for (i, ki) in k.iter().enumerate() {
        next_state += h * R::B_COEFFS[i] * ki;
    }

    Ok(next_state)
}
