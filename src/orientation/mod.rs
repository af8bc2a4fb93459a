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

use crate::linalg::UnitQuaternion;
use crate::time::Epoch;
use snafu::prelude::*;
use std::path::PathBuf;

mod lvlh;
pub use lvlh::{EntityHandle, Lvlh, SceneGraph};

mod quaternion;
pub use quaternion::{InterpolationMethod, QuaternionInterpolator, TimeSample};

/// Anything which provides the orientation of a body as the simulation time advances.
pub trait OrientationProvider {
    /// Computes the orientation at the provided epoch, if this provider can
    fn update_orientation(&mut self, epoch: Epoch) -> Option<UnitQuaternion<f64>>;

    /// Last computed orientation, or the identity if none was computed
    fn current_orientation(&self) -> UnitQuaternion<f64>;

    fn has_orientation(&self) -> bool;
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum OrientationError {
    #[snafu(display("could not read quaternion samples from {}: {source}", path.display()))]
    SampleFile {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Normalized linear interpolation along the shortest path, `alpha` in [0, 1]
pub fn nlerp(
    q0: &UnitQuaternion<f64>,
    q1: &UnitQuaternion<f64>,
    alpha: f64,
) -> UnitQuaternion<f64> {
    let c0 = q0.coords;
    let c1 = if c0.dot(&q1.coords) < 0.0 {
        -q1.coords
    } else {
        q1.coords
    };
    let blend = c0 * (1.0 - alpha) + c1 * alpha;
    if blend.norm() < f64::EPSILON {
        return *q0;
    }
    UnitQuaternion::from_quaternion(crate::linalg::Quaternion::from(blend))
}

/// Spherical linear interpolation along the shortest path, `alpha` in [0, 1]
///
/// Falls back to `nlerp` when both quaternions are too close for the great circle to be well defined.
pub fn slerp(
    q0: &UnitQuaternion<f64>,
    q1: &UnitQuaternion<f64>,
    alpha: f64,
) -> UnitQuaternion<f64> {
    q0.try_slerp(q1, alpha, 1e-9)
        .unwrap_or_else(|| nlerp(q0, q1, alpha))
}
