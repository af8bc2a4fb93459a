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

/*! # nyx-attitude

Time-indexed attitude engine: computes the instantaneous orientation of a spacecraft or celestial body as a unit quaternion.

Orientation sources include numerically integrated and closed-form scanning laws selected by activation time,
quaternion sample files interpolated with nlerp or slerp, and a local-vertical-local-horizontal frame derived from
the motion of a tracked body.
*/

/// Provides the fixed step Runge Kutta integrator used by the numerical scanning laws.
pub mod propagators;

/// Provides the nominal sun and the conversions from heliotropic angles to an inertial attitude.
pub mod cosmic;

/// Attitude regimes: scanning laws, the interval index, its builder and the orientation server.
pub mod attitude;

/// Orientation providers which are updated every tick: quaternion sample interpolation and LVLH.
pub mod orientation;

/// All the input/output needs for this library, including regime descriptors and the server configuration.
pub mod io;

#[macro_use]
extern crate log;
extern crate hifitime;
extern crate nalgebra as na;

/// Re-export of hifitime
pub mod time {
    pub use hifitime::*;
}

/// Re-export nalgebra
pub mod linalg {
    pub use na::base::*;
    pub use na::geometry::*;
}

pub use self::attitude::{AttitudeIndex, AttitudeStrategy, OrientationServer};
pub use self::orientation::OrientationProvider;
