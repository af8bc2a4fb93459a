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

use super::{NominalSun, OBLIQUITY_J2000_RAD};
use crate::linalg::{UnitQuaternion, Vector3};
use std::f64::consts::{FRAC_PI_2, TAU};
use std::fmt;

/// Heliotropic attitude angles of a spinning spacecraft, all in radians.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HeliotropicAngles {
    /// Solar aspect angle, between the spin axis and the nominal sun
    pub xi_rad: f64,
    /// Revolving (precession) phase of the spin axis around the nominal sun
    pub nu_rad: f64,
    /// Spin phase
    pub omega_rad: f64,
}

impl HeliotropicAngles {
    /// Builds the ICRS attitude quaternion given the nominal sun at the same epoch.
    pub fn to_quaternion(&self, sun: &NominalSun) -> UnitQuaternion<f64> {
        heliotropic_to_quaternion(sun.longitude_rad, self.xi_rad, self.nu_rad, self.omega_rad)
    }
}

impl fmt::Display for HeliotropicAngles {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "xi = {:.6} deg, nu = {:.6} deg, Omega = {:.6} deg",
            self.xi_rad.to_degrees(),
            self.nu_rad.rem_euclid(TAU).to_degrees(),
            self.omega_rad.rem_euclid(TAU).to_degrees()
        )
    }
}

/// Converts the heliotropic angles into the attitude quaternion, rotating the body frame into ICRS.
///
/// The rotation sequence is R1(ε) R3(λ) R1(ν - π/2) R2(π/2 - ξ) R3(Ω), where ε is the obliquity and λ the
/// longitude of the nominal sun.
pub fn heliotropic_to_quaternion(
    sun_lon_rad: f64,
    xi_rad: f64,
    nu_rad: f64,
    omega_rad: f64,
) -> UnitQuaternion<f64> {
    let q = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), OBLIQUITY_J2000_RAD)
        * UnitQuaternion::from_axis_angle(&Vector3::z_axis(), sun_lon_rad)
        * UnitQuaternion::from_axis_angle(&Vector3::x_axis(), nu_rad - FRAC_PI_2)
        * UnitQuaternion::from_axis_angle(&Vector3::y_axis(), FRAC_PI_2 - xi_rad)
        * UnitQuaternion::from_axis_angle(&Vector3::z_axis(), omega_rad);
    // Products of unit quaternions drift slightly, renormalize
    UnitQuaternion::new_normalize(q.into_inner())
}

/// Direction of the body Z axis (the spin axis) in ICRS
pub fn spin_axis(q: &UnitQuaternion<f64>) -> Vector3<f64> {
    q * Vector3::z()
}
