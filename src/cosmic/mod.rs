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

use crate::linalg::{Matrix3, Vector3};
use crate::time::{Epoch, JD_J2000};

mod sun;
pub use sun::NominalSun;

mod rotations;
pub use rotations::*;

/// Obliquity of the ecliptic at J2000, in arcseconds
pub const OBLIQUITY_J2000_ARCSEC: f64 = 84_381.411;

/// Obliquity of the ecliptic at J2000, in radians
pub const OBLIQUITY_J2000_RAD: f64 = OBLIQUITY_J2000_ARCSEC * ARCSEC_TO_RAD;

pub const ARCSEC_TO_RAD: f64 = std::f64::consts::PI / (180.0 * 3600.0);

/// Returns the J2000 reference epoch (TDB)
pub fn j2000() -> Epoch {
    Epoch::from_jde_tdb(JD_J2000)
}

/// Unit vector towards the north ecliptic pole, in ICRS
pub fn ecliptic_pole() -> Vector3<f64> {
    Vector3::new(
        0.0,
        -OBLIQUITY_J2000_RAD.sin(),
        OBLIQUITY_J2000_RAD.cos(),
    )
}

/// Rotation matrix from Galactic coordinates to ICRS (transpose of the Hipparcos A_G matrix)
pub fn galactic_to_icrs() -> Matrix3<f64> {
    Matrix3::new(
        -0.054_875_560_416_215_4,
        0.494_109_427_875_583_7,
        -0.867_666_149_019_004_7,
        -0.873_437_090_234_885_0,
        -0.444_829_629_960_011_2,
        -0.198_076_373_431_201_5,
        -0.483_835_015_548_713_2,
        0.746_982_244_497_218_9,
        0.455_983_776_175_066_9,
    )
}

/// Converts spherical coordinates (in radians) into a unit vector
pub fn unit_vector_from_lon_lat(lon_rad: f64, lat_rad: f64) -> Vector3<f64> {
    Vector3::new(
        lat_rad.cos() * lon_rad.cos(),
        lat_rad.cos() * lon_rad.sin(),
        lat_rad.sin(),
    )
}
