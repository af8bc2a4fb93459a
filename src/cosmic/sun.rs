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

use super::{j2000, OBLIQUITY_J2000_RAD};
use crate::linalg::Vector3;
use crate::time::{Epoch, Unit};

const MEAN_LONGITUDE_DEG: f64 = 280.460;
const MEAN_LONGITUDE_RATE_DEG_DAY: f64 = 0.985_647_4;
const MEAN_ANOMALY_DEG: f64 = 357.528;
const MEAN_ANOMALY_RATE_DEG_DAY: f64 = 0.985_600_3;

/// The nominal sun used by the scanning laws: a low precision analytical model of the geocentric solar longitude.
///
/// The longitude is _not_ reduced to [0, 2π) so that differences between two epochs are continuous.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct NominalSun {
    pub epoch: Epoch,
    /// Ecliptic longitude of the nominal sun, in radians
    pub longitude_rad: f64,
    /// Rate of the ecliptic longitude, in radians per day
    pub longitude_dot_rad_day: f64,
}

impl NominalSun {
    /// Computes the nominal sun at the provided epoch.
    pub fn at(epoch: Epoch) -> Self {
        let days = (epoch - j2000()).to_unit(Unit::Day);

        let mean_lon_deg = MEAN_LONGITUDE_DEG + MEAN_LONGITUDE_RATE_DEG_DAY * days;
        let g = (MEAN_ANOMALY_DEG + MEAN_ANOMALY_RATE_DEG_DAY * days).to_radians();

        // Equation of centre
        let lon_deg = mean_lon_deg + 1.915 * g.sin() + 0.020 * (2.0 * g).sin();
        let lon_dot_deg_day = MEAN_LONGITUDE_RATE_DEG_DAY
            + (1.915 * g.cos() + 0.040 * (2.0 * g).cos())
                * MEAN_ANOMALY_RATE_DEG_DAY.to_radians();

        Self {
            epoch,
            longitude_rad: lon_deg.to_radians(),
            longitude_dot_rad_day: lon_dot_deg_day.to_radians(),
        }
    }

    /// Unit vector towards the nominal sun, in ICRS
    pub fn direction(&self) -> Vector3<f64> {
        let (sin_lon, cos_lon) = self.longitude_rad.sin_cos();
        Vector3::new(
            cos_lon,
            sin_lon * OBLIQUITY_J2000_RAD.cos(),
            sin_lon * OBLIQUITY_J2000_RAD.sin(),
        )
    }
}
