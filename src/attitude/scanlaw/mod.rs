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

use super::EvaluationError;
use crate::io::{epoch_from_str, epoch_to_str};
use crate::time::{Duration, Epoch};
use serde_derive::{Deserialize, Serialize};
use std::f64::consts::TAU;
use std::fmt;

mod epsl;
mod msl;
mod nsl;

pub use epsl::{Epsl, EpslMode};
pub use msl::{
    nominal_speed, precession_rate, HighDensityArea, Msl, MslParameters, ScanState, SkyCircle,
};
pub use nsl::Nsl;

/// Reference state and rates of a scanning law.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScanningLawParameters {
    /// Epoch at which the reference phases apply
    #[serde(serialize_with = "epoch_to_str", deserialize_with = "epoch_from_str")]
    pub ref_epoch: Epoch,
    /// Spin phase at the reference epoch
    pub ref_omega_rad: f64,
    /// Precession phase at the reference epoch
    pub ref_nu_rad: f64,
    /// Precession rate of the spin axis around the nominal sun, in revolutions per year
    pub prec_rate_rev_yr: f64,
    /// Inertial spin rate
    pub scan_rate_arcsec_s: f64,
    /// Solar aspect angle
    pub ref_xi_rad: f64,
}

impl Default for ScanningLawParameters {
    /// Nominal scanning law parameters, referenced at J2010
    fn default() -> Self {
        Self {
            ref_epoch: Epoch::from_gregorian_utc_at_midnight(2010, 1, 1),
            ref_omega_rad: 0.0,
            ref_nu_rad: 0.0,
            prec_rate_rev_yr: 5.8,
            scan_rate_arcsec_s: 60.0,
            ref_xi_rad: 45.0_f64.to_radians(),
        }
    }
}

impl ScanningLawParameters {
    /// Checks that the parameters describe a spinning body whose spin axis is not aligned with the sun.
    pub fn validate(&self) -> Result<(), EvaluationError> {
        let values = [
            self.ref_omega_rad,
            self.ref_nu_rad,
            self.prec_rate_rev_yr,
            self.scan_rate_arcsec_s,
            self.ref_xi_rad,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(EvaluationError::InvalidParameters {
                reason: "non finite parameter".to_string(),
            });
        }
        if self.scan_rate_arcsec_s <= 0.0 {
            return Err(EvaluationError::InvalidParameters {
                reason: format!("scan rate must be positive, got {}", self.scan_rate_arcsec_s),
            });
        }
        if self.ref_xi_rad <= 0.0 || self.ref_xi_rad >= std::f64::consts::PI {
            return Err(EvaluationError::InvalidParameters {
                reason: format!(
                    "solar aspect angle must be in (0, 180) deg, got {} deg",
                    self.ref_xi_rad.to_degrees()
                ),
            });
        }
        Ok(())
    }

    /// Inertial spin rate, in radians per day
    pub fn spin_rate_rad_day(&self) -> f64 {
        // arcsec/s to rad/day: 86400 / (3600 * 180) * pi = 2 pi / 15
        self.scan_rate_arcsec_s * TAU / 15.0
    }

    /// Duration of one spin revolution, rounded to the nanosecond
    pub fn scan_period(&self) -> Duration {
        let period_s = 360.0 * 3600.0 / self.scan_rate_arcsec_s;
        Duration::from_total_nanoseconds((period_s * 1e9).round() as i128)
    }

    /// Fraction of the current spin revolution elapsed since the reference epoch, in [0, 1).
    ///
    /// Computed in integer nanoseconds so that it does not lose precision far from the reference epoch.
    pub(crate) fn spin_revolution_fraction(&self, epoch: Epoch) -> f64 {
        let period_ns = self.scan_period().total_nanoseconds();
        if period_ns <= 0 {
            return 0.0;
        }
        let elapsed_ns = (epoch - self.ref_epoch).total_nanoseconds();
        elapsed_ns.rem_euclid(period_ns) as f64 / period_ns as f64
    }
}

impl fmt::Display for ScanningLawParameters {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "ref. {}: Omega = {:.6} deg, nu = {:.6} deg, xi = {:.6} deg, K = {} rev/yr, scan rate = {} arcsec/s",
            self.ref_epoch,
            self.ref_omega_rad.to_degrees(),
            self.ref_nu_rad.to_degrees(),
            self.ref_xi_rad.to_degrees(),
            self.prec_rate_rev_yr,
            self.scan_rate_arcsec_s
        )
    }
}
