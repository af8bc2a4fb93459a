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

use super::ScanningLawParameters;
use crate::attitude::{AttitudeStrategy, EvaluationError};
use crate::cosmic::{HeliotropicAngles, NominalSun};
use crate::linalg::UnitQuaternion;
use crate::time::Epoch;
use std::f64::consts::TAU;

/// Nominal scanning law in closed form.
///
/// The precession phase advances at a constant rate with respect to the nominal sun longitude, `dν/dλ = K` with K
/// the precession rate in revolutions per year, and the spin phase follows from integrating the scanning law
/// constraint in closed form. This is the default model of the orientation server.
#[derive(Clone, Debug)]
pub struct Nsl {
    params: ScanningLawParameters,
    sun_ref: NominalSun,
}

impl Nsl {
    pub fn new(params: ScanningLawParameters) -> Result<Self, EvaluationError> {
        params.validate()?;
        Ok(Self {
            params,
            sun_ref: NominalSun::at(params.ref_epoch),
        })
    }

    pub fn params(&self) -> &ScanningLawParameters {
        &self.params
    }

    pub fn heliotropic_angles_at(&self, epoch: Epoch) -> Result<HeliotropicAngles, EvaluationError> {
        let sun = NominalSun::at(epoch);
        self.angles_with_sun(epoch, &sun)
    }

    fn angles_with_sun(
        &self,
        epoch: Epoch,
        sun: &NominalSun,
    ) -> Result<HeliotropicAngles, EvaluationError> {
        let (sin_xi, cos_xi) = self.params.ref_xi_rad.sin_cos();
        let kappa = self.params.prec_rate_rev_yr;
        let nu_ref = self.params.ref_nu_rad;

        let delta_lon = sun.longitude_rad - self.sun_ref.longitude_rad;
        let nu = nu_ref + kappa * delta_lon;
        let delta_nu = nu - nu_ref;

        let revolving = if kappa == 0.0 {
            -sin_xi * nu_ref.sin() * delta_lon
        } else {
            sin_xi / kappa * (nu.cos() - nu_ref.cos())
        };
        let delta_omega = -cos_xi * delta_nu + revolving;

        let omega = self.params.ref_omega_rad
            + TAU * self.params.spin_revolution_fraction(epoch)
            + delta_omega;

        if !nu.is_finite() || !omega.is_finite() {
            return Err(EvaluationError::NonFiniteState { epoch });
        }

        Ok(HeliotropicAngles {
            xi_rad: self.params.ref_xi_rad,
            nu_rad: nu.rem_euclid(TAU),
            omega_rad: omega.rem_euclid(TAU),
        })
    }
}

impl AttitudeStrategy for Nsl {
    fn orientation_at(&self, epoch: Epoch) -> Result<UnitQuaternion<f64>, EvaluationError> {
        let sun = NominalSun::at(epoch);
        Ok(self.angles_with_sun(epoch, &sun)?.to_quaternion(&sun))
    }
}
