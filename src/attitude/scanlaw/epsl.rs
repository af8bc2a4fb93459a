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
use std::f64::consts::{PI, TAU};

/// Whether the spin axis precedes or follows the sun on the ecliptic
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EpslMode {
    /// ν = 0
    Preceding,
    /// ν = π
    Following,
}

impl EpslMode {
    pub fn nu_rad(self) -> f64 {
        match self {
            Self::Preceding => 0.0,
            Self::Following => PI,
        }
    }
}

/// Ecliptic pole scanning law: the precession phase is frozen and the spin phase advances at the inertial rate.
#[derive(Clone, Debug)]
pub struct Epsl {
    params: ScanningLawParameters,
    mode: EpslMode,
}

impl Epsl {
    pub fn new(params: ScanningLawParameters, mode: EpslMode) -> Result<Self, EvaluationError> {
        params.validate()?;
        Ok(Self { params, mode })
    }

    pub fn mode(&self) -> EpslMode {
        self.mode
    }

    pub fn heliotropic_angles_at(&self, epoch: Epoch) -> Result<HeliotropicAngles, EvaluationError> {
        let omega = self.params.ref_omega_rad + TAU * self.params.spin_revolution_fraction(epoch);
        if !omega.is_finite() {
            return Err(EvaluationError::NonFiniteState { epoch });
        }
        Ok(HeliotropicAngles {
            xi_rad: self.params.ref_xi_rad,
            nu_rad: self.mode.nu_rad(),
            omega_rad: omega.rem_euclid(TAU),
        })
    }
}

impl AttitudeStrategy for Epsl {
    fn orientation_at(&self, epoch: Epoch) -> Result<UnitQuaternion<f64>, EvaluationError> {
        let sun = NominalSun::at(epoch);
        Ok(self.heliotropic_angles_at(epoch)?.to_quaternion(&sun))
    }
}
