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

use super::{parse_mission_time, ConfigError, ConfigRepr};
use crate::attitude::scanlaw::{HighDensityArea, MslParameters, ScanningLawParameters};
use crate::attitude::StrategyKind;
use crate::time::Epoch;
use serde_derive::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AngleUnit {
    Radians,
    Degrees,
    ArcMinutes,
    ArcSeconds,
    MilliArcSeconds,
}

impl AngleUnit {
    /// Number of radians in one of this unit
    pub fn in_radians(self) -> f64 {
        match self {
            Self::Radians => 1.0,
            Self::Degrees => 1.0_f64.to_radians(),
            Self::ArcMinutes => (1.0_f64 / 60.0).to_radians(),
            Self::ArcSeconds => (1.0_f64 / 3600.0).to_radians(),
            Self::MilliArcSeconds => (1.0e-3_f64 / 3600.0).to_radians(),
        }
    }

    /// Number of arcseconds in one of this unit
    pub fn in_arcseconds(self) -> f64 {
        self.in_radians() / Self::ArcSeconds.in_radians()
    }
}

impl FromStr for AngleUnit {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rad" | "radian" | "radians" => Ok(Self::Radians),
            "deg" | "degree" | "degrees" => Ok(Self::Degrees),
            "arcmin" => Ok(Self::ArcMinutes),
            "arcsec" | "as" => Ok(Self::ArcSeconds),
            "mas" | "milliarcsec" => Ok(Self::MilliArcSeconds),
            _ => Err(ConfigError::InvalidConfig {
                msg: format!("unknown angle unit `{s}`"),
            }),
        }
    }
}

impl fmt::Display for AngleUnit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Radians => "rad",
            Self::Degrees => "deg",
            Self::ArcMinutes => "arcmin",
            Self::ArcSeconds => "arcsec",
            Self::MilliArcSeconds => "mas",
        };
        write!(f, "{repr}")
    }
}

/// An angle, or an angular rate, with its unit as written in the descriptor
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AngleQuantity {
    pub value: f64,
    pub unit: String,
}

impl AngleQuantity {
    /// Angular unit of this quantity. Rates such as `arcsec_s` use the part before the underscore.
    pub fn angle_unit(&self) -> Result<AngleUnit, ConfigError> {
        let angle = self.unit.split('_').next().unwrap_or_default();
        AngleUnit::from_str(angle)
    }

    pub fn to_radians(&self) -> Result<f64, ConfigError> {
        Ok(self.value * self.angle_unit()?.in_radians())
    }

    pub fn to_arcseconds(&self) -> Result<f64, ConfigError> {
        Ok(self.value * self.angle_unit()?.in_arcseconds())
    }
}

/// A unitless quantity, e.g. the precession rate which is always in revolutions per year
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScalarQuantity {
    pub value: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScanLawDescriptor {
    pub epochref: String,
    pub spinphase: AngleQuantity,
    pub precessphase: AngleQuantity,
    pub precessrate: ScalarQuantity,
    pub scanrate: AngleQuantity,
    pub solaraspectangle: AngleQuantity,
}

/// Tuning of the modified scanning law, all optional
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MslDescriptor {
    #[serde(default = "default_speed_reduction_factor")]
    pub speed_reduction_factor: f64,
    #[serde(default = "default_zmax_deg")]
    pub zmax_deg: f64,
    #[serde(default = "default_zmin_deg")]
    pub zmin_deg: f64,
    #[serde(default = "default_s1min")]
    pub s1min: f64,
    /// Adds the Baade's window and Sgr I high density area
    #[serde(default)]
    pub typical_high_density_area: bool,
    #[serde(default)]
    pub high_density_areas: Vec<HighDensityArea>,
}

fn default_speed_reduction_factor() -> f64 {
    MslParameters::default().speed_reduction_factor
}

fn default_zmax_deg() -> f64 {
    MslParameters::default().z_max_rad.to_degrees()
}

fn default_zmin_deg() -> f64 {
    MslParameters::default().z_min_rad.to_degrees()
}

fn default_s1min() -> f64 {
    MslParameters::default().s1_min
}

impl MslDescriptor {
    pub fn to_parameters(&self) -> MslParameters {
        let mut areas = self.high_density_areas.clone();
        if self.typical_high_density_area {
            areas.push(HighDensityArea::typical());
        }
        MslParameters {
            speed_reduction_factor: self.speed_reduction_factor,
            z_max_rad: self.zmax_deg.to_radians(),
            z_min_rad: self.zmin_deg.to_radians(),
            s1_min: self.s1min,
            areas,
        }
    }
}

/// One attitude regime, as stored in a YAML file of the attitude directory.
///
/// ```yaml
/// name: MSL_NOMINAL
/// strategy: msl
/// starttime: "2014-07-25 10:30:00"
/// scanlaw:
///   epochref: "2014-07-25 10:30:00"
///   spinphase: { value: 0.0, unit: deg }
///   precessphase: { value: 180.0, unit: deg }
///   precessrate: { value: 5.8 }
///   scanrate: { value: 60.0, unit: arcsec_s }
///   solaraspectangle: { value: 45.0, unit: deg }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttitudeDescriptor {
    pub name: String,
    pub strategy: StrategyKind,
    pub starttime: String,
    pub scanlaw: ScanLawDescriptor,
    #[serde(default)]
    pub msl: Option<MslDescriptor>,
}

impl ConfigRepr for AttitudeDescriptor {}

impl AttitudeDescriptor {
    /// Activation time of this regime
    pub fn activation_time(&self) -> Result<Epoch, ConfigError> {
        parse_mission_time(&self.starttime)
    }

    pub fn scanning_law(&self) -> Result<ScanningLawParameters, ConfigError> {
        let law = &self.scanlaw;
        Ok(ScanningLawParameters {
            ref_epoch: parse_mission_time(&law.epochref)?,
            ref_omega_rad: law.spinphase.to_radians()?,
            ref_nu_rad: law.precessphase.to_radians()?,
            prec_rate_rev_yr: law.precessrate.value,
            scan_rate_arcsec_s: law.scanrate.to_arcseconds()?,
            ref_xi_rad: law.solaraspectangle.to_radians()?,
        })
    }

    /// Converts this descriptor into its typed form
    pub fn to_regime(&self) -> Result<RegimeDescriptor, ConfigError> {
        Ok(RegimeDescriptor {
            name: self.name.clone(),
            kind: self.strategy,
            activation: self.activation_time()?,
            params: self.scanning_law()?,
            msl: self.msl.as_ref().map(MslDescriptor::to_parameters),
        })
    }
}

/// Typed attitude regime
#[derive(Clone, Debug, PartialEq)]
pub struct RegimeDescriptor {
    pub name: String,
    pub kind: StrategyKind,
    pub activation: Epoch,
    pub params: ScanningLawParameters,
    pub msl: Option<MslParameters>,
}
