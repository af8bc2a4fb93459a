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

use super::{
    duration_from_str, duration_to_str, epoch_from_str, epoch_to_str, maybe_epoch_from_str,
    maybe_epoch_to_str, ConfigRepr,
};
use crate::attitude::scanlaw::ScanningLawParameters;
use crate::time::{Duration, Epoch, Unit};
use serde_derive::{Deserialize, Serialize};
use std::path::PathBuf;
use typed_builder::TypedBuilder;

/// Configuration of the orientation server.
///
/// # Usage
/// Use the `TypedBuilder`, e.g. `AttitudeConfig::builder().attitude_dir("data/attitudes".into()).build()` to serve
/// the regimes of that directory, or `AttitudeConfig::default()` to only use the default scanning law.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[builder(doc)]
pub struct AttitudeConfig {
    /// Directory of the attitude regime descriptors. If unset, the server only uses the default scanning law.
    #[builder(default, setter(strip_option))]
    #[serde(default)]
    pub attitude_dir: Option<PathBuf>,
    /// Fast loading mode: every regime is activated at the start of the reference day minus the overlap, for the
    /// reduced window.
    #[builder(default)]
    #[serde(default)]
    pub reduced: bool,
    #[builder(default_code = "10 * Unit::Minute")]
    #[serde(
        default = "default_overlap",
        serialize_with = "duration_to_str",
        deserialize_with = "duration_from_str"
    )]
    pub overlap: Duration,
    #[builder(default_code = "3 * Unit::Hour")]
    #[serde(
        default = "default_reduced_window",
        serialize_with = "duration_to_str",
        deserialize_with = "duration_from_str"
    )]
    pub reduced_window: Duration,
    /// End of the last regime
    #[builder(default_code = "default_mission_end()")]
    #[serde(
        default = "default_mission_end",
        serialize_with = "epoch_to_str",
        deserialize_with = "epoch_from_str"
    )]
    pub mission_end: Epoch,
    /// Longest sub-step of the numerically integrated scanning law
    #[builder(default_code = "150 * Unit::Second")]
    #[serde(
        default = "default_max_step",
        serialize_with = "duration_to_str",
        deserialize_with = "duration_from_str"
    )]
    pub max_step: Duration,
    /// Epoch used as "today" in reduced mode, defaults to the system clock
    #[builder(default, setter(strip_option))]
    #[serde(
        default,
        serialize_with = "maybe_epoch_to_str",
        deserialize_with = "maybe_epoch_from_str"
    )]
    pub reference_epoch: Option<Epoch>,
    /// Closed form scanning law used when no regime applies or when a regime fails
    #[builder(default)]
    #[serde(default)]
    pub default_law: ScanningLawParameters,
}

fn default_overlap() -> Duration {
    10 * Unit::Minute
}

fn default_reduced_window() -> Duration {
    3 * Unit::Hour
}

fn default_max_step() -> Duration {
    150 * Unit::Second
}

pub(crate) fn default_mission_end() -> Epoch {
    Epoch::from_gregorian_utc_hms(2026, 9, 14, 17, 44, 20)
}

impl Default for AttitudeConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ConfigRepr for AttitudeConfig {}
