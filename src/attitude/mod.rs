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

use crate::io::ConfigError;
use crate::linalg::UnitQuaternion;
use crate::time::{Duration, Epoch};
use serde_derive::{Deserialize, Serialize};
use snafu::prelude::*;
use std::fmt;
use std::path::PathBuf;

/// Scanning laws: the modified scanning law (numerically integrated) and its closed form approximations
pub mod scanlaw;
use scanlaw::{Epsl, EpslMode, Msl, MslParameters, Nsl, ScanningLawParameters};

mod interval;
pub use interval::{AttitudeIndex, AttitudeIntervalRecord};

mod builder;
pub use builder::{assign_durations, AttitudeIntervalBuilder};

mod server;
pub use server::OrientationServer;

/// Computes the orientation of a body at any epoch, from the body frame to ICRS.
pub trait AttitudeStrategy: fmt::Debug + Send + Sync {
    fn orientation_at(&self, epoch: Epoch) -> Result<UnitQuaternion<f64>, EvaluationError>;
}

#[derive(Debug, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum EvaluationError {
    #[snafu(display("scanning law used before its initialization"))]
    NotInitialized,
    #[snafu(display("scanning law state is not finite at {epoch}"))]
    NonFiniteState { epoch: Epoch },
    #[snafu(display("invalid scanning law parameters: {reason}"))]
    InvalidParameters { reason: String },
    #[snafu(display("no nominal speed matches a precession rate of {prec_rate} rev/yr"))]
    PrecessionRateUnreachable { prec_rate: f64 },
    #[snafu(display("reference epoch {ref_epoch} is after the start of the scanning law {start}"))]
    RefEpochAfterStart { ref_epoch: Epoch, start: Epoch },
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ConstructionError {
    #[snafu(display("attitude directory {} does not exist", path.display()))]
    MissingDirectory { path: PathBuf },
    #[snafu(display("attitude directory {} could not be read: {source}", path.display()))]
    UnreadableDirectory {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("no valid attitude descriptor in {}", path.display()))]
    NoValidDescriptors { path: PathBuf },
    #[snafu(display("attitude configuration error: {source}"))]
    Config { source: ConfigError },
}

/// Kind of attitude regime, as named in the descriptors
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Modified scanning law, numerically integrated
    Msl,
    /// Nominal scanning law, closed form
    Nsl,
    EpslFollowing,
    EpslPreceding,
}

impl StrategyKind {
    /// Builds the strategy of this kind starting at `start`.
    ///
    /// The MSL parameters are only used by the modified scanning law, and default to the nominal ones when unset.
    pub fn build(
        self,
        params: ScanningLawParameters,
        msl: Option<MslParameters>,
        start: Epoch,
        max_step: Duration,
    ) -> Result<Box<dyn AttitudeStrategy>, EvaluationError> {
        Ok(match self {
            Self::Msl => {
                let mut law = Msl::new(params, start)
                    .with_msl_parameters(msl.unwrap_or_default())
                    .with_max_step(max_step);
                law.initialize()?;
                Box::new(law)
            }
            Self::Nsl => Box::new(Nsl::new(params)?),
            Self::EpslFollowing => Box::new(Epsl::new(params, EpslMode::Following)?),
            Self::EpslPreceding => Box::new(Epsl::new(params, EpslMode::Preceding)?),
        })
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Msl => "MSL",
            Self::Nsl => "NSL",
            Self::EpslFollowing => "EPSL (following)",
            Self::EpslPreceding => "EPSL (preceding)",
        };
        write!(f, "{repr}")
    }
}
