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

use super::{AttitudeIndex, AttitudeIntervalRecord, ConstructionError};
use crate::io::{AttitudeConfig, AttitudeDescriptor, ConfigError, ConfigRepr, RegimeDescriptor};
use crate::time::{Duration, Epoch};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Durations of consecutive regimes: each lasts until the next activation, and the last one until the mission end.
///
/// The activation times must be sorted. The last duration is zero if the mission end precedes its activation.
pub fn assign_durations(activations: &[Epoch], mission_end: Epoch) -> Vec<Duration> {
    let mut durations: Vec<Duration> = activations
        .windows(2)
        .map(|pair| pair[1] - pair[0])
        .collect();
    if let Some(last) = activations.last() {
        let remaining = mission_end - *last;
        durations.push(if remaining.is_negative() {
            Duration::ZERO
        } else {
            remaining
        });
    }
    durations
}

/// Builds the attitude index from a directory of regime descriptors.
#[derive(Clone, Debug, PartialEq)]
pub struct AttitudeIntervalBuilder {
    pub reduced: bool,
    pub overlap: Duration,
    pub reduced_window: Duration,
    pub mission_end: Epoch,
    pub max_step: Duration,
    pub reference_epoch: Option<Epoch>,
}

impl AttitudeIntervalBuilder {
    pub fn from_config(cfg: &AttitudeConfig) -> Self {
        Self {
            reduced: cfg.reduced,
            overlap: cfg.overlap,
            reduced_window: cfg.reduced_window,
            mission_end: cfg.mission_end,
            max_step: cfg.max_step,
            reference_epoch: cfg.reference_epoch,
        }
    }

    /// Loads every YAML descriptor under `dir` (recursively) and indexes the regimes.
    ///
    /// Descriptors which cannot be read, parsed or turned into a strategy are skipped. Fails if the directory is
    /// missing or unreadable, or if no regime could be indexed.
    pub fn build(&self, dir: &Path) -> Result<AttitudeIndex, ConstructionError> {
        if !dir.is_dir() {
            return Err(ConstructionError::MissingDirectory {
                path: dir.to_path_buf(),
            });
        }
        let paths = descriptor_paths(dir).map_err(|source| ConstructionError::UnreadableDirectory {
            path: dir.to_path_buf(),
            source,
        })?;
        debug!("found {} attitude descriptors in {}", paths.len(), dir.display());

        let regimes = paths.iter().filter_map(|path| {
            let label = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            match AttitudeDescriptor::load(path).and_then(|desc| desc.to_regime()) {
                Ok(regime) => Some((label, regime)),
                Err(e) => {
                    warn!("skipping attitude file {label}: {e}");
                    None
                }
            }
        });

        let index = self.index_regimes(regimes)?;
        if index.is_empty() {
            return Err(ConstructionError::NoValidDescriptors {
                path: dir.to_path_buf(),
            });
        }
        info!(
            "loaded {} attitude regimes from {}",
            index.len(),
            dir.display()
        );
        Ok(index)
    }

    /// Indexes already parsed regimes, each given with its source label.
    ///
    /// Regimes sharing an activation time with a previous one are skipped, as are regimes whose strategy cannot be
    /// built.
    pub fn index_regimes<I>(&self, regimes: I) -> Result<AttitudeIndex, ConstructionError>
    where
        I: IntoIterator<Item = (String, RegimeDescriptor)>,
    {
        let reduced_start = if self.reduced {
            Some(self.reduced_activation()?)
        } else {
            None
        };

        let mut by_activation: BTreeMap<Epoch, (String, RegimeDescriptor)> = BTreeMap::new();
        for (label, regime) in regimes {
            let activation = reduced_start.unwrap_or(regime.activation);
            match by_activation.entry(activation) {
                Entry::Vacant(slot) => {
                    slot.insert((label, regime));
                }
                Entry::Occupied(taken) => {
                    warn!(
                        "skipping attitude file {label}: activation time {activation} already used by {}",
                        taken.get().0
                    );
                }
            }
        }

        let mut built = Vec::with_capacity(by_activation.len());
        for (activation, (label, regime)) in by_activation {
            match regime
                .kind
                .build(regime.params, regime.msl, activation, self.max_step)
            {
                Ok(strategy) => built.push((activation, regime.name, label, strategy)),
                Err(e) => warn!("skipping attitude file {label}: {} strategy failed: {e}", regime.kind),
            }
        }

        // Durations only span the regimes which could be built
        let activations: Vec<Epoch> = built.iter().map(|(activation, ..)| *activation).collect();
        let durations = if self.reduced {
            vec![self.reduced_window + self.overlap * 2; activations.len()]
        } else {
            assign_durations(&activations, self.mission_end)
        };

        let mut index = AttitudeIndex::new();
        for ((activation, name, label, strategy), duration) in built.into_iter().zip(durations) {
            let record = AttitudeIntervalRecord::new(name, activation, duration, strategy, label);
            debug!("indexed attitude regime {record}");
            index.insert(record);
        }

        Ok(index)
    }

    /// Start of the reference day minus the overlap
    fn reduced_activation(&self) -> Result<Epoch, ConstructionError> {
        let today = match self.reference_epoch {
            Some(epoch) => epoch,
            None => Epoch::now().map_err(|e| ConstructionError::Config {
                source: ConfigError::InvalidConfig {
                    msg: format!("reduced mode needs the system time: {e}"),
                },
            })?,
        };
        let (year, month, day, _, _, _, _) = today.to_gregorian_utc();
        Ok(Epoch::from_gregorian_utc_at_midnight(year, month, day) - self.overlap)
    }
}

/// Sorted paths of the YAML files under `dir`, recursively
fn descriptor_paths(dir: &Path) -> Result<Vec<PathBuf>, std::io::Error> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            match descriptor_paths(&path) {
                Ok(mut nested) => paths.append(&mut nested),
                Err(e) => warn!("skipping attitude directory {}: {e}", path.display()),
            }
        } else if path
            .extension()
            .map_or(false, |ext| ext == "yaml" || ext == "yml")
        {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}
