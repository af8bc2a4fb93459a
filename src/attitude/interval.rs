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

use super::{AttitudeStrategy, EvaluationError};
use crate::linalg::UnitQuaternion;
use crate::time::{Duration, Epoch};
use std::collections::btree_map::Values;
use std::collections::BTreeMap;
use std::fmt;

/// An attitude regime: the strategy active from its activation time and for its duration.
#[derive(Debug)]
pub struct AttitudeIntervalRecord {
    pub name: String,
    pub activation: Epoch,
    pub duration: Duration,
    pub strategy: Box<dyn AttitudeStrategy>,
    /// File this regime was loaded from
    pub source_label: String,
}

impl AttitudeIntervalRecord {
    pub fn new(
        name: impl Into<String>,
        activation: Epoch,
        duration: Duration,
        strategy: Box<dyn AttitudeStrategy>,
        source_label: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            activation,
            duration,
            strategy,
            source_label: source_label.into(),
        }
    }

    /// End of the nominal validity of this regime
    pub fn end(&self) -> Epoch {
        self.activation + self.duration
    }

    /// Whether the epoch is within [activation, end)
    pub fn contains(&self, epoch: Epoch) -> bool {
        epoch >= self.activation && epoch < self.end()
    }

    pub fn orientation_at(&self, epoch: Epoch) -> Result<UnitQuaternion<f64>, EvaluationError> {
        self.strategy.orientation_at(epoch)
    }
}

impl fmt::Display for AttitudeIntervalRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} ({}) from {} for {}",
            self.name, self.source_label, self.activation, self.duration
        )
    }
}

/// Attitude regimes keyed and ordered by activation time.
///
/// The active regime at an epoch is the one with the latest activation time at or before that epoch. Regimes keep
/// being selected past their own end until the next regime activates.
#[derive(Debug, Default)]
pub struct AttitudeIndex {
    records: BTreeMap<Epoch, AttitudeIntervalRecord>,
}

impl AttitudeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record, returning the record previously stored at the same activation time, if any.
    pub fn insert(&mut self, record: AttitudeIntervalRecord) -> Option<AttitudeIntervalRecord> {
        self.records.insert(record.activation, record)
    }

    /// Returns the active record at the provided epoch, or None if the epoch precedes all activation times.
    pub fn find_active(&self, epoch: Epoch) -> Option<&AttitudeIntervalRecord> {
        self.records
            .range(..=epoch)
            .next_back()
            .map(|(_, record)| record)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates over the records in activation order
    pub fn iter(&self) -> Values<'_, Epoch, AttitudeIntervalRecord> {
        self.records.values()
    }

    pub fn first(&self) -> Option<&AttitudeIntervalRecord> {
        self.records.values().next()
    }

    pub fn last(&self) -> Option<&AttitudeIntervalRecord> {
        self.records.values().next_back()
    }
}

impl<'a> IntoIterator for &'a AttitudeIndex {
    type Item = &'a AttitudeIntervalRecord;
    type IntoIter = Values<'a, Epoch, AttitudeIntervalRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
