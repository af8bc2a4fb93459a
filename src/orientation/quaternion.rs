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

use super::{nlerp, slerp, OrientationError, OrientationProvider};
use crate::io::parse_mission_time;
use crate::linalg::{Quaternion, UnitQuaternion};
use crate::time::Epoch;
use std::fs;
use std::path::Path;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum InterpolationMethod {
    #[default]
    Nlerp,
    Slerp,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TimeSample {
    pub epoch: Epoch,
    pub q: UnitQuaternion<f64>,
}

impl TimeSample {
    /// Parses a `time x y z w` line, the fields being separated by whitespace or commas.
    ///
    /// The time is either a Unix timestamp in milliseconds or an ISO 8601 instant. Returns None for malformed lines
    /// and for quaternions of zero norm.
    pub fn parse_line(line: &str) -> Option<Self> {
        let fields: Vec<&str> = line
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|field| !field.is_empty())
            .collect();
        if fields.len() != 5 {
            return None;
        }

        let epoch = parse_sample_time(fields[0])?;
        let mut xyzw = [0.0; 4];
        for (value, field) in xyzw.iter_mut().zip(&fields[1..]) {
            *value = field.parse::<f64>().ok()?;
        }
        let [x, y, z, w] = xyzw;
        let q = UnitQuaternion::try_new(Quaternion::new(w, x, y, z), f64::EPSILON)?;
        Some(Self { epoch, q })
    }
}

fn parse_sample_time(field: &str) -> Option<Epoch> {
    if let Ok(unix_ms) = field.parse::<i64>() {
        return Some(Epoch::from_unix_milliseconds(unix_ms as f64));
    }
    let iso = field.strip_suffix('Z').unwrap_or(field);
    parse_mission_time(iso).ok()
}

/// Orientation interpolated from time tagged quaternions.
#[derive(Clone, Debug, Default)]
pub struct QuaternionInterpolator {
    samples: Vec<TimeSample>,
    method: InterpolationMethod,
    last: Option<UnitQuaternion<f64>>,
}

impl QuaternionInterpolator {
    /// Loads the samples of the provided file. Malformed lines are skipped.
    pub fn from_file<P: AsRef<Path>>(
        path: P,
        method: InterpolationMethod,
    ) -> Result<Self, OrientationError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|source| {
            OrientationError::SampleFile {
                path: path.as_ref().to_path_buf(),
                source,
            }
        })?;
        let interp = Self::parse(&content, method);
        info!(
            "loaded {} quaternion samples from {}",
            interp.samples.len(),
            path.as_ref().display()
        );
        Ok(interp)
    }

    /// Parses the samples, one per line. Empty lines and lines starting with `#` are ignored.
    pub fn parse(content: &str, method: InterpolationMethod) -> Self {
        let mut samples = Vec::new();
        for (line_no, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match TimeSample::parse_line(line) {
                Some(sample) => samples.push(sample),
                None => warn!("skipping malformed quaternion sample on line {}: `{line}`", line_no + 1),
            }
        }
        Self::from_samples(samples, method)
    }

    pub fn from_samples(mut samples: Vec<TimeSample>, method: InterpolationMethod) -> Self {
        samples.sort_by_key(|sample| sample.epoch);
        Self {
            samples,
            method,
            last: None,
        }
    }

    pub fn samples(&self) -> &[TimeSample] {
        &self.samples
    }

    pub fn method(&self) -> InterpolationMethod {
        self.method
    }

    /// Orientation at the provided epoch. Outside of the samples, the closest sample is returned.
    pub fn interpolate(&self, epoch: Epoch) -> Option<UnitQuaternion<f64>> {
        let first = self.samples.first()?;
        let last = self.samples.last()?;
        if epoch <= first.epoch || self.samples.len() == 1 {
            return Some(first.q);
        }
        if epoch >= last.epoch {
            return Some(last.q);
        }

        // First sample strictly after the epoch, never the first one here
        let idx = self.samples.partition_point(|sample| sample.epoch <= epoch);
        let (s0, s1) = (&self.samples[idx - 1], &self.samples[idx]);
        let alpha = (epoch - s0.epoch).total_nanoseconds() as f64
            / (s1.epoch - s0.epoch).total_nanoseconds() as f64;

        Some(match self.method {
            InterpolationMethod::Nlerp => nlerp(&s0.q, &s1.q, alpha),
            InterpolationMethod::Slerp => slerp(&s0.q, &s1.q, alpha),
        })
    }
}

impl OrientationProvider for QuaternionInterpolator {
    fn update_orientation(&mut self, epoch: Epoch) -> Option<UnitQuaternion<f64>> {
        let q = self.interpolate(epoch)?;
        self.last = Some(q);
        Some(q)
    }

    fn current_orientation(&self) -> UnitQuaternion<f64> {
        self.last.unwrap_or_else(UnitQuaternion::identity)
    }

    fn has_orientation(&self) -> bool {
        !self.samples.is_empty()
    }
}
