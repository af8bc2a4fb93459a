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

use super::scanlaw::{Nsl, ScanningLawParameters};
use super::{AttitudeIndex, AttitudeIntervalBuilder, AttitudeStrategy, ConstructionError};
use crate::io::AttitudeConfig;
use crate::linalg::UnitQuaternion;
use crate::orientation::OrientationProvider;
use crate::time::Epoch;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Regime which was last used to answer a query
#[derive(Clone, Debug, PartialEq)]
struct ActiveRegime {
    activation: Epoch,
    label: String,
}

#[derive(Debug)]
struct OrientationCache {
    last_orientation: UnitQuaternion<f64>,
    last_active: Option<ActiveRegime>,
    /// Default closed form law, built on first use
    fallback: Option<Nsl>,
}

impl Default for OrientationCache {
    fn default() -> Self {
        Self {
            last_orientation: UnitQuaternion::identity(),
            last_active: None,
            fallback: None,
        }
    }
}

/// Serves the attitude of the spacecraft at any epoch.
///
/// In index mode, each query is answered by the regime active at that epoch, and the identity before the first
/// regime. In approximate only mode, every query uses the default nominal scanning law. Whenever a regime fails to
/// compute its orientation, the default nominal scanning law is used instead and the failure is logged.
///
/// The query state is kept behind a mutex, so the server may be shared between threads, but queries are
/// serialized.
#[derive(Debug)]
pub struct OrientationServer {
    index: Option<Arc<AttitudeIndex>>,
    default_law: ScanningLawParameters,
    cache: Mutex<OrientationCache>,
}

impl OrientationServer {
    /// Builds the server from its configuration, loading the attitude directory if one is set.
    pub fn from_config(cfg: &AttitudeConfig) -> Result<Self, ConstructionError> {
        match &cfg.attitude_dir {
            Some(dir) => {
                let index = AttitudeIntervalBuilder::from_config(cfg).build(dir)?;
                Ok(Self::with_index(Arc::new(index), cfg.default_law))
            }
            None => {
                info!("no attitude directory, serving the default scanning law only");
                Ok(Self::approximate_only(cfg.default_law))
            }
        }
    }

    /// Serves the regimes of the provided index
    pub fn with_index(index: Arc<AttitudeIndex>, default_law: ScanningLawParameters) -> Self {
        Self {
            index: Some(index),
            default_law,
            cache: Mutex::new(OrientationCache::default()),
        }
    }

    /// Serves the default scanning law at all times
    pub fn approximate_only(default_law: ScanningLawParameters) -> Self {
        Self {
            index: None,
            default_law,
            cache: Mutex::new(OrientationCache::default()),
        }
    }

    pub fn index(&self) -> Option<&AttitudeIndex> {
        self.index.as_deref()
    }

    pub fn is_approximate_only(&self) -> bool {
        self.index.is_none()
    }

    /// Attitude at the provided epoch, from the body frame to ICRS. This never fails: the identity is returned
    /// before the first regime, and the default scanning law (or the last attitude if even that fails) when the
    /// active regime fails.
    pub fn attitude_at(&self, epoch: Epoch) -> UnitQuaternion<f64> {
        let mut cache = self.lock();

        let q = match &self.index {
            None => self.fallback_orientation(&mut cache, epoch),
            Some(index) => match index.find_active(epoch) {
                None => UnitQuaternion::identity(),
                Some(record) => {
                    if cache.last_active.as_ref().map(|active| active.activation)
                        != Some(record.activation)
                    {
                        info!("attitude regime is now {record}");
                        cache.last_active = Some(ActiveRegime {
                            activation: record.activation,
                            label: record.name.clone(),
                        });
                    }
                    match record.orientation_at(epoch) {
                        Ok(q) => q,
                        Err(e) => {
                            error!(
                                "attitude regime {} failed at {epoch}, using the default scanning law: {e}",
                                record.name
                            );
                            self.fallback_orientation(&mut cache, epoch)
                        }
                    }
                }
            },
        };

        cache.last_orientation = q;
        q
    }

    /// Last attitude returned by `attitude_at`, or the identity
    pub fn current_orientation(&self) -> UnitQuaternion<f64> {
        self.lock().last_orientation
    }

    /// Name of the last regime used, if any
    pub fn current_regime_label(&self) -> Option<String> {
        self.lock().last_active.as_ref().map(|active| active.label.clone())
    }

    fn lock(&self) -> MutexGuard<'_, OrientationCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn fallback_orientation(&self, cache: &mut OrientationCache, epoch: Epoch) -> UnitQuaternion<f64> {
        if cache.fallback.is_none() {
            match Nsl::new(self.default_law) {
                Ok(nsl) => {
                    debug!("default scanning law: {}", self.default_law);
                    cache.fallback = Some(nsl);
                }
                Err(e) => {
                    error!("default scanning law is invalid, keeping the last attitude: {e}");
                    return cache.last_orientation;
                }
            }
        }

        match cache.fallback.as_ref().map(|nsl| nsl.orientation_at(epoch)) {
            Some(Ok(q)) => q,
            Some(Err(e)) => {
                error!("default scanning law failed at {epoch}, keeping the last attitude: {e}");
                cache.last_orientation
            }
            None => cache.last_orientation,
        }
    }
}

impl OrientationProvider for OrientationServer {
    fn update_orientation(&mut self, epoch: Epoch) -> Option<UnitQuaternion<f64>> {
        Some(self.attitude_at(epoch))
    }

    fn current_orientation(&self) -> UnitQuaternion<f64> {
        OrientationServer::current_orientation(self)
    }

    fn has_orientation(&self) -> bool {
        true
    }
}
