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
use crate::cosmic::{
    ecliptic_pole, galactic_to_icrs, heliotropic_to_quaternion, spin_axis,
    unit_vector_from_lon_lat, HeliotropicAngles, NominalSun,
};
use crate::linalg::{UnitQuaternion, Vector2, Vector3};
use crate::propagators::integrate;
use crate::time::{Duration, Epoch, Unit};
use serde_derive::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::f64::consts::TAU;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Bounds of the nominal speed S searched for a given precession rate
const S_MIN: f64 = 1.0;
const S_MAX: f64 = 50.0;
/// Number of points of the midpoint rule averaging the precession over ν
const NU_SAMPLES: usize = 256;
/// Width of the sigmoid blending the reduced speed in, as a function of |s1|
const SIGMOID_WIDTH: f64 = 0.1;
/// Spacing of the integrator checkpoints, counted from the start time
const CHECKPOINT_HOURS: i64 = 6;

/// Scanning regime of the modified scanning law at a given instant
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScanState {
    /// Precessing as the nominal scanning law
    Nominal,
    /// Ramping between the nominal and the reduced precession speed
    Transition,
    /// Precessing at a reduced speed over a high density area
    Modified,
}

impl fmt::Display for ScanState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// A circle on the sky, in galactic coordinates
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SkyCircle {
    pub lon_deg: f64,
    pub lat_deg: f64,
    pub radius_deg: f64,
}

/// A region of the sky with a high density of sources, defined as a union of circles
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HighDensityArea {
    pub name: String,
    pub circles: Vec<SkyCircle>,
}

impl HighDensityArea {
    /// Baade's window (l = 1.04 deg, b = -3.88 deg) and Sgr I (l = 1.44 deg, b = -2.64 deg), each of 0.5 deg radius.
    pub fn typical() -> Self {
        Self {
            name: "BW + Sgr I".to_string(),
            circles: vec![
                SkyCircle {
                    lon_deg: 1.04,
                    lat_deg: -3.88,
                    radius_deg: 0.5,
                },
                SkyCircle {
                    lon_deg: 1.44,
                    lat_deg: -2.64,
                    radius_deg: 0.5,
                },
            ],
        }
    }

    fn to_icrs(&self) -> Option<IcrsArea> {
        let rot = galactic_to_icrs();
        let circles: Vec<(Vector3<f64>, f64)> = self
            .circles
            .iter()
            .map(|c| {
                let gal = unit_vector_from_lon_lat(c.lon_deg.to_radians(), c.lat_deg.to_radians());
                (rot * gal, c.radius_deg.to_radians())
            })
            .collect();

        let mid_point = circles
            .iter()
            .fold(Vector3::zeros(), |acc, (centre, _)| acc + centre);
        let ref_dir = mid_point.try_normalize(f64::EPSILON)?;

        Some(IcrsArea { circles, ref_dir })
    }
}

#[derive(Clone, Debug)]
struct IcrsArea {
    circles: Vec<(Vector3<f64>, f64)>,
    ref_dir: Vector3<f64>,
}

impl IcrsArea {
    /// Smallest angular distance between the area and the scanning great circle of the provided spin axis.
    /// Negative when the great circle crosses the area.
    fn altitude(&self, spin_axis: &Vector3<f64>) -> f64 {
        self.circles
            .iter()
            .map(|(centre, radius)| centre.dot(spin_axis).clamp(-1.0, 1.0).asin().abs() - radius)
            .fold(f64::INFINITY, f64::min)
    }
}

/// Tuning of the modified scanning law
#[derive(Clone, Debug, PartialEq)]
pub struct MslParameters {
    /// Reduced speed as a fraction of the nominal speed
    pub speed_reduction_factor: f64,
    /// Altitude below which the precession starts to slow down
    pub z_max_rad: f64,
    /// Altitude below which the precession runs at the reduced speed
    pub z_min_rad: f64,
    /// Minimum parallax factor
    pub s1_min: f64,
    pub areas: Vec<HighDensityArea>,
}

impl Default for MslParameters {
    fn default() -> Self {
        Self {
            speed_reduction_factor: 0.15,
            z_max_rad: 0.5_f64.to_radians(),
            z_min_rad: 0.3_f64.to_radians(),
            s1_min: 0.5,
            areas: Vec::new(),
        }
    }
}

impl MslParameters {
    fn validate(&self) -> Result<(), EvaluationError> {
        if !(self.speed_reduction_factor.is_finite() && self.speed_reduction_factor >= 0.0) {
            return Err(EvaluationError::InvalidParameters {
                reason: format!(
                    "speed reduction factor must be non negative, got {}",
                    self.speed_reduction_factor
                ),
            });
        }
        if !(self.z_min_rad >= 0.0 && self.z_min_rad < self.z_max_rad && self.z_max_rad.is_finite())
        {
            return Err(EvaluationError::InvalidParameters {
                reason: format!(
                    "expected 0 <= zmin < zmax, got zmin = {} deg and zmax = {} deg",
                    self.z_min_rad.to_degrees(),
                    self.z_max_rad.to_degrees()
                ),
            });
        }
        Ok(())
    }
}

/// Precession rate (rev/yr) of the nominal scanning law for a nominal speed S, averaged over the precession phase.
pub fn precession_rate(xi_rad: f64, s: f64) -> f64 {
    let (sin_xi, cos_xi) = xi_rad.sin_cos();
    let d_nu = TAU / NU_SAMPLES as f64;
    let dlon: f64 = (0..NU_SAMPLES)
        .map(|i| {
            let nu = (i as f64 + 0.5) * d_nu;
            d_nu / nominal_kappa(s, sin_xi, cos_xi, nu)
        })
        .sum();
    TAU / dlon
}

/// Nominal speed S matching the precession rate, found by bisection.
pub fn nominal_speed(xi_rad: f64, prec_rate_rev_yr: f64) -> Result<f64, EvaluationError> {
    let unreachable = EvaluationError::PrecessionRateUnreachable {
        prec_rate: prec_rate_rev_yr,
    };
    if !prec_rate_rev_yr.is_finite()
        || prec_rate_rev_yr < precession_rate(xi_rad, S_MIN)
        || prec_rate_rev_yr > precession_rate(xi_rad, S_MAX)
    {
        return Err(unreachable);
    }

    let (mut lo, mut hi) = (S_MIN, S_MAX);
    for _ in 0..100 {
        let mid = 0.5 * (lo + hi);
        if precession_rate(xi_rad, mid) < prec_rate_rev_yr {
            lo = mid;
        } else {
            hi = mid;
        }
        if hi - lo < 1e-13 {
            break;
        }
    }
    Ok(0.5 * (lo + hi))
}

/// Nominal dν/dλ
fn nominal_kappa(s: f64, sin_xi: f64, cos_xi: f64, nu: f64) -> f64 {
    let (sin_nu, cos_nu) = nu.sin_cos();
    ((s * s - cos_nu * cos_nu).max(0.0).sqrt() + cos_xi * sin_nu) / sin_xi
}

/// Smooth step from 0 to 1 between the reduced (x = 0) and nominal (x = 1) precession speeds
fn transition_kappa(x: f64, kappa_n: f64, kappa_r: f64) -> f64 {
    let p = if x < 0.5 {
        x * x * (3.0 - 2.0 * x)
    } else {
        1.0 - (1.0 - x) * (1.0 - x) * (1.0 + 2.0 * x)
    };
    ((1.0 - p) * kappa_r * kappa_r + p * kappa_n * kappa_n).sqrt()
}

fn sigmoid(x: f64) -> f64 {
    0.5 * (1.0 + x.tanh())
}

/// Constants of the modified scanning law, computed by `Msl::initialize`
#[derive(Clone, Debug)]
struct MslConstants {
    s_nom: f64,
    s_red: f64,
    sin_xi: f64,
    cos_xi: f64,
    areas: Vec<IcrsArea>,
    /// Precession phase and spin phase offset at the start time
    y_beg: Vector2<f64>,
}

/// Modified scanning law.
///
/// The precession phase ν and the spin phase offset ΔΩ are integrated with RK4, with the time expressed in days.
/// When the scanning great circle gets close to a high density area, the precession slows down to the reduced
/// speed, with smooth transitions on both sides.
///
/// The law is set up in two phases: build it with `Msl::new` and the `with_*` methods, then call `initialize`
/// before the first query.
///
/// The state is kept at checkpoints every few hours from the start time, filled on demand. Each checkpoint is
/// integrated from the previous one, and each query from the closest checkpoint between the start and the query
/// epoch. The result of a query is therefore a function of its epoch only, whatever the previous queries.
#[derive(Debug)]
pub struct Msl {
    params: ScanningLawParameters,
    msl: MslParameters,
    start: Epoch,
    max_step: Duration,
    constants: Option<MslConstants>,
    /// State at `start + k * checkpoint_interval()`, keyed by k. The keys are contiguous and include 0.
    checkpoints: Mutex<BTreeMap<i64, Vector2<f64>>>,
}

fn checkpoint_interval() -> Duration {
    CHECKPOINT_HOURS * Unit::Hour
}

impl Msl {
    pub fn new(params: ScanningLawParameters, start: Epoch) -> Self {
        Self {
            params,
            msl: MslParameters::default(),
            start,
            max_step: 150 * Unit::Second,
            constants: None,
            checkpoints: Mutex::new(BTreeMap::new()),
        }
    }

    /// Sets the MSL tuning, `initialize` must be called again afterwards
    pub fn with_msl_parameters(mut self, msl: MslParameters) -> Self {
        self.msl = msl;
        self.reset();
        self
    }

    /// Sets the maximum integration step, `initialize` must be called again afterwards
    pub fn with_max_step(mut self, max_step: Duration) -> Self {
        self.max_step = max_step;
        self.reset();
        self
    }

    fn reset(&mut self) {
        self.constants = None;
        self.checkpoints
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn params(&self) -> &ScanningLawParameters {
        &self.params
    }

    pub fn start(&self) -> Epoch {
        self.start
    }

    pub fn is_initialized(&self) -> bool {
        self.constants.is_some()
    }

    /// Nominal speed S of this law, once initialized
    pub fn nominal_speed(&self) -> Option<f64> {
        self.constants.as_ref().map(|c| c.s_nom)
    }

    /// Computes the constants of the law and its state at the start time.
    pub fn initialize(&mut self) -> Result<(), EvaluationError> {
        self.reset();
        self.params.validate()?;
        self.msl.validate()?;
        if self.params.ref_epoch > self.start {
            return Err(EvaluationError::RefEpochAfterStart {
                ref_epoch: self.params.ref_epoch,
                start: self.start,
            });
        }

        let s_nom = nominal_speed(self.params.ref_xi_rad, self.params.prec_rate_rev_yr)?;
        let (sin_xi, cos_xi) = self.params.ref_xi_rad.sin_cos();
        let areas: Vec<IcrsArea> = self
            .msl
            .areas
            .iter()
            .filter_map(|area| {
                let icrs = area.to_icrs();
                if icrs.is_none() {
                    warn!("ignoring high density area `{}` without any circle", area.name);
                }
                icrs
            })
            .collect();

        let mut constants = MslConstants {
            s_nom,
            s_red: self.msl.speed_reduction_factor * s_nom,
            sin_xi,
            cos_xi,
            areas,
            y_beg: Vector2::new(self.params.ref_nu_rad, self.params.ref_omega_rad),
        };

        if self.params.ref_epoch < self.start {
            let y_beg = integrate(
                |epoch, y| Ok::<_, EvaluationError>(self.derivative(&constants, epoch, y)),
                self.params.ref_epoch,
                &constants.y_beg,
                self.start,
                self.max_step,
                Unit::Day,
            )?;
            if !y_beg.iter().all(|v| v.is_finite()) {
                return Err(EvaluationError::NonFiniteState { epoch: self.start });
            }
            constants.y_beg = y_beg;
        }

        debug!(
            "MSL initialized at {} with S = {:.6} ({})",
            self.start, s_nom, self.params
        );
        self.lock_checkpoints().insert(0, constants.y_beg);
        self.constants = Some(constants);
        Ok(())
    }

    pub fn heliotropic_angles_at(&self, epoch: Epoch) -> Result<HeliotropicAngles, EvaluationError> {
        let constants = self.constants.as_ref().ok_or(EvaluationError::NotInitialized)?;
        let y = self.state_at(constants, epoch)?;
        let omega = y[1] + TAU * self.params.spin_revolution_fraction(epoch);
        Ok(HeliotropicAngles {
            xi_rad: self.params.ref_xi_rad,
            nu_rad: y[0].rem_euclid(TAU),
            omega_rad: omega.rem_euclid(TAU),
        })
    }

    /// Scanning regime at the provided epoch
    pub fn scan_state_at(&self, epoch: Epoch) -> Result<ScanState, EvaluationError> {
        let constants = self.constants.as_ref().ok_or(EvaluationError::NotInitialized)?;
        let y = self.state_at(constants, epoch)?;
        let sun = NominalSun::at(epoch);
        Ok(self.kappa(constants, &sun, &y).1)
    }

    fn state_at(&self, constants: &MslConstants, epoch: Epoch) -> Result<Vector2<f64>, EvaluationError> {
        let k = self.checkpoint_index(epoch);
        let y_k = self.checkpoint(constants, k)?;
        self.advance(constants, self.checkpoint_epoch(k), &y_k, epoch)
    }

    /// Index of the last checkpoint between the start time and `epoch`
    fn checkpoint_index(&self, epoch: Epoch) -> i64 {
        let interval_ns = checkpoint_interval().total_nanoseconds();
        // Integer division truncates towards zero, i.e. towards the start time
        let k = (epoch - self.start).total_nanoseconds() / interval_ns;
        k.clamp(i64::MIN as i128, i64::MAX as i128) as i64
    }

    fn checkpoint_epoch(&self, k: i64) -> Epoch {
        self.start + checkpoint_interval() * k
    }

    /// State at checkpoint `k`, integrating the missing checkpoints from the closest known one
    fn checkpoint(&self, constants: &MslConstants, k: i64) -> Result<Vector2<f64>, EvaluationError> {
        let mut checkpoints = self.lock_checkpoints();
        if let Some(y) = checkpoints.get(&k) {
            return Ok(*y);
        }

        let known = if k > 0 {
            checkpoints.last_key_value()
        } else {
            checkpoints.first_key_value()
        };
        let (mut i, mut y) = known
            .map(|(i, y)| (*i, *y))
            .unwrap_or((0, constants.y_beg));
        let dir = k.signum();
        while i != k {
            let next = i + dir;
            y = self.advance(constants, self.checkpoint_epoch(i), &y, self.checkpoint_epoch(next))?;
            checkpoints.insert(next, y);
            i = next;
        }
        Ok(y)
    }

    /// Integrates the state `y` from `from` to `to`
    fn advance(
        &self,
        constants: &MslConstants,
        from: Epoch,
        y: &Vector2<f64>,
        to: Epoch,
    ) -> Result<Vector2<f64>, EvaluationError> {
        let y = integrate(
            |t, y| Ok::<_, EvaluationError>(self.derivative(constants, t, y)),
            from,
            y,
            to,
            self.max_step,
            Unit::Day,
        )?;
        if y.iter().all(|v| v.is_finite()) {
            Ok(y)
        } else {
            Err(EvaluationError::NonFiniteState { epoch: to })
        }
    }

    fn lock_checkpoints(&self) -> MutexGuard<'_, BTreeMap<i64, Vector2<f64>>> {
        self.checkpoints.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Rates of the precession phase and the spin phase offset, in radians per day
    fn derivative(&self, constants: &MslConstants, epoch: Epoch, y: &Vector2<f64>) -> Vector2<f64> {
        let sun = NominalSun::at(epoch);
        let (kappa, _) = self.kappa(constants, &sun, y);
        let nu_dot = kappa * sun.longitude_dot_rad_day;
        let delta_omega_dot =
            -constants.cos_xi * nu_dot - constants.sin_xi * y[0].sin() * sun.longitude_dot_rad_day;
        Vector2::new(nu_dot, delta_omega_dot)
    }

    /// Precession speed dν/dλ and scanning regime for the state `y`
    fn kappa(&self, constants: &MslConstants, sun: &NominalSun, y: &Vector2<f64>) -> (f64, ScanState) {
        let kappa_n = nominal_kappa(constants.s_nom, constants.sin_xi, constants.cos_xi, y[0]);
        if constants.areas.is_empty() {
            return (kappa_n, ScanState::Nominal);
        }

        let z = spin_axis(&heliotropic_to_quaternion(
            sun.longitude_rad,
            self.params.ref_xi_rad,
            y[0],
            y[1],
        ));

        let (alt_min, closest) = constants
            .areas
            .iter()
            .map(|area| (area.altitude(&z), area))
            .fold((f64::INFINITY, None), |(best, best_area), (alt, area)| {
                if alt < best {
                    (alt, Some(area))
                } else {
                    (best, best_area)
                }
            });

        let area = match closest {
            Some(area) if alt_min < self.msl.z_max_rad => area,
            _ => return (kappa_n, ScanState::Nominal),
        };

        let s0 = ecliptic_pole().cross(&z).dot(&area.ref_dir);
        let s1 = sun.direction().cross(&z).dot(&area.ref_dir);
        let mut kappa_r = if s1 > 0.0 {
            kappa_n.min((constants.s_red - s0) / s1)
        } else if s1 < 0.0 {
            kappa_n.min((constants.s_red + s0) / -s1)
        } else {
            kappa_n
        };
        kappa_r = kappa_r.max(0.0);
        kappa_r = kappa_n - (kappa_n - kappa_r) * sigmoid((s1.abs() - self.msl.s1_min) / SIGMOID_WIDTH);

        if alt_min < self.msl.z_min_rad {
            (kappa_r, ScanState::Modified)
        } else {
            let x = (alt_min - self.msl.z_min_rad) / (self.msl.z_max_rad - self.msl.z_min_rad);
            (transition_kappa(x, kappa_n, kappa_r), ScanState::Transition)
        }
    }
}

impl AttitudeStrategy for Msl {
    fn orientation_at(&self, epoch: Epoch) -> Result<UnitQuaternion<f64>, EvaluationError> {
        let angles = self.heliotropic_angles_at(epoch)?;
        Ok(angles.to_quaternion(&NominalSun::at(epoch)))
    }
}
