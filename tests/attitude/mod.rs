use nyx_attitude::attitude::{AttitudeStrategy, EvaluationError};
use nyx_attitude::linalg::UnitQuaternion;
use nyx_attitude::time::Epoch;

mod builder;
mod index;
mod server;

/// A strategy which always fails, to exercise the fallbacks
#[derive(Debug)]
pub(crate) struct FailingStrategy;

impl AttitudeStrategy for FailingStrategy {
    fn orientation_at(&self, epoch: Epoch) -> Result<UnitQuaternion<f64>, EvaluationError> {
        Err(EvaluationError::NonFiniteState { epoch })
    }
}
