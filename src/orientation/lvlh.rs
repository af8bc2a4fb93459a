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

use super::OrientationProvider;
use crate::linalg::{Matrix3, Rotation3, UnitQuaternion, Vector3};
use crate::time::Epoch;
use std::sync::Arc;

/// Opaque handle to an entity of the scene
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct EntityHandle(pub u64);

/// The part of the scene graph needed to track a body.
pub trait SceneGraph {
    fn resolve_by_name(&self, name: &str) -> Option<EntityHandle>;

    /// Position of the entity in a common frame of the scene
    fn position(&self, entity: EntityHandle) -> Vector3<f64>;

    fn parent(&self, entity: EntityHandle) -> Option<EntityHandle>;

    fn is_celestial_body(&self, entity: EntityHandle) -> bool;
}

impl<S: SceneGraph + ?Sized> SceneGraph for &S {
    fn resolve_by_name(&self, name: &str) -> Option<EntityHandle> {
        (**self).resolve_by_name(name)
    }

    fn position(&self, entity: EntityHandle) -> Vector3<f64> {
        (**self).position(entity)
    }

    fn parent(&self, entity: EntityHandle) -> Option<EntityHandle> {
        (**self).parent(entity)
    }

    fn is_celestial_body(&self, entity: EntityHandle) -> bool {
        (**self).is_celestial_body(entity)
    }
}

impl<S: SceneGraph + ?Sized> SceneGraph for Arc<S> {
    fn resolve_by_name(&self, name: &str) -> Option<EntityHandle> {
        (**self).resolve_by_name(name)
    }

    fn position(&self, entity: EntityHandle) -> Vector3<f64> {
        (**self).position(entity)
    }

    fn parent(&self, entity: EntityHandle) -> Option<EntityHandle> {
        (**self).parent(entity)
    }

    fn is_celestial_body(&self, entity: EntityHandle) -> bool {
        (**self).is_celestial_body(entity)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum LvlhState {
    Uninitialized,
    Resolved {
        body: EntityHandle,
        center: EntityHandle,
    },
    /// The body or its central body could not be found, this is never retried
    Unresolvable,
}

/// Local vertical, local horizontal orientation of a body, derived from its motion around the closest celestial
/// body up its parent chain.
///
/// The body Z axis is the radial direction, the X axis is the direction of motion projected on the local
/// horizontal plane, and Y completes the right handed frame. Until the body has moved, the direction of motion is
/// the +X axis of the scene.
#[derive(Debug)]
pub struct Lvlh<S: SceneGraph> {
    scene: S,
    target: String,
    state: LvlhState,
    last_position: Option<Vector3<f64>>,
    last_direction: Vector3<f64>,
    orientation: UnitQuaternion<f64>,
}

impl<S: SceneGraph> Lvlh<S> {
    pub fn new(scene: S, target: impl Into<String>) -> Self {
        Self {
            scene,
            target: target.into(),
            state: LvlhState::Uninitialized,
            last_position: None,
            last_direction: Vector3::x(),
            orientation: UnitQuaternion::identity(),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Finds the tracked body and its closest celestial ancestor. Only the first call does the lookup.
    pub fn resolve(&mut self) -> bool {
        if self.state == LvlhState::Uninitialized {
            self.state = match self.lookup() {
                Some((body, center)) => {
                    debug!("LVLH of {} computed around entity {:?}", self.target, center);
                    LvlhState::Resolved { body, center }
                }
                None => {
                    warn!("LVLH target {} or its central body cannot be found", self.target);
                    LvlhState::Unresolvable
                }
            };
        }
        matches!(self.state, LvlhState::Resolved { .. })
    }

    fn lookup(&self) -> Option<(EntityHandle, EntityHandle)> {
        let body = self.scene.resolve_by_name(&self.target)?;
        let mut ancestor = self.scene.parent(body);
        while let Some(candidate) = ancestor {
            if self.scene.is_celestial_body(candidate) {
                return Some((body, candidate));
            }
            ancestor = self.scene.parent(candidate);
        }
        None
    }

    /// Last direction of motion, relative to the central body
    pub fn direction(&self) -> Vector3<f64> {
        self.last_direction
    }
}

impl<S: SceneGraph> OrientationProvider for Lvlh<S> {
    fn update_orientation(&mut self, _epoch: Epoch) -> Option<UnitQuaternion<f64>> {
        if !self.resolve() {
            return None;
        }
        let (body, center) = match self.state {
            LvlhState::Resolved { body, center } => (body, center),
            _ => return None,
        };

        let position = self.scene.position(body) - self.scene.position(center);
        if let Some(last) = self.last_position {
            if last != position {
                if let Some(direction) = (position - last).try_normalize(f64::EPSILON) {
                    self.last_direction = direction;
                }
            }
        }
        self.last_position = Some(position);

        let up = match position.try_normalize(f64::EPSILON) {
            Some(up) => up,
            None => return Some(self.orientation),
        };
        let side = match up.cross(&self.last_direction).try_normalize(f64::EPSILON) {
            Some(side) => side,
            None => return Some(self.orientation),
        };
        let forward = side.cross(&up);

        let dcm = Matrix3::from_columns(&[forward, side, up]);
        let q = UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix_unchecked(dcm));
        self.orientation = UnitQuaternion::new_normalize(q.into_inner());
        Some(self.orientation)
    }

    fn current_orientation(&self) -> UnitQuaternion<f64> {
        self.orientation
    }

    fn has_orientation(&self) -> bool {
        matches!(self.state, LvlhState::Resolved { .. })
    }
}
