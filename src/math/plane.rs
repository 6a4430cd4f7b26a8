//! Oriented planes
//!
//! A plane is stored as a unit normal and a signed distance such that every
//! point `p` on the plane satisfies `normal.dot(p) + distance == 0`. Points on
//! the side the normal points to have a positive signed distance.
//!
//! Points exactly on the plane count as being on the negative side, both for
//! [`Plane::get_side`] and [`Plane::same_side`].

use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::Vec3;
use super::tolerance::NEAR_ZERO;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    normal: Vec3,
    distance: f32,
}

impl Plane {
    /// Plane with the given normal going through `point`
    pub fn new(normal: Vec3, point: Vec3) -> Self {
        let normal = normal.normalized();
        Self {
            normal,
            distance: -normal.dot(point),
        }
    }

    pub fn from_normal_distance(normal: Vec3, distance: f32) -> Self {
        Self {
            normal: normal.normalized(),
            distance,
        }
    }

    /// Plane through three points, winding `a -> b -> c` counter-clockwise
    /// when seen from the side the normal points to.
    ///
    /// Collinear points give a zero normal, which is logged.
    pub fn from_points(a: Vec3, b: Vec3, c: Vec3) -> Self {
        let normal = (b - a).cross(c - a).normalized();
        if normal == Vec3::ZERO {
            warn!("Degenerate plane from collinear points {a}, {b}, {c}");
        }
        Self {
            normal,
            distance: -normal.dot(a),
        }
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn set_normal_and_position(&mut self, normal: Vec3, point: Vec3) {
        *self = Self::new(normal, point);
    }

    pub fn set_3_points(&mut self, a: Vec3, b: Vec3, c: Vec3) {
        *self = Self::from_points(a, b, c);
    }

    /// Signed distance, positive on the side the normal points to
    pub fn get_distance_to_point(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.distance
    }

    /// True for points strictly on the positive side
    pub fn get_side(&self, point: Vec3) -> bool {
        self.get_distance_to_point(point) > 0.0
    }

    pub fn same_side(&self, p0: Vec3, p1: Vec3) -> bool {
        self.get_side(p0) == self.get_side(p1)
    }

    pub fn closest_point_on_plane(&self, point: Vec3) -> Vec3 {
        point - self.normal * self.get_distance_to_point(point)
    }

    pub fn flip(&mut self) {
        *self = self.flipped();
    }

    pub fn flipped(&self) -> Self {
        Self {
            normal: -self.normal,
            distance: -self.distance,
        }
    }

    /// Adds the normal component of `translation` to the distance
    pub fn translate(&mut self, translation: Vec3) {
        self.distance += self.normal.dot(translation);
    }

    pub fn translated(&self, translation: Vec3) -> Self {
        let mut plane = *self;
        plane.translate(translation);
        plane
    }

    /// Distance along `direction` from `origin` to the plane.
    ///
    /// `None` for rays parallel to the plane and for crossings behind the
    /// origin. `direction` does not need to be normalized, the result is in
    /// multiples of its length.
    pub fn raycast(&self, origin: Vec3, direction: Vec3) -> Option<f32> {
        let denominator = self.normal.dot(direction);
        if denominator.abs() < NEAR_ZERO {
            return None;
        }
        let t = -self.get_distance_to_point(origin) / denominator;
        (t >= 0.0).then_some(t)
    }
}

impl fmt::Display for Plane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(normal: {}, distance: {})", self.normal, self.distance)
    }
}
