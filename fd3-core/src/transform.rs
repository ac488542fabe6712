/// Model rotation state and the matrices placing the model in view
use nalgebra::{Matrix4, Point3, Vector3};
use std::f32::consts::TAU;

/// Rotation state around three axes (in radians)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationState {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl RotationState {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    /// Rotate by delta amounts (in radians), keeping each angle in [0, 2π)
    pub fn rotate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.x = (self.x + dx).rem_euclid(TAU);
        self.y = (self.y + dy).rem_euclid(TAU);
        self.z = (self.z + dz).rem_euclid(TAU);
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::zero()
    }
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Create a rotation matrix from a rotation state
    pub fn rotation_matrix(rotation: &RotationState) -> Matrix4<f32> {
        let rx = Matrix4::new_rotation(Vector3::new(rotation.x, 0.0, 0.0));
        let ry = Matrix4::new_rotation(Vector3::new(0.0, rotation.y, 0.0));
        let rz = Matrix4::new_rotation(Vector3::new(0.0, 0.0, rotation.z));

        // Apply rotations in order: Z, Y, X
        rz * ry * rx
    }

    /// Centre the box `min..max` on the origin and scale its longest side to 2
    pub fn fit_matrix(min: &Point3<f32>, max: &Point3<f32>) -> Matrix4<f32> {
        let centre = nalgebra::center(min, max);
        let extent = (max - min).max();
        let scale = if extent > f32::EPSILON { 2.0 / extent } else { 1.0 };
        Matrix4::new_scaling(scale) * Matrix4::new_translation(&-centre.coords)
    }

    /// Rotation applied after fitting
    pub fn model_matrix(
        rotation: &RotationState,
        min: &Point3<f32>,
        max: &Point3<f32>,
    ) -> Matrix4<f32> {
        Self::rotation_matrix(rotation) * Self::fit_matrix(min, max)
    }
}
