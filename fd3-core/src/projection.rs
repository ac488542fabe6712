/// Camera and projection onto a character grid
use nalgebra::{Matrix4, Point3, Vector3};

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectionMode {
    Orthographic,
    Perspective,
}

/// Terminal cells are roughly twice as tall as they are wide
pub const CELL_ASPECT: f32 = 2.0;

/// Camera looking at the origin with the lattice's z axis pointing up
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub mode: ProjectionMode,
}

impl Camera {
    /// Camera for a grid of `width` x `height` cells
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            position: Point3::new(0.0, -4.0, 0.0),
            target: Point3::new(0.0, 0.0, 0.0),
            up: Vector3::new(0.0, 0.0, 1.0),
            fov: std::f32::consts::PI / 3.0, // 60 degrees
            aspect: width.max(1) as f32 / (height.max(1) as f32 * CELL_ASPECT),
            near: 0.1,
            far: 100.0,
            mode: ProjectionMode::Perspective,
        }
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        match self.mode {
            ProjectionMode::Perspective => {
                Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
            }
            ProjectionMode::Orthographic => {
                let height = (self.position - self.target).norm() * (self.fov / 2.0).tan() * 2.0;
                let width = height * self.aspect;
                Matrix4::new_orthographic(
                    -width / 2.0,
                    width / 2.0,
                    -height / 2.0,
                    height / 2.0,
                    self.near,
                    self.far,
                )
            }
        }
    }

    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            ProjectionMode::Perspective => ProjectionMode::Orthographic,
            ProjectionMode::Orthographic => ProjectionMode::Perspective,
        };
    }

    /// Project a 3D point to screen space as (column, row, depth)
    ///
    /// Depth is the normalized device z, smaller is nearer. Points outside
    /// the view volume are rejected.
    pub fn project_to_screen(
        &self,
        point: &Point3<f32>,
        model_matrix: &Matrix4<f32>,
        width: u32,
        height: u32,
    ) -> Option<(f32, f32, f32)> {
        let mvp = self.projection_matrix() * self.view_matrix() * model_matrix;
        let clip = mvp * point.to_homogeneous();

        // Behind the camera or on its plane
        if clip.w <= 1e-6 {
            return None;
        }
        let ndc = clip.xyz() / clip.w;

        if ndc.iter().any(|c| !(-1.0..=1.0).contains(c)) {
            return None;
        }

        // Convert to screen space
        let screen_x = (ndc.x + 1.0) * 0.5 * width as f32;
        let screen_y = (1.0 - ndc.y) * 0.5 * height as f32;

        Some((screen_x, screen_y, ndc.z))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(80, 24)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_creation() {
        let camera = Camera::new(80, 40);
        assert_eq!(camera.mode, ProjectionMode::Perspective);
        assert!((camera.aspect - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_empty_grid_keeps_a_valid_projection() {
        for (width, height) in [(0, 24), (80, 0), (0, 0)] {
            let camera = Camera::new(width, height);
            assert!(camera.aspect > 0.0 && camera.aspect.is_finite());
            assert!(camera.projection_matrix().iter().all(|v| v.is_finite()));
        }
    }

    #[test]
    fn test_view_matrix() {
        let camera = Camera::new(800, 600);
        let view = camera.view_matrix();
        // View matrix should be non-zero
        assert!(view.norm() > 0.0);
    }

    #[test]
    fn test_origin_projects_to_centre() {
        let camera = Camera::new(80, 40);
        let (x, y, depth) = camera
            .project_to_screen(&Point3::origin(), &Matrix4::identity(), 80, 40)
            .unwrap();
        assert!((x - 40.0).abs() < 1e-4);
        assert!((y - 20.0).abs() < 1e-4);
        assert!(depth > -1.0 && depth < 1.0);
    }

    #[test]
    fn test_up_is_up() {
        let camera = Camera::new(80, 40);
        let identity = Matrix4::identity();
        let (_, high, _) = camera
            .project_to_screen(&Point3::new(0.0, 0.0, 1.0), &identity, 80, 40)
            .unwrap();
        let (_, low, _) = camera
            .project_to_screen(&Point3::new(0.0, 0.0, -1.0), &identity, 80, 40)
            .unwrap();
        // Screen rows grow downwards
        assert!(high < low);
    }

    #[test]
    fn test_nearer_point_has_smaller_depth() {
        let camera = Camera::new(80, 40);
        let identity = Matrix4::identity();
        let near = camera
            .project_to_screen(&Point3::new(0.0, -1.0, 0.0), &identity, 80, 40)
            .unwrap();
        let far = camera
            .project_to_screen(&Point3::new(0.0, 1.0, 0.0), &identity, 80, 40)
            .unwrap();
        assert!(near.2 < far.2);
    }

    #[test]
    fn test_behind_camera_is_clipped() {
        let camera = Camera::new(80, 40);
        let behind = Point3::new(0.0, -10.0, 0.0);
        assert!(camera
            .project_to_screen(&behind, &Matrix4::identity(), 80, 40)
            .is_none());
    }

    #[test]
    fn test_orthographic_toggle() {
        let mut camera = Camera::new(80, 40);
        camera.toggle_mode();
        assert_eq!(camera.mode, ProjectionMode::Orthographic);
        assert!(camera
            .project_to_screen(&Point3::new(0.5, 0.0, 0.5), &Matrix4::identity(), 80, 40)
            .is_some());
    }
}
