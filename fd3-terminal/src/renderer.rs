/// ASCII rasterizer for terminal rendering
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use fd3_core::{Camera, HasseLayout, Mesh, Triangle};
use nalgebra::{Matrix4, Point3, Vector3};
use std::io::Write;

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Rows kept free at the top for the status line
const STATUS_ROWS: usize = 1;

/// ASCII renderer that converts 3D meshes and 2D diagrams to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
    }

    /// Character at a cell, for inspection
    pub fn cell(&self, x: usize, y: usize) -> char {
        self.char_buffer[y * self.width + x]
    }

    /// The buffer as lines of text
    pub fn lines(&self) -> Vec<String> {
        self.char_buffer
            .chunks(self.width.max(1))
            .map(|row| row.iter().collect())
            .collect()
    }

    pub fn render_mesh(&mut self, mesh: &Mesh, model_matrix: &Matrix4<f32>, camera: &Camera) {
        for triangle in &mesh.triangles {
            self.render_triangle(triangle, model_matrix, camera);
        }
    }

    fn render_triangle(&mut self, triangle: &Triangle, model_matrix: &Matrix4<f32>, camera: &Camera) {
        // Project vertices to screen space
        let mut screen_coords = [(0.0, 0.0, 0.0); 3];
        for (slot, vertex) in screen_coords.iter_mut().zip(&triangle.vertices) {
            match camera.project_to_screen(
                &vertex.position,
                model_matrix,
                self.width as u32,
                self.height as u32,
            ) {
                Some(projected) => *slot = projected,
                None => return, // Triangle is clipped
            }
        }

        // Shade by the face normal in world space against a light behind the viewer
        let normal = model_matrix.transform_vector(&triangle.calculate_normal());
        let Some(normal) = normal.try_normalize(f32::EPSILON) else {
            return;
        };
        let to_viewer = (camera.position - camera.target).normalize();
        let light_dir = (to_viewer + Vector3::new(0.0, 0.0, 0.5)).normalize();
        if normal.dot(&to_viewer) <= 0.0 {
            return; // Back face
        }
        let brightness = normal.dot(&light_dir).clamp(0.0, 1.0);

        // Map brightness to character, never blank for a visible face
        let char_index = (brightness * (LUMINOSITY_RAMP.len() - 1) as f32) as usize;
        let char_index = char_index.clamp(1, LUMINOSITY_RAMP.len() - 1);
        let character = LUMINOSITY_RAMP[char_index];

        // Rasterize triangle using scanline algorithm
        self.rasterize_triangle(&screen_coords, character);
    }

    fn rasterize_triangle(&mut self, coords: &[(f32, f32, f32); 3], character: char) {
        let (v0, v1, v2) = (coords[0], coords[1], coords[2]);

        // Bounding box
        let min_x = v0.0.min(v1.0).min(v2.0).floor() as i32;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil() as i32;
        let min_y = v0.1.min(v1.1).min(v2.1).floor() as i32;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(STATUS_ROWS as i32);
        let max_y = max_y.min(self.height as i32 - 1);

        // Scanline rasterization
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                // Barycentric coordinates
                if let Some((w0, w1, w2)) = barycentric(
                    (v0.0, v0.1),
                    (v1.0, v1.1),
                    (v2.0, v2.1),
                    (px, py),
                ) {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        // Interpolate depth
                        let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;
                        self.plot(x, y, depth, character);
                    }
                }
            }
        }
    }

    /// Draw projected 3D segments with slope characters
    pub fn render_segments(
        &mut self,
        segments: &[(Point3<f32>, Point3<f32>)],
        model_matrix: &Matrix4<f32>,
        camera: &Camera,
    ) {
        let (w, h) = (self.width as u32, self.height as u32);
        for (start, end) in segments {
            let a = camera.project_to_screen(start, model_matrix, w, h);
            let b = camera.project_to_screen(end, model_matrix, w, h);
            if let (Some(a), Some(b)) = (a, b) {
                self.draw_line(a, b);
            }
        }
        for (start, end) in segments {
            for point in [start, end] {
                if let Some((x, y, depth)) = camera.project_to_screen(point, model_matrix, w, h) {
                    // Slightly in front so joints win over the lines meeting there
                    self.plot(x as i32, y as i32, depth - 1e-4, 'o');
                }
            }
        }
    }

    /// Draw the Hasse diagram scaled to the whole grid, labels over edges
    pub fn render_hasse(&mut self, layout: &HasseLayout) {
        let margin_x = 4.0;
        let top = STATUS_ROWS as f32 + 1.0;
        let span_x = (self.width as f32 - 2.0 * margin_x).max(1.0);
        let span_y = (self.height as f32 - top - 2.0).max(1.0);
        let cell = |(x, y): (f64, f64)| {
            (
                margin_x + x as f32 * span_x,
                top + (1.0 - y as f32) * span_y,
                1.0,
            )
        };

        for &(lower, upper) in &layout.edges {
            self.draw_line(cell(layout.position(lower)), cell(layout.position(upper)));
        }
        for (element, &position) in layout.positions.iter().enumerate() {
            let (x, y, _) = cell(position);
            let label = element.to_string();
            let start = x.round() as i32 - label.len() as i32 / 2;
            for (offset, ch) in label.chars().enumerate() {
                self.plot(start + offset as i32, y.round() as i32, 0.0, ch);
            }
        }
    }

    /// Depth-tested line between two screen points
    fn draw_line(&mut self, a: (f32, f32, f32), b: (f32, f32, f32)) {
        let (dx, dy) = (b.0 - a.0, b.1 - a.1);
        let character = slope_char(dx, dy);
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as usize;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let x = a.0 + dx * t;
            let y = a.1 + dy * t;
            let depth = a.2 + (b.2 - a.2) * t;
            self.plot(x.round() as i32, y.round() as i32, depth, character);
        }
    }

    fn plot(&mut self, x: i32, y: i32, depth: f32, character: char) {
        if x < 0 || y < STATUS_ROWS as i32 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        if depth <= self.depth_buffer[idx] {
            self.depth_buffer[idx] = depth;
            self.char_buffer[idx] = character;
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = y * self.width + x;
                let c = self.char_buffer[idx];

                // Color based on character intensity
                let color = match c {
                    ' ' | '.' | ':' => Color::DarkGrey,
                    '-' | '=' => Color::Grey,
                    '+' | '*' => Color::White,
                    '#' | '%' | '@' => Color::Cyan,
                    '0'..='9' | 'o' => Color::Yellow,
                    _ => Color::White,
                };

                writer.queue(SetForegroundColor(color))?;
                writer.queue(Print(c))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Line character for a screen direction; rows grow downwards
fn slope_char(dx: f32, dy: f32) -> char {
    if dx.abs() > 2.0 * dy.abs() {
        '-'
    } else if dy.abs() > 2.0 * dx.abs() {
        '|'
    } else if (dx > 0.0) == (dy < 0.0) {
        '/'
    } else {
        '\\'
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
