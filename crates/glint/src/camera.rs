//! # Orthographic Camera
//!
//! 2D camera producing a column-major view-projection matrix, plus a
//! controller that pans, rotates and zooms it from input.

use crate::events::{Dispatch, Event};
use crate::input::{Input, Key};
use crate::timestep::Timestep;

/// Column-major 4x4 matrix.
pub type Mat4 = [f32; 16];

/// The identity matrix.
pub const IDENTITY: Mat4 = [
    1.0, 0.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, 0.0, //
    0.0, 0.0, 1.0, 0.0, //
    0.0, 0.0, 0.0, 1.0,
];

/// Orthographic projection onto `[-1, 1]` clip space, depth `[-1, 1]`.
#[must_use]
pub fn orthographic(left: f32, right: f32, bottom: f32, top: f32) -> Mat4 {
    let mut m = IDENTITY;
    m[0] = 2.0 / (right - left);
    m[5] = 2.0 / (top - bottom);
    m[10] = -1.0;
    m[12] = -(right + left) / (right - left);
    m[13] = -(top + bottom) / (top - bottom);
    m
}

/// Multiplies `a * b`.
#[must_use]
pub fn multiply(a: &Mat4, b: &Mat4) -> Mat4 {
    let mut out = [0.0; 16];
    for col in 0..4 {
        for row in 0..4 {
            out[col * 4 + row] = (0..4).map(|k| a[k * 4 + row] * b[col * 4 + k]).sum();
        }
    }
    out
}

/// Applies `m` to a point (w = 1).
#[must_use]
pub fn transform_point(m: &Mat4, point: [f32; 3]) -> [f32; 3] {
    let mut out = [0.0; 3];
    for (row, value) in out.iter_mut().enumerate() {
        *value = m[row] * point[0] + m[4 + row] * point[1] + m[8 + row] * point[2] + m[12 + row];
    }
    out
}

/// A camera looking down -Z at the XY plane.
#[derive(Clone, Debug, PartialEq)]
pub struct OrthographicCamera {
    projection: Mat4,
    view: Mat4,
    view_projection: Mat4,
    position: [f32; 3],
    /// Degrees, counter-clockwise.
    rotation: f32,
}

impl OrthographicCamera {
    /// Creates a camera showing the given bounds.
    #[must_use]
    pub fn new(left: f32, right: f32, bottom: f32, top: f32) -> Self {
        let projection = orthographic(left, right, bottom, top);
        Self {
            projection,
            view: IDENTITY,
            view_projection: projection,
            position: [0.0; 3],
            rotation: 0.0,
        }
    }

    /// Replaces the visible bounds.
    pub fn set_projection(&mut self, left: f32, right: f32, bottom: f32, top: f32) {
        self.projection = orthographic(left, right, bottom, top);
        self.view_projection = multiply(&self.projection, &self.view);
    }

    /// World-space position.
    #[must_use]
    pub const fn position(&self) -> [f32; 3] {
        self.position
    }

    /// Moves the camera.
    pub fn set_position(&mut self, position: [f32; 3]) {
        self.position = position;
        self.recalculate_view();
    }

    /// Rotation in degrees.
    #[must_use]
    pub const fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Rotates the camera to `degrees`.
    pub fn set_rotation(&mut self, degrees: f32) {
        self.rotation = degrees;
        self.recalculate_view();
    }

    /// The projection matrix.
    #[must_use]
    pub const fn projection(&self) -> &Mat4 {
        &self.projection
    }

    /// The view matrix (inverse of the camera transform).
    #[must_use]
    pub const fn view(&self) -> &Mat4 {
        &self.view
    }

    /// `projection * view`, ready for upload.
    #[must_use]
    pub const fn view_projection(&self) -> &Mat4 {
        &self.view_projection
    }

    fn recalculate_view(&mut self) {
        // Inverse of translate(position) * rotate_z(rotation).
        let (sin, cos) = self.rotation.to_radians().sin_cos();
        let [x, y, z] = self.position;
        let mut view = IDENTITY;
        view[0] = cos;
        view[1] = -sin;
        view[4] = sin;
        view[5] = cos;
        view[12] = -cos * x - sin * y;
        view[13] = sin * x - cos * y;
        view[14] = -z;
        self.view = view;
        self.view_projection = multiply(&self.projection, &self.view);
    }
}

/// Smallest zoom level the controller allows.
pub const MIN_ZOOM: f32 = 0.25;

/// Drives an [`OrthographicCamera`] from keyboard and scroll input.
///
/// - WASD pans, faster when zoomed out
/// - Q/E rotate when rotation is enabled
/// - Scrolling zooms; resizing keeps the aspect ratio in sync
#[derive(Clone, Debug)]
pub struct CameraController {
    aspect_ratio: f32,
    zoom_level: f32,
    rotation_enabled: bool,
    position: [f32; 3],
    rotation: f32,
    /// World units per second at zoom 1.
    pub translation_speed: f32,
    /// Degrees per second.
    pub rotation_speed: f32,
    camera: OrthographicCamera,
}

impl CameraController {
    /// Creates a controller for a viewport of the given aspect ratio.
    #[must_use]
    pub fn new(aspect_ratio: f32, rotation_enabled: bool) -> Self {
        let zoom_level = 1.0;
        Self {
            aspect_ratio,
            zoom_level,
            rotation_enabled,
            position: [0.0; 3],
            rotation: 0.0,
            translation_speed: 5.0,
            rotation_speed: 180.0,
            camera: OrthographicCamera::new(
                -aspect_ratio * zoom_level,
                aspect_ratio * zoom_level,
                -zoom_level,
                zoom_level,
            ),
        }
    }

    /// Applies held keys for one frame.
    pub fn on_update(&mut self, ts: Timestep, input: &dyn Input) {
        let (sin, cos) = self.rotation.to_radians().sin_cos();
        let step = self.translation_speed * self.zoom_level * ts.seconds();

        if input.is_key_pressed(Key::A) {
            self.position[0] -= cos * step;
            self.position[1] -= sin * step;
        } else if input.is_key_pressed(Key::D) {
            self.position[0] += cos * step;
            self.position[1] += sin * step;
        }

        if input.is_key_pressed(Key::W) {
            self.position[0] += -sin * step;
            self.position[1] += cos * step;
        } else if input.is_key_pressed(Key::S) {
            self.position[0] -= -sin * step;
            self.position[1] -= cos * step;
        }

        if self.rotation_enabled {
            if input.is_key_pressed(Key::Q) {
                self.rotation += self.rotation_speed * ts.seconds();
            }
            if input.is_key_pressed(Key::E) {
                self.rotation -= self.rotation_speed * ts.seconds();
            }
            if self.rotation > 180.0 {
                self.rotation -= 360.0;
            } else if self.rotation <= -180.0 {
                self.rotation += 360.0;
            }
            self.camera.set_rotation(self.rotation);
        }

        self.camera.set_position(self.position);
    }

    /// Reacts to scroll and resize. Never marks the event handled.
    pub fn on_event(&mut self, dispatch: &mut Dispatch) {
        match *dispatch.event() {
            Event::MouseScrolled { dy, .. } => {
                self.zoom_level = (self.zoom_level - dy * 0.25).max(MIN_ZOOM);
                self.update_projection();
            }
            Event::WindowResized { width, height } if height > 0 => {
                #[allow(clippy::cast_precision_loss)]
                let aspect_ratio = width as f32 / height as f32;
                self.aspect_ratio = aspect_ratio;
                self.update_projection();
            }
            _ => {}
        }
    }

    /// The controlled camera.
    #[must_use]
    pub const fn camera(&self) -> &OrthographicCamera {
        &self.camera
    }

    /// Current zoom level (half the visible height).
    #[must_use]
    pub const fn zoom_level(&self) -> f32 {
        self.zoom_level
    }

    /// Sets the zoom level, clamped to [`MIN_ZOOM`].
    pub fn set_zoom_level(&mut self, zoom_level: f32) {
        self.zoom_level = zoom_level.max(MIN_ZOOM);
        self.update_projection();
    }

    /// Width over height of the viewport.
    #[must_use]
    pub const fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    fn update_projection(&mut self) {
        self.camera.set_projection(
            -self.aspect_ratio * self.zoom_level,
            self.aspect_ratio * self.zoom_level,
            -self.zoom_level,
            self.zoom_level,
        );
    }
}
