//! Orbit camera for the environment recipe.

use glam::{Mat4, Vec3};

use cookbook_engine::input::{InputFrame, InputState, MouseButton};

const PITCH_LIMIT: f32 = 89.0 * std::f32::consts::PI / 180.0;
const MIN_DISTANCE: f32 = 0.5;
const MAX_DISTANCE: f32 = 20.0;

/// Radians of rotation per logical pixel of drag.
const DRAG_SENSITIVITY: f32 = 0.005;
/// Distance factor per wheel line; scrolling up moves closer.
const ZOOM_STEP: f32 = 0.9;

/// Camera circling a target point at a given distance.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    /// Rotation about +Y, in radians. Zero looks down -Z.
    yaw: f32,
    /// Elevation in radians, positive above the target.
    pitch: f32,
    distance: f32,
    target: Vec3,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(Vec3::ZERO, 2.0)
    }
}

impl OrbitCamera {
    pub fn new(target: Vec3, distance: f32) -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            distance: distance.clamp(MIN_DISTANCE, MAX_DISTANCE),
            target,
        }
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Rotates by a drag of `(dx, dy)` logical pixels.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw = (self.yaw - dx * DRAG_SENSITIVITY) % std::f32::consts::TAU;
        self.pitch = (self.pitch + dy * DRAG_SENSITIVITY).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Moves closer for positive `lines`, farther for negative.
    pub fn zoom(&mut self, lines: f32) {
        self.distance = (self.distance * ZOOM_STEP.powf(lines)).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    /// Applies this frame's left-drag and wheel input.
    pub fn update(&mut self, input: &InputState, frame: &InputFrame) {
        if input.button_down(MouseButton::Left) {
            let (dx, dy) = frame.pointer_delta;
            self.rotate(dx, dy);
        }
        if frame.wheel_lines != 0.0 {
            self.zoom(frame.wheel_lines);
        }
    }

    /// World-space eye position.
    pub fn position(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        // Eye sits opposite the viewing direction.
        self.target + Vec3::new(-sy * cp, sp, cy * cp) * self.distance
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    /// View matrix without translation, for drawing the skybox.
    pub fn rotation_only_view(&self) -> Mat4 {
        Mat4::look_at_rh(Vec3::ZERO, self.target - self.position(), Vec3::Y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cookbook_engine::input::{InputEvent, MouseButtonState};

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn default_eye_is_on_positive_z() {
        let cam = OrbitCamera::new(Vec3::ZERO, 3.0);
        assert!(approx(cam.position(), Vec3::new(0.0, 0.0, 3.0)));
    }

    #[test]
    fn pitch_is_clamped_short_of_the_pole() {
        let mut cam = OrbitCamera::default();
        cam.rotate(0.0, 1.0e6);
        assert!((cam.pitch() - PITCH_LIMIT).abs() < 1e-6);
        cam.rotate(0.0, -1.0e7);
        assert!((cam.pitch() + PITCH_LIMIT).abs() < 1e-6);
        assert!(!cam.view().is_nan());
    }

    #[test]
    fn distance_stays_in_range() {
        let mut cam = OrbitCamera::default();
        cam.zoom(100.0);
        assert_eq!(cam.distance(), MIN_DISTANCE);
        cam.zoom(-100.0);
        assert_eq!(cam.distance(), MAX_DISTANCE);
        assert_eq!(OrbitCamera::new(Vec3::ZERO, 0.0).distance(), MIN_DISTANCE);
    }

    #[test]
    fn zoom_in_moves_closer() {
        let mut cam = OrbitCamera::new(Vec3::ZERO, 2.0);
        cam.zoom(1.0);
        assert!((cam.distance() - 1.8).abs() < 1e-5);
    }

    #[test]
    fn eye_keeps_its_distance_from_the_target() {
        let target = Vec3::new(1.0, 2.0, 3.0);
        let mut cam = OrbitCamera::new(target, 4.0);
        cam.rotate(123.0, -45.0);
        assert!(((cam.position() - target).length() - 4.0).abs() < 1e-4);
    }

    #[test]
    fn rotation_only_view_has_no_translation() {
        let mut cam = OrbitCamera::new(Vec3::ZERO, 5.0);
        cam.rotate(40.0, 20.0);
        let view = cam.rotation_only_view();
        assert!(approx(view.w_axis.truncate(), Vec3::ZERO));
    }

    #[test]
    fn drag_only_applies_while_left_button_is_held() {
        let mut cam = OrbitCamera::default();
        let state = InputState::default();
        let mut frame = InputFrame::default();
        frame.pointer_delta = (100.0, 0.0);
        cam.update(&state, &frame);
        assert_eq!(cam.yaw(), 0.0);
    }

    #[test]
    fn left_drag_rotates_the_camera() {
        let mut cam = OrbitCamera::default();
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        state.apply_event(
            &mut frame,
            InputEvent::PointerButton {
                button: MouseButton::Left,
                state: MouseButtonState::Pressed,
            },
        );
        frame.pointer_delta = (100.0, -20.0);
        cam.update(&state, &frame);
        assert!((cam.yaw() + 0.5).abs() < 1e-6);
        assert!((cam.pitch() + 0.1).abs() < 1e-6);

        state.apply_event(
            &mut frame,
            InputEvent::PointerButton {
                button: MouseButton::Left,
                state: MouseButtonState::Released,
            },
        );
        cam.update(&state, &frame);
        assert!((cam.yaw() + 0.5).abs() < 1e-6);
    }
}
