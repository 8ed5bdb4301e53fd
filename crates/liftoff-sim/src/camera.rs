//! Three-mode camera
//!
//! Free mode is a 6-DOF fly camera with persistent position and yaw/pitch,
//! driven by movement intents and mouse look. Chase and Ground carry no state
//! of their own: each frame they place the camera purely from the tracked
//! target (fixed follow offset behind the vehicle, or a fixed spot near the
//! pad re-aiming at it). All three produce the same view form,
//! Rx(-pitch) * Ry(yaw) * T(-position).

use liftoff_core::{Mat44, Vec3};

pub const FREE_BASE_SPEED: f32 = 12.0;
pub const FAST_MULTIPLIER: f32 = 4.0;
pub const SLOW_MULTIPLIER: f32 = 0.25;
pub const MOUSE_SENSITIVITY: f32 = 0.0025;

/// Just under 90 degrees, so the view never flips over the pole
pub const MAX_PITCH: f32 = 1.54;

const CHASE_DIST_BACK: f32 = 16.0;
const CHASE_HEIGHT: f32 = 5.0;
const CHASE_SIDE: f32 = 2.0;
const CHASE_LOOK_AHEAD: f32 = 8.0;

/// When the target's horizontal velocity vanishes (straight up/down flight),
/// chase falls back to this axis instead of normalizing a near-zero vector
const CHASE_FALLBACK: Vec3 = Vec3::new(0.0, 0.0, -1.0);
const FLAT_EPS: f32 = 1e-4;

/// Fixed ground-camera offset from the pad anchor
const GROUND_OFFSET: Vec3 = Vec3::new(12.0, 2.5, 12.0);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CameraMode {
    #[default]
    Free,
    Chase,
    Ground,
}

/// Per-frame movement intent flags, set from input, consumed by
/// [`CameraRig::update_free_movement`]
#[derive(Clone, Copy, Debug, Default)]
pub struct MoveIntents {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub fast: bool,
    pub slow: bool,
}

/// Camera state: one instance for the process, mutated every frame
pub struct CameraRig {
    pub mode: CameraMode,
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub intents: MoveIntents,
    mouse_captured: bool,
    /// None until the first sample after capture starts; the first sample
    /// only records a baseline so capture never causes a view jump
    last_mouse: Option<(f32, f32)>,
}

impl CameraRig {
    pub fn new(position: Vec3) -> Self {
        Self {
            mode: CameraMode::Free,
            position,
            yaw: 0.0,
            pitch: 0.0,
            intents: MoveIntents::default(),
            mouse_captured: false,
            last_mouse: None,
        }
    }

    pub fn mouse_captured(&self) -> bool {
        self.mouse_captured
    }

    pub fn set_mouse_captured(&mut self, captured: bool) {
        self.mouse_captured = captured;
        if captured {
            self.last_mouse = None;
        }
    }

    /// View matrix and world-space camera position for the current mode
    pub fn compute_view(
        &self,
        target: Vec3,
        target_forward: Vec3,
        ground_anchor: Vec3,
    ) -> (Mat44, Vec3) {
        match self.mode {
            CameraMode::Free => {
                let view = Mat44::rotation_x(-self.pitch)
                    .mul(&Mat44::rotation_y(self.yaw))
                    .mul(&Mat44::translation(-self.position));
                (view, self.position)
            }
            CameraMode::Chase => {
                let flat = Vec3::new(target_forward.x, 0.0, target_forward.z);
                let flat = if flat.length() < FLAT_EPS {
                    CHASE_FALLBACK
                } else {
                    flat.normalized()
                };
                let right = Vec3::UP.cross(&flat).normalized();

                let pos = target - flat * CHASE_DIST_BACK
                    + Vec3::UP * CHASE_HEIGHT
                    + right * CHASE_SIDE;
                let aim = (target + flat * CHASE_LOOK_AHEAD - pos).normalized();
                (aim_view(pos, aim), pos)
            }
            CameraMode::Ground => {
                let pos = ground_anchor + GROUND_OFFSET;
                let aim = (target - pos).normalized();
                (aim_view(pos, aim), pos)
            }
        }
    }

    /// Advance the free camera along its yaw/pitch basis. Runs every frame;
    /// a no-op when no intents are set. Fast and slow modifiers stack.
    pub fn update_free_movement(&mut self, dt: f32) {
        let (forward, right, up) = self.basis();

        let mut speed = FREE_BASE_SPEED;
        if self.intents.fast {
            speed *= FAST_MULTIPLIER;
        }
        if self.intents.slow {
            speed *= SLOW_MULTIPLIER;
        }

        let mut delta = Vec3::ZERO;
        if self.intents.forward {
            delta += forward;
        }
        if self.intents.back {
            delta += -forward;
        }
        if self.intents.right {
            delta += right;
        }
        if self.intents.left {
            delta += -right;
        }
        if self.intents.up {
            delta += up;
        }
        if self.intents.down {
            delta += -up;
        }

        self.position += delta * (speed * dt);
    }

    /// Mouse-look update from absolute cursor coordinates
    pub fn apply_mouse_look(&mut self, x: f32, y: f32) {
        if !self.mouse_captured {
            return;
        }

        let Some((last_x, last_y)) = self.last_mouse else {
            self.last_mouse = Some((x, y));
            return;
        };

        let dx = x - last_x;
        let dy = y - last_y;
        self.last_mouse = Some((x, y));

        self.yaw += dx * MOUSE_SENSITIVITY;
        self.pitch = (self.pitch - dy * MOUSE_SENSITIVITY).clamp(-MAX_PITCH, MAX_PITCH);
    }

    /// Free-camera basis vectors derived from yaw/pitch
    fn basis(&self) -> (Vec3, Vec3, Vec3) {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();

        let forward = Vec3::new(sy * cp, sp, -cy * cp);
        let right = Vec3::new(cy, 0.0, sy);
        let up = right.cross(&forward);
        (forward, right, up)
    }
}

/// View matrix for a camera at `pos` looking along the unit vector `aim`
fn aim_view(pos: Vec3, aim: Vec3) -> Mat44 {
    let pitch = aim.y.asin();
    let yaw = aim.x.atan2(-aim.z);
    Mat44::rotation_x(-pitch)
        .mul(&Mat44::rotation_y(yaw))
        .mul(&Mat44::translation(-pos))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    /// View-space depth of a world point; negative z is in front of the camera
    fn view_z(view: &Mat44, point: Vec3) -> f32 {
        view.transform_point(point).z
    }

    #[test]
    fn chase_and_ground_disagree_on_position_but_both_face_target() {
        let target = Vec3::new(10.0, 40.0, -20.0);
        let forward = Vec3::new(0.3, 0.9, -0.3).normalized();
        let anchor = Vec3::ZERO;

        let mut rig = CameraRig::new(Vec3::ZERO);
        rig.mode = CameraMode::Chase;
        let (chase_view, chase_pos) = rig.compute_view(target, forward, anchor);

        rig.mode = CameraMode::Ground;
        let (ground_view, ground_pos) = rig.compute_view(target, forward, anchor);

        assert!((chase_pos - ground_pos).length() > 1.0);
        assert!(view_z(&chase_view, target) < 0.0);
        assert!(view_z(&ground_view, target) < 0.0);
    }

    #[test]
    fn free_view_matches_position_and_faces_ahead() {
        let mut rig = CameraRig::new(Vec3::new(1.0, 2.0, 3.0));
        rig.yaw = 0.4;
        rig.pitch = -0.2;
        let (view, pos) = rig.compute_view(Vec3::ZERO, Vec3::UP, Vec3::ZERO);

        assert_eq!(pos, rig.position);
        // The camera's own position maps to the view-space origin
        assert!(view.transform_point(pos).length() < EPS);

        let (forward, _, _) = rig.basis();
        assert!(view_z(&view, pos + forward * 5.0) < 0.0);
    }

    #[test]
    fn chase_falls_back_when_target_flies_straight_up() {
        let mut rig = CameraRig::new(Vec3::ZERO);
        rig.mode = CameraMode::Chase;
        let target = Vec3::new(0.0, 50.0, 0.0);
        let (view, pos) = rig.compute_view(target, Vec3::UP, Vec3::ZERO);

        // Fallback axis is -Z, so the camera sits +Z of the target
        assert!(pos.z > target.z);
        assert!(view_z(&view, target) < 0.0);
    }

    #[test]
    fn mouse_look_ignores_first_sample_after_capture() {
        let mut rig = CameraRig::new(Vec3::ZERO);
        rig.set_mouse_captured(true);

        rig.apply_mouse_look(500.0, 300.0);
        assert_eq!(rig.yaw, 0.0);
        assert_eq!(rig.pitch, 0.0);

        rig.apply_mouse_look(510.0, 300.0);
        assert!((rig.yaw - 10.0 * MOUSE_SENSITIVITY).abs() < EPS);
    }

    #[test]
    fn mouse_look_is_inert_without_capture() {
        let mut rig = CameraRig::new(Vec3::ZERO);
        rig.apply_mouse_look(100.0, 100.0);
        rig.apply_mouse_look(900.0, 900.0);
        assert_eq!(rig.yaw, 0.0);
    }

    #[test]
    fn pitch_clamps_below_vertical() {
        let mut rig = CameraRig::new(Vec3::ZERO);
        rig.set_mouse_captured(true);
        rig.apply_mouse_look(0.0, 0.0);
        rig.apply_mouse_look(0.0, -100000.0);
        assert!(rig.pitch <= MAX_PITCH + EPS);
        rig.apply_mouse_look(0.0, 100000.0);
        assert!(rig.pitch >= -MAX_PITCH - EPS);
    }

    #[test]
    fn speed_modifiers_scale_movement() {
        let dt = 0.1;

        let mut rig = CameraRig::new(Vec3::ZERO);
        rig.intents.forward = true;
        rig.update_free_movement(dt);
        let base = rig.position.length();

        let mut fast = CameraRig::new(Vec3::ZERO);
        fast.intents.forward = true;
        fast.intents.fast = true;
        fast.update_free_movement(dt);
        assert!((fast.position.length() - base * FAST_MULTIPLIER).abs() < EPS);

        let mut slow = CameraRig::new(Vec3::ZERO);
        slow.intents.forward = true;
        slow.intents.slow = true;
        slow.update_free_movement(dt);
        assert!((slow.position.length() - base * SLOW_MULTIPLIER).abs() < EPS);
    }

    #[test]
    fn opposed_intents_cancel() {
        let mut rig = CameraRig::new(Vec3::ZERO);
        rig.intents.forward = true;
        rig.intents.back = true;
        rig.update_free_movement(0.1);
        assert!(rig.position.length() < EPS);
    }
}
