//! Vehicle flight path and orientation
//!
//! The ascent is a single cubic Bezier segment evaluated over a fixed
//! duration with quadratic ease-in, so the vehicle leaves the pad slowly and
//! accelerates along the arc. Orientation comes from the curve's finite
//! difference tangent: forward follows velocity, right and up complete an
//! orthonormal right-handed frame.

use liftoff_core::{Mat44, Vec3};

/// Total ascent duration in seconds (t >= this pins the pose to the curve end)
pub const FLIGHT_DURATION: f32 = 18.0;

/// Parameter step for the finite-difference tangent
const TANGENT_EPS: f32 = 1e-3;

/// Velocities shorter than this fall back to the default nose-up forward
const MIN_SPEED: f32 = 1e-6;

/// Forward vectors this close to world up swap to an alternate reference
/// axis before the cross product
const PARALLEL_LIMIT: f32 = 0.99;

/// Height of the parked vehicle origin above the pad anchor
const PARKED_LIFT: f32 = 0.6;

/// Launch animation state. Created parked; time accumulates only while
/// active and unpaused.
#[derive(Clone, Copy, Debug, Default)]
pub struct VehicleAnimation {
    pub active: bool,
    pub paused: bool,
    pub elapsed: f32,
}

impl VehicleAnimation {
    /// Start (or restart) the ascent from t=0
    pub fn launch(&mut self) {
        self.active = true;
        self.paused = false;
        self.elapsed = 0.0;
    }

    pub fn toggle_pause(&mut self) {
        if self.active {
            self.paused = !self.paused;
        }
    }

    /// Return to the parked state
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Accumulate frame time while the ascent is running
    pub fn advance(&mut self, dt: f32) {
        if self.active && !self.paused {
            self.elapsed += dt;
        }
    }

    /// Normalized flight progress in [0, 1]
    pub fn progress(&self) -> f32 {
        (self.elapsed / FLIGHT_DURATION).clamp(0.0, 1.0)
    }

    /// True once the vehicle has reached the end of the curve
    pub fn is_complete(&self) -> bool {
        self.active && self.elapsed >= FLIGHT_DURATION
    }
}

/// Cubic Bezier ascent curve
#[derive(Clone, Copy, Debug)]
pub struct FlightPath {
    pub points: [Vec3; 4],
}

impl FlightPath {
    /// Default ascent from a pad anchor: straight up off the pad, then
    /// arcing forward and away
    pub fn ascent_from(anchor: Vec3) -> Self {
        Self {
            points: [
                anchor + Vec3::new(0.0, PARKED_LIFT, 0.0),
                anchor + Vec3::new(0.0, 30.0, -6.0),
                anchor + Vec3::new(20.0, 70.0, -30.0),
                anchor + Vec3::new(90.0, 130.0, -110.0),
            ],
        }
    }

    /// Evaluate the curve at parameter s in [0, 1]
    pub fn position_at(&self, s: f32) -> Vec3 {
        let s = s.clamp(0.0, 1.0);
        let inv = 1.0 - s;
        let [p0, p1, p2, p3] = self.points;

        p0 * (inv * inv * inv)
            + p1 * (3.0 * inv * inv * s)
            + p2 * (3.0 * inv * s * s)
            + p3 * (s * s * s)
    }

    /// Pose for the given animation state
    pub fn sample(&self, animation: &VehicleAnimation) -> VehiclePose {
        if !animation.active {
            return self.parked();
        }

        let u = (animation.elapsed / FLIGHT_DURATION).clamp(0.0, 1.0);
        let s = u * u;

        let position = self.position_at(s);
        let ahead = self.position_at((s + TANGENT_EPS).min(1.0));
        let velocity = ahead - position;

        let forward = if velocity.length() < MIN_SPEED {
            Vec3::UP
        } else {
            velocity.normalized()
        };

        let (right, up) = frame_from_forward(forward);
        VehiclePose {
            position,
            forward,
            right,
            up,
        }
    }

    /// Nose-up pose at the start of the curve
    pub fn parked(&self) -> VehiclePose {
        let (right, up) = frame_from_forward(Vec3::UP);
        VehiclePose {
            position: self.points[0],
            forward: Vec3::UP,
            right,
            up,
        }
    }
}

/// Complete forward into a right-handed orthonormal basis, swapping the
/// world-up reference for a horizontal axis when forward is nearly vertical
fn frame_from_forward(forward: Vec3) -> (Vec3, Vec3) {
    let reference = if forward.dot(&Vec3::UP).abs() > PARALLEL_LIMIT {
        Vec3::FORWARD
    } else {
        Vec3::UP
    };
    let right = reference.cross(&forward).normalized();
    let up = forward.cross(&right);
    (right, up)
}

/// Per-frame vehicle placement: position plus an orthonormal basis
#[derive(Clone, Copy, Debug)]
pub struct VehiclePose {
    pub position: Vec3,
    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,
}

impl VehiclePose {
    /// World transform mapping the authored mesh (nose along local +Y,
    /// engine joint at the local origin) onto this pose
    pub fn model_matrix(&self) -> Mat44 {
        let rotation = Mat44::from_columns(self.right, self.forward, -self.up);
        Mat44::translation(self.position).mul(&rotation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < EPS
    }

    fn launched(elapsed: f32) -> VehicleAnimation {
        VehicleAnimation {
            active: true,
            paused: false,
            elapsed,
        }
    }

    #[test]
    fn animation_time_gated_by_active_and_paused() {
        let mut anim = VehicleAnimation::default();
        anim.advance(1.0);
        assert_eq!(anim.elapsed, 0.0);

        anim.launch();
        anim.advance(1.0);
        assert_eq!(anim.elapsed, 1.0);

        anim.toggle_pause();
        anim.advance(1.0);
        assert_eq!(anim.elapsed, 1.0);

        anim.toggle_pause();
        anim.advance(0.5);
        assert_eq!(anim.elapsed, 1.5);

        anim.reset();
        assert!(!anim.active);
        assert_eq!(anim.elapsed, 0.0);
    }

    #[test]
    fn curve_hits_endpoints_exactly() {
        let path = FlightPath::ascent_from(Vec3::new(5.0, 0.0, -3.0));
        assert!(approx(path.position_at(0.0), path.points[0]));
        assert!(approx(path.position_at(1.0), path.points[3]));
    }

    #[test]
    fn pose_at_zero_time_is_curve_start() {
        let path = FlightPath::ascent_from(Vec3::ZERO);
        let pose = path.sample(&launched(0.0));
        assert!(approx(pose.position, path.points[0]));
    }

    #[test]
    fn pose_past_duration_is_curve_end() {
        let path = FlightPath::ascent_from(Vec3::ZERO);
        let pose = path.sample(&launched(FLIGHT_DURATION * 2.0));
        assert!(approx(pose.position, path.points[3]));
    }

    #[test]
    fn ease_in_starts_slow() {
        let path = FlightPath::ascent_from(Vec3::ZERO);
        // A quarter of the way through the flight, s = 1/16
        let pose = path.sample(&launched(FLIGHT_DURATION * 0.25));
        let direct = path.position_at(0.25);
        let eased_dist = (pose.position - path.points[0]).length();
        let direct_dist = (direct - path.points[0]).length();
        assert!(eased_dist < direct_dist * 0.5);
    }

    #[test]
    fn frame_is_orthonormal_throughout() {
        let path = FlightPath::ascent_from(Vec3::ZERO);
        for i in 0..=20 {
            let t = FLIGHT_DURATION * i as f32 / 20.0;
            let pose = path.sample(&launched(t));
            assert!((pose.forward.length() - 1.0).abs() < EPS);
            assert!((pose.right.length() - 1.0).abs() < EPS);
            assert!((pose.up.length() - 1.0).abs() < EPS);
            assert!(pose.forward.dot(&pose.right).abs() < EPS);
            assert!(pose.forward.dot(&pose.up).abs() < EPS);
            assert!(pose.right.dot(&pose.up).abs() < EPS);
        }
    }

    #[test]
    fn vertical_forward_uses_alternate_reference() {
        let (right, up) = frame_from_forward(Vec3::UP);
        assert!(approx(right, Vec3::new(1.0, 0.0, 0.0)));
        assert!(approx(up, Vec3::new(0.0, 0.0, -1.0)));
    }

    #[test]
    fn parked_model_matrix_is_pure_translation() {
        let path = FlightPath::ascent_from(Vec3::new(2.0, 0.0, 1.0));
        let m = path.parked().model_matrix();
        // Nose-up parked pose leaves the authored orientation untouched
        let local_nose = Vec3::new(0.0, 1.0, 0.0);
        assert!(approx(m.transform_vector(local_nose), Vec3::UP));
        assert!(approx(m.transform_point(Vec3::ZERO), path.points[0]));
    }

    #[test]
    fn model_matrix_points_nose_along_forward() {
        let path = FlightPath::ascent_from(Vec3::ZERO);
        let pose = path.sample(&launched(FLIGHT_DURATION * 0.7));
        let m = pose.model_matrix();
        let nose = m.transform_vector(Vec3::new(0.0, 1.0, 0.0));
        assert!(approx(nose, pose.forward));
        // Rotation keeps the basis right-handed, so lengths survive
        assert!((m.transform_vector(Vec3::RIGHT).length() - 1.0).abs() < EPS);
    }
}
