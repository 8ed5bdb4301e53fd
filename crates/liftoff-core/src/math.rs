//! Vector and matrix types
//!
//! Matrices are row-major and indexed `(row, col)`, both 0-based. GPU upload
//! goes through [`Mat44::to_cols_array_2d`], which transposes into the
//! column-major layout wgpu expects.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub};

/// A 2D vector (texture coordinates, screen positions)
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn to_array(&self) -> [f32; 2] {
        [self.x, self.y]
    }
}

/// A 3D vector
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };
    pub const ONE: Self = Self {
        x: 1.0,
        y: 1.0,
        z: 1.0,
    };
    pub const UP: Self = Self {
        x: 0.0,
        y: 1.0,
        z: 0.0,
    };
    pub const FORWARD: Self = Self {
        x: 0.0,
        y: 0.0,
        z: -1.0,
    };
    pub const RIGHT: Self = Self {
        x: 1.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn from_array(arr: [f32; 3]) -> Self {
        Self {
            x: arr[0],
            y: arr[1],
            z: arr[2],
        }
    }

    pub fn to_array(&self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn length_squared(&self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Returns `Vec3::ZERO` for a zero-length input.
    pub fn normalized(&self) -> Self {
        let len = self.length();
        if len > 0.0 {
            Self {
                x: self.x / len,
                y: self.y / len,
                z: self.z / len,
            }
        } else {
            Self::ZERO
        }
    }

    pub fn dot(&self, other: &Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(&self, other: &Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Component-wise product
    pub fn mul_component(&self, other: &Self) -> Self {
        Self {
            x: self.x * other.x,
            y: self.y * other.y,
            z: self.z * other.z,
        }
    }

    pub fn lerp(&self, other: Self, t: f32) -> Self {
        *self + (other - *self) * t
    }
}

impl Add for Vec3 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
        self.z += other.z;
    }
}

impl Sub for Vec3 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl Mul<f32> for Vec3 {
    type Output = Self;
    fn mul(self, scalar: f32) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
            z: self.z * scalar,
        }
    }
}

impl Div<f32> for Vec3 {
    type Output = Self;
    fn div(self, scalar: f32) -> Self {
        Self {
            x: self.x / scalar,
            y: self.y / scalar,
            z: self.z / scalar,
        }
    }
}

impl Neg for Vec3 {
    type Output = Self;
    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}

/// A 4D vector (homogeneous coordinates, RGBA colors)
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Vec4 {
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    pub fn from_vec3(v: Vec3, w: f32) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
            w,
        }
    }

    pub fn truncate(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    pub fn to_array(&self) -> [f32; 4] {
        [self.x, self.y, self.z, self.w]
    }
}

/// A 3x3 row-major matrix (rotation / normal transforms)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mat33 {
    pub m: [[f32; 3]; 3],
}

impl Mat33 {
    pub const IDENTITY: Self = Self {
        m: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
    };

    pub fn identity() -> Self {
        Self::IDENTITY
    }

    pub fn transposed(&self) -> Self {
        let mut out = [[0.0; 3]; 3];
        for (r, row) in out.iter_mut().enumerate() {
            for (c, val) in row.iter_mut().enumerate() {
                *val = self.m[c][r];
            }
        }
        Self { m: out }
    }

    pub fn mul_vec3(&self, v: Vec3) -> Vec3 {
        Vec3::new(
            self.m[0][0] * v.x + self.m[0][1] * v.y + self.m[0][2] * v.z,
            self.m[1][0] * v.x + self.m[1][1] * v.y + self.m[1][2] * v.z,
            self.m[2][0] * v.x + self.m[2][1] * v.y + self.m[2][2] * v.z,
        )
    }

    /// Column-major columns padded to vec4 stride, the uniform-buffer layout
    /// of a WGSL `mat3x3<f32>`
    pub fn to_cols_array_padded(&self) -> [[f32; 4]; 3] {
        let mut out = [[0.0f32; 4]; 3];
        for (c, col) in out.iter_mut().enumerate() {
            for r in 0..3 {
                col[r] = self.m[r][c];
            }
        }
        out
    }
}

/// A 4x4 row-major matrix
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mat44 {
    pub m: [[f32; 4]; 4],
}

impl Mat44 {
    pub const IDENTITY: Self = Self {
        m: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    pub fn identity() -> Self {
        Self::IDENTITY
    }

    pub fn translation(t: Vec3) -> Self {
        let mut out = Self::IDENTITY;
        out.m[0][3] = t.x;
        out.m[1][3] = t.y;
        out.m[2][3] = t.z;
        out
    }

    pub fn scaling(s: Vec3) -> Self {
        let mut out = Self::IDENTITY;
        out.m[0][0] = s.x;
        out.m[1][1] = s.y;
        out.m[2][2] = s.z;
        out
    }

    /// Rotation around the X axis, angle in radians
    pub fn rotation_x(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        let mut out = Self::IDENTITY;
        out.m[1][1] = c;
        out.m[1][2] = -s;
        out.m[2][1] = s;
        out.m[2][2] = c;
        out
    }

    /// Rotation around the Y axis, angle in radians
    pub fn rotation_y(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        let mut out = Self::IDENTITY;
        out.m[0][0] = c;
        out.m[0][2] = s;
        out.m[2][0] = -s;
        out.m[2][2] = c;
        out
    }

    /// Rotation around the Z axis, angle in radians
    pub fn rotation_z(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        let mut out = Self::IDENTITY;
        out.m[0][0] = c;
        out.m[0][1] = -s;
        out.m[1][0] = s;
        out.m[1][1] = c;
        out
    }

    /// Rotation whose columns are the images of the local X/Y/Z axes.
    pub fn from_columns(x_axis: Vec3, y_axis: Vec3, z_axis: Vec3) -> Self {
        let mut out = Self::IDENTITY;
        out.m[0][0] = x_axis.x;
        out.m[1][0] = x_axis.y;
        out.m[2][0] = x_axis.z;
        out.m[0][1] = y_axis.x;
        out.m[1][1] = y_axis.y;
        out.m[2][1] = y_axis.z;
        out.m[0][2] = z_axis.x;
        out.m[1][2] = z_axis.y;
        out.m[2][2] = z_axis.z;
        out
    }

    /// Right-handed perspective projection looking down -Z, depth in [0, 1]
    /// (wgpu convention).
    pub fn perspective(fov_y_rad: f32, aspect: f32, near: f32, far: f32) -> Self {
        let f = 1.0 / (fov_y_rad / 2.0).tan();
        let mut out = Self {
            m: [[0.0; 4]; 4],
        };
        out.m[0][0] = f / aspect;
        out.m[1][1] = f;
        out.m[2][2] = far / (near - far);
        out.m[2][3] = near * far / (near - far);
        out.m[3][2] = -1.0;
        out
    }

    /// Matrix product `self * other` (apply `other` first)
    pub fn mul(&self, other: &Self) -> Self {
        let mut out = [[0.0f32; 4]; 4];
        for (i, row) in out.iter_mut().enumerate() {
            for (j, val) in row.iter_mut().enumerate() {
                for k in 0..4 {
                    *val += self.m[i][k] * other.m[k][j];
                }
            }
        }
        Self { m: out }
    }

    /// Transform a point (w = 1, translation applies)
    pub fn transform_point(&self, v: Vec3) -> Vec3 {
        Vec3::new(
            self.m[0][0] * v.x + self.m[0][1] * v.y + self.m[0][2] * v.z + self.m[0][3],
            self.m[1][0] * v.x + self.m[1][1] * v.y + self.m[1][2] * v.z + self.m[1][3],
            self.m[2][0] * v.x + self.m[2][1] * v.y + self.m[2][2] * v.z + self.m[2][3],
        )
    }

    /// Transform a direction (w = 0, translation ignored)
    pub fn transform_vector(&self, v: Vec3) -> Vec3 {
        Vec3::new(
            self.m[0][0] * v.x + self.m[0][1] * v.y + self.m[0][2] * v.z,
            self.m[1][0] * v.x + self.m[1][1] * v.y + self.m[1][2] * v.z,
            self.m[2][0] * v.x + self.m[2][1] * v.y + self.m[2][2] * v.z,
        )
    }

    pub fn transposed(&self) -> Self {
        let mut out = [[0.0f32; 4]; 4];
        for (r, row) in out.iter_mut().enumerate() {
            for (c, val) in row.iter_mut().enumerate() {
                *val = self.m[c][r];
            }
        }
        Self { m: out }
    }

    /// Upper-left 3x3 block (the rotation/scale part)
    pub fn upper_left(&self) -> Mat33 {
        let mut out = [[0.0f32; 3]; 3];
        for (r, row) in out.iter_mut().enumerate() {
            for (c, val) in row.iter_mut().enumerate() {
                *val = self.m[r][c];
            }
        }
        Mat33 { m: out }
    }

    /// Column-major `[[f32; 4]; 4]` for GPU upload
    pub fn to_cols_array_2d(&self) -> [[f32; 4]; 4] {
        let mut out = [[0.0f32; 4]; 4];
        for (c, col) in out.iter_mut().enumerate() {
            for (r, val) in col.iter_mut().enumerate() {
                *val = self.m[r][c];
            }
        }
        out
    }
}

impl Default for Mat44 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn mat_approx_eq(a: &Mat44, b: &Mat44) -> bool {
        a.m.iter()
            .flatten()
            .zip(b.m.iter().flatten())
            .all(|(x, y)| (x - y).abs() < EPS)
    }

    fn vec_approx_eq(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < EPS
    }

    #[test]
    fn vec3_operations() {
        let v1 = Vec3::new(1.0, 2.0, 3.0);
        let v2 = Vec3::new(4.0, 5.0, 6.0);

        assert_eq!(v1 + v2, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(v2 - v1, Vec3::new(3.0, 3.0, 3.0));
        assert_eq!(v1 * 2.0, Vec3::new(2.0, 4.0, 6.0));
        assert!((v1.dot(&v2) - 32.0).abs() < EPS);
    }

    #[test]
    fn cross_product_right_handed() {
        let x = Vec3::RIGHT;
        let y = Vec3::UP;
        assert!(vec_approx_eq(x.cross(&y), Vec3::new(0.0, 0.0, 1.0)));
    }

    #[test]
    fn normalize_zero_vector_is_zero() {
        assert_eq!(Vec3::ZERO.normalized(), Vec3::ZERO);
    }

    #[test]
    fn identity_is_two_sided_neutral() {
        let a = Mat44::rotation_y(0.7)
            .mul(&Mat44::translation(Vec3::new(3.0, -2.0, 5.0)))
            .mul(&Mat44::scaling(Vec3::new(2.0, 1.0, 0.5)));
        let i = Mat44::identity();

        assert!(mat_approx_eq(&i.mul(&a), &a));
        assert!(mat_approx_eq(&a.mul(&i), &a));
    }

    #[test]
    fn translate_rotate_order_matters() {
        let t = Mat44::translation(Vec3::new(1.0, 0.0, 0.0));
        let r = Mat44::rotation_y(std::f32::consts::FRAC_PI_2);

        let tr = t.mul(&r);
        let rt = r.mul(&t);
        assert!(!mat_approx_eq(&tr, &rt));
    }

    #[test]
    fn translation_moves_points_not_vectors() {
        let t = Mat44::translation(Vec3::new(1.0, 2.0, 3.0));
        let p = Vec3::new(1.0, 1.0, 1.0);

        assert!(vec_approx_eq(t.transform_point(p), Vec3::new(2.0, 3.0, 4.0)));
        assert!(vec_approx_eq(t.transform_vector(p), p));
    }

    #[test]
    fn rotation_y_quarter_turn() {
        let r = Mat44::rotation_y(std::f32::consts::FRAC_PI_2);
        // +Z rotates to +X
        let v = r.transform_vector(Vec3::new(0.0, 0.0, 1.0));
        assert!(vec_approx_eq(v, Vec3::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn perspective_depth_range() {
        let p = Mat44::perspective(60f32.to_radians(), 16.0 / 9.0, 0.1, 100.0);

        // A point on the near plane maps to depth 0, far plane to depth 1
        let near = Vec3::new(0.0, 0.0, -0.1);
        let far = Vec3::new(0.0, 0.0, -100.0);

        let clip_near =
            p.m[2][0] * near.x + p.m[2][1] * near.y + p.m[2][2] * near.z + p.m[2][3];
        let w_near = -near.z;
        assert!((clip_near / w_near).abs() < EPS);

        let clip_far = p.m[2][0] * far.x + p.m[2][1] * far.y + p.m[2][2] * far.z + p.m[2][3];
        let w_far = -far.z;
        assert!((clip_far / w_far - 1.0).abs() < 1e-4);
    }

    #[test]
    fn cols_array_transposes() {
        let t = Mat44::translation(Vec3::new(1.0, 2.0, 3.0));
        let cols = t.to_cols_array_2d();
        // Translation lands in the last column for GPU consumption
        assert_eq!(cols[3][0], 1.0);
        assert_eq!(cols[3][1], 2.0);
        assert_eq!(cols[3][2], 3.0);
        assert_eq!(cols[0][3], 0.0);
    }

    #[test]
    fn upper_left_of_rotation_acts_like_the_full_matrix() {
        let m = Mat44::rotation_y(0.9).mul(&Mat44::translation(Vec3::new(5.0, -1.0, 2.0)));
        let rot = m.upper_left();
        let v = Vec3::new(1.0, 2.0, -3.0);

        // Translation is discarded, rotation is preserved
        assert!(vec_approx_eq(rot.mul_vec3(v), m.transform_vector(v)));
        // Pure rotations invert by transposition
        assert!(vec_approx_eq(rot.transposed().mul_vec3(rot.mul_vec3(v)), v));
    }

    #[test]
    fn padded_cols_transpose_and_zero_fill() {
        let rot = Mat44::rotation_z(0.4).upper_left();
        let cols = rot.to_cols_array_padded();
        for (c, col) in cols.iter().enumerate() {
            for (r, val) in col.iter().take(3).enumerate() {
                assert!((val - rot.m[r][c]).abs() < EPS);
            }
            assert_eq!(col[3], 0.0);
        }
    }

    #[test]
    fn from_columns_maps_axes() {
        let m = Mat44::from_columns(
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::UP,
            Vec3::new(-1.0, 0.0, 0.0),
        );
        assert!(vec_approx_eq(
            m.transform_vector(Vec3::RIGHT),
            Vec3::new(0.0, 0.0, 1.0)
        ));
        assert!(vec_approx_eq(m.transform_vector(Vec3::UP), Vec3::UP));
    }
}
