use core::ops::Mul;

use super::Vec2;

/// Column-major 4×4 matrix, laid out the way shader uniforms expect it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Mat4 {
    pub cols: [[f32; 4]; 4],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mat4 {
    #[inline]
    pub const fn identity() -> Self {
        Self {
            cols: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Orthographic projection mapping `[0, width] × [0, height]` (+Y down)
    /// to clip space.
    pub fn ortho(width: f32, height: f32) -> Self {
        let w = if width == 0.0 { 1.0 } else { width };
        let h = if height == 0.0 { 1.0 } else { height };
        Self {
            cols: [
                [2.0 / w, 0.0, 0.0, 0.0],
                [0.0, -2.0 / h, 0.0, 0.0],
                [0.0, 0.0, -1.0, 0.0],
                [-1.0, 1.0, 0.0, 1.0],
            ],
        }
    }

    #[inline]
    pub fn translation(t: Vec2) -> Self {
        let mut m = Self::identity();
        m.cols[3][0] = t.x;
        m.cols[3][1] = t.y;
        m
    }

    #[inline]
    pub fn scale(s: Vec2) -> Self {
        let mut m = Self::identity();
        m.cols[0][0] = s.x;
        m.cols[1][1] = s.y;
        m
    }

    /// Rotation around +Z, `radians` clockwise in +Y-down layout space.
    pub fn rotation_z(radians: f32) -> Self {
        let (sin, cos) = radians.sin_cos();
        let mut m = Self::identity();
        m.cols[0][0] = cos;
        m.cols[0][1] = sin;
        m.cols[1][0] = -sin;
        m.cols[1][1] = cos;
        m
    }

    /// Transforms a point (w = 1).
    pub fn transform_point(&self, p: Vec2) -> Vec2 {
        let c = &self.cols;
        Vec2::new(
            c[0][0] * p.x + c[1][0] * p.y + c[3][0],
            c[0][1] * p.x + c[1][1] * p.y + c[3][1],
        )
    }

    /// Flattened column-major storage.
    pub fn to_cols_array(&self) -> [f32; 16] {
        let mut out = [0.0; 16];
        for (i, col) in self.cols.iter().enumerate() {
            out[i * 4..i * 4 + 4].copy_from_slice(col);
        }
        out
    }
}

impl Mul for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Mat4 {
        let mut out = [[0.0f32; 4]; 4];
        for (c, out_col) in out.iter_mut().enumerate() {
            for (r, cell) in out_col.iter_mut().enumerate() {
                *cell = (0..4).map(|k| self.cols[k][r] * rhs.cols[c][k]).sum();
            }
        }
        Mat4 { cols: out }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_neutral() {
        let t = Mat4::translation(Vec2::new(3.0, 4.0));
        assert_eq!(Mat4::identity() * t, t);
        assert_eq!(t * Mat4::identity(), t);
    }

    #[test]
    fn translation_then_scale_applies_right_to_left() {
        let m = Mat4::translation(Vec2::new(10.0, 0.0)) * Mat4::scale(Vec2::new(2.0, 2.0));
        assert_eq!(m.transform_point(Vec2::new(1.0, 1.0)), Vec2::new(12.0, 2.0));
    }

    #[test]
    fn ortho_maps_corners_to_clip_space() {
        let m = Mat4::ortho(100.0, 50.0);
        assert_eq!(m.transform_point(Vec2::new(0.0, 0.0)), Vec2::new(-1.0, 1.0));
        assert_eq!(m.transform_point(Vec2::new(100.0, 50.0)), Vec2::new(1.0, -1.0));
    }
}
