use serde::{Serialize, Deserialize};

// Basic 2D vector in search-area coordinates (origin at the nest).
#[derive(Copy, Clone, Default, Debug, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    #[inline(always)]
    pub fn new(x: f64, y: f64) -> Self { Self { x, y } }
    #[inline(always)]
    pub fn zero() -> Self { Self::new(0.0, 0.0) }
    #[inline(always)]
    pub fn length_squared(self) -> f64 { self.x * self.x + self.y * self.y }
    #[inline(always)]
    pub fn length(self) -> f64 { self.length_squared().sqrt() }
    #[inline(always)]
    pub fn distance(self, other: Self) -> f64 { self.sub(other).length() }
    #[inline(always)]
    pub fn add(self, other: Self) -> Self { Self::new(self.x + other.x, self.y + other.y) }
    #[inline(always)]
    pub fn sub(self, other: Self) -> Self { Self::new(self.x - other.x, self.y - other.y) }
    #[inline(always)]
    pub fn scale(self, scalar: f64) -> Self { Self::new(self.x * scalar, self.y * scalar) }

    /// True only for the exact origin; used for the degenerate outward direction.
    #[inline(always)]
    pub fn is_origin(self) -> bool { self.x == 0.0 && self.y == 0.0 }

    /// Unit vector pointing away from the origin. The origin itself maps to +x.
    pub fn outward_unit(self) -> Vec2 {
        if self.is_origin() {
            return Vec2::new(1.0, 0.0);
        }
        self.scale(1.0 / self.length())
    }

    /// Counter-clockwise 90 degree rotation.
    #[inline(always)]
    pub fn perp(self) -> Self { Self::new(-self.y, self.x) }

    /// Rotates the vector counter-clockwise about the origin by `theta` radians.
    pub fn rotate(self, theta: f64) -> Self {
        let (sin, cos) = theta.sin_cos();
        Self::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    /// Rescales the vector to `max_len` if it is longer, keeping its direction.
    pub fn clamp_length(self, max_len: f64) -> Self {
        let len_sq = self.length_squared();
        if len_sq > max_len * max_len {
            self.scale(max_len / len_sq.sqrt())
        } else {
            self
        }
    }
}

#[inline(always)]
pub fn angle_to_vec(theta: f64) -> Vec2 { Vec2::new(theta.cos(), theta.sin()) }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outward_unit_defaults_to_positive_x_at_origin() {
        assert_eq!(Vec2::zero().outward_unit(), Vec2::new(1.0, 0.0));
        let u = Vec2::new(3.0, 4.0).outward_unit();
        assert!((u.x - 0.6).abs() < 1e-12 && (u.y - 0.8).abs() < 1e-12);
    }

    #[test]
    fn rotate_preserves_length() {
        let v = Vec2::new(10.0, -2.5);
        let r = v.rotate(1.234);
        assert!((r.length() - v.length()).abs() < 1e-9);
    }

    #[test]
    fn clamp_length_projects_onto_circle() {
        let v = Vec2::new(300.0, 400.0).clamp_length(100.0);
        assert!((v.length() - 100.0).abs() < 1e-9);
        assert!((v.x - 60.0).abs() < 1e-9 && (v.y - 80.0).abs() < 1e-9);
        assert_eq!(Vec2::new(1.0, 1.0).clamp_length(100.0), Vec2::new(1.0, 1.0));
    }
}
