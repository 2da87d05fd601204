use core::ops::{Add, Sub};

/// 2D vector; used for NDC positions and offsets.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Clamps each component independently to `[min, max]`.
    #[inline]
    pub fn clamp_each(self, min: f32, max: f32) -> Self {
        Self::new(self.x.clamp(min, max), self.y.clamp(min, max))
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    #[inline]
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    #[inline]
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_each_is_per_axis() {
        let v = Vec2::new(-3.0, 0.5).clamp_each(-1.0, 1.0);
        assert_eq!(v, Vec2::new(-1.0, 0.5));
    }

    #[test]
    fn clamp_each_inside_range_unchanged() {
        let v = Vec2::new(0.25, -0.75);
        assert_eq!(v.clamp_each(-1.0, 1.0), v);
    }

    #[test]
    fn is_zero_only_for_origin() {
        assert!(Vec2::zero().is_zero());
        assert!(!Vec2::new(0.0, 0.02).is_zero());
    }
}
