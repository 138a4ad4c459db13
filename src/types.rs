use nalgebra::{Point3, Vector3};

/// Scalar field value at a point in space.
pub type Value = f32;

/// A 3D point with [`Value`] components.
pub type Point = Point3<Value>;

/// A 3D vector with [`Value`] components.
pub type Vector = Vector3<Value>;

/// The minimal 3-vector capability the mesher needs from a caller's math library.
///
/// Implementors only provide construction and per-axis access; subtraction and
/// scaling are derived from those. Impls are provided for nalgebra's
/// [`Point3`]/[`Vector3`], plain `[f32; 3]` arrays and, with the `bevy`
/// feature, `bevy::math::Vec3`.
pub trait Vector3Like: Copy + PartialEq + Send + Sync {
    /// Builds a vector from its three components.
    fn from_xyz(x: Value, y: Value, z: Value) -> Self;

    /// Returns component `axis` (`0 = x`, `1 = y`, `2 = z`).
    fn axis(&self, axis: usize) -> Value;

    /// Component-wise `self - rhs`.
    #[inline]
    fn minus(self, rhs: Self) -> Self {
        Self::from_xyz(
            self.axis(0) - rhs.axis(0),
            self.axis(1) - rhs.axis(1),
            self.axis(2) - rhs.axis(2),
        )
    }

    /// Component-wise `self * s`.
    #[inline]
    fn scaled(self, s: Value) -> Self {
        Self::from_xyz(self.axis(0) * s, self.axis(1) * s, self.axis(2) * s)
    }

    /// Components as an array, for writers and normal computation.
    #[inline]
    fn to_array(&self) -> [Value; 3] {
        [self.axis(0), self.axis(1), self.axis(2)]
    }
}

impl Vector3Like for Point {
    #[inline]
    fn from_xyz(x: Value, y: Value, z: Value) -> Self {
        Point::new(x, y, z)
    }

    #[inline]
    fn axis(&self, axis: usize) -> Value {
        self[axis]
    }
}

impl Vector3Like for Vector {
    #[inline]
    fn from_xyz(x: Value, y: Value, z: Value) -> Self {
        Vector::new(x, y, z)
    }

    #[inline]
    fn axis(&self, axis: usize) -> Value {
        self[axis]
    }

    #[inline]
    fn minus(self, rhs: Self) -> Self {
        self - rhs
    }

    #[inline]
    fn scaled(self, s: Value) -> Self {
        self * s
    }
}

impl Vector3Like for [Value; 3] {
    #[inline]
    fn from_xyz(x: Value, y: Value, z: Value) -> Self {
        [x, y, z]
    }

    #[inline]
    fn axis(&self, axis: usize) -> Value {
        self[axis]
    }
}

#[cfg(feature = "bevy")]
impl Vector3Like for bevy::math::Vec3 {
    #[inline]
    fn from_xyz(x: Value, y: Value, z: Value) -> Self {
        bevy::math::Vec3::new(x, y, z)
    }

    #[inline]
    fn axis(&self, axis: usize) -> Value {
        self[axis]
    }
}

/// Converts any [`Vector3Like`] into an nalgebra [`Vector`].
#[inline]
pub fn to_vector<V: Vector3Like>(v: V) -> Vector {
    Vector::new(v.axis(0), v.axis(1), v.axis(2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_ops_match_nalgebra() {
        let a = Point::new(1.0, 2.0, 3.0);
        let b = Point::new(0.5, -1.0, 4.0);
        let d = a.minus(b);
        assert_eq!(d, Point::new(0.5, 3.0, -1.0));
        assert_eq!(d.scaled(2.0), Point::new(1.0, 6.0, -2.0));
    }

    #[test]
    fn array_vectors_support_the_capability() {
        let a: [Value; 3] = Vector3Like::from_xyz(1.0, 2.0, 3.0);
        assert_eq!(a.axis(2), 3.0);
        assert_eq!(a.minus([1.0, 1.0, 1.0]), [0.0, 1.0, 2.0]);
        assert_eq!(to_vector(a), Vector::new(1.0, 2.0, 3.0));
    }
}
