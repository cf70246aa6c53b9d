//! Fixed-size vector and matrix math for the transform pipeline
//!
//! Dimensions are const generics. Determinants and inverses are only
//! provided up to 4x4 since cofactor expansion is factorial in N.

use std::array;
use std::fmt;
use std::ops::{Add, Div, Index, IndexMut, Mul, Neg, Sub};

use approx::AbsDiffEq;

/// N-component vector of f64
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector<const N: usize>(pub [f64; N]);

pub type Vec2 = Vector<2>;
pub type Vec3 = Vector<3>;
pub type Vec4 = Vector<4>;

impl<const N: usize> Vector<N> {
    pub const ZERO: Self = Self([0.0; N]);

    pub fn dot(self, other: Self) -> f64 {
        self.0.iter().zip(other.0.iter()).map(|(a, b)| a * b).sum()
    }

    pub fn norm(self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Unit-length copy. A zero vector yields NaN components;
    /// use `try_normalized` when the input may be degenerate.
    pub fn normalized(self) -> Self {
        self / self.norm()
    }

    pub fn try_normalized(self) -> Option<Self> {
        let len = self.norm();
        if len == 0.0 || !len.is_finite() {
            return None;
        }
        Some(self / len)
    }

    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|c| c.is_finite())
    }
}

impl Vector<2> {
    pub const fn new(x: f64, y: f64) -> Self {
        Self([x, y])
    }

    pub fn x(self) -> f64 {
        self.0[0]
    }

    pub fn y(self) -> f64 {
        self.0[1]
    }
}

impl Vector<3> {
    pub const UP: Vec3 = Vec3::new(0.0, 1.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self([x, y, z])
    }

    pub fn x(self) -> f64 {
        self.0[0]
    }

    pub fn y(self) -> f64 {
        self.0[1]
    }

    pub fn z(self) -> f64 {
        self.0[2]
    }

    pub fn cross(self, other: Vec3) -> Vec3 {
        Vec3::new(
            self.y() * other.z() - self.z() * other.y(),
            self.z() * other.x() - self.x() * other.z(),
            self.x() * other.y() - self.y() * other.x(),
        )
    }

    /// Homogeneous extension (w = 1 for points, 0 for directions)
    pub fn extend(self, w: f64) -> Vec4 {
        Vec4::new(self.x(), self.y(), self.z(), w)
    }
}

impl Vector<4> {
    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self([x, y, z, w])
    }

    pub fn x(self) -> f64 {
        self.0[0]
    }

    pub fn y(self) -> f64 {
        self.0[1]
    }

    pub fn z(self) -> f64 {
        self.0[2]
    }

    pub fn w(self) -> f64 {
        self.0[3]
    }

    pub fn xy(self) -> Vec2 {
        Vec2::new(self.x(), self.y())
    }

    pub fn xyz(self) -> Vec3 {
        Vec3::new(self.x(), self.y(), self.z())
    }
}

impl<const N: usize> Default for Vector<N> {
    fn default() -> Self {
        Self::ZERO
    }
}

impl<const N: usize> From<[f64; N]> for Vector<N> {
    fn from(v: [f64; N]) -> Self {
        Self(v)
    }
}

impl<const N: usize> From<Vector<N>> for [f64; N] {
    fn from(v: Vector<N>) -> Self {
        v.0
    }
}

// Out-of-range indices panic: a contract violation, never recoverable
impl<const N: usize> Index<usize> for Vector<N> {
    type Output = f64;
    fn index(&self, i: usize) -> &f64 {
        &self.0[i]
    }
}

impl<const N: usize> IndexMut<usize> for Vector<N> {
    fn index_mut(&mut self, i: usize) -> &mut f64 {
        &mut self.0[i]
    }
}

impl<const N: usize> Add for Vector<N> {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self(array::from_fn(|i| self.0[i] + other.0[i]))
    }
}

impl<const N: usize> Sub for Vector<N> {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self(array::from_fn(|i| self.0[i] - other.0[i]))
    }
}

impl<const N: usize> Mul<f64> for Vector<N> {
    type Output = Self;
    fn mul(self, s: f64) -> Self {
        Self(self.0.map(|c| c * s))
    }
}

impl<const N: usize> Div<f64> for Vector<N> {
    type Output = Self;
    fn div(self, s: f64) -> Self {
        Self(self.0.map(|c| c / s))
    }
}

impl<const N: usize> Neg for Vector<N> {
    type Output = Self;
    fn neg(self) -> Self {
        Self(self.0.map(|c| -c))
    }
}

impl<const N: usize> fmt::Display for Vector<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, c) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

impl<const N: usize> AbsDiffEq for Vector<N> {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.0
            .iter()
            .zip(other.0.iter())
            .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

/// NxN matrix stored as rows
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix<const N: usize>(pub [Vector<N>; N]);

pub type Mat2 = Matrix<2>;
pub type Mat3 = Matrix<3>;
pub type Mat4 = Matrix<4>;

impl<const N: usize> Matrix<N> {
    pub fn zero() -> Self {
        Self([Vector::ZERO; N])
    }

    pub fn identity() -> Self {
        Self(array::from_fn(|i| {
            Vector(array::from_fn(|j| if i == j { 1.0 } else { 0.0 }))
        }))
    }

    pub fn from_rows(rows: [[f64; N]; N]) -> Self {
        Self(rows.map(Vector))
    }

    pub fn row(&self, i: usize) -> Vector<N> {
        self.0[i]
    }

    pub fn col(&self, j: usize) -> Vector<N> {
        Vector(array::from_fn(|i| self.0[i][j]))
    }

    pub fn transpose(&self) -> Self {
        Self(array::from_fn(|j| self.col(j)))
    }
}

impl<const N: usize> Default for Matrix<N> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<const N: usize> Index<usize> for Matrix<N> {
    type Output = Vector<N>;
    fn index(&self, i: usize) -> &Vector<N> {
        &self.0[i]
    }
}

impl<const N: usize> IndexMut<usize> for Matrix<N> {
    fn index_mut(&mut self, i: usize) -> &mut Vector<N> {
        &mut self.0[i]
    }
}

impl<const N: usize> Mul for Matrix<N> {
    type Output = Self;
    fn mul(self, other: Self) -> Self {
        Self(array::from_fn(|i| {
            Vector(array::from_fn(|j| self.0[i].dot(other.col(j))))
        }))
    }
}

impl<const N: usize> Mul<Vector<N>> for Matrix<N> {
    type Output = Vector<N>;
    fn mul(self, v: Vector<N>) -> Vector<N> {
        Vector(array::from_fn(|i| self.0[i].dot(v)))
    }
}

impl<const N: usize> Mul<f64> for Matrix<N> {
    type Output = Self;
    fn mul(self, s: f64) -> Self {
        Self(self.0.map(|row| row * s))
    }
}

impl<const N: usize> AbsDiffEq for Matrix<N> {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.0
            .iter()
            .zip(other.0.iter())
            .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

impl Matrix<1> {
    pub fn det(&self) -> f64 {
        self.0[0][0]
    }
}

impl Matrix<2> {
    pub fn det(&self) -> f64 {
        let m = &self.0;
        m[0][0] * m[1][1] - m[0][1] * m[1][0]
    }
}

impl Matrix<3> {
    pub fn det(&self) -> f64 {
        let m = &self.0;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }
}

impl Matrix<4> {
    pub fn det(&self) -> f64 {
        self.laplace_det()
    }
}

/// Cofactor machinery for an N-matrix whose minors are (N-1)-matrices.
macro_rules! impl_cofactor_expansion {
    ($n:literal => $m:literal) => {
        impl Matrix<$n> {
            /// Matrix with `row` and `col` deleted
            pub fn minor(&self, row: usize, col: usize) -> Matrix<$m> {
                assert!(row < $n && col < $n, "minor ({}, {}) out of range", row, col);
                Matrix(array::from_fn(|i| {
                    let src = if i < row { i } else { i + 1 };
                    Vector(array::from_fn(|j| {
                        let c = if j < col { j } else { j + 1 };
                        self.0[src][c]
                    }))
                }))
            }

            pub fn cofactor(&self, row: usize, col: usize) -> f64 {
                let sign = if (row + col) % 2 == 0 { 1.0 } else { -1.0 };
                sign * self.minor(row, col).det()
            }

            /// Determinant by expansion along the first row
            pub fn laplace_det(&self) -> f64 {
                (0..$n).map(|j| self.0[0][j] * self.cofactor(0, j)).sum()
            }

            /// Transposed adjugate, i.e. the matrix of cofactors
            pub fn cofactors(&self) -> Self {
                Matrix(array::from_fn(|i| {
                    Vector(array::from_fn(|j| self.cofactor(i, j)))
                }))
            }

            pub fn adjugate(&self) -> Self {
                self.cofactors().transpose()
            }

            /// Inverse transposed: cofactors scaled by 1/det.
            /// `None` for singular input.
            pub fn invert_transpose(&self) -> Option<Self> {
                let det = self.det();
                if det == 0.0 || !det.is_finite() {
                    return None;
                }
                Some(self.cofactors() * (1.0 / det))
            }

            pub fn invert(&self) -> Option<Self> {
                self.invert_transpose().map(|m| m.transpose())
            }
        }
    };
}

impl_cofactor_expansion!(2 => 1);
impl_cofactor_expansion!(3 => 2);
impl_cofactor_expansion!(4 => 3);

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn sample_mat4() -> Mat4 {
        Mat4::from_rows([
            [2.0, -1.0, 0.0, 3.0],
            [1.0, 4.0, -2.0, 0.5],
            [0.0, 1.0, 5.0, -1.0],
            [-3.0, 0.0, 1.0, 2.0],
        ])
    }

    #[test]
    fn test_vec3_dot() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(a.dot(b), 32.0);
    }

    #[test]
    fn test_vector_ops() {
        let a = Vec4::new(1.0, 2.0, 3.0, 4.0);
        let b = Vec4::new(0.5, 0.5, 0.5, 0.5);
        assert_eq!(a + b, Vec4::new(1.5, 2.5, 3.5, 4.5));
        assert_eq!(a - b, Vec4::new(0.5, 1.5, 2.5, 3.5));
        assert_eq!(a * 2.0, Vec4::new(2.0, 4.0, 6.0, 8.0));
        assert_eq!(a / 2.0, Vec4::new(0.5, 1.0, 1.5, 2.0));
        assert_eq!(-a, Vec4::new(-1.0, -2.0, -3.0, -4.0));
        assert_eq!(a[3], 4.0);
        assert_eq!(a.xy(), Vec2::new(1.0, 2.0));
        assert_eq!(a.to_string(), "1 2 3 4");
    }

    #[test]
    fn test_general_dimension() {
        let mut v = Vector::<5>([1.0, 2.0, 3.0, 4.0, 5.0]);
        v[4] = 0.0;
        assert_eq!(v.dot(v), 30.0);
        assert_eq!(Matrix::<5>::identity() * v, v);
    }

    #[test]
    #[should_panic]
    fn test_index_out_of_range() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        let _ = v[3];
    }

    #[test]
    fn test_cross_properties() {
        let a = Vec3::new(1.0, -2.0, 0.5);
        let b = Vec3::new(3.0, 0.25, -4.0);
        let c = a.cross(b);
        assert_abs_diff_eq!(c.dot(a), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(c.dot(b), 0.0, epsilon = 1e-12);
        assert_eq!(c, -b.cross(a));

        let z = Vec3::new(1.0, 0.0, 0.0).cross(Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(z, Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_normalized_length() {
        for v in [
            Vec3::new(3.0, 4.0, 0.0),
            Vec3::new(-0.001, 0.002, 0.0005),
            Vec3::new(1e6, -2e6, 3e6),
        ] {
            assert_abs_diff_eq!(v.normalized().norm(), 1.0, epsilon = 1e-12);
        }
        assert!(Vec3::ZERO.try_normalized().is_none());
    }

    #[test]
    fn test_identity_times_vector() {
        let v2 = Vec2::new(3.0, -1.0);
        let v3 = Vec3::new(3.0, -1.0, 2.0);
        let v4 = Vec4::new(3.0, -1.0, 2.0, 7.0);
        assert_eq!(Mat2::identity() * v2, v2);
        assert_eq!(Mat3::identity() * v3, v3);
        assert_eq!(Mat4::identity() * v4, v4);
    }

    #[test]
    fn test_identity_determinant() {
        assert_eq!(Matrix::<1>::identity().det(), 1.0);
        assert_eq!(Mat2::identity().det(), 1.0);
        assert_eq!(Mat3::identity().det(), 1.0);
        assert_eq!(Mat4::identity().det(), 1.0);
    }

    #[test]
    fn test_repeated_row_determinant() {
        let m3 = Mat3::from_rows([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [1.0, 2.0, 3.0]]);
        assert_eq!(m3.det(), 0.0);

        let mut m4 = sample_mat4();
        m4[2] = m4[0];
        assert_abs_diff_eq!(m4.det(), 0.0, epsilon = 1e-12);
        assert!(m4.invert_transpose().is_none());
    }

    #[test]
    fn test_closed_form_matches_expansion() {
        let m3 = Mat3::from_rows([[2.0, 0.5, -1.0], [3.0, 1.0, 4.0], [-2.0, 7.0, 0.25]]);
        assert_abs_diff_eq!(m3.det(), m3.laplace_det(), epsilon = 1e-12);

        let m2 = Mat2::from_rows([[4.0, 7.0], [2.0, 6.0]]);
        assert_eq!(m2.det(), 10.0);
        assert_eq!(m2.laplace_det(), 10.0);
    }

    #[test]
    fn test_cofactor_signs() {
        let m = Mat3::from_rows([[1.0, 2.0, 3.0], [0.0, 4.0, 5.0], [1.0, 0.0, 6.0]]);
        assert_eq!(m.minor(0, 1), Mat2::from_rows([[0.0, 5.0], [1.0, 6.0]]));
        assert_eq!(m.cofactor(0, 0), 24.0);
        assert_eq!(m.cofactor(0, 1), 5.0);
        assert_eq!(m.cofactor(0, 2), -4.0);
        assert_eq!(m.det(), 22.0);
    }

    #[test]
    fn test_invert_transpose() {
        let m = sample_mat4();
        let it = m.invert_transpose().expect("non-singular");
        assert_abs_diff_eq!(m * it.transpose(), Mat4::identity(), epsilon = 1e-12);
        assert_abs_diff_eq!(m * m.invert().unwrap(), Mat4::identity(), epsilon = 1e-12);

        let m3 = Mat3::from_rows([[0.0, 0.0, 1.0], [4.0, 0.0, 1.0], [0.0, 4.0, 1.0]]);
        let it3 = m3.invert_transpose().unwrap();
        assert_abs_diff_eq!(m3 * it3.transpose(), Mat3::identity(), epsilon = 1e-12);
    }

    #[test]
    fn test_barycentric_via_invert_transpose() {
        // Rows are triangle vertices (x, y, 1)
        let abc = Mat3::from_rows([[0.0, 0.0, 1.0], [10.0, 0.0, 1.0], [5.0, 10.0, 1.0]]);
        let bc = abc.invert_transpose().unwrap() * Vec3::new(5.0, 3.0, 1.0);
        assert!(bc.x() >= 0.0 && bc.y() >= 0.0 && bc.z() >= 0.0);
        assert_abs_diff_eq!(bc.x() + bc.y() + bc.z(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(bc.z(), 0.3, epsilon = 1e-12);
    }

    #[test]
    #[should_panic]
    fn test_minor_out_of_range() {
        Mat3::identity().minor(3, 0);
    }
}
