/// Integer 4-component vector.
///
/// Used for discrete quantities (texel coordinates, bounding indices, integer
/// shader arguments) where a float vector does not fit.
///
/// Components are reachable by name (`v.x`) and by position (`v[0]`); both go
/// through the same `#[repr(C)]` storage, so they always agree.
///
/// Arithmetic wraps on overflow. Operators panic on precondition violations
/// (index outside 0..3, zero divisor component), the same way slice indexing
/// and integer division do; [`Vector4i::get`], [`Vector4i::try_index`] and
/// [`Vector4i::checked_div`] are the non-panicking forms.

use std::fmt;
use std::ops::{
    Add, AddAssign, Sub, SubAssign, Neg, Mul, MulAssign, Div, DivAssign, Index, IndexMut,
};
use bytemuck::{Pod, Zeroable};
use glam::{IVec2, IVec3, IVec4};
use crate::error::{Error, Result};

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
pub struct Vector4i {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub w: i32,
}

impl Vector4i {
    /// Number of components
    pub const LEN: usize = 4;

    pub const ZERO: Self = Self::new(0, 0, 0, 0);

    pub const fn new(x: i32, y: i32, z: i32, w: i32) -> Self {
        Self { x, y, z, w }
    }

    /// All components set to `v`
    pub const fn splat(v: i32) -> Self {
        Self::new(v, v, v, v)
    }

    pub const fn from_array(a: [i32; 4]) -> Self {
        Self::new(a[0], a[1], a[2], a[3])
    }

    pub const fn to_array(self) -> [i32; 4] {
        [self.x, self.y, self.z, self.w]
    }

    /// Extend a 3-vector with `w`
    pub fn from_ivec3(v: IVec3, w: i32) -> Self {
        Self::new(v.x, v.y, v.z, w)
    }

    /// Extend a 2-vector with `z` and `w`
    pub fn from_ivec2(v: IVec2, z: i32, w: i32) -> Self {
        Self::new(v.x, v.y, z, w)
    }

    /// Components as an array, sharing storage with the named fields
    pub fn as_array(&self) -> &[i32; 4] {
        bytemuck::cast_ref(self)
    }

    /// Mutable components as an array, sharing storage with the named fields
    pub fn as_array_mut(&mut self) -> &mut [i32; 4] {
        bytemuck::cast_mut(self)
    }

    /// Component at `index`, `None` outside 0..3
    pub fn get(&self, index: usize) -> Option<i32> {
        self.as_array().get(index).copied()
    }

    /// Component at `index`
    ///
    /// # Errors
    ///
    /// `Error::IndexOutOfRange` outside 0..3.
    pub fn try_index(&self, index: usize) -> Result<i32> {
        self.get(index).ok_or(Error::IndexOutOfRange { index, len: Self::LEN })
    }

    /// Overwrite the component at `index`
    ///
    /// # Errors
    ///
    /// `Error::IndexOutOfRange` outside 0..3.
    pub fn try_set(&mut self, index: usize, value: i32) -> Result<()> {
        let slot = self.as_array_mut()
            .get_mut(index)
            .ok_or(Error::IndexOutOfRange { index, len: Self::LEN })?;
        *slot = value;
        Ok(())
    }

    /// Largest signed component
    pub fn max_element(&self) -> i32 {
        self.x.max(self.y).max(self.z).max(self.w)
    }

    /// Largest component magnitude
    ///
    /// `|i32::MIN|` saturates to `i32::MAX`.
    pub fn abs_max_element(&self) -> i32 {
        self.as_array()
            .iter()
            .map(|c| c.saturating_abs())
            .fold(0, i32::max)
    }

    /// Clamp every component of `input` into `[mins[i], maxs[i]]`
    ///
    /// Computed as `max(mins[i], min(maxs[i], input[i]))`, so `mins` wins if a
    /// bound pair is inverted.
    pub fn clamp(input: Self, mins: Self, maxs: Self) -> Self {
        Self::new(
            mins.x.max(maxs.x.min(input.x)),
            mins.y.max(maxs.y.min(input.y)),
            mins.z.max(maxs.z.min(input.z)),
            mins.w.max(maxs.w.min(input.w)),
        )
    }

    /// Component-wise division
    ///
    /// # Errors
    ///
    /// `Error::DivisionByZero` naming the first zero divisor component.
    pub fn checked_div(self, rhs: Self) -> Result<Self> {
        if let Some(component) = rhs.as_array().iter().position(|&c| c == 0) {
            return Err(Error::DivisionByZero { component });
        }
        Ok(Self::new(
            self.x.wrapping_div(rhs.x),
            self.y.wrapping_div(rhs.y),
            self.z.wrapping_div(rhs.z),
            self.w.wrapping_div(rhs.w),
        ))
    }

    fn map(self, f: impl Fn(i32) -> i32) -> Self {
        Self::new(f(self.x), f(self.y), f(self.z), f(self.w))
    }

    fn zip(self, rhs: Self, f: impl Fn(i32, i32) -> i32) -> Self {
        Self::new(f(self.x, rhs.x), f(self.y, rhs.y), f(self.z, rhs.z), f(self.w, rhs.w))
    }
}

// ===== ARITHMETIC =====

impl Add for Vector4i {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        self.zip(rhs, i32::wrapping_add)
    }
}

impl Sub for Vector4i {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        self.zip(rhs, i32::wrapping_sub)
    }
}

impl Neg for Vector4i {
    type Output = Self;
    fn neg(self) -> Self {
        self.map(i32::wrapping_neg)
    }
}

impl Mul<i32> for Vector4i {
    type Output = Self;
    fn mul(self, rhs: i32) -> Self {
        self.map(|c| c.wrapping_mul(rhs))
    }
}

impl Mul for Vector4i {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        self.zip(rhs, i32::wrapping_mul)
    }
}

impl Div for Vector4i {
    type Output = Self;

    /// # Panics
    ///
    /// If any component of `rhs` is zero.
    fn div(self, rhs: Self) -> Self {
        match self.checked_div(rhs) {
            Ok(v) => v,
            Err(error) => panic!("Vector4i division: {}", error),
        }
    }
}

/// Divides in `f32` and truncates toward zero (saturating, NaN becomes 0)
impl Div<f32> for Vector4i {
    type Output = Self;
    fn div(self, rhs: f32) -> Self {
        self.map(|c| (c as f32 / rhs) as i32)
    }
}

impl AddAssign for Vector4i {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Vector4i {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign for Vector4i {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl MulAssign<i32> for Vector4i {
    fn mul_assign(&mut self, rhs: i32) {
        *self = *self * rhs;
    }
}

/// Multiplies in `f32` and truncates toward zero
impl MulAssign<f32> for Vector4i {
    fn mul_assign(&mut self, rhs: f32) {
        *self = self.map(|c| (c as f32 * rhs) as i32);
    }
}

impl DivAssign for Vector4i {
    fn div_assign(&mut self, rhs: Self) {
        *self = *self / rhs;
    }
}

impl DivAssign<f32> for Vector4i {
    fn div_assign(&mut self, rhs: f32) {
        *self = *self / rhs;
    }
}

// ===== INDEXING =====

impl Index<usize> for Vector4i {
    type Output = i32;
    fn index(&self, index: usize) -> &i32 {
        &self.as_array()[index]
    }
}

impl IndexMut<usize> for Vector4i {
    fn index_mut(&mut self, index: usize) -> &mut i32 {
        &mut self.as_array_mut()[index]
    }
}

// ===== CONVERSIONS =====

impl From<[i32; 4]> for Vector4i {
    fn from(a: [i32; 4]) -> Self {
        Self::from_array(a)
    }
}

impl From<Vector4i> for [i32; 4] {
    fn from(v: Vector4i) -> Self {
        v.to_array()
    }
}

impl From<IVec4> for Vector4i {
    fn from(v: IVec4) -> Self {
        Self::new(v.x, v.y, v.z, v.w)
    }
}

impl From<Vector4i> for IVec4 {
    fn from(v: Vector4i) -> Self {
        IVec4::new(v.x, v.y, v.z, v.w)
    }
}

impl fmt::Display for Vector4i {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vector4i({},{},{},{})", self.x, self.y, self.z, self.w)
    }
}

#[cfg(test)]
#[path = "vector4i_tests.rs"]
mod tests;
