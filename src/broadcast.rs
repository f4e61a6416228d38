//! # Broadcast Scalar
//!
//! `BroadcastF32` holds one f32 replicated across every lane of a native
//! register. Scalar arithmetic written with ordinary operators runs as a
//! vector instruction, so code built on top of it never has to cross between
//! the scalar and vector register files.
//!
//! ## Invariant
//!
//! All lanes hold bit-identical values. Every public constructor splats, and
//! every operator combines two values that already hold the invariant, so the
//! result holds it too.
//!
//! ## Construction
//!
//! | Source                     | Constructor                       |
//! |----------------------------|-----------------------------------|
//! | literal                    | [`BroadcastF32::splat`]           |
//! | runtime value              | [`BroadcastF32::new`] / `From<f32>` |
//! | lane of a register (const) | [`BroadcastF32::from_lane`]       |
//! | lane of a register (var)   | [`BroadcastF32::from_lane_dyn`]   |
//! | mask                       | `From<BroadcastMask>`             |
//!
//! ## Scalar extraction
//!
//! Without the `explicit-scalar-cast` feature the value converts with
//! `f32::from(x)` / `x.into()`. With it, the conversion impl is gone and the
//! only way out is [`BroadcastF32::get_as_f32`]. Both read lane 0.
//!
//! ## Comparisons and NaN
//!
//! `lt_mask`/`gt_mask` and `eq_mask` use hardware compares. `le_mask`,
//! `ge_mask` and `ne_mask` are the mask negations of `gt_mask`, `lt_mask` and
//! `eq_mask`. With a NaN operand `le_mask`/`ge_mask` therefore report true,
//! unlike IEEE `<=`/`>=`.

use crate::backend::{FloatRegister, NativeF32, LANES};
use crate::mask::BroadcastMask;
use core::fmt::{Debug, Formatter};
use core::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// An f32 broadcast across every lane of a native register.
///
/// `Default` yields a zeroed register. The contents of a default value are
/// not part of the contract; assign before reading.
#[derive(Copy, Clone, Default)]
#[repr(transparent)]
pub struct BroadcastF32(NativeF32);

impl BroadcastF32 {
    /// Number of lanes in the underlying register.
    pub const LANES: usize = LANES;

    /// Broadcast a literal by materialising the full register at once.
    #[inline(always)]
    pub fn splat(scalar: f32) -> Self {
        Self(NativeF32::splat(scalar))
    }

    /// Broadcast a runtime value: load it into lane 0, then replicate lane 0.
    ///
    /// Produces the same bits as [`splat`](Self::splat).
    #[inline(always)]
    pub fn new(scalar: f32) -> Self {
        Self(NativeF32::load_splat(&scalar))
    }

    /// Broadcast lane `LANE` of an arbitrary register.
    ///
    /// `LANE` must be below [`LANES`](Self::LANES).
    #[inline(always)]
    pub fn from_lane<const LANE: usize>(vec: NativeF32) -> Self {
        Self(vec.splat_lane::<LANE>())
    }

    /// Broadcast a runtime-chosen lane of an arbitrary register.
    ///
    /// `lane` must be below [`LANES`](Self::LANES). The index is not checked;
    /// an out-of-range index yields an unspecified (but still broadcast)
    /// value.
    #[inline(always)]
    pub fn from_lane_dyn(vec: NativeF32, lane: usize) -> Self {
        Self(vec.splat_lane_dyn(lane))
    }

    /// Wrap a register whose lanes are already equal.
    #[inline(always)]
    pub(crate) const fn from_register(reg: NativeF32) -> Self {
        Self(reg)
    }

    /// The underlying register. Every lane holds the scalar.
    #[inline(always)]
    pub fn register(self) -> NativeF32 {
        self.0
    }

    #[inline(always)]
    pub(crate) fn lane0(self) -> f32 {
        self.0.lane0()
    }

    /// Read the scalar value.
    #[cfg(feature = "explicit-scalar-cast")]
    #[inline(always)]
    pub fn get_as_f32(self) -> f32 {
        self.lane0()
    }

    // ========================================================================
    // Increment / Decrement
    // ========================================================================

    /// `++x`: add 1.0 and return the updated value.
    #[inline(always)]
    pub fn pre_increment(&mut self) -> &mut Self {
        *self += Self::splat(1.0);
        self
    }

    /// `--x`: subtract 1.0 and return the updated value.
    #[inline(always)]
    pub fn pre_decrement(&mut self) -> &mut Self {
        *self -= Self::splat(1.0);
        self
    }

    /// `x++`: add 1.0 and return the value from before the update.
    #[inline(always)]
    pub fn post_increment(&mut self) -> Self {
        let old = self.0;
        self.pre_increment();
        Self::from_register(old)
    }

    /// `x--`: subtract 1.0 and return the value from before the update.
    #[inline(always)]
    pub fn post_decrement(&mut self) -> Self {
        let old = self.0;
        self.pre_decrement();
        Self::from_register(old)
    }

    // ========================================================================
    // Comparison → Mask
    // ========================================================================

    /// `self < rhs`, computed as `rhs > self`.
    #[inline(always)]
    pub fn lt_mask(self, rhs: Self) -> BroadcastMask {
        BroadcastMask::from_register(rhs.0.cmp_gt(self.0))
    }

    /// `!(self > rhs)`. True when either side is NaN.
    #[inline(always)]
    pub fn le_mask(self, rhs: Self) -> BroadcastMask {
        !self.gt_mask(rhs)
    }

    /// `self > rhs`.
    #[inline(always)]
    pub fn gt_mask(self, rhs: Self) -> BroadcastMask {
        BroadcastMask::from_register(self.0.cmp_gt(rhs.0))
    }

    /// `!(self < rhs)`. True when either side is NaN.
    #[inline(always)]
    pub fn ge_mask(self, rhs: Self) -> BroadcastMask {
        !self.lt_mask(rhs)
    }

    /// `self == rhs`.
    #[inline(always)]
    pub fn eq_mask(self, rhs: Self) -> BroadcastMask {
        BroadcastMask::from_register(self.0.cmp_eq(rhs.0))
    }

    /// `!(self == rhs)`. True when either side is NaN.
    #[inline(always)]
    pub fn ne_mask(self, rhs: Self) -> BroadcastMask {
        !self.eq_mask(rhs)
    }
}

impl Debug for BroadcastF32 {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("BroadcastF32").field(&self.lane0()).finish()
    }
}

// ============================================================================
// Conversions
// ============================================================================

impl From<f32> for BroadcastF32 {
    #[inline(always)]
    fn from(scalar: f32) -> Self {
        Self::new(scalar)
    }
}

impl From<BroadcastMask> for BroadcastF32 {
    /// true → 1.0, false → 0.0, exactly.
    #[inline(always)]
    fn from(mask: BroadcastMask) -> Self {
        Self(NativeF32::from_mask(mask.register()))
    }
}

#[cfg(not(feature = "explicit-scalar-cast"))]
impl From<BroadcastF32> for f32 {
    #[inline(always)]
    fn from(value: BroadcastF32) -> Self {
        value.lane0()
    }
}

// ============================================================================
// Arithmetic
// ============================================================================

impl Add for BroadcastF32 {
    type Output = Self;
    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for BroadcastF32 {
    type Output = Self;
    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Mul for BroadcastF32 {
    type Output = Self;
    /// `self * rhs + 0.0` through the multiply-add primitive.
    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        Self(self.0.mul_add(rhs.0, NativeF32::splat(0.0)))
    }
}

impl Div for BroadcastF32 {
    type Output = Self;
    #[inline(always)]
    fn div(self, rhs: Self) -> Self {
        Self(self.0 / rhs.0)
    }
}

impl Neg for BroadcastF32 {
    type Output = Self;
    /// Flips the sign bit only: -(+0.0) is -0.0 and NaN payloads survive.
    #[inline(always)]
    fn neg(self) -> Self {
        Self(self.0.flip_sign())
    }
}

impl AddAssign for BroadcastF32 {
    #[inline(always)]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for BroadcastF32 {
    #[inline(always)]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign for BroadcastF32 {
    #[inline(always)]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl DivAssign for BroadcastF32 {
    #[inline(always)]
    fn div_assign(&mut self, rhs: Self) {
        *self = *self / rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lanes(x: BroadcastF32) -> [u32; LANES] {
        x.register().to_array().map(f32::to_bits)
    }

    #[test]
    fn splat_and_new_agree_bitwise() {
        for x in [0.0, -0.0, 1.0, -1.0, f32::NAN, f32::INFINITY, f32::MIN_POSITIVE / 2.0] {
            assert_eq!(lanes(BroadcastF32::splat(x)), lanes(BroadcastF32::new(x)));
            assert_eq!(lanes(BroadcastF32::new(x)), [x.to_bits(); LANES]);
        }
    }

    #[test]
    fn default_is_zeroed() {
        assert_eq!(lanes(BroadcastF32::default()), [0; LANES]);
    }

    #[test]
    fn arithmetic_stays_broadcast() {
        let a = BroadcastF32::new(6.0);
        let b = BroadcastF32::new(1.5);
        assert_eq!(lanes(a + b), [7.5f32.to_bits(); LANES]);
        assert_eq!(lanes(a - b), [4.5f32.to_bits(); LANES]);
        assert_eq!(lanes(a * b), [9.0f32.to_bits(); LANES]);
        assert_eq!(lanes(a / b), [4.0f32.to_bits(); LANES]);
        assert_eq!(lanes(-a), [(-6.0f32).to_bits(); LANES]);
    }

    #[test]
    fn compound_assignment() {
        let mut x = BroadcastF32::new(2.0);
        x += BroadcastF32::new(3.0);
        assert_eq!(x.lane0(), 5.0);
        x -= BroadcastF32::new(1.0);
        assert_eq!(x.lane0(), 4.0);
        x *= BroadcastF32::new(2.5);
        assert_eq!(x.lane0(), 10.0);
        x /= BroadcastF32::new(4.0);
        assert_eq!(x.lane0(), 2.5);
    }

    #[test]
    fn decrement_forms() {
        let mut x = BroadcastF32::new(2.0);
        let old = x.post_decrement();
        assert_eq!(old.lane0(), 2.0);
        assert_eq!(x.lane0(), 1.0);
        let new = *x.pre_decrement();
        assert_eq!(new.lane0(), 0.0);
        assert_eq!(x.lane0(), 0.0);
    }

    #[test]
    fn comparison_masks_are_full_width() {
        let a = BroadcastF32::new(1.0);
        let b = BroadcastF32::new(2.0);
        use crate::backend::MaskRegister;
        assert_eq!(a.lt_mask(b).register().to_bits(), [u32::MAX; LANES]);
        assert_eq!(a.gt_mask(b).register().to_bits(), [0; LANES]);
        assert_eq!(a.le_mask(a).register().to_bits(), [u32::MAX; LANES]);
    }

    #[test]
    fn out_of_range_lane_still_broadcasts() {
        let reg = NativeF32::from_array([1.0, 2.0, 3.0, 4.0]);
        for lane in [4, 5, 17, usize::MAX] {
            let bits = lanes(BroadcastF32::from_lane_dyn(reg, lane));
            assert!(bits.iter().all(|&b| b == bits[0]), "lane {}: {:08x?}", lane, bits);
        }
    }

    #[test]
    fn debug_shows_scalar() {
        assert_eq!(format!("{:?}", BroadcastF32::splat(1.5)), "BroadcastF32(1.5)");
    }
}
