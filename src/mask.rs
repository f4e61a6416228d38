//! # Broadcast Mask
//!
//! `BroadcastMask` is a single boolean replicated across every lane of a
//! native mask register. Each lane is either all-ones (true) or all-zeros
//! (false), and all lanes agree.
//!
//! Masks come out of [`BroadcastF32`] comparisons and feed back into
//! arithmetic through `BroadcastF32::from(mask)` (true → 1.0, false → 0.0) and
//! into [`select`](crate::select).

use crate::backend::{MaskRegister, NativeMask};
use crate::broadcast::BroadcastF32;
use core::fmt::{Debug, Formatter};
use core::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not};

/// A boolean broadcast across every lane of a mask register.
#[derive(Copy, Clone, Default)]
#[repr(transparent)]
pub struct BroadcastMask(NativeMask);

impl BroadcastMask {
    /// Broadcast `value` to every lane.
    #[inline(always)]
    pub fn new(value: bool) -> Self {
        Self(NativeMask::splat(value))
    }

    /// Every lane true.
    #[inline(always)]
    pub fn all_true() -> Self {
        Self::new(true)
    }

    /// Every lane false.
    #[inline(always)]
    pub fn all_false() -> Self {
        Self::new(false)
    }

    /// Broadcast lane `LANE` of an arbitrary mask register.
    ///
    /// `mask` must hold all-ones or all-zeros in lane `LANE`.
    #[inline(always)]
    pub fn from_lane<const LANE: usize>(mask: NativeMask) -> Self {
        Self(mask.splat_lane::<LANE>())
    }

    /// Broadcast a runtime-chosen lane of an arbitrary mask register.
    ///
    /// `lane` must be below [`LANES`](crate::LANES). The index is not checked;
    /// an out-of-range index yields some lane of `mask`, still broadcast.
    #[inline(always)]
    pub fn from_lane_dyn(mask: NativeMask, lane: usize) -> Self {
        Self(mask.splat_lane_dyn(lane))
    }

    /// Wrap a register that already satisfies the broadcast invariant.
    #[inline(always)]
    pub(crate) const fn from_register(mask: NativeMask) -> Self {
        Self(mask)
    }

    /// The underlying register. Every lane holds the same bit pattern.
    #[inline(always)]
    pub fn register(self) -> NativeMask {
        self.0
    }

    #[inline(always)]
    pub(crate) fn lane0(self) -> bool {
        self.0.lane0()
    }

    /// Read the boolean value.
    #[cfg(feature = "explicit-scalar-cast")]
    #[inline(always)]
    pub fn get_as_bool(self) -> bool {
        self.lane0()
    }

    /// Lane-wise equality of two masks: `!(self ^ rhs)`.
    #[inline(always)]
    pub fn eq_mask(self, rhs: Self) -> Self {
        !(self ^ rhs)
    }

    /// Lane-wise inequality of two masks: `self ^ rhs`.
    #[inline(always)]
    pub fn ne_mask(self, rhs: Self) -> Self {
        self ^ rhs
    }
}

impl Debug for BroadcastMask {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("BroadcastMask").field(&self.lane0()).finish()
    }
}

// ============================================================================
// Conversions
// ============================================================================

impl From<bool> for BroadcastMask {
    #[inline(always)]
    fn from(value: bool) -> Self {
        Self::new(value)
    }
}

#[cfg(not(feature = "explicit-scalar-cast"))]
impl From<BroadcastMask> for bool {
    #[inline(always)]
    fn from(mask: BroadcastMask) -> Self {
        mask.lane0()
    }
}

impl From<BroadcastF32> for BroadcastMask {
    /// True unless the value equals 0.0. Defined as `!(x == 0.0)`, so NaN is true.
    #[inline(always)]
    fn from(value: BroadcastF32) -> Self {
        value.ne_mask(BroadcastF32::splat(0.0))
    }
}

// ============================================================================
// Boolean Operations
// ============================================================================

impl Not for BroadcastMask {
    type Output = Self;
    #[inline(always)]
    fn not(self) -> Self {
        Self(!self.0)
    }
}

impl BitAnd for BroadcastMask {
    type Output = Self;
    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl BitOr for BroadcastMask {
    type Output = Self;
    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitXor for BroadcastMask {
    type Output = Self;
    #[inline(always)]
    fn bitxor(self, rhs: Self) -> Self {
        Self(self.0 ^ rhs.0)
    }
}

impl BitAndAssign for BroadcastMask {
    #[inline(always)]
    fn bitand_assign(&mut self, rhs: Self) {
        *self = *self & rhs;
    }
}

impl BitOrAssign for BroadcastMask {
    #[inline(always)]
    fn bitor_assign(&mut self, rhs: Self) {
        *self = *self | rhs;
    }
}

impl BitXorAssign for BroadcastMask {
    #[inline(always)]
    fn bitxor_assign(&mut self, rhs: Self) {
        *self = *self ^ rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(mask: BroadcastMask) -> [u32; crate::LANES] {
        mask.register().to_bits()
    }

    #[test]
    fn new_fills_every_lane() {
        assert_eq!(bits(BroadcastMask::new(true)), [u32::MAX; 4]);
        assert_eq!(bits(BroadcastMask::new(false)), [0; 4]);
        assert_eq!(bits(BroadcastMask::default()), [0; 4]);
    }

    #[test]
    fn boolean_operators_keep_full_lane_patterns() {
        let t = BroadcastMask::all_true();
        let f = BroadcastMask::all_false();
        assert_eq!(bits(!t), [0; 4]);
        assert_eq!(bits(!f), [u32::MAX; 4]);
        assert_eq!(bits(t & f), [0; 4]);
        assert_eq!(bits(t | f), [u32::MAX; 4]);
        assert_eq!(bits(t ^ t), [0; 4]);
        assert_eq!(bits(t.eq_mask(t)), [u32::MAX; 4]);
        assert_eq!(bits(t.ne_mask(f)), [u32::MAX; 4]);
        assert_eq!(bits(f.eq_mask(t)), [0; 4]);
    }

    #[test]
    fn assign_operators() {
        let mut m = BroadcastMask::all_true();
        m &= BroadcastMask::all_false();
        assert!(!m.lane0());
        m |= BroadcastMask::all_true();
        assert!(m.lane0());
        m ^= BroadcastMask::all_true();
        assert!(!m.lane0());
    }

    #[test]
    fn lane_extraction_broadcasts() {
        let raw = NativeMask::from_bits([0, u32::MAX, 0, u32::MAX]);
        assert_eq!(bits(BroadcastMask::from_lane::<0>(raw)), [0; 4]);
        assert_eq!(bits(BroadcastMask::from_lane::<1>(raw)), [u32::MAX; 4]);
        for lane in 0..crate::LANES {
            let expected = if lane % 2 == 1 { u32::MAX } else { 0 };
            assert_eq!(bits(BroadcastMask::from_lane_dyn(raw, lane)), [expected; 4]);
        }
    }

    #[test]
    fn out_of_range_lane_picks_some_lane() {
        let raw = NativeMask::from_bits([0, u32::MAX, 0, u32::MAX]);
        for lane in [4, 7, 100] {
            let got = bits(BroadcastMask::from_lane_dyn(raw, lane));
            assert!(got == [0; 4] || got == [u32::MAX; 4], "lane {}: {:08x?}", lane, got);
        }
    }

    #[test]
    fn from_float_treats_nan_as_true() {
        assert!(BroadcastMask::from(BroadcastF32::splat(2.5)).lane0());
        assert!(!BroadcastMask::from(BroadcastF32::splat(0.0)).lane0());
        assert!(!BroadcastMask::from(BroadcastF32::splat(-0.0)).lane0());
        assert!(BroadcastMask::from(BroadcastF32::splat(f32::NAN)).lane0());
    }

    #[test]
    fn debug_shows_logical_value() {
        assert_eq!(format!("{:?}", BroadcastMask::new(true)), "BroadcastMask(true)");
    }
}
