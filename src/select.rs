//! Branchless select over broadcast values.

use crate::backend::{FloatRegister, MaskRegister, NativeF32, NativeMask};
use crate::broadcast::BroadcastF32;
use crate::mask::BroadcastMask;

/// Broadcast types that can be merged lane-wise under a [`BroadcastMask`].
pub trait Select: Copy {
    /// `when_true` where `mask` is set, `when_false` elsewhere.
    fn select(when_false: Self, when_true: Self, mask: BroadcastMask) -> Self;
}

impl Select for BroadcastF32 {
    #[inline(always)]
    fn select(when_false: Self, when_true: Self, mask: BroadcastMask) -> Self {
        BroadcastF32::from_register(NativeF32::select(
            mask.register(),
            when_true.register(),
            when_false.register(),
        ))
    }
}

impl Select for BroadcastMask {
    #[inline(always)]
    fn select(when_false: Self, when_true: Self, mask: BroadcastMask) -> Self {
        BroadcastMask::from_register(NativeMask::select(
            mask.register(),
            when_true.register(),
            when_false.register(),
        ))
    }
}

/// Branchless ternary: `if mask { when_true } else { when_false }`.
///
/// Note the argument order: the false operand comes first.
///
/// ```
/// use vecmath_core::{select, BroadcastF32, FloatRegister};
///
/// let a = BroadcastF32::new(3.0);
/// let b = BroadcastF32::new(5.0);
/// let larger = select(a, b, a.lt_mask(b));
/// assert_eq!(larger.register().to_array(), [5.0; 4]);
/// ```
#[inline(always)]
pub fn select<T: Select>(when_false: T, when_true: T, mask: BroadcastMask) -> T {
    T::select(when_false, when_true, mask)
}
