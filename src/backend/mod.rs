//! Register primitives for the broadcast types.
//!
//! Every backend exposes the same 4-lane geometry: an f32 register and a
//! mask register whose lanes are either all-ones or all-zeros. The
//! broadcast types in [`crate::broadcast`] and [`crate::mask`] are written
//! once against [`FloatRegister`] / [`MaskRegister`] and the platform type is
//! picked at build time through [`NativeF32`] / [`NativeMask`].
//!
//! | Target    | Backend                   |
//! |-----------|---------------------------|
//! | `x86_64`  | SSE2 (+SSSE3, +FMA paths) |
//! | `aarch64` | NEON                      |
//! | other     | portable arrays           |

use core::fmt::Debug;
use core::ops::{Add, BitAnd, BitOr, BitXor, Div, Not, Sub};

pub mod scalar;

#[cfg(target_arch = "x86_64")]
pub mod x86;

#[cfg(target_arch = "aarch64")]
pub mod arm;

/// Number of lanes in every register the crate works with.
pub const LANES: usize = 4;

/// IEEE-754 single precision sign bit.
pub const SIGN_BIT: u32 = 0x8000_0000;

/// Operations on a 4-lane mask register.
pub trait MaskRegister:
    Copy
    + Clone
    + Debug
    + Default
    + Send
    + Sync
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
    + BitXor<Output = Self>
    + Not<Output = Self>
{
    /// Every lane all-ones when `value` is true, all-zeros otherwise.
    fn splat(value: bool) -> Self;

    /// Build a register from raw lane bits. Callers that want mask semantics
    /// must only pass `0` or `u32::MAX`.
    fn from_bits(bits: [u32; LANES]) -> Self;

    /// Raw lane bits.
    fn to_bits(self) -> [u32; LANES];

    /// Lane 0 interpreted as a boolean.
    fn lane0(self) -> bool;

    /// Replicate lane `LANE` into every lane.
    fn splat_lane<const LANE: usize>(self) -> Self;

    /// Replicate a runtime-chosen lane into every lane.
    fn splat_lane_dyn(self, lane: usize) -> Self;

    /// Bitwise select: bits of `if_true` where `mask` is set, `if_false` elsewhere.
    fn select(mask: Self, if_true: Self, if_false: Self) -> Self;
}

/// Operations on a 4-lane f32 register.
pub trait FloatRegister:
    Copy
    + Clone
    + Debug
    + Default
    + Send
    + Sync
    + Add<Output = Self>
    + Sub<Output = Self>
    + Div<Output = Self>
{
    /// Mask type produced by comparisons.
    type Mask: MaskRegister;

    /// Splat a literal into all lanes.
    /// ARM: `vdupq_n_f32`, x86: `_mm_set1_ps`
    fn splat(val: f32) -> Self;

    /// Load `*val` into lane 0 with an unaligned scalar load, then replicate
    /// lane 0 across the register.
    fn load_splat(val: &f32) -> Self;

    /// Load four lanes.
    fn from_array(lanes: [f32; LANES]) -> Self;

    /// Store four lanes.
    fn to_array(self) -> [f32; LANES];

    /// Read lane 0.
    fn lane0(self) -> f32;

    /// Replicate lane `LANE` into every lane (immediate shuffle).
    fn splat_lane<const LANE: usize>(self) -> Self;

    /// Replicate a runtime-chosen lane into every lane (permutation driven by
    /// [`shift_pattern`]).
    fn splat_lane_dyn(self, lane: usize) -> Self;

    /// `self * b + c`, fused where the hardware allows it.
    fn mul_add(self, b: Self, c: Self) -> Self;

    /// Flip the sign bit of every lane (xor with [`SIGN_BIT`]).
    fn flip_sign(self) -> Self;

    /// Lane-wise `self > rhs`.
    fn cmp_gt(self, rhs: Self) -> Self::Mask;

    /// Lane-wise `self == rhs`.
    fn cmp_eq(self, rhs: Self) -> Self::Mask;

    /// Lane-wise select: `if_true` where `mask` is set, `if_false` elsewhere.
    fn select(mask: Self::Mask, if_true: Self, if_false: Self) -> Self;

    /// Treat mask lanes as `u32`, compute `0 - lane` with wraparound and convert
    /// the result to f32 without scaling. True lanes become 1.0, false lanes 0.0.
    fn from_mask(mask: Self::Mask) -> Self;
}

/// Byte permutation that moves lane `lane` into every lane of a 16-byte
/// register: `[4l, 4l+1, 4l+2, 4l+3]` repeated four times.
///
/// Indices are masked into `0..16`, so an out-of-range lane selects some
/// other lane rather than reading outside the register.
#[inline(always)]
pub const fn shift_pattern(lane: usize) -> [u8; 16] {
    let base = ((lane << 2) & 0x0F) as u8;
    let mut pattern = [0u8; 16];
    let mut i = 0;
    while i < 16 {
        pattern[i] = (base + (i as u8 & 3)) & 0x0F;
        i += 1;
    }
    pattern
}

// ============================================================================
// Native selection
// ============================================================================

/// The f32 register type for the current target.
#[cfg(target_arch = "x86_64")]
pub type NativeF32 = x86::F32x4;
/// The mask register type for the current target.
#[cfg(target_arch = "x86_64")]
pub type NativeMask = x86::Mask4;

/// The f32 register type for the current target.
#[cfg(target_arch = "aarch64")]
pub type NativeF32 = arm::F32x4;
/// The mask register type for the current target.
#[cfg(target_arch = "aarch64")]
pub type NativeMask = arm::Mask4;

/// The f32 register type for the current target.
#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
pub type NativeF32 = scalar::F32x4;
/// The mask register type for the current target.
#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
pub type NativeMask = scalar::Mask4;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_pattern_selects_whole_lane() {
        assert_eq!(
            shift_pattern(0),
            [0, 1, 2, 3, 0, 1, 2, 3, 0, 1, 2, 3, 0, 1, 2, 3]
        );
        assert_eq!(
            shift_pattern(2),
            [8, 9, 10, 11, 8, 9, 10, 11, 8, 9, 10, 11, 8, 9, 10, 11]
        );
        assert_eq!(
            shift_pattern(3),
            [12, 13, 14, 15, 12, 13, 14, 15, 12, 13, 14, 15, 12, 13, 14, 15]
        );
    }

    #[test]
    fn shift_pattern_stays_inside_register() {
        for lane in 0..64 {
            assert!(shift_pattern(lane).iter().all(|&b| b < 16));
        }
    }
}
