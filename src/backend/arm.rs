//! ARM NEON backend (4 lanes for f32).

use super::{shift_pattern, FloatRegister, MaskRegister, LANES, SIGN_BIT};
use core::arch::aarch64::*;
use core::fmt::{Debug, Formatter};
use core::ops::*;

#[inline(always)]
fn splat_lane_u32<const LANE: usize>(v: uint32x4_t) -> uint32x4_t {
    unsafe {
        match LANE & 3 {
            0 => vdupq_laneq_u32::<0>(v),
            1 => vdupq_laneq_u32::<1>(v),
            2 => vdupq_laneq_u32::<2>(v),
            _ => vdupq_laneq_u32::<3>(v),
        }
    }
}

#[inline(always)]
fn splat_lane_dyn_u32(v: uint32x4_t, lane: usize) -> uint32x4_t {
    let pattern = shift_pattern(lane);
    unsafe {
        let table = vld1q_u8(pattern.as_ptr());
        vreinterpretq_u32_u8(vqtbl1q_u8(vreinterpretq_u8_u32(v), table))
    }
}

// ============================================================================
// Mask4
// ============================================================================

/// 4-lane mask for NEON, one `u32` per lane.
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct Mask4(uint32x4_t);

impl Default for Mask4 {
    fn default() -> Self {
        unsafe { Self(vdupq_n_u32(0)) }
    }
}

impl Debug for Mask4 {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        let arr = self.to_bits();
        let bits = (if arr[0] != 0 { 1 } else { 0 })
            | (if arr[1] != 0 { 2 } else { 0 })
            | (if arr[2] != 0 { 4 } else { 0 })
            | (if arr[3] != 0 { 8 } else { 0 });
        write!(f, "Mask4({:04b})", bits)
    }
}

impl MaskRegister for Mask4 {
    #[inline(always)]
    fn splat(value: bool) -> Self {
        unsafe { Self(vdupq_n_u32(if value { u32::MAX } else { 0 })) }
    }

    #[inline(always)]
    fn from_bits(bits: [u32; LANES]) -> Self {
        unsafe { Self(vld1q_u32(bits.as_ptr())) }
    }

    #[inline(always)]
    fn to_bits(self) -> [u32; LANES] {
        let mut arr = [0u32; LANES];
        unsafe { vst1q_u32(arr.as_mut_ptr(), self.0) };
        arr
    }

    #[inline(always)]
    fn lane0(self) -> bool {
        unsafe { vgetq_lane_u32::<0>(self.0) != 0 }
    }

    #[inline(always)]
    fn splat_lane<const LANE: usize>(self) -> Self {
        Self(splat_lane_u32::<LANE>(self.0))
    }

    #[inline(always)]
    fn splat_lane_dyn(self, lane: usize) -> Self {
        Self(splat_lane_dyn_u32(self.0, lane))
    }

    #[inline(always)]
    fn select(mask: Self, if_true: Self, if_false: Self) -> Self {
        unsafe { Self(vbslq_u32(mask.0, if_true.0, if_false.0)) }
    }
}

impl BitAnd for Mask4 {
    type Output = Self;
    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self {
        unsafe { Self(vandq_u32(self.0, rhs.0)) }
    }
}

impl BitOr for Mask4 {
    type Output = Self;
    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self {
        unsafe { Self(vorrq_u32(self.0, rhs.0)) }
    }
}

impl BitXor for Mask4 {
    type Output = Self;
    #[inline(always)]
    fn bitxor(self, rhs: Self) -> Self {
        unsafe { Self(veorq_u32(self.0, rhs.0)) }
    }
}

impl Not for Mask4 {
    type Output = Self;
    #[inline(always)]
    fn not(self) -> Self {
        unsafe { Self(vmvnq_u32(self.0)) }
    }
}

// ============================================================================
// F32x4
// ============================================================================

/// 4-lane f32 SIMD vector for ARM NEON.
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct F32x4(float32x4_t);

impl Default for F32x4 {
    fn default() -> Self {
        unsafe { Self(vdupq_n_f32(0.0)) }
    }
}

impl Debug for F32x4 {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "F32x4({:?})", self.to_array())
    }
}

impl F32x4 {
    #[inline(always)]
    fn bits(self) -> uint32x4_t {
        unsafe { vreinterpretq_u32_f32(self.0) }
    }

    #[inline(always)]
    fn from_u32(bits: uint32x4_t) -> Self {
        unsafe { Self(vreinterpretq_f32_u32(bits)) }
    }
}

impl FloatRegister for F32x4 {
    type Mask = Mask4;

    #[inline(always)]
    fn splat(val: f32) -> Self {
        unsafe { Self(vdupq_n_f32(val)) }
    }

    #[inline(always)]
    fn load_splat(val: &f32) -> Self {
        unsafe {
            let v = vld1q_lane_f32::<0>(val as *const f32, vdupq_n_f32(0.0));
            Self(vdupq_laneq_f32::<0>(v))
        }
    }

    #[inline(always)]
    fn from_array(lanes: [f32; LANES]) -> Self {
        unsafe { Self(vld1q_f32(lanes.as_ptr())) }
    }

    #[inline(always)]
    fn to_array(self) -> [f32; LANES] {
        let mut arr = [0.0f32; LANES];
        unsafe { vst1q_f32(arr.as_mut_ptr(), self.0) };
        arr
    }

    #[inline(always)]
    fn lane0(self) -> f32 {
        unsafe { vgetq_lane_f32::<0>(self.0) }
    }

    #[inline(always)]
    fn splat_lane<const LANE: usize>(self) -> Self {
        Self::from_u32(splat_lane_u32::<LANE>(self.bits()))
    }

    #[inline(always)]
    fn splat_lane_dyn(self, lane: usize) -> Self {
        Self::from_u32(splat_lane_dyn_u32(self.bits(), lane))
    }

    #[inline(always)]
    fn mul_add(self, b: Self, c: Self) -> Self {
        // vfmaq_f32(a, b, c) computes a + b * c
        unsafe { Self(vfmaq_f32(c.0, self.0, b.0)) }
    }

    #[inline(always)]
    fn flip_sign(self) -> Self {
        unsafe { Self::from_u32(veorq_u32(self.bits(), vdupq_n_u32(SIGN_BIT))) }
    }

    #[inline(always)]
    fn cmp_gt(self, rhs: Self) -> Mask4 {
        unsafe { Mask4(vcgtq_f32(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn cmp_eq(self, rhs: Self) -> Mask4 {
        unsafe { Mask4(vceqq_f32(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn select(mask: Mask4, if_true: Self, if_false: Self) -> Self {
        unsafe { Self(vbslq_f32(mask.0, if_true.0, if_false.0)) }
    }

    #[inline(always)]
    fn from_mask(mask: Mask4) -> Self {
        unsafe { Self(vcvtq_f32_u32(vsubq_u32(vdupq_n_u32(0), mask.0))) }
    }
}

impl Add for F32x4 {
    type Output = Self;
    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        unsafe { Self(vaddq_f32(self.0, rhs.0)) }
    }
}

impl Sub for F32x4 {
    type Output = Self;
    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        unsafe { Self(vsubq_f32(self.0, rhs.0)) }
    }
}

impl Div for F32x4 {
    type Output = Self;
    #[inline(always)]
    fn div(self, rhs: Self) -> Self {
        unsafe { Self(vdivq_f32(self.0, rhs.0)) }
    }
}
