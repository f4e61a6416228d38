//! x86_64 backend (SSE2, 4 lanes).
//!
//! SSE2 is part of the x86_64 baseline. Two optional paths are compiled in
//! only when the target feature is enabled (`-C target-feature` or
//! `-C target-cpu`) and the build host reports it:
//! - SSSE3: runtime lane splat through `pshufb` with a [`shift_pattern`].
//! - FMA: `mul_add` through `vfmadd`.

use super::{shift_pattern, FloatRegister, MaskRegister, LANES, SIGN_BIT};
use core::arch::x86_64::*;
use core::fmt::{Debug, Formatter};
use core::ops::*;

// ============================================================================
// Shared lane shuffles
// ============================================================================

#[inline(always)]
fn splat_lane_ps<const LANE: usize>(v: __m128) -> __m128 {
    // The immediate has to be a literal, so dispatch on the lane. The match
    // folds away because LANE is a constant.
    unsafe {
        match LANE & 3 {
            0 => _mm_shuffle_ps::<0x00>(v, v),
            1 => _mm_shuffle_ps::<0x55>(v, v),
            2 => _mm_shuffle_ps::<0xAA>(v, v),
            _ => _mm_shuffle_ps::<0xFF>(v, v),
        }
    }
}

/// Runtime lane splat through `pshufb` driven by [`shift_pattern`].
///
/// # Safety
/// The CPU must support SSSE3.
#[cfg_attr(not(all(target_feature = "ssse3", vecmath_ssse3)), allow(dead_code))]
#[target_feature(enable = "ssse3")]
#[inline]
pub(crate) unsafe fn splat_lane_dyn_pshufb(v: __m128, lane: usize) -> __m128 {
    let pattern = shift_pattern(lane);
    unsafe {
        let shuffle = _mm_loadu_si128(pattern.as_ptr() as *const __m128i);
        _mm_castsi128_ps(_mm_shuffle_epi8(_mm_castps_si128(v), shuffle))
    }
}

/// Runtime lane splat with SSE2 only.
///
/// SSE2 has no variable byte shuffle. Keep only the requested lane, then
/// fold it across the register with two fixed swaps. The lane comes from
/// the same pattern the SSSE3 path feeds to pshufb.
#[cfg_attr(all(target_feature = "ssse3", vecmath_ssse3), allow(dead_code))]
#[inline(always)]
pub(crate) fn splat_lane_dyn_fold(v: __m128, lane: usize) -> __m128 {
    let lane = (shift_pattern(lane)[0] >> 2) as i32;
    unsafe {
        let iota = _mm_setr_epi32(0, 1, 2, 3);
        let keep = _mm_castsi128_ps(_mm_cmpeq_epi32(iota, _mm_set1_epi32(lane)));
        let picked = _mm_and_ps(v, keep);
        let halves = _mm_or_ps(picked, _mm_shuffle_ps::<0b01_00_11_10>(picked, picked));
        _mm_or_ps(halves, _mm_shuffle_ps::<0b10_11_00_01>(halves, halves))
    }
}

#[cfg(all(target_feature = "ssse3", vecmath_ssse3))]
#[inline(always)]
fn splat_lane_dyn_ps(v: __m128, lane: usize) -> __m128 {
    // SSSE3 is statically enabled, so this inlines.
    unsafe { splat_lane_dyn_pshufb(v, lane) }
}

#[cfg(not(all(target_feature = "ssse3", vecmath_ssse3)))]
#[inline(always)]
fn splat_lane_dyn_ps(v: __m128, lane: usize) -> __m128 {
    splat_lane_dyn_fold(v, lane)
}

/// `a * b + c` with a single rounding.
///
/// # Safety
/// The CPU must support FMA.
#[cfg_attr(not(all(target_feature = "fma", vecmath_fma)), allow(dead_code))]
#[target_feature(enable = "fma")]
#[inline]
pub(crate) unsafe fn mul_add_fused(a: __m128, b: __m128, c: __m128) -> __m128 {
    unsafe { _mm_fmadd_ps(a, b, c) }
}

/// `a * b + c` as separate multiply and add.
#[cfg_attr(all(target_feature = "fma", vecmath_fma), allow(dead_code))]
#[inline(always)]
pub(crate) fn mul_add_split(a: __m128, b: __m128, c: __m128) -> __m128 {
    // Two roundings, but the crate only ever adds +0.0 which is exact.
    unsafe { _mm_add_ps(_mm_mul_ps(a, b), c) }
}

// ============================================================================
// Mask4 - 4-lane mask for SSE2 (float-based, no separate mask unit)
// ============================================================================

/// 4-lane mask for SSE2.
///
/// SSE2 has no dedicated mask registers. Masks are stored as float vectors
/// where each lane is either all-1s (true) or all-0s (false).
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct Mask4(__m128);

impl Default for Mask4 {
    fn default() -> Self {
        unsafe { Self(_mm_setzero_ps()) }
    }
}

impl Debug for Mask4 {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "Mask4({:04b})", unsafe { _mm_movemask_ps(self.0) })
    }
}

impl MaskRegister for Mask4 {
    #[inline(always)]
    fn splat(value: bool) -> Self {
        unsafe { Self(_mm_castsi128_ps(_mm_set1_epi32(-(value as i32)))) }
    }

    #[inline(always)]
    fn from_bits(bits: [u32; LANES]) -> Self {
        unsafe { Self(_mm_castsi128_ps(_mm_loadu_si128(bits.as_ptr() as *const __m128i))) }
    }

    #[inline(always)]
    fn to_bits(self) -> [u32; LANES] {
        let mut bits = [0u32; LANES];
        unsafe { _mm_storeu_si128(bits.as_mut_ptr() as *mut __m128i, _mm_castps_si128(self.0)) };
        bits
    }

    #[inline(always)]
    fn lane0(self) -> bool {
        unsafe { _mm_cvtsi128_si32(_mm_castps_si128(self.0)) != 0 }
    }

    #[inline(always)]
    fn splat_lane<const LANE: usize>(self) -> Self {
        Self(splat_lane_ps::<LANE>(self.0))
    }

    #[inline(always)]
    fn splat_lane_dyn(self, lane: usize) -> Self {
        Self(splat_lane_dyn_ps(self.0, lane))
    }

    #[inline(always)]
    fn select(mask: Self, if_true: Self, if_false: Self) -> Self {
        unsafe {
            let t = _mm_and_ps(mask.0, if_true.0);
            let f = _mm_andnot_ps(mask.0, if_false.0);
            Self(_mm_or_ps(t, f))
        }
    }
}

impl BitAnd for Mask4 {
    type Output = Self;
    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self {
        unsafe { Self(_mm_and_ps(self.0, rhs.0)) }
    }
}

impl BitOr for Mask4 {
    type Output = Self;
    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self {
        unsafe { Self(_mm_or_ps(self.0, rhs.0)) }
    }
}

impl BitXor for Mask4 {
    type Output = Self;
    #[inline(always)]
    fn bitxor(self, rhs: Self) -> Self {
        unsafe { Self(_mm_xor_ps(self.0, rhs.0)) }
    }
}

impl Not for Mask4 {
    type Output = Self;
    #[inline(always)]
    fn not(self) -> Self {
        unsafe {
            let all_ones = _mm_castsi128_ps(_mm_set1_epi32(-1));
            Self(_mm_xor_ps(self.0, all_ones))
        }
    }
}

// ============================================================================
// F32x4
// ============================================================================

/// 4-lane f32 SIMD vector for SSE2.
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct F32x4(__m128);

impl Default for F32x4 {
    fn default() -> Self {
        unsafe { Self(_mm_setzero_ps()) }
    }
}

impl Debug for F32x4 {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "F32x4({:?})", self.to_array())
    }
}

impl FloatRegister for F32x4 {
    type Mask = Mask4;

    #[inline(always)]
    fn splat(val: f32) -> Self {
        unsafe { Self(_mm_set1_ps(val)) }
    }

    #[inline(always)]
    fn load_splat(val: &f32) -> Self {
        unsafe {
            // movss: lane 0 = *val, lanes 1..3 = 0
            let v = _mm_load_ss(val as *const f32);
            Self(splat_lane_ps::<0>(v))
        }
    }

    #[inline(always)]
    fn from_array(lanes: [f32; LANES]) -> Self {
        unsafe { Self(_mm_loadu_ps(lanes.as_ptr())) }
    }

    #[inline(always)]
    fn to_array(self) -> [f32; LANES] {
        let mut arr = [0.0f32; LANES];
        unsafe { _mm_storeu_ps(arr.as_mut_ptr(), self.0) };
        arr
    }

    #[inline(always)]
    fn lane0(self) -> f32 {
        unsafe { _mm_cvtss_f32(self.0) }
    }

    #[inline(always)]
    fn splat_lane<const LANE: usize>(self) -> Self {
        Self(splat_lane_ps::<LANE>(self.0))
    }

    #[inline(always)]
    fn splat_lane_dyn(self, lane: usize) -> Self {
        Self(splat_lane_dyn_ps(self.0, lane))
    }

    #[inline(always)]
    fn mul_add(self, b: Self, c: Self) -> Self {
        #[cfg(all(target_feature = "fma", vecmath_fma))]
        let out = unsafe { mul_add_fused(self.0, b.0, c.0) };
        #[cfg(not(all(target_feature = "fma", vecmath_fma)))]
        let out = mul_add_split(self.0, b.0, c.0);
        Self(out)
    }

    #[inline(always)]
    fn flip_sign(self) -> Self {
        unsafe {
            let sign = _mm_castsi128_ps(_mm_set1_epi32(SIGN_BIT as i32));
            Self(_mm_xor_ps(self.0, sign))
        }
    }

    #[inline(always)]
    fn cmp_gt(self, rhs: Self) -> Mask4 {
        unsafe { Mask4(_mm_cmpgt_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn cmp_eq(self, rhs: Self) -> Mask4 {
        unsafe { Mask4(_mm_cmpeq_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn select(mask: Mask4, if_true: Self, if_false: Self) -> Self {
        unsafe {
            // (mask & if_true) | (!mask & if_false)
            let t = _mm_and_ps(mask.0, if_true.0);
            let f = _mm_andnot_ps(mask.0, if_false.0);
            Self(_mm_or_ps(t, f))
        }
    }

    #[inline(always)]
    fn from_mask(mask: Mask4) -> Self {
        unsafe {
            let ones = _mm_sub_epi32(_mm_setzero_si128(), _mm_castps_si128(mask.0));
            // Lanes are 0 or 1 here, so the signed convert is exact.
            Self(_mm_cvtepi32_ps(ones))
        }
    }
}

impl Add for F32x4 {
    type Output = Self;
    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        unsafe { Self(_mm_add_ps(self.0, rhs.0)) }
    }
}

impl Sub for F32x4 {
    type Output = Self;
    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        unsafe { Self(_mm_sub_ps(self.0, rhs.0)) }
    }
}

impl Div for F32x4 {
    type Output = Self;
    #[inline(always)]
    fn div(self, rhs: Self) -> Self {
        unsafe { Self(_mm_div_ps(self.0, rhs.0)) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LANES_IN: [f32; LANES] = [1.5, -0.0, f32::NAN, -7.25];

    fn bits(v: __m128) -> [u32; LANES] {
        F32x4(v).to_array().map(f32::to_bits)
    }

    #[test]
    fn fold_splat_picks_each_lane() {
        let v = F32x4::from_array(LANES_IN).0;
        for (lane, expected) in LANES_IN.iter().enumerate() {
            assert_eq!(
                bits(splat_lane_dyn_fold(v, lane)),
                [expected.to_bits(); LANES],
                "lane {}",
                lane
            );
        }
    }

    #[test]
    fn fold_splat_wraps_out_of_range_lanes() {
        let v = F32x4::from_array(LANES_IN).0;
        assert_eq!(bits(splat_lane_dyn_fold(v, 5)), bits(splat_lane_dyn_fold(v, 1)));
    }

    #[test]
    fn pshufb_splat_matches_fold() {
        if !is_x86_feature_detected!("ssse3") {
            return;
        }
        let v = F32x4::from_array(LANES_IN).0;
        for lane in 0..LANES {
            let shuffled = unsafe { splat_lane_dyn_pshufb(v, lane) };
            assert_eq!(bits(shuffled), bits(splat_lane_dyn_fold(v, lane)), "lane {}", lane);
        }
    }

    #[test]
    fn split_mul_add() {
        let a = F32x4::from_array([2.0, -3.0, 0.5, -0.0]).0;
        let b = F32x4::splat(4.0).0;
        let out = F32x4(mul_add_split(a, b, F32x4::splat(1.0).0)).to_array();
        assert_eq!(out, [9.0, -11.0, 3.0, 1.0]);
        assert_eq!(bits(mul_add_split(a, b, F32x4::splat(0.0).0))[3], 0);
    }

    #[test]
    fn fused_mul_add_matches_split_when_adding_zero() {
        if !is_x86_feature_detected!("fma") {
            return;
        }
        let a = F32x4::from_array([1.0e-3, -2.5, 1.0e30, -0.0]).0;
        let b = F32x4::from_array([3.0, 0.125, -1.0e-30, 4.0]).0;
        let zero = F32x4::splat(0.0).0;
        let fused = unsafe { mul_add_fused(a, b, zero) };
        assert_eq!(bits(fused), bits(mul_add_split(a, b, zero)));
    }

    #[test]
    fn fused_mul_add_rounds_once() {
        if !is_x86_feature_detected!("fma") {
            return;
        }
        // (1 + 2^-12)^2 - 1 loses the 2^-24 term when rounded twice.
        let x = 1.0f32 + f32::EPSILON * 2048.0;
        let a = F32x4::splat(x).0;
        let minus_one = F32x4::splat(-1.0).0;
        let fused = F32x4(unsafe { mul_add_fused(a, a, minus_one) }).lane0();
        assert_eq!(fused, x.mul_add(x, -1.0));
    }
}
