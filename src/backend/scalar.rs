//! Portable fallback backend for targets without a SIMD register file.
//!
//! Lanes live in plain arrays but keep the same 4-lane geometry and bit-level
//! semantics as the hardware backends, so the broadcast types behave
//! identically everywhere.

use super::{shift_pattern, FloatRegister, MaskRegister, LANES, SIGN_BIT};
use core::fmt::{Debug, Formatter};
use core::ops::{Add, BitAnd, BitOr, BitXor, Div, Not, Sub};

// ============================================================================
// Mask4
// ============================================================================

/// 4-lane mask stored as `u32` bit patterns.
#[derive(Copy, Clone, Default, PartialEq, Eq)]
#[repr(C, align(16))]
pub struct Mask4([u32; LANES]);

impl Debug for Mask4 {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        let bits = self
            .0
            .iter()
            .enumerate()
            .fold(0u8, |acc, (i, &lane)| acc | (((lane != 0) as u8) << i));
        write!(f, "Mask4({:04b})", bits)
    }
}

#[inline(always)]
fn gather_bytes(bytes: [u8; 16], lane: usize) -> [u8; 16] {
    let pattern = shift_pattern(lane);
    let mut out = [0u8; 16];
    for (dst, &idx) in out.iter_mut().zip(pattern.iter()) {
        *dst = bytes[idx as usize];
    }
    out
}

#[inline(always)]
fn bits_to_bytes(bits: [u32; LANES]) -> [u8; 16] {
    let mut bytes = [0u8; 16];
    for (chunk, lane) in bytes.chunks_exact_mut(4).zip(bits.iter()) {
        chunk.copy_from_slice(&lane.to_ne_bytes());
    }
    bytes
}

#[inline(always)]
fn bytes_to_bits(bytes: [u8; 16]) -> [u32; LANES] {
    let mut bits = [0u32; LANES];
    for (lane, chunk) in bits.iter_mut().zip(bytes.chunks_exact(4)) {
        *lane = u32::from_ne_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
    bits
}

impl MaskRegister for Mask4 {
    #[inline(always)]
    fn splat(value: bool) -> Self {
        Self([if value { u32::MAX } else { 0 }; LANES])
    }

    #[inline(always)]
    fn from_bits(bits: [u32; LANES]) -> Self {
        Self(bits)
    }

    #[inline(always)]
    fn to_bits(self) -> [u32; LANES] {
        self.0
    }

    #[inline(always)]
    fn lane0(self) -> bool {
        self.0[0] != 0
    }

    #[inline(always)]
    fn splat_lane<const LANE: usize>(self) -> Self {
        Self([self.0[LANE & 3]; LANES])
    }

    #[inline(always)]
    fn splat_lane_dyn(self, lane: usize) -> Self {
        Self(bytes_to_bits(gather_bytes(bits_to_bytes(self.0), lane)))
    }

    #[inline(always)]
    fn select(mask: Self, if_true: Self, if_false: Self) -> Self {
        (mask & if_true) | (!mask & if_false)
    }
}

impl BitAnd for Mask4 {
    type Output = Self;
    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self {
        Self(core::array::from_fn(|i| self.0[i] & rhs.0[i]))
    }
}

impl BitOr for Mask4 {
    type Output = Self;
    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self {
        Self(core::array::from_fn(|i| self.0[i] | rhs.0[i]))
    }
}

impl BitXor for Mask4 {
    type Output = Self;
    #[inline(always)]
    fn bitxor(self, rhs: Self) -> Self {
        Self(core::array::from_fn(|i| self.0[i] ^ rhs.0[i]))
    }
}

impl Not for Mask4 {
    type Output = Self;
    #[inline(always)]
    fn not(self) -> Self {
        Self(self.0.map(|lane| !lane))
    }
}

// ============================================================================
// F32x4
// ============================================================================

/// 4-lane f32 register stored as an array.
#[derive(Copy, Clone, Default)]
#[repr(C, align(16))]
pub struct F32x4([f32; LANES]);

impl Debug for F32x4 {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "F32x4({:?})", self.0)
    }
}

impl F32x4 {
    #[inline(always)]
    fn map2(self, rhs: Self, op: impl Fn(f32, f32) -> f32) -> Self {
        Self(core::array::from_fn(|i| op(self.0[i], rhs.0[i])))
    }

    #[inline(always)]
    fn cmp(self, rhs: Self, op: impl Fn(f32, f32) -> bool) -> Mask4 {
        Mask4(core::array::from_fn(|i| {
            if op(self.0[i], rhs.0[i]) {
                u32::MAX
            } else {
                0
            }
        }))
    }
}

impl FloatRegister for F32x4 {
    type Mask = Mask4;

    #[inline(always)]
    fn splat(val: f32) -> Self {
        Self([val; LANES])
    }

    #[inline(always)]
    fn load_splat(val: &f32) -> Self {
        let mut reg = [0.0f32; LANES];
        reg[0] = *val;
        Self(reg).splat_lane::<0>()
    }

    #[inline(always)]
    fn from_array(lanes: [f32; LANES]) -> Self {
        Self(lanes)
    }

    #[inline(always)]
    fn to_array(self) -> [f32; LANES] {
        self.0
    }

    #[inline(always)]
    fn lane0(self) -> f32 {
        self.0[0]
    }

    #[inline(always)]
    fn splat_lane<const LANE: usize>(self) -> Self {
        Self([self.0[LANE & 3]; LANES])
    }

    #[inline(always)]
    fn splat_lane_dyn(self, lane: usize) -> Self {
        let bits = bytes_to_bits(gather_bytes(bits_to_bytes(self.0.map(f32::to_bits)), lane));
        Self(bits.map(f32::from_bits))
    }

    #[inline(always)]
    fn mul_add(self, b: Self, c: Self) -> Self {
        Self(core::array::from_fn(|i| self.0[i].mul_add(b.0[i], c.0[i])))
    }

    #[inline(always)]
    fn flip_sign(self) -> Self {
        Self(self.0.map(|x| f32::from_bits(x.to_bits() ^ SIGN_BIT)))
    }

    #[inline(always)]
    fn cmp_gt(self, rhs: Self) -> Mask4 {
        self.cmp(rhs, |a, b| a > b)
    }

    #[inline(always)]
    fn cmp_eq(self, rhs: Self) -> Mask4 {
        self.cmp(rhs, |a, b| a == b)
    }

    #[inline(always)]
    fn select(mask: Mask4, if_true: Self, if_false: Self) -> Self {
        Self(core::array::from_fn(|i| {
            let m = mask.0[i];
            f32::from_bits((if_true.0[i].to_bits() & m) | (if_false.0[i].to_bits() & !m))
        }))
    }

    #[inline(always)]
    fn from_mask(mask: Mask4) -> Self {
        Self(mask.0.map(|lane| 0u32.wrapping_sub(lane) as f32))
    }
}

impl Add for F32x4 {
    type Output = Self;
    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        self.map2(rhs, |a, b| a + b)
    }
}

impl Sub for F32x4 {
    type Output = Self;
    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        self.map2(rhs, |a, b| a - b)
    }
}

impl Div for F32x4 {
    type Output = Self;
    #[inline(always)]
    fn div(self, rhs: Self) -> Self {
        self.map2(rhs, |a, b| a / b)
    }
}
