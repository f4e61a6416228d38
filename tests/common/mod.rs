//! Shared helpers for the integration tests.

#![allow(dead_code)]

use vecmath_core::{BroadcastF32, BroadcastMask, FloatRegister, MaskRegister, LANES};

/// Extract the scalar through whichever public accessor this build exposes.
#[cfg(not(feature = "explicit-scalar-cast"))]
pub fn scalar(x: BroadcastF32) -> f32 {
    f32::from(x)
}

/// Extract the scalar through whichever public accessor this build exposes.
#[cfg(feature = "explicit-scalar-cast")]
pub fn scalar(x: BroadcastF32) -> f32 {
    x.get_as_f32()
}

/// Extract the boolean through whichever public accessor this build exposes.
#[cfg(not(feature = "explicit-scalar-cast"))]
pub fn boolean(m: BroadcastMask) -> bool {
    bool::from(m)
}

/// Extract the boolean through whichever public accessor this build exposes.
#[cfg(feature = "explicit-scalar-cast")]
pub fn boolean(m: BroadcastMask) -> bool {
    m.get_as_bool()
}

/// Bit patterns of every lane.
pub fn lane_bits(x: BroadcastF32) -> [u32; LANES] {
    x.register().to_array().map(f32::to_bits)
}

/// Bit patterns of every mask lane.
pub fn mask_bits(m: BroadcastMask) -> [u32; LANES] {
    m.register().to_bits()
}

/// Asserts every lane carries the same bits as `expected`.
pub fn assert_broadcast_of(x: BroadcastF32, expected: f32) {
    assert_eq!(
        lane_bits(x),
        [expected.to_bits(); LANES],
        "expected {} ({:08x}) in every lane, got {:?}",
        expected,
        expected.to_bits(),
        x.register()
    );
}

/// Asserts every lane holds the same bits.
pub fn assert_uniform(x: BroadcastF32) {
    let bits = lane_bits(x);
    assert!(
        bits.iter().all(|&b| b == bits[0]),
        "lanes disagree: {:08x?}",
        bits
    );
}
