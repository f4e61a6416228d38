//! Runtime self check of the compiled backend.
//!
//! Re-verifies the broadcast contract against whatever register code this
//! build ended up with (SSE2 with or without SSSE3/FMA, NEON, portable).
//! Used by `vecmath-probe` and handy in downstream smoke tests.

use anyhow::{ensure, Context};
use log::{debug, info};
use serde::Serialize;

use crate::backend::{FloatRegister, MaskRegister, NativeF32, LANES};
use crate::broadcast::BroadcastF32;
use crate::config::{BuildConfig, CONFIG};
use crate::mask::BroadcastMask;
use crate::select::select;

/// Values whose bit patterns must survive every construction path.
pub const SAMPLE_VALUES: [f32; 9] = [
    0.0,
    -0.0,
    1.0,
    -1.0,
    f32::NAN,
    f32::INFINITY,
    f32::NEG_INFINITY,
    f32::MIN_POSITIVE / 4.0, // subnormal
    -f32::MIN_POSITIVE / 8.0,
];

/// Outcome of a successful [`self_check`].
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    /// Configuration the checks ran against.
    pub config: BuildConfig,
    /// Names of the checks that ran, in order.
    pub passed: Vec<&'static str>,
}

fn lane_bits(x: BroadcastF32) -> [u32; LANES] {
    x.register().to_array().map(f32::to_bits)
}

fn ensure_broadcast(x: BroadcastF32, what: &str) -> anyhow::Result<()> {
    let bits = lane_bits(x);
    ensure!(
        bits.iter().all(|&b| b == bits[0]),
        "{} left lanes disagreeing: {:08x?}",
        what,
        bits
    );
    Ok(())
}

fn check_construction() -> anyhow::Result<()> {
    for &x in SAMPLE_VALUES.iter() {
        let literal = BroadcastF32::splat(x);
        let runtime = BroadcastF32::new(x);
        ensure_broadcast(literal, "splat")?;
        ensure_broadcast(runtime, "new")?;
        ensure!(
            lane_bits(literal) == lane_bits(runtime),
            "splat and new disagree for {:08x}",
            x.to_bits()
        );
    }

    let source = [1.25f32, -0.0, f32::NAN, 7.0];
    let reg = NativeF32::from_array(source);
    let by_const = [
        BroadcastF32::from_lane::<0>(reg),
        BroadcastF32::from_lane::<1>(reg),
        BroadcastF32::from_lane::<2>(reg),
        BroadcastF32::from_lane::<3>(reg),
    ];
    for (lane, (&expected, fixed)) in source.iter().zip(by_const).enumerate() {
        let dynamic = BroadcastF32::from_lane_dyn(reg, lane);
        ensure_broadcast(fixed, "from_lane")?;
        ensure_broadcast(dynamic, "from_lane_dyn")?;
        ensure!(
            lane_bits(fixed) == [expected.to_bits(); LANES],
            "from_lane::<{}> picked the wrong lane",
            lane
        );
        ensure!(
            lane_bits(dynamic) == lane_bits(fixed),
            "from_lane_dyn({}) differs from from_lane",
            lane
        );
    }
    Ok(())
}

fn check_round_trip() -> anyhow::Result<()> {
    for &x in SAMPLE_VALUES.iter() {
        let back = BroadcastF32::new(x).lane0();
        ensure!(
            back.to_bits() == x.to_bits(),
            "round trip changed {:08x} into {:08x}",
            x.to_bits(),
            back.to_bits()
        );
    }
    Ok(())
}

fn check_mask_conversion() -> anyhow::Result<()> {
    let one = BroadcastF32::from(BroadcastMask::new(true));
    let zero = BroadcastF32::from(BroadcastMask::new(false));
    ensure_broadcast(one, "mask conversion")?;
    ensure!(lane_bits(one) == [1.0f32.to_bits(); LANES], "true did not become 1.0");
    ensure!(lane_bits(zero) == [0.0f32.to_bits(); LANES], "false did not become 0.0");
    for mask in [BroadcastMask::new(true), BroadcastMask::new(false)] {
        let bits = mask.register().to_bits();
        ensure!(
            bits.iter().all(|&b| b == 0 || b == u32::MAX) && bits.iter().all(|&b| b == bits[0]),
            "mask lanes are not uniform all-ones/all-zeros: {:08x?}",
            bits
        );
    }
    Ok(())
}

fn check_negation() -> anyhow::Result<()> {
    let neg_zero = -BroadcastF32::new(0.0);
    ensure_broadcast(neg_zero, "negation")?;
    ensure!(
        neg_zero.lane0().to_bits() == 0x8000_0000,
        "-(+0.0) produced {:08x}",
        neg_zero.lane0().to_bits()
    );
    let payload = f32::from_bits(0x7FC0_0ABC);
    let flipped = (-BroadcastF32::new(payload)).lane0().to_bits();
    ensure!(
        flipped == 0xFFC0_0ABC,
        "NaN negation touched more than the sign bit: {:08x}",
        flipped
    );
    Ok(())
}

fn check_comparisons() -> anyhow::Result<()> {
    let a = BroadcastF32::new(3.0);
    let b = BroadcastF32::new(5.0);
    ensure!(select(a, b, a.lt_mask(b)).lane0() == 5.0, "select on a < b");
    ensure!(select(a, b, a.gt_mask(b)).lane0() == 3.0, "select on a > b");

    let nan = BroadcastF32::new(f32::NAN);
    let one = BroadcastF32::new(1.0);
    ensure!(!nan.lt_mask(one).lane0(), "NaN < 1.0 should be false");
    ensure!(!nan.gt_mask(one).lane0(), "NaN > 1.0 should be false");
    // le/ge are negations of gt/lt, so NaN reads as true here.
    ensure!(nan.le_mask(one).lane0(), "NaN <= 1.0 should be true");
    ensure!(nan.ge_mask(one).lane0(), "NaN >= 1.0 should be true");
    ensure!(!nan.eq_mask(nan).lane0(), "NaN == NaN should be false");
    ensure!(nan.ne_mask(nan).lane0(), "NaN != NaN should be true");
    Ok(())
}

fn check_increment() -> anyhow::Result<()> {
    let mut x = BroadcastF32::new(2.0);
    let before = x.post_increment();
    ensure!(before.lane0() == 2.0, "post_increment returned {}", before.lane0());
    ensure!(x.lane0() == 3.0, "post_increment left {}", x.lane0());

    let mut y = BroadcastF32::new(2.0);
    let after = *y.pre_increment();
    ensure!(after.lane0() == 3.0, "pre_increment returned {}", after.lane0());
    ensure!(y.lane0() == 3.0, "pre_increment left {}", y.lane0());
    ensure_broadcast(y, "pre_increment")?;
    Ok(())
}

/// Run every check, stopping at the first failure.
pub fn self_check() -> anyhow::Result<CheckReport> {
    let checks: [(&'static str, fn() -> anyhow::Result<()>); 6] = [
        ("construction", check_construction),
        ("round_trip", check_round_trip),
        ("mask_conversion", check_mask_conversion),
        ("negation", check_negation),
        ("comparisons", check_comparisons),
        ("increment", check_increment),
    ];

    let mut passed = Vec::with_capacity(checks.len());
    for (name, check) in checks {
        check().with_context(|| format!("self check '{}' failed", name))?;
        debug!("self check '{}' passed", name);
        passed.push(name);
    }

    info!(
        "vecmath self check passed ({} checks, backend {:?})",
        passed.len(),
        CONFIG.backend
    );
    Ok(CheckReport {
        config: CONFIG.clone(),
        passed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn self_check_passes_on_this_build() {
        let report = self_check().expect("self check");
        assert_eq!(
            report.passed,
            vec![
                "construction",
                "round_trip",
                "mask_conversion",
                "negation",
                "comparisons",
                "increment"
            ]
        );
        assert_eq!(report.config, *CONFIG);
    }

    #[test]
    fn broadcast_check_rejects_mixed_lanes() {
        let mixed = BroadcastF32::from_register(NativeF32::from_array([1.0, 2.0, 1.0, 1.0]));
        assert!(ensure_broadcast(mixed, "test").is_err());
    }
}
