// src/config.rs

//! Describes how the crate was built: which register backend is active,
//! how many lanes it has, which optional CPU paths are compiled in, and
//! whether scalar extraction goes through `From` or `get_as_f32()`.
//!
//! Everything here is resolved at build time. The [`CONFIG`] global only
//! gathers those constants into a serde-friendly struct so that tools (and
//! the `vecmath-probe` binary) can report or compare them.

use anyhow::{bail, Context};
use bitflags::bitflags;
use log::debug;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::backend::LANES;

/// Global build configuration, detected on first use.
pub static CONFIG: Lazy<BuildConfig> = Lazy::new(BuildConfig::detect);

// --- Scalar Cast Policy ---

/// How a `BroadcastF32` hands its value back as a plain `f32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScalarCastMode {
    /// `impl From<BroadcastF32> for f32`.
    #[default]
    Implicit,
    /// Only the named `get_as_f32()` accessor.
    Explicit,
}

impl ScalarCastMode {
    /// The mode this crate was compiled with.
    pub const fn current() -> Self {
        if cfg!(feature = "explicit-scalar-cast") {
            ScalarCastMode::Explicit
        } else {
            ScalarCastMode::Implicit
        }
    }
}

// --- Backend ---

/// Register backend compiled into this build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// x86_64 SSE2 (`__m128`).
    Sse2,
    /// aarch64 NEON (`float32x4_t`).
    Neon,
    /// Array fallback.
    #[default]
    Portable,
}

impl BackendKind {
    /// The backend `NativeF32` resolves to on this target.
    pub const fn current() -> Self {
        if cfg!(target_arch = "x86_64") {
            BackendKind::Sse2
        } else if cfg!(target_arch = "aarch64") {
            BackendKind::Neon
        } else {
            BackendKind::Portable
        }
    }
}

bitflags! {
    /// Optional instruction paths compiled into the active backend.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct CpuFeatures: u32 {
        /// x86_64 baseline.
        const SSE2 = 1 << 0;
        /// Runtime lane splat uses `pshufb`.
        const SSSE3 = 1 << 1;
        /// Multiply goes through `vfmadd`.
        const FMA = 1 << 2;
        /// aarch64 baseline.
        const NEON = 1 << 3;
    }
}

impl CpuFeatures {
    /// Features the register code was compiled against.
    pub fn compiled() -> Self {
        let mut features = CpuFeatures::empty();
        if cfg!(target_arch = "x86_64") {
            features |= CpuFeatures::SSE2;
        }
        if cfg!(all(target_arch = "x86_64", target_feature = "ssse3", vecmath_ssse3)) {
            features |= CpuFeatures::SSSE3;
        }
        if cfg!(all(target_arch = "x86_64", target_feature = "fma", vecmath_fma)) {
            features |= CpuFeatures::FMA;
        }
        if cfg!(target_arch = "aarch64") {
            // NEON always fuses multiply-add.
            features |= CpuFeatures::NEON | CpuFeatures::FMA;
        }
        features
    }
}

// --- Build Configuration ---

/// The complete build-time configuration of the crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)] // Missing fields take the current build's values.
pub struct BuildConfig {
    /// Active register backend.
    pub backend: BackendKind,
    /// Lanes per register.
    pub lanes: usize,
    /// Scalar extraction policy.
    pub scalar_cast: ScalarCastMode,
    /// Optional instruction paths.
    pub features: CpuFeatures,
}

impl Default for BuildConfig {
    fn default() -> Self {
        BuildConfig {
            backend: BackendKind::current(),
            lanes: LANES,
            scalar_cast: ScalarCastMode::current(),
            features: CpuFeatures::compiled(),
        }
    }
}

impl BuildConfig {
    fn detect() -> Self {
        let config = BuildConfig::default();
        debug!(
            "vecmath build config: backend={:?} lanes={} scalar_cast={:?} features={:?}",
            config.backend, config.lanes, config.scalar_cast, config.features
        );
        config
    }

    /// Serialize as pretty JSON.
    pub fn to_json(&self) -> anyhow::Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize build config")
    }

    /// Parse a (possibly partial) JSON description.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("Failed to parse build config JSON")
    }

    /// Check that code expecting `expected` can run against this build.
    ///
    /// Backend, lane count and cast mode must match exactly. Every feature
    /// in `expected.features` must be compiled in; extra features are fine.
    pub fn ensure_compatible(&self, expected: &BuildConfig) -> anyhow::Result<()> {
        if self.backend != expected.backend {
            bail!(
                "backend mismatch: built with {:?}, expected {:?}",
                self.backend,
                expected.backend
            );
        }
        if self.lanes != expected.lanes {
            bail!(
                "lane count mismatch: built with {}, expected {}",
                self.lanes,
                expected.lanes
            );
        }
        if self.scalar_cast != expected.scalar_cast {
            bail!(
                "scalar cast mode mismatch: built with {:?}, expected {:?}",
                self.scalar_cast,
                expected.scalar_cast
            );
        }
        let missing = expected.features - self.features;
        if !missing.is_empty() {
            bail!("missing CPU features: {:?}", missing);
        }
        Ok(())
    }
}
