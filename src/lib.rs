//! # vecmath-core
//!
//! Scalars that live in SIMD registers.
//!
//! A [`BroadcastF32`] is one `f32` replicated across every lane of a native
//! 4-lane register; a [`BroadcastMask`] is one boolean replicated the same
//! way, with each lane all-ones or all-zeros. Arithmetic, comparisons and
//! [`select`] operate on whole registers, so scalar code written against these
//! types stays in the vector domain and never pays for a scalar/vector move.
//!
//! ```
//! use vecmath_core::{select, BroadcastF32, BroadcastMask};
//!
//! let a = BroadcastF32::new(3.0);
//! let b = BroadcastF32::new(5.0);
//! let max = select(a, b, a.lt_mask(b));
//! let as_number = BroadcastF32::from(BroadcastMask::new(true)) * max;
//! # #[cfg(not(feature = "explicit-scalar-cast"))]
//! assert_eq!(f32::from(as_number), 5.0);
//! ```
//!
//! ## Build configuration
//!
//! - The backend is chosen by target: SSE2 on `x86_64`, NEON on `aarch64`,
//!   a portable array backend elsewhere. See [`config::CONFIG`].
//! - The `explicit-scalar-cast` feature replaces `From<BroadcastF32> for f32`
//!   with the named accessor `BroadcastF32::get_as_f32`.

#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]

/// Register primitives and the per-target backends.
pub mod backend;
/// The broadcast scalar type.
pub mod broadcast;
/// Build configuration reporting.
pub mod config;
/// Self check of the compiled backend.
pub mod diagnostics;
/// The broadcast boolean mask type.
pub mod mask;
/// Branchless select.
pub mod select;

pub use backend::{FloatRegister, MaskRegister, NativeF32, NativeMask, LANES};
pub use broadcast::BroadcastF32;
pub use config::{BuildConfig, ScalarCastMode, CONFIG};
pub use mask::BroadcastMask;
pub use select::{select, Select};
