use vecmath_core::config::{BackendKind, CpuFeatures};
use vecmath_core::{BuildConfig, ScalarCastMode, CONFIG, LANES};

#[test]
fn config_describes_this_build() {
    assert_eq!(CONFIG.lanes, LANES);
    #[cfg(target_arch = "x86_64")]
    {
        assert_eq!(CONFIG.backend, BackendKind::Sse2);
        assert!(CONFIG.features.contains(CpuFeatures::SSE2));
    }
    #[cfg(target_arch = "aarch64")]
    {
        assert_eq!(CONFIG.backend, BackendKind::Neon);
        assert!(CONFIG.features.contains(CpuFeatures::NEON));
    }
    #[cfg(feature = "explicit-scalar-cast")]
    assert_eq!(CONFIG.scalar_cast, ScalarCastMode::Explicit);
    #[cfg(not(feature = "explicit-scalar-cast"))]
    assert_eq!(CONFIG.scalar_cast, ScalarCastMode::Implicit);
}

#[test]
fn json_uses_snake_case_names() {
    let json = CONFIG.to_json().expect("serialize");
    assert!(json.contains("\"lanes\": 4"), "{}", json);
    assert!(json.contains("\"scalar_cast\""), "{}", json);
    #[cfg(target_arch = "x86_64")]
    assert!(json.contains("\"sse2\""), "{}", json);
}

#[test]
fn explicit_backend_mismatch_fails() {
    let other = if CONFIG.backend == BackendKind::Portable {
        BackendKind::Sse2
    } else {
        BackendKind::Portable
    };
    let expected = BuildConfig {
        backend: other,
        ..BuildConfig::default()
    };
    let err = CONFIG.ensure_compatible(&expected).unwrap_err();
    assert!(err.to_string().contains("backend mismatch"), "{}", err);
}

#[test]
fn cast_mode_mismatch_fails() {
    let other = match CONFIG.scalar_cast {
        ScalarCastMode::Implicit => ScalarCastMode::Explicit,
        ScalarCastMode::Explicit => ScalarCastMode::Implicit,
    };
    let expected = BuildConfig {
        scalar_cast: other,
        ..BuildConfig::default()
    };
    assert!(CONFIG.ensure_compatible(&expected).is_err());
}

#[test]
fn empty_json_is_the_current_build() {
    let parsed = BuildConfig::from_json("{}").expect("parse");
    assert_eq!(parsed, *CONFIG);
    assert!(CONFIG.ensure_compatible(&parsed).is_ok());
}

#[test]
fn malformed_json_is_an_error() {
    let err = BuildConfig::from_json("{ lanes: }").unwrap_err();
    assert!(err.to_string().contains("Failed to parse build config JSON"));
}
