// build.rs

fn main() {
    // Detect optional x86 extensions at build time and emit custom cfg flags.
    // The register code only takes a path when both the target feature and
    // the matching cfg are set, so a binary built with
    // `-C target-feature=+fma` on a host without FMA keeps the SSE2 code.
    println!("cargo::rustc-check-cfg=cfg(vecmath_ssse3)");
    println!("cargo::rustc-check-cfg=cfg(vecmath_fma)");
    println!("cargo:rerun-if-changed=build.rs");

    #[cfg(target_arch = "x86_64")]
    {
        // Host detection only makes sense when we are not cross compiling.
        let host = std::env::var("HOST").unwrap_or_default();
        let target = std::env::var("TARGET").unwrap_or_default();
        if host == target {
            if is_x86_feature_detected!("ssse3") {
                println!("cargo:rustc-cfg=vecmath_ssse3");
            }
            if is_x86_feature_detected!("fma") {
                println!("cargo:rustc-cfg=vecmath_fma");
            }
        }
    }
}
