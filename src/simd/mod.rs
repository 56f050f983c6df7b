//! SIMD acceleration flags for the vector extension.
//!
//! The flags are resolved once, by `build.rs`, from the target architecture and the
//! `SQLITE_VEC_ENABLE_AVX` / `SQLITE_VEC_ENABLE_NEON` build variables:
//! - an explicit override always wins, whether it turns the flag on or off;
//! - otherwise AVX follows "target is x86-64" and NEON follows "target exposes NEON";
//! - the two flags never influence each other.
//!
//! The outcome is passed to the sqlite-vec C build as `SQLITE_VEC_ENABLE_AVX` /
//! `SQLITE_VEC_ENABLE_NEON` defines, reaches this crate as the `sqlite_vec_avx` /
//! `sqlite_vec_neon` cfgs, and is readable at runtime through [`SimdFlags::COMPILED`].

mod resolve;

pub use resolve::{
    AVX_OVERRIDE_VAR, FlagOverrides, InvalidOverride, NEON_OVERRIDE_VAR, SimdFlags, TargetArch,
    parse_override, resolve_flag,
};

use crate::errors::AutoloadResult;

impl SimdFlags {
    /// Flags this build was compiled with.
    pub const COMPILED: Self = Self {
        avx: cfg!(sqlite_vec_avx),
        neon: cfg!(sqlite_vec_neon),
    };

    /// Names of the enabled code paths, in a stable order.
    #[must_use]
    pub fn enabled_names(self) -> Vec<&'static str> {
        let mut names = Vec::with_capacity(2);
        if self.avx {
            names.push("avx");
        }
        if self.neon {
            names.push("neon");
        }
        names
    }

    /// Check that the running CPU provides every enabled code path.
    ///
    /// A flag forced on for an architecture where detection is not possible is
    /// accepted with a warning.
    ///
    /// # Errors
    /// Returns [`crate::AutoloadError::UnsupportedCpu`] if an enabled feature is missing.
    pub fn verify_cpu_support(self) -> AutoloadResult<()> {
        if self.avx {
            check_avx()?;
        }
        if self.neon {
            check_neon()?;
        }
        Ok(())
    }
}

#[cfg(any(target_arch = "x86_64", target_arch = "x86"))]
fn check_avx() -> AutoloadResult<()> {
    if std::arch::is_x86_feature_detected!("avx") {
        Ok(())
    } else {
        Err(crate::errors::AutoloadError::UnsupportedCpu { feature: "avx" })
    }
}

#[cfg(not(any(target_arch = "x86_64", target_arch = "x86")))]
#[allow(clippy::unnecessary_wraps)]
fn check_avx() -> AutoloadResult<()> {
    tracing::warn!("avx flag enabled on a non-x86 target; cpu support not verified");
    Ok(())
}

#[cfg(target_arch = "aarch64")]
fn check_neon() -> AutoloadResult<()> {
    if std::arch::is_aarch64_feature_detected!("neon") {
        Ok(())
    } else {
        Err(crate::errors::AutoloadError::UnsupportedCpu { feature: "neon" })
    }
}

// 32-bit ARM only reaches here with `neon` as a static target feature.
#[cfg(target_arch = "arm")]
const fn check_neon() -> AutoloadResult<()> {
    if cfg!(target_feature = "neon") {
        Ok(())
    } else {
        Err(crate::errors::AutoloadError::UnsupportedCpu { feature: "neon" })
    }
}

#[cfg(not(any(target_arch = "aarch64", target_arch = "arm")))]
#[allow(clippy::unnecessary_wraps)]
fn check_neon() -> AutoloadResult<()> {
    tracing::warn!("neon flag enabled on a non-ARM target; cpu support not verified");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const X86_64: TargetArch = TargetArch {
        x86_64: true,
        neon: false,
    };
    const AARCH64: TargetArch = TargetArch {
        x86_64: false,
        neon: true,
    };
    const RISCV: TargetArch = TargetArch {
        x86_64: false,
        neon: false,
    };

    #[test]
    fn test_target_arch_from_cargo() {
        assert_eq!(TargetArch::from_cargo("x86_64", "fxsr,sse,sse2"), X86_64);
        assert_eq!(TargetArch::from_cargo("aarch64", "aes,neon,sha2"), AARCH64);
        assert_eq!(TargetArch::from_cargo("riscv64", "a,c,d,f,m"), RISCV);
        // "neon" must match a whole feature name.
        assert!(!TargetArch::from_cargo("arm", "neonx,v7").neon);
        assert!(!TargetArch::from_cargo("x86", "sse2").x86_64);
    }

    #[test]
    fn test_arch_defaults_without_overrides() {
        let none = FlagOverrides::default();
        assert_eq!(
            SimdFlags::resolve(X86_64, none),
            SimdFlags {
                avx: true,
                neon: false
            }
        );
        assert_eq!(
            SimdFlags::resolve(AARCH64, none),
            SimdFlags {
                avx: false,
                neon: true
            }
        );
        assert_eq!(SimdFlags::resolve(RISCV, none), SimdFlags::default());
    }

    #[test]
    fn test_override_wins_over_arch() {
        for target in [X86_64, AARCH64, RISCV] {
            for forced in [true, false] {
                let flags = SimdFlags::resolve(
                    target,
                    FlagOverrides {
                        avx: Some(forced),
                        neon: Some(forced),
                    },
                );
                assert_eq!(flags.avx, forced);
                assert_eq!(flags.neon, forced);
            }
        }
    }

    #[test]
    fn test_flags_resolve_independently() {
        let neon_forced = SimdFlags::resolve(
            X86_64,
            FlagOverrides {
                avx: None,
                neon: Some(true),
            },
        );
        assert_eq!(
            neon_forced,
            SimdFlags {
                avx: true,
                neon: true
            }
        );

        let avx_disabled = SimdFlags::resolve(
            AARCH64,
            FlagOverrides {
                avx: Some(false),
                neon: None,
            },
        );
        assert_eq!(
            avx_disabled,
            SimdFlags {
                avx: false,
                neon: true
            }
        );
    }

    #[test]
    fn test_parse_override_values() {
        assert_eq!(parse_override(AVX_OVERRIDE_VAR, None), Ok(None));
        for on in ["1", "true", "TRUE", " yes ", "On"] {
            assert_eq!(parse_override(AVX_OVERRIDE_VAR, Some(on)), Ok(Some(true)));
        }
        for off in ["", "0", "false", "No", "OFF"] {
            assert_eq!(parse_override(NEON_OVERRIDE_VAR, Some(off)), Ok(Some(false)));
        }

        let err = parse_override(NEON_OVERRIDE_VAR, Some("maybe")).unwrap_err();
        assert_eq!(err.var, NEON_OVERRIDE_VAR);
        assert_eq!(err.value, "maybe");
        assert!(err.to_string().contains("SQLITE_VEC_ENABLE_NEON"));
    }

    #[test]
    fn test_compiled_flags_match_build_environment() {
        let target = TargetArch {
            x86_64: cfg!(target_arch = "x86_64"),
            neon: cfg!(target_feature = "neon"),
        };
        let overrides = FlagOverrides {
            avx: parse_override(AVX_OVERRIDE_VAR, option_env!("SQLITE_VEC_ENABLE_AVX")).unwrap(),
            neon: parse_override(NEON_OVERRIDE_VAR, option_env!("SQLITE_VEC_ENABLE_NEON"))
                .unwrap(),
        };
        assert_eq!(SimdFlags::COMPILED, SimdFlags::resolve(target, overrides));
    }

    #[test]
    fn test_enabled_names() {
        assert!(SimdFlags::default().enabled_names().is_empty());
        let both = SimdFlags {
            avx: true,
            neon: true,
        };
        assert_eq!(both.enabled_names(), vec!["avx", "neon"]);
    }

    #[test]
    fn test_no_flags_always_verify() {
        assert!(SimdFlags::default().verify_cpu_support().is_ok());
    }

    #[cfg(target_arch = "x86_64")]
    #[test]
    fn test_avx_verification_matches_cpu() {
        let flags = SimdFlags {
            avx: true,
            neon: false,
        };
        assert_eq!(
            flags.verify_cpu_support().is_ok(),
            std::arch::is_x86_feature_detected!("avx")
        );
    }
}
