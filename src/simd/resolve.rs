// Shared with build.rs through `include!`: outer docs only, no `use` items.

/// Build-environment variable that overrides the AVX flag.
pub const AVX_OVERRIDE_VAR: &str = "SQLITE_VEC_ENABLE_AVX";

/// Build-environment variable that overrides the NEON flag.
pub const NEON_OVERRIDE_VAR: &str = "SQLITE_VEC_ENABLE_NEON";

/// Architecture predicates of the compilation target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TargetArch {
    /// Target is x86-64.
    pub x86_64: bool,
    /// Target exposes ARM NEON.
    pub neon: bool,
}

impl TargetArch {
    /// Build predicates from Cargo's `CARGO_CFG_TARGET_ARCH` and
    /// `CARGO_CFG_TARGET_FEATURE` values.
    #[must_use]
    pub fn from_cargo(arch: &str, features: &str) -> Self {
        Self {
            x86_64: arch == "x86_64",
            neon: features.split(',').any(|feature| feature.trim() == "neon"),
        }
    }
}

/// Explicit per-flag overrides. `None` means "not set".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FlagOverrides {
    /// AVX override.
    pub avx: Option<bool>,
    /// NEON override.
    pub neon: Option<bool>,
}

/// Override variable holding a value that is neither on nor off.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvalidOverride {
    /// Variable name.
    pub var: &'static str,
    /// Raw value.
    pub value: String,
}

impl std::fmt::Display for InvalidOverride {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}={:?} is not a valid flag value (expected 1/0, true/false, yes/no, on/off)",
            self.var, self.value
        )
    }
}

impl std::error::Error for InvalidOverride {}

/// Parse the raw value of an override variable.
///
/// # Errors
/// Returns an error if the variable is set to something that is neither on nor off.
pub fn parse_override(
    var: &'static str,
    value: Option<&str>,
) -> Result<Option<bool>, InvalidOverride> {
    let Some(raw) = value else {
        return Ok(None);
    };
    let normalized = raw.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "1" | "true" | "yes" | "on" => Ok(Some(true)),
        "" | "0" | "false" | "no" | "off" => Ok(Some(false)),
        _ => Err(InvalidOverride {
            var,
            value: raw.to_string(),
        }),
    }
}

/// Resolve one flag: an explicit override wins, otherwise the architecture decides.
#[inline]
#[must_use]
pub const fn resolve_flag(override_value: Option<bool>, arch_supported: bool) -> bool {
    match override_value {
        Some(value) => value,
        None => arch_supported,
    }
}

/// Resolved SIMD acceleration flags of the vector extension.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SimdFlags {
    /// AVX code path enabled.
    pub avx: bool,
    /// NEON code path enabled.
    pub neon: bool,
}

impl SimdFlags {
    /// Resolve both flags independently.
    #[must_use]
    pub const fn resolve(target: TargetArch, overrides: FlagOverrides) -> Self {
        Self {
            avx: resolve_flag(overrides.avx, target.x86_64),
            neon: resolve_flag(overrides.neon, target.neon),
        }
    }
}
