use std::env;

include!("src/simd/resolve.rs");

const SQLITE_VEC_SOURCE: &str = "sqlite-vec/sqlite-vec.c";

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=src/simd/resolve.rs");
    println!("cargo:rerun-if-changed={SQLITE_VEC_SOURCE}");
    println!("cargo:rerun-if-changed=sqlite-vec/sqlite-vec.h");
    println!("cargo:rerun-if-env-changed={AVX_OVERRIDE_VAR}");
    println!("cargo:rerun-if-env-changed={NEON_OVERRIDE_VAR}");
    println!("cargo:rustc-check-cfg=cfg(sqlite_vec_avx)");
    println!("cargo:rustc-check-cfg=cfg(sqlite_vec_neon)");

    let target = TargetArch::from_cargo(
        &env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_default(),
        &env::var("CARGO_CFG_TARGET_FEATURE").unwrap_or_default(),
    );

    let overrides = match read_overrides() {
        Ok(overrides) => overrides,
        Err(err) => panic!("{err}"),
    };

    let flags = SimdFlags::resolve(target, overrides);
    if flags.avx {
        println!("cargo:rustc-cfg=sqlite_vec_avx");
    }
    if flags.neon {
        println!("cargo:rustc-cfg=sqlite_vec_neon");
    }

    compile_sqlite_vec(flags);
}

fn read_overrides() -> Result<FlagOverrides, InvalidOverride> {
    let avx = env::var(AVX_OVERRIDE_VAR).ok();
    let neon = env::var(NEON_OVERRIDE_VAR).ok();
    Ok(FlagOverrides {
        avx: parse_override(AVX_OVERRIDE_VAR, avx.as_deref())?,
        neon: parse_override(NEON_OVERRIDE_VAR, neon.as_deref())?,
    })
}

/// Builds sqlite-vec against the bundled SQLite with the resolved SIMD defines.
fn compile_sqlite_vec(flags: SimdFlags) {
    let mut build = cc::Build::new();
    build
        .file(SQLITE_VEC_SOURCE)
        .include("sqlite-vec")
        .define("SQLITE_CORE", None)
        .define("SQLITE_VEC_STATIC", None)
        .static_flag(true);

    // `sqlite3.h` of the SQLite that libsqlite3-sys bundles.
    if let Ok(include) = env::var("DEP_SQLITE3_INCLUDE") {
        build.include(include);
    }

    if flags.avx {
        build.define("SQLITE_VEC_ENABLE_AVX", None);
        if env::var("CARGO_CFG_TARGET_ENV").as_deref() == Ok("msvc") {
            build.flag_if_supported("/arch:AVX");
        } else {
            build.flag_if_supported("-mavx");
        }
    }
    if flags.neon {
        build.define("SQLITE_VEC_ENABLE_NEON", None);
    }

    build.compile("sqlite_vec_autoload");
}
