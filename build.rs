// build.rs

use chrono::Utc;
use std::env;
use std::fs;
use std::path::Path;

fn main() {
    // OUT_DIR is always set by Cargo for build scripts
    let out_dir = env::var("OUT_DIR").expect("OUT_DIR not set");
    let dest_path = Path::new(&out_dir).join("build_info.rs");

    // Stamp the build, logged by the binary at startup
    let build_date = Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();

    fs::write(
        &dest_path,
        format!("pub const BUILD_DATE: &str = \"{}\";", build_date),
    )
    .expect("writing build_info.rs");

    // Re-run only when build.rs changes, so the date tracks real rebuilds
    println!("cargo:rerun-if-changed=build.rs");
}
