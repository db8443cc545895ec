//! Build script for meshloader-ffi
//!
//! Generates the C header with cbindgen. Generation failures are reported
//! but do not fail the build.

fn main() {
    println!("cargo:rerun-if-changed=src/lib.rs");
    println!("cargo:rerun-if-changed=src/slice.rs");
    println!("cargo:rerun-if-changed=cbindgen.toml");

    let Ok(crate_dir) = std::env::var("CARGO_MANIFEST_DIR") else {
        return;
    };
    let crate_dir = std::path::PathBuf::from(crate_dir);
    let output_dir = crate_dir.join("include");

    if let Err(e) = std::fs::create_dir_all(&output_dir) {
        println!("cargo:warning=Could not create {}: {e}", output_dir.display());
        return;
    }

    let config = match cbindgen::Config::from_file(crate_dir.join("cbindgen.toml")) {
        Ok(config) => config,
        Err(e) => {
            println!("cargo:warning=Could not read cbindgen.toml: {e}");
            return;
        }
    };

    match cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_config(config)
        .generate()
    {
        Ok(bindings) => {
            bindings.write_to_file(output_dir.join("meshloader.h"));
        }
        Err(e) => {
            println!("cargo:warning=cbindgen failed, header not generated: {e:?}");
        }
    }
}
