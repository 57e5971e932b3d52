fn main() {
    println!("cargo:rerun-if-env-changed=FFMPEG_DIR");

    #[cfg(feature = "native")]
    link_native();
}

#[cfg(feature = "native")]
fn link_native() {
    println!("cargo:rustc-link-search=native=/opt/homebrew/lib");
    if let Some(dir) = std::env::var_os("FFMPEG_DIR") {
        let lib = std::path::Path::new(&dir).join("lib");
        println!("cargo:rustc-link-search=native={}", lib.display());
    }
    println!("cargo:rustc-link-lib=swresample");
    println!("cargo:rustc-link-lib=avutil");
}
