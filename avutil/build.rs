fn main() {
    println!("cargo:rerun-if-changed=csrc/frame_shim.c");
    println!("cargo:rerun-if-env-changed=FFMPEG_DIR");

    #[cfg(feature = "native")]
    build_native();
}

#[cfg(feature = "native")]
fn build_native() {
    use std::path::PathBuf;

    let mut includes = vec![PathBuf::from("/opt/homebrew/include")];
    println!("cargo:rustc-link-search=native=/opt/homebrew/lib");
    if let Some(dir) = std::env::var_os("FFMPEG_DIR") {
        let dir = PathBuf::from(dir);
        println!("cargo:rustc-link-search=native={}", dir.join("lib").display());
        includes.insert(0, dir.join("include"));
    }
    println!("cargo:rustc-link-lib=avutil");

    // AVFrame's layout changes between FFmpeg releases, so field access
    // goes through a shim compiled against the installed headers.
    cc::Build::new()
        .file("csrc/frame_shim.c")
        .includes(includes)
        .compile("libav_frame_shim");
}
