use std::{env, fs, path::PathBuf};

fn main() {
    // The Pico 1 linker script is only needed for the firmware; host builds skip it.
    let Ok(target) = env::var("TARGET") else {
        return;
    };
    if !target.starts_with("thumbv6m") {
        return;
    }
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));
    let memory_x = fs::read_to_string("memory-pico1.x").expect("Failed to read memory-pico1.x");
    fs::write(out_dir.join("memory.x"), memory_x).expect("Failed to write memory.x");
    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    println!("cargo:rerun-if-changed=memory-pico1.x");
}
