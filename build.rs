fn main() {
    println!("cargo:rerun-if-env-changed=IPOPT_LIB_DIR");

    // Prefer pkg-config, which knows the full link line for the local IPOPT
    // build (including its linear solvers and BLAS).
    if pkg_config::Config::new().probe("ipopt").is_ok() {
        return;
    }

    // Fall back to plain link directives for installs without a .pc file.
    if let Ok(dir) = std::env::var("IPOPT_LIB_DIR") {
        println!("cargo:rustc-link-search=native={dir}");
    }
    println!("cargo:rustc-link-lib=ipopt");

    // IPOPT is a C++ library, so it depends on the C++ standard library:
    // libc++ on macOS, libstdc++ elsewhere.
    if cfg!(target_os = "macos") {
        println!("cargo:rustc-link-lib=c++");
    } else {
        println!("cargo:rustc-link-lib=stdc++");
    }
}
