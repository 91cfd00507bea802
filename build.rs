// build.rs: expose the compile-time target triple as a rustc env var.
//
// Cargo provides `TARGET` to build scripts. Re-exporting it lets the binary
// report which platform `Build default` produces when no GOOS/GOARCH
// overrides are set.

fn main() {
    let target = std::env::var("TARGET")
        .expect("TARGET env var not set by Cargo. This should never happen in a normal build.");

    println!("cargo:rustc-env=TARGET={target}");
}
