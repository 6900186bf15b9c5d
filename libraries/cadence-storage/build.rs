//! Build script for cadence-storage.
//!
//! Rebuild when database migrations change.

fn main() {
    println!("cargo:rerun-if-changed=migrations");
}
