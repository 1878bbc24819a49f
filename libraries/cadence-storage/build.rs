//! Build script for cadence-storage.
//!
//! Rebuild when database migrations change, since they are embedded.

fn main() {
    println!("cargo:rerun-if-changed=migrations");
}
