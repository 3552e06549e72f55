// Build metadata for `placerecon --version`.

use std::env;
use std::process::Command;

/// `git describe` of the checkout, marked `-dirty` with local edits.
fn source_revision() -> Option<String> {
    let out = Command::new("git")
        .args(["describe", "--always", "--dirty", "--abbrev=7"])
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    let revision = String::from_utf8(out.stdout).ok()?.trim().to_string();
    (!revision.is_empty()).then_some(revision)
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=../../.git/HEAD");

    let revision = source_revision().unwrap_or_else(|| "unknown".into());
    println!("cargo:rustc-env=PLACERECON_REVISION={revision}");

    let target = env::var("TARGET").unwrap_or_else(|_| "unknown".into());
    let profile = env::var("PROFILE").unwrap_or_else(|_| "unknown".into());
    println!("cargo:rustc-env=PLACERECON_BUILD={target}, {profile}");
}
