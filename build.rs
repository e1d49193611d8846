use std::process::Command;

/// Describe the checked out commit, e.g. `v0.1.0-3-g034ac04-dirty`.
///
/// Returns `None` outside of a git checkout, like crates.io builds.
fn git_describe() -> Option<String> {
    let output = Command::new("git")
        .args(["describe", "--always", "--dirty", "--tags"])
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let version = String::from_utf8_lossy(&output.stdout).trim().to_owned();
    (!version.is_empty()).then_some(version)
}

/// Pass git-describe through CARGO_GIT_VERSION env variable
///
/// NOTE: Cargo.toml still needs to be updated on releases
fn main() {
    match git_describe() {
        Some(version) => {
            println!("cargo:rustc-env=CARGO_GIT_VERSION={}", version);
            // rerun when git checks out another ref or any ref changes
            println!("cargo:rerun-if-changed=.git/refs/");
            println!("cargo:rerun-if-changed=.git/HEAD");
        }
        None => eprintln!("git describe failed; using crate version"),
    }
}
