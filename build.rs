use std::process::Command;

const VERSION_VAR: &str = "NAIVE_CONFIG_SYNC_VERSION";

/// `git describe` of the checkout being built, if git can tell.
fn describe() -> Option<String> {
    let output = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        .ok()?;
    output
        .status
        .success()
        .then(|| String::from_utf8_lossy(&output.stdout).trim().to_string())
}

fn main() {
    // Release builds pin the version through the environment.
    if let Some(version) = std::env::var(VERSION_VAR).ok().or_else(describe) {
        println!("cargo:rustc-env={VERSION_VAR}={version}");
    }

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");
    println!("cargo:rerun-if-env-changed={VERSION_VAR}");
}
