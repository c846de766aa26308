//! Stamps the `eegdash version` line
//!
//! Emits exactly the values `BuildInfo` renders, under `EEGDASH_*` names.

use std::path::Path;
use std::process::Command;

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?;
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let revision = git(&["describe", "--always", "--dirty", "--abbrev=7"])
        .unwrap_or_else(|| "untracked".to_string());
    if let Some(git_dir) = git(&["rev-parse", "--absolute-git-dir"]) {
        let head = Path::new(&git_dir).join("HEAD");
        if head.exists() {
            println!("cargo:rerun-if-changed={}", head.display());
        }
    }

    // UTC date only
    let built_on = chrono::Utc::now().format("%Y-%m-%d").to_string();

    let optimized = std::env::var("OPT_LEVEL").map_or(false, |level| level != "0");

    println!("cargo:rustc-env=EEGDASH_REVISION={}", revision);
    println!("cargo:rustc-env=EEGDASH_BUILT_ON={}", built_on);
    println!("cargo:rustc-env=EEGDASH_OPTIMIZED={}", optimized);
}
