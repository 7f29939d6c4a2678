//! Stamps the binary with its build date and, outside `--features release`,
//! the git commit it was built from. Both end up in `docs2csv --version`.

use std::process::Command;

const UNKNOWN: &str = "unknown";

fn build_date() -> String {
    Command::new("date")
        .arg("+%Y-%m-%d")
        .output()
        .ok()
        .filter(|output| output.status.success())
        .map(|output| String::from_utf8_lossy(&output.stdout).trim().to_string())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

#[cfg(not(feature = "release"))]
fn emit_git_sha() {
    use vergen_gitcl::{Emitter, GitclBuilder};

    let emitted = GitclBuilder::default()
        .sha(true)
        .build()
        .map_err(|e| e.to_string())
        .and_then(|git| {
            Emitter::default()
                .add_instructions(&git)
                .and_then(|emitter| emitter.emit())
                .map_err(|e| e.to_string())
        });

    // Source tarballs have no git checkout
    if let Err(e) = emitted {
        println!("cargo:warning=No git commit for the version string: {}", e);
        println!("cargo:rustc-env=VERGEN_GIT_SHA={}", UNKNOWN);
    }
}

fn main() {
    println!("cargo:rustc-env=DOCS2CSV_BUILD_DATE={}", build_date());

    #[cfg(not(feature = "release"))]
    emit_git_sha();
}
