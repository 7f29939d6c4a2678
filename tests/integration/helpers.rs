//! Shared helpers: sandboxed input trees, fake external tools, CSV parsing.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// A temporary working area with an `input/` tree and a settings file.
pub struct Sandbox {
    dir: TempDir,
    settings: PathBuf,
}

impl Sandbox {
    /// Empty input directory, empty settings (tools looked up on PATH).
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("input")).unwrap();
        let settings = dir.path().join("config.toml");
        fs::write(&settings, "").unwrap();
        Self { dir, settings }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn input(&self) -> PathBuf {
        self.dir.path().join("input")
    }

    /// Create a file below `input/`, with parent directories.
    pub fn file(&self, relative: &str, content: impl AsRef<[u8]>) -> &Self {
        let path = self.input().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
        self
    }

    /// Replace the settings file content.
    pub fn with_settings(self, content: &str) -> Self {
        fs::write(&self.settings, content).unwrap();
        self
    }

    /// Point every external tool at a shell-script fake in the sandbox.
    ///
    /// - pdftotext prints the PDF file's bytes; files named `corrupt.pdf` fail
    /// - pdftoppm renders two pages whose "pixels" are their text
    /// - tesseract prints the image file's bytes
    /// - docsplit copies the document to `<stem>.txt`
    #[cfg(unix)]
    pub fn with_fake_tools(self) -> Self {
        let bin = self.path().join("bin");
        fs::create_dir(&bin).unwrap();

        let pdftotext = script(
            &bin,
            "pdftotext",
            r#"case "$3" in
  *corrupt.pdf) echo "Syntax Error: May not be a PDF file" >&2; exit 1 ;;
esac
cat "$3""#,
        );
        let pdftoppm = script(
            &bin,
            "pdftoppm",
            r#"printf 'scanned page one' > "$5-1.png"
printf 'scanned page two' > "$5-2.png""#,
        );
        let tesseract = script(&bin, "tesseract", r#"cat "$1""#);
        let docsplit = script(
            &bin,
            "docsplit",
            r#"base=$(basename "$5")
cat "$5" > "$4/${base%.*}.txt""#,
        );

        let settings = format!(
            "[tools]\npdftotext = '{}'\npdftoppm = '{}'\ntesseract = '{}'\ndocsplit = '{}'\n",
            pdftotext.display(),
            pdftoppm.display(),
            tesseract.display(),
            docsplit.display()
        );
        fs::write(&self.settings, settings).unwrap();
        self
    }

    /// Run docs2csv with the sandbox settings, returning (stdout, stderr, exit code).
    pub fn run(&self, args: &[&str]) -> (String, String, i32) {
        let output = Command::new(env!("CARGO_BIN_EXE_docs2csv"))
            .arg("--config")
            .arg(&self.settings)
            .args(args)
            .env_remove("DOCS2CSV_LOG")
            .output()
            .expect("Failed to execute docs2csv");

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        let exit_code = output.status.code().unwrap_or(-1);

        (stdout, stderr, exit_code)
    }

    /// Run on the input directory (extra flags first).
    pub fn run_input(&self, flags: &[&str]) -> (String, String, i32) {
        let input = self.input();
        let mut args = flags.to_vec();
        args.push(input.to_str().unwrap());
        self.run(&args)
    }
}

#[cfg(unix)]
fn script(bin: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = bin.join(name);
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Parse CSV output with a header into rows of owned fields.
pub fn parse_csv(output: &str) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::Reader::from_reader(output.as_bytes());
    let header = reader
        .headers()
        .unwrap()
        .iter()
        .map(str::to_string)
        .collect();
    let rows = reader
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect();
    (header, rows)
}

/// Find the row whose title ends with `name`.
pub fn row<'a>(rows: &'a [Vec<String>], name: &str) -> &'a Vec<String> {
    rows.iter()
        .find(|r| r[2].ends_with(name))
        .unwrap_or_else(|| panic!("no row for {}", name))
}
