//! End-to-end extraction scenarios with shell-script fakes for the external
//! tools (pdftotext, pdftoppm, tesseract, docsplit).

#![cfg(unix)]

use super::helpers::{parse_csv, row, Sandbox};

fn mixed_directory(pdf_text: &str) -> Sandbox {
    let sandbox = Sandbox::new().with_fake_tools();
    sandbox
        .file("a.txt", "hello world")
        .file("b.pdf", pdf_text)
        .file("c.jpg", "receipt total 12.50");
    sandbox
}

#[test]
fn without_ocr_images_have_empty_text() {
    let sandbox = mixed_directory("Annual report");

    let (stdout, stderr, exit_code) = sandbox.run_input(&[]);
    let (_, rows) = parse_csv(&stdout);

    assert_eq!(exit_code, 0, "stderr: {}", stderr);
    assert_eq!(rows.len(), 3);
    assert_eq!(row(&rows, "a.txt")[1], "hello world");
    assert_eq!(row(&rows, "b.pdf")[1], "Annual report");
    assert_eq!(row(&rows, "c.jpg")[1], "");
}

#[test]
fn ocr_fills_in_pdf_without_text_layer() {
    let sandbox = mixed_directory("\x0c\x0c");

    let (stdout, stderr, exit_code) = sandbox.run_input(&["--ocr"]);
    let (_, rows) = parse_csv(&stdout);

    assert_eq!(exit_code, 0, "stderr: {}", stderr);
    assert_eq!(row(&rows, "b.pdf")[1], "scanned page one\nscanned page two");
    assert_eq!(row(&rows, "c.jpg")[1], "receipt total 12.50");
}

#[test]
fn ocr_leaves_pdf_with_text_layer_alone() {
    let sandbox = mixed_directory("Annual report");

    let (stdout, _, _) = sandbox.run_input(&["-o"]);
    let (_, rows) = parse_csv(&stdout);

    assert_eq!(row(&rows, "b.pdf")[1], "Annual report");
}

#[test]
fn force_ocr_appends_page_text() {
    let sandbox = mixed_directory("Annual report");

    let (stdout, _, _) = sandbox.run_input(&["-f"]);
    let (_, rows) = parse_csv(&stdout);

    assert_eq!(
        row(&rows, "b.pdf")[1],
        "Annual report\nscanned page one\nscanned page two"
    );
    assert_eq!(row(&rows, "c.jpg")[1], "receipt total 12.50");
}

#[test]
fn corrupt_file_is_skipped_and_reported() {
    let sandbox = mixed_directory("Annual report");
    sandbox.file("corrupt.pdf", "garbage");

    let (stdout, stderr, exit_code) = sandbox.run_input(&[]);
    let (_, rows) = parse_csv(&stdout);

    assert_eq!(exit_code, 0);
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|r| !r[2].ends_with("corrupt.pdf")));
    assert!(stderr.contains("corrupt.pdf"));
    assert!(stderr.contains("May not be a PDF file"));
    assert!(stderr.contains("3 processed, 1 skipped"));
}

#[test]
fn office_documents_use_generic_extractor() {
    let sandbox = Sandbox::new().with_fake_tools();
    sandbox
        .file("memo.docx", "Memo body")
        .file("page.html", "<p>Hi</p>\x0c");

    let (stdout, stderr, exit_code) = sandbox.run_input(&[]);
    let (_, rows) = parse_csv(&stdout);

    assert_eq!(exit_code, 0, "stderr: {}", stderr);
    assert_eq!(row(&rows, "memo.docx")[1], "Memo body");
    assert_eq!(row(&rows, "page.html")[1], "<p>Hi</p>\n");
}

#[test]
fn missing_tool_skips_only_affected_files() {
    let sandbox = Sandbox::new().with_settings(
        "[tools]\npdftotext = '/nonexistent/pdftotext'\npdftoppm = '/nonexistent/pdftoppm'\n",
    );
    sandbox.file("a.txt", "still here").file("b.pdf", "%PDF");

    let (stdout, stderr, exit_code) = sandbox.run_input(&[]);
    let (_, rows) = parse_csv(&stdout);

    assert_eq!(exit_code, 0);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][1], "still here");
    assert!(stderr.contains("pdftotext not found"));
}
