#![allow(dead_code)]

pub mod command;
pub mod file;

const TMPDIR: &str = "../playground";

pub fn redirect_temp_dir() {
    unsafe {
        std::env::set_var("TMPDIR", TMPDIR);
    }

    // Ensure the TMPDIR exists
    if !std::path::Path::new(TMPDIR).exists() {
        std::fs::create_dir_all(TMPDIR).expect("Failed to create TMPDIR");
    }
}

/// Lines of the commit-view output, with the selection marker column
pub fn output_lines(stdout: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(stdout)
        .lines()
        .map(str::to_string)
        .collect()
}

/// The subject at the end of a rendered row
pub fn row_ends_with(line: &str, subject: &str) -> bool {
    line.trim_end().ends_with(subject)
}
