// Integration test utilities and common code
// WHY: Centralized utilities avoid duplication across integration tests

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test fixture helper for creating temporary directories with truth/submission CSVs
pub struct TestFixture {
    pub temp_dir: TempDir,
    pub root_path: PathBuf,
}

impl TestFixture {
    /// Create a new test fixture with temporary directory
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root_path = temp_dir.path().to_path_buf();

        Self { temp_dir, root_path }
    }

    /// Write a raw file under the fixture root
    pub fn create_file<P: AsRef<Path>>(&self, relative_path: P, content: &str) -> PathBuf {
        let file_path = self.root_path.join(relative_path);

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }

        fs::write(&file_path, content).expect("Failed to write test file");
        file_path
    }

    /// Write a truth table from (err_sentence, cor_sentence) pairs
    pub fn create_truth<P: AsRef<Path>>(&self, relative_path: P, rows: &[(&str, &str)]) -> PathBuf {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(["err_sentence", "cor_sentence"])
            .expect("Failed to write truth header");
        for (err, cor) in rows {
            writer.write_record([*err, *cor]).expect("Failed to write truth row");
        }
        let data = writer.into_inner().expect("Failed to flush truth CSV");
        self.create_file(relative_path, &String::from_utf8(data).expect("CSV is UTF-8"))
    }

    /// Write a submission table with only a cor_sentence column
    pub fn create_predictions<P: AsRef<Path>>(&self, relative_path: P, rows: &[&str]) -> PathBuf {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(["cor_sentence"])
            .expect("Failed to write prediction header");
        for cor in rows {
            writer.write_record([*cor]).expect("Failed to write prediction row");
        }
        let data = writer.into_inner().expect("Failed to flush prediction CSV");
        self.create_file(relative_path, &String::from_utf8(data).expect("CSV is UTF-8"))
    }

    /// Write a submission table carrying its own err_sentence column
    pub fn create_predictions_with_originals<P: AsRef<Path>>(
        &self,
        relative_path: P,
        rows: &[(&str, &str)],
    ) -> PathBuf {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(["err_sentence", "cor_sentence"])
            .expect("Failed to write prediction header");
        for (err, cor) in rows {
            writer.write_record([*err, *cor]).expect("Failed to write prediction row");
        }
        let data = writer.into_inner().expect("Failed to flush prediction CSV");
        self.create_file(relative_path, &String::from_utf8(data).expect("CSV is UTF-8"))
    }

    /// Path where the CLI writes the analysis CSV for a submission among flat siblings
    pub fn analysis_path<P: AsRef<Path>>(&self, analysis_dir: P, submission: P) -> PathBuf {
        let stem = submission
            .as_ref()
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("submission");
        self.root_path
            .join(analysis_dir)
            .join(format!("{stem}_analysis.csv"))
    }
}

/// Assert a percentage to two decimal places
pub fn assert_percent(actual: f64, expected: f64, context: &str) {
    if (actual - expected).abs() > 0.005 {
        panic!("{context}: expected {expected:.2}%, got {actual:.2}%");
    }
}
