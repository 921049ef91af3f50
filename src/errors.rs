use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum BenchError {
    #[error("{what} not found at {path}. {hint}")]
    PrerequisiteMissing {
        what: String,
        path: PathBuf,
        hint: String,
    },

    #[error("Failed to start {program}: {source}")]
    ProcessStart {
        program: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed waiting for {program}: {source}")]
    ProcessWait {
        program: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read benchmark plan {path}: {source}")]
    PlanRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse benchmark plan {path}: {detail}")]
    PlanParse { path: PathBuf, detail: String },

    #[error("Failed to write file list {path}: {source}")]
    FileList {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write report {path}: {source}")]
    ReportWrite {
        path: PathBuf,
        source: std::io::Error,
    },
}
