use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Deserialize;

use crate::errors::BenchError;
use crate::exec::CommandSpec;

/// Warmup and timed trial counts, fixed for the whole run.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RunConfig {
    #[serde(default = "default_warmup")]
    pub warmup: usize,
    #[serde(default = "default_timed")]
    pub timed: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            warmup: default_warmup(),
            timed: default_timed(),
        }
    }
}

fn default_warmup() -> usize {
    2
}

fn default_timed() -> usize {
    10
}

#[derive(Debug, Clone, Deserialize)]
pub struct Tools {
    /// Path to the candidate lint binary (the build artifact under test).
    pub candidate: PathBuf,
    /// Path to the reference tool's all-in-one jar.
    pub reference_jar: PathBuf,
    /// Java interpreter used to launch the reference jar.
    #[serde(default = "default_java")]
    pub java: PathBuf,
    /// Display label for the candidate; defaults to the binary's file stem.
    pub candidate_label: Option<String>,
    #[serde(default = "default_reference_label")]
    pub reference_label: String,
}

fn default_java() -> PathBuf {
    PathBuf::from("java")
}

fn default_reference_label() -> String {
    "Checkstyle".to_string()
}

/// One named benchmark target: a file-set location plus the rule-set used
/// for both tools on that corpus.
#[derive(Debug, Clone, Deserialize)]
pub struct CorpusSpec {
    pub name: String,
    pub path: PathBuf,
    pub config: PathBuf,
    /// Suppressions directory, relative to `path`. The reference tool
    /// resolves it through the `config_loc` property.
    #[serde(default = "default_suppressions")]
    pub suppressions: PathBuf,
}

fn default_suppressions() -> PathBuf {
    PathBuf::from("config/checkstyle")
}

impl CorpusSpec {
    pub fn suppressions_dir(&self) -> PathBuf {
        self.path.join(&self.suppressions)
    }
}

/// The immutable benchmark plan: trial counts, tool locations, and the
/// ordered corpus list. Loaded from TOML once at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct Plan {
    #[serde(default)]
    pub runs: RunConfig,
    pub tools: Tools,
    #[serde(rename = "corpus", default)]
    pub corpora: Vec<CorpusSpec>,
}

impl Plan {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| BenchError::PlanRead {
            path: path.to_path_buf(),
            source,
        })?;

        let plan: Plan = toml::from_str(&text).map_err(|e| BenchError::PlanParse {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;

        if plan.corpora.is_empty() {
            return Err(BenchError::PlanParse {
                path: path.to_path_buf(),
                detail: "plan defines no [[corpus]] entries".to_string(),
            }
            .into());
        }

        if plan.runs.timed == 0 {
            return Err(BenchError::PlanParse {
                path: path.to_path_buf(),
                detail: "runs.timed must be at least 1".to_string(),
            }
            .into());
        }

        Ok(plan)
    }

    /// Verify every external prerequisite before any trial runs. The first
    /// missing one aborts the run — no partial benchmark is ever produced.
    pub fn preflight(&self) -> Result<()> {
        if !self.tools.candidate.exists() {
            return Err(BenchError::PrerequisiteMissing {
                what: "candidate binary".to_string(),
                path: self.tools.candidate.clone(),
                hint: "Run: cargo build --release".to_string(),
            }
            .into());
        }

        if !self.tools.reference_jar.exists() {
            return Err(BenchError::PrerequisiteMissing {
                what: "reference jar".to_string(),
                path: self.tools.reference_jar.clone(),
                hint: "Download the Checkstyle all-in-one jar".to_string(),
            }
            .into());
        }

        for corpus in &self.corpora {
            if !corpus.path.exists() {
                return Err(BenchError::PrerequisiteMissing {
                    what: format!("corpus '{}'", corpus.name),
                    path: corpus.path.clone(),
                    hint: "Clone the benchmark corpora first".to_string(),
                }
                .into());
            }
        }

        Ok(())
    }

    /// Reference invocation. The flag shapes are Checkstyle's and must stay
    /// verbatim: the suppressions directory travels as a JVM property and
    /// the file list as a single `@file` argument to stay under argv limits.
    pub fn reference_command(&self, corpus: &CorpusSpec, file_list: &Path) -> CommandSpec {
        CommandSpec::new(&self.tools.java)
            .arg(format!(
                "-Dconfig_loc={}",
                corpus.suppressions_dir().display()
            ))
            .arg("-jar")
            .arg(&self.tools.reference_jar)
            .arg("-c")
            .arg(&corpus.config)
            .arg(format!("@{}", file_list.display()))
    }

    /// Candidate invocation: `check` subcommand over the corpus root.
    pub fn candidate_command(&self, corpus: &CorpusSpec) -> CommandSpec {
        CommandSpec::new(&self.tools.candidate)
            .arg("check")
            .arg(&corpus.path)
            .arg("--config")
            .arg(&corpus.config)
            .arg("--config-loc")
            .arg(corpus.suppressions_dir())
    }

    pub fn candidate_label(&self) -> String {
        if let Some(label) = &self.tools.candidate_label {
            return label.clone();
        }
        self.tools
            .candidate
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "candidate".to_string())
    }

    pub fn reference_label(&self) -> &str {
        &self.tools.reference_label
    }
}
