use std::path::Path;

use anyhow::Result;
use owo_colors::{OwoColorize, Stream};

use crate::corpus;
use crate::exec::{CommandSpec, TrialExecutor};
use crate::plan::{CorpusSpec, Plan, RunConfig};
use crate::types::BenchmarkResult;

/// Runs the warmup/timed trial schedule for one tool at a time.
///
/// The trial counts are fixed at construction and shared by every corpus in
/// the run. All progress goes to stderr; stdout stays clean for the report.
pub struct SampleCollector<'e, E: TrialExecutor> {
    executor: &'e mut E,
    config: RunConfig,
}

impl<'e, E: TrialExecutor> SampleCollector<'e, E> {
    pub fn new(executor: &'e mut E, config: RunConfig) -> Self {
        Self { executor, config }
    }

    /// Perform the configured warmup invocations (durations discarded) and
    /// then the timed invocations, returning timed durations in trial order.
    ///
    /// Warmups use the identical command so one-time costs (JVM startup
    /// caches, page cache) are paid before measurement begins. An executor
    /// failure propagates immediately; no remaining trial is attempted.
    pub fn collect(&mut self, label: &str, cmd: &CommandSpec) -> Result<Vec<f64>> {
        eprintln!(
            "{}",
            format!("  $ {}", cmd.display()).if_supports_color(Stream::Stderr, |s| s.dimmed())
        );

        for i in 0..self.config.warmup {
            let trial = self.executor.run(cmd)?;
            trial_line(label, "warmup", i + 1, trial.elapsed.as_secs_f64());
        }

        let mut samples = Vec::with_capacity(self.config.timed);
        for i in 0..self.config.timed {
            let trial = self.executor.run(cmd)?;
            let secs = trial.elapsed.as_secs_f64();
            trial_line(label, "run", i + 1, secs);
            samples.push(secs);
        }

        Ok(samples)
    }
}

/// Benchmark one corpus: write the reference tool's file list, then run the
/// reference tool's full warmup+timed phase followed by the candidate's.
///
/// The two tools are never interleaved, so transient system load during one
/// tool's trials cannot sit inside the other's measurement window.
pub fn run_corpus<E: TrialExecutor>(
    collector: &mut SampleCollector<'_, E>,
    plan: &Plan,
    corpus: &CorpusSpec,
    scratch_dir: &Path,
) -> Result<BenchmarkResult> {
    let files = corpus::count_source_files(&corpus.path);

    let file_list = scratch_dir.join(file_list_name(&corpus.name));
    corpus::write_file_list(&corpus.path, &file_list)?;

    banner(&corpus.name, files);

    let reference_cmd = plan.reference_command(corpus, &file_list);
    let candidate_cmd = plan.candidate_command(corpus);

    let reference_times = collector.collect(plan.reference_label(), &reference_cmd)?;
    let candidate_times = collector.collect(&plan.candidate_label(), &candidate_cmd)?;

    Ok(BenchmarkResult {
        name: corpus.name.clone(),
        files,
        reference_times,
        candidate_times,
    })
}

/// `Agrona` -> `agrona_files.txt`; anything non-alphanumeric becomes `-`
/// so corpus names can't escape the scratch directory.
fn file_list_name(corpus_name: &str) -> String {
    let slug: String = corpus_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    format!("{slug}_files.txt")
}

fn banner(name: &str, files: usize) {
    eprintln!(
        "{}",
        format!("Benchmarking {name}").if_supports_color(Stream::Stderr, |s| s.bold())
    );
    eprintln!(
        "{}",
        format!("Java files: {files}").if_supports_color(Stream::Stderr, |s| s.dimmed())
    );
}

fn trial_line(label: &str, phase: &str, number: usize, secs: f64) {
    eprintln!(
        "{}",
        format!("  {label} {phase} {number}... {secs:.2}s")
            .if_supports_color(Stream::Stderr, |s| s.dimmed())
    );
}
