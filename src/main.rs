use std::path::PathBuf;
use std::process;

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use owo_colors::{OwoColorize, Stream};

use lintbench::collect::{self, SampleCollector};
use lintbench::exec::ProcessExecutor;
use lintbench::plan::Plan;
use lintbench::report;

#[derive(Parser)]
#[command(
    name = "lintbench",
    version,
    about = "Benchmark a native lint binary against Checkstyle on shared corpora"
)]
struct Cli {
    /// Benchmark plan (TOML)
    #[arg(long, default_value = "bench.toml")]
    plan: PathBuf,

    /// Override the plan's warmup run count
    #[arg(long)]
    warmup: Option<usize>,

    /// Override the plan's timed run count
    #[arg(long)]
    runs: Option<usize>,

    /// Directory for file lists and the rendered chart
    #[arg(long, default_value = "target/benchmark")]
    out_dir: PathBuf,

    /// Emit the results as JSON instead of a markdown table
    #[arg(long)]
    json: bool,

    /// Skip writing the SVG chart
    #[arg(long)]
    no_chart: bool,
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut plan = Plan::load(&cli.plan)?;
    if let Some(warmup) = cli.warmup {
        plan.runs.warmup = warmup;
    }
    if let Some(timed) = cli.runs {
        if timed == 0 {
            anyhow::bail!("at least one timed run is required (--runs must be >= 1)");
        }
        plan.runs.timed = timed;
    }

    plan.preflight()?;

    std::fs::create_dir_all(&cli.out_dir)?;

    let mut executor = ProcessExecutor::new();
    let mut collector = SampleCollector::new(&mut executor, plan.runs);

    let mut results = Vec::with_capacity(plan.corpora.len());
    for corpus in &plan.corpora {
        results.push(collect::run_corpus(
            &mut collector,
            &plan,
            corpus,
            &cli.out_dir,
        )?);
    }

    let reference_label = plan.reference_label().to_string();
    let candidate_label = plan.candidate_label();

    let output = if cli.json {
        report::format_json(&results, &reference_label, &candidate_label, Utc::now())
    } else {
        report::format_table(&results, &reference_label, &candidate_label)
    };
    print!("{}", output);

    if !cli.no_chart {
        let chart_path = cli.out_dir.join("benchmark_results.svg");
        report::write_chart(&results, &reference_label, &candidate_label, &chart_path)?;
        eprintln!(
            "{}",
            format!("Chart saved to: {}", chart_path.display())
                .if_supports_color(Stream::Stderr, |s| s.dimmed())
        );
    }

    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{}", err);
        process::exit(1);
    }
}
