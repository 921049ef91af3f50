use std::fmt::Write as _;
use std::path::Path;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::errors::BenchError;
use crate::types::BenchmarkResult;

const REFERENCE_COLOR: &str = "#e74c3c";
const CANDIDATE_COLOR: &str = "#2ecc71";

/// Markdown results table, one row per corpus in benchmarked order.
pub fn format_table(
    results: &[BenchmarkResult],
    reference_label: &str,
    candidate_label: &str,
) -> String {
    let mut out = String::new();
    out.push_str("## Results\n\n");

    let headers = [
        "Corpus",
        "Files",
        reference_label,
        candidate_label,
        "Speedup",
    ];
    out.push('|');
    for h in headers {
        let _ = write!(out, " {h} |");
    }
    out.push('\n');
    out.push('|');
    for h in headers {
        let _ = write!(out, "{}|", "-".repeat(h.len() + 2));
    }
    out.push('\n');

    for r in results {
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} | **{:.1}x** |",
            r.name,
            r.files,
            mean_stdev(r.reference_mean(), r.reference_stdev()),
            mean_stdev(r.candidate_mean(), r.candidate_stdev()),
            r.speedup(),
        );
    }

    out
}

/// `2.10s ± 0.04s`
fn mean_stdev(mean: f64, stdev: f64) -> String {
    format!("{mean:.2}s \u{b1} {stdev:.2}s")
}

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: String,
    reference_label: &'a str,
    candidate_label: &'a str,
    results: Vec<JsonResult>,
}

#[derive(Serialize)]
struct JsonResult {
    name: String,
    files: usize,
    reference: ToolStats,
    candidate: ToolStats,
    speedup: f64,
}

#[derive(Serialize)]
struct ToolStats {
    mean_s: f64,
    stdev_s: f64,
    times_s: Vec<f64>,
}

pub fn format_json(
    results: &[BenchmarkResult],
    reference_label: &str,
    candidate_label: &str,
    now: DateTime<Utc>,
) -> String {
    let report = JsonReport {
        generated_at: now.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        reference_label,
        candidate_label,
        results: results
            .iter()
            .map(|r| JsonResult {
                name: r.name.clone(),
                files: r.files,
                reference: ToolStats {
                    mean_s: r.reference_mean(),
                    stdev_s: r.reference_stdev(),
                    times_s: r.reference_times.clone(),
                },
                candidate: ToolStats {
                    mean_s: r.candidate_mean(),
                    stdev_s: r.candidate_stdev(),
                    times_s: r.candidate_times.clone(),
                },
                speedup: r.speedup(),
            })
            .collect(),
    };

    serde_json::to_string_pretty(&report).unwrap_or_else(|_| "{}".to_string())
}

/// Render the grouped bar chart and write it to `path`.
pub fn write_chart(
    results: &[BenchmarkResult],
    reference_label: &str,
    candidate_label: &str,
    path: &Path,
) -> Result<()> {
    let svg = render_chart(results, reference_label, candidate_label);
    std::fs::write(path, svg).map_err(|source| BenchError::ReportWrite {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Self-contained SVG: two bars per corpus with stdev error bars, a speedup
/// annotation above each group, gridlines, legend, and axis titles.
pub fn render_chart(
    results: &[BenchmarkResult],
    reference_label: &str,
    candidate_label: &str,
) -> String {
    const MARGIN_LEFT: f64 = 70.0;
    const MARGIN_RIGHT: f64 = 30.0;
    const MARGIN_TOP: f64 = 60.0;
    const MARGIN_BOTTOM: f64 = 70.0;
    const GROUP_WIDTH: f64 = 150.0;
    const BAR_WIDTH: f64 = 40.0;
    const BAR_GAP: f64 = 12.0;
    const HEIGHT: f64 = 480.0;

    let width = MARGIN_LEFT + MARGIN_RIGHT + GROUP_WIDTH * results.len().max(3) as f64;
    let plot_height = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let baseline = HEIGHT - MARGIN_BOTTOM;

    // Scale to the tallest bar-plus-whisker, with headroom for annotations.
    let mut y_max: f64 = 0.0;
    for r in results {
        y_max = y_max
            .max(r.reference_mean() + r.reference_stdev())
            .max(r.candidate_mean() + r.candidate_stdev());
    }
    if y_max <= 0.0 {
        y_max = 1.0;
    }
    y_max *= 1.2;

    let y = |value: f64| baseline - (value / y_max) * plot_height;

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{HEIGHT}" viewBox="0 0 {width} {HEIGHT}" font-family="sans-serif">"#
    );
    let _ = writeln!(
        svg,
        r#"<rect width="{width}" height="{HEIGHT}" fill="white"/>"#
    );

    // Title.
    let _ = writeln!(
        svg,
        r#"<text x="{:.1}" y="28" text-anchor="middle" font-size="18" font-weight="bold">{} vs {} performance</text>"#,
        width / 2.0,
        escape_text(candidate_label),
        escape_text(reference_label),
    );

    // Horizontal gridlines and y tick labels.
    const TICKS: usize = 5;
    for i in 0..=TICKS {
        let value = y_max * i as f64 / TICKS as f64;
        let ty = y(value);
        let _ = writeln!(
            svg,
            r##"<line x1="{MARGIN_LEFT}" y1="{ty:.1}" x2="{:.1}" y2="{ty:.1}" stroke="#dddddd" stroke-width="1"/>"##,
            width - MARGIN_RIGHT
        );
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="end" font-size="12">{value:.2}</text>"#,
            MARGIN_LEFT - 8.0,
            ty + 4.0
        );
    }

    // Axis titles.
    let _ = writeln!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="14">Corpus</text>"#,
        MARGIN_LEFT + (width - MARGIN_LEFT - MARGIN_RIGHT) / 2.0,
        HEIGHT - 14.0
    );
    let _ = writeln!(
        svg,
        r#"<text x="18" y="{:.1}" text-anchor="middle" font-size="14" transform="rotate(-90 18 {:.1})">Time (seconds)</text>"#,
        MARGIN_TOP + plot_height / 2.0,
        MARGIN_TOP + plot_height / 2.0
    );

    for (i, r) in results.iter().enumerate() {
        let group_left = MARGIN_LEFT + GROUP_WIDTH * i as f64;
        let center = group_left + GROUP_WIDTH / 2.0;
        let ref_x = center - BAR_GAP / 2.0 - BAR_WIDTH;
        let cand_x = center + BAR_GAP / 2.0;

        bar(
            &mut svg,
            ref_x,
            BAR_WIDTH,
            r.reference_mean(),
            r.reference_stdev(),
            REFERENCE_COLOR,
            baseline,
            &y,
        );
        bar(
            &mut svg,
            cand_x,
            BAR_WIDTH,
            r.candidate_mean(),
            r.candidate_stdev(),
            CANDIDATE_COLOR,
            baseline,
            &y,
        );

        // Speedup annotation above the taller whisker.
        let top = (r.reference_mean() + r.reference_stdev())
            .max(r.candidate_mean() + r.candidate_stdev());
        let _ = writeln!(
            svg,
            r#"<text x="{center:.1}" y="{:.1}" text-anchor="middle" font-size="12" font-weight="bold">{:.1}x faster</text>"#,
            y(top) - 8.0,
            r.speedup()
        );

        // Corpus name under the group.
        let _ = writeln!(
            svg,
            r#"<text x="{center:.1}" y="{:.1}" text-anchor="middle" font-size="13">{}</text>"#,
            baseline + 20.0,
            escape_text(&r.name)
        );
    }

    // X axis line.
    let _ = writeln!(
        svg,
        r#"<line x1="{MARGIN_LEFT}" y1="{baseline:.1}" x2="{:.1}" y2="{baseline:.1}" stroke="black" stroke-width="1"/>"#,
        width - MARGIN_RIGHT
    );

    // Legend, top right.
    let legend_x = width - MARGIN_RIGHT - 170.0;
    for (j, (label, color)) in [
        (reference_label, REFERENCE_COLOR),
        (candidate_label, CANDIDATE_COLOR),
    ]
    .into_iter()
    .enumerate()
    {
        let ly = MARGIN_TOP + j as f64 * 20.0 - 14.0;
        let _ = writeln!(
            svg,
            r#"<rect x="{legend_x:.1}" y="{ly:.1}" width="14" height="14" fill="{color}"/>"#
        );
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" font-size="13">{}</text>"#,
            legend_x + 20.0,
            ly + 12.0,
            escape_text(label)
        );
    }

    svg.push_str("</svg>\n");
    svg
}

#[allow(clippy::too_many_arguments)]
fn bar(
    svg: &mut String,
    x: f64,
    width: f64,
    mean: f64,
    stdev: f64,
    color: &str,
    baseline: f64,
    y: &impl Fn(f64) -> f64,
) {
    let top = y(mean);
    let _ = writeln!(
        svg,
        r#"<rect x="{x:.1}" y="{top:.1}" width="{width}" height="{:.1}" fill="{color}"/>"#,
        baseline - top
    );

    if stdev > 0.0 {
        let center = x + width / 2.0;
        let hi = y(mean + stdev);
        let lo = y((mean - stdev).max(0.0));
        let _ = writeln!(
            svg,
            r#"<line x1="{center:.1}" y1="{hi:.1}" x2="{center:.1}" y2="{lo:.1}" stroke="black" stroke-width="1.5"/>"#
        );
        for cap_y in [hi, lo] {
            let _ = writeln!(
                svg,
                r#"<line x1="{:.1}" y1="{cap_y:.1}" x2="{:.1}" y2="{cap_y:.1}" stroke="black" stroke-width="1.5"/>"#,
                center - 6.0,
                center + 6.0
            );
        }
    }
}

fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_result() -> BenchmarkResult {
        BenchmarkResult {
            name: "Sample".to_string(),
            files: 420,
            reference_times: vec![2.10, 2.05, 2.15],
            candidate_times: vec![0.40, 0.42, 0.38],
        }
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap()
    }

    #[test]
    fn table_formats_mean_stdev_and_speedup() {
        let out = format_table(&[sample_result()], "Checkstyle", "mylint");

        assert!(out.contains("| Corpus | Files | Checkstyle | mylint | Speedup |"));
        assert!(
            out.contains("| Sample | 420 | 2.10s \u{b1} 0.05s | 0.40s \u{b1} 0.02s | **5.2x** |"),
            "unexpected table:\n{out}"
        );
    }

    #[test]
    fn table_preserves_benchmark_order() {
        let mut zeta = sample_result();
        zeta.name = "Zeta".to_string();
        let mut alpha = sample_result();
        alpha.name = "Alpha".to_string();

        let out = format_table(&[zeta, alpha], "ref", "cand");
        let zeta_at = out.find("| Zeta |").unwrap();
        let alpha_at = out.find("| Alpha |").unwrap();
        assert!(zeta_at < alpha_at, "rows must not be re-sorted");
    }

    #[test]
    fn json_report_carries_raw_samples_and_derived_stats() {
        let out = format_json(&[sample_result()], "Checkstyle", "mylint", fixed_now());
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert_eq!(parsed["generated_at"], "2026-03-14T09:26:53Z");
        assert_eq!(parsed["reference_label"], "Checkstyle");
        assert_eq!(parsed["candidate_label"], "mylint");

        let result = &parsed["results"][0];
        assert_eq!(result["name"], "Sample");
        assert_eq!(result["files"], 420);
        assert_eq!(result["reference"]["times_s"].as_array().unwrap().len(), 3);
        let speedup = result["speedup"].as_f64().unwrap();
        assert!((speedup - 5.25).abs() < 1e-9);
    }

    #[test]
    fn chart_has_two_bars_per_corpus_with_error_bars() {
        let svg = render_chart(&[sample_result()], "Checkstyle", "mylint");

        assert!(svg.starts_with("<svg"));
        assert_eq!(svg.matches(REFERENCE_COLOR).count(), 2); // bar + legend swatch
        assert_eq!(svg.matches(CANDIDATE_COLOR).count(), 2);
        assert!(svg.contains("5.2x faster"));
        assert!(svg.contains(">Sample</text>"));
        assert!(svg.contains("Time (seconds)"));
        // Whisker plus two caps per bar.
        assert!(svg.matches(r#"stroke="black" stroke-width="1.5""#).count() >= 6);
    }

    #[test]
    fn chart_with_zero_stdev_omits_error_bars() {
        let result = BenchmarkResult {
            name: "Flat".to_string(),
            files: 1,
            reference_times: vec![1.0],
            candidate_times: vec![0.5],
        };
        let svg = render_chart(&[result], "ref", "cand");
        assert!(!svg.contains(r#"stroke-width="1.5""#));
    }

    #[test]
    fn chart_groups_follow_benchmark_order() {
        let mut first = sample_result();
        first.name = "Second-alphabetically".to_string();
        let mut second = sample_result();
        second.name = "First-alphabetically".to_string();

        let svg = render_chart(&[first, second], "ref", "cand");
        let a = svg.find("Second-alphabetically").unwrap();
        let b = svg.find("First-alphabetically").unwrap();
        assert!(a < b);
    }

    #[test]
    fn chart_labels_are_escaped() {
        let mut r = sample_result();
        r.name = "A<B&C".to_string();
        let svg = render_chart(&[r], "ref", "cand");
        assert!(svg.contains("A&lt;B&amp;C"));
        assert!(!svg.contains("A<B"));
    }

    #[test]
    fn write_chart_creates_the_file() {
        let tmp = assert_fs::TempDir::new().unwrap();
        let path = tmp.path().join("benchmark_results.svg");
        write_chart(&[sample_result()], "ref", "cand", &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("</svg>"));
    }

    #[test]
    fn write_chart_failure_is_reported() {
        let err = write_chart(
            &[sample_result()],
            "ref",
            "cand",
            Path::new("/nonexistent/dir/chart.svg"),
        )
        .unwrap_err();
        assert!(err.to_string().contains("Failed to write report"));
    }
}
