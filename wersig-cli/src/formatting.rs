//! Output Formatting
//!
//! Human-readable terminal rendition of a significance report.

use wersig_report::Report;

/// Format a report for human-readable terminal display
pub fn format_human_output(report: &Report) -> String {
    let mut output = String::new();
    let corpus = &report.corpus;
    let result = &report.result;

    output.push('\n');
    output.push_str("WerSig Results\n");
    output.push_str(&"=".repeat(60));
    output.push_str("\n\n");

    output.push_str("Corpus\n");
    output.push_str(&"-".repeat(60));
    output.push('\n');
    output.push_str(&format!(
        "  items: {}  blocks: {}  reference words: {}\n",
        corpus.items, corpus.blocks, corpus.reference_count
    ));
    output.push_str(&format!(
        "  model A: {} errors ({})\n",
        corpus.errors_a,
        format_rate(corpus.error_rate_a)
    ));
    output.push_str(&format!(
        "  model B: {} errors ({})\n\n",
        corpus.errors_b,
        format_rate(corpus.error_rate_b)
    ));

    output.push_str("Error-rate change (B - A)\n");
    output.push_str(&"-".repeat(60));
    output.push('\n');
    if let Some(absolute) = result.absolute_difference {
        output.push_str(&format!("  absolute: {:+.4}%\n", absolute * 100.0));
    }
    output.push_str(&format!(
        "  bootstrap mean: {:+.4}%  std err: {:.4}%\n",
        result.point_estimate * 100.0,
        result.std_err * 100.0
    ));
    output.push_str(&format!(
        "  {:.0}% CI: [{:+.4}%, {:+.4}%] ({})\n",
        result.confidence_level * 100.0,
        result.ci_low * 100.0,
        result.ci_high * 100.0,
        result.method
    ));
    output.push_str(&format!(
        "  {} batches x {} items, {} sampling, seed {}\n\n",
        result.total_batch, result.samples_per_batch, result.sampling, report.meta.seed
    ));

    let (icon, message) = if result.significant {
        ("✓", "model B is significantly better than model A")
    } else if result.verdict == "regression" {
        ("✗", "model B is significantly worse than model A")
    } else {
        ("~", "no significant difference")
    };
    output.push_str(&format!("{} {}\n", icon, message));

    output
}

fn format_rate(rate: Option<f64>) -> String {
    rate.map(|r| format!("{:.2}%", r * 100.0))
        .unwrap_or_else(|| "n/a".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wersig_report::{CorpusReport, ReportConfig, ReportMeta, ReportSchema, SignificanceReport};

    fn report(ci_low: f64, ci_high: f64, verdict: &str) -> Report {
        Report {
            meta: ReportMeta {
                schema: ReportSchema::default(),
                version: "0.1.0".to_string(),
                timestamp: chrono::Utc::now(),
                inputs: vec!["wer.txt".to_string()],
                seed: 42,
                config: ReportConfig {
                    total_batch: 1000,
                    samples_per_batch: 3,
                    confidence_level: 0.95,
                    method: "percentile".to_string(),
                    sampling: "pooled".to_string(),
                    parallel: true,
                },
            },
            corpus: CorpusReport {
                items: 3,
                blocks: 1,
                reference_count: 300,
                errors_a: 30,
                errors_b: 17,
                error_rate_a: Some(0.1),
                error_rate_b: Some(17.0 / 300.0),
            },
            result: SignificanceReport {
                point_estimate: -0.0433,
                absolute_difference: Some(-13.0 / 300.0),
                ci_low,
                ci_high,
                confidence_level: 0.95,
                std_err: 0.019,
                method: "percentile".to_string(),
                sampling: "pooled".to_string(),
                total_batch: 1000,
                samples_per_batch: 3,
                significant: ci_low < 0.0 && ci_high < 0.0,
                verdict: verdict.to_string(),
            },
        }
    }

    #[test]
    fn test_significant_output() {
        let output = format_human_output(&report(-0.08, -0.01, "improvement"));
        assert!(output.contains("WerSig Results"));
        assert!(output.contains("model A: 30 errors (10.00%)"));
        assert!(output.contains("95% CI: [-8.0000%, -1.0000%] (percentile)"));
        assert!(output.contains("absolute: -4.3333%"));
        assert!(output.contains("seed 42"));
        assert!(output.contains("✓ model B is significantly better"));
    }

    #[test]
    fn test_inconclusive_output() {
        let output = format_human_output(&report(-0.08, 0.0, "inconclusive"));
        assert!(output.contains("~ no significant difference"));
    }

    #[test]
    fn test_regression_output() {
        let output = format_human_output(&report(0.01, 0.05, "regression"));
        assert!(output.contains("✗ model B is significantly worse"));
    }

    #[test]
    fn test_missing_rate() {
        assert_eq!(format_rate(None), "n/a");
        assert_eq!(format_rate(Some(0.125)), "12.50%");
    }
}
