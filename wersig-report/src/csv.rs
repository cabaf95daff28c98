//! CSV Output

use crate::report::Report;

/// Column names of the CSV report
pub const CSV_HEADER: &str = "inputs,items,blocks,error_rate_a,error_rate_b,absolute_difference,\
point_estimate,ci_low,ci_high,confidence_level,std_err,method,sampling,total_batch,\
samples_per_batch,seed,significant,verdict";

/// Generate a header plus one data row
pub fn generate_csv_report(report: &Report) -> String {
    let optional = |v: Option<f64>| v.map(|x| x.to_string()).unwrap_or_default();
    let r = &report.result;
    let c = &report.corpus;

    let row = [
        escape(&report.meta.inputs.join(";")),
        c.items.to_string(),
        c.blocks.to_string(),
        optional(c.error_rate_a),
        optional(c.error_rate_b),
        optional(r.absolute_difference),
        r.point_estimate.to_string(),
        r.ci_low.to_string(),
        r.ci_high.to_string(),
        r.confidence_level.to_string(),
        r.std_err.to_string(),
        r.method.clone(),
        r.sampling.clone(),
        r.total_batch.to_string(),
        r.samples_per_batch.to_string(),
        report.meta.seed.to_string(),
        r.significant.to_string(),
        r.verdict.clone(),
    ];

    format!("{}\n{}\n", CSV_HEADER, row.join(","))
}

/// Quote a field if it contains a delimiter, quote or newline
fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
