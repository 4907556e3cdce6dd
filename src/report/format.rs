//! Terminal formatting for validity reports and synthesizer runs.
//!
//! Formatting lives here so the constraint code stays free of presentation.

use crate::domain::Dataset;
use crate::report::ValidityReport;
use crate::synth::FitSummary;

/// Format a validity report, listing up to `max_examples` offending rows per constraint.
pub fn format_validity_report(report: &ValidityReport, data: &Dataset, max_examples: usize) -> String {
    let mut out = String::new();

    out.push_str("=== synthc - constraint check ===\n");
    out.push_str(&format!(
        "Rows: {} | valid: {} | invalid: {}\n",
        report.rows,
        report.combined.valid_count(),
        report.invalid_rows(),
    ));

    if report.outcomes.is_empty() {
        out.push_str("No constraints registered.\n");
        return out;
    }

    out.push('\n');
    out.push_str(
        format!("{:<4} {:<32} {:<28} {:>10}", "#", "constraint", "columns", "invalid").trim_end(),
    );
    out.push('\n');
    out.push_str(format!("{:-<4} {:-<32} {:-<28} {:-<10}", "", "", "", "").trim_end());
    out.push('\n');

    for (idx, outcome) in report.outcomes.iter().enumerate() {
        out.push_str(
            format!(
                "{:<4} {:<32} {:<28} {:>10}",
                idx + 1,
                outcome.constraint,
                truncate(&outcome.columns.join(","), 28),
                outcome.invalid_count(),
            )
            .trim_end(),
        );
        out.push('\n');
    }

    if max_examples == 0 {
        return out;
    }

    for (idx, outcome) in report.outcomes.iter().enumerate() {
        if outcome.invalid_count() == 0 {
            continue;
        }
        out.push_str(&format!("\n#{} {} violations:\n", idx + 1, outcome.constraint));
        for row in outcome.mask.invalid_rows().take(max_examples) {
            out.push_str(&format!("  row {row}: {}\n", fmt_row(data, row, &outcome.columns)));
        }
        let hidden = outcome.invalid_count().saturating_sub(max_examples);
        if hidden > 0 {
            out.push_str(&format!("  ... {hidden} more\n"));
        }
    }

    out
}

/// Format the outcome of fitting a constrained synthesizer.
pub fn format_fit_summary(summary: &FitSummary) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Training rows: seen={} | used={} | invalid={}\n",
        summary.rows_seen,
        summary.rows_used,
        summary.report.invalid_rows(),
    ));
    for outcome in &summary.report.outcomes {
        out.push_str(&format!(
            "- {} [{}]: {} invalid\n",
            outcome.constraint,
            outcome.columns.join(", "),
            outcome.invalid_count(),
        ));
    }
    out
}

/// Format a before/after comparison of a repair pass.
pub fn format_repair_summary(before: &ValidityReport, after: &ValidityReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Repaired rows: {} -> {} invalid (of {})\n",
        before.invalid_rows(),
        after.invalid_rows(),
        after.rows,
    ));
    out
}

fn fmt_row(data: &Dataset, row: usize, columns: &[String]) -> String {
    let parts: Vec<String> = columns
        .iter()
        .map(|name| {
            let value = data
                .column_index(name)
                .ok()
                .and_then(|idx| data.value(row, idx))
                .map(ToString::to_string)
                .unwrap_or_else(|| "?".to_string());
            format!("{name}={value}")
        })
        .collect();
    format!("{{{}}}", parts.join(", "))
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
