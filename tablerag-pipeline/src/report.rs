//! Render an execution result as a GitHub-style markdown table, the form
//! appended to the conversation log and fed to the explainer.

use tablerag_core::models::ExecutionResult;

/// Column-aligned markdown table. The failure sentinel renders empty.
pub fn render_table(result: &ExecutionResult) -> String {
    if result.columns.is_empty() {
        return String::new();
    }

    let mut widths: Vec<usize> = result.columns.iter().map(String::len).collect();
    for row in &result.rows {
        for (idx, value) in row.iter().enumerate() {
            if idx < widths.len() {
                widths[idx] = widths[idx].max(value.len());
            }
        }
    }

    let mut out = String::new();
    render_row(&mut out, &result.columns, &widths);
    out.push_str("|");
    for width in &widths {
        out.push_str(&format!("{}|", "-".repeat(width + 2)));
    }
    out.push('\n');
    for row in &result.rows {
        render_row(&mut out, row, &widths);
    }
    out
}

fn render_row(out: &mut String, values: &[String], widths: &[usize]) {
    out.push('|');
    for (idx, width) in widths.iter().enumerate() {
        let value = values.get(idx).map(String::as_str).unwrap_or("");
        out.push_str(&format!(" {value:<width$} |"));
    }
    out.push('\n');
}
