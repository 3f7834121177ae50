//! `airdash inspect`: summarize a recorded log.

use airdash_core::{LogSummary, read_log, summarize};

/// Run the inspect command.
pub fn run(path: &str, output: Option<&str>) {
    let records = match read_log(path) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Failed to read {path}: {e}");
            std::process::exit(1);
        }
    };

    let summary = summarize(&records);
    print_summary(path, &summary);

    if let Some(out) = output {
        super::write_json(&summary, out, "Summary");
    }
}

fn print_summary(path: &str, summary: &LogSummary) {
    println!("{path}");
    println!("  Rows:  {}", summary.rows);
    match (&summary.first_timestamp, &summary.last_timestamp) {
        (Some(first), Some(last)) => println!("  Span:  {first} .. {last} UTC"),
        _ => {
            println!("  Span:  (empty log)");
            return;
        }
    }
    println!();
    println!(
        "  {:<24} {:>6} {:>10} {:>10} {:>10} {:>10}",
        "Column", "Count", "Min", "Mean", "Max", "Last"
    );
    println!("  {}", "-".repeat(75));
    for col in &summary.columns {
        println!(
            "  {:<24} {:>6} {:>10} {:>10} {:>10} {:>10}",
            col.column,
            col.count,
            format_stat(col.min),
            format_stat(col.mean),
            format_stat(col.max),
            format_stat(col.last),
        );
    }
}

fn format_stat(v: Option<f64>) -> String {
    v.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}
