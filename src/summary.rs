use crate::pipeline::RunOutcome;
pub fn print_summary(outcome: &RunOutcome) {
    let report = &outcome.report;
    println!("\n==== Run summary ====");
    match outcome.input {
        Some(ref path) => println!("- Input: {} ({} rows)", path.display(), outcome.local_rows),
        None => println!("- Input: (none)"),
    }
    println!("- External rows: {}", outcome.external_rows);
    println!("- Duplicates removed: {}", report.duplicates_removed);
    println!("- Empty cells filled: {}", report.cells_filled);
    if !report.columns_added.is_empty() {
        println!("- Columns added: {}", report.columns_added.join(", "));
    }
    println!("- Rows written: {}", report.output_rows);
    println!("=====================\n");
    println!("Output written: {}", outcome.output.display());
}
