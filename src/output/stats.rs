//! Statistics reporting.

use console::style;

use crate::download::{CollectionState, RunReport};

/// Print statistics for a single collection.
pub fn print_collection_stats(state: &CollectionState) {
    println!();
    println!(
        "{}",
        style(format!("Statistics for {}:", state.collection_name)).bold()
    );
    println!("  Pages:       {}", state.pages_fetched);
    println!("  Posts:       {}", state.posts_seen);
    println!(
        "  Files:       {} downloaded, {} cached",
        state.files_downloaded, state.cache_hits
    );
    println!(
        "  Links:       {} created, {} existing",
        state.links_created, state.links_existing
    );

    let failures = state.item_failures();
    if failures > 0 {
        println!(
            "  Skipped:     {} ({} unresolvable, {} download, {} link)",
            style(failures).yellow(),
            state.unresolvable,
            state.download_failures,
            state.link_failures
        );
    }
    if state.metadata_failures > 0 {
        println!(
            "  Metadata:    {} sidecars not written",
            style(state.metadata_failures).yellow()
        );
    }
}

/// Print the summary of a whole run.
pub fn print_run_summary(report: &RunReport) {
    println!();
    println!("{}", style("═".repeat(50)).dim());
    println!("{}", style("Run Summary:").bold());
    println!("  Collections synced: {}", report.synced.len());
    if !report.failed.is_empty() {
        println!(
            "  Collections failed: {}",
            style(report.failed.len()).red()
        );
        for failure in &report.failed {
            println!(
                "    {}: {}",
                failure.collection_name,
                style(&failure.error).red()
            );
        }
    }
    if !report.unmatched.is_empty() {
        println!(
            "  Not found:          {}",
            style(report.unmatched.join(", ")).yellow()
        );
    }
    println!("  Files downloaded:   {}", report.files_downloaded());
    println!("  Links created:      {}", report.links_created());
    if report.item_failures() > 0 {
        println!(
            "  Items skipped:      {}",
            style(report.item_failures()).yellow()
        );
    }
    println!("{}", style("═".repeat(50)).dim());
}
