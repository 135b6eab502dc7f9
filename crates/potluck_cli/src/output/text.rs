//! Text output formatter

use potluck_core::BuildReport;

pub fn output_text(report: &BuildReport) {
    println!("{}", summary(report));
}

fn summary(report: &BuildReport) -> String {
    format!(
        "{} recipes: {} new, {} modified, {} cached, {} regenerated\n\
         done: generated {} pages ({} recipes, {} tags, {} index) in {:.1} milliseconds\n\
         cache: {} entries",
        report.items,
        report.new,
        report.modified,
        report.hits,
        report.stale_misses,
        report.pages_written(),
        report.recipe_pages,
        report.tags,
        report.index_pages,
        report.elapsed_ms,
        report.cache_entries,
    )
}
