// Inspect a light dataset file offline
//
// Usage: cargo run --bin inspect_dataset -- <light-weight-data-set.json.gz> [query]

use anyhow::Context;
use plant_catalog::loader::parse_light_dataset;
use plant_catalog::{Catalog, Facet};

const SAMPLE_ROWS: usize = 10;

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let path = args
        .next()
        .context("usage: inspect_dataset <light-weight-data-set.json.gz> [query]")?;
    let query = args.next();

    let bytes = std::fs::read(&path).with_context(|| format!("reading {}", path))?;
    let dataset = parse_light_dataset(&path, &bytes)?;
    let catalog = Catalog::build(dataset)?;

    println!("\n=== DATASET {} ===\n", path);
    let stats = catalog.index().stats();
    println!("Plants:        {}", stats.plant_count);
    println!("Index terms:   {}", stats.term_count);
    println!("FST size:      {} bytes", stats.fst_bytes);

    let with_problems = catalog
        .dataset()
        .entries()
        .iter()
        .filter(|e| e.record.has_problems())
        .count();
    println!("With problems: {}", with_problems);

    let universe = catalog.universe();
    for facet in Facet::ALL {
        let values = universe.values(facet);
        println!("\n{} ({}):", facet.label(), values.len());
        println!("  {}", values.join(", "));
    }
    println!("\nProblems ({})", universe.problems.len());

    let view = match &query {
        Some(q) => catalog.initial_view().with_search(q.as_str()),
        None => catalog.initial_view(),
    };
    let page = catalog.render(&view);

    println!("\n=== {} matching plants (query: {:?}) ===\n", page.total, query);
    for row in page.rows.iter().take(SAMPLE_ROWS) {
        println!(
            "{:<40} {:<30} zones {:<10} {}",
            row.key,
            row.title,
            row.zone_range.as_deref().unwrap_or("-"),
            row.plant_types.join("/")
        );
    }
    if page.total > SAMPLE_ROWS {
        println!("... {} more", page.total - SAMPLE_ROWS);
    }

    Ok(())
}
