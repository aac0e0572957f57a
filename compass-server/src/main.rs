use std::env;
use std::process;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use serde::Serialize;

use compass_core::registry::CountryRegistry;
use compass_pipeline::analysis::{run_analysis, AnalysisOutcome};
use compass_pipeline::observation_loader::load_observations_file;
use compass_pipeline::projector::ProjectedRow;
use compass_pipeline::types::AnalysisFilters;

// ---------------------------------------------------------------------------
// JSON output contract
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct BenchmarkJson<'a> {
    generated_at: String,
    focus_country: String,
    analysis_ms: u128,
    rows: &'a [ProjectedRow],
    warnings: Vec<String>,
    summary: Vec<SummaryGroupJson>,
    totals: TotalsJson,
}

/// One (cheapest country, segment) bucket of the downstream summary.
#[derive(Serialize)]
struct SummaryGroupJson {
    cheapest_country: String,
    min_cost_segment: String,
    items: usize,
    total_opportunity: f64,
    average_opportunity: f64,
    max_opportunity: f64,
}

#[derive(Serialize)]
struct TotalsJson {
    observations_loaded: usize,
    rows_reported: usize,
    total_opportunity: f64,
    warnings: usize,
}

/// Group rows by (cheapest_country, min_cost_segment) with count, sum,
/// average, and max of the opportunity amount.
fn summarize(rows: &[ProjectedRow]) -> Vec<SummaryGroupJson> {
    use std::collections::BTreeMap;

    let mut buckets: BTreeMap<(String, String), Vec<f64>> = BTreeMap::new();
    for row in rows {
        buckets
            .entry((row.cheapest_country.clone(), row.min_cost_segment.clone()))
            .or_default()
            .push(row.cost_opportunity_amount);
    }

    buckets
        .into_iter()
        .map(|((cheapest_country, min_cost_segment), amounts)| {
            let total: f64 = amounts.iter().sum();
            let max = amounts.iter().cloned().fold(0.0_f64, f64::max);
            SummaryGroupJson {
                cheapest_country,
                min_cost_segment,
                items: amounts.len(),
                total_opportunity: total,
                average_opportunity: total / amounts.len() as f64,
                max_opportunity: max,
            }
        })
        .collect()
}

fn build_json<'a>(
    outcome: &'a AnalysisOutcome,
    rows: &'a [ProjectedRow],
    focus: &str,
    observations_loaded: usize,
    analysis_ms: u128,
) -> BenchmarkJson<'a> {
    let total_opportunity: f64 = rows.iter().map(|r| r.cost_opportunity_amount).sum();
    BenchmarkJson {
        generated_at: Utc::now().to_rfc3339(),
        focus_country: focus.to_string(),
        analysis_ms,
        rows,
        warnings: outcome.warnings.iter().map(|w| w.to_string()).collect(),
        summary: summarize(rows),
        totals: TotalsJson {
            observations_loaded,
            rows_reported: rows.len(),
            total_opportunity,
            warnings: outcome.warnings.len(),
        },
    }
}

// ---------------------------------------------------------------------------
// Human-readable output
// ---------------------------------------------------------------------------

/// Format a number with comma thousands separators.
fn format_amount(amount: f64) -> String {
    let whole = amount.abs().round() as u64;
    let sign = if amount < 0.0 { "-" } else { "" };

    let digits = whole.to_string();
    if whole < 1_000 {
        return format!("{}{}", sign, digits);
    }

    let mut grouped = String::new();
    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{}{}", sign, grouped.chars().rev().collect::<String>())
}

fn print_human(
    outcome: &AnalysisOutcome,
    rows: &[ProjectedRow],
    focus: &str,
    observations_loaded: usize,
    load_ms: u128,
    analysis_ms: u128,
) {
    println!();
    println!("  \u{2554}{}\u{2557}", "\u{2550}".repeat(62));
    println!("  \u{2551}          PRICE COMPASS \u{2014} Country Cost Benchmark           \u{2551}");
    println!("  \u{255a}{}\u{255d}", "\u{2550}".repeat(62));
    println!();

    let total_opportunity: f64 = rows.iter().map(|r| r.cost_opportunity_amount).sum();
    println!(
        "  focus {}  \u{00b7}  {} observations loaded  \u{00b7}  {} rows reported",
        focus,
        observations_loaded,
        rows.len()
    );
    println!(
        "  ${} total opportunity  \u{00b7}  {} data-quality warnings",
        format_amount(total_opportunity),
        outcome.warnings.len()
    );
    println!();

    if rows.is_empty() {
        println!("  No comparable items for this focus country.");
    } else {
        println!("  {:\u{2500}<72}", "");
        for (i, row) in rows.iter().enumerate() {
            println!(
                "  {:>3}. {:16} {:24} {:>12}  vs {} ({})",
                i + 1,
                row.item_barcode,
                row.department,
                format!("${}", format_amount(row.cost_opportunity_amount)),
                row.cheapest_country,
                row.min_cost_segment,
            );
            println!(
                "       cost {:.2} \u{00b7} qty {:.0} \u{00b7} cheapest at {}",
                row.focus_cost,
                row.focus_sales_qty,
                row.min_cost_other_countries
                    .map(|m| format!("{:.2}", m))
                    .unwrap_or_else(|| "n/a".into()),
            );
        }
        println!("  {:\u{2500}<72}", "");

        println!();
        println!("  By cheapest country and segment:");
        for group in summarize(rows) {
            println!(
                "    {:10} {:22} {:>4} items  \u{00b7}  ${} total  \u{00b7}  ${} avg",
                group.cheapest_country,
                group.min_cost_segment,
                group.items,
                format_amount(group.total_opportunity),
                format_amount(group.average_opportunity),
            );
        }
    }

    if !outcome.warnings.is_empty() {
        println!();
        println!("  Warnings:");
        for warning in &outcome.warnings {
            println!("    - {}", warning);
        }
    }

    println!();
    println!(
        "  \u{23f1}  CSV loaded in {}ms \u{00b7} Analysis ran in {}ms \u{00b7} Total {}ms",
        load_ms,
        analysis_ms,
        load_ms + analysis_ms
    );
    println!();
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn usage() -> ! {
    eprintln!("Usage: compass-server <observations.csv> --focus CODE [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --focus             Focus country code (required), e.g. KSA");
    eprintln!("  --min-opportunity   Drop rows below this opportunity amount");
    eprintln!("  --departments       Comma-separated department scope");
    eprintln!("  --top               Show only the top N rows");
    eprintln!("  --json              Output as JSON instead of formatted text");
    eprintln!();
    eprintln!("Example:");
    eprintln!("  compass-server fixtures/sample_snapshot.csv --focus KSA");
    eprintln!("  compass-server fixtures/sample_snapshot.csv --focus UAE --top 10 --json");
    process::exit(1);
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        usage();
    }

    let csv_path = &args[1];

    let mut focus: Option<String> = None;
    let mut min_opportunity: Option<f64> = None;
    let mut departments: Option<Vec<String>> = None;
    let mut top: Option<usize> = None;
    let mut json_output = false;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--focus" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --focus requires a country code");
                    process::exit(1);
                }
                focus = Some(args[i + 1].trim().to_uppercase());
                i += 2;
            }
            "--min-opportunity" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --min-opportunity requires an amount");
                    process::exit(1);
                }
                min_opportunity = Some(args[i + 1].parse().unwrap_or_else(|_| {
                    eprintln!("Error: --min-opportunity requires a number");
                    process::exit(1);
                }));
                i += 2;
            }
            "--departments" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --departments requires a comma-separated list");
                    process::exit(1);
                }
                departments = Some(
                    args[i + 1]
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .collect(),
                );
                i += 2;
            }
            "--top" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --top requires a number");
                    process::exit(1);
                }
                top = Some(args[i + 1].parse().unwrap_or_else(|_| {
                    eprintln!("Error: --top requires a positive integer");
                    process::exit(1);
                }));
                i += 2;
            }
            "--json" => {
                json_output = true;
                i += 1;
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                process::exit(1);
            }
        }
    }

    let Some(focus) = focus else {
        eprintln!("Error: --focus is required");
        usage();
    };

    // Load the observation snapshot
    let load_start = Instant::now();
    let observations = match load_observations_file(csv_path) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("Error loading CSV: {}", e);
            process::exit(1);
        }
    };
    let load_ms = load_start.elapsed().as_millis();
    let observations_loaded = observations.len();

    let filters = if min_opportunity.is_some() || departments.is_some() {
        Some(AnalysisFilters {
            min_opportunity,
            departments,
        })
    } else {
        None
    };

    let registry = Arc::new(CountryRegistry::builtin());
    let analysis_start = Instant::now();
    let outcome = match run_analysis(&observations, &focus, registry, filters).await {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("Analysis failed: {}", e);
            process::exit(2);
        }
    };
    let analysis_ms = analysis_start.elapsed().as_millis();

    // Rows are already ordered by opportunity; --top is a display cap.
    let rows: &[ProjectedRow] = match top {
        Some(n) => &outcome.rows[..n.min(outcome.rows.len())],
        None => &outcome.rows,
    };

    if json_output {
        let report = build_json(&outcome, rows, &focus, observations_loaded, analysis_ms);
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing report: {}", e);
                process::exit(2);
            }
        }
    } else {
        print_human(&outcome, rows, &focus, observations_loaded, load_ms, analysis_ms);
    }
}
