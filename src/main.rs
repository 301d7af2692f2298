//! ChurnLens: retention and revenue analysis over a customer CSV export
//!
//! This is the main entrypoint that orchestrates cleaning, the four
//! analyses, the textual summary, and chart rendering.

use anyhow::Result;
use churnlens::{cohort, delinquency, load_customers, retention, revenue, viz, Args};
use clap::Parser;
use std::path::Path;
use std::time::Instant;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse();

    if args.verbose {
        println!("ChurnLens - Customer Retention & Revenue Analysis");
        println!("=================================================\n");
    }

    run_pipeline(&args)
}

/// Run the full analysis pipeline
fn run_pipeline(args: &Args) -> Result<()> {
    let start_time = Instant::now();
    let as_of = args.as_of_date()?;
    let cutoff = args.cutoff_date()?;

    // Step 1: Load and clean the export
    if args.verbose {
        println!("Step 1: Loading and cleaning data");
        println!("  Input file: {}", args.input);
    }

    let load_start = Instant::now();
    let customers = load_customers(&args.input)?;
    let load_time = load_start.elapsed();

    println!("✓ Data cleaned: {} customers retained", customers.len());
    if args.verbose {
        println!("  Cleaning time: {:.2}s", load_time.as_secs_f64());
        println!("  Reference date: {}", as_of.date());
        println!("  Cohort cutoff: {}", cutoff.date());
    }

    // Step 2: Run the four analyses. Each reads the cleaned slice
    // independently; none sees another's derived state.
    if args.verbose {
        println!("\nStep 2: Running analyses");
    }

    let analysis_start = Instant::now();
    let retention_tables = retention::analyze(&customers, as_of);
    let expansion = revenue::analyze(&customers, as_of);
    let cohort_matrix = cohort::analyze(&customers, as_of, cutoff);
    let delinquency_rows = delinquency::analyze(&customers, as_of);
    let analysis_time = analysis_start.elapsed();

    println!("✓ Analyses complete");
    if args.verbose {
        println!("  Analysis time: {:.2}s", analysis_time.as_secs_f64());
        println!(
            "  Geography groups: {} continents, {} countries, {} providers",
            retention_tables.by_continent.len(),
            retention_tables.by_country.len(),
            retention_tables.by_provider.len()
        );
        println!(
            "  Cohorts: {} ({} active months observed)",
            cohort_matrix.cohorts.len(),
            cohort_matrix.active.len()
        );
    }

    // Step 3: Textual summary
    viz::print_provider_ranking(&retention_tables.by_provider);
    println!(
        "\nRevenue expansion: {:.1}% of {} customers",
        expansion.expansion_rate,
        expansion.rows.len()
    );

    // Step 4: Chart artifacts
    if !args.no_charts {
        if args.verbose {
            println!("\nStep 3: Rendering charts");
            println!("  Output directory: {}", args.out_dir);
        }

        let out_dir = Path::new(&args.out_dir);
        std::fs::create_dir_all(out_dir)?;

        let viz_start = Instant::now();
        viz::generate_chart_report(
            &retention_tables,
            &expansion,
            &cohort_matrix,
            &delinquency_rows,
            out_dir,
        )?;
        let viz_time = viz_start.elapsed();

        if args.verbose {
            println!("  Rendering time: {:.2}s", viz_time.as_secs_f64());
        }
    }

    let total_time = start_time.elapsed();
    println!("\n=== Pipeline Complete ===");
    println!("Total processing time: {:.2}s", total_time.as_secs_f64());

    Ok(())
}
