use anyhow::{bail, Result};
use chrono::{SecondsFormat, Utc};
use clap::{Parser, Subcommand};
use colored::*;
use kitting_core::{
    esg, has_errors, validate_elements, BoqElement, EsgImpact, KitOptimizer, KitPlan,
};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Instant;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "kitting")]
#[command(about = "Formwork Kitting Optimizer - Group BoQ elements into reusable kit sets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the kitting optimization on a bill of quantities
    Optimize {
        /// Input BoQ file (YAML or JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for the kit plan (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render the ESG impact report for a saved kit plan
    Report {
        /// Input kit plan file (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Output text file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Accepts `{ "items": [...] }` or a bare element array.
#[derive(Deserialize)]
#[serde(untagged)]
enum BoqInput {
    Wrapped { items: Vec<BoqElement> },
    Bare(Vec<BoqElement>),
}

impl BoqInput {
    fn into_items(self) -> Vec<BoqElement> {
        match self {
            BoqInput::Wrapped { items } => items,
            BoqInput::Bare(items) => items,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Optimize { input, output } => {
            optimize_command(input, output)?;
        }
        Commands::Report { input, output } => {
            report_command(input, output)?;
        }
    }

    Ok(())
}

fn optimize_command(input: PathBuf, output: Option<PathBuf>) -> Result<()> {
    println!("{}", "🔍 Loading BoQ...".bright_blue());

    // Read input file
    let content = std::fs::read_to_string(&input)?;
    let parsed: BoqInput = if input.extension().and_then(|s| s.to_str()) == Some("yaml")
        || input.extension().and_then(|s| s.to_str()) == Some("yml")
    {
        serde_yaml::from_str(&content)?
    } else {
        serde_json::from_str(&content)?
    };
    let items = parsed.into_items();

    let total_units: u64 = items.iter().map(|i| u64::from(i.quantity)).sum();
    println!(
        "  {} BoQ elements · {} physical units",
        items.len().to_string().bright_white().bold(),
        total_units.to_string().bright_white().bold()
    );
    println!();

    // Validate every row before anything reaches the optimizer
    let report = validate_elements(&items);
    if has_errors(&report) {
        println!("{}", "⚠ Validation failed:".bright_red().bold());
        for (row, errors) in report.iter().enumerate() {
            for (field, message) in errors {
                println!(
                    "  row {} {}: {}",
                    (row + 1).to_string().bright_white(),
                    field.bright_red(),
                    message
                );
            }
        }
        bail!("fix the rows above and re-run");
    }

    println!("{}", "🚀 Running optimization...".bright_blue());

    let optimizer = KitOptimizer::new(items)?;
    let started = Instant::now();
    let plan = optimizer.optimize();
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

    let plan = plan.with_provenance(
        format!("RUN-{}", Uuid::new_v4().simple()),
        Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        format!("{elapsed_ms:.2} ms"),
    );

    println!();
    println!("{}", "✅ Optimization complete!".bright_green().bold());
    println!();

    // Display results
    println!("{}", "📊 Kit plan:".bright_yellow().bold());
    println!(
        "  Original BoQ units: {}",
        plan.original_boq_items.to_string().bright_white().bold()
    );
    println!(
        "  Optimized kit sets: {}",
        plan.optimized_kits_required
            .to_string()
            .bright_white()
            .bold()
    );
    println!(
        "  Repetition factor: ×{}",
        plan.total_repetition_factor.to_string().bright_white()
    );
    println!(
        "  Cost savings: {}%",
        plan.estimated_cost_savings_percent
            .to_string()
            .bright_green()
    );
    println!();
    println!("  Kit types:");
    for kit in &plan.kit_details {
        println!(
            "    • {}: {} sets · ×{} reuse · {} elements",
            kit.dimensions.bright_white(),
            kit.required_qty,
            kit.repetition_count,
            kit.used_in_elements.len()
        );
    }

    // ESG banner
    let impact = EsgImpact::from_plan(&plan);
    if impact.units_saved > 0 {
        println!();
        println!("{}", "🌱 ESG impact:".bright_green().bold());
        println!(
            "  {} t CO₂ saved · {} truck trips eliminated · {} trees equivalent",
            impact.co2_saved_tonnes.to_string().bright_green(),
            impact.trucks_saved,
            impact.trees_equivalent
        );
        println!(
            "  ₹{:.1}L estimated procurement saving ({} fewer kit sets)",
            impact.cost_saved_inr as f64 / 100_000.0,
            impact.units_saved
        );
    }

    println!();

    // Save output
    if let Some(output_path) = output {
        let json = serde_json::to_string_pretty(&plan)?;
        std::fs::write(&output_path, json)?;
        println!(
            "💾 Saved kit plan to {}",
            output_path.display().to_string().bright_white()
        );
    } else {
        // Print to stdout
        let json = serde_json::to_string_pretty(&plan)?;
        println!("{}", json);
    }

    Ok(())
}

fn report_command(input: PathBuf, output: Option<PathBuf>) -> Result<()> {
    println!("{}", "🔍 Loading kit plan...".bright_blue());

    let content = std::fs::read_to_string(&input)?;
    let plan: KitPlan = serde_json::from_str(&content)?;

    println!("{}", "🌱 Generating ESG report...".bright_blue());

    let text = build_report_text(&plan);

    println!();
    if let Some(output_path) = output {
        std::fs::write(&output_path, &text)?;
        println!(
            "{} Saved report to {}",
            "✅".bright_green(),
            output_path.display().to_string().bright_white()
        );
    } else {
        println!("{}", text);
    }

    Ok(())
}

fn build_report_text(plan: &KitPlan) -> String {
    let impact = EsgImpact::from_plan(plan);
    let generated = plan
        .processed_at
        .clone()
        .unwrap_or_else(|| Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));

    let lines = [
        "FORMWORK KITTING OPTIMIZER - ESG IMPACT REPORT".to_string(),
        format!("Generated: {generated}"),
        "====================================================".to_string(),
        String::new(),
        "OPTIMIZATION SUMMARY".to_string(),
        format!("  Original BoQ Units     : {}", plan.original_boq_items),
        format!("  Optimized Kits Required: {}", plan.optimized_kits_required),
        format!("  Units Saved            : {}", impact.units_saved),
        format!(
            "  Cost Savings %         : {}%",
            plan.estimated_cost_savings_percent
        ),
        String::new(),
        "ENVIRONMENTAL IMPACT (Scope 1 + Scope 3)".to_string(),
        format!("  CO₂ Emissions Saved    : {} tonnes", impact.co2_saved_tonnes),
        format!("  Truck Trips Eliminated : {}", impact.trucks_saved),
        format!(
            "  Tree Equivalent        : {} trees/year",
            impact.trees_equivalent
        ),
        format!(
            "  Estimated Cost Saved   : ₹{:.1} Lakh",
            impact.cost_saved_inr as f64 / 100_000.0
        ),
        String::new(),
        "METHODOLOGY".to_string(),
        format!(
            "  Transport : {} kg CO₂/trip · {} kits/truck",
            esg::KG_CO2_PER_TRUCK_TRIP,
            esg::KITS_PER_TRUCK
        ),
        format!(
            "  Mfg steel : {} kg CO₂/kg steel · {} kg per kit set",
            esg::STEEL_CO2_FACTOR,
            esg::STEEL_KG_PER_KIT
        ),
        "  Trees     : 22 kg CO₂/tree/year absorption".to_string(),
    ];

    lines.join("\n")
}
