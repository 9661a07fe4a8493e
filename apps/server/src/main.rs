use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use offramp_config::load as load_config;
use offramp_dishes::Catalog;
use offramp_runtime::{serve, telemetry, BackendServices};
use offramp_transition::{calculate_weekly_transition, generate_swap_days};
use tracing::info;

#[derive(Parser)]
#[command(name = "offramp")]
#[command(about = "OffRamp backend (serves the HTTP API by default)")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Run one reminder sweep for the current UTC minute
    Remind,
    /// Print plant-based replacement groups for a dish
    Search {
        /// Dish to replace, e.g. "butter chicken"
        query: Vec<String>,
    },
    /// Print the weekly transition plan for a baseline
    Plan {
        /// Non-veg meals per week today
        baseline: u32,
        /// Weeks to reach the baseline
        weeks: u32,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_server().await,
        Commands::Remind => run_reminders().await,
        Commands::Search { query } => {
            search(&query.join(" "));
            Ok(())
        }
        Commands::Plan { baseline, weeks } => {
            print_plan(baseline, weeks);
            Ok(())
        }
    }
}

async fn run_server() -> anyhow::Result<()> {
    telemetry::init_tracing().context("failed to initialise tracing")?;

    info!("starting OffRamp backend");

    let config = load_config().context("failed to load configuration")?;

    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    serve(&config, services).await
}

async fn run_reminders() -> anyhow::Result<()> {
    telemetry::init_tracing().context("failed to initialise tracing")?;

    let config = load_config().context("failed to load configuration")?;
    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    let sweep = services
        .state
        .reminder_service
        .sweep(Utc::now())
        .await
        .context("reminder sweep failed")?;

    println!(
        "{}",
        serde_json::to_string_pretty(&sweep).context("failed to render sweep")?
    );
    Ok(())
}

fn search(query: &str) {
    let groups = Catalog::bundled().find_replacement_groups(query);
    if groups.is_empty() {
        println!("No plant-based swaps found for \"{}\"", query.trim());
        return;
    }

    for group in groups {
        println!("{} [{}]", group.title, group.keywords.join(", "));
        for dish in group.dishes {
            println!(
                "  {:<32} {:<10} {}",
                dish.name,
                dish.total_time,
                dish.price_swap.as_deref().unwrap_or("-")
            );
        }
    }
}

fn print_plan(baseline: u32, weeks: u32) {
    let plan = calculate_weekly_transition(baseline, weeks);
    if plan.is_empty() {
        println!("A plan needs at least one week");
        return;
    }

    println!("{:<6} {:<7} {}", "Week", "Meals", "Swap days");
    for week in plan {
        let days: Vec<&str> = generate_swap_days(week.meals_to_replace)
            .iter()
            .map(|day| day.as_str())
            .collect();
        println!(
            "{:<6} {:<7} {}",
            week.week_number,
            week.meals_to_replace,
            days.join(", ")
        );
    }
}
