use anyhow::Result;
use clap::{Parser, Subcommand};

mod cli;

/// lunchguide - School lunch allergen and nutrition dashboard
#[derive(Parser)]
#[command(name = "lunchguide")]
#[command(about = "School lunch allergen and nutrition dashboard", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Server host address (overrides config file)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides config file)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print one day's dashboard as JSON
    Show {
        /// Day to show, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Allergen code to watch for, repeatable
        #[arg(long = "allergen", value_parser = clap::value_parser!(u32).range(1..=19))]
        allergens: Vec<u32>,

        /// Daily target preset (adult, elementary, middle_male, ...)
        #[arg(long)]
        preset: Option<String>,

        /// Meal slot to show (defaults to lunch)
        #[arg(long)]
        meal: Option<String>,

        /// Only list dishes that match the allergen profile
        #[arg(long)]
        risky_only: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = lunchguide::Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    // Initialize observability (tracing + logging)
    lunchguide::observability::init_observability(
        &config.observability.log_level,
        config.observability.json,
    )?;

    match cli.command {
        Commands::Serve { host, port } => cli::server::serve(config, host, port).await,
        Commands::Show {
            date,
            allergens,
            preset,
            meal,
            risky_only,
        } => {
            cli::show::show(
                config,
                cli::show::ShowArgs {
                    date,
                    allergens,
                    preset,
                    meal,
                    risky_only,
                },
            )
            .await
        }
    }
}
