use std::path::PathBuf;

use activity_dashboard::logging::{self, Verbosity};
use activity_dashboard::models::{
    ActivityCategory, ActivityStatus, FilterState, Selection, TimeWindow,
};
use activity_dashboard::state::DashboardController;
use activity_dashboard::store::ActivityStore;
use activity_dashboard::{db, explore, report};
use anyhow::Context;
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use sqlx::PgPool;

#[derive(Parser)]
#[command(name = "activity-dashboard")]
#[command(about = "Activity operations dashboard for school programming", long_about = None)]
struct Cli {
    /// Debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Errors only
    #[arg(short, long, global = true)]
    quiet: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SourceArgs {
    /// Load activities from a JSON or CSV file instead of the bundled schedule
    #[arg(long, conflicts_with = "from_db")]
    data: Option<PathBuf>,
    /// Load activities from Postgres (requires DATABASE_URL)
    #[arg(long)]
    from_db: bool,
}

#[derive(Args)]
struct FilterArgs {
    #[arg(long = "class", default_value = "All")]
    class_name: String,
    #[arg(long = "type", default_value = "All")]
    category: Selection<ActivityCategory>,
    #[arg(long, default_value = "All")]
    status: Selection<ActivityStatus>,
    #[arg(long, default_value = "")]
    search: String,
    /// 7d, 30d or All
    #[arg(long, default_value = "All")]
    window: TimeWindow,
}

impl FilterArgs {
    fn into_state(self) -> FilterState {
        FilterState {
            class_name: Selection::class_name(&self.class_name),
            category: self.category,
            status: self.status,
            search: self.search,
            window: self.window,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Load the bundled activity schedule into the database
    Seed,
    /// Import activities from a CSV file
    Import {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Render the dashboard for one set of filters
    Dashboard {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// List the selectable values for each filter
    Options {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Show the next open activities
    Upcoming {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Change filters interactively from stdin
    Explore {
        #[command(flatten)]
        source: SourceArgs,
    },
}

async fn connect_from_env() -> anyhow::Result<PgPool> {
    let database_url = std::env::var("DATABASE_URL")
        .context("DATABASE_URL must be set to a production Postgres instance")?;
    db::connect(&database_url).await
}

async fn load_store(source: &SourceArgs) -> anyhow::Result<ActivityStore> {
    if source.from_db {
        let pool = connect_from_env().await?;
        return db::fetch_activities(&pool).await;
    }

    match &source.data {
        Some(path) => ActivityStore::load(path)
            .with_context(|| format!("failed to load activities from {}", path.display())),
        None => Ok(ActivityStore::embedded()?),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_subscriber(Verbosity::from_flags(cli.verbose, cli.quiet));

    match cli.command {
        Commands::InitDb => {
            let pool = connect_from_env().await?;
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            let pool = connect_from_env().await?;
            let seeded = db::seed(&pool).await?;
            println!("Seeded {seeded} activities.");
        }
        Commands::Import { csv } => {
            let pool = connect_from_env().await?;
            let inserted = db::import_csv(&pool, &csv).await?;
            println!("Inserted {inserted} activities from {}.", csv.display());
        }
        Commands::Dashboard { source, filters } => {
            let store = load_store(&source).await?;
            let controller =
                DashboardController::with_filters_at(&store, filters.into_state(), Utc::now());
            print!("{}", report::build_dashboard(&controller));
        }
        Commands::Options { source } => {
            let store = load_store(&source).await?;
            let controller = DashboardController::new(&store);
            let mut output = String::new();
            report::render_options(&mut output, controller.options());
            print!("{output}");
        }
        Commands::Upcoming { source } => {
            let store = load_store(&source).await?;
            let controller = DashboardController::new(&store);
            let mut output = String::new();
            report::render_upcoming(&mut output, controller.next_up());
            print!("{output}");
        }
        Commands::Explore { source } => {
            let store = load_store(&source).await?;
            let mut controller = DashboardController::new(&store);
            let stdin = std::io::stdin();
            explore::run(&mut controller, stdin.lock(), std::io::stdout().lock())?;
        }
    }

    Ok(())
}
