use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use studytrack::config::Config;
use studytrack::repl::Repl;
use studytrack::store::{self, LogStore};
use studytrack::{chart, repl};

#[derive(Parser)]
#[command(name = "studytrack")]
#[command(about = "Personal study-session tracker with rest reminders and progress charts")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a day's status without entering the interactive loop
    Status {
        /// Day to show: y for yesterday, or YYYY-MM-DD (default: today)
        date: Option<String>,
    },
    /// Print an aggregate progress chart and exit
    Chart {
        /// Metric to chart: count or time
        #[arg(default_value = "count")]
        metric: String,

        /// Period: t (today), w (week), or m (month)
        #[arg(default_value = "t")]
        period: String,
    },
}

/// Initialize tracing with output to stderr in interactive mode (stdout is
/// the prompt channel) or stdout for one-shot commands.
fn init_tracing(use_stderr: bool) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "studytrack=info".into()),
    );

    if use_stderr {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Interactive mode owns stdout for the prompt; keep logs on stderr there
    let use_stderr = cli.command.is_none();
    init_tracing(use_stderr);

    let config = Config::load_or_init()?;
    let store = LogStore::open_default()?;

    match cli.command {
        Some(Commands::Status { date }) => {
            let today = store::today_key();
            let (date_key, title) = match date.as_deref() {
                None => (today.clone(), "today".to_string()),
                Some(arg) if matches!(arg, "y" | "yes" | "yesterday") => {
                    let yesterday = store::parse_date_key(&today)
                        .and_then(|d| d.checked_sub_days(chrono::Days::new(1)))
                        .map(|d| d.to_string())
                        .ok_or_else(|| anyhow::anyhow!("Could not compute yesterday's date"))?;
                    let title = format!("{} (yesterday)", yesterday);
                    (yesterday, title)
                }
                Some(arg) => {
                    if store::parse_date_key(arg).is_none() {
                        anyhow::bail!("Invalid date '{}'. Expected YYYY-MM-DD.", arg);
                    }
                    (arg.to_string(), arg.to_string())
                }
            };
            match store.day(&date_key) {
                Some(day) => println!(
                    "{}",
                    repl::display::render_status(&title, day, &config.subjects, 0.0)
                ),
                None => println!("No record for {}.", date_key),
            }
        }
        Some(Commands::Chart { metric, period }) => {
            let metric = chart::Metric::from_arg(&metric)
                .ok_or_else(|| anyhow::anyhow!("Invalid metric '{}'. Use count or time.", metric))?;
            let period = chart::Period::from_arg(&period)
                .ok_or_else(|| anyhow::anyhow!("Invalid period '{}'. Use t, w, or m.", period))?;
            let today = chrono::Local::now().date_naive();
            let agg = chart::aggregate(store.data(), &config.subjects, period, today);
            let title = format!("{}, {}", metric.label(), period.label());
            match chart::render_bars(&agg, metric, &title) {
                Some(rendered) => println!("{}", rendered),
                None => println!("No data to chart in that range."),
            }
        }
        None => {
            Repl::new(config, store).run().await?;
        }
    }

    Ok(())
}
