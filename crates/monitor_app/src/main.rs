mod terminal;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use monitor_logging::{monitor_error, monitor_info};

use terminal::app::{self, JobsQuery, SortKey};
use terminal::config::{self, MonitorConfig, CONFIG_FILENAME};
use terminal::logging;

/// Terminal dashboard for a web archiving job backend.
#[derive(Debug, Parser)]
#[command(name = "monitor", version)]
struct Cli {
    /// Config file to read instead of ./monitor.ron.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the backend base URL from the config file.
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Live view of the current job and archive statistics (default).
    Watch {
        /// Stop after this many seconds.
        #[arg(long)]
        for_secs: Option<u64>,
    },
    /// Print one window of the jobs table.
    Jobs {
        /// Only jobs belonging to this batch.
        #[arg(long)]
        batch: Option<String>,
        #[arg(long, default_value_t = 0)]
        start: u64,
        #[arg(long, default_value_t = 50)]
        end: u64,
        /// Sort key as `column[:asc|desc]`, may be repeated.
        #[arg(long, value_parser = app::parse_sort_key)]
        sort: Vec<SortKey>,
    },
    /// Show a batch page.
    Batch {
        id: String,
        /// Keep refreshing the page.
        #[arg(long)]
        watch: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME));
    let loaded = config::load_config(&config_path);
    let mut config = loaded.as_ref().cloned().unwrap_or_default();
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }

    logging::initialize(config.log_destination, config.level(), &config.log_file);
    if let Err(err) = &loaded {
        monitor_error!("{}; using defaults", err);
    }
    monitor_info!("Using backend {}", config.base_url);

    run(&config, cli.command.unwrap_or(Command::Watch { for_secs: None }))
}

fn run(config: &MonitorConfig, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Watch { for_secs } => app::watch(config, for_secs.map(Duration::from_secs)),
        Command::Jobs {
            batch,
            start,
            end,
            sort,
        } => app::jobs(
            config,
            JobsQuery {
                batch,
                start,
                end,
                sort,
            },
        ),
        Command::Batch { id, watch } => app::batch(config, &id, watch),
    }
}
