use clap::Parser;
use expense_tracker::args::{Args, CategorySubcommand, Command, SettingsSubcommand};
use expense_tracker::{commands, Config, Mode, Result, Store};
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().home().path();

    if let Command::Init = args.command() {
        commands::init(home).await?.print();
        return Ok(());
    }

    // When EXPENSE_TRACKER_IN_MEMORY is set and non-empty, the mode will be Mode::Memory and
    // nothing is read from or written to the data directory.
    let mode = Mode::from_env();
    let config = Config::load(home).await?;
    debug!("Using {mode} storage in {}", config.data_dir().display());
    let store = Store::open(mode.storage(config.data_dir())).await;

    // Route to appropriate command handler
    let _: () = match args.command() {
        // Handled above, before the config exists.
        Command::Init => return Ok(()),
        Command::Add(add_args) => commands::add(&store, add_args.clone()).await?.print(),
        Command::Edit(edit_args) => commands::edit(&store, edit_args.clone()).await?.print(),
        Command::Delete(delete_args) => {
            commands::delete(&store, delete_args.clone()).await?.print()
        }
        Command::List(list_args) => commands::list(&store, list_args.clone()).await?.print(),
        Command::Summary(summary_args) => {
            commands::summary(&store, summary_args.clone())
                .await?
                .print()
        }
        Command::Category(category_args) => match category_args.command() {
            CategorySubcommand::List => commands::category_list(&store).await?.print(),
            CategorySubcommand::Add(args) => {
                commands::category_add(&store, args.clone()).await?.print()
            }
            CategorySubcommand::Update(args) => commands::category_update(&store, args.clone())
                .await?
                .print(),
            CategorySubcommand::Delete(args) => commands::category_delete(&store, args.clone())
                .await?
                .print(),
        },
        Command::Settings(settings_args) => match settings_args.command() {
            SettingsSubcommand::Show => commands::settings_show(&store).await?.print(),
            SettingsSubcommand::Set(args) => {
                commands::settings_set(&store, args.clone()).await?.print()
            }
        },
        Command::Clear => commands::clear(&store).await?.print(),
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                level,
                env!("CARGO_BIN_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
