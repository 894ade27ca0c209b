use clap::{Parser, Subcommand};
use plugscan::{
    commands::{
        config::{self, ConfigAction},
        discover::{self, DiscoverCommand},
        scan::{self, ScanCommand},
    },
    logger, GlobalOpts,
};

#[derive(Parser)]
#[command(name = "plugscan")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Static plugin discovery for Python packages",
    long_about = "plugscan finds plugin specifications in a Python package tree without running it and emits the entry point registry a plugin loader reads at runtime."
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOpts,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Discover plugins in every package under a directory
    Discover(DiscoverCommand),
    /// Scan explicit modules and show how their members resolve
    Scan(ScanCommand),
    /// Show configuration
    #[command(subcommand_required = false, arg_required_else_help = false)]
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logger::init_with_verbosity(cli.global.verbosity_level(), cli.global.quiet) {
        eprintln!("Warning: Failed to initialize logger: {}", e);
    }
    plugscan::init_tracing(&cli.global);

    let result = match cli.command {
        Commands::Discover(cmd) => discover::handle_discover(cmd),
        Commands::Scan(cmd) => scan::handle_scan(cmd, &cli.global),
        Commands::Config { action } => config::handle_config(action, &cli.global),
    };

    if let Err(e) = result {
        logger::error(&e.to_string());
        if cli.global.verbosity_level() > 0 {
            logger::show_log_path();
        }
        std::process::exit(1);
    }
}
