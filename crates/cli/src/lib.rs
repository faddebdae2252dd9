pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use commands::orders::OrderCommand;
use commands::product::ProductCommand;
use commands::settings::NameCommand;
use commands::shipping::ShippingCommand;

#[derive(Debug, Parser)]
#[command(
    name = "dokkan",
    about = "Storefront operator CLI",
    long_about = "Manage the catalog, shipping rates and order ledger, run simulated customer chats, and inspect runtime readiness.",
    after_help = "Examples:\n  dokkan product list\n  dokkan shipping set --governorate القاهرة --cost 55\n  dokkan chat --message \"عايز أطلب تيشيرت TSH-001، رقمي 01012345678 وعنواني ١٢ شارع التحرير، القاهرة\"\n  dokkan doctor --json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Manage the product catalog")]
    Product {
        #[command(subcommand)]
        command: ProductCommand,
    },
    #[command(about = "Manage the per-governorate shipping rate table")]
    Shipping {
        #[command(subcommand)]
        command: ShippingCommand,
    },
    #[command(about = "Inspect and curate the order ledger")]
    Order {
        #[command(subcommand)]
        command: OrderCommand,
    },
    #[command(about = "Show order counts and the sales total")]
    Sales,
    #[command(about = "Run a simulated customer chat session")]
    Chat {
        #[arg(long = "message", required = true, help = "One customer turn; repeat for a longer session")]
        messages: Vec<String>,
    },
    #[command(about = "Show or change the storefront display name")]
    Name {
        #[command(subcommand)]
        command: NameCommand,
    },
    #[command(about = "Unlock developer mode with the admin password")]
    DevMode {
        #[arg(long)]
        password: String,
    },
    #[command(about = "Wipe all persisted state back to seed data")]
    Reset {
        #[arg(long, help = "Confirm the wipe")]
        yes: bool,
    },
    #[command(about = "Inspect effective configuration values with source attribution and redaction")]
    Config,
    #[command(about = "Validate config, completion-key readiness, and storage connectivity")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

fn init_logging() {
    use tracing::Level;

    // Command output is line-oriented JSON; keep logs quiet unless asked.
    let level = std::env::var("DOKKAN_LOG_LEVEL")
        .ok()
        .and_then(|value| value.parse::<Level>().ok())
        .unwrap_or(Level::WARN);

    let _ = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(level)
        .compact()
        .try_init();
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    let result = match cli.command {
        Command::Product { command } => commands::product::run(command),
        Command::Shipping { command } => commands::shipping::run(command),
        Command::Order { command } => commands::orders::run(command),
        Command::Sales => commands::sales::run(),
        Command::Chat { messages } => commands::chat::run(messages),
        Command::Name { command } => commands::settings::run_name(command),
        Command::DevMode { password } => commands::settings::run_dev_mode(&password),
        Command::Reset { yes } => commands::reset::run(yes),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
