use clap::Subcommand;
use secrecy::ExposeSecret;

use dokkan_store::snapshots;

use crate::commands::{build_runtime, load_config, open_kv, CommandResult};

#[derive(Debug, Subcommand)]
pub enum NameCommand {
    #[command(about = "Rename the storefront")]
    Set {
        #[arg(long)]
        name: String,
    },
    #[command(about = "Show the current storefront name")]
    Show,
}

pub fn run_name(command: NameCommand) -> CommandResult {
    let config = match load_config("name") {
        Ok(config) => config,
        Err(result) => return result,
    };
    let runtime = match build_runtime("name") {
        Ok(runtime) => runtime,
        Err(result) => return result,
    };

    runtime.block_on(async {
        let kv = match open_kv(&config).await {
            Ok(kv) => kv,
            Err(message) => return CommandResult::failure("name", "storage", message, 4),
        };

        match command {
            NameCommand::Set { name } => {
                if name.trim().is_empty() {
                    return CommandResult::failure(
                        "name",
                        "domain_validation",
                        "storefront name must not be empty",
                        5,
                    );
                }
                if let Err(error) = snapshots::save_display_name(&kv, name.trim()).await {
                    return CommandResult::failure("name", "storage", error.to_string(), 4);
                }
                CommandResult::success("name", format!("storefront renamed to {}", name.trim()))
            }
            NameCommand::Show => match snapshots::load_display_name(&kv).await {
                Ok(name) => CommandResult::success("name", name),
                Err(error) => CommandResult::failure("name", "storage", error.to_string(), 4),
            },
        }
    })
}

/// Gate for operator-only surfaces. The password is a shared secret from
/// config, compared verbatim.
pub fn run_dev_mode(password: &str) -> CommandResult {
    let config = match load_config("dev-mode") {
        Ok(config) => config,
        Err(result) => return result,
    };

    if password == config.admin.password.expose_secret() {
        CommandResult::success("dev-mode", "developer mode unlocked")
    } else {
        CommandResult::failure("dev-mode", "auth", "wrong password", 5)
    }
}
