use clap::Subcommand;
use rust_decimal::Decimal;

use dokkan_core::stores::ShippingRateTable;
use dokkan_store::snapshots;

use crate::commands::{build_runtime, load_config, open_kv, CommandResult};

#[derive(Debug, Subcommand)]
pub enum ShippingCommand {
    #[command(about = "Change the delivery cost for one governorate")]
    Set {
        #[arg(long)]
        governorate: String,
        #[arg(long, help = "Delivery cost in EGP")]
        cost: Decimal,
    },
    #[command(about = "List the rate table")]
    List,
}

pub fn run(command: ShippingCommand) -> CommandResult {
    let config = match load_config("shipping") {
        Ok(config) => config,
        Err(result) => return result,
    };
    let runtime = match build_runtime("shipping") {
        Ok(runtime) => runtime,
        Err(result) => return result,
    };

    runtime.block_on(async {
        let kv = match open_kv(&config).await {
            Ok(kv) => kv,
            Err(message) => return CommandResult::failure("shipping", "storage", message, 4),
        };
        let rates = match snapshots::load_shipping_rates(&kv).await {
            Ok(rates) => rates,
            Err(error) => {
                return CommandResult::failure("shipping", "storage", error.to_string(), 4)
            }
        };
        let mut table = ShippingRateTable::hydrate(rates);

        match command {
            ShippingCommand::Set { governorate, cost } => {
                if table.list().iter().all(|rate| rate.governorate != governorate) {
                    return CommandResult::failure(
                        "shipping",
                        "not_found",
                        format!("no rate row for `{governorate}`; the region list is fixed"),
                        5,
                    );
                }
                table.set_cost(&governorate, cost);
                if let Err(error) = snapshots::save_shipping_rates(&kv, table.list()).await {
                    return CommandResult::failure("shipping", "storage", error.to_string(), 4);
                }
                CommandResult::success(
                    "shipping",
                    format!("shipping to {governorate} now costs {cost} ج.م"),
                )
            }
            ShippingCommand::List => {
                let lines: Vec<String> = table
                    .list()
                    .iter()
                    .map(|rate| format!("{}: {} ج.م", rate.governorate, rate.cost))
                    .collect();
                CommandResult::success("shipping", lines.join("\n"))
            }
        }
    })
}
