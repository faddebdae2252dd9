use clap::Subcommand;

use dokkan_core::domain::order::{OrderId, OrderStatus};
use dokkan_core::stores::OrderLedger;
use dokkan_store::snapshots;

use crate::commands::{build_runtime, load_config, open_kv, CommandResult};

#[derive(Debug, Subcommand)]
pub enum OrderCommand {
    #[command(about = "List every order in the ledger")]
    List,
    #[command(about = "Move an order to a new status")]
    Status {
        #[arg(long)]
        id: String,
        #[arg(long, help = "pending | approved | delivered | suspended")]
        status: String,
    },
    #[command(about = "Delete an order from the ledger")]
    Remove {
        #[arg(long)]
        id: String,
    },
}

pub fn run(command: OrderCommand) -> CommandResult {
    let config = match load_config("order") {
        Ok(config) => config,
        Err(result) => return result,
    };
    let runtime = match build_runtime("order") {
        Ok(runtime) => runtime,
        Err(result) => return result,
    };

    runtime.block_on(async {
        let kv = match open_kv(&config).await {
            Ok(kv) => kv,
            Err(message) => return CommandResult::failure("order", "storage", message, 4),
        };
        let orders = match snapshots::load_orders(&kv).await {
            Ok(orders) => orders,
            Err(error) => return CommandResult::failure("order", "storage", error.to_string(), 4),
        };
        let mut ledger = OrderLedger::hydrate(orders);

        match command {
            OrderCommand::List => {
                let lines: Vec<String> = ledger
                    .list()
                    .iter()
                    .map(|order| {
                        format!(
                            "{} | {} | {} | {} | {} ج.م (شحن {}) | {} | {}",
                            order.id.0,
                            order.customer_name,
                            order.customer_phone,
                            order.governorate,
                            order.total_amount,
                            order.shipping_cost,
                            order.status.as_str(),
                            order.created_at.to_rfc3339(),
                        )
                    })
                    .collect();
                CommandResult::success(
                    "order",
                    if lines.is_empty() { "ledger is empty".to_string() } else { lines.join("\n") },
                )
            }
            OrderCommand::Status { id, status } => {
                let status: OrderStatus = match status.parse() {
                    Ok(status) => status,
                    Err(error) => {
                        return CommandResult::failure(
                            "order",
                            "domain_validation",
                            format!("{error}"),
                            5,
                        );
                    }
                };
                let id = OrderId(id);
                if ledger.find(&id).is_none() {
                    return CommandResult::failure(
                        "order",
                        "not_found",
                        format!("no order with id {}", id.0),
                        5,
                    );
                }
                ledger.set_status(&id, status);
                if let Err(error) = snapshots::save_orders(&kv, ledger.list()).await {
                    return CommandResult::failure("order", "storage", error.to_string(), 4);
                }
                CommandResult::success(
                    "order",
                    format!("order {} is now {}", id.0, status.as_str()),
                )
            }
            OrderCommand::Remove { id } => {
                let id = OrderId(id);
                if ledger.find(&id).is_none() {
                    return CommandResult::failure(
                        "order",
                        "not_found",
                        format!("no order with id {}", id.0),
                        5,
                    );
                }
                ledger.remove(&id);
                if let Err(error) = snapshots::save_orders(&kv, ledger.list()).await {
                    return CommandResult::failure("order", "storage", error.to_string(), 4);
                }
                CommandResult::success("order", format!("removed order {}", id.0))
            }
        }
    })
}
