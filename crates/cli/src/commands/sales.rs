use dokkan_core::sales::SalesSummary;
use dokkan_store::snapshots;

use crate::commands::{build_runtime, load_config, open_kv, CommandResult};

pub fn run() -> CommandResult {
    let config = match load_config("sales") {
        Ok(config) => config,
        Err(result) => return result,
    };
    let runtime = match build_runtime("sales") {
        Ok(runtime) => runtime,
        Err(result) => return result,
    };

    runtime.block_on(async {
        let kv = match open_kv(&config).await {
            Ok(kv) => kv,
            Err(message) => return CommandResult::failure("sales", "storage", message, 4),
        };
        let orders = match snapshots::load_orders(&kv).await {
            Ok(orders) => orders,
            Err(error) => return CommandResult::failure("sales", "storage", error.to_string(), 4),
        };

        let summary = SalesSummary::from_orders(&orders);
        CommandResult::success(
            "sales",
            format!(
                "orders: {} (pending {}, approved {}, delivered {}, suspended {}) | total sales: {} ج.م",
                summary.total_orders,
                summary.pending,
                summary.approved,
                summary.delivered,
                summary.suspended,
                summary.total_sales,
            ),
        )
    })
}
