use dokkan_store::kv::KvStore;

use crate::commands::{build_runtime, load_config, open_kv, CommandResult};

pub fn run(confirmed: bool) -> CommandResult {
    if !confirmed {
        return CommandResult::failure(
            "reset",
            "confirmation",
            "reset wipes the catalog, rate table, orders and display name; re-run with --yes",
            5,
        );
    }

    let config = match load_config("reset") {
        Ok(config) => config,
        Err(result) => return result,
    };
    let runtime = match build_runtime("reset") {
        Ok(runtime) => runtime,
        Err(result) => return result,
    };

    runtime.block_on(async {
        let kv = match open_kv(&config).await {
            Ok(kv) => kv,
            Err(message) => return CommandResult::failure("reset", "storage", message, 4),
        };
        if let Err(error) = kv.clear().await {
            return CommandResult::failure("reset", "storage", error.to_string(), 4);
        }
        CommandResult::success("reset", "factory reset complete; seed data loads on next use")
    })
}
