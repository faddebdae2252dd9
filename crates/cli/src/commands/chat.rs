use std::sync::Arc;

use dokkan_agent::{ChatToOrderPipeline, GeminiClient, PipelineConfig};
use dokkan_core::domain::chat::ChatMessage;
use dokkan_core::stores::{CatalogStore, OrderLedger, ShippingRateTable};
use dokkan_store::{snapshots, KvStore, StorageKey, WriteThrough};

use crate::commands::{build_runtime, load_config, open_kv, CommandResult};

/// Runs a scripted chat session: each `--message` is one customer turn. The
/// assistant's replies print as they arrive and captured orders land in the
/// ledger before the command exits.
pub fn run(messages: Vec<String>) -> CommandResult {
    let config = match load_config("chat") {
        Ok(config) => config,
        Err(result) => return result,
    };
    let runtime = match build_runtime("chat") {
        Ok(runtime) => runtime,
        Err(result) => return result,
    };

    let client = match GeminiClient::from_config(&config.llm) {
        Ok(client) => client,
        Err(error) => {
            return CommandResult::failure("chat", "integration", error.to_string(), 6);
        }
    };

    runtime.block_on(async {
        let kv = match open_kv(&config).await {
            Ok(kv) => Arc::new(kv),
            Err(message) => return CommandResult::failure("chat", "storage", message, 4),
        };

        let catalog = match snapshots::load_catalog(kv.as_ref()).await {
            Ok(products) => CatalogStore::hydrate(products),
            Err(error) => return CommandResult::failure("chat", "storage", error.to_string(), 4),
        };
        let rates = match snapshots::load_shipping_rates(kv.as_ref()).await {
            Ok(rates) => ShippingRateTable::hydrate(rates),
            Err(error) => return CommandResult::failure("chat", "storage", error.to_string(), 4),
        };
        let mut ledger = match snapshots::load_orders(kv.as_ref()).await {
            Ok(orders) => OrderLedger::hydrate(orders),
            Err(error) => return CommandResult::failure("chat", "storage", error.to_string(), 4),
        };
        // Incremental persistence while the session runs; the explicit save
        // below is the durable flush.
        ledger.subscribe(WriteThrough::new(
            Arc::clone(&kv) as Arc<dyn KvStore>,
            StorageKey::Orders,
        ));

        let pipeline = ChatToOrderPipeline::new(
            client,
            PipelineConfig {
                temperature: config.llm.temperature,
                extraction_min_chars: config.chat.extraction_min_chars,
            },
        );

        let mut transcript: Vec<ChatMessage> = Vec::new();
        let mut captured = 0usize;
        let mut lines = Vec::new();

        for message in &messages {
            let outcome = pipeline
                .handle_message(&mut transcript, &catalog, &rates, &mut ledger, message)
                .await;
            lines.push(format!("> {message}"));
            lines.push(outcome.reply.clone());
            if let Some(id) = outcome.created_order {
                captured += 1;
                lines.push(format!("[order captured: {}]", id.0));
            }
        }

        if let Err(error) = snapshots::save_orders(kv.as_ref(), ledger.list()).await {
            return CommandResult::failure("chat", "storage", error.to_string(), 4);
        }

        lines.push(format!("session over: {captured} order(s) captured"));
        CommandResult::success("chat", lines.join("\n"))
    })
}
