use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{info, warn};

use dokkan_core::domain::chat::ChatMessage;
use dokkan_core::domain::order::{Order, OrderId, OrderItem, OrderStatus};
use dokkan_core::stores::{CatalogStore, OrderLedger, ShippingRateTable};

use crate::extraction::CompleteExtraction;
use crate::llm::{CompletionClient, ReplyRequest};
use crate::prompt;

const DEFAULT_CUSTOMER_NAME: &str = "عميل واتساب";
const DEFAULT_GOVERNORATE: &str = "غير محدد";
const DEFAULT_SIZE: &str = "M";
const DEFAULT_COLOR: &str = "غير محدد";

#[derive(Clone, Debug)]
pub struct PipelineConfig {
    pub temperature: f32,
    /// Messages at or under this many characters skip the extraction call.
    pub extraction_min_chars: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self { temperature: 0.8, extraction_min_chars: 10 }
    }
}

/// What one inbound message produced: the assistant's reply (already appended
/// to the transcript) and the ledger entry, if the turn carried a complete
/// order intent.
#[derive(Debug)]
pub struct TurnOutcome {
    pub reply: String,
    pub created_order: Option<OrderId>,
}

/// Drives one chat turn end to end. The reply and the extraction are
/// independent calls: a failed reply degrades to a fallback line and never
/// blocks order capture, and vice versa.
pub struct ChatToOrderPipeline<C> {
    client: C,
    config: PipelineConfig,
}

impl<C: CompletionClient> ChatToOrderPipeline<C> {
    pub fn new(client: C, config: PipelineConfig) -> Self {
        Self { client, config }
    }

    pub async fn handle_message(
        &self,
        transcript: &mut Vec<ChatMessage>,
        catalog: &CatalogStore,
        rates: &ShippingRateTable,
        ledger: &mut OrderLedger,
        message: &str,
    ) -> TurnOutcome {
        transcript.push(ChatMessage::user(message));

        let briefing = prompt::system_instruction(catalog.list(), rates.list());
        let reply = match self
            .client
            .generate_reply(ReplyRequest {
                transcript: transcript.as_slice(),
                system_instruction: &briefing,
                temperature: self.config.temperature,
            })
            .await
        {
            Ok(text) if text.trim().is_empty() => prompt::EMPTY_REPLY_FALLBACK.to_string(),
            Ok(text) => text,
            Err(error) => {
                warn!(%error, "reply generation failed; serving fallback line");
                prompt::REPLY_FALLBACK.to_string()
            }
        };
        transcript.push(ChatMessage::assistant(reply.clone()));

        let created_order = if message.chars().count() > self.config.extraction_min_chars {
            self.try_capture_order(transcript, catalog, rates, ledger).await
        } else {
            None
        };

        TurnOutcome { reply, created_order }
    }

    async fn try_capture_order(
        &self,
        transcript: &[ChatMessage],
        catalog: &CatalogStore,
        rates: &ShippingRateTable,
        ledger: &mut OrderLedger,
    ) -> Option<OrderId> {
        let extracted = match self.client.extract_order(&prompt::transcript_text(transcript)).await
        {
            Ok(extracted) => extracted?,
            Err(error) => {
                warn!(%error, "order extraction failed; turn yields no order");
                return None;
            }
        };

        let complete = extracted.into_complete()?;
        let order = build_order(complete, catalog, rates);
        let id = order.id.clone();
        info!(order_id = %id.0, total = %order.total_amount, "captured order from chat");
        ledger.add(order);
        Some(id)
    }
}

/// Prices and assembles the ledger entry. An unmatched product code still
/// produces an order: the raw code stands in for the name at price zero, and
/// the operator reconciles it by phone.
fn build_order(
    extraction: CompleteExtraction,
    catalog: &CatalogStore,
    rates: &ShippingRateTable,
) -> Order {
    let product = catalog.find_by_code(&extraction.product_code);
    let product_name = product
        .map(|product| product.name.clone())
        .unwrap_or_else(|| extraction.product_code.clone());
    let price = product.map(|product| product.price).unwrap_or_else(|| Decimal::ZERO);

    let governorate =
        extraction.governorate.unwrap_or_else(|| DEFAULT_GOVERNORATE.to_string());
    let shipping_cost = rates.lookup(&governorate);

    Order {
        id: OrderId::generate(),
        customer_name: extraction
            .customer_name
            .unwrap_or_else(|| DEFAULT_CUSTOMER_NAME.to_string()),
        customer_phone: extraction.customer_phone,
        address: extraction.address,
        governorate,
        items: vec![OrderItem {
            product_code: extraction.product_code,
            product_name,
            size: extraction.size.unwrap_or_else(|| DEFAULT_SIZE.to_string()),
            color: extraction.color.unwrap_or_else(|| DEFAULT_COLOR.to_string()),
            price,
        }],
        shipping_cost,
        total_amount: price + shipping_cost,
        status: OrderStatus::Pending,
        created_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use rust_decimal::Decimal;

    use dokkan_core::defaults;
    use dokkan_core::domain::chat::ChatMessage;
    use dokkan_core::domain::order::OrderStatus;
    use dokkan_core::stores::{CatalogStore, OrderLedger, ShippingRateTable};

    use crate::extraction::ExtractedOrder;
    use crate::llm::{CompletionClient, ReplyRequest};
    use crate::prompt::{EMPTY_REPLY_FALLBACK, REPLY_FALLBACK};

    use super::{ChatToOrderPipeline, PipelineConfig};

    enum Script {
        Reply(&'static str),
        Fail,
    }

    enum ExtractionScript {
        Produce(ExtractedOrder),
        Nothing,
        Fail,
    }

    struct ScriptedClient {
        reply: Script,
        extraction: ExtractionScript,
        extraction_calls: AtomicUsize,
    }

    impl ScriptedClient {
        fn new(reply: Script, extraction: ExtractionScript) -> Self {
            Self { reply, extraction, extraction_calls: AtomicUsize::new(0) }
        }
    }

    #[async_trait]
    impl CompletionClient for ScriptedClient {
        async fn generate_reply(&self, _request: ReplyRequest<'_>) -> Result<String> {
            match &self.reply {
                Script::Reply(text) => Ok((*text).to_string()),
                Script::Fail => Err(anyhow!("simulated outage")),
            }
        }

        async fn extract_order(&self, _transcript_text: &str) -> Result<Option<ExtractedOrder>> {
            self.extraction_calls.fetch_add(1, Ordering::SeqCst);
            match &self.extraction {
                ExtractionScript::Produce(extracted) => Ok(Some(extracted.clone())),
                ExtractionScript::Nothing => Ok(None),
                ExtractionScript::Fail => Err(anyhow!("simulated extraction outage")),
            }
        }
    }

    fn seeded_world() -> (CatalogStore, ShippingRateTable, OrderLedger) {
        (
            CatalogStore::hydrate(defaults::sample_catalog()),
            ShippingRateTable::seeded(),
            OrderLedger::hydrate(Vec::new()),
        )
    }

    fn full_extraction(governorate: &str) -> ExtractedOrder {
        ExtractedOrder {
            customer_name: Some("أحمد".to_string()),
            customer_phone: Some("01012345678".to_string()),
            address: Some("١٢ شارع التحرير".to_string()),
            governorate: Some(governorate.to_string()),
            product_code: Some("TSH-001".to_string()),
            size: Some("L".to_string()),
            color: Some("أسود".to_string()),
        }
    }

    const LONG_MESSAGE: &str = "عايز أطلب تيشيرت، رقمي 01012345678 وعنواني ١٢ شارع التحرير";

    #[tokio::test]
    async fn complete_intent_becomes_a_priced_pending_order() {
        let (catalog, rates, mut ledger) = seeded_world();
        let client = ScriptedClient::new(
            Script::Reply("تمام يا فندم! 🛍️"),
            ExtractionScript::Produce(full_extraction("القاهرة")),
        );
        let pipeline = ChatToOrderPipeline::new(client, PipelineConfig::default());
        let mut transcript = Vec::new();

        let outcome = pipeline
            .handle_message(&mut transcript, &catalog, &rates, &mut ledger, LONG_MESSAGE)
            .await;

        let id = outcome.created_order.expect("order created");
        let order = ledger.find(&id).expect("in ledger");
        assert_eq!(order.total_amount, Decimal::from(300), "250 product + 50 Cairo shipping");
        assert_eq!(order.shipping_cost, Decimal::from(50));
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.items[0].product_name, "تيشيرت صيفي قطن");
        assert_eq!(outcome.reply, "تمام يا فندم! 🛍️");
    }

    #[tokio::test]
    async fn unknown_governorate_ships_at_the_fallback_rate() {
        let (catalog, rates, mut ledger) = seeded_world();
        let client = ScriptedClient::new(
            Script::Reply("تمام"),
            ExtractionScript::Produce(full_extraction("منطقة غير معروفة")),
        );
        let pipeline = ChatToOrderPipeline::new(client, PipelineConfig::default());
        let mut transcript = Vec::new();

        let outcome = pipeline
            .handle_message(&mut transcript, &catalog, &rates, &mut ledger, LONG_MESSAGE)
            .await;

        let order = ledger.find(&outcome.created_order.expect("order")).expect("in ledger");
        assert_eq!(order.shipping_cost, Decimal::from(50));
        assert_eq!(order.total_amount, Decimal::from(300));
    }

    #[tokio::test]
    async fn unmatched_product_code_prices_at_zero_with_raw_code_as_name() {
        let (catalog, rates, mut ledger) = seeded_world();
        let mut extraction = full_extraction("الجيزة");
        extraction.product_code = Some("XYZ-999".to_string());
        let client =
            ScriptedClient::new(Script::Reply("تمام"), ExtractionScript::Produce(extraction));
        let pipeline = ChatToOrderPipeline::new(client, PipelineConfig::default());
        let mut transcript = Vec::new();

        let outcome = pipeline
            .handle_message(&mut transcript, &catalog, &rates, &mut ledger, LONG_MESSAGE)
            .await;

        let order = ledger.find(&outcome.created_order.expect("order")).expect("in ledger");
        assert_eq!(order.items[0].product_name, "XYZ-999");
        assert_eq!(order.items[0].price, Decimal::ZERO);
        assert_eq!(order.total_amount, Decimal::from(50), "shipping only");
    }

    #[tokio::test]
    async fn reply_outage_serves_the_fallback_and_leaves_the_ledger_alone() {
        let (catalog, rates, mut ledger) = seeded_world();
        let client = ScriptedClient::new(Script::Fail, ExtractionScript::Fail);
        let pipeline = ChatToOrderPipeline::new(client, PipelineConfig::default());
        let mut transcript = Vec::new();

        let outcome = pipeline
            .handle_message(&mut transcript, &catalog, &rates, &mut ledger, LONG_MESSAGE)
            .await;

        assert_eq!(outcome.reply, REPLY_FALLBACK);
        assert!(outcome.created_order.is_none());
        assert!(ledger.list().is_empty());
        // The fallback line still lands in the transcript.
        assert_eq!(transcript.last().map(|m| m.text.as_str()), Some(REPLY_FALLBACK));
    }

    #[tokio::test]
    async fn blank_reply_degrades_to_the_resend_prompt() {
        let (catalog, rates, mut ledger) = seeded_world();
        let client = ScriptedClient::new(Script::Reply("   "), ExtractionScript::Nothing);
        let pipeline = ChatToOrderPipeline::new(client, PipelineConfig::default());
        let mut transcript = Vec::new();

        let outcome = pipeline
            .handle_message(&mut transcript, &catalog, &rates, &mut ledger, LONG_MESSAGE)
            .await;

        assert_eq!(outcome.reply, EMPTY_REPLY_FALLBACK);
    }

    #[tokio::test]
    async fn incomplete_extraction_creates_no_order() {
        let (catalog, rates, mut ledger) = seeded_world();
        let mut extraction = full_extraction("القاهرة");
        extraction.customer_phone = None;
        let client =
            ScriptedClient::new(Script::Reply("تمام"), ExtractionScript::Produce(extraction));
        let pipeline = ChatToOrderPipeline::new(client, PipelineConfig::default());
        let mut transcript = Vec::new();

        let outcome = pipeline
            .handle_message(&mut transcript, &catalog, &rates, &mut ledger, LONG_MESSAGE)
            .await;

        assert!(outcome.created_order.is_none());
        assert!(ledger.list().is_empty());
    }

    #[tokio::test]
    async fn short_messages_skip_the_extraction_call() {
        let (catalog, rates, mut ledger) = seeded_world();
        let client = ScriptedClient::new(
            Script::Reply("أهلاً! 🌸"),
            ExtractionScript::Produce(full_extraction("القاهرة")),
        );
        let pipeline = ChatToOrderPipeline::new(client, PipelineConfig::default());
        let mut transcript = Vec::new();

        let outcome = pipeline
            .handle_message(&mut transcript, &catalog, &rates, &mut ledger, "السلام")
            .await;

        assert!(outcome.created_order.is_none());
        assert_eq!(pipeline.client.extraction_calls.load(std::sync::atomic::Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn extraction_outage_still_returns_the_reply() {
        let (catalog, rates, mut ledger) = seeded_world();
        let client = ScriptedClient::new(Script::Reply("أهلاً بيك!"), ExtractionScript::Fail);
        let pipeline = ChatToOrderPipeline::new(client, PipelineConfig::default());
        let mut transcript = Vec::new();

        let outcome = pipeline
            .handle_message(&mut transcript, &catalog, &rates, &mut ledger, LONG_MESSAGE)
            .await;

        assert_eq!(outcome.reply, "أهلاً بيك!");
        assert!(outcome.created_order.is_none());
        assert!(ledger.list().is_empty());
    }

    #[tokio::test]
    async fn missing_optional_fields_take_the_documented_defaults() {
        let (catalog, rates, mut ledger) = seeded_world();
        let extraction = ExtractedOrder {
            customer_phone: Some("01012345678".to_string()),
            address: Some("١٢ شارع التحرير".to_string()),
            product_code: Some("PNTS-02".to_string()),
            ..ExtractedOrder::default()
        };
        let client =
            ScriptedClient::new(Script::Reply("تمام"), ExtractionScript::Produce(extraction));
        let pipeline = ChatToOrderPipeline::new(client, PipelineConfig::default());
        let mut transcript = Vec::new();

        let outcome = pipeline
            .handle_message(&mut transcript, &catalog, &rates, &mut ledger, LONG_MESSAGE)
            .await;

        let order = ledger.find(&outcome.created_order.expect("order")).expect("in ledger");
        assert_eq!(order.customer_name, "عميل واتساب");
        assert_eq!(order.governorate, "غير محدد");
        assert_eq!(order.items[0].size, "M");
        assert_eq!(order.items[0].color, "غير محدد");
        // Unlisted governorate falls back, 450 + 50.
        assert_eq!(order.total_amount, Decimal::from(500));
    }

    #[tokio::test]
    async fn transcript_accumulates_both_sides_of_every_turn() {
        let (catalog, rates, mut ledger) = seeded_world();
        let client = ScriptedClient::new(Script::Reply("أهلاً! 🌸"), ExtractionScript::Nothing);
        let pipeline = ChatToOrderPipeline::new(client, PipelineConfig::default());
        let mut transcript: Vec<ChatMessage> = Vec::new();

        pipeline.handle_message(&mut transcript, &catalog, &rates, &mut ledger, "أهلاً").await;
        pipeline.handle_message(&mut transcript, &catalog, &rates, &mut ledger, "عندكم إيه؟").await;

        assert_eq!(transcript.len(), 4);
        assert_eq!(transcript[0].text, "أهلاً");
        assert_eq!(transcript[1].text, "أهلاً! 🌸");
    }
}
