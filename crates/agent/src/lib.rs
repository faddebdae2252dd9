//! Simulated customer-chat assistant and the chat-to-order pipeline.
//!
//! Every inbound message takes the same path: a persona reply is generated
//! from the full transcript, and in parallel the raw message is screened for
//! an order intent. A structured extraction that carries phone, address and
//! product code becomes a priced ledger entry; anything less is dropped.

pub mod extraction;
pub mod gemini;
pub mod llm;
pub mod pipeline;
pub mod prompt;

pub use extraction::{CompleteExtraction, ExtractedOrder};
pub use gemini::GeminiClient;
pub use llm::{CompletionClient, ReplyRequest};
pub use pipeline::{ChatToOrderPipeline, PipelineConfig, TurnOutcome};
