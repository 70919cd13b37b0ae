use crate::update::Update;
use async_trait::async_trait;

/// Update sink: where polled updates end up.
///
/// The polling loop hands every decoded update to its sink, in the order
/// received, after the cursor has already moved past it.
#[async_trait]
pub trait UpdateSink: Send + Sync {
    /// Human-readable sink name.
    fn name(&self) -> &str;

    /// Consume one update. Must not fail; sinks log their own problems.
    async fn deliver(&self, update: &Update);
}
