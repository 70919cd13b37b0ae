use async_trait::async_trait;
use tgpoll_core::{traits::UpdateSink, update::Update};
use tracing::info;

/// Default sink: one log line per update.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

#[async_trait]
impl UpdateSink for LogSink {
    fn name(&self) -> &str {
        "log"
    }

    async fn deliver(&self, update: &Update) {
        let kind = update.kind().map(|k| k.as_str()).unwrap_or("other");
        let Some(msg) = update.any_message() else {
            info!("telegram: update {} ({kind})", update.update_id);
            return;
        };

        let sender = msg
            .from
            .as_ref()
            .map(|u| u.display_name())
            .or_else(|| msg.chat.title.clone())
            .unwrap_or_else(|| msg.chat.id.to_string());
        let text = msg.text.as_deref().unwrap_or("[no text]");

        info!(
            update_id = update.update_id,
            chat_id = msg.chat.id,
            message_id = msg.message_id,
            entities = msg.entities.len(),
            "telegram: {kind} from {sender}: {text}"
        );
    }
}
