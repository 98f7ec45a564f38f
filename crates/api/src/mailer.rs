use async_trait::async_trait;
use rendezvous_core::notification::{MailParams, Notifier};
use tracing::info;

/// Notifier that writes outgoing mail to the log instead of delivering it.
#[derive(Debug, Default, Clone)]
pub struct LogMailer;

#[async_trait]
impl Notifier for LogMailer {
    async fn send_mail(
        &self,
        template_key: &str,
        recipient: &str,
        langcode: &str,
        params: &MailParams,
    ) -> bool {
        let subject = params.get("subject").map(String::as_str).unwrap_or_default();
        info!(
            template = template_key,
            langcode = langcode,
            "Mail to {}: {}",
            recipient,
            subject
        );
        true
    }
}
