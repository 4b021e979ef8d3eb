use async_trait::async_trait;
use tracing::{debug, info};

use super::repo_types::User;

/// Delivers password-reset links to users.
#[async_trait]
pub trait ResetNotifier: Send + Sync {
    async fn send_reset_link(&self, user: &User, link: &str) -> anyhow::Result<()>;
}

/// Records that a reset link was issued instead of sending mail. The link is
/// only logged at `debug`, with its token redacted.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl ResetNotifier for LogNotifier {
    async fn send_reset_link(&self, user: &User, link: &str) -> anyhow::Result<()> {
        info!(user_id = %user.id, "password reset link issued");
        debug!(user_id = %user.id, link = %redact_token(link), "password reset link");
        Ok(())
    }
}

/// Replaces the `token` query value so the link can be logged.
fn redact_token(link: &str) -> String {
    match link.find("token=") {
        Some(at) => {
            let start = at + "token=".len();
            let end = link[start..].find('&').map_or(link.len(), |i| start + i);
            format!("{}[redacted]{}", &link[..start], &link[end..])
        }
        None => link.to_string(),
    }
}
