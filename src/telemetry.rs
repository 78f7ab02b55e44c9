use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

use crate::config::ObservabilityConfig;

/// Initialize structured logging for the host process.
///
/// `RUST_LOG` wins over the configured level when set.
pub fn init_telemetry(config: &ObservabilityConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))?;

    if config.json_logs {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true),
            )
            .with(filter)
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer())
            .with(filter)
            .try_init()?;
    }

    tracing::info!("Correction desk telemetry initialized");
    Ok(())
}

/// Span wrapping everything an operator does within one correction session
pub fn session_span(session_id: Option<Uuid>, queue_len: usize) -> tracing::Span {
    tracing::info_span!(
        "correction_session",
        session.id = ?session_id,
        queue.len = queue_len,
        otel.kind = "internal"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_span_can_be_entered_without_subscriber() {
        let span = session_span(Some(Uuid::new_v4()), 3);
        let _guard = span.enter();
        tracing::info!("inside session span");
    }
}
