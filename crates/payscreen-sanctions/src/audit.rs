use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    pub enabled: bool,
    pub format: LogFormat,
    /// Whether PROCEED outcomes are logged at all.
    pub include_clean: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            format: LogFormat::Json,
            include_clean: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LogFormat {
    Json,
    Text,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AuditOutcome {
    Block,
    Warn,
    Proceed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    pub timestamp: DateTime<Utc>,
    pub address: String,
    pub score: u8,
    pub tier: String,
    pub outcome: AuditOutcome,
    /// Sanctions list that matched, if any
    pub sanctions_source: Option<String>,
    /// Whether any signal was produced from degraded (unavailable) data
    pub degraded: bool,
}

/// Structured audit trail for screening decisions.
///
/// Emits one event per fresh screening via `tracing` under the
/// `screening_audit` target, with the level mapped to the outcome severity.
pub struct AuditLogger {
    config: AuditConfig,
}

impl AuditLogger {
    pub fn new(config: AuditConfig) -> Self {
        Self { config }
    }

    pub fn log_event(&self, event: AuditEvent) {
        if !self.config.enabled {
            return;
        }

        if matches!(event.outcome, AuditOutcome::Proceed) && !self.config.include_clean {
            return;
        }

        match self.config.format {
            LogFormat::Json => self.log_json(event),
            LogFormat::Text => self.log_text(event),
        }
    }

    fn log_json(&self, event: AuditEvent) {
        let json = serde_json::to_string(&event)
            .unwrap_or_else(|e| format!(r#"{{"error": "Failed to serialize: {}"}}"#, e));

        // tracing macros require compile-time constant targets
        match event.outcome {
            AuditOutcome::Block => {
                tracing::error!(target: "screening_audit", "{}", json)
            }
            AuditOutcome::Warn => {
                tracing::warn!(target: "screening_audit", "{}", json)
            }
            AuditOutcome::Proceed => {
                tracing::info!(target: "screening_audit", "{}", json)
            }
        }
    }

    fn log_text(&self, event: AuditEvent) {
        let message = format!(
            "[{}] {:?} - {} | score: {} | tier: {} | matched: {}{}",
            event.timestamp.format("%Y-%m-%d %H:%M:%S"),
            event.outcome,
            event.address,
            event.score,
            event.tier,
            event.sanctions_source.as_deref().unwrap_or("none"),
            if event.degraded { " | degraded" } else { "" },
        );

        match event.outcome {
            AuditOutcome::Block => {
                tracing::error!(target: "screening_audit", "{}", message)
            }
            AuditOutcome::Warn => {
                tracing::warn!(target: "screening_audit", "{}", message)
            }
            AuditOutcome::Proceed => {
                tracing::info!(target: "screening_audit", "{}", message)
            }
        }
    }
}

impl Default for AuditLogger {
    fn default() -> Self {
        Self::new(AuditConfig::default())
    }
}
