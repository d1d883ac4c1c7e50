//! # Structured Logging Module
//!
//! Environment-aware console logging for the service layer. The pure workflow
//! engine never logs; request-level outcomes are recorded here by the
//! collaborating service.

use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};
use uuid::Uuid;

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging with environment-specific configuration
pub fn init_structured_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let environment = get_environment();
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(get_log_level(&environment)));

        let console = if environment == "production" {
            fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .json()
                .with_filter(filter)
                .boxed()
        } else {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_filter(filter)
                .boxed()
        };

        // A host application may already own the global subscriber
        if tracing_subscriber::registry().with(console).try_init().is_err() {
            tracing::debug!("Global tracing subscriber already initialized");
        }

        tracing::info!(environment = %environment, "structured logging initialized");
    });
}

/// Get current environment from environment variables
fn get_environment() -> String {
    std::env::var("ORDER_WORKFLOW_ENV")
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

/// Get log level based on environment
fn get_log_level(environment: &str) -> &'static str {
    match environment {
        "production" => "info",
        _ => "debug",
    }
}

/// Log structured data for order operations
pub fn log_order_operation(
    operation: &str,
    order_id: Uuid,
    order_number: &str,
    actor_id: &str,
    status: &str,
    details: Option<&str>,
) {
    tracing::info!(
        operation = %operation,
        order_id = %order_id,
        order_number = %order_number,
        actor_id = %actor_id,
        status = %status,
        details = details,
        "ORDER_OPERATION"
    );
}

/// Log a rejected request with its error kind
pub fn log_order_rejection(operation: &str, order_id: Option<Uuid>, actor_id: &str, kind: &str, error: &str) {
    tracing::warn!(
        operation = %operation,
        order_id = ?order_id,
        actor_id = %actor_id,
        kind = %kind,
        error = %error,
        "ORDER_REJECTED"
    );
}
