//! `sapcc-check` -- SAP Cloud Connector subaccount threshold check.
//!
//! Reads subaccount metric samples as JSON lines on stdin, evaluates them
//! against the built-in thresholds and any per-subaccount overrides, and
//! prints one verdict per subaccount (or per sample in JSON mode).
//!
//! # Environment variables
//!
//! | Variable               | Required | Default            | Description                          |
//! |------------------------|----------|--------------------|--------------------------------------|
//! | `SAPCC_OVERRIDES_FILE` | no       | --                 | JSON document with per-subaccount overrides |
//! | `SAPCC_OUTPUT`         | no       | `text`             | `text` (Check_MK lines) or `json`    |
//! | `RUST_LOG`             | no       | `sapcc_check=info,sapcc_core=info` | Log filter; logs go to stderr |

use sapcc_check::config::CheckConfig;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sapcc_check=info,sapcc_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = CheckConfig::from_env().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Invalid configuration");
        std::process::exit(1);
    });

    tracing::info!(
        overrides_file = ?config.overrides_file,
        output = ?config.output,
        "Starting sapcc-check",
    );

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    if let Err(e) = sapcc_check::run(&config, stdin.lock(), &mut stdout.lock()) {
        tracing::error!(error = ?e, "Check run failed");
        std::process::exit(1);
    }
}
