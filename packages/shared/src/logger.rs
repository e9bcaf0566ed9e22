//! Logging setup for the Irori binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// The filter covers the calling package's library crate and the binary
/// itself. `RUST_LOG` takes precedence when set.
///
/// # Arguments
///
/// * `package_name` - The calling package name (e.g., `env!("CARGO_PKG_NAME")`)
/// * `binary_name` - The name of the binary (e.g., "irori-server")
/// * `default_log_level` - The default log level (e.g., "debug", "info")
///
/// # Examples
///
/// ```no_run
/// use irori_shared::logger::setup_logger;
///
/// setup_logger("irori-server", "irori-server", "debug");
/// ```
pub fn setup_logger(package_name: &str, binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                default_filter(package_name, binary_name, default_log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
    tracing::debug!("Logger initialized for {}", binary_name);
}

/// Build the default filter directive, e.g. `irori_server=debug,irori_server=debug,irori_shared=debug,tower_http=debug`.
///
/// Target names use underscores, so dashes in package and binary names are replaced.
fn default_filter(package_name: &str, binary_name: &str, default_log_level: &str) -> String {
    format!(
        "{}={},{}={},irori_shared={},tower_http={}",
        package_name.replace('-', "_"),
        default_log_level,
        binary_name.replace('-', "_"),
        default_log_level,
        default_log_level,
        default_log_level
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_replaces_dashes() {
        // テスト項目: パッケージ名・バイナリ名のハイフンがアンダースコアに置換される
        // given (前提条件):
        let package_name = "irori-server";
        let binary_name = "irori-server";

        // when (操作):
        let filter = default_filter(package_name, binary_name, "info");

        // then (期待する結果):
        assert_eq!(
            filter,
            "irori_server=info,irori_server=info,irori_shared=info,tower_http=info"
        );
    }
}
