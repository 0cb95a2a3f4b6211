//! SimpleFin Bridge Prometheus exporter.
//!
//! 시작 시 한 번 Access URL을 결정하고, 이후 주기적으로 계좌 스냅샷을 조회하여
//! 잔고를 게이지 메트릭으로 내보냅니다:
//! - `simplefin_balance`
//! - `simplefin_available_balance`
//! - `simplefin_last_updated`

pub mod config;
pub mod daemon;
pub mod error;
pub mod exporter;
pub mod metrics;
pub mod poller;
pub mod server;
pub mod stats;

pub use config::{parse_interval, Cli, CollectorConfig};
pub use daemon::Daemon;
pub use error::{CollectorError, Result};
pub use exporter::MetricExporter;
pub use poller::{PollOutcome, Poller};
pub use server::MetricsServer;
pub use stats::ExportStats;
