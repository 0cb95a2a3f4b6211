//! SimpleFin Bridge Prometheus exporter.

use anyhow::{anyhow, Context};
use simplefin_collector::{CollectorConfig, Daemon};
use simplefin_core::init_logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 설정 로드 (.env → 환경변수 → 명령줄)
    let config = CollectorConfig::load()?;

    init_logging(config.log.clone()).map_err(|e| anyhow!("로깅 초기화 실패: {}", e))?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "SimpleFin exporter 시작");
    tracing::debug!(
        metrics_addr = %config.server.socket_addr(),
        interval = ?config.poll.interval,
        "설정 로드 완료"
    );

    let daemon = Daemon::initialize(config)
        .await
        .context("exporter 초기화 실패")?;

    daemon.run().await?;

    tracing::info!("SimpleFin exporter 종료");
    Ok(())
}
