//! 주기적 계좌 조회 루프.
//!
//! 조회 → 내보내기 → 고정 간격 대기를 반복합니다. 대기 시간은 작업 시간과
//! 무관하게 고정이므로 실제 주기는 `interval + 작업 시간`입니다.
//! 조회 실패는 로그만 남기고 다음 주기까지 건너뜁니다 (재시도 없음).

use crate::exporter::MetricExporter;
use crate::metrics;
use crate::stats::ExportStats;
use simplefin_client::AccountSource;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// 한 주기의 결과.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// 스냅샷을 조회하여 내보냄
    Exported(ExportStats),
    /// 조회 실패 (내보내기 생략)
    FetchFailed(String),
}

impl PollOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, PollOutcome::Exported(_))
    }
}

/// 계좌 조회 루프.
pub struct Poller<S: AccountSource> {
    source: S,
    exporter: MetricExporter,
    interval: Duration,
}

impl<S: AccountSource> Poller<S> {
    pub fn new(source: S, exporter: MetricExporter, interval: Duration) -> Self {
        Self {
            source,
            exporter,
            interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// 한 번 조회하고 내보냅니다.
    pub async fn poll_once(&self) -> PollOutcome {
        info!(source = self.source.name(), "polling account data");
        let started = Instant::now();

        let outcome = match self.source.get_accounts().await {
            Ok(snapshot) => {
                for account in &snapshot.accounts {
                    debug!(
                        account_id = %account.id,
                        name = %account.name,
                        domain = %account.domain(),
                        balance = %account.balance,
                        available_balance = %account.available_balance,
                        balance_date = ?account.balance_time(),
                        "account"
                    );
                }
                let stats = self.exporter.export(&snapshot);
                stats.log_summary();
                PollOutcome::Exported(stats)
            }
            Err(e) => {
                if e.is_auth_error() {
                    error!(
                        error = %e,
                        "failed to get account data; the access URL may have been revoked, \
                         claim a new setup token"
                    );
                } else {
                    error!(error = %e, "failed to get account data");
                }
                PollOutcome::FetchFailed(e.to_string())
            }
        };

        let elapsed = started.elapsed();
        metrics::record_poll(outcome.is_success(), elapsed.as_secs_f64());
        info!(took = ?elapsed, "done");

        outcome
    }

    /// `shutdown`이 취소될 때까지 폴링합니다. 완료한 주기 수를 반환합니다.
    ///
    /// 진행 중인 조회는 취소하지 않고, 대기 중에만 종료 신호에 반응합니다.
    pub async fn run(&self, shutdown: CancellationToken) -> u64 {
        let mut cycles = 0u64;

        loop {
            if shutdown.is_cancelled() {
                break;
            }

            if let PollOutcome::FetchFailed(_) = self.poll_once().await {
                warn!("skipping export for this cycle");
            }
            cycles += 1;

            debug!(interval = ?self.interval, "sleeping until next poll");
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        info!(cycles, "polling stopped");
        cycles
    }
}
