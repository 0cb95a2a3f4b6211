//! 계좌 스냅샷 → 게이지 메트릭 변환.
//!
//! 계좌별로 세 개의 게이지를 설정합니다. 잔고 값의 파싱 실패는 해당
//! 게이지만 건너뛰고 나머지 게이지와 다른 계좌는 계속 처리합니다.
//! 이전 스냅샷에만 있던 계좌의 시계열은 지우지 않고 마지막 값을 유지합니다.

use crate::metrics::{self, AccountLabels};
use crate::stats::ExportStats;
use simplefin_core::{parse_amount, AccountRecord, AccountSnapshot, MappingPolicy};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error};

/// 스냅샷을 메트릭으로 내보내는 변환기.
#[derive(Debug, Clone)]
pub struct MetricExporter {
    policy: Arc<MappingPolicy>,
}

impl MetricExporter {
    pub fn new(policy: Arc<MappingPolicy>) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &MappingPolicy {
        &self.policy
    }

    /// 스냅샷의 모든 계좌를 메트릭으로 기록합니다.
    ///
    /// 같은 스냅샷을 여러 번 내보내도 결과는 동일합니다.
    pub fn export(&self, snapshot: &AccountSnapshot) -> ExportStats {
        let started = Instant::now();
        let mut stats = ExportStats {
            total: snapshot.len(),
            ..ExportStats::new()
        };

        for account in &snapshot.accounts {
            if self.policy.is_ignored(&account.id) {
                debug!(account_id = %account.id, "ignoring account");
                stats.ignored += 1;
                continue;
            }

            self.export_account(account, &mut stats);
            stats.exported += 1;
        }

        stats.elapsed = started.elapsed();
        stats
    }

    fn export_account(&self, account: &AccountRecord, stats: &mut ExportStats) {
        let labels = AccountLabels {
            domain: account.domain().to_string(),
            account_name: self
                .policy
                .display_name(&account.id, &account.name)
                .to_string(),
            account_id: account.id.clone(),
            currency: account.currency.clone(),
        };

        match parse_amount(&account.balance) {
            Ok(balance) => metrics::set_balance(&labels, balance),
            Err(e) => {
                error!(
                    account_id = %account.id,
                    value = %account.balance,
                    error = %e,
                    "failed to parse balance"
                );
                stats.balance_errors += 1;
            }
        }

        match parse_amount(&account.available_balance) {
            Ok(available) => metrics::set_available_balance(&labels, available),
            Err(e) => {
                error!(
                    account_id = %account.id,
                    value = %account.available_balance,
                    error = %e,
                    "failed to parse available balance"
                );
                stats.available_balance_errors += 1;
            }
        }

        metrics::set_last_updated(&labels, account.balance_date);
    }
}
