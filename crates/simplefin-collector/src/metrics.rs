//! Prometheus 메트릭 설정 및 유틸리티.
//!
//! 계좌 잔고 게이지와 폴링 자체 메트릭을 정의하고 `/metrics` 엔드포인트용
//! 레코더를 설치합니다.

use crate::error::CollectorError;
use crate::Result;
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};

/// 계좌 잔고
pub const BALANCE: &str = "simplefin_balance";
/// 계좌 사용 가능 잔고
pub const AVAILABLE_BALANCE: &str = "simplefin_available_balance";
/// 잔고 기준 시각 (epoch 초)
pub const LAST_UPDATED: &str = "simplefin_last_updated";
/// 폴링 횟수 (`result` = success | error)
pub const POLLS_TOTAL: &str = "simplefin_polls_total";
/// 폴링 소요 시간
pub const POLL_DURATION: &str = "simplefin_poll_duration_seconds";

/// Prometheus 메트릭 레코더를 설치하고 핸들을 반환합니다.
///
/// 프로세스당 한 번만 설치할 수 있으며, 이미 설치되어 있으면 에러를 반환합니다.
pub fn setup_metrics_recorder() -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full(POLL_DURATION.to_string()),
            &[0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0],
        )
        .map_err(|e| CollectorError::Metrics(format!("히스토그램 버킷 설정 실패: {}", e)))?
        .install_recorder()
        .map_err(|e| CollectorError::Metrics(format!("Prometheus 레코더 설치 실패: {}", e)))?;

    describe_metrics();
    Ok(handle)
}

/// 메트릭 설명(HELP) 등록.
pub fn describe_metrics() {
    describe_gauge!(BALANCE, "Account balance");
    describe_gauge!(AVAILABLE_BALANCE, "Account available balance");
    describe_gauge!(LAST_UPDATED, "Unix timestamp of the account balance");
    describe_counter!(POLLS_TOTAL, "SimpleFin polls by result");
    describe_histogram!(POLL_DURATION, "Duration of SimpleFin polls in seconds");
}

// ============================================================================
// 계좌 메트릭 헬퍼 함수
// ============================================================================

/// 계좌 시계열 레이블.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountLabels {
    pub domain: String,
    pub account_name: String,
    pub account_id: String,
    pub currency: String,
}

/// 잔고 게이지 설정.
pub fn set_balance(labels: &AccountLabels, value: f64) {
    gauge!(
        BALANCE,
        "domain" => labels.domain.clone(),
        "account_name" => labels.account_name.clone(),
        "account_id" => labels.account_id.clone(),
        "currency" => labels.currency.clone()
    )
    .set(value);
}

/// 사용 가능 잔고 게이지 설정.
pub fn set_available_balance(labels: &AccountLabels, value: f64) {
    gauge!(
        AVAILABLE_BALANCE,
        "domain" => labels.domain.clone(),
        "account_name" => labels.account_name.clone(),
        "account_id" => labels.account_id.clone(),
        "currency" => labels.currency.clone()
    )
    .set(value);
}

/// 잔고 기준 시각 게이지 설정 (통화 레이블 없음).
pub fn set_last_updated(labels: &AccountLabels, epoch_secs: i64) {
    gauge!(
        LAST_UPDATED,
        "domain" => labels.domain.clone(),
        "account_name" => labels.account_name.clone(),
        "account_id" => labels.account_id.clone()
    )
    .set(epoch_secs as f64);
}

// ============================================================================
// 폴링 메트릭 헬퍼 함수
// ============================================================================

/// 폴링 결과 기록.
pub fn record_poll(success: bool, duration_secs: f64) {
    let result = if success { "success" } else { "error" };
    counter!(POLLS_TOTAL, "result" => result).increment(1);
    histogram!(POLL_DURATION).record(duration_secs);
}
