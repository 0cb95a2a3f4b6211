//! 계좌 스냅샷 타입.
//!
//! SimpleFin이 한 번의 조회로 반환하는 계좌 목록을 표현합니다.
//! 잔고 값은 원본 문자열 그대로 보관하고, 파싱은 메트릭 내보내기 단계에서
//! 레코드별로 수행합니다 (한 계좌의 파싱 실패가 전체 스냅샷을 막지 않도록).

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// 계좌를 제공하는 금융기관 정보.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    /// 기관 도메인 (예: "bank.example")
    #[serde(default)]
    pub domain: String,
    /// 기관 이름
    #[serde(default)]
    pub name: Option<String>,
}

/// 단일 계좌 레코드.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    /// 계좌 ID (스냅샷 내에서 유일, 매핑 정책의 조인 키)
    pub id: String,
    /// 원본 계좌 이름
    pub name: String,
    /// 금융기관
    #[serde(default)]
    pub org: Organization,
    /// 통화 코드 (예: "USD")
    pub currency: String,
    /// 잔고 (10진수 문자열)
    pub balance: String,
    /// 사용 가능 잔고 (10진수 문자열, 원격 API가 생략하면 빈 문자열)
    #[serde(rename = "available-balance", default)]
    pub available_balance: String,
    /// 잔고 기준 시각 (epoch 초)
    #[serde(rename = "balance-date")]
    pub balance_date: i64,
}

impl AccountRecord {
    /// 기관 도메인 반환.
    pub fn domain(&self) -> &str {
        &self.org.domain
    }

    /// 잔고 기준 시각을 `DateTime`으로 변환.
    pub fn balance_time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.balance_date, 0)
    }
}

/// 한 번의 조회 결과.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    /// 원격 API가 보고한 비치명적 에러 메시지
    #[serde(default)]
    pub errors: Vec<String>,
    /// 원격 API가 반환한 순서 그대로의 계좌 목록
    #[serde(default)]
    pub accounts: Vec<AccountRecord>,
}

impl AccountSnapshot {
    pub fn new(accounts: Vec<AccountRecord>) -> Self {
        Self {
            errors: Vec::new(),
            accounts,
        }
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

/// 잔고 문자열을 게이지 값(f64)으로 파싱합니다.
///
/// 금액은 `Decimal`로 먼저 파싱하여 "100.50" 같은 값이 정확하게 변환되도록 하고,
/// Decimal로 표현할 수 없는 값(지수 표기, 28자리 초과)은 부동소수 파싱으로 처리합니다.
pub fn parse_amount(raw: &str) -> Result<f64, rust_decimal::Error> {
    let raw = raw.trim();
    // Decimal은 '_' 자릿수 구분자를 허용하지만 부동소수 표기가 아님
    if raw.contains('_') {
        return Err(rust_decimal::Error::ErrorString(format!(
            "invalid amount '{}'",
            raw
        )));
    }

    match Decimal::from_str(raw) {
        Ok(amount) => amount
            .to_f64()
            .ok_or_else(|| rust_decimal::Error::ConversionTo("f64".to_string())),
        // 지수 표기나 Decimal 범위(28자리)를 넘는 값
        Err(e) => raw.parse::<f64>().map_err(|_| e),
    }
}
