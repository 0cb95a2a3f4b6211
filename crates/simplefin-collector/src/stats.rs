//! 내보내기 통계 구조체.

use std::time::Duration;

/// 한 번의 스냅샷 내보내기 통계
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportStats {
    /// 스냅샷의 전체 계좌 수
    pub total: usize,
    /// 메트릭을 기록한 계좌 수
    pub exported: usize,
    /// 제외 목록으로 건너뛴 계좌 수
    pub ignored: usize,
    /// 잔고 파싱 실패 수
    pub balance_errors: usize,
    /// 사용 가능 잔고 파싱 실패 수
    pub available_balance_errors: usize,
    /// 소요 시간
    pub elapsed: Duration,
}

impl ExportStats {
    /// 새 통계 객체 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 전체 파싱 실패 수
    pub fn parse_errors(&self) -> usize {
        self.balance_errors + self.available_balance_errors
    }

    /// 통계 요약 로그 출력
    pub fn log_summary(&self) {
        tracing::info!(
            total = self.total,
            exported = self.exported,
            ignored = self.ignored,
            parse_errors = self.parse_errors(),
            elapsed = format!("{:.3}s", self.elapsed.as_secs_f64()),
            "metrics updated"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_errors_sums_both_fields() {
        let stats = ExportStats {
            balance_errors: 2,
            available_balance_errors: 1,
            ..ExportStats::new()
        };
        assert_eq!(stats.parse_errors(), 3);
    }
}
