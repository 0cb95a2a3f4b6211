//! 계좌 조회 trait 정의.

use async_trait::async_trait;
use simplefin_core::AccountSnapshot;

use crate::ClientResult;

/// 계좌 스냅샷을 제공하는 원격 소스.
///
/// 폴링 루프는 이 trait에만 의존하므로 테스트에서 가짜 구현으로 대체할 수 있습니다.
#[async_trait]
pub trait AccountSource: Send + Sync {
    /// 소스 이름 반환.
    fn name(&self) -> &str;

    /// 현재 계좌 스냅샷 조회.
    async fn get_accounts(&self) -> ClientResult<AccountSnapshot>;
}
