//! 핵심 에러 타입.

use std::path::PathBuf;
use thiserror::Error;

/// 도메인 공통 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// 매핑 파일 읽기 실패 (파일 없음은 에러가 아님)
    #[error("계좌 매핑 파일을 읽을 수 없습니다 ({path}): {source}")]
    MappingRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 매핑 파일 JSON 파싱 실패
    #[error("계좌 매핑 JSON 파싱 실패 ({path}): {source}")]
    MappingParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// 핵심 작업을 위한 Result 타입.
pub type CoreResult<T> = Result<T, CoreError>;
