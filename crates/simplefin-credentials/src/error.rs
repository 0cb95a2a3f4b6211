//! 자격증명 관련 에러 타입.

use std::path::PathBuf;
use thiserror::Error;

/// 외부 저장소 에러.
#[derive(Debug, Error)]
pub enum StoreError {
    /// 저장소 URL/설정 에러
    #[error("Store configuration error: {0}")]
    Config(String),

    /// 연결 에러
    #[error("Store connection error: {0}")]
    Connection(String),

    /// 명령 실행 에러
    #[error("Store command error: {0}")]
    Command(String),
}

impl From<redis::RedisError> for StoreError {
    fn from(err: redis::RedisError) -> Self {
        if err.is_connection_refusal() || err.is_io_error() || err.is_timeout() {
            StoreError::Connection(err.to_string())
        } else {
            StoreError::Command(err.to_string())
        }
    }
}

/// 저장소 작업을 위한 Result 타입.
pub type StoreResult<T> = Result<T, StoreError>;

/// 자격증명 결정 에러.
///
/// 이 에러는 모두 치명적입니다. 저장소 읽기/쓰기 실패는 경고로만 처리되므로
/// 여기에 포함되지 않습니다.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// 사용 가능한 자격증명 소스 없음
    #[error("Access URL or Setup Token required")]
    NoCredentialSource,

    /// 1회용 파일 읽기 실패
    #[error("error reading AccessUrl path {path}: {source}")]
    VolatileFileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 1회용 파일 내용이 URL이 아님
    #[error("error parsing AccessUrl from {path}: {reason}")]
    VolatileFileParse { path: PathBuf, reason: String },

    /// 1회용 파일 삭제 실패
    #[error("error removing AccessUrl file {path}: {source}")]
    VolatileFileRemove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Setup Token base64 디코딩 실패
    #[error("error decoding base64 setupToken: {0}")]
    TokenDecode(#[from] base64::DecodeError),

    /// Setup Token이 UTF-8 URL이 아님
    #[error("setup token does not contain a valid claim URL: {0}")]
    TokenClaimUrl(String),

    /// Claim 요청 전송 실패
    #[error("error requesting access url: {0}")]
    ClaimRequest(#[from] reqwest::Error),

    /// Claim 요청 거부 (HTTP 200 이외)
    #[error("setup token claim failed with status {status}: {body}")]
    ClaimRejected { status: u16, body: String },
}

impl CredentialError {
    /// 1회용 파일 소비 과정의 에러인지 확인.
    pub fn is_volatile_file_error(&self) -> bool {
        matches!(
            self,
            CredentialError::VolatileFileRead { .. }
                | CredentialError::VolatileFileParse { .. }
                | CredentialError::VolatileFileRemove { .. }
        )
    }

    /// Setup Token 교환 과정의 에러인지 확인.
    pub fn is_claim_error(&self) -> bool {
        matches!(
            self,
            CredentialError::TokenDecode(_)
                | CredentialError::TokenClaimUrl(_)
                | CredentialError::ClaimRequest(_)
                | CredentialError::ClaimRejected { .. }
        )
    }
}

/// 자격증명 결정을 위한 Result 타입.
pub type CredentialResult<T> = Result<T, CredentialError>;
