//! 에러 타입 정의.

use simplefin_client::ClientError;
use simplefin_core::CoreError;
use simplefin_credentials::{CredentialError, StoreError};
use std::net::SocketAddr;
use thiserror::Error;

/// Collector 에러 타입
#[derive(Debug, Error)]
pub enum CollectorError {
    /// 설정 에러
    #[error("Configuration error: {0}")]
    Config(String),

    /// 도메인 에러 (계좌 매핑 파일 등)
    #[error(transparent)]
    Core(#[from] CoreError),

    /// 자격증명 결정 실패
    #[error("Credential error: {0}")]
    Credential(#[from] CredentialError),

    /// 자격증명 저장소 설정 에러
    #[error("Credential store error: {0}")]
    Store(#[from] StoreError),

    /// SimpleFin 클라이언트 에러
    #[error("SimpleFin client error: {0}")]
    Client(#[from] ClientError),

    /// 메트릭 레코더 설치 실패
    #[error("Metrics error: {0}")]
    Metrics(String),

    /// 메트릭 서버 바인드 실패
    #[error("failed to bind metrics server on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// 메트릭 서버 실행 중 에러
    #[error("metrics server error: {0}")]
    Server(#[source] std::io::Error),

    /// 메트릭 서버가 종료 신호 없이 멈춤
    #[error("metrics server stopped unexpectedly")]
    ServerStopped,
}

/// Result 타입 별칭
pub type Result<T> = std::result::Result<T, CollectorError>;
