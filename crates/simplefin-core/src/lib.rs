//! # SimpleFin Core
//!
//! SimpleFin exporter 전반에서 사용되는 핵심 도메인 모델 및 타입을 제공합니다:
//! - 계좌 스냅샷 및 계좌 레코드
//! - 접근 자격증명 (Access URL)
//! - 계좌 매핑 정책 (표시 이름, 제외 목록)
//! - 로깅 인프라

pub mod credential;
pub mod error;
pub mod logging;
pub mod mapping;
pub mod types;

pub use credential::{is_access_url, AccessCredential};
pub use error::{CoreError, CoreResult};
pub use logging::{init_logging, LogConfig, LogFormat};
pub use mapping::{AccountMapping, MappingPolicy};
pub use types::*;
