//! SimpleFin Bridge 계좌 API 클라이언트.
//!
//! Access URL 하나로 인증하여 계좌 스냅샷(잔고, 통화, 기관 도메인, 기준 시각)을 조회합니다.

pub mod client;
pub mod error;
pub mod traits;

pub use client::SimpleFinClient;
pub use error::{ClientError, ClientResult};
pub use traits::AccountSource;
