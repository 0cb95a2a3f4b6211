//! 계좌 매핑 정책.
//!
//! 시작 시 한 번 로드되는 정적 규칙입니다:
//! - 계좌 ID → 사용자 지정 표시 이름
//! - 메트릭에서 제외할 계좌 ID 목록
//!
//! 파일 형식:
//!
//! ```json
//! {
//!   "mappings": [{"account_id": "A1", "custom_name": "Checking"}],
//!   "ignore_list": ["A2"]
//! }
//! ```

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// 계좌 ID와 표시 이름의 매핑.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountMapping {
    pub account_id: String,
    pub custom_name: String,
}

/// 계좌 매핑 정책.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingPolicy {
    /// 표시 이름 매핑 (앞쪽 항목 우선)
    #[serde(default)]
    pub mappings: Vec<AccountMapping>,
    /// 제외할 계좌 ID
    #[serde(default)]
    pub ignore_list: Vec<String>,
}

impl MappingPolicy {
    /// 빈 정책 (매핑 없음, 제외 없음).
    pub fn empty() -> Self {
        Self::default()
    }

    /// 파일에서 정책을 로드합니다.
    ///
    /// - 경로가 비어있으면 빈 정책
    /// - 파일이 존재하지 않으면 빈 정책 (기능 미설정으로 간주)
    /// - 읽기 실패 또는 JSON 파싱 실패는 에러
    pub fn load(path: Option<&Path>) -> CoreResult<Self> {
        let Some(path) = path.filter(|p| !p.as_os_str().is_empty()) else {
            return Ok(Self::empty());
        };

        let data = match std::fs::read(path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "계좌 매핑 파일 없음, 빈 정책 사용");
                return Ok(Self::empty());
            }
            Err(source) => {
                return Err(CoreError::MappingRead {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let policy: Self =
            serde_json::from_slice(&data).map_err(|source| CoreError::MappingParse {
                path: path.to_path_buf(),
                source,
            })?;

        if !policy.mappings.is_empty() {
            info!(
                mappings = policy.mappings.len(),
                ignored = policy.ignore_list.len(),
                "계좌 매핑 로드 완료"
            );
        }

        Ok(policy)
    }

    /// 계좌 표시 이름 반환 (매핑이 없으면 `fallback`).
    pub fn display_name<'a>(&'a self, account_id: &str, fallback: &'a str) -> &'a str {
        self.mappings
            .iter()
            .find(|m| m.account_id == account_id)
            .map(|m| m.custom_name.as_str())
            .unwrap_or(fallback)
    }

    /// 메트릭에서 제외할 계좌인지 확인.
    pub fn is_ignored(&self, account_id: &str) -> bool {
        self.ignore_list.iter().any(|id| id == account_id)
    }

    /// 같은 계좌 ID가 여러 번 매핑된 경우 해당 ID 목록 반환.
    ///
    /// 첫 번째 매핑이 적용되지만 설정 실수일 가능성이 높으므로 호출자가 경고를 남깁니다.
    pub fn duplicate_mappings(&self) -> Vec<&str> {
        let mut duplicates: Vec<&str> = Vec::new();
        for (i, mapping) in self.mappings.iter().enumerate() {
            let seen_before = self.mappings[..i]
                .iter()
                .any(|m| m.account_id == mapping.account_id);
            if seen_before && !duplicates.contains(&mapping.account_id.as_str()) {
                duplicates.push(&mapping.account_id);
            }
        }
        duplicates
    }
}
