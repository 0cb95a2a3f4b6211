//! 1회용 Access URL 파일.
//!
//! 배포 도구가 Access URL을 파일로 떨어뜨려 두면 프로세스가 시작 시 한 번 읽고
//! 삭제합니다. 읽기/파싱/삭제 중 하나라도 실패하면 파일 상태를 신뢰할 수 없으므로
//! 에러를 반환하고 재시도하지 않습니다.

use crate::error::{CredentialError, CredentialResult};
use reqwest::Url;
use simplefin_core::AccessCredential;
use std::path::Path;
use tracing::info;

/// 파일에서 Access URL을 읽은 뒤 파일을 삭제합니다.
///
/// 파일 앞뒤의 공백(끝의 개행 포함)은 무시합니다.
pub fn read_and_delete_access_url(path: &Path) -> CredentialResult<AccessCredential> {
    let data = std::fs::read_to_string(path).map_err(|source| CredentialError::VolatileFileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let raw = data.trim();
    Url::parse(raw).map_err(|e| CredentialError::VolatileFileParse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    std::fs::remove_file(path).map_err(|source| CredentialError::VolatileFileRemove {
        path: path.to_path_buf(),
        source,
    })?;

    info!(path = %path.display(), "access URL read from volatile file, file removed");
    Ok(AccessCredential::new(raw))
}
