//! Access URL을 보관하는 외부 키-값 저장소.
//!
//! 레코드는 `(namespace, name)`으로 식별되며 여러 필드를 가질 수 있습니다.
//! 이 crate는 그 중 `access_url` 필드만 읽고 씁니다.

pub mod memory;
pub mod redis;

use crate::error::StoreResult;
use async_trait::async_trait;
use simplefin_core::{is_access_url, AccessCredential};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Access URL이 저장되는 필드 이름.
pub const ACCESS_URL_FIELD: &str = "access_url";

/// 저장소 레코드 주소.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoreRef {
    pub namespace: String,
    pub name: String,
}

impl StoreRef {
    /// namespace와 name이 모두 비어있지 않을 때만 주소를 만듭니다.
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Option<Self> {
        let namespace = namespace.into();
        let name = name.into();
        if namespace.trim().is_empty() || name.trim().is_empty() {
            return None;
        }
        Some(Self { namespace, name })
    }

    /// 평면 키-값 저장소용 키 (`namespace:name`).
    pub fn key(&self) -> String {
        format!("{}:{}", self.namespace, self.name)
    }
}

impl std::fmt::Display for StoreRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// 저장소 레코드 (필드 이름 → 값).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialRecord {
    pub fields: BTreeMap<String, String>,
}

impl CredentialRecord {
    pub fn access_url(&self) -> Option<&str> {
        self.fields.get(ACCESS_URL_FIELD).map(String::as_str)
    }

    pub fn set_access_url(&mut self, value: &str) {
        self.fields
            .insert(ACCESS_URL_FIELD.to_string(), value.to_string());
    }
}

/// 외부 키-값 저장소 trait.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// 저장소 이름 (로그용).
    fn name(&self) -> &str;

    /// 레코드 조회. 레코드가 없으면 `Ok(None)`.
    async fn fetch(&self, store_ref: &StoreRef) -> StoreResult<Option<CredentialRecord>>;

    /// 레코드 전체를 기록.
    async fn write(&self, store_ref: &StoreRef, record: &CredentialRecord) -> StoreResult<()>;
}

/// 저장소에서 Access URL을 읽습니다.
///
/// 어떤 실패도 호출자에게 전파하지 않습니다:
/// - 레코드/필드 없음 → `None` (첫 실행 시 정상 상태)
/// - 조회 실패 → 경고 후 `None`
/// - `http://`/`https://`로 시작하지 않는 값 → 경고 후 `None`
pub async fn get(store: &dyn CredentialStore, store_ref: &StoreRef) -> Option<AccessCredential> {
    let record = match store.fetch(store_ref).await {
        Ok(Some(record)) => record,
        Ok(None) => {
            info!(store = store.name(), record = %store_ref, "no access URL stored yet");
            return None;
        }
        Err(e) => {
            warn!(
                store = store.name(),
                record = %store_ref,
                error = %e,
                "failed to read credential record, will try other sources"
            );
            return None;
        }
    };

    let value = record.access_url()?;
    if !is_access_url(value) {
        // 값 자체는 에러 문자열일 수 있으므로 길이만 기록
        warn!(
            store = store.name(),
            record = %store_ref,
            len = value.len(),
            "invalid access URL in store, ignoring"
        );
        return None;
    }

    info!(store = store.name(), record = %store_ref, "found valid access URL in store");
    Some(AccessCredential::new(value))
}

/// Access URL을 저장소에 기록합니다 (fetch-modify-write).
///
/// 기존 레코드의 다른 필드는 유지됩니다. 원자적이지 않으므로 동시 쓰기 시
/// 마지막 쓰기가 이깁니다.
pub async fn put(
    store: &dyn CredentialStore,
    store_ref: &StoreRef,
    credential: &AccessCredential,
) -> StoreResult<()> {
    let mut record = store.fetch(store_ref).await?.unwrap_or_default();
    record.set_access_url(credential.expose());
    store.write(store_ref, &record).await?;

    info!(store = store.name(), record = %store_ref, "successfully saved access URL to store");
    Ok(())
}
