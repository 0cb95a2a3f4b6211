//! Access URL 결정.
//!
//! 설정된 소스를 우선순위 순서대로 시도하고 처음으로 값을 돌려준 소스를 사용합니다:
//!
//! 1. 외부 저장소 (실패/무효 값은 경고 후 다음 소스로)
//! 2. 1회용 파일 (읽기/파싱/삭제 실패는 치명적)
//! 3. 직접 지정한 Access URL
//! 4. Setup Token 교환 (실패는 치명적, 성공 시 저장소에 기록)
//!
//! 어떤 소스도 값을 주지 못하면 `CredentialError::NoCredentialSource`.

use crate::claim::SetupTokenClaimer;
use crate::error::{CredentialError, CredentialResult};
use crate::store::{self, CredentialStore, StoreRef};
use crate::volatile::read_and_delete_access_url;
use secrecy::SecretString;
use simplefin_core::AccessCredential;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 자격증명 입력 설정.
#[derive(Debug, Clone, Default)]
pub struct ResolverConfig {
    /// 1회용 Setup Token (base64 claim URL)
    pub setup_token: Option<SecretString>,
    /// 직접 지정한 Access URL
    pub access_url: Option<AccessCredential>,
    /// 1회용 Access URL 파일 경로
    pub volatile_file: Option<PathBuf>,
    /// 외부 저장소 레코드 주소
    pub store_ref: Option<StoreRef>,
}

/// 자격증명 소스.
#[derive(Debug, Clone)]
pub enum CredentialSource {
    /// 외부 저장소 레코드
    Store(StoreRef),
    /// 1회용 파일
    VolatileFile(PathBuf),
    /// 직접 지정
    Explicit(AccessCredential),
    /// Setup Token 교환
    SetupToken(SecretString),
}

impl CredentialSource {
    /// 소스 종류 이름 (로그용).
    pub fn kind(&self) -> &'static str {
        match self {
            CredentialSource::Store(_) => "store",
            CredentialSource::VolatileFile(_) => "volatile_file",
            CredentialSource::Explicit(_) => "explicit",
            CredentialSource::SetupToken(_) => "setup_token",
        }
    }
}

/// 결정된 자격증명과 그 출처.
#[derive(Debug, Clone)]
pub struct ResolvedCredential {
    pub credential: AccessCredential,
    pub source: &'static str,
}

/// 자격증명 결정기.
pub struct CredentialResolver {
    store: Option<Arc<dyn CredentialStore>>,
    claimer: SetupTokenClaimer,
}

impl CredentialResolver {
    pub fn new(store: Option<Arc<dyn CredentialStore>>, claimer: SetupTokenClaimer) -> Self {
        Self { store, claimer }
    }

    /// 설정에서 시도할 소스 목록을 우선순위 순서로 만듭니다.
    ///
    /// Access URL과 Setup Token이 모두 주어지면 Setup Token은 목록에서 빠집니다
    /// (불필요한 1회용 토큰 소모 방지).
    pub fn plan(&self, config: &ResolverConfig) -> Vec<CredentialSource> {
        let mut sources = Vec::with_capacity(4);

        if let Some(store_ref) = &config.store_ref {
            if self.store.is_some() {
                sources.push(CredentialSource::Store(store_ref.clone()));
            } else {
                warn!(record = %store_ref, "store reference configured without a store, skipping");
            }
        }

        if let Some(path) = &config.volatile_file {
            sources.push(CredentialSource::VolatileFile(path.clone()));
        }

        if let Some(access_url) = &config.access_url {
            sources.push(CredentialSource::Explicit(access_url.clone()));
        }

        if let Some(token) = &config.setup_token {
            if config.access_url.is_some() {
                warn!("access URL and setup token provided, ignoring setup token.");
            } else {
                sources.push(CredentialSource::SetupToken(token.clone()));
            }
        }

        sources
    }

    /// 우선순위에 따라 Access URL을 결정합니다.
    pub async fn resolve(&self, config: &ResolverConfig) -> CredentialResult<ResolvedCredential> {
        let sources = self.plan(config);
        debug!(
            sources = ?sources.iter().map(CredentialSource::kind).collect::<Vec<_>>(),
            "Resolving SimpleFin access URL"
        );

        for source in &sources {
            if let Some(credential) = self.try_source(source, config.store_ref.as_ref()).await? {
                info!(source = source.kind(), "using access URL");
                return Ok(ResolvedCredential {
                    credential,
                    source: source.kind(),
                });
            }
            debug!(source = source.kind(), "source yielded no access URL");
        }

        Err(CredentialError::NoCredentialSource)
    }

    /// 단일 소스를 시도합니다.
    ///
    /// `Ok(None)`은 "값 없음, 다음 소스로"를 의미하고 `Err`는 치명적 실패입니다.
    /// Setup Token 교환에 성공하면 `persist_to`가 주어진 경우 저장소에 기록하며,
    /// 기록 실패는 경고만 남깁니다.
    pub async fn try_source(
        &self,
        source: &CredentialSource,
        persist_to: Option<&StoreRef>,
    ) -> CredentialResult<Option<AccessCredential>> {
        match source {
            CredentialSource::Store(store_ref) => match &self.store {
                Some(store) => Ok(store::get(store.as_ref(), store_ref).await),
                None => Ok(None),
            },
            CredentialSource::VolatileFile(path) => read_and_delete_access_url(path).map(Some),
            CredentialSource::Explicit(credential) => Ok(Some(credential.clone())),
            CredentialSource::SetupToken(token) => {
                let credential = self.claimer.claim(token).await?;
                self.persist(&credential, persist_to).await;
                Ok(Some(credential))
            }
        }
    }

    async fn persist(&self, credential: &AccessCredential, store_ref: Option<&StoreRef>) {
        let Some(store_ref) = store_ref else {
            warn!("secret name or namespace not provided, cannot save access URL");
            return;
        };
        let Some(store) = &self.store else {
            warn!(record = %store_ref, "no credential store configured, cannot save access URL");
            return;
        };

        if let Err(e) = store::put(store.as_ref(), store_ref, credential).await {
            warn!(error = %e, record = %store_ref, "failed to save access URL to store");
        }
    }
}
