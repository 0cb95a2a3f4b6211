//! SimpleFin 접근 자격증명 관리.
//!
//! 처리 기능:
//! - 외부 키-값 저장소에 Access URL 보관 (Redis, 인메모리)
//! - 1회용 Access URL 파일 소비 (읽은 후 삭제)
//! - Setup Token 교환 (POST claim URL)
//! - 우선순위에 따른 자격증명 결정 (저장소 → 파일 → 직접 지정 → Setup Token)

pub mod claim;
pub mod error;
pub mod resolver;
pub mod store;
pub mod volatile;

pub use claim::{decode_setup_token, SetupTokenClaimer};
pub use error::{CredentialError, CredentialResult, StoreError, StoreResult};
pub use resolver::{CredentialResolver, CredentialSource, ResolvedCredential, ResolverConfig};
pub use store::{
    memory::InMemoryCredentialStore, redis::RedisCredentialStore, CredentialRecord,
    CredentialStore, StoreRef, ACCESS_URL_FIELD,
};
pub use volatile::read_and_delete_access_url;
