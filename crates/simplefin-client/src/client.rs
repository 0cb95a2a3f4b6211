//! SimpleFin Bridge REST 클라이언트.
//!
//! Access URL 형식: `https://{username}:{password}@{host}/{path}`
//!
//! 인증 정보는 URL에서 분리하여 basic auth 헤더로 보냅니다. 이렇게 하면
//! 요청 에러 메시지에 비밀번호가 포함되지 않습니다.

use crate::error::{ClientError, ClientResult};
use crate::traits::AccountSource;
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use simplefin_core::{AccessCredential, AccountSnapshot};
use std::time::Duration;
use tracing::{debug, warn};

/// SimpleFin 계좌 API 클라이언트.
#[derive(Clone)]
pub struct SimpleFinClient {
    client: Client,
    accounts_url: Url,
    username: String,
    password: Option<String>,
}

impl std::fmt::Debug for SimpleFinClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimpleFinClient")
            .field("accounts_url", &self.accounts_url.as_str())
            .finish_non_exhaustive()
    }
}

impl SimpleFinClient {
    /// Access URL로 클라이언트를 생성합니다.
    ///
    /// `timeout`이 `None`이면 전송 계층 기본값을 사용합니다 (요청이 무기한 걸릴 수 있음).
    ///
    /// # Errors
    /// Access URL이 `http`/`https` 절대 URL이 아니거나 HTTP 클라이언트 생성에 실패하면 에러.
    pub fn new(credential: &AccessCredential, timeout: Option<Duration>) -> ClientResult<Self> {
        let mut base = Url::parse(credential.expose().trim())
            .map_err(|e| ClientError::InvalidAccessUrl(e.to_string()))?;

        if !matches!(base.scheme(), "http" | "https") {
            return Err(ClientError::InvalidAccessUrl(format!(
                "unsupported scheme '{}'",
                base.scheme()
            )));
        }

        // Url은 userinfo를 퍼센트 인코딩된 상태로 돌려주므로 디코딩 후 전송
        let username = decode_userinfo(base.username())?;
        let password = base.password().map(decode_userinfo).transpose()?;
        base.set_username("")
            .and_then(|_| base.set_password(None))
            .map_err(|_| ClientError::InvalidAccessUrl("cannot strip credentials".to_string()))?;

        let accounts_url = accounts_endpoint(&base)?;

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ClientError::NetworkError(format!("HTTP client 생성 실패: {}", e)))?;

        Ok(Self {
            client,
            accounts_url,
            username,
            password,
        })
    }

    /// 계좌 조회 엔드포인트 (인증 정보 제외).
    pub fn accounts_url(&self) -> &Url {
        &self.accounts_url
    }

    /// 계좌 스냅샷 조회 (`GET {access_url}/accounts?balances-only=1`).
    pub async fn fetch_accounts(&self) -> ClientResult<AccountSnapshot> {
        let mut request = self.client.get(self.accounts_url.clone());
        if !self.username.is_empty() || self.password.is_some() {
            request = request.basic_auth(&self.username, self.password.as_ref());
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ClientError::Unauthorized(format!(
                "{} - access URL rejected",
                status.as_u16()
            )));
        }

        if !status.is_success() {
            return Err(ClientError::ApiError {
                code: status.as_u16(),
                message: body,
            });
        }

        let snapshot: AccountSnapshot = serde_json::from_str(&body)?;

        for message in &snapshot.errors {
            warn!(message = %message, "SimpleFin reported an error");
        }
        debug!(accounts = snapshot.len(), "SimpleFin accounts fetched");

        Ok(snapshot)
    }
}

#[async_trait]
impl AccountSource for SimpleFinClient {
    fn name(&self) -> &str {
        "simplefin"
    }

    async fn get_accounts(&self) -> ClientResult<AccountSnapshot> {
        self.fetch_accounts().await
    }
}

fn decode_userinfo(raw: &str) -> ClientResult<String> {
    urlencoding::decode(raw)
        .map(|decoded| decoded.into_owned())
        .map_err(|_| ClientError::InvalidAccessUrl("userinfo is not valid UTF-8".to_string()))
}

fn accounts_endpoint(base: &Url) -> ClientResult<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| ClientError::InvalidAccessUrl("access URL cannot be a base".to_string()))?
        .pop_if_empty()
        .push("accounts");
    url.set_query(Some("balances-only=1"));
    Ok(url)
}
