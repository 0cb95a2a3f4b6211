//! Exporter 수명 주기.
//!
//! 초기화(자격증명 결정 → 클라이언트 생성 → 매핑 정책 로드 → 메트릭 서버 바인드)는
//! 한 번만 수행되며, 이후에는 종료 신호를 받을 때까지 폴링 상태에 머무릅니다.
//! 초기화 단계의 실패는 모두 치명적입니다.

use crate::config::CollectorConfig;
use crate::error::CollectorError;
use crate::exporter::MetricExporter;
use crate::metrics::setup_metrics_recorder;
use crate::poller::Poller;
use crate::server::MetricsServer;
use crate::Result;
use metrics_exporter_prometheus::PrometheusHandle;
use secrecy::ExposeSecret;
use simplefin_client::SimpleFinClient;
use simplefin_core::MappingPolicy;
use simplefin_credentials::{
    CredentialResolver, CredentialStore, RedisCredentialStore, SetupTokenClaimer,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// 초기화를 마친 exporter.
pub struct Daemon {
    poller: Poller<SimpleFinClient>,
    server: MetricsServer,
    credential_source: &'static str,
}

impl Daemon {
    /// 설정으로 exporter를 초기화합니다.
    ///
    /// 저장소 레코드가 설정된 경우에만 Redis 저장소를 사용하며, 전역 메트릭
    /// 레코더를 설치합니다.
    pub async fn initialize(config: CollectorConfig) -> Result<Self> {
        let store = build_store(&config)?;
        Self::initialize_with(config, store, setup_metrics_recorder).await
    }

    /// 저장소와 메트릭 레코더 설치 방법을 지정하여 초기화합니다.
    pub async fn initialize_with<F>(
        config: CollectorConfig,
        store: Option<Arc<dyn CredentialStore>>,
        install_recorder: F,
    ) -> Result<Self>
    where
        F: FnOnce() -> Result<PrometheusHandle>,
    {
        let resolver = CredentialResolver::new(store, SetupTokenClaimer::default());
        let resolved = resolver
            .resolve(&config.credentials)
            .await
            .inspect_err(|e| {
                if e.is_claim_error() {
                    error!(
                        "setup tokens can only be claimed once; generate a new one if it was used"
                    );
                }
            })?;

        let client = SimpleFinClient::new(&resolved.credential, config.poll.request_timeout)?;
        if config.poll.request_timeout.is_none() {
            warn!("no request timeout configured; a hung SimpleFin request stalls polling");
        }

        let policy = MappingPolicy::load(config.mappings_file.as_deref())?;
        for account_id in policy.duplicate_mappings() {
            warn!(account_id, "account mapped more than once, using the first mapping");
        }

        let handle = install_recorder()?;
        let server = MetricsServer::bind(config.server.socket_addr(), handle).await?;

        let exporter = MetricExporter::new(Arc::new(policy));
        let poller = Poller::new(client, exporter, config.poll.interval);

        Ok(Self {
            poller,
            server,
            credential_source: resolved.source,
        })
    }

    /// 메트릭 서버 주소.
    pub fn metrics_addr(&self) -> Result<SocketAddr> {
        self.server.local_addr()
    }

    /// Access URL을 제공한 소스 종류.
    pub fn credential_source(&self) -> &'static str {
        self.credential_source
    }

    /// Ctrl+C 또는 SIGTERM을 받을 때까지 실행합니다.
    pub async fn run(self) -> Result<()> {
        let shutdown = CancellationToken::new();
        tokio::spawn(shutdown_signal(shutdown.clone()));
        self.run_until(shutdown).await
    }

    /// `shutdown`이 취소될 때까지 메트릭 서버와 폴링 루프를 실행합니다.
    ///
    /// 메트릭 서버가 종료 요청 없이 멈추면 폴링도 중단하고 에러를 반환합니다.
    pub async fn run_until(self, shutdown: CancellationToken) -> Result<()> {
        let mut server_task = self.server.spawn(shutdown.clone());
        info!(
            interval = ?self.poller.interval(),
            credential_source = self.credential_source,
            "=== polling started ==="
        );

        tokio::select! {
            joined = &mut server_task => {
                let requested = shutdown.is_cancelled();
                shutdown.cancel();
                server_result(joined, requested)
            }
            cycles = self.poller.run(shutdown.clone()) => {
                info!(cycles, "waiting for metrics server to stop");
                server_result(server_task.await, true)
            }
        }
    }
}

fn build_store(config: &CollectorConfig) -> Result<Option<Arc<dyn CredentialStore>>> {
    if config.credentials.store_ref.is_none() {
        return Ok(None);
    }
    let store: Arc<dyn CredentialStore> =
        Arc::new(RedisCredentialStore::open(config.redis_url.expose_secret())?);
    Ok(Some(store))
}

fn server_result(
    joined: std::result::Result<std::io::Result<()>, tokio::task::JoinError>,
    requested: bool,
) -> Result<()> {
    match joined {
        Ok(Ok(())) if requested => {
            info!("Server stopped gracefully");
            Ok(())
        }
        Ok(Ok(())) => Err(CollectorError::ServerStopped),
        Ok(Err(e)) => Err(CollectorError::Server(e)),
        Err(e) => Err(CollectorError::Server(std::io::Error::other(e))),
    }
}

/// Graceful shutdown 시그널 대기.
///
/// Ctrl+C 또는 SIGTERM 시그널을 수신하면 종료 토큰을 취소합니다.
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }

    shutdown.cancel();
}
