//! `/metrics` 스크레이프 엔드포인트.
//!
//! 폴링 루프와 독립된 태스크로 실행되며, 요청마다 레코더의 현재 게이지 값을
//! 렌더링합니다.

use crate::error::CollectorError;
use crate::Result;
use axum::{extract::State, routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::info;

/// 바인드된 메트릭 서버.
pub struct MetricsServer {
    listener: TcpListener,
    handle: PrometheusHandle,
}

impl MetricsServer {
    /// 주소에 바인드합니다. 실패는 치명적입니다.
    pub async fn bind(addr: SocketAddr, handle: PrometheusHandle) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| CollectorError::Bind { addr, source })?;
        Ok(Self { listener, handle })
    }

    /// 실제 바인드된 주소 (포트 0으로 바인드한 경우 확인용).
    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener.local_addr().map_err(CollectorError::Server)
    }

    /// 서버를 백그라운드 태스크로 시작합니다.
    ///
    /// `shutdown` 토큰이 취소되면 진행 중인 요청을 마치고 종료합니다.
    pub fn spawn(self, shutdown: CancellationToken) -> JoinHandle<std::io::Result<()>> {
        let app = router(self.handle);
        if let Ok(addr) = self.listener.local_addr() {
            info!(%addr, "Metrics available at http://{}/metrics", addr);
        }

        tokio::spawn(async move {
            axum::serve(self.listener, app)
                .with_graceful_shutdown(async move { shutdown.cancelled().await })
                .await
        })
    }
}

/// /metrics 엔드포인트 핸들러.
async fn metrics_handler(State(handle): State<PrometheusHandle>) -> String {
    handle.render()
}

/// 메트릭 라우터 생성.
pub fn router(handle: PrometheusHandle) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(handle)
}
