//! 폴링 루프 통합 테스트

use async_trait::async_trait;
use simplefin_client::{AccountSource, ClientError, ClientResult};
use simplefin_collector::{MetricExporter, PollOutcome, Poller};
use simplefin_core::{AccountRecord, AccountSnapshot, MappingPolicy, Organization};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// 미리 정한 응답을 순서대로 돌려주는 계좌 소스.
#[derive(Clone, Default)]
struct ScriptedSource {
    responses: Arc<Mutex<VecDeque<ClientResult<AccountSnapshot>>>>,
    calls: Arc<AtomicUsize>,
    cancel_after: Option<(usize, CancellationToken)>,
}

impl ScriptedSource {
    fn push(&self, response: ClientResult<AccountSnapshot>) {
        self.responses.lock().unwrap().push_back(response);
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AccountSource for ScriptedSource {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn get_accounts(&self) -> ClientResult<AccountSnapshot> {
        let calls = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some((limit, token)) = &self.cancel_after {
            if calls >= *limit {
                token.cancel();
            }
        }
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(AccountSnapshot::default()))
    }
}

fn snapshot() -> AccountSnapshot {
    AccountSnapshot::new(vec![AccountRecord {
        id: "A1".to_string(),
        name: "Checking".to_string(),
        org: Organization {
            domain: "bank.example".to_string(),
            name: None,
        },
        currency: "USD".to_string(),
        balance: "100.50".to_string(),
        available_balance: "90.00".to_string(),
        balance_date: 1_700_000_000,
    }])
}

fn exporter() -> MetricExporter {
    MetricExporter::new(Arc::new(MappingPolicy::empty()))
}

#[tokio::test]
async fn test_poll_once_exports_snapshot() {
    let source = ScriptedSource::default();
    source.push(Ok(snapshot()));
    let poller = Poller::new(source.clone(), exporter(), Duration::from_secs(60));

    match poller.poll_once().await {
        PollOutcome::Exported(stats) => {
            assert_eq!(stats.total, 1);
            assert_eq!(stats.exported, 1);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(source.calls(), 1);
}

#[tokio::test]
async fn test_fetch_failure_skips_export() {
    let source = ScriptedSource::default();
    source.push(Err(ClientError::Unauthorized("403 - access URL rejected".into())));
    let poller = Poller::new(source, exporter(), Duration::from_secs(60));

    let outcome = poller.poll_once().await;

    assert!(!outcome.is_success());
    assert!(matches!(outcome, PollOutcome::FetchFailed(ref msg) if msg.contains("403")));
}

#[tokio::test(start_paused = true)]
async fn test_run_keeps_polling_after_failures_until_cancelled() {
    let shutdown = CancellationToken::new();
    let source = ScriptedSource {
        cancel_after: Some((3, shutdown.clone())),
        ..Default::default()
    };
    source.push(Err(ClientError::NetworkError("connection refused".into())));
    source.push(Ok(snapshot()));
    source.push(Err(ClientError::ApiError {
        code: 502,
        message: "bad gateway".into(),
    }));

    let poller = Poller::new(source.clone(), exporter(), Duration::from_secs(3600));
    let cycles = poller.run(shutdown).await;

    assert_eq!(cycles, 3);
    assert_eq!(source.calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_sleep_is_fixed_interval_between_polls() {
    let source = ScriptedSource::default();
    let poller = Arc::new(Poller::new(
        source.clone(),
        exporter(),
        Duration::from_secs(600),
    ));
    let shutdown = CancellationToken::new();

    let task = {
        let poller = poller.clone();
        let shutdown = shutdown.clone();
        tokio::spawn(async move { poller.run(shutdown).await })
    };

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(source.calls(), 1);

    tokio::time::sleep(Duration::from_secs(600)).await;
    assert_eq!(source.calls(), 2);

    shutdown.cancel();
    assert_eq!(task.await.unwrap(), 2);
}

#[tokio::test]
async fn test_cancelled_before_start_does_not_poll() {
    let source = ScriptedSource::default();
    let poller = Poller::new(source.clone(), exporter(), Duration::from_secs(60));
    let shutdown = CancellationToken::new();
    shutdown.cancel();

    assert_eq!(poller.run(shutdown).await, 0);
    assert_eq!(source.calls(), 0);
}
