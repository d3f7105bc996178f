// tests/runtime_fake_backend.rs

mod common;
use crate::common::init_tracing;

use std::error::Error;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tokio::time::{timeout, Duration};

use assetpipe::engine::{CoreRuntime, Runtime, RuntimeEvent, RuntimeOptions, TriggerReason};
use assetpipe::types::ResourceKind;
use assetpipe_test_utils::fake_backend::FakeBackend;

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn runtime_with_fake_backend_runs_startup_builds_and_exits() -> TestResult {
    init_tracing();

    let (tx, rx) = mpsc::channel::<RuntimeEvent>(16);
    let dispatched = Arc::new(Mutex::new(Vec::new()));
    let settled = Arc::new(AtomicUsize::new(0));

    let backend = FakeBackend::new(tx.clone(), Arc::clone(&dispatched));
    let core = CoreRuntime::new(RuntimeOptions {
        exit_when_idle: true,
    });
    let counter = Arc::clone(&settled);
    let runtime = Runtime::new(core, rx, backend).with_on_settled(Some(Box::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    })));

    for kind in ResourceKind::ALL {
        tx.send(RuntimeEvent::PipelineTriggered {
            kind,
            reason: TriggerReason::Startup,
        })
        .await?;
    }
    tx.send(RuntimeEvent::StartupComplete).await?;
    drop(tx);

    timeout(Duration::from_secs(5), runtime.run()).await??;

    let dispatched = dispatched.lock().unwrap().clone();
    assert_eq!(
        dispatched,
        vec![
            (ResourceKind::Script, TriggerReason::Startup),
            (ResourceKind::Style, TriggerReason::Startup),
        ]
    );
    assert_eq!(settled.load(Ordering::SeqCst), 1);
    Ok(())
}

#[tokio::test]
async fn runtime_keeps_watching_until_shutdown() -> TestResult {
    init_tracing();

    let (tx, rx) = mpsc::channel::<RuntimeEvent>(16);
    let dispatched = Arc::new(Mutex::new(Vec::new()));
    let settled = Arc::new(AtomicUsize::new(0));

    let backend = FakeBackend::new(tx.clone(), Arc::clone(&dispatched));
    let core = CoreRuntime::new(RuntimeOptions {
        exit_when_idle: false,
    });
    let counter = Arc::clone(&settled);
    let runtime = Runtime::new(core, rx, backend).with_on_settled(Some(Box::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    })));

    let handle = tokio::spawn(runtime.run());

    tx.send(RuntimeEvent::StartupComplete).await?;
    tx.send(RuntimeEvent::PipelineTriggered {
        kind: ResourceKind::Style,
        reason: TriggerReason::FileWatch,
    })
    .await?;

    // Startup settle plus the settle after the style run.
    timeout(Duration::from_secs(5), async {
        while settled.load(Ordering::SeqCst) < 2 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await?;

    tx.send(RuntimeEvent::ShutdownRequested).await?;
    timeout(Duration::from_secs(5), handle).await???;

    assert_eq!(
        dispatched.lock().unwrap().clone(),
        vec![(ResourceKind::Style, TriggerReason::FileWatch)]
    );
    Ok(())
}
