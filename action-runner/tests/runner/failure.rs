use action_runner::{ActionPhase, Settled};
use test_helpers::{MockAction, controlled, spawn_runtime};

#[derive(Debug, Clone, PartialEq)]
struct MockError(String);

#[tokio::test]
async fn rejects_with_error() -> anyhow::Result<()> {
    let rt = spawn_runtime();
    let mock =
        MockAction::<(), String, _>::rejected(MockError("Mock Error".into()));
    let runner = rt.runner("save", mock.action());

    let settled = rt.run_until(runner.trigger(())).await;

    assert_eq!(settled, Settled::Error(MockError("Mock Error".into())));
    assert_eq!(mock.call_count(), 1);
    let status = runner.status();
    assert!(!status.is_loading);
    assert!(status.has_error());
    assert_eq!(status.error, Some(MockError("Mock Error".into())));
    assert_eq!(status.data, None);
    assert_eq!(status.phase, ActionPhase::Failed);

    Ok(())
}

#[tokio::test]
async fn clear_error_leaves_data_and_loading() -> anyhow::Result<()> {
    let rt = spawn_runtime();
    let mock =
        MockAction::<(), String, _>::rejected(MockError("Mock Error".into()));
    let runner = rt.runner("save", mock.action());

    rt.run_until(runner.trigger(())).await;
    assert!(runner.status().has_error());

    runner.clear_error();

    let status = runner.status();
    assert_eq!(status.error, None);
    assert!(!status.is_loading);
    assert_eq!(status.data, None);

    Ok(())
}

#[tokio::test]
async fn failure_discards_previous_data() -> anyhow::Result<()> {
    let rt = spawn_runtime();
    let (action, mut calls) = controlled::<(), &str, MockError>();
    let runner = rt.runner("save", action);

    rt.run_until(async {
        let first = runner.trigger(());
        calls.next().await.unwrap().resolve("saved");
        first.await;
        assert_eq!(runner.status().data, Some("saved"));

        let second = runner.trigger(());
        // stale data stays visible while the next call is pending
        assert_eq!(runner.status().data, Some("saved"));
        calls.next().await.unwrap().reject(MockError("offline".into()));
        second.await;
    })
    .await;

    let status = runner.status();
    assert_eq!(status.data, None);
    assert_eq!(status.error, Some(MockError("offline".into())));

    Ok(())
}

#[tokio::test]
async fn clear_error_while_pending_keeps_loading() -> anyhow::Result<()> {
    let rt = spawn_runtime();
    let (action, mut calls) = controlled::<(), (), MockError>();
    let runner = rt.runner("save", action);

    rt.run_until(async {
        let pending = runner.trigger(());
        let call = calls.next().await.unwrap();

        runner.clear_error();
        assert!(runner.status().is_loading);
        assert_eq!(runner.status().phase, ActionPhase::Pending);

        call.reject(MockError("late".into()));
        pending.await;
    })
    .await;

    assert_eq!(runner.status().error, Some(MockError("late".into())));

    Ok(())
}
