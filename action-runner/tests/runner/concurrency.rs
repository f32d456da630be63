use action_runner::{ActionPhase, Settled};
use test_helpers::{controlled, spawn_runtime};

#[tokio::test]
async fn last_to_settle_wins() -> anyhow::Result<()> {
    let rt = spawn_runtime();
    let (action, mut calls) = controlled::<u32, u32, String>();
    let runner = rt.runner("search", action);

    let (first, second) = rt
        .run_until(async {
            let first = runner.trigger(1);
            let second = runner.trigger(2);
            let call_one = calls.next().await.unwrap();
            let call_two = calls.next().await.unwrap();
            assert_eq!(runner.in_flight(), 2);

            call_two.resolve(20);
            let second = second.await;
            // one call still in flight
            assert!(runner.status().is_loading);
            assert_eq!(runner.status().phase, ActionPhase::Pending);
            assert_eq!(runner.status().data, Some(20));

            call_one.resolve(10);
            (first.await, second)
        })
        .await;

    assert_eq!(first, Settled::Data(10));
    assert_eq!(second, Settled::Data(20));
    let status = runner.status();
    assert!(!status.is_loading);
    assert_eq!(status.data, Some(10));
    assert_eq!(status.phase, ActionPhase::Succeeded);

    Ok(())
}

#[tokio::test]
async fn late_failure_overwrites_earlier_success() -> anyhow::Result<()> {
    let rt = spawn_runtime();
    let (action, mut calls) = controlled::<u32, u32, String>();
    let runner = rt.runner("search", action);

    rt.run_until(async {
        let first = runner.trigger(1);
        let second = runner.trigger(2);
        let call_one = calls.next().await.unwrap();
        let call_two = calls.next().await.unwrap();

        call_one.resolve(10);
        first.await;
        call_two.reject("timeout".into());
        second.await;
    })
    .await;

    let status = runner.status();
    assert!(!status.is_loading);
    assert_eq!(status.data, None);
    assert_eq!(status.error.as_deref(), Some("timeout"));
    assert_eq!(status.phase, ActionPhase::Failed);

    Ok(())
}

#[tokio::test]
async fn dropped_runtime_abandons_in_flight_calls() -> anyhow::Result<()> {
    let rt = spawn_runtime();
    let (action, mut calls) = controlled::<(), (), String>();
    let runner = rt.runner("upload", action);

    let in_flight = runner.trigger(());
    rt.run_until(calls.next()).await.unwrap();
    assert!(runner.status().is_loading);

    drop(rt);

    assert_eq!(in_flight.await, Settled::Abandoned);
    let status = runner.status();
    assert!(!status.is_loading);
    assert_eq!(status.phase, ActionPhase::Idle);
    assert_eq!(runner.in_flight(), 0);

    // nothing left to run new calls either
    assert_eq!(runner.trigger(()).await, Settled::Abandoned);
    assert!(!runner.status().is_loading);

    Ok(())
}
