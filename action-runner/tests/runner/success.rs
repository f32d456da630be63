use action_runner::{ActionPhase, Settled};
use test_helpers::{MockAction, controlled, spawn_runtime};

#[tokio::test]
async fn resolves_with_data() -> anyhow::Result<()> {
    let rt = spawn_runtime();
    let mock = MockAction::<(), &str, String>::resolved("mockData");
    let runner = rt.runner("save", mock.action());

    let settled = rt.run_until(runner.trigger(())).await;

    assert_eq!(settled, Settled::Data("mockData"));
    assert_eq!(mock.call_count(), 1);
    let status = runner.status();
    assert!(!status.is_loading);
    assert_eq!(status.error, None);
    assert_eq!(status.data, Some("mockData"));
    assert_eq!(status.phase, ActionPhase::Succeeded);

    Ok(())
}

#[tokio::test]
async fn forwards_arguments_verbatim() -> anyhow::Result<()> {
    let rt = spawn_runtime();
    let mock = MockAction::<(u32, String), (), ()>::resolved(());
    let runner = rt.runner("rename", mock.action());

    rt.run_until(runner.trigger((7, "kitchen".to_string()))).await;
    rt.run_until(runner.trigger((8, "garage".to_string()))).await;

    assert_eq!(
        mock.calls(),
        vec![(7, "kitchen".to_string()), (8, "garage".to_string())]
    );

    Ok(())
}

#[tokio::test]
async fn loading_while_action_is_in_flight() -> anyhow::Result<()> {
    let rt = spawn_runtime();
    let (action, mut calls) = controlled::<&str, String, String>();
    let runner = rt.runner("load", action);

    let settled = runner.trigger("first");
    assert!(runner.status().is_loading);
    assert!(runner.status().is_initial_loading());
    assert_eq!(runner.status().phase, ActionPhase::Pending);

    let settled = rt
        .run_until(async {
            let call = calls.next().await.expect("action was not called");
            assert_eq!(call.args, "first");
            assert!(runner.status().is_loading);
            call.resolve("done".to_string());
            settled.await
        })
        .await;

    assert_eq!(settled, Settled::Data("done".to_string()));
    assert!(!runner.status().is_loading);
    assert_eq!(runner.status().data.as_deref(), Some("done"));

    Ok(())
}

#[tokio::test]
async fn success_after_failure_clears_error() -> anyhow::Result<()> {
    let rt = spawn_runtime();
    let (action, mut calls) = controlled::<(), u32, String>();
    let runner = rt.runner("retry", action);

    rt.run_until(async {
        let first = runner.trigger(());
        calls.next().await.unwrap().reject("Mock Error".into());
        first.await;
        assert!(runner.status().has_error());

        let second = runner.trigger(());
        calls.next().await.unwrap().resolve(42);
        assert_eq!(second.await, Settled::Data(42));
    })
    .await;

    let status = runner.status();
    assert_eq!(status.error, None);
    assert_eq!(status.data, Some(42));
    assert_eq!(status.phase, ActionPhase::Succeeded);

    Ok(())
}
