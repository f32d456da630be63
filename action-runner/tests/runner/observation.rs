use std::cell::RefCell;
use std::rc::Rc;

use action_runner::ActionStatus;
use test_helpers::{MockAction, spawn_runtime};

#[tokio::test]
async fn subscribers_see_every_transition() -> anyhow::Result<()> {
    let rt = spawn_runtime();
    let mock = MockAction::<(), &str, String>::rejected("Mock Error".into());
    let runner = rt.runner("save", mock.action());

    let seen: Rc<RefCell<Vec<ActionStatus<&str, String>>>> = Rc::default();
    let sink = seen.clone();
    let subscription = runner.subscribe(move |status| {
        sink.borrow_mut().push(status.clone());
    });

    rt.run_until(runner.trigger(())).await;
    runner.clear_error();

    {
        let seen = seen.borrow();
        assert_eq!(seen.len(), 3);
        assert!(seen[0].is_loading);
        assert_eq!(seen[1].error.as_deref(), Some("Mock Error"));
        assert!(!seen[1].is_loading);
        assert_eq!(seen[2].error, None);
        assert!(seen.iter().all(|s| !(s.has_error() && s.has_data())));
    }

    drop(subscription);
    rt.run_until(runner.trigger(())).await;
    assert_eq!(seen.borrow().len(), 3);

    Ok(())
}

#[tokio::test]
async fn subscription_outliving_runner_is_harmless() -> anyhow::Result<()> {
    let rt = spawn_runtime();
    let mock = MockAction::<(), u8, ()>::resolved(1);
    let runner = rt.runner("save", mock.action());

    let subscription = runner.subscribe(|_| {});
    drop(runner);
    drop(subscription);

    Ok(())
}
