use std::future::Future;
use std::rc::Rc;

use action_runner::{ActionOptions, ActionRunner, TokioLocalScheduler};
use tokio::task::LocalSet;
use tracing_log::LogTracer;
use tracing_subscriber::util::SubscriberInitExt;

pub mod mock;
pub mod telemetry;

pub use mock::{MockAction, PendingCall, PendingCalls, controlled};

/// A tokio `LocalSet` that runners under test schedule their work on.
pub struct TestRuntime {
    pub local: Rc<LocalSet>,
}

impl TestRuntime {
    pub fn scheduler(&self) -> TokioLocalScheduler {
        TokioLocalScheduler::new(&self.local)
    }

    /// Build a runner whose invocations run on this runtime.
    pub fn runner<A, T, E, F, Fut>(
        &self,
        label: &str,
        action: F,
    ) -> ActionRunner<A, T, E>
    where
        A: 'static,
        T: Clone + 'static,
        E: Clone + 'static,
        F: Fn(A) -> Fut + 'static,
        Fut: Future<Output = Result<T, E>> + 'static,
    {
        ActionRunner::with_options(
            action,
            self.scheduler(),
            ActionOptions::new(label),
        )
    }

    /// Drive `future` to completion, polling scheduled work alongside it.
    pub async fn run_until<F: Future>(&self, future: F) -> F::Output {
        self.local.run_until(future).await
    }
}

/// Set up logging and a fresh runtime for one test.
pub fn spawn_runtime() -> TestRuntime {
    let subscriber = telemetry::get_subscriber("error".into());
    let _ = LogTracer::init();
    let _ = subscriber.try_init();

    TestRuntime {
        local: Rc::new(LocalSet::new()),
    }
}
