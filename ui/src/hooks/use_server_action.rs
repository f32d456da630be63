use std::future::Future;
use std::rc::Rc;

use action_runner::{
    ActionOptions, ActionRunner, ActionStatus, ScheduleError, Scheduler,
    Settled, Subscription,
};
use futures::future::LocalBoxFuture;
use yew::prelude::*;

/// Runs action invocations on Yew's platform executor.
#[derive(Debug, Clone, Copy, Default)]
pub struct YewScheduler;

impl Scheduler for YewScheduler {
    fn schedule(
        &self,
        work: LocalBoxFuture<'static, ()>,
    ) -> Result<(), ScheduleError> {
        yew::platform::spawn_local(work);
        Ok(())
    }
}

/// Handle for triggering a server action from a component.
pub struct ServerAction<A, T, E> {
    runner: ActionRunner<A, T, E>,
}

impl<A, T, E> Clone for ServerAction<A, T, E> {
    fn clone(&self) -> Self {
        Self {
            runner: self.runner.clone(),
        }
    }
}

impl<A, T, E> PartialEq for ServerAction<A, T, E> {
    fn eq(&self, other: &Self) -> bool {
        self.runner == other.runner
    }
}

impl<A, T, E> ServerAction<A, T, E>
where
    A: 'static,
    T: Clone + 'static,
    E: Clone + 'static,
{
    /// Run the action. The returned future resolves with the outcome after
    /// the status has been updated, and never fails.
    pub fn run(
        &self,
        args: A,
    ) -> impl Future<Output = Settled<T, E>> + use<A, T, E> {
        self.runner.trigger(args)
    }

    /// Run the action without waiting for its outcome.
    pub fn emit(&self, args: A) {
        drop(self.runner.trigger(args));
    }

    /// Build a callback that runs the action with arguments derived from the
    /// callback's input, e.g. an event.
    pub fn reform<I, F>(&self, f: F) -> Callback<I>
    where
        I: 'static,
        F: Fn(I) -> A + 'static,
    {
        let action = self.clone();
        Callback::from(move |input| action.emit(f(input)))
    }
}

/// Wraps an async server action with loading, error and result tracking.
///
/// Returns `(action, status, clear_error)`. The status re-renders the
/// component on every change: the error is cleared as soon as the action is
/// run, `is_loading` stays true until every run has settled, and the last
/// run to settle decides `data`/`error`. The previous result stays visible
/// while a new run is pending.
///
/// The latest `action` closure passed in is used for each run, so it may
/// capture props or state from the current render.
///
/// # Example
///
/// ```ignore
/// #[function_component]
/// fn RenameButton(props: &Props) -> Html {
///     let site_id = props.site_id;
///     let (rename, status, clear_error) = use_server_action(
///         move |name: String| async move {
///             get_api_client()
///                 .rename_site(site_id, &name)
///                 .await
///                 .map_err(|e| e.to_string())
///         },
///     );
///
///     html! {
///         <>
///             <button
///                 disabled={status.is_loading}
///                 onclick={rename.reform(|_: MouseEvent| "New name".into())}
///             >
///                 {"Rename"}
///             </button>
///             {if let Some(error) = &status.error {
///                 html! {
///                     <p onclick={clear_error.reform(|_: MouseEvent| ())}>
///                         {error}
///                     </p>
///                 }
///             } else {
///                 html! {}
///             }}
///         </>
///     }
/// }
/// ```
#[hook]
pub fn use_server_action<A, T, E, F, Fut>(
    action: F,
) -> (ServerAction<A, T, E>, ActionStatus<T, E>, Callback<()>)
where
    A: 'static,
    T: Clone + 'static,
    E: Clone + 'static,
    F: Fn(A) -> Fut + 'static,
    Fut: Future<Output = Result<T, E>> + 'static,
{
    use_server_action_with_options(action, ActionOptions::default())
}

/// [`use_server_action`] with runner options. The options are read once,
/// when the component mounts.
#[hook]
pub fn use_server_action_with_options<A, T, E, F, Fut>(
    action: F,
    options: ActionOptions,
) -> (ServerAction<A, T, E>, ActionStatus<T, E>, Callback<()>)
where
    A: 'static,
    T: Clone + 'static,
    E: Clone + 'static,
    F: Fn(A) -> Fut + 'static,
    Fut: Future<Output = Result<T, E>> + 'static,
{
    let force_update = use_force_update();
    let slot = use_mut_ref(|| None::<ActionRunner<A, T, E>>);

    let runner = {
        let mut slot = slot.borrow_mut();
        match slot.as_ref() {
            Some(runner) => {
                runner.replace_action(action);
                runner.clone()
            }
            None => {
                let runner =
                    ActionRunner::with_options(action, YewScheduler, options);
                tracing::debug!(
                    "Mounted server action {}",
                    runner.options().label
                );
                *slot = Some(runner.clone());
                runner
            }
        }
    };

    let status = runner.status();
    let rendered = runner.revision();

    // Re-render on every status change while mounted. Effects of children
    // run before ours, so changes since the first render are caught up here.
    {
        let runner = runner.clone();
        use_effect_with((), move |_| {
            let subscription = watch(&runner, rendered, move || {
                force_update.force_update()
            });
            move || drop(subscription)
        });
    }

    let clear_error = {
        let runner = runner.clone();
        use_callback((), move |_, _| runner.clear_error())
    };

    (ServerAction { runner }, status, clear_error)
}

/// Subscribe `on_change` to the runner, firing it once right away if the
/// status moved on since `rendered` was read.
fn watch<A, T, E>(
    runner: &ActionRunner<A, T, E>,
    rendered: u64,
    on_change: impl Fn() + 'static,
) -> Subscription
where
    A: 'static,
    T: Clone + 'static,
    E: Clone + 'static,
{
    let on_change = Rc::new(on_change);
    let subscription = {
        let on_change = on_change.clone();
        runner.subscribe(move |_| on_change())
    };
    if runner.revision() != rendered {
        on_change();
    }
    subscription
}
