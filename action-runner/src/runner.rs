use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::{Rc, Weak};

use derive_more::Display;
use futures::FutureExt;
use futures::channel::oneshot;
use futures::future::LocalBoxFuture;

use crate::{ActionOptions, ActionPhase, ActionStatus, Scheduler, Settled};

type BoxedAction<A, T, E> =
    Rc<dyn Fn(A) -> LocalBoxFuture<'static, Result<T, E>>>;
type Listener<T, E> = Rc<dyn Fn(&ActionStatus<T, E>)>;

/// Sequence number of one trigger call, unique per runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
#[display("#{_0}")]
pub struct InvocationId(pub u64);

/// Runs an asynchronous action and tracks its loading, error and data.
///
/// Cloning is cheap and yields a handle to the same state. Every call to
/// [`trigger`](Self::trigger) starts an independent invocation; overlapping
/// invocations are not cancelled, and whichever settles last determines the
/// final `data`/`error`.
///
/// # Example
///
/// ```rust
/// use action_runner::{ActionRunner, LocalSpawnScheduler, Settled};
/// use futures::executor::LocalPool;
///
/// let mut pool = LocalPool::new();
/// let runner = ActionRunner::new(
///     |name: String| async move { Ok::<_, String>(format!("saved {name}")) },
///     LocalSpawnScheduler::new(pool.spawner()),
/// );
///
/// let settled = pool.run_until(runner.trigger("draft".to_string()));
/// assert_eq!(settled, Settled::Data("saved draft".to_string()));
/// assert_eq!(runner.status().data.as_deref(), Some("saved draft"));
/// assert!(!runner.status().is_loading);
/// ```
pub struct ActionRunner<A, T, E> {
    inner: Rc<Inner<A, T, E>>,
}

struct Inner<A, T, E> {
    action: RefCell<BoxedAction<A, T, E>>,
    scheduler: Box<dyn Scheduler>,
    options: ActionOptions,
    state: RefCell<State<T, E>>,
    listeners: RefCell<Vec<(u64, Listener<T, E>)>>,
    next_listener: Cell<u64>,
    next_invocation: Cell<u64>,
}

struct State<T, E> {
    status: ActionStatus<T, E>,
    in_flight: usize,
    last_settled: ActionPhase,
    revision: u64,
}

impl<T, E> State<T, E> {
    fn begin(&mut self, clear_data: bool) {
        self.in_flight += 1;
        self.status.is_loading = true;
        self.status.phase = ActionPhase::Pending;
        self.status.error = None;
        if clear_data {
            self.status.data = None;
        }
    }

    fn finish(&mut self, outcome: Option<Result<T, E>>) {
        self.in_flight = self.in_flight.saturating_sub(1);
        match outcome {
            Some(Ok(data)) => {
                self.status.data = Some(data);
                self.status.error = None;
                self.last_settled = ActionPhase::Succeeded;
            }
            Some(Err(error)) => {
                self.status.error = Some(error);
                self.status.data = None;
                self.last_settled = ActionPhase::Failed;
            }
            None => {}
        }
        if self.in_flight == 0 {
            self.status.is_loading = false;
            self.status.phase = self.last_settled;
        }
    }
}

impl<A, T, E> Clone for ActionRunner<A, T, E> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<A, T, E> PartialEq for ActionRunner<A, T, E> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<A, T, E> ActionRunner<A, T, E>
where
    A: 'static,
    T: Clone + 'static,
    E: Clone + 'static,
{
    pub fn new<F, Fut>(action: F, scheduler: impl Scheduler + 'static) -> Self
    where
        F: Fn(A) -> Fut + 'static,
        Fut: Future<Output = Result<T, E>> + 'static,
    {
        Self::with_options(action, scheduler, ActionOptions::default())
    }

    pub fn with_options<F, Fut>(
        action: F,
        scheduler: impl Scheduler + 'static,
        options: ActionOptions,
    ) -> Self
    where
        F: Fn(A) -> Fut + 'static,
        Fut: Future<Output = Result<T, E>> + 'static,
    {
        Self {
            inner: Rc::new(Inner {
                action: RefCell::new(box_action(action)),
                scheduler: Box::new(scheduler),
                options,
                state: RefCell::new(State {
                    status: ActionStatus::default(),
                    in_flight: 0,
                    last_settled: ActionPhase::Idle,
                    revision: 0,
                }),
                listeners: RefCell::new(Vec::new()),
                next_listener: Cell::new(0),
                next_invocation: Cell::new(0),
            }),
        }
    }

    pub fn options(&self) -> &ActionOptions {
        &self.inner.options
    }

    /// Snapshot of the current status.
    pub fn status(&self) -> ActionStatus<T, E> {
        self.inner.state.borrow().status.clone()
    }

    /// Counter bumped on every status change, before listeners are notified.
    ///
    /// Compare a value read alongside a [`status`](Self::status) snapshot
    /// with a later one to detect changes made while nobody was subscribed.
    pub fn revision(&self) -> u64 {
        self.inner.state.borrow().revision
    }

    /// Number of invocations scheduled but not yet settled.
    pub fn in_flight(&self) -> usize {
        self.inner.state.borrow().in_flight
    }

    /// Start an invocation with `args`.
    ///
    /// The previous error is cleared and the runner is marked loading before
    /// this returns. The returned future resolves once the action settles and
    /// the status has been updated; it never fails, and it does not need to
    /// be polled for the invocation to make progress.
    pub fn trigger(
        &self,
        args: A,
    ) -> impl Future<Output = Settled<T, E>> + use<A, T, E> {
        let inner = &self.inner;
        let id = InvocationId(inner.next_invocation.get());
        inner.next_invocation.set(id.0 + 1);

        let action = inner.action.borrow().clone();
        let clear_data = inner.options.clear_data_on_start;
        inner.update(|state| state.begin(clear_data));
        tracing::debug!(
            action = %inner.options.label,
            invocation = %id,
            "Triggered action"
        );

        let (tx, rx) = oneshot::channel();

        // Fires if the scheduler drops the work before it settles.
        let guard = {
            let inner = inner.clone();
            AbandonGuard::new(move || inner.abandon(id))
        };

        let work = {
            let inner = inner.clone();
            async move {
                let result = action(args).await;
                guard.disarm();
                let settled = inner.settle(id, result);
                // the caller may have dropped the trigger future
                let _ = tx.send(settled);
            }
            .boxed_local()
        };

        if let Err(e) = inner.scheduler.schedule(work) {
            tracing::error!(
                action = %inner.options.label,
                invocation = %id,
                "Failed to schedule action: {e}"
            );
        }

        rx.map(|settled| settled.unwrap_or(Settled::Abandoned))
    }

    /// Reset the error without touching loading, data or phase.
    pub fn clear_error(&self) {
        self.inner.update(|state| state.status.error = None);
    }

    /// Swap the action used by future triggers. Invocations already in
    /// flight finish with the action they started with.
    pub fn replace_action<F, Fut>(&self, action: F)
    where
        F: Fn(A) -> Fut + 'static,
        Fut: Future<Output = Result<T, E>> + 'static,
    {
        *self.inner.action.borrow_mut() = box_action(action);
    }

    /// Register a listener that receives the status after every change.
    ///
    /// The listener is removed when the returned [`Subscription`] is dropped.
    /// A listener that captures this runner keeps it alive until then.
    pub fn subscribe(
        &self,
        listener: impl Fn(&ActionStatus<T, E>) + 'static,
    ) -> Subscription {
        let inner = &self.inner;
        let key = inner.next_listener.get();
        inner.next_listener.set(key + 1);
        let listener: Listener<T, E> = Rc::new(listener);
        inner.listeners.borrow_mut().push((key, listener));

        let weak: Weak<Inner<A, T, E>> = Rc::downgrade(inner);
        Subscription {
            unsubscribe: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.listeners.borrow_mut().retain(|(k, _)| *k != key);
                }
            })),
        }
    }
}

impl<A, T, E> Inner<A, T, E>
where
    T: Clone,
    E: Clone,
{
    /// Apply `f` to the state, then notify listeners once with the result.
    /// No borrow is held while listeners run, so they may call back in.
    fn update(&self, f: impl FnOnce(&mut State<T, E>)) {
        let snapshot = {
            let mut state = self.state.borrow_mut();
            f(&mut state);
            state.revision += 1;
            state.status.clone()
        };
        let listeners: Vec<Listener<T, E>> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener(&snapshot);
        }
    }

    fn settle(&self, id: InvocationId, result: Result<T, E>) -> Settled<T, E> {
        match &result {
            Ok(_) => tracing::debug!(
                action = %self.options.label,
                invocation = %id,
                "Action succeeded"
            ),
            Err(_) => tracing::debug!(
                action = %self.options.label,
                invocation = %id,
                "Action failed"
            ),
        }
        let settled = Settled::from(result.clone());
        self.update(|state| state.finish(Some(result)));
        settled
    }

    fn abandon(&self, id: InvocationId) {
        tracing::warn!(
            action = %self.options.label,
            invocation = %id,
            "Action was dropped before it settled"
        );
        self.update(|state| state.finish(None));
    }
}

/// Keeps a status listener registered. Dropping it unsubscribes.
#[must_use = "the listener is removed as soon as the subscription is dropped"]
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce()>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

struct AbandonGuard {
    on_drop: Option<Box<dyn FnOnce()>>,
}

impl AbandonGuard {
    fn new(on_drop: impl FnOnce() + 'static) -> Self {
        Self {
            on_drop: Some(Box::new(on_drop)),
        }
    }

    fn disarm(mut self) {
        self.on_drop = None;
    }
}

impl Drop for AbandonGuard {
    fn drop(&mut self) {
        if let Some(on_drop) = self.on_drop.take() {
            on_drop();
        }
    }
}

fn box_action<A, T, E, F, Fut>(action: F) -> BoxedAction<A, T, E>
where
    F: Fn(A) -> Fut + 'static,
    Fut: Future<Output = Result<T, E>> + 'static,
{
    Rc::new(move |args| action(args).boxed_local())
}
