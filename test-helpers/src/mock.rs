//! Scripted actions for exercising runners.
//!
//! [`MockAction`] settles immediately with a fixed result and records its
//! calls. [`controlled`] returns an action whose calls stay pending until the
//! test resolves them, for checking in-flight state and overlapping calls.

use std::cell::RefCell;
use std::rc::Rc;

use futures::StreamExt;
use futures::channel::{mpsc, oneshot};
use futures::future::{self, LocalBoxFuture, Ready};

/// An action that always returns the same result.
pub struct MockAction<A, T, E> {
    result: Result<T, E>,
    calls: Rc<RefCell<Vec<A>>>,
}

impl<A, T, E> MockAction<A, T, E>
where
    A: 'static,
    T: Clone + 'static,
    E: Clone + 'static,
{
    pub fn resolved(data: T) -> Self {
        Self {
            result: Ok(data),
            calls: Rc::default(),
        }
    }

    pub fn rejected(error: E) -> Self {
        Self {
            result: Err(error),
            calls: Rc::default(),
        }
    }

    /// The action to hand to a runner. Every clone records into this mock.
    pub fn action(&self) -> impl Fn(A) -> Ready<Result<T, E>> + 'static {
        let result = self.result.clone();
        let calls = self.calls.clone();
        move |args| {
            calls.borrow_mut().push(args);
            future::ready(result.clone())
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn calls(&self) -> Vec<A>
    where
        A: Clone,
    {
        self.calls.borrow().clone()
    }
}

/// A call to a [`controlled`] action that is waiting for its result.
pub struct PendingCall<A, T, E> {
    pub args: A,
    reply: oneshot::Sender<Result<T, E>>,
}

impl<A, T, E> PendingCall<A, T, E> {
    pub fn resolve(self, data: T) {
        let _ = self.reply.send(Ok(data));
    }

    pub fn reject(self, error: E) {
        let _ = self.reply.send(Err(error));
    }
}

/// Receives calls made to a [`controlled`] action, in call order.
pub struct PendingCalls<A, T, E> {
    calls: mpsc::UnboundedReceiver<PendingCall<A, T, E>>,
}

impl<A, T, E> PendingCalls<A, T, E> {
    /// Wait for the action to be invoked. Returns `None` once the action has
    /// been dropped and every call has been received.
    pub async fn next(&mut self) -> Option<PendingCall<A, T, E>> {
        self.calls.next().await
    }
}

/// An action whose calls stay pending until the test settles them.
///
/// A call whose [`PendingCall`] is dropped unsettled never completes.
pub fn controlled<A, T, E>() -> (
    impl Fn(A) -> LocalBoxFuture<'static, Result<T, E>> + 'static,
    PendingCalls<A, T, E>,
)
where
    A: 'static,
    T: 'static,
    E: 'static,
{
    let (tx, rx) = mpsc::unbounded();
    let action = move |args: A| -> LocalBoxFuture<'static, Result<T, E>> {
        let (reply, settled) = oneshot::channel();
        let _ = tx.unbounded_send(PendingCall { args, reply });
        Box::pin(async move {
            match settled.await {
                Ok(result) => result,
                Err(_) => future::pending().await,
            }
        })
    };
    (action, PendingCalls { calls: rx })
}
