//! Wraps an asynchronous action with loading, error and data tracking.
//!
//! An [`ActionRunner`] owns one action and exposes three things: a trigger
//! that runs the action and always resolves to a [`Settled`] value, an
//! observable [`ActionStatus`], and a way to clear the current error. The
//! runner never spawns work itself; it hands each invocation to an injected
//! [`Scheduler`], so the same state machine runs under a UI framework's
//! executor, a `futures` local pool, or a tokio `LocalSet`.

pub mod options;
pub mod runner;
pub mod scheduler;
pub mod status;

pub use options::ActionOptions;
pub use runner::{ActionRunner, InvocationId, Subscription};
#[cfg(feature = "tokio")]
pub use scheduler::TokioLocalScheduler;
pub use scheduler::{LocalSpawnScheduler, ScheduleError, Scheduler};
pub use status::{ActionPhase, ActionStatus, Settled};
