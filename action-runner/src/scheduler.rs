use std::rc::Rc;

use futures::future::LocalBoxFuture;
use futures::task::{LocalSpawn, LocalSpawnExt, SpawnError};

/// Capability to run deferred work on a single-threaded executor.
///
/// All invocations of a runner go through one scheduler, which is expected to
/// poll them cooperatively on the thread that owns the runner. Work that is
/// refused or dropped before completion is reported to the trigger caller as
/// abandoned.
pub trait Scheduler {
    fn schedule(
        &self,
        work: LocalBoxFuture<'static, ()>,
    ) -> Result<(), ScheduleError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error("executor refused the work: {0}")]
    Spawn(#[from] SpawnError),
    #[error("executor is no longer accepting work")]
    Closed,
}

impl<S: Scheduler + ?Sized> Scheduler for Rc<S> {
    fn schedule(
        &self,
        work: LocalBoxFuture<'static, ()>,
    ) -> Result<(), ScheduleError> {
        (**self).schedule(work)
    }
}

impl<S: Scheduler + ?Sized> Scheduler for Box<S> {
    fn schedule(
        &self,
        work: LocalBoxFuture<'static, ()>,
    ) -> Result<(), ScheduleError> {
        (**self).schedule(work)
    }
}

/// Schedules work on any `futures` local spawner, e.g. the spawner of a
/// `futures::executor::LocalPool`.
#[derive(Debug, Clone)]
pub struct LocalSpawnScheduler<S> {
    spawner: S,
}

impl<S: LocalSpawn> LocalSpawnScheduler<S> {
    pub fn new(spawner: S) -> Self {
        Self { spawner }
    }
}

impl<S: LocalSpawn> Scheduler for LocalSpawnScheduler<S> {
    fn schedule(
        &self,
        work: LocalBoxFuture<'static, ()>,
    ) -> Result<(), ScheduleError> {
        self.spawner.spawn_local(work)?;
        Ok(())
    }
}

/// Schedules work on a tokio `LocalSet`.
///
/// Holds the set weakly so a runner never keeps its executor alive; once the
/// set is dropped, scheduling fails with [`ScheduleError::Closed`].
#[cfg(feature = "tokio")]
#[derive(Debug, Clone)]
pub struct TokioLocalScheduler {
    local: std::rc::Weak<tokio::task::LocalSet>,
}

#[cfg(feature = "tokio")]
impl TokioLocalScheduler {
    pub fn new(local: &Rc<tokio::task::LocalSet>) -> Self {
        Self {
            local: Rc::downgrade(local),
        }
    }
}

#[cfg(feature = "tokio")]
impl Scheduler for TokioLocalScheduler {
    fn schedule(
        &self,
        work: LocalBoxFuture<'static, ()>,
    ) -> Result<(), ScheduleError> {
        let local = self.local.upgrade().ok_or(ScheduleError::Closed)?;
        // detached; completion is observed through the runner
        drop(local.spawn_local(work));
        Ok(())
    }
}
