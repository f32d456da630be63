/// Where a runner is in its invocation lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActionPhase {
    /// Nothing has settled yet and nothing is in flight.
    #[default]
    Idle,
    /// At least one invocation has been scheduled and not yet settled.
    Pending,
    /// The last invocation to settle returned a value.
    Succeeded,
    /// The last invocation to settle returned an error.
    Failed,
}

/// Observable state of an action: loading flag, last error, last result.
///
/// `error` and `data` are never both present. A successful settle clears the
/// error and a failed settle clears the data.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionStatus<T, E> {
    pub is_loading: bool,
    pub error: Option<E>,
    pub data: Option<T>,
    pub phase: ActionPhase,
}

impl<T, E> Default for ActionStatus<T, E> {
    fn default() -> Self {
        Self {
            is_loading: false,
            error: None,
            data: None,
            phase: ActionPhase::Idle,
        }
    }
}

impl<T, E> ActionStatus<T, E> {
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn has_data(&self) -> bool {
        self.data.is_some()
    }

    /// Returns true if nothing is shown yet: loading with no previous result
    /// and no error.
    pub fn is_initial_loading(&self) -> bool {
        self.is_loading && self.data.is_none() && self.error.is_none()
    }
}

/// What a trigger resolves to. Failures are values, never a rejected future.
#[derive(Debug, Clone, PartialEq)]
pub enum Settled<T, E> {
    Data(T),
    Error(E),
    /// The scheduler refused or dropped the work before the action settled.
    Abandoned,
}

impl<T, E> Settled<T, E> {
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Data(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&E> {
        match self {
            Self::Error(error) => Some(error),
            _ => None,
        }
    }

    pub fn is_abandoned(&self) -> bool {
        matches!(self, Self::Abandoned)
    }

    /// Converts into a `Result`, with `None` standing for abandoned work.
    pub fn into_result(self) -> Option<Result<T, E>> {
        match self {
            Self::Data(data) => Some(Ok(data)),
            Self::Error(error) => Some(Err(error)),
            Self::Abandoned => None,
        }
    }
}

impl<T, E> From<Result<T, E>> for Settled<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => Self::Data(data),
            Err(error) => Self::Error(error),
        }
    }
}
