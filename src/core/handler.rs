//! Work-unit contract and execution outcome.

use std::future::Future;

use async_trait::async_trait;

/// Result of executing one work unit.
///
/// Backoff is an ordinary data branch rather than an error: a work unit that
/// observes transient overload returns [`Outcome::Backoff`] and the limiter
/// pauses admission and retries it. Anything the caller should see, success
/// or failure, goes through [`Outcome::Success`] and [`Outcome::Fatal`]
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T, E> {
    /// The work unit produced a value; resolved to the submitter as-is.
    Success(T),
    /// Transient overload; pause admission and retry this unit. Carries an
    /// optional human-readable reason for logging only.
    Backoff(Option<String>),
    /// Terminal failure; propagated to the submitter as-is.
    Fatal(E),
}

impl<T, E> Outcome<T, E> {
    /// Backoff with no reason attached.
    #[must_use]
    pub const fn backoff() -> Self {
        Self::Backoff(None)
    }

    /// Backoff carrying a reason for the retry log line.
    pub fn backoff_with(reason: impl Into<String>) -> Self {
        Self::Backoff(Some(reason.into()))
    }

    /// True for [`Outcome::Success`].
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// A plain `Result` maps onto the two terminal variants.
impl<T, E> From<Result<T, E>> for Outcome<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(error) => Self::Fatal(error),
        }
    }
}

/// The only contract imposed on submitted work.
///
/// `execute` is called once per admission; a unit that signals backoff is
/// executed again (same instance) after the bucket's pause elapses, which is
/// why the receiver is `&mut self` — retry state such as attempt counters
/// lives in the handler itself.
///
/// # Example
///
/// ```rust,ignore
/// use async_trait::async_trait;
/// use prometheus_rate_limiter::{Outcome, RequestHandler};
///
/// struct FetchUser {
///     id: u64,
/// }
///
/// #[async_trait]
/// impl RequestHandler<User, ApiError> for FetchUser {
///     async fn execute(&mut self) -> Outcome<User, ApiError> {
///         match api_get(self.id).await {
///             Ok(user) => Outcome::Success(user),
///             Err(e) if e.is_rate_limited() => Outcome::backoff_with("api 429"),
///             Err(e) => Outcome::Fatal(e),
///         }
///     }
/// }
/// ```
#[async_trait]
pub trait RequestHandler<T, E>: Send
where
    T: Send,
    E: Send,
{
    /// Execute the work unit once, reporting the outcome explicitly.
    async fn execute(&mut self) -> Outcome<T, E>;
}

/// Blanket implementation: any `FnMut` closure producing an outcome future is
/// a request handler.
#[async_trait]
impl<F, Fut, T, E> RequestHandler<T, E> for F
where
    F: FnMut() -> Fut + Send,
    Fut: Future<Output = Outcome<T, E>> + Send + 'static,
    T: Send,
    E: Send,
{
    async fn execute(&mut self) -> Outcome<T, E> {
        (self)().await
    }
}
