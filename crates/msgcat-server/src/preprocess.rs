//! Hooks that rewrite a cataloged error before it is formatted

use futures::future::BoxFuture;
use msgcat_core::CatalogedError;
use std::future::Future;

/// Error type a pre-processor may fail with
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Outcome of one pre-processor call
pub type PreProcessResult = Result<CatalogedError, BoxError>;

/// A pre-processor result that is either ready now or still pending
pub enum PreProcessed {
    Immediate(PreProcessResult),
    Deferred(BoxFuture<'static, PreProcessResult>),
}

impl PreProcessed {
    /// A successful, already available result
    pub fn ready(error: CatalogedError) -> Self {
        Self::Immediate(Ok(error))
    }

    /// A result produced by `future`
    pub fn deferred<F>(future: F) -> Self
    where
        F: Future<Output = PreProcessResult> + Send + 'static,
    {
        Self::Deferred(Box::pin(future))
    }

    /// Wait for the result
    pub async fn resolve(self) -> PreProcessResult {
        match self {
            Self::Immediate(result) => result,
            Self::Deferred(future) => future.await,
        }
    }
}

impl std::fmt::Debug for PreProcessed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Immediate(result) => f.debug_tuple("Immediate").field(result).finish(),
            Self::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

/// Transforms a decoded error payload before catalog formatting
#[cfg_attr(test, mockall::automock)]
pub trait PreProcessor: Send + Sync {
    fn pre_process(&self, error: CatalogedError) -> PreProcessed;
}

impl<F> PreProcessor for F
where
    F: Fn(CatalogedError) -> PreProcessed + Send + Sync,
{
    fn pre_process(&self, error: CatalogedError) -> PreProcessed {
        self(error)
    }
}
