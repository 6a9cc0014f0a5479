//! Observation of the chat-completion surface.
//!
//! The host composes [`ObservedChat`] around its client, or hands its client
//! constructor to [`Observer::chat_constructor`] so every client it builds
//! comes out wrapped. The wrapper derefs to the inner client, so everything
//! other than `create` is reached unchanged.

use std::fmt;
use std::ops::Deref;

use async_trait::async_trait;
use llm_observe_core::serialize;
use llm_observe_observability::spans;
use serde::Serialize;
use tracing::Instrument;

use crate::call::{PendingCall, extract_request_id};
use crate::observer::Observer;

/// Method name recorded for chat completions.
pub const CHAT_METHOD: &str = "chat.completions.create";

/// Source tag recorded for chat completions.
pub const CHAT_SOURCE: &str = "openai";

/// Result of a call that may answer with a single value or a stream.
///
/// Shared by both surfaces. The stream variant is always handed back to the
/// caller untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutput<T, S> {
    Complete(T),
    Stream(S),
}

impl<T, S> CallOutput<T, S> {
    pub fn is_stream(&self) -> bool {
        matches!(self, Self::Stream(_))
    }

    pub fn complete(&self) -> Option<&T> {
        match self {
            Self::Complete(value) => Some(value),
            Self::Stream(_) => None,
        }
    }

    pub fn into_complete(self) -> Option<T> {
        match self {
            Self::Complete(value) => Some(value),
            Self::Stream(_) => None,
        }
    }

    pub fn into_stream(self) -> Option<S> {
        match self {
            Self::Stream(stream) => Some(stream),
            Self::Complete(_) => None,
        }
    }
}

/// The `chat.completions.create` call of a chat client.
#[async_trait]
pub trait ChatCompletions: Send + Sync {
    type Params: Serialize + fmt::Debug + Send + Sync;
    type Completion: Serialize + fmt::Debug + Send;
    type Stream: Send;
    type Error: fmt::Display + Send;

    async fn create(
        &self,
        params: Self::Params,
    ) -> Result<CallOutput<Self::Completion, Self::Stream>, Self::Error>;
}

/// A chat client whose `create` calls are recorded.
///
/// Built through [`Observer::instrument_chat`]. When the observer was not
/// installed and enabled at that point the wrapper passes calls straight
/// through.
pub struct ObservedChat<C> {
    inner: C,
    observer: Option<Observer>,
}

impl<C> ObservedChat<C> {
    pub(crate) fn observed(inner: C, observer: Observer) -> Self {
        Self {
            inner,
            observer: Some(observer),
        }
    }

    pub(crate) fn passthrough(inner: C) -> Self {
        Self {
            inner,
            observer: None,
        }
    }

    pub fn is_observed(&self) -> bool {
        self.observer.is_some()
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    pub fn into_inner(self) -> C {
        self.inner
    }
}

impl<C> Deref for ObservedChat<C> {
    type Target = C;

    fn deref(&self) -> &C {
        &self.inner
    }
}

impl<C: fmt::Debug> fmt::Debug for ObservedChat<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservedChat")
            .field("inner", &self.inner)
            .field("observed", &self.is_observed())
            .finish()
    }
}

#[async_trait]
impl<C: ChatCompletions> ChatCompletions for ObservedChat<C> {
    type Params = C::Params;
    type Completion = C::Completion;
    type Stream = C::Stream;
    type Error = C::Error;

    async fn create(
        &self,
        params: Self::Params,
    ) -> Result<CallOutput<Self::Completion, Self::Stream>, Self::Error> {
        let Some(observer) = &self.observer else {
            return self.inner.create(params).await;
        };

        let pending = PendingCall::begin(CHAT_METHOD, CHAT_SOURCE, &params);
        let stream_requested = pending.request().is_streaming();
        let span = spans::chat_call(CHAT_METHOD, pending.request().model());

        async move {
            let call = pending.invoke();
            let outcome = self.inner.create(params).await;

            let record = match &outcome {
                Ok(CallOutput::Stream(_)) => call.succeed_streaming(),
                Ok(CallOutput::Complete(_)) if stream_requested => call.succeed_streaming(),
                Ok(CallOutput::Complete(completion)) => {
                    let response = serialize(completion);
                    let request_id = extract_request_id(&response);
                    call.succeed(response, request_id)
                }
                Err(err) => call.fail(err),
            };

            observer.dispatch(record).await;
            outcome
        }
        .instrument(span)
        .await
    }
}

/// Wraps a host's client constructor so every client it builds is observed.
#[derive(Clone)]
pub struct ObservedConstructor<F> {
    construct: F,
    observer: Observer,
}

impl<F> ObservedConstructor<F> {
    pub(crate) fn new(construct: F, observer: Observer) -> Self {
        Self {
            construct,
            observer,
        }
    }

    /// Builds a client with the original constructor and wraps it.
    pub fn construct<A, C>(&self, args: A) -> ObservedChat<C>
    where
        F: Fn(A) -> C,
        C: ChatCompletions,
    {
        self.observer.instrument_chat((self.construct)(args))
    }

    /// The unwrapped constructor.
    pub fn original(&self) -> &F {
        &self.construct
    }
}

impl<F> fmt::Debug for ObservedConstructor<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservedConstructor").finish_non_exhaustive()
    }
}
