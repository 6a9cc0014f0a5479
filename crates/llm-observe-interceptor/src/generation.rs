//! Observation of the four generation functions.
//!
//! Function bindings cannot be patched in place, so the only way in is
//! explicit: the host hands its functions to
//! [`Observer::wrap_generation_functions`] and calls the wrapped copies it
//! gets back.

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use llm_observe_observability::spans;
use serde::Serialize;
use serde_json::{Map, Value};
use strum::{Display, EnumIter, IntoStaticStr};
use tracing::Instrument;

use crate::call::{PendingCall, extract_request_id};
use crate::chat::CallOutput;
use crate::observer::Observer;

/// Source tag recorded for generation calls.
pub const GENERATION_SOURCE: &str = "ai-sdk";

/// The four observable generation functions.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter, IntoStaticStr,
)]
pub enum GenerationKind {
    #[strum(serialize = "generate.text")]
    GenerateText,
    #[strum(serialize = "stream.text")]
    StreamText,
    #[strum(serialize = "generate.object")]
    GenerateObject,
    #[strum(serialize = "stream.object")]
    StreamObject,
}

impl GenerationKind {
    /// Dotted method name used in records.
    pub fn method(self) -> &'static str {
        self.into()
    }
}

/// What the observation layer reads from a generation result.
///
/// Only these fields are recorded; the rest of the result is left alone.
/// Every accessor defaults to "absent".
pub trait GenerationResult {
    /// Whether the result carries an incremental text or object stream.
    fn is_streaming(&self) -> bool {
        false
    }

    fn text(&self) -> Option<String> {
        None
    }

    fn object(&self) -> Option<Value> {
        None
    }

    fn usage(&self) -> Option<Value> {
        None
    }

    fn finish_reason(&self) -> Option<String> {
        None
    }

    fn request_id(&self) -> Option<String> {
        None
    }
}

/// Plain JSON results, keyed the way the toolkit keys them.
///
/// A `textStream` or `partialObjectStream` member marks a streaming result.
impl GenerationResult for Value {
    fn is_streaming(&self) -> bool {
        self.get("textStream").is_some() || self.get("partialObjectStream").is_some()
    }

    fn text(&self) -> Option<String> {
        self.get("text").and_then(Value::as_str).map(str::to_string)
    }

    fn object(&self) -> Option<Value> {
        self.get("object").cloned()
    }

    fn usage(&self) -> Option<Value> {
        self.get("usage").cloned()
    }

    fn finish_reason(&self) -> Option<String> {
        self.get("finishReason")
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    fn request_id(&self) -> Option<String> {
        extract_request_id(self)
    }
}

impl<T: GenerationResult, S> GenerationResult for CallOutput<T, S> {
    fn is_streaming(&self) -> bool {
        match self {
            Self::Complete(result) => result.is_streaming(),
            Self::Stream(_) => true,
        }
    }

    fn text(&self) -> Option<String> {
        self.complete().and_then(T::text)
    }

    fn object(&self) -> Option<Value> {
        self.complete().and_then(T::object)
    }

    fn usage(&self) -> Option<Value> {
        self.complete().and_then(T::usage)
    }

    fn finish_reason(&self) -> Option<String> {
        self.complete().and_then(T::finish_reason)
    }

    fn request_id(&self) -> Option<String> {
        self.complete().and_then(T::request_id)
    }
}

/// The recorded response of a non-streaming result: `text`, `object`,
/// `usage` and `finishReason`, each only when present.
pub fn summarize<R>(result: &R) -> Value
where
    R: GenerationResult + ?Sized,
{
    let mut summary = Map::new();
    if let Some(text) = result.text() {
        summary.insert("text".to_string(), Value::String(text));
    }
    if let Some(object) = result.object() {
        summary.insert("object".to_string(), object);
    }
    if let Some(usage) = result.usage() {
        summary.insert("usage".to_string(), usage);
    }
    if let Some(reason) = result.finish_reason() {
        summary.insert("finishReason".to_string(), Value::String(reason));
    }
    Value::Object(summary)
}

/// A generation function: parameters in, future of the result out.
pub type GenerationFn<P, R, E> = Arc<dyn Fn(P) -> BoxFuture<'static, Result<R, E>> + Send + Sync>;

/// Turns an async closure into a [`GenerationFn`].
pub fn generation_fn<P, R, E, F, Fut>(f: F) -> GenerationFn<P, R, E>
where
    F: Fn(P) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R, E>> + Send + 'static,
{
    Arc::new(move |params| f(params).boxed())
}

/// A table of generation functions keyed by kind. Any subset may be present.
pub struct GenerationFunctions<P, R, E> {
    functions: BTreeMap<GenerationKind, GenerationFn<P, R, E>>,
}

impl<P, R, E> GenerationFunctions<P, R, E> {
    pub fn new() -> Self {
        Self {
            functions: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with(mut self, kind: GenerationKind, function: GenerationFn<P, R, E>) -> Self {
        self.insert(kind, function);
        self
    }

    pub fn insert(&mut self, kind: GenerationKind, function: GenerationFn<P, R, E>) {
        self.functions.insert(kind, function);
    }

    pub fn get(&self, kind: GenerationKind) -> Option<&GenerationFn<P, R, E>> {
        self.functions.get(&kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = GenerationKind> + '_ {
        self.functions.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    pub fn into_map(self) -> BTreeMap<GenerationKind, GenerationFn<P, R, E>> {
        self.functions
    }
}

impl<P, R, E> Default for GenerationFunctions<P, R, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P, R, E> Clone for GenerationFunctions<P, R, E> {
    fn clone(&self) -> Self {
        Self {
            functions: self.functions.clone(),
        }
    }
}

impl<P, R, E> fmt::Debug for GenerationFunctions<P, R, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.kinds()).finish()
    }
}

impl<P, R, E> FromIterator<(GenerationKind, GenerationFn<P, R, E>)> for GenerationFunctions<P, R, E> {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (GenerationKind, GenerationFn<P, R, E>)>,
    {
        Self {
            functions: iter.into_iter().collect(),
        }
    }
}

pub(crate) fn observe<P, R, E>(
    observer: Observer,
    kind: GenerationKind,
    function: GenerationFn<P, R, E>,
) -> GenerationFn<P, R, E>
where
    P: Serialize + fmt::Debug + Send + 'static,
    R: GenerationResult + Send + 'static,
    E: fmt::Display + Send + 'static,
{
    Arc::new(move |params: P| {
        let observer = observer.clone();
        let function = Arc::clone(&function);
        async move { observe_call(&observer, kind, &function, params).await }.boxed()
    })
}

async fn observe_call<P, R, E>(
    observer: &Observer,
    kind: GenerationKind,
    function: &GenerationFn<P, R, E>,
    params: P,
) -> Result<R, E>
where
    P: Serialize + fmt::Debug,
    R: GenerationResult,
    E: fmt::Display,
{
    let method = kind.method();
    let pending = PendingCall::begin(method, GENERATION_SOURCE, &params);
    let span = spans::generation_call(method, pending.request().model());

    async move {
        let call = pending.invoke();
        let outcome = function(params).await;

        let record = match &outcome {
            Ok(result) if result.is_streaming() => call.succeed_streaming(),
            Ok(result) => call.succeed(summarize(result), result.request_id()),
            Err(err) => call.fail(err),
        };

        observer.dispatch(record).await;
        outcome
    }
    .instrument(span)
    .await
}
