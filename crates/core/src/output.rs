//! Deferred resource outputs
//!
//! An [`Output`] is a value that only becomes known once the engine has
//! applied the resource that produces it, such as a provider-assigned bucket
//! id or a website endpoint. Outputs are cheap to clone; every clone observes
//! the same resolution.

use std::fmt;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::oneshot;

/// A deferred value produced by a resource.
///
/// Resolves to `Some(value)` once known, or to `None` when the value stays
/// unknown (during a preview, or when the producing resource was never
/// applied).
pub struct Output<T>
where
    T: Clone + Send + Sync + 'static,
{
    value: Shared<BoxFuture<'static, Option<T>>>,
    label: Arc<str>,
}

impl<T> Output<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn from_future(
        future: impl std::future::Future<Output = Option<T>> + Send + 'static,
        label: Arc<str>,
    ) -> Self {
        Self {
            value: future.boxed().shared(),
            label,
        }
    }

    /// An output whose value is already known.
    pub fn known(value: T) -> Self {
        Self::from_future(async move { Some(value) }, Arc::from("known"))
    }

    /// An output that will never resolve to a value.
    pub fn unknown(label: impl Into<String>) -> Self {
        Self::from_future(async { None }, Arc::from(label.into()))
    }

    /// An output fulfilled later through the returned [`Resolver`].
    pub fn pending(label: impl Into<String>) -> (Resolver<T>, Self) {
        let (tx, rx) = oneshot::channel();
        let output = Self::from_future(rx.map(|received| received.ok()), Arc::from(label.into()));
        (Resolver { tx }, output)
    }

    /// Derive a new output by transforming the value once it is known.
    pub fn map<U, F>(&self, f: F) -> Output<U>
    where
        U: Clone + Send + Sync + 'static,
        F: FnOnce(T) -> U + Send + 'static,
    {
        self.and_then(move |value| Some(f(value)))
    }

    /// Like [`Output::map`], but the transform may leave the value unknown.
    pub fn and_then<U, F>(&self, f: F) -> Output<U>
    where
        U: Clone + Send + Sync + 'static,
        F: FnOnce(T) -> Option<U> + Send + 'static,
    {
        let source = self.value.clone();
        Output::from_future(
            async move { source.await.and_then(f) },
            Arc::clone(&self.label),
        )
    }

    /// Replace the description shown for this output while it is unknown.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Arc::from(label.into());
        self
    }

    /// Wait for the output to resolve.
    pub async fn get(&self) -> Option<T> {
        self.value.clone().await
    }

    /// The value if it has already been resolved, without waiting.
    ///
    /// Returns `None` both while pending and when resolved as unknown.
    pub fn peek(&self) -> Option<T> {
        self.value.clone().now_or_never().flatten()
    }

    /// Human description of where this output comes from, e.g. `site.id`.
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl<T> Clone for Output<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            label: Arc::clone(&self.label),
        }
    }
}

impl<T> fmt::Debug for Output<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Output")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// Write half of a pending [`Output`].
///
/// Dropping a resolver without calling [`Resolver::resolve`] leaves the
/// output unknown.
#[derive(Debug)]
pub struct Resolver<T> {
    tx: oneshot::Sender<T>,
}

impl<T> Resolver<T> {
    /// Fulfil every clone of the paired output.
    pub fn resolve(self, value: T) {
        // Nobody waiting on the output is fine.
        let _ = self.tx.send(value);
    }
}
