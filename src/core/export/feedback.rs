//! Progress feedback sinks
//!
//! A sink observes [`FeedbackEvent`]s emitted at stage transitions. Sinks are
//! fire-and-forget: a panicking sink is logged and ignored.

use crate::domain::{FeedbackEvent, FeedbackKind};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// Receives progress events from an export
pub trait FeedbackSink: Send + Sync {
    fn on_feedback(&self, event: &FeedbackEvent);
}

impl<F> FeedbackSink for F
where
    F: Fn(&FeedbackEvent) + Send + Sync,
{
    fn on_feedback(&self, event: &FeedbackEvent) {
        self(event)
    }
}

/// Forwards events to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingFeedbackSink;

impl FeedbackSink for TracingFeedbackSink {
    fn on_feedback(&self, event: &FeedbackEvent) {
        let payload = event
            .payload
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();
        match event.kind {
            FeedbackKind::Error => {
                tracing::error!(message = %event.message, payload = %payload, "Export feedback")
            }
            FeedbackKind::Success | FeedbackKind::Info => {
                tracing::info!(message = %event.message, payload = %payload, "Export feedback")
            }
        }
    }
}

/// Optional sink shared by the pipeline stages
#[derive(Clone, Default)]
pub(crate) struct Feedback {
    sink: Option<Arc<dyn FeedbackSink>>,
}

impl Feedback {
    pub(crate) fn new(sink: Option<Arc<dyn FeedbackSink>>) -> Self {
        Self { sink }
    }

    pub(crate) fn emit(&self, event: FeedbackEvent) {
        let Some(sink) = &self.sink else {
            return;
        };
        if catch_unwind(AssertUnwindSafe(|| sink.on_feedback(&event))).is_err() {
            tracing::warn!(message = %event.message, "Feedback sink panicked, ignoring");
        }
    }
}

impl std::fmt::Debug for Feedback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Feedback")
            .field("enabled", &self.sink.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_closure_sink_receives_events() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        let feedback = Feedback::new(Some(Arc::new(move |event: &FeedbackEvent| {
            seen_clone.lock().unwrap().push(event.message.clone());
        })));

        feedback.emit(FeedbackEvent::info("loading assets"));
        feedback.emit(FeedbackEvent::success("archive created"));

        assert_eq!(
            *seen.lock().unwrap(),
            vec!["loading assets".to_string(), "archive created".to_string()]
        );
    }

    #[test]
    fn test_panicking_sink_is_contained() {
        let feedback = Feedback::new(Some(Arc::new(|_: &FeedbackEvent| panic!("sink broke"))));
        feedback.emit(FeedbackEvent::info("starting generation"));
    }

    #[test]
    fn test_no_sink_is_noop() {
        Feedback::default().emit(FeedbackEvent::error("archive error"));
    }
}
