use std::sync::Arc;

use hlsbridge_engine::{EngineEvent, EngineEventKind, StreamingEngine, SubscriptionId};
use parking_lot::Mutex;
use tracing::trace;

/// Engine subscriptions of one session.
///
/// Everything registered through [`on`](Self::on) is unregistered when the
/// engine reports `MediaDetaching`, so attach/detach cycles never pile up
/// handlers on an engine.
pub(crate) struct Subscriptions {
    engine: Arc<dyn StreamingEngine>,
    ids: Arc<Mutex<Vec<SubscriptionId>>>,
}

impl Subscriptions {
    pub(crate) fn new(engine: Arc<dyn StreamingEngine>) -> Self {
        let ids = Arc::new(Mutex::new(Vec::new()));
        let weak_engine = Arc::downgrade(&engine);
        let weak_ids = Arc::downgrade(&ids);
        let teardown = engine.subscribe(
            EngineEventKind::MediaDetaching,
            Arc::new(move |_: &EngineEvent| {
                let (Some(engine), Some(ids)) = (weak_engine.upgrade(), weak_ids.upgrade()) else {
                    return;
                };
                release(engine.as_ref(), &ids);
            }),
        );
        ids.lock().push(teardown);
        Self { engine, ids }
    }

    pub(crate) fn on<F>(&self, kind: EngineEventKind, handler: F)
    where
        F: Fn(&EngineEvent) + Send + Sync + 'static,
    {
        let id = self.engine.subscribe(kind, Arc::new(handler));
        self.ids.lock().push(id);
    }

    /// Unregister whatever is still registered.
    pub(crate) fn release_all(&self) {
        release(self.engine.as_ref(), &self.ids);
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.ids.lock().len()
    }
}

fn release(engine: &dyn StreamingEngine, ids: &Mutex<Vec<SubscriptionId>>) {
    let ids = std::mem::take(&mut *ids.lock());
    if ids.is_empty() {
        return;
    }
    trace!(count = ids.len(), "engine subscriptions released");
    for id in ids {
        engine.unsubscribe(id);
    }
}
