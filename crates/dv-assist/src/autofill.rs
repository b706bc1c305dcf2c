//! Debounced autofill for create-view drafts.
//!
//! Each edit of a trigger field restarts that field's timer. When a timer
//! survives the quiet period the draft is snapshotted, a single request is
//! sent, and suggestions are merged only into fields that are still unset and
//! unchanged since the snapshot.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use dv_core::{Classification, Draft};

use crate::classifier::{ClassificationRequest, Classifier};

/// Outcome of one debounced autofill attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AutofillEvent<F> {
    /// The timer fired but the draft no longer needed suggestions.
    Skipped { trigger: F },
    /// Suggestions were merged into `filled`.
    Applied { trigger: F, filled: Vec<F> },
    /// The request failed; the draft was not touched.
    Failed { trigger: F, error: String },
}

struct Timer {
    task: JoinHandle<()>,
    fired: Arc<AtomicBool>,
}

struct GeneratingGuard(Arc<AtomicUsize>);

impl GeneratingGuard {
    fn new(counter: Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for GeneratingGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Debounced, cancellable autofill bound to one draft type.
pub struct Autofill<C, D: Draft> {
    classifier: Arc<C>,
    runtime: Handle,
    debounce: Duration,
    events: mpsc::UnboundedSender<AutofillEvent<D::Field>>,
    timers: HashMap<D::Field, Timer>,
    in_flight: Vec<Timer>,
    generating: Arc<AtomicUsize>,
}

impl<C: Classifier, D: Draft> Autofill<C, D> {
    /// Create an autofill that spawns onto `runtime`. Events arrive on the
    /// returned receiver.
    pub fn new(
        classifier: C,
        debounce: Duration,
        runtime: Handle,
    ) -> (Self, mpsc::UnboundedReceiver<AutofillEvent<D::Field>>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let autofill = Self {
            classifier: Arc::new(classifier),
            runtime,
            debounce,
            events,
            timers: HashMap::new(),
            in_flight: Vec::new(),
            generating: Arc::new(AtomicUsize::new(0)),
        };
        (autofill, receiver)
    }

    /// Restart the timer for `field` after an edit. Non-trigger fields are
    /// ignored.
    pub fn start(&mut self, field: D::Field, draft: &Arc<Mutex<D>>) {
        if !D::trigger_fields().contains(&field) {
            return;
        }
        if let Some(previous) = self.timers.remove(&field) {
            if previous.fired.load(Ordering::SeqCst) {
                self.in_flight.push(previous);
            } else {
                previous.task.abort();
            }
        }
        self.in_flight.retain(|timer| !timer.task.is_finished());

        let fired = Arc::new(AtomicBool::new(false));
        let task = self.runtime.spawn(run_timer(
            field,
            Arc::clone(draft),
            Arc::clone(&self.classifier),
            self.debounce,
            Arc::clone(&fired),
            Arc::clone(&self.generating),
            self.events.clone(),
        ));
        self.timers.insert(field, Timer { task, fired });
    }
}

impl<C, D: Draft> Autofill<C, D> {
    /// Whether a request is currently in flight.
    pub fn is_generating(&self) -> bool {
        self.generating.load(Ordering::SeqCst) > 0
    }

    /// Drop a pending timer for `field`. A request already sent keeps running.
    pub fn cancel(&mut self, field: D::Field) {
        if let Some(timer) = self.timers.remove(&field) {
            if timer.fired.load(Ordering::SeqCst) {
                self.in_flight.push(timer);
            } else {
                timer.task.abort();
            }
        }
    }

    /// Abort every timer and request.
    pub fn shutdown(&mut self) {
        for (_, timer) in self.timers.drain() {
            timer.task.abort();
        }
        for timer in self.in_flight.drain(..) {
            timer.task.abort();
        }
    }
}

impl<C, D: Draft> Drop for Autofill<C, D> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn snapshot<D: Draft>(draft: &Mutex<D>, field: D::Field) -> Option<(D, String)> {
    let draft = draft.lock().ok()?;
    if !draft.awaiting_autofill() {
        return None;
    }
    let input = draft.text(field)?.trim().to_string();
    if input.is_empty() {
        return None;
    }
    Some((draft.clone(), input))
}

fn merge<D: Draft>(
    draft: &Mutex<D>,
    issued: &D,
    classification: &Classification,
) -> Vec<D::Field> {
    match draft.lock() {
        Ok(mut draft) => draft.apply_classification(issued, classification),
        Err(_) => Vec::new(),
    }
}

async fn run_timer<C: Classifier, D: Draft>(
    field: D::Field,
    draft: Arc<Mutex<D>>,
    classifier: Arc<C>,
    debounce: Duration,
    fired: Arc<AtomicBool>,
    generating: Arc<AtomicUsize>,
    events: mpsc::UnboundedSender<AutofillEvent<D::Field>>,
) {
    tokio::time::sleep(debounce).await;
    fired.store(true, Ordering::SeqCst);

    let Some((issued, input)) = snapshot(&draft, field) else {
        tracing::debug!(?field, "autofill skipped");
        let _ = events.send(AutofillEvent::Skipped { trigger: field });
        return;
    };

    let request = ClassificationRequest::new(D::kind(), input);
    let outcome = {
        let _guard = GeneratingGuard::new(generating);
        classifier.classify(&request).await
    };
    match outcome {
        Ok(classification) => {
            let filled = merge(&draft, &issued, &classification);
            tracing::info!(?field, ?filled, "autofill applied");
            let _ = events.send(AutofillEvent::Applied {
                trigger: field,
                filled,
            });
        }
        Err(err) => {
            tracing::warn!(?field, error = %err, "autofill failed");
            let _ = events.send(AutofillEvent::Failed {
                trigger: field,
                error: err.to_string(),
            });
        }
    }
}
