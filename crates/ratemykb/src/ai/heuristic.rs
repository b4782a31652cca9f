//! Classifiers that never leave the process

use super::{ClassifyError, Classifier};
use ratemykb_state_store::Label;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

/// Notes shorter than this (after trimming) are rated low quality.
const MIN_GOOD_CHARS: usize = 100;

/// Offline classifier: short notes and notes with a `TODO` are low quality,
/// everything else is good enough.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicClassifier;

impl Classifier for HeuristicClassifier {
    fn name(&self) -> &str {
        "heuristic"
    }

    fn classify(&self, content: &str) -> Result<Label, ClassifyError> {
        let content = content.trim();
        if content.is_empty() {
            return Ok(Label::empty());
        }
        if content.chars().count() < MIN_GOOD_CHARS || content.contains("TODO") {
            return Ok(Label::low_quality());
        }
        Ok(Label::good_enough())
    }
}

/// Test double with canned answers.
///
/// Queued outcomes are consumed first, in order; once the queue is empty
/// every call returns the fallback label. Counts every call.
#[derive(Debug)]
pub struct FixedClassifier {
    fallback: Label,
    queued: RefCell<VecDeque<Result<Label, ClassifyError>>>,
    calls: Cell<usize>,
}

impl FixedClassifier {
    pub fn new(label: Label) -> Self {
        Self {
            fallback: label,
            queued: RefCell::new(VecDeque::new()),
            calls: Cell::new(0),
        }
    }

    /// Queue an outcome for the next call.
    pub fn queue(&self, outcome: Result<Label, ClassifyError>) {
        self.queued.borrow_mut().push_back(outcome);
    }

    /// Queue a failure for the next call.
    pub fn queue_error(&self, error: ClassifyError) {
        self.queue(Err(error));
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl Classifier for FixedClassifier {
    fn name(&self) -> &str {
        "fixed"
    }

    fn classify(&self, _content: &str) -> Result<Label, ClassifyError> {
        self.calls.set(self.calls.get() + 1);
        self.queued
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(self.fallback.clone()))
    }
}
