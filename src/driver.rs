//! Ways of consuming an [AstarSearch]: one iteration at a time for inspection, or straight
//! to the terminal [SearchResult].
use crate::heuristic::Metric;
use crate::search::{AstarSearch, SearchResult, Snapshot};
use log::debug;
use std::thread::{self, JoinHandle};

/// Outcome of a single [AstarSearch::step].
#[derive(Clone, Debug, PartialEq)]
pub enum Step {
    Running(Snapshot),
    Done(SearchResult),
}

impl Step {
    pub fn is_done(&self) -> bool {
        matches!(self, Step::Done(_))
    }
    pub fn into_result(self) -> Option<SearchResult> {
        match self {
            Step::Done(result) => Some(result),
            Step::Running(_) => None,
        }
    }
}

impl<M: Metric> AstarSearch<M> {
    /// Advances the search by exactly one iteration. Once the search has terminated every
    /// further call returns the same [Step::Done].
    ///
    /// Nothing runs between calls, so a caller that is no longer interested can simply
    /// drop the search.
    pub fn step(&mut self) -> Step {
        self.iterate()
    }

    /// Steps until the search terminates and returns only the terminal result.
    pub fn run_to_completion(&mut self) -> SearchResult {
        loop {
            if let Step::Done(result) = self.step() {
                debug!(
                    "Search finished after {} iterations, success: {}",
                    result.iterations, result.success
                );
                return result;
            }
        }
    }

    /// Runs the search to completion on a worker thread. The search is moved to the worker
    /// so it is never driven from two places.
    pub fn spawn(mut self) -> JoinHandle<SearchResult>
    where
        M: Send + 'static,
    {
        thread::spawn(move || self.run_to_completion())
    }
}

/// Yields every [Step] up to and including the terminal one.
impl<M: Metric> Iterator for AstarSearch<M> {
    type Item = Step;

    fn next(&mut self) -> Option<Step> {
        if self.status().is_terminal() {
            None
        } else {
            Some(self.step())
        }
    }
}
