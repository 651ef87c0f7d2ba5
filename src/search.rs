//! The A* state machine. Every call to [AstarSearch::step] performs one
//! iteration of the loop below on a node arena owned by the search:
//!
//! 1. pop the open node with the lowest f-score,
//! 2. stop if it is the goal,
//! 3. close it and relax its neighbours,
//! 4. report a [Snapshot] of the open and closed sets.
//!
//! Ties between equal f-scores go to the node that was discovered first, which is also
//! the first one in open-set order since the open set keeps insertion order.
use crate::driver::Step;
use crate::error::GridError;
use crate::heuristic::{Euclidean, Metric};
use crate::node_grid::NodeGrid;
use fxhash::FxBuildHasher;
use grid_util::point::Point;
use indexmap::IndexSet;
use log::{info, trace, warn};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

type FxIndexSet<K> = IndexSet<K, FxBuildHasher>;

struct SmallestScoreHolder {
    f_score: f64,
    discovered: usize,
    index: usize,
}

impl core::fmt::Debug for SmallestScoreHolder {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "({}, {}, {})", self.f_score, self.discovered, self.index)
    }
}

impl Eq for SmallestScoreHolder {}

impl PartialEq for SmallestScoreHolder {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl PartialOrd for SmallestScoreHolder {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SmallestScoreHolder {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so the max-heap pops the lowest f-score, earliest discovery first
        match other.f_score.total_cmp(&self.f_score) {
            Ordering::Equal => other.discovered.cmp(&self.discovered),
            s => s,
        }
    }
}

/// Lifecycle of a search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    /// Only the start is in the open set, nothing has been expanded.
    Initial,
    Running,
    /// The goal was selected from the open set.
    Found,
    /// The open set ran empty before the goal was reached.
    Exhausted,
}

impl Status {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Found | Status::Exhausted)
    }
}

/// State of the search after a non-terminal iteration.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    /// The node expanded in this iteration.
    pub current: Point,
    /// Best known path from the start to `current`.
    pub path: Vec<Point>,
    /// Open set in insertion order.
    pub open: Vec<Point>,
    /// Closed set in expansion order.
    pub closed: Vec<Point>,
}

/// Terminal outcome of a search.
///
/// On failure `path` is traced back from the last expanded node. It is only meant for
/// inspection and does not lead to the goal.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchResult {
    pub success: bool,
    pub path: Vec<Point>,
    pub open: Vec<Point>,
    pub closed: Vec<Point>,
    pub start: Point,
    pub end: Point,
    /// Number of nodes selected from the open set.
    pub iterations: usize,
    /// Cost from the start to the last node of `path`.
    pub cost: f64,
}

/// A* search over a [NodeGrid] that can be advanced one iteration at a time.
#[derive(Debug)]
pub struct AstarSearch<M: Metric = Euclidean> {
    grid: NodeGrid,
    metric: M,
    start: usize,
    goal: usize,
    open: FxIndexSet<Point>,
    closed: FxIndexSet<Point>,
    to_see: BinaryHeap<SmallestScoreHolder>,
    current: Option<usize>,
    discovered: usize,
    iterations: usize,
    status: Status,
    outcome: Option<SearchResult>,
}

impl AstarSearch<Euclidean> {
    /// Builds the node grid from rows of wall flags and prepares a search from `start`
    /// to `end` using Euclidean costs.
    pub fn new(rows: &[Vec<bool>], start: Point, end: Point) -> Result<Self, GridError> {
        Ok(AstarSearch::with_metric(
            NodeGrid::build(rows, start, end)?,
            Euclidean,
        ))
    }

    pub fn from_grid(grid: NodeGrid) -> Self {
        AstarSearch::with_metric(grid, Euclidean)
    }
}

impl<M: Metric> AstarSearch<M> {
    pub fn with_metric(grid: NodeGrid, metric: M) -> Self {
        let start_point = grid.start();
        let goal_point = grid.end();
        // Endpoints were validated when the grid was built
        let start = grid.index_of(&start_point).unwrap_or_default();
        let goal = grid.index_of(&goal_point).unwrap_or_default();
        let mut search = AstarSearch {
            grid,
            metric,
            start,
            goal,
            open: FxIndexSet::default(),
            closed: FxIndexSet::default(),
            to_see: BinaryHeap::new(),
            current: None,
            discovered: 0,
            iterations: 0,
            status: Status::Initial,
            outcome: None,
        };
        info!(
            "Searching for a path from {} to {}",
            start_point, goal_point
        );
        search.discover(start);
        search.relax(start, None, 0.0);
        search
    }

    pub fn grid(&self) -> &NodeGrid {
        &self.grid
    }
    pub fn status(&self) -> Status {
        self.status
    }
    pub fn iterations(&self) -> usize {
        self.iterations
    }
    /// The node expanded most recently.
    pub fn current(&self) -> Option<Point> {
        self.current.map(|ix| self.grid.point_of(ix))
    }
    pub fn open_set(&self) -> Vec<Point> {
        self.open.iter().copied().collect()
    }
    pub fn closed_set(&self) -> Vec<Point> {
        self.closed.iter().copied().collect()
    }

    /// Performs one iteration, or repeats the terminal result once the search is over.
    pub(crate) fn iterate(&mut self) -> Step {
        if let Some(outcome) = &self.outcome {
            return Step::Done(outcome.clone());
        }
        self.status = Status::Running;
        let Some(current) = self.pop_lowest() else {
            let last = self.current.unwrap_or(self.start);
            warn!(
                "Open set exhausted after {} iterations, {} is not reachable from {}",
                self.iterations,
                self.grid.end(),
                self.grid.start()
            );
            return Step::Done(self.finish(Status::Exhausted, last));
        };
        self.iterations += 1;
        self.current = Some(current);
        if current == self.goal {
            info!(
                "Reached {} after {} iterations",
                self.grid.end(),
                self.iterations
            );
            return Step::Done(self.finish(Status::Found, current));
        }

        let current_point = self.grid.point_of(current);
        self.closed.insert(current_point);
        let (g_score, neighbours) = match self.grid.node(current) {
            Some(node) => (node.g_score, node.neighbours.clone()),
            None => Default::default(),
        };
        trace!(
            "Expanding {} with g = {}, {} neighbours",
            current_point,
            g_score,
            neighbours.len()
        );
        for neighbour in neighbours {
            let point = self.grid.point_of(neighbour);
            if self.closed.contains(&point) {
                continue;
            }
            let tentative = g_score + self.metric.cost(&current_point, &point);
            if !self.open.contains(&point) {
                self.discover(neighbour);
            } else if tentative >= self.g_score(neighbour) {
                continue;
            }
            self.relax(neighbour, Some(current), tentative);
        }

        Step::Running(Snapshot {
            current: current_point,
            path: self.reconstruct_path(current),
            open: self.open_set(),
            closed: self.closed_set(),
        })
    }

    /// Points from the start to the node at `index`, following the predecessors.
    pub fn reconstruct_path(&self, index: usize) -> Vec<Point> {
        let mut path = std::iter::successors(Some(index), |&ix| {
            self.grid.node(ix).and_then(|n| n.came_from)
        })
        .map(|ix| self.grid.point_of(ix))
        .collect::<Vec<Point>>();
        path.reverse();
        path
    }

    fn g_score(&self, index: usize) -> f64 {
        self.grid.node(index).map_or(f64::INFINITY, |n| n.g_score)
    }

    fn discover(&mut self, index: usize) {
        let point = self.grid.point_of(index);
        self.open.insert(point);
        let order = self.discovered;
        if let Some(node) = self.grid.node_mut(index) {
            node.discovered = Some(order);
        }
        self.discovered += 1;
    }

    fn relax(&mut self, index: usize, came_from: Option<usize>, g_score: f64) {
        let point = self.grid.point_of(index);
        let f_score = g_score + self.metric.heuristic(&point, &self.grid.end());
        let Some(node) = self.grid.node_mut(index) else {
            return;
        };
        node.came_from = came_from;
        node.g_score = g_score;
        node.f_score = f_score;
        let discovered = node.discovered.unwrap_or_default();
        self.to_see.push(SmallestScoreHolder {
            f_score,
            discovered,
            index,
        });
    }

    fn pop_lowest(&mut self) -> Option<usize> {
        while let Some(SmallestScoreHolder { f_score, index, .. }) = self.to_see.pop() {
            // A node is pushed again whenever its score improves; entries carrying an
            // outdated score or belonging to an already selected node are skipped.
            let fresh = self
                .grid
                .node(index)
                .is_some_and(|n| n.f_score.total_cmp(&f_score).is_eq());
            if fresh && self.open.shift_remove(&self.grid.point_of(index)) {
                return Some(index);
            }
        }
        None
    }

    fn finish(&mut self, status: Status, last: usize) -> SearchResult {
        self.status = status;
        let result = SearchResult {
            success: status == Status::Found,
            path: self.reconstruct_path(last),
            open: self.open_set(),
            closed: self.closed_set(),
            start: self.grid.start(),
            end: self.grid.end(),
            iterations: self.iterations,
            cost: self.g_score(last),
        };
        self.outcome = Some(result.clone());
        result
    }
}
