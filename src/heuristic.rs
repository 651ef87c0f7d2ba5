use grid_util::point::Point;

/// Euclidean distance between two points. Axis-aligned neighbours are 1 apart and
/// diagonal neighbours √2.
pub fn euclidean(a: &Point, b: &Point) -> f64 {
    let dx = (a.x - b.x) as i64;
    let dy = (a.y - b.y) as i64;
    ((dx * dx + dy * dy) as f64).sqrt()
}

/// Estimate of the remaining cost from `node` to `goal`.
pub fn heuristic(node: &Point, goal: &Point) -> f64 {
    euclidean(node, goal)
}

/// Cost of moving between two adjacent nodes.
pub fn distance_between(a: &Point, b: &Point) -> f64 {
    euclidean(a, b)
}

/// Edge cost and goal estimate used by the search. The heuristic must never overestimate
/// the cost for the returned paths to be shortest.
pub trait Metric {
    fn cost(&self, a: &Point, b: &Point) -> f64;

    fn heuristic(&self, node: &Point, goal: &Point) -> f64 {
        self.cost(node, goal)
    }
}

/// Euclidean edge cost with the same function as heuristic.
#[derive(Clone, Copy, Debug, Default)]
pub struct Euclidean;

impl Metric for Euclidean {
    fn cost(&self, a: &Point, b: &Point) -> f64 {
        distance_between(a, b)
    }

    fn heuristic(&self, node: &Point, goal: &Point) -> f64 {
        heuristic(node, goal)
    }
}

/// Euclidean edge cost without any goal estimate, which turns the search into Dijkstra's
/// algorithm.
#[derive(Clone, Copy, Debug, Default)]
pub struct Dijkstra;

impl Metric for Dijkstra {
    fn cost(&self, a: &Point, b: &Point) -> f64 {
        distance_between(a, b)
    }

    fn heuristic(&self, _: &Point, _: &Point) -> f64 {
        0.0
    }
}

/// Sums the move costs along a path.
pub fn path_cost<M: Metric>(path: &[Point], metric: &M) -> f64 {
    path.windows(2).map(|w| metric.cost(&w[0], &w[1])).sum()
}
