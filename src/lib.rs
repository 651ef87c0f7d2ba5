//! # grid_astar
//!
//! Shortest paths on 8-connected grids with
//! [A*](https://en.wikipedia.org/wiki/A*_search_algorithm). Moves to any of the eight
//! neighbouring open cells are allowed, straight moves cost 1 and diagonal moves √2, and
//! the Euclidean distance to the goal is used as heuristic.
//!
//! The search can be driven one iteration at a time with [AstarSearch::step], which
//! exposes the open and closed sets after every expansion, or run in one go with
//! [AstarSearch::run_to_completion] and [find_path].
//!
//! Coordinates follow the layout of the input: `x` selects one of the outer rows and `y`
//! the cell within that row.
pub mod driver;
pub mod error;
pub mod heuristic;
pub mod node_grid;
pub mod search;

pub use driver::Step;
pub use error::{Endpoint, GridError};
pub use grid_util::point::Point;
pub use heuristic::{Dijkstra, Euclidean, Metric};
pub use node_grid::NodeGrid;
pub use search::{AstarSearch, SearchResult, Snapshot, Status};

/// Builds a search over `rows` (`true` marks a wall) and runs it to completion.
pub fn find_path(rows: &[Vec<bool>], start: Point, end: Point) -> Result<SearchResult, GridError> {
    let mut search = AstarSearch::new(rows, start, end)?;
    Ok(search.run_to_completion())
}

/// Like [find_path] for numeric cells, where zero is open and anything else a wall.
pub fn find_path_numeric<T: num_traits::Zero>(
    rows: &[Vec<T>],
    start: Point,
    end: Point,
) -> Result<SearchResult, GridError> {
    let grid = NodeGrid::from_numeric(rows, start, end)?;
    Ok(AstarSearch::from_grid(grid).run_to_completion())
}
