//! Errors raised while turning a raw grid into a searchable [NodeGrid](crate::node_grid::NodeGrid).
use core::fmt;
use grid_util::point::Point;
use thiserror::Error;

/// Which end of the search a coordinate belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
    Start,
    End,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Endpoint::Start => write!(f, "start"),
            Endpoint::End => write!(f, "end"),
        }
    }
}

/// Construction errors. All of them are raised before any search work happens; an
/// unreachable goal is not an error but a failed [SearchResult](crate::search::SearchResult).
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum GridError {
    /// Start or end lies outside `[0, width) x [0, height)`.
    #[error("{endpoint} coordinate {point} is outside the {width}x{height} grid")]
    InvalidCoordinate {
        endpoint: Endpoint,
        point: Point,
        width: usize,
        height: usize,
    },
    /// Rows of the input grid have unequal lengths.
    #[error("row {row} has length {found}, expected {expected}")]
    MalformedGrid {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// Start or end is a wall cell.
    #[error("{endpoint} coordinate {point} is a wall")]
    BlockedEndpoint { endpoint: Endpoint, point: Point },
}
