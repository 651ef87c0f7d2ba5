use crate::error::{Endpoint, GridError};
use core::fmt;
use grid_util::point::Point;
use itertools::iproduct;
use log::debug;
use num_traits::Zero;
use smallvec::SmallVec;

/// Search bookkeeping for one open cell.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub point: Point,
    /// Known least cost from the start.
    pub g_score: f64,
    /// `g_score` plus the estimate to the goal.
    pub f_score: f64,
    /// Arena index of the predecessor on the best known path.
    pub came_from: Option<usize>,
    /// Order in which the node first entered the open set.
    pub(crate) discovered: Option<usize>,
    /// Arena indices of the open cells in the Moore neighbourhood.
    pub neighbours: SmallVec<[usize; 8]>,
}

impl Node {
    fn new(point: Point) -> Node {
        Node {
            point,
            g_score: f64::INFINITY,
            f_score: f64::INFINITY,
            came_from: None,
            discovered: None,
            neighbours: SmallVec::new(),
        }
    }
}

/// A cell of the [NodeGrid]: walls are sentinels without any bookkeeping.
#[derive(Clone, Debug, PartialEq)]
pub enum GridNode {
    Wall,
    Open(Node),
}

impl GridNode {
    pub fn is_wall(&self) -> bool {
        matches!(self, GridNode::Wall)
    }
    pub fn as_open(&self) -> Option<&Node> {
        match self {
            GridNode::Open(node) => Some(node),
            GridNode::Wall => None,
        }
    }
    pub fn as_open_mut(&mut self) -> Option<&mut Node> {
        match self {
            GridNode::Open(node) => Some(node),
            GridNode::Wall => None,
        }
    }
}

/// Arena of [GridNode]s built from a raw wall grid. `x` indexes the outer rows of the input
/// and `y` the position within a row, so the arena index of `(x, y)` is `x * height + y`.
///
/// A [NodeGrid] belongs to a single search: it is mutated in place while searching and is
/// not meant to be reset.
#[derive(Clone, Debug)]
pub struct NodeGrid {
    width: usize,
    height: usize,
    nodes: Vec<GridNode>,
    start: Point,
    end: Point,
}

impl NodeGrid {
    /// Builds the node arena from rows of wall flags (`true` is a wall) and computes the
    /// neighbours of every open node.
    pub fn build(rows: &[Vec<bool>], start: Point, end: Point) -> Result<NodeGrid, GridError> {
        let width = rows.len();
        let height = rows.first().map_or(0, |row| row.len());
        if let Some((row, found)) = rows
            .iter()
            .map(|r| r.len())
            .enumerate()
            .find(|&(_, len)| len != height)
        {
            return Err(GridError::MalformedGrid {
                row,
                expected: height,
                found,
            });
        }

        let nodes = iproduct!(0..width, 0..height)
            .map(|(x, y)| {
                if rows[x][y] {
                    GridNode::Wall
                } else {
                    GridNode::Open(Node::new(Point::new(x as i32, y as i32)))
                }
            })
            .collect();
        let mut grid = NodeGrid {
            width,
            height,
            nodes,
            start,
            end,
        };
        for (endpoint, point) in [(Endpoint::Start, start), (Endpoint::End, end)] {
            if !grid.in_bounds(&point) {
                return Err(GridError::InvalidCoordinate {
                    endpoint,
                    point,
                    width,
                    height,
                });
            }
            if grid.is_wall(&point) {
                return Err(GridError::BlockedEndpoint { endpoint, point });
            }
        }
        grid.compute_neighbours();
        debug!(
            "Built {}x{} node grid with {} open cells",
            width,
            height,
            grid.open_cell_count()
        );
        Ok(grid)
    }

    /// Builds the node arena from numeric rows where zero is open and anything else a wall.
    pub fn from_numeric<T: Zero>(
        rows: &[Vec<T>],
        start: Point,
        end: Point,
    ) -> Result<NodeGrid, GridError> {
        let rows = rows
            .iter()
            .map(|row| row.iter().map(|v| !v.is_zero()).collect::<Vec<bool>>())
            .collect::<Vec<_>>();
        NodeGrid::build(&rows, start, end)
    }

    /// Fills in the neighbour list of every open node with the open cells of its Moore
    /// neighbourhood, visited with the outer coordinate varying slowest.
    pub fn compute_neighbours(&mut self) {
        for ix in 0..self.nodes.len() {
            let Some(point) = self.nodes[ix].as_open().map(|n| n.point) else {
                continue;
            };
            let neighbours = iproduct!(point.x - 1..=point.x + 1, point.y - 1..=point.y + 1)
                .map(|(i, j)| Point::new(i, j))
                .filter(|p| *p != point && !self.is_wall(p))
                .filter_map(|p| self.index_of(&p))
                .collect::<SmallVec<[usize; 8]>>();
            if let Some(node) = self.nodes[ix].as_open_mut() {
                node.neighbours = neighbours;
            }
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }
    pub fn height(&self) -> usize {
        self.height
    }
    pub fn start(&self) -> Point {
        self.start
    }
    pub fn end(&self) -> Point {
        self.end
    }
    pub fn in_bounds(&self, point: &Point) -> bool {
        point.x >= 0
            && point.y >= 0
            && (point.x as usize) < self.width
            && (point.y as usize) < self.height
    }
    /// Out-of-bounds points count as walls.
    pub fn is_wall(&self, point: &Point) -> bool {
        self.index_of(point)
            .map_or(true, |ix| self.nodes[ix].is_wall())
    }
    pub fn index_of(&self, point: &Point) -> Option<usize> {
        if self.in_bounds(point) {
            Some(point.x as usize * self.height + point.y as usize)
        } else {
            None
        }
    }
    pub fn point_of(&self, ix: usize) -> Point {
        Point::new((ix / self.height) as i32, (ix % self.height) as i32)
    }
    pub fn node(&self, ix: usize) -> Option<&Node> {
        self.nodes.get(ix).and_then(GridNode::as_open)
    }
    pub fn node_mut(&mut self, ix: usize) -> Option<&mut Node> {
        self.nodes.get_mut(ix).and_then(GridNode::as_open_mut)
    }
    pub fn node_at(&self, point: &Point) -> Option<&Node> {
        self.index_of(point).and_then(|ix| self.node(ix))
    }
    /// Neighbouring open cells of the given point, empty for walls.
    pub fn neighbours(&self, point: &Point) -> Vec<Point> {
        match self.node_at(point) {
            Some(node) => node.neighbours.iter().map(|&ix| self.point_of(ix)).collect(),
            None => Vec::new(),
        }
    }
    pub fn open_cell_count(&self) -> usize {
        self.nodes.iter().filter(|n| !n.is_wall()).count()
    }
}

impl fmt::Display for NodeGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Grid:")?;
        for x in 0..self.width {
            let values = (0..self.height)
                .map(|y| self.nodes[x * self.height + y].is_wall() as i32)
                .collect::<Vec<i32>>();
            writeln!(f, "{:?}", values)?;
        }
        Ok(())
    }
}
