//! Drop-target selection as pure geometry.
//!
//! A [`CollisionStrategy`] picks which column a pointer is over, given the
//! on-screen regions of the column drop targets. Coordinates are terminal
//! cells; distances are compared squared so no floating point is involved.

use std::fmt;
use std::str::FromStr;

use taskboard_proto::task::TaskStatus;

/// A terminal cell position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    /// Column (0 = leftmost).
    pub x: u16,
    /// Row (0 = top).
    pub y: u16,
}

impl Point {
    /// Creates a point.
    #[must_use]
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to `other`.
    #[must_use]
    pub fn distance_sq(self, other: Self) -> u64 {
        let dx = u64::from(self.x.abs_diff(other.x));
        let dy = u64::from(self.y.abs_diff(other.y));
        dx * dx + dy * dy
    }
}

/// An axis-aligned rectangle of cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Region {
    /// Left edge.
    pub x: u16,
    /// Top edge.
    pub y: u16,
    /// Width in cells.
    pub width: u16,
    /// Height in cells.
    pub height: u16,
}

impl Region {
    /// Creates a region.
    #[must_use]
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rightmost column still inside the region.
    const fn right(self) -> u16 {
        self.x.saturating_add(self.width.saturating_sub(1))
    }

    /// Bottom row still inside the region.
    const fn bottom(self) -> u16 {
        self.y.saturating_add(self.height.saturating_sub(1))
    }

    /// The four corner cells: top-left, top-right, bottom-left, bottom-right.
    #[must_use]
    pub const fn corners(self) -> [Point; 4] {
        [
            Point::new(self.x, self.y),
            Point::new(self.right(), self.y),
            Point::new(self.x, self.bottom()),
            Point::new(self.right(), self.bottom()),
        ]
    }

    /// The center cell (rounded toward the top-left).
    #[must_use]
    pub const fn center(self) -> Point {
        Point::new(
            self.x.saturating_add(self.width / 2),
            self.y.saturating_add(self.height / 2),
        )
    }

    /// Whether `p` lies inside the region.
    #[must_use]
    pub const fn contains(self, p: Point) -> bool {
        self.width > 0
            && self.height > 0
            && p.x >= self.x
            && p.x <= self.right()
            && p.y >= self.y
            && p.y <= self.bottom()
    }
}

/// A column drop target: its status identity and on-screen region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropTarget {
    /// Status a task takes when dropped here.
    pub status: TaskStatus,
    /// Where the column is drawn.
    pub region: Region,
}

/// Picks the drop target a pointer is over.
pub trait CollisionStrategy: fmt::Debug + Send + Sync {
    /// Returns the chosen target's status, or `None` when nothing qualifies.
    ///
    /// Ties go to the target listed first.
    fn detect(&self, pointer: Point, targets: &[DropTarget]) -> Option<TaskStatus>;
}

/// Target whose nearest corner is closest to the pointer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClosestCorners;

impl CollisionStrategy for ClosestCorners {
    fn detect(&self, pointer: Point, targets: &[DropTarget]) -> Option<TaskStatus> {
        targets
            .iter()
            .min_by_key(|t| {
                t.region
                    .corners()
                    .iter()
                    .map(|c| pointer.distance_sq(*c))
                    .min()
                    .unwrap_or(u64::MAX)
            })
            .map(|t| t.status)
    }
}

/// Target whose center is closest to the pointer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClosestCenter;

impl CollisionStrategy for ClosestCenter {
    fn detect(&self, pointer: Point, targets: &[DropTarget]) -> Option<TaskStatus> {
        targets
            .iter()
            .min_by_key(|t| pointer.distance_sq(t.region.center()))
            .map(|t| t.status)
    }
}

/// First target whose region contains the pointer.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerWithin;

impl CollisionStrategy for PointerWithin {
    fn detect(&self, pointer: Point, targets: &[DropTarget]) -> Option<TaskStatus> {
        targets
            .iter()
            .find(|t| t.region.contains(pointer))
            .map(|t| t.status)
    }
}

/// Configurable choice of collision strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CollisionKind {
    /// [`ClosestCorners`].
    #[default]
    ClosestCorners,
    /// [`ClosestCenter`].
    ClosestCenter,
    /// [`PointerWithin`].
    PointerWithin,
}

impl CollisionKind {
    /// Builds the strategy this kind names.
    #[must_use]
    pub fn strategy(self) -> Box<dyn CollisionStrategy> {
        match self {
            Self::ClosestCorners => Box::new(ClosestCorners),
            Self::ClosestCenter => Box::new(ClosestCenter),
            Self::PointerWithin => Box::new(PointerWithin),
        }
    }
}

impl FromStr for CollisionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "closest-corners" => Ok(Self::ClosestCorners),
            "closest-center" => Ok(Self::ClosestCenter),
            "pointer-within" => Ok(Self::PointerWithin),
            other => Err(format!("unknown collision strategy: {other}")),
        }
    }
}

impl fmt::Display for CollisionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClosestCorners => f.write_str("closest-corners"),
            Self::ClosestCenter => f.write_str("closest-center"),
            Self::PointerWithin => f.write_str("pointer-within"),
        }
    }
}
