//! Integer 2D vector used for grid cells and headings.

use std::fmt;
use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

/// A point or offset on the grid.
///
/// The grid uses screen coordinates: `y` grows downwards, so [`Vector::UP`]
/// is `(0, -1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Vector {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

#[allow(clippy::should_implement_trait)]
impl Vector {
    /// Heading towards row 0.
    pub const UP: Self = Self::new(0, -1);
    /// Heading towards the last row.
    pub const DOWN: Self = Self::new(0, 1);
    /// Heading towards column 0.
    pub const LEFT: Self = Self::new(-1, 0);
    /// Heading towards the last column.
    pub const RIGHT: Self = Self::new(1, 0);

    /// The four unit headings, in decision priority order.
    pub const CARDINALS: [Self; 4] = [Self::UP, Self::DOWN, Self::LEFT, Self::RIGHT];

    /// The eight compass headings, clockwise from north.
    pub const COMPASS: [Self; 8] = [
        Self::new(0, -1),
        Self::new(1, -1),
        Self::new(1, 0),
        Self::new(1, 1),
        Self::new(0, 1),
        Self::new(-1, 1),
        Self::new(-1, 0),
        Self::new(-1, -1),
    ];

    /// Creates a vector.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Component-wise sum.
    pub const fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }

    /// Component-wise difference.
    pub const fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }

    /// Euclidean distance between two points.
    pub fn dist(self, other: Self) -> f32 {
        let d = self.sub(other);
        ((d.x * d.x + d.y * d.y) as f32).sqrt()
    }

    /// Value equality.
    pub fn equals(self, other: Self) -> bool {
        self == other
    }

    /// Whether `self` points exactly opposite to `other`.
    pub fn is_reverse_of(self, other: Self) -> bool {
        self.x == -other.x && self.y == -other.y && self != Self::default()
    }

    /// Whether this is one of the four unit headings.
    pub fn is_cardinal(self) -> bool {
        Self::CARDINALS.contains(&self)
    }
}

impl Add for Vector {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Vector::add(self, rhs)
    }
}

impl Sub for Vector {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Vector::sub(self, rhs)
    }
}

impl Mul<i32> for Vector {
    type Output = Self;

    fn mul(self, rhs: i32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
