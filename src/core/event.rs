use crate::error::{Error, Result};
use ordered_float::NotNan;
use std::cmp::Ordering;
use std::fmt;

/// Coordinate axis of a container wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// Component index into position/velocity arrays.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
        }
    }
}

/// One of the four walls of the square container.
///
/// `is_max == false` is the wall at coordinate 0, `true` the wall at `size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Wall {
    pub axis: Axis,
    pub is_max: bool,
}

impl Wall {
    pub const fn new(axis: Axis, is_max: bool) -> Self {
        Self { axis, is_max }
    }

    /// Numeric id: 2*k for the min wall on axis k, 2*k+1 for the max wall.
    #[inline]
    pub fn id(self) -> u32 {
        (2 * self.axis.index() + usize::from(self.is_max)) as u32
    }
}

/// A candidate collision, `dt` from now, under current straight-line motion.
///
/// `dt` may be `+inf` (never meets) but never NaN. Ball references are
/// indices into the engine's ball collection; for pairs `ball_1 < ball_2`.
///
/// Ordering is total and deterministic: by `dt`, then pair events before
/// wall events, then by ball indices, then by wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionEvent {
    /// A single ball reaches a wall.
    Wall {
        ball: usize,
        wall: Wall,
        dt: NotNan<f64>,
    },
    /// Two balls come into contact.
    Balls {
        ball_1: usize,
        ball_2: usize,
        dt: NotNan<f64>,
    },
}

impl CollisionEvent {
    /// Create a wall event, rejecting NaN times.
    pub fn wall(ball: usize, wall: Wall, dt: f64) -> Result<Self> {
        Ok(Self::Wall {
            ball,
            wall,
            dt: checked_time(dt)?,
        })
    }

    /// Create a pair event; indices are stored in ascending order.
    pub fn balls(i: usize, j: usize, dt: f64) -> Result<Self> {
        if i == j {
            return Err(Error::InvalidParam(format!(
                "ball {i} cannot collide with itself"
            )));
        }
        let (ball_1, ball_2) = if i < j { (i, j) } else { (j, i) };
        Ok(Self::Balls {
            ball_1,
            ball_2,
            dt: checked_time(dt)?,
        })
    }

    /// Returns the raw f64 time-from-now.
    #[inline]
    pub fn dt(&self) -> f64 {
        match *self {
            CollisionEvent::Wall { dt, .. } | CollisionEvent::Balls { dt, .. } => dt.into_inner(),
        }
    }

    /// True if the event never happens under current motion.
    #[inline]
    pub fn is_never(&self) -> bool {
        self.dt().is_infinite()
    }

    /// Copy of this event with a different time.
    pub(crate) fn with_dt(self, dt: f64) -> Result<Self> {
        let dt = checked_time(dt)?;
        Ok(match self {
            CollisionEvent::Wall { ball, wall, .. } => CollisionEvent::Wall { ball, wall, dt },
            CollisionEvent::Balls { ball_1, ball_2, .. } => {
                CollisionEvent::Balls { ball_1, ball_2, dt }
            }
        })
    }

    #[inline]
    fn order_key(&self) -> (u8, usize, usize) {
        match *self {
            CollisionEvent::Balls { ball_1, ball_2, .. } => (0, ball_1, ball_2),
            CollisionEvent::Wall { ball, wall, .. } => (1, ball, wall.id() as usize),
        }
    }

    #[inline]
    fn time(&self) -> NotNan<f64> {
        match *self {
            CollisionEvent::Wall { dt, .. } | CollisionEvent::Balls { dt, .. } => dt,
        }
    }
}

fn checked_time(dt: f64) -> Result<NotNan<f64>> {
    NotNan::new(dt).map_err(|_| Error::InvalidParam("event time cannot be NaN".into()))
}

impl Ord for CollisionEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.time().cmp(&other.time()) {
            Ordering::Equal => self.order_key().cmp(&other.order_key()),
            o => o,
        }
    }
}

impl PartialOrd for CollisionEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for CollisionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            CollisionEvent::Wall { ball, wall, dt } => write!(
                f,
                "WallCollision(ball={ball}, axis={:?}, max={}, dt={dt})",
                wall.axis, wall.is_max
            ),
            CollisionEvent::Balls { ball_1, ball_2, dt } => {
                write!(f, "BallsCollision(ball_1={ball_1}, ball_2={ball_2}, dt={dt})")
            }
        }
    }
}
