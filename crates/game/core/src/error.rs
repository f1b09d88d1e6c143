//! Errors for programmer-error-class failures.
//!
//! Routine failures (out-of-bounds placement, blocked moves, unknown ids) are
//! reported through `bool`/`Option` returns and never reach these types.

/// Errors surfaced by [`World`](crate::world::World) queries and loading.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum WorldError {
    #[error("area at ({x}, {y}) of size {width}x{height} is not inside the world")]
    InvalidArea {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },

    #[error("no entity carries the player tag")]
    PlayerNotFound,

    #[error("expected exactly one player entity, found {0}")]
    MultiplePlayers(usize),

    #[error("invalid world dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}
