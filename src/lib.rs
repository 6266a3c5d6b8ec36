//! Grid-crossing arcade game core.
//!
//! The library owns gameplay only: entities, collision, the scoreboard state
//! machine and its timers.  Terminal I/O is confined to `display::terminal`
//! and the binary's frame driver.

pub mod collision;
pub mod compute;
pub mod display;
pub mod entities;
pub mod error;
pub mod grid;
pub mod scheduler;
