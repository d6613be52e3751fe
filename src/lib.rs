//! PomoDesk control core.
//!
//! Session state machine, settings editor and card binding for the desk
//! focus timer, plus the embedded-hal drivers and adapters that connect
//! it to the board.  Everything here builds and tests on the host; the
//! board crate supplies bus, pins and the periodic tick.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod drivers;
pub mod error;
pub mod fsm;
pub mod sensors;
pub mod timebase;
