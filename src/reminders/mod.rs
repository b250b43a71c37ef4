//! Reminder planning and dispatch. Planning is pure (`domain::reminder`);
//! this module owns the store-backed persistence and the background
//! dispatch loop.

pub mod dispatcher;

pub use dispatcher::run_dispatcher;
