//! The chat surface: callback-data parsing, per-user booking flow state, and
//! the master-role command surface. Message rendering and the transport
//! itself are out of scope; this module only decides what happens next.

pub mod callback;
pub mod flow;
pub mod handler;
pub mod master_flow;

pub use callback::Callback;
pub use flow::{FlowRegistry, FlowState};
pub use handler::handle;
