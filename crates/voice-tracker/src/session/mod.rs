//! Session tracking

mod table;

pub use table::{Drained, SessionTable};
