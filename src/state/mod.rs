mod store;

pub use store::{PostLogEntry, StateStore};
