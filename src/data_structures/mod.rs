//! Collections backing the frontiers.

pub mod heap;
