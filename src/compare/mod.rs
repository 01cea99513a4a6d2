mod fees;

pub use fees::{FeeComparator, FeeComparison, FeeQuote, ReferenceSwap};
