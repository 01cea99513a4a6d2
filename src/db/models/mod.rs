mod order;

pub use order::OrderRecord;
