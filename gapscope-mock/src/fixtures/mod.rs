pub mod bars;
pub mod gaps;
pub mod stats;
