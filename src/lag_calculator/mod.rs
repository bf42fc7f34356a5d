// Inner modules
mod accumulator;
mod calculator;
mod errors;

// Exports
pub use calculator::LagCalculator;
