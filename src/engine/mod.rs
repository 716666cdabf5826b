pub mod predictor;

mod results;
mod worker;

#[cfg(test)]
mod integration_tests;

pub use predictor::Predictor;
