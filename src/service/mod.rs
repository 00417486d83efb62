//! Service layer module.
//!
//! Contains the generation and registration pipeline.

pub mod generator;
pub mod issuer;
pub mod processor;
pub mod random;

pub use generator::Generator;
pub use issuer::{IssueReport, Issuer};
pub use processor::{Outcomes, Processor, merge};
pub use random::{RandomSource, RngSource};
