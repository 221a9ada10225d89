pub mod collector;
pub mod history;
pub mod kill;
pub mod sampler;
pub mod snapshot;
