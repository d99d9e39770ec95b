pub mod runner;

pub use runner::{Invocation, ProcessRunner, RunResult};
