//! Email/password sign-in flow

mod service;

#[cfg(test)]
mod tests;

pub use service::{EmailLoginFlow, LoginOutcome};
