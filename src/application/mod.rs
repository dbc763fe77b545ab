//! Application layer
//!
//! Use cases that turn authenticated requests into calls on the domain
//! services. Each use case takes a command of plain values and returns
//! domain entities or the context's error.

pub mod consumer;
pub mod order;
pub mod vendor;
