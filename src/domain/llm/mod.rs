//! Generative model domain types and trait

mod message;
mod provider;

pub use message::{Message, MessageRole};
pub use provider::GenerativeModel;

#[cfg(test)]
pub use provider::mock::MockGenerativeModel;
