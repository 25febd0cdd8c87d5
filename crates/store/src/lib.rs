#![forbid(unsafe_code)]

pub mod client;
pub mod http;
pub mod memory;

pub use client::{QuestionStore, StoreError};
pub use http::{HttpQuestionStore, StoreConfig};
pub use memory::InMemoryQuestionStore;
