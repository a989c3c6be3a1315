//! Model implementations for Fintune.
//!
//! This crate provides concrete implementations of the `Model` trait.
//!
//! # Supported Providers
//!
//! - **Mock**: scripted responses for tests and dependency-free runs
//! - **OpenAI**: OpenAI's chat-completion API, or any compatible endpoint
//!   (API key required)

pub mod factory;
pub mod mock;
pub mod openai;

pub use factory::{ModelConfig, ModelFactory, ModelProvider};
pub use mock::MockModel;
pub use openai::OpenAiModel;
