//! Client SDK for the video generation proxy.

pub mod client;

pub use client::{GenerateClient, GenerateOutcome, GenerationResponse};
