//! HTTP proxy for the Abide journal: forwards AI actions to Gemini and Bible
//! lookups to FHL.

pub mod server;
