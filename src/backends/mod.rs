//! Backend implementation for the Gemini generative-language API.

pub mod gemini;
