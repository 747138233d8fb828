//! Language-model client used to answer free-text questions.

mod gemini;

pub use gemini::{
    Candidate, Content, GeminiClient, GeminiError, GenerateResponse, Part, DEFAULT_MODEL,
};
