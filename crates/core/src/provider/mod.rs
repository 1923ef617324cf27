pub mod gemini;
mod gemini_types;
