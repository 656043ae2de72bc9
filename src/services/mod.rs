// Service exports
pub mod gemini;
pub mod supabase;

pub use gemini::{build_academic_prompt, GeminiClient, GenerationError, GenerationOptions};
pub use supabase::{SupabaseClient, SupabaseError};
