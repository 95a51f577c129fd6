mod generate_blog;

pub use generate_blog::{GenerateBlog, LlmBackend};
