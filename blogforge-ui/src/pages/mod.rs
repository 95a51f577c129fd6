mod home;

pub use home::{generate_blog, GenerateBlogFn, HomePage};
