pub const BLOG_TYPES: &[&str] = &[
    "News Article",
    "Blog Post",
    "How-To Guide",
    "Listicle",
    "Comparison Blog",
    "Technical Article",
    "Product Review",
];

pub const DEFAULT_BLOG_TYPE: &str = "Blog Post";
