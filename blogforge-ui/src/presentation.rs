/// Rendering-only attributes of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockStyle {
    pub icon: &'static str,
    pub color: &'static str,
}

pub fn block_style(id: &str) -> BlockStyle {
    let (icon, color) = match id {
        "hook" => ("⚓", "amber"),
        "problem-statement" => ("⚠", "amber"),
        "myth-busting" => ("🚫", "amber"),
        "inspirational-quote" => ("❝", "sky"),
        "summary" => ("📄", "sky"),
        "personal-story" => ("📖", "sky"),
        "solution" => ("💡", "sky"),
        "call-to-action" => ("➜", "fuchsia"),
        "conclusion" => ("✔", "fuchsia"),
        "image" => ("🖼", "orange"),
        "resource" => ("🔖", "orange"),
        "testimonial" => ("💬", "orange"),
        "statistics" => ("📊", "orange"),
        "joke" => ("😄", "orange"),
        _ => ("■", "slate"),
    };
    BlockStyle { icon, color }
}
