use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// One kind of section a generated post can contain.
///
/// The catalog below is compiled in and never mutated. Icons and colours
/// live in the UI crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockDescriptor {
    pub id: Cow<'static, str>,
    pub name: Cow<'static, str>,
    pub prompt: Cow<'static, str>,
    #[serde(default)]
    pub reusable: bool,
    /// May be selected at most once per structure.
    #[serde(default, alias = "disabled")]
    pub single_use: bool,
}

impl BlockDescriptor {
    const fn single(id: &'static str, name: &'static str, prompt: &'static str) -> Self {
        Self {
            id: Cow::Borrowed(id),
            name: Cow::Borrowed(name),
            prompt: Cow::Borrowed(prompt),
            reusable: false,
            single_use: true,
        }
    }

    const fn reusable(id: &'static str, name: &'static str, prompt: &'static str) -> Self {
        Self {
            id: Cow::Borrowed(id),
            name: Cow::Borrowed(name),
            prompt: Cow::Borrowed(prompt),
            reusable: true,
            single_use: false,
        }
    }

    pub fn is_image(&self) -> bool {
        self.id == IMAGE_BLOCK_ID
    }
}

pub const IMAGE_BLOCK_ID: &str = "image";

pub static BLOCK_CATALOG: &[BlockDescriptor] = &[
    BlockDescriptor::single(
        "hook",
        "Hook",
        "Create an engaging opening that immediately captures the reader's attention.",
    ),
    BlockDescriptor::single(
        "problem-statement",
        "Problem Statement",
        "Clearly define the central challenge or issue the blog post will address.",
    ),
    BlockDescriptor::single(
        "myth-busting",
        "Myth Busting",
        "Identify and debunk common misconceptions related to the topic.",
    ),
    BlockDescriptor::single(
        "inspirational-quote",
        "Inspirational Quote",
        "Include a motivational quote that reinforces the blog's message.",
    ),
    BlockDescriptor::single(
        "summary",
        "Summary",
        "Provide a concise overview of the key points discussed.",
    ),
    BlockDescriptor::single(
        "personal-story",
        "Personal Story",
        "Share a brief, relatable personal experience that illustrates the topic.",
    ),
    BlockDescriptor::single(
        "solution",
        "Solution",
        "Offer practical, actionable solutions to the problem discussed.",
    ),
    BlockDescriptor::single(
        "call-to-action",
        "Call to Action",
        "Encourage readers to take specific, meaningful steps.",
    ),
    BlockDescriptor::single(
        "conclusion",
        "Conclusion",
        "Wrap up the blog with a powerful, memorable closing statement.",
    ),
    BlockDescriptor::reusable(
        IMAGE_BLOCK_ID,
        "Image",
        "Create a caption for generating an image considering nearby blocks.",
    ),
    BlockDescriptor::reusable(
        "resource",
        "Resource",
        "Recommend additional resources for readers to explore further.",
    ),
    BlockDescriptor::reusable(
        "testimonial",
        "Testimonial",
        "Present a credible quote or story from someone who has relevant experience.",
    ),
    BlockDescriptor::reusable(
        "statistics",
        "Statistics",
        "Provide data-driven insights that support the blog's main argument.",
    ),
    BlockDescriptor::reusable(
        "joke",
        "Joke",
        "Insert a relevant, light-hearted joke that connects to the blog's theme.",
    ),
];

pub fn find_block(id: &str) -> Option<&'static BlockDescriptor> {
    BLOCK_CATALOG.iter().find(|b| b.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_ids_are_unique() {
        let ids: HashSet<_> = BLOCK_CATALOG.iter().map(|b| &*b.id).collect();
        assert_eq!(ids.len(), BLOCK_CATALOG.len());
    }

    #[test]
    fn test_single_use_blocks_are_not_reusable() {
        for block in BLOCK_CATALOG {
            assert_ne!(block.reusable, block.single_use, "{}", block.id);
        }
    }

    #[test]
    fn test_find_block() {
        assert_eq!(find_block("hook").map(|b| &*b.name), Some("Hook"));
        assert!(find_block("image").unwrap().is_image());
        assert!(find_block("nope").is_none());
    }

    #[test]
    fn test_deserializes_browser_descriptor() {
        let json = r#"{"id":"hook","name":"Hook","prompt":"Open strong.","disabled":true}"#;
        let block: BlockDescriptor = serde_json::from_str(json).unwrap();
        assert!(block.single_use);
        assert!(!block.reusable);
        assert_eq!(block.prompt, "Open strong.");
    }
}
