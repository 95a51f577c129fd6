use super::structure::SelectedStructure;

/// Renders the instruction sent to the generation service.
///
/// Inputs are interpolated as-is. The block lines are the only place the
/// requested section order is communicated, so they are emitted in
/// structure order.
pub fn build_prompt(
    topic: &str,
    blog_type: &str,
    internal_links: &[String],
    structure: &SelectedStructure,
) -> String {
    let block_instructions = structure
        .iter()
        .map(|block| format!("[{}]: {}", block.name, block.prompt))
        .collect::<Vec<_>>()
        .join("\n");

    let block_ids = structure
        .iter()
        .map(|block| block.id.as_ref())
        .collect::<Vec<&str>>()
        .join(", ");

    let links_instruction = if internal_links.is_empty() {
        String::new()
    } else {
        let bullets = internal_links
            .iter()
            .map(|link| format!("- {link}"))
            .collect::<Vec<_>>()
            .join("\n");
        format!(
            "\nInternal Links to Include (use descriptive anchor text, never the raw URL):\n{bullets}\n"
        )
    };

    let links_requirement = if internal_links.is_empty() {
        ""
    } else {
        "- Naturally incorporate the provided internal links where relevant\n"
    };

    format!(
        r#"Create a {blog_type} with these requirements:

Main Topic/Keywords/User Intent for blog generation: {topic}

Content Structure:
{block_instructions}
{links_instruction}
Requirements:
- Ensure main keywords are placed naturally in the first 100 words
- Use LSI (Latent Semantic Indexing) keywords throughout
- Use markdown ## to ###### for subheadings hierarchically
- Use > blockquotes for quotes (testimonials, inspirational quotes, etc.)
- Use **bold** for emphasis on key terms
- Use bullet points for better scanability
- Keep paragraphs short (3-4 sentences max)
- Use tables for comparative or statistical content
- Use the selected blocks in the order provided
- Ensure smooth transitions between blocks
- Write in a conversational, engaging style
- Provide actionable insights
- Aim for 800-1200 words
- Make sure to separate sections with newlines
{links_requirement}
Format the response as a single JSON object with exactly these fields:
- "title": SEO-optimized title (string)
- "slug": URL-friendly version of the title (string)
- "blocks": array with one object per Content Structure line, in the same order, each {{"type": "<block id>", "content": "<markdown>"}}; the block ids in order are: {block_ids}
- "metadata": {{"keywords": [string], "description": string, "readingTime": estimated reading time in whole minutes (integer)}}

Write the blog post now:"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::find_block;

    fn structure(ids: &[&str]) -> SelectedStructure {
        ids.iter()
            .map(|id| find_block(id).unwrap().clone())
            .collect::<Vec<_>>()
            .into()
    }

    #[test]
    fn test_block_lines_follow_structure_order() {
        let structure = structure(&["solution", "hook", "testimonial", "conclusion"]);
        let prompt = build_prompt("remote work", "Blog Post", &[], &structure);

        let mut last = 0;
        for block in &structure {
            let line = format!("[{}]: {}", block.name, block.prompt);
            assert_eq!(prompt.matches(&line).count(), 1, "{line}");
            let pos = prompt.find(&line).unwrap();
            assert!(pos >= last, "{line} out of order");
            last = pos;
        }
        assert!(prompt.contains("the block ids in order are: solution, hook, testimonial, conclusion"));
    }

    #[test]
    fn test_repeated_reusable_block_gets_a_line_each() {
        let structure = structure(&["joke", "hook", "joke"]);
        let prompt = build_prompt("cats", "Listicle", &[], &structure);
        let joke = find_block("joke").unwrap();
        let line = format!("[{}]: {}", joke.name, joke.prompt);
        assert_eq!(prompt.matches(&line).count(), 2);
    }

    #[test]
    fn test_no_links_section_without_links() {
        let prompt = build_prompt("remote work", "Blog Post", &[], &structure(&["hook"]));
        assert!(!prompt.contains("Internal Links"));
        assert!(!prompt.contains("internal links"));
    }

    #[test]
    fn test_each_link_bulleted_once() {
        let links = vec![
            "https://example.com/a".to_string(),
            "https://example.com/b".to_string(),
        ];
        let prompt = build_prompt("remote work", "Blog Post", &links, &structure(&["hook"]));
        assert!(prompt.contains("Internal Links to Include"));
        assert!(prompt.contains("descriptive anchor text"));
        for link in &links {
            assert_eq!(prompt.matches(&format!("- {link}\n")).count(), 1);
        }
    }

    #[test]
    fn test_empty_structure_is_tolerated() {
        let prompt = build_prompt("remote work", "Blog Post", &[], &SelectedStructure::new());
        assert!(prompt.contains("Content Structure:"));
        assert!(!prompt.contains("[Hook]"));
    }

    #[test]
    fn test_contains_topic_type_and_format_rules() {
        let prompt = build_prompt("remote work", "How-To Guide", &[], &structure(&["hook"]));
        assert!(prompt.starts_with("Create a How-To Guide"));
        assert!(prompt.contains("remote work"));
        assert!(prompt.contains("800-1200 words"));
        assert!(prompt.contains("\"metadata\""));
    }

    #[test]
    fn test_is_idempotent() {
        let links = vec!["https://example.com/a".to_string()];
        let structure = structure(&["hook", "statistics"]);
        let first = build_prompt("remote work", "Blog Post", &links, &structure);
        let second = build_prompt("remote work", "Blog Post", &links, &structure);
        assert_eq!(first, second);
    }
}
