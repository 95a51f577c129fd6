/// Checks that `link` is an absolute URL and not already in `existing`.
/// Returns the trimmed link.
pub fn validate_link(link: &str, existing: &[String]) -> Result<String, LinkError> {
    let link = link.trim();
    if link.is_empty() {
        return Err(LinkError::Empty);
    }
    url::Url::parse(link).map_err(|_| LinkError::Invalid(link.to_string()))?;
    if existing.iter().any(|l| l == link) {
        return Err(LinkError::Duplicate(link.to_string()));
    }
    Ok(link.to_string())
}

/// Validates a whole list, in order, and returns it trimmed. Duplicates are
/// detected after trimming.
pub fn validate_links(links: &[String]) -> Result<Vec<String>, LinkError> {
    links.iter().try_fold(Vec::with_capacity(links.len()), |mut accepted, link| {
        let link = validate_link(link, &accepted)?;
        accepted.push(link);
        Ok(accepted)
    })
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LinkError {
    #[error("link is empty")]
    Empty,

    #[error("\"{0}\" is not a valid URL (e.g. https://example.com)")]
    Invalid(String),

    #[error("\"{0}\" has already been added")]
    Duplicate(String),
}
