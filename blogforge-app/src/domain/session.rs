use super::block::find_block;
use super::blog_type::DEFAULT_BLOG_TYPE;
use super::generation::{BlogMetadata, GeneratedBlock, GenerationRequest, GenerationResult};
use super::links::{validate_link, LinkError};
use super::session_store::StoreError;
use super::structure::{move_within, SelectedStructure, StructureError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where the user is in the guided flow. Only explicit actions advance it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Step {
    #[default]
    Initial,
    BlogType,
    InternalLinks,
    Structure,
    Generating,
    Preview,
}

impl Step {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::BlogType => "blogType",
            Self::InternalLinks => "internalLinks",
            Self::Structure => "structure",
            Self::Generating => "generating",
            Self::Preview => "preview",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// A generated block under edit. `id` is local to the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftBlock {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    pub title: String,
    pub slug: String,
    pub blocks: Vec<DraftBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BlogMetadata>,
}

impl Draft {
    /// The edited post, in the same shape the generator returned it.
    pub fn to_result(&self) -> GenerationResult {
        GenerationResult {
            title: self.title.clone(),
            slug: self.slug.clone(),
            blocks: self
                .blocks
                .iter()
                .map(|b| GeneratedBlock {
                    kind: b.kind.clone(),
                    content: b.content.clone(),
                    image_url: b.image_url.clone(),
                })
                .collect(),
            metadata: self.metadata.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionState {
    pub messages: Vec<ChatMessage>,
    pub initial_prompt: String,
    pub selected_blog_type: Option<String>,
    pub internal_links: Vec<String>,
    pub structure: SelectedStructure,
    pub current_step: Step,
    pub draft: Option<Draft>,
    pub last_error: Option<String>,
    pub next_block_id: u64,
}

impl SessionState {
    /// The request the handler expects for the current inputs.
    pub fn generation_request(&self) -> GenerationRequest {
        GenerationRequest {
            topic: self.initial_prompt.clone(),
            blog_type: self
                .selected_blog_type
                .clone()
                .unwrap_or_else(|| DEFAULT_BLOG_TYPE.to_string()),
            internal_links: self.internal_links.clone(),
            selected_structure: self.structure.clone(),
        }
    }

    pub fn is_generating(&self) -> bool {
        self.current_step == Step::Generating
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionAction {
    SubmitTopic(String),
    SelectBlogType(String),
    AddLink(String),
    RemoveLink(usize),
    ConfirmLinks,
    AddBlock(String),
    RemoveBlock(usize),
    MoveBlock { from: usize, to: usize },
    StartGeneration,
    GenerationSucceeded(GenerationResult),
    GenerationFailed(String),
    EditTitle(String),
    EditBlock {
        id: u64,
        content: String,
        image_url: Option<String>,
    },
    MoveDraftBlock { from: usize, to: usize },
    Reset,
}

impl SessionAction {
    fn name(&self) -> &'static str {
        match self {
            Self::SubmitTopic(_) => "submit a topic",
            Self::SelectBlogType(_) => "select a blog type",
            Self::AddLink(_) => "add a link",
            Self::RemoveLink(_) => "remove a link",
            Self::ConfirmLinks => "confirm links",
            Self::AddBlock(_) => "add a block",
            Self::RemoveBlock(_) => "remove a block",
            Self::MoveBlock { .. } => "reorder blocks",
            Self::StartGeneration => "start generation",
            Self::GenerationSucceeded(_) | Self::GenerationFailed(_) => "finish generation",
            Self::EditTitle(_) => "edit the title",
            Self::EditBlock { .. } | Self::MoveDraftBlock { .. } => "edit the draft",
            Self::Reset => "reset",
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SessionError {
    #[error("cannot {action} during the {step} step")]
    InvalidTransition { step: Step, action: &'static str },

    #[error("Tell me what the post should be about first")]
    EmptyTopic,

    #[error("Pick a blog type")]
    EmptyBlogType,

    #[error(transparent)]
    Link(#[from] LinkError),

    #[error("no link at position {0}")]
    UnknownLink(usize),

    #[error("unknown block \"{0}\"")]
    UnknownBlock(String),

    #[error(transparent)]
    Structure(#[from] StructureError),

    #[error("Add at least one block before generating")]
    EmptyStructure,

    #[error("no draft block with id {0}")]
    UnknownDraftBlock(u64),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

/// Pure transition function. `state` is never modified; the successor is
/// returned, or the reason the action does not apply.
pub fn reduce(state: &SessionState, action: SessionAction) -> Result<SessionState, SessionError> {
    let step = state.current_step;
    let mut next = state.clone();

    match (step, action) {
        (_, SessionAction::Reset) => return Ok(SessionState::default()),

        (Step::Initial, SessionAction::SubmitTopic(topic)) => {
            let topic = topic.trim();
            if topic.is_empty() {
                return Err(SessionError::EmptyTopic);
            }
            next.initial_prompt = topic.to_string();
            next.messages.push(ChatMessage::user(topic));
            next.messages
                .push(ChatMessage::assistant("What type of blog would you like to create?"));
            next.current_step = Step::BlogType;
        }

        (Step::BlogType, SessionAction::SelectBlogType(blog_type)) => {
            let blog_type = blog_type.trim();
            if blog_type.is_empty() {
                return Err(SessionError::EmptyBlogType);
            }
            next.selected_blog_type = Some(blog_type.to_string());
            next.messages.push(ChatMessage::user(blog_type));
            next.messages.push(ChatMessage::assistant(
                "Add any internal links you want referenced, or continue without them.",
            ));
            next.current_step = Step::InternalLinks;
        }

        (Step::InternalLinks, SessionAction::AddLink(link)) => {
            let link = validate_link(&link, &next.internal_links)?;
            next.internal_links.push(link);
        }

        (Step::InternalLinks, SessionAction::RemoveLink(index)) => {
            if index >= next.internal_links.len() {
                return Err(SessionError::UnknownLink(index));
            }
            next.internal_links.remove(index);
        }

        (Step::InternalLinks, SessionAction::ConfirmLinks) => {
            let summary = if next.internal_links.is_empty() {
                "No internal links".to_string()
            } else {
                next.internal_links.join("\n")
            };
            next.messages.push(ChatMessage::user(summary));
            next.messages.push(ChatMessage::assistant(
                "Now pick the blocks for your post and arrange them in order.",
            ));
            next.current_step = Step::Structure;
        }

        (Step::Structure, SessionAction::AddBlock(id)) => {
            let block = find_block(&id).ok_or(SessionError::UnknownBlock(id))?;
            next.structure.push(block.clone())?;
        }

        (Step::Structure, SessionAction::RemoveBlock(index)) => {
            next.structure.remove(index)?;
        }

        (Step::Structure, SessionAction::MoveBlock { from, to }) => {
            next.structure.move_block(from, to)?;
        }

        (Step::Structure, SessionAction::StartGeneration) => {
            if next.structure.is_empty() {
                return Err(SessionError::EmptyStructure);
            }
            next.last_error = None;
            next.current_step = Step::Generating;
        }

        (Step::Generating, SessionAction::GenerationSucceeded(result)) => {
            let blocks = result
                .blocks
                .into_iter()
                .map(|block| {
                    let id = next.next_block_id;
                    next.next_block_id += 1;
                    DraftBlock {
                        id,
                        kind: block.kind,
                        content: block.content,
                        image_url: block.image_url,
                    }
                })
                .collect();
            next.messages.push(ChatMessage::assistant(format!(
                "Your draft \"{}\" is ready. Edit it in the preview.",
                result.title
            )));
            next.draft = Some(Draft {
                title: result.title,
                slug: result.slug,
                blocks,
                metadata: result.metadata,
            });
            next.current_step = Step::Preview;
        }

        (Step::Generating, SessionAction::GenerationFailed(message)) => {
            next.messages.push(ChatMessage::assistant(format!(
                "Generation failed: {message}"
            )));
            next.last_error = Some(message);
            next.current_step = Step::Structure;
        }

        (Step::Preview, SessionAction::EditTitle(title)) => {
            if let Some(draft) = next.draft.as_mut() {
                draft.title = title;
            }
        }

        (Step::Preview, SessionAction::EditBlock {
            id,
            content,
            image_url,
        }) => {
            let block = next
                .draft
                .as_mut()
                .and_then(|d| d.blocks.iter_mut().find(|b| b.id == id))
                .ok_or(SessionError::UnknownDraftBlock(id))?;
            block.content = content;
            block.image_url = image_url;
        }

        (Step::Preview, SessionAction::MoveDraftBlock { from, to }) => {
            if let Some(draft) = next.draft.as_mut() {
                move_within(&mut draft.blocks, from, to).map_err(StructureError::OutOfRange)?;
            }
        }

        (step, action) => {
            return Err(SessionError::InvalidTransition {
                step,
                action: action.name(),
            })
        }
    }

    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(state: SessionState, actions: Vec<SessionAction>) -> SessionState {
        actions
            .into_iter()
            .fold(state, |s, a| reduce(&s, a).unwrap())
    }

    fn at_structure() -> SessionState {
        apply(
            SessionState::default(),
            vec![
                SessionAction::SubmitTopic("remote work".to_string()),
                SessionAction::SelectBlogType("How-To Guide".to_string()),
                SessionAction::AddLink("https://example.com/a".to_string()),
                SessionAction::ConfirmLinks,
            ],
        )
    }

    fn sample_result() -> GenerationResult {
        GenerationResult {
            title: "How to remote work".to_string(),
            slug: "how-to-remote-work".to_string(),
            blocks: vec![
                GeneratedBlock {
                    kind: "hook".to_string(),
                    content: "Hi".to_string(),
                    image_url: None,
                },
                GeneratedBlock {
                    kind: "conclusion".to_string(),
                    content: "Bye".to_string(),
                    image_url: None,
                },
            ],
            metadata: None,
        }
    }

    #[test]
    fn test_walks_through_steps() {
        let state = at_structure();
        assert_eq!(state.current_step, Step::Structure);
        assert_eq!(state.initial_prompt, "remote work");
        assert_eq!(state.selected_blog_type.as_deref(), Some("How-To Guide"));
        assert_eq!(state.internal_links, ["https://example.com/a"]);
        assert!(!state.messages.is_empty());
    }

    #[test]
    fn test_removing_missing_link_names_the_link() {
        let mut links = at_structure();
        links.current_step = Step::InternalLinks;

        let err = reduce(&links, SessionAction::RemoveLink(3)).unwrap_err();
        assert_eq!(err, SessionError::UnknownLink(3));
        assert_eq!(err.to_string(), "no link at position 3");

        let removed = reduce(&links, SessionAction::RemoveLink(0)).unwrap();
        assert!(removed.internal_links.is_empty());
    }

    #[test]
    fn test_empty_topic_rejected() {
        let err = reduce(&SessionState::default(), SessionAction::SubmitTopic("  ".into()));
        assert_eq!(err, Err(SessionError::EmptyTopic));
    }

    #[test]
    fn test_out_of_order_action_rejected() {
        let err = reduce(&SessionState::default(), SessionAction::StartGeneration).unwrap_err();
        assert_eq!(
            err,
            SessionError::InvalidTransition {
                step: Step::Initial,
                action: "start generation"
            }
        );
    }

    #[test]
    fn test_invalid_and_duplicate_links_rejected() {
        let state = apply(
            SessionState::default(),
            vec![
                SessionAction::SubmitTopic("t".into()),
                SessionAction::SelectBlogType("Listicle".into()),
                SessionAction::AddLink("https://example.com".into()),
            ],
        );
        assert!(matches!(
            reduce(&state, SessionAction::AddLink("not a url".into())),
            Err(SessionError::Link(LinkError::Invalid(_)))
        ));
        assert!(matches!(
            reduce(&state, SessionAction::AddLink("https://example.com".into())),
            Err(SessionError::Link(LinkError::Duplicate(_)))
        ));
    }

    #[test]
    fn test_structure_editing() {
        let state = apply(
            at_structure(),
            vec![
                SessionAction::AddBlock("hook".into()),
                SessionAction::AddBlock("solution".into()),
                SessionAction::AddBlock("conclusion".into()),
                SessionAction::MoveBlock { from: 2, to: 0 },
                SessionAction::RemoveBlock(1),
            ],
        );
        let ids: Vec<&str> = state.structure.iter().map(|b| &*b.id).collect();
        assert_eq!(ids, ["conclusion", "solution"]);

        assert!(matches!(
            reduce(&state, SessionAction::AddBlock("conclusion".into())),
            Err(SessionError::Structure(StructureError::AlreadySelected(_)))
        ));
        assert_eq!(
            reduce(&state, SessionAction::AddBlock("nope".into())),
            Err(SessionError::UnknownBlock("nope".into()))
        );
    }

    #[test]
    fn test_generation_requires_blocks() {
        assert_eq!(
            reduce(&at_structure(), SessionAction::StartGeneration),
            Err(SessionError::EmptyStructure)
        );
    }

    #[test]
    fn test_failure_returns_to_structure_keeping_input() {
        let state = apply(
            at_structure(),
            vec![
                SessionAction::AddBlock("hook".into()),
                SessionAction::StartGeneration,
            ],
        );
        assert!(state.is_generating());
        assert!(reduce(&state, SessionAction::StartGeneration).is_err());

        let failed = reduce(&state, SessionAction::GenerationFailed("boom".into())).unwrap();
        assert_eq!(failed.current_step, Step::Structure);
        assert_eq!(failed.last_error.as_deref(), Some("boom"));
        assert_eq!(failed.structure.len(), 1);
        assert_eq!(failed.initial_prompt, "remote work");
    }

    #[test]
    fn test_success_builds_editable_draft() {
        let state = apply(
            at_structure(),
            vec![
                SessionAction::AddBlock("hook".into()),
                SessionAction::AddBlock("conclusion".into()),
                SessionAction::StartGeneration,
                SessionAction::GenerationSucceeded(sample_result()),
            ],
        );
        assert_eq!(state.current_step, Step::Preview);
        let draft = state.draft.as_ref().unwrap();
        assert_eq!(draft.blocks.iter().map(|b| b.id).collect::<Vec<_>>(), [0, 1]);

        let edited = apply(
            state,
            vec![
                SessionAction::EditTitle("Remote, done right".into()),
                SessionAction::EditBlock {
                    id: 1,
                    content: "See you".into(),
                    image_url: None,
                },
                SessionAction::MoveDraftBlock { from: 1, to: 0 },
            ],
        );
        let result = edited.draft.as_ref().unwrap().to_result();
        assert_eq!(result.title, "Remote, done right");
        assert_eq!(result.blocks[0].content, "See you");
        assert_eq!(result.blocks[1].kind, "hook");

        assert_eq!(
            reduce(
                &edited,
                SessionAction::EditBlock {
                    id: 42,
                    content: String::new(),
                    image_url: None
                }
            ),
            Err(SessionError::UnknownDraftBlock(42))
        );
    }

    #[test]
    fn test_generation_request_from_state() {
        let state = reduce(&at_structure(), SessionAction::AddBlock("hook".into())).unwrap();
        let request = state.generation_request();
        assert_eq!(request.topic, "remote work");
        assert_eq!(request.blog_type, "How-To Guide");
        assert_eq!(request.internal_links.len(), 1);
        assert_eq!(request.selected_structure.len(), 1);
    }

    #[test]
    fn test_reset_from_any_step() {
        let state = reduce(&at_structure(), SessionAction::Reset).unwrap();
        assert_eq!(state, SessionState::default());
    }

    #[test]
    fn test_state_serializes_step_names() {
        let json = serde_json::to_value(at_structure()).unwrap();
        assert_eq!(json["currentStep"], "structure");
        assert_eq!(json["selectedBlogType"], "How-To Guide");
    }
}
