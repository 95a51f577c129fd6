mod block;
mod blog_type;
mod generation;
mod links;
mod prompt;
mod session;
mod session_store;
mod slug;
mod structure;

pub use block::{find_block, BlockDescriptor, BLOCK_CATALOG, IMAGE_BLOCK_ID};
pub use blog_type::{BLOG_TYPES, DEFAULT_BLOG_TYPE};
pub use generation::{
    BlogMetadata, GeneratedBlock, GenerationRequest, GenerationResult, ResponseSchema,
};
pub use links::{validate_link, validate_links, LinkError};
pub use prompt::build_prompt;
pub use session::{
    reduce, ChatMessage, Draft, DraftBlock, Role, SessionAction, SessionError, SessionState, Step,
};
pub use session_store::{
    decode_state, encode_state, MemorySessionStore, SessionContainer, SessionStore, StoreError,
    STORAGE_KEY,
};
pub use slug::create_slug;
pub use structure::{SelectedStructure, StructureError};
