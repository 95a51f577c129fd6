pub mod offline;
pub mod openrouter;
pub mod security;
