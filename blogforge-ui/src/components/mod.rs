mod block_palette;
mod blog_preview;
mod blog_type_selector;
mod chat_panel;
mod error_display;
mod link_input;
mod loading_spinner;
mod structure_list;

pub use block_palette::BlockPalette;
pub use blog_preview::BlogPreview;
pub use blog_type_selector::BlogTypeSelector;
pub use chat_panel::ChatPanel;
pub use error_display::ErrorDisplay;
pub use link_input::LinkInput;
pub use loading_spinner::LoadingSpinner;
pub use structure_list::StructureList;
