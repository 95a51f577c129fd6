mod generator;

pub use generator::{OfflineGenerator, PLACEHOLDER_IMAGE_URL};
