use super::block::BlockDescriptor;
use serde::{Deserialize, Serialize};

/// The user's ordered choice of blocks. Order is the order sections must
/// appear in the generated post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectedStructure(Vec<BlockDescriptor>);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StructureError {
    #[error("\"{0}\" can only be used once")]
    AlreadySelected(String),

    #[error("no block at position {0}")]
    OutOfRange(usize),
}

impl SelectedStructure {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blocks(&self) -> &[BlockDescriptor] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BlockDescriptor> {
        self.0.iter()
    }

    /// A single-use block is available only while it is not already present.
    pub fn is_available(&self, block: &BlockDescriptor) -> bool {
        !block.single_use || !self.0.iter().any(|b| b.id == block.id)
    }

    pub fn push(&mut self, block: BlockDescriptor) -> Result<(), StructureError> {
        if !self.is_available(&block) {
            return Err(StructureError::AlreadySelected(block.name.into_owned()));
        }
        self.0.push(block);
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<BlockDescriptor, StructureError> {
        if index >= self.0.len() {
            return Err(StructureError::OutOfRange(index));
        }
        Ok(self.0.remove(index))
    }

    /// Moves the block at `from` so it ends up at `to`.
    pub fn move_block(&mut self, from: usize, to: usize) -> Result<(), StructureError> {
        move_within(&mut self.0, from, to).map_err(StructureError::OutOfRange)
    }

    /// Returns the first single-use block that appears more than once.
    pub fn first_duplicate(&self) -> Option<&BlockDescriptor> {
        self.0.iter().enumerate().find_map(|(i, block)| {
            (block.single_use && self.0[..i].iter().any(|b| b.id == block.id)).then_some(block)
        })
    }
}

impl From<Vec<BlockDescriptor>> for SelectedStructure {
    fn from(blocks: Vec<BlockDescriptor>) -> Self {
        Self(blocks)
    }
}

impl<'a> IntoIterator for &'a SelectedStructure {
    type Item = &'a BlockDescriptor;
    type IntoIter = std::slice::Iter<'a, BlockDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// List splice shared by every reorderable list. On error returns the
/// offending index.
pub(crate) fn move_within<T>(items: &mut Vec<T>, from: usize, to: usize) -> Result<(), usize> {
    if from >= items.len() {
        return Err(from);
    }
    if to >= items.len() {
        return Err(to);
    }
    let item = items.remove(from);
    items.insert(to, item);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::find_block;

    fn block(id: &str) -> BlockDescriptor {
        find_block(id).unwrap().clone()
    }

    fn ids(structure: &SelectedStructure) -> Vec<&str> {
        structure.iter().map(|b| &*b.id).collect()
    }

    #[test]
    fn test_single_use_block_only_once() {
        let mut structure = SelectedStructure::new();
        structure.push(block("hook")).unwrap();
        assert!(!structure.is_available(&block("hook")));
        assert_eq!(
            structure.push(block("hook")),
            Err(StructureError::AlreadySelected("Hook".to_string()))
        );
    }

    #[test]
    fn test_reusable_block_repeats() {
        let mut structure = SelectedStructure::new();
        structure.push(block("testimonial")).unwrap();
        structure.push(block("testimonial")).unwrap();
        assert_eq!(structure.len(), 2);
        assert!(structure.first_duplicate().is_none());
    }

    #[test]
    fn test_move_block_splices() {
        let mut structure: SelectedStructure =
            vec![block("hook"), block("solution"), block("conclusion")].into();
        structure.move_block(0, 2).unwrap();
        assert_eq!(ids(&structure), ["solution", "conclusion", "hook"]);
        structure.move_block(2, 1).unwrap();
        assert_eq!(ids(&structure), ["solution", "hook", "conclusion"]);
        assert_eq!(structure.move_block(3, 0), Err(StructureError::OutOfRange(3)));
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut structure: SelectedStructure = vec![block("hook")].into();
        assert_eq!(structure.remove(1), Err(StructureError::OutOfRange(1)));
        assert_eq!(structure.remove(0).unwrap().id, "hook");
        assert!(structure.is_empty());
    }

    #[test]
    fn test_first_duplicate_finds_repeated_single_use() {
        let structure: SelectedStructure =
            vec![block("hook"), block("joke"), block("hook")].into();
        assert_eq!(structure.first_duplicate().map(|b| &*b.id), Some("hook"));
    }
}
