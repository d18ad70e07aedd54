//! Byte layout of a program's uniform block

use std::collections::HashMap;

/// One named member of a uniform block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformMember {
    pub offset: u32,
    pub size: u32,
}

/// Names, offsets and total size of the uniform struct a program reads
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UniformBlockDescriptor {
    pub name: String,
    members: HashMap<String, UniformMember>,
    size: u32,
}

impl UniformBlockDescriptor {
    pub fn new(name: impl Into<String>, size: u32) -> Self {
        Self {
            name: name.into(),
            members: HashMap::new(),
            size,
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, offset: u32, size: u32) {
        self.members.insert(name.into(), UniformMember { offset, size });
    }

    pub fn member(&self, name: &str) -> Option<UniformMember> {
        self.members.get(name).copied()
    }

    pub fn offset(&self, name: &str) -> Option<u32> {
        self.member(name).map(|m| m.offset)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.members.contains_key(name)
    }

    /// Unpadded block size in bytes
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Block size rounded up to a multiple of `alignment`
    pub fn aligned_size(&self, alignment: u32) -> u32 {
        if alignment == 0 {
            return self.size;
        }
        self.size.div_ceil(alignment) * alignment
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aligned_size_rounds_up_only_when_needed() {
        let block = UniformBlockDescriptor::new("Uniforms", 208);
        assert_eq!(block.aligned_size(256), 256);
        assert_eq!(block.aligned_size(16), 208);
        assert_eq!(block.aligned_size(0), 208);
    }

    #[test]
    fn member_lookup() {
        let mut block = UniformBlockDescriptor::new("Uniforms", 80);
        block.insert("model", 0, 64);
        block.insert("time", 64, 4);
        assert_eq!(block.offset("time"), Some(64));
        assert_eq!(block.member("model").unwrap().size, 64);
        assert!(block.offset("missing").is_none());
        assert!(!block.is_empty());
    }
}
