use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use crate::config::BLOCK_ID_SIZE;

/// 目录项：定长文件名(以 \0 填充) + inode ID。
///
/// 在根目录的数据中依次排列，大小恒为 `max_name_len + 4` 字节。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    name: String,
    inode_id: u32,
}

impl DirEntry {
    #[inline]
    pub fn new(name: &str, inode_id: u32) -> Self {
        Self {
            name: name.into(),
            inode_id,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn inode_id(&self) -> u32 {
        self.inode_id
    }

    /// 编码为定长字节序列；调用者保证名字不超过 `max_name_len`
    pub fn to_bytes(&self, max_name_len: usize) -> Vec<u8> {
        let mut bytes = vec![0; max_name_len + BLOCK_ID_SIZE];
        bytes[..self.name.len()].copy_from_slice(self.name.as_bytes());
        bytes[max_name_len..].copy_from_slice(&self.inode_id.to_le_bytes());
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        let (name, inode_id) = bytes.split_at(bytes.len() - BLOCK_ID_SIZE);
        let len = name.iter().position(|&c| c == 0).unwrap_or(name.len());
        let mut id = [0; BLOCK_ID_SIZE];
        id.copy_from_slice(inode_id);

        Self {
            name: String::from_utf8_lossy(&name[..len]).into_owned(),
            inode_id: u32::from_le_bytes(id),
        }
    }

    /// 比较名字而不解码整个目录项
    pub fn name_matches(bytes: &[u8], name: &str) -> bool {
        let stored = &bytes[..bytes.len() - BLOCK_ID_SIZE];
        let name = name.as_bytes();
        stored.starts_with(name) && stored.get(name.len()).is_none_or(|&c| c == 0)
    }
}
