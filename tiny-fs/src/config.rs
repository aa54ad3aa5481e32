//! # 配置
//!
//! 文件系统的全部尺寸参数在初始化时确定，之后不可更改。

use crate::{Error, Result};

/// 每个 inode 的直接索引数量
pub const DIRECT_COUNT: usize = 10;
/// 根目录 inode 的保留ID，即 inode 表发出的第一个ID
pub const ROOT_INODE_ID: u32 = 0;
/// 块编号在间接索引块内所占字节数
pub const BLOCK_ID_SIZE: usize = core::mem::size_of::<u32>();

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// 块大小(字节)
    pub block_size: usize,
    /// 块总数
    pub block_count: usize,
    /// inode 表容量
    pub inode_count: usize,
    /// 打开文件表容量
    pub open_file_count: usize,
    /// 文件名的最大字节数
    pub max_name_len: usize,
    /// 根目录最多容纳的目录项数
    pub max_dir_entries: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            block_size: 1024,
            block_count: 1024,
            inode_count: 50,
            open_file_count: 20,
            max_name_len: 40,
            // 除根目录外，每个 inode 都能有名字
            max_dir_entries: 49,
        }
    }
}

impl Config {
    /// 间接索引块可编号数量
    #[inline]
    pub fn indirect_count(&self) -> usize {
        self.block_size / BLOCK_ID_SIZE
    }

    /// 单个文件可表示的最大字节数
    #[inline]
    pub fn max_file_size(&self) -> usize {
        self.block_size.saturating_mul(DIRECT_COUNT + self.indirect_count())
    }

    /// 目录项大小：定长文件名 + inode ID
    #[inline]
    pub fn dir_entry_size(&self) -> usize {
        self.max_name_len.saturating_add(BLOCK_ID_SIZE)
    }

    pub fn validate(&self) -> Result<()> {
        let ranges_ok = self.block_size >= 64
            && self.block_size % BLOCK_ID_SIZE == 0
            && self.block_size <= u32::MAX as usize
            && self.block_count > 0
            // 块编号与 inode 编号都是 u32
            && self.block_count < u32::MAX as usize
            && self.inode_count > 0
            && self.inode_count < u32::MAX as usize
            && self.open_file_count > 0
            && self.max_name_len > 0
            && self.max_dir_entries > 0;
        if !ranges_ok {
            return Err(Error::InvalidConfig);
        }

        // 乘积溢出同样视为非法配置
        let storage = self.block_size.checked_mul(self.block_count);
        let max_file_size = self
            .block_size
            .checked_mul(DIRECT_COUNT + self.indirect_count());
        let dir_size = self
            .max_name_len
            .checked_add(BLOCK_ID_SIZE)
            .and_then(|entry_size| entry_size.checked_mul(self.max_dir_entries));

        match (storage, max_file_size, dir_size) {
            (Some(_), Some(max_file_size), Some(dir_size)) if dir_size <= max_file_size => Ok(()),
            _ => Err(Error::InvalidConfig),
        }
    }

    /// 全部块的总字节数，仅对通过校验的配置有意义
    #[inline]
    pub fn capacity(&self) -> usize {
        self.block_size.saturating_mul(self.block_count)
    }
}
