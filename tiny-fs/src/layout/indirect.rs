//! 间接索引块：整个块连续存储**块编号**(小端 u32)，每个编号都指向一个**数据块**。
//!
//! 通过带边界检查的视图访问，容量为 `块大小 / 4`。

use crate::config::BLOCK_ID_SIZE;
use crate::{Error, Result};

/// 只读视图
pub struct IndirectBlock<'a> {
    data: &'a [u8],
}

/// 可写视图
pub struct IndirectBlockMut<'a> {
    data: &'a mut [u8],
}

impl<'a> IndirectBlock<'a> {
    #[inline]
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.len() / BLOCK_ID_SIZE
    }

    pub fn get(&self, index: usize) -> Result<u32> {
        let range = slot(index, self.capacity())?;
        let mut id = [0; BLOCK_ID_SIZE];
        id.copy_from_slice(&self.data[range]);
        Ok(u32::from_le_bytes(id))
    }
}

impl<'a> IndirectBlockMut<'a> {
    #[inline]
    pub fn new(data: &'a mut [u8]) -> Self {
        Self { data }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.len() / BLOCK_ID_SIZE
    }

    pub fn set(&mut self, index: usize, block_id: u32) -> Result<()> {
        let range = slot(index, self.capacity())?;
        self.data[range].copy_from_slice(&block_id.to_le_bytes());
        Ok(())
    }
}

/// 编号在块内的字节范围
#[inline]
fn slot(index: usize, capacity: usize) -> Result<core::ops::Range<usize>> {
    if index >= capacity {
        return Err(Error::CorruptIndirect { index, capacity });
    }
    let start = index * BLOCK_ID_SIZE;
    Ok(start..start + BLOCK_ID_SIZE)
}
