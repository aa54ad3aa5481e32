//! inode 的块索引
//! - 直接索引：[`DIRECT_COUNT`] 个块编号，每个编号都指向一个**数据块**
//! - 一级间接索引：指向一个间接索引块，见 [`IndirectBlock`]
//!
//! 目录的空间用于存放目录项；
//! 文件的空间用于存放它的数据。
//!
//! 大小为 S 的 inode 恰好占用逻辑索引 `[0, ⌈S/B⌉)` 的数据块，中间没有空洞。

use alloc::vec::Vec;

use super::{IndirectBlock, IndirectBlockMut};
use crate::BlockStore;
use crate::config::DIRECT_COUNT;
use crate::{Error, Result};

#[derive(Debug, Default, Clone)]
pub struct DiskInode {
    pub id: u32,
    pub kind: InodeKind,
    /// 逻辑大小(字节)
    pub size: usize,
    direct: [Option<u32>; DIRECT_COUNT],
    /// 指向一个一级间接索引块
    indirect: Option<u32>,
}

#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub enum InodeKind {
    #[default]
    File,
    Directory,
}

impl DiskInode {
    #[inline]
    pub fn init(&mut self, id: u32, kind: InodeKind) {
        *self = Self {
            id,
            kind,
            ..Default::default()
        }
    }

    #[inline]
    pub fn is_dir(&self) -> bool {
        self.kind == InodeKind::Directory
    }

    /// 逻辑上 inode 指向一系列数据块，此处传入的是这些数据块的索引（逻辑索引），
    /// 然后返回给**块存储层**使用的ID
    pub fn block_id(&self, block_index: usize, store: &BlockStore) -> Result<u32> {
        if block_index < DIRECT_COUNT {
            return self.direct[block_index].ok_or(Error::MissingBlock(block_index));
        }

        let indirect = self.indirect.ok_or(Error::MissingBlock(block_index))?;
        store.map(indirect, |data| {
            // 剔去直接索引的部分
            IndirectBlock::new(data).get(block_index - DIRECT_COUNT)
        })?
    }

    /// 获取写入位置的数据块；若恰好写到已占用块之后，则分配新块
    fn block_for_write(&mut self, block_index: usize, store: &BlockStore) -> Result<u32> {
        let data_blocks = Self::count_data_block(self.size, store.block_size());
        if block_index < data_blocks {
            return self.block_id(block_index, store);
        }
        // 只会在末尾增长，不会留下空洞
        if block_index > data_blocks {
            return Err(Error::MissingBlock(data_blocks));
        }

        if block_index < DIRECT_COUNT {
            let block_id = store.alloc()?;
            self.direct[block_index] = Some(block_id);
            return Ok(block_id);
        }

        let index = block_index - DIRECT_COUNT;
        let capacity = store.block_size() / crate::config::BLOCK_ID_SIZE;
        if index >= capacity {
            return Err(Error::FileTooLarge {
                max: Self::max_size(store.block_size()),
            });
        }

        // 首次越过直接索引，创建一级索引
        let fresh_indirect = self.indirect.is_none();
        let indirect = match self.indirect {
            Some(indirect) => indirect,
            None => {
                let indirect = store.alloc()?;
                self.indirect = Some(indirect);
                indirect
            }
        };

        let block_id = match store.alloc() {
            Ok(block_id) => block_id,
            Err(e) => {
                if fresh_indirect {
                    self.indirect = None;
                    store.dealloc(indirect)?;
                }
                return Err(e);
            }
        };
        store.map_mut(indirect, |data| IndirectBlockMut::new(data).set(index, block_id))??;

        Ok(block_id)
    }

    /// 释放全部数据块与间接索引块，大小归零
    #[inline]
    pub fn clear(&mut self, store: &BlockStore) -> Result<()> {
        self.shrink_to(0, store)
    }

    /// 缩小到指定大小，释放不再需要的数据块；间接索引块不再需要时一并释放
    pub fn shrink_to(&mut self, size: usize, store: &BlockStore) -> Result<()> {
        if size >= self.size {
            return Ok(());
        }

        let block_size = store.block_size();
        let keep_blocks = Self::count_data_block(size, block_size);
        let data_blocks = Self::count_data_block(self.size, block_size);
        let mut drop_blocks: Vec<u32> = Vec::with_capacity(
            Self::count_total_block(self.size, block_size)
                - Self::count_total_block(size, block_size),
        );

        for block_index in keep_blocks..data_blocks {
            drop_blocks.push(self.block_id(block_index, store)?);
        }
        if keep_blocks <= DIRECT_COUNT {
            drop_blocks.extend(self.indirect.take());
        }
        for slot in self.direct.iter_mut().skip(keep_blocks) {
            *slot = None;
        }
        self.size = size;

        for block_id in drop_blocks {
            store.dealloc(block_id)?;
        }
        Ok(())
    }

    /// 从指定位置(字节偏移)读出数据填充`buf`
    pub fn read_at(&self, offset: usize, buf: &mut [u8], store: &BlockStore) -> Result<usize> {
        let block_size = store.block_size();
        let mut start = offset;
        let end = (start + buf.len()).min(self.size);

        if start >= end {
            return Ok(0);
        }

        // 已读取多少字节
        let mut read_size = 0;
        while start < end {
            let block_index = start / block_size;
            // 当前块的末地址(字节)
            let current_block_end = ((block_index + 1) * block_size).min(end);
            let block_read_size = current_block_end - start;
            let dest = &mut buf[read_size..read_size + block_read_size];

            store.map(self.block_id(block_index, store)?, |data| {
                // 绝对地址 % 块大小 = 块内偏移
                let inner = start % block_size;
                dest.copy_from_slice(&data[inner..inner + block_read_size]);
            })?;

            read_size += block_read_size;
            start = current_block_end;
        }

        Ok(read_size)
    }

    /// 从指定位置写入`buf`，按需分配数据块并增大逻辑大小。
    ///
    /// 分配失败时中止，已写入的部分保留。
    pub fn write_at(&mut self, offset: usize, buf: &[u8], store: &BlockStore) -> Result<usize> {
        let block_size = store.block_size();
        let max = Self::max_size(block_size);
        if offset + buf.len() > max {
            return Err(Error::FileTooLarge { max });
        }

        let mut start = offset;
        let end = offset + buf.len();

        let mut written_size = 0;
        while start < end {
            let block_index = start / block_size;
            let current_block_end = ((block_index + 1) * block_size).min(end);
            let block_write_size = current_block_end - start;
            let src = &buf[written_size..written_size + block_write_size];

            let block_id = self.block_for_write(block_index, store)?;
            store.map_mut(block_id, |data| {
                let inner = start % block_size;
                data[inner..inner + block_write_size].copy_from_slice(src);
            })?;

            written_size += block_write_size;
            start = current_block_end;
            if start > self.size {
                self.size = start;
            }
        }

        Ok(written_size)
    }

    /// 单个 inode 可表示的最大字节数
    #[inline]
    pub fn max_size(block_size: usize) -> usize {
        block_size * (DIRECT_COUNT + block_size / crate::config::BLOCK_ID_SIZE)
    }

    /// 计算容纳指定数据量需要多少个**数据块**
    #[inline]
    pub fn count_data_block(size: usize, block_size: usize) -> usize {
        size.div_ceil(block_size)
    }

    /// 计算容纳指定数据量需要多少个 **数据块** 和 **索引块**
    pub fn count_total_block(size: usize, block_size: usize) -> usize {
        let data_blocks = Self::count_data_block(size, block_size);
        if data_blocks > DIRECT_COUNT {
            data_blocks + 1
        } else {
            data_blocks
        }
    }
}
