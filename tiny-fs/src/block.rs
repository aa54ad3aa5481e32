//! # 块存储层
//!
//! 固定数量、固定大小的内存块，代替块设备与块缓存。
//! 分配位图由一把锁保护；每个块的数据各自加锁，
//! 通过 [`BlockStore::map`] 与 [`BlockStore::map_mut`] 原地访问。

use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;

use spin::Mutex;

use crate::layout::Bitmap;
use crate::{Error, Result};

pub struct BlockStore {
    block_size: usize,
    bitmap: Mutex<Bitmap>,
    blocks: Box<[Mutex<Box<[u8]>>]>,
}

impl BlockStore {
    pub fn new(block_size: usize, block_count: usize) -> Self {
        let blocks: Vec<_> = (0..block_count)
            .map(|_| Mutex::new(vec![0; block_size].into_boxed_slice()))
            .collect();

        Self {
            block_size,
            bitmap: Mutex::new(Bitmap::new(block_count)),
            blocks: blocks.into_boxed_slice(),
        }
    }

    #[inline]
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    #[inline]
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn free_count(&self) -> usize {
        self.bitmap.lock().free_count()
    }

    /// 分配新的数据块并返回其ID，块内容清零
    pub fn alloc(&self) -> Result<u32> {
        let block_id = self.bitmap.lock().alloc().ok_or(Error::NoFreeBlock)?;
        self.blocks[block_id as usize].lock().fill(0);
        log::trace!("alloc block {block_id}");
        Ok(block_id)
    }

    pub fn dealloc(&self, block_id: u32) -> Result<()> {
        if block_id as usize >= self.blocks.len() {
            return Err(Error::BadBlockId(block_id));
        }
        if !self.bitmap.lock().dealloc(block_id) {
            return Err(Error::DoubleFree(block_id));
        }
        log::trace!("free block {block_id}");
        Ok(())
    }

    /// 读取块的内容并处理
    pub fn map<V>(&self, block_id: u32, f: impl FnOnce(&[u8]) -> V) -> Result<V> {
        let block = self.block(block_id)?.lock();
        Ok(f(&block))
    }

    /// 原地修改块的内容
    pub fn map_mut<V>(&self, block_id: u32, f: impl FnOnce(&mut [u8]) -> V) -> Result<V> {
        let mut block = self.block(block_id)?.lock();
        Ok(f(&mut block))
    }

    #[inline]
    fn block(&self, block_id: u32) -> Result<&Mutex<Box<[u8]>>> {
        self.blocks
            .get(block_id as usize)
            .ok_or(Error::BadBlockId(block_id))
    }
}
