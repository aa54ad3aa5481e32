//! # inode 表
//!
//! 槽位分配由一把锁保护；每个 inode 的内容(块索引及其数据)各自由读写锁保护：
//! 同一文件的读可以并行，写与截断独占。

use alloc::boxed::Box;
use alloc::vec::Vec;

use spin::{Mutex, RwLock};

use crate::layout::{Bitmap, DiskInode, InodeKind};
use crate::{Error, Result};

pub struct InodeTable {
    bitmap: Mutex<Bitmap>,
    inodes: Box<[RwLock<DiskInode>]>,
}

impl InodeTable {
    pub fn new(capacity: usize) -> Self {
        let inodes: Vec<_> = (0..capacity)
            .map(|_| RwLock::new(DiskInode::default()))
            .collect();

        Self {
            bitmap: Mutex::new(Bitmap::new(capacity)),
            inodes: inodes.into_boxed_slice(),
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.inodes.len()
    }

    pub fn free_count(&self) -> usize {
        self.bitmap.lock().free_count()
    }

    /// 分配大小为0、没有数据块的新 inode 并返回其ID
    pub fn create(&self, kind: InodeKind) -> Result<u32> {
        let inode_id = self.bitmap.lock().alloc().ok_or(Error::NoFreeInode)?;
        self.inodes[inode_id as usize].write().init(inode_id, kind);
        log::debug!("create inode {inode_id} ({kind:?})");
        Ok(inode_id)
    }

    pub fn get(&self, inode_id: u32) -> Result<&RwLock<DiskInode>> {
        if !self.bitmap.lock().is_allocated(inode_id) {
            return Err(Error::BadInodeId(inode_id));
        }
        Ok(&self.inodes[inode_id as usize])
    }

    /// 仅释放槽位，**不会**释放 inode 的数据块。
    ///
    /// 只用于撤销刚创建、尚无数据的 inode。
    pub fn delete(&self, inode_id: u32) -> Result<()> {
        let inode = self.get(inode_id)?;
        *inode.write() = DiskInode::default();

        if !self.bitmap.lock().dealloc(inode_id) {
            return Err(Error::BadInodeId(inode_id));
        }
        log::debug!("delete inode {inode_id}");
        Ok(())
    }
}
