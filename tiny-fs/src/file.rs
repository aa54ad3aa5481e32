//! # 打开文件表
//!
//! 一个文件可以被打开多次，每个描述符各自记录在文件内的偏移量。

use alloc::sync::Arc;
use alloc::vec::Vec;

use spin::Mutex;

use crate::{Error, Result};

/// 打开的文件
#[derive(Debug)]
pub struct OpenFile {
    inode_id: u32,
    /// **文件**内的偏移量
    offset: Mutex<usize>,
}

impl OpenFile {
    #[inline]
    pub fn inode_id(&self) -> u32 {
        self.inode_id
    }

    #[inline]
    pub fn offset(&self) -> &Mutex<usize> {
        &self.offset
    }
}

pub struct OpenFileTable {
    slots: Mutex<Vec<Option<Arc<OpenFile>>>>,
}

impl OpenFileTable {
    pub fn new(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Self {
            slots: Mutex::new(slots),
        }
    }

    pub fn open_count(&self) -> usize {
        self.slots.lock().iter().filter(|slot| slot.is_some()).count()
    }

    /// 插入新描述符至空槽位，并返回槽位的索引
    pub fn add(&self, inode_id: u32, offset: usize) -> Result<usize> {
        let mut slots = self.slots.lock();
        let fd = slots
            .iter()
            .position(Option::is_none)
            .ok_or(Error::NoFreeHandle)?;

        slots[fd] = Some(Arc::new(OpenFile {
            inode_id,
            offset: Mutex::new(offset),
        }));
        Ok(fd)
    }

    pub fn get(&self, fd: usize) -> Result<Arc<OpenFile>> {
        self.slots
            .lock()
            .get(fd)
            .and_then(Option::clone)
            .ok_or(Error::BadHandle(fd))
    }

    pub fn remove(&self, fd: usize) -> Result<()> {
        self.slots
            .lock()
            .get_mut(fd)
            .and_then(Option::take)
            .map(drop)
            .ok_or(Error::BadHandle(fd))
    }
}
