//! # 目录层
//!
//! 扁平命名空间：只有一个根目录，其数据是依次排列的 [`DirEntry`]，
//! 与普通文件共用同一套块索引读写。

use alloc::vec;
use alloc::vec::Vec;

use spin::RwLock;

use crate::BlockStore;
use crate::layout::{DirEntry, DiskInode};
use crate::{Error, Result};

pub struct RootDir<'a> {
    inode: &'a RwLock<DiskInode>,
    store: &'a BlockStore,
    max_name_len: usize,
    max_entries: usize,
}

impl<'a> RootDir<'a> {
    #[inline]
    pub fn new(
        inode: &'a RwLock<DiskInode>,
        store: &'a BlockStore,
        max_name_len: usize,
        max_entries: usize,
    ) -> Self {
        Self {
            inode,
            store,
            max_name_len,
            max_entries,
        }
    }

    /// 根据文件名获取 inode ID
    pub fn find(&self, name: &str) -> Result<u32> {
        let root = self.inode.read();
        self.get(&root, name)?.ok_or(Error::NotFound)
    }

    /// 在目录末尾追加目录项；同名项已存在时拒绝
    pub fn add_entry(&self, inode_id: u32, name: &str) -> Result<()> {
        if name.len() > self.max_name_len {
            return Err(Error::NameTooLong {
                max: self.max_name_len,
            });
        }

        let mut root = self.inode.write();
        // 查重与追加在同一把写锁内完成
        if self.get(&root, name)?.is_some() {
            return Err(Error::AlreadyExists);
        }
        if root.size / self.entry_size() >= self.max_entries {
            return Err(Error::DirectoryFull);
        }

        let offset = root.size;
        let dir_entry = DirEntry::new(name, inode_id);
        if let Err(e) = root.write_at(offset, &dir_entry.to_bytes(self.max_name_len), self.store) {
            // 不留下写了一半的目录项
            root.shrink_to(offset, self.store)?;
            return Err(e);
        }
        log::debug!("add dir entry {name:?} -> inode {inode_id}");
        Ok(())
    }

    pub fn entries(&self) -> Result<Vec<DirEntry>> {
        let root = self.inode.read();
        let mut bytes = vec![0; self.entry_size()];
        let mut entries = Vec::with_capacity(root.size / self.entry_size());

        for offset in (0..root.size).step_by(self.entry_size()) {
            self.read_entry(&root, offset, &mut bytes)?;
            entries.push(DirEntry::from_bytes(&bytes));
        }
        Ok(entries)
    }
}

impl RootDir<'_> {
    #[inline]
    fn entry_size(&self) -> usize {
        self.max_name_len + crate::config::BLOCK_ID_SIZE
    }

    /// 在目录数据中通过名字获取目录项的 inode ID
    fn get(&self, root: &DiskInode, name: &str) -> Result<Option<u32>> {
        debug_assert!(root.is_dir());
        let mut bytes = vec![0; self.entry_size()];

        for offset in (0..root.size).step_by(self.entry_size()) {
            self.read_entry(root, offset, &mut bytes)?;
            if DirEntry::name_matches(&bytes, name) {
                return Ok(Some(DirEntry::from_bytes(&bytes).inode_id()));
            }
        }

        Ok(None)
    }

    fn read_entry(&self, root: &DiskInode, offset: usize, bytes: &mut [u8]) -> Result<()> {
        let read_size = root.read_at(offset, bytes, self.store)?;
        // 目录大小总是目录项大小的整数倍
        if read_size != bytes.len() {
            return Err(Error::TornDirEntry(offset));
        }
        Ok(())
    }
}
