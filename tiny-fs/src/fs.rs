//! # 文件系统接口层
//!
//! 组合块存储、inode 表、目录与打开文件表，
//! 对外提供 lookup/open/close/read/write。
//!
//! 描述符的状态：Closed -(open)-> Open[offset] -(read/write)-> Open[offset'] -(close)-> Closed
//!
//! ## 加锁顺序
//!
//! 描述符偏移量 -> inode 读写锁 -> 表的分配锁 -> 块数据锁。
//! 同一时刻最多持有一个 inode 的锁。

use alloc::vec::Vec;

use enumflags2::{BitFlags, bitflags};

use crate::config::{Config, ROOT_INODE_ID};
use crate::dir::RootDir;
use crate::layout::{DirEntry, DiskInode, InodeKind};
use crate::{BlockStore, InodeTable, OpenFileTable};
use crate::{Error, Result};

#[rustfmt::skip]
#[allow(clippy::upper_case_acronyms)]
#[bitflags]
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenFlag {
    /// 文件不存在时创建
    CREATE = 0b001,
    /// 先清空文件，再交给用户
    TRUNC  = 0b010,
    /// 偏移量置于文件末尾
    APPEND = 0b100,
}

impl OpenFlag {
    /// 不带任何标志的打开
    #[inline]
    pub fn plain() -> BitFlags<OpenFlag> {
        BitFlags::empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stat {
    pub inode: u32,
    pub kind: InodeKind,
    pub size: usize,
    /// 占用的数据块与索引块
    pub blocks: usize,
}

/// 各类资源的剩余量
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Usage {
    pub free_blocks: usize,
    pub free_inodes: usize,
    pub open_files: usize,
}

pub struct TinyFileSystem {
    config: Config,
    blocks: BlockStore,
    inodes: InodeTable,
    files: OpenFileTable,
}

impl TinyFileSystem {
    /// 分配全部表并创建根目录
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let fs = Self {
            blocks: BlockStore::new(config.block_size, config.block_count),
            inodes: InodeTable::new(config.inode_count),
            files: OpenFileTable::new(config.open_file_count),
            config,
        };

        let root = fs.inodes.create(InodeKind::Directory)?;
        if root != ROOT_INODE_ID {
            log::error!("root directory got inode {root}");
            return Err(Error::RootNotReserved);
        }

        log::info!(
            "tiny-fs ready: {} blocks of {} bytes, {} inodes, {} handles",
            fs.config.block_count,
            fs.config.block_size,
            fs.config.inode_count,
            fs.config.open_file_count,
        );
        Ok(fs)
    }

    /// 释放文件系统占有的全部存储
    pub fn destroy(self) {
        log::info!("tiny-fs destroyed, {} handles still open", self.files.open_count());
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn usage(&self) -> Usage {
        Usage {
            free_blocks: self.blocks.free_count(),
            free_inodes: self.inodes.free_count(),
            open_files: self.files.open_count(),
        }
    }

    pub fn lookup(&self, path: &str) -> Result<u32> {
        let name = self.file_name(path)?;
        self.root()?.find(name)
    }

    pub fn open(&self, path: &str, flags: impl Into<BitFlags<OpenFlag>>) -> Result<usize> {
        let flags = flags.into();
        let name = self.file_name(path)?;

        let (inode_id, offset) = match self.root()?.find(name) {
            Ok(inode_id) => {
                let mut inode = self.inodes.get(inode_id)?.write();
                if inode.kind != InodeKind::File {
                    return Err(Error::NotRegularFile(inode_id));
                }

                if flags.contains(OpenFlag::TRUNC) && inode.size > 0 {
                    log::debug!("truncate {path:?} from {} bytes", inode.size);
                    inode.clear(&self.blocks)?;
                }

                let offset = if flags.contains(OpenFlag::APPEND) {
                    inode.size
                } else {
                    0
                };
                (inode_id, offset)
            }
            Err(Error::NotFound) if flags.contains(OpenFlag::CREATE) => (self.create(name)?, 0),
            Err(e) => return Err(e),
        };

        // 若此处失败，新建的文件依然保留
        let fd = self.files.add(inode_id, offset)?;
        log::debug!("open {path:?} as fd {fd} (inode {inode_id}, offset {offset})");
        Ok(fd)
    }

    pub fn close(&self, fd: usize) -> Result<()> {
        self.files.remove(fd)?;
        log::debug!("close fd {fd}");
        Ok(())
    }

    /// 从描述符的偏移量处写入`buf`，返回写入的字节数
    pub fn write(&self, fd: usize, buf: &[u8]) -> Result<usize> {
        let file = self.files.get(fd)?;
        let mut offset = file.offset().lock();
        let mut inode = self.inodes.get(file.inode_id())?.write();

        // 文件被其它描述符截断后，从新的末尾续写，不留空洞
        if *offset > inode.size {
            log::warn!("fd {fd} offset {} beyond size {}", *offset, inode.size);
            *offset = inode.size;
        }

        let written = inode.write_at(*offset, buf, &self.blocks)?;
        *offset += written;
        Ok(written)
    }

    /// 从描述符的偏移量处读出数据填充`buf`，返回读到的字节数，0表示已到文件末尾
    pub fn read(&self, fd: usize, buf: &mut [u8]) -> Result<usize> {
        let file = self.files.get(fd)?;
        let mut offset = file.offset().lock();
        let inode = self.inodes.get(file.inode_id())?.read();

        let available = inode.size.saturating_sub(*offset);
        let len = available.min(buf.len());
        let read = inode.read_at(*offset, &mut buf[..len], &self.blocks)?;
        *offset += read;
        Ok(read)
    }

    pub fn stat(&self, path: &str) -> Result<Stat> {
        let inode_id = self.lookup(path)?;
        let inode = self.inodes.get(inode_id)?.read();
        Ok(Stat {
            inode: inode.id,
            kind: inode.kind,
            size: inode.size,
            blocks: DiskInode::count_total_block(inode.size, self.config.block_size),
        })
    }

    /// 根目录下的全部目录项
    pub fn read_dir(&self) -> Result<Vec<DirEntry>> {
        self.root()?.entries()
    }
}

impl TinyFileSystem {
    #[inline]
    fn root(&self) -> Result<RootDir<'_>> {
        Ok(RootDir::new(
            self.inodes.get(ROOT_INODE_ID)?,
            &self.blocks,
            self.config.max_name_len,
            self.config.max_dir_entries,
        ))
    }

    /// 校验路径并去掉开头的 '/'，其余部分原样作为文件名
    fn file_name<'p>(&self, path: &'p str) -> Result<&'p str> {
        let name = path
            .strip_prefix('/')
            .filter(|name| !name.is_empty() && !name.contains('\0'))
            .ok_or(Error::InvalidPath)?;

        if name.len() > self.config.max_name_len {
            return Err(Error::NameTooLong {
                max: self.config.max_name_len,
            });
        }
        Ok(name)
    }

    fn create(&self, name: &str) -> Result<u32> {
        let inode_id = self.inodes.create(InodeKind::File)?;

        match self.root()?.add_entry(inode_id, name) {
            Ok(()) => Ok(inode_id),
            // 并发创建同名文件，以先到者为准
            Err(Error::AlreadyExists) => {
                self.inodes.delete(inode_id)?;
                self.root()?.find(name)
            }
            Err(e) => {
                log::warn!("roll back inode {inode_id} for {name:?}: {e}");
                self.inodes.delete(inode_id)?;
                Err(e)
            }
        }
    }
}
