//! # 数据结构层
//!
//! 内存中的文件系统数据结构：
//! 分配位图 | inode 块索引 | 间接索引块 | 目录项

mod bitmap;
pub use bitmap::Bitmap;

mod inode;
pub use inode::{DiskInode, InodeKind};

mod indirect;
pub use indirect::{IndirectBlock, IndirectBlockMut};

/// 文件项，存放于根目录的数据中
mod dir_entry;
pub use dir_entry::DirEntry;
