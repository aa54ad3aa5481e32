#![cfg_attr(not(test), no_std)]

extern crate alloc;

/* tiny-fs 的整体架构，自上而下 */

// 文件系统接口层：实现文件的打开、关闭、读写等操作
mod fs;

// 打开文件表：记录描述符与其偏移量
mod file;

// 目录层：扁平的根目录
mod dir;

// inode 表：inode 的分配与并发访问
mod inode;

// 数据结构层：位图、块索引、目录项等
mod layout;

// 块存储层：固定数量、固定大小的内存块
mod block;

mod config;
mod error;

pub use self::{
    block::BlockStore,
    config::{BLOCK_ID_SIZE, Config, DIRECT_COUNT, ROOT_INODE_ID},
    error::{Error, ErrorKind, Result},
    file::{OpenFile, OpenFileTable},
    fs::{OpenFlag, Stat, TinyFileSystem, Usage},
    inode::InodeTable,
    layout::{DirEntry, DiskInode, InodeKind},
};

pub use enumflags2::BitFlags;
