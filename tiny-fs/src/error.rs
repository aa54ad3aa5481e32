use thiserror::Error;

/// 错误的粗粒度分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
    AlreadyExists,
    ResourceExhausted,
    IoFailure,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    #[error("path must start with '/' and name a file")]
    InvalidPath,
    #[error("file name exceeds {max} bytes")]
    NameTooLong { max: usize },
    #[error("file handle {0} is not open")]
    BadHandle(usize),
    #[error("block id {0} is out of range")]
    BadBlockId(u32),
    #[error("inode id {0} is not allocated")]
    BadInodeId(u32),
    #[error("block {0} is already free")]
    DoubleFree(u32),
    #[error("invalid configuration")]
    InvalidConfig,

    #[error("no such file")]
    NotFound,

    #[error("file already exists")]
    AlreadyExists,

    #[error("no free data block")]
    NoFreeBlock,
    #[error("no free inode")]
    NoFreeInode,
    #[error("open file table is full")]
    NoFreeHandle,
    #[error("root directory is full")]
    DirectoryFull,
    #[error("file would exceed {max} bytes")]
    FileTooLarge { max: usize },

    #[error("indirect index {index} exceeds capacity {capacity}")]
    CorruptIndirect { index: usize, capacity: usize },
    #[error("data block {0} is missing inside the file")]
    MissingBlock(usize),
    #[error("directory entry at offset {0} is truncated")]
    TornDirEntry(usize),
    #[error("root directory did not receive the reserved inode id")]
    RootNotReserved,
    #[error("inode {0} is not a regular file")]
    NotRegularFile(u32),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        use Error::*;
        match self {
            InvalidPath | NameTooLong { .. } | BadHandle(_) | BadBlockId(_) | BadInodeId(_)
            | DoubleFree(_) | InvalidConfig => ErrorKind::InvalidArgument,
            NotFound => ErrorKind::NotFound,
            AlreadyExists => ErrorKind::AlreadyExists,
            NoFreeBlock | NoFreeInode | NoFreeHandle | DirectoryFull | FileTooLarge { .. } => {
                ErrorKind::ResourceExhausted
            }
            CorruptIndirect { .. }
            | MissingBlock(_)
            | TornDirEntry(_)
            | RootNotReserved
            | NotRegularFile(_) => ErrorKind::IoFailure,
        }
    }
}

pub type Result<T> = core::result::Result<T, Error>;
