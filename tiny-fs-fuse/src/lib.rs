
use std::io;
use std::io::{Read, Write};

use tiny_fs::{ErrorKind, OpenFlag, TinyFileSystem};

/// 每次从 tiny-fs 读写的字节数
const CHUNK_SIZE: usize = 4096;

/// 将 tiny-fs 中的文件导出到宿主的 `dest`，返回导出的字节数。
///
/// 只经由 open/read/close 访问文件系统；导出期间若有其它线程截断或覆盖该文件，结果不确定。
pub fn export(fs: &TinyFileSystem, path: &str, dest: &mut impl Write) -> io::Result<usize> {
    let fd = fs.open(path, OpenFlag::plain()).map_err(io_error)?;

    let mut bytes = Vec::new();
    let mut buffer = [0u8; CHUNK_SIZE];
    let result = loop {
        match fs.read(fd, &mut buffer) {
            Ok(0) => break Ok(()),
            Ok(len) => bytes.extend_from_slice(&buffer[..len]),
            Err(e) => break Err(io_error(e)),
        }
    };
    fs.close(fd).map_err(io_error)?;
    result?;

    dest.write_all(&bytes)?;
    log::info!("export {path:?}: {} bytes", bytes.len());
    Ok(bytes.len())
}

/// 将宿主的 `src` 写入 tiny-fs，文件不存在则创建，已存在则先清空
pub fn import(fs: &TinyFileSystem, path: &str, src: &mut impl Read) -> io::Result<usize> {
    let fd = fs
        .open(path, OpenFlag::CREATE | OpenFlag::TRUNC)
        .map_err(io_error)?;

    let mut written = 0;
    let mut buffer = [0u8; CHUNK_SIZE];
    let result = loop {
        let len = match src.read(&mut buffer) {
            Ok(0) => break Ok(()),
            Ok(len) => len,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => break Err(e),
        };
        match fs.write(fd, &buffer[..len]) {
            Ok(len) => written += len,
            Err(e) => break Err(io_error(e)),
        }
    };
    fs.close(fd).map_err(io_error)?;
    result?;

    log::info!("import {path:?}: {written} bytes");
    Ok(written)
}

pub fn io_error(e: tiny_fs::Error) -> io::Error {
    let kind = match e.kind() {
        ErrorKind::InvalidArgument => io::ErrorKind::InvalidInput,
        ErrorKind::NotFound => io::ErrorKind::NotFound,
        ErrorKind::AlreadyExists => io::ErrorKind::AlreadyExists,
        ErrorKind::ResourceExhausted => io::ErrorKind::StorageFull,
        ErrorKind::IoFailure => io::ErrorKind::Other,
    };
    io::Error::new(kind, e)
}
