use tiny_fs::{Config, Error, ErrorKind, InodeKind, OpenFlag, ROOT_INODE_ID, TinyFileSystem};

fn tiny_fs() -> TinyFileSystem {
    let _ = env_logger::builder().is_test(true).try_init();
    TinyFileSystem::new(Config::default()).unwrap()
}

fn read_to_end(fs: &TinyFileSystem, fd: usize) -> Vec<u8> {
    let mut buffer = [0u8; 100];
    let mut bytes = Vec::new();
    loop {
        let len = fs.read(fd, &mut buffer).unwrap();
        if len == 0 {
            break;
        }
        bytes.extend_from_slice(&buffer[..len]);
    }
    bytes
}

#[test]
fn create_then_lookup() {
    let fs = tiny_fs();
    let fd = fs.open("/f1", OpenFlag::CREATE).unwrap();
    let inode_id = fs.lookup("/f1").unwrap();
    assert_ne!(inode_id, ROOT_INODE_ID);

    let stat = fs.stat("/f1").unwrap();
    assert_eq!(stat.inode, inode_id);
    assert_eq!(stat.kind, InodeKind::File);
    assert_eq!(stat.size, 0);
    fs.close(fd).unwrap();

    // 再次以 CREATE 打开得到的是同一个文件
    let fd = fs.open("/f1", OpenFlag::CREATE).unwrap();
    assert_eq!(fs.lookup("/f1"), Ok(inode_id));
    fs.close(fd).unwrap();
}

#[test]
fn write_then_read_back() {
    let fs = tiny_fs();
    let data: Vec<u8> = (0..3000u32).map(|i| (i % 251) as u8).collect();

    let fd = fs.open("/data", OpenFlag::CREATE).unwrap();
    assert_eq!(fs.write(fd, &data), Ok(data.len()));
    fs.close(fd).unwrap();

    let fd = fs.open("/data", OpenFlag::plain()).unwrap();
    assert_eq!(read_to_end(&fs, fd), data);
    fs.close(fd).unwrap();
}

#[test]
fn truncate_existing_file() {
    let fs = tiny_fs();
    let fd = fs.open("/t", OpenFlag::CREATE).unwrap();
    // 目录项占用的块不计入
    let free_blocks = fs.usage().free_blocks;
    fs.write(fd, &[1; 5000]).unwrap();
    fs.close(fd).unwrap();
    assert_eq!(fs.usage().free_blocks, free_blocks - 5);

    let fd = fs.open("/t", OpenFlag::TRUNC).unwrap();
    assert_eq!(fs.stat("/t").unwrap().size, 0);
    assert_eq!(fs.usage().free_blocks, free_blocks);

    let mut buf = [0u8; 10];
    assert_eq!(fs.read(fd, &mut buf), Ok(0));
    fs.close(fd).unwrap();
}

#[test]
fn big_file_uses_indirect_block() {
    let fs = tiny_fs();
    let fd = fs.open("/big", OpenFlag::CREATE).unwrap();
    assert_eq!(fs.write(fd, &[b'A'; 15000]), Ok(15000));
    fs.close(fd).unwrap();

    // 15个数据块 + 1个间接索引块
    assert_eq!(fs.stat("/big").unwrap().blocks, 16);

    let fd = fs.open("/big", OpenFlag::plain()).unwrap();
    let mut buf = vec![0u8; 15000];
    assert_eq!(fs.read(fd, &mut buf), Ok(15000));
    assert!(buf.iter().all(|&b| b == b'A'));
    fs.close(fd).unwrap();
}

#[test]
fn distinct_bytes_across_indirect_boundary() {
    let fs = tiny_fs();
    let block_size = fs.config().block_size;
    let data: Vec<u8> = (0..block_size * 12 + 17).map(|i| (i * 7 % 256) as u8).collect();

    let fd = fs.open("/pattern", OpenFlag::CREATE).unwrap();
    // 不对齐的小块写入
    for chunk in data.chunks(333) {
        assert_eq!(fs.write(fd, chunk), Ok(chunk.len()));
    }
    fs.close(fd).unwrap();

    let fd = fs.open("/pattern", OpenFlag::plain()).unwrap();
    assert_eq!(read_to_end(&fs, fd), data);
    fs.close(fd).unwrap();
}

#[test]
fn append_after_reopen() {
    let fs = tiny_fs();
    let fd = fs.open("/f", OpenFlag::CREATE).unwrap();
    assert_eq!(fs.write(fd, b"hello"), Ok(5));
    fs.close(fd).unwrap();

    let fd = fs.open("/f", OpenFlag::APPEND).unwrap();
    assert_eq!(fs.write(fd, b"world"), Ok(5));
    fs.close(fd).unwrap();

    let fd = fs.open("/f", OpenFlag::plain()).unwrap();
    let mut buf = [0u8; 10];
    assert_eq!(fs.read(fd, &mut buf), Ok(10));
    assert_eq!(&buf, b"helloworld");
    fs.close(fd).unwrap();
}

#[test]
fn open_missing_without_create() {
    let fs = tiny_fs();
    let err = fs.open("/missing", OpenFlag::plain()).unwrap_err();
    assert_eq!(err, Error::NotFound);
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(fs.lookup("/missing"), Err(Error::NotFound));
}

#[test]
fn write_at_handle_offset() {
    let fs = tiny_fs();
    let fd = fs.open("/o", OpenFlag::CREATE).unwrap();
    fs.write(fd, b"0123456789").unwrap();
    fs.close(fd).unwrap();

    // 非截断打开从偏移量0覆盖，而不是追加到末尾
    let fd = fs.open("/o", OpenFlag::plain()).unwrap();
    fs.write(fd, b"ab").unwrap();
    fs.close(fd).unwrap();

    let fd = fs.open("/o", OpenFlag::plain()).unwrap();
    assert_eq!(read_to_end(&fs, fd), b"ab23456789");
    assert_eq!(fs.stat("/o").unwrap().size, 10);
    fs.close(fd).unwrap();
}

#[test]
fn independent_handle_offsets() {
    let fs = tiny_fs();
    let fd = fs.open("/two", OpenFlag::CREATE).unwrap();
    fs.write(fd, b"abcdef").unwrap();
    fs.close(fd).unwrap();

    let a = fs.open("/two", OpenFlag::plain()).unwrap();
    let b = fs.open("/two", OpenFlag::plain()).unwrap();
    let mut buf = [0u8; 4];
    assert_eq!(fs.read(a, &mut buf), Ok(4));
    assert_eq!(&buf, b"abcd");
    assert_eq!(fs.read(b, &mut buf[..2]), Ok(2));
    assert_eq!(&buf[..2], b"ab");
    assert_eq!(fs.read(a, &mut buf), Ok(2));
    assert_eq!(&buf[..2], b"ef");
    assert_eq!(fs.read(a, &mut buf), Ok(0));
    fs.close(a).unwrap();
    fs.close(b).unwrap();
}

#[test]
fn truncate_and_append_together() {
    let fs = tiny_fs();
    let fd = fs.open("/ta", OpenFlag::CREATE).unwrap();
    fs.write(fd, b"old contents").unwrap();
    fs.close(fd).unwrap();

    let fd = fs.open("/ta", OpenFlag::TRUNC | OpenFlag::APPEND).unwrap();
    fs.write(fd, b"new").unwrap();
    fs.close(fd).unwrap();

    let fd = fs.open("/ta", OpenFlag::plain()).unwrap();
    assert_eq!(read_to_end(&fs, fd), b"new");
    fs.close(fd).unwrap();
}

#[test]
fn writer_continues_after_truncate_elsewhere() {
    let fs = tiny_fs();
    let writer = fs.open("/shared", OpenFlag::CREATE).unwrap();
    fs.write(writer, b"abcdef").unwrap();

    let fd = fs.open("/shared", OpenFlag::TRUNC).unwrap();
    fs.close(fd).unwrap();

    assert_eq!(fs.write(writer, b"xy"), Ok(2));
    fs.close(writer).unwrap();

    let fd = fs.open("/shared", OpenFlag::plain()).unwrap();
    assert_eq!(read_to_end(&fs, fd), b"xy");
    fs.close(fd).unwrap();
}

#[test]
fn reader_past_end_after_truncate_elsewhere() {
    let fs = tiny_fs();
    let writer = fs.open("/shrink", OpenFlag::CREATE).unwrap();
    fs.write(writer, b"abcdef").unwrap();

    let reader = fs.open("/shrink", OpenFlag::plain()).unwrap();
    let mut buf = [0u8; 4];
    assert_eq!(fs.read(reader, &mut buf), Ok(4));

    let fd = fs.open("/shrink", OpenFlag::TRUNC).unwrap();
    fs.close(fd).unwrap();

    // 偏移量 4 已越过新的末尾
    assert_eq!(fs.read(reader, &mut buf), Ok(0));

    assert_eq!(fs.write(writer, b"xy"), Ok(2));
    assert_eq!(fs.read(reader, &mut buf), Ok(0));
    fs.close(writer).unwrap();
    fs.close(reader).unwrap();

    let fd = fs.open("/shrink", OpenFlag::plain()).unwrap();
    assert_eq!(read_to_end(&fs, fd), b"xy");
    fs.close(fd).unwrap();
}

#[test]
fn invalid_paths() {
    let fs = tiny_fs();
    for path in ["", "/", "f", "a/b", "/\0x"] {
        assert_eq!(fs.open(path, OpenFlag::CREATE), Err(Error::InvalidPath), "{path:?}");
        assert_eq!(fs.lookup(path), Err(Error::InvalidPath), "{path:?}");
    }

    let long = format!("/{}", "n".repeat(41));
    assert_eq!(
        fs.open(&long, OpenFlag::CREATE),
        Err(Error::NameTooLong { max: 40 })
    );
    assert_eq!(fs.usage().free_inodes, 49);
}

#[test]
fn embedded_slash_is_part_of_name() {
    let fs = tiny_fs();
    let fd = fs.open("/dir/file", OpenFlag::CREATE).unwrap();
    fs.close(fd).unwrap();

    assert!(fs.lookup("/dir/file").is_ok());
    assert_eq!(fs.lookup("/dir"), Err(Error::NotFound));
    assert_eq!(fs.read_dir().unwrap()[0].name(), "dir/file");
}

#[test]
fn bad_handles() {
    let fs = tiny_fs();
    let mut buf = [0u8; 4];
    assert_eq!(fs.read(3, &mut buf), Err(Error::BadHandle(3)));
    assert_eq!(fs.write(3, b"x"), Err(Error::BadHandle(3)));
    assert_eq!(fs.close(1000), Err(Error::BadHandle(1000)));

    let fd = fs.open("/h", OpenFlag::CREATE).unwrap();
    fs.close(fd).unwrap();
    assert_eq!(fs.close(fd), Err(Error::BadHandle(fd)));
    assert_eq!(fs.close(fd).unwrap_err().kind(), ErrorKind::InvalidArgument);
}

#[test]
fn read_dir_lists_in_creation_order() {
    let fs = tiny_fs();
    for name in ["/c", "/a", "/b"] {
        let fd = fs.open(name, OpenFlag::CREATE).unwrap();
        fs.close(fd).unwrap();
    }

    let names: Vec<String> = fs
        .read_dir()
        .unwrap()
        .iter()
        .map(|entry| entry.name().to_owned())
        .collect();
    assert_eq!(names, ["c", "a", "b"]);
}

#[test]
fn empty_write_and_read() {
    let fs = tiny_fs();
    let fd = fs.open("/empty", OpenFlag::CREATE).unwrap();
    assert_eq!(fs.write(fd, &[]), Ok(0));
    let mut buf = [0u8; 0];
    assert_eq!(fs.read(fd, &mut buf), Ok(0));
    assert_eq!(fs.stat("/empty").unwrap().blocks, 0);
    fs.close(fd).unwrap();
}

#[test]
fn file_too_large() {
    let fs = tiny_fs();
    let max = fs.config().max_file_size();
    let fd = fs.open("/huge", OpenFlag::CREATE).unwrap();
    assert_eq!(
        fs.write(fd, &vec![0u8; max + 1]),
        Err(Error::FileTooLarge { max })
    );
    assert_eq!(fs.write(fd, &vec![9; max]), Ok(max));
    assert_eq!(fs.write(fd, &[9]), Err(Error::FileTooLarge { max }));
    fs.close(fd).unwrap();
}

#[test]
fn invalid_config() {
    let configs = [
        Config {
            block_count: 0,
            ..Default::default()
        },
        Config {
            max_dir_entries: usize::MAX,
            ..Default::default()
        },
        Config {
            max_name_len: usize::MAX,
            ..Default::default()
        },
    ];
    for config in configs {
        assert!(matches!(TinyFileSystem::new(config), Err(Error::InvalidConfig)));
    }
}

#[test]
fn destroy_with_open_handles() {
    let fs = tiny_fs();
    let fd = fs.open("/left-open", OpenFlag::CREATE).unwrap();
    fs.write(fd, b"bytes").unwrap();
    assert_eq!(fs.usage().open_files, 1);
    fs.destroy();
}
