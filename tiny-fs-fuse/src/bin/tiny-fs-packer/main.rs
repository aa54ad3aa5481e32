mod cli;

use std::fs;
use std::fs::File;
use std::io;

use clap::Parser;
use cli::Cli;
use tiny_fs::TinyFileSystem;
use tiny_fs_fuse::{export, import, io_error};
use typed_bytesize::ByteSizeIec;

fn main() -> io::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    println!("source={:?}\nout_dir={:?}", cli.source, cli.out_dir);

    let config = cli.config();
    config.validate().map_err(io_error)?;
    let capacity = config.capacity() as u64;
    log::info!("capacity={capacity} bytes");
    // 整个文件系统常驻内存
    if capacity > ByteSizeIec::gib(1).0 {
        log::warn!("in-memory capacity exceeds 1 GiB");
    }
    let tfs = TinyFileSystem::new(config).map_err(io_error)?;

    let mut files = Vec::new();
    for entry in fs::read_dir(&cli.source)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        match entry.file_name().to_str() {
            Some(name) => files.push(name.to_owned()),
            None => log::warn!("skip non-UTF-8 file name {:?}", entry.file_name()),
        }
    }

    for name in files {
        println!("file: {name:?}");
        let mut host_file = File::open(cli.source.join(&name))?;
        import(&tfs, &format!("/{name}"), &mut host_file)?;
    }

    fs::create_dir_all(&cli.out_dir)?;
    for entry in tfs.read_dir().map_err(io_error)? {
        let mut host_file = File::create(cli.out_dir.join(entry.name()))?;
        export(&tfs, &format!("/{}", entry.name()), &mut host_file)?;
    }

    let usage = tfs.usage();
    log::info!(
        "free blocks={}, free inodes={}",
        usage.free_blocks,
        usage.free_inodes
    );
    tfs.destroy();

    Ok(())
}
