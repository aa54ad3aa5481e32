use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
pub struct Cli {
    /// Host directory whose files are loaded into tiny-fs
    #[arg(long, short)]
    pub source: PathBuf,

    /// Host directory the stored files are exported to
    #[arg(long, short = 'O')]
    pub out_dir: PathBuf,

    /// Block size in bytes
    #[arg(long)]
    pub block_size: Option<usize>,

    /// Number of blocks
    #[arg(long)]
    pub blocks: Option<usize>,

    /// Inode table capacity
    #[arg(long)]
    pub inodes: Option<usize>,

    /// Open file table capacity
    #[arg(long)]
    pub open_files: Option<usize>,

    /// Maximum file name length in bytes
    #[arg(long)]
    pub max_name_len: Option<usize>,

    /// Maximum number of root directory entries
    #[arg(long)]
    pub max_dir_entries: Option<usize>,
}

impl Cli {
    pub fn config(&self) -> tiny_fs::Config {
        let default = tiny_fs::Config::default();
        tiny_fs::Config {
            block_size: self.block_size.unwrap_or(default.block_size),
            block_count: self.blocks.unwrap_or(default.block_count),
            inode_count: self.inodes.unwrap_or(default.inode_count),
            open_file_count: self.open_files.unwrap_or(default.open_file_count),
            max_name_len: self.max_name_len.unwrap_or(default.max_name_len),
            max_dir_entries: self.max_dir_entries.unwrap_or(default.max_dir_entries),
        }
    }
}
