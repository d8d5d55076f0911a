//! Async filesystem helpers.
//!
//! Re-exports the subset of `tokio::fs` the bridges use.

pub use tokio::fs::{
    copy, create_dir_all, metadata, read_dir, remove_dir_all, remove_file, rename, DirEntry, File,
    OpenOptions,
};
