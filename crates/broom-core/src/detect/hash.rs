use std::fs::File;
use std::hash::Hasher as _;
use std::io::{self, Read};
use std::path::Path;

use twox_hash::XxHash64;

/// Leading window for the cheap narrowing digest.
const PARTIAL_WINDOW: u64 = 4096;
/// Streaming chunk for the full-content digest; bounds peak memory
/// independent of file size.
const FULL_CHUNK: usize = 64 * 1024;

pub(super) fn hash_partial(path: &Path) -> io::Result<u64> {
    let file = File::open(path)?;
    let mut buffer = Vec::with_capacity(PARTIAL_WINDOW as usize);
    file.take(PARTIAL_WINDOW).read_to_end(&mut buffer)?;
    Ok(hash_data(&buffer))
}

pub(super) fn hash_full(path: &Path) -> io::Result<u64> {
    let mut file = File::open(path)?;
    let mut hasher = XxHash64::with_seed(0);
    let mut chunk = vec![0u8; FULL_CHUNK];
    loop {
        let read = file.read(&mut chunk)?;
        if read == 0 {
            break;
        }
        hasher.write(&chunk[..read]);
    }
    Ok(hasher.finish())
}

fn hash_data(data: &[u8]) -> u64 {
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(data);
    hasher.finish()
}
