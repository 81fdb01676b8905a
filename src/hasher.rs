/// Streaming content fingerprints for duplicate detection.
///
/// Two files with the same fingerprint are treated as byte-identical;
/// SHA-256 collision risk is negligible for this purpose.
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

const CHUNK_SIZE: usize = 1024 * 1024;

/// Computes the SHA-256 digest of a file's full content as lowercase hex.
///
/// Streams the file in 1 MiB chunks so large files never need to fit in
/// memory.
///
/// # Errors
///
/// Fails when the file cannot be opened or read, e.g. permission denied or
/// the file vanished after scanning.
pub fn sha256_hex(path: &Path) -> io::Result<String> {
    let file = File::open(path)?;
    let mut reader = BufReader::with_capacity(CHUNK_SIZE, file);
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; CHUNK_SIZE];

    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}
