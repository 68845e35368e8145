mod local;

pub use local::LocalFileReader;

use std::io::{self, Read, Write};

/// Size of the buffer used when streaming a member out of an archive.
pub const COPY_BUFFER_SIZE: usize = 16 * 1024;

/// Copy exactly `len` bytes from `reader` to `writer` through a fixed buffer.
///
/// Fails with [`io::ErrorKind::UnexpectedEof`] if the reader runs dry first.
pub fn copy_exact<R, W>(reader: &mut R, writer: &mut W, len: u64) -> io::Result<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut buf = vec![0u8; len.min(COPY_BUFFER_SIZE as u64) as usize];
    let mut copied = 0u64;

    while copied < len {
        let want = (len - copied).min(buf.len() as u64) as usize;
        let n = match reader.read(&mut buf[..want]) {
            Ok(0) => {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!("stream ended after {copied} of {len} bytes"),
                ));
            }
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        writer.write_all(&buf[..n])?;
        copied += n as u64;
    }

    Ok(copied)
}
