//! Line framing over any [`embedded_io`] byte channel.
//!
//! The 9129B has no request IDs, so replies are matched to queries purely by order. Exactly
//! one line may be read per query sent.

use embedded_io::{Error as _, ErrorKind};

use crate::{
    command::{END_BYTE, END_BYTE_U8, START_BYTE},
    error::{Error, Result},
};

/// Write one framed command line and flush it out.
pub fn send_line<S: embedded_io::Write>(interface: &mut S, line: &str) -> Result<(), S::Error> {
    log::trace!("-> {line}");
    for part in [START_BYTE, line, END_BYTE] {
        interface
            .write_all(part.as_bytes())
            .map_err(Error::SerialError)?;
    }
    interface.flush().map_err(Error::SerialError)
}

/// Read one reply line, without its terminator.
///
/// Bytes are pulled one at a time so nothing past the terminator is consumed. A read that
/// times out, or a channel that has nothing left to give, means the terminator never came.
///
/// A line longer than `L` is still read up to its terminator before [`Error::BufferError`]
/// is returned, so the next read starts at the next reply.
pub fn read_line<S: embedded_io::Read, const L: usize>(
    interface: &mut S,
) -> Result<heapless::String<L>, S::Error> {
    let mut buff: heapless::Vec<u8, L> = heapless::Vec::new();
    let mut overflowed = false;
    let mut byte = [0u8; 1];
    loop {
        match interface.read(&mut byte) {
            Ok(0) => return Err(Error::Timeout),
            Ok(_) if byte[0] == END_BYTE_U8 => break,
            Ok(_) => {
                if !overflowed && buff.push(byte[0]).is_err() {
                    overflowed = true;
                }
            }
            Err(e) if matches!(e.kind(), ErrorKind::Interrupted) => continue,
            Err(e) if matches!(e.kind(), ErrorKind::TimedOut) => return Err(Error::Timeout),
            Err(e) => return Err(Error::SerialError(e)),
        }
    }
    if overflowed {
        log::warn!("Discarded a reply longer than {} bytes", L);
        return Err(Error::BufferError);
    }
    // Tolerate a CRLF terminator.
    if buff.last() == Some(&b'\r') {
        buff.pop();
    }
    let line = heapless::String::from_utf8(buff).map_err(|_| Error::MalformedReply)?;
    log::trace!("<- {line}");
    Ok(line)
}
