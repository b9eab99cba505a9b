//! # RESP2 Framing and Reply Decoding
//!
//! Purpose: Serialize one command as a request array of bulk strings and
//! decode exactly one reply value from a buffered byte stream.
//!
//! ## Design Principles
//! 1. **Top-Down Decoding**: One header line selects the reply type; arrays
//!    recurse into the same decoder for each declared element.
//! 2. **Null Is Not Empty**: `$-1` and `*-1` decode to `None`, never to an
//!    empty payload.
//! 3. **Binary-Safe**: Bulk payloads are read by declared length, so they
//!    may contain CR/LF bytes.
//! 4. **Fail Fast**: Any framing violation, including EOF inside a frame,
//!    is a protocol error.

use std::io::{self, BufRead, Read};

use crate::client::{ClientError, ClientResult};

/// Upper bound on elements preallocated for an array reply. Larger arrays
/// still decode; they just grow on demand instead of trusting the header.
const MAX_PREALLOC: usize = 1024;

/// Upper bound on bytes preallocated for a bulk payload. The declared length
/// is only honored as data actually arrives.
const MAX_BULK_PREALLOC: usize = 64 * 1024;

/// Nested arrays deeper than this are rejected.
const MAX_DEPTH: usize = 32;

/// One decoded reply value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// `+OK` style status line.
    Simple(Vec<u8>),
    /// `-ERR ...` error line.
    Error(Vec<u8>),
    /// `:123` signed integer.
    Integer(i64),
    /// `$n` bulk payload, `None` for the null bulk string.
    Bulk(Option<Vec<u8>>),
    /// `*n` array, `None` for the null array.
    Array(Option<Vec<Reply>>),
}

impl Reply {
    /// Short type name used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Reply::Simple(_) => "simple string",
            Reply::Error(_) => "error",
            Reply::Integer(_) => "integer",
            Reply::Bulk(Some(_)) => "bulk string",
            Reply::Bulk(None) => "null bulk string",
            Reply::Array(Some(_)) => "array",
            Reply::Array(None) => "null array",
        }
    }
}

/// Appends the request frame for `parts` (command name first) to `out`.
///
/// Frame: `*<count>\r\n` then `$<len>\r\n<bytes>\r\n` per part.
pub fn encode_command<A: AsRef<[u8]>>(parts: &[A], out: &mut Vec<u8>) {
    out.push(b'*');
    push_decimal(out, parts.len());
    out.extend_from_slice(b"\r\n");
    for part in parts {
        let part = part.as_ref();
        out.push(b'$');
        push_decimal(out, part.len());
        out.extend_from_slice(b"\r\n");
        out.extend_from_slice(part);
        out.extend_from_slice(b"\r\n");
    }
}

/// Reads exactly one reply from `reader`.
///
/// `line_buf` is scratch space for header lines; its contents on return are
/// unspecified.
pub fn read_reply<R: BufRead>(reader: &mut R, line_buf: &mut Vec<u8>) -> ClientResult<Reply> {
    read_reply_at(reader, line_buf, 0)
}

fn read_reply_at<R: BufRead>(
    reader: &mut R,
    line_buf: &mut Vec<u8>,
    depth: usize,
) -> ClientResult<Reply> {
    if depth > MAX_DEPTH {
        return Err(ClientError::Protocol("reply nesting too deep"));
    }

    read_line(reader, line_buf)?;
    let (&marker, rest) = line_buf
        .split_first()
        .ok_or(ClientError::Protocol("empty reply line"))?;

    match marker {
        b'+' => Ok(Reply::Simple(rest.to_vec())),
        b'-' => Ok(Reply::Error(rest.to_vec())),
        b':' => Ok(Reply::Integer(parse_decimal(rest)?)),
        b'$' => {
            let len = parse_decimal(rest)?;
            read_bulk(reader, len)
        }
        b'*' => {
            let count = parse_decimal(rest)?;
            read_array(reader, count, line_buf, depth)
        }
        _ => Err(ClientError::Protocol("unrecognized reply marker")),
    }
}

fn read_bulk<R: BufRead>(reader: &mut R, len: i64) -> ClientResult<Reply> {
    if len < 0 {
        return Ok(Reply::Bulk(None));
    }
    let len = usize::try_from(len).map_err(|_| ClientError::Protocol("bulk length too large"))?;

    let mut data = Vec::with_capacity(len.min(MAX_BULK_PREALLOC));
    reader.by_ref().take(len as u64).read_to_end(&mut data)?;
    if data.len() < len {
        return Err(ClientError::Protocol("connection closed mid-frame"));
    }

    let mut crlf = [0u8; 2];
    fill(reader, &mut crlf)?;
    if &crlf != b"\r\n" {
        return Err(ClientError::Protocol("bulk payload not terminated by CRLF"));
    }

    Ok(Reply::Bulk(Some(data)))
}

fn read_array<R: BufRead>(
    reader: &mut R,
    count: i64,
    line_buf: &mut Vec<u8>,
    depth: usize,
) -> ClientResult<Reply> {
    if count < 0 {
        return Ok(Reply::Array(None));
    }
    let count =
        usize::try_from(count).map_err(|_| ClientError::Protocol("array length too large"))?;

    let mut items = Vec::with_capacity(count.min(MAX_PREALLOC));
    for _ in 0..count {
        items.push(read_reply_at(reader, line_buf, depth + 1)?);
    }
    Ok(Reply::Array(Some(items)))
}

/// Reads one CRLF-terminated line into `buf`, without the terminator.
fn read_line<R: BufRead>(reader: &mut R, buf: &mut Vec<u8>) -> ClientResult<()> {
    buf.clear();
    let read = reader.read_until(b'\n', buf)?;
    if read == 0 {
        return Err(ClientError::Protocol("connection closed before reply"));
    }
    if !buf.ends_with(b"\r\n") {
        // Either EOF cut the line short or the server sent a bare LF.
        return Err(ClientError::Protocol("reply line not terminated by CRLF"));
    }
    buf.truncate(buf.len() - 2);
    Ok(())
}

fn fill<R: BufRead>(reader: &mut R, buf: &mut [u8]) -> ClientResult<()> {
    reader.read_exact(buf).map_err(|err| match err.kind() {
        io::ErrorKind::UnexpectedEof => ClientError::Protocol("connection closed mid-frame"),
        _ => ClientError::Io(err),
    })
}

fn parse_decimal(data: &[u8]) -> ClientResult<i64> {
    std::str::from_utf8(data)
        .ok()
        .filter(|text| !text.starts_with('+'))
        .and_then(|text| text.parse::<i64>().ok())
        .ok_or(ClientError::Protocol("invalid decimal in reply header"))
}

fn push_decimal(out: &mut Vec<u8>, mut value: usize) {
    // Digits are produced in reverse into a stack buffer; usize::MAX fits in 20.
    let mut digits = [0u8; 20];
    let mut start = digits.len();
    loop {
        start -= 1;
        digits[start] = b'0' + (value % 10) as u8;
        value /= 10;
        if value == 0 {
            break;
        }
    }
    out.extend_from_slice(&digits[start..]);
}
