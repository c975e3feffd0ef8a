//! RESP Module
//!
//! Minimal Redis serialization protocol client: commands go out as arrays of
//! bulk strings, and single-value replies are read back.

use bytes::{BufMut, Bytes, BytesMut};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufStream};
use tokio::net::TcpStream;

use crate::error::StoreError;

/// Longest header line accepted from the server.
const MAX_LINE: usize = 64 * 1024;

/// Largest bulk string accepted, matching the server's `proto-max-bulk-len`.
pub const MAX_BULK_LEN: i64 = 512 * 1024 * 1024;

// == Reply ==
/// A decoded server reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RespValue {
    /// `+OK`
    Simple(String),
    /// `-ERR ...`
    Error(String),
    /// `:42`
    Integer(i64),
    /// `$5\r\nhello`, or `$-1` for a missing key
    Bulk(Option<Bytes>),
}

// == Encode ==
/// Encodes a command as a RESP array of bulk strings.
pub fn encode_command(args: &[&[u8]]) -> BytesMut {
    let mut buf = BytesMut::with_capacity(16 + args.iter().map(|a| a.len() + 16).sum::<usize>());
    buf.put_slice(format!("*{}\r\n", args.len()).as_bytes());
    for arg in args {
        buf.put_slice(format!("${}\r\n", arg.len()).as_bytes());
        buf.put_slice(arg);
        buf.put_slice(b"\r\n");
    }
    buf
}

// == Decode ==
/// Reads one reply from `reader`.
///
/// Aggregate replies are rejected: none of the commands this client sends
/// produce them.
pub async fn read_reply<R>(reader: &mut R) -> Result<RespValue, StoreError>
where
    R: AsyncBufRead + Unpin,
{
    let line = read_line(reader).await?;
    let mut chars = line.chars();
    let tag = chars.next();
    let body = chars.as_str();

    match tag {
        Some('+') => Ok(RespValue::Simple(body.to_string())),
        Some('-') => Ok(RespValue::Error(body.to_string())),
        Some(':') => body
            .parse()
            .map(RespValue::Integer)
            .map_err(|_| StoreError::Protocol(format!("bad integer reply {body:?}"))),
        Some('$') => {
            let len: i64 = body
                .parse()
                .map_err(|_| StoreError::Protocol(format!("bad bulk length {body:?}")))?;
            if len < 0 {
                return Ok(RespValue::Bulk(None));
            }
            if len > MAX_BULK_LEN {
                return Err(StoreError::Protocol(format!("bulk length {len} exceeds limit")));
            }

            let mut data = vec![0u8; len as usize + 2];
            reader.read_exact(&mut data).await?;
            if !data.ends_with(b"\r\n") {
                return Err(StoreError::Protocol("bulk string not CRLF-terminated".into()));
            }
            data.truncate(len as usize);
            Ok(RespValue::Bulk(Some(Bytes::from(data))))
        }
        Some(other) => Err(StoreError::Protocol(format!("unsupported reply type {other:?}"))),
        None => Err(StoreError::Protocol("empty reply line".into())),
    }
}

async fn read_line<R>(reader: &mut R) -> Result<String, StoreError>
where
    R: AsyncBufRead + Unpin,
{
    let mut raw = Vec::new();
    let read = (&mut *reader)
        .take(MAX_LINE as u64)
        .read_until(b'\n', &mut raw)
        .await?;

    if read == 0 {
        return Err(StoreError::Io(std::io::ErrorKind::UnexpectedEof.into()));
    }
    if !raw.ends_with(b"\r\n") || raw.len() < 3 {
        return Err(StoreError::Protocol("malformed reply line".into()));
    }
    raw.truncate(raw.len() - 2);

    String::from_utf8(raw).map_err(|_| StoreError::Protocol("reply line is not UTF-8".into()))
}

// == Connection ==
/// A single TCP connection to the store.
#[derive(Debug)]
pub struct RedisConnection {
    stream: BufStream<TcpStream>,
}

impl RedisConnection {
    /// Dials `address` (`host:port`).
    pub async fn connect(address: &str) -> Result<Self, StoreError> {
        let stream = TcpStream::connect(address).await?;
        stream.set_nodelay(true)?;
        Ok(Self {
            stream: BufStream::new(stream),
        })
    }

    /// Sends one command and waits for its reply.
    pub async fn execute(&mut self, args: &[&[u8]]) -> Result<RespValue, StoreError> {
        self.stream.write_all(&encode_command(args)).await?;
        self.stream.flush().await?;
        read_reply(&mut self.stream).await
    }
}
