use bytes::Bytes;

pub const CRLF: &[u8] = b"\r\n";
pub const MAX_KEY_LENGTH: usize = 250;
/// Longest accepted command line, payload excluded
pub const MAX_LINE_LENGTH: usize = 2048;
pub const NOREPLY: &[u8] = b"noreply";
/// Largest data block length a set command line may announce
pub const MAX_DATA_LENGTH: usize = i32::MAX as usize - 2;

pub mod command {
    pub const GET: &[u8] = b"get";
    pub const SET: &[u8] = b"set";
    pub const DELETE: &[u8] = b"delete";
    pub const VERSION: &[u8] = b"version";
    pub const QUIT: &[u8] = b"quit";
}

pub mod reply {
    pub const STORED: &[u8] = b"STORED\r\n";
    pub const END: &[u8] = b"END\r\n";
    pub const VALUE: &[u8] = b"VALUE ";
    pub const DELETED: &[u8] = b"DELETED\r\n";
    pub const NOT_FOUND: &[u8] = b"NOT_FOUND\r\n";
    pub const VERSION: &[u8] = b"VERSION ";
    pub const ERROR: &[u8] = b"ERROR\r\n";
    pub const CLIENT_ERROR: &[u8] = b"CLIENT_ERROR ";
    pub const SERVER_ERROR: &[u8] = b"SERVER_ERROR ";
}

#[derive(Debug, Clone, PartialEq)]
pub struct SetRequest {
    pub key: Bytes,
    pub flags: u32,
    /// exptime field as sent by a client, in seconds
    pub time_to_live: i64,
    pub value: Bytes,
    pub noreply: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GetRequest {
    pub keys: Vec<Bytes>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteRequest {
    pub key: Bytes,
    pub noreply: bool,
}

/// Single hit of a get request
#[derive(Debug, Clone, PartialEq)]
pub struct ValueResponse {
    pub key: Bytes,
    pub flags: u32,
    pub value: Bytes,
}

/// Request which could not be decoded.
/// Reasons are fixed strings so no internal state reaches a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolError {
    /// command name is not known
    UnknownCommand,
    /// wrong number of fields or field which is not a number
    BadCommandLineFormat,
    /// payload not terminated by \r\n
    BadDataChunk,
    KeyTooLong,
    LineTooLong,
    /// payload is bigger than item size limit
    ValueTooLarge,
}

impl ProtocolError {
    pub fn reason(&self) -> &'static str {
        match self {
            ProtocolError::UnknownCommand => "unknown command",
            ProtocolError::BadCommandLineFormat => "bad command line format",
            ProtocolError::BadDataChunk => "bad data chunk",
            ProtocolError::KeyTooLong => "key too long",
            ProtocolError::LineTooLong => "line too long",
            ProtocolError::ValueTooLarge => "object too large for cache",
        }
    }
}
