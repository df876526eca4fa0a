use crate::protocol::text::network::{reply, ValueResponse, CRLF};
use bytes::{BufMut, Bytes, BytesMut};

/// Server response
#[derive(Debug, Clone, PartialEq)]
pub enum TextResponse {
    Stored,
    /// hits of a get request in request order
    Found(Vec<ValueResponse>),
    /// get request without any hit
    NotFound,
    Deleted,
    DeleteNotFound,
    Version(String),
    /// unknown command
    Error,
    ClientError(&'static str),
    ServerError(&'static str),
}

// decimal digits of u64::MAX
const MAX_NUMBER_WIDTH: usize = 20;

pub struct ResponseMessage {
    pub(crate) data: Bytes,
}

pub struct MemcacheTextEncoder {}

impl Default for MemcacheTextEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl MemcacheTextEncoder {
    pub fn new() -> MemcacheTextEncoder {
        MemcacheTextEncoder {}
    }

    pub fn get_length(&self, msg: &TextResponse) -> usize {
        match msg {
            TextResponse::Stored => reply::STORED.len(),
            TextResponse::Found(values) => {
                values
                    .iter()
                    .map(|value| {
                        // VALUE <key> <flags> <bytes>\r\n<data>\r\n
                        reply::VALUE.len()
                            + value.key.len()
                            + 2 * MAX_NUMBER_WIDTH
                            + 2
                            + 2 * CRLF.len()
                            + value.value.len()
                    })
                    .sum::<usize>()
                    + reply::END.len()
            }
            TextResponse::NotFound => reply::END.len(),
            TextResponse::Deleted => reply::DELETED.len(),
            TextResponse::DeleteNotFound => reply::NOT_FOUND.len(),
            TextResponse::Version(version) => reply::VERSION.len() + version.len() + CRLF.len(),
            TextResponse::Error => reply::ERROR.len(),
            TextResponse::ClientError(reason) => {
                reply::CLIENT_ERROR.len() + reason.len() + CRLF.len()
            }
            TextResponse::ServerError(reason) => {
                reply::SERVER_ERROR.len() + reason.len() + CRLF.len()
            }
        }
    }

    /// Encodes a msg into a single buffer ready to be written to a socket
    pub fn encode_message(&self, msg: &TextResponse) -> ResponseMessage {
        let mut dst = BytesMut::with_capacity(self.get_length(msg));
        match msg {
            TextResponse::Stored => dst.put_slice(reply::STORED),
            TextResponse::Found(values) => {
                for value in values {
                    self.write_value(value, &mut dst);
                }
                dst.put_slice(reply::END);
            }
            TextResponse::NotFound => dst.put_slice(reply::END),
            TextResponse::Deleted => dst.put_slice(reply::DELETED),
            TextResponse::DeleteNotFound => dst.put_slice(reply::NOT_FOUND),
            TextResponse::Version(version) => {
                dst.put_slice(reply::VERSION);
                dst.put_slice(version.as_bytes());
                dst.put_slice(CRLF);
            }
            TextResponse::Error => dst.put_slice(reply::ERROR),
            TextResponse::ClientError(reason) => {
                dst.put_slice(reply::CLIENT_ERROR);
                dst.put_slice(reason.as_bytes());
                dst.put_slice(CRLF);
            }
            TextResponse::ServerError(reason) => {
                dst.put_slice(reply::SERVER_ERROR);
                dst.put_slice(reason.as_bytes());
                dst.put_slice(CRLF);
            }
        }
        ResponseMessage { data: dst.freeze() }
    }

    fn write_value(&self, value: &ValueResponse, dst: &mut BytesMut) {
        dst.put_slice(reply::VALUE);
        dst.put_slice(&value.key[..]);
        dst.put_slice(format!(" {} {}", value.flags, value.value.len()).as_bytes());
        dst.put_slice(CRLF);
        dst.put_slice(&value.value[..]);
        dst.put_slice(CRLF);
    }
}
