use crate::protocol::text::network::{
    self, command, DeleteRequest, GetRequest, ProtocolError, SetRequest,
};
use bytes::{Buf, Bytes, BytesMut};
use std::io;
use std::mem;
use std::str::FromStr;
use tokio_util::codec::Decoder;

/// Client request
#[derive(Debug, PartialEq)]
pub enum TextRequest {
    Get(GetRequest),
    Set(SetRequest),
    Delete(DeleteRequest),
    Version,
    Quit,
    /// Input which could not be decoded, answered with a single error reply
    Malformed(ProtocolError),
}

/// Set command line waiting for its data block
#[derive(Debug, PartialEq)]
struct PendingSet {
    key: Bytes,
    flags: u32,
    time_to_live: i64,
    length: usize,
    noreply: bool,
}

#[derive(Debug, PartialEq)]
enum RequestParserState {
    AwaitingLine,
    AwaitingPayload(PendingSet),
    /// skipping data block of a rejected set command
    Swallowing(usize),
    /// skipping everything up to the next line terminator
    Discarding,
}

/// Incremental decoder of memcached text protocol.
///
/// Bytes may arrive split or coalesced in any way; the decoder keeps
/// its state between calls and never yields a partial command.
pub struct MemcacheTextDecoder {
    state: RequestParserState,
    item_size_limit: u32,
}

impl MemcacheTextDecoder {
    pub fn new(item_size_limit: u32) -> MemcacheTextDecoder {
        MemcacheTextDecoder {
            state: RequestParserState::AwaitingLine,
            item_size_limit,
        }
    }

    fn init_parser(&mut self) {
        self.state = RequestParserState::AwaitingLine;
    }

    /// Returns true when the decoder is between commands
    pub fn is_idle(&self) -> bool {
        self.state == RequestParserState::AwaitingLine
    }

    fn decode_line(&mut self, src: &mut BytesMut) -> Option<TextRequest> {
        let newline = match src.iter().position(|byte| *byte == b'\n') {
            Some(position) => position,
            None => {
                if src.len() > network::MAX_LINE_LENGTH {
                    debug!("Command line longer than {} bytes", network::MAX_LINE_LENGTH);
                    src.clear();
                    self.state = RequestParserState::Discarding;
                    return Some(TextRequest::Malformed(ProtocolError::LineTooLong));
                }
                return None;
            }
        };

        let mut line = src.split_to(newline + 1).freeze();
        line.truncate(newline);
        if line.last() == Some(&b'\r') {
            line.truncate(newline - 1);
        }
        if line.len() > network::MAX_LINE_LENGTH {
            return Some(TextRequest::Malformed(ProtocolError::LineTooLong));
        }
        self.parse_command_line(line)
    }

    /// Parses a command line without terminator.
    /// Returns None if command needs a data block.
    fn parse_command_line(&mut self, line: Bytes) -> Option<TextRequest> {
        let tokens = tokenize(&line);
        let name = match tokens.first() {
            Some(name) => name.clone(),
            None => return Some(TextRequest::Malformed(ProtocolError::UnknownCommand)),
        };
        let arguments = &tokens[1..];
        trace!("Command line: {:?}", line);

        match &name[..] {
            command::GET => Some(parse_get(arguments)),
            command::SET => self.parse_set(arguments),
            command::DELETE => Some(parse_delete(arguments)),
            command::VERSION if arguments.is_empty() => Some(TextRequest::Version),
            command::QUIT if arguments.is_empty() => Some(TextRequest::Quit),
            command::VERSION | command::QUIT => Some(TextRequest::Malformed(
                ProtocolError::BadCommandLineFormat,
            )),
            _ => Some(TextRequest::Malformed(ProtocolError::UnknownCommand)),
        }
    }

    // set <key> <flags> <exptime> <bytes> [noreply]
    fn parse_set(&mut self, arguments: &[Bytes]) -> Option<TextRequest> {
        if arguments.len() != 4 && arguments.len() != 5 {
            return Some(TextRequest::Malformed(ProtocolError::BadCommandLineFormat));
        }

        // without a valid length the data block cannot be located,
        // it will be read as following command lines
        let length: usize = match parse_number(&arguments[3]) {
            Some(length) if length <= network::MAX_DATA_LENGTH => length,
            _ => return Some(TextRequest::Malformed(ProtocolError::BadCommandLineFormat)),
        };

        let noreply = match arguments.get(4) {
            Some(token) => &token[..] == network::NOREPLY,
            None => false,
        };
        let flags: Option<u32> = parse_number(&arguments[1]);
        let time_to_live: Option<i64> = parse_number(&arguments[2]);

        let error = if arguments[0].len() > network::MAX_KEY_LENGTH {
            Some(ProtocolError::KeyTooLong)
        } else if flags.is_none() || time_to_live.is_none() {
            Some(ProtocolError::BadCommandLineFormat)
        } else if arguments.len() == 5 && !noreply {
            Some(ProtocolError::BadCommandLineFormat)
        } else if length > self.item_size_limit as usize {
            Some(ProtocolError::ValueTooLarge)
        } else {
            None
        };

        match (error, flags, time_to_live) {
            (None, Some(flags), Some(time_to_live)) => {
                self.state = RequestParserState::AwaitingPayload(PendingSet {
                    key: arguments[0].clone(),
                    flags,
                    time_to_live,
                    length,
                    noreply,
                });
                None
            }
            (error, _, _) => {
                let error = error.unwrap_or(ProtocolError::BadCommandLineFormat);
                debug!("Rejected set command: {:?}, skipping {} bytes", error, length);
                self.state = RequestParserState::Swallowing(length + network::CRLF.len());
                Some(TextRequest::Malformed(error))
            }
        }
    }

    fn decode_payload(&mut self, src: &mut BytesMut) -> Option<TextRequest> {
        let length = match &self.state {
            RequestParserState::AwaitingPayload(pending) => pending.length,
            _ => return None,
        };

        let needed = length + network::CRLF.len();
        if src.len() < needed {
            src.reserve(needed - src.len());
            return None;
        }

        let pending = match mem::replace(&mut self.state, RequestParserState::AwaitingLine) {
            RequestParserState::AwaitingPayload(pending) => pending,
            _ => unreachable!(),
        };

        if &src[length..needed] != network::CRLF {
            debug!("Data block of {} bytes not terminated by CRLF", length);
            src.advance(length);
            self.state = RequestParserState::Discarding;
            return Some(TextRequest::Malformed(ProtocolError::BadDataChunk));
        }

        let value = src.split_to(length).freeze();
        src.advance(network::CRLF.len());
        Some(TextRequest::Set(SetRequest {
            key: pending.key,
            flags: pending.flags,
            time_to_live: pending.time_to_live,
            value,
            noreply: pending.noreply,
        }))
    }
}

impl Default for MemcacheTextDecoder {
    fn default() -> Self {
        Self::new(1024 * 1024)
    }
}

impl Decoder for MemcacheTextDecoder {
    type Item = TextRequest;
    type Error = io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        loop {
            match self.state {
                RequestParserState::AwaitingLine => {
                    if src.is_empty() {
                        return Ok(None);
                    }
                    match self.decode_line(src) {
                        Some(request) => return Ok(Some(request)),
                        None if self.is_idle() => return Ok(None),
                        None => continue,
                    }
                }
                RequestParserState::AwaitingPayload(_) => {
                    return Ok(self.decode_payload(src));
                }
                RequestParserState::Swallowing(remaining) => {
                    let skip = remaining.min(src.len());
                    src.advance(skip);
                    if skip < remaining {
                        self.state = RequestParserState::Swallowing(remaining - skip);
                        return Ok(None);
                    }
                    self.init_parser();
                }
                RequestParserState::Discarding => {
                    match src.iter().position(|byte| *byte == b'\n') {
                        Some(position) => {
                            src.advance(position + 1);
                            self.init_parser();
                        }
                        None => {
                            src.clear();
                            return Ok(None);
                        }
                    }
                }
            }
        }
    }
}

// get <key>*
fn parse_get(arguments: &[Bytes]) -> TextRequest {
    if arguments.is_empty() {
        return TextRequest::Malformed(ProtocolError::BadCommandLineFormat);
    }
    if arguments
        .iter()
        .any(|key| key.len() > network::MAX_KEY_LENGTH)
    {
        return TextRequest::Malformed(ProtocolError::KeyTooLong);
    }
    TextRequest::Get(GetRequest {
        keys: arguments.to_vec(),
    })
}

// delete <key> [noreply]
fn parse_delete(arguments: &[Bytes]) -> TextRequest {
    let noreply = match arguments.len() {
        1 => false,
        2 if &arguments[1][..] == network::NOREPLY => true,
        _ => return TextRequest::Malformed(ProtocolError::BadCommandLineFormat),
    };
    if arguments[0].len() > network::MAX_KEY_LENGTH {
        return TextRequest::Malformed(ProtocolError::KeyTooLong);
    }
    TextRequest::Delete(DeleteRequest {
        key: arguments[0].clone(),
        noreply,
    })
}

/// Splits line on spaces, tokens share memory with the line
fn tokenize(line: &Bytes) -> Vec<Bytes> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;
    for (idx, byte) in line.iter().enumerate() {
        match (byte, start) {
            (b' ', Some(begin)) => {
                tokens.push(line.slice(begin..idx));
                start = None;
            }
            (b' ', None) => {}
            (_, None) => start = Some(idx),
            (_, Some(_)) => {}
        }
    }
    if let Some(begin) = start {
        tokens.push(line.slice(begin..));
    }
    tokens
}

fn parse_number<T: FromStr>(token: &[u8]) -> Option<T> {
    std::str::from_utf8(token).ok()?.parse::<T>().ok()
}
