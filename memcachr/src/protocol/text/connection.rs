use crate::protocol::text::decoder::{MemcacheTextDecoder, TextRequest};
use crate::protocol::text::encoder::{MemcacheTextEncoder, ResponseMessage, TextResponse};
use bytes::BytesMut;
use std::io;
use std::io::{Error, ErrorKind};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio_util::codec::Decoder;

pub struct MemcacheTextConnection<S = TcpStream> {
    stream: S,
    decoder: MemcacheTextDecoder,
    encoder: MemcacheTextEncoder,
    buffer: BytesMut,
}

impl<S> MemcacheTextConnection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    const INITIAL_BUFFER_SIZE: usize = 4096;

    pub fn new(socket: S, item_size_limit: u32) -> Self {
        MemcacheTextConnection {
            stream: socket,
            decoder: MemcacheTextDecoder::new(item_size_limit),
            encoder: MemcacheTextEncoder::new(),
            buffer: BytesMut::with_capacity(Self::INITIAL_BUFFER_SIZE),
        }
    }

    /// Returns next complete request, None when the peer closed
    /// the connection between requests.
    pub async fn read_frame(&mut self) -> Result<Option<TextRequest>, io::Error> {
        loop {
            // Attempt to parse a frame from the buffered data. If enough data
            // has been buffered, the frame is returned.
            if let Some(frame) = self.decoder.decode(&mut self.buffer)? {
                return Ok(Some(frame));
            }

            // There is not enough buffered data to read a frame. Attempt to
            // read more data from the socket.
            //
            // On success, the number of bytes is returned. `0` indicates "end
            // of stream".
            if 0 == self.stream.read_buf(&mut self.buffer).await? {
                // The remote closed the connection. For this to be a clean
                // shutdown, there should be no data in the read buffer and
                // no command waiting for its data block.
                if self.buffer.is_empty() && self.decoder.is_idle() {
                    return Ok(None);
                } else {
                    return Err(Error::new(
                        ErrorKind::ConnectionReset,
                        "Connection reset by peer",
                    ));
                }
            }
        }
    }

    pub async fn write(&mut self, msg: &TextResponse) -> io::Result<()> {
        let message = self.encoder.encode_message(msg);
        self.write_data_to_stream(message).await?;
        Ok(())
    }

    async fn write_data_to_stream(&mut self, msg: ResponseMessage) -> io::Result<()> {
        self.stream.write_all(&msg.data[..]).await?;
        Ok(())
    }

    pub async fn shutdown(&mut self) -> io::Result<()> {
        self.stream.shutdown().await?;
        Ok(())
    }
}
