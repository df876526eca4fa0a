use std::io::{ErrorKind, Read, Write};
use std::net::TcpStream;
use std::time::Duration;

const READ_TIMEOUT: Duration = Duration::from_secs(5);

/// Plain TCP connection for byte exact protocol checks
pub struct RawClient {
    stream: TcpStream,
}

#[allow(dead_code)]
impl RawClient {
    pub fn connect(port: u16) -> RawClient {
        let stream = TcpStream::connect(("127.0.0.1", port)).unwrap();
        stream
            .set_read_timeout(Some(READ_TIMEOUT))
            .unwrap();
        stream.set_nodelay(true).unwrap();
        RawClient { stream }
    }

    pub fn send(&mut self, data: &[u8]) {
        self.stream.write_all(data).unwrap();
        self.stream.flush().unwrap();
    }

    /// Reads exactly as many bytes as expected and compares them
    pub fn expect(&mut self, expected: &[u8]) {
        let mut received = vec![0u8; expected.len()];
        self.stream.read_exact(&mut received).unwrap();
        assert_eq!(
            String::from_utf8_lossy(&received),
            String::from_utf8_lossy(expected)
        );
    }

    pub fn request(&mut self, data: &[u8], expected: &[u8]) {
        self.send(data);
        self.expect(expected);
    }

    /// Returns true when server closed the connection
    pub fn is_closed(&mut self) -> bool {
        let mut buffer = [0u8; 1];
        matches!(self.stream.read(&mut buffer), Ok(0))
    }

    /// Returns true when nothing arrives and the connection stays open
    /// for the given time
    pub fn is_silent_for(&mut self, wait: Duration) -> bool {
        self.stream.set_read_timeout(Some(wait)).unwrap();
        let mut buffer = [0u8; 1];
        let result = self.stream.read(&mut buffer);
        self.stream.set_read_timeout(Some(READ_TIMEOUT)).unwrap();
        matches!(result, Err(err) if err.kind() == ErrorKind::WouldBlock || err.kind() == ErrorKind::TimedOut)
    }
}
