//! We use this mocking module in unit tests to emulate the serial link to a 9129B.
//!
//! Replies are pre-loaded in the order the device would send them. Once they run out,
//! reads fail with a timeout, like a real port whose device has gone quiet.

/// Our mock type used to emulate a serial port.
pub struct MockSerial {
    /// Buffer to store data written to the mock serial port
    write_buffer: heapless::Vec<u8, 2048>,
    /// Buffer containing pre-configured response data to be read
    read_buffer: heapless::Vec<u8, 1024>,
    /// Current position in the read buffer
    read_position: usize,
    /// Flag to simulate write errors
    should_error_on_write: bool,
    /// Flag to simulate read errors
    should_error_on_read: bool,
}

#[derive(thiserror::Error, Debug)]
pub enum MockSerialError {
    /// Simulated timeout, also returned once the replies are used up
    #[error("Mock read timed out")]
    Timeout,
    /// Simulated buffer overflow
    #[error("Mock buffer overflow")]
    BufferOverflow,
    /// Generic simulated error for testing
    #[error("Simulated serial error")]
    SimulatedError,
}

impl embedded_io::Error for MockSerialError {
    fn kind(&self) -> embedded_io::ErrorKind {
        match self {
            MockSerialError::Timeout => embedded_io::ErrorKind::TimedOut,
            MockSerialError::BufferOverflow => embedded_io::ErrorKind::OutOfMemory,
            MockSerialError::SimulatedError => embedded_io::ErrorKind::Other,
        }
    }
}

impl embedded_io::ErrorType for MockSerial {
    type Error = MockSerialError;
}

impl embedded_io::Write for MockSerial {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        if self.should_error_on_write {
            return Err(MockSerialError::SimulatedError);
        }
        self.write_buffer
            .extend_from_slice(buf)
            .map_err(|_| MockSerialError::BufferOverflow)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        if self.should_error_on_write {
            return Err(MockSerialError::SimulatedError);
        }
        Ok(())
    }
}

impl embedded_io::Read for MockSerial {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if self.should_error_on_read {
            return Err(MockSerialError::SimulatedError);
        }

        if self.read_position >= self.read_buffer.len() {
            return Err(MockSerialError::Timeout);
        }

        let available_bytes = self.read_buffer.len() - self.read_position;
        let bytes_to_read = core::cmp::min(buf.len(), available_bytes);
        buf[..bytes_to_read].copy_from_slice(
            &self.read_buffer[self.read_position..self.read_position + bytes_to_read],
        );

        self.read_position += bytes_to_read;
        Ok(bytes_to_read)
    }
}

impl MockSerial {
    /// Create a new MockSerial instance with empty buffers
    pub fn new() -> Self {
        Self {
            write_buffer: heapless::Vec::new(),
            read_buffer: heapless::Vec::new(),
            read_position: 0,
            should_error_on_write: false,
            should_error_on_read: false,
        }
    }

    /// Create a MockSerial that will answer with these lines, in order.
    pub fn with_replies<'a>(replies: impl IntoIterator<Item = &'a str>) -> Self {
        let mut mock = Self::new();
        for reply in replies {
            mock.queue_reply(reply).unwrap();
        }
        mock
    }

    /// Set the data that will be returned when read() is called
    pub fn set_read_data(&mut self, data: &[u8]) -> Result<(), MockSerialError> {
        self.read_buffer.clear();
        self.read_position = 0;
        self.read_buffer
            .extend_from_slice(data)
            .map_err(|_| MockSerialError::BufferOverflow)
    }

    /// Append one reply line after whatever is still unread.
    pub fn queue_reply(&mut self, reply: &str) -> Result<(), MockSerialError> {
        self.read_buffer
            .extend_from_slice(reply.as_bytes())
            .and_then(|_| self.read_buffer.extend_from_slice(b"\n"))
            .map_err(|_| MockSerialError::BufferOverflow)
    }

    /// Get a reference to the data that was written to this mock serial port
    pub fn written_data(&self) -> &[u8] {
        &self.write_buffer
    }

    /// Everything written so far, split into command lines.
    pub fn written_lines(&self) -> Vec<&str> {
        core::str::from_utf8(&self.write_buffer)
            .unwrap()
            .split_terminator('\n')
            .collect()
    }

    /// Number of replies not yet consumed.
    pub fn unread_replies(&self) -> usize {
        self.read_buffer[self.read_position..]
            .iter()
            .filter(|&&byte| byte == b'\n')
            .count()
    }

    /// Clear the write buffer
    pub fn clear_written_data(&mut self) {
        self.write_buffer.clear();
    }

    /// Configure whether write operations should fail with an error
    pub fn set_write_error(&mut self, should_error: bool) {
        self.should_error_on_write = should_error;
    }

    /// Configure whether read operations should fail with an error
    pub fn set_read_error(&mut self, should_error: bool) {
        self.should_error_on_read = should_error;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_io::{Error, Read, Write};

    #[test]
    fn test_error_kinds_and_messages() {
        assert_eq!(
            MockSerialError::Timeout.kind(),
            embedded_io::ErrorKind::TimedOut
        );
        assert_eq!(
            MockSerialError::SimulatedError.to_string(),
            "Simulated serial error"
        );
    }

    #[test]
    fn test_new_mock_serial() {
        let mock = MockSerial::new();
        assert_eq!(mock.written_data().len(), 0);
        assert_eq!(mock.read_position, 0);
        assert!(!mock.should_error_on_write);
        assert!(!mock.should_error_on_read);
    }

    #[test]
    fn test_write_multiple_times() {
        let mut mock = MockSerial::new();
        mock.write(b"INST:NSEL 1\n").unwrap();
        mock.write(b"INST:NSEL?\n").unwrap();
        assert_eq!(mock.written_data(), b"INST:NSEL 1\nINST:NSEL?\n");
        assert_eq!(mock.written_lines(), ["INST:NSEL 1", "INST:NSEL?"]);
    }

    #[test]
    fn test_write_buffer_overflow() {
        let mut mock = MockSerial::new();
        let large_data = vec![0u8; 3000];
        let result = mock.write(&large_data);
        assert!(matches!(result, Err(MockSerialError::BufferOverflow)));
    }

    #[test]
    fn test_read_partial_data() {
        let mut mock = MockSerial::new();
        mock.set_read_data(b"12.00, 0.50").unwrap();

        let mut buffer = [0u8; 5];
        assert_eq!(mock.read(&mut buffer).unwrap(), 5);
        assert_eq!(&buffer, b"12.00");
    }

    #[test]
    fn test_timeout_after_data_exhausted() {
        let mut mock = MockSerial::new();
        mock.set_read_data(b"1\n").unwrap();

        let mut buffer = [0u8; 10];
        assert!(mock.read(&mut buffer).is_ok());

        let result = mock.read(&mut buffer);
        assert!(matches!(result, Err(MockSerialError::Timeout)));
    }

    #[test]
    fn test_queued_replies() {
        let mut mock = MockSerial::with_replies(["1", "0"]);
        assert_eq!(mock.unread_replies(), 2);

        let mut buffer = [0u8; 2];
        mock.read(&mut buffer).unwrap();
        assert_eq!(&buffer, b"1\n");
        assert_eq!(mock.unread_replies(), 1);

        mock.queue_reply("12.00").unwrap();
        assert_eq!(mock.unread_replies(), 2);
    }

    #[test]
    fn test_set_read_data_clears_previous() {
        let mut mock = MockSerial::new();
        mock.set_read_data(b"first").unwrap();
        mock.set_read_data(b"second").unwrap();

        let mut buffer = [0u8; 10];
        assert_eq!(mock.read(&mut buffer).unwrap(), 6);
        assert_eq!(&buffer[..6], b"second");
    }

    #[test]
    fn test_error_flags_toggle() {
        let mut mock = MockSerial::new();

        mock.set_write_error(true);
        assert!(mock.write(b"test").is_err());
        assert!(mock.flush().is_err());
        mock.set_write_error(false);
        assert!(mock.write(b"test").is_ok());

        mock.set_read_data(b"data").unwrap();
        mock.set_read_error(true);
        let mut buffer = [0u8; 10];
        assert!(mock.read(&mut buffer).is_err());
        mock.set_read_error(false);
        assert!(mock.read(&mut buffer).is_ok());
    }

    #[test]
    fn test_clear_written_data() {
        let mut mock = MockSerial::new();
        mock.write(b"test data").unwrap();
        mock.clear_written_data();
        assert!(mock.written_data().is_empty());
    }

    #[test]
    fn test_error_kinds() {
        assert!(matches!(
            MockSerialError::Timeout.kind(),
            embedded_io::ErrorKind::TimedOut
        ));
        assert!(matches!(
            MockSerialError::BufferOverflow.kind(),
            embedded_io::ErrorKind::OutOfMemory
        ));
        assert!(matches!(
            MockSerialError::SimulatedError.kind(),
            embedded_io::ErrorKind::Other
        ));
    }
}
