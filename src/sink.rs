//! Sink multiplexer
//!
//! Wraps an arbitrary count of byte-stream destinations (file, console)
//! into a single logical writer. Every line is fanned out to all
//! destinations; destinations are independent and best-effort, so a failure
//! on one never blocks the others.

use std::fs::File;
use std::io::{self, Write};
use tracing::trace;

/// One write endpoint of the multiplexer
pub struct Destination {
    name: &'static str,
    writer: Box<dyn Write + Send>,
}

impl Destination {
    /// The backing log file
    pub fn file(file: File) -> Self {
        Self {
            name: "file",
            writer: Box::new(file),
        }
    }

    /// Process stdout, used for console mirroring and for the console-only
    /// fallback when the file cannot be opened
    pub fn console() -> Self {
        Self {
            name: "console",
            writer: Box::new(io::stdout()),
        }
    }

    /// An arbitrary writer, mainly for tests
    pub fn custom(name: &'static str, writer: Box<dyn Write + Send>) -> Self {
        Self { name, writer }
    }
}

impl std::fmt::Debug for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Destination")
            .field("name", &self.name)
            .finish()
    }
}

/// Fan-out writer over zero or more destinations
#[derive(Debug, Default)]
pub struct MultiSink {
    destinations: Vec<Destination>,
}

impl MultiSink {
    /// Create a sink over the given destinations
    pub fn new(destinations: Vec<Destination>) -> Self {
        Self { destinations }
    }

    /// A sink writing only to the console
    pub fn console_only() -> Self {
        Self::new(vec![Destination::console()])
    }

    /// Replace the active destinations
    pub fn set_destinations(&mut self, destinations: Vec<Destination>) {
        self.destinations = destinations;
    }

    /// Number of active destinations
    pub fn len(&self) -> usize {
        self.destinations.len()
    }

    /// True when no destination is attached
    pub fn is_empty(&self) -> bool {
        self.destinations.is_empty()
    }

    /// Write one newline-terminated line to every destination.
    ///
    /// A destination that fails is skipped for this line and reported on the
    /// diagnostic channel; the remaining destinations still receive it.
    pub fn write_line(&mut self, line: &str) {
        for dest in &mut self.destinations {
            let result = dest
                .writer
                .write_all(line.as_bytes())
                .and_then(|()| dest.writer.write_all(b"\n"));
            if let Err(e) = result {
                trace!(sink = dest.name, error = %e, "sink write failed");
            }
        }
    }

    /// Flush every destination, best-effort
    pub fn flush(&mut self) {
        for dest in &mut self.destinations {
            if let Err(e) = dest.writer.flush() {
                trace!(sink = dest.name, error = %e, "sink flush failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Writer appending into a shared buffer, for capture
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Writer that always fails
    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "broken"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "broken"))
        }
    }

    fn capture_destination(name: &'static str) -> (Destination, Arc<Mutex<Vec<u8>>>) {
        let buf = Arc::new(Mutex::new(Vec::new()));
        let dest = Destination::custom(name, Box::new(SharedBuf(buf.clone())));
        (dest, buf)
    }

    #[test]
    fn test_write_fans_out_to_all_destinations() {
        let (a, buf_a) = capture_destination("a");
        let (b, buf_b) = capture_destination("b");
        let mut sink = MultiSink::new(vec![a, b]);

        sink.write_line("hello");

        assert_eq!(buf_a.lock().unwrap().as_slice(), b"hello\n");
        assert_eq!(buf_b.lock().unwrap().as_slice(), b"hello\n");
    }

    #[test]
    fn test_failed_destination_does_not_block_others() {
        let (ok, buf) = capture_destination("ok");
        let broken = Destination::custom("broken", Box::new(Broken));
        let mut sink = MultiSink::new(vec![broken, ok]);

        sink.write_line("survives");
        sink.flush();

        assert_eq!(buf.lock().unwrap().as_slice(), b"survives\n");
    }

    #[test]
    fn test_empty_sink_accepts_writes() {
        let mut sink = MultiSink::new(Vec::new());
        assert!(sink.is_empty());
        sink.write_line("dropped");
        sink.flush();
    }

    #[test]
    fn test_set_destinations_replaces() {
        let (first, buf_first) = capture_destination("first");
        let mut sink = MultiSink::new(vec![first]);
        sink.write_line("one");

        let (second, buf_second) = capture_destination("second");
        sink.set_destinations(vec![second]);
        sink.write_line("two");

        assert_eq!(buf_first.lock().unwrap().as_slice(), b"one\n");
        assert_eq!(buf_second.lock().unwrap().as_slice(), b"two\n");
        assert_eq!(sink.len(), 1);
    }
}
