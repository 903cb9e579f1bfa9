//! In-app console for diagnostic trace output
//!
//! While the TUI owns the terminal, the fmt layer writes into a
//! [`TraceBuffer`] instead of stdout and the console box shows its tail.

use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub struct TraceBuffer {
    lines: Arc<Mutex<VecDeque<String>>>,
    capacity: usize,
}

impl TraceBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            lines: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    pub fn push(&self, line: impl Into<String>) {
        let mut lines = self.lines.lock().unwrap_or_else(|e| e.into_inner());
        if lines.len() == self.capacity {
            lines.pop_front();
        }
        lines.push_back(line.into());
    }

    /// The most recent `count` lines, oldest first
    pub fn tail(&self, count: usize) -> Vec<String> {
        let lines = self.lines.lock().unwrap_or_else(|e| e.into_inner());
        let skip = lines.len().saturating_sub(count);
        lines.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn clear(&self) {
        self.lines.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }

    /// Writer handed to `tracing_subscriber::fmt::layer().with_writer(..)`
    pub fn writer(&self) -> TraceWriter {
        TraceWriter {
            buffer: self.clone(),
            pending: Vec::new(),
        }
    }
}

/// Collects one formatted event and pushes its lines on drop
pub struct TraceWriter {
    buffer: TraceBuffer,
    pending: Vec<u8>,
}

impl io::Write for TraceWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let text = String::from_utf8_lossy(&self.pending).into_owned();
        for line in text.lines().filter(|l| !l.trim().is_empty()) {
            self.buffer.push(line.trim_end());
        }
        self.pending.clear();
        Ok(())
    }
}

impl Drop for TraceWriter {
    fn drop(&mut self) {
        let _ = io::Write::flush(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_capacity_drops_oldest() {
        let buffer = TraceBuffer::new(3);
        for i in 0..5 {
            buffer.push(format!("line {}", i));
        }
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.tail(10), vec!["line 2", "line 3", "line 4"]);
        assert_eq!(buffer.tail(1), vec!["line 4"]);
    }

    #[test]
    fn test_writer_splits_lines_on_drop() {
        let buffer = TraceBuffer::new(10);
        {
            let mut writer = buffer.writer();
            writeln!(writer, "first event").unwrap();
            write!(writer, "second ").unwrap();
            writeln!(writer, "event\n").unwrap();
        }
        assert_eq!(buffer.tail(10), vec!["first event", "second event"]);

        buffer.clear();
        assert_eq!(buffer.len(), 0);
    }
}
