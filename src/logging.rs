//! `tracing` output for the browser: every formatted event goes to the
//! devtools console at the matching console level.

use std::io::{self, Write};

use tracing::{Level, Metadata};
use tracing_subscriber::fmt::MakeWriter;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ConsoleMethod {
    Error,
    Warn,
    Log,
    Debug,
}

fn console_method(level: Level) -> ConsoleMethod {
    match level {
        Level::ERROR => ConsoleMethod::Error,
        Level::WARN => ConsoleMethod::Warn,
        Level::INFO => ConsoleMethod::Log,
        _ => ConsoleMethod::Debug,
    }
}

/// Buffers one formatted event and hands it to the console when dropped.
pub struct ConsoleWriter {
    method: ConsoleMethod,
    buf: Vec<u8>,
}

impl Write for ConsoleWriter {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        if self.buf.is_empty() {
            return;
        }
        let text = String::from_utf8_lossy(&self.buf);
        let msg = text.trim_end().into();
        match self.method {
            ConsoleMethod::Error => web_sys::console::error_1(&msg),
            ConsoleMethod::Warn => web_sys::console::warn_1(&msg),
            ConsoleMethod::Log => web_sys::console::log_1(&msg),
            ConsoleMethod::Debug => web_sys::console::debug_1(&msg),
        }
    }
}

pub struct ConsoleMakeWriter;

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter {
            method: ConsoleMethod::Log,
            buf: Vec::new(),
        }
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter {
            method: console_method(*meta.level()),
            buf: Vec::new(),
        }
    }
}

/// Install the global subscriber. Timestamps are left out: the console adds
/// its own, and `SystemTime` is unavailable on wasm32.
pub fn init() {
    tracing_subscriber::fmt()
        .with_writer(ConsoleMakeWriter)
        .with_max_level(Level::DEBUG)
        .without_time()
        .with_ansi(false)
        .with_target(false)
        .init();
}
