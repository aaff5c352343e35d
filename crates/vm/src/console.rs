//! Input and output channels for a session.

use std::cell::RefCell;
use std::fmt;
use std::io::{self, BufRead, Write};
use std::rc::Rc;

/// The line source REFILL reads from and the sink EMIT/TYPE write to.
pub struct Console {
    pub(crate) input: Box<dyn BufRead>,
    pub(crate) output: Box<dyn Write>,
}

impl Console {
    /// Bind a line source and an output sink.
    pub fn new(input: impl BufRead + 'static, output: impl Write + 'static) -> Self {
        Self {
            input: Box::new(input),
            output: Box::new(output),
        }
    }

    /// Standard input and a buffered standard output.
    pub fn stdio() -> Self {
        Self::new(
            io::BufReader::new(io::stdin()),
            io::BufWriter::new(io::stdout()),
        )
    }

    /// No input, output discarded.
    pub fn null() -> Self {
        Self::new(io::empty(), io::sink())
    }
}

impl fmt::Debug for Console {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Console").finish_non_exhaustive()
    }
}

/// An in-memory output sink whose contents stay readable after it has been
/// handed to a [`Console`].
#[derive(Debug, Clone, Default)]
pub struct SharedOutput(Rc<RefCell<Vec<u8>>>);

impl SharedOutput {
    /// An empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far.
    pub fn contents(&self) -> Vec<u8> {
        self.0.borrow().clone()
    }

    /// Everything written so far, lossily decoded as UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for SharedOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
