use std::io::{self, Write};

use crate::volume::NormalizedVolume;

/// Writes `<prefix><volume>\n` lines and flushes each one.
#[derive(Debug)]
pub struct LineEmitter<W> {
    prefix: String,
    out: W,
}

impl<W: Write> LineEmitter<W> {
    pub fn new(prefix: impl Into<String>, out: W) -> Self {
        Self {
            prefix: prefix.into(),
            out,
        }
    }

    pub fn emit(&mut self, volume: NormalizedVolume) -> io::Result<()> {
        writeln!(self.out, "{}{}", self.prefix, volume)?;
        self.out.flush()
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
