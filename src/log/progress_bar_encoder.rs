//! Log records and the step progress bar share the terminal. Each record first erases whatever
//! part of the bar is on the current line.

use log::Record;
use log4rs::encode::{Encode, Write};

const ERASE_LINE: &[u8] = b"\x1B[2K\r";

#[derive(Debug)]
pub struct PBWrapperEncoder {
    inner: Box<dyn Encode>,
}

impl PBWrapperEncoder {
    pub fn new(inner: Box<dyn Encode>) -> Self {
        PBWrapperEncoder { inner }
    }
}

impl Encode for PBWrapperEncoder {
    fn encode(&self, w: &mut dyn Write, record: &Record) -> anyhow::Result<()> {
        w.write_all(ERASE_LINE)?;
        self.inner.encode(w, record)
    }
}
