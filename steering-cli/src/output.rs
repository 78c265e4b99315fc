use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use steering_shared::FrameSnapshot;

/// Writes every `stride`-th frame as one JSON line
pub struct FrameWriter<W: Write> {
    out: W,
    stride: u64,
    written: usize,
}

impl<W: Write> FrameWriter<W> {
    /// A stride of 0 disables frame output
    pub fn new(out: W, stride: u64) -> Self {
        Self {
            out,
            stride,
            written: 0,
        }
    }

    pub fn wants(&self, tick: u64) -> bool {
        self.stride > 0 && tick % self.stride == 0
    }

    pub fn write(&mut self, frame: &FrameSnapshot) -> Result<()> {
        if !self.wants(frame.tick) {
            return Ok(());
        }
        serde_json::to_writer(&mut self.out, frame).context("Failed to encode frame")?;
        self.out.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn finish(mut self) -> Result<W> {
        self.out.flush().context("Failed to flush frame output")?;
        Ok(self.out)
    }
}

/// Opens `path` for writing, or stdout when no path is given
pub fn open(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(io::stdout().lock()))),
    }
}
