use std::{io::Result, path::Path};

use super::stream::LineStream;
use crate::{
    FileLike, LineRead, LineWrite, OpenMode, Openable, ReadOnly, ReadWrite, Stream, StreamState,
    WriteOnly,
};

/// Read/write line stream over a file.
#[derive(Debug, Default)]
pub struct FileStream(LineStream);

/// Read only line stream, every open adds read access to the requested mode.
#[derive(Debug, Default)]
pub struct InputFile(LineStream);

/// Write only line stream, every open adds write access to the requested mode.
#[derive(Debug, Default)]
pub struct OutputFile(LineStream);

impl FileStream {
    /// Create a stream and open `path` with `mode`.
    pub fn with_path<P: AsRef<Path>>(path: P, mode: OpenMode) -> Result<Self> {
        let mut stream = Self::default();

        stream.open(path.as_ref(), mode)?;

        Ok(stream)
    }
}

impl InputFile {
    /// Create a stream and open `path` for reading.
    pub fn with_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut stream = Self::default();

        stream.open(path.as_ref(), Self::DEFAULT_MODE)?;

        Ok(stream)
    }
}

impl OutputFile {
    /// Create a stream and open `path` with `mode`, write access is always added.
    pub fn with_path<P: AsRef<Path>>(path: P, mode: OpenMode) -> Result<Self> {
        let mut stream = Self::default();

        stream.open(path.as_ref(), mode)?;

        Ok(stream)
    }
}

impl Openable for FileStream {
    fn open(&mut self, path: &Path, mode: OpenMode) -> Result<()> {
        self.0.open(path, mode)
    }

    fn close(&mut self) -> Result<()> {
        self.0.close()
    }

    fn is_open(&self) -> bool {
        self.0.is_open()
    }
}

impl Openable for InputFile {
    const DEFAULT_MODE: OpenMode = OpenMode::reading();

    fn open(&mut self, path: &Path, mode: OpenMode) -> Result<()> {
        self.0.open(path, mode.read(true))
    }

    fn close(&mut self) -> Result<()> {
        self.0.close()
    }

    fn is_open(&self) -> bool {
        self.0.is_open()
    }
}

impl Openable for OutputFile {
    const DEFAULT_MODE: OpenMode = OpenMode::appending();

    fn open(&mut self, path: &Path, mode: OpenMode) -> Result<()> {
        self.0.open(path, mode.write(true))
    }

    fn close(&mut self) -> Result<()> {
        self.0.close()
    }

    fn is_open(&self) -> bool {
        self.0.is_open()
    }
}

impl Stream for FileStream {
    fn state(&self) -> StreamState {
        self.0.state()
    }

    fn clear(&mut self) {
        self.0.clear()
    }
}

impl Stream for InputFile {
    fn state(&self) -> StreamState {
        self.0.state()
    }

    fn clear(&mut self) {
        self.0.clear()
    }
}

impl Stream for OutputFile {
    fn state(&self) -> StreamState {
        self.0.state()
    }

    fn clear(&mut self) {
        self.0.clear()
    }
}

impl LineRead for FileStream {
    fn get_line(&mut self, line: &mut String) -> Result<usize> {
        self.0.get_line(line)
    }
}

impl LineWrite for FileStream {
    fn put_line(&mut self, line: &str) -> Result<()> {
        self.0.put_line(line)
    }
}

impl LineRead for InputFile {
    fn get_line(&mut self, line: &mut String) -> Result<usize> {
        self.0.get_line(line)
    }
}

impl LineWrite for OutputFile {
    fn put_line(&mut self, line: &str) -> Result<()> {
        self.0.put_line(line)
    }
}

impl FileLike for FileStream {
    type Access = ReadWrite;
}

impl FileLike for InputFile {
    type Access = ReadOnly;
}

impl FileLike for OutputFile {
    type Access = WriteOnly;
}

#[cfg(test)]
mod tests {
    use std::{fs, io::ErrorKind};

    use super::*;

    #[test]
    fn test_output_then_input() {
        _ = pretty_env_logger::try_init();

        let dir = tempfile::tempdir().unwrap();

        let path = dir.path().join("log");

        let mut output = OutputFile::with_path(&path, OpenMode::writing()).unwrap();

        output.put_line("alpha").unwrap();
        output.put_line("beta").unwrap();
        output.close().unwrap();
        assert!(!output.is_open());

        let mut input = InputFile::with_path(&path).unwrap();

        let mut line = String::new();

        input.get_line(&mut line).unwrap();
        assert_eq!(line, "alpha");

        line.clear();
        input.get_line(&mut line).unwrap();
        assert_eq!(line, "beta");
    }

    #[test]
    fn test_output_forces_write() {
        let dir = tempfile::tempdir().unwrap();

        let path = dir.path().join("forced");

        // Plain append without write still writes.
        let mut output = OutputFile::default();

        output
            .open(&path, OpenMode::new().append(true))
            .unwrap();
        output.put_line("x").unwrap();
        output.close().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "x\n");
    }

    #[test]
    fn test_input_missing_file() {
        let dir = tempfile::tempdir().unwrap();

        let mut input = InputFile::default();

        let err = input
            .open(&dir.path().join("missing"), OpenMode::new())
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(!input.is_open());
        assert!(input.state().is_fail());
    }

    #[test]
    fn test_default_mode_appends() {
        let dir = tempfile::tempdir().unwrap();

        let path = dir.path().join("append");

        fs::write(&path, "kept\n").unwrap();

        let mut stream = FileStream::with_path(&path, FileStream::DEFAULT_MODE).unwrap();

        stream.put_line("added").unwrap();
        stream.close().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "kept\nadded\n");
    }
}
