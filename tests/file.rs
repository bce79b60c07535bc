use std::{cell::Cell, fs, io::ErrorKind, rc::Rc};

use smartfile::{
    fs::{FileStream, InputFile, OutputFile},
    CloseHandle, Error, OpenMode, Openable, ReleasePolicy, ScopedFile, Stream,
};

#[test]
fn test_round_trip() {
    _ = pretty_env_logger::try_init();

    let dir = tempfile::tempdir().unwrap();

    let path = dir.path().join("test");

    let mut file: ScopedFile<FileStream> =
        ScopedFile::open_with(&path, OpenMode::writing()).unwrap();

    file.write_line("hello").unwrap();
    file.close();

    let mut file: ScopedFile<InputFile> = ScopedFile::open(&path).unwrap();

    assert_eq!(file.read_line().unwrap(), "hello");
    assert!(file.read_line().unwrap_err().is_eof());
}

#[test]
fn test_open_missing_dir() {
    let dir = tempfile::tempdir().unwrap();

    let path = dir.path().join("no").join("such").join("file");

    let err = ScopedFile::<FileStream>::open_with(&path, OpenMode::writing()).unwrap_err();

    match &err {
        Error::Open { path: failed, source } => {
            assert_eq!(failed, &path);
            assert_eq!(source.kind(), ErrorKind::NotFound);
        }
        other => panic!("unexpected error {:?}", other),
    }

    assert!(err.to_string().starts_with("failed to open file: "));
}

#[test]
fn test_open_invalid_mode() {
    let dir = tempfile::tempdir().unwrap();

    let err = ScopedFile::<FileStream>::open_with(dir.path().join("x"), OpenMode::new())
        .unwrap_err();

    assert_eq!(err.io_error().kind(), ErrorKind::InvalidInput);
}

#[test]
fn test_close_twice() {
    let dir = tempfile::tempdir().unwrap();

    let mut file: ScopedFile<OutputFile> = ScopedFile::open(dir.path().join("twice")).unwrap();

    assert!(file.is_open());

    file.close();
    assert!(!file.is_open());

    file.close();
    assert!(!file.is_open());
}

/// Runs the default policy, then records whether the handle ended up closed.
struct Observed(CloseHandle, Rc<Cell<bool>>);

impl ReleasePolicy<FileStream> for Observed {
    fn release(&mut self, handle: &mut FileStream) {
        self.0.release(handle);
        self.1.set(!handle.is_open());
    }
}

#[test]
fn test_default_release_closes_real_file() {
    let dir = tempfile::tempdir().unwrap();

    let path = dir.path().join("released");

    let closed = Rc::new(Cell::new(false));

    let file = ScopedFile::with_policy(
        FileStream::with_path(&path, OpenMode::writing()).unwrap(),
        Observed(CloseHandle, closed.clone()),
    );

    assert!(file.is_open());

    drop(file);

    assert!(closed.get());
    assert!(path.exists());
}

#[test]
fn test_custom_policy_on_real_file() {
    let dir = tempfile::tempdir().unwrap();

    let closed = Rc::new(Cell::new(false));

    let seen = closed.clone();

    let file = ScopedFile::with_policy(
        FileStream::with_path(dir.path().join("dropped"), OpenMode::writing()).unwrap(),
        move |handle: &mut FileStream| {
            handle.close().unwrap();
            seen.set(!handle.is_open());
        },
    );

    drop(file);

    assert!(closed.get());
}

#[test]
fn test_moved_wrapper_keeps_state() {
    let dir = tempfile::tempdir().unwrap();

    let path = dir.path().join("moved");

    let a: ScopedFile<FileStream> = ScopedFile::open(&path).unwrap();

    let mut b = a;

    assert!(b.is_open());

    b.write_line("after move").unwrap();

    drop(b);

    assert_eq!(fs::read_to_string(&path).unwrap(), "after move\n");
}

#[test]
fn test_append_keeps_content() {
    let dir = tempfile::tempdir().unwrap();

    let path = dir.path().join("append");

    for line in ["one", "two", "three"] {
        let mut file: ScopedFile<OutputFile> = ScopedFile::open(&path).unwrap();

        file.write_line(line).unwrap();
    }

    let mut file: ScopedFile<InputFile> = ScopedFile::open(&path).unwrap();

    let lines = file.lines().collect::<smartfile::Result<Vec<_>>>().unwrap();

    assert_eq!(lines, ["one", "two", "three"]);
}

#[test]
fn test_truncate_on_write() {
    let dir = tempfile::tempdir().unwrap();

    let path = dir.path().join("truncate");

    fs::write(&path, "old content\nmore\n").unwrap();

    {
        let mut file: ScopedFile<OutputFile> =
            ScopedFile::open_with(&path, OpenMode::writing()).unwrap();

        file.write_line("new").unwrap();
    }

    assert_eq!(fs::read_to_string(&path).unwrap(), "new\n");
}

#[test]
fn test_wrap_open_handle() {
    let dir = tempfile::tempdir().unwrap();

    let path = dir.path().join("wrapped");

    fs::write(&path, "first\nsecond").unwrap();

    let handle = InputFile::with_path(&path).unwrap();

    let mut file: ScopedFile<InputFile> = handle.into();

    assert_eq!(file.read_line().unwrap(), "first");
    assert_eq!(file.read_line().unwrap(), "second");
    assert!(file.handle().state().is_eof());

    let err = file.read_line().unwrap_err();
    assert!(err.is_eof());

    // Failed reads leave the handle open.
    assert!(file.is_open());

    file.handle_mut().clear();
    assert!(file.handle().state().is_good());
    assert!(file.read_line().unwrap_err().is_eof());

    let mut handle = file.into_inner();
    assert!(handle.is_open());

    handle.close().unwrap();
}

#[test]
fn test_read_missing_file_is_open_error() {
    let dir = tempfile::tempdir().unwrap();

    let result = ScopedFile::<InputFile>::open(dir.path().join("missing"));

    assert!(matches!(result, Err(Error::Open { .. })));
}
