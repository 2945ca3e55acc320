use alloc::{format, string::{String, ToString}, vec, vec::Vec};
use fatfs::{Dir, DirIter, FileSystem, FsOptions, LossyOemCpConverter, NullTimeProvider, Read, ReadWriteSeek, Seek, SeekFrom, Write};
use log::{debug, info, warn};

use crate::interface::{CardType, StorageInterface};

use super::{IoError, LayoutError, MountError};

type Fs<D> = FileSystem<D, NullTimeProvider, LossyOemCpConverter>;
type FsDir<'a, D> = Dir<'a, D, NullTimeProvider, LossyOemCpConverter>;
type FsDirIter<'a, D> = DirIter<'a, D, NullTimeProvider, LossyOemCpConverter>;

/// Files are read in chunks of this many bytes.
pub const READ_CHUNK_SIZE: usize = 512;

/// Mount and capacity state of the storage medium.
///
/// When `mounted` is false, the capacity fields are always zero. `last_error` survives unmounting,
/// so that the reason for the last failure can still be shown.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct StorageHandle {
    pub mounted: bool,
    pub card_type: CardType,
    pub total_bytes: u64,
    pub used_bytes: u64,
    pub last_error: Option<String>,
}

impl StorageHandle {
    pub fn unmounted() -> Self {
        Self {
            mounted: false,
            card_type: CardType::Unknown,
            total_bytes: 0,
            used_bytes: 0,
            last_error: None,
        }
    }

    pub fn free_bytes(&self) -> u64 {
        self.total_bytes.saturating_sub(self.used_bytes)
    }

    fn reset(&mut self) {
        let last_error = self.last_error.take();
        *self = Self::unmounted();
        self.last_error = last_error;
    }
}

/// One entry produced by `StorageGateway::list_children`.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct DirEntryInfo {
    pub name: String,
    pub path: String,
    pub is_dir: bool,
    pub size: u64,

    /// How many directories below the listed directory this entry is; direct children are 0.
    pub depth: usize,
}

/// Path-keyed access to the FAT volume on the removable medium.
///
/// Every operation reports failure through its return value and also records the error's text
/// as the handle's `last_error`. Nothing here panics on I/O failure.
pub struct StorageGateway<S: StorageInterface> {
    medium: S,
    fs: Option<Fs<S::Device>>,
    handle: StorageHandle,
}

impl<S: StorageInterface> StorageGateway<S> {
    /// Recursive listings do not descend below this many levels.
    pub const MAX_LIST_DEPTH: usize = 5;

    pub fn new(medium: S) -> Self {
        Self {
            medium,
            fs: None,
            handle: StorageHandle::unmounted(),
        }
    }

    pub fn handle(&self) -> &StorageHandle {
        &self.handle
    }

    pub fn is_ready(&self) -> bool {
        self.fs.is_some()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.handle.last_error.as_deref()
    }

    pub fn card_type(&self) -> CardType {
        self.handle.card_type
    }

    pub fn total_bytes(&self) -> u64 {
        self.handle.total_bytes
    }

    pub fn used_bytes(&self) -> u64 {
        self.handle.used_bytes
    }

    pub fn free_bytes(&self) -> u64 {
        self.handle.free_bytes()
    }

    pub fn medium(&self) -> &S {
        &self.medium
    }

    pub fn medium_mut(&mut self) -> &mut S {
        &mut self.medium
    }

    /// Brings up the medium and mounts its filesystem. Does nothing if already mounted.
    pub fn mount(&mut self) -> Result<StorageHandle, MountError> {
        if self.fs.is_some() {
            debug!("SD card already mounted");
            return Ok(self.handle.clone());
        }

        info!("Initializing SD card...");

        let device = match self.medium.connect() {
            Some(device) => device,
            None => return Err(self.mount_failed(MountError::NoMedium)),
        };

        let fs = match FileSystem::new(device, FsOptions::new()) {
            Ok(fs) => fs,
            Err(e) => {
                warn!("Filesystem could not be opened: {:?}", e);
                self.medium.disconnect();
                return Err(self.mount_failed(MountError::MountFailed));
            }
        };

        self.fs = Some(fs);
        self.handle.mounted = true;
        self.handle.card_type = self.medium.card_type();
        self.refresh_capacity();

        info!("SD card type: {}", self.handle.card_type);
        info!(
            "Total space: {} MB, used space: {} MB, free space: {} MB",
            self.handle.total_bytes / MB,
            self.handle.used_bytes / MB,
            self.handle.free_bytes() / MB,
        );
        info!("SD card initialized successfully");

        Ok(self.handle.clone())
    }

    /// Releases the medium. Safe to call when not mounted.
    pub fn unmount(&mut self) {
        if let Some(fs) = self.fs.take() {
            if let Err(e) = fs.unmount() {
                warn!("Filesystem did not unmount cleanly: {:?}", e);
            }
            self.medium.disconnect();
            info!("SD card unmounted");
        }
        self.handle.reset();
    }

    /// Creates or truncates the file at `path` and writes `bytes` to it.
    pub fn write(&mut self, path: &str, bytes: &[u8]) -> Result<(), IoError> {
        debug!("Writing file: {}", path);
        self.with_fs("Write", path, |fs| write_file(fs, path, bytes, false))?;
        self.refresh_capacity();
        debug!("File written: {} ({} bytes)", path, bytes.len());
        Ok(())
    }

    /// Appends `bytes` to the file at `path`, creating it if it is absent.
    pub fn append(&mut self, path: &str, bytes: &[u8]) -> Result<(), IoError> {
        debug!("Appending to file: {}", path);
        self.with_fs("Append", path, |fs| write_file(fs, path, bytes, true))?;
        self.refresh_capacity();
        debug!("Data appended: {} ({} bytes)", path, bytes.len());
        Ok(())
    }

    /// Reads the whole file at `path`.
    pub fn read(&mut self, path: &str) -> Result<Vec<u8>, IoError> {
        debug!("Reading file: {}", path);
        let data = self.with_fs("Read", path, |fs| read_file(fs, path, None))?;
        debug!("File read: {} ({} bytes)", path, data.len());
        Ok(data)
    }

    /// Reads at most the last `max_bytes` of the file at `path`.
    pub fn read_tail(&mut self, path: &str, max_bytes: u64) -> Result<Vec<u8>, IoError> {
        debug!("Reading end of file: {} (up to {} bytes)", path, max_bytes);
        let data = self.with_fs("Read", path, |fs| read_file(fs, path, Some(max_bytes)))?;
        debug!("File read: {} ({} bytes)", path, data.len());
        Ok(data)
    }

    /// Whether a file or directory exists at `path`. Always false when unmounted.
    pub fn exists(&self, path: &str) -> bool {
        debug!("Checking file exists: {}", path);
        let found = self.lookup(path).is_some();
        debug!("File {} {}", path, if found { "exists" } else { "not found" });
        found
    }

    /// Size of the file at `path`, or 0 if it is absent, a directory, or storage is unmounted.
    pub fn size(&self, path: &str) -> u64 {
        debug!("Getting file size: {}", path);
        let size = match self.lookup(path) {
            Some(entry) if !entry.is_dir => entry.size,
            _ => 0,
        };
        debug!("File size: {} ({} bytes)", path, size);
        size
    }

    /// Whether `path` is an existing directory.
    pub fn is_dir(&self, path: &str) -> bool {
        debug!("Checking directory: {}", path);
        let is_dir = matches!(self.lookup(path), Some(DirEntryInfo { is_dir: true, .. }));
        debug!("{} is {}a directory", path, if is_dir { "" } else { "not " });
        is_dir
    }

    /// Deletes the file at `path`. Directories must be removed with `remove_dir`.
    pub fn remove(&mut self, path: &str) -> Result<(), IoError> {
        debug!("Deleting file: {}", path);
        self.with_fs("Delete", path, |fs| {
            match stat(fs, path)? {
                None => Err(IoError::NotFound { path: path.into() }),
                Some(entry) if entry.is_dir => Err(IoError::RemoveFailed { path: path.into() }),
                Some(_) => fs.root_dir()
                    .remove(trim_path(path))
                    .map_err(|_| IoError::RemoveFailed { path: path.into() }),
            }
        })?;
        self.refresh_capacity();
        debug!("File deleted: {}", path);
        Ok(())
    }

    /// Creates the directory at `path`. Succeeds without change if it already exists.
    pub fn mkdir(&mut self, path: &str) -> Result<(), IoError> {
        debug!("Creating directory: {}", path);
        let created = self.with_fs("Create directory", path, |fs| {
            match stat(fs, path)? {
                Some(entry) if entry.is_dir => Ok(false),
                Some(_) => Err(IoError::NotADirectory { path: path.into() }),
                None => fs.root_dir()
                    .create_dir(trim_path(path))
                    .map(|_| true)
                    .map_err(|e| match e {
                        fatfs::Error::NotFound => IoError::NotFound { path: parent_path(path) },
                        _ => IoError::CreateFailed { path: path.into() },
                    }),
            }
        })?;

        if created {
            self.refresh_capacity();
            debug!("Directory created: {}", path);
        } else {
            debug!("Directory already exists: {}", path);
        }
        Ok(())
    }

    /// Removes the empty directory at `path`.
    pub fn remove_dir(&mut self, path: &str) -> Result<(), IoError> {
        debug!("Removing directory: {}", path);
        self.with_fs("Remove directory", path, |fs| {
            if trim_path(path).is_empty() {
                return Err(IoError::RemoveFailed { path: path.into() });
            }
            match stat(fs, path)? {
                None => Err(IoError::NotFound { path: path.into() }),
                Some(entry) if !entry.is_dir => Err(IoError::NotADirectory { path: path.into() }),
                Some(_) => fs.root_dir()
                    .remove(trim_path(path))
                    .map_err(|_| IoError::RemoveFailed { path: path.into() }),
            }
        })?;
        self.refresh_capacity();
        debug!("Directory removed: {}", path);
        Ok(())
    }

    /// Lists the entries of the directory at `path`. A recursive listing walks subdirectories
    /// depth-first down to `MAX_LIST_DEPTH` levels, each directory followed by its own children.
    pub fn list_children(&mut self, path: &str, recursive: bool) -> Result<Vec<DirEntryInfo>, IoError> {
        debug!("Listing directory: {}", path);
        self.with_fs("List", path, |fs| list_dir(fs, path, recursive, Self::MAX_LIST_DEPTH))
    }

    /// Creates each of `paths` which does not already exist, in order. Keeps going after a
    /// failure, and reports every path which could not be created.
    pub fn ensure_directory_layout(&mut self, paths: &[&str]) -> Result<(), LayoutError> {
        info!("Creating default directory structure...");

        let failures = paths.iter()
            .filter_map(|path| self.mkdir(path).err().map(|e| (path.to_string(), e)))
            .collect::<Vec<_>>();

        if failures.is_empty() {
            info!("Default directory structure created successfully");
            Ok(())
        } else {
            warn!("Some directories failed to create");
            let error = LayoutError { failures };
            self.handle.last_error = Some(error.to_string());
            Err(error)
        }
    }

    /// Runs `operation` against the mounted filesystem, or fails with `NotReady`. Any error is
    /// traced and retained as `last_error`.
    fn with_fs<T>(
        &mut self,
        operation: &str,
        path: &str,
        f: impl FnOnce(&Fs<S::Device>) -> Result<T, IoError>,
    ) -> Result<T, IoError> {
        let result = match &self.fs {
            Some(fs) => f(fs),
            None => Err(IoError::NotReady),
        };

        if let Err(e) = &result {
            warn!("{} failed for {}: {}", operation, path, e);
            self.handle.last_error = Some(e.to_string());
        }

        result
    }

    /// Finds the entry at `path` for the read-only queries, which report a failure as "absent".
    fn lookup(&self, path: &str) -> Option<DirEntryInfo> {
        let Some(fs) = &self.fs else {
            warn!("Lookup failed for {}: {}", path, IoError::NotReady);
            return None;
        };

        match stat(fs, path) {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Lookup failed for {}: {}", path, e);
                None
            }
        }
    }

    fn mount_failed(&mut self, error: MountError) -> MountError {
        warn!("{}", error);
        self.handle.reset();
        self.handle.last_error = Some(error.to_string());
        error
    }

    fn refresh_capacity(&mut self) {
        if let Some(fs) = &self.fs {
            match fs.stats() {
                Ok(stats) => {
                    let cluster_size = stats.cluster_size() as u64;
                    let total = stats.total_clusters() as u64 * cluster_size;
                    let free = stats.free_clusters() as u64 * cluster_size;
                    self.handle.total_bytes = total;
                    self.handle.used_bytes = total.saturating_sub(free);
                }
                Err(e) => warn!("Could not read filesystem statistics: {:?}", e),
            }
        }
    }
}

const MB: u64 = 1024 * 1024;

/// Strips leading and trailing separators; the root directory becomes the empty string.
fn trim_path(path: &str) -> &str {
    path.trim_matches('/')
}

/// Splits a trimmed path into its parent directory and final component.
fn split_parent(trimmed: &str) -> (&str, &str) {
    match trimmed.rfind('/') {
        Some(i) => (&trimmed[..i], &trimmed[i + 1..]),
        None => ("", trimmed),
    }
}

fn parent_path(path: &str) -> String {
    format!("/{}", split_parent(trim_path(path)).0)
}

fn join_path(dir: &str, name: &str) -> String {
    if dir == "/" {
        format!("/{}", name)
    } else {
        format!("{}/{}", dir, name)
    }
}

fn open_dir<'a, D: ReadWriteSeek>(fs: &'a Fs<D>, path: &str) -> Result<FsDir<'a, D>, IoError> {
    let trimmed = trim_path(path);
    if trimmed.is_empty() {
        return Ok(fs.root_dir());
    }

    fs.root_dir().open_dir(trimmed).map_err(|e| match e {
        fatfs::Error::NotFound => IoError::NotFound { path: path.into() },
        _ => IoError::OpenFailed { path: path.into() },
    })
}

/// Looks up the entry at `path`. A missing entry, or a missing parent directory, is `Ok(None)`.
fn stat<D: ReadWriteSeek>(fs: &Fs<D>, path: &str) -> Result<Option<DirEntryInfo>, IoError> {
    let trimmed = trim_path(path);
    if trimmed.is_empty() {
        return Ok(Some(DirEntryInfo {
            name: "/".into(),
            path: "/".into(),
            is_dir: true,
            size: 0,
            depth: 0,
        }));
    }

    let (parent, name) = split_parent(trimmed);
    let dir = match open_dir(fs, parent) {
        Ok(dir) => dir,
        Err(IoError::NotFound { .. }) => return Ok(None),
        Err(e) => return Err(e),
    };

    for entry in dir.iter() {
        let entry = entry.map_err(|_| IoError::ReadFailed { path: parent_path(path) })?;
        let entry_name = entry.file_name();

        // FAT names are case-insensitive
        if entry_name.eq_ignore_ascii_case(name) {
            let is_dir = entry.is_dir();
            return Ok(Some(DirEntryInfo {
                name: entry_name,
                path: format!("/{}", trimmed),
                is_dir,
                size: if is_dir { 0 } else { entry.len() },
                depth: 0,
            }));
        }
    }

    Ok(None)
}

fn write_file<D: ReadWriteSeek>(fs: &Fs<D>, path: &str, bytes: &[u8], append: bool) -> Result<(), IoError> {
    let trimmed = trim_path(path);
    if trimmed.is_empty() {
        return Err(IoError::OpenFailed { path: path.into() });
    }

    let mut file = fs.root_dir()
        .create_file(trimmed)
        .map_err(|_| IoError::OpenFailed { path: path.into() })?;

    let positioned = if append {
        file.seek(SeekFrom::End(0)).map(|_| ())
    } else {
        file.truncate()
    };
    positioned.map_err(|_| IoError::OpenFailed { path: path.into() })?;

    let mut written = 0;
    while written < bytes.len() {
        match file.write(&bytes[written..]) {
            Ok(0) => break,
            Ok(n) => written += n,
            Err(e) => {
                warn!("Write to {} stopped after {} bytes: {:?}", path, written, e);
                break;
            }
        }
    }

    let flushed = file.flush();
    if written < bytes.len() || flushed.is_err() {
        return Err(IoError::ShortWrite { path: path.into(), written, expected: bytes.len() });
    }

    Ok(())
}

/// Reads the file at `path`, or only its last `tail` bytes if given.
fn read_file<D: ReadWriteSeek>(fs: &Fs<D>, path: &str, tail: Option<u64>) -> Result<Vec<u8>, IoError> {
    let trimmed = trim_path(path);
    if trimmed.is_empty() {
        return Err(IoError::OpenFailed { path: path.into() });
    }

    let mut file = fs.root_dir().open_file(trimmed).map_err(|e| match e {
        fatfs::Error::NotFound => IoError::NotFound { path: path.into() },
        _ => IoError::OpenFailed { path: path.into() },
    })?;

    // Reserve up front, so the chunks below don't keep reallocating
    let length = file.seek(SeekFrom::End(0))
        .map_err(|_| IoError::ReadFailed { path: path.into() })?;
    let start = tail.map_or(0, |tail| length.saturating_sub(tail));
    file.seek(SeekFrom::Start(start))
        .map_err(|_| IoError::ReadFailed { path: path.into() })?;

    let mut data = Vec::with_capacity((length - start) as usize);
    let mut buffer = [0; READ_CHUNK_SIZE];
    loop {
        match file.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => data.extend_from_slice(&buffer[..n]),
            Err(_) => return Err(IoError::ReadFailed { path: path.into() }),
        }
    }

    Ok(data)
}

fn list_dir<D: ReadWriteSeek>(
    fs: &Fs<D>,
    path: &str,
    recursive: bool,
    max_depth: usize,
) -> Result<Vec<DirEntryInfo>, IoError> {
    match stat(fs, path)? {
        None => return Err(IoError::NotFound { path: path.into() }),
        Some(entry) if !entry.is_dir => return Err(IoError::NotADirectory { path: path.into() }),
        Some(_) => (),
    }

    let base = format!("/{}", trim_path(path));
    let mut entries = vec![];

    // One iterator per directory being walked; the innermost is on top
    let mut worklist: Vec<(FsDirIter<'_, D>, String, usize)> = vec![(open_dir(fs, path)?.iter(), base, 0)];

    while let Some((iter, dir_path, depth)) = worklist.last_mut() {
        let entry = match iter.next() {
            Some(entry) => entry.map_err(|_| IoError::ReadFailed { path: dir_path.clone() })?,
            None => {
                worklist.pop();
                continue;
            }
        };

        let name = entry.file_name();
        if name == "." || name == ".." {
            continue;
        }

        let depth = *depth;
        let is_dir = entry.is_dir();
        let entry_path = join_path(dir_path, &name);

        entries.push(DirEntryInfo {
            name,
            path: entry_path.clone(),
            is_dir,
            size: if is_dir { 0 } else { entry.len() },
            depth,
        });

        if is_dir && recursive {
            if depth + 1 < max_depth {
                worklist.push((entry.to_dir().iter(), entry_path, depth + 1));
            } else {
                debug!("[Max depth reached] {}", entry_path);
            }
        }
    }

    Ok(entries)
}

#[cfg(test)]
mod test {
    use alloc::{vec, vec::Vec};

    use crate::{filesystem::{IoError, MountError, BOOTSTRAP_DIRECTORIES}, test_support::{init_logging, TestMedium}};

    use super::StorageGateway;

    fn mounted() -> StorageGateway<TestMedium> {
        init_logging();
        let mut gateway = StorageGateway::new(TestMedium::formatted());
        gateway.mount().unwrap();
        gateway
    }

    #[test]
    fn test_mount() {
        let mut gateway = mounted();
        let handle = gateway.handle().clone();
        assert!(handle.mounted);
        assert!(handle.total_bytes > 0);
        assert!(handle.used_bytes <= handle.total_bytes);

        // Mounting again is a no-op
        assert_eq!(gateway.mount().unwrap(), handle);
    }

    #[test]
    fn test_mount_failures() {
        init_logging();

        let mut gateway = StorageGateway::new(TestMedium::absent());
        assert_eq!(gateway.mount(), Err(MountError::NoMedium));
        assert!(!gateway.is_ready());
        assert_eq!(gateway.last_error(), Some("No SD card attached"));
        assert_eq!(gateway.total_bytes(), 0);

        let mut gateway = StorageGateway::new(TestMedium::unformatted());
        assert_eq!(gateway.mount(), Err(MountError::MountFailed));
        assert!(!gateway.is_ready());
        assert_eq!(gateway.last_error(), Some("SD card mount failed"));
    }

    #[test]
    fn test_write_read() {
        let mut gateway = mounted();

        let contents: Vec<(&str, &[u8])> = vec![
            ("/empty.txt", b""),
            ("/lines.log", b"[00:00:01.000] INFO: one\n[00:00:02.000] WARN: two\n"),
            ("/binary.bin", &[0, 255, 10, 13, 0, 1]),
        ];
        for (path, bytes) in contents {
            gateway.write(path, bytes).unwrap();
            assert_eq!(gateway.read(path).unwrap(), bytes);
            assert_eq!(gateway.size(path), bytes.len() as u64);
        }

        // Writing again truncates
        gateway.write("/lines.log", b"short").unwrap();
        assert_eq!(gateway.read("/lines.log").unwrap(), b"short");

        // Larger than one read chunk
        let large = (0..3000u32).map(|i| (i % 251) as u8).collect::<Vec<_>>();
        gateway.write("/large.bin", &large).unwrap();
        assert_eq!(gateway.read("/large.bin").unwrap(), large);
    }

    #[test]
    fn test_append() {
        let mut gateway = mounted();
        gateway.mkdir("/logs").unwrap();

        gateway.append("/logs/system.log", b"a").unwrap();
        gateway.append("/logs/system.log", b"b").unwrap();
        assert_eq!(gateway.read("/logs/system.log").unwrap(), b"ab");
    }

    #[test]
    fn test_missing_paths() {
        let mut gateway = mounted();

        assert!(!gateway.exists("/nope.txt"));
        assert_eq!(gateway.size("/nope.txt"), 0);
        assert!(matches!(gateway.read("/nope.txt"), Err(IoError::NotFound { .. })));
        assert!(matches!(gateway.remove("/nope.txt"), Err(IoError::NotFound { .. })));
        assert!(gateway.last_error().is_some());

        // Writing into a directory which doesn't exist can't open the file
        assert!(matches!(gateway.write("/nodir/file.txt", b"x"), Err(IoError::OpenFailed { .. })));
    }

    #[test]
    fn test_remove() {
        let mut gateway = mounted();
        gateway.write("/gone.txt", b"bye").unwrap();
        assert!(gateway.exists("/gone.txt"));

        gateway.remove("/gone.txt").unwrap();
        assert!(!gateway.exists("/gone.txt"));
    }

    #[test]
    fn test_mkdir_idempotent() {
        let mut gateway = mounted();

        gateway.mkdir("/data").unwrap();
        gateway.mkdir("/data").unwrap();
        assert!(gateway.is_dir("/data"));

        let entries = gateway.list_children("/", false).unwrap();
        assert_eq!(entries.iter().filter(|e| e.name.eq_ignore_ascii_case("data")).count(), 1);

        gateway.write("/file.txt", b"x").unwrap();
        assert!(matches!(gateway.mkdir("/file.txt"), Err(IoError::NotADirectory { .. })));
    }

    #[test]
    fn test_remove_dir() {
        let mut gateway = mounted();
        gateway.mkdir("/captures").unwrap();
        gateway.write("/note.txt", b"x").unwrap();

        assert!(matches!(gateway.remove_dir("/note.txt"), Err(IoError::NotADirectory { .. })));
        assert!(matches!(gateway.remove("/captures"), Err(IoError::RemoveFailed { .. })));

        gateway.remove_dir("/captures").unwrap();
        assert!(!gateway.exists("/captures"));
    }

    #[test]
    fn test_list_children() {
        let mut gateway = mounted();
        gateway.mkdir("/data").unwrap();
        gateway.mkdir("/data/captures").unwrap();
        gateway.write("/data/captures/one.pcap", b"12345").unwrap();
        gateway.write("/readme.txt", b"hi").unwrap();

        let flat = gateway.list_children("/", false).unwrap();
        assert_eq!(flat.len(), 2);
        assert!(flat.iter().all(|e| e.depth == 0));

        let tree = gateway.list_children("/", true).unwrap();
        let capture = tree.iter().find(|e| e.name == "one.pcap").unwrap();
        assert_eq!(capture.path, "/data/captures/one.pcap");
        assert_eq!(capture.size, 5);
        assert_eq!(capture.depth, 2);
        assert!(!capture.is_dir);

        // Children come straight after their directory
        let names = tree.iter().map(|e| e.name.as_str()).collect::<Vec<_>>();
        let data_index = names.iter().position(|n| *n == "data").unwrap();
        assert_eq!(names[data_index + 1], "captures");
        assert_eq!(names[data_index + 2], "one.pcap");

        assert!(matches!(gateway.list_children("/readme.txt", false), Err(IoError::NotADirectory { .. })));
        assert!(matches!(gateway.list_children("/missing", false), Err(IoError::NotFound { .. })));
    }

    #[test]
    fn test_list_depth_limit() {
        let mut gateway = mounted();
        let mut path = alloc::string::String::new();
        for level in 0..8 {
            path.push_str(&alloc::format!("/d{}", level));
            gateway.mkdir(&path).unwrap();
        }

        let tree = gateway.list_children("/", true).unwrap();
        let deepest = tree.iter().map(|e| e.depth).max().unwrap();
        assert_eq!(deepest, StorageGateway::<TestMedium>::MAX_LIST_DEPTH - 1);
    }

    #[test]
    fn test_directory_layout() {
        let mut gateway = mounted();
        gateway.ensure_directory_layout(BOOTSTRAP_DIRECTORIES).unwrap();
        gateway.ensure_directory_layout(BOOTSTRAP_DIRECTORIES).unwrap();
        for path in BOOTSTRAP_DIRECTORIES {
            assert!(gateway.is_dir(path));
        }

        // One bad path doesn't stop the rest
        gateway.write("/blocker", b"x").unwrap();
        let error = gateway.ensure_directory_layout(&["/blocker", "/extra", "/missing/child"]).unwrap_err();
        assert_eq!(error.failed_paths().collect::<Vec<_>>(), vec!["/blocker", "/missing/child"]);
        assert!(gateway.is_dir("/extra"));
    }

    #[test]
    fn test_queries_through_a_file() {
        let mut gateway = mounted();
        gateway.write("/blocker", b"x").unwrap();

        // The parent can't be opened as a directory, which the queries report as absent
        assert!(!gateway.exists("/blocker/inner.txt"));
        assert_eq!(gateway.size("/blocker/inner.txt"), 0);
        assert!(!gateway.is_dir("/blocker/inner"));
        assert!(gateway.exists("/blocker"));
        assert_eq!(gateway.size("/blocker"), 1);
    }

    #[test]
    fn test_unmounted() {
        init_logging();
        let mut gateway = StorageGateway::new(TestMedium::formatted());

        assert_eq!(gateway.write("/a.txt", b"a"), Err(IoError::NotReady));
        assert_eq!(gateway.append("/a.txt", b"a"), Err(IoError::NotReady));
        assert_eq!(gateway.read("/a.txt"), Err(IoError::NotReady));
        assert_eq!(gateway.remove("/a.txt"), Err(IoError::NotReady));
        assert_eq!(gateway.mkdir("/a"), Err(IoError::NotReady));
        assert_eq!(gateway.last_error(), Some("SD card not ready"));

        assert!(!gateway.exists("/a.txt"));
        assert_eq!(gateway.size("/a.txt"), 0);
        assert_eq!(gateway.handle().total_bytes, 0);
    }

    #[test]
    fn test_unmount_and_remount() {
        let mut gateway = mounted();
        gateway.write("/keep.txt", b"persisted").unwrap();

        gateway.unmount();
        assert!(!gateway.is_ready());
        assert_eq!(gateway.handle().total_bytes, 0);
        assert_eq!(gateway.read("/keep.txt"), Err(IoError::NotReady));

        // Safe to call twice
        gateway.unmount();

        gateway.mount().unwrap();
        assert_eq!(gateway.read("/keep.txt").unwrap(), b"persisted");
    }

    #[test]
    fn test_open_fails_when_card_rejects_writes() {
        let medium = TestMedium::formatted();
        let fail_writes = medium.fail_writes.clone();
        let mut gateway = StorageGateway::new(medium);
        gateway.mount().unwrap();

        // Creating the directory entry is the first write to hit the card
        fail_writes.set(true);
        assert!(matches!(gateway.write("/fail.txt", b"data"), Err(IoError::OpenFailed { .. })));
        assert!(gateway.last_error().is_some());
    }

    #[test]
    fn test_short_write_when_card_full() {
        let mut gateway = mounted();
        let free = gateway.free_bytes() as usize;
        assert!(free > 0);

        let too_big = vec![0xAB; free + 64 * 1024];
        match gateway.write("/big.bin", &too_big) {
            Err(IoError::ShortWrite { path, written, expected }) => {
                assert_eq!(path, "/big.bin");
                assert_eq!(expected, too_big.len());
                assert!(written > 0);
                assert!(written < expected);
            }
            other => panic!("expected a short write, got {:?}", other),
        }
        assert!(gateway.last_error().unwrap().contains("/big.bin"));
    }

    #[test]
    fn test_read_tail() {
        let mut gateway = mounted();
        let content = (0..2000).map(|i| (i % 251) as u8).collect::<Vec<_>>();
        gateway.write("/tail.bin", &content).unwrap();

        assert_eq!(gateway.read_tail("/tail.bin", 700).unwrap(), &content[1300..]);
        assert_eq!(gateway.read_tail("/tail.bin", 5000).unwrap(), content);
        assert!(matches!(gateway.read_tail("/missing.bin", 10), Err(IoError::NotFound { .. })));
    }
}
