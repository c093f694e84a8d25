//! Execution engine for shell commands
//!
//! Executes parsed commands against the filesystem and the handle registry,
//! collecting user-facing output into a [`CommandReport`].

use crate::config::ShellConfig;
use crate::error::{Result, ShellError};
use crate::parser::{parse_command, Command};
use crate::registry::{HandleId, HandleRegistry};
use crate::tokenizer::tokenize;
use log::{debug, info, warn};
use std::fs::{self, DirBuilder, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;

const HELP_TEXT: &[&str] = &[
    "Available commands:",
    "create <count> <file1> <file2> ...  - Create files",
    "copy <source> <destination>         - Copy a file",
    "move <source> <destination>         - Move a file",
    "cd <directory>                      - Create a directory",
    "ls <directory>                      - List a directory",
    "rm <file or directory>              - Remove a file or empty directory",
    "write <handle> <text> [offset]      - Write text to an open file",
    "read <handle> <count> [offset]      - Read from an open file",
    "open <count> <file1> <file2> ...    - Open files",
    "close <handle>                      - Close an open file",
    "list                                - List open files",
    "exit                                - Close everything and quit",
];

/// Output of one command: stdout lines, per-item failures, and the exit flag
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandReport {
    pub messages: Vec<String>,
    /// Failures of individual items in a batch; the rest of the batch ran
    pub failures: Vec<ShellError>,
    pub exit: bool,
}

impl CommandReport {
    fn message(&mut self, text: impl Into<String>) {
        self.messages.push(text.into());
    }
}

/// One `ls` entry
#[derive(Debug, Clone, PartialEq)]
pub struct DirEntryInfo {
    pub name: String,
    pub is_dir: bool,
    /// Size in bytes (meaningful for non-directories)
    pub size: u64,
}

/// Result of listing a directory; entries that could not be stat'ed are
/// reported in `failures` and left out of `entries`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirListing {
    pub entries: Vec<DirEntryInfo>,
    pub failures: Vec<ShellError>,
}

/// Shell command executor; owns the open handle registry
#[derive(Debug)]
pub struct CommandEngine {
    registry: HandleRegistry<File>,
    config: ShellConfig,
}

impl CommandEngine {
    /// Create a new engine with an empty registry sized from `config`
    pub fn new(config: ShellConfig) -> Self {
        Self {
            registry: HandleRegistry::new(config.capacity),
            config,
        }
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    /// Open handle registry (read-only)
    pub fn registry(&self) -> &HandleRegistry<File> {
        &self.registry
    }

    /// Tokenize, parse and execute one input line. Blank lines do nothing.
    pub fn run_line(&mut self, line: &str) -> Result<CommandReport> {
        let tokens = tokenize(line, self.config.max_tokens);
        if tokens.is_empty() {
            return Ok(CommandReport::default());
        }
        let command = parse_command(&tokens)?;
        self.execute(&command)
    }

    /// Execute a command
    pub fn execute(&mut self, command: &Command) -> Result<CommandReport> {
        debug!("execute {}", command.name());
        let mut report = CommandReport::default();

        match command {
            Command::Create { paths } => {
                for (index, path) in paths.iter().enumerate() {
                    match self.create_file(path, index + 1) {
                        Ok(()) => report.message(format!("File {} created.", path)),
                        Err(e) => report.failures.push(e),
                    }
                }
            }
            Command::Open { paths } => {
                for (index, path) in paths.iter().enumerate() {
                    match self.open_file(path, index + 1) {
                        Ok(id) => report.message(format!("File {} opened with handle {}.", path, id)),
                        Err(e @ ShellError::CapacityExceeded { .. }) => {
                            report.failures.push(e);
                            break;
                        }
                        Err(e) => report.failures.push(e),
                    }
                }
            }
            Command::Close { id } => {
                let name = self.close_handle(*id)?;
                report.message(format!("File {} (handle {}) closed.", name, id));
            }
            Command::Write { id, data, offset } => {
                let written = self.write_handle(*id, data.as_bytes(), *offset)?;
                report.message(format!("{} bytes written to handle {}.", written, id));
            }
            Command::Read { id, count, offset } => {
                let data = self.read_handle(*id, *count, *offset)?;
                report.message(format!(
                    "Read {} bytes: {}",
                    data.len(),
                    String::from_utf8_lossy(&data)
                ));
            }
            Command::Copy {
                source,
                destination,
            } => {
                self.copy_file(source, destination)?;
                report.message(format!("File {} copied to {}.", source, destination));
            }
            Command::Move {
                source,
                destination,
            } => {
                self.move_file(source, destination)?;
                report.message(format!("File {} moved to {}.", source, destination));
            }
            Command::MakeDir { path } => {
                self.make_dir(path)?;
                report.message(format!("Directory {} created.", path));
            }
            Command::ListDir { path } => {
                let listing = self.list_dir(path)?;
                report.message(format!("Contents of directory {}:", path));
                for entry in &listing.entries {
                    if entry.is_dir {
                        report.message(format!("{} (dir)", entry.name));
                    } else {
                        report.message(format!("{} ({} bytes)", entry.name, entry.size));
                    }
                }
                report.failures.extend(listing.failures);
            }
            Command::Remove { path } => {
                self.remove_path(path)?;
                report.message(format!("File or directory {} removed.", path));
            }
            Command::List => {
                if self.registry.is_empty() {
                    report.message("No open files.");
                } else {
                    report.message("Open files:");
                    for record in self.registry.enumerate() {
                        report.message(format!(
                            "handle: {}, name: {}",
                            record.id(),
                            record.display_name()
                        ));
                    }
                }
            }
            Command::Help => {
                for line in HELP_TEXT {
                    report.message(*line);
                }
            }
            Command::Exit => {
                self.shutdown();
                report.message("Exiting...");
                report.exit = true;
            }
        }

        Ok(report)
    }

    /// Open `path` read/write, creating it when absent, then close it again.
    /// An existing file counts as created.
    pub fn create_file(&self, path: &str, position: usize) -> Result<()> {
        let mut options = OpenOptions::new();
        options.read(true).write(true).create(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o666);
        }
        options
            .open(path)
            .map(drop)
            .map_err(|e| ShellError::os(position, e))
    }

    /// Open `path` read/write and register it.
    ///
    /// Fails with `CapacityExceeded` before touching the filesystem when the
    /// registry is full.
    pub fn open_file(&mut self, path: &str, position: usize) -> Result<HandleId> {
        if self.registry.is_full() {
            warn!("registry full, refusing to open {}", path);
            return Err(ShellError::CapacityExceeded {
                capacity: self.registry.capacity(),
            });
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| ShellError::os(position, e))?;
        let id = os_handle_id(&file);
        self.registry.register(id, file, path)
    }

    /// Close an open handle, returning the name it was opened under
    pub fn close_handle(&mut self, id: HandleId) -> Result<String> {
        let record = self.registry.revoke(id)?;
        let name = record.display_name().to_string();
        drop(record.into_resource());
        Ok(name)
    }

    /// Write all of `data` to an open handle, optionally at an absolute offset
    pub fn write_handle(&self, id: HandleId, data: &[u8], offset: Option<u64>) -> Result<usize> {
        let record = self
            .registry
            .find(id)
            .ok_or(ShellError::HandleNotFound(id))?;
        let mut file = record.resource();

        if let Some(offset) = offset {
            file.seek(SeekFrom::Start(offset))
                .map_err(|e| ShellError::os(1, e))?;
        }
        file.write_all(data).map_err(|e| ShellError::os(1, e))?;
        Ok(data.len())
    }

    /// Read up to `count` bytes from an open handle, optionally from an
    /// absolute offset. A short read is not an error.
    pub fn read_handle(&self, id: HandleId, count: usize, offset: Option<u64>) -> Result<Vec<u8>> {
        let record = self
            .registry
            .find(id)
            .ok_or(ShellError::HandleNotFound(id))?;
        let mut file = record.resource();

        if let Some(offset) = offset {
            file.seek(SeekFrom::Start(offset))
                .map_err(|e| ShellError::os(1, e))?;
        }

        // Reserve without zero-filling; pages are only touched as bytes arrive
        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(count)
            .map_err(|_| ShellError::AllocationFailure { requested: count })?;

        file.take(count as u64)
            .read_to_end(&mut buffer)
            .map_err(|e| ShellError::os(1, e))?;
        buffer.shrink_to_fit();
        Ok(buffer)
    }

    /// Stream `source` into `destination` in fixed-size chunks.
    /// Returns the number of bytes copied.
    pub fn copy_file(&self, source: &str, destination: &str) -> Result<u64> {
        let mut src = File::open(source).map_err(|e| ShellError::os(1, e))?;
        let mut dst = File::create(destination).map_err(|e| ShellError::os(2, e))?;

        let mut buffer = vec![0u8; self.config.copy_chunk_size.max(1)];
        let mut total = 0u64;
        loop {
            let n = match src.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(ShellError::os(1, e)),
            };
            dst.write_all(&buffer[..n])
                .map_err(|e| ShellError::os(2, e))?;
            total += n as u64;
        }
        Ok(total)
    }

    /// Rename `source` to `destination`
    pub fn move_file(&self, source: &str, destination: &str) -> Result<()> {
        fs::rename(source, destination).map_err(|e| ShellError::os(1, e))
    }

    /// Create a directory (the `cd` command)
    pub fn make_dir(&self, path: &str) -> Result<()> {
        let mut builder = DirBuilder::new();
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(0o755);
        }
        builder.create(path).map_err(|e| ShellError::os(1, e))
    }

    /// List a directory's entries, `.` and `..` included, sorted by name
    pub fn list_dir(&self, path: &str) -> Result<DirListing> {
        let mut listing = DirListing::default();
        let entries = fs::read_dir(path).map_err(|e| ShellError::os(1, e))?;

        for name in [".", ".."] {
            match fs::metadata(Path::new(path).join(name)) {
                Ok(metadata) => listing.entries.push(DirEntryInfo {
                    name: name.to_string(),
                    is_dir: metadata.is_dir(),
                    size: metadata.len(),
                }),
                Err(e) => listing.failures.push(ShellError::os(1, e)),
            }
        }

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    listing.failures.push(ShellError::os(1, e));
                    continue;
                }
            };
            match fs::metadata(entry.path()) {
                Ok(metadata) => listing.entries.push(DirEntryInfo {
                    name: entry.file_name().to_string_lossy().into_owned(),
                    is_dir: metadata.is_dir(),
                    size: metadata.len(),
                }),
                Err(e) => listing.failures.push(ShellError::os(1, e)),
            }
        }

        listing.entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(listing)
    }

    /// Remove a file, or a directory if it is empty
    pub fn remove_path(&self, path: &str) -> Result<()> {
        let metadata = fs::symlink_metadata(path).map_err(|e| ShellError::os(1, e))?;
        let removed = if metadata.is_dir() {
            fs::remove_dir(path)
        } else {
            fs::remove_file(path)
        };
        removed.map_err(|e| ShellError::os(1, e))
    }

    /// Close every open handle. Returns how many were closed.
    pub fn shutdown(&mut self) -> usize {
        let mut closed = 0;
        for record in self.registry.drain() {
            debug!("closing handle {} ({})", record.id(), record.display_name());
            drop(record.into_resource());
            closed += 1;
        }
        if closed > 0 {
            info!("closed {} open handles", closed);
        }
        closed
    }
}

impl Default for CommandEngine {
    fn default() -> Self {
        Self::new(ShellConfig::default())
    }
}

/// The OS descriptor number backing `file`
#[cfg(unix)]
fn os_handle_id(file: &File) -> HandleId {
    use std::os::unix::io::AsRawFd;
    file.as_raw_fd()
}

#[cfg(windows)]
fn os_handle_id(file: &File) -> HandleId {
    use std::os::windows::io::AsRawHandle;
    file.as_raw_handle() as usize as HandleId
}
