//! Archive loading and file lookup
//!
//! An [`Archive`] owns the whole archive buffer together with the decoded
//! hash and block tables. Member files are located through the hash table
//! and read with a [`SectorStream`].

use crate::header::MpqHeader;
use crate::stream::SectorStream;
use crate::tables::{BlockEntry, BlockTable, HashEntry, HashTable};
use crate::{Error, Result};
use std::path::Path;

/// Name of the archive's internal file list
pub const LISTFILE: &str = "(listfile)";

/// Options for loading MPQ archives
///
/// # Examples
///
/// ```no_run
/// use mpq_reader::OpenOptions;
///
/// // Load and name every file the listfile mentions
/// let archive = OpenOptions::new().open("map.w3x")?;
///
/// // Skip the listfile
/// let archive = OpenOptions::new()
///     .load_listfile(false)
///     .open("map.w3x")?;
/// # Ok::<(), mpq_reader::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct OpenOptions {
    /// Whether to read `(listfile)` and assign its names after loading
    ///
    /// Defaults to `true`. An archive without a listfile still loads.
    pub load_listfile: bool,
}

impl OpenOptions {
    /// Create new default options
    pub fn new() -> Self {
        Self {
            load_listfile: true,
        }
    }

    /// Set whether to bootstrap names from the listfile
    pub fn load_listfile(mut self, load: bool) -> Self {
        self.load_listfile = load;
        self
    }

    /// Load an archive from an in-memory buffer with these options
    pub fn load(self, data: impl Into<Vec<u8>>) -> Result<Archive> {
        Archive::load_with_options(data.into(), &self)
    }

    /// Read an archive file from disk and load it with these options
    ///
    /// # Errors
    /// - `Error::Io` if the file cannot be read
    /// - any load failure of [`Archive::load`]
    pub fn open<P: AsRef<Path>>(self, path: P) -> Result<Archive> {
        let path = path.as_ref();
        log::debug!("Reading archive {}", path.display());
        self.load(std::fs::read(path)?)
    }
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// A loaded MPQ archive
#[derive(Debug)]
pub struct Archive {
    data: Vec<u8>,
    header: MpqHeader,
    hash_table: HashTable,
    block_table: BlockTable,
}

impl Archive {
    /// Load an archive from an in-memory buffer
    ///
    /// The header may sit anywhere in the buffer. The listfile is not read;
    /// use [`bootstrap_listfile`](Self::bootstrap_listfile) or
    /// [`OpenOptions`] for that.
    pub fn load(data: impl Into<Vec<u8>>) -> Result<Self> {
        let data = data.into();
        let header = MpqHeader::locate(&data)?;
        header.validate()?;

        let hash_table = HashTable::read(&data, header.hash_table_pos, header.hash_table_size)?;
        let block_table = BlockTable::read(
            &data,
            header.block_table_pos,
            header.block_table_size,
            header.header_offset,
        )?;

        log::debug!(
            "Loaded archive: header at 0x{:X}, {} hash entries, {} block entries, sector size {}",
            header.header_offset,
            hash_table.len(),
            block_table.len(),
            header.sector_size()
        );

        Ok(Self {
            data,
            header,
            hash_table,
            block_table,
        })
    }

    /// Load an archive and apply `options`
    pub fn load_with_options(data: Vec<u8>, options: &OpenOptions) -> Result<Self> {
        let archive = Self::load(data)?;

        if options.load_listfile {
            match archive.bootstrap_listfile() {
                Ok(count) => log::debug!("Listfile named {count} entries"),
                Err(Error::FileNotFound(_)) => log::debug!("Archive has no {LISTFILE}"),
                Err(e) => return Err(e),
            }
        }

        Ok(archive)
    }

    /// Find the hash entry for `filename`
    pub fn resolve(&self, filename: &str) -> Result<&HashEntry> {
        self.hash_table
            .find(filename)
            .ok_or_else(|| Error::FileNotFound(filename.to_string()))
    }

    /// Find the hash entry and block entry for `filename`
    fn resolve_entry(&self, filename: &str) -> Result<&BlockEntry> {
        let hash = self.resolve(filename)?;
        self.block_table
            .get(hash.block_index as usize)
            .ok_or_else(|| {
                Error::invalid_format(format!(
                    "Block index {} for {filename} is out of range ({} entries)",
                    hash.block_index,
                    self.block_table.len()
                ))
            })
    }

    /// Assign `filename` to the entry it resolves to
    ///
    /// Returns `Ok(false)` when the entry already had a name.
    pub fn add_filename(&self, filename: &str) -> Result<bool> {
        Ok(self.resolve_entry(filename)?.set_filename(filename))
    }

    /// Assign every name that resolves, returning how many did
    pub fn add_filenames<I, S>(&self, filenames: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        filenames
            .into_iter()
            .filter(|name| match self.add_filename(name.as_ref()) {
                Ok(_) => true,
                Err(e) => {
                    log::trace!("Skipping {}: {e}", name.as_ref());
                    false
                }
            })
            .count()
    }

    /// Open a member file for reading
    ///
    /// The entry takes `filename` as its name if it has none yet, which
    /// makes encrypted data readable.
    pub fn open(&self, filename: &str) -> Result<SectorStream<'_>> {
        let entry = self.resolve_entry(filename)?;
        entry.set_filename(filename);
        SectorStream::new(&self.data, entry, self.header.sector_size())
    }

    /// Read a member file completely
    pub fn read_file(&self, filename: &str) -> Result<Vec<u8>> {
        self.open(filename)?.read_all()
    }

    /// Name entries from the archive's `(listfile)`
    ///
    /// Returns the number of listed names that resolved. Names that do not
    /// resolve are skipped.
    pub fn bootstrap_listfile(&self) -> Result<usize> {
        let contents = self.read_file(LISTFILE)?;
        let text = String::from_utf8_lossy(&contents);

        let count = self.add_filenames(text.lines().filter(|line| !line.is_empty()));
        log::debug!("Resolved {count} names from {LISTFILE}");
        Ok(count)
    }

    /// Names of all existing, named entries in block order
    pub fn list(&self) -> Vec<&str> {
        self.block_table
            .entries()
            .iter()
            .filter(|entry| entry.exists())
            .filter_map(BlockEntry::filename)
            .collect()
    }

    /// Get the archive header
    pub fn header(&self) -> &MpqHeader {
        &self.header
    }

    /// Get the hash table
    pub fn hash_table(&self) -> &HashTable {
        &self.hash_table
    }

    /// Get the block table
    pub fn block_table(&self) -> &BlockTable {
        &self.block_table
    }

    /// Get the raw archive buffer
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}
