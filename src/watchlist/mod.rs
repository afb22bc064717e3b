pub(crate) mod store;

use crate::display;
use crate::prelude::*;
use std::fmt;

/// Lifecycle flags tracked per video. `missing` is not one of these: it is
/// derived at load time and never persisted.
#[derive(strum::Display, clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub(crate) enum Flag {
    Ignored,
    Archived,
    Uploaded,
}

/// One video's record on the watchlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TrackedFile {
    path: Utf8PathBuf,
    rel_path: Utf8PathBuf,
    file_name: String,
    ignored: bool,
    archived: bool,
    uploaded: bool,
    missing: bool,
}

impl TrackedFile {
    pub(crate) fn new(path: Utf8PathBuf) -> Self {
        Self::with_flags(path, false, false, false, false)
    }

    pub(crate) fn with_flags(
        path: Utf8PathBuf,
        ignored: bool,
        archived: bool,
        uploaded: bool,
        missing: bool,
    ) -> Self {
        let rel_path = std::env::current_dir()
            .ok()
            .and_then(|cwd| path.strip_prefix(cwd).ok())
            .map(ToOwned::to_owned)
            .unwrap_or_else(|| path.clone());

        let file_name = path.file_name().unwrap_or(path.as_str()).to_owned();

        Self {
            path,
            rel_path,
            file_name,
            ignored,
            archived,
            uploaded,
            missing,
        }
    }

    pub(crate) fn path(&self) -> &Utf8Path {
        &self.path
    }

    pub(crate) fn rel_path(&self) -> &Utf8Path {
        &self.rel_path
    }

    pub(crate) fn file_name(&self) -> &str {
        &self.file_name
    }

    pub(crate) fn ignored(&self) -> bool {
        self.ignored
    }

    pub(crate) fn archived(&self) -> bool {
        self.archived
    }

    pub(crate) fn uploaded(&self) -> bool {
        self.uploaded
    }

    pub(crate) fn missing(&self) -> bool {
        self.missing
    }

    fn flag(&self, flag: Flag) -> bool {
        match flag {
            Flag::Ignored => self.ignored,
            Flag::Archived => self.archived,
            Flag::Uploaded => self.uploaded,
        }
    }

    fn flag_mut(&mut self, flag: Flag) -> &mut bool {
        match flag {
            Flag::Ignored => &mut self.ignored,
            Flag::Archived => &mut self.archived,
            Flag::Uploaded => &mut self.uploaded,
        }
    }
}

impl fmt::Display for TrackedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = [
            ("Filepath", self.path.to_string()),
            ("Relpath", self.rel_path.to_string()),
            ("Filename", self.file_name.clone()),
            ("Ignored?", display::yes_no(self.ignored)),
            ("Archived?", display::yes_no(self.archived)),
            ("Uploaded?", display::yes_no(self.uploaded)),
        ];

        let rows = rows
            .into_iter()
            .map(|(field, value)| vec![field.to_owned(), value])
            .collect_vec();

        f.write_str(&display::table(&["Field", "Value"], &rows))
    }
}

/// The ledger of tracked videos. Owns its entries; the aggregate counters are
/// a derived cache maintained on every add/remove/set_flag, so flags must
/// never be flipped behind this interface's back.
#[derive(Debug, Default)]
pub(crate) struct Watchlist {
    files: Vec<TrackedFile>,
    ignored: usize,
    archived: usize,
    uploaded: usize,
}

impl Watchlist {
    pub(crate) fn new(files: impl IntoIterator<Item = TrackedFile>) -> Self {
        let mut watchlist = Self::default();
        for file in files {
            watchlist.add(file);
        }
        watchlist
    }

    /// Callers are responsible for not adding the same logical file twice.
    pub(crate) fn add(&mut self, file: TrackedFile) {
        self.update_counters(&file, true);
        self.files.push(file);
    }

    pub(crate) fn remove(&mut self, path: &Utf8Path) -> Result<TrackedFile> {
        let index = self
            .files
            .iter()
            .position(|file| file.path == path)
            .with_context(|| format!("`{path}` is not on the watchlist"))?;

        let file = self.files.remove(index);
        self.update_counters(&file, false);

        Ok(file)
    }

    /// Flips one flag; returns whether the stored value actually changed.
    pub(crate) fn set_flag(&mut self, path: &Utf8Path, flag: Flag, value: bool) -> Result<bool> {
        let file = self
            .files
            .iter_mut()
            .find(|file| file.path == path)
            .with_context(|| format!("`{path}` is not on the watchlist"))?;

        if file.flag(flag) == value {
            return Ok(false);
        }

        *file.flag_mut(flag) = value;

        let count = match flag {
            Flag::Ignored => &mut self.ignored,
            Flag::Archived => &mut self.archived,
            Flag::Uploaded => &mut self.uploaded,
        };

        if value {
            *count += 1;
        } else {
            *count -= 1;
        }

        Ok(true)
    }

    /// Entries that were present on disk at load time; drives every
    /// user-facing selection so deleted/moved files can't be picked.
    pub(crate) fn nonmissing(&self) -> impl Iterator<Item = &TrackedFile> {
        self.files.iter().filter(|file| !file.missing)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &TrackedFile> {
        self.files.iter()
    }

    pub(crate) fn get(&self, path: &Utf8Path) -> Option<&TrackedFile> {
        self.files.iter().find(|file| file.path == path)
    }

    pub(crate) fn contains(&self, path: &Utf8Path) -> bool {
        self.get(path).is_some()
    }

    pub(crate) fn len(&self) -> usize {
        self.files.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    fn update_counters(&mut self, file: &TrackedFile, added: bool) {
        let update = |count: &mut usize| {
            if added {
                *count += 1;
            } else {
                *count -= 1;
            }
        };

        if file.ignored {
            update(&mut self.ignored);
        }
        if file.archived {
            update(&mut self.archived);
        }
        if file.uploaded {
            update(&mut self.uploaded);
        }
    }
}

impl fmt::Display for Watchlist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.files.is_empty() {
            return Ok(());
        }

        let rows = self
            .files
            .iter()
            .map(|file| {
                let path = match file.missing {
                    true => format!("{} (missing)", file.path),
                    false => file.path.to_string(),
                };

                vec![
                    path,
                    display::yes_no(file.ignored),
                    display::yes_no(file.archived),
                    display::yes_no(file.uploaded),
                ]
            })
            .collect_vec();

        let table = display::table(&["Filepath", "Ignored", "Archived", "Uploaded"], &rows);

        write!(
            f,
            "{table}\nTotal: {} Ignored: {} Archived: {} Uploaded: {}",
            self.files.len(),
            self.ignored,
            self.archived,
            self.uploaded
        )
    }
}
