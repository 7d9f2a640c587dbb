//! Flat-file persistence for the inventory. One record per line, fields
//! joined by a comma in the fixed order `id,title,artist`, lines terminated by
//! a newline, no header row. The format has no quoting or escaping, so a title
//! or artist containing the delimiter cannot be represented; that is a known
//! limitation of the format, not something this module tries to repair.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use crate::models::Cd;

/// File name used by the reference data set. Kept verbatim so existing
/// `CDInventory.txt` files keep working.
pub const INVENTORY_FILE_NAME: &str = "CDInventory.txt";
/// Environment variable that overrides where the inventory file lives.
pub const INVENTORY_FILE_ENV: &str = "CD_INVENTORY_FILE";
/// Field separator of the persisted format.
const FIELD_DELIMITER: char = ',';
/// Fields per record line: id, title, artist.
const FIELD_COUNT: usize = 3;

/// Everything that can go wrong while reading the persisted file. The parse
/// variants carry the 1-based line number so the footer can point the user at
/// the offending line.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not read inventory file: {0}")]
    Io(#[from] io::Error),
    #[error("line {line}: expected {expected} comma-separated fields, found {found}")]
    FieldCount {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("line {line}: id '{value}' is not a number")]
    InvalidId { line: usize, value: String },
}

/// Resolve where the inventory file lives: the `CD_INVENTORY_FILE` override
/// when set, otherwise `CDInventory.txt` in the current working directory.
pub fn inventory_file_path() -> Result<PathBuf> {
    if let Some(path) = env::var_os(INVENTORY_FILE_ENV) {
        return Ok(PathBuf::from(path));
    }
    let cwd = env::current_dir().context("failed to resolve working directory")?;
    Ok(cwd.join(INVENTORY_FILE_NAME))
}

/// Read the persisted inventory. `Ok(None)` means the file does not exist,
/// which callers treat as "no prior data" and leave their store untouched. A
/// malformed line fails the whole load so the caller keeps its prior state
/// instead of ending up with half a file.
pub fn load_records(path: &Path) -> Result<Option<Vec<Cd>>, LoadError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(LoadError::Io(err)),
    };

    let mut records = Vec::new();
    for (index, line) in contents.lines().enumerate() {
        // Trailing newlines and stray blank lines are not records.
        if line.trim().is_empty() {
            continue;
        }
        records.push(parse_line(index + 1, line)?);
    }

    Ok(Some(records))
}

/// Parse one `id,title,artist` line. `line_number` is 1-based and only used
/// for error reporting.
fn parse_line(line_number: usize, line: &str) -> Result<Cd, LoadError> {
    let fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();
    if fields.len() != FIELD_COUNT {
        return Err(LoadError::FieldCount {
            line: line_number,
            expected: FIELD_COUNT,
            found: fields.len(),
        });
    }

    let id = fields[0]
        .trim()
        .parse::<i64>()
        .map_err(|_| LoadError::InvalidId {
            line: line_number,
            value: fields[0].to_string(),
        })?;

    Ok(Cd::new(id, fields[1], fields[2]))
}

/// Write every record in store order, one line each, overwriting the previous
/// file contents. Always a full rewrite; no atomic rename or backup.
pub fn save_records(path: &Path, records: &[Cd]) -> Result<()> {
    let mut contents = String::new();
    for cd in records {
        contents.push_str(&format!(
            "{}{sep}{}{sep}{}\n",
            cd.id,
            cd.title,
            cd.artist,
            sep = FIELD_DELIMITER
        ));
    }

    fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Inventory;
    use tempfile::tempdir;

    fn sample_records() -> Vec<Cd> {
        vec![
            Cd::new(1, "Abbey Road", "The Beatles"),
            Cd::new(2, "Thriller", "Michael Jackson"),
        ]
    }

    #[test]
    fn round_trip_preserves_every_field_in_order() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join(INVENTORY_FILE_NAME);

        save_records(&path, &sample_records()).expect("save");
        let loaded = load_records(&path).expect("load").expect("file exists");

        assert_eq!(loaded, sample_records());
    }

    #[test]
    fn saving_twice_is_byte_identical() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join(INVENTORY_FILE_NAME);

        save_records(&path, &sample_records()).expect("first save");
        let first = fs::read(&path).expect("read first");
        save_records(&path, &sample_records()).expect("second save");
        let second = fs::read(&path).expect("read second");

        assert_eq!(first, second);
    }

    #[test]
    fn a_missing_file_is_no_prior_data_not_an_error() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nothing-here.txt");

        assert!(load_records(&path).expect("load").is_none());
    }

    #[test]
    fn blank_and_trailing_newline_lines_are_skipped() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join(INVENTORY_FILE_NAME);
        fs::write(&path, "1,Abbey Road,The Beatles\n\n2,Thriller,Michael Jackson\n\n").expect("write");

        let loaded = load_records(&path).expect("load").expect("file exists");
        assert_eq!(loaded, sample_records());
    }

    #[test]
    fn a_wrong_field_count_names_the_line() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join(INVENTORY_FILE_NAME);
        fs::write(&path, "1,Abbey Road,The Beatles\nnot a record\n").expect("write");

        let err = load_records(&path).expect_err("second line is malformed");
        assert!(matches!(err, LoadError::FieldCount { line: 2, found: 1, .. }));
    }

    #[test]
    fn an_embedded_delimiter_shows_up_as_extra_fields() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join(INVENTORY_FILE_NAME);
        fs::write(&path, "1,Hello, Dolly!,Louis Armstrong\n").expect("write");

        let err = load_records(&path).expect_err("comma in the title splits the line");
        assert!(matches!(err, LoadError::FieldCount { line: 1, found: 4, .. }));
    }

    #[test]
    fn a_non_numeric_id_names_the_line() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join(INVENTORY_FILE_NAME);
        fs::write(&path, "one,Abbey Road,The Beatles\n").expect("write");

        let err = load_records(&path).expect_err("id is not a number");
        match err {
            LoadError::InvalidId { line, value } => {
                assert_eq!(line, 1);
                assert_eq!(value, "one");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn add_save_load_delete_scenario() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join(INVENTORY_FILE_NAME);

        let mut inventory = Inventory::new();
        let first = inventory.add("Abbey Road", "The Beatles");
        assert_eq!(first, Cd::new(1, "Abbey Road", "The Beatles"));
        let second = inventory.add("Thriller", "Michael Jackson");
        assert_eq!(second.id, 2);

        save_records(&path, inventory.records()).expect("save");
        let loaded = load_records(&path).expect("load").expect("file exists");
        let mut reloaded = Inventory::from_records(loaded);
        assert_eq!(reloaded.records(), inventory.records());

        let removed = reloaded.remove(1).expect("id 1 is present");
        assert_eq!(removed.title, "Abbey Road");
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.records()[0].id, 2);

        assert!(reloaded.remove(1).is_none());
        assert_eq!(reloaded.len(), 1);
    }

    #[test]
    fn the_next_id_after_a_load_follows_the_highest_saved_id() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join(INVENTORY_FILE_NAME);
        save_records(
            &path,
            &[
                Cd::new(3, "Kind of Blue", "Miles Davis"),
                Cd::new(7, "Blue Train", "John Coltrane"),
                Cd::new(5, "Giant Steps", "John Coltrane"),
            ],
        )
        .expect("save");

        let loaded = load_records(&path).expect("load").expect("file exists");
        let mut inventory = Inventory::from_records(loaded);
        assert_eq!(inventory.add("Monk's Dream", "Thelonious Monk").id, 8);
    }
}
