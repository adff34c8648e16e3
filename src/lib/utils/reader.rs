use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::{
    eyre::{eyre, Context},
    Result,
};
use walkdir::{DirEntry, WalkDir};

use crate::model_file::{self, ModelFormat};
use crate::provider::snapshot::SnapshotProvider;
use crate::utils::constants::{debug_messages, error_messages, MODEL_FILE_EXTS, MODEL_FILE_PREFIX};

/// Details about a found project model snapshot on the project
///
/// This is just a snapshot with a valid name found
/// at a valid path in some subdirectory
#[derive(Debug)]
pub struct ModelFileEntry {
    pub dir_entry: DirEntry,
    pub path: PathBuf,
}

/// Checks for the existence of the `sln2cmake<any>.toml` or `sln2cmake<any>.json` project
/// model snapshots under `base_path`, and returns the ones found, sorted by path.
///
/// This function fails if there's no snapshot at all
pub fn find_model_files(base_path: &Path) -> Result<Vec<ModelFileEntry>> {
    log::debug!("{}", debug_messages::SEARCHING_MODEL_FILES);
    let mut files = vec![];

    for e in WalkDir::new(base_path)
        .max_depth(2)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let Some(filename) = e.file_name().to_str() else {
            continue;
        };
        let has_model_ext = Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| MODEL_FILE_EXTS.iter().any(|m| m.eq_ignore_ascii_case(ext)));

        if e.file_type().is_file() && filename.starts_with(MODEL_FILE_PREFIX) && has_model_ext {
            files.push(ModelFileEntry {
                path: e.path().to_path_buf(),
                dir_entry: e,
            })
        }
    }

    if files.is_empty() {
        Err(eyre!("{}: {:?}", error_messages::NO_MODEL_FILES, base_path))
    } else {
        Ok(files)
    }
}

/// Reads a snapshot from the disk. The raw project files it references are looked up
/// relative to its directory
pub fn load_model(path: &Path) -> Result<SnapshotProvider> {
    let format = ModelFormat::from_path(path)?;
    let raw = fs::read_to_string(path)
        .with_context(|| format!("{}: {:?}", error_messages::READ_MODEL_FILE, path))?;
    let model = model_file::model_from_str(&raw, format)
        .with_context(|| format!("{}: {:?}", error_messages::PARSE_MODEL_FILE, path))?;

    let base_dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    Ok(SnapshotProvider::new(model, base_dir))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ConfigurationEnumeration;
    use crate::utils::test::{in_temp_dir, test_data_dir, DEMO_MODEL};

    #[test]
    fn test_snapshots_are_found_two_levels_deep() -> Result<()> {
        in_temp_dir(|dir| {
            let nested = dir.join("build");
            std::fs::create_dir_all(nested.join("too").join("deep"))?;
            std::fs::write(dir.join("sln2cmake.toml"), DEMO_MODEL)?;
            std::fs::write(nested.join("sln2cmake_release.json"), "{}")?;
            std::fs::write(nested.join("too").join("deep").join("sln2cmake.toml"), "")?;
            std::fs::write(dir.join("sln2cmake.yaml"), "")?;
            std::fs::write(dir.join("other.toml"), "")?;

            let found: Vec<PathBuf> = find_model_files(dir)?.into_iter().map(|f| f.path).collect();
            assert_eq!(
                found,
                vec![
                    nested.join("sln2cmake_release.json"),
                    dir.join("sln2cmake.toml")
                ]
            );
            Ok(())
        })
    }

    #[test]
    fn test_no_snapshot_is_an_error() -> Result<()> {
        in_temp_dir(|dir| {
            assert!(find_model_files(dir).is_err());
            Ok(())
        })
    }

    #[test]
    fn test_load_the_demo_snapshot() -> Result<()> {
        let provider = load_model(&test_data_dir().join("sln2cmake_demo.toml"))?;

        assert_eq!(provider.solution().name, "demo");
        assert_eq!(provider.base_dir(), test_data_dir());
        assert_eq!(provider.projects().len(), 3);
        Ok(())
    }
}
