use std::{
    fs::{DirBuilder, File},
    io::Write,
    path::{Path, PathBuf},
};

use color_eyre::{eyre::Context, Result};

pub fn create_file<'a>(path: &Path, filename: &'a str, buff_write: &'a [u8]) -> Result<()> {
    let file_path = path.join(filename);

    File::create(&file_path)
        .with_context(|| format!("Could not create file {file_path:?}"))?
        .write_all(buff_write)
        .with_context(|| format!("Could not write to file {file_path:?}"))
}

pub fn create_directory(path_create: &Path) -> Result<()> {
    DirBuilder::new()
        .recursive(true)
        .create(path_create)
        .with_context(|| format!("Could not create directory {path_create:?}"))
}

/// Gets the absolute route for an element in the system given a path to it
pub fn get_project_root_absolute_path(project_root: &Path) -> Result<PathBuf> {
    let canonical = project_root
        .canonicalize()
        .with_context(|| format!("Could not resolve the path {project_root:?}"))?;

    Ok(strip_verbatim_prefix(canonical))
}

/// `canonicalize` yields `\\?\C:\...` paths on Windows, which `CMake` doesn't understand
fn strip_verbatim_prefix(path: PathBuf) -> PathBuf {
    match path.to_str().and_then(|p| p.strip_prefix(r"\\?\")) {
        Some(stripped) => PathBuf::from(stripped),
        None => path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test::in_temp_dir;

    #[test]
    fn test_created_files_are_readable() -> Result<()> {
        in_temp_dir(|dir| {
            let nested = dir.join("app").join("src");
            create_directory(&nested)?;
            create_file(&nested, "CMakeLists.txt", b"project(app)\n")?;

            assert_eq!(
                std::fs::read_to_string(nested.join("CMakeLists.txt"))?,
                "project(app)\n"
            );
            Ok(())
        })
    }

    #[test]
    fn test_absolute_path_of_the_root() -> Result<()> {
        in_temp_dir(|dir| {
            let absolute = get_project_root_absolute_path(dir)?;
            assert!(absolute.is_absolute());
            assert!(get_project_root_absolute_path(&dir.join("missing")).is_err());
            Ok(())
        })
    }

    #[test]
    fn test_verbatim_prefix_is_removed() {
        assert_eq!(
            strip_verbatim_prefix(PathBuf::from(r"\\?\C:\work\demo")),
            PathBuf::from(r"C:\work\demo")
        );
        assert_eq!(
            strip_verbatim_prefix(PathBuf::from("/work/demo")),
            PathBuf::from("/work/demo")
        );
    }
}
