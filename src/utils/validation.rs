//! Path validation shared by the commands.

use owo_colors::OwoColorize;
use std::error::Error;
use std::path::Path;

/// Validate that `path` exists and is a directory.
///
/// ```ignore
/// use crate::utils::validation::validate_dir_exists;
///
/// validate_dir_exists(Path::new("music"))?;
/// ```
pub fn validate_dir_exists(path: &Path) -> Result<(), Box<dyn Error>> {
    if !path.exists() {
        return Err(format!(
            "{} Folder does not exist: {}",
            "Error:".red().bold(),
            path.display()
        )
        .into());
    }
    if !path.is_dir() {
        return Err(format!(
            "{} Not a folder: {}",
            "Error:".red().bold(),
            path.display()
        )
        .into());
    }
    Ok(())
}

/// Reject an output folder that would swallow or replace the input folder.
///
/// The output folder is wiped before a shuffle, so it must be neither the
/// input folder nor one of its ancestors.
pub fn validate_distinct_output(input: &Path, output: &Path) -> Result<(), Box<dyn Error>> {
    let input = input.canonicalize()?;
    let output = match output.canonicalize() {
        Ok(path) => path,
        // Not created yet, so it cannot contain the input
        Err(_) => return Ok(()),
    };

    if input.starts_with(&output) {
        return Err(format!(
            "{} Output folder {} would overwrite the input folder {}",
            "Error:".red().bold(),
            output.display(),
            input.display()
        )
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_validate_dir_exists_valid() {
        let temp_dir = TempDir::new().unwrap();
        assert!(validate_dir_exists(temp_dir.path()).is_ok());
    }

    #[test]
    fn test_validate_dir_exists_missing() {
        let path = Path::new("/this/path/does/not/exist/hopefully/12345");
        let result = validate_dir_exists(path);
        assert!(result.unwrap_err().to_string().contains("does not exist"));
    }

    #[test]
    fn test_validate_dir_exists_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("test.txt");
        fs::write(&file_path, "test").unwrap();

        let result = validate_dir_exists(&file_path);
        assert!(result.unwrap_err().to_string().contains("Not a folder"));
    }

    #[test]
    fn test_validate_distinct_output() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("music");
        fs::create_dir(&input).unwrap();

        assert!(validate_distinct_output(&input, &temp_dir.path().join("shuffled")).is_ok());
        assert!(validate_distinct_output(&input, &input).is_err());
        assert!(validate_distinct_output(&input, temp_dir.path()).is_err());

        let sibling = temp_dir.path().join("other");
        fs::create_dir(&sibling).unwrap();
        assert!(validate_distinct_output(&input, &sibling).is_ok());
    }
}
