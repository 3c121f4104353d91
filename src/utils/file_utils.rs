// 中文说明：
// 文件工具：读取待分析源码（大小限制、UTF-8 校验）、展开目录为受支持的源文件列表、
// 确保输出目录存在，以及在目录中创建不覆盖已有文件的唯一文件，服务于批量/交互分析
// 入口、上传副本与报告生成。
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::detector::Language;
use crate::utils::constants::{MAX_FILE_SIZE, MAX_UNIQUE_NAME_ATTEMPTS};
use crate::utils::error::FileError;

pub fn read_file_content<P: AsRef<Path>>(path: P) -> Result<String, FileError> {
    let path = path.as_ref();

    let metadata = fs::metadata(path).map_err(|e| FileError::from_io(e, path))?;
    if metadata.len() > MAX_FILE_SIZE as u64 {
        return Err(FileError::FileTooLarge(path.to_path_buf()));
    }

    let bytes = fs::read(path).map_err(|e| FileError::from_io(e, path))?;
    String::from_utf8(bytes).map_err(|_| FileError::NotText(path.to_path_buf()))
}

/// Expand directories into the supported source files they contain.
///
/// Plain paths are passed through untouched, including ones that do not
/// exist, so the caller can report them per file.
pub fn expand_inputs(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            let mut found: Vec<PathBuf> = WalkDir::new(path)
                .follow_links(true)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
                .map(|e| e.into_path())
                .filter(|p| Language::from_path(p) != Language::Unknown)
                .collect();
            found.sort();
            files.extend(found);
        } else {
            files.push(path.clone());
        }
    }

    files
}

pub fn ensure_directory<P: AsRef<Path>>(path: P) -> Result<(), FileError> {
    let path = path.as_ref();
    if !path.exists() {
        fs::create_dir_all(path).map_err(|e| FileError::from_io(e, path))?;
    }
    Ok(())
}

/// Create `name` inside `dir` without touching any existing file.
///
/// A taken name is retried as `stem_1.ext`, `stem_2.ext` and so on, so
/// concurrent writers with the same name each get their own file.
pub fn create_unique_file(dir: &Path, name: &str) -> io::Result<(PathBuf, File)> {
    let (stem, ext) = match name.rfind('.') {
        Some(idx) if idx > 0 => name.split_at(idx),
        _ => (name, ""),
    };

    let mut attempt: u32 = 0;
    loop {
        let candidate = if attempt == 0 {
            dir.join(name)
        } else {
            dir.join(format!("{}_{}{}", stem, attempt, ext))
        };
        match OpenOptions::new().write(true).create_new(true).open(&candidate) {
            Ok(file) => return Ok((candidate, file)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists && attempt < MAX_UNIQUE_NAME_ATTEMPTS => {
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn reads_utf8_source() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.py");
        fs::write(&file, "print('hi')\n").unwrap();
        assert_eq!(read_file_content(&file).unwrap(), "print('hi')\n");
    }

    #[test]
    fn missing_file_reports_its_path() {
        let err = read_file_content("definitely/not/here.c").unwrap_err();
        assert!(matches!(err, FileError::NotFound(p) if p == Path::new("definitely/not/here.c")));
    }

    #[test]
    fn binary_content_is_rejected() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("blob.c");
        fs::write(&file, [0xff, 0xfe, 0x00, 0x81]).unwrap();
        assert!(matches!(read_file_content(&file), Err(FileError::NotText(_))));
    }

    #[test]
    fn directories_expand_to_supported_sources_only() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("b.py"), "").unwrap();
        fs::write(dir.path().join("README.md"), "").unwrap();
        fs::write(dir.path().join("nested/a.c"), "").unwrap();

        let missing = PathBuf::from("missing.js");
        let files = expand_inputs(&[dir.path().to_path_buf(), missing.clone()]);

        assert_eq!(files.len(), 3);
        assert!(files.iter().any(|f| f.ends_with("b.py")));
        assert!(files.iter().any(|f| f.ends_with("nested/a.c")));
        assert_eq!(files.last(), Some(&missing));
    }

    #[test]
    fn unique_files_never_replace_each_other() {
        let dir = TempDir::new().unwrap();
        let (first, _) = create_unique_file(dir.path(), "util.py").unwrap();
        fs::write(&first, "first").unwrap();
        let (second, _) = create_unique_file(dir.path(), "util.py").unwrap();
        let (third, _) = create_unique_file(dir.path(), "util.py").unwrap();
        let (bare, _) = create_unique_file(dir.path(), "Makefile").unwrap();
        let (bare_again, _) = create_unique_file(dir.path(), "Makefile").unwrap();

        assert_eq!(first, dir.path().join("util.py"));
        assert_eq!(second, dir.path().join("util_1.py"));
        assert_eq!(third, dir.path().join("util_2.py"));
        assert_eq!(bare, dir.path().join("Makefile"));
        assert_eq!(bare_again, dir.path().join("Makefile_1"));
        assert_eq!(fs::read_to_string(&first).unwrap(), "first");
    }

    #[test]
    fn unique_file_in_missing_directory_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = create_unique_file(&dir.path().join("missing"), "a.c").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
