use std::path::Path;

use crate::error::{Error, Result};

/// File type reported to the API, taken from the path's extension.
pub fn infer_file_type(path: &Path) -> Result<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            Error::Precondition(format!(
                "cannot infer file_type for path {} with no extension",
                path.display()
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_file_type() {
        assert_eq!(infer_file_type(Path::new("/scans/body.ply")).unwrap(), "ply");
        assert_eq!(infer_file_type(Path::new("archive.tar.gz")).unwrap(), "gz");
        assert!(matches!(
            infer_file_type(Path::new("/scans/body")),
            Err(Error::Precondition(_))
        ));
    }
}
