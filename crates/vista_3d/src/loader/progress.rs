//! Chunked file reads with progress callbacks

use super::Result;
use std::io::Read;
use std::path::Path;

const CHUNK_SIZE: usize = 64 * 1024;

/// Bytes read so far out of the total
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Progress {
    pub loaded: u64,
    pub total: u64,
}

impl Progress {
    /// Completed fraction in `0..=1` (1 for empty files)
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            (self.loaded as f64 / self.total as f64).min(1.0) as f32
        }
    }

    pub fn percent(&self) -> f32 {
        self.fraction() * 100.0
    }
}

/// Read a whole file, reporting progress after every chunk
pub fn read_with_progress(path: impl AsRef<Path>, mut progress: impl FnMut(Progress)) -> Result<Vec<u8>> {
    let mut file = std::fs::File::open(path.as_ref())?;
    let total = file.metadata()?.len();
    let mut data = Vec::with_capacity(total as usize);
    let mut chunk = vec![0u8; CHUNK_SIZE];

    loop {
        let n = file.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        data.extend_from_slice(&chunk[..n]);
        progress(Progress {
            loaded: data.len() as u64,
            total,
        });
    }

    if total == 0 {
        progress(Progress { loaded: 0, total: 0 });
    }
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::LoadError;

    #[test]
    fn test_progress_reaches_total() {
        let path = std::env::temp_dir().join(format!("vista_progress_{}.bin", std::process::id()));
        let bytes = vec![7u8; CHUNK_SIZE * 2 + 100];
        std::fs::write(&path, &bytes).unwrap();

        let mut reports = Vec::new();
        let data = read_with_progress(&path, |p| reports.push(p)).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(data, bytes);
        assert_eq!(reports.len(), 3);
        assert_eq!(reports.last().map(|p| p.fraction()), Some(1.0));
        assert!(reports.windows(2).all(|w| w[0].loaded < w[1].loaded));
    }

    #[test]
    fn test_missing_file() {
        let err = read_with_progress("/definitely/not/here.glb", |_| {}).unwrap_err();
        assert!(matches!(err, LoadError::NotFound(_)));
    }

    #[test]
    fn test_percent() {
        let p = Progress { loaded: 1, total: 4 };
        assert_eq!(p.percent(), 25.0);
        assert_eq!(Progress { loaded: 0, total: 0 }.fraction(), 1.0);
    }
}
