use std::path::{Path, PathBuf};

/// One record of an index file: a receptor/ligand pair with its targets.
///
/// Structure references are kept exactly as written in the index. They double as the
/// identity under which precomputed grids are stored in a molcache.
#[derive(Debug, Clone, PartialEq)]
pub struct Example {
    /// Classification target. Values greater than zero count as the positive class.
    pub label: f32,
    /// Regression target, present only for indices that carry an affinity column.
    pub affinity: Option<f32>,
    /// Receptor structure reference as written in the index.
    pub receptor: String,
    /// Ligand structure reference as written in the index.
    pub ligand: String,
}

impl Example {
    pub fn is_positive(&self) -> bool {
        self.label > 0.0
    }

    pub fn receptor_path(&self, root_folder: &Path) -> PathBuf {
        resolve_path(root_folder, &self.receptor)
    }

    pub fn ligand_path(&self, root_folder: &Path) -> PathBuf {
        resolve_path(root_folder, &self.ligand)
    }
}

/// Joins `reference` onto `root_folder` unless it is already absolute.
pub fn resolve_path(root_folder: &Path, reference: &str) -> PathBuf {
    let path = Path::new(reference);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root_folder.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example(label: f32) -> Example {
        Example {
            label,
            affinity: None,
            receptor: "1abc/rec.gninatypes".to_string(),
            ligand: "1abc/lig.gninatypes".to_string(),
        }
    }

    #[test]
    fn positive_class_requires_label_above_zero() {
        assert!(example(1.0).is_positive());
        assert!(!example(0.0).is_positive());
        assert!(!example(-1.0).is_positive());
    }

    #[test]
    fn relative_references_resolve_against_root() {
        let ex = example(1.0);
        assert_eq!(
            ex.receptor_path(Path::new("/data")),
            PathBuf::from("/data/1abc/rec.gninatypes")
        );
        assert_eq!(
            ex.ligand_path(Path::new("")),
            PathBuf::from("1abc/lig.gninatypes")
        );
    }

    #[cfg(unix)]
    #[test]
    fn absolute_references_ignore_root() {
        assert_eq!(
            resolve_path(Path::new("/data"), "/abs/lig.gninatypes"),
            PathBuf::from("/abs/lig.gninatypes")
        );
    }
}
