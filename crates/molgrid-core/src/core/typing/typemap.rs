use super::table::{num_atom_types, type_index};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TypeMapError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Unknown atom type '{name}' on line {line}")]
    UnknownType { line: usize, name: String },
    #[error("Atom type '{name}' on line {line} is already mapped to channel {channel}")]
    DuplicateType {
        line: usize,
        name: String,
        channel: usize,
    },
    #[error("Type map defines no channels")]
    Empty,
}

/// Maps atom-type indices onto grid channels.
///
/// Every non-empty line of a map file defines one channel; all type names listed on that line
/// (whitespace separated) contribute to it. Lines starting with `#` are comments. Types that do
/// not appear anywhere are dropped during voxelization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMap {
    channel_of_type: Vec<Option<usize>>,
    channel_names: Vec<String>,
}

impl TypeMap {
    pub fn read_from(reader: impl BufRead) -> Result<Self, TypeMapError> {
        let mut channel_of_type = vec![None; num_atom_types()];
        let mut channel_names = Vec::new();

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;
            let content = line.trim();
            if content.is_empty() || content.starts_with('#') {
                continue;
            }

            let channel = channel_names.len();
            let mut names = Vec::new();
            for name in content.split_whitespace() {
                let index = type_index(name).ok_or_else(|| TypeMapError::UnknownType {
                    line: line_num,
                    name: name.to_string(),
                })?;
                if let Some(existing) = channel_of_type[index] {
                    return Err(TypeMapError::DuplicateType {
                        line: line_num,
                        name: name.to_string(),
                        channel: existing,
                    });
                }
                channel_of_type[index] = Some(channel);
                names.push(name);
            }
            channel_names.push(names.join("_"));
        }

        if channel_names.is_empty() {
            return Err(TypeMapError::Empty);
        }
        Ok(Self {
            channel_of_type,
            channel_names,
        })
    }

    pub fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Self, TypeMapError> {
        let file = File::open(path)?;
        Self::read_from(BufReader::new(file))
    }

    #[inline]
    pub fn channel(&self, type_index: usize) -> Option<usize> {
        self.channel_of_type.get(type_index).copied().flatten()
    }

    pub fn num_channels(&self) -> usize {
        self.channel_names.len()
    }

    /// Channel names, formed by joining the type names of each map line with `_`.
    pub fn channel_names(&self) -> &[String] {
        &self.channel_names
    }
}

impl FromStr for TypeMap {
    type Err = TypeMapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::read_from(s.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAP: &str = "\
# receptor channels
AliphaticCarbonXSHydrophobe
AliphaticCarbonXSNonHydrophobe AromaticCarbonXSNonHydrophobe

NitrogenXSAcceptor OxygenXSAcceptor
";

    #[test]
    fn each_line_is_one_channel() {
        let map: TypeMap = MAP.parse().unwrap();
        assert_eq!(map.num_channels(), 3);
        assert_eq!(map.channel(2), Some(0));
        assert_eq!(map.channel(3), Some(1));
        assert_eq!(map.channel(5), Some(1));
        assert_eq!(map.channel(9), Some(2));
        assert_eq!(map.channel(13), Some(2));
    }

    #[test]
    fn unmapped_and_out_of_range_types_have_no_channel() {
        let map: TypeMap = MAP.parse().unwrap();
        assert_eq!(map.channel(0), None);
        assert_eq!(map.channel(999), None);
    }

    #[test]
    fn channel_names_join_type_names() {
        let map: TypeMap = MAP.parse().unwrap();
        assert_eq!(
            map.channel_names()[1],
            "AliphaticCarbonXSNonHydrophobe_AromaticCarbonXSNonHydrophobe"
        );
    }

    #[test]
    fn unknown_type_reports_line() {
        let result = "Hydrogen\nUnobtainium\n".parse::<TypeMap>();
        assert!(matches!(
            result,
            Err(TypeMapError::UnknownType { line: 2, ref name }) if name == "Unobtainium"
        ));
    }

    #[test]
    fn duplicate_type_is_rejected() {
        let result = "Zinc\nIron Zinc\n".parse::<TypeMap>();
        assert!(matches!(
            result,
            Err(TypeMapError::DuplicateType { channel: 0, .. })
        ));
    }

    #[test]
    fn empty_map_is_rejected() {
        assert!(matches!(
            "# nothing here\n\n".parse::<TypeMap>(),
            Err(TypeMapError::Empty)
        ));
    }

    #[test]
    fn read_from_path_fails_for_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = TypeMap::read_from_path(dir.path().join("missing.map"));
        assert!(matches!(result, Err(TypeMapError::Io(_))));
    }
}
