use crate::core::io::gninatypes::GninatypesFile;
use crate::core::io::index::write_index;
use crate::core::io::traits::StructureFile;
use crate::core::models::atom::TypedAtom;
use crate::core::models::example::Example;
use crate::core::models::structure::Structure;
use crate::core::utils::geometry::ligand_center;
use crate::engine::config::MolGridConfigBuilder;
use nalgebra::Point3;
use std::fs::File;
use std::path::PathBuf;
use tempfile::TempDir;

pub(crate) const RECMAP: &str = "\
AliphaticCarbonXSHydrophobe AliphaticCarbonXSNonHydrophobe
Nitrogen NitrogenXSAcceptor
OxygenXSAcceptor
";

pub(crate) const LIGMAP: &str = "\
AliphaticCarbonXSHydrophobe AromaticCarbonXSHydrophobe
OxygenXSAcceptor
";

pub(crate) const REC_CHANNELS: usize = 3;
pub(crate) const LIG_CHANNELS: usize = 2;

/// A small on-disk dataset: type maps, an index and one receptor/ligand pair per example.
pub(crate) struct Dataset {
    pub dir: TempDir,
    pub index: PathBuf,
    pub recmap: PathBuf,
    pub ligmap: PathBuf,
    pub examples: Vec<Example>,
}

impl Dataset {
    pub fn new(labels: &[f32]) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let recmap = dir.path().join("rec.map");
        let ligmap = dir.path().join("lig.map");
        std::fs::write(&recmap, RECMAP).unwrap();
        std::fs::write(&ligmap, LIGMAP).unwrap();
        std::fs::create_dir(dir.path().join("structs")).unwrap();

        let examples: Vec<Example> = labels
            .iter()
            .enumerate()
            .map(|(i, &label)| Example {
                label,
                affinity: Some(-(i as f32)),
                receptor: format!("structs/rec{}.gninatypes", i),
                ligand: format!("structs/lig{}.gninatypes", i),
            })
            .collect();

        for (i, example) in examples.iter().enumerate() {
            let shift = 0.1 * i as f64;
            let receptor: Structure = [
                TypedAtom::new(Point3::new(1.0 + shift, 0.0, 0.0), 2),
                TypedAtom::new(Point3::new(-1.5, 1.0, shift), 9),
                TypedAtom::new(Point3::new(0.0, -1.0, 1.0), 13),
                TypedAtom::new(Point3::new(0.5, 0.5, 0.5), 23),
            ]
            .into_iter()
            .collect();
            let ligand: Structure = [
                TypedAtom::new(Point3::new(0.3, 0.2, shift), 4),
                TypedAtom::new(Point3::new(-0.4, 0.6, 0.1), 13),
                TypedAtom::new(Point3::new(0.0, 0.0, 1.1), 1),
            ]
            .into_iter()
            .collect();
            GninatypesFile::write_to_path(&receptor, dir.path().join(&example.receptor)).unwrap();
            GninatypesFile::write_to_path(&ligand, dir.path().join(&example.ligand)).unwrap();
        }

        let index = dir.path().join("train.types");
        let mut file = File::create(&index).unwrap();
        write_index(&examples, true, &mut file).unwrap();

        Self {
            dir,
            index,
            recmap,
            ligmap,
            examples,
        }
    }

    pub fn path(&self, reference: &str) -> PathBuf {
        self.dir.path().join(reference)
    }

    /// Replaces the index with `examples`, which may pair the existing files differently.
    pub fn rewrite_index(&self, examples: &[Example]) {
        let mut file = File::create(&self.index).unwrap();
        write_index(examples, true, &mut file).unwrap();
    }

    /// Grid center of example `i` as written by [`Dataset::new`].
    pub fn ligand_center(&self, i: usize) -> Point3<f64> {
        let ligand = GninatypesFile::read_from_path(self.path(&self.examples[i].ligand)).unwrap();
        ligand_center(&ligand)
    }

    /// Config over this dataset: 6 Å grid at 0.5 Å (13 points per axis), fixed seed.
    pub fn builder(&self, batch_size: usize) -> MolGridConfigBuilder {
        MolGridConfigBuilder::new()
            .source(&self.index)
            .root_folder(self.dir.path())
            .recmap(&self.recmap)
            .ligmap(&self.ligmap)
            .has_affinity(true)
            .batch_size(batch_size)
            .dimension(6.0)
            .resolution(0.5)
            .seed(1)
    }
}
