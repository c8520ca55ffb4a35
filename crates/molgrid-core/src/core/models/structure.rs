use super::atom::TypedAtom;

/// A receptor or ligand as an ordered list of typed atoms.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Structure {
    atoms: Vec<TypedAtom>,
}

impl Structure {
    pub fn new(atoms: Vec<TypedAtom>) -> Self {
        Self { atoms }
    }

    pub fn atoms(&self) -> &[TypedAtom] {
        &self.atoms
    }

    pub fn push(&mut self, atom: TypedAtom) {
        self.atoms.push(atom);
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn heavy_atoms(&self) -> impl Iterator<Item = &TypedAtom> {
        self.atoms.iter().filter(|atom| !atom.is_hydrogen())
    }
}

impl FromIterator<TypedAtom> for Structure {
    fn from_iter<I: IntoIterator<Item = TypedAtom>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
