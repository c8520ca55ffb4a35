use phf::{Map, phf_map};

/// Physical properties of one entry of the fixed atom-type table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtomTypeInfo {
    /// Canonical type name as it appears in channel map files.
    pub name: &'static str,
    /// Short element-like symbol (AutoDock naming).
    pub symbol: &'static str,
    /// X-Score van der Waals radius in Angstroms.
    pub xs_radius: f64,
    /// Covalent radius in Angstroms.
    pub covalent_radius: f64,
}

impl AtomTypeInfo {
    pub fn radius(&self, use_covalent_radius: bool) -> f64 {
        if use_covalent_radius {
            self.covalent_radius
        } else {
            self.xs_radius
        }
    }

    pub fn is_hydrogen(&self) -> bool {
        self.symbol == "H" || self.symbol == "HD"
    }
}

const fn entry(
    name: &'static str,
    symbol: &'static str,
    xs_radius: f64,
    covalent_radius: f64,
) -> AtomTypeInfo {
    AtomTypeInfo {
        name,
        symbol,
        xs_radius,
        covalent_radius,
    }
}

/// The type table, indexed by the integer type stored in `.gninatypes` records.
#[rustfmt::skip]
pub static ATOM_TYPES: [AtomTypeInfo; 28] = [
    entry("Hydrogen",                       "H",  1.00, 0.37),
    entry("PolarHydrogen",                  "HD", 1.00, 0.37),
    entry("AliphaticCarbonXSHydrophobe",    "C",  1.90, 0.77),
    entry("AliphaticCarbonXSNonHydrophobe", "C",  1.90, 0.77),
    entry("AromaticCarbonXSHydrophobe",     "A",  1.90, 0.77),
    entry("AromaticCarbonXSNonHydrophobe",  "A",  1.90, 0.77),
    entry("Nitrogen",                       "N",  1.80, 0.75),
    entry("NitrogenXSDonor",                "N",  1.80, 0.75),
    entry("NitrogenXSDonorAcceptor",        "NA", 1.80, 0.75),
    entry("NitrogenXSAcceptor",             "NA", 1.80, 0.75),
    entry("Oxygen",                         "O",  1.70, 0.73),
    entry("OxygenXSDonor",                  "O",  1.70, 0.73),
    entry("OxygenXSDonorAcceptor",          "OA", 1.70, 0.73),
    entry("OxygenXSAcceptor",               "OA", 1.70, 0.73),
    entry("Sulfur",                         "S",  2.00, 1.02),
    entry("SulfurAcceptor",                 "SA", 2.00, 1.02),
    entry("Phosphorus",                     "P",  2.10, 1.06),
    entry("Fluorine",                       "F",  1.50, 0.71),
    entry("Chlorine",                       "Cl", 1.80, 0.99),
    entry("Bromine",                        "Br", 2.00, 1.14),
    entry("Iodine",                         "I",  2.20, 1.33),
    entry("Magnesium",                      "Mg", 1.20, 1.30),
    entry("Manganese",                      "Mn", 1.20, 1.39),
    entry("Zinc",                           "Zn", 1.20, 1.31),
    entry("Calcium",                        "Ca", 1.20, 1.74),
    entry("Iron",                           "Fe", 1.20, 1.25),
    entry("GenericMetal",                   "M",  1.20, 1.75),
    entry("Boron",                          "B",  1.92, 0.90),
];

#[rustfmt::skip]
static TYPE_INDEX_BY_NAME: Map<&'static str, usize> = phf_map! {
    "Hydrogen" => 0, "PolarHydrogen" => 1,
    "AliphaticCarbonXSHydrophobe" => 2, "AliphaticCarbonXSNonHydrophobe" => 3,
    "AromaticCarbonXSHydrophobe" => 4, "AromaticCarbonXSNonHydrophobe" => 5,
    "Nitrogen" => 6, "NitrogenXSDonor" => 7, "NitrogenXSDonorAcceptor" => 8, "NitrogenXSAcceptor" => 9,
    "Oxygen" => 10, "OxygenXSDonor" => 11, "OxygenXSDonorAcceptor" => 12, "OxygenXSAcceptor" => 13,
    "Sulfur" => 14, "SulfurAcceptor" => 15,
    "Phosphorus" => 16,
    "Fluorine" => 17, "Chlorine" => 18, "Bromine" => 19, "Iodine" => 20,
    "Magnesium" => 21, "Manganese" => 22, "Zinc" => 23, "Calcium" => 24, "Iron" => 25,
    "GenericMetal" => 26,
    "Boron" => 27,
};

pub fn num_atom_types() -> usize {
    ATOM_TYPES.len()
}

pub fn type_index(name: &str) -> Option<usize> {
    TYPE_INDEX_BY_NAME.get(name).copied()
}

pub fn type_info(index: usize) -> Option<&'static AtomTypeInfo> {
    ATOM_TYPES.get(index)
}
