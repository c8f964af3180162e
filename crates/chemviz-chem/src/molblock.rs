//! V2000 molblock serialization.

use std::io::Write;

use crate::molecule::Molecule;

/// Write a molecule as a V2000 connection table.
///
/// The block ends at `M  END`; the `$$$$` record separator belongs to
/// multi-record SDF files, not to a single molblock.
pub fn write_molblock<W: Write>(mut writer: W, mol: &Molecule, title: &str) -> std::io::Result<()> {
    writeln!(writer, "{title}")?;
    writeln!(writer, "  chemviz           3D")?;
    writeln!(writer)?;
    writeln!(
        writer,
        "{:>3}{:>3}  0  0  0  0  0  0  0  0999 V2000",
        mol.atom_count(),
        mol.bond_count()
    )?;

    for atom in &mol.atoms {
        writeln!(
            writer,
            "{:>10.4}{:>10.4}{:>10.4} {:<3} 0  0  0  0  0  0  0  0  0  0  0  0",
            atom.position[0],
            atom.position[1],
            atom.position[2],
            atom.element.symbol()
        )?;
    }

    for bond in &mol.bonds {
        writeln!(
            writer,
            "{:>3}{:>3}{:>3}  0  0  0  0",
            bond.atom1 + 1,
            bond.atom2 + 1,
            bond.order.ctfile_code()
        )?;
    }

    writeln!(writer, "M  END")?;
    Ok(())
}

/// Serialize to an owned string.
pub fn to_molblock(mol: &Molecule, title: &str) -> String {
    let mut buf = Vec::new();
    // writing into a Vec cannot fail
    let _ = write_molblock(&mut buf, mol, title);
    String::from_utf8_lossy(&buf).into_owned()
}
