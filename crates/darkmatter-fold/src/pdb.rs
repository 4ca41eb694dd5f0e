//! Structure-file reading and the confidence summary of one model.
//!
//! ESMFold stores plDDT in the B-factor field of every atom record. Parsing
//! itself is left to `pdbtbx`.

use pdbtbx::{Format, ReadOptions, StrictnessLevel, PDB};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum StructureError {
    #[error("The file has 0 models, the given model {0} does not exist.")]
    NoModels(usize),

    #[error("failed to parse structure file {path}: {details}")]
    Parse { path: PathBuf, details: String },
}

/// Per-residue confidence of one model.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfidenceSummary {
    /// Mean B-factor of each residue's atoms, in file order.
    pub residues: Vec<f64>,
}

impl ConfidenceSummary {
    pub fn residue_count(&self) -> usize {
        self.residues.len()
    }

    /// Arithmetic mean across residues.
    ///
    /// Each residue counts once regardless of how many atoms it has, so this
    /// differs from a plain per-atom mean when residues carry different
    /// B-factors on their atoms. ESMFold writes one value per residue, where
    /// the two agree.
    pub fn mean_confidence(&self) -> f64 {
        self.residues.iter().sum::<f64>() / self.residues.len() as f64
    }
}

pub struct Structure {
    pdb: PDB,
}

impl Structure {
    /// Parse a PDB file from disk in loose mode; warnings are only logged.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, StructureError> {
        let path = path.as_ref();
        let (pdb, warnings) = ReadOptions::default()
            .set_format(Format::Pdb)
            .set_level(StrictnessLevel::Loose)
            .read(&*path.to_string_lossy())
            .map_err(|errors| StructureError::Parse {
                path: path.to_path_buf(),
                details: errors.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "),
            })?;

        if !warnings.is_empty() {
            debug!(path = %path.display(), warnings = warnings.len(), "structure parsed with warnings");
        }
        debug!(models = pdb.model_count(), atoms = pdb.atom_count(), "parsed PDB structure");
        Ok(Self { pdb })
    }

    pub fn model_count(&self) -> usize {
        self.pdb.model_count()
    }

    /// Confidence of model `number` (1-based, as in the PDB format). A model
    /// without atoms counts as missing.
    pub fn confidence(&self, number: usize) -> Result<ConfidenceSummary, StructureError> {
        let model = number
            .checked_sub(1)
            .and_then(|i| self.pdb.model(i))
            .ok_or(StructureError::NoModels(number))?;

        let residues: Vec<f64> = model
            .residues()
            .filter_map(|residue| {
                let (sum, count) = residue
                    .atoms()
                    .fold((0.0, 0usize), |(sum, count), atom| (sum + atom.b_factor(), count + 1));
                (count > 0).then(|| sum / count as f64)
            })
            .collect();

        if residues.is_empty() {
            return Err(StructureError::NoModels(number));
        }
        Ok(ConfidenceSummary { residues })
    }
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn atom_line(serial: u32, name: &str, res: &str, chain: char, seq: i32, b: f64) -> String {
        format!(
            "ATOM  {:>5} {:<4} {:>3} {}{:>4}    {:>8.3}{:>8.3}{:>8.3}{:>6.2}{:>6.2}          {:>2}",
            serial, name, res, chain, seq, serial as f64, 2.0, 3.0, 1.0, b, &name[..1]
        )
    }

    fn write(dir: &TempDir, text: &str) -> PathBuf {
        let path = dir.path().join("model.pdb");
        std::fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn test_mean_of_four_residues() {
        let dir = tempfile::tempdir().unwrap();
        let text: String = [10.0, 20.0, 30.0, 40.0]
            .iter()
            .enumerate()
            .map(|(i, b)| atom_line(i as u32 + 1, "CA", "GLY", 'A', i as i32 + 1, *b) + "\n")
            .collect::<String>()
            + "END\n";
        let summary = Structure::read(write(&dir, &text)).unwrap().confidence(1).unwrap();
        assert_eq!(summary.residue_count(), 4);
        assert_eq!(round_to(summary.mean_confidence(), 4), 25.0);
    }

    #[test]
    fn test_confidence_is_averaged_per_residue_not_per_atom() {
        let dir = tempfile::tempdir().unwrap();
        let text = [
            atom_line(1, "N", "ALA", 'A', 1, 50.0),
            atom_line(2, "CA", "ALA", 'A', 1, 50.0),
            atom_line(3, "C", "ALA", 'A', 1, 50.0),
            atom_line(4, "CA", "GLY", 'A', 2, 80.0),
            "END".to_string(),
        ]
        .join("\n");
        let summary = Structure::read(write(&dir, &text)).unwrap().confidence(1).unwrap();
        assert_eq!(summary.residues, vec![50.0, 80.0]);
        assert_eq!(summary.mean_confidence(), 65.0);
    }

    #[test]
    fn test_explicit_models() {
        let dir = tempfile::tempdir().unwrap();
        let text = format!(
            "MODEL        1\n{}\nENDMDL\nMODEL        2\n{}\nENDMDL\nEND\n",
            atom_line(1, "CA", "ALA", 'A', 1, 10.0),
            atom_line(1, "CA", "ALA", 'A', 1, 90.0),
        );
        let structure = Structure::read(write(&dir, &text)).unwrap();
        assert_eq!(structure.model_count(), 2);
        assert_eq!(structure.confidence(1).unwrap().mean_confidence(), 10.0);
        assert_eq!(structure.confidence(2).unwrap().mean_confidence(), 90.0);
    }

    #[test]
    fn test_model_zero_and_missing_model() {
        let dir = tempfile::tempdir().unwrap();
        let text = format!("{}\nEND\n", atom_line(1, "CA", "ALA", 'A', 1, 10.0));
        let structure = Structure::read(write(&dir, &text)).unwrap();
        assert!(matches!(structure.confidence(0), Err(StructureError::NoModels(0))));
        let err = structure.confidence(2).unwrap_err();
        assert_eq!(err.to_string(), "The file has 0 models, the given model 2 does not exist.");
    }

    #[test]
    fn test_empty_and_garbage_yield_no_confidence() {
        let dir = tempfile::tempdir().unwrap();
        for text in ["", "{\"message\": \"Internal Server Error\"}", "<html>502 Bad Gateway</html>\n"] {
            let result = Structure::read(write(&dir, text)).and_then(|s| s.confidence(1));
            assert!(result.is_err(), "{text:?}");
        }
    }

    #[test]
    fn test_missing_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Structure::read(dir.path().join("absent.pdb")).err().unwrap();
        assert!(matches!(err, StructureError::Parse { .. }));
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(2.0 / 3.0, 4), 0.6667);
        assert_eq!(round_to(25.0, 4), 25.0);
    }
}
