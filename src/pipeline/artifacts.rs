//! Named grids produced for one input image.

use std::fmt;

use ndarray::ArrayView2;

use crate::filters::{Grid, MeanFilter};

/// Noise model that produced a noisy artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoiseModel {
    Gaussian,
    SaltPepper,
}

impl NoiseModel {
    pub fn name(self) -> &'static str {
        match self {
            NoiseModel::Gaussian => "gaussian",
            NoiseModel::SaltPepper => "salt_pepper",
        }
    }
}

/// Role of a grid within an [`ArtifactSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Enhanced,
    Noisy(NoiseModel),
    Filtered(MeanFilter),
}

impl ArtifactKind {
    /// Prefix used in file names and report columns, e.g. `gaussian_noisy`.
    pub fn label(self) -> String {
        match self {
            ArtifactKind::Enhanced => "enhanced".to_string(),
            ArtifactKind::Noisy(model) => format!("{}_noisy", model.name()),
            ArtifactKind::Filtered(filter) => format!("{}_filtered", filter.name()),
        }
    }

    /// Output file name for an input called `source_name` (`X.ext` -> `<label>_X.ext`).
    pub fn file_name(self, source_name: &str) -> String {
        format!("{}_{}", self.label(), source_name)
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

#[derive(Debug, Clone)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub grid: Grid,
}

/// Original grid plus every derived grid, in production order.
#[derive(Debug, Clone)]
pub struct ArtifactSet {
    source_name: String,
    original: Grid,
    artifacts: Vec<Artifact>,
}

impl ArtifactSet {
    pub fn new(source_name: impl Into<String>, original: Grid) -> Self {
        Self {
            source_name: source_name.into(),
            original,
            artifacts: Vec::new(),
        }
    }

    /// Append a derived grid.
    ///
    /// # Panics
    /// If the grid's dimensions differ from the original's: stages must
    /// never reshape a grid.
    pub fn push(&mut self, kind: ArtifactKind, grid: Grid) {
        assert_eq!(
            grid.dim(),
            self.original.dim(),
            "stage `{kind}` changed grid dimensions for {}",
            self.source_name
        );
        self.artifacts.push(Artifact { kind, grid });
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn original(&self) -> ArrayView2<'_, u8> {
        self.original.view()
    }

    pub fn get(&self, kind: ArtifactKind) -> Option<ArrayView2<'_, u8>> {
        self.artifacts
            .iter()
            .find(|artifact| artifact.kind == kind)
            .map(|artifact| artifact.grid.view())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Artifact> {
        self.artifacts.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_names() {
        assert_eq!(ArtifactKind::Enhanced.file_name("cat.png"), "enhanced_cat.png");
        assert_eq!(
            ArtifactKind::Noisy(NoiseModel::Gaussian).file_name("cat.png"),
            "gaussian_noisy_cat.png"
        );
        assert_eq!(
            ArtifactKind::Noisy(NoiseModel::SaltPepper).file_name("scan.TIF"),
            "salt_pepper_noisy_scan.TIF"
        );
        assert_eq!(
            ArtifactKind::Filtered(MeanFilter::Harmonic).file_name("a.jpeg"),
            "harmonic_filtered_a.jpeg"
        );
    }

    #[test]
    fn test_set_lookup_and_order() {
        let mut set = ArtifactSet::new("x.png", Grid::zeros((2, 3)));
        set.push(ArtifactKind::Enhanced, Grid::from_elem((2, 3), 1));
        set.push(ArtifactKind::Filtered(MeanFilter::Arithmetic), Grid::from_elem((2, 3), 2));

        assert_eq!(set.iter().count(), 2);
        assert_eq!(set.get(ArtifactKind::Enhanced).unwrap()[[0, 0]], 1);
        assert!(set.get(ArtifactKind::Noisy(NoiseModel::Gaussian)).is_none());
        let kinds: Vec<_> = set.iter().map(|a| a.kind).collect();
        assert_eq!(
            kinds,
            vec![ArtifactKind::Enhanced, ArtifactKind::Filtered(MeanFilter::Arithmetic)]
        );
    }

    #[test]
    #[should_panic(expected = "changed grid dimensions")]
    fn test_push_rejects_reshaped_grid() {
        let mut set = ArtifactSet::new("x.png", Grid::zeros((2, 3)));
        set.push(ArtifactKind::Enhanced, Grid::zeros((3, 2)));
    }
}
