//! File-based visual reports for an [`ArtifactSet`].
//!
//! - **Montage**: original and every artifact tiled side by side
//! - **Histogram table**: per-intensity pixel counts as CSV

use std::io;

use ndarray::{s, Array2};

use super::artifacts::ArtifactSet;
use crate::filters::{histogram, Grid};

/// Tiles per montage row.
pub const MONTAGE_COLUMNS: usize = 4;
/// White gap between tiles, in pixels.
pub const MONTAGE_GUTTER: usize = 4;

/// Tile the original followed by every artifact, row-major.
pub fn montage(set: &ArtifactSet) -> Grid {
    let original = set.original();
    let (tile_h, tile_w) = original.dim();
    let tiles: Vec<_> = std::iter::once(original)
        .chain(set.iter().map(|artifact| artifact.grid.view()))
        .collect();

    let cols = tiles.len().min(MONTAGE_COLUMNS);
    let rows = tiles.len().div_ceil(MONTAGE_COLUMNS);
    let height = rows * tile_h + (rows - 1) * MONTAGE_GUTTER;
    let width = cols * tile_w + (cols - 1) * MONTAGE_GUTTER;

    let mut canvas = Array2::<u8>::from_elem((height, width), 255);
    for (i, tile) in tiles.iter().enumerate() {
        let y0 = (i / MONTAGE_COLUMNS) * (tile_h + MONTAGE_GUTTER);
        let x0 = (i % MONTAGE_COLUMNS) * (tile_w + MONTAGE_GUTTER);
        canvas
            .slice_mut(s![y0..y0 + tile_h, x0..x0 + tile_w])
            .assign(tile);
    }
    canvas
}

/// Write one row per intensity and one column per grid, headed
/// `intensity,original,<artifact labels...>`.
pub fn write_histogram_csv<W: io::Write>(
    set: &ArtifactSet,
    wtr: &mut csv::Writer<W>,
) -> csv::Result<()> {
    let mut columns = vec![("original".to_string(), histogram(&set.original()))];
    columns.extend(
        set.iter()
            .map(|artifact| (artifact.kind.label(), histogram(&artifact.grid.view()))),
    );

    wtr.write_record(
        std::iter::once("intensity").chain(columns.iter().map(|(label, _)| label.as_str())),
    )?;

    for intensity in 0..256 {
        let mut record = vec![intensity.to_string()];
        record.extend(columns.iter().map(|(_, hist)| hist[intensity].to_string()));
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::MeanFilter;
    use crate::pipeline::artifacts::{ArtifactKind, NoiseModel};

    fn sample_set(extra: usize) -> ArtifactSet {
        let mut set = ArtifactSet::new("x.png", Grid::from_elem((3, 2), 7));
        let kinds = [
            ArtifactKind::Enhanced,
            ArtifactKind::Noisy(NoiseModel::Gaussian),
            ArtifactKind::Noisy(NoiseModel::SaltPepper),
            ArtifactKind::Filtered(MeanFilter::Arithmetic),
            ArtifactKind::Filtered(MeanFilter::Geometric),
            ArtifactKind::Filtered(MeanFilter::Harmonic),
        ];
        for (i, kind) in kinds.into_iter().take(extra).enumerate() {
            set.push(kind, Grid::from_elem((3, 2), i as u8 * 10));
        }
        set
    }

    #[test]
    fn test_montage_layout() {
        // Original + 6 artifacts = 7 tiles -> 2 rows of 4 columns
        let canvas = montage(&sample_set(6));
        assert_eq!(canvas.dim(), (2 * 3 + MONTAGE_GUTTER, 4 * 2 + 3 * MONTAGE_GUTTER));

        // First tile is the original
        assert_eq!(canvas[[0, 0]], 7);
        // Second tile starts after one gutter
        assert_eq!(canvas[[0, 2 + MONTAGE_GUTTER]], 0);
        // Gutter stays white
        assert_eq!(canvas[[0, 2]], 255);
        // Empty trailing slot stays white
        assert_eq!(canvas[[3 + MONTAGE_GUTTER, 3 * (2 + MONTAGE_GUTTER)]], 255);
    }

    #[test]
    fn test_montage_single_tile() {
        let canvas = montage(&sample_set(0));
        assert_eq!(canvas.dim(), (3, 2));
    }

    #[test]
    fn test_histogram_csv_shape() {
        let mut wtr = csv::Writer::from_writer(vec![]);
        write_histogram_csv(&sample_set(2), &mut wtr).unwrap();
        let text = String::from_utf8(wtr.into_inner().unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 257);
        assert_eq!(lines[0], "intensity,original,enhanced,gaussian_noisy");
        // All six original pixels are 7; the enhanced grid is all 0
        assert_eq!(lines[1], "0,0,6,0");
        assert_eq!(lines[8], "7,6,0,0");
        assert_eq!(lines[11], "10,0,0,6");
    }

    #[test]
    fn test_histogram_csv_reads_back() {
        let mut wtr = csv::Writer::from_writer(vec![]);
        write_histogram_csv(&sample_set(6), &mut wtr).unwrap();
        let bytes = wtr.into_inner().unwrap();

        let mut rdr = csv::Reader::from_reader(bytes.as_slice());
        assert_eq!(rdr.headers().unwrap().len(), 8);
        let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 256);
        // Each column sums to the pixel count
        for col in 1..8 {
            let total: u64 = rows.iter().map(|r| r[col].parse::<u64>().unwrap()).sum();
            assert_eq!(total, 6);
        }
    }
}
