//! Viewer-side playback model built from the animation CSV table.
//!
//! Each object spans consecutive rows: x values, y values and, with
//! [`RowLayout::PositionAndRotation`], rotation values. A row is a label cell plus one
//! cell per frame. Empty and `NaN` cells mean "no keyframe here" and are filled the same
//! way the editor interpolates. Ingestion stops at the first row of a different width.

use log::{debug, warn};

use crate::angle::Angle;
use crate::config::KEYFRAMES;
use crate::coordinate::Coordinate;
use crate::error::AnimationError;
use crate::interp::{fill_gaps, sample_series, GapMode};

/// Label column plus one column per frame.
pub const ROW_WIDTH: usize = KEYFRAMES + 1;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RowLayout {
    PositionOnly,
    #[default]
    PositionAndRotation,
}

impl RowLayout {
    fn rows_per_object(self) -> usize {
        match self {
            RowLayout::PositionOnly => 2,
            RowLayout::PositionAndRotation => 3,
        }
    }
}

/// Dense per-frame tracks of one object.
#[derive(Clone, Debug, PartialEq)]
pub struct PlaybackObject {
    pub id: usize,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub rotation: Vec<f64>,
}

impl PlaybackObject {
    pub fn x_at(&self, frame: f64) -> f64 {
        sample_series(&self.x, frame, GapMode::Linear)
    }

    pub fn y_at(&self, frame: f64) -> f64 {
        sample_series(&self.y, frame, GapMode::Linear)
    }

    pub fn rotation_at(&self, frame: f64) -> Angle {
        Angle::from_radians(sample_series(&self.rotation, frame, GapMode::Angular))
    }

    /// Pose at a fractional frame; the frame is clamped to the timeline.
    pub fn sample(&self, frame: f64) -> (Coordinate, Angle) {
        (
            Coordinate::new(self.x_at(frame), self.y_at(frame)),
            self.rotation_at(frame),
        )
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnimationModel {
    objects: Vec<PlaybackObject>,
}

impl AnimationModel {
    pub fn from_csv_str(text: &str, layout: RowLayout) -> Result<Self, AnimationError> {
        let per_object = layout.rows_per_object();
        let mut pending: Vec<Vec<Option<f64>>> = Vec::with_capacity(per_object);
        let mut objects = Vec::new();

        for (line_no, line) in text.lines().enumerate() {
            let cells: Vec<&str> = line.split(',').collect();
            if cells.len() != ROW_WIDTH {
                if !line.trim().is_empty() {
                    warn!(
                        "csv line {}: {} cell(s), expected {ROW_WIDTH}; stopping",
                        line_no + 1,
                        cells.len()
                    );
                }
                break;
            }
            let values = cells[1..]
                .iter()
                .map(|cell| parse_cell(cell, line_no + 1))
                .collect::<Result<Vec<_>, _>>()?;
            pending.push(values);
            if pending.len() == per_object {
                objects.push(build_object(objects.len(), &pending));
                pending.clear();
            }
        }
        if !pending.is_empty() {
            // A partial trailing object keeps the rows it has; missing tracks are zero.
            objects.push(build_object(objects.len(), &pending));
        }

        debug!("loaded {} playback object(s)", objects.len());
        Ok(Self { objects })
    }

    pub fn objects(&self) -> &[PlaybackObject] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn object(&self, id: usize) -> Option<&PlaybackObject> {
        self.objects.get(id)
    }

    pub fn sample(&self, id: usize, frame: f64) -> Option<(Coordinate, Angle)> {
        self.object(id).map(|o| o.sample(frame))
    }
}

fn parse_cell(cell: &str, line: usize) -> Result<Option<f64>, AnimationError> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Ok(None);
    }
    let value: f64 = cell.parse().map_err(|_| AnimationError::Csv {
        line,
        reason: format!("{cell:?} is not a number"),
    })?;
    Ok((!value.is_nan()).then_some(value))
}

fn build_object(id: usize, rows: &[Vec<Option<f64>>]) -> PlaybackObject {
    let empty = vec![None; KEYFRAMES];
    let row = |i: usize| rows.get(i).unwrap_or(&empty);
    PlaybackObject {
        id,
        x: fill_gaps(row(0), GapMode::Linear),
        y: fill_gaps(row(1), GapMode::Linear),
        rotation: fill_gaps(row(2), GapMode::Angular),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(label: &str, cells: &[(usize, &str)]) -> String {
        let mut out = vec![String::new(); KEYFRAMES];
        for &(i, v) in cells {
            out[i] = v.to_string();
        }
        format!("{label},{}", out.join(","))
    }

    #[test]
    fn fills_and_samples_position_only_rows() {
        let csv = [
            row("x", &[(0, "0"), (10, "100")]),
            row("y", &[(5, "NaN"), (10, "20")]),
        ]
        .join("\n");
        let model = AnimationModel::from_csv_str(&csv, RowLayout::PositionOnly).unwrap();
        assert_eq!(model.len(), 1);
        let obj = model.object(0).unwrap();
        assert_eq!(obj.x[5], 50.0);
        assert_eq!(obj.x[63], 100.0);
        assert_eq!(obj.y[0], 20.0);
        assert_eq!(obj.rotation, vec![0.0; KEYFRAMES]);

        let (pos, rot) = model.sample(0, 2.5).unwrap();
        assert_eq!(pos, Coordinate::new(25.0, 20.0));
        assert_eq!(rot, Angle::ZERO);
        assert_eq!(model.sample(0, 99.0).unwrap().0, Coordinate::new(100.0, 20.0));
        assert!(model.sample(1, 0.0).is_none());
    }

    #[test]
    fn stops_at_first_short_row() {
        let csv = format!(
            "{}\n{}\n{}\nbroken,1,2\n{}\n",
            row("x", &[(0, "1")]),
            row("y", &[(0, "2")]),
            row("rotation", &[]),
            row("x", &[(0, "9")]),
        );
        let model = AnimationModel::from_csv_str(&csv, RowLayout::PositionAndRotation).unwrap();
        assert_eq!(model.len(), 1);
    }

    #[test]
    fn garbage_cells_are_reported_with_line() {
        let csv = row("x", &[(3, "abc")]);
        assert_eq!(
            AnimationModel::from_csv_str(&csv, RowLayout::PositionOnly).unwrap_err(),
            AnimationError::Csv {
                line: 1,
                reason: "\"abc\" is not a number".into()
            }
        );
    }
}
