// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Find the cheapest seam through a cost field
//!
//! Standard dynamic programming over lines.  For every cell the path
//! table holds the cheapest cumulative cost of any seam reaching it
//! and the offset (within `±max_shift`) of the cell on the previous
//! line that seam came from:
//!
//! ```text
//!   M(row, 0)    = cost(row, 0)
//!   M(row, line) = cost(row, line) + min  M(row + i, line - 1),  -s <= i <= s
//! ```
//!
//! Ties go to the first candidate in scan order, both for the offsets
//! (ascending `i`) and for the endpoint on the last line (lowest row),
//! so for a fixed cost field the seam is fully determined.

use crate::energy::CostField;
use crate::error::{CarveError, Result};
use crate::twodmap::TwoDimensionalMap;
use itertools::Itertools;
use log::trace;

#[derive(Default, Debug, Copy, Clone, PartialEq)]
pub(crate) struct CostAndBackOffset {
    pub cost: f64,
    pub prev_offset: isize,
}

/// Cumulative costs and back offsets, indexed `(row, line)`.
pub(crate) type PathCostTable = TwoDimensionalMap<CostAndBackOffset>;

/// A seam: for every line, the row where the two merged pixels
/// start.
#[derive(Debug, Clone, PartialEq)]
pub struct Seam {
    pub rows: Vec<usize>,
    /// Sum of the field's costs along `rows`.
    pub cost: f64,
}

impl Seam {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Check the seam's shape against the field it was cut from: one
    /// entry per line, every entry a valid row, and neighbours no more
    /// than `max_shift` apart.
    pub fn validate(&self, width: usize, height: usize, max_shift: usize) -> Result<()> {
        if self.rows.len() != height {
            return Err(CarveError::invariant(format!(
                "seam has {} entries for {} lines",
                self.rows.len(),
                height
            )));
        }
        if let Some(row) = self.rows.iter().find(|&&row| row >= width) {
            return Err(CarveError::invariant(format!(
                "seam row {} outside a field {} rows wide",
                row, width
            )));
        }
        let jump = self
            .rows
            .iter()
            .tuple_windows()
            .position(|(a, b)| (*a as isize - *b as isize).abs() as usize > max_shift);
        if let Some(line) = jump {
            return Err(CarveError::invariant(format!(
                "seam jumps more than {} rows after line {}",
                max_shift, line
            )));
        }
        Ok(())
    }
}

/// Finds minimum-cost seams with a bounded per-line shift.
#[derive(Debug, Clone, Copy)]
pub struct SeamSolver {
    pub max_shift: usize,
}

impl Default for SeamSolver {
    fn default() -> Self {
        SeamSolver { max_shift: 1 }
    }
}

impl SeamSolver {
    pub fn new(max_shift: usize) -> Self {
        SeamSolver { max_shift }
    }

    /// Return the cheapest seam through `field`.  The field must have
    /// at least one row and one line.
    pub fn find_seam(&self, field: &CostField) -> Result<Seam> {
        let table = self.path_costs(field)?;
        let (width, height) = (table.width(), table.height());

        // Find the row of the cheapest seam ending on the last line.
        let last = table.line(height - 1);
        let mut end = 0;
        for row in 1..width {
            if last[row].cost < last[end].cost {
                end = row;
            }
        }
        let cost = last[end].cost;

        // Working backwards, follow the offsets up to the first line.
        let mut rows = vec![0; height];
        rows[height - 1] = end;
        for line in (0..height - 1).rev() {
            let below = rows[line + 1];
            let row = below as isize + table[(below, line + 1)].prev_offset;
            if row < 0 || row as usize >= width {
                return Err(CarveError::invariant(format!(
                    "backtrack left the field at line {} (row {})",
                    line, row
                )));
            }
            rows[line] = row as usize;
        }

        trace!("seam ends at row {} with cost {}", end, cost);
        Ok(Seam { rows, cost })
    }

    // Sequential by necessity: every line needs all of the previous one.
    pub(crate) fn path_costs(&self, field: &CostField) -> Result<PathCostTable> {
        let (width, height) = (field.width(), field.height());
        if width < 1 || height < 1 {
            return Err(CarveError::config(format!(
                "no seam through an empty {}x{} cost field",
                width, height
            )));
        }

        // Offsets past the edge of the field never land anywhere.
        let shift = self.max_shift.min(width - 1) as isize;
        let mut table = PathCostTable::new(width, height, CostAndBackOffset::default());

        for row in 0..width {
            table[(row, 0)] = CostAndBackOffset {
                cost: field[(row, 0)],
                prev_offset: 0,
            };
        }

        for line in 1..height {
            for row in 0..width {
                let mut best = CostAndBackOffset {
                    cost: std::f64::INFINITY,
                    prev_offset: 0,
                };
                for i in -shift..=shift {
                    let from = row as isize + i;
                    if from < 0 || from >= width as isize {
                        continue;
                    }
                    let candidate = table[(from as usize, line - 1)].cost;
                    if candidate < best.cost {
                        best = CostAndBackOffset {
                            cost: candidate,
                            prev_offset: i,
                        };
                    }
                }
                best.cost += field[(row, line)];
                table[(row, line)] = best;
            }
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COSTS: [f64; 20] = [
        9.0, 9.0, 0.0, 9.0, 9.0, //
        9.0, 1.0, 9.0, 8.0, 9.0, //
        9.0, 9.0, 9.0, 9.0, 0.0, //
        9.0, 9.0, 9.0, 0.0, 9.0,
    ];

    fn field(width: usize, height: usize, costs: &[f64]) -> CostField {
        CostField::from_vec(width, height, costs.to_vec()).unwrap()
    }

    fn seam_cost(field: &CostField, seam: &Seam) -> f64 {
        seam.rows
            .iter()
            .enumerate()
            .map(|(line, &row)| field[(row, line)])
            .sum()
    }

    #[test]
    fn cheapest_seam_with_unit_shift() {
        let f = field(5, 4, &COSTS);
        let seam = SeamSolver::default().find_seam(&f).unwrap();
        assert_eq!(seam.rows, vec![2, 3, 4, 3]);
        assert_eq!(seam.cost, 8.0);
        assert_eq!(seam.cost, seam_cost(&f, &seam));
    }

    #[test]
    fn zero_shift_only_walks_straight_down() {
        let f = field(5, 4, &COSTS);
        let seam = SeamSolver::new(0).find_seam(&f).unwrap();
        assert!(seam.rows.iter().all(|&r| r == seam.rows[0]));
        // Column sums: 36, 28, 27, 26, 27
        assert_eq!(seam.rows[0], 3);
        assert_eq!(seam.cost, 26.0);
    }

    #[test]
    fn wider_shift_reaches_further() {
        let f = field(5, 2, &[0.0, 9.0, 9.0, 9.0, 9.0, 9.0, 9.0, 0.0, 9.0, 9.0]);
        let narrow = SeamSolver::default().find_seam(&f).unwrap();
        assert_eq!(narrow.cost, 9.0);
        let wide = SeamSolver::new(2).find_seam(&f).unwrap();
        assert_eq!(wide.rows, vec![0, 2]);
        assert_eq!(wide.cost, 0.0);
        wide.validate(5, 2, 2).unwrap();
    }

    #[test]
    fn huge_shift_behaves_like_the_field_width() {
        let f = field(3, 2, &[9.0, 0.0, 9.0, 9.0, 9.0, 0.0]);
        let seam = SeamSolver::new(usize::MAX).find_seam(&f).unwrap();
        assert_eq!(seam.rows, vec![1, 2]);
        assert_eq!(seam.cost, 0.0);
        assert_eq!(seam, SeamSolver::new(2).find_seam(&f).unwrap());
        seam.validate(3, 2, usize::MAX).unwrap();
    }

    #[test]
    fn ties_go_to_the_lowest_row_and_offset() {
        let f = field(3, 3, &[1.0; 9]);
        let seam = SeamSolver::default().find_seam(&f).unwrap();
        assert_eq!(seam.rows, vec![0, 0, 0]);

        // Row 1 on line 1 can come from row 0 or row 2 at equal cost;
        // the smaller offset (-1) wins.
        let f = field(3, 2, &[1.0, 5.0, 1.0, 9.0, 0.0, 9.0]);
        let table = SeamSolver::default().path_costs(&f).unwrap();
        assert_eq!(table[(1, 1)].prev_offset, -1);
        let seam = SeamSolver::default().find_seam(&f).unwrap();
        assert_eq!(seam.rows, vec![0, 1]);
    }

    #[test]
    fn single_row_field() {
        let f = field(1, 3, &[0.5, 0.25, 2.0]);
        let seam = SeamSolver::default().find_seam(&f).unwrap();
        assert_eq!(seam.rows, vec![0, 0, 0]);
        assert_eq!(seam.cost, 2.75);
    }

    #[test]
    fn empty_field_is_a_configuration_error() {
        let f = field(0, 3, &[]);
        match SeamSolver::default().find_seam(&f) {
            Err(CarveError::Configuration(_)) => {}
            other => panic!("expected a configuration error, got {:?}", other),
        }
    }

    #[test]
    fn validate_rejects_bad_seams() {
        let ok = Seam {
            rows: vec![1, 2, 2, 1],
            cost: 0.0,
        };
        ok.validate(3, 4, 1).unwrap();
        assert!(ok.validate(3, 5, 1).is_err());
        assert!(ok.validate(2, 4, 1).is_err());
        let jumpy = Seam {
            rows: vec![0, 2],
            cost: 0.0,
        };
        assert!(jumpy.validate(3, 2, 1).is_err());
        jumpy.validate(3, 2, 2).unwrap();
    }
}
