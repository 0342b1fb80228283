//! Matrix editor operations.
//!
//! Every operation keeps the grid rectangular: a column change touches every
//! row, and a new row is created with one cell per column. Levels are
//! positional, so removing a column renumbers the ones after it.

use crate::error::EditError;
use crate::model::{Column, NumericInput, Row, RubricMatrix};

/// Which half of a cell an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellField {
    Description,
    Score,
}

/// Which criterion attribute an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowField {
    CriteriaName,
    Weight,
}

impl RubricMatrix {
    /// Append a level and an empty cell for it on every criterion.
    pub fn add_column(&mut self) {
        let level = self.columns.len() as u32 + 1;
        self.columns.push(Column { level });
        for row in &mut self.rows {
            row.cells.push(Default::default());
        }
    }

    /// Remove the level at `index` and its cell on every criterion.
    ///
    /// The last remaining level cannot be removed.
    pub fn remove_column(&mut self, index: usize) -> Result<(), EditError> {
        let len = self.columns.len();
        if index >= len {
            return Err(EditError::ColumnOutOfRange { index, len });
        }
        if len == 1 {
            return Err(EditError::LastColumn);
        }
        self.columns.remove(index);
        for row in &mut self.rows {
            row.cells.remove(index);
        }
        self.renumber_levels();
        Ok(())
    }

    /// Append a blank criterion.
    pub fn add_row(&mut self) {
        self.rows.push(Row::blank(self.columns.len()));
    }

    /// Remove the criterion at `index`. A rubric may end up with no criteria.
    pub fn remove_row(&mut self, index: usize) -> Result<Row, EditError> {
        let len = self.rows.len();
        if index >= len {
            return Err(EditError::RowOutOfRange { index, len });
        }
        Ok(self.rows.remove(index))
    }

    pub fn update_cell(
        &mut self,
        row: usize,
        column: usize,
        field: CellField,
        value: impl Into<String>,
    ) -> Result<(), EditError> {
        let rows = self.rows.len();
        let columns = self.columns.len();
        let cell = self
            .rows
            .get_mut(row)
            .ok_or(EditError::RowOutOfRange {
                index: row,
                len: rows,
            })?
            .cells
            .get_mut(column)
            .ok_or(EditError::ColumnOutOfRange {
                index: column,
                len: columns,
            })?;

        match field {
            CellField::Description => cell.description = value.into(),
            CellField::Score => cell.score = NumericInput::new(value),
        }
        Ok(())
    }

    pub fn update_row_meta(
        &mut self,
        row: usize,
        field: RowField,
        value: impl Into<String>,
    ) -> Result<(), EditError> {
        let len = self.rows.len();
        let target = self
            .rows
            .get_mut(row)
            .ok_or(EditError::RowOutOfRange { index: row, len })?;

        match field {
            RowField::CriteriaName => target.criteria_name = value.into(),
            RowField::Weight => target.weight = NumericInput::new(value),
        }
        Ok(())
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn set_total_score(&mut self, total: impl Into<String>) {
        self.total_score = NumericInput::new(total);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Cell;

    fn levels(m: &RubricMatrix) -> Vec<u32> {
        m.columns().iter().map(|c| c.level).collect()
    }

    #[test]
    fn add_column_twice_from_empty() {
        let mut m = RubricMatrix::empty();
        m.add_column();
        m.add_column();
        assert_eq!(m.column_count(), 3);
        assert_eq!(levels(&m), vec![1, 2, 3]);
        for row in m.rows() {
            assert_eq!(row.cells().len(), 3);
            for cell in row.cells() {
                assert_eq!(cell.score.as_str(), "");
                assert_eq!(cell.description, "");
            }
        }
    }

    #[test]
    fn add_then_remove_last_column_restores_matrix() {
        let mut m = RubricMatrix::empty();
        m.add_column();
        m.add_row();
        m.update_cell(0, 1, CellField::Description, "good").unwrap();
        m.update_cell(1, 0, CellField::Score, "3").unwrap();
        let before = m.clone();

        m.add_column();
        let last = m.column_count() - 1;
        m.remove_column(last).unwrap();
        assert_eq!(m, before);
    }

    #[test]
    fn remove_column_renumbers_levels() {
        let mut m = RubricMatrix::empty();
        m.add_column();
        m.add_column();
        m.update_cell(0, 2, CellField::Description, "third").unwrap();

        m.remove_column(0).unwrap();
        assert_eq!(levels(&m), vec![1, 2]);
        assert_eq!(m.cell(0, 1).unwrap().description, "third");
        assert!(m.is_rectangular());
    }

    #[test]
    fn remove_last_remaining_column_is_rejected() {
        let mut m = RubricMatrix::empty();
        assert_eq!(m.remove_column(0), Err(EditError::LastColumn));
        assert_eq!(m.column_count(), 1);
        assert_eq!(m.rows()[0].cells().len(), 1);
    }

    #[test]
    fn remove_column_out_of_range() {
        let mut m = RubricMatrix::empty();
        m.add_column();
        assert_eq!(
            m.remove_column(5),
            Err(EditError::ColumnOutOfRange { index: 5, len: 2 })
        );
    }

    #[test]
    fn add_row_matches_column_count() {
        let mut m = RubricMatrix::empty();
        m.add_column();
        m.add_column();
        m.add_row();
        assert_eq!(m.row_count(), 2);
        assert_eq!(m.rows()[1].cells().len(), 3);
        assert_eq!(m.rows()[1].criteria_name, "");
        assert!(m.rows()[1].weight.is_blank());
    }

    #[test]
    fn remove_every_row() {
        let mut m = RubricMatrix::empty();
        m.add_row();
        m.remove_row(1).unwrap();
        m.remove_row(0).unwrap();
        assert_eq!(m.row_count(), 0);
        assert_eq!(
            m.remove_row(0),
            Err(EditError::RowOutOfRange { index: 0, len: 0 })
        );
        // Columns survive and new rows still get the right width.
        m.add_column();
        m.add_row();
        assert_eq!(m.rows()[0].cells().len(), 2);
    }

    #[test]
    fn update_cell_touches_only_target() {
        let mut m = RubricMatrix::empty();
        m.add_column();
        m.add_row();
        m.update_cell(1, 1, CellField::Score, "7").unwrap();
        m.update_cell(1, 1, CellField::Description, "solid").unwrap();

        assert_eq!(m.cell(1, 1), Some(&Cell::new("solid", "7")));
        assert_eq!(m.cell(0, 0), Some(&Cell::default()));
        assert_eq!(m.cell(0, 1), Some(&Cell::default()));
        assert_eq!(m.cell(1, 0), Some(&Cell::default()));
    }

    #[test]
    fn update_cell_out_of_range() {
        let mut m = RubricMatrix::empty();
        assert_eq!(
            m.update_cell(0, 3, CellField::Score, "1"),
            Err(EditError::ColumnOutOfRange { index: 3, len: 1 })
        );
        assert_eq!(
            m.update_cell(2, 0, CellField::Score, "1"),
            Err(EditError::RowOutOfRange { index: 2, len: 1 })
        );
    }

    #[test]
    fn update_row_meta_sets_name_and_weight() {
        let mut m = RubricMatrix::empty();
        m.update_row_meta(0, RowField::CriteriaName, "Thesis").unwrap();
        m.update_row_meta(0, RowField::Weight, "25").unwrap();
        assert_eq!(m.rows()[0].criteria_name, "Thesis");
        assert_eq!(m.rows()[0].weight.value(), Some(25.0));
    }

    #[test]
    fn rectangular_after_mixed_operations() {
        let mut m = RubricMatrix::empty();
        let ops: [fn(&mut RubricMatrix); 8] = [
            |m| m.add_column(),
            |m| m.add_row(),
            |m| m.add_row(),
            |m| {
                let _ = m.remove_column(0);
            },
            |m| m.add_column(),
            |m| {
                let _ = m.remove_row(1);
            },
            |m| m.add_column(),
            |m| {
                let last = m.column_count() - 1;
                let _ = m.remove_column(last);
            },
        ];
        for _ in 0..3 {
            for op in ops {
                op(&mut m);
                assert!(m.is_rectangular());
                assert!(m.column_count() >= 1);
            }
        }
    }
}
