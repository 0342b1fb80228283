//! Mapping between the editing matrix and the backend rubric document.
//!
//! The backend stores a rubric as a list of criteria, each with its own list
//! of levels. The matrix flattens that into a grid; these functions translate
//! in both directions and perform no I/O.

use serde::{Deserialize, Serialize};

use crate::error::ShapeError;
use crate::model::{Cell, NumericInput, Row, RubricMatrix};

/// Body of `POST /rubric/create` and `PUT /rubric/update/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RubricCreateRequest {
    pub title: String,
    pub description: String,
    pub score: f64,
    pub criteria: Vec<CriterionPayload>,
    /// Owning section, sent on create.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionPayload {
    pub name: String,
    pub weight: f64,
    pub levels: Vec<LevelPayload>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelPayload {
    pub level: u32,
    pub description: String,
    pub score: f64,
}

/// A persisted rubric as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RubricDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(default)]
    pub criteria: Vec<CriterionDocument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionDocument {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub levels: Vec<LevelDocument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDocument {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub level: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub score: f64,
}

impl CriterionDocument {
    /// Levels ordered by their level number; ties keep stored order.
    pub fn ordered_levels(&self) -> Vec<&LevelDocument> {
        let mut levels: Vec<&LevelDocument> = self.levels.iter().collect();
        levels.sort_by_key(|l| l.level);
        levels
    }

    /// Highest score any level of this criterion awards.
    pub fn max_score(&self) -> f64 {
        self.levels
            .iter()
            .map(|l| l.score)
            .fold(None, |acc: Option<f64>, s| Some(acc.map_or(s, |a| a.max(s))))
            .unwrap_or(0.0)
    }
}

/// Flatten a matrix into the create/update request body.
pub fn to_payload(matrix: &RubricMatrix) -> RubricCreateRequest {
    let criteria = matrix
        .rows()
        .iter()
        .map(|row| CriterionPayload {
            name: row.criteria_name.clone(),
            weight: row.weight.or_zero(),
            levels: row
                .cells()
                .iter()
                .enumerate()
                .map(|(i, cell)| LevelPayload {
                    level: i as u32 + 1,
                    description: cell.description.clone(),
                    score: cell.score.or_zero(),
                })
                .collect(),
        })
        .collect();

    RubricCreateRequest {
        title: matrix.title.clone(),
        description: matrix.description.clone(),
        score: matrix.total_score.or_zero(),
        criteria,
        section: None,
    }
}

/// Rebuild an editable matrix from a persisted rubric.
///
/// The level count of the first criterion defines the columns; a rubric with
/// no criteria gets a single column and no rows.
pub fn from_response(doc: &RubricDocument) -> Result<RubricMatrix, ShapeError> {
    let column_count = match doc.criteria.first() {
        None => 1,
        Some(first) if first.levels.is_empty() => {
            return Err(ShapeError::NoLevels {
                criterion: 0,
                name: first.name.clone(),
            })
        }
        Some(first) => first.levels.len(),
    };

    let rows = doc
        .criteria
        .iter()
        .enumerate()
        .map(|(i, criterion)| {
            if criterion.levels.len() != column_count {
                return Err(ShapeError::Ragged {
                    criterion: i,
                    name: criterion.name.clone(),
                    expected: column_count,
                    found: criterion.levels.len(),
                });
            }
            let cells = criterion
                .ordered_levels()
                .into_iter()
                .map(|level| {
                    Cell::new(
                        level.description.clone(),
                        NumericInput::from_number(level.score),
                    )
                })
                .collect();
            Ok(Row::with_cells(
                criterion.name.clone(),
                NumericInput::from_number(criterion.weight),
                cells,
            ))
        })
        .collect::<Result<Vec<_>, _>>()?;

    RubricMatrix::from_rows(
        doc.title.clone(),
        doc.description.clone(),
        NumericInput::from_number(doc.score),
        column_count,
        rows,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::{CellField, RowField};

    fn sample_doc() -> RubricDocument {
        serde_json::from_value(serde_json::json!({
            "_id": "r1",
            "title": "Lab report",
            "description": "Weekly lab",
            "score": 50,
            "section": "s1",
            "criteria": [
                {
                    "_id": "c1",
                    "name": "Method",
                    "weight": 30,
                    "levels": [
                        {"_id": "l2", "level": 2, "description": "partial", "score": 1.5},
                        {"_id": "l1", "level": 1, "description": "complete", "score": 3}
                    ]
                },
                {
                    "_id": "c2",
                    "name": "Results",
                    "weight": 20,
                    "levels": [
                        {"_id": "l3", "level": 1, "description": "correct", "score": 4},
                        {"_id": "l4", "level": 2, "description": "wrong", "score": 0}
                    ]
                }
            ],
            "createdAt": "2024-01-01T00:00:00Z"
        }))
        .unwrap()
    }

    #[test]
    fn to_payload_maps_levels_by_position() {
        let mut m = RubricMatrix::empty();
        m.add_column();
        m.update_row_meta(0, RowField::CriteriaName, "A").unwrap();
        m.update_row_meta(0, RowField::Weight, "20").unwrap();
        m.update_cell(0, 0, CellField::Score, "5").unwrap();
        m.update_cell(0, 0, CellField::Description, "x").unwrap();
        m.update_cell(0, 1, CellField::Score, "0").unwrap();
        m.update_cell(0, 1, CellField::Description, "y").unwrap();

        let payload = to_payload(&m);
        assert_eq!(
            payload.criteria,
            vec![CriterionPayload {
                name: "A".into(),
                weight: 20.0,
                levels: vec![
                    LevelPayload {
                        level: 1,
                        description: "x".into(),
                        score: 5.0
                    },
                    LevelPayload {
                        level: 2,
                        description: "y".into(),
                        score: 0.0
                    },
                ],
            }]
        );
    }

    #[test]
    fn to_payload_coerces_invalid_numbers_to_zero() {
        let mut m = RubricMatrix::empty();
        m.set_total_score("lots");
        m.update_row_meta(0, RowField::Weight, "").unwrap();
        m.update_cell(0, 0, CellField::Score, "n/a").unwrap();

        let payload = to_payload(&m);
        assert_eq!(payload.score, 0.0);
        assert_eq!(payload.criteria[0].weight, 0.0);
        assert_eq!(payload.criteria[0].levels[0].score, 0.0);
    }

    #[test]
    fn payload_json_omits_missing_section() {
        let json = serde_json::to_value(to_payload(&RubricMatrix::empty())).unwrap();
        assert!(json.get("section").is_none());
        assert_eq!(json["criteria"][0]["levels"][0]["level"], 1);
    }

    #[test]
    fn from_response_orders_levels_by_number() {
        let m = from_response(&sample_doc()).unwrap();
        assert_eq!(m.title, "Lab report");
        assert_eq!(m.total_score.as_str(), "50");
        assert_eq!(m.column_count(), 2);
        assert_eq!(m.row_count(), 2);
        assert_eq!(m.cell(0, 0), Some(&Cell::new("complete", "3")));
        assert_eq!(m.cell(0, 1), Some(&Cell::new("partial", "1.5")));
        assert_eq!(m.rows()[1].weight.as_str(), "20");
    }

    #[test]
    fn from_response_without_criteria_has_one_column() {
        let mut doc = sample_doc();
        doc.criteria.clear();
        let m = from_response(&doc).unwrap();
        assert_eq!(m.column_count(), 1);
        assert_eq!(m.row_count(), 0);
    }

    #[test]
    fn from_response_rejects_ragged_criteria() {
        let mut doc = sample_doc();
        doc.criteria[1].levels.pop();
        let err = from_response(&doc).unwrap_err();
        assert_eq!(
            err,
            ShapeError::Ragged {
                criterion: 1,
                name: "Results".into(),
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn from_response_rejects_levelless_first_criterion() {
        let mut doc = sample_doc();
        doc.criteria[0].levels.clear();
        assert!(matches!(
            from_response(&doc),
            Err(ShapeError::NoLevels { criterion: 0, .. })
        ));
    }

    #[test]
    fn round_trip_preserves_weights_scores_descriptions() {
        let doc = sample_doc();
        let payload = to_payload(&from_response(&doc).unwrap());

        assert_eq!(payload.title, doc.title);
        assert_eq!(payload.score, doc.score);
        for (sent, stored) in payload.criteria.iter().zip(&doc.criteria) {
            assert_eq!(sent.name, stored.name);
            assert_eq!(sent.weight, stored.weight);
            let stored_levels = stored.ordered_levels();
            assert_eq!(sent.levels.len(), stored_levels.len());
            for (a, b) in sent.levels.iter().zip(stored_levels) {
                assert_eq!(a.score, b.score);
                assert_eq!(a.description, b.description);
            }
        }
    }

    #[test]
    fn max_score_picks_best_level() {
        let doc = sample_doc();
        assert_eq!(doc.criteria[0].max_score(), 3.0);
        let empty = CriterionDocument {
            id: None,
            name: "none".into(),
            weight: 0.0,
            levels: vec![],
        };
        assert_eq!(empty.max_score(), 0.0);
    }
}
