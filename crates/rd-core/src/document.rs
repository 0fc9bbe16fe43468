//! Persisted document: ordered shapes (back-to-front) plus the viewport.
//!
//! Loading is the only fallible surface of the core. Everything is
//! validated here so the store never sees inconsistent data.

use crate::id::ShapeId;
use crate::model::Shape;
use crate::viewport::Viewport;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("invalid document JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("duplicate shape id `{0}`")]
    DuplicateId(ShapeId),
    #[error("shape `{id}` has invalid {field}: {value}")]
    InvalidGeometry {
        id: ShapeId,
        field: &'static str,
        value: f64,
    },
    #[error("shape `{id}` references missing parent `{parent}`")]
    DanglingParent { id: ShapeId, parent: ShapeId },
    #[error("zoom {zoom} outside [{min}, {max}]")]
    ZoomOutOfRange { zoom: f64, min: f64, max: f64 },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub shapes: Vec<Shape>,
    #[serde(default)]
    pub viewport: Viewport,
}

impl Document {
    /// Parse without range checks on the zoom; see `validate`.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let doc: Document = serde_json::from_str(json)?;
        doc.validate_shapes()?;
        Ok(doc)
    }

    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Full validation, including the viewport zoom against `[min_zoom, max_zoom]`.
    pub fn validate(&self, min_zoom: f64, max_zoom: f64) -> Result<(), DocumentError> {
        self.validate_shapes()?;
        let zoom = self.viewport.zoom;
        if !zoom.is_finite() || zoom < min_zoom || zoom > max_zoom {
            return Err(DocumentError::ZoomOutOfRange {
                zoom,
                min: min_zoom,
                max: max_zoom,
            });
        }
        Ok(())
    }

    fn validate_shapes(&self) -> Result<(), DocumentError> {
        let mut seen = HashSet::with_capacity(self.shapes.len());
        for shape in &self.shapes {
            if !seen.insert(shape.id) {
                return Err(DocumentError::DuplicateId(shape.id));
            }
            for (field, value) in [
                ("x", shape.x),
                ("y", shape.y),
                ("rotation", shape.rotation),
                ("opacity", shape.opacity),
            ] {
                if !value.is_finite() {
                    return Err(DocumentError::InvalidGeometry {
                        id: shape.id,
                        field,
                        value,
                    });
                }
            }
            for (field, value) in [("width", shape.width), ("height", shape.height)] {
                if !value.is_finite() || value < 0.0 {
                    return Err(DocumentError::InvalidGeometry {
                        id: shape.id,
                        field,
                        value,
                    });
                }
            }
        }
        for shape in &self.shapes {
            if let Some(parent) = shape.parent_id
                && !seen.contains(&parent)
            {
                return Err(DocumentError::DanglingParent { id: shape.id, parent });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn json_roundtrip_keeps_order() {
        let doc = Document {
            shapes: vec![
                Shape::rectangle(ShapeId::intern("doc_a"), 0.0, 0.0, 10.0, 10.0),
                Shape::ellipse(ShapeId::intern("doc_b"), 5.0, 5.0, 10.0, 10.0),
            ],
            viewport: Viewport {
                x: 10.0,
                y: 20.0,
                zoom: 1.5,
            },
        };
        let back = Document::from_json(&doc.to_json().unwrap()).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let json = r#"{ "shapes": [
            { "id": "doc_dup", "x": 0, "y": 0, "width": 1, "height": 1, "props": { "type": "ellipse" } },
            { "id": "doc_dup", "x": 0, "y": 0, "width": 1, "height": 1, "props": { "type": "ellipse" } }
        ] }"#;
        assert!(matches!(Document::from_json(json), Err(DocumentError::DuplicateId(_))));
    }

    #[test]
    fn rejects_negative_size() {
        let json = r#"{ "shapes": [
            { "id": "doc_neg", "x": 0, "y": 0, "width": -1, "height": 1, "props": { "type": "ellipse" } }
        ] }"#;
        let err = Document::from_json(json).unwrap_err();
        assert!(matches!(err, DocumentError::InvalidGeometry { field: "width", .. }), "{err}");
    }

    #[test]
    fn rejects_dangling_parent() {
        let json = r#"{ "shapes": [
            { "id": "doc_child", "parentId": "doc_nobody", "x": 0, "y": 0, "width": 1, "height": 1,
              "props": { "type": "rectangle" } }
        ] }"#;
        assert!(matches!(
            Document::from_json(json),
            Err(DocumentError::DanglingParent { .. })
        ));
    }

    #[test]
    fn rejects_bad_json_and_zoom() {
        assert!(matches!(Document::from_json("{"), Err(DocumentError::Json(_))));
        let doc = Document {
            shapes: vec![],
            viewport: Viewport {
                x: 0.0,
                y: 0.0,
                zoom: 50.0,
            },
        };
        assert!(matches!(
            doc.validate(0.1, 10.0),
            Err(DocumentError::ZoomOutOfRange { .. })
        ));
    }
}
