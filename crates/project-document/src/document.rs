//! Typed project documents.
//!
//! A project document is the complete JSON representation of a Microreact
//! project. Only the fields this crate reasons about are typed; everything
//! else is kept in flattened `extra` maps so that a document fetched from the
//! service is written back verbatim apart from the entries added locally.
//! Optional members are [`Field`]s or `Option`s skipped when absent, so a
//! left-out key stays left out and an explicit `null` stays `null`. Mappings
//! keep the order the service sent them in.
//!
//! `trees` is modelled as an `Option` so that a document created before trees
//! existed (no `trees` key, or `trees: null`) stays distinguishable from one
//! whose tree mapping is present but empty.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::DocumentError;
use crate::field::Field;

/// Content type that makes the service load a file as a Newick tree.
pub const NEWICK_FORMAT: &str = "text/x-nh";

/// Content type for comma-separated tabular data.
pub const CSV_FORMAT: &str = "text/csv";

/// Top-level fields that must be JSON objects when present.
const MAPPING_FIELDS: [&str; 5] = ["files", "datasets", "maps", "tables", "trees"];

/// Identifier-keyed mapping used for every top-level collection, in
/// document order.
pub type RecordMap<T> = IndexMap<String, T>;

/// The root aggregate of a Microreact project.
///
/// # Example
///
/// ```
/// use project_document::ProjectDocument;
///
/// let json = r#"{
///     "files": {},
///     "meta": { "name": "New Project" },
///     "version": 1
/// }"#;
///
/// let document = ProjectDocument::from_json(json).expect("valid document");
/// assert!(document.trees.is_none());
/// assert!(document.datasets.is_none());
/// assert_eq!(document.name(), Some("New Project"));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProjectDocument {
    /// Raw data files keyed by file identifier.
    #[serde(default)]
    pub files: RecordMap<FileRecord>,
    /// Datasets keyed by dataset identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datasets: Option<RecordMap<DatasetRecord>>,
    /// Map views keyed by map identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maps: Option<RecordMap<MapRecord>>,
    /// Metadata tables keyed by table identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tables: Option<RecordMap<TableRecord>>,
    /// Phylogenetic trees keyed by tree identifier; `None` when the document
    /// has no `trees` entry at all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trees: Option<RecordMap<TreeRecord>>,
    /// Document-level metadata.
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub meta: Field<ProjectMeta>,
    /// Format version, opaque to this crate.
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub version: Field<Value>,
    /// Schema URL, opaque to this crate.
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub schema: Field<Value>,
    /// Fields this crate does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A raw file embedded in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// MIME-like content type selecting the loader the service uses.
    pub format: String,
    /// Display file name, also used as the download label.
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub name: Field<String>,
    /// Literal file content.
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub blob: Field<String>,
    /// Fields this crate does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FileRecord {
    /// Build a file record carrying its content inline.
    pub fn inline(format: &str, name: &str, blob: &str) -> Self {
        Self {
            format: format.to_owned(),
            name: name.to_owned().into(),
            blob: blob.to_owned().into(),
            extra: Map::new(),
        }
    }

    /// Return whether the service will load this file as a tree.
    #[must_use]
    pub fn is_tree(&self) -> bool {
        self.format == NEWICK_FORMAT
    }
}

/// A dataset built from one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetRecord {
    /// Identifier of the backing file.
    pub file: String,
    /// Column used as the row key.
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub id_field_name: Field<String>,
    /// Fields this crate does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Map view configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapRecord {
    /// Panel title.
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub title: Field<String>,
    /// How coordinates are derived, e.g. `geographic-coordinates`.
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub data_type: Field<String>,
    /// Coordinate unit, e.g. `decimal-degrees`.
    #[serde(
        rename = "coordinate-unit",
        default,
        skip_serializing_if = "Field::is_absent"
    )]
    pub coordinate_unit: Field<String>,
    /// Column holding latitudes.
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub latitude_field: Field<String>,
    /// Column holding longitudes.
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub longitude_field: Field<String>,
    /// Saved viewport. [`Field::Null`] is an explicit "auto-fit".
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub viewport: Field<Value>,
    /// Fields this crate does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MapRecord {
    /// Return whether the map fits its viewport to the data.
    #[must_use]
    pub fn is_auto_fit(&self) -> bool {
        self.viewport.value().is_none_or(Value::is_null)
    }
}

/// Metadata table configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRecord {
    /// Identifier of the dataset shown.
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub dataset: Field<String>,
    /// Identifier of the backing file.
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub file: Field<String>,
    /// Panel title.
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub title: Field<String>,
    /// Visible columns in display order.
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub columns: Field<Vec<ColumnRecord>>,
    /// Fields this crate does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One visible table column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRecord {
    /// Data field shown in the column.
    pub field: String,
    /// Fields this crate does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ColumnRecord {
    /// Build a column descriptor for `field`.
    pub fn new(field: &str) -> Self {
        Self {
            field: field.to_owned(),
            extra: Map::new(),
        }
    }
}

/// A phylogenetic tree built from one Newick file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeRecord {
    /// Identifier of the Newick file.
    pub file: String,
    /// Data column supplying leaf labels.
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub label_field: Field<String>,
    /// Fields this crate does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Document-level metadata.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProjectMeta {
    /// Display name of the project.
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub name: Field<String>,
    /// Fields this crate does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Which kind of identifier a record refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    /// A key in `files`.
    File,
    /// A key in `datasets`.
    Dataset,
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Dataset => write!(f, "dataset"),
        }
    }
}

/// A record field pointing at an identifier that does not exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingReference {
    /// Mapping holding the referring record.
    pub mapping: &'static str,
    /// Identifier of the referring record.
    pub owner: String,
    /// Kind of identifier referenced.
    pub kind: ReferenceKind,
    /// The unresolved identifier.
    pub target: String,
}

impl fmt::Display for DanglingReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{} -> {} '{}'",
            self.mapping, self.owner, self.kind, self.target
        )
    }
}

impl ProjectDocument {
    /// Display name from `meta.name`, if set.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.meta.value().and_then(|meta| meta.name.as_deref())
    }

    /// Decode a document from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::InvalidDocument`] when the root is not an
    /// object, when `files`, `datasets`, `maps`, `tables` or `trees` is
    /// present but not a mapping (`trees: null` is read as absent), or when
    /// a typed record cannot be decoded.
    pub fn from_value(value: Value) -> Result<Self, DocumentError> {
        let Value::Object(root) = &value else {
            return Err(DocumentError::invalid(
                "document",
                format!("must be an object, found {}", json_kind(&value)),
            ));
        };

        for field in MAPPING_FIELDS {
            match root.get(field) {
                None | Some(Value::Object(_)) => {}
                Some(Value::Null) if field == "trees" => {}
                Some(other) => {
                    return Err(DocumentError::invalid(
                        field,
                        format!("must be a mapping, found {}", json_kind(other)),
                    ));
                }
            }
        }

        serde_json::from_value(value)
            .map_err(|err| DocumentError::invalid("document", err.to_string()))
    }

    /// Decode a document from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::InvalidDocument`] when the text is not JSON or
    /// fails the checks described on [`ProjectDocument::from_value`].
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let value: Value = serde_json::from_str(json)
            .map_err(|err| DocumentError::invalid("document", err.to_string()))?;
        Self::from_value(value)
    }

    /// Encode the document as a JSON value for the wire.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::InvalidDocument`] if serialisation fails,
    /// which only happens when an `extra` map shadows a typed field.
    pub fn to_value(&self) -> Result<Value, DocumentError> {
        serde_json::to_value(self)
            .map_err(|err| DocumentError::invalid("document", err.to_string()))
    }

    /// List every dataset, table and tree reference that does not resolve.
    #[must_use]
    pub fn dangling_references(&self) -> Vec<DanglingReference> {
        let mut dangling = Vec::new();

        for (id, dataset) in self.datasets.iter().flatten() {
            self.check_file(&mut dangling, "datasets", id, &dataset.file);
        }

        for (id, table) in self.tables.iter().flatten() {
            if let Some(dataset) = table.dataset.value().filter(|dataset| {
                !self
                    .datasets
                    .as_ref()
                    .is_some_and(|datasets| datasets.contains_key(*dataset))
            }) {
                dangling.push(DanglingReference {
                    mapping: "tables",
                    owner: id.clone(),
                    kind: ReferenceKind::Dataset,
                    target: dataset.clone(),
                });
            }
            if let Some(file) = table.file.value() {
                self.check_file(&mut dangling, "tables", id, file);
            }
        }

        for (id, tree) in self.trees.iter().flatten() {
            self.check_file(&mut dangling, "trees", id, &tree.file);
        }

        dangling
    }

    /// Fail when any record references a missing identifier.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::DanglingReferences`] listing every unresolved
    /// reference.
    pub fn validate_references(&self) -> Result<(), DocumentError> {
        let dangling = self.dangling_references();
        if dangling.is_empty() {
            Ok(())
        } else {
            Err(DocumentError::DanglingReferences(dangling))
        }
    }

    fn check_file(
        &self,
        dangling: &mut Vec<DanglingReference>,
        mapping: &'static str,
        owner: &str,
        file: &str,
    ) {
        if !self.files.contains_key(file) {
            dangling.push(DanglingReference {
                mapping,
                owner: owner.to_owned(),
                kind: ReferenceKind::File,
                target: file.to_owned(),
            });
        }
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    //! Unit coverage for document decoding and reference checks.

    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[rstest]
    #[case::files_string(json!({ "files": "not-an-object" }), "files", "string")]
    #[case::files_null(json!({ "files": null }), "files", "null")]
    #[case::datasets_array(json!({ "datasets": [] }), "datasets", "array")]
    #[case::maps_number(json!({ "maps": 3 }), "maps", "number")]
    #[case::tables_bool(json!({ "tables": true }), "tables", "boolean")]
    #[case::trees_string(json!({ "trees": "tree-1" }), "trees", "string")]
    fn rejects_non_mapping_collections(
        #[case] input: Value,
        #[case] field: &str,
        #[case] kind: &str,
    ) {
        let err = ProjectDocument::from_value(input).expect_err("malformed document must fail");
        assert_eq!(
            err,
            DocumentError::InvalidDocument {
                field: field.to_owned(),
                message: format!("must be a mapping, found {kind}"),
            }
        );
    }

    #[test]
    fn rejects_non_object_root() {
        let err = ProjectDocument::from_value(json!([1, 2])).expect_err("array root must fail");
        assert!(matches!(
            err,
            DocumentError::InvalidDocument { ref field, .. } if field == "document"
        ));
    }

    #[test]
    fn rejects_file_without_format() {
        let err = ProjectDocument::from_value(json!({ "files": { "f": { "name": "a.csv" } } }))
            .expect_err("format is required");
        assert!(matches!(err, DocumentError::InvalidDocument { .. }));
    }

    #[test]
    fn null_trees_reads_as_absent() {
        let document =
            ProjectDocument::from_value(json!({ "files": {}, "trees": null })).expect("decodes");
        assert!(document.trees.is_none());
    }

    #[test]
    fn empty_trees_stays_present() {
        let document =
            ProjectDocument::from_value(json!({ "files": {}, "trees": {} })).expect("decodes");
        assert_eq!(document.trees, Some(RecordMap::new()));
        let encoded = document.to_value().expect("encodes");
        assert_eq!(encoded.get("trees"), Some(&json!({})));
    }

    #[test]
    fn unknown_fields_survive_a_round_trip() {
        let input = json!({
            "files": {
                "data-file-1": {
                    "format": "text/csv",
                    "name": "data.csv",
                    "url": "https://example.test/data.csv",
                    "size": 512
                }
            },
            "maps": { "map-1": { "title": "Map", "viewport": null, "controls": false } },
            "meta": { "name": "New Project", "description": "kept" },
            "version": 1,
            "schema": "https://microreact.org/schema/v1.json",
            "timelines": { "timeline-1": { "title": "Timeline" } }
        });

        let document = ProjectDocument::from_value(input.clone()).expect("decodes");
        assert_eq!(document.to_value().expect("encodes"), input);
    }

    #[test]
    fn absent_collections_stay_absent() {
        let input = json!({ "files": {}, "meta": { "name": "New Project" }, "version": 1 });

        let document = ProjectDocument::from_value(input.clone()).expect("decodes");
        assert!(document.datasets.is_none());
        assert!(document.maps.is_none());
        assert!(document.tables.is_none());
        assert!(document.schema.is_absent());
        assert_eq!(document.to_value().expect("encodes"), input);
    }

    #[test]
    fn explicit_nulls_survive_a_round_trip() {
        let input = json!({
            "files": { "data-file-1": { "format": "text/csv", "name": null, "blob": null } },
            "datasets": { "dataset-1": { "file": "data-file-1", "idFieldName": null } },
            "maps": {
                "map-1": {
                    "title": null,
                    "dataType": null,
                    "coordinate-unit": null,
                    "latitudeField": null,
                    "longitudeField": null,
                    "viewport": null
                }
            },
            "tables": {
                "table-1": { "dataset": null, "file": null, "title": null, "columns": null }
            },
            "trees": { "tree-1": { "file": "data-file-1", "labelField": null } },
            "meta": { "name": null },
            "version": null,
            "schema": null
        });

        let document = ProjectDocument::from_value(input.clone()).expect("decodes");
        assert!(document.name().is_none());
        assert!(document.dangling_references().is_empty());
        assert_eq!(document.to_value().expect("encodes"), input);
    }

    #[test]
    fn null_meta_is_kept() {
        let input = json!({ "files": {}, "meta": null });
        let document = ProjectDocument::from_value(input.clone()).expect("decodes");
        assert!(document.meta.is_null());
        assert_eq!(document.to_value().expect("encodes"), input);
    }

    #[test]
    fn mapping_keys_keep_document_order() {
        let json = r#"{"files":{"z-file":{"format":"text/csv"},"a-file":{"format":"text/csv"}},"maps":{"map-2":{},"map-1":{}}}"#;

        let document = ProjectDocument::from_json(json).expect("decodes");
        let encoded = serde_json::to_string(&document.to_value().expect("encodes"))
            .expect("serialises");
        assert_eq!(encoded, json);
    }

    #[test]
    fn explicit_null_viewport_is_preserved() {
        let document = ProjectDocument::from_value(json!({
            "maps": {
                "auto": { "viewport": null },
                "unset": {},
                "saved": { "viewport": { "zoom": 4 } }
            }
        }))
        .expect("decodes");

        let maps = document.maps.as_ref().expect("maps present");
        let auto = maps.get("auto").expect("auto map");
        let unset = maps.get("unset").expect("unset map");
        let saved = maps.get("saved").expect("saved map");
        assert_eq!(auto.viewport, Field::Null);
        assert!(auto.is_auto_fit());
        assert!(unset.viewport.is_absent());
        assert!(unset.is_auto_fit());
        assert!(!saved.is_auto_fit());

        let encoded = document.to_value().expect("encodes");
        assert_eq!(encoded["maps"]["auto"], json!({ "viewport": null }));
        assert_eq!(encoded["maps"]["unset"], json!({}));
    }

    #[test]
    fn reports_dangling_references() {
        let document = ProjectDocument::from_value(json!({
            "files": { "data-file-1": { "format": "text/csv" } },
            "datasets": { "dataset-1": { "file": "data-file-1" } },
            "tables": { "table-1": { "dataset": "dataset-2", "file": "data-file-1" } },
            "trees": { "tree-1": { "file": "tree-file-1" } }
        }))
        .expect("decodes");

        let dangling = document.dangling_references();
        assert_eq!(
            dangling,
            vec![
                DanglingReference {
                    mapping: "tables",
                    owner: "table-1".to_owned(),
                    kind: ReferenceKind::Dataset,
                    target: "dataset-2".to_owned(),
                },
                DanglingReference {
                    mapping: "trees",
                    owner: "tree-1".to_owned(),
                    kind: ReferenceKind::File,
                    target: "tree-file-1".to_owned(),
                },
            ]
        );
        assert!(matches!(
            document.validate_references(),
            Err(DocumentError::DanglingReferences(ref found)) if found.len() == 2
        ));
    }
}
