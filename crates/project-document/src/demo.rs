//! The demo project: seven species with coordinates and the matching tree.

use serde_json::{Map, Value};

use crate::document::{
    CSV_FORMAT, ColumnRecord, DatasetRecord, FileRecord, MapRecord, ProjectDocument, ProjectMeta,
    RecordMap, TableRecord,
};
use crate::field::Field;

/// Schema URL stamped on newly created documents.
pub const PROJECT_SCHEMA_URL: &str = "https://microreact.org/schema/v1.json";

/// Document format version stamped on newly created documents.
pub const PROJECT_FORMAT_VERSION: u32 = 1;

/// Display name used for the demo project when none is given.
pub const DEFAULT_PROJECT_NAME: &str = "New Project";

/// Newick tree relating the species in [`DEMO_CSV`].
pub const DEMO_NEWICK: &str = "(Bovine:0.69395,(Gibbon:0.36079,(Orangutan:0.33636,\
(Gorilla:0.17147,(Chimp:0.19268,Human:0.11927):0.08386):0.06124):0.15057):0.54939,\
Mouse:1.21460);";

/// Metadata rows for the demo project.
pub const DEMO_CSV: &str = "\
id,latitude,longitude,Country,Country__colour,Country__shape,Pedalism
Bovine,46.227638,2.213749,France,Red,Square,Four
Gibbon,15.870032,100.992541,thailand,Green,circle,Two
Orangutan,-0.589724,101.3431058,sumatra,Blue,Circle,Two
Gorilla,1.373333,32.290275,Uganda,#CC33FF,Circle,Two
Chimp,-0.228021,15.827659,Congo,orange,Circle,Two
Human,55.378051,-3.435973,UK,#CCFF33,Circle,Two
Mouse,40.463667,-3.74922,Spain,#00FFFF,square,four
";

const DATA_FILE_ID: &str = "data-file-1";
const DATASET_ID: &str = "dataset-1";
const MAP_ID: &str = "map-1";
const TABLE_ID: &str = "table-1";
const TABLE_COLUMNS: [&str; 5] = ["id", "__latitude", "__longitude", "Country", "Pedalism"];

/// Build the initial document for a demo project named `name`.
///
/// The document has one CSV dataset, a geographic map over its coordinate
/// columns, a metadata table, and no `trees` entry.
///
/// # Example
///
/// ```
/// use project_document::demo_project;
///
/// let document = demo_project("Primates");
/// assert_eq!(document.name(), Some("Primates"));
/// assert!(document.trees.is_none());
/// assert!(document.dangling_references().is_empty());
/// ```
#[must_use]
pub fn demo_project(name: &str) -> ProjectDocument {
    let files = RecordMap::from([(
        DATA_FILE_ID.to_owned(),
        FileRecord::inline(CSV_FORMAT, "data.csv", DEMO_CSV),
    )]);

    let datasets = RecordMap::from([(
        DATASET_ID.to_owned(),
        DatasetRecord {
            file: DATA_FILE_ID.to_owned(),
            id_field_name: "id".to_owned().into(),
            extra: Map::new(),
        },
    )]);

    let maps = RecordMap::from([(
        MAP_ID.to_owned(),
        MapRecord {
            title: "Map".to_owned().into(),
            data_type: "geographic-coordinates".to_owned().into(),
            coordinate_unit: "decimal-degrees".to_owned().into(),
            latitude_field: "latitude".to_owned().into(),
            longitude_field: "longitude".to_owned().into(),
            viewport: Field::Null,
            extra: Map::new(),
        },
    )]);

    let tables = RecordMap::from([(
        TABLE_ID.to_owned(),
        TableRecord {
            dataset: DATASET_ID.to_owned().into(),
            file: DATA_FILE_ID.to_owned().into(),
            title: "Metadata".to_owned().into(),
            columns: TABLE_COLUMNS.map(ColumnRecord::new).to_vec().into(),
            extra: Map::new(),
        },
    )]);

    ProjectDocument {
        files,
        datasets: Some(datasets),
        maps: Some(maps),
        tables: Some(tables),
        trees: None,
        meta: ProjectMeta {
            name: name.to_owned().into(),
            extra: Map::new(),
        }
        .into(),
        version: Value::from(PROJECT_FORMAT_VERSION).into(),
        schema: Value::from(PROJECT_SCHEMA_URL).into(),
        extra: Map::new(),
    }
}
