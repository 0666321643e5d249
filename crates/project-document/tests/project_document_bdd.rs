//! Behavioural tests for the project-document crate.
//!
//! These scenarios exercise tree attachment against documents shaped like
//! the ones the service returns, including malformed ones.

#![expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]

use project_document::{
    AttachedTree, DEMO_NEWICK, DocumentError, ProjectDocument, TreeAttachment, attach_tree,
};
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then, when};
use serde_json::{Value, json};

const UNTOUCHED_FIELDS: [&str; 6] = ["meta", "version", "schema", "datasets", "maps", "tables"];

#[derive(Default, ScenarioState)]
struct World {
    original: Slot<ProjectDocument>,
    document: Slot<ProjectDocument>,
    attach_result: Slot<Result<AttachedTree, DocumentError>>,
    decode_result: Slot<Result<ProjectDocument, DocumentError>>,
}

impl World {
    fn document(&self) -> ProjectDocument {
        self.document.get().expect("document should be set")
    }

    fn original(&self) -> ProjectDocument {
        self.original.get().expect("original document should be set")
    }

    fn attached(&self) -> AttachedTree {
        self.attach_result
            .get()
            .expect("attach result should be set")
            .expect("attach should succeed")
    }

    fn attach(&self, attachment: &TreeAttachment) {
        let mut document = self.document();
        let result = attach_tree(&mut document, attachment);
        self.document.set(document);
        self.attach_result.set(result);
    }
}

#[fixture]
fn world() -> World {
    World::default()
}

fn base_document() -> Value {
    json!({
        "datasets": { "dataset-1": { "file": "data-file-1", "idFieldName": "id" } },
        "files": { "data-file-1": { "format": "text/csv", "name": "data.csv", "blob": "id\n" } },
        "maps": { "map-1": { "title": "Map", "viewport": null } },
        "tables": { "table-1": { "dataset": "dataset-1", "columns": [{ "field": "id" }] } },
        "meta": { "name": "New Project" },
        "version": 1,
        "schema": "https://microreact.org/schema/v1.json"
    })
}

fn load(world: &World, value: Value) {
    let document = ProjectDocument::from_value(value).expect("fixture document decodes");
    world.original.set(document.clone());
    world.document.set(document);
}

// ============================================================================
// Given steps
// ============================================================================

#[given("a fetched project document without trees")]
fn a_fetched_project_document_without_trees(world: &World) {
    load(world, base_document());
}

#[given("a fetched project document with tree \"{tree_id}\"")]
fn a_fetched_project_document_with_tree(world: &World, tree_id: String) {
    let mut value = base_document();
    if let Some(root) = value.as_object_mut() {
        root.insert(
            "trees".to_owned(),
            json!({ tree_id: { "file": "data-file-1", "labelField": "id" } }),
        );
    }
    load(world, value);
}

#[given("a fetched project document whose files field is a string")]
fn a_fetched_project_document_whose_files_field_is_a_string(world: &World) {
    let mut value = base_document();
    if let Some(root) = value.as_object_mut() {
        root.insert("files".to_owned(), json!("not-an-object"));
    }
    world.decode_result.set(ProjectDocument::from_value(value));
}

// ============================================================================
// When steps
// ============================================================================

#[when("the demo tree is attached with label field \"{label_field}\"")]
fn the_demo_tree_is_attached_with_label_field(world: &World, label_field: String) {
    world.attach(&TreeAttachment::new(DEMO_NEWICK).with_label_field(label_field));
}

#[when("the demo tree is attached as tree \"{tree_id}\"")]
fn the_demo_tree_is_attached_as_tree(world: &World, tree_id: String) {
    world.attach(&TreeAttachment::new(DEMO_NEWICK).with_tree_id(tree_id));
}

// ============================================================================
// Then steps
// ============================================================================

#[then("the document has {file_count:usize} tree file and {tree_count:usize} tree")]
fn the_document_has_tree_files_and_trees(world: &World, file_count: usize, tree_count: usize) {
    let document = world.document();
    let tree_files = document.files.values().filter(|file| file.is_tree()).count();
    assert_eq!(tree_files, file_count);
    assert_eq!(
        document.files.len(),
        world.original().files.len() + file_count,
        "files should gain exactly the new entries"
    );
    assert_eq!(document.trees.map(|trees| trees.len()), Some(tree_count));
}

#[then("the new tree file has format \"{format}\" and name \"{name}\"")]
fn the_new_tree_file_has_format_and_name(world: &World, format: String, name: String) {
    let attached = world.attached();
    let document = world.document();
    let file = document
        .files
        .get(&attached.file_id)
        .expect("new file should exist");
    assert_eq!(file.format, format);
    assert_eq!(file.name.as_deref(), Some(name.as_str()));
    assert_eq!(file.blob.as_deref(), Some(DEMO_NEWICK));
}

#[then("the new tree references the new tree file")]
fn the_new_tree_references_the_new_tree_file(world: &World) {
    let attached = world.attached();
    let document = world.document();
    let tree = document
        .trees
        .as_ref()
        .and_then(|trees| trees.get(&attached.tree_id))
        .expect("new tree should exist");
    assert_eq!(tree.file, attached.file_id);
    assert!(document.validate_references().is_ok());
}

#[then("the untouched document fields are unchanged")]
fn the_untouched_document_fields_are_unchanged(world: &World) {
    let before = world.original().to_value().expect("original encodes");
    let after = world.document().to_value().expect("document encodes");
    for field in UNTOUCHED_FIELDS {
        assert_eq!(after.get(field), before.get(field), "field `{field}` changed");
    }
}

#[then("the new tree is keyed \"{tree_id}\"")]
fn the_new_tree_is_keyed(world: &World, tree_id: String) {
    assert_eq!(world.attached().tree_id, tree_id);
}

#[then("tree \"{tree_id}\" is unchanged")]
fn tree_is_unchanged(world: &World, tree_id: String) {
    let original = world.original();
    let document = world.document();
    let before = original
        .trees
        .as_ref()
        .and_then(|trees| trees.get(&tree_id))
        .expect("tree existed before");
    let after = document
        .trees
        .as_ref()
        .and_then(|trees| trees.get(&tree_id))
        .expect("tree exists after");
    assert_eq!(after, before);
}

#[then("attaching fails with an identifier collision on \"{mapping}\"")]
fn attaching_fails_with_an_identifier_collision(world: &World, mapping: String) {
    let result = world.attach_result.get().expect("attach result should be set");
    let err = result.expect_err("attach should fail");
    assert!(
        matches!(err, DocumentError::IdentifierCollision { mapping: found, .. } if found == mapping),
        "unexpected error: {err}"
    );
}

#[then("the document is unchanged")]
fn the_document_is_unchanged(world: &World) {
    assert_eq!(world.document(), world.original());
}

#[then("decoding fails with an invalid document error for \"{field}\"")]
fn decoding_fails_with_an_invalid_document_error(world: &World, field: String) {
    let result = world.decode_result.get().expect("decode result should be set");
    let err = result.expect_err("decode should fail");
    assert!(
        matches!(err, DocumentError::InvalidDocument { field: ref found, .. } if *found == field),
        "unexpected error: {err}"
    );
}

// ============================================================================
// Scenario bindings
// ============================================================================

#[scenario(
    path = "tests/features/project_document.feature",
    name = "Tree attached to a document without trees"
)]
fn tree_attached_to_a_document_without_trees(world: World) {
    let _ = world;
}

#[scenario(
    path = "tests/features/project_document.feature",
    name = "Allocated identifiers skip an existing tree"
)]
fn allocated_identifiers_skip_an_existing_tree(world: World) {
    let _ = world;
}

#[scenario(
    path = "tests/features/project_document.feature",
    name = "Explicit identifier collision is rejected"
)]
fn explicit_identifier_collision_is_rejected(world: World) {
    let _ = world;
}

#[scenario(
    path = "tests/features/project_document.feature",
    name = "Malformed files field is rejected"
)]
fn malformed_files_field_is_rejected(world: World) {
    let _ = world;
}
