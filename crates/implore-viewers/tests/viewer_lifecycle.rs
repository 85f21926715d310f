//! Viewer lifecycle integration tests
//!
//! Binding defaults, field-level commits, active-viewer bookkeeping and the
//! render failure boundary, exercised through the public API.

use std::sync::{Arc, Mutex};

use implore_viewers::{
    parse_parameter_value, render_fn, AttributeSpec, BufferViewport, CollectionError, DataColumn,
    DatasetAttribute, EditorInputs, FieldRef, ParameterSpec, ParameterValue, RawInput,
    RenderOutcome, Selection, SelectionSet, Selections, ValueType, ViewerCollection, ViewerEvent,
    ViewerId, ViewerInstance, Viewport, ViewportState, VisualizationDescriptor,
    VisualizationRegistry,
};
use proptest::prelude::*;
use rstest::rstest;

fn dataset() -> Arc<[DatasetAttribute]> {
    Arc::from(vec![
        DatasetAttribute::new("name", DataColumn::String(vec!["a".into(), "b".into(), "c".into()])),
        DatasetAttribute::new("year", DataColumn::Integer(vec![1990, 2000, 2010])),
        DatasetAttribute::new("mass", DataColumn::Float(vec![0.5, 1.5, 2.5])),
        DatasetAttribute::new("visible", DataColumn::Boolean(vec![true, false, true])),
    ])
}

fn selections() -> Arc<dyn Selections> {
    Arc::new(SelectionSet::new(vec![
        Selection::new("all", vec![0, 1, 2], "#1f77b4"),
        Selection::new("recent", vec![2], "#ff7f0e"),
    ]))
}

fn create(registry: &VisualizationRegistry, key: &str) -> ViewerInstance {
    ViewerInstance::create(registry.lookup(key).unwrap(), dataset(), selections())
}

fn counting_descriptor(calls: Arc<Mutex<usize>>) -> VisualizationDescriptor {
    VisualizationDescriptor::new(
        "histogram",
        "Histogram",
        vec![AttributeSpec::numeric("Variable", "variable")],
        vec![ParameterSpec::boolean("Small Multiples?", "smallMultiples", false)],
        render_fn(move |_, viewport| {
            *calls.lock().unwrap() += 1;
            viewport.write("drawn");
            Ok(())
        }),
    )
    .unwrap()
}

// === Binding ===

#[test]
fn test_parameter_map_holds_every_default() {
    let registry = VisualizationRegistry::builtin().unwrap();
    for descriptor in registry.list_all() {
        let viewer = ViewerInstance::create(Arc::clone(descriptor), dataset(), selections());
        for spec in descriptor.parameters() {
            assert_eq!(viewer.parameter_map().get(&spec.variable), Some(&spec.default));
        }
        assert_eq!(viewer.parameter_map().len(), descriptor.parameters().len());
    }
}

#[rstest]
#[case("17", ValueType::Integer, Some(ParameterValue::Int(17)))]
#[case("-3", ValueType::Integer, Some(ParameterValue::Int(-3)))]
#[case("1e3", ValueType::Integer, None)]
#[case("12abc", ValueType::Integer, None)]
#[case("2.75", ValueType::Float, Some(ParameterValue::Float(2.75)))]
#[case("1e3", ValueType::Float, Some(ParameterValue::Float(1000.0)))]
#[case("abc", ValueType::Float, None)]
#[case("on", ValueType::Boolean, Some(ParameterValue::Bool(true)))]
#[case("off", ValueType::Boolean, Some(ParameterValue::Bool(false)))]
#[case("free text", ValueType::String, Some(ParameterValue::String("free text".to_string())))]
fn test_parse_parameter_text(
    #[case] raw: &str,
    #[case] declared: ValueType,
    #[case] expected: Option<ParameterValue>,
) {
    assert_eq!(parse_parameter_value(&RawInput::from(raw), declared).ok(), expected);
}

// === Instance ===

#[test]
fn test_histogram_scenario() {
    let calls = Arc::new(Mutex::new(0));
    let mut viewer = ViewerInstance::create(
        Arc::new(counting_descriptor(Arc::clone(&calls))),
        dataset(),
        selections(),
    );

    assert_eq!(
        viewer.parameter_map().get("smallMultiples"),
        Some(&ParameterValue::Bool(false))
    );
    assert!(viewer.attribute_map().contains("variable"));
    assert_eq!(viewer.attribute_map().get("variable"), None);

    let mut viewport = BufferViewport::new("element-vis-viewer");
    let report = viewer.commit_edits(
        &EditorInputs::new()
            .attribute("variable", "2")
            .parameter("smallMultiples", "true"),
        &mut viewport,
    );

    assert!(report.is_clean());
    assert_eq!(viewer.attribute_map().get("variable"), Some(2));
    assert_eq!(viewer.parameter_map().get_bool("smallMultiples"), Some(true));
    assert_eq!(*calls.lock().unwrap(), 1);
}

#[test]
fn test_one_bad_field_does_not_block_the_rest() {
    let registry = VisualizationRegistry::builtin().unwrap();
    let mut viewer = create(&registry, "testplot");
    let mut viewport = BufferViewport::new("v");

    let report = viewer.commit_edits(
        &EditorInputs::new()
            .attribute("xAxis", "1")
            .attribute("yAxis", "2")
            .parameter("stringVar", "label")
            .parameter("integerVar", "3")
            .parameter("floatVar", "not a number")
            .parameter("booleanVar", RawInput::Checked(false)),
        &mut viewport,
    );

    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].field, FieldRef::Parameter("floatVar".to_string()));
    assert_eq!(report.updated.len(), 5);
    assert_eq!(viewer.parameter_map().get_float("floatVar"), Some(1.5));
    assert_eq!(viewer.parameter_map().get_int("integerVar"), Some(3));
    assert_eq!(viewer.attribute_map().get("yAxis"), Some(2));

    let mut form = viewer.render_editor();
    form.annotate(&report.errors);
    let float_control = form.parameters.iter().find(|p| p.variable == "floatVar").unwrap();
    assert!(float_control.error.is_some());
}

#[test]
fn test_editor_round_trip_reproduces_binding() {
    let registry = VisualizationRegistry::builtin().unwrap();
    let mut viewer = create(&registry, "testplot");
    let mut viewport = BufferViewport::new("v");
    viewer.commit_edits(
        &EditorInputs::new()
            .attribute("xAxis", "2")
            .parameter("floatVar", "0.1")
            .parameter("stringVar", ""),
        &mut viewport,
    );
    let before = (viewer.attribute_map().clone(), viewer.parameter_map().clone());

    let shown = viewer.render_editor().inputs();
    let report = viewer.commit_edits(&shown, &mut viewport);

    assert!(report.is_clean());
    assert_eq!((viewer.attribute_map().clone(), viewer.parameter_map().clone()), before);
}

#[test]
fn test_numeric_parameter_with_integer_default_round_trips() {
    let descriptor = VisualizationDescriptor::new(
        "binned",
        "Binned",
        vec![AttributeSpec::numeric("Variable", "variable")],
        vec![ParameterSpec::new("Bins", ValueType::Numeric, "bins", 20i64)],
        render_fn(|_, _| Ok(())),
    )
    .unwrap();
    let mut viewer = ViewerInstance::create(Arc::new(descriptor), dataset(), selections());
    let mut viewport = BufferViewport::new("v");
    let before = viewer.parameter_map().clone();
    assert_eq!(before.get("bins"), Some(&ParameterValue::Float(20.0)));

    let shown = viewer.render_editor().inputs();
    let report = viewer.commit_edits(&shown, &mut viewport);

    assert!(report.is_clean());
    assert_eq!(viewer.parameter_map(), &before);
}

// === Collection ===

#[test]
fn test_remove_active_middle_viewer() {
    let registry = VisualizationRegistry::builtin().unwrap();
    let mut collection = ViewerCollection::new();
    let ids: Vec<ViewerId> = ["scatterplot", "histogram", "testplot"]
        .iter()
        .map(|key| {
            let viewer = create(&registry, key);
            let id = viewer.id();
            collection.add(viewer, false);
            id
        })
        .collect();
    collection.set_active(ids[1]).unwrap();

    let events = collection.subscribe();
    collection.remove(ids[1]).unwrap();

    let order: Vec<ViewerId> = collection.iter().map(|v| v.id()).collect();
    assert_eq!(order, vec![ids[0], ids[2]]);
    assert_eq!(collection.active_index(), Some(0));

    let events: Vec<ViewerEvent> = events.try_iter().collect();
    assert_eq!(events.len(), 2);
    assert!(matches!(events[0], ViewerEvent::Removed { index: 1, .. }));
    assert_eq!(
        events[1],
        ViewerEvent::Activated {
            viewer: ids[0],
            descriptor: "Scatterplot".to_string(),
            index: 0,
        }
    );
}

#[test]
fn test_activate_index_zero_when_never_visited() {
    let registry = VisualizationRegistry::builtin().unwrap();
    let mut collection = ViewerCollection::new();
    collection.add(create(&registry, "histogram"), false);
    collection.add(create(&registry, "histogram"), true);
    assert_eq!(collection.active_index(), Some(1));

    assert_eq!(collection.set_active_index(0), Ok(true));
    assert_eq!(collection.active_index(), Some(0));
}

#[test]
fn test_invalid_index_leaves_state_unchanged() {
    let registry = VisualizationRegistry::builtin().unwrap();
    let mut collection = ViewerCollection::new();
    let events = collection.subscribe();

    assert_eq!(
        collection.set_active_index(0),
        Err(CollectionError::IndexOutOfBounds { index: 0, len: 0 })
    );
    collection.add(create(&registry, "testplot"), false);
    let before: Vec<ViewerEvent> = events.try_iter().collect();

    assert!(collection.set_active_index(5).is_err());
    assert!(collection.remove(ViewerId::new()).is_err());
    assert_eq!(collection.len(), 1);
    assert_eq!(collection.active_index(), Some(0));
    assert_eq!(before.len(), 2);
    assert!(events.try_recv().is_err());
}

#[test]
fn test_failing_routine_does_not_break_render_pass() {
    let failing = VisualizationDescriptor::new(
        "broken",
        "Broken",
        vec![],
        vec![],
        render_fn(|_, viewport| {
            viewport.write("<svg>");
            Err("no scale for empty domain".into())
        }),
    )
    .unwrap();
    let viewer = ViewerInstance::create(Arc::new(failing), dataset(), selections());
    let id = viewer.id();

    let mut collection = ViewerCollection::new();
    collection.add(viewer, true);
    let mut viewport = BufferViewport::new("element-vis-viewer");

    let outcome = collection.render_viewer(&mut viewport);

    let RenderOutcome::Failed(error) = outcome else {
        panic!("expected a failed render");
    };
    assert_eq!(error.viewer, id);
    assert_eq!(error.descriptor, "Broken");
    assert!(matches!(viewport.state(), ViewportState::Failed(_)));

    // The collection stays usable
    let registry = VisualizationRegistry::builtin().unwrap();
    collection.add(create(&registry, "testplot"), true);
    assert!(collection.render_viewer(&mut viewport).is_rendered());
}

#[test]
fn test_empty_collection_renders_placeholder() {
    let collection = ViewerCollection::new();
    let mut viewport = BufferViewport::new("element-vis-viewer");
    viewport.write("stale chart");

    assert_eq!(collection.render_viewer(&mut viewport), RenderOutcome::Placeholder);
    assert_eq!(
        viewport.state(),
        &ViewportState::Placeholder("No viewer available!".to_string())
    );
}

// === Properties ===

#[derive(Debug, Clone)]
enum Op {
    Add(bool),
    Remove(usize),
    Activate(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<bool>().prop_map(Op::Add),
        (0usize..8).prop_map(Op::Remove),
        (0usize..8).prop_map(Op::Activate),
    ]
}

proptest! {
    #[test]
    fn test_active_index_always_valid(ops in proptest::collection::vec(op(), 0..40)) {
        let registry = VisualizationRegistry::builtin().unwrap();
        let mut collection = ViewerCollection::new();

        for op in ops {
            let active_before = collection.active().map(|v| v.id());
            match op {
                Op::Add(make_active) => {
                    collection.add(create(&registry, "testplot"), make_active);
                }
                Op::Remove(position) => {
                    let target = collection.iter().nth(position).map(|v| v.id());
                    if let Some(id) = target {
                        let removed_index = collection.index_of(id).unwrap();
                        let was_active = active_before == Some(id);
                        collection.remove(id).unwrap();
                        if was_active && !collection.is_empty() {
                            prop_assert_eq!(
                                collection.active_index(),
                                Some(removed_index.saturating_sub(1))
                            );
                        } else if !collection.is_empty() {
                            prop_assert_eq!(collection.active().map(|v| v.id()), active_before);
                        }
                    }
                }
                Op::Activate(index) => {
                    let result = collection.set_active_index(index);
                    prop_assert_eq!(result.is_ok(), index < collection.len());
                }
            }

            match collection.active_index() {
                None => prop_assert!(collection.is_empty()),
                Some(i) => prop_assert!(i < collection.len()),
            }
        }
    }
}
