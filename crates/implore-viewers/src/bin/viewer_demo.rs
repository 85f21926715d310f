//! Element viewer demo
//!
//! Builds a collection over a small in-memory dataset, binds a histogram and
//! a scatterplot, and prints what each render wrote to the viewport.
//!
//! Usage: `implore-viewers-demo [config.toml]`; set `RUST_LOG=debug` for lifecycle logs.

use std::sync::Arc;

use implore_viewers::{
    BufferViewport, DataColumn, DatasetAttribute, EditorInputs, Selection, SelectionSet,
    Selections, ViewerCollection, ViewerConfig, ViewerInstance, VisualizationRegistry,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => ViewerConfig::from_toml(&std::fs::read_to_string(path)?)?,
        None => ViewerConfig::default(),
    };

    let attributes: Arc<[DatasetAttribute]> = Arc::from(vec![
        DatasetAttribute::new(
            "name",
            DataColumn::String(["Ceres", "Vesta", "Pallas", "Hygiea"].map(String::from).to_vec()),
        ),
        DatasetAttribute::new("diameter_km", DataColumn::Float(vec![939.4, 525.4, 512.0, 434.0])),
        DatasetAttribute::new("discovered", DataColumn::Integer(vec![1801, 1807, 1802, 1849])),
    ]);
    let selections: Arc<dyn Selections> = Arc::new(SelectionSet::new(vec![
        Selection::new("all", vec![0, 1, 2, 3], "#1f77b4"),
        Selection::new("early", vec![0, 2], "#d62728"),
    ]));

    let registry = VisualizationRegistry::builtin()?;
    let mut collection = ViewerCollection::with_config(config);
    collection.on_event(|event, collection| {
        println!("{} ({} viewers)", event.name(), collection.len());
    });

    let mut viewport = BufferViewport::new("element-vis-viewer");
    collection.render_viewer(&mut viewport);
    println!("{}", serde_json::to_string(viewport.state())?);

    let histogram = ViewerInstance::create(
        registry.lookup("histogram")?,
        Arc::clone(&attributes),
        Arc::clone(&selections),
    );
    let histogram_id = histogram.id();
    collection.add(histogram, false);

    let scatterplot = ViewerInstance::create(
        registry.lookup("scatterplot")?,
        Arc::clone(&attributes),
        Arc::clone(&selections),
    );
    let scatterplot_id = scatterplot.id();
    collection.add(scatterplot, true);

    let report = collection.commit_edits(
        scatterplot_id,
        &EditorInputs::new()
            .attribute("x", "2")
            .attribute("y", "1")
            .parameter("smallMultiples", "maybe"),
        &mut viewport,
    )?;
    for field_error in &report.errors {
        println!("{}: {}", field_error.field, field_error.error);
    }

    collection.render_viewer(&mut viewport);
    println!("{}", serde_json::to_string(viewport.state())?);

    // The histogram has no bound attribute yet, so its render fails into a placeholder
    collection.set_active(histogram_id)?;
    collection.render_viewer(&mut viewport);
    println!("{}", serde_json::to_string(viewport.state())?);

    let form = collection.render_editor(histogram_id)?;
    println!("{}", serde_json::to_string_pretty(&form)?);

    Ok(())
}
