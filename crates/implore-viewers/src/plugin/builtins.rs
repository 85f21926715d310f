//! Built-in visualization types.
//!
//! The routines here only describe what they would draw (bound columns and
//! per-selection summaries) as JSON fragments; chart drawing belongs to the host.

use serde_json::json;
use std::sync::Arc;

use super::{
    render_fn, AttributeSpec, ParameterSpec, RenderContext, VisualizationDescriptor,
};
use crate::dataset::DatasetAttribute;
use crate::error::{DescriptorError, PluginError};
use crate::viewport::Viewport;

/// Two numeric attributes plotted against each other
pub fn scatterplot() -> Result<VisualizationDescriptor, DescriptorError> {
    VisualizationDescriptor::new(
        "scatterplot",
        "Scatterplot",
        vec![AttributeSpec::numeric("x", "x"), AttributeSpec::numeric("y", "y")],
        vec![ParameterSpec::boolean("Small Multiples?", "smallMultiples", false)],
        render_fn(render_scatterplot),
    )
}

/// Distribution of one numeric attribute per selection
pub fn histogram() -> Result<VisualizationDescriptor, DescriptorError> {
    VisualizationDescriptor::new(
        "histogram",
        "Histogram",
        vec![AttributeSpec::numeric("Variable", "variable")],
        vec![ParameterSpec::boolean("Small Multiples?", "smallMultiples", false)],
        render_fn(render_histogram),
    )
}

/// Exercises every parameter type
pub fn testplot() -> Result<VisualizationDescriptor, DescriptorError> {
    VisualizationDescriptor::new(
        "testplot",
        "Testplot",
        vec![
            AttributeSpec::numeric("x-axis", "xAxis"),
            AttributeSpec::numeric("y-axis", "yAxis"),
        ],
        vec![
            ParameterSpec::string("String", "stringVar", "emptystring"),
            ParameterSpec::integer("Integer", "integerVar", 0),
            ParameterSpec::float("Float", "floatVar", 1.5),
            ParameterSpec::boolean("Boolean", "booleanVar", true),
        ],
        render_fn(render_testplot),
    )
}

/// All built-in descriptors in registration order
pub fn all() -> Result<Vec<Arc<VisualizationDescriptor>>, DescriptorError> {
    Ok(vec![
        Arc::new(scatterplot()?),
        Arc::new(histogram()?),
        Arc::new(testplot()?),
    ])
}

fn render_scatterplot(
    ctx: &RenderContext<'_>,
    viewport: &mut dyn Viewport,
) -> Result<(), PluginError> {
    let x = ctx.require_attribute("x")?;
    let y = ctx.require_attribute("y")?;
    let small_multiples = ctx.parameter_map.get_bool_or("smallMultiples", false);

    viewport.clear();
    for i in 0..ctx.selections.size() {
        let Some(selection) = ctx.selections.get(i) else {
            continue;
        };
        let points = selection
            .items
            .iter()
            .filter(|&&row| {
                x.column.numeric_at(row).is_some() && y.column.numeric_at(row).is_some()
            })
            .count();
        let fragment = json!({
            "kind": "scatterplot",
            "x": x.name,
            "y": y.name,
            "selection": selection.name,
            "color": ctx.selections.color_of(selection),
            "points": points,
            "small_multiples": small_multiples,
        });
        viewport.write(&fragment.to_string());
    }
    Ok(())
}

fn render_histogram(
    ctx: &RenderContext<'_>,
    viewport: &mut dyn Viewport,
) -> Result<(), PluginError> {
    let attribute = ctx.require_attribute("variable")?;
    let small_multiples = ctx.parameter_map.get_bool_or("smallMultiples", false);

    viewport.clear();
    for i in 0..ctx.selections.size() {
        let Some(selection) = ctx.selections.get(i) else {
            continue;
        };
        let values = selected_values(attribute, &selection.items);
        let fragment = json!({
            "kind": "histogram",
            "variable": attribute.name,
            "selection": selection.name,
            "color": ctx.selections.color_of(selection),
            "count": values.len(),
            "min": values.iter().copied().reduce(f64::min),
            "max": values.iter().copied().reduce(f64::max),
            "small_multiples": small_multiples,
        });
        viewport.write(&fragment.to_string());
    }
    Ok(())
}

fn render_testplot(
    ctx: &RenderContext<'_>,
    viewport: &mut dyn Viewport,
) -> Result<(), PluginError> {
    let parameters: serde_json::Map<String, serde_json::Value> = ctx
        .parameter_map
        .iter()
        .map(|(k, v)| serde_json::to_value(v).map(|value| (k.to_string(), value)))
        .collect::<Result<_, serde_json::Error>>()?;

    viewport.clear();
    let fragment = json!({
        "kind": "testplot",
        "x_axis": ctx.attribute("xAxis").map(|a| a.name.as_str()),
        "y_axis": ctx.attribute("yAxis").map(|a| a.name.as_str()),
        "selections": ctx.selections.size(),
        "parameters": parameters,
    });
    viewport.write(&fragment.to_string());
    Ok(())
}

fn selected_values(attribute: &DatasetAttribute, rows: &[usize]) -> Vec<f64> {
    rows.iter()
        .filter_map(|&row| attribute.column.numeric_at(row))
        .filter(|v| v.is_finite())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::{initialize_parameter_map, AttributeMap};
    use crate::dataset::{DataColumn, Selection, SelectionSet};
    use crate::viewport::BufferViewport;

    fn attributes() -> Vec<DatasetAttribute> {
        vec![
            DatasetAttribute::new(
                "name",
                DataColumn::String(vec!["a".into(), "b".into(), "c".into()]),
            ),
            DatasetAttribute::new("mass", DataColumn::Float(vec![1.0, 4.0, 2.5])),
            DatasetAttribute::new("year", DataColumn::Integer(vec![2001, 1999, 2010])),
        ]
    }

    fn selections() -> SelectionSet {
        SelectionSet::new(vec![
            Selection::new("all", vec![0, 1, 2], "#1f77b4"),
            Selection::new("heavy", vec![1], "#d62728"),
        ])
    }

    #[test]
    fn test_builtin_declarations() {
        let descriptors = all().unwrap();
        let keys: Vec<&str> = descriptors.iter().map(|d| d.key()).collect();
        assert_eq!(keys, vec!["scatterplot", "histogram", "testplot"]);

        let testplot = &descriptors[2];
        assert_eq!(testplot.parameters().len(), 4);
        assert_eq!(testplot.attributes()[0].variable, "xAxis");
    }

    #[test]
    fn test_histogram_summarizes_each_selection() {
        let descriptor = histogram().unwrap();
        let attrs = attributes();
        let mut attribute_map = AttributeMap::unbound(descriptor.attributes());
        attribute_map.bind(&descriptor.attributes()[0], 1, &attrs).unwrap();
        let parameter_map = initialize_parameter_map(&descriptor);
        let selections = selections();

        let ctx = RenderContext {
            selections: &selections,
            attributes: &attrs,
            attribute_map: &attribute_map,
            parameter_map: &parameter_map,
        };
        let mut viewport = BufferViewport::new("v");
        descriptor.routine().render(&ctx, &mut viewport).unwrap();

        assert_eq!(viewport.fragments().len(), 2);
        let first: serde_json::Value = serde_json::from_str(&viewport.fragments()[0]).unwrap();
        assert_eq!(first["count"], 3);
        assert_eq!(first["min"], 1.0);
        assert_eq!(first["max"], 4.0);
    }

    #[test]
    fn test_histogram_fails_when_unbound() {
        let descriptor = histogram().unwrap();
        let attrs = attributes();
        let attribute_map = AttributeMap::unbound(descriptor.attributes());
        let parameter_map = initialize_parameter_map(&descriptor);
        let selections = selections();

        let ctx = RenderContext {
            selections: &selections,
            attributes: &attrs,
            attribute_map: &attribute_map,
            parameter_map: &parameter_map,
        };
        let mut viewport = BufferViewport::new("v");
        let err = descriptor.routine().render(&ctx, &mut viewport).unwrap_err();
        assert!(err.to_string().contains("variable"));
    }

    #[test]
    fn test_testplot_reports_parameters() {
        let descriptor = testplot().unwrap();
        let attrs = attributes();
        let attribute_map = AttributeMap::unbound(descriptor.attributes());
        let parameter_map = initialize_parameter_map(&descriptor);
        let selections = selections();

        let ctx = RenderContext {
            selections: &selections,
            attributes: &attrs,
            attribute_map: &attribute_map,
            parameter_map: &parameter_map,
        };
        let mut viewport = BufferViewport::new("v");
        descriptor.routine().render(&ctx, &mut viewport).unwrap();

        let out: serde_json::Value = serde_json::from_str(&viewport.fragments()[0]).unwrap();
        assert_eq!(out["parameters"]["stringVar"], "emptystring");
        assert_eq!(out["parameters"]["floatVar"], 1.5);
        assert_eq!(out["x_axis"], serde_json::Value::Null);
    }
}
