//! Renders the month-vs-average comparison chart as an SVG document.
//!
//! Rendering is a pure function of the aggregates: per-category bars for the
//! month being reported next to that category's historical average, with a
//! synthetic "Totals" group on the left summing every category.

use crate::history::MonthTotals;
use crate::{utils, Result};
use anyhow::Context;
use std::path::Path;
use svg::node::element::{Line, Rectangle, Text};
use svg::node::Text as TextNode;
use svg::Document;

const FWIDTH: f64 = 1000.0;
const FHEIGHT: f64 = 700.0;
const BAR_FRACTION: f64 = 0.35;
const COLORS: &[&str] = &["steelblue", "darkorange"];

/// Builds the grouped bar chart for `month_totals` against `averages`.
///
/// The x-axis carries the averaged categories in sorted order, preceded by
/// the synthetic totals group; bar heights are whole dollars, rounded before
/// the totals group is summed.
pub fn comparison(month_totals: &MonthTotals, averages: &MonthTotals, month_label: &str) -> Document {
    let mut labels: Vec<String> = averages.keys().cloned().collect();
    let mut month_vals: Vec<i64> = labels
        .iter()
        .map(|category| {
            month_totals
                .get(category)
                .map(|amount| amount.to_whole_dollars())
                .unwrap_or_default()
        })
        .collect();
    let mut average_vals: Vec<i64> = labels
        .iter()
        .map(|category| {
            averages
                .get(category)
                .map(|amount| amount.to_whole_dollars())
                .unwrap_or_default()
        })
        .collect();

    labels.insert(0, "Totals".to_string());
    month_vals.insert(0, month_vals.iter().sum());
    average_vals.insert(0, average_vals.iter().sum());

    // 10% headroom above the tallest bar so its value label fits.
    let tallest = month_vals
        .iter()
        .chain(average_vals.iter())
        .copied()
        .max()
        .unwrap_or_default()
        .max(1);
    let y_max = tallest as f64 * 1.1;

    let group_width = FWIDTH / labels.len() as f64;
    let bar_width = group_width * BAR_FRACTION;
    let bar_top = |value: i64| FHEIGHT - (value as f64 / y_max * FHEIGHT);

    let mut document = Document::new().set(
        "viewBox",
        (-70.0, -70.0, FWIDTH + 100.0, FHEIGHT + 250.0),
    );

    for (ix, label) in labels.iter().enumerate() {
        let center = (ix as f64 + 0.5) * group_width;
        let bars = [
            (center - bar_width, month_vals[ix], COLORS[0]),
            (center, average_vals[ix], COLORS[1]),
        ];
        for (x, value, color) in bars {
            let top = bar_top(value);
            document = document
                .add(
                    Rectangle::new()
                        .set("x", x)
                        .set("y", top)
                        .set("width", bar_width)
                        .set("height", FHEIGHT - top)
                        .set("fill", color),
                )
                .add(
                    Text::new()
                        .set("x", x + bar_width / 2.0)
                        .set("y", top - 4.0)
                        .set("text-anchor", "middle")
                        .set("font-size", 10)
                        .add(TextNode::new(value.to_string())),
                );
        }
        // Category names rotated so neighbors don't overlap.
        document = document.add(
            Text::new()
                .set("x", center)
                .set("y", FHEIGHT + 14.0)
                .set("font-size", 12)
                .set("transform", format!("rotate(90, {center}, {})", FHEIGHT + 14.0))
                .add(TextNode::new(label.clone())),
        );
    }

    let x_axis = Line::new()
        .set("x1", 0.0)
        .set("x2", FWIDTH)
        .set("y1", FHEIGHT)
        .set("y2", FHEIGHT)
        .set("stroke", "black")
        .set("stroke-width", 2.0);
    let y_axis = Line::new()
        .set("x1", 0.0)
        .set("x2", 0.0)
        .set("y1", 0.0)
        .set("y2", FHEIGHT)
        .set("stroke", "black")
        .set("stroke-width", 2.0);

    let title = Text::new()
        .set("x", FWIDTH / 2.0)
        .set("y", -40.0)
        .set("text-anchor", "middle")
        .set("font-size", 18)
        .add(TextNode::new(format!(
            "Spending in {month_label} compared to average"
        )));

    let mut legend_y = -50.0;
    for (color, name) in [(COLORS[0], month_label), (COLORS[1], "Average")] {
        document = document
            .add(
                Rectangle::new()
                    .set("x", FWIDTH - 120.0)
                    .set("y", legend_y)
                    .set("width", 12.0)
                    .set("height", 12.0)
                    .set("fill", color),
            )
            .add(
                Text::new()
                    .set("x", FWIDTH - 102.0)
                    .set("y", legend_y + 10.0)
                    .set("font-size", 12)
                    .add(TextNode::new(name.to_string())),
            );
        legend_y += 18.0;
    }

    document.add(x_axis).add(y_axis).add(title)
}

/// Saves the rendered chart next to the month's other artifacts.
pub fn save(document: &Document, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        utils::create_dir_all(parent)?;
    }
    svg::save(path, document)
        .with_context(|| format!("Unable to write the chart to {}", path.display()))?;
    Ok(())
}
