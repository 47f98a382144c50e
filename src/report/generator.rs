//! HTML, Markdown, and JSON report generation.
//!
//! The HTML report is a self-contained page: an inline-SVG scatter
//! chart of the weight guesses, a name cloud, and the full guess table.

use crate::analysis::{arrival_breakdown, sorted_name_counts, AggregateView};
use crate::models::{Arrival, Guess, ReportMetadata};
use anyhow::Result;
use serde::Serialize;

/// Message shown in every format when the pool has no guesses.
pub const EMPTY_POOL_MESSAGE: &str = "No guesses yet. Be the first!";

/// Rendering knobs the presentation layer needs from configuration.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Left edge of the weight axis (lbs).
    pub min_weight: f64,
    /// Right edge of the weight axis (lbs).
    pub max_weight: f64,
    /// Offset unit the aggregation engine stacked points with.
    pub stack_spacing: f64,
    /// Include the name cloud section.
    pub include_name_cloud: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            min_weight: 5.0,
            max_weight: 12.0,
            stack_spacing: crate::analysis::DEFAULT_STACK_SPACING,
            include_name_cloud: true,
        }
    }
}

// Chart geometry in pixels.
const CHART_WIDTH: f64 = 840.0;
const CHART_MARGIN: f64 = 40.0;
const POINT_RADIUS: f64 = 22.0;
const STACK_ROW_PX: f64 = 50.0;

/// Generate the complete HTML report.
pub fn generate_html_report(
    view: &AggregateView,
    metadata: &ReportMetadata,
    options: &RenderOptions,
) -> String {
    let mut output = String::new();

    output.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    output.push_str("<meta charset=\"utf-8\">\n");
    output.push_str("<title>Baby Shower Guessing Pool</title>\n");
    output.push_str(&generate_styles());
    output.push_str("</head>\n<body>\n");

    output.push_str("<h1>\u{1F476} Baby Shower Guessing Pool</h1>\n");
    output.push_str(&format!(
        "<p class=\"meta\">{} guesses from {} guessers &middot; generated {}</p>\n",
        metadata.total_guesses,
        metadata.submitters,
        metadata.generated_at.format("%Y-%m-%d %H:%M UTC")
    ));

    if view.is_empty() {
        output.push_str(&format!("<p class=\"empty\">{}</p>\n", EMPTY_POOL_MESSAGE));
        output.push_str("</body>\n</html>\n");
        return output;
    }

    output.push_str("<h2>Guess Distribution</h2>\n");
    output.push_str(&generate_chart_svg(view, options));
    output.push_str(&generate_legend());

    if options.include_name_cloud {
        output.push_str("<h2>Name Cloud</h2>\n");
        output.push_str(&generate_name_cloud(view));
    }

    output.push_str("<h2>All Guesses</h2>\n");
    output.push_str(&generate_html_table(&view.guesses));

    output.push_str("</body>\n</html>\n");
    output
}

/// Inline stylesheet for the report page.
fn generate_styles() -> String {
    let mut css = String::new();
    css.push_str("<style>\n");
    css.push_str("body { font-family: sans-serif; margin: 2rem auto; max-width: 900px; color: #1f2937; }\n");
    css.push_str(".meta { color: #6b7280; }\n");
    css.push_str(".empty { font-size: 1.2rem; color: #6b7280; }\n");
    css.push_str(".legend span { margin-right: 1.5rem; }\n");
    css.push_str(".legend i { display: inline-block; width: 0.8em; height: 0.8em; border-radius: 50%; margin-right: 0.4em; }\n");
    css.push_str(".cloud span { margin-right: 0.8em; line-height: 1.6; }\n");
    css.push_str("table { border-collapse: collapse; width: 100%; }\n");
    css.push_str("th, td { border: 1px solid #e5e7eb; padding: 0.4rem 0.8rem; text-align: left; }\n");
    css.push_str("th { background: #f9fafb; }\n");
    css.push_str("</style>\n");
    css
}

/// Scatter chart: x is weight, y is the stacking offset.
fn generate_chart_svg(view: &AggregateView, options: &RenderOptions) -> String {
    let max_offset = view.offsets.iter().cloned().fold(0.0_f64, f64::max);
    let stack_units = if options.stack_spacing > 0.0 {
        max_offset / options.stack_spacing
    } else {
        0.0
    };
    let height = 2.0 * CHART_MARGIN + POINT_RADIUS + stack_units * STACK_ROW_PX + 20.0;
    let baseline = height - CHART_MARGIN - POINT_RADIUS;
    let span = (options.max_weight - options.min_weight).max(f64::EPSILON);

    let x_of = |weight: f64| -> f64 {
        let clamped = weight.clamp(options.min_weight, options.max_weight);
        CHART_MARGIN + (clamped - options.min_weight) / span * (CHART_WIDTH - 2.0 * CHART_MARGIN)
    };
    let y_of = |offset: f64| -> f64 {
        let units = if options.stack_spacing > 0.0 {
            offset / options.stack_spacing
        } else {
            0.0
        };
        baseline - units * STACK_ROW_PX
    };

    let mut svg = format!(
        "<svg viewBox=\"0 0 {} {}\" width=\"{}\" height=\"{}\" role=\"img\">\n",
        CHART_WIDTH, height, CHART_WIDTH, height
    );

    // Weight axis with ticks at whole pounds.
    svg.push_str(&format!(
        "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"#9ca3af\"/>\n",
        CHART_MARGIN,
        height - CHART_MARGIN,
        CHART_WIDTH - CHART_MARGIN,
        height - CHART_MARGIN
    ));
    let mut tick = options.min_weight.ceil();
    while tick <= options.max_weight {
        let x = x_of(tick);
        svg.push_str(&format!(
            "<line x1=\"{x:.1}\" y1=\"{}\" x2=\"{x:.1}\" y2=\"{}\" stroke=\"#9ca3af\"/>\n",
            height - CHART_MARGIN,
            height - CHART_MARGIN + 6.0
        ));
        svg.push_str(&format!(
            "<text x=\"{x:.1}\" y=\"{}\" text-anchor=\"middle\" font-size=\"12\" fill=\"#6b7280\">{tick}</text>\n",
            height - CHART_MARGIN + 20.0
        ));
        tick += 1.0;
    }
    svg.push_str(&format!(
        "<text x=\"{}\" y=\"{}\" text-anchor=\"middle\" font-size=\"13\" fill=\"#374151\">Guessed Weight (lbs)</text>\n",
        CHART_WIDTH / 2.0,
        height - 4.0
    ));

    // One point per guess, baby name drawn inside.
    for (guess, offset) in view.guesses.iter().zip(&view.offsets) {
        let x = x_of(guess.weight);
        let y = y_of(*offset);
        svg.push_str(&format!(
            "<circle cx=\"{x:.1}\" cy=\"{y:.1}\" r=\"{}\" fill=\"{}\" fill-opacity=\"0.8\">\
<title>{}: {} ({:.1} lbs, {})</title></circle>\n",
            POINT_RADIUS,
            guess.arrival.chart_color(),
            html_escape(&guess.guesser_name),
            html_escape(&guess.baby_name),
            guess.weight,
            guess.arrival
        ));
        svg.push_str(&format!(
            "<text x=\"{x:.1}\" y=\"{y:.1}\" text-anchor=\"middle\" dominant-baseline=\"middle\" \
font-size=\"10\" font-weight=\"bold\" fill=\"white\">{}</text>\n",
            html_escape(&guess.baby_name)
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

/// Legend for the arrival colors.
fn generate_legend() -> String {
    let mut legend = String::from("<p class=\"legend\">");
    for arrival in Arrival::ALL {
        legend.push_str(&format!(
            "<span><i style=\"background:{}\"></i>{}</span>",
            arrival.chart_color(),
            arrival
        ));
    }
    legend.push_str("</p>\n");
    legend
}

/// Name cloud: font size scales with guess count.
fn generate_name_cloud(view: &AggregateView) -> String {
    let mut cloud = String::from("<p class=\"cloud\">");
    for (name, count) in sorted_name_counts(&view.name_counts) {
        let size = 12 + count * 8;
        cloud.push_str(&format!(
            "<span style=\"font-size:{}px\" title=\"{} guess(es)\">{}</span>\n",
            size,
            count,
            html_escape(&name)
        ));
    }
    cloud.push_str("</p>\n");
    cloud
}

/// The full guess table, in load order.
fn generate_html_table(guesses: &[Guess]) -> String {
    let mut table = String::new();
    table.push_str("<table>\n<tr><th>Guesser</th><th>Baby Name</th><th>Weight (lbs)</th><th>Arrival</th></tr>\n");
    for guess in guesses {
        table.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{:.1}</td><td>{}</td></tr>\n",
            html_escape(&guess.guesser_name),
            html_escape(&guess.baby_name),
            guess.weight,
            guess.arrival
        ));
    }
    table.push_str("</table>\n");
    table
}

/// Generate a complete Markdown report.
pub fn generate_markdown_report(view: &AggregateView, metadata: &ReportMetadata) -> String {
    let mut output = String::new();

    output.push_str("# Baby Shower Guessing Pool\n\n");
    output.push_str(&format!(
        "- **Generated:** {}\n- **Store:** `{}`\n- **Guesses:** {}\n- **Guessers:** {}\n\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
        metadata.store_root,
        metadata.total_guesses,
        metadata.submitters
    ));

    if view.is_empty() {
        output.push_str(EMPTY_POOL_MESSAGE);
        output.push('\n');
        return output;
    }

    output.push_str("## All Guesses\n\n");
    output.push_str("| Guesser | Baby Name | Weight (lbs) | Arrival |\n");
    output.push_str("|:---|:---|:---:|:---|\n");
    for guess in &view.guesses {
        output.push_str(&format!(
            "| {} | {} | {:.1} | {} |\n",
            guess.guesser_name, guess.baby_name, guess.weight, guess.arrival
        ));
    }
    output.push('\n');

    output.push_str("## Popular Names\n\n");
    output.push_str("| Name | Guesses |\n|:---|:---:|\n");
    for (name, count) in sorted_name_counts(&view.name_counts) {
        output.push_str(&format!("| {} | {} |\n", name, count));
    }
    output.push('\n');

    output.push_str("## Arrival Guesses\n\n");
    output.push_str("| Arrival | Guesses |\n|:---|:---:|\n");
    let breakdown = arrival_breakdown(&view.guesses);
    for arrival in Arrival::ALL {
        output.push_str(&format!(
            "| {} | {} |\n",
            arrival,
            breakdown.get(&arrival).copied().unwrap_or(0)
        ));
    }

    output
}

/// Serialized shape of the JSON report.
#[derive(Serialize)]
struct JsonReport<'a> {
    metadata: &'a ReportMetadata,
    guesses: &'a [Guess],
    layout_offsets: &'a [f64],
    name_counts: &'a std::collections::HashMap<String, usize>,
}

/// Generate a JSON report.
pub fn generate_json_report(view: &AggregateView, metadata: &ReportMetadata) -> Result<String> {
    let report = JsonReport {
        metadata,
        guesses: &view.guesses,
        layout_offsets: &view.offsets,
        name_counts: &view.name_counts,
    };
    serde_json::to_string_pretty(&report).map_err(Into::into)
}

/// Plain-text table for the `list` subcommand.
pub fn render_list_table(guesses: &[Guess]) -> String {
    if guesses.is_empty() {
        return format!("{}\n", EMPTY_POOL_MESSAGE);
    }

    let name_width = guesses
        .iter()
        .map(|g| g.guesser_name.len())
        .chain(["Guesser".len()])
        .max()
        .unwrap_or(0);
    let baby_width = guesses
        .iter()
        .map(|g| g.baby_name.len())
        .chain(["Baby Name".len()])
        .max()
        .unwrap_or(0);

    let mut out = format!(
        "{:<name_width$}  {:<baby_width$}  {:>6}  Arrival\n",
        "Guesser", "Baby Name", "Weight"
    );
    for guess in guesses {
        out.push_str(&format!(
            "{:<name_width$}  {:<baby_width$}  {:>6.1}  {}\n",
            guess.guesser_name, guess.baby_name, guess.weight, guess.arrival
        ));
    }
    out
}

/// Minimal HTML escaping for user-supplied names.
fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
