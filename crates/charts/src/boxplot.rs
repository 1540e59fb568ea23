use crate::error::ChartError;
use rolling::WindowTable;
use std::path::Path;

const WIDTH: i32 = 576;
const HEIGHT: i32 = 360;
const LEFT_PAD: f64 = 72.0;
const RIGHT_PAD: f64 = 24.0;
const TOP_PAD: f64 = 24.0;
const BOTTOM_PAD: f64 = 84.0;
const GRID_STEPS: usize = 4;
const WHISKER_REACH: f64 = 1.5;
const PALETTE: [&str; 6] = [
    "#348dc1", "#ff9933", "#4fa487", "#af4b64", "#9b59b6", "#8c8c8c",
];

/// Presentation switches for `boxplot_returns`.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxplotOptions {
    pub log_scale: bool,
    pub show_fliers: bool,
    pub y_label: String,
}

impl Default for BoxplotOptions {
    fn default() -> Self {
        Self {
            log_scale: false,
            show_fliers: true,
            y_label: "Return".to_string(),
        }
    }
}

impl BoxplotOptions {
    pub fn log_scale(mut self) -> Self {
        self.log_scale = true;
        self
    }

    pub fn hide_fliers(mut self) -> Self {
        self.show_fliers = false;
        self
    }

    pub fn with_y_label(mut self, label: &str) -> Self {
        self.y_label = label.to_string();
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
struct BoxStats {
    lower_whisker: f64,
    q1: f64,
    median: f64,
    q3: f64,
    upper_whisker: f64,
    fliers: Vec<f64>,
}

fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let pos = p.clamp(0.0, 1.0) * (sorted.len() as f64 - 1.0);
    let idx = pos.floor() as usize;
    let frac = pos - idx as f64;
    if idx + 1 >= sorted.len() {
        sorted[idx]
    } else {
        sorted[idx] + (sorted[idx + 1] - sorted[idx]) * frac
    }
}

// Whiskers reach the most extreme values within 1.5 IQR of the box.
fn compute_box_stats(values: &[f64]) -> Option<BoxStats> {
    let mut clean: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if clean.is_empty() {
        return None;
    }
    clean.sort_by(f64::total_cmp);

    let q1 = percentile(&clean, 0.25);
    let q3 = percentile(&clean, 0.75);
    let reach = WHISKER_REACH * (q3 - q1);
    let (low_fence, high_fence) = (q1 - reach, q3 + reach);

    Some(BoxStats {
        lower_whisker: clean.iter().copied().find(|v| *v >= low_fence).unwrap_or(q1),
        q1,
        median: percentile(&clean, 0.5),
        q3,
        upper_whisker: clean.iter().copied().rfind(|v| *v <= high_fence).unwrap_or(q3),
        fliers: clean
            .iter()
            .copied()
            .filter(|v| *v < low_fence || *v > high_fence)
            .collect(),
    })
}

fn svg_header(width: i32, height: i32) -> String {
    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}"><style>text{{font-family:Arial,sans-serif;font-size:10px;fill:#666}}</style><rect width="{w}" height="{h}" fill="#ffffff" />"##,
        w = width,
        h = height
    )
}

fn svg_footer() -> &'static str {
    "</svg>"
}

fn format_tick(value: f64) -> String {
    if value.abs() >= 100.0 {
        format!("{value:.0}")
    } else if value.abs() >= 1.0 || value == 0.0 {
        format!("{value:.2}")
    } else {
        format!("{value:.3}")
    }
}

/// Draws one box per column of `table`, in the order given.
///
/// On a log scale only strictly positive values are plotted; a column with none left still
/// gets its axis label but no box.
pub fn boxplot_returns(
    table: &WindowTable,
    columns: &[String],
    options: &BoxplotOptions,
) -> Result<String, ChartError> {
    if columns.is_empty() {
        return Err(ChartError::NoColumns);
    }

    let project = |value: f64| {
        if options.log_scale {
            value.log10()
        } else {
            value
        }
    };

    let mut groups = Vec::with_capacity(columns.len());
    for name in columns {
        let mut values = table
            .column(name)
            .ok_or_else(|| ChartError::UnknownColumn(name.clone()))?;
        if options.log_scale {
            let before = values.len();
            values.retain(|v| *v > 0.0);
            if values.len() < before {
                tracing::debug!(
                    column = %name,
                    skipped = before - values.len(),
                    "Skipping non-positive values on log scale"
                );
            }
        }
        let stats = compute_box_stats(&values).map(|s| BoxStats {
            lower_whisker: project(s.lower_whisker),
            q1: project(s.q1),
            median: project(s.median),
            q3: project(s.q3),
            upper_whisker: project(s.upper_whisker),
            fliers: s.fliers.into_iter().map(project).collect(),
        });
        groups.push((name.as_str(), stats));
    }

    let mut min_v = f64::INFINITY;
    let mut max_v = f64::NEG_INFINITY;
    for stats in groups.iter().filter_map(|(_, s)| s.as_ref()) {
        min_v = min_v.min(stats.lower_whisker);
        max_v = max_v.max(stats.upper_whisker);
        if options.show_fliers {
            for flier in &stats.fliers {
                min_v = min_v.min(*flier);
                max_v = max_v.max(*flier);
            }
        }
    }
    if !min_v.is_finite() || !max_v.is_finite() {
        min_v = -0.1;
        max_v = 0.1;
    }
    if (max_v - min_v).abs() < 1e-9 {
        max_v += 0.05;
        min_v -= 0.05;
    }

    let width = WIDTH as f64;
    let height = HEIGHT as f64;
    let band = (width - LEFT_PAD - RIGHT_PAD) / groups.len() as f64;
    let inner_height = height - TOP_PAD - BOTTOM_PAD;
    let value_to_y = |value: f64| {
        let norm = (value - min_v) / (max_v - min_v);
        TOP_PAD + (1.0 - norm) * inner_height
    };

    let mut svg = svg_header(WIDTH, HEIGHT);

    for i in 0..=GRID_STEPS {
        let value = min_v + (max_v - min_v) * (i as f64 / GRID_STEPS as f64);
        let y = value_to_y(value);
        let shown = if options.log_scale {
            10f64.powf(value)
        } else {
            value
        };
        svg.push_str(&format!(
            r##"<line x1="{x1:.2}" y1="{y:.2}" x2="{x2:.2}" y2="{y:.2}" stroke="#eeeeee" stroke-width="1" />"##,
            x1 = LEFT_PAD,
            x2 = width - RIGHT_PAD,
        ));
        svg.push_str(&format!(
            r##"<text x="{x:.2}" y="{y:.2}" text-anchor="end">{label}</text>"##,
            x = LEFT_PAD - 6.0,
            y = y + 3.0,
            label = format_tick(shown)
        ));
    }

    svg.push_str(&format!(
        r##"<text x="16" y="{y:.2}" text-anchor="middle" transform="rotate(-90 16 {y:.2})">{label}</text>"##,
        y = TOP_PAD + inner_height / 2.0,
        label = options.y_label
    ));

    if !options.log_scale {
        let zero_y = value_to_y(0.0);
        if (TOP_PAD..=height - BOTTOM_PAD).contains(&zero_y) {
            svg.push_str(&format!(
                r##"<line x1="{x1:.2}" y1="{y:.2}" x2="{x2:.2}" y2="{y:.2}" stroke="#bbbbbb" stroke-width="1" stroke-dasharray="4 3" />"##,
                x1 = LEFT_PAD,
                x2 = width - RIGHT_PAD,
                y = zero_y
            ));
        }
    }

    for (idx, (label, stats)) in groups.iter().enumerate() {
        let cx = LEFT_PAD + (idx as f64 + 0.5) * band;
        let color = PALETTE[idx % PALETTE.len()];

        if let Some(stats) = stats {
            push_box(&mut svg, stats, cx, band, color, options.show_fliers, &value_to_y);
        }

        let label_y = height - BOTTOM_PAD + 14.0;
        svg.push_str(&format!(
            r##"<text x="{x:.2}" y="{y:.2}" text-anchor="end" fill="#444" transform="rotate(-45 {x:.2} {y:.2})">{label}</text>"##,
            x = cx,
            y = label_y,
        ));
    }

    svg.push_str(svg_footer());
    Ok(svg)
}

fn push_box(
    svg: &mut String,
    stats: &BoxStats,
    cx: f64,
    band: f64,
    color: &str,
    show_fliers: bool,
    value_to_y: &impl Fn(f64) -> f64,
) {
    let y_low = value_to_y(stats.lower_whisker);
    let y_high = value_to_y(stats.upper_whisker);
    let y_q1 = value_to_y(stats.q1);
    let y_q3 = value_to_y(stats.q3);
    let y_median = value_to_y(stats.median);

    for (from, to) in [(y_high, y_q3), (y_q1, y_low)] {
        svg.push_str(&format!(
            r#"<line x1="{x:.2}" y1="{from:.2}" x2="{x:.2}" y2="{to:.2}" stroke="{color}" stroke-width="1" />"#,
            x = cx,
        ));
    }
    for y in [y_high, y_low] {
        svg.push_str(&format!(
            r#"<line x1="{x1:.2}" y1="{y:.2}" x2="{x2:.2}" y2="{y:.2}" stroke="{color}" stroke-width="1" />"#,
            x1 = cx - band * 0.15,
            x2 = cx + band * 0.15,
        ));
    }

    svg.push_str(&format!(
        r#"<rect x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{h:.2}" fill="{color}" fill-opacity="0.25" stroke="{color}" stroke-width="1" />"#,
        x = cx - band * 0.2,
        y = y_q3.min(y_q1),
        w = band * 0.4,
        h = (y_q1 - y_q3).abs().max(1.0),
    ));
    svg.push_str(&format!(
        r#"<line x1="{x1:.2}" y1="{y:.2}" x2="{x2:.2}" y2="{y:.2}" stroke="{color}" stroke-width="2" />"#,
        x1 = cx - band * 0.2,
        x2 = cx + band * 0.2,
        y = y_median,
    ));

    if show_fliers {
        for flier in &stats.fliers {
            svg.push_str(&format!(
                r#"<circle cx="{cx:.2}" cy="{cy:.2}" r="2.5" fill="none" stroke="{color}" stroke-width="1" />"#,
                cy = value_to_y(*flier),
            ));
        }
    }
}

/// Writes a rendered plot to `path`.
pub fn write_svg(path: &Path, svg: &str) -> Result<(), ChartError> {
    std::fs::write(path, svg).map_err(|source| ChartError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), "Wrote plot");
    Ok(())
}
