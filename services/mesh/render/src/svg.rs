//! SVG serialisation of scenes.

use crate::error::RenderError;
use crate::scene::{Label, Primitive, Scene};
use std::fmt::Write;

const ARROWHEAD_ID: &str = "arrowhead";
const DEFAULT_ARROW_FILL: &str = "#888";

/// Write `scene` as a standalone SVG document
pub fn to_svg(scene: &Scene) -> Result<String, RenderError> {
    let arrow_fill = scene
        .lines()
        .next()
        .map(|line| line.stroke.as_str())
        .unwrap_or(DEFAULT_ARROW_FILL);

    let mut svg = String::new();
    write!(
        svg,
        r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="100%" height="100%" viewBox="0 0 {} {}">
  <defs>
    <marker id="{}" markerWidth="10" markerHeight="7" refX="10" refY="3.5" orient="auto">
      <polygon points="0 0, 10 3.5, 0 7" class="arrowhead" fill="{}" />
    </marker>
  </defs>
"##,
        fmt_num(scene.width),
        fmt_num(scene.height),
        ARROWHEAD_ID,
        escape_xml(arrow_fill),
    )?;

    for primitive in &scene.primitives {
        match primitive {
            Primitive::DirectedLine(line) => {
                writeln!(
                    svg,
                    r#"  <line x1="{}" y1="{}" x2="{}" y2="{}" class="graph-edge" stroke="{}" stroke-width="{}" marker-end="url(#{})" />"#,
                    fmt_num(line.x1),
                    fmt_num(line.y1),
                    fmt_num(line.x2),
                    fmt_num(line.y2),
                    escape_xml(&line.stroke),
                    fmt_num(line.stroke_width),
                    ARROWHEAD_ID,
                )?;
            }
            Primitive::NodeBadge(badge) => {
                writeln!(
                    svg,
                    r#"  <circle cx="{}" cy="{}" r="{}" fill="{}" stroke="{}" stroke-width="{}" />"#,
                    fmt_num(badge.cx),
                    fmt_num(badge.cy),
                    fmt_num(badge.r),
                    escape_xml(&badge.fill),
                    escape_xml(&badge.stroke),
                    fmt_num(badge.stroke_width),
                )?;
                write_label(&mut svg, &badge.label)?;
            }
            Primitive::Placeholder(placeholder) => {
                write_label(&mut svg, &placeholder.label)?;
            }
        }
    }

    svg.push_str("</svg>\n");
    Ok(svg)
}

fn write_label(svg: &mut String, label: &Label) -> Result<(), RenderError> {
    writeln!(
        svg,
        r#"  <text x="{}" y="{}" text-anchor="middle" dominant-baseline="central" font-family="{}" font-size="{}px" font-weight="{}" fill="{}">{}</text>"#,
        fmt_num(label.x),
        fmt_num(label.y),
        escape_xml(&label.font_family),
        fmt_num(label.font_size),
        label.font_weight,
        escape_xml(&label.color),
        escape_xml(&label.text),
    )?;
    Ok(())
}

/// Shortest form that still round-trips at two decimals
fn fmt_num(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        "0".to_string()
    } else if rounded.fract() == 0.0 {
        format!("{:.0}", rounded)
    } else {
        let text = format!("{:.2}", rounded);
        text.trim_end_matches('0').to_string()
    }
}

fn escape_xml(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
