use super::{Align, Baseline, Paint, Point, Stroke, Surface, TextStyle};
use std::fmt::Write;

/// Renders drawing calls into a standalone `<svg>` document.
#[derive(Debug, Default)]
pub struct SvgSurface {
    width: f64,
    height: f64,
    defs: String,
    body: String,
    gradients: usize,
}

impl SvgSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> String {
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}"><defs>{defs}</defs>{body}</svg>"#,
            w = num(self.width),
            h = num(self.height),
            defs = self.defs,
            body = self.body,
        )
    }

    /// Returns an SVG paint reference, registering a gradient if needed.
    fn paint(&mut self, paint: &Paint) -> String {
        match paint {
            Paint::Solid(color) => (*color).to_string(),
            Paint::VerticalGradient { top, bottom, stops } => {
                self.gradients += 1;
                let id = format!("grad{}", self.gradients);
                let _ = write!(
                    self.defs,
                    r#"<linearGradient id="{id}" gradientUnits="userSpaceOnUse" x1="0" y1="{}" x2="0" y2="{}">"#,
                    num(*top),
                    num(*bottom)
                );
                for (offset, color) in stops {
                    let _ = write!(self.defs, r#"<stop offset="{}" stop-color="{color}"/>"#, num(*offset));
                }
                self.defs.push_str("</linearGradient>");
                format!("url(#{id})")
            }
        }
    }

    fn stroke_attrs(&mut self, stroke: &Stroke) -> String {
        let paint = self.paint(&stroke.paint);
        format!(r#"stroke="{paint}" stroke-width="{}""#, num(stroke.width))
    }
}

impl Surface for SvgSurface {
    fn clear(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        self.defs.clear();
        self.body.clear();
        self.gradients = 0;
    }

    fn line(&mut self, from: Point, to: Point, stroke: &Stroke) {
        let attrs = self.stroke_attrs(stroke);
        let _ = write!(
            self.body,
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}" {attrs}/>"#,
            num(from.x),
            num(from.y),
            num(to.x),
            num(to.y)
        );
    }

    fn polyline(&mut self, points: &[Point], stroke: &Stroke) {
        if points.len() < 2 {
            return;
        }
        let attrs = self.stroke_attrs(stroke);
        let _ = write!(
            self.body,
            r#"<polyline points="{}" fill="none" stroke-linejoin="round" {attrs}/>"#,
            point_list(points)
        );
    }

    fn area(&mut self, points: &[Point], fill: &Paint) {
        if points.len() < 3 {
            return;
        }
        let fill = self.paint(fill);
        let _ = write!(
            self.body,
            r#"<polygon points="{}" fill="{fill}" stroke="none"/>"#,
            point_list(points)
        );
    }

    fn circle(&mut self, center: Point, radius: f64, fill: &Paint, stroke: Option<&Stroke>) {
        let fill = self.paint(fill);
        let attrs = stroke.map(|s| self.stroke_attrs(s)).unwrap_or_default();
        let _ = write!(
            self.body,
            r#"<circle cx="{}" cy="{}" r="{}" fill="{fill}" {attrs}/>"#,
            num(center.x),
            num(center.y),
            num(radius)
        );
    }

    fn text(&mut self, at: Point, text: &str, style: &TextStyle) {
        let anchor = match style.align {
            Align::Left => "start",
            Align::Center => "middle",
            Align::Right => "end",
        };
        let baseline = match style.baseline {
            Baseline::Alphabetic => "alphabetic",
            Baseline::Middle => "middle",
        };
        let (weight, family) = split_font(style.font);
        let _ = write!(
            self.body,
            r#"<text x="{}" y="{}" fill="{}" font-size="{}" font-family="{}" font-weight="{}" text-anchor="{anchor}" dominant-baseline="{baseline}">{}</text>"#,
            num(at.x),
            num(at.y),
            style.color,
            font_size(style.font),
            family,
            weight,
            escape(text)
        );
    }
}

fn num(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    format!("{rounded}")
}

fn point_list(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", num(p.x), num(p.y)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// `"bold 14px Arial"` -> (`"bold"`, `"Arial"`)
fn split_font(font: &str) -> (&str, &str) {
    let mut parts = font.split_whitespace();
    let first = parts.next().unwrap_or_default();
    if first.ends_with("px") {
        ("normal", parts.next().unwrap_or("sans-serif"))
    } else {
        let _size = parts.next();
        (first, parts.next().unwrap_or("sans-serif"))
    }
}

fn font_size(font: &str) -> &str {
    font.split_whitespace()
        .find(|part| part.ends_with("px"))
        .map_or("12", |part| part.trim_end_matches("px"))
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            other => out.push(other),
        }
    }
    out
}
