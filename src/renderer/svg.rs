//! SVG generation from scenes

use crate::scene::Scene;
use crate::theme::Theme;

use super::projection::{BoundingBox, Point, Projection};
use super::SvgConfig;

/// Build SVG elements incrementally
pub struct SvgBuilder {
    config: SvgConfig,
    defs: Vec<String>,
    styles: Vec<String>,
    edges: Vec<String>,
    atoms: Vec<String>,
    gradients: Vec<String>,
}

impl SvgBuilder {
    /// Create a new SVG builder
    pub fn new(config: SvgConfig) -> Self {
        Self {
            config,
            defs: vec![],
            styles: vec![],
            edges: vec![],
            atoms: vec![],
            gradients: vec![],
        }
    }

    /// Add CSS rules for edges and atom outlines from a theme
    pub fn add_theme(&mut self, theme: &Theme) {
        let prefix = self.prefix();
        self.styles.push(format!(
            ".{prefix}edge {{ stroke: {}; stroke-width: 1.5; }} .{prefix}atom {{ stroke: {}; stroke-width: 0.5; }}",
            theme.cell_edge(),
            theme.atom_outline()
        ));
    }

    fn prefix(&self) -> String {
        self.config.class_prefix.clone().unwrap_or_default()
    }

    fn indent_str(&self) -> &str {
        if self.config.pretty_print {
            "  "
        } else {
            ""
        }
    }

    fn newline(&self) -> &str {
        if self.config.pretty_print {
            "\n"
        } else {
            ""
        }
    }

    /// Id of the shading gradient for a color, adding it on first use
    pub fn gradient_for(&mut self, color: &str) -> String {
        let index = match self.gradients.iter().position(|c| c == color) {
            Some(i) => i,
            None => {
                self.gradients.push(color.to_string());
                let i = self.gradients.len() - 1;
                self.defs.push(format!(
                    r##"<radialGradient id="{}shade-{}" cx="0.35" cy="0.35" r="0.65"><stop offset="0" stop-color="#ffffff"/><stop offset="0.3" stop-color="{}"/><stop offset="1" stop-color="{}" stop-opacity="0.85"/></radialGradient>"##,
                    self.prefix(),
                    i,
                    escape_xml(color),
                    escape_xml(color)
                ));
                i
            }
        };
        format!("{}shade-{}", self.prefix(), index)
    }

    /// Add a cell edge
    pub fn add_edge(&mut self, from: Point, to: Point) {
        let prefix = self.prefix();
        self.edges.push(format!(
            r#"{}<line class="{}edge" x1="{}" y1="{}" x2="{}" y2="{}"/>"#,
            self.indent_str(),
            prefix,
            fmt_num(from.x),
            fmt_num(from.y),
            fmt_num(to.x),
            fmt_num(to.y)
        ));
    }

    /// Add an atom circle
    pub fn add_atom(&mut self, element: &str, center: Point, r: f64, color: &str) {
        let prefix = self.prefix();
        let gradient = self.gradient_for(color);
        self.atoms.push(format!(
            r#"{}<circle class="{}atom {}{}" cx="{}" cy="{}" r="{}" fill="url(#{})"/>"#,
            self.indent_str(),
            prefix,
            prefix,
            escape_xml(&element.to_ascii_lowercase()),
            fmt_num(center.x),
            fmt_num(center.y),
            fmt_num(r),
            gradient
        ));
    }

    /// Build the final SVG string
    pub fn build(self, viewbox: BoundingBox, background: &str) -> String {
        let padding = self.config.viewbox_padding;
        let vb_x = viewbox.x - padding;
        let vb_y = viewbox.y - padding;
        let vb_w = viewbox.width + 2.0 * padding;
        let vb_h = viewbox.height + 2.0 * padding;

        let nl = self.newline();

        let mut svg = String::new();

        if self.config.standalone {
            svg.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
            svg.push_str(nl);
        }

        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{} {} {} {}">"#,
            fmt_num(vb_x),
            fmt_num(vb_y),
            fmt_num(vb_w),
            fmt_num(vb_h)
        ));
        svg.push_str(nl);

        if !self.styles.is_empty() {
            svg.push_str("  <style>");
            svg.push_str(nl);
            for style in &self.styles {
                svg.push_str("    ");
                svg.push_str(style);
                svg.push_str(nl);
            }
            svg.push_str("  </style>");
            svg.push_str(nl);
        }

        if !self.defs.is_empty() {
            svg.push_str("  <defs>");
            svg.push_str(nl);
            for def in &self.defs {
                svg.push_str("    ");
                svg.push_str(def);
                svg.push_str(nl);
            }
            svg.push_str("  </defs>");
            svg.push_str(nl);
        }

        svg.push_str(&format!(
            r#"{}<rect x="{}" y="{}" width="{}" height="{}" fill="{}"/>"#,
            self.indent_str(),
            fmt_num(vb_x),
            fmt_num(vb_y),
            fmt_num(vb_w),
            fmt_num(vb_h),
            escape_xml(background)
        ));
        svg.push_str(nl);

        // Edges first, atoms on top
        for edge in &self.edges {
            svg.push_str(edge);
            svg.push_str(nl);
        }
        for atom in &self.atoms {
            svg.push_str(atom);
            svg.push_str(nl);
        }

        svg.push_str("</svg>");

        svg
    }
}

/// Render a scene to an SVG string with the default theme
pub fn render_svg(scene: &Scene, config: &SvgConfig) -> String {
    render_svg_with_theme(scene, config, &Theme::default())
}

/// Render a scene to an SVG string with a custom theme
pub fn render_svg_with_theme(scene: &Scene, config: &SvgConfig, theme: &Theme) -> String {
    let projection = Projection::isometric(config.scale);
    let mut builder = SvgBuilder::new(config.clone());
    builder.add_theme(theme);

    let corners = scene.cell.corners().map(|c| projection.project(&c));
    let mut bounds = corners[1..].iter().fold(
        BoundingBox::new(corners[0].x, corners[0].y, 0.0, 0.0),
        |acc, p| acc.union(&BoundingBox::new(p.x, p.y, 0.0, 0.0)),
    );

    if config.show_cell {
        for (from, to) in scene.cell.edges() {
            builder.add_edge(projection.project(&from), projection.project(&to));
        }
    }

    // Painter's order: farthest spheres first
    let mut order: Vec<usize> = (0..scene.spheres.len()).collect();
    order.sort_by(|&i, &j| {
        let di = projection.depth(&scene.spheres[i].center);
        let dj = projection.depth(&scene.spheres[j].center);
        di.total_cmp(&dj)
    });

    for i in order {
        let sphere = &scene.spheres[i];
        let center = projection.project(&sphere.center);
        let r = projection.length(sphere.radius);
        bounds = bounds.union(&BoundingBox::around(center, r));
        builder.add_atom(&sphere.element, center, r, &theme.css_color(&sphere.color));
    }

    builder.build(bounds, theme.background())
}

/// Format a coordinate with at most two decimals
fn fmt_num(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        // avoid "-0"
        return "0".to_string();
    }
    format!("{}", rounded)
}

/// Escape special XML characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Color;
    use crate::scene::{CellBox, Point3, Sphere};

    fn sphere(element: &str, at: Point3, color: &str) -> Sphere {
        Sphere {
            element: element.to_string(),
            center: at,
            color: Color::Token(color.to_string()),
            radius: 0.2,
        }
    }

    fn scene() -> Scene {
        Scene {
            cell: CellBox { a: 1.0, b: 1.0, c: 1.0 },
            spheres: vec![
                sphere("Cl", Point3::new(1.0, 1.0, 1.0), "green"),
                sphere("Na", Point3::new(0.0, 0.0, 0.0), "purple"),
            ],
        }
    }

    #[test]
    fn test_fmt_num() {
        assert_eq!(fmt_num(1.0), "1");
        assert_eq!(fmt_num(70.710678), "70.71");
        assert_eq!(fmt_num(-0.001), "0");
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a < b"), "a &lt; b");
        assert_eq!(escape_xml("a & b"), "a &amp; b");
        assert_eq!(escape_xml("<tag>"), "&lt;tag&gt;");
    }

    #[test]
    fn test_render_scene() {
        let svg = render_svg(&scene(), &SvgConfig::default());

        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert_eq!(svg.matches("cd-edge\"").count(), 12);
        assert_eq!(svg.matches("<circle").count(), 2);
        assert!(svg.contains(r##"fill="#f0f0f0""##));
    }

    #[test]
    fn test_far_spheres_drawn_first() {
        let svg = render_svg(&scene(), &SvgConfig::default());
        let na = svg.find("cd-na").expect("Na circle");
        let cl = svg.find("cd-cl").expect("Cl circle");
        assert!(na < cl, "origin atom is farther from the viewer");
    }

    #[test]
    fn test_shared_color_reuses_gradient() {
        let mut builder = SvgBuilder::new(SvgConfig::default());
        let first = builder.gradient_for("red");
        let second = builder.gradient_for("blue");
        let again = builder.gradient_for("red");
        assert_eq!(first, again);
        assert_ne!(first, second);
        assert_eq!(builder.defs.len(), 2);
    }

    #[test]
    fn test_hide_cell_and_compact_output() {
        let config = SvgConfig::new()
            .with_cell(false)
            .with_standalone(false)
            .with_pretty_print(false);
        let svg = render_svg(&scene(), &config);

        assert!(!svg.contains("<line"));
        assert!(!svg.contains("<?xml"));
        assert!(!svg.contains('\n'));
    }

    #[test]
    fn test_theme_colors_applied() {
        let theme = Theme::from_str("[colors]\nbackground = \"#000000\"\npurple = \"#aa00ff\"")
            .expect("Should parse");
        let svg = render_svg_with_theme(&scene(), &SvgConfig::default(), &theme);
        assert!(svg.contains(r##"fill="#000000""##));
        assert!(svg.contains(r##"stop-color="#aa00ff""##));
    }
}
