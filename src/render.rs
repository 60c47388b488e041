use crate::config::RenderConfig;
use crate::ir::GridNode;
use crate::layout::{CellGeometry, Edge, IconPlacement, NodeGroup, Scene};
use crate::text_metrics;
use crate::theme::Theme;
use anyhow::Result;
use serde_json::Value;
use std::collections::HashSet;
use std::fmt::Write as _;
use std::path::Path;

const ARROW_MARKER_ID: &str = "edge-arrow";

/// Draws the icon of one node inside its inset box.
///
/// The returned fragment uses local coordinates: `(0, 0)` is the top-left of
/// the inset box and `placement.width × placement.height` its extent.
pub trait NodeIcon<T> {
    fn render(
        &self,
        placement: &IconPlacement,
        node: &GridNode<T>,
        incomes: &[&GridNode<T>],
        theme: &Theme,
    ) -> String;
}

/// Alternate multi-segment path for an edge. Returning `None` keeps the
/// straight segment.
pub trait EdgeRouter<T> {
    fn route(&self, edge: &Edge<'_, T>, geometry: &CellGeometry) -> Option<Vec<(f64, f64)>>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultNodeIcon;

impl<T> NodeIcon<T> for DefaultNodeIcon {
    fn render(
        &self,
        placement: &IconPlacement,
        _node: &GridNode<T>,
        _incomes: &[&GridNode<T>],
        theme: &Theme,
    ) -> String {
        format!(
            "<rect x=\"0\" y=\"0\" width=\"{:.2}\" height=\"{:.2}\" rx=\"{:.2}\" ry=\"{:.2}\"/>",
            placement.width, placement.height, theme.node_corner_radius, theme.node_corner_radius
        )
    }
}

/// Frame plus a text label read from `payload.label`, falling back to the id.
#[derive(Debug, Clone, Copy, Default)]
pub struct LabeledIcon;

impl NodeIcon<Value> for LabeledIcon {
    fn render(
        &self,
        placement: &IconPlacement,
        node: &GridNode<Value>,
        incomes: &[&GridNode<Value>],
        theme: &Theme,
    ) -> String {
        let mut svg = DefaultNodeIcon.render(placement, node, incomes, theme);
        let label = node
            .payload
            .get("label")
            .and_then(Value::as_str)
            .unwrap_or(node.id.as_str());
        if label.is_empty() {
            return svg;
        }
        let font_size = text_metrics::fit_font_size(
            label,
            (placement.width * 0.86) as f32,
            theme.font_size,
            &theme.font_family,
        );
        let _ = write!(
            svg,
            "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" dominant-baseline=\"central\" font-family=\"{}\" font-size=\"{:.2}\" fill=\"{}\" stroke=\"none\">{}</text>",
            placement.width / 2.0,
            placement.height / 2.0,
            escape_xml(&theme.font_family),
            font_size,
            escape_xml(&theme.node_text_color),
            escape_xml(label)
        );
        svg
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StraightEdges;

impl<T> EdgeRouter<T> for StraightEdges {
    fn route(&self, _edge: &Edge<'_, T>, _geometry: &CellGeometry) -> Option<Vec<(f64, f64)>> {
        None
    }
}

pub fn render_svg<T>(scene: &Scene<'_, T>, theme: &Theme, config: &RenderConfig) -> String {
    render_svg_with(scene, theme, config, &DefaultNodeIcon, &StraightEdges)
}

pub fn render_svg_with<T>(
    scene: &Scene<'_, T>,
    theme: &Theme,
    config: &RenderConfig,
    icon: &dyn NodeIcon<T>,
    router: &dyn EdgeRouter<T>,
) -> String {
    let mut svg = String::new();
    let width = scene.width;
    let height = scene.height;

    let _ = write!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" version=\"1.1\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    );

    let background = config.background.as_deref().unwrap_or(theme.background.as_str());
    if background != "none" && background != "transparent" {
        let _ = write!(
            svg,
            "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
            escape_xml(background)
        );
    }

    let _ = write!(
        svg,
        "<defs><marker id=\"{ARROW_MARKER_ID}\" viewBox=\"0 0 10 10\" refX=\"10\" refY=\"5\" markerWidth=\"6\" markerHeight=\"6\" orient=\"auto-start-reverse\"><path d=\"M 0 0 L 10 5 L 0 10 z\" fill=\"{}\" stroke=\"none\"/></marker></defs>",
        escape_xml(&theme.line_color)
    );

    for group in &scene.groups {
        render_group(&mut svg, scene, group, theme, config, icon, router);
    }

    if theme.anchor_radius > 0.0 {
        render_anchor_points(&mut svg, scene, theme);
    }

    svg.push_str("</svg>");
    svg
}

fn render_group<T>(
    svg: &mut String,
    scene: &Scene<'_, T>,
    group: &NodeGroup<'_, T>,
    theme: &Theme,
    config: &RenderConfig,
    icon: &dyn NodeIcon<T>,
    router: &dyn EdgeRouter<T>,
) {
    let _ = write!(
        svg,
        "<g class=\"node-group\" data-node=\"{}\" stroke-width=\"{}\" fill=\"{}\" stroke=\"{}\">",
        escape_xml(&group.node.id),
        theme.node_stroke_width,
        escape_xml(&theme.node_fill),
        escape_xml(&theme.node_stroke)
    );

    let incomes: Vec<&str> = group.incomes.iter().map(|n| n.id.as_str()).collect();
    let placement = &group.icon;
    let _ = write!(
        svg,
        "<g class=\"node-icon-group\" data-node=\"{}\" data-incomes=\"{}\"><svg x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" overflow=\"visible\">{}</svg></g>",
        escape_xml(&group.node.id),
        escape_xml(&incomes.join(" ")),
        placement.x,
        placement.y,
        placement.width,
        placement.height,
        icon.render(placement, group.node, &group.incomes, theme)
    );

    let line_color = escape_xml(&theme.line_color);
    for edge in &group.edges {
        let key = escape_xml(&edge.key());
        let node_id = escape_xml(&edge.node.id);
        let income_id = escape_xml(&edge.income.id);
        if let Some(points) = router.route(edge, &scene.geometry) {
            let _ = write!(
                svg,
                "<path id=\"{key}\" class=\"node-polyline\" data-node=\"{node_id}\" data-income=\"{income_id}\" d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\"/>",
                points_to_path(&points),
                line_color,
                theme.line_width
            );
            continue;
        }
        let ([x1, y1, x2, y2], marker) = if config.arrowheads {
            (edge.flow(), format!(" marker-end=\"url(#{ARROW_MARKER_ID})\""))
        } else {
            (edge.line, String::new())
        };
        let _ = write!(
            svg,
            "<line id=\"{key}\" class=\"node-line\" data-node=\"{node_id}\" data-income=\"{income_id}\" x1=\"{x1:.2}\" y1=\"{y1:.2}\" x2=\"{x2:.2}\" y2=\"{y2:.2}\" stroke=\"{}\" stroke-width=\"{}\"{marker}/>",
            line_color,
            theme.line_width
        );
    }

    svg.push_str("</g>");
}

fn render_anchor_points<T>(svg: &mut String, scene: &Scene<'_, T>, theme: &Theme) {
    let mut seen = HashSet::new();
    for edge in scene.edges() {
        for node in [edge.node, edge.income] {
            if !node.is_anchor || !seen.insert(node.id.as_str()) {
                continue;
            }
            let (cx, cy) = scene.geometry.cell_center(node.x, node.y);
            let _ = write!(
                svg,
                "<circle class=\"anchor-point\" data-node=\"{}\" cx=\"{cx:.2}\" cy=\"{cy:.2}\" r=\"{:.2}\" fill=\"{}\" stroke=\"none\"/>",
                escape_xml(&node.id),
                theme.anchor_radius,
                escape_xml(&theme.anchor_color)
            );
        }
    }
}

fn points_to_path(points: &[(f64, f64)]) -> String {
    let mut d = String::new();
    for (idx, (x, y)) in points.iter().enumerate() {
        let cmd = if idx == 0 { "M" } else { " L" };
        let _ = write!(d, "{cmd} {x:.2} {y:.2}");
    }
    d
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let scale = render_cfg.png_scale;
    if !scale.is_finite() || scale <= 0.0 {
        return Err(anyhow::anyhow!("Invalid PNG scale: {}", scale));
    }

    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size();
    let width = (size.width() * scale).ceil() as u32;
    let height = (size.height() * scale).ceil() as u32;
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width.max(1), height.max(1))
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap_mut,
    );
    pixmap.save_png(output)?;
    Ok(())
}

pub fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Grid;
    use crate::layout::compose_scene;
    use serde_json::json;

    fn labeled_pair() -> Grid<Value> {
        [
            GridNode::new("a", 0, 0, json!({ "label": "A<1>" })),
            GridNode::new("b", 0, 1, json!({})).with_incomes(["a"]),
        ]
        .into_iter()
        .collect()
    }

    struct Elbow;

    impl<T> EdgeRouter<T> for Elbow {
        fn route(&self, edge: &Edge<'_, T>, _geometry: &CellGeometry) -> Option<Vec<(f64, f64)>> {
            let (x1, y1) = edge.start();
            let (x2, y2) = edge.end();
            Some(vec![(x1, y1), (x1, y2), (x2, y2)])
        }
    }

    #[test]
    fn render_svg_basic() {
        let grid = labeled_pair();
        let scene = compose_scene(&grid, 50.0, 5.0, 4, 3).unwrap();
        let svg = render_svg(&scene, &Theme::default(), &RenderConfig::default());
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("width=\"200\" height=\"150\""));
        assert!(svg.contains("class=\"node-line\""));
        assert!(svg.contains("id=\"line-b-a\""));
        assert!(svg.contains("stroke=\"#2d578b\""));
        assert_eq!(svg.matches("class=\"node-icon-group\"").count(), 2);
    }

    #[test]
    fn empty_scene_still_sized() {
        let grid: Grid<()> = Grid::new();
        let scene = compose_scene(&grid, 50.0, 0.0, 4, 3).unwrap();
        let svg = render_svg(&scene, &Theme::default(), &RenderConfig::default());
        assert!(svg.contains("width=\"200\" height=\"150\""));
        assert!(!svg.contains("node-group"));
    }

    #[test]
    fn labeled_icon_escapes_payload_label() {
        let grid = labeled_pair();
        let scene = compose_scene(&grid, 50.0, 5.0, 1, 2).unwrap();
        let svg = render_svg_with(
            &scene,
            &Theme::default(),
            &RenderConfig::default(),
            &LabeledIcon,
            &StraightEdges,
        );
        assert!(svg.contains("A&lt;1&gt;"));
        // "b" has no label and falls back to its id.
        assert!(svg.contains(">b</text>"));
    }

    #[test]
    fn arrowheads_emit_flow_order() {
        let grid = labeled_pair();
        let scene = compose_scene(&grid, 40.0, 5.0, 1, 2).unwrap();
        let config = RenderConfig {
            arrowheads: true,
            ..RenderConfig::default()
        };
        let svg = render_svg(&scene, &Theme::default(), &config);
        assert!(svg.contains(
            "x1=\"20.00\" y1=\"35.00\" x2=\"20.00\" y2=\"45.00\""
        ));
        assert!(svg.contains("marker-end=\"url(#edge-arrow)\""));

        let plain = render_svg(&scene, &Theme::default(), &RenderConfig::default());
        assert!(plain.contains("x1=\"20.00\" y1=\"45.00\" x2=\"20.00\" y2=\"35.00\""));
        assert!(!plain.contains("marker-end"));
    }

    #[test]
    fn router_replaces_straight_lines() {
        let grid: Grid<()> = [
            GridNode::new("a", 0, 0, ()),
            GridNode::new("b", 2, 1, ()).with_incomes(["a"]),
        ]
        .into_iter()
        .collect();
        let scene = compose_scene(&grid, 40.0, 5.0, 3, 2).unwrap();
        let svg = render_svg_with(
            &scene,
            &Theme::default(),
            &RenderConfig::default(),
            &DefaultNodeIcon,
            &Elbow,
        );
        assert!(svg.contains("class=\"node-polyline\""));
        assert!(!svg.contains("class=\"node-line\""));
        assert!(svg.contains("d=\"M 85.00 60.00 L 85.00 20.00 L 35.00 20.00\""));
    }

    #[test]
    fn anchor_points_drawn_when_radius_set() {
        let grid: Grid<()> = [
            GridNode::new("a", 0, 0, ()),
            GridNode::anchor("p", 2, 0, ()),
            GridNode::new("b", 2, 2, ()).with_incomes(["p"]),
            GridNode::new("c", 0, 2, ()).with_incomes(["p", "a"]),
        ]
        .into_iter()
        .collect();
        let scene = compose_scene(&grid, 40.0, 5.0, 3, 3).unwrap();
        let svg = render_svg(&scene, &Theme::blueprint(), &RenderConfig::default());
        assert_eq!(svg.matches("class=\"anchor-point\"").count(), 1);
        let plain = render_svg(&scene, &Theme::default(), &RenderConfig::default());
        assert!(!plain.contains("anchor-point"));
    }

    #[test]
    fn theme_strings_are_escaped_in_attributes() {
        let grid: Grid<()> = [
            GridNode::new("a", 0, 0, ()),
            GridNode::anchor("p", 1, 0, ()),
            GridNode::new("b", 1, 1, ()).with_incomes(["a", "p"]),
        ]
        .into_iter()
        .collect();
        let scene = compose_scene(&grid, 40.0, 5.0, 2, 2).unwrap();
        let theme = Theme {
            node_fill: "red\" onload=\"x".to_string(),
            node_stroke: "<blue>".to_string(),
            line_color: "a&b".to_string(),
            anchor_color: "'c'".to_string(),
            ..Theme::blueprint()
        };
        let config = RenderConfig {
            background: Some("\"><script/>".to_string()),
            ..RenderConfig::default()
        };
        let svg = render_svg(&scene, &theme, &config);
        assert!(svg.contains("fill=\"red&quot; onload=&quot;x\""));
        assert!(svg.contains("stroke=\"&lt;blue&gt;\""));
        assert!(svg.contains("stroke=\"a&amp;b\""));
        assert!(svg.contains("fill=\"&apos;c&apos;\""));
        assert!(svg.contains("fill=\"&quot;&gt;&lt;script/&gt;\""));
        assert!(!svg.contains("<script"));
        assert!(!svg.contains("<blue>"));
    }

    #[test]
    fn escape_xml_handles_specials() {
        assert_eq!(escape_xml("<a & 'b'>"), "&lt;a &amp; &apos;b&apos;&gt;");
    }
}
