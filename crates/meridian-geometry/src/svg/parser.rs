//! Document traversal.

use glam::Vec2;
use roxmltree::{Document, Node, ParsingOptions};

use super::color::parse_color;
use super::css::{Declarations, StyleSheet, parse_declarations};
use super::numbers::parse_floats;
use super::path_data::parse_path_data;
use super::units::UnitConverter;
use super::{SvgData, SvgOptions, SvgRoot};
use crate::error::{SvgError, SvgResult};
use crate::path::Path;
use crate::shape_path::{NodeInfo, ShapePath};
use crate::style::NodeStyle;
use crate::transform::Transform2D;

const XLINK_NS: &str = "http://www.w3.org/1999/xlink";

/// Kappa for approximating a quarter ellipse with a cubic, as `1 - k`.
const ROUNDED_CORNER: f32 = 1.0 - 0.551915024494;

/// Presentation properties picked up by the cascade.
const STYLE_PROPERTIES: [&str; 11] = [
    "fill",
    "fill-opacity",
    "fill-rule",
    "opacity",
    "stroke",
    "stroke-opacity",
    "stroke-width",
    "stroke-linejoin",
    "stroke-linecap",
    "stroke-miterlimit",
    "visibility",
];

pub(crate) fn parse_document(text: &str, options: &SvgOptions) -> SvgResult<SvgData> {
    let doc = Document::parse_with_options(
        text,
        ParsingOptions {
            allow_dtd: true,
            ..ParsingOptions::default()
        },
    )?;

    let root = doc.root_element();
    if root.tag_name().name() != "svg" {
        return Err(SvgError::NotSvg(root.tag_name().name().to_string()));
    }

    let mut walker = TreeWalker {
        options,
        units: UnitConverter::new(options.default_unit, options.default_dpi),
        stylesheet: StyleSheet::new(),
        transforms: Vec::new(),
        paths: Vec::new(),
        doc: &doc,
        use_depth: 0,
    };
    walker.collect_stylesheets();
    walker.visit(root, &NodeStyle::default())?;

    let root_info = walker.root_info(root);
    Ok(SvgData {
        paths: walker.paths,
        root: root_info,
    })
}

struct TreeWalker<'a, 'input> {
    options: &'a SvgOptions,
    units: UnitConverter,
    stylesheet: StyleSheet,
    /// Accumulated transforms of the ancestors that declared one.
    transforms: Vec<Transform2D>,
    paths: Vec<ShapePath>,
    doc: &'a Document<'input>,
    use_depth: usize,
}

impl<'a, 'input> TreeWalker<'a, 'input> {
    /// Gather every `<style>` element up front so rules apply regardless of position.
    fn collect_stylesheets(&mut self) {
        for node in self.doc.descendants().filter(|n| n.has_tag_name("style")) {
            let text: String = node
                .descendants()
                .filter(|n| n.is_text())
                .filter_map(|n| n.text())
                .collect();
            self.stylesheet.parse(&text);
        }
        tracing::trace!("Collected {} style rules", self.stylesheet.len());
    }

    fn root_info(&self, root: Node<'_, '_>) -> SvgRoot {
        let view_box = root
            .attribute("viewBox")
            .and_then(|v| parse_floats(v, None).ok())
            .and_then(|v| <[f32; 4]>::try_from(v.as_slice()).ok());
        SvgRoot {
            width: root.attribute("width").map(|v| self.units.parse(v)),
            height: root.attribute("height").map(|v| self.units.parse(v)),
            view_box,
        }
    }

    fn current_transform(&self) -> Transform2D {
        self.transforms.last().copied().unwrap_or_default()
    }

    fn length(&self, node: Node<'_, '_>, name: &str) -> f32 {
        node.attribute(name).map_or(0.0, |v| self.units.parse(v))
    }

    fn visit(&mut self, node: Node<'a, 'input>, inherited: &NodeStyle) -> SvgResult<()> {
        if !node.is_element() {
            return Ok(());
        }

        let pushed = self.push_transform(node)?;
        let tag = node.tag_name().name();

        let mut style = inherited.clone();
        let mut is_defs = false;
        let mut path = None;

        match tag {
            "svg" | "g" => style = self.cascade(node, &style),
            "path" => {
                style = self.cascade(node, &style);
                if let Some(d) = node.attribute("d") {
                    path = parse_path_data(d)?;
                }
            }
            "rect" => {
                style = self.cascade(node, &style);
                path = Some(self.rect(node));
            }
            "polygon" => {
                style = self.cascade(node, &style);
                path = Some(self.poly(node, true));
            }
            "polyline" => {
                style = self.cascade(node, &style);
                path = Some(self.poly(node, false));
            }
            "circle" => {
                style = self.cascade(node, &style);
                path = Some(self.circle(node));
            }
            "ellipse" => {
                style = self.cascade(node, &style);
                path = Some(self.ellipse(node));
            }
            "line" => {
                style = self.cascade(node, &style);
                path = Some(self.line(node));
            }
            "defs" => is_defs = true,
            "use" => {
                style = self.cascade(node, &style);
                self.use_reference(node, &style)?;
            }
            _ => {}
        }

        if let Some(mut path) = path {
            if style.has_fill() {
                path.color = parse_color(&style.fill);
                if path.color.is_none() && !style.fill.starts_with("url") {
                    tracing::warn!("Unrecognized fill color \"{}\"", style.fill);
                }
            }

            let transform = self.current_transform();
            let mut exact = true;
            for subpath in &mut path.subpaths {
                exact &= transform.apply_to_path(subpath);
            }
            if !exact {
                tracing::warn!("Skewed elliptic arcs are approximated without the skew");
            }

            path.style = style.clone();
            path.node = NodeInfo {
                tag: tag.to_string(),
                id: node.attribute("id").map(str::to_string),
            };
            self.paths.push(path);
        }

        for child in node.children() {
            // Inside <defs> only stylesheets and nested defs are walked.
            if is_defs && !child.has_tag_name("style") && !child.has_tag_name("defs") {
                continue;
            }
            self.visit(child, &style)?;
        }

        if pushed {
            self.transforms.pop();
        }
        Ok(())
    }

    fn use_reference(&mut self, node: Node<'a, 'input>, style: &NodeStyle) -> SvgResult<()> {
        let href = node
            .attribute((XLINK_NS, "href"))
            .or_else(|| node.attribute("href"))
            .unwrap_or("");
        let id = href.strip_prefix('#').unwrap_or(href);
        if id.is_empty() {
            tracing::warn!("'use' node without a reference");
            return Ok(());
        }

        if self.use_depth >= self.options.max_use_depth {
            tracing::warn!(
                "'use' nesting deeper than {} at #{}, skipping",
                self.options.max_use_depth,
                id
            );
            return Ok(());
        }

        let doc = self.doc;
        match doc.descendants().find(|n| n.attribute("id") == Some(id)) {
            Some(target) => {
                self.use_depth += 1;
                let result = self.visit(target, style);
                self.use_depth -= 1;
                result
            }
            None => {
                tracing::warn!("'use' references non-existent node id: {}", id);
                Ok(())
            }
        }
    }

    /// Push the node's transform combined with its ancestors'. Returns whether one was pushed.
    fn push_transform(&mut self, node: Node<'_, '_>) -> SvgResult<bool> {
        let is_use = node.has_tag_name("use");
        let has_offset = is_use && (node.has_attribute("x") || node.has_attribute("y"));
        if !node.has_attribute("transform") && !has_offset {
            return Ok(false);
        }

        let mut local = Transform2D::IDENTITY;
        if has_offset {
            local = Transform2D::translate(Vec2::new(self.length(node, "x"), self.length(node, "y")));
        }
        if let Some(text) = node.attribute("transform") {
            // The use offset applies before the element's own transform.
            local = local.then(&parse_transform_list(text)?);
        }

        let combined = local.then(&self.current_transform());
        self.transforms.push(combined);
        Ok(true)
    }

    fn cascade(&self, node: Node<'_, '_>, inherited: &NodeStyle) -> NodeStyle {
        let mut style = inherited.clone();

        let mut sheet = Declarations::new();
        if let Some(classes) = node.attribute("class") {
            for class in classes.split_whitespace() {
                if let Some(rule) = self.stylesheet.rule(&format!(".{}", class)) {
                    sheet.extend(rule.iter().map(|(k, v)| (k.clone(), v.clone())));
                }
            }
        }
        if let Some(id) = node.attribute("id") {
            if let Some(rule) = self.stylesheet.rule(&format!("#{}", id)) {
                sheet.extend(rule.iter().map(|(k, v)| (k.clone(), v.clone())));
            }
        }
        let inline = node.attribute("style").map(parse_declarations).unwrap_or_default();

        for name in STYLE_PROPERTIES {
            let value = inline
                .get(name)
                .or_else(|| sheet.get(name))
                .map(String::as_str)
                .or_else(|| node.attribute(name));
            if let Some(value) = value {
                self.apply_property(&mut style, name, value);
            }
        }

        style
    }

    fn apply_property(&self, style: &mut NodeStyle, name: &str, value: &str) {
        let value = value.trim();
        let unit = |v: &str| Some(self.units.parse(v)).filter(|n| !n.is_nan());
        let clamped = |v: &str| unit(v).map(|n| n.clamp(0.0, 1.0));
        let positive = |v: &str| unit(v).map(|n| n.max(0.0));

        let paint = |v: &str| {
            if v.starts_with("url") {
                tracing::warn!("url access in attributes is not implemented");
            }
            v.to_string()
        };

        match name {
            "fill" => style.fill = paint(value),
            "stroke" => style.stroke = paint(value),
            "fill-rule" => style.fill_rule = value.to_string(),
            "stroke-linejoin" => style.stroke_line_join = value.to_string(),
            "stroke-linecap" => style.stroke_line_cap = value.to_string(),
            "visibility" => style.visibility = value.to_string(),
            "fill-opacity" => {
                if let Some(v) = clamped(value) {
                    style.fill_opacity = v;
                }
            }
            "opacity" => {
                if let Some(v) = clamped(value) {
                    style.opacity = v;
                }
            }
            "stroke-opacity" => {
                if let Some(v) = clamped(value) {
                    style.stroke_opacity = v;
                }
            }
            "stroke-width" => {
                if let Some(v) = positive(value) {
                    style.stroke_width = v;
                }
            }
            "stroke-miterlimit" => {
                if let Some(v) = positive(value) {
                    style.stroke_miter_limit = v;
                }
            }
            _ => {}
        }
    }

    fn rect(&self, node: Node<'_, '_>) -> ShapePath {
        let x = self.length(node, "x");
        let y = self.length(node, "y");
        let w = self.length(node, "width");
        let h = self.length(node, "height");

        // A missing radius takes the other one.
        let rx_attr = node.attribute("rx").or_else(|| node.attribute("ry"));
        let ry_attr = node.attribute("ry").or_else(|| node.attribute("rx"));
        let rx = rx_attr.map_or(0.0, |v| self.units.parse(v)).max(0.0).min(w.abs() / 2.0);
        let ry = ry_attr.map_or(0.0, |v| self.units.parse(v)).max(0.0).min(h.abs() / 2.0);
        let rounded = rx != 0.0 || ry != 0.0;
        let k = ROUNDED_CORNER;

        let mut path = ShapePath::new();
        path.move_to(Vec2::new(x + rx, y));
        path.line_to(Vec2::new(x + w - rx, y));
        if rounded {
            path.bezier_curve_to(
                Vec2::new(x + w - rx * k, y),
                Vec2::new(x + w, y + ry * k),
                Vec2::new(x + w, y + ry),
            );
        }
        path.line_to(Vec2::new(x + w, y + h - ry));
        if rounded {
            path.bezier_curve_to(
                Vec2::new(x + w, y + h - ry * k),
                Vec2::new(x + w - rx * k, y + h),
                Vec2::new(x + w - rx, y + h),
            );
        }
        path.line_to(Vec2::new(x + rx, y + h));
        if rounded {
            path.bezier_curve_to(
                Vec2::new(x + rx * k, y + h),
                Vec2::new(x, y + h - ry * k),
                Vec2::new(x, y + h - ry),
            );
        }
        path.line_to(Vec2::new(x, y + ry));
        if rounded {
            path.bezier_curve_to(
                Vec2::new(x, y + ry * k),
                Vec2::new(x + rx * k, y),
                Vec2::new(x + rx, y),
            );
        }
        path
    }

    fn poly(&self, node: Node<'_, '_>, closed: bool) -> ShapePath {
        let numbers = match parse_floats(node.attribute("points").unwrap_or(""), None) {
            Ok(numbers) => numbers,
            Err(err) => {
                tracing::warn!("Malformed points list ({}), using the parsed prefix", err);
                err.partial
            }
        };

        let mut path = ShapePath::new();
        for (i, pair) in numbers.chunks_exact(2).enumerate() {
            let point = Vec2::new(pair[0], pair[1]);
            if i == 0 {
                path.move_to(point);
            } else {
                path.line_to(point);
            }
        }
        if closed && !path.subpaths.is_empty() {
            path.current_path().auto_close = true;
        }
        path
    }

    fn circle(&self, node: Node<'_, '_>) -> ShapePath {
        let center = Vec2::new(self.length(node, "cx"), self.length(node, "cy"));
        let r = self.length(node, "r");

        let mut subpath = Path::new();
        subpath.absarc(center, r, 0.0, std::f32::consts::TAU, false);

        let mut path = ShapePath::new();
        path.push_subpath(subpath);
        path
    }

    fn ellipse(&self, node: Node<'_, '_>) -> ShapePath {
        let center = Vec2::new(self.length(node, "cx"), self.length(node, "cy"));
        let radii = Vec2::new(self.length(node, "rx"), self.length(node, "ry"));

        let mut subpath = Path::new();
        subpath.absellipse(center, radii, 0.0, std::f32::consts::TAU, false, 0.0);

        let mut path = ShapePath::new();
        path.push_subpath(subpath);
        path
    }

    fn line(&self, node: Node<'_, '_>) -> ShapePath {
        let mut path = ShapePath::new();
        path.move_to(Vec2::new(self.length(node, "x1"), self.length(node, "y1")));
        path.line_to(Vec2::new(self.length(node, "x2"), self.length(node, "y2")));
        path
    }
}

/// Parse a `transform` attribute such as `translate(10 5) rotate(45)`.
///
/// The result applies the listed transforms right to left. Unknown or
/// malformed entries are ignored.
pub(crate) fn parse_transform_list(text: &str) -> SvgResult<Transform2D> {
    let mut transform = Transform2D::IDENTITY;

    for entry in text.split(')').rev() {
        let entry = entry.trim_start_matches(|c: char| c == ',' || c.is_whitespace()).trim_end();
        if entry.is_empty() {
            continue;
        }
        let Some(open) = entry.find('(') else {
            continue;
        };
        if open == 0 {
            continue;
        }

        let name = entry[..open].trim();
        let args = parse_floats(&entry[open + 1..], None)?;

        let current = match (name, args.as_slice()) {
            ("translate", [tx]) => Transform2D::translate(Vec2::new(*tx, 0.0)),
            ("translate", [tx, ty, ..]) => Transform2D::translate(Vec2::new(*tx, *ty)),
            ("rotate", [angle]) | ("rotate", [angle, _]) => Transform2D::rotate(angle.to_radians()),
            ("rotate", [angle, cx, cy, ..]) => {
                Transform2D::rotate_about(angle.to_radians(), Vec2::new(*cx, *cy))
            }
            ("scale", [s]) => Transform2D::scale(*s),
            ("scale", [sx, sy, ..]) => Transform2D::scale_xy(Vec2::new(*sx, *sy)),
            ("skewX", [angle]) => Transform2D::skew_x(angle.to_radians()),
            ("skewY", [angle]) => Transform2D::skew_y(angle.to_radians()),
            ("matrix", [a, b, c, d, e, f]) => Transform2D::from_svg_matrix(*a, *b, *c, *d, *e, *f),
            _ => {
                tracing::warn!("Ignoring transform \"{}\"", entry);
                Transform2D::IDENTITY
            }
        };

        // Entries are visited last to first, each one applies after the ones to its right.
        transform = transform.then(&current);
    }

    Ok(transform)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn test_transform_list_order() {
        // translate is outermost, so the scale applies first.
        let t = parse_transform_list("translate(10, 0) scale(2)").unwrap();
        assert!(close(t.transform_point(Vec2::new(1.0, 1.0)), Vec2::new(12.0, 2.0)));

        let t = parse_transform_list("scale(2), translate(10 0)").unwrap();
        assert!(close(t.transform_point(Vec2::new(1.0, 1.0)), Vec2::new(22.0, 2.0)));
    }

    #[test]
    fn test_transform_kinds() {
        let rotate = parse_transform_list("rotate(90 1 1)").unwrap();
        assert!(close(rotate.transform_point(Vec2::new(2.0, 1.0)), Vec2::new(1.0, 2.0)));

        let matrix = parse_transform_list("matrix(1 0 0 1 5 6)").unwrap();
        assert!(close(matrix.transform_point(Vec2::ZERO), Vec2::new(5.0, 6.0)));

        let skew = parse_transform_list("skewX(45)").unwrap();
        assert!(close(skew.transform_point(Vec2::new(0.0, 1.0)), Vec2::new(1.0, 1.0)));

        let scale = parse_transform_list("scale(2 3)").unwrap();
        assert!(close(scale.transform_point(Vec2::ONE), Vec2::new(2.0, 3.0)));
    }

    #[test]
    fn test_transform_unknown_is_identity() {
        let t = parse_transform_list("perspective(3)").unwrap();
        assert_eq!(t, Transform2D::IDENTITY);
    }

    #[test]
    fn test_transform_malformed_numbers_fail() {
        assert!(parse_transform_list("translate(1..2)").is_err());
    }
}
