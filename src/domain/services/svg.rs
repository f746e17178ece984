use crate::domain::model::{Bounds, LineSet, StrokeWidth};
use crate::domain::services::{path_parser, stroke};
use crate::utils::error::{Result, StickbugError};
use roxmltree::{Document, Node, ParsingOptions};

/// 一個 `<path>` 元素中需要的屬性
#[derive(Debug, Clone, PartialEq)]
pub struct PathElement {
    pub style: String,
    pub d: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SvgDocument {
    pub bounds: Bounds,
    pub paths: Vec<PathElement>,
}

/// Containers whose paths are never drawn directly.
const NON_RENDERED: [&str; 6] = ["defs", "marker", "clipPath", "mask", "pattern", "symbol"];

fn dimension(root: Node, name: &str) -> Result<f64> {
    let raw = root.attribute(name).ok_or_else(|| StickbugError::SvgError {
        message: format!("root <svg> element has no '{}' attribute", name),
    })?;
    // 百分比沒有絕對尺寸可以正規化
    if raw.trim_end().ends_with('%') {
        return Err(StickbugError::SvgError {
            message: format!("root {} '{}' is relative, an absolute size is required", name, raw),
        });
    }
    stroke::strip_unit(raw)
        .parse::<f64>()
        .map_err(|_| StickbugError::SvgError {
            message: format!("cannot read {} '{}'", name, raw),
        })
}

fn is_drawn_path(node: &Node) -> bool {
    node.is_element()
        && node.tag_name().name() == "path"
        && !node
            .ancestors()
            .skip(1)
            .any(|ancestor| NON_RENDERED.contains(&ancestor.tag_name().name()))
}

impl SvgDocument {
    /// Reads the root size and every drawn `<path>` element in document order.
    ///
    /// Only the root `width`/`height` and each path's `style`/`d` attributes
    /// are looked at; transforms are ignored. Paths inside `<defs>`, markers,
    /// clip paths and symbols are skipped.
    pub fn parse(content: &str) -> Result<Self> {
        let options = ParsingOptions {
            allow_dtd: true,
            ..ParsingOptions::default()
        };
        let document =
            Document::parse_with_options(content, options).map_err(|e| StickbugError::SvgError {
                message: format!("invalid XML: {}", e),
            })?;

        let root = document.root_element();
        if root.tag_name().name() != "svg" {
            return Err(StickbugError::SvgError {
                message: format!("root element is <{}>, expected <svg>", root.tag_name().name()),
            });
        }
        let bounds = Bounds::new(dimension(root, "width")?, dimension(root, "height")?)?;

        let mut paths = Vec::new();
        for node in root.descendants().filter(is_drawn_path) {
            let d = node.attribute("d").ok_or_else(|| StickbugError::SvgError {
                message: format!("<path> #{} has no 'd' attribute", paths.len()),
            })?;
            let style = node.attribute("style").unwrap_or_default();
            paths.push(PathElement {
                style: style.to_string(),
                d: d.to_string(),
            });
        }

        tracing::debug!(
            "Parsed SVG document {}x{} with {} paths",
            bounds.width(),
            bounds.height(),
            paths.len()
        );
        Ok(Self { bounds, paths })
    }

    /// 先用線寬分出牆，再解析每條路徑的座標
    pub fn extract_lines(&self, default_stroke_width: Option<StrokeWidth>) -> Result<LineSet> {
        let weighted = self
            .paths
            .iter()
            .map(|path| {
                stroke::stroke_width_from_style(&path.style, default_stroke_width)
                    .map(|width| (path, width))
            })
            .collect::<Result<Vec<_>>>()?;

        let (wall, sticks) = stroke::partition_wall(weighted)?;

        let wall_line = path_parser::parse_segment(&wall.d, &self.bounds)?;
        let stick_lines = sticks
            .into_iter()
            .map(|path| path_parser::parse_segment(&path.d, &self.bounds))
            .collect::<Result<Vec<_>>>()?;

        Ok(LineSet {
            wall_line,
            stick_lines,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Point, Segment};

    const DRAWING: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!-- <path d="M 0,0 9,9" style="stroke-width:99"/> -->
<svg xmlns="http://www.w3.org/2000/svg" xmlns:svg="http://www.w3.org/2000/svg" width="200" height="100mm" viewBox="0 0 200 100">
  <g id="layer1">
    <path style="fill:none;stroke:#000;stroke-width:1px" d="m 20,10 20,0" id="stick1" />
    <path
       style="fill:none;stroke:#000;stroke-width:6.5px"
       d="M 0,90 L 200,90"
       id="wall" />
    <svg:path style='stroke-width:1px' d='m 100,20 v 40'/>
  </g>
</svg>"#;

    #[test]
    fn test_parse_document() {
        let document = SvgDocument::parse(DRAWING).unwrap();
        assert_eq!(document.bounds.width(), 200.0);
        assert_eq!(document.bounds.height(), 100.0);
        assert_eq!(document.paths.len(), 3);
        assert_eq!(document.paths[1].d, "M 0,90 L 200,90");
        assert_eq!(document.paths[2].style, "stroke-width:1px");
    }

    #[test]
    fn test_extract_lines() {
        let lines = SvgDocument::parse(DRAWING)
            .unwrap()
            .extract_lines(None)
            .unwrap();

        assert_eq!(
            lines.wall_line,
            Segment::new(Point::new(0.0, 0.9), Point::new(1.0, 0.9))
        );
        assert_eq!(
            lines.stick_lines,
            vec![
                Segment::new(Point::new(0.1, 0.1), Point::new(0.2, 0.1)),
                Segment::new(Point::new(0.5, 0.2), Point::new(0.5, 0.6)),
            ]
        );
    }

    #[test]
    fn test_missing_dimensions() {
        let err = SvgDocument::parse(r#"<svg width="10"><path d="M 0,0 1,1"/></svg>"#).unwrap_err();
        assert!(matches!(err, StickbugError::SvgError { .. }));

        let err = SvgDocument::parse(r#"<svg width="0" height="10"></svg>"#).unwrap_err();
        assert!(matches!(err, StickbugError::InvalidDimensions { .. }));
    }

    #[test]
    fn test_path_without_data() {
        let err = SvgDocument::parse(r#"<svg width="10" height="10"><path style="x:y"/></svg>"#)
            .unwrap_err();
        assert!(matches!(err, StickbugError::SvgError { .. }));
    }

    #[test]
    fn test_default_stroke_width_applies_to_unstyled_paths() {
        let content = r#"<svg width="10" height="10">
            <path d="M 0,0 10,10" style="stroke-width:3"/>
            <path d="M 0,5 5,5"/>
        </svg>"#;
        let document = SvgDocument::parse(content).unwrap();

        assert!(matches!(
            document.extract_lines(None).unwrap_err(),
            StickbugError::MissingStrokeWidth { .. }
        ));
        let lines = document.extract_lines(Some(StrokeWidth(1.0))).unwrap();
        assert_eq!(lines.stick_lines.len(), 1);
        assert_eq!(lines.wall_line.end, Point::new(1.0, 1.0));
    }

    const INKSCAPE_DRAWING: &str = r##"<?xml version="1.0" encoding="UTF-8" standalone="no"?>
<svg
   width="100mm"
   height="50mm"
   viewBox="0 0 100 50"
   xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape"
   xmlns:sodipodi="http://sodipodi.sourceforge.net/DTD/sodipodi-0.dtd"
   xmlns="http://www.w3.org/2000/svg">
  <sodipodi:namedview id="namedview1" inkscape:document-units="mm" />
  <defs id="defs1">
    <inkscape:path-effect effect="spiro" id="path-effect1" is_visible="true" />
    <marker style="overflow:visible" id="ArrowWide" refX="0" refY="0" orient="auto-start-reverse">
      <path style="fill:none;stroke:context-stroke;stroke-width:1" d="M 0,0 5,-5 -12.5,0 5,5 Z" />
    </marker>
    <clipPath id="clip1">
      <path d="M 0,0 H 10 V 10 H 0 Z" />
    </clipPath>
  </defs>
  <g inkscape:label="Layer 1" inkscape:groupmode="layer" id="layer1">
    <path style="fill:none;stroke:#000000;stroke-width:4px" d="M 0,40 H 100" id="wall"
       inkscape:path-effect="#path-effect1" inkscape:original-d="M 0,40 H 100" />
    <path style="fill:none;stroke:#000000;stroke-width:1px;marker-end:url(#ArrowWide)"
       d="m 25,10 v 20" id="stick" />
  </g>
</svg>"##;

    #[test]
    fn test_skips_definitions_and_effects() {
        let document = SvgDocument::parse(INKSCAPE_DRAWING).unwrap();
        assert_eq!(document.paths.len(), 2);

        let lines = document.extract_lines(None).unwrap();
        assert_eq!(
            lines.wall_line,
            Segment::new(Point::new(0.0, 0.8), Point::new(1.0, 0.8))
        );
        assert_eq!(
            lines.stick_lines,
            vec![Segment::new(Point::new(0.25, 0.2), Point::new(0.25, 0.6))]
        );
    }

    #[test]
    fn test_relative_root_size_is_rejected() {
        let content = r#"<svg width="100%" height="100%">
            <path d="M 0,0 10,10" style="stroke-width:3"/>
        </svg>"#;
        let err = SvgDocument::parse(content).unwrap_err();
        assert!(matches!(err, StickbugError::SvgError { .. }));
    }

    #[test]
    fn test_non_svg_root_is_rejected() {
        let err = SvgDocument::parse(r#"<html width="10" height="10"></html>"#).unwrap_err();
        assert!(matches!(err, StickbugError::SvgError { .. }));

        let err = SvgDocument::parse("<svg width=\"10\"").unwrap_err();
        assert!(matches!(err, StickbugError::SvgError { .. }));
    }
}
