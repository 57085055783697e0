//! Scene converter.
//!
//! Interprets the tag tree: checks each tag's attributes against the set it
//! accepts, parses values into typed fields and collects gradient
//! definitions. Tags are converted depth first without recursion, so nesting
//! depth is bounded only by the parser's limit. The first error aborts.

use crate::color::{parse_color, Color};
use crate::config::SceneConfig;
use crate::document::{SceneDocument, SceneElement, SvgCircle, SvgGroup, SvgPath, SvgRect, ViewBox};
use crate::error::{SemanticError, SvgResult};
use crate::gradient::{
    normalize_offsets, Definition, GradientStop, GradientUnits, LinearGradient, SpreadMethod,
};
use crate::style::{FillRule, GraphicsStyle, LineCap, LineJoin, Paint};
use crate::transform::Transform2D;
use svgkit_markup::{ParsedElement, ParsedTag};
use svgkit_path::compile_path;
use svgkit_path::number::{scan_number, skip_comma_whitespace};
use tracing::{debug, trace, warn};

/// Namespace the root element must declare.
pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

const PATH_ATTRIBUTES: &[&str] = &["d"];
const RECT_ATTRIBUTES: &[&str] = &["x", "y", "width", "height", "rx", "ry"];
const CIRCLE_ATTRIBUTES: &[&str] = &["cx", "cy", "r"];
const GROUP_ATTRIBUTES: &[&str] = &["transform"];
const LINEAR_GRADIENT_ATTRIBUTES: &[&str] = &[
    "x1",
    "y1",
    "x2",
    "y2",
    "spreadMethod",
    "gradientUnits",
    "gradientTransform",
];
const STOP_ATTRIBUTES: &[&str] = &["offset", "stop-color", "stop-opacity"];

/// Convert a parsed root element. Comments and text in root position are
/// rejected.
pub fn convert_document(root: &ParsedElement, config: &SceneConfig) -> SvgResult<SceneDocument> {
    match root {
        ParsedElement::Tag(tag) => convert(tag, config),
        ParsedElement::Comment(_) => Err(SemanticError::RootNotATag { kind: "comment" }.into()),
        ParsedElement::Text(_) => Err(SemanticError::RootNotATag { kind: "text run" }.into()),
    }
}

/// Convert a root `svg` tag into a [`SceneDocument`].
pub fn convert(root: &ParsedTag, config: &SceneConfig) -> SvgResult<SceneDocument> {
    if root.name != "svg" {
        return Err(SemanticError::WrongRoot {
            found: root.name.clone(),
            offset: root.offset,
        }
        .into());
    }

    let reader = TagReader { tag: root, config };
    if config.require_namespace {
        let xmlns = root.attributes.get("xmlns");
        if xmlns != Some(SVG_NAMESPACE) {
            return Err(SemanticError::WrongNamespace {
                found: xmlns.map(str::to_string),
                expected: SVG_NAMESPACE,
                offset: root.offset,
            }
            .into());
        }
    }

    let view_box = match root.attributes.get("viewBox") {
        Some(value) => Some(parse_view_box(value).ok_or_else(|| reader.invalid("viewBox", value))?),
        None => None,
    };
    let width = reader.number("width")?;
    let height = reader.number("height")?;

    let mut converter = Converter {
        config,
        definitions: Vec::new(),
    };
    let children = converter.children(root)?;

    let document = SceneDocument {
        view_box,
        width,
        height,
        children,
        definitions: converter.definitions,
    };
    debug!(
        elements = document.element_count(),
        definitions = document.definitions.len(),
        "Converted document"
    );
    Ok(document)
}

/// `min-x min-y width height`, separated by whitespace and/or commas.
fn parse_view_box(value: &str) -> Option<ViewBox> {
    let mut numbers = [0.0_f32; 4];
    let mut pos = skip_comma_whitespace(value, 0);
    for slot in numbers.iter_mut() {
        let (n, end) = scan_number(value, pos)?;
        *slot = n;
        pos = skip_comma_whitespace(value, end);
    }
    if pos != value.len() {
        return None;
    }
    let [min_x, min_y, width, height] = numbers;
    Some(ViewBox {
        min_x,
        min_y,
        width,
        height,
    })
}

/// A user-unit number with an optional `px` suffix.
fn parse_length(value: &str) -> Option<f32> {
    let value = value.trim();
    let number = value.strip_suffix("px").unwrap_or(value);
    number.parse::<f32>().ok().filter(|n| n.is_finite())
}

/// A number, or a percentage mapped to a fraction.
fn parse_number_or_percentage(value: &str) -> Option<f32> {
    let value = value.trim();
    match value.strip_suffix('%') {
        Some(percent) => parse_length(percent).map(|p| p / 100.0),
        None => parse_length(value),
    }
}

/// Attribute access for one tag, producing errors that point at it.
struct TagReader<'a> {
    tag: &'a ParsedTag,
    config: &'a SceneConfig,
}

impl TagReader<'_> {
    fn invalid(&self, attribute: &str, value: &str) -> SemanticError {
        SemanticError::InvalidValue {
            tag: self.tag.name.clone(),
            attribute: attribute.to_string(),
            value: value.to_string(),
            offset: self.tag.offset,
        }
    }

    /// Check every attribute against `id` and the given sets.
    fn check_attributes(&self, accepted: &[&[&str]]) -> Result<(), SemanticError> {
        for name in self.tag.attributes.names() {
            if name == "id" || accepted.iter().any(|set| set.contains(&name)) {
                continue;
            }
            if self.config.strict_attributes {
                return Err(SemanticError::UnknownAttribute {
                    tag: self.tag.name.clone(),
                    attribute: name.to_string(),
                    offset: self.tag.offset,
                });
            }
            warn!(tag = %self.tag.name, attribute = name, offset = self.tag.offset, "Ignoring unknown attribute");
        }
        Ok(())
    }

    fn id(&self) -> Option<String> {
        self.tag.attributes.get("id").map(str::to_string)
    }

    fn required(&self, attribute: &'static str) -> Result<&str, SemanticError> {
        self.tag
            .attributes
            .get(attribute)
            .ok_or_else(|| SemanticError::MissingAttribute {
                tag: self.tag.name.clone(),
                attribute,
                offset: self.tag.offset,
            })
    }

    fn parsed<T>(
        &self,
        attribute: &str,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Result<Option<T>, SemanticError> {
        match self.tag.attributes.get(attribute) {
            Some(value) => parse(value)
                .map(Some)
                .ok_or_else(|| self.invalid(attribute, value)),
            None => Ok(None),
        }
    }

    fn number(&self, attribute: &str) -> Result<Option<f32>, SemanticError> {
        self.parsed(attribute, parse_length)
    }

    fn required_number(&self, attribute: &'static str) -> Result<f32, SemanticError> {
        let value = self.required(attribute)?;
        parse_length(value).ok_or_else(|| self.invalid(attribute, value))
    }

    fn paint(&self, attribute: &str) -> SvgResult<Option<Paint>> {
        match self.tag.attributes.get(attribute) {
            Some(value) => Ok(Paint::parse(value)?),
            None => Ok(None),
        }
    }

    fn style(&self) -> SvgResult<GraphicsStyle> {
        Ok(GraphicsStyle {
            fill: self.paint("fill")?,
            stroke: self.paint("stroke")?,
            stroke_width: self.number("stroke-width")?,
            stroke_line_cap: self.parsed("stroke-linecap", LineCap::parse)?,
            stroke_line_join: self.parsed("stroke-linejoin", LineJoin::parse)?,
            fill_rule: self.parsed("fill-rule", FillRule::parse)?,
            clip_rule: self.parsed("clip-rule", FillRule::parse)?,
        })
    }

    fn transform(&self, attribute: &str) -> SvgResult<Option<Transform2D>> {
        match self.tag.attributes.get(attribute) {
            Some(value) => Ok(Some(Transform2D::parse(value)?)),
            None => Ok(None),
        }
    }
}

/// Outcome of converting one tag.
enum Converted {
    Element(SceneElement),
    /// A group whose children are converted next.
    Group(SvgGroup),
    Skipped,
}

/// The element list new elements go into: the innermost open group, or the
/// top level.
fn innermost<'v, I>(
    open: &'v mut [(I, SvgGroup)],
    top: &'v mut Vec<SceneElement>,
) -> &'v mut Vec<SceneElement> {
    match open.last_mut() {
        Some((_, group)) => &mut group.children,
        None => top,
    }
}

struct Converter<'a> {
    config: &'a SceneConfig,
    definitions: Vec<Definition>,
}

impl<'a> Converter<'a> {
    fn reader<'t>(&self, tag: &'t ParsedTag) -> TagReader<'t>
    where
        'a: 't,
    {
        TagReader {
            tag,
            config: self.config,
        }
    }

    /// Convert the child tags of `parent`, depth first.
    ///
    /// Groups still being filled are kept on `open` together with the
    /// iterator over their parent's remaining children.
    fn children(&mut self, parent: &ParsedTag) -> SvgResult<Vec<SceneElement>> {
        let mut elements = Vec::new();
        let mut open: Vec<(std::slice::Iter<'_, ParsedElement>, SvgGroup)> = Vec::new();
        let mut nodes = parent.children.iter();

        loop {
            let Some(node) = nodes.next() else {
                match open.pop() {
                    Some((rest, group)) => {
                        nodes = rest;
                        innermost(&mut open, &mut elements).push(SceneElement::Group(group));
                        continue;
                    }
                    None => return Ok(elements),
                }
            };
            let Some(tag) = node.as_tag() else {
                continue;
            };
            match self.element(tag)? {
                Converted::Element(element) => innermost(&mut open, &mut elements).push(element),
                Converted::Group(group) => {
                    let rest = std::mem::replace(&mut nodes, tag.children.iter());
                    open.push((rest, group));
                }
                Converted::Skipped => {}
            }
        }
    }

    fn element(&mut self, tag: &ParsedTag) -> SvgResult<Converted> {
        let element = match tag.name.as_str() {
            "g" => return self.group(tag, true).map(Converted::Group),
            "a" => return self.group(tag, false).map(Converted::Group),
            "path" => self.path(tag)?,
            "rect" => self.rect(tag)?,
            "circle" => self.circle(tag)?,
            "linearGradient" => {
                let gradient = self.linear_gradient(tag)?;
                self.definitions.push(gradient);
                return Ok(Converted::Skipped);
            }
            "defs" => {
                self.defs(tag)?;
                return Ok(Converted::Skipped);
            }
            "mask" | "title" => {
                trace!(tag = %tag.name, offset = tag.offset, "Skipping non-rendering element");
                return Ok(Converted::Skipped);
            }
            _ => {
                return Err(SemanticError::UnknownTag {
                    name: tag.name.clone(),
                    offset: tag.offset,
                }
                .into())
            }
        };
        debug!(tag = %tag.name, offset = tag.offset, "Converted element");
        Ok(Converted::Element(element))
    }

    /// A group with no children yet. `g` reads `transform`; `a` accepts any
    /// attribute and ignores it.
    fn group(&self, tag: &ParsedTag, is_g: bool) -> SvgResult<SvgGroup> {
        let reader = self.reader(tag);
        let transform = if is_g {
            reader.check_attributes(&[GROUP_ATTRIBUTES, GraphicsStyle::ATTRIBUTES])?;
            reader.transform("transform")?.unwrap_or_default()
        } else {
            Transform2D::IDENTITY
        };
        debug!(tag = %tag.name, offset = tag.offset, "Converted group");

        Ok(SvgGroup {
            id: reader.id(),
            children: Vec::new(),
            transform,
            style: reader.style()?,
        })
    }

    fn path(&self, tag: &ParsedTag) -> SvgResult<SceneElement> {
        let reader = self.reader(tag);
        reader.check_attributes(&[PATH_ATTRIBUTES, GraphicsStyle::ATTRIBUTES])?;
        let commands = compile_path(reader.required("d")?)?;
        Ok(SceneElement::Path(SvgPath {
            id: reader.id(),
            commands,
            style: reader.style()?,
        }))
    }

    fn rect(&self, tag: &ParsedTag) -> SvgResult<SceneElement> {
        let reader = self.reader(tag);
        reader.check_attributes(&[RECT_ATTRIBUTES, GraphicsStyle::ATTRIBUTES])?;

        let (rx, ry) = match (reader.number("rx")?, reader.number("ry")?) {
            (None, None) => (0.0, 0.0),
            (Some(rx), None) => (rx, rx),
            (None, Some(ry)) => (ry, ry),
            (Some(rx), Some(ry)) => (rx, ry),
        };

        Ok(SceneElement::Rect(SvgRect {
            id: reader.id(),
            x: reader.number("x")?.unwrap_or(0.0),
            y: reader.number("y")?.unwrap_or(0.0),
            width: reader.required_number("width")?,
            height: reader.required_number("height")?,
            rx,
            ry,
            style: reader.style()?,
        }))
    }

    fn circle(&self, tag: &ParsedTag) -> SvgResult<SceneElement> {
        let reader = self.reader(tag);
        reader.check_attributes(&[CIRCLE_ATTRIBUTES, GraphicsStyle::ATTRIBUTES])?;
        Ok(SceneElement::Circle(SvgCircle {
            id: reader.id(),
            cx: reader.required_number("cx")?,
            cy: reader.required_number("cy")?,
            r: reader.required_number("r")?,
            style: reader.style()?,
        }))
    }

    /// Collect gradients from `defs`; other definitions are not rendered.
    fn defs(&mut self, tag: &ParsedTag) -> SvgResult<()> {
        for child in tag.child_tags() {
            if child.name == "linearGradient" {
                let gradient = self.linear_gradient(child)?;
                self.definitions.push(gradient);
            } else {
                trace!(tag = %child.name, offset = child.offset, "Skipping definition");
            }
        }
        Ok(())
    }

    fn linear_gradient(&self, tag: &ParsedTag) -> SvgResult<Definition> {
        let reader = self.reader(tag);
        reader.check_attributes(&[LINEAR_GRADIENT_ATTRIBUTES])?;

        let coordinate = |name: &str| reader.parsed(name, parse_number_or_percentage);
        let id = reader.required("id")?.to_string();
        let x1 = coordinate("x1")?;
        let y1 = coordinate("y1")?;
        let x2 = coordinate("x2")?;
        let y2 = coordinate("y2")?;
        let spread_method = reader
            .parsed("spreadMethod", SpreadMethod::parse)?
            .unwrap_or_default();
        let units = reader.parsed("gradientUnits", GradientUnits::parse)?;
        let transform = reader.transform("gradientTransform")?;

        let mut offsets = Vec::new();
        let mut colors = Vec::new();
        for child in tag.child_tags() {
            if child.name != "stop" {
                return Err(SemanticError::UnknownTag {
                    name: child.name.clone(),
                    offset: child.offset,
                }
                .into());
            }
            let (offset, color) = self.stop(child)?;
            offsets.push(offset);
            colors.push(color);
        }
        normalize_offsets(&mut offsets);
        let stops = offsets
            .into_iter()
            .zip(colors)
            .map(|(offset, color)| GradientStop { offset, color })
            .collect();

        debug!(id = %id, offset = tag.offset, "Converted linear gradient");
        Ok(Definition::LinearGradient(LinearGradient {
            id,
            x1,
            y1,
            x2,
            y2,
            spread_method,
            units,
            transform,
            stops,
        }))
    }

    /// Raw offset and color of a `stop`, with opacity folded into alpha.
    fn stop(&self, tag: &ParsedTag) -> SvgResult<(f32, Color)> {
        let reader = self.reader(tag);
        reader.check_attributes(&[STOP_ATTRIBUTES])?;
        let offset = reader
            .parsed("offset", parse_number_or_percentage)?
            .unwrap_or(0.0);
        let color = match tag.attributes.get("stop-color") {
            Some(value) => parse_color(value)?,
            None => Color::BLACK,
        };
        let opacity = reader.number("stop-opacity")?.unwrap_or(1.0);
        Ok((offset, color.with_opacity(opacity)))
    }
}
