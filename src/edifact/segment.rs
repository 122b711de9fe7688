use std::fmt;

use super::syntax::Syntax;

/// One rendered EDIFACT segment.
///
/// Immutable once built. The rendered text includes the segment terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    tag: String,
    elements: Vec<String>,
    text: String,
}

impl Segment {
    /// Segment tag, e.g. `NAD`.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Data elements as passed to the builder (already escaped).
    pub fn elements(&self) -> &[String] {
        &self.elements
    }

    /// Rendered segment, terminator included.
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Joins pre-escaped data elements into segments.
///
/// The builder never escapes: values must go through [`SegmentBuilder::escape`]
/// exactly once before they are placed into a composite or a segment.
///
/// ```
/// use invoic::edifact::{SegmentBuilder, Syntax};
///
/// let b = SegmentBuilder::new(Syntax::default(), true);
/// let date = b.composite(["137", "20250322", "102"]);
/// assert_eq!(b.build("DTM", [date]).as_str(), "DTM+137:20250322:102'");
/// ```
#[derive(Debug, Clone)]
pub struct SegmentBuilder {
    syntax: Syntax,
    escape_spaces: bool,
}

impl SegmentBuilder {
    pub fn new(syntax: Syntax, escape_spaces: bool) -> Self {
        Self {
            syntax,
            escape_spaces,
        }
    }

    pub fn syntax(&self) -> &Syntax {
        &self.syntax
    }

    /// Escape a raw value with the configured syntax.
    pub fn escape(&self, raw: &str) -> String {
        self.syntax.escape(raw, self.escape_spaces)
    }

    /// Join pre-escaped components into one composite data element.
    pub fn composite<I, S>(&self, components: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        join(components, self.syntax.component_separator)
    }

    /// Build `tag+e1+e2...'` from pre-escaped elements.
    pub fn build<I, S>(&self, tag: &str, elements: I) -> Segment
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let elements: Vec<String> = elements.into_iter().map(Into::into).collect();
        let mut text = String::with_capacity(
            tag.len() + elements.iter().map(|e| e.len() + 1).sum::<usize>() + 1,
        );
        text.push_str(tag);
        for element in &elements {
            text.push(self.syntax.data_separator);
            text.push_str(element);
        }
        text.push(self.syntax.segment_terminator);

        Segment {
            tag: tag.to_string(),
            elements,
            text,
        }
    }
}

fn join<I, S>(parts: I, separator: char) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::new();
    for (i, part) in parts.into_iter().enumerate() {
        if i > 0 {
            out.push(separator);
        }
        out.push_str(part.as_ref());
    }
    out
}
