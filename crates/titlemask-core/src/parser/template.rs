//! # Mask Templates
//!
//! A mask template encodes one known title-naming convention as an ordered
//! sequence of literal segments and named fragment placeholders, compiled
//! once into a matcher anchored to the entire cleaned title. The library
//! holds templates in precedence order: stricter shapes (year + season +
//! episode + name) sit before looser ones, because a loose pattern can
//! spuriously full-match a title a stricter one would parse more precisely.

use std::collections::BTreeMap;

use regex::Regex;

use crate::error::{MaskError, Result};
use crate::parser::fragments::FragmentRegistry;

/// One piece of a template definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSegment {
    /// Text matched verbatim (regex-escaped at compile time).
    Literal(String),
    /// Named reference to a registered fragment.
    Placeholder(String),
}

/// A full-title pattern built from literals and fragment placeholders.
#[derive(Debug, Clone)]
pub struct MaskTemplate {
    definition: String,
    segments: Vec<TemplateSegment>,
    fields: Vec<String>,
    pattern: String,
    regex: Regex,
    rank: usize,
}

impl MaskTemplate {
    /// Compile a `{placeholder}` definition against the registry.
    ///
    /// # Errors
    ///
    /// Unbalanced braces, empty or duplicate placeholders, references to
    /// unregistered fragments, and assembled patterns that fail to compile
    /// are all configuration errors surfaced here, never at match time.
    pub fn compile(definition: &str, rank: usize, registry: &FragmentRegistry) -> Result<Self> {
        let segments = parse_segments(definition)?;

        let mut fields = Vec::new();
        let mut pattern = String::from("^");
        for segment in &segments {
            match segment {
                TemplateSegment::Literal(text) => pattern.push_str(&regex::escape(text)),
                TemplateSegment::Placeholder(name) => {
                    let fragment =
                        registry
                            .get(name)
                            .ok_or_else(|| MaskError::UnknownFragment {
                                definition: definition.to_string(),
                                name: name.clone(),
                            })?;
                    if fields.contains(name) {
                        return Err(MaskError::DuplicatePlaceholder {
                            definition: definition.to_string(),
                            name: name.clone(),
                        });
                    }
                    fields.push(name.clone());
                    pattern.push_str(&format!("(?P<{name}>{fragment})"));
                }
            }
        }
        pattern.push('$');

        let regex = Regex::new(&pattern).map_err(|source| MaskError::InvalidTemplate {
            definition: definition.to_string(),
            source,
        })?;

        Ok(Self {
            definition: definition.to_string(),
            segments,
            fields,
            pattern,
            regex,
            rank,
        })
    }

    /// The original `{placeholder}` definition text.
    pub fn definition(&self) -> &str {
        &self.definition
    }

    /// The assembled, anchored pattern source.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Position of this template in its library; lower rank wins.
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Placeholder names, in definition order. Equal to the capture names
    /// of the compiled matcher.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// The parsed segment sequence.
    pub fn segments(&self) -> &[TemplateSegment] {
        &self.segments
    }

    /// Captured fields if the template matches the entire cleaned title.
    pub fn try_match(&self, cleaned: &str) -> Option<BTreeMap<String, String>> {
        let caps = self.regex.captures(cleaned)?;
        let mut fields = BTreeMap::new();
        for name in &self.fields {
            if let Some(value) = caps.name(name) {
                fields.insert(name.clone(), value.as_str().to_string());
            }
        }
        Some(fields)
    }
}

impl PartialEq for MaskTemplate {
    fn eq(&self, other: &Self) -> bool {
        self.definition == other.definition
            && self.pattern == other.pattern
            && self.rank == other.rank
    }
}

impl Eq for MaskTemplate {}

fn parse_segments(definition: &str) -> Result<Vec<TemplateSegment>> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = definition.chars();

    while let Some(c) = chars.next() {
        match c {
            '{' => {
                let mut name = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    match c {
                        '}' => {
                            closed = true;
                            break;
                        }
                        '{' => {
                            return Err(MaskError::UnbalancedBraces {
                                definition: definition.to_string(),
                            });
                        }
                        other => name.push(other),
                    }
                }
                if !closed {
                    return Err(MaskError::UnbalancedBraces {
                        definition: definition.to_string(),
                    });
                }
                if name.trim().is_empty() {
                    return Err(MaskError::EmptyPlaceholder {
                        definition: definition.to_string(),
                    });
                }
                if !literal.is_empty() {
                    segments.push(TemplateSegment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(TemplateSegment::Placeholder(name));
            }
            '}' => {
                return Err(MaskError::UnbalancedBraces {
                    definition: definition.to_string(),
                });
            }
            other => literal.push(other),
        }
    }
    if !literal.is_empty() {
        segments.push(TemplateSegment::Literal(literal));
    }

    Ok(segments)
}

/// A successful library lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateMatch {
    /// Rank of the winning template.
    pub rank: usize,
    /// Named captures, keyed by placeholder name.
    pub fields: BTreeMap<String, String>,
}

/// Ordered collection of compiled mask templates.
///
/// Built once, immutable afterwards. Order encodes precedence:
/// [`first_match`](Self::first_match) walks templates by rank and the
/// earliest full match wins. No scoring, no best-of-N across templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskLibrary {
    templates: Vec<MaskTemplate>,
}

impl MaskLibrary {
    /// Compile an ordered list of template definitions.
    ///
    /// # Errors
    ///
    /// `MaskError::EmptyLibrary` for an empty list, otherwise the first
    /// template compile error encountered.
    pub fn compile<S: AsRef<str>>(definitions: &[S], registry: &FragmentRegistry) -> Result<Self> {
        if definitions.is_empty() {
            return Err(MaskError::EmptyLibrary);
        }
        let templates = definitions
            .iter()
            .enumerate()
            .map(|(rank, definition)| MaskTemplate::compile(definition.as_ref(), rank, registry))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { templates })
    }

    /// First template, by rank, that fully matches the cleaned title.
    pub fn first_match(&self, cleaned: &str) -> Option<TemplateMatch> {
        self.templates.iter().find_map(|template| {
            template.try_match(cleaned).map(|fields| TemplateMatch {
                rank: template.rank(),
                fields,
            })
        })
    }

    /// The compiled templates, in rank order.
    pub fn templates(&self) -> &[MaskTemplate] {
        &self.templates
    }

    /// Number of templates.
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Returns `true` if the library holds no templates.
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
