//! Streaming attribute patcher built on quick-xml.
//!
//! Copies a template event by event and only rebuilds the start tags it has
//! to change, so comments, whitespace and untouched attributes survive.

use quick_xml::events::{BytesDecl, BytesStart, Event};
use quick_xml::{Reader, Writer};
use std::io::{Cursor, Write};

use crate::core::FilingError;

fn xml_err(e: impl std::fmt::Display) -> FilingError {
    FilingError::Template(format!("XML error: {e}"))
}

/// Attribute values to set on one element.
#[derive(Debug, Clone)]
pub struct ElementPatch {
    /// Element name, a direct child of the container.
    pub element: &'static str,
    /// Fail if the element is absent.
    pub required: bool,
    /// `(attribute, value)`; `None` or empty values are left untouched.
    pub attrs: Vec<(&'static str, Option<String>)>,
}

impl ElementPatch {
    pub fn optional(element: &'static str) -> Self {
        Self {
            element,
            required: false,
            attrs: Vec::new(),
        }
    }

    pub fn required(element: &'static str) -> Self {
        Self {
            required: true,
            ..Self::optional(element)
        }
    }

    pub fn set(mut self, attr: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((attr, Some(value.into())));
        self
    }

    pub fn set_opt(mut self, attr: &'static str, value: Option<&str>) -> Self {
        self.attrs.push((attr, value.map(str::to_string)));
        self
    }

    fn values(&self) -> Vec<(&'static str, &str)> {
        self.attrs
            .iter()
            .filter_map(|(k, v)| match v.as_deref() {
                Some(v) if !v.is_empty() => Some((*k, v)),
                _ => None,
            })
            .collect()
    }
}

/// Patches below one container element, itself a direct child of the root.
#[derive(Debug, Clone)]
pub struct TemplatePatch {
    /// Container element name, e.g. `DPHDP3`.
    pub container: &'static str,
    /// Children to patch, each applied at most once.
    pub elements: Vec<ElementPatch>,
}

impl TemplatePatch {
    pub fn new(container: &'static str) -> Self {
        Self {
            container,
            elements: Vec::new(),
        }
    }

    pub fn element(mut self, patch: ElementPatch) -> Self {
        self.elements.push(patch);
        self
    }

    /// Apply to `template` and return the rewritten document.
    ///
    /// Only the first container and the first matching child of each patched
    /// element are touched. An XML declaration is added when missing.
    pub fn apply(&self, template: &str) -> Result<String, FilingError> {
        let mut reader = Reader::from_str(template);
        let mut writer = Writer::new(Cursor::new(Vec::new()));

        if !template.trim_start_matches('\u{feff}').trim_start().starts_with("<?xml") {
            writer
                .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
                .map_err(xml_err)?;
            writer.get_mut().write_all(b"\n").map_err(xml_err)?;
        }

        let mut depth = 0usize;
        let mut container = ContainerState::NotSeen;
        let mut applied = vec![false; self.elements.len()];

        loop {
            let event = reader.read_event().map_err(|e| {
                FilingError::Template(format!(
                    "XML error at position {}: {e}",
                    reader.buffer_position()
                ))
            })?;
            match event {
                Event::Start(e) => {
                    let out = self.visit(&e, depth, &mut container, &mut applied, false)?;
                    depth += 1;
                    writer
                        .write_event(Event::Start(out.unwrap_or(e)))
                        .map_err(xml_err)?;
                }
                Event::Empty(e) => {
                    let out = self.visit(&e, depth, &mut container, &mut applied, true)?;
                    writer
                        .write_event(Event::Empty(out.unwrap_or(e)))
                        .map_err(xml_err)?;
                }
                Event::End(e) => {
                    depth = depth.saturating_sub(1);
                    if depth == 1 && container == ContainerState::Open {
                        container = ContainerState::Closed;
                    }
                    writer.write_event(Event::End(e)).map_err(xml_err)?;
                }
                Event::Eof => break,
                other => writer.write_event(other).map_err(xml_err)?,
            }
        }

        if container == ContainerState::NotSeen {
            return Err(FilingError::Template(format!(
                "{} element not found in template",
                self.container
            )));
        }
        for (patch, done) in self.elements.iter().zip(&applied) {
            if patch.required && !done {
                return Err(FilingError::Template(format!(
                    "{} element not found in template",
                    patch.element
                )));
            }
        }

        let buf = writer.into_inner().into_inner();
        String::from_utf8(buf).map_err(|e| FilingError::Template(format!("UTF-8 error: {e}")))
    }

    /// Track the container and rebuild `e` if it is a patched element.
    fn visit(
        &self,
        e: &BytesStart<'_>,
        depth: usize,
        container: &mut ContainerState,
        applied: &mut [bool],
        empty: bool,
    ) -> Result<Option<BytesStart<'static>>, FilingError> {
        let name = e.name();
        let name = name.as_ref();

        if depth == 1
            && *container == ContainerState::NotSeen
            && name == self.container.as_bytes()
        {
            *container = if empty {
                ContainerState::Closed
            } else {
                ContainerState::Open
            };
            return Ok(None);
        }

        if depth != 2 || *container != ContainerState::Open {
            return Ok(None);
        }

        let Some(idx) = (0..self.elements.len())
            .find(|&i| !applied[i] && self.elements[i].element.as_bytes() == name)
        else {
            return Ok(None);
        };
        applied[idx] = true;
        rewrite_attrs(e, &self.elements[idx].values()).map(Some)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContainerState {
    NotSeen,
    Open,
    Closed,
}

/// Copy of `e` with `values` set, keeping attribute order.
fn rewrite_attrs(
    e: &BytesStart<'_>,
    values: &[(&'static str, &str)],
) -> Result<BytesStart<'static>, FilingError> {
    let name = std::str::from_utf8(e.name().as_ref())
        .map_err(xml_err)?
        .to_string();
    let mut out = BytesStart::new(name);
    let mut pending: Vec<(&str, &str)> = values.to_vec();

    for attr in e.attributes() {
        let attr = attr.map_err(xml_err)?;
        let key = std::str::from_utf8(attr.key.as_ref()).map_err(xml_err)?;
        match pending.iter().position(|(k, _)| *k == key) {
            Some(pos) => {
                let (k, v) = pending.remove(pos);
                out.push_attribute((k, v));
            }
            None => out.push_attribute(attr),
        }
    }
    for (k, v) in pending {
        out.push_attribute((k, v));
    }
    Ok(out)
}
