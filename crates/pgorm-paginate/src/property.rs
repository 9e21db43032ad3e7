//! Dotted/indexed property paths over [`Value`] trees.
//!
//! Supported forms: `name`, `a.b.c`, `items[0]`, `items[0].name`, `attrs[color]`.
//! A path may also start with `.` or `[`, which is what remains of a path after
//! its root name has been split off with [`split_root`].

use crate::error::{OrmError, OrmResult};
use crate::value::Value;

/// One step of a property path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// `.name` or a leading `name`
    Field(String),
    /// `[0]`
    Index(usize),
    /// `[key]` with a non-numeric key
    Key(String),
}

/// A parsed property path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyPath {
    segments: Vec<Segment>,
}

impl PropertyPath {
    /// Parse a property path.
    pub fn parse(path: &str) -> OrmResult<Self> {
        let mut segments = Vec::new();
        let mut rest = path.strip_prefix('.').unwrap_or(path);
        let mut expect_field = !rest.starts_with('[');

        while !rest.is_empty() {
            if let Some(after) = rest.strip_prefix('[') {
                let Some(end) = after.find(']') else {
                    return Err(OrmError::invalid_path(path, "unclosed '['"));
                };
                let inner = &after[..end];
                if inner.is_empty() {
                    return Err(OrmError::invalid_path(path, "empty index"));
                }
                segments.push(match inner.parse::<usize>() {
                    Ok(i) => Segment::Index(i),
                    Err(_) => Segment::Key(inner.to_string()),
                });
                rest = &after[end + 1..];
                expect_field = false;
                continue;
            }

            if !expect_field {
                match rest.strip_prefix('.') {
                    Some(after) => rest = after,
                    None => {
                        return Err(OrmError::invalid_path(
                            path,
                            "expected '.' or '[' after index",
                        ));
                    }
                }
            }

            let end = rest.find(['.', '[', ']']).unwrap_or(rest.len());
            let name = &rest[..end];
            if name.is_empty() {
                return Err(OrmError::invalid_path(path, "empty property name"));
            }
            segments.push(Segment::Field(name.to_string()));
            rest = &rest[end..];
            if rest.starts_with(']') {
                return Err(OrmError::invalid_path(path, "unexpected ']'"));
            }
            expect_field = false;
        }

        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// `true` for the empty path, which resolves to the value itself.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Walk the path from `root`; `None` when any step is absent.
    pub fn resolve<'v>(&self, root: &'v Value) -> Option<&'v Value> {
        self.segments
            .iter()
            .try_fold(root, |current, segment| match segment {
                Segment::Field(name) | Segment::Key(name) => current.field(name),
                Segment::Index(i) => match current {
                    Value::Record(fields) => fields.get(&i.to_string()),
                    _ => current.element(*i),
                },
            })
    }
}

/// Split a path into its root name and the remainder.
///
/// `"item.name"` → `("item", ".name")`, `"list[0].name"` → `("list", "[0].name")`.
pub fn split_root(path: &str) -> (&str, &str) {
    let end = path.find(['.', '[']).unwrap_or(path.len());
    path.split_at(end)
}

/// Parse `path` and resolve it against `root` in one step.
pub fn resolve_path<'v>(root: &'v Value, path: &str) -> OrmResult<Option<&'v Value>> {
    Ok(PropertyPath::parse(path)?.resolve(root))
}
