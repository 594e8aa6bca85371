//! Field paths from the traversal root, used to locate errors.

use std::fmt;

/// One hop in a [`FieldPath`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    /// A named (or positional, e.g. `"0"`) field of an entity.
    Field(&'static str),
    /// An element of a sequence.
    Index(usize),
    /// A value of a map, keyed by the rendered map key.
    Key(String),
}

/// Location of a field relative to the root of a traversal.
///
/// Renders as `address.street`, `contacts[2].email` or `labels[home]`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldPath {
    segments: Vec<Segment>,
}

impl FieldPath {
    /// The empty path, pointing at the root itself.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub(crate) fn push(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    pub(crate) fn pop(&mut self) {
        self.segments.pop();
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("<root>");
        }
        for (position, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Field(name) if position == 0 => f.write_str(name)?,
                Segment::Field(name) => write!(f, ".{name}")?,
                Segment::Index(index) => write!(f, "[{index}]")?,
                Segment::Key(key) => write!(f, "[{key}]")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldPath, Segment};

    #[test]
    fn root_renders_placeholder() {
        assert_eq!(FieldPath::root().to_string(), "<root>");
        assert!(FieldPath::root().is_root());
    }

    #[test]
    fn mixed_segments_render_like_accessors() {
        let mut path = FieldPath::root();
        path.push(Segment::Field("contacts"));
        path.push(Segment::Index(2));
        path.push(Segment::Field("email"));
        assert_eq!(path.to_string(), "contacts[2].email");

        path.pop();
        path.pop();
        path.push(Segment::Key("home".into()));
        assert_eq!(path.to_string(), "contacts[home]");
    }

    #[test]
    fn leading_index_has_no_dot() {
        let mut path = FieldPath::root();
        path.push(Segment::Index(0));
        path.push(Segment::Field("name"));
        assert_eq!(path.to_string(), "[0].name");
    }
}
