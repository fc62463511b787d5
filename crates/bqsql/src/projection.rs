//! Projection compiler: dotted column paths to nested BigQuery projections.
//!
//! Paths such as `NFe.infNFe.emit.CNPJ` are grouped by shared prefix into a
//! tree and rendered as nested `STRUCT(...)` expressions. Prefixes listed as
//! repeated in the [`QueryBuilderSpec`] render as
//! `ARRAY(SELECT AS STRUCT ... FROM UNNEST(...))` instead.
//!
//! Inside an `UNNEST(...)` columns are referenced relative to the array, while
//! `STRUCT(...)` keeps the qualified reference because it opens no new row
//! context:
//!
//! ```text
//! NFe.infNFe.emit.CNPJ -> STRUCT(STRUCT(STRUCT(NFe.infNFe.emit.CNPJ) AS emit) AS infNFe) AS NFe
//! Events.Date          -> ARRAY(SELECT AS STRUCT Date FROM UNNEST(Events)) AS Events
//! ```

use std::fmt;

use crate::spec::QueryBuilderSpec;

/// Index of a segment in the builder's arena.
type SegmentId = usize;

/// What a path segment renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SegmentKind {
    /// A plain column reference.
    Leaf,
    /// A nested record, rendered with `STRUCT(...)`.
    Struct,
    /// A repeated record, rendered with `ARRAY(SELECT AS STRUCT ... FROM UNNEST(...))`.
    Array,
}

/// One node of the column tree.
#[derive(Debug, Clone)]
struct PathSegment {
    kind: SegmentKind,
    /// Local name of this segment, e.g. `emit`.
    name: String,
    parent: Option<SegmentId>,
    /// Children in insertion order. Always empty for leaves.
    children: Vec<SegmentId>,
}

/// Incrementally builds a columns clause from dotted column paths.
///
/// Segments live in an arena owned by the builder and reference their parent
/// by index, so the whole tree is dropped with the builder.
#[derive(Debug, Clone)]
pub struct ColumnsClauseBuilder<'a> {
    spec: &'a QueryBuilderSpec,
    segments: Vec<PathSegment>,
    /// Top-level segments in first-seen order.
    roots: Vec<SegmentId>,
}

impl<'a> ColumnsClauseBuilder<'a> {
    /// Create an empty builder that classifies nodes with `spec`.
    pub fn new(spec: &'a QueryBuilderSpec) -> Self {
        Self {
            spec,
            segments: Vec::new(),
            roots: Vec::new(),
        }
    }

    /// Whether no column has been added yet.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Add a dotted column path such as `NFe.infNFe.emit.CNPJ`.
    ///
    /// Shared prefixes reuse the node created by an earlier path, so sibling
    /// leaves end up grouped under one `STRUCT`/`ARRAY`. Leaves are never
    /// deduplicated.
    pub fn add_column(&mut self, column: &str) {
        let mut parts = column.split('.').peekable();
        let mut parent = None;

        while let Some(name) = parts.next() {
            if parts.peek().is_none() {
                self.push_segment(parent, name, SegmentKind::Leaf);
                return;
            }
            parent = Some(self.get_or_create_group(parent, name));
        }
    }

    fn children_of(&self, parent: Option<SegmentId>) -> &[SegmentId] {
        match parent {
            Some(id) => &self.segments[id].children,
            None => &self.roots,
        }
    }

    /// Find a non-leaf child of `parent` named `name`, or create one.
    fn get_or_create_group(&mut self, parent: Option<SegmentId>, name: &str) -> SegmentId {
        let existing = self.children_of(parent).iter().copied().find(|&id| {
            let segment = &self.segments[id];
            segment.kind != SegmentKind::Leaf && segment.name == name
        });
        if let Some(id) = existing {
            return id;
        }

        let fullname = match parent {
            Some(id) => format!("{}.{}", self.fullname(id), name),
            None => name.to_string(),
        };
        let kind = if self.spec.is_repeated(&fullname) {
            SegmentKind::Array
        } else {
            SegmentKind::Struct
        };
        tracing::trace!(column = %fullname, ?kind, "Creating column group");

        self.push_segment(parent, name, kind)
    }

    fn push_segment(&mut self, parent: Option<SegmentId>, name: &str, kind: SegmentKind) -> SegmentId {
        let id = self.segments.len();
        self.segments.push(PathSegment {
            kind,
            name: name.to_string(),
            parent,
            children: Vec::new(),
        });
        match parent {
            Some(parent_id) => self.segments[parent_id].children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    /// Dotted path of a segment from the root of the forest.
    fn fullname(&self, id: SegmentId) -> String {
        let mut names = Vec::new();
        let mut current = Some(id);
        while let Some(segment_id) = current {
            let segment = &self.segments[segment_id];
            names.push(segment.name.as_str());
            current = segment.parent;
        }
        names.reverse();
        names.join(".")
    }

    /// Dotted path of a segment relative to its nearest array ancestor.
    ///
    /// ```text
    /// AccessKey                                -> AccessKey
    /// NFe.infNFe.ide.nNF                       -> NFe.infNFe.ide.nNF
    /// Events.Date                              -> Date
    /// NFe.infNFe.det.imposto.ICMS.ICMS00.vICMS -> imposto.ICMS.ICMS00.vICMS
    /// ```
    fn fullname_inside_array(&self, id: SegmentId) -> String {
        let mut names = vec![self.segments[id].name.as_str()];
        let mut current = self.segments[id].parent;
        while let Some(parent_id) = current {
            let parent = &self.segments[parent_id];
            if parent.kind == SegmentKind::Array {
                break;
            }
            names.push(parent.name.as_str());
            current = parent.parent;
        }
        names.reverse();
        names.join(".")
    }

    fn write_segments(&self, ids: &[SegmentId], out: &mut String) {
        for (i, &id) in ids.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            let segment = &self.segments[id];
            match segment.kind {
                SegmentKind::Leaf => out.push_str(&self.fullname_inside_array(id)),
                SegmentKind::Struct => {
                    out.push_str("STRUCT(");
                    self.write_segments(&segment.children, out);
                    out.push_str(") AS ");
                    out.push_str(&segment.name);
                }
                SegmentKind::Array => {
                    out.push_str("ARRAY(SELECT AS STRUCT ");
                    self.write_segments(&segment.children, out);
                    out.push_str(" FROM UNNEST(");
                    out.push_str(&self.fullname_inside_array(id));
                    out.push_str(")) AS ");
                    out.push_str(&segment.name);
                }
            }
        }
    }
}

impl fmt::Display for ColumnsClauseBuilder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.write_segments(&self.roots, &mut out);
        f.write_str(&out)
    }
}

/// Build the columns clause for a projection.
///
/// An empty projection selects everything and returns `*` without looking
/// at the spec.
pub fn build_columns_clause<S: AsRef<str>>(spec: &QueryBuilderSpec, projection: &[S]) -> String {
    if projection.is_empty() {
        return "*".to_string();
    }

    let mut builder = ColumnsClauseBuilder::new(spec);
    for column in projection {
        builder.add_column(column.as_ref());
    }

    let clause = builder.to_string();
    tracing::debug!(
        columns = projection.len(),
        segments = builder.segments.len(),
        "Built columns clause"
    );
    clause
}
