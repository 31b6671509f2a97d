//! Section tree construction from flat extract text.
//!
//! Given an extract and its scanned heading delimiters, the builder
//! splits the blob into a summary (the preamble before the first
//! heading) and a nested tree of sections, each owning the exact text
//! span between its heading and the next heading of any level.

use std::collections::HashMap;

use serde::Serialize;

use crate::headings::HeadingMatch;

/// A titled, leveled node of a page's hierarchical structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    /// Section title.
    pub title: String,

    /// Nesting depth; 0 is a top-level section.
    pub level: usize,

    /// Body text strictly between this heading and the next heading at
    /// any level, trimmed.
    pub text: String,

    /// Direct subsections in document order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Section>,
}

impl Section {
    /// Titles of direct subsections, in document order.
    pub fn child_titles(&self) -> Vec<&str> {
        self.children.iter().map(|c| c.title.as_str()).collect()
    }

    /// Recursively count this section and everything below it.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Section::count).sum::<usize>()
    }

    /// Render this section and its subsections as plain text: title
    /// line, body, blank line, then each child in order.
    pub fn full_text(&self) -> String {
        let mut out = format!("{}\n", self.title);
        out.push_str(&self.text);
        if !self.text.is_empty() {
            out.push_str("\n\n");
        }
        for child in &self.children {
            out.push_str(&child.full_text());
        }
        out
    }

    /// Indented one-line-per-section rendering for display.
    pub fn format_tree(&self, indent: usize) -> String {
        let mut out = format!("{}{} (level {})\n", "  ".repeat(indent), self.title, self.level);
        for child in &self.children {
            out.push_str(&child.format_tree(indent + 1));
        }
        out
    }
}

/// Path of child indices leading from the top level down to a section.
pub type SectionPath = Vec<usize>;

/// Result of parsing one extract.
#[derive(Debug, Clone, Default)]
pub struct SectionTree {
    /// Text preceding the first heading, or the whole extract when no
    /// heading (or no preamble) was found.
    pub summary: String,

    /// Top-level sections in document order.
    pub sections: Vec<Section>,

    /// Title lookup across all levels. Later sections with a duplicate
    /// title overwrite earlier entries; last write wins.
    pub index: HashMap<String, SectionPath>,
}

impl SectionTree {
    /// Look up a section at any level by exact title.
    pub fn get(&self, title: &str) -> Option<&Section> {
        self.resolve(self.index.get(title)?)
    }

    /// Follow a child-index path from the top level.
    fn resolve(&self, path: &[usize]) -> Option<&Section> {
        let (first, rest) = path.split_first()?;
        let mut node = self.sections.get(*first)?;
        for idx in rest {
            node = node.children.get(*idx)?;
        }
        Some(node)
    }

    /// Total number of sections at every level.
    pub fn count(&self) -> usize {
        self.sections.iter().map(Section::count).sum()
    }
}

/// Section under construction; the owned tree is materialized once all
/// spans are assigned.
struct ArenaNode {
    title: String,
    level: usize,
    text: String,
    children: Vec<usize>,
}

impl ArenaNode {
    fn root() -> Self {
        Self::new("", 0)
    }

    fn new(title: &str, level: usize) -> Self {
        Self {
            title: title.to_string(),
            level,
            text: String::new(),
            children: Vec::new(),
        }
    }
}

/// Build a section tree from an extract and its scanned headings.
///
/// Headings are walked strictly in document order over a stack of open
/// nodes, with a virtual root at the bottom. A new section's parent is
/// whatever sits second from the top of the stack after reconciliation.
/// When heading levels skip (say `==` directly to `====`), no
/// intermediate level is synthesized and the deeper section attaches to
/// the section that is currently open.
pub fn build_section_tree(extract: &str, matches: &[HeadingMatch]) -> SectionTree {
    let mut tree = SectionTree::default();

    if matches.is_empty() {
        tree.summary = extract.trim().to_string();
        return tree;
    }

    let mut arena: Vec<ArenaNode> = vec![ArenaNode::root()];
    let mut stack: Vec<usize> = vec![0];
    // Arena id and heading end offset of the most recent section; its
    // span is closed when the next heading starts.
    let mut prev: Option<(usize, usize)> = None;
    let mut order: Vec<(usize, String)> = Vec::new();

    for m in matches {
        match prev {
            Some((id, end)) => arena[id].text = extract[end..m.start].trim().to_string(),
            None => tree.summary = extract[..m.start].trim().to_string(),
        }

        let level = m.marker_len.saturating_sub(2);
        let id = arena.len();
        arena.push(ArenaNode::new(&m.title, level));

        // Depth reconciliation: the node's nominal depth is its marker
        // length, counting the virtual root.
        let depth = level + 2;
        if depth == stack.len() {
            stack.pop();
        } else if depth < stack.len() {
            for _ in 0..(stack.len() - depth + 1) {
                stack.pop();
            }
        }
        stack.push(id);

        let parent = stack[stack.len() - 2];
        arena[parent].children.push(id);

        order.push((id, m.title.clone()));
        prev = Some((id, m.end));
    }

    if let Some((id, end)) = prev {
        arena[id].text = extract[end..].trim().to_string();
    }

    // Pages with no content before the first heading fall back to the
    // whole extract as their summary.
    if tree.summary.is_empty() {
        tree.summary = extract.trim().to_string();
    }

    let mut paths: HashMap<usize, SectionPath> = HashMap::new();
    let root = realize(&mut arena, 0, &SectionPath::new(), &mut paths);
    tree.sections = root.children;

    // Register titles in document order so duplicates resolve to the
    // section that appears last.
    for (id, title) in order {
        if let Some(path) = paths.get(&id) {
            tree.index.insert(title, path.clone());
        }
    }

    tree
}

/// Turn an arena node into an owned [`Section`], recording the path of
/// every node along the way.
fn realize(
    arena: &mut [ArenaNode],
    id: usize,
    path: &SectionPath,
    paths: &mut HashMap<usize, SectionPath>,
) -> Section {
    let title = std::mem::take(&mut arena[id].title);
    let text = std::mem::take(&mut arena[id].text);
    let level = arena[id].level;
    let child_ids = std::mem::take(&mut arena[id].children);
    paths.insert(id, path.clone());

    let mut children = Vec::with_capacity(child_ids.len());
    for (i, child_id) in child_ids.into_iter().enumerate() {
        let mut child_path = path.clone();
        child_path.push(i);
        children.push(realize(arena, child_id, &child_path, paths));
    }

    Section {
        title,
        level,
        text,
        children,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headings;

    fn parse(extract: &str) -> SectionTree {
        build_section_tree(extract, &headings::scan(extract))
    }

    #[test]
    fn test_flat_sections() {
        let tree = parse("Intro.\n\n== Alpha ==\nBody A.\n\n== Beta ==\nBody B.");
        assert_eq!(tree.summary, "Intro.");
        assert_eq!(tree.sections.len(), 2);
        assert_eq!(tree.sections[0].title, "Alpha");
        assert_eq!(tree.sections[0].text, "Body A.");
        assert!(tree.sections[0].children.is_empty());
        assert_eq!(tree.sections[1].title, "Beta");
        assert_eq!(tree.sections[1].text, "Body B.");
        assert!(tree.sections[1].children.is_empty());
    }

    #[test]
    fn test_nested_subsection() {
        let tree = parse("S.\n\n== Alpha ==\nAlpha body.\n\n=== Sub ===\nSub body.");
        assert_eq!(tree.sections.len(), 1);
        let alpha = &tree.sections[0];
        assert_eq!(alpha.level, 0);
        assert_eq!(alpha.text, "Alpha body.");
        assert_eq!(alpha.children.len(), 1);
        assert_eq!(alpha.children[0].title, "Sub");
        assert_eq!(alpha.children[0].level, 1);
        assert_eq!(alpha.children[0].text, "Sub body.");
    }

    #[test]
    fn test_sibling_after_subsection() {
        let tree = parse("S.\n\n== A ==\na\n\n=== A1 ===\na1\n\n=== A2 ===\na2\n\n== B ==\nb");
        assert_eq!(tree.sections.len(), 2);
        let a = &tree.sections[0];
        assert_eq!(a.child_titles(), vec!["A1", "A2"]);
        assert_eq!(a.children[1].text, "a2");
        assert_eq!(tree.sections[1].title, "B");
        assert_eq!(tree.sections[1].text, "b");
    }

    #[test]
    fn test_skipped_level_attaches_to_current_parent() {
        // A level jump (== directly to ====) does not synthesize the
        // missing level; the deep section hangs off the open section.
        let tree = parse("S.\n\n== A ==\na\n\n==== Deep ====\nd\n\n==== Deeper ====\ne");
        let a = &tree.sections[0];
        assert_eq!(a.children.len(), 1);
        let deep = &a.children[0];
        assert_eq!(deep.title, "Deep");
        assert_eq!(deep.level, 2);
        // The second jumped heading lands under the first, not beside it.
        assert_eq!(deep.child_titles(), vec!["Deeper"]);
    }

    #[test]
    fn test_spans_end_at_next_heading_of_any_level() {
        let tree = parse("S.\n\n== A ==\nalpha intro\n\n=== A1 ===\nnested body\n\n== B ==\nb");
        let a = &tree.sections[0];
        assert_eq!(a.text, "alpha intro");
        assert_eq!(a.children[0].text, "nested body");
    }

    #[test]
    fn test_no_headings_whole_extract_is_summary() {
        let tree = parse("Just a short page with no sections.");
        assert_eq!(tree.summary, "Just a short page with no sections.");
        assert!(tree.sections.is_empty());
        assert_eq!(tree.count(), 0);
    }

    #[test]
    fn test_no_preamble_falls_back_to_whole_extract() {
        let extract = "\n\n== Alpha ==\nBody A.";
        let tree = parse(extract);
        assert_eq!(tree.summary, extract.trim());
        assert_eq!(tree.sections.len(), 1);
        assert_eq!(tree.sections[0].text, "Body A.");
    }

    #[test]
    fn test_section_count_matches_heading_count() {
        let extract = "S.\n\n== A ==\na\n\n=== B ===\nb\n\n==== C ====\nc\n\n== D ==\nd";
        let matches = headings::scan(extract);
        let tree = build_section_tree(extract, &matches);
        assert_eq!(tree.count(), matches.len());
    }

    #[test]
    fn test_duplicate_titles_last_write_wins() {
        let tree = parse("S.\n\n== Twin ==\nfirst\n\n== Twin ==\nsecond");
        // Both sections stay in display order; the index resolves to
        // the later one.
        assert_eq!(tree.sections.len(), 2);
        assert_eq!(tree.sections[0].text, "first");
        assert_eq!(tree.get("Twin").unwrap().text, "second");
    }

    #[test]
    fn test_index_reaches_nested_sections() {
        let tree = parse("S.\n\n== A ==\na\n\n=== A1 ===\nnested");
        assert_eq!(tree.get("A1").unwrap().text, "nested");
        assert!(tree.get("Missing").is_none());
    }

    #[test]
    fn test_round_trip_preserves_body_text() {
        let extract =
            "Intro.\n\n== A ==\nalpha body\n\n=== A1 ===\nnested body\n\n== B ==\nbeta body";
        let tree = parse(extract);
        let mut rebuilt = tree.summary.clone();
        for section in &tree.sections {
            rebuilt.push_str("\n\n");
            rebuilt.push_str(&section.full_text());
        }
        for fragment in ["Intro.", "alpha body", "A1", "nested body", "beta body"] {
            assert!(rebuilt.contains(fragment), "missing {fragment:?}");
        }
    }

    #[test]
    fn test_full_text_renders_children() {
        let tree = parse("S.\n\n== A ==\na body\n\n=== A1 ===\nsub body");
        assert_eq!(tree.sections[0].full_text(), "A\na body\n\nA1\nsub body\n\n");
    }

    #[test]
    fn test_format_tree_indents_children() {
        let tree = parse("S.\n\n== A ==\na\n\n=== A1 ===\nb");
        let rendered = tree.sections[0].format_tree(0);
        assert!(rendered.starts_with("A (level 0)\n"));
        assert!(rendered.contains("  A1 (level 1)\n"));
    }
}
