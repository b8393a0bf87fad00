use serde::Serialize;
use serde::ser::{SerializeStruct, Serializer};

use crate::domain::{Catalog, SectionMap};

// two non-breaking spaces
pub const INDENT: &str = "\u{a0}\u{a0}";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayNode {
    Group {
        label: String,
        children: Vec<DisplayNode>,
    },
    Item {
        path: String,
        label: String,
    },
}

impl DisplayNode {
    pub fn label(&self) -> &str {
        match self {
            DisplayNode::Group { label, .. } | DisplayNode::Item { label, .. } => label,
        }
    }

    pub fn children(&self) -> &[DisplayNode] {
        match self {
            DisplayNode::Group { children, .. } => children,
            DisplayNode::Item { .. } => &[],
        }
    }
}

impl Serialize for DisplayNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DisplayNode::Group { label, children } => {
                let mut state = serializer.serialize_struct("DisplayNode", 4)?;
                state.serialize_field("path", label)?;
                state.serialize_field("displayName", &Option::<&str>::None)?;
                state.serialize_field("type", "group")?;
                state.serialize_field("dbChildren", children)?;
                state.end()
            }
            DisplayNode::Item { path, label } => {
                let mut state = serializer.serialize_struct("DisplayNode", 3)?;
                state.serialize_field("path", path)?;
                state.serialize_field("displayName", label)?;
                state.serialize_field("type", "item")?;
                state.end()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeDocument {
    pub tree: Vec<DisplayNode>,
}

impl TreeDocument {
    pub fn to_json(&self) -> String {
        // only strings and sequences, serialization cannot fail
        serde_json::to_string(self).unwrap_or_else(|_| r#"{"tree":[]}"#.to_string())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeOptions {
    pub clean_up: bool,
    pub filter_all: bool,
}

pub fn clean_up_label(label: &str) -> String {
    label.replace('_', " ")
}

pub fn build_bank_tree(sections: &SectionMap, options: TreeOptions) -> Vec<DisplayNode> {
    let filtered;
    let sections = if options.filter_all {
        filtered = sections.without_all_sections();
        &filtered
    } else {
        sections
    };

    let mut tree = Vec::new();
    let mut previous: Vec<&str> = Vec::new();
    for (section, leaf) in sections.iter() {
        let segments: Vec<&str> = section.split('/').filter(|s| !s.is_empty()).collect();
        // once a position differs, every deeper one counts as new too, so the
        // leaf is new exactly when any position is
        let is_new = segments
            .iter()
            .enumerate()
            .any(|(position, segment)| previous.get(position) != Some(segment));
        if is_new {
            merge_node(&mut tree, branch(&segments, leaf, options.clean_up));
        }
        previous = segments;
    }
    tree
}

pub fn build_catalog_tree(catalog: &Catalog, format: &str, options: TreeOptions) -> Vec<DisplayNode> {
    let mut tree = Vec::new();
    for bank in catalog.banks() {
        let Some(sections) = bank.current_sections(format) else {
            continue;
        };
        let children = build_bank_tree(sections, options);
        if children.is_empty() {
            continue;
        }
        let label = if options.clean_up {
            clean_up_label(&bank.name)
        } else {
            bank.name.clone()
        };
        merge_node(&mut tree, DisplayNode::Group { label, children });
    }
    tree
}

pub fn leaf_paths(nodes: &[DisplayNode]) -> Vec<&str> {
    let mut paths = Vec::new();
    collect_leaves(nodes, &mut paths);
    paths
}

fn collect_leaves<'a>(nodes: &'a [DisplayNode], paths: &mut Vec<&'a str>) {
    for node in nodes {
        match node {
            DisplayNode::Group { children, .. } => collect_leaves(children, paths),
            DisplayNode::Item { path, .. } => paths.push(path),
        }
    }
}

fn branch(segments: &[&str], leaf: &str, clean_up: bool) -> DisplayNode {
    let display = |segment: &str| {
        if clean_up {
            clean_up_label(segment)
        } else {
            segment.to_string()
        }
    };

    let last = segments.len() - 1;
    let mut node = DisplayNode::Item {
        path: leaf.to_string(),
        label: format!("{}{}", INDENT.repeat(last.saturating_sub(2)), display(segments[last])),
    };
    for position in (0..last).rev() {
        node = DisplayNode::Group {
            label: format!("{}{}", INDENT.repeat(position + 1), display(segments[position])),
            children: vec![node],
        };
    }
    node
}

// Groups with the same label merge their children; an item with a known
// path takes the new label in place.
fn merge_node(nodes: &mut Vec<DisplayNode>, node: DisplayNode) {
    match node {
        DisplayNode::Group { label, children } => {
            let existing = nodes.iter_mut().find_map(|candidate| match candidate {
                DisplayNode::Group {
                    label: existing_label,
                    children,
                } if *existing_label == label => Some(children),
                _ => None,
            });
            match existing {
                Some(existing) => {
                    for child in children {
                        merge_node(existing, child);
                    }
                }
                None => nodes.push(DisplayNode::Group { label, children }),
            }
        }
        DisplayNode::Item { path, label } => {
            let existing = nodes.iter_mut().find_map(|candidate| match candidate {
                DisplayNode::Item {
                    path: existing_path,
                    label,
                } if *existing_path == path => Some(label),
                _ => None,
            });
            match existing {
                Some(existing) => *existing = label,
                None => nodes.push(DisplayNode::Item { path, label }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::{Bank, Release};

    fn item(path: &str, label: &str) -> DisplayNode {
        DisplayNode::Item {
            path: path.to_string(),
            label: label.to_string(),
        }
    }

    fn group(label: &str, children: Vec<DisplayNode>) -> DisplayNode {
        DisplayNode::Group {
            label: label.to_string(),
            children,
        }
    }

    #[test]
    fn single_section_is_a_single_item() {
        let sections = SectionMap::from_iter([("/Section1", "xx.fasta")]);
        let tree = build_bank_tree(&sections, TreeOptions::default());
        assert_eq!(tree, vec![item("xx.fasta", "Section1")]);
    }

    #[test]
    fn nested_sections_share_groups() {
        let sections = SectionMap::from_iter([
            ("/Bacteria/Plasmids", "/db/plm.fa"),
            ("/Bacteria/Chromosomes", "/db/chr.fa"),
            ("/Viruses", "/db/vrl.fa"),
        ]);
        let tree = build_bank_tree(&sections, TreeOptions::default());
        assert_eq!(
            tree,
            vec![
                group(
                    "\u{a0}\u{a0}Bacteria",
                    vec![item("/db/chr.fa", "Chromosomes"), item("/db/plm.fa", "Plasmids")]
                ),
                item("/db/vrl.fa", "Viruses"),
            ]
        );
    }

    #[test]
    fn deep_leaves_are_indented() {
        let sections = SectionMap::from_iter([("/a/b/c/d", "/db/d.fa")]);
        let tree = build_bank_tree(&sections, TreeOptions::default());
        let indent = |steps: usize, label: &str| format!("{}{label}", INDENT.repeat(steps));
        let expected = group(
            &indent(1, "a"),
            vec![group(
                &indent(2, "b"),
                vec![group(&indent(3, "c"), vec![item("/db/d.fa", &indent(1, "d"))])],
            )],
        );
        assert_eq!(tree, vec![expected]);
    }

    #[test]
    fn clean_up_replaces_underscores() {
        let sections = SectionMap::from_iter([("/My_Bank/Sub_Set", "/db/x.fa")]);
        let options = TreeOptions {
            clean_up: true,
            filter_all: false,
        };
        let tree = build_bank_tree(&sections, options);
        assert_eq!(
            tree,
            vec![group("\u{a0}\u{a0}My Bank", vec![item("/db/x.fa", "Sub Set")])]
        );
    }

    #[test]
    fn filter_all_skips_all_sections() {
        let sections = SectionMap::from_iter([("/All", "/db/all.fa"), ("/Human", "/db/hs.fa")]);
        let options = TreeOptions {
            clean_up: false,
            filter_all: true,
        };
        assert_eq!(
            build_bank_tree(&sections, options),
            vec![item("/db/hs.fa", "Human")]
        );
        assert_eq!(build_bank_tree(&sections, TreeOptions::default()).len(), 2);
    }

    #[test]
    fn building_twice_gives_the_same_tree() {
        let sections = SectionMap::from_iter([
            ("/chr10/a", "/db/10a"),
            ("/chr2", "/db/2"),
            ("/chr10/b", "/db/10b"),
        ]);
        let first = build_bank_tree(&sections, TreeOptions::default());
        let second = build_bank_tree(&sections, TreeOptions::default());
        assert_eq!(first, second);
    }

    #[test]
    fn every_section_leaf_is_reachable() {
        let sections = SectionMap::from_iter([
            ("/a/x", "/db/ax"),
            ("/a/y/z", "/db/ayz"),
            ("/b", "/db/b"),
            ("/b2/c", "/db/b2c"),
        ]);
        let tree = build_bank_tree(&sections, TreeOptions::default());
        let leaves = leaf_paths(&tree);
        for (_, leaf) in sections.iter() {
            assert!(leaves.contains(&leaf), "missing {leaf}");
        }
    }

    #[test]
    fn serializes_to_front_end_shape() {
        let tree = vec![group("genbank", vec![item("/db/x.fa", "x")])];
        let value = serde_json::to_value(TreeDocument { tree }).unwrap();
        assert_eq!(
            value,
            json!({"tree": [{
                "path": "genbank",
                "displayName": null,
                "type": "group",
                "dbChildren": [
                    {"path": "/db/x.fa", "displayName": "x", "type": "item"}
                ]
            }]})
        );
    }

    #[test]
    fn shared_leaf_keeps_the_last_label() {
        let sections = SectionMap::from_iter([("/All", "/db/x"), ("/Human", "/db/x")]);
        let tree = build_bank_tree(&sections, TreeOptions::default());
        assert_eq!(tree, vec![item("/db/x", "Human")]);

        let sections = SectionMap::from_iter([
            ("/a/b", "/db/x"),
            ("/Human", "/db/x"),
            ("/c/b", "/db/x"),
        ]);
        let tree = build_bank_tree(&sections, TreeOptions::default());
        assert_eq!(
            tree,
            vec![
                group("\u{a0}\u{a0}a", vec![item("/db/x", "b")]),
                group("\u{a0}\u{a0}c", vec![item("/db/x", "b")]),
                item("/db/x", "Human"),
            ]
        );
    }

    #[test]
    fn groups_and_items_with_one_label_stay_apart() {
        let mut nodes = vec![item("/db/x.fa", "x")];
        merge_node(&mut nodes, group("x", vec![item("/db/y.fa", "y")]));
        merge_node(&mut nodes, item("/db/z.fa", "x"));
        assert_eq!(
            nodes,
            vec![
                item("/db/x.fa", "x"),
                group("x", vec![item("/db/y.fa", "y")]),
                item("/db/z.fa", "x"),
            ]
        );
    }

    #[test]
    fn banks_with_the_same_cleaned_name_share_a_group() {
        let bank = |name: &str, section: &str, leaf: &str| {
            Bank::new(
                name.to_string(),
                "1".to_string(),
                "nucleic".to_string(),
                "r1".to_string(),
                vec![Release {
                    name: "r1".to_string(),
                    root_dir: format!("/db/{name}/r1"),
                    is_current: true,
                    formats: vec!["fasta".to_string()],
                    format_sections: vec![(
                        "fasta".to_string(),
                        SectionMap::from_iter([(section, leaf)]),
                    )],
                }],
            )
        };
        let mut catalog = Catalog::new();
        catalog.insert(bank("my_bank", "/B", "/db/b.fa"));
        catalog.insert(bank("my bank", "/A", "/db/a.fa"));

        let options = TreeOptions {
            clean_up: true,
            filter_all: false,
        };
        assert_eq!(
            build_catalog_tree(&catalog, "fasta", options),
            vec![group(
                "my bank",
                vec![item("/db/a.fa", "A"), item("/db/b.fa", "B")]
            )]
        );

        let tree = build_catalog_tree(&catalog, "fasta", TreeOptions::default());
        assert_eq!(tree.len(), 2);
    }
}
