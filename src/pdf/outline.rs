//! Bookmark outline from the table of contents tree
//!
//! Building an outline is split in two: [`plan_outline`] maps logical page
//! numbers to page indices and decides nesting, [`attach_outline`] writes the
//! resulting tree into the document as `/Outlines`.

use lopdf::{dictionary, Dictionary, Object, ObjectId};
use tracing::debug;
use crate::error::Result;
use crate::pdf::assemble::AssembledDocument;
use crate::pdf::text::encode_text_string;
use crate::toc::OutlineNode;

/// One resolved bookmark
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineEntry {
    pub title: String,
    /// Zero-based page index in the assembled document
    pub page_index: usize,
    /// Index of the parent entry, `None` for top-level entries
    pub parent: Option<usize>,
    /// Indices of child entries, in order
    pub children: Vec<usize>,
}

/// Resolved outline tree, stored as an arena in pre-order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutlinePlan {
    entries: Vec<OutlineEntry>,
    roots: Vec<usize>,
}

impl OutlinePlan {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of bookmarks at every level
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// All entries in pre-order
    pub fn entries(&self) -> &[OutlineEntry] {
        &self.entries
    }

    /// Indices of the top-level entries
    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    fn push(&mut self, parent: Option<usize>, title: String, page_index: usize) -> usize {
        let index = self.entries.len();
        self.entries.push(OutlineEntry {
            title,
            page_index,
            parent,
            children: Vec::new(),
        });
        match parent {
            Some(p) => self.entries[p].children.push(index),
            None => self.roots.push(index),
        }
        index
    }

    /// Number of entries below `index`
    fn descendants(&self, index: usize) -> usize {
        self.entries[index]
            .children
            .iter()
            .map(|&c| 1 + self.descendants(c))
            .sum()
    }
}

/// Resolve the table of contents against a document of `page_count` pages
///
/// A node's page maps to index `page - start_page`. Nodes without a numeric
/// page, or whose index falls outside the document, get no bookmark; their
/// children are still visited and attach to the nearest bookmarked ancestor.
pub fn plan_outline(nodes: &[OutlineNode], start_page: u32, page_count: usize) -> OutlinePlan {
    let mut plan = OutlinePlan::default();
    visit(&mut plan, nodes, None, start_page, page_count);
    plan
}

fn visit(
    plan: &mut OutlinePlan,
    nodes: &[OutlineNode],
    parent: Option<usize>,
    start_page: u32,
    page_count: usize,
) {
    for node in nodes {
        let page_index = node
            .page_number()
            .map(|page| i64::from(page) - i64::from(start_page))
            .filter(|&idx| idx >= 0 && (idx as usize) < page_count)
            .map(|idx| idx as usize);

        let child_parent = match page_index {
            Some(idx) => Some(plan.push(parent, node.name.clone(), idx)),
            None => {
                debug!("No bookmark for '{}' (page {:?})", node.name, node.page);
                parent
            }
        };

        visit(plan, &node.children, child_parent, start_page, page_count);
    }
}

/// Write `plan` into the document's catalog as its outline
///
/// Entries are left open and target their page with `/Fit`. Returns the
/// number of bookmarks written; an empty plan leaves the document unchanged.
pub fn attach_outline(assembled: &mut AssembledDocument, plan: &OutlinePlan) -> Result<usize> {
    if plan.is_empty() {
        return Ok(0);
    }

    let doc = &mut assembled.doc;
    let outlines_id = doc.new_object_id();
    let entry_ids: Vec<ObjectId> = plan.entries.iter().map(|_| doc.new_object_id()).collect();

    let mut dicts: Vec<Dictionary> = plan
        .entries
        .iter()
        .map(|entry| {
            let page_id = assembled.page_ids[entry.page_index];
            dictionary! {
                "Title" => encode_text_string(&entry.title),
                "Dest" => vec![Object::Reference(page_id), Object::Name(b"Fit".to_vec())],
            }
        })
        .collect();

    // Parent, sibling and child links for every group of siblings
    let link_group = |dicts: &mut Vec<Dictionary>, parent_id: ObjectId, group: &[usize]| {
        for (pos, &index) in group.iter().enumerate() {
            let dict = &mut dicts[index];
            dict.set("Parent", Object::Reference(parent_id));
            if pos > 0 {
                dict.set("Prev", Object::Reference(entry_ids[group[pos - 1]]));
            }
            if let Some(&next) = group.get(pos + 1) {
                dict.set("Next", Object::Reference(entry_ids[next]));
            }
        }
    };

    link_group(&mut dicts, outlines_id, &plan.roots);
    for (index, entry) in plan.entries.iter().enumerate() {
        if entry.children.is_empty() {
            continue;
        }
        link_group(&mut dicts, entry_ids[index], &entry.children);

        let dict = &mut dicts[index];
        dict.set("First", Object::Reference(entry_ids[entry.children[0]]));
        dict.set("Last", Object::Reference(entry_ids[entry.children[entry.children.len() - 1]]));
        dict.set("Count", Object::Integer(plan.descendants(index) as i64));
    }

    for (id, dict) in entry_ids.iter().zip(dicts) {
        doc.objects.insert(*id, Object::Dictionary(dict));
    }

    let first = entry_ids[plan.roots[0]];
    let last = entry_ids[plan.roots[plan.roots.len() - 1]];
    doc.objects.insert(
        outlines_id,
        Object::Dictionary(dictionary! {
            "Type" => "Outlines",
            "First" => first,
            "Last" => last,
            "Count" => Object::Integer(plan.len() as i64),
        }),
    );

    let catalog = doc.get_object_mut(assembled.catalog_id)?.as_dict_mut()?;
    catalog.set("Outlines", Object::Reference(outlines_id));
    catalog.set("PageMode", Object::Name(b"UseOutlines".to_vec()));

    Ok(plan.len())
}
