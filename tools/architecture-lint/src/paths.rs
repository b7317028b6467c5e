//! Flattens every path a source file names into its segments.

use std::collections::BTreeSet;

use syn::visit::{self, Visit};

/// Identifiers of one path, outermost first.
pub(crate) type Segments = Vec<String>;

/// Paths named by `file` in `use` items, expressions, types and macros.
pub(crate) fn named_paths(file: &syn::File) -> BTreeSet<Segments> {
    let mut named = NamedPaths::default();
    named.visit_file(file);
    named.0
}

#[derive(Default)]
struct NamedPaths(BTreeSet<Segments>);

fn joined(mut prefix: Segments, last: String) -> Segments {
    prefix.push(last);
    prefix
}

impl<'ast> Visit<'ast> for NamedPaths {
    fn visit_path(&mut self, path: &'ast syn::Path) {
        let segments: Segments = path
            .segments
            .iter()
            .map(|segment| segment.ident.to_string())
            .collect();
        if !segments.is_empty() {
            self.0.insert(segments);
        }
        visit::visit_path(self, path);
    }

    fn visit_item_use(&mut self, item: &'ast syn::ItemUse) {
        let mut pending: Vec<(Segments, &syn::UseTree)> = vec![(Vec::new(), &item.tree)];
        while let Some((prefix, tree)) = pending.pop() {
            match tree {
                syn::UseTree::Path(path) => {
                    pending.push((joined(prefix, path.ident.to_string()), &path.tree));
                }
                syn::UseTree::Name(name) => {
                    self.0.insert(joined(prefix, name.ident.to_string()));
                }
                syn::UseTree::Rename(rename) => {
                    self.0.insert(joined(prefix, rename.ident.to_string()));
                }
                syn::UseTree::Glob(_) => {
                    self.0.insert(joined(prefix, "*".to_owned()));
                }
                syn::UseTree::Group(group) => {
                    pending.extend(group.items.iter().map(|tree| (prefix.clone(), tree)));
                }
            }
        }
    }
}
