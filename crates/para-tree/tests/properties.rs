use std::collections::{HashMap, HashSet};

use para_tree::prelude::*;
use proptest::prelude::*;

fn categorization() -> impl Strategy<Value = Option<String>> {
    let bucket = prop::sample::select(vec!["Project", "Area", "Resource", "Archive", "Inbox"]);
    let folders = prop::collection::vec(prop::sample::select(vec!["A", "B", "C"]), 0..3);
    prop::option::of((bucket, folders).prop_map(|(bucket, folders)| {
        let mut value = bucket.to_string();
        for folder in folders {
            value.push('/');
            value.push_str(folder);
        }
        value
    }))
}

fn documents() -> impl Strategy<Value = Vec<DocumentSummary<usize>>> {
    prop::collection::vec(categorization(), 0..24).prop_map(|cats| {
        cats.into_iter()
            .enumerate()
            .map(|(i, cat)| {
                let summary = DocumentSummary::new(format!("doc{}.md", i), format!("Doc {}", i), i);
                match cat {
                    Some(cat) => summary.categorization(cat),
                    None => summary,
                }
            })
            .collect()
    })
}

fn moves() -> impl Strategy<Value = Vec<(usize, usize, Option<usize>)>> {
    prop::collection::vec((any::<usize>(), any::<usize>(), prop::option::of(0usize..6)), 0..16)
}

/// Every node is reachable exactly once and keys are unique
fn assert_well_formed(tree: &ParaTree<usize>) {
    let outline = tree.outline();
    assert_eq!(outline.len(), tree.node_count());
    let keys: HashSet<_> = outline.iter().map(|entry| entry.key.clone()).collect();
    assert_eq!(keys.len(), outline.len());
    for entry in &outline {
        assert_eq!(tree.locate(&entry.key).and_then(|id| tree.key(id)), Some(&entry.key));
    }
}

fn bucket_names(tree: &ParaTree<usize>) -> Vec<String> {
    tree.children(tree.root())
        .map(|id| tree.name(id).unwrap().to_string())
        .collect()
}

proptest! {
    #[test]
    fn build_is_deterministic(docs in documents()) {
        let first = build(docs.clone());
        let second = build(docs);
        prop_assert_eq!(first.outline(), second.outline());
    }

    #[test]
    fn buckets_always_exist(docs in documents()) {
        let tree = build(docs);
        prop_assert_eq!(bucket_names(&tree), vec!["Project", "Area", "Resource", "Archive"]);
        assert_well_formed(&tree);
    }

    #[test]
    fn placed_documents_match_their_categorization(docs in documents()) {
        let expected: HashMap<_, _> = docs
            .iter()
            .filter_map(|doc| {
                let cat: Categorization = doc.categorization.as_deref()?.parse().ok()?;
                Some((NodeKey::document(&doc.key), cat))
            })
            .collect();

        let tree = build(docs);
        prop_assert_eq!(tree.document_count(), expected.len());
        for (key, cat) in &expected {
            let id = tree.locate(key).unwrap();
            let actual = tree.categorization_of(id);
            prop_assert_eq!(actual.as_ref(), Some(cat));
        }
    }

    #[test]
    fn moves_keep_tree_and_metadata_consistent(docs in documents(), moves in moves()) {
        let mut tree = build(docs);
        let documents = tree.document_count();

        // Plays the document store: last persisted value per document
        let mut store: HashMap<NodeKey, Categorization> = tree
            .leaves()
            .into_iter()
            .map(|id| (tree.key(id).unwrap().clone(), tree.categorization_of(id).unwrap()))
            .collect();

        for (source, target, index) in moves {
            let keys: Vec<_> = tree.outline().into_iter().map(|entry| entry.key).collect();
            let request = MoveRequest {
                source: keys[source % keys.len()].clone(),
                target: keys[target % keys.len()].clone(),
                index,
            };

            let before = tree.outline();
            match tree.move_node(&request) {
                Ok(result) => {
                    for update in result.updates {
                        store.insert(update.key, update.categorization);
                    }
                }
                Err(_) => prop_assert_eq!(tree.outline(), before),
            }

            assert_well_formed(&tree);
            prop_assert_eq!(tree.document_count(), documents);
            prop_assert_eq!(bucket_names(&tree), vec!["Project", "Area", "Resource", "Archive"]);
            for id in tree.leaves() {
                let key = tree.key(id).unwrap();
                let actual = tree.categorization_of(id);
                prop_assert_eq!(actual.as_ref(), store.get(key));
            }
        }
    }

    #[test]
    fn folders_never_move_into_themselves(docs in documents(), pick in any::<usize>(), inner in any::<usize>()) {
        let mut tree = build(docs);
        let folders: Vec<_> = tree
            .containers()
            .into_iter()
            .filter(|&id| !tree.is_protected(id))
            .collect();
        prop_assume!(!folders.is_empty());

        let folder = folders[pick % folders.len()];
        let inside: Vec<_> = tree
            .walk_from(folder)
            .filter(|&id| tree.is_container(id))
            .collect();
        let target = inside[inner % inside.len()];

        let before = tree.outline();
        let request = MoveRequest::new(
            tree.key(folder).unwrap().clone(),
            tree.key(target).unwrap().clone(),
        );
        let result = tree.move_node(&request);
        prop_assert!(
            matches!(result, Err(MoveError::CyclicMove { .. })),
            "unexpected outcome: {:?}",
            result
        );
        prop_assert_eq!(tree.outline(), before);
    }
}
