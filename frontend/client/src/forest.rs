use std::collections::HashMap;

use crate::comment::Comment;

#[derive(Debug)]
struct Node {
    comment: Comment,
    replies: Vec<usize>,
}

/// Comments arranged as reply trees. Nodes live in one arena and refer to
/// each other by index.
#[derive(Debug, Default)]
pub struct Forest {
    nodes: Vec<Node>,
    roots: Vec<usize>,
    orphans: Vec<usize>,
}

#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    forest: &'a Forest,
    index: usize,
}

impl<'a> NodeRef<'a> {
    pub fn comment(&self) -> &'a Comment {
        &self.forest.nodes[self.index].comment
    }

    pub fn replies(self) -> impl Iterator<Item = NodeRef<'a>> {
        let forest = self.forest;
        forest.nodes[self.index]
            .replies
            .iter()
            .map(move |&index| NodeRef { forest, index })
    }
}

impl Forest {
    /// Builds the forest from a flat list.
    ///
    /// A comment whose parent is missing or empty becomes a root. One whose
    /// parent does not resolve is an orphan and is left out together with its
    /// replies. When ids repeat, the first occurrence wins and later ones are
    /// dropped. Roots are ordered newest first; replies keep list order.
    pub fn build(comments: Vec<Comment>) -> Self {
        let mut nodes = Vec::with_capacity(comments.len());
        let mut index_by_id: HashMap<String, usize> = HashMap::with_capacity(comments.len());

        for comment in comments {
            if index_by_id.contains_key(&comment.id) {
                tracing::debug!(id = %comment.id, "duplicate comment id ignored");
                continue;
            }
            index_by_id.insert(comment.id.clone(), nodes.len());
            nodes.push(Node {
                comment,
                replies: Vec::new(),
            });
        }

        let mut roots = Vec::new();
        let mut orphans = Vec::new();

        for index in 0..nodes.len() {
            let parent = nodes[index]
                .comment
                .parent_id()
                .map(|parent| index_by_id.get(parent).copied());

            match parent {
                None => roots.push(index),
                Some(Some(parent)) => nodes[parent].replies.push(index),
                Some(None) => orphans.push(index),
            }
        }

        roots.sort_by(|&a, &b| nodes[b].comment.date.cmp(&nodes[a].comment.date));

        if !orphans.is_empty() {
            tracing::debug!(count = orphans.len(), "comments with unknown parents hidden");
        }

        Self {
            nodes,
            roots,
            orphans,
        }
    }

    pub fn roots(&self) -> impl Iterator<Item = NodeRef<'_>> {
        self.roots.iter().map(move |&index| NodeRef { forest: self, index })
    }

    /// Comments whose parent is not in the list. Not reachable from any root.
    pub fn orphans(&self) -> impl Iterator<Item = &Comment> {
        self.orphans.iter().map(move |&index| &self.nodes[index].comment)
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Depth-first, pre-order walk over every comment reachable from a root,
    /// paired with its depth (roots are depth 0).
    pub fn walk(&self) -> Vec<(usize, &Comment)> {
        let mut visited = vec![false; self.nodes.len()];
        let mut out = Vec::new();
        let mut stack: Vec<(usize, usize)> = self.roots.iter().rev().map(|&index| (index, 0)).collect();

        while let Some((index, depth)) = stack.pop() {
            if std::mem::replace(&mut visited[index], true) {
                continue;
            }
            let node = &self.nodes[index];
            out.push((depth, &node.comment));
            stack.extend(node.replies.iter().rev().map(|&child| (child, depth + 1)));
        }

        out
    }

    pub fn visible_count(&self) -> usize {
        self.walk().len()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};

    use super::*;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap()
    }

    fn comment(id: &str, parent: &str, date: DateTime<Utc>) -> Comment {
        Comment {
            id: id.to_string(),
            author: "Admin".to_string(),
            text: format!("comment {id}"),
            image: None,
            date,
            likes: 0,
            parent: Some(parent.to_string()),
        }
    }

    /// `(id, replies)` pairs, recursively.
    #[derive(Debug, PartialEq)]
    struct Shape(String, Vec<Shape>);

    fn shape(node: NodeRef<'_>) -> Shape {
        Shape(node.comment().id.clone(), node.replies().map(shape).collect())
    }

    fn forest_shape(forest: &Forest) -> Vec<Shape> {
        forest.roots().map(shape).collect()
    }

    #[test]
    fn test_orphan_is_dropped() {
        let forest = Forest::build(vec![
            comment("1", "", at(1)),
            comment("2", "1", at(1)),
            comment("3", "99", at(1)),
        ]);

        assert_eq!(
            forest_shape(&forest),
            vec![Shape("1".into(), vec![Shape("2".into(), vec![])])]
        );
        assert_eq!(forest.orphans().map(|c| c.id.as_str()).collect::<Vec<_>>(), vec!["3"]);
        assert_eq!(forest.visible_count(), 2);
    }

    #[test]
    fn test_roots_newest_first() {
        let forest = Forest::build(vec![comment("old", "", at(1)), comment("new", "", at(2))]);

        let ids: Vec<_> = forest.roots().map(|n| n.comment().id.clone()).collect();
        assert_eq!(ids, vec!["new", "old"]);
    }

    #[test]
    fn test_replies_keep_input_order() {
        let forest = Forest::build(vec![
            comment("root", "", at(1)),
            comment("b", "root", at(3)),
            comment("a", "root", at(2)),
        ]);

        let root = forest.roots().next().unwrap();
        let replies: Vec<_> = root.replies().map(|n| n.comment().id.clone()).collect();
        assert_eq!(replies, vec!["b", "a"]);
    }

    #[test]
    fn test_reply_listed_before_parent_still_attaches() {
        let forest = Forest::build(vec![comment("child", "root", at(2)), comment("root", "", at(1))]);

        assert_eq!(
            forest_shape(&forest),
            vec![Shape("root".into(), vec![Shape("child".into(), vec![])])]
        );
    }

    #[test]
    fn test_descendants_of_orphans_are_hidden() {
        let forest = Forest::build(vec![
            comment("1", "", at(1)),
            comment("lost", "deleted", at(1)),
            comment("lost-reply", "lost", at(1)),
        ]);

        assert_eq!(forest.visible_count(), 1);
        assert_eq!(forest.orphans().count(), 1);
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let mut second = comment("1", "", at(2));
        second.text = "second".to_string();
        let forest = Forest::build(vec![comment("1", "", at(1)), second]);

        let roots: Vec<_> = forest.roots().collect();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].comment().text, "comment 1");
    }

    #[test]
    fn test_cycle_is_unreachable() {
        let forest = Forest::build(vec![comment("a", "b", at(1)), comment("b", "a", at(1))]);

        assert!(forest.is_empty());
        assert_eq!(forest.visible_count(), 0);
    }

    #[test]
    fn test_walk_reports_depth() {
        let forest = Forest::build(vec![
            comment("1", "", at(1)),
            comment("2", "1", at(1)),
            comment("3", "2", at(1)),
            comment("4", "", at(2)),
        ]);

        let walked: Vec<_> = forest.walk().into_iter().map(|(d, c)| (d, c.id.as_str())).collect();
        assert_eq!(walked, vec![(0, "4"), (0, "1"), (1, "2"), (2, "3")]);
    }

    #[test]
    fn test_deep_chain_does_not_recurse() {
        let mut comments = vec![comment("0", "", at(1))];
        for i in 1..10_000 {
            comments.push(comment(&i.to_string(), &(i - 1).to_string(), at(1)));
        }

        let forest = Forest::build(comments);
        assert_eq!(forest.visible_count(), 10_000);
    }
}
