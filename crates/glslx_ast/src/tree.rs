use glslx_base::Range;

use crate::ids::{NodeId, ScopeId, SymbolId};
use crate::types::Type;

/// Every node kind, grouped into the ordered bands spec.md §3 calls "load
/// bearing": within each band the discriminants are contiguous, so "is
/// this a statement/expression/literal/..." is one `u16` range check
/// (see [`NodeKind::is_statement`] and friends) rather than a match over
/// every variant.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[repr(u16)]
pub enum NodeKind {
    /// A type-expression (a built-in type keyword or a reference to a
    /// struct symbol), optionally wrapped in array brackets. Not itself a
    /// statement or expression; sits outside both bands.
    Type,

    // ---- statements: BLOCK..WHILE --------------------------------------
    Block,
    Break,
    Continue,
    Discard,
    DoWhile,
    ExpressionStmt,
    Extension,
    For,
    Function,
    If,
    Pragma,
    Precision,
    Return,
    Struct,
    Variable,
    Variables,
    Version,
    While,

    // ---- expressions: CALL..ASSIGN_SUBTRACT ----------------------------
    Call,
    Dot,
    Hook,
    Index,
    Name,
    Sequence,

    // literals
    Bool,
    Float,
    Int,

    // unary prefix
    BitwiseNot,
    Negative,
    Not,
    Positive,

    // unary assign prefix
    PrefixDecrement,
    PrefixIncrement,

    // unary assign postfix
    PostfixDecrement,
    PostfixIncrement,

    // binary
    Add,
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
    Divide,
    Equal,
    GreaterThan,
    GreaterThanEqual,
    LessThan,
    LessThanEqual,
    LogicalAnd,
    LogicalOr,
    LogicalXor,
    Multiply,
    NotEqual,
    ShiftLeft,
    ShiftRight,
    Subtract,

    // binary-assign
    Assign,
    AssignAdd,
    AssignBitwiseAnd,
    AssignBitwiseOr,
    AssignBitwiseXor,
    AssignDivide,
    AssignMultiply,
    AssignShiftLeft,
    AssignShiftRight,
    AssignSubtract,
}

impl NodeKind {
    fn band(self) -> u16 {
        self as u16
    }

    pub fn is_statement(self) -> bool {
        (NodeKind::Block.band()..=NodeKind::While.band()).contains(&self.band())
    }

    pub fn is_expression(self) -> bool {
        (NodeKind::Call.band()..=NodeKind::AssignSubtract.band()).contains(&self.band())
    }

    pub fn is_literal(self) -> bool {
        (NodeKind::Bool.band()..=NodeKind::Int.band()).contains(&self.band())
    }

    pub fn is_unary_prefix(self) -> bool {
        (NodeKind::BitwiseNot.band()..=NodeKind::Positive.band()).contains(&self.band())
    }

    pub fn is_unary_assign_prefix(self) -> bool {
        matches!(self, NodeKind::PrefixDecrement | NodeKind::PrefixIncrement)
    }

    pub fn is_unary_assign_postfix(self) -> bool {
        matches!(self, NodeKind::PostfixDecrement | NodeKind::PostfixIncrement)
    }

    pub fn is_unary(self) -> bool {
        self.is_unary_prefix() || self.is_unary_assign_prefix() || self.is_unary_assign_postfix()
    }

    pub fn is_binary(self) -> bool {
        (NodeKind::Add.band()..=NodeKind::Subtract.band()).contains(&self.band())
    }

    pub fn is_binary_assign(self) -> bool {
        (NodeKind::Assign.band()..=NodeKind::AssignSubtract.band()).contains(&self.band())
    }

    pub fn is_assign(self) -> bool {
        self.is_binary_assign() || self.is_unary_assign_prefix() || self.is_unary_assign_postfix()
    }
}

/// One arena slot. Owns no heap beyond its own fields and `text`; children
/// are sibling-linked `NodeId`s into the same `Tree`'s arena.
pub struct NodeData {
    pub id: NodeId,
    pub kind: NodeKind,
    pub range: Range,
    /// e.g. the operator sub-range of a binary expression, for
    /// diagnostics that want to point only at `+` rather than the whole
    /// `a + b`.
    pub internal_range: Option<Range>,
    pub symbol: Option<SymbolId>,
    pub resolved_type: Option<Type>,
    pub literal_int: i64,
    pub literal_float: f64,
    pub text: String,
    /// The scope this node introduces (`Block`, `Function`, `Struct`,
    /// `For`), or `None` for nodes that live inside their nearest
    /// scope-introducing ancestor. Set by the parser at the same time it
    /// calls `SymbolTable::new_scope`; the resolver walks this field
    /// rather than re-deriving scopes from tree shape.
    pub scope: Option<ScopeId>,

    parent: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
    prev_sibling: Option<NodeId>,
    next_sibling: Option<NodeId>,
}

impl NodeData {
    fn new(id: NodeId, kind: NodeKind, range: Range) -> Self {
        NodeData {
            id,
            kind,
            range,
            internal_range: None,
            symbol: None,
            resolved_type: None,
            literal_int: 0,
            literal_float: 0.0,
            text: String::new(),
            scope: None,
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn first_child(&self) -> Option<NodeId> {
        self.first_child
    }

    pub fn last_child(&self) -> Option<NodeId> {
        self.last_child
    }

    pub fn prev_sibling(&self) -> Option<NodeId> {
        self.prev_sibling
    }

    pub fn next_sibling(&self) -> Option<NodeId> {
        self.next_sibling
    }

    pub fn has_children(&self) -> bool {
        debug_assert_eq!(self.first_child.is_none(), self.last_child.is_none());
        self.first_child.is_some()
    }
}

/// The intrusive first-child/next-sibling tree, realized as an arena of
/// [`NodeData`] indexed by [`NodeId`] handles rather than raw pointers
/// (spec.md §9's own redesign guidance; see DESIGN.md). One `Tree` is
/// exactly one compilation unit's worth of nodes; nothing is ever shared
/// between two `Tree`s except by cloning a subtree (spec.md §5).
pub struct Tree {
    nodes: Vec<NodeData>,
    pub root: Option<NodeId>,
}

impl Default for Tree {
    fn default() -> Self {
        Tree::new()
    }
}

impl Tree {
    pub fn new() -> Self {
        Tree { nodes: Vec::new(), root: None }
    }

    pub fn alloc(&mut self, kind: NodeKind, range: Range) -> NodeId {
        let id = NodeId::from_usize(self.nodes.len());
        self.nodes.push(NodeData::new(id, kind, range));
        id
    }

    pub fn get(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.get(id).kind
    }

    /// Appends `child` as the new last child of `parent`. `child` must
    /// currently be detached (no parent, no siblings) — the invariant
    /// spec.md §3 requires of a "freshly created or detached node".
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        debug_assert!(self.get(child).parent.is_none());
        let old_last = self.get(parent).last_child;
        self.get_mut(child).parent = Some(parent);
        self.get_mut(child).prev_sibling = old_last;
        if let Some(last) = old_last {
            self.get_mut(last).next_sibling = Some(child);
        } else {
            self.get_mut(parent).first_child = Some(child);
        }
        self.get_mut(parent).last_child = Some(child);
    }

    /// Detaches `child` from its parent and siblings, restoring the
    /// symmetric sibling-link invariant on both sides.
    pub fn remove(&mut self, child: NodeId) {
        let (parent, prev, next) = {
            let n = self.get(child);
            (n.parent, n.prev_sibling, n.next_sibling)
        };
        let Some(parent) = parent else { return };

        match prev {
            Some(p) => self.get_mut(p).next_sibling = next,
            None => self.get_mut(parent).first_child = next,
        }
        match next {
            Some(n) => self.get_mut(n).prev_sibling = prev,
            None => self.get_mut(parent).last_child = prev,
        }

        let n = self.get_mut(child);
        n.parent = None;
        n.prev_sibling = None;
        n.next_sibling = None;
    }

    /// Detaches `old` and inserts `new` (which must currently be
    /// detached) in its place.
    pub fn replace_with(&mut self, old: NodeId, new: NodeId) {
        let (parent, prev, next) = {
            let n = self.get(old);
            (n.parent.expect("replace_with on a root node"), n.prev_sibling, n.next_sibling)
        };
        debug_assert!(self.get(new).parent.is_none());

        self.get_mut(new).parent = Some(parent);
        self.get_mut(new).prev_sibling = prev;
        self.get_mut(new).next_sibling = next;

        match prev {
            Some(p) => self.get_mut(p).next_sibling = Some(new),
            None => self.get_mut(parent).first_child = Some(new),
        }
        match next {
            Some(n) => self.get_mut(n).prev_sibling = Some(new),
            None => self.get_mut(parent).last_child = Some(new),
        }

        let n = self.get_mut(old);
        n.parent = None;
        n.prev_sibling = None;
        n.next_sibling = None;
    }

    /// Inserts `new` (detached) immediately before `sibling` under
    /// `sibling`'s parent.
    pub fn insert_before(&mut self, sibling: NodeId, new: NodeId) {
        let (parent, prev) = {
            let n = self.get(sibling);
            (n.parent.expect("insert_before on a root node"), n.prev_sibling)
        };
        self.get_mut(new).parent = Some(parent);
        self.get_mut(new).prev_sibling = prev;
        self.get_mut(new).next_sibling = Some(sibling);
        match prev {
            Some(p) => self.get_mut(p).next_sibling = Some(new),
            None => self.get_mut(parent).first_child = Some(new),
        }
        self.get_mut(sibling).prev_sibling = Some(new);
    }

    /// Overwrites `target`'s payload (kind, range, literal/text/symbol/
    /// type fields) with `source`'s, while preserving `target`'s parent
    /// attachment and sibling links — spec.md §3's `become(other)`.
    /// `source`'s own children become `target`'s children; `source` is
    /// left detached-looking (its own links are left alone since callers
    /// never reuse `source` afterward) and should simply be dropped by
    /// the caller.
    pub fn become_node(&mut self, target: NodeId, source: NodeId) {
        let parent = self.get(target).parent;
        let prev_sibling = self.get(target).prev_sibling;
        let next_sibling = self.get(target).next_sibling;

        let mut replacement = NodeData::new(target, self.get(source).kind, self.get(source).range);
        replacement.internal_range = self.get(source).internal_range;
        replacement.symbol = self.get(source).symbol;
        replacement.resolved_type = self.get(source).resolved_type.clone();
        replacement.literal_int = self.get(source).literal_int;
        replacement.literal_float = self.get(source).literal_float;
        replacement.text = self.get(source).text.clone();
        replacement.scope = self.get(source).scope;
        replacement.parent = parent;
        replacement.prev_sibling = prev_sibling;
        replacement.next_sibling = next_sibling;
        replacement.first_child = self.get(source).first_child;
        replacement.last_child = self.get(source).last_child;

        // Re-parent `source`'s former children onto `target`.
        let mut child = replacement.first_child;
        while let Some(c) = child {
            let next = self.get(c).next_sibling;
            self.get_mut(c).parent = Some(target);
            child = next;
        }

        self.nodes[target.index()] = replacement;
    }

    pub fn children(&self, id: NodeId) -> ChildIter<'_> {
        ChildIter { tree: self, next: self.get(id).first_child }
    }

    pub fn child_count(&self, id: NodeId) -> usize {
        self.children(id).count()
    }

    pub fn nth_child(&self, id: NodeId, n: usize) -> Option<NodeId> {
        self.children(id).nth(n)
    }

    /// Deep-clones the subtree rooted at `id` into a brand new, detached
    /// node in this same tree. Cloning is the only legal way to insert
    /// the same logical subtree in two places (spec.md §5).
    pub fn clone_subtree(&mut self, id: NodeId) -> NodeId {
        let src = self.get(id);
        let new_id = self.alloc(src.kind, src.range);
        {
            let src = self.get(id);
            let data = NodeData {
                id: new_id,
                kind: src.kind,
                range: src.range,
                internal_range: src.internal_range,
                symbol: src.symbol,
                resolved_type: src.resolved_type.clone(),
                literal_int: src.literal_int,
                literal_float: src.literal_float,
                text: src.text.clone(),
                scope: src.scope,
                parent: None,
                first_child: None,
                last_child: None,
                prev_sibling: None,
                next_sibling: None,
            };
            self.nodes[new_id.index()] = data;
        }
        let children: Vec<NodeId> = self.children(id).collect();
        for child in children {
            let cloned = self.clone_subtree(child);
            self.append_child(new_id, cloned);
        }
        new_id
    }

    /// Verifies the tree well-formedness invariant (spec.md §8,
    /// invariant 1): every node reachable from `root` is reached exactly
    /// once via `first_child`/`next_sibling`, and sibling links are
    /// symmetric. Intended for tests and debug assertions, not the hot
    /// path.
    pub fn check_well_formed(&self, root: NodeId) -> Result<(), String> {
        let mut seen = std::collections::HashSet::new();
        self.check_well_formed_rec(root, &mut seen)
    }

    fn check_well_formed_rec(&self, id: NodeId, seen: &mut std::collections::HashSet<NodeId>) -> Result<(), String> {
        if !seen.insert(id) {
            return Err(format!("node {id:?} reached more than once"));
        }
        let mut prev: Option<NodeId> = None;
        let mut child = self.get(id).first_child;
        while let Some(c) = child {
            if self.get(c).parent != Some(id) {
                return Err(format!("node {c:?} has wrong parent"));
            }
            if self.get(c).prev_sibling != prev {
                return Err(format!("node {c:?} has asymmetric prev_sibling link"));
            }
            self.check_well_formed_rec(c, seen)?;
            prev = Some(c);
            child = self.get(c).next_sibling;
        }
        if self.get(id).last_child != prev {
            return Err(format!("node {id:?} has wrong last_child"));
        }
        Ok(())
    }
}

pub struct ChildIter<'a> {
    tree: &'a Tree,
    next: Option<NodeId>,
}

impl<'a> Iterator for ChildIter<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.get(current).next_sibling();
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glslx_base::SourceSet;

    fn dummy_range(tree: &mut Tree) -> Range {
        let mut set = SourceSet::new();
        let id = set.add("<test>", "");
        let _ = tree;
        Range::empty(id, 0)
    }

    #[test]
    fn append_and_iterate_children() {
        let mut tree = Tree::new();
        let r = dummy_range(&mut tree);
        let parent = tree.alloc(NodeKind::Block, r);
        let a = tree.alloc(NodeKind::Break, r);
        let b = tree.alloc(NodeKind::Continue, r);
        tree.append_child(parent, a);
        tree.append_child(parent, b);
        assert_eq!(tree.children(parent).collect::<Vec<_>>(), vec![a, b]);
        tree.check_well_formed(parent).unwrap();
    }

    #[test]
    fn remove_restores_symmetric_links() {
        let mut tree = Tree::new();
        let r = dummy_range(&mut tree);
        let parent = tree.alloc(NodeKind::Block, r);
        let a = tree.alloc(NodeKind::Break, r);
        let b = tree.alloc(NodeKind::Continue, r);
        let c = tree.alloc(NodeKind::Discard, r);
        for n in [a, b, c] {
            tree.append_child(parent, n);
        }
        tree.remove(b);
        assert_eq!(tree.children(parent).collect::<Vec<_>>(), vec![a, c]);
        tree.check_well_formed(parent).unwrap();
        assert!(tree.get(b).parent().is_none());
    }

    #[test]
    fn become_node_preserves_parent_attachment() {
        let mut tree = Tree::new();
        let r = dummy_range(&mut tree);
        let parent = tree.alloc(NodeKind::Block, r);
        let a = tree.alloc(NodeKind::Int, r);
        tree.get_mut(a).literal_int = 1;
        tree.append_child(parent, a);

        let replacement = tree.alloc(NodeKind::Int, r);
        tree.get_mut(replacement).literal_int = 42;
        tree.become_node(a, replacement);

        assert_eq!(tree.get(a).literal_int, 42);
        assert_eq!(tree.get(a).parent(), Some(parent));
        assert_eq!(tree.children(parent).collect::<Vec<_>>(), vec![a]);
    }

    #[test]
    fn clone_subtree_is_deep_and_detached() {
        let mut tree = Tree::new();
        let r = dummy_range(&mut tree);
        let parent = tree.alloc(NodeKind::Block, r);
        let child = tree.alloc(NodeKind::Int, r);
        tree.get_mut(child).literal_int = 7;
        tree.append_child(parent, child);

        let cloned = tree.clone_subtree(parent);
        assert!(tree.get(cloned).parent().is_none());
        let cloned_child = tree.children(cloned).next().unwrap();
        assert_ne!(cloned_child, child);
        assert_eq!(tree.get(cloned_child).literal_int, 7);
    }

    #[test]
    fn kind_bands_are_contiguous_and_exclusive() {
        assert!(NodeKind::Block.is_statement());
        assert!(!NodeKind::Block.is_expression());
        assert!(NodeKind::Call.is_expression());
        assert!(!NodeKind::Call.is_statement());
        assert!(NodeKind::Int.is_literal());
        assert!(NodeKind::Int.is_expression());
        assert!(NodeKind::Negative.is_unary_prefix());
        assert!(NodeKind::Add.is_binary());
        assert!(NodeKind::AssignSubtract.is_binary_assign());
        assert!(NodeKind::AssignSubtract.is_assign());
        assert!(NodeKind::PrefixIncrement.is_assign());
        assert!(NodeKind::PostfixIncrement.is_assign());
    }
}
