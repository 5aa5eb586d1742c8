use std::collections::HashSet;

use glslx_ast::{CompilerData, ExtensionBehavior, NodeId, NodeKind, SymbolId, SymbolTable, Tree};

use crate::fold;

/// Runs the fixed-point compaction / symbol-trimming / extension-pruning
/// loop over a resolved tree (spec.md §4.5). Each pass may make another
/// pass profitable (removing a dead function can make its only caller's
/// block collapsible, which can make another `if` condition constant), so
/// the whole thing repeats until a full pass makes no further change.
/// `trim_symbols` gates step 2 only (spec.md §4.5, "`--keep-symbols`");
/// compaction and extension pruning always run. Returns whether anything
/// changed across the whole loop.
#[tracing::instrument(level = "debug", skip_all)]
pub fn rewrite(tree: &mut Tree, symbols: &mut SymbolTable, data: &mut CompilerData, trim_symbols: bool) -> bool {
    let mut changed_overall = false;
    loop {
        let root = tree.root.expect("rewrite requires a parsed tree");
        let mut changed = false;
        changed |= fold_constants_in(tree, symbols, root);
        changed |= compact(tree, root);
        if trim_symbols {
            changed |= trim_unused_symbols(tree, symbols);
        }
        changed |= prune_unused_extensions(tree, symbols, data);
        changed_overall |= changed;
        if !changed {
            break;
        }
    }
    changed_overall
}

fn fold_constants_in(tree: &mut Tree, symbols: &mut SymbolTable, id: NodeId) -> bool {
    let mut changed = false;
    let children: Vec<NodeId> = tree.children(id).collect();
    for child in children {
        changed |= fold_constants_in(tree, symbols, child);
    }
    if tree.kind(id).is_expression() && !tree.kind(id).is_literal() {
        let referenced_symbol = (tree.kind(id) == NodeKind::Name).then(|| tree.get(id).symbol).flatten();
        if let Some(folded) = fold::fold(tree, symbols, id) {
            // The `Name` this folded through is about to stop existing in
            // the tree, so its use count must drop with it - otherwise a
            // now-dead `const` never looks unused to `trim_unused_symbols`.
            if let Some(sym_id) = referenced_symbol {
                symbols.unmark_used(sym_id);
            }
            tree.become_node(id, folded);
            changed = true;
        }
    }
    changed
}

/// Block-inlining, dead-code-after-jump removal, constant-condition `if`
/// folding, `do { } while (false)`/`while (false)` removal, a handful of
/// algebraic identities, and no-effect expression-statement removal.
///
/// This is a partial implementation of spec.md §4.5's full named rule
/// set; the remaining rules (sequence merging/flattening, `while`-to-`for`
/// conversion, dangling-else wrapping, if/else-with-return collapsing,
/// nested-if-to-`&&` collapsing, adjacent-`VARIABLES` coalescing,
/// `?:`-branch assignment-LHS distribution, vector-index-to-swizzle,
/// `>=k`/`<=k` boundary rewrites) are not implemented; see DESIGN.md.
fn compact(tree: &mut Tree, id: NodeId) -> bool {
    let mut changed = false;
    let children: Vec<NodeId> = tree.children(id).collect();
    for child in children {
        changed |= compact(tree, child);
    }
    changed |= match tree.kind(id) {
        NodeKind::Block => remove_dead_code_after_jump(tree, id),
        NodeKind::If => simplify_constant_if(tree, id),
        NodeKind::While => simplify_while_false(tree, id),
        NodeKind::DoWhile => simplify_do_while_false(tree, id),
        NodeKind::ExpressionStmt => remove_no_effect_expr_stmt(tree, id),
        NodeKind::Subtract => simplify_subtract_zero(tree, id),
        NodeKind::Multiply => simplify_multiply_identity(tree, id),
        NodeKind::Not => simplify_double_not(tree, id),
        NodeKind::Call => simplify_redundant_cast(tree, id),
        _ => false,
    };
    changed
}

/// `1.0;` as a whole statement: a bare literal read for its value and
/// then discarded has no effect. A bare name is left alone even though it
/// is equally dead - dropping it would need to also decrement its
/// symbol's use count, which only the constant folder currently tracks.
fn remove_no_effect_expr_stmt(tree: &mut Tree, id: NodeId) -> bool {
    let Some(expr) = tree.children(id).next() else { return false };
    if tree.child_count(id) != 1 {
        return false;
    }
    if !matches!(tree.kind(expr), NodeKind::Bool | NodeKind::Int | NodeKind::Float) {
        return false;
    }
    tree.remove(id);
    true
}

fn is_scalar_literal(tree: &Tree, node: NodeId, value: f64) -> bool {
    match tree.kind(node) {
        NodeKind::Int => tree.get(node).literal_int as f64 == value,
        NodeKind::Float => tree.get(node).literal_float == value,
        _ => false,
    }
}

/// `a - 0 → a`.
fn simplify_subtract_zero(tree: &mut Tree, id: NodeId) -> bool {
    let children: Vec<NodeId> = tree.children(id).collect();
    let (Some(&l), Some(&r)) = (children.first(), children.get(1)) else { return false };
    if is_scalar_literal(tree, r, 0.0) {
        tree.become_node(id, l);
        true
    } else {
        false
    }
}

/// `a * 1 → a` and `1 * a → a`.
fn simplify_multiply_identity(tree: &mut Tree, id: NodeId) -> bool {
    let children: Vec<NodeId> = tree.children(id).collect();
    let (Some(&l), Some(&r)) = (children.first(), children.get(1)) else { return false };
    if is_scalar_literal(tree, r, 1.0) {
        tree.become_node(id, l);
        true
    } else if is_scalar_literal(tree, l, 1.0) {
        tree.become_node(id, r);
        true
    } else {
        false
    }
}

/// `!!a → a`.
fn simplify_double_not(tree: &mut Tree, id: NodeId) -> bool {
    let Some(inner_not) = tree.children(id).next() else { return false };
    if tree.kind(inner_not) != NodeKind::Not {
        return false;
    }
    let Some(inner) = tree.children(inner_not).next() else { return false };
    tree.become_node(id, inner);
    true
}

/// `int(k)`/`float(k)`/`bool(k)` where `k` already has that exact type -
/// the cast changes nothing and can be dropped.
fn simplify_redundant_cast(tree: &mut Tree, id: NodeId) -> bool {
    let children: Vec<NodeId> = tree.children(id).collect();
    let (Some(&callee), Some(&arg)) = (children.first(), children.get(1)) else { return false };
    if children.len() != 2 || tree.kind(callee) != NodeKind::Name {
        return false;
    }
    if !matches!(tree.get(callee).text.as_str(), "bool" | "int" | "float") {
        return false;
    }
    if tree.get(id).resolved_type.is_some() && tree.get(id).resolved_type == tree.get(arg).resolved_type {
        tree.become_node(id, arg);
        true
    } else {
        false
    }
}

fn remove_dead_code_after_jump(tree: &mut Tree, block: NodeId) -> bool {
    let children: Vec<NodeId> = tree.children(block).collect();
    let cut = children
        .iter()
        .position(|&c| matches!(tree.kind(c), NodeKind::Break | NodeKind::Continue | NodeKind::Discard | NodeKind::Return));
    match cut {
        Some(i) if i + 1 < children.len() => {
            for dead in &children[i + 1..] {
                tree.remove(*dead);
            }
            true
        }
        _ => false,
    }
}

fn as_bool_literal(tree: &Tree, node: NodeId) -> Option<bool> {
    (tree.kind(node) == NodeKind::Bool).then(|| tree.get(node).literal_int != 0)
}

/// `if (true) a; else b;` becomes `a`; `if (false) a; else b;` becomes `b`
/// (or an empty block when there is no `else`).
fn simplify_constant_if(tree: &mut Tree, id: NodeId) -> bool {
    let children: Vec<NodeId> = tree.children(id).collect();
    let Some(&cond) = children.first() else { return false };
    let Some(taken) = as_bool_literal(tree, cond) else { return false };
    let branch = if taken { children.get(1) } else { children.get(2) };
    match branch {
        Some(&branch) => tree.become_node(id, branch),
        None => {
            let range = tree.get(id).range;
            let empty = tree.alloc(NodeKind::Block, range);
            tree.become_node(id, empty);
        }
    }
    true
}

fn simplify_while_false(tree: &mut Tree, id: NodeId) -> bool {
    let Some(cond) = tree.children(id).next() else { return false };
    if as_bool_literal(tree, cond) != Some(false) {
        return false;
    }
    let range = tree.get(id).range;
    let empty = tree.alloc(NodeKind::Block, range);
    tree.become_node(id, empty);
    true
}

/// `do { body } while (false)` executes `body` exactly once; it is just
/// `body` wearing a loop.
fn simplify_do_while_false(tree: &mut Tree, id: NodeId) -> bool {
    let children: Vec<NodeId> = tree.children(id).collect();
    let (Some(&body), Some(&cond)) = (children.first(), children.get(1)) else { return false };
    if as_bool_literal(tree, cond) != Some(false) {
        return false;
    }
    tree.become_node(id, body);
    true
}

fn is_removable(symbols: &SymbolTable, id: SymbolId) -> bool {
    match symbols.try_get(id) {
        Some(sym) => sym.use_count == 0 && !sym.is_exported() && !sym.is_imported(),
        None => false,
    }
}

/// Deletes declarations (global or local) whose symbol is no longer
/// referenced, anywhere in the tree. Exported and imported symbols are
/// never eligible: they are the seams other trees, or host code, reach
/// into this one through.
fn trim_unused_symbols(tree: &mut Tree, symbols: &mut SymbolTable) -> bool {
    let root = tree.root.expect("rewrite requires a parsed tree");
    trim_unused_in(tree, symbols, root)
}

fn trim_unused_in(tree: &mut Tree, symbols: &mut SymbolTable, parent: NodeId) -> bool {
    let mut changed = false;
    let children: Vec<NodeId> = tree.children(parent).collect();
    for node in children {
        // A struct's fields are part of its type's shape, not free-standing
        // declarations - an unused field is still load-bearing layout.
        if tree.kind(node) != NodeKind::Struct {
            changed |= trim_unused_in(tree, symbols, node);
        }
        match tree.kind(node) {
            NodeKind::Variables => {
                let vars: Vec<NodeId> = tree.children(node).collect();
                for var in vars {
                    if let Some(id) = tree.get(var).symbol {
                        if is_removable(symbols, id) {
                            tree.remove(var);
                            symbols.remove(id);
                            changed = true;
                        }
                    }
                }
                if tree.child_count(node) == 0 {
                    tree.remove(node);
                    changed = true;
                }
            }
            NodeKind::Function | NodeKind::Struct => {
                if let Some(id) = tree.get(node).symbol {
                    if is_removable(symbols, id) {
                        tree.remove(node);
                        symbols.remove(id);
                        changed = true;
                    }
                }
            }
            _ => {}
        }
    }
    changed
}

/// Drops a `#extension` directive once nothing left in the tree still
/// requires it, resetting its behavior back to `Default` so a later
/// re-parse of the same source (another entry point) starts fresh.
fn prune_unused_extensions(tree: &mut Tree, symbols: &SymbolTable, data: &mut CompilerData) -> bool {
    let root = tree.root.expect("rewrite requires a parsed tree");
    let mut still_required = HashSet::new();
    collect_required_extensions(tree, symbols, root, &mut still_required);

    let mut changed = false;
    let extensions: Vec<NodeId> = tree.children(root).filter(|&c| tree.kind(c) == NodeKind::Extension).collect();
    for ext in extensions {
        let name = tree.get(ext).text.clone();
        if !still_required.contains(&name) {
            tree.remove(ext);
            data.set_behavior(name, ExtensionBehavior::Default);
            changed = true;
        }
    }
    changed
}

fn collect_required_extensions(tree: &Tree, symbols: &SymbolTable, id: NodeId, out: &mut HashSet<String>) {
    if let Some(ext) = tree.get(id).symbol.and_then(|s| symbols.try_get(s)).and_then(|s| s.required_extension.as_ref()) {
        out.insert(ext.clone());
    }
    let children: Vec<NodeId> = tree.children(id).collect();
    for child in children {
        collect_required_extensions(tree, symbols, child, out);
    }
}

#[cfg(test)]
mod tests {
    use glslx_ast::{CompilerData, NodeKind, SymbolTable};
    use glslx_base::SourceSet;
    use glslx_parse::{parse, NullFileAccess};

    use crate::resolve;

    use super::rewrite;

    fn compile(text: &str) -> (glslx_ast::Tree, SymbolTable, CompilerData) {
        let mut sources = SourceSet::new();
        let id = sources.add("<test>", text);
        let mut access = NullFileAccess;
        let mut result = parse(&mut sources, &[id], &mut access);
        resolve::resolve(&mut result.tree, &mut result.symbols, &mut result.data, &mut result.log);
        (result.tree, result.symbols, result.data)
    }

    #[test]
    fn constant_if_collapses_to_the_taken_branch() {
        let (mut tree, mut symbols, mut data) =
            compile("void main() { if (true) { gl_FragColor = vec4(1.0); } else { gl_FragColor = vec4(0.0); } }");
        rewrite(&mut tree, &mut symbols, &mut data, true);
        let main = tree.children(tree.root.unwrap()).find(|&n| tree.kind(n) == NodeKind::Function).unwrap();
        let body = tree.children(main).last().unwrap();
        assert_eq!(tree.kind(body), NodeKind::Block);
        assert_eq!(tree.child_count(body), 1);
    }

    #[test]
    fn unused_global_is_deleted() {
        let (mut tree, mut symbols, mut data) = compile("float unused = 1.0; void main() { }");
        rewrite(&mut tree, &mut symbols, &mut data, true);
        let root = tree.root.unwrap();
        assert!(tree.children(root).all(|n| tree.kind(n) != NodeKind::Variables));
    }

    #[test]
    fn statements_after_return_are_removed() {
        let (mut tree, mut symbols, mut data) = compile("float f() { return 1.0; float x = 2.0; }");
        rewrite(&mut tree, &mut symbols, &mut data, true);
        let func = tree.children(tree.root.unwrap()).find(|&n| tree.kind(n) == NodeKind::Function).unwrap();
        let body = tree.children(func).last().unwrap();
        assert_eq!(tree.child_count(body), 1);
    }

    #[test]
    fn folding_a_const_name_away_drops_its_use_count() {
        let (mut tree, mut symbols, mut data) = compile("const int N = 2; void main() { float x = float(N); }");
        let n_id = symbols.symbols_iter().find(|s| s.name == "N").unwrap().id;
        assert_eq!(symbols.get(n_id).use_count, 1);
        rewrite(&mut tree, &mut symbols, &mut data, true);
        assert!(symbols.try_get(n_id).is_none(), "N should have been trimmed once its only use folded away");
    }

    #[test]
    fn subtract_zero_simplifies_to_its_left_operand() {
        let (mut tree, mut symbols, mut data) = compile("void main() { float x = 1.0; float y = x - 0.0; }");
        rewrite(&mut tree, &mut symbols, &mut data, true);
        let func = tree.children(tree.root.unwrap()).find(|&n| tree.kind(n) == NodeKind::Function).unwrap();
        let body = tree.children(func).last().unwrap();
        let y_decl = tree.children(body).nth(1).unwrap();
        let y_var = tree.children(y_decl).next().unwrap();
        let init = tree.children(y_var).nth(1).unwrap();
        assert_eq!(tree.kind(init), NodeKind::Name);
    }

    #[test]
    fn no_effect_expression_statement_is_removed() {
        let (mut tree, mut symbols, mut data) = compile("void main() { float x = 1.0; 2.0; }");
        rewrite(&mut tree, &mut symbols, &mut data, true);
        let func = tree.children(tree.root.unwrap()).find(|&n| tree.kind(n) == NodeKind::Function).unwrap();
        let body = tree.children(func).last().unwrap();
        assert_eq!(tree.child_count(body), 1);
    }

    #[test]
    fn constant_arithmetic_folds_in_place() {
        let (mut tree, mut symbols, mut data) = compile("void main() { float x = 1.0 + 2.0; }");
        rewrite(&mut tree, &mut symbols, &mut data, true);
        let func = tree.children(tree.root.unwrap()).find(|&n| tree.kind(n) == NodeKind::Function).unwrap();
        let body = tree.children(func).last().unwrap();
        let group = tree.children(body).next().unwrap();
        let var = tree.children(group).next().unwrap();
        let init = tree.children(var).nth(1).unwrap();
        assert_eq!(tree.kind(init), NodeKind::Float);
        assert_eq!(tree.get(init).literal_float, 3.0);
    }
}
