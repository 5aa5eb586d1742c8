use glslx_ast::{
    BaseType, CompilerData, ExtensionBehavior, NodeId, NodeKind, ScopeId, SymbolFlags, SymbolId, SymbolKind,
    SymbolTable, Tree, Type, VariableKind,
};
use glslx_base::{Log, Range};

const SWIZZLE_SETS: [&str; 3] = ["xyzw", "rgba", "stpq"];

fn matrix_size(t: &Type) -> Option<u32> {
    match t.base() {
        Some(BaseType::Mat2) => Some(2),
        Some(BaseType::Mat3) => Some(3),
        Some(BaseType::Mat4) => Some(4),
        _ => None,
    }
}

fn vector_size(t: &Type) -> Option<u32> {
    match t.base() {
        Some(BaseType::Vec2) => Some(2),
        Some(BaseType::Vec3) => Some(3),
        Some(BaseType::Vec4) => Some(4),
        _ => None,
    }
}

/// Binds names, infers types, and runs the control-flow liveness analysis
/// over every node reachable from `tree.root` (spec.md §4.3). Idempotent:
/// re-running on an already-resolved tree recomputes the same
/// `resolved_type`/`symbol` assignments (spec.md §8 invariant 2).
#[tracing::instrument(level = "debug", skip_all)]
pub fn resolve(tree: &mut Tree, symbols: &mut SymbolTable, data: &mut CompilerData, log: &mut Log) {
    let mut resolver = Resolver { tree, symbols, data, log, return_type_stack: Vec::new(), break_seen_stack: Vec::new(), pending_unused: Vec::new() };
    resolver.resolve_versions_and_extensions_head();
    let root = resolver.tree.root.expect("resolve requires a parsed tree");
    let scope = resolver.tree.get(root).scope.expect("root carries the global scope");
    let children: Vec<NodeId> = resolver.tree.children(root).collect();
    for child in children {
        resolver.resolve_global_declaration(child, scope);
    }
    resolver.finalize_unused();
}

struct Resolver<'a> {
    tree: &'a mut Tree,
    symbols: &'a mut SymbolTable,
    data: &'a mut CompilerData,
    log: &'a mut Log,
    return_type_stack: Vec<Type>,
    break_seen_stack: Vec<bool>,
    pending_unused: Vec<SymbolId>,
}

impl<'a> Resolver<'a> {
    fn resolve_versions_and_extensions_head(&mut self) {
        // Parser already collapsed #version directives to a single
        // leading one (spec.md §4.2); nothing further to do here except
        // let auto-enabled extensions (inserted by `note_required_extension`
        // during name resolution) land after it, which they do by virtue
        // of being appended right after the version node there.
    }

    fn track_declared(&mut self, id: SymbolId) {
        if self.symbols.get(id).is_exported() {
            return;
        }
        self.pending_unused.push(id);
    }

    fn finalize_unused(&mut self) {
        self.pending_unused.retain(|&id| self.symbols.try_get(id).map(|s| s.use_count == 0).unwrap_or(false));
    }

    /// Every symbol declared and never used, after resolution completed.
    pub fn unused_symbols(&self) -> &[SymbolId] {
        &self.pending_unused
    }

    fn resolve_global_declaration(&mut self, node: NodeId, scope: ScopeId) {
        match self.tree.kind(node) {
            NodeKind::Variables => self.resolve_variable_group(node, scope),
            NodeKind::Struct => self.resolve_struct(node),
            NodeKind::Function => self.resolve_function(node),
            NodeKind::Precision => {}
            NodeKind::Version | NodeKind::Extension | NodeKind::Pragma => {}
            _ => {}
        }
    }

    fn resolve_struct(&mut self, node: NodeId) {
        let fields: Vec<NodeId> = self.tree.children(node).collect();
        for f in fields {
            self.resolve_variable_group(f, self.tree.get(node).scope.unwrap());
        }
        if let Some(id) = self.tree.get(node).symbol {
            self.track_declared(id);
        }
    }

    fn resolve_variable_group(&mut self, group: NodeId, scope: ScopeId) {
        let vars: Vec<NodeId> = self.tree.children(group).collect();
        for var in vars {
            self.resolve_variable(var, scope);
        }
    }

    fn resolve_variable(&mut self, var: NodeId, scope: ScopeId) {
        let Some(id) = self.tree.get(var).symbol else { return };
        let type_node = self.tree.nth_child(var, 0).expect("VARIABLE always has a type child");
        let declared_type = self.resolve_type_node(type_node, scope);

        let (var_kind, array_count_node) = match &self.symbols.get(id).kind {
            SymbolKind::Variable(v) => (v.kind, v.array_count_node),
            _ => return,
        };

        let mut final_type = declared_type.clone();
        if let Some(count_node) = array_count_node {
            let count_type = self.resolve_expr(count_node, scope);
            if !count_type.is_error() && count_type != Type::Base(BaseType::Int) {
                self.error(self.tree.get(count_node).range, "array count must be an int".into());
            }
            let len = self.fold_int_literal(count_node).unwrap_or(0);
            if len <= 0 {
                self.error(self.tree.get(count_node).range, "array count must be a positive constant".into());
            }
            final_type = final_type.array_of(len.max(0) as u32);
        }

        if final_type.is_void() {
            self.error(self.tree.get(var).range, "variables cannot have type 'void'".into());
        }

        let initializer = self.tree.nth_child(var, 1);
        let is_const = self.symbols.get(id).is_const();
        if let Some(init) = initializer {
            let init_type = self.resolve_expr(init, scope);
            if !init_type.is_error() && !final_type.is_error() && init_type != final_type {
                self.error(self.tree.get(init).range, format!("cannot initialize '{:?}' with '{:?}'", final_type, init_type));
            }
            if final_type.contains_array(self.symbols) {
                self.error(self.tree.get(var).range, "cannot initialize an array-containing type".into());
            }
            if is_const {
                if let Some(folded) = self.fold_constant_node(init) {
                    if let SymbolKind::Variable(v) = &mut self.symbols.get_mut(id).kind {
                        v.constant_value = Some(folded);
                    }
                } else {
                    self.error(self.tree.get(init).range, "'const' initializer must be a constant expression".into());
                }
            }
        } else if is_const && var_kind == VariableKind::Local {
            self.error(self.tree.get(var).range, "'const' variable requires an initializer".into());
        }

        self.tree.get_mut(var).resolved_type = Some(final_type.clone());
        if let Some(v) = self.symbols.get_mut(id).as_variable_mut() {
            v.resolved_type = Some(final_type);
        }
        self.track_declared(id);
    }

    fn resolve_type_node(&mut self, node: NodeId, _scope: ScopeId) -> Type {
        let ty = if let Some(sym) = self.tree.get(node).symbol {
            Type::Struct(sym)
        } else if let Some(base) = BaseType::from_keyword(&self.tree.get(node).text) {
            Type::Base(base)
        } else {
            Type::Error
        };
        self.tree.get_mut(node).resolved_type = Some(ty.clone());
        ty
    }

    fn resolve_function(&mut self, node: NodeId) {
        let Some(id) = self.tree.get(node).symbol else { return };
        let fn_scope = self.tree.get(node).scope.unwrap();
        let (return_type_node, body, arguments) = {
            let f = self.symbols.get(id).as_function().unwrap();
            (f.return_type_node, f.body, f.arguments.clone())
        };
        let return_type = self.resolve_type_node(return_type_node, fn_scope);
        for arg in &arguments {
            let arg_type_node = self.symbols.get(*arg).as_variable().unwrap().type_node;
            self.resolve_type_node(arg_type_node, fn_scope);
        }

        if let Some(body) = body {
            self.return_type_stack.push(return_type.clone());
            let live = self.resolve_statement(body, fn_scope);
            self.return_type_stack.pop();
            if live && !return_type.is_void() && !return_type.is_error() {
                self.error(self.tree.get(node).range, "missing return statement".into());
            }
            self.tree.get_mut(body).literal_int = live as i64;
        }
        self.track_declared(id);
    }

    /// Resolves one statement, returning whether control flow can fall
    /// through past it (the "live" state of spec.md §4.3's two-stack
    /// machine, expressed here as plain recursion instead of an explicit
    /// stack pair).
    fn resolve_statement(&mut self, node: NodeId, scope: ScopeId) -> bool {
        match self.tree.kind(node) {
            NodeKind::Block => {
                let inner_scope = self.tree.get(node).scope.unwrap_or(scope);
                let stmts: Vec<NodeId> = self.tree.children(node).collect();
                let mut live = true;
                for stmt in stmts {
                    let stmt_live = self.resolve_statement(stmt, inner_scope);
                    if live {
                        live = stmt_live;
                    }
                }
                live
            }
            NodeKind::If => {
                let children: Vec<NodeId> = self.tree.children(node).collect();
                let cond = children[0];
                self.check_bool(cond, scope);
                let then_live = self.resolve_statement(children[1], scope);
                let else_live = if children.len() > 2 { self.resolve_statement(children[2], scope) } else { true };
                if let Some(b) = self.const_bool(cond) {
                    if b { then_live } else { else_live }
                } else {
                    then_live || else_live
                }
            }
            NodeKind::While => {
                let children: Vec<NodeId> = self.tree.children(node).collect();
                self.check_bool(children[0], scope);
                self.break_seen_stack.push(false);
                self.resolve_statement(children[1], scope);
                let broke = self.break_seen_stack.pop().unwrap();
                !(self.const_bool(children[0]) == Some(true) && !broke)
            }
            NodeKind::DoWhile => {
                let children: Vec<NodeId> = self.tree.children(node).collect();
                self.break_seen_stack.push(false);
                self.resolve_statement(children[0], scope);
                let broke = self.break_seen_stack.pop().unwrap();
                self.check_bool(children[1], scope);
                !(self.const_bool(children[1]) == Some(true) && !broke)
            }
            NodeKind::For => {
                let for_scope = self.tree.get(node).scope.unwrap();
                let children: Vec<NodeId> = self.tree.children(node).collect();
                self.resolve_statement(children[0], for_scope);
                self.check_bool(children[1], for_scope);
                self.resolve_expr(children[2], for_scope);
                self.break_seen_stack.push(false);
                self.resolve_statement(children[3], for_scope);
                let broke = self.break_seen_stack.pop().unwrap();
                !(self.const_bool(children[1]) == Some(true) && !broke)
            }
            NodeKind::Break => {
                if let Some(top) = self.break_seen_stack.last_mut() {
                    *top = true;
                } else {
                    self.error(self.tree.get(node).range, "'break' outside a loop".into());
                }
                false
            }
            NodeKind::Continue => {
                if self.break_seen_stack.is_empty() {
                    self.error(self.tree.get(node).range, "'continue' outside a loop".into());
                }
                false
            }
            NodeKind::Discard => false,
            NodeKind::Return => {
                if let Some(expr) = self.tree.children(node).next() {
                    let t = self.resolve_expr(expr, scope);
                    let expected = self.return_type_stack.last().cloned().unwrap_or(Type::Error);
                    if !t.is_error() && !expected.is_error() && t != expected {
                        self.error(self.tree.get(expr).range, "return type mismatch".into());
                    }
                } else {
                    let expected = self.return_type_stack.last().cloned().unwrap_or(Type::Error);
                    if !expected.is_error() && !expected.is_void() {
                        self.error(self.tree.get(node).range, "missing return value".into());
                    }
                }
                false
            }
            NodeKind::ExpressionStmt => {
                let expr = self.tree.children(node).next().unwrap();
                self.resolve_expr(expr, scope);
                true
            }
            NodeKind::Variables => {
                self.resolve_variable_group(node, scope);
                true
            }
            NodeKind::Struct => {
                self.resolve_struct(node);
                true
            }
            NodeKind::Precision => true,
            _ => true,
        }
    }

    fn check_bool(&mut self, node: NodeId, scope: ScopeId) {
        let t = self.resolve_expr(node, scope);
        if !t.is_error() && t != Type::Base(BaseType::Bool) {
            self.error(self.tree.get(node).range, "condition must be 'bool'".into());
        }
    }

    fn const_bool(&self, node: NodeId) -> Option<bool> {
        if self.tree.kind(node) == NodeKind::Bool {
            Some(self.tree.get(node).literal_int != 0)
        } else {
            None
        }
    }

    fn fold_int_literal(&mut self, node: NodeId) -> Option<i64> {
        let folded = crate::fold::fold(self.tree, self.symbols, node)?;
        (self.tree.kind(folded) == NodeKind::Int).then(|| self.tree.get(folded).literal_int)
    }

    /// Delegates to the shared folder (`crate::fold::fold`) to validate a
    /// `const` initializer and capture its folded value on the symbol.
    fn fold_constant_node(&mut self, node: NodeId) -> Option<NodeId> {
        crate::fold::fold(self.tree, self.symbols, node)
    }

    // ---- expressions ----------------------------------------------------

    fn resolve_expr(&mut self, node: NodeId, scope: ScopeId) -> Type {
        let ty = self.resolve_expr_inner(node, scope);
        self.tree.get_mut(node).resolved_type = Some(ty.clone());
        ty
    }

    fn resolve_expr_inner(&mut self, node: NodeId, scope: ScopeId) -> Type {
        match self.tree.kind(node) {
            NodeKind::Bool => Type::Base(BaseType::Bool),
            NodeKind::Int => Type::Base(BaseType::Int),
            NodeKind::Float => Type::Base(BaseType::Float),
            NodeKind::Name => self.resolve_name(node, scope),
            NodeKind::Sequence => {
                let mut last = Type::Base(BaseType::Void);
                for child in self.tree.children(node).collect::<Vec<_>>() {
                    last = self.resolve_expr(child, scope);
                }
                last
            }
            NodeKind::Hook => self.resolve_hook(node, scope),
            NodeKind::Dot => self.resolve_dot(node, scope),
            NodeKind::Index => self.resolve_index(node, scope),
            NodeKind::Call => self.resolve_call(node, scope),
            k if k.is_unary_prefix() => self.resolve_unary_prefix(k, node, scope),
            k if k.is_unary_assign_prefix() || k.is_unary_assign_postfix() => self.resolve_unary_assign(node, scope),
            k if k.is_binary_assign() => self.resolve_assign(k, node, scope),
            k if k.is_binary() => self.resolve_binary(k, node, scope),
            _ => Type::Error,
        }
    }

    fn resolve_name(&mut self, node: NodeId, scope: ScopeId) -> Type {
        let text = self.tree.get(node).text.clone();
        let Some(id) = self.symbols.lookup(scope, &text) else {
            self.error(self.tree.get(node).range, format!("undeclared identifier '{text}'"));
            return Type::Error;
        };
        self.tree.get_mut(node).symbol = Some(id);
        self.symbols.mark_used(id);
        self.note_required_extension(id);
        let Some(v) = self.symbols.get(id).as_variable() else { return Type::Error };
        let (type_node, array_count_node) = (v.type_node, v.array_count_node);
        let base = self.resolve_type_node(type_node, scope);
        match array_count_node {
            Some(count) => {
                let len = self.fold_int_literal(count).unwrap_or(0).max(0) as u32;
                base.array_of(len)
            }
            None => base,
        }
    }

    fn note_required_extension(&mut self, id: SymbolId) {
        let Some(ext) = self.symbols.get(id).required_extension.clone() else { return };
        if self.data.behavior_of(&ext) == ExtensionBehavior::Disable {
            let range = self.symbols.get(id).range;
            self.error(range, format!("use of '{}' requires extension '{ext}', which is disabled", self.symbols.get(id).name));
            return;
        }
        if self.data.behavior_of(&ext) == ExtensionBehavior::Default {
            self.data.set_behavior(ext.clone(), ExtensionBehavior::Enable);
            self.insert_extension_directive(ext);
        }
    }

    /// Inserts a new `#extension NAME : enable` node right after any
    /// leading `#version`/previously-auto-enabled `#extension` nodes, so
    /// it always lands before the first real declaration.
    fn insert_extension_directive(&mut self, name: String) {
        let root = self.tree.root.unwrap();
        let anchor_range = self.tree.get(root).range;
        let node = self.tree.alloc(NodeKind::Extension, anchor_range);
        self.tree.get_mut(node).text = name;
        self.tree.get_mut(node).literal_int = ExtensionBehavior::Enable as i64;
        let insert_point =
            self.tree.children(root).find(|&c| !matches!(self.tree.kind(c), NodeKind::Version | NodeKind::Extension));
        match insert_point {
            Some(sibling) => self.tree.insert_before(sibling, node),
            None => self.tree.append_child(root, node),
        }
    }

    fn resolve_hook(&mut self, node: NodeId, scope: ScopeId) -> Type {
        let children: Vec<NodeId> = self.tree.children(node).collect();
        self.check_bool(children[0], scope);
        let then_t = self.resolve_expr(children[1], scope);
        let else_t = self.resolve_expr(children[2], scope);
        if then_t.contains_array(self.symbols) || else_t.contains_array(self.symbols) {
            self.error(self.tree.get(node).range, "'?:' branches cannot be arrays".into());
            return Type::Error;
        }
        if then_t.is_error() || else_t.is_error() {
            return Type::Error;
        }
        if then_t != else_t {
            self.error(self.tree.get(node).range, "'?:' branches must share a type".into());
            return Type::Error;
        }
        then_t
    }

    fn swizzle_index(c: char) -> Option<(usize, usize)> {
        for (set_idx, set) in SWIZZLE_SETS.iter().enumerate() {
            if let Some(pos) = set.find(c) {
                return Some((set_idx, pos));
            }
        }
        None
    }

    fn resolve_dot(&mut self, node: NodeId, scope: ScopeId) -> Type {
        let target = self.tree.children(node).next().unwrap();
        let target_type = self.resolve_expr(target, scope);
        let member = self.tree.get(node).text.clone();
        if target_type.is_error() {
            return Type::Error;
        }
        if let Type::Struct(sym) = &target_type {
            let Some(field) = self.symbols.get(*sym).as_struct().and_then(|s| {
                s.fields.iter().find(|&&f| self.symbols.get(f).name == member).copied()
            }) else {
                self.error(self.tree.get(node).range, format!("'{member}' is not a field of this struct"));
                return Type::Error;
            };
            self.symbols.mark_used(field);
            let v = self.symbols.get(field).as_variable().unwrap();
            return self.resolve_type_node(v.type_node, scope);
        }
        let Some(component) = target_type.component_type() else {
            self.error(self.tree.get(node).range, "member access requires a vector or struct".into());
            return Type::Error;
        };
        let count = target_type.component_count().unwrap_or(1);
        if member.is_empty() || member.len() > 4 {
            self.error(self.tree.get(node).range, "invalid swizzle length".into());
            return Type::Error;
        }
        let mut set_idx = None;
        let mut positions = Vec::new();
        for c in member.chars() {
            let Some((s, pos)) = Self::swizzle_index(c) else {
                self.error(self.tree.get(node).range, format!("'{c}' is not a valid swizzle character"));
                return Type::Error;
            };
            if pos as u32 >= count {
                self.error(self.tree.get(node).range, format!("swizzle character '{c}' out of range"));
                return Type::Error;
            }
            match set_idx {
                None => set_idx = Some(s),
                Some(existing) if existing != s => {
                    self.error(self.tree.get(node).range, "swizzle mixes component-name sets".into());
                    return Type::Error;
                }
                _ => {}
            }
            positions.push(pos);
        }
        BaseType::vector_of_size(component, positions.len() as u32).map(Type::Base).unwrap_or(Type::Error)
    }

    fn resolve_index(&mut self, node: NodeId, scope: ScopeId) -> Type {
        let children: Vec<NodeId> = self.tree.children(node).collect();
        let target_type = self.resolve_expr(children[0], scope);
        let index_type = self.resolve_expr(children[1], scope);
        if !index_type.is_error() && index_type != Type::Base(BaseType::Int) {
            self.error(self.tree.get(children[1]).range, "index must be 'int'".into());
        }
        if target_type.is_error() {
            return Type::Error;
        }
        let Some(result) = target_type.index_type() else {
            self.error(self.tree.get(node).range, "type is not indexable".into());
            return Type::Error;
        };
        if let Some(i) = self.fold_int_literal(children[1]) {
            if let Some(count) = target_type.index_count() {
                if i < 0 || i >= count as i64 {
                    self.error(self.tree.get(children[1]).range, format!("index {i} is out of range"));
                }
            }
        }
        result
    }

    fn resolve_call(&mut self, node: NodeId, scope: ScopeId) -> Type {
        let children: Vec<NodeId> = self.tree.children(node).collect();
        let callee = children[0];
        let args = &children[1..];
        let arg_types: Vec<Type> = args.iter().map(|&a| self.resolve_expr(a, scope)).collect();

        if self.tree.kind(callee) != NodeKind::Name {
            self.error(self.tree.get(node).range, "call target must be a name".into());
            return Type::Error;
        }
        let name = self.tree.get(callee).text.clone();

        if let Some(base) = BaseType::from_keyword(&name) {
            return self.resolve_builtin_constructor(node, callee, base, &arg_types);
        }
        if let Some(id) = self.symbols.lookup(scope, &name) {
            if let SymbolKind::Struct(_) = &self.symbols.get(id).kind {
                return self.resolve_struct_constructor(node, callee, id, &arg_types);
            }
        }
        self.resolve_function_call(node, callee, scope, &name, &arg_types)
    }

    fn resolve_builtin_constructor(&mut self, node: NodeId, callee: NodeId, target: BaseType, args: &[Type]) -> Type {
        let target_type = Type::Base(target);
        if target == BaseType::Void {
            self.error(self.tree.get(node).range, "cannot construct 'void'".into());
            return Type::Error;
        }
        if args.iter().any(|a| a.is_error()) {
            return Type::Error;
        }
        self.tree.get_mut(callee).symbol = None;

        if matches!(target, BaseType::Bool | BaseType::Int | BaseType::Float) {
            if args.len() != 1 || args[0].component_count().is_some() {
                self.error(self.tree.get(node).range, format!("'{}' constructor takes exactly one scalar argument", target.keyword()));
                return Type::Error;
            }
            return target_type;
        }

        let is_matrix = matrix_size(&target_type).is_some();
        if is_matrix && args.len() == 1 {
            return target_type; // matrix-from-scalar (diagonal) or matrix-from-matrix.
        }
        if is_matrix && args.len() > 1 && args.iter().any(|a| matrix_size(a).is_some()) {
            self.error(self.tree.get(node).range, "matrix constructor cannot mix a matrix with other arguments".into());
            return Type::Error;
        }

        let needed = target_type.component_count().unwrap_or(1);
        if args.len() == 1 && args[0].component_count().unwrap_or(1) == 1 {
            return target_type; // single-scalar broadcast.
        }

        if let Some(target_component) = target_type.component_type() {
            for a in args {
                let arg_component = a.component_type().or_else(|| a.base());
                if arg_component.is_some_and(|c| c != target_component) {
                    self.error(self.tree.get(node).range, format!("'{}' constructor argument has the wrong component type", target.keyword()));
                    return Type::Error;
                }
            }
        }

        let supplied: u32 = args.iter().map(|a| a.component_count().unwrap_or(1)).sum();
        if supplied < needed {
            self.error(self.tree.get(node).range, format!("'{}' constructor needs {needed} components, got {supplied}", target.keyword()));
            return Type::Error;
        }
        if supplied > needed && args.len() > 1 {
            self.error(self.tree.get(node).range, format!("'{}' constructor has more than one extra component", target.keyword()));
            return Type::Error;
        }
        target_type
    }

    fn resolve_struct_constructor(&mut self, node: NodeId, callee: NodeId, struct_id: SymbolId, args: &[Type]) -> Type {
        self.tree.get_mut(callee).symbol = Some(struct_id);
        self.symbols.mark_used(struct_id);
        let fields = self.symbols.get(struct_id).as_struct().unwrap().fields.clone();
        if args.len() != fields.len() {
            self.error(self.tree.get(node).range, format!("struct constructor expects {} arguments, got {}", fields.len(), args.len()));
            return Type::Error;
        }
        Type::Struct(struct_id)
    }

    fn resolve_function_call(&mut self, node: NodeId, callee: NodeId, scope: ScopeId, name: &str, args: &[Type]) -> Type {
        let mut candidates = self.symbols.overloads(scope, name);
        candidates.retain(|&id| {
            matches!(&self.symbols.get(id).kind, SymbolKind::Function(f) if f.body.is_some() || f.sibling.is_none())
        });
        if candidates.is_empty() {
            self.error(self.tree.get(node).range, format!("no function named '{name}' found"));
            return Type::Error;
        }
        if args.iter().any(|a| a.is_error()) {
            return Type::Error;
        }

        let by_count: Vec<SymbolId> = candidates
            .iter()
            .copied()
            .filter(|&id| self.symbols.get(id).as_function().unwrap().arguments.len() == args.len())
            .collect();
        let mut narrowed = if by_count.is_empty() { candidates.clone() } else { by_count };

        if narrowed.len() > 1 {
            let exact: Vec<SymbolId> = narrowed
                .iter()
                .copied()
                .filter(|&id| self.argument_types_of(id, scope).iter().zip(args).all(|(p, a)| p == a))
                .collect();
            if !exact.is_empty() {
                narrowed = exact;
            }
        }
        if narrowed.len() > 1 {
            let shape: Vec<SymbolId> = narrowed
                .iter()
                .copied()
                .filter(|&id| {
                    self.argument_types_of(id, scope).iter().zip(args).all(|(p, a)| p.component_count() == a.component_count())
                })
                .collect();
            if !shape.is_empty() {
                narrowed = shape;
            }
        }

        if narrowed.len() != 1 {
            self.error(self.tree.get(node).range, format!("ambiguous or unresolved call to '{name}'"));
            return Type::Error;
        }
        let chosen = narrowed[0];
        self.tree.get_mut(callee).symbol = Some(chosen);
        self.symbols.mark_used(chosen);
        self.note_required_extension(chosen);
        let return_node = self.symbols.get(chosen).as_function().unwrap().return_type_node;
        self.resolve_type_node(return_node, scope)
    }

    fn argument_types_of(&mut self, function: SymbolId, scope: ScopeId) -> Vec<Type> {
        let arg_ids = self.symbols.get(function).as_function().unwrap().arguments.clone();
        arg_ids
            .iter()
            .map(|&a| {
                let type_node = self.symbols.get(a).as_variable().unwrap().type_node;
                match self.tree.get(type_node).resolved_type.clone() {
                    Some(t) => t,
                    None => self.resolve_type_node(type_node, scope),
                }
            })
            .collect()
    }

    fn resolve_unary_prefix(&mut self, kind: NodeKind, node: NodeId, scope: ScopeId) -> Type {
        let child = self.tree.children(node).next().unwrap();
        let t = self.resolve_expr(child, scope);
        if t.is_error() {
            return Type::Error;
        }
        match kind {
            NodeKind::Not => {
                if t == Type::Base(BaseType::Bool) {
                    t
                } else {
                    self.error(self.tree.get(node).range, "'!' requires 'bool'".into());
                    Type::Error
                }
            }
            NodeKind::BitwiseNot => {
                if t == Type::Base(BaseType::Int) {
                    t
                } else {
                    self.error(self.tree.get(node).range, "'~' requires 'int'".into());
                    Type::Error
                }
            }
            NodeKind::Negative | NodeKind::Positive => {
                let comp = t.component_type().unwrap_or_else(|| t.base().unwrap_or(BaseType::Void));
                if matches!(comp, BaseType::Int | BaseType::Float) {
                    t
                } else {
                    self.error(self.tree.get(node).range, "unary '-'/'+' requires a numeric type".into());
                    Type::Error
                }
            }
            _ => Type::Error,
        }
    }

    fn resolve_unary_assign(&mut self, node: NodeId, scope: ScopeId) -> Type {
        let child = self.tree.children(node).next().unwrap();
        let t = self.resolve_expr(child, scope);
        self.check_storage_target(child);
        t
    }

    fn resolve_assign(&mut self, kind: NodeKind, node: NodeId, scope: ScopeId) -> Type {
        let children: Vec<NodeId> = self.tree.children(node).collect();
        let lhs = children[0];
        let rhs = children[1];
        let lt = self.resolve_expr(lhs, scope);
        let rt = self.resolve_expr(rhs, scope);
        self.check_storage_target(lhs);
        if lt.is_error() || rt.is_error() {
            return Type::Error;
        }
        if kind == NodeKind::Assign {
            if lt != rt {
                self.error(self.tree.get(node).range, "assignment type mismatch".into());
                return Type::Error;
            }
            return lt;
        }
        self.check_arithmetic(node, &lt, &rt)
    }

    fn check_storage_target(&mut self, mut node: NodeId) {
        loop {
            match self.tree.kind(node) {
                NodeKind::Dot | NodeKind::Index => {
                    node = self.tree.children(node).next().unwrap();
                }
                NodeKind::Name => {
                    if let Some(id) = self.tree.get(node).symbol {
                        let flags = self.symbols.get(id).flags;
                        if flags.contains(SymbolFlags::CONST) || flags.contains(SymbolFlags::UNIFORM) {
                            self.error(self.tree.get(node).range, "cannot assign to a const or uniform variable".into());
                        }
                    }
                    return;
                }
                _ => {
                    self.error(self.tree.get(node).range, "invalid assignment target".into());
                    return;
                }
            }
        }
    }

    fn resolve_binary(&mut self, kind: NodeKind, node: NodeId, scope: ScopeId) -> Type {
        let children: Vec<NodeId> = self.tree.children(node).collect();
        let lt = self.resolve_expr(children[0], scope);
        let rt = self.resolve_expr(children[1], scope);
        if lt.is_error() || rt.is_error() {
            return Type::Error;
        }
        match kind {
            NodeKind::Add | NodeKind::Subtract | NodeKind::Multiply | NodeKind::Divide => {
                self.check_arithmetic(node, &lt, &rt)
            }
            NodeKind::LessThan | NodeKind::LessThanEqual | NodeKind::GreaterThan | NodeKind::GreaterThanEqual => {
                if lt == rt && matches!(lt, Type::Base(BaseType::Int) | Type::Base(BaseType::Float)) {
                    Type::Base(BaseType::Bool)
                } else {
                    self.error(self.tree.get(node).range, "comparison requires matching 'int' or 'float' scalars".into());
                    Type::Error
                }
            }
            NodeKind::Equal | NodeKind::NotEqual => {
                if lt == rt && !lt.contains_array(self.symbols) && !lt.contains_sampler(self.symbols) {
                    Type::Base(BaseType::Bool)
                } else {
                    self.error(self.tree.get(node).range, "'=='/'!=' requires identical, non-array, non-sampler types".into());
                    Type::Error
                }
            }
            NodeKind::LogicalAnd | NodeKind::LogicalOr | NodeKind::LogicalXor => {
                if lt == Type::Base(BaseType::Bool) && rt == Type::Base(BaseType::Bool) {
                    Type::Base(BaseType::Bool)
                } else {
                    self.error(self.tree.get(node).range, "logical operators require 'bool'".into());
                    Type::Error
                }
            }
            NodeKind::BitwiseAnd | NodeKind::BitwiseOr | NodeKind::BitwiseXor | NodeKind::ShiftLeft | NodeKind::ShiftRight => {
                if lt == Type::Base(BaseType::Int) && rt == Type::Base(BaseType::Int) {
                    Type::Base(BaseType::Int)
                } else {
                    self.error(self.tree.get(node).range, "bitwise/shift operators require 'int'".into());
                    Type::Error
                }
            }
            _ => Type::Error,
        }
    }

    /// `+`,`-`,`*`,`/` per spec.md §4.3: `(T,T)` for the same
    /// component-based `T`, or `(vector|matrix, scalar)` of matching
    /// component kind; `*` additionally allows `matN*vecN`/`vecN*matN`.
    fn check_arithmetic(&mut self, node: NodeId, lt: &Type, rt: &Type) -> Type {
        if lt == rt {
            return lt.clone();
        }
        let is_mul = matches!(self.tree.kind(node), NodeKind::Multiply | NodeKind::AssignMultiply);
        if is_mul {
            if let (Some(m), Some(v)) = (matrix_size(lt), vector_size(rt)) {
                if m == v {
                    return rt.clone();
                }
            }
            if let (Some(v), Some(m)) = (vector_size(lt), matrix_size(rt)) {
                if m == v {
                    return lt.clone();
                }
            }
        }
        // vector/matrix op scalar: scalar must be a bare (non-vector,
        // non-matrix) base of the same component kind.
        if let Some(l_comp) = lt.component_type() {
            if rt.component_type().is_none() && rt.base() == Some(l_comp) {
                return lt.clone();
            }
        }
        if let Some(r_comp) = rt.component_type() {
            if lt.component_type().is_none() && lt.base() == Some(r_comp) {
                return rt.clone();
            }
        }
        self.error(self.tree.get(node).range, "operands are not arithmetic-compatible".into());
        Type::Error
    }

    fn error(&mut self, range: Range, text: String) {
        self.log.error(range, text);
    }
}
