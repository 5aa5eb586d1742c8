use glslx_ast::{BaseType, NodeId, NodeKind, SymbolTable, Tree};
use glslx_base::Range;

const SWIZZLE_SETS: [&str; 3] = ["xyzw", "rgba", "stpq"];

#[derive(Clone)]
enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    /// A constructed/swizzled/indexed vector; every element shares the
    /// vector's declared component type (spec.md §4.4).
    Vector(Vec<Value>),
    /// Flattened column-major, with the matrix's dimension alongside it
    /// since nothing else in a bare `Vec<f64>` carries that shape.
    Matrix(Vec<f64>, u32),
}

fn is_scalar(v: &Value) -> bool {
    matches!(v, Value::Bool(_) | Value::Int(_) | Value::Float(_))
}

fn as_f64(v: &Value) -> Option<f64> {
    match v {
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Int(i) => Some(*i as f64),
        Value::Float(f) => Some(*f),
        _ => None,
    }
}

fn cast_component(v: &Value, target: BaseType) -> Option<Value> {
    match target {
        BaseType::Bool => Some(Value::Bool(match v {
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            _ => return None,
        })),
        BaseType::Int => Some(Value::Int(match v {
            Value::Bool(b) => *b as i64,
            Value::Int(i) => *i,
            Value::Float(f) => *f as i64,
            _ => return None,
        })),
        BaseType::Float => Some(Value::Float(match v {
            Value::Bool(b) => if *b { 1.0 } else { 0.0 },
            Value::Int(i) => *i as f64,
            Value::Float(f) => *f,
            _ => return None,
        })),
        _ => None,
    }
}

fn vector_dim(base: BaseType) -> Option<(u32, BaseType)> {
    use BaseType::*;
    Some(match base {
        Vec2 => (2, Float),
        Vec3 => (3, Float),
        Vec4 => (4, Float),
        Bvec2 => (2, Bool),
        Bvec3 => (3, Bool),
        Bvec4 => (4, Bool),
        Ivec2 => (2, Int),
        Ivec3 => (3, Int),
        Ivec4 => (4, Int),
        _ => return None,
    })
}

fn matrix_dim(base: BaseType) -> Option<u32> {
    use BaseType::*;
    match base {
        Mat2 => Some(2),
        Mat3 => Some(3),
        Mat4 => Some(4),
        _ => None,
    }
}

/// Computes the constant value of `node`, without touching `tree`.
/// Literals, `const` names, sequences (value of the last element),
/// `?:` with a constant condition, unary/binary operators over constant
/// operands, swizzles, indexing, and vector/matrix constructor calls all
/// fold; anything reading non-constant state does not (spec.md §4.4).
fn fold_value(tree: &Tree, symbols: &SymbolTable, node: NodeId) -> Option<Value> {
    match tree.kind(node) {
        NodeKind::Bool => Some(Value::Bool(tree.get(node).literal_int != 0)),
        NodeKind::Int => Some(Value::Int(tree.get(node).literal_int)),
        NodeKind::Float => Some(Value::Float(tree.get(node).literal_float)),
        NodeKind::Name => {
            let id = tree.get(node).symbol?;
            let v = symbols.get(id).as_variable()?;
            fold_value(tree, symbols, v.constant_value?)
        }
        NodeKind::Sequence => fold_value(tree, symbols, tree.children(node).last()?),
        NodeKind::Hook => {
            let children: Vec<NodeId> = tree.children(node).collect();
            match fold_value(tree, symbols, children[0])? {
                Value::Bool(b) => fold_value(tree, symbols, children[if b { 1 } else { 2 }]),
                _ => None,
            }
        }
        NodeKind::Dot => fold_dot(tree, symbols, node),
        NodeKind::Index => fold_index(tree, symbols, node),
        NodeKind::Call => fold_call(tree, symbols, node),
        NodeKind::Not => match fold_value(tree, symbols, tree.children(node).next()?)? {
            Value::Bool(b) => Some(Value::Bool(!b)),
            _ => None,
        },
        NodeKind::BitwiseNot => match fold_value(tree, symbols, tree.children(node).next()?)? {
            Value::Int(i) => Some(Value::Int(!i)),
            _ => None,
        },
        NodeKind::Negative => fold_negate(fold_value(tree, symbols, tree.children(node).next()?)?),
        NodeKind::Positive => fold_value(tree, symbols, tree.children(node).next()?),
        k if k.is_binary() => {
            let children: Vec<NodeId> = tree.children(node).collect();
            let l = fold_value(tree, symbols, children[0])?;
            let r = fold_value(tree, symbols, children[1])?;
            fold_binary(k, l, r)
        }
        _ => None,
    }
}

fn fold_negate(v: Value) -> Option<Value> {
    match v {
        Value::Int(i) => Some(Value::Int(-i)),
        Value::Float(f) => Some(Value::Float(-f)),
        Value::Vector(vals) => Some(Value::Vector(vals.into_iter().map(fold_negate).collect::<Option<_>>()?)),
        Value::Matrix(vals, n) => Some(Value::Matrix(vals.into_iter().map(|f| -f).collect(), n)),
        Value::Bool(_) => None,
    }
}

/// A `.`-access on a constant vector: single-letter swizzles fold to the
/// scalar component, multi-letter swizzles to a smaller constant vector
/// (spec.md §4.4). Struct field access on a constant struct never folds -
/// struct values have no constant representation here.
fn fold_dot(tree: &Tree, symbols: &SymbolTable, node: NodeId) -> Option<Value> {
    let child = tree.children(node).next()?;
    let Value::Vector(vals) = fold_value(tree, symbols, child)? else { return None };
    let text = &tree.get(node).text;
    let mut selected = Vec::with_capacity(text.len());
    for ch in text.chars() {
        let idx = SWIZZLE_SETS.iter().find_map(|set| set.find(ch))?;
        selected.push(vals.get(idx)?.clone());
    }
    if selected.len() == 1 {
        selected.into_iter().next()
    } else {
        Some(Value::Vector(selected))
    }
}

/// `v[i]` on a constant vector yields its `i`th component; on a constant
/// matrix it yields the `i`th column as a vector (spec.md §4.4).
fn fold_index(tree: &Tree, symbols: &SymbolTable, node: NodeId) -> Option<Value> {
    let children: Vec<NodeId> = tree.children(node).collect();
    let base = fold_value(tree, symbols, children[0])?;
    let Value::Int(i) = fold_value(tree, symbols, children[1])? else { return None };
    if i < 0 {
        return None;
    }
    let i = i as usize;
    match base {
        Value::Vector(vals) => vals.into_iter().nth(i),
        Value::Matrix(vals, n) => {
            let n = n as usize;
            if i >= n {
                return None;
            }
            Some(Value::Vector(vals[i * n..(i + 1) * n].iter().copied().map(Value::Float).collect()))
        }
        _ => None,
    }
}

fn fold_call(tree: &Tree, symbols: &SymbolTable, node: NodeId) -> Option<Value> {
    let children: Vec<NodeId> = tree.children(node).collect();
    let callee = *children.first()?;
    if tree.kind(callee) != NodeKind::Name {
        return None;
    }
    let base = BaseType::from_keyword(&tree.get(callee).text)?;
    fold_constructor(tree, symbols, base, &children[1..])
}

fn flatten_components(tree: &Tree, symbols: &SymbolTable, nodes: &[NodeId]) -> Option<Vec<Value>> {
    let mut out = Vec::new();
    for &n in nodes {
        match fold_value(tree, symbols, n)? {
            Value::Vector(vals) => out.extend(vals),
            Value::Matrix(vals, _) => out.extend(vals.into_iter().map(Value::Float)),
            scalar => out.push(scalar),
        }
    }
    Some(out)
}

fn fold_constructor(tree: &Tree, symbols: &SymbolTable, base: BaseType, args: &[NodeId]) -> Option<Value> {
    if matches!(base, BaseType::Bool | BaseType::Int | BaseType::Float) {
        if args.len() != 1 {
            return None;
        }
        return cast_component(&fold_value(tree, symbols, args[0])?, base);
    }
    if let Some(n) = matrix_dim(base) {
        return fold_matrix_constructor(tree, symbols, n, args);
    }
    let (n, comp) = vector_dim(base)?;
    fold_vector_constructor(tree, symbols, n, comp, args)
}

fn fold_vector_constructor(tree: &Tree, symbols: &SymbolTable, n: u32, comp: BaseType, args: &[NodeId]) -> Option<Value> {
    if args.len() == 1 {
        return match fold_value(tree, symbols, args[0])? {
            Value::Vector(vals) => {
                let mut out = Vec::with_capacity(n as usize);
                for i in 0..n as usize {
                    out.push(cast_component(vals.get(i)?, comp)?);
                }
                Some(Value::Vector(out))
            }
            scalar => {
                let casted = cast_component(&scalar, comp)?;
                Some(Value::Vector(vec![casted; n as usize]))
            }
        };
    }
    let flat = flatten_components(tree, symbols, args)?;
    if flat.len() < n as usize {
        return None;
    }
    let mut out = Vec::with_capacity(n as usize);
    for v in flat.iter().take(n as usize) {
        out.push(cast_component(v, comp)?);
    }
    Some(Value::Vector(out))
}

fn fold_matrix_constructor(tree: &Tree, symbols: &SymbolTable, n: u32, args: &[NodeId]) -> Option<Value> {
    if args.len() == 1 {
        return match fold_value(tree, symbols, args[0])? {
            Value::Matrix(vals, m) => Some(fold_matrix_from_matrix(&vals, m, n)),
            scalar => Some(fold_matrix_from_one(as_f64(&scalar)?, n)),
        };
    }
    let flat = flatten_components(tree, symbols, args)?;
    let needed = (n * n) as usize;
    if flat.len() < needed {
        return None;
    }
    let mut out = Vec::with_capacity(needed);
    for v in flat.iter().take(needed) {
        out.push(as_f64(v)?);
    }
    Some(Value::Matrix(out, n))
}

fn fold_matrix_from_one(f: f64, n: u32) -> Value {
    let mut out = vec![0.0; (n * n) as usize];
    for i in 0..n {
        out[(i * n + i) as usize] = f;
    }
    Value::Matrix(out, n)
}

fn fold_matrix_from_matrix(vals: &[f64], m: u32, n: u32) -> Value {
    let mut out = vec![0.0; (n * n) as usize];
    for i in 0..n {
        out[(i * n + i) as usize] = 1.0;
    }
    let copy = m.min(n);
    for col in 0..copy {
        for row in 0..copy {
            out[(col * n + row) as usize] = vals[(col * m + row) as usize];
        }
    }
    Value::Matrix(out, n)
}

fn fold_binary(kind: NodeKind, l: Value, r: Value) -> Option<Value> {
    use Value::*;
    match (l, r) {
        (Int(a), Int(b)) => fold_int(kind, a, b),
        (Float(a), Float(b)) => fold_float(kind, a, b),
        (Int(a), Float(b)) => fold_float(kind, a as f64, b),
        (Float(a), Int(b)) => fold_float(kind, a, b as f64),
        (Bool(a), Bool(b)) => match kind {
            NodeKind::LogicalAnd => Some(Bool(a && b)),
            NodeKind::LogicalOr => Some(Bool(a || b)),
            NodeKind::LogicalXor => Some(Bool(a ^ b)),
            NodeKind::Equal => Some(Bool(a == b)),
            NodeKind::NotEqual => Some(Bool(a != b)),
            _ => None,
        },
        (Vector(a), Vector(b)) => fold_vector_vector(kind, a, b),
        (Vector(a), b) if is_scalar(&b) => fold_vector_scalar(kind, a, b, false),
        (a, Vector(b)) if is_scalar(&a) => fold_vector_scalar(kind, b, a, true),
        (Matrix(a, n), Matrix(b, m)) if n == m => fold_matrix_matrix(kind, &a, &b, n),
        (Matrix(a, n), Vector(b)) if b.len() as u32 == n => fold_matrix_vector(&a, &b, n),
        (Vector(a), Matrix(b, n)) if a.len() as u32 == n => fold_vector_matrix(&a, &b, n),
        (Matrix(a, n), b) if is_scalar(&b) => fold_matrix_scalar(kind, a, &b, n, false),
        (a, Matrix(b, n)) if is_scalar(&a) => fold_matrix_scalar(kind, b, &a, n, true),
        _ => None,
    }
}

fn fold_vector_vector(kind: NodeKind, a: Vec<Value>, b: Vec<Value>) -> Option<Value> {
    if a.len() != b.len() {
        return None;
    }
    if matches!(kind, NodeKind::Equal | NodeKind::NotEqual) {
        let mut all_eq = true;
        for (x, y) in a.into_iter().zip(b.into_iter()) {
            match fold_binary(NodeKind::Equal, x, y)? {
                Value::Bool(true) => {}
                Value::Bool(false) => all_eq = false,
                _ => return None,
            }
        }
        return Some(Value::Bool(if kind == NodeKind::Equal { all_eq } else { !all_eq }));
    }
    let mut out = Vec::with_capacity(a.len());
    for (x, y) in a.into_iter().zip(b.into_iter()) {
        out.push(fold_binary(kind, x, y)?);
    }
    Some(Value::Vector(out))
}

fn fold_vector_scalar(kind: NodeKind, vec: Vec<Value>, scalar: Value, scalar_is_left: bool) -> Option<Value> {
    let mut out = Vec::with_capacity(vec.len());
    for v in vec {
        out.push(if scalar_is_left { fold_binary(kind, scalar.clone(), v)? } else { fold_binary(kind, v, scalar.clone())? });
    }
    Some(Value::Vector(out))
}

fn fold_matrix_matrix(kind: NodeKind, a: &[f64], b: &[f64], n: u32) -> Option<Value> {
    match kind {
        NodeKind::Add => Some(Value::Matrix(a.iter().zip(b.iter()).map(|(x, y)| x + y).collect(), n)),
        NodeKind::Subtract => Some(Value::Matrix(a.iter().zip(b.iter()).map(|(x, y)| x - y).collect(), n)),
        NodeKind::Multiply => Some(Value::Matrix(matrix_multiply(a, b, n), n)),
        NodeKind::Equal => Some(Value::Bool(a == b)),
        NodeKind::NotEqual => Some(Value::Bool(a != b)),
        _ => None,
    }
}

fn matrix_multiply(a: &[f64], b: &[f64], n: u32) -> Vec<f64> {
    let n = n as usize;
    let mut out = vec![0.0; n * n];
    for col in 0..n {
        for row in 0..n {
            let mut sum = 0.0;
            for k in 0..n {
                sum += a[k * n + row] * b[col * n + k];
            }
            out[col * n + row] = sum;
        }
    }
    out
}

fn fold_matrix_vector(a: &[f64], v: &[Value], n: u32) -> Option<Value> {
    let n = n as usize;
    let vf: Vec<f64> = v.iter().map(as_f64).collect::<Option<_>>()?;
    let mut out = vec![0.0; n];
    for (row, slot) in out.iter_mut().enumerate() {
        *slot = (0..n).map(|k| a[k * n + row] * vf[k]).sum();
    }
    Some(Value::Vector(out.into_iter().map(Value::Float).collect()))
}

fn fold_vector_matrix(v: &[Value], b: &[f64], n: u32) -> Option<Value> {
    let n = n as usize;
    let vf: Vec<f64> = v.iter().map(as_f64).collect::<Option<_>>()?;
    let mut out = vec![0.0; n];
    for (col, slot) in out.iter_mut().enumerate() {
        *slot = (0..n).map(|k| vf[k] * b[col * n + k]).sum();
    }
    Some(Value::Vector(out.into_iter().map(Value::Float).collect()))
}

fn fold_matrix_scalar(kind: NodeKind, mat: Vec<f64>, scalar: &Value, n: u32, scalar_is_left: bool) -> Option<Value> {
    let s = as_f64(scalar)?;
    if !matches!(kind, NodeKind::Add | NodeKind::Subtract | NodeKind::Multiply | NodeKind::Divide) {
        return None;
    }
    let vals = mat
        .into_iter()
        .map(|x| {
            if kind == NodeKind::Add {
                x + s
            } else if kind == NodeKind::Subtract {
                if scalar_is_left { s - x } else { x - s }
            } else if kind == NodeKind::Multiply {
                x * s
            } else if scalar_is_left {
                if x == 0.0 { 0.0 } else { s / x }
            } else if s == 0.0 {
                0.0
            } else {
                x / s
            }
        })
        .collect();
    Some(Value::Matrix(vals, n))
}

fn fold_int(kind: NodeKind, a: i64, b: i64) -> Option<Value> {
    use Value::*;
    Some(match kind {
        NodeKind::Add => Int(a.wrapping_add(b)),
        NodeKind::Subtract => Int(a.wrapping_sub(b)),
        NodeKind::Multiply => Int(a.wrapping_mul(b)),
        // Constant division by zero folds to zero rather than carrying
        // undefined behavior into the emitted program.
        NodeKind::Divide => Int(if b == 0 { 0 } else { a.wrapping_div(b) }),
        NodeKind::LessThan => Bool(a < b),
        NodeKind::LessThanEqual => Bool(a <= b),
        NodeKind::GreaterThan => Bool(a > b),
        NodeKind::GreaterThanEqual => Bool(a >= b),
        NodeKind::Equal => Bool(a == b),
        NodeKind::NotEqual => Bool(a != b),
        NodeKind::BitwiseAnd => Int(a & b),
        NodeKind::BitwiseOr => Int(a | b),
        NodeKind::BitwiseXor => Int(a ^ b),
        NodeKind::ShiftLeft => Int(a.wrapping_shl(b as u32 & 31)),
        NodeKind::ShiftRight => Int(a.wrapping_shr(b as u32 & 31)),
        _ => return None,
    })
}

fn fold_float(kind: NodeKind, a: f64, b: f64) -> Option<Value> {
    use Value::*;
    Some(match kind {
        NodeKind::Add => Float(a + b),
        NodeKind::Subtract => Float(a - b),
        NodeKind::Multiply => Float(a * b),
        NodeKind::Divide => Float(if b == 0.0 { 0.0 } else { a / b }),
        NodeKind::LessThan => Bool(a < b),
        NodeKind::LessThanEqual => Bool(a <= b),
        NodeKind::GreaterThan => Bool(a > b),
        NodeKind::GreaterThanEqual => Bool(a >= b),
        NodeKind::Equal => Bool(a == b),
        NodeKind::NotEqual => Bool(a != b),
        _ => return None,
    })
}

fn materialize(tree: &mut Tree, range: Range, value: Value) -> Option<NodeId> {
    Some(match value {
        Value::Bool(b) => {
            let node = tree.alloc(NodeKind::Bool, range);
            tree.get_mut(node).literal_int = b as i64;
            node
        }
        Value::Int(i) => {
            let node = tree.alloc(NodeKind::Int, range);
            tree.get_mut(node).literal_int = i;
            node
        }
        Value::Float(f) => {
            let node = tree.alloc(NodeKind::Float, range);
            tree.get_mut(node).literal_float = f;
            node
        }
        // No vector/matrix literal syntax exists in GLSL; these only
        // ever live as intermediate values consumed by a parent fold.
        Value::Vector(_) | Value::Matrix(..) => return None,
    })
}

/// Folds `node` into a brand new, detached literal node with the same
/// value, or `None` if `node` is not a compile-time constant scalar.
/// Does not mutate or detach `node` itself; callers splice the result in
/// (the rewriter uses `tree.become_node`). A constant vector or matrix
/// result (e.g. `vec4(1.0)` as a whole) never materializes - only scalar
/// sub-expressions inside it do - since there is no vector/matrix literal
/// syntax to splice in.
pub fn fold(tree: &mut Tree, symbols: &SymbolTable, node: NodeId) -> Option<NodeId> {
    let value = fold_value(tree, symbols, node)?;
    let range = tree.get(node).range;
    materialize(tree, range, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glslx_base::SourceSet;

    fn fixture() -> (Tree, SymbolTable, glslx_base::SourceId) {
        let mut sources = SourceSet::new();
        let id = sources.add("<test>", "");
        (Tree::new(), SymbolTable::new(), id)
    }

    #[test]
    fn folds_constant_arithmetic() {
        let (mut tree, symbols, source) = fixture();
        let r = Range::empty(source, 0);
        let a = tree.alloc(NodeKind::Int, r);
        tree.get_mut(a).literal_int = 2;
        let b = tree.alloc(NodeKind::Int, r);
        tree.get_mut(b).literal_int = 3;
        let add = tree.alloc(NodeKind::Add, r);
        tree.append_child(add, a);
        tree.append_child(add, b);

        let folded = fold(&mut tree, &symbols, add).expect("should fold");
        assert_eq!(tree.kind(folded), NodeKind::Int);
        assert_eq!(tree.get(folded).literal_int, 5);
    }

    #[test]
    fn division_by_zero_folds_to_zero() {
        let (mut tree, symbols, source) = fixture();
        let r = Range::empty(source, 0);
        let a = tree.alloc(NodeKind::Int, r);
        tree.get_mut(a).literal_int = 7;
        let zero = tree.alloc(NodeKind::Int, r);
        let div = tree.alloc(NodeKind::Divide, r);
        tree.append_child(div, a);
        tree.append_child(div, zero);

        let folded = fold(&mut tree, &symbols, div).expect("should fold");
        assert_eq!(tree.get(folded).literal_int, 0);
    }

    #[test]
    fn ternary_with_constant_condition_picks_a_branch() {
        let (mut tree, symbols, source) = fixture();
        let r = Range::empty(source, 0);
        let cond = tree.alloc(NodeKind::Bool, r);
        tree.get_mut(cond).literal_int = 1;
        let then_branch = tree.alloc(NodeKind::Int, r);
        tree.get_mut(then_branch).literal_int = 10;
        let else_branch = tree.alloc(NodeKind::Int, r);
        tree.get_mut(else_branch).literal_int = 20;
        let hook = tree.alloc(NodeKind::Hook, r);
        tree.append_child(hook, cond);
        tree.append_child(hook, then_branch);
        tree.append_child(hook, else_branch);

        let folded = fold(&mut tree, &symbols, hook).expect("should fold");
        assert_eq!(tree.get(folded).literal_int, 10);
    }

    #[test]
    fn non_constant_expression_does_not_fold() {
        let (mut tree, symbols, source) = fixture();
        let r = Range::empty(source, 0);
        let name = tree.alloc(NodeKind::Name, r);
        assert!(fold(&mut tree, &symbols, name).is_none());
    }

    #[test]
    fn constructor_call_with_a_single_scalar_argument_does_not_materialize() {
        // `float(2)` is a scalar, but the constructor call wrapping it,
        // e.g. `vec4(float(2))`, stays a `Call` node - no vector literal
        // syntax exists to splice a folded `vec4` into.
        let (mut tree, symbols, source) = fixture();
        let r = Range::empty(source, 0);
        let callee = tree.alloc(NodeKind::Name, r);
        tree.get_mut(callee).text = "vec4".to_string();
        let arg = tree.alloc(NodeKind::Float, r);
        tree.get_mut(arg).literal_float = 1.0;
        let call = tree.alloc(NodeKind::Call, r);
        tree.append_child(call, callee);
        tree.append_child(call, arg);

        assert!(fold(&mut tree, &symbols, call).is_none());
    }

    #[test]
    fn scalar_constructor_call_folds_to_a_literal() {
        let (mut tree, symbols, source) = fixture();
        let r = Range::empty(source, 0);
        let callee = tree.alloc(NodeKind::Name, r);
        tree.get_mut(callee).text = "float".to_string();
        let arg = tree.alloc(NodeKind::Int, r);
        tree.get_mut(arg).literal_int = 2;
        let call = tree.alloc(NodeKind::Call, r);
        tree.append_child(call, callee);
        tree.append_child(call, arg);

        let folded = fold(&mut tree, &symbols, call).expect("should fold");
        assert_eq!(tree.kind(folded), NodeKind::Float);
        assert_eq!(tree.get(folded).literal_float, 2.0);
    }

    #[test]
    fn swizzle_of_a_constant_vector_constructor_folds_to_a_scalar() {
        // `vec3(1.0, 2.0, 3.0).y` folds to the scalar `2.0`, even though
        // the `vec3(...)` it reads from never materializes itself.
        let (mut tree, symbols, source) = fixture();
        let r = Range::empty(source, 0);
        let callee = tree.alloc(NodeKind::Name, r);
        tree.get_mut(callee).text = "vec3".to_string();
        let call = tree.alloc(NodeKind::Call, r);
        tree.append_child(call, callee);
        for v in [1.0, 2.0, 3.0] {
            let lit = tree.alloc(NodeKind::Float, r);
            tree.get_mut(lit).literal_float = v;
            tree.append_child(call, lit);
        }
        let dot = tree.alloc(NodeKind::Dot, r);
        tree.get_mut(dot).text = "y".to_string();
        tree.append_child(dot, call);

        let folded = fold(&mut tree, &symbols, dot).expect("should fold");
        assert_eq!(tree.kind(folded), NodeKind::Float);
        assert_eq!(tree.get(folded).literal_float, 2.0);
    }
}
