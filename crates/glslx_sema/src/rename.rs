use std::collections::{HashMap, HashSet};

use glslx_ast::{SymbolId, SymbolKind, SymbolTable, VariableKind};

/// Names the renamer will never hand out, because the target language
/// reserves them (GLSL ES 1.0 keywords and a few that are merely
/// conventional) or because `gl_`-prefixed identifiers are reserved by the
/// language itself.
const RESERVED: &[&str] = &[
    "attribute", "const", "uniform", "varying", "break", "continue", "do", "for", "while", "if", "else", "in", "out",
    "inout", "float", "int", "void", "bool", "true", "false", "lowp", "mediump", "highp", "precision", "invariant",
    "discard", "return", "mat2", "mat3", "mat4", "vec2", "vec3", "vec4", "ivec2", "ivec3", "ivec4", "bvec2", "bvec3",
    "bvec4", "sampler2D", "samplerCube", "struct", "asm", "class", "union", "enum", "typedef", "template", "this",
    "packed", "goto", "switch", "default", "inline", "noinline", "volatile", "public", "static", "extern", "external",
    "interface", "flat", "long", "short", "double", "half", "fixed", "unsigned", "superp", "input", "output", "hvec2",
    "hvec3", "hvec4", "dvec2", "dvec3", "dvec4", "fvec2", "fvec3", "fvec4", "sampler1D", "sampler3D",
    "sampler1DShadow", "sampler2DShadow", "sampler2DRect", "sampler3DRect", "sampler2DRectShadow", "sizeof", "cast",
    "namespace", "using",
];

/// Every identifier-position character, 53 of them (`a`-`z`, `A`-`Z`, `_`).
/// Digits are deliberately left out of the alphabet entirely, so there is
/// never a "first character can't be a digit" special case to track.
const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ_";

/// Separate rename maps for attributes and uniforms, so host code that
/// binds vertex attributes or sets uniforms by name can follow along after
/// minification (spec.md §4.6).
#[derive(Default, Debug, Clone)]
pub struct RenameResult {
    pub attribute_renames: HashMap<String, String>,
    pub uniform_renames: HashMap<String, String>,
}

struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        UnionFind { parent: (0..n).collect() }
    }

    fn find(&mut self, x: usize) -> usize {
        if self.parent[x] != x {
            let root = self.find(self.parent[x]);
            self.parent[x] = root;
        }
        self.parent[x]
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            self.parent[ra] = rb;
        }
    }
}

fn is_eligible(symbols: &SymbolTable, id: SymbolId) -> bool {
    let sym = symbols.get(id);
    // Struct fields are reached through a `Dot` node that only carries the
    // member name as text, never a symbol link, so there is nothing for the
    // emitter to re-resolve a rename through. Leaving field names alone
    // keeps every `a.field` access in sync with the declaration for free.
    if matches!(&sym.kind, SymbolKind::Variable(v) if v.kind == VariableKind::StructField) {
        return false;
    }
    !sym.is_exported() && !sym.is_imported() && !sym.name.starts_with("gl_")
}

/// Renumbers every eligible symbol in `symbols` to a short, minified name,
/// in descending order of `use_count` so the hottest identifiers get the
/// shortest names.
///
/// This mutates only the [`SymbolTable`]: the emitter resolves identifier
/// text for any node carrying a `symbol` through `Symbol::name`, so there
/// is no tree to patch afterward. Two union-finds group symbols that must
/// end up sharing one assigned name:
/// - `local_uf` zips together the Nth local/argument of every function,
///   each function's locals ordered by descending `use_count` first - their
///   lifetimes never overlap, so the Nth slot of every function can use the
///   same short name, and putting the hottest local in slot 0 everywhere
///   gives it the shortest name (spec.md §4.6's "zipping").
/// - `sibling_uf` merges a forward declaration with its definition, and
///   every overload in a function's overload chain, since those already
///   share one name in the source and must keep sharing it.
pub fn rename(symbols: &mut SymbolTable) -> RenameResult {
    let ids: Vec<SymbolId> = symbols.symbols_iter().map(|s| s.id).filter(|&id| is_eligible(symbols, id)).collect();
    if ids.is_empty() {
        return RenameResult::default();
    }
    let index_of: HashMap<SymbolId, usize> = ids.iter().enumerate().map(|(i, &id)| (id, i)).collect();

    let mut uf = UnionFind::new(ids.len());
    zip_local_slots(symbols, &ids, &index_of, &mut uf);
    merge_overload_chains(symbols, &ids, &index_of, &mut uf);

    let mut groups: HashMap<usize, Vec<usize>> = HashMap::new();
    for i in 0..ids.len() {
        let root = uf.find(i);
        groups.entry(root).or_default().push(i);
    }

    let mut group_use_count: Vec<(usize, u32)> = groups
        .keys()
        .map(|&root| {
            let total = groups[&root].iter().map(|&i| symbols.get(ids[i]).use_count).sum();
            (root, total)
        })
        .collect();
    group_use_count.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    let mut result = RenameResult::default();
    let mut taken: HashSet<String> = HashSet::new();
    let mut next_index = 0usize;
    for (root, _) in group_use_count {
        let name = loop {
            let candidate = base53_name(next_index);
            next_index += 1;
            if !RESERVED.contains(&candidate.as_str()) && !taken.contains(&candidate) {
                break candidate;
            }
        };
        taken.insert(name.clone());
        for &member in &groups[&root] {
            let id = ids[member];
            let original = symbols.get(id).name.clone();
            if symbols.get(id).is_uniform() {
                result.uniform_renames.insert(original.clone(), name.clone());
            }
            if symbols.get(id).flags.contains(glslx_ast::SymbolFlags::ATTRIBUTE) {
                result.attribute_renames.insert(original, name.clone());
            }
            symbols.get_mut(id).name = name.clone();
        }
    }
    result
}

fn zip_local_slots(symbols: &SymbolTable, ids: &[SymbolId], index_of: &HashMap<SymbolId, usize>, uf: &mut UnionFind) {
    let mut functions: HashMap<glslx_ast::ScopeId, Vec<SymbolId>> = HashMap::new();
    for &id in ids {
        let sym = symbols.get(id);
        let is_local = matches!(&sym.kind, SymbolKind::Variable(v) if matches!(v.kind, VariableKind::Local | VariableKind::Argument));
        if is_local {
            functions.entry(sym.scope).or_default().push(id);
        }
    }
    // Within one function, the hottest local claims slot 0 regardless of
    // declaration order, so it zips with other functions' hottest locals
    // and gets the shortest name; `sort_by` is stable, so ties keep
    // declaration order.
    for locals in functions.values_mut() {
        locals.sort_by(|&a, &b| symbols.get(b).use_count.cmp(&symbols.get(a).use_count));
    }

    let mut slots: Vec<Vec<SymbolId>> = Vec::new();
    for locals in functions.into_values() {
        for (slot, id) in locals.into_iter().enumerate() {
            if slots.len() <= slot {
                slots.push(Vec::new());
            }
            slots[slot].push(id);
        }
    }
    for slot in slots {
        let mut first = None;
        for id in slot {
            let Some(&i) = index_of.get(&id) else { continue };
            match first {
                None => first = Some(i),
                Some(j) => uf.union(i, j),
            }
        }
    }
}

fn merge_overload_chains(symbols: &SymbolTable, ids: &[SymbolId], index_of: &HashMap<SymbolId, usize>, uf: &mut UnionFind) {
    for &id in ids {
        let Some(i) = index_of.get(&id).copied() else { continue };
        if let Some(f) = symbols.get(id).as_function() {
            if let Some(prev) = f.previous_overload {
                if let Some(&j) = index_of.get(&prev) {
                    uf.union(i, j);
                }
            }
            if let Some(sibling) = f.sibling {
                if let Some(&j) = index_of.get(&sibling) {
                    uf.union(i, j);
                }
            }
        }
    }
}

fn base53_name(mut index: usize) -> String {
    let base = ALPHABET.len();
    let mut chars = Vec::new();
    loop {
        chars.push(ALPHABET[index % base]);
        index /= base;
        if index == 0 {
            break;
        }
        index -= 1;
    }
    chars.reverse();
    String::from_utf8(chars).unwrap()
}

#[cfg(test)]
mod tests {
    use glslx_base::SourceSet;
    use glslx_parse::{parse, NullFileAccess};

    use crate::resolve;

    use super::*;

    fn compile(text: &str) -> SymbolTable {
        let mut sources = SourceSet::new();
        let id = sources.add("<test>", text);
        let mut access = NullFileAccess;
        let mut result = parse(&mut sources, &[id], &mut access);
        resolve::resolve(&mut result.tree, &mut result.symbols, &mut result.data, &mut result.log);
        result.symbols
    }

    #[test]
    fn base53_names_never_collide_across_a_thousand_indices() {
        let mut seen = HashSet::new();
        for i in 0..1000 {
            assert!(seen.insert(base53_name(i)));
        }
    }

    #[test]
    fn renaming_shrinks_a_long_local_name() {
        let mut symbols = compile("void main() { float aVeryLongLocalVariableName = 1.0; }");
        rename(&mut symbols);
        let renamed: Vec<&str> = symbols.symbols_iter().map(|s| s.name.as_str()).collect();
        assert!(!renamed.contains(&"aVeryLongLocalVariableName"));
    }

    #[test]
    fn uniform_renames_are_reported() {
        let mut symbols = compile("uniform vec3 lightColor; void main() { }");
        let result = rename(&mut symbols);
        assert_eq!(result.uniform_renames.len(), 1);
        assert!(result.uniform_renames.contains_key("lightColor"));
    }

    #[test]
    fn slot_zero_goes_to_the_locals_highest_use_count() {
        let mut symbols = compile("void main() { float rarely = 1.0; float often = 2.0; float x = often + often + often; }");
        rename(&mut symbols);
        let often = symbols.symbols_iter().find(|s| s.use_count >= 3).expect("often should have 3 uses");
        assert_eq!(often.name, "a");
    }

    #[test]
    fn two_functions_share_the_first_local_slots_name() {
        let mut symbols = compile(
            "float f() { float a = 1.0; return a; } float g() { float b = 2.0; return b; } void main() { f(); g(); }",
        );
        rename(&mut symbols);
        let names: Vec<String> = symbols
            .symbols_iter()
            .filter(|s| matches!(s.kind, SymbolKind::Variable(_)) && (s.name != "a" && s.name != "b"))
            .map(|s| s.name.clone())
            .collect();
        // both locals collapsed onto the same slot name
        assert_eq!(names.len(), 2);
        assert_eq!(names[0], names[1]);
    }
}
