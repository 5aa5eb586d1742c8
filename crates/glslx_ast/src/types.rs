use crate::ids::SymbolId;
use crate::symbol::SymbolTable;

/// The closed set of GLSL ES 1.0 built-in scalar, vector, matrix, and
/// sampler tags (spec.md §3, "Type").
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum BaseType {
    Void,
    Bool,
    Int,
    Float,
    Vec2,
    Vec3,
    Vec4,
    Bvec2,
    Bvec3,
    Bvec4,
    Ivec2,
    Ivec3,
    Ivec4,
    Mat2,
    Mat3,
    Mat4,
    Sampler2D,
    SamplerCube,
}

impl BaseType {
    pub fn keyword(self) -> &'static str {
        use BaseType::*;
        match self {
            Void => "void",
            Bool => "bool",
            Int => "int",
            Float => "float",
            Vec2 => "vec2",
            Vec3 => "vec3",
            Vec4 => "vec4",
            Bvec2 => "bvec2",
            Bvec3 => "bvec3",
            Bvec4 => "bvec4",
            Ivec2 => "ivec2",
            Ivec3 => "ivec3",
            Ivec4 => "ivec4",
            Mat2 => "mat2",
            Mat3 => "mat3",
            Mat4 => "mat4",
            Sampler2D => "sampler2D",
            SamplerCube => "samplerCube",
        }
    }

    pub fn from_keyword(s: &str) -> Option<BaseType> {
        use BaseType::*;
        Some(match s {
            "void" => Void,
            "bool" => Bool,
            "int" => Int,
            "float" => Float,
            "vec2" => Vec2,
            "vec3" => Vec3,
            "vec4" => Vec4,
            "bvec2" => Bvec2,
            "bvec3" => Bvec3,
            "bvec4" => Bvec4,
            "ivec2" => Ivec2,
            "ivec3" => Ivec3,
            "ivec4" => Ivec4,
            "mat2" => Mat2,
            "mat3" => Mat3,
            "mat4" => Mat4,
            "sampler2D" => Sampler2D,
            "samplerCube" => SamplerCube,
            _ => return None,
        })
    }

    fn vector_of(self) -> Option<(BaseType, u32)> {
        use BaseType::*;
        Some(match self {
            Vec2 => (Float, 2),
            Vec3 => (Float, 3),
            Vec4 => (Float, 4),
            Bvec2 => (Bool, 2),
            Bvec3 => (Bool, 3),
            Bvec4 => (Bool, 4),
            Ivec2 => (Int, 2),
            Ivec3 => (Int, 3),
            Ivec4 => (Int, 4),
            _ => return None,
        })
    }

    fn matrix_of(self) -> Option<u32> {
        use BaseType::*;
        match self {
            Mat2 => Some(2),
            Mat3 => Some(3),
            Mat4 => Some(4),
            _ => None,
        }
    }

    pub fn is_sampler(self) -> bool {
        matches!(self, BaseType::Sampler2D | BaseType::SamplerCube)
    }

    /// Vector type with the same component count, for swizzle results
    /// (e.g. `mat3[i]` on a matrix's column index yields `vec3`).
    pub fn vector_of_size(component: BaseType, size: u32) -> Option<BaseType> {
        use BaseType::*;
        Some(match (component, size) {
            (Float, 2) => Vec2,
            (Float, 3) => Vec3,
            (Float, 4) => Vec4,
            (Bool, 2) => Bvec2,
            (Bool, 3) => Bvec3,
            (Bool, 4) => Bvec4,
            (Int, 2) => Ivec2,
            (Int, 3) => Ivec3,
            (Int, 4) => Ivec4,
            (Float, 1) => Float,
            (Bool, 1) => Bool,
            (Int, 1) => Int,
            _ => return None,
        })
    }
}

/// A resolved type: a built-in tag, a user struct (wrapped once per
/// symbol), or an array of some element type. Arrays of length `0` are
/// unsized/unknown (spec.md §3).
///
/// Unlike the reference implementation this system was distilled from,
/// `Type` is plain structural data (`Clone + PartialEq + Hash`) rather
/// than a once-per-shape memoized reference: without a tracing GC there is
/// no pointer-identity hot path to preserve (DESIGN NOTES §9's "hot
/// comparison paths use pointer equality" is about *identifiers*, handled
/// by `SymbolId`, not about `Type` itself), so structural equality is the
/// idiomatic and sufficient substitute. See DESIGN.md.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Type {
    Base(BaseType),
    Struct(SymbolId),
    Array(Box<Type>, u32),
    /// The bottom type: propagates silently through expressions and
    /// suppresses cascading diagnostics (spec.md §4.3).
    Error,
}

impl Type {
    pub fn array_of(self, length: u32) -> Type {
        Type::Array(Box::new(self), length)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Type::Error)
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Type::Base(BaseType::Void))
    }

    pub fn is_sampler_base(&self) -> bool {
        matches!(self, Type::Base(b) if b.is_sampler())
    }

    pub fn base(&self) -> Option<BaseType> {
        match self {
            Type::Base(b) => Some(*b),
            _ => None,
        }
    }

    /// The scalar type underlying a vector or matrix; `None` for scalars,
    /// structs, arrays, and samplers.
    pub fn component_type(&self) -> Option<BaseType> {
        match self {
            Type::Base(b) => {
                if let Some((comp, _)) = b.vector_of() {
                    Some(comp)
                } else if b.matrix_of().is_some() {
                    Some(BaseType::Float)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Number of scalar components; `mat3` is `9`, `vec3` is `3`.
    pub fn component_count(&self) -> Option<u32> {
        match self {
            Type::Base(b) => {
                if let Some((_, n)) = b.vector_of() {
                    Some(n)
                } else if let Some(n) = b.matrix_of() {
                    Some(n * n)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// The type produced by `a[i]`.
    pub fn index_type(&self) -> Option<Type> {
        match self {
            Type::Base(b) => {
                if let Some((comp, _)) = b.vector_of() {
                    Some(Type::Base(comp))
                } else if let Some(n) = b.matrix_of() {
                    BaseType::vector_of_size(BaseType::Float, n).map(Type::Base)
                } else {
                    None
                }
            }
            Type::Array(elem, _) => Some((**elem).clone()),
            _ => None,
        }
    }

    /// Number of valid indices into this type: `mat3`'s index count is
    /// `3` (its column count), not `9`.
    pub fn index_count(&self) -> Option<u32> {
        match self {
            Type::Base(b) => {
                if let Some((_, n)) = b.vector_of() {
                    Some(n)
                } else {
                    b.matrix_of()
                }
            }
            Type::Array(_, len) if *len > 0 => Some(*len),
            _ => None,
        }
    }

    pub fn contains_array(&self, symbols: &SymbolTable) -> bool {
        match self {
            Type::Array(..) => true,
            Type::Struct(id) => symbols
                .get(*id)
                .as_struct()
                .is_some_and(|s| s.fields.iter().any(|&f| field_type(symbols, f).is_some_and(|t| t.contains_array(symbols)))),
            _ => false,
        }
    }

    pub fn contains_sampler(&self, symbols: &SymbolTable) -> bool {
        match self {
            Type::Base(b) => b.is_sampler(),
            Type::Array(elem, _) => elem.contains_sampler(symbols),
            Type::Struct(id) => symbols
                .get(*id)
                .as_struct()
                .is_some_and(|s| s.fields.iter().any(|&f| field_type(symbols, f).is_some_and(|t| t.contains_sampler(symbols)))),
            Type::Error => false,
        }
    }
}

/// A struct field's fully resolved type, if the field's declaration has
/// already been resolved (it always has, by the time a `Type::Struct`
/// referencing it is visible to a caller).
fn field_type(symbols: &SymbolTable, field: SymbolId) -> Option<Type> {
    symbols.get(field).as_variable().and_then(|v| v.resolved_type.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec3_components_match_spec_example() {
        let t = Type::Base(BaseType::Vec3);
        assert_eq!(t.component_count(), Some(3));
        assert_eq!(t.index_count(), Some(3));
        assert_eq!(t.component_type(), Some(BaseType::Float));
        assert_eq!(t.index_type(), Some(Type::Base(BaseType::Float)));
    }

    #[test]
    fn mat3_components_match_spec_example() {
        let t = Type::Base(BaseType::Mat3);
        assert_eq!(t.component_count(), Some(9));
        assert_eq!(t.index_count(), Some(3));
        assert_eq!(t.index_type(), Some(Type::Base(BaseType::Vec3)));
    }

    #[test]
    fn array_index_type_is_element_type() {
        let t = Type::Base(BaseType::Float).array_of(4);
        assert_eq!(t.index_type(), Some(Type::Base(BaseType::Float)));
        assert_eq!(t.index_count(), Some(4));
        assert!(t.contains_array(&SymbolTable::new()));
    }
}
