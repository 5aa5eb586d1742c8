use glslx_base::{Range, SourceSet};
use serde::Serialize;

/// A zero-based `(line, column)` pair, serialized the way spec.md §6's
/// `compileIDE` describes: `{line, column}`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub struct JsonPosition {
    pub line: u32,
    pub column: u32,
}

/// `{source, start, end}`, matching spec.md §6's "ranges serialized as
/// `{source, start:{line,column}, end:{line,column}}`" exactly.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct JsonRange {
    pub source: String,
    pub start: JsonPosition,
    pub end: JsonPosition,
}

impl JsonRange {
    pub fn from_range(range: Range, sources: &SourceSet) -> JsonRange {
        let source = sources.get(range.source);
        let (start_line, start_col) = source.index_to_line_column(range.start);
        let (end_line, end_col) = source.index_to_line_column(range.end);
        JsonRange {
            source: source.name().to_string(),
            start: JsonPosition { line: start_line, column: start_col },
            end: JsonPosition { line: end_line, column: end_col },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_a_range_to_line_column_positions() {
        let mut sources = SourceSet::new();
        let id = sources.add("a.glsl", "void main(){\n  gl_FragColor;\n}\n");
        let r = Range::new(id, 15, 27);
        let json = JsonRange::from_range(r, &sources);
        assert_eq!(json.source, "a.glsl");
        assert_eq!(json.start, JsonPosition { line: 1, column: 2 });
    }
}
