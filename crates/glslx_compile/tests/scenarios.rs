//! spec.md §8's six named minification scenarios, transcribed as
//! integration tests against the public `compile` facade.

use glslx_compile::{compile, CompileOptions, SourceUnit};
use glslx_parse::NullFileAccess;

fn compile_one(text: &str) -> String {
    let units = [SourceUnit::new("<test>", text)];
    let mut access = NullFileAccess;
    let result = compile(&units, &CompileOptions::default(), &mut access);
    assert!(!result.shaders.is_empty(), "compile failed: {}", result.log);
    assert_eq!(result.shaders.len(), 1);
    result.shaders[0].contents.clone()
}

#[test]
fn scenario_1_integral_float_literal_keeps_its_decimal_point() {
    let out = compile_one("void main(){gl_FragColor=vec4(1.0);}");
    assert_eq!(out, "void main(){gl_FragColor=vec4(1.0);}");
}

#[test]
fn scenario_2_constant_if_else_keeps_only_the_taken_branch() {
    let out = compile_one("export void main(){ if (true) gl_FragColor = vec4(0); else gl_FragColor = vec4(1); }");
    assert_eq!(out, "void main(){gl_FragColor=vec4(0);}");
}

#[test]
fn scenario_3_const_global_is_inlined_and_removed() {
    let out = compile_one("const int N = 2; void main(){ gl_FragColor = vec4(float(N)); }");
    assert_eq!(out, "void main(){gl_FragColor=vec4(2.0);}");
}

#[test]
fn scenario_4_two_entry_points_compile_to_two_independent_shaders() {
    let units = [SourceUnit::new(
        "<test>",
        "void shared_helper() { gl_FragColor = vec4(0.25); }\n\
         export void a() { shared_helper(); }\n\
         export void b() { gl_FragColor = vec4(1.0); }",
    )];
    let mut access = NullFileAccess;
    let result = compile(&units, &CompileOptions::default(), &mut access);
    assert_eq!(result.shaders.len(), 2);

    let a = result.shaders.iter().find(|s| s.name == "a").expect("shader a");
    let b = result.shaders.iter().find(|s| s.name == "b").expect("shader b");
    assert!(a.contents.contains("main"));
    assert!(b.contents.contains("main"));
    assert!(a.contents.contains(".25"));
    assert!(!b.contents.contains(".25"), "b must not carry a's dead callee: {}", b.contents);
}

#[test]
fn scenario_5_extension_auto_enables_with_and_without_the_explicit_directive() {
    const PREFIX: &str = "#extension GL_OES_standard_derivatives:enable\n";

    let with_directive = compile_one(
        "#extension GL_OES_standard_derivatives : enable\nvoid main(){ gl_FragColor = vec4(dFdx(gl_FragCoord.x)); }",
    );
    assert!(with_directive.starts_with(PREFIX), "got: {with_directive}");

    let without_directive = compile_one("void main(){ gl_FragColor = vec4(dFdx(gl_FragCoord.x)); }");
    assert!(without_directive.starts_with(PREFIX), "got: {without_directive}");
}

#[test]
fn scenario_6_break_inside_a_for_loop_does_not_trigger_a_missing_return_diagnostic() {
    let units = [SourceUnit::new("<test>", "void f(){ for(int i = 0; i < 3; i++) if(i==1) break; } void main() {}")];
    let mut access = NullFileAccess;
    let result = compile(&units, &CompileOptions::default(), &mut access);
    assert!(!result.shaders.is_empty(), "compile failed: {}", result.log);
}
