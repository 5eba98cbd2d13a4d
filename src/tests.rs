use swc_core::{
    common::{
        comments::{Comments, SingleThreadedComments},
        sync::Lrc,
        FileName, SourceMap,
    },
    ecma::{
        ast::*,
        parser::{parse_file_as_module, EsSyntax, Syntax, TsSyntax},
        transforms::testing::{test_inline, Tester},
        visit::VisitMutWith,
    },
};

use crate::{auto_observer, is_in_node_modules, normalize_filename, AutoObserver, Config};

// -----------------------------------------------------------------------------
// Parse helpers shared by the unit tests
// -----------------------------------------------------------------------------

fn jsx_syntax() -> Syntax {
    Syntax::Es(EsSyntax {
        jsx: true,
        decorators: true,
        ..Default::default()
    })
}

fn tsx_syntax() -> Syntax {
    Syntax::Typescript(TsSyntax {
        tsx: true,
        decorators: true,
        ..Default::default()
    })
}

fn parse(src: &str, syntax: Syntax, comments: Option<&dyn Comments>) -> Module {
    let cm: Lrc<SourceMap> = Default::default();
    let fm = cm.new_source_file(FileName::Anon.into(), src.to_string());
    parse_file_as_module(&fm, syntax, EsVersion::latest(), comments, &mut vec![])
        .unwrap_or_else(|err| panic!("failed to parse {src:?}: {err:?}"))
}

pub(crate) fn parse_module(src: &str) -> Module {
    parse(src, jsx_syntax(), None)
}

pub(crate) fn parse_ts_module(src: &str) -> Module {
    parse(src, tsx_syntax(), None)
}

pub(crate) fn parse_module_with_comments(src: &str, comments: &SingleThreadedComments) -> Module {
    parse(src, jsx_syntax(), Some(comments))
}

fn tr(t: &mut Tester<'_>) -> impl Pass {
    auto_observer(Config::default(), t.comments.clone())
}

fn tr_with(t: &mut Tester<'_>, config: Config) -> impl Pass {
    auto_observer(config, t.comments.clone())
}

// -----------------------------------------------------------------------------
// Basic shapes
// -----------------------------------------------------------------------------

test_inline!(
    jsx_syntax(),
    |t| tr(t),
    wraps_arrow_component,
    r#"const Simple = () => <div>check</div>;"#,
    r#"import { observer } from "mobx-react";
const Simple = observer(() => <div>check</div>);"#
);

test_inline!(
    jsx_syntax(),
    |t| tr(t),
    rebinds_function_declaration,
    r#"function Simple() { return <div>check</div>; }"#,
    r#"import { observer } from "mobx-react";
const Simple = observer(function Simple() { return <div>check</div>; });"#
);

test_inline!(
    jsx_syntax(),
    |t| tr(t),
    rebinds_class_extending_react_component,
    r#"class Simple extends React.Component { render() { return <div>check</div>; } }"#,
    r#"import { observer } from "mobx-react";
const Simple = observer(class Simple extends React.Component { render() { return <div>check</div>; } });"#
);

test_inline!(
    jsx_syntax(),
    |t| tr(t),
    reuses_existing_import,
    r#"import { observer } from "mobx-react";
const Simple = () => <div>check</div>;"#,
    r#"import { observer } from "mobx-react";
const Simple = observer(() => <div>check</div>);"#
);

test_inline!(
    jsx_syntax(),
    |t| tr(t),
    leaves_plain_functions_alone,
    r#"const add = (a, b) => a + b;"#,
    r#"const add = (a, b) => a + b;"#
);

test_inline!(
    jsx_syntax(),
    |t| tr(t),
    ignore_file_pragma_leaves_module_untouched,
    r#"// @auto-observer-ignore-file
const Simple = () => <div>check</div>;"#,
    r#"// @auto-observer-ignore-file
const Simple = () => <div>check</div>;"#
);

test_inline!(
    jsx_syntax(),
    |t| tr(t),
    one_import_for_many_components,
    r#"const A = () => <div/>;
function B() { return <p/>; }
const c = 1;"#,
    r#"import { observer } from "mobx-react";
const A = observer(() => <div/>);
const B = observer(function B() { return <p/>; });
const c = 1;"#
);

test_inline!(
    jsx_syntax(),
    |t| tr(t),
    wraps_function_expressions,
    r#"const A = function () { return <div/>; };
const B = function Named() { return <p/>; };"#,
    r#"import { observer } from "mobx-react";
const A = observer(function () { return <div/>; });
const B = observer(function Named() { return <p/>; });"#
);

test_inline!(
    jsx_syntax(),
    |t| tr(t),
    wraps_class_expressions,
    r#"const A = class extends React.Component {};
const B = class Named { render() { return <div/>; } };"#,
    r#"import { observer } from "mobx-react";
const A = observer(class extends React.Component {});
const B = observer(class Named { render() { return <div/>; } });"#
);

test_inline!(
    jsx_syntax(),
    |t| tr(t),
    wraps_only_the_unwrapped_component,
    r#"const Simple = observer((props) => <div>{props.name}</div>);
const Other = () => <p/>;"#,
    r#"import { observer } from "mobx-react";
const Simple = observer((props) => <div>{props.name}</div>);
const Other = observer(() => <p/>);"#
);

// -----------------------------------------------------------------------------
// Already wrapped
// -----------------------------------------------------------------------------

test_inline!(
    jsx_syntax(),
    |t| tr(t),
    already_wrapped_component_is_left_alone,
    r#"import { observer } from "mobx-react";
const Simple = observer(() => <div>check</div>);"#,
    r#"import { observer } from "mobx-react";
const Simple = observer(() => <div>check</div>);"#
);

test_inline!(
    jsx_syntax(),
    |t| tr(t),
    already_wrapped_without_import_gets_import,
    r#"const Simple = observer(function Simple() { return <div/>; });"#,
    r#"import { observer } from "mobx-react";
const Simple = observer(function Simple() { return <div/>; });"#
);

test_inline!(
    jsx_syntax(),
    |t| tr(t),
    legacy_decorator_output_is_already_wrapped,
    r#"var _class;
const Simple = observer(_class = class Simple extends React.Component { render() { return <div/>; } }) || _class;"#,
    r#"import { observer } from "mobx-react";
var _class;
const Simple = observer(_class = class Simple extends React.Component { render() { return <div/>; } }) || _class;"#
);

test_inline!(
    jsx_syntax(),
    |t| tr(t),
    decorated_class_is_left_for_decorator_lowering,
    r#"@observer class Simple extends React.Component { render() { return <div/>; } }"#,
    r#"import { observer } from "mobx-react";
@observer class Simple extends React.Component { render() { return <div/>; } }"#
);

test_inline!(
    jsx_syntax(),
    |t| tr(t),
    components_inside_wrapped_component_are_wrapped,
    r#"const Outer = observer(() => { const Inner = () => <p/>; return <div><Inner/></div>; });"#,
    r#"import { observer } from "mobx-react";
const Outer = observer(() => { const Inner = observer(() => <p/>); return <div><Inner/></div>; });"#
);

// -----------------------------------------------------------------------------
// Imports
// -----------------------------------------------------------------------------

test_inline!(
    jsx_syntax(),
    |t| tr(t),
    merges_into_existing_source_import,
    r#"import { inject } from "mobx-react";
const Simple = () => <div/>;"#,
    r#"import { inject, observer } from "mobx-react";
const Simple = observer(() => <div/>);"#
);

test_inline!(
    jsx_syntax(),
    |t| tr(t),
    aliased_import_gets_plain_specifier,
    r#"import { observer as obs } from "mobx-react";
const Simple = () => <div/>;"#,
    r#"import { observer as obs, observer } from "mobx-react";
const Simple = observer(() => <div/>);"#
);

test_inline!(
    jsx_syntax(),
    |t| tr(t),
    import_from_other_source_is_not_reused,
    r#"import { observer as mobxObserver } from "mobx-react-lite";
import React from "react";
const Simple = () => <div/>;"#,
    r#"import { observer } from "mobx-react";
import { observer as mobxObserver } from "mobx-react-lite";
import React from "react";
const Simple = observer(() => <div/>);"#
);

test_inline!(
    jsx_syntax(),
    |t| tr(t),
    import_goes_after_directives,
    r#""use client";
const Simple = () => <div/>;"#,
    r#""use client";
import { observer } from "mobx-react";
const Simple = observer(() => <div/>);"#
);

// -----------------------------------------------------------------------------
// Exports
// -----------------------------------------------------------------------------

test_inline!(
    jsx_syntax(),
    |t| tr(t),
    keeps_named_exports,
    r#"export const A = () => <div/>;
export function B() { return <p/>; }
export class C extends React.Component {}"#,
    r#"import { observer } from "mobx-react";
export const A = observer(() => <div/>);
export const B = observer(function B() { return <p/>; });
export const C = observer(class C extends React.Component {});"#
);

test_inline!(
    jsx_syntax(),
    |t| tr(t),
    named_default_function_keeps_local_binding,
    r#"export default function Page() { return <main/>; }"#,
    r#"import { observer } from "mobx-react";
const Page = observer(function Page() { return <main/>; });
export default Page;"#
);

test_inline!(
    jsx_syntax(),
    |t| tr(t),
    anonymous_default_exports_are_wrapped_in_place,
    r#"export default class extends React.Component {}"#,
    r#"import { observer } from "mobx-react";
export default observer(class extends React.Component {});"#
);

test_inline!(
    jsx_syntax(),
    |t| tr(t),
    default_exported_arrow_is_wrapped,
    r#"export default () => <div/>;"#,
    r#"import { observer } from "mobx-react";
export default observer(() => <div/>);"#
);

// -----------------------------------------------------------------------------
// Classification
// -----------------------------------------------------------------------------

test_inline!(
    jsx_syntax(),
    |t| tr(t),
    early_return_null_does_not_disqualify,
    r#"function Simple(props) { if (!props.ready) { return null; } return <div/>; }"#,
    r#"import { observer } from "mobx-react";
const Simple = observer(function Simple(props) { if (!props.ready) { return null; } return <div/>; });"#
);

test_inline!(
    jsx_syntax(),
    |t| tr(t),
    trailing_return_null_is_not_a_component,
    r#"function maybe(x) { if (x) { return <div/>; } return null; }"#,
    r#"function maybe(x) { if (x) { return <div/>; } return null; }"#
);

test_inline!(
    jsx_syntax(),
    |t| tr(t),
    lowered_jsx_and_fragments_count,
    r#"function A() { return React.createElement("div", null); }
const B = () => <>fragment</>;"#,
    r#"import { observer } from "mobx-react";
const A = observer(function A() { return React.createElement("div", null); });
const B = observer(() => <>fragment</>);"#
);

test_inline!(
    jsx_syntax(),
    |t| tr(t),
    class_shapes,
    r#"class A { render() { return <div/>; } }
class B extends Component {}
class Store { load() { return 1; } }"#,
    r#"import { observer } from "mobx-react";
const A = observer(class A { render() { return <div/>; } });
const B = observer(class B extends Component {});
class Store { load() { return 1; } }"#
);

test_inline!(
    jsx_syntax(),
    |t| tr(t),
    nested_components_are_wrapped_too,
    r#"function Outer() { const Inner = () => <p/>; return <div><Inner/></div>; }"#,
    r#"import { observer } from "mobx-react";
const Outer = observer(function Outer() { const Inner = observer(() => <p/>); return <div><Inner/></div>; });"#
);

test_inline!(
    jsx_syntax(),
    |t| tr(t),
    component_passed_as_argument,
    r#"const Simple = React.memo(() => <div/>);"#,
    r#"import { observer } from "mobx-react";
const Simple = React.memo(observer(() => <div/>));"#
);

// -----------------------------------------------------------------------------
// Block suppression
// -----------------------------------------------------------------------------

test_inline!(
    jsx_syntax(),
    |t| tr(t),
    ignore_block_covers_following_siblings,
    r#"const A = () => <div/>;
// @auto-observer-ignore-block
const B = () => <p/>;
const C = () => <span/>;"#,
    r#"import { observer } from "mobx-react";
const A = observer(() => <div/>);
// @auto-observer-ignore-block
const B = () => <p/>;
const C = () => <span/>;"#
);

test_inline!(
    jsx_syntax(),
    |t| tr(t),
    ignore_block_stops_at_enclosing_list,
    r#"function Outer() {
    // @auto-observer-ignore-block
    const Inner = () => <p/>;
    return <div/>;
}
const After = () => <span/>;"#,
    r#"import { observer } from "mobx-react";
const Outer = observer(function Outer() {
    // @auto-observer-ignore-block
    const Inner = () => <p/>;
    return <div/>;
});
const After = observer(() => <span/>);"#
);

test_inline!(
    jsx_syntax(),
    |t| tr(t),
    trailing_ignore_block_covers_following_siblings,
    r#"const A = () => <div/>; // @auto-observer-ignore-block
const B = () => <p/>;"#,
    r#"import { observer } from "mobx-react";
const A = observer(() => <div/>); // @auto-observer-ignore-block
const B = () => <p/>;"#
);

test_inline!(
    jsx_syntax(),
    |t| tr(t),
    ignore_block_inside_statement_covers_it,
    r#"const A = /* @auto-observer-ignore-block */ () => <div/>;"#,
    r#"const A = /* @auto-observer-ignore-block */ () => <div/>;"#
);

// -----------------------------------------------------------------------------
// TypeScript and configuration
// -----------------------------------------------------------------------------

test_inline!(
    tsx_syntax(),
    |t| tr(t),
    ambient_declarations_stay_unwrapped,
    r#"declare class Ambient extends React.Component {}"#,
    r#"declare class Ambient extends React.Component {}"#
);

test_inline!(
    tsx_syntax(),
    |t| tr(t),
    typed_component_keeps_annotations,
    r#"const Simple = (props: { name: string }) => <div>{props.name}</div>;"#,
    r#"import { observer } from "mobx-react";
const Simple = observer((props: { name: string }) => <div>{props.name}</div>);"#
);

test_inline!(
    jsx_syntax(),
    |t| tr_with(
        t,
        Config {
            wrap_symbol_name: "track".into(),
            wrap_source_module: "mobx-tracker".into(),
            ..Default::default()
        }
    ),
    custom_wrap_symbol_and_source,
    r#"const A = observer(() => <div/>);
const B = track(() => <p/>);"#,
    r#"import { track } from "mobx-tracker";
const A = observer(track(() => <div/>));
const B = track(() => <p/>);"#
);

test_inline!(
    jsx_syntax(),
    |t| tr_with(
        t,
        Config {
            debug_enabled: true,
            ..Default::default()
        }
    ),
    debug_logging_keeps_output,
    r#"const Simple = () => <div>check</div>;"#,
    r#"import { observer } from "mobx-react";
const Simple = observer(() => <div>check</div>);"#
);

// -----------------------------------------------------------------------------
// Direct pass runs
// -----------------------------------------------------------------------------

fn run_pass(module: &mut Module, comments: &SingleThreadedComments) -> usize {
    let mut pass = AutoObserver::new(Config::default(), comments.clone(), None);
    module.visit_mut_with(&mut pass);
    pass.context().wrapped
}

#[test]
fn second_run_changes_nothing() {
    let comments = SingleThreadedComments::default();
    let mut module = parse_module_with_comments(
        r#"import { inject } from "mobx-react";
const A = () => <div/>;
function B() { return <p/>; }
const F = function () { return <div/>; };
class C extends React.Component { render() { return <div/>; } }
const E = class extends React.Component {};
var _c;
const L = observer(_c = class L extends React.Component {}) || _c;
export default class extends React.Component {}"#,
        &comments,
    );
    assert_eq!(run_pass(&mut module, &comments), 6);
    let once = module.clone();
    assert_eq!(run_pass(&mut module, &comments), 0);
    assert_eq!(module, once);

    let ModuleItem::ModuleDecl(ModuleDecl::Import(import)) = &module.body[0] else {
        panic!("expected the merged import first");
    };
    assert_eq!(import.specifiers.len(), 2);
    assert_eq!(module.body.len(), 9);
}

#[test]
fn second_run_keeps_a_single_inserted_import() {
    let comments = SingleThreadedComments::default();
    let mut module =
        parse_module_with_comments("\"use client\";\nconst A = () => <div/>;", &comments);
    run_pass(&mut module, &comments);
    let once = module.clone();
    run_pass(&mut module, &comments);
    assert_eq!(module, once);
    let imports = module
        .body
        .iter()
        .filter(|item| matches!(item, ModuleItem::ModuleDecl(ModuleDecl::Import(_))))
        .count();
    assert_eq!(imports, 1);
}

#[test]
fn script_without_components_stays_a_script() {
    let mut program = Program::Script(Script {
        span: Default::default(),
        body: parse_module("const add = (a, b) => a + b;")
            .body
            .into_iter()
            .filter_map(|item| match item {
                ModuleItem::Stmt(stmt) => Some(stmt),
                ModuleItem::ModuleDecl(_) => None,
            })
            .collect(),
        shebang: None,
    });
    program.visit_mut_with(&mut AutoObserver::new(
        Config::default(),
        SingleThreadedComments::default(),
        None,
    ));
    assert!(matches!(program, Program::Script(ref script) if script.body.len() == 1));
}

#[test]
fn filenames_are_normalized() {
    assert_eq!(normalize_filename("file:///app/src/App.tsx"), "app/src/App.tsx");
    assert_eq!(normalize_filename("[project]/src/App.tsx"), "src/App.tsx");
    assert_eq!(normalize_filename("C:\\app\\src\\App.tsx"), "C:/app/src/App.tsx");
}

#[test]
fn node_modules_detection_matches_path_segments() {
    assert!(is_in_node_modules("/app/node_modules/lib/index.js"));
    assert!(is_in_node_modules("C:\\app\\node_modules\\lib\\index.js"));
    assert!(!is_in_node_modules("/app/src/node_modules_helper.js"));
    assert!(!is_in_node_modules("/app/src/App.tsx"));
}
