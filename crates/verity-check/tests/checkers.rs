//! Behaviour of the built-in checkers, one test per checker family.

use std::sync::Arc;

use verity_check::checkers::{
    Contains, DeepContains, DeepEquals, Equals, ErrorMatches, FitsTypeOf, HasLen, Implements,
    IsNil, Matches, NotNil, PanicMatches, Panics,
};
use verity_check::{run_check, Checker, InterfaceType, NamedType, Not, Type, Value};

fn test_info(checker: &dyn Checker, name: &str, params: &[&str]) {
    let info = checker.info();
    assert_eq!(info.name, name);
    assert_eq!(info.params, params);
}

fn test_check(
    checker: &dyn Checker,
    passed: bool,
    error: &str,
    params: Vec<Value>,
) -> (Vec<Value>, Vec<String>) {
    let info = checker.info();
    assert_eq!(
        params.len(),
        info.params.len(),
        "unexpected param count in test"
    );
    let result = run_check(checker, &params);
    assert_eq!(
        (result.passed, result.message()),
        (passed, error),
        "{}.check({:?})",
        info.name,
        params
    );
    (
        result.params(&params).to_vec(),
        result.names(&info.params).to_vec(),
    )
}

fn holds(obtained: Value, checker: &dyn Checker, arg: Value) {
    let result = run_check(checker, &[obtained.clone(), arg.clone()]);
    assert!(
        result.passed && result.error.is_none(),
        "{}({}, {}) did not hold: {:?}",
        checker.info().name,
        obtained,
        arg,
        result.error
    );
}

fn simple_struct() -> Arc<NamedType> {
    NamedType::new("check_test.simpleStruct", Type::structure([("i", Type::INT)])).build()
}

fn simple(i: i64) -> Value {
    Value::named(&simple_struct(), Value::structure([("i", Value::int(i))]))
}

fn animal() -> Arc<InterfaceType> {
    InterfaceType::new("check_test.animal", ["Sound"])
}

fn sounding(name: &str, sound: &'static str) -> Value {
    let ty = NamedType::new(name, Type::Struct(Vec::new()))
        .pointer_string_method("Sound", move |_| sound.to_string())
        .build();
    Value::ptr(Value::named(&ty, Value::Struct { fields: vec![], values: vec![] }))
}

fn dog() -> Value {
    sounding("check_test.dog", "bark")
}

fn cat() -> Value {
    sounding("check_test.cat", "meow")
}

fn tree() -> Value {
    let ty = NamedType::new("check_test.tree", Type::Struct(Vec::new())).build();
    Value::ptr(Value::named(&ty, Value::Struct { fields: vec![], values: vec![] }))
}

fn animals(items: Vec<Value>) -> Value {
    Value::slice(Type::interface(&animal()), items)
}

fn my_string(s: &str) -> Value {
    let ty = NamedType::new("check_test.myString", Type::STRING).build();
    Value::named(&ty, Value::from(s))
}

fn int_slice(items: &[i64]) -> Value {
    Value::slice(Type::INT, items.iter().copied().map(Value::int).collect())
}

fn int_array(items: &[i64]) -> Value {
    Value::array(Type::INT, items.iter().copied().map(Value::int).collect())
}

fn foo_bar_map() -> Value {
    Value::map(
        Type::STRING,
        Type::INT,
        vec![
            (Value::from("foo"), Value::int(1)),
            (Value::from("bar"), Value::int(2)),
        ],
    )
}

fn panicking(payload: Value) -> Value {
    Value::func0(move || payload.clone().panic_with())
}

#[test]
fn is_nil() {
    test_info(&IsNil, "IsNil", &["value"]);

    test_check(&IsNil, true, "", vec![Value::Nil]);
    test_check(&IsNil, false, "", vec![Value::from("a")]);

    test_check(&IsNil, true, "", vec![Value::nil_chan(Type::INT)]);
    test_check(&IsNil, false, "", vec![Value::chan(Type::INT, 0)]);
    test_check(&IsNil, false, "", vec![Value::error("")]);
    test_check(&IsNil, true, "", vec![Value::nil_slice(Type::INT)]);
    test_check(&IsNil, false, "", vec![int_slice(&[0])]);
    test_check(&IsNil, false, "", vec![Value::int(0)]);
}

#[test]
fn not_nil() {
    test_info(&NotNil, "NotNil", &["value"]);

    test_check(&NotNil, false, "", vec![Value::Nil]);
    test_check(&NotNil, true, "", vec![Value::from("a")]);

    test_check(&NotNil, false, "", vec![Value::nil_chan(Type::INT)]);
    test_check(&NotNil, true, "", vec![Value::chan(Type::INT, 0)]);
    test_check(&NotNil, true, "", vec![Value::error("")]);
    test_check(&NotNil, false, "", vec![Value::nil_slice(Type::INT)]);
    test_check(&NotNil, true, "", vec![int_slice(&[0])]);
}

#[test]
fn not() {
    test_info(&Not::new(IsNil), "Not(IsNil)", &["value"]);

    test_check(&Not::new(IsNil), false, "", vec![Value::Nil]);
    test_check(&Not::new(IsNil), true, "", vec![Value::from("a")]);
}

#[test]
fn equals() {
    test_info(&Equals, "Equals", &["obtained", "expected"]);

    test_check(&Equals, true, "", vec![Value::int(42), Value::int(42)]);
    test_check(&Equals, false, "", vec![Value::int(42), Value::int(43)]);

    // Different native types.
    test_check(&Equals, false, "", vec![Value::int32(42), Value::int64(42)]);

    test_check(&Equals, false, "", vec![Value::int(42), Value::Nil]);

    test_check(
        &Equals,
        false,
        "runtime error: comparing uncomparable type []uint8",
        vec![Value::bytes(&[1, 2]), Value::bytes(&[1, 2])],
    );

    test_check(&Equals, true, "", vec![simple(1), simple(1)]);
    test_check(&Equals, false, "", vec![simple(1), simple(2)]);

    // Pointers compare by identity.
    test_check(&Equals, false, "", vec![Value::ptr(simple(1)), Value::ptr(simple(1))]);
    test_check(&Equals, false, "", vec![Value::ptr(simple(1)), Value::ptr(simple(2))]);
    let shared = Value::ptr(simple(1));
    test_check(&Equals, true, "", vec![shared.clone(), shared]);
}

#[test]
fn deep_equals() {
    test_info(&DeepEquals, "DeepEquals", &["obtained", "expected"]);

    test_check(&DeepEquals, true, "", vec![Value::int(42), Value::int(42)]);
    test_check(&DeepEquals, false, "", vec![Value::int(42), Value::int(43)]);

    test_check(&DeepEquals, false, "", vec![Value::int32(42), Value::int64(42)]);

    test_check(&DeepEquals, false, "", vec![Value::int(42), Value::Nil]);

    test_check(&DeepEquals, true, "", vec![Value::bytes(&[1, 2]), Value::bytes(&[1, 2])]);
    test_check(&DeepEquals, false, "", vec![Value::bytes(&[1, 2]), Value::bytes(&[1, 3])]);

    test_check(&DeepEquals, true, "", vec![simple(1), simple(1)]);
    test_check(&DeepEquals, false, "", vec![simple(1), simple(2)]);

    test_check(&DeepEquals, true, "", vec![Value::ptr(simple(1)), Value::ptr(simple(1))]);
    test_check(&DeepEquals, false, "", vec![Value::ptr(simple(1)), Value::ptr(simple(2))]);

    // A nil slice is not an empty one.
    test_check(
        &DeepEquals,
        false,
        "",
        vec![Value::nil_slice(Type::INT), int_slice(&[])],
    );
}

#[test]
fn has_len() {
    test_info(&HasLen, "HasLen", &["obtained", "n"]);

    test_check(&HasLen, true, "", vec![Value::from("abcd"), Value::int(4)]);
    test_check(&HasLen, true, "", vec![int_slice(&[1, 2]), Value::int(2)]);
    test_check(&HasLen, false, "", vec![int_slice(&[1, 2]), Value::int(3)]);

    test_check(
        &HasLen,
        false,
        "n must be an int",
        vec![int_slice(&[1, 2]), Value::from("2")],
    );
    test_check(
        &HasLen,
        false,
        "obtained value type has no length",
        vec![Value::Nil, Value::int(2)],
    );
}

#[test]
fn error_matches() {
    test_info(&ErrorMatches, "ErrorMatches", &["value", "regex"]);

    test_check(
        &ErrorMatches,
        false,
        "Error value is nil",
        vec![Value::Nil, Value::from("some error")],
    );
    test_check(
        &ErrorMatches,
        false,
        "Value is not an error",
        vec![Value::int(1), Value::from("some error")],
    );
    test_check(
        &ErrorMatches,
        true,
        "",
        vec![Value::error("some error"), Value::from("some error")],
    );
    test_check(
        &ErrorMatches,
        true,
        "",
        vec![Value::error("some error"), Value::from("so.*or")],
    );

    let (params, names) = test_check(
        &ErrorMatches,
        false,
        "",
        vec![Value::error("some error"), Value::from("other error")],
    );
    assert_eq!(params[0], Value::from("some error"));
    assert_eq!(names[0], "error");
}

#[test]
fn matches() {
    test_info(&Matches, "Matches", &["value", "regex"]);

    test_check(&Matches, true, "", vec![Value::from("abc"), Value::from("abc")]);
    test_check(&Matches, true, "", vec![Value::from("abc"), Value::from("a.c")]);

    // Must match fully.
    test_check(&Matches, false, "", vec![Value::from("abc"), Value::from("ab")]);
    test_check(&Matches, false, "", vec![Value::from("abc"), Value::from("bc")]);

    // Values with a String() method are accepted.
    let wrapper = NamedType::new("reflect.Value", Type::STRING)
        .string_method("String", |v| v.as_string_kind().unwrap_or_default().to_string())
        .build();
    let wrapped = Value::named(&wrapper, Value::from("abc"));
    test_check(&Matches, true, "", vec![wrapped.clone(), Value::from("a.c")]);
    test_check(&Matches, false, "", vec![wrapped, Value::from("a.d")]);

    test_check(
        &Matches,
        false,
        "Obtained value is not a string and has no .String()",
        vec![Value::int(1), Value::from("a.c")],
    );
    test_check(
        &Matches,
        false,
        "Regex must be a string",
        vec![Value::from("abc"), Value::int(1)],
    );

    let result = run_check(&Matches, &[Value::from("abc"), Value::from("a[c")]);
    assert!(!result.passed);
    assert!(
        result.message().starts_with("Can't compile regex: "),
        "{}",
        result.message()
    );
}

#[test]
fn panics() {
    test_info(&Panics, "Panics", &["function", "expected"]);

    test_check(
        &Panics,
        false,
        "Function has not panicked",
        vec![Value::func0(|| Value::bool(false)), Value::from("BOOM")],
    );
    test_check(
        &Panics,
        false,
        "Function must take zero arguments",
        vec![Value::int(1), Value::from("BOOM")],
    );
    test_check(
        &Panics,
        false,
        "Function must take zero arguments",
        vec![Value::func(1, |_| Value::Nil), Value::from("BOOM")],
    );

    // Plain strings, raised either way.
    test_check(&Panics, true, "", vec![panicking(Value::from("BOOM")), Value::from("BOOM")]);
    test_check(&Panics, false, "", vec![panicking(Value::from("KABOOM")), Value::from("BOOM")]);
    test_check(
        &Panics,
        true,
        "",
        vec![Value::func0(|| panic!("BOOM")), Value::from("BOOM")],
    );

    // Error values.
    test_check(
        &Panics,
        true,
        "",
        vec![panicking(Value::error("BOOM")), Value::error("BOOM")],
    );
    test_check(
        &Panics,
        false,
        "",
        vec![panicking(Value::error("KABOOM")), Value::error("BOOM")],
    );

    // Deep value.
    let deep = NamedType::new("check_test.deep", Type::structure([("i", Type::INT)])).build();
    let deep99 = || Value::ptr(Value::named(&deep, Value::structure([("i", Value::int(99))])));
    test_check(&Panics, true, "", vec![panicking(deep99()), deep99()]);

    let (params, names) = test_check(
        &Panics,
        false,
        "",
        vec![panicking(Value::error("KABOOM")), Value::error("BOOM")],
    );
    assert!(run_check(&ErrorMatches, &[params[0].clone(), Value::from("KABOOM")]).passed);
    assert_eq!(names[0], "panic");

    // A nil payload is still a panic.
    test_check(&Panics, true, "", vec![panicking(Value::Nil), Value::Nil]);
    test_check(&Panics, false, "", vec![panicking(Value::Nil), Value::from("NOPE")]);
}

#[test]
fn panic_matches() {
    test_info(&PanicMatches, "PanicMatches", &["function", "expected"]);

    test_check(
        &PanicMatches,
        true,
        "",
        vec![panicking(Value::error("BOOM")), Value::from("BO.M")],
    );
    test_check(
        &PanicMatches,
        false,
        "",
        vec![panicking(Value::error("KABOOM")), Value::from("BO.M")],
    );

    test_check(
        &PanicMatches,
        false,
        "Function has not panicked",
        vec![Value::func0(|| Value::bool(false)), Value::from("BOOM")],
    );
    test_check(
        &PanicMatches,
        false,
        "Function must take zero arguments",
        vec![Value::int(1), Value::from("BOOM")],
    );

    test_check(
        &PanicMatches,
        true,
        "",
        vec![panicking(Value::from("BOOM")), Value::from("BO.M")],
    );
    test_check(
        &PanicMatches,
        false,
        "",
        vec![panicking(Value::from("KABOOM")), Value::from("BOOM")],
    );
    test_check(
        &PanicMatches,
        true,
        "",
        vec![Value::func0(|| panic!("BOOM")), Value::from("BO.M")],
    );

    let (params, names) = test_check(
        &PanicMatches,
        false,
        "",
        vec![panicking(Value::error("KABOOM")), Value::from("BOOM")],
    );
    assert_eq!(params[0], Value::from("KABOOM"));
    assert_eq!(names[0], "panic");

    test_check(
        &PanicMatches,
        false,
        "Panic value is not a string or an error",
        vec![panicking(Value::Nil), Value::from("")],
    );
}

#[test]
fn fits_type_of() {
    test_info(&FitsTypeOf, "FitsTypeOf", &["obtained", "sample"]);

    test_check(&FitsTypeOf, true, "", vec![Value::int(1), Value::int(0)]);
    test_check(&FitsTypeOf, false, "", vec![Value::int(1), Value::int64(0)]);

    test_check(&FitsTypeOf, false, "", vec![Value::int(1), Value::error("")]);
    test_check(&FitsTypeOf, false, "", vec![Value::from("error"), Value::error("")]);
    test_check(&FitsTypeOf, true, "", vec![Value::error("error"), Value::error("")]);

    test_check(&FitsTypeOf, false, "", vec![Value::int(1), simple(0)]);
    test_check(&FitsTypeOf, false, "", vec![simple(42), Value::ptr(simple(0))]);
    test_check(&FitsTypeOf, true, "", vec![simple(42), simple(0)]);
    test_check(
        &FitsTypeOf,
        true,
        "",
        vec![Value::ptr(simple(42)), Value::ptr(simple(0))],
    );

    test_check(
        &FitsTypeOf,
        false,
        "Invalid sample value",
        vec![Value::int(1), Value::Nil],
    );
    test_check(&FitsTypeOf, false, "", vec![Value::Nil, Value::int(0)]);
}

#[test]
fn implements() {
    test_info(&Implements, "Implements", &["obtained", "ifaceptr"]);

    let e = Value::iface_ptr(&InterfaceType::error());
    let re = Value::iface_ptr(&InterfaceType::runtime_error());
    test_check(&Implements, true, "", vec![Value::error(""), e.clone()]);
    test_check(&Implements, false, "", vec![Value::error(""), re]);

    test_check(
        &Implements,
        false,
        "ifaceptr should be a pointer to an interface variable",
        vec![Value::int(0), Value::error("")],
    );
    test_check(
        &Implements,
        false,
        "ifaceptr should be a pointer to an interface variable",
        vec![Value::int(0), Value::Nil],
    );
    test_check(&Implements, false, "", vec![Value::Nil, e]);
}

#[test]
fn contains_unsupported_types() {
    for checker in [&Contains as &dyn Checker, &DeepContains] {
        test_check(
            checker,
            false,
            "int is not a supported container",
            vec![Value::int(5), Value::Nil],
        );
        test_check(
            checker,
            false,
            "bool is not a supported container",
            vec![Value::bool(false), Value::Nil],
        );
        test_check(
            checker,
            false,
            "element is a int but expected a string",
            vec![Value::from("container"), Value::int(1)],
        );
    }
    test_info(&Contains, "Contains", &["container", "elem"]);
    test_info(&DeepContains, "DeepContains", &["container", "elem"]);
}

#[test]
fn contains_verifies_types() {
    let message = "container has items of type int but expected element is a string";
    for checker in [&Contains as &dyn Checker, &DeepContains] {
        test_check(checker, false, message, vec![int_array(&[1, 2, 3]), Value::from("foo")]);
        test_check(checker, false, message, vec![int_slice(&[1, 2, 3]), Value::from("foo")]);
        // Maps are searched by value, never by key.
        test_check(checker, false, message, vec![foo_bar_map(), Value::from("foo")]);
    }
}

#[test]
fn contains_verifies_interface_types() {
    let message = "container has items of interface type check_test.animal but expected element does not implement it";
    let iface = Type::interface(&animal());
    test_check(
        &Contains,
        false,
        message,
        vec![Value::array(iface.clone(), vec![dog(), cat()]), tree()],
    );
    test_check(&Contains, false, message, vec![animals(vec![dog(), cat()]), tree()]);
    test_check(
        &Contains,
        false,
        message,
        vec![
            Value::map(
                Type::STRING,
                iface,
                vec![(Value::from("dog"), dog()), (Value::from("cat"), cat())],
            ),
            tree(),
        ],
    );
}

#[test]
fn contains_strings() {
    let not_contains = Not::new(Contains);
    for (container, elem) in [
        (Value::from("foo"), Value::from("f")),
        (my_string("foo"), my_string("fo")),
        (Value::from("foo"), my_string("f")),
        (my_string("foo"), Value::from("fo")),
    ] {
        holds(container.clone(), &Contains, elem.clone());
        holds(container, &DeepContains, elem);
    }
    holds(Value::from("foo"), &not_contains, Value::from("foobar"));
    holds(my_string("foo"), &not_contains, my_string("foobar"));
    holds(Value::from("foo"), &Not::new(DeepContains), my_string("foobar"));
}

#[test]
fn contains_sequences_and_maps() {
    let not_contains = Not::new(Contains);
    for container in [int_array(&[1, 2, 3]), int_slice(&[1, 2, 3])] {
        for n in 1..=3 {
            holds(container.clone(), &Contains, Value::int(n));
            holds(container.clone(), &DeepContains, Value::int(n));
        }
        holds(container.clone(), &not_contains, Value::int(4));
        holds(container, &Not::new(DeepContains), Value::int(4));
    }

    holds(foo_bar_map(), &Contains, Value::int(1));
    holds(foo_bar_map(), &DeepContains, Value::int(2));
    holds(foo_bar_map(), &not_contains, Value::int(3));

    // Interface items match by identity.
    let rex = dog();
    holds(animals(vec![rex.clone(), cat()]), &Contains, rex.clone());
    holds(animals(vec![cat()]), &not_contains, rex.clone());
    holds(
        Value::map(
            Type::STRING,
            Type::interface(&animal()),
            vec![(Value::from("dog"), rex.clone())],
        ),
        &Contains,
        rex,
    );
}

#[test]
fn contains_uncomparable_items() {
    let my_struct = NamedType::new(
        "check_test.myStruct",
        Type::structure([("attrs", Type::map(Type::STRING, Type::STRING))]),
    )
    .build();
    let elem = Value::named(
        &my_struct,
        Value::structure([(
            "attrs",
            Value::map(
                Type::STRING,
                Type::STRING,
                vec![(Value::from("k"), Value::from("v"))],
            ),
        )]),
    );
    let item_ty = Type::Named(Arc::clone(&my_struct));
    let containers = [
        Value::array(item_ty.clone(), vec![elem.clone()]),
        Value::slice(item_ty.clone(), vec![elem.clone()]),
        Value::map(Type::STRING, item_ty, vec![(Value::from("foo"), elem.clone())]),
    ];

    for container in containers {
        test_check(
            &Contains,
            false,
            "runtime error: comparing uncomparable type check_test.myStruct",
            vec![container.clone(), elem.clone()],
        );
        test_check(&DeepContains, true, "", vec![container, elem.clone()]);
    }
}

#[derive(Clone, Default)]
struct Capture(Arc<std::sync::Mutex<Vec<u8>>>);

impl std::io::Write for Capture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for Capture {
    type Writer = Capture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[test]
fn usage_faults_are_traced() {
    let capture = Capture::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(capture.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    run_check(&HasLen, &[Value::Nil, Value::int(2)]);
    run_check(&HasLen, &[Value::from("ab"), Value::int(2)]);

    let logs = String::from_utf8(capture.0.lock().unwrap().clone()).unwrap();
    assert!(logs.contains("check usage fault"), "{}", logs);
    assert!(logs.contains("obtained value type has no length"), "{}", logs);
    assert!(!logs.contains("check evaluated"), "{}", logs);
}
