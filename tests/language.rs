use mokiy::evaluator::{FatalError, DEFAULT_MAX_DEPTH};
use mokiy::object::Object;
use mokiy::session::{Outcome, Session};

fn run(source: &str) -> String {
    match Session::new().run(source) {
        Ok(Outcome::Value(obj)) => obj.to_string(),
        Ok(other) => panic!("expected a value from `{}`, got {:?}", source, other),
        Err(err) => panic!("`{}` failed: {}", source, err),
    }
}

#[test]
fn recursive_fibonacci() {
    let source = "
let fibonacci = fn(x) {
  if (x == 0) {
    0
  } else {
    if (x == 1) {
      return 1;
    } else {
      fibonacci(x - 1) + fibonacci(x - 2);
    }
  }
};
fibonacci(15);
";

    assert_eq!(run(source), "610");
}

#[test]
fn higher_order_functions_over_arrays() {
    let source = r#"
let map = fn(arr, f) {
  let iter = fn(arr, accumulated) {
    if (len(arr) == 0) {
      accumulated
    } else {
      iter(rest(arr), push(accumulated, f(first(arr))));
    }
  };
  iter(arr, []);
};

let reduce = fn(arr, initial, f) {
  let iter = fn(arr, result) {
    if (len(arr) == 0) {
      result
    } else {
      iter(rest(arr), f(result, first(arr)));
    }
  };
  iter(arr, initial);
};

let doubled = map([1, 2, 3, 4], fn(x) { x * 2 });
let sum = reduce(doubled, 0, fn(acc, x) { acc + x });
[doubled, sum]
"#;

    assert_eq!(run(source), "[[2, 4, 6, 8], 20]");
}

#[test]
fn hashes_hold_mixed_keys_in_insertion_order() {
    let source = r#"
let people = [{"name": "Alice", "age": 24}, {"name": "Anna", "age": 28}];
let byAge = {true: "adult", 24: people[0]["name"], "count": len(people)};
[byAge, people[1]["age"], byAge[false]]
"#;

    assert_eq!(
        run(source),
        "[{true: adult, 24: Alice, count: 2}, 28, null]"
    );
}

#[test]
fn closures_keep_their_own_captures() {
    let source = "
let makeCounter = fn(start) {
  fn(step) { start + step }
};
let fromTen = makeCounter(10);
let fromOne = makeCounter(1);
[fromTen(5), fromOne(5)]
";

    assert_eq!(run(source), "[15, 6]");
}

#[test]
fn errors_stop_the_program() {
    assert_eq!(
        run("let a = 1; let b = a + true; a"),
        "ERROR: type mismatch: INTEGER + BOOLEAN"
    );
    assert_eq!(run("len(1, 2)"), "ERROR: wrong number of arguments. got=2, want=1");
}

#[test]
fn a_repl_session_accumulates_state() {
    let mut session = Session::new();

    let lines = [
        ("let greeting = \"Hello\";", Outcome::Nothing),
        (
            "let greet = fn(name) { greeting + \", \" + name + \"!\" };",
            Outcome::Nothing,
        ),
        (
            "greet(\"Monkey\")",
            Outcome::Value(Object::String("Hello, Monkey!".to_owned())),
        ),
        ("let greeting = \"Bye\";", Outcome::Nothing),
        (
            "greet(\"Monkey\")",
            Outcome::Value(Object::String("Bye, Monkey!".to_owned())),
        ),
    ];

    for (line, expected) in lines {
        assert_eq!(session.run(line), Ok(expected), "for `{}`", line);
    }
}

#[test]
fn diagnostics_are_reported_in_source_order() {
    let outcome = Session::new().run("let x 5; let = 10; let 838383;");

    assert_eq!(
        outcome,
        Ok(Outcome::Diagnostics(vec![
            "expected next token to be =, got INT".to_owned(),
            "expected next token to be IDENT, got =".to_owned(),
            "no prefix parse function for = found".to_owned(),
            "expected next token to be IDENT, got INT".to_owned(),
        ]))
    );
}

#[test]
fn unbounded_recursion_is_fatal() {
    let mut session = Session::with_max_depth(100);

    assert_eq!(
        session.run("let down = fn(n) { down(n - 1) }; down(0)"),
        Err(FatalError::DepthExceeded { limit: 100 })
    );
}

#[test]
fn default_bound_stops_deep_recursion_cleanly() {
    let mut session = Session::new();

    assert_eq!(
        session.run("let f = fn(n) { if (n == 0) { 0 } else { 1 + f(n - 1) } }; f(100000)"),
        Err(FatalError::DepthExceeded {
            limit: DEFAULT_MAX_DEPTH
        })
    );
    assert_eq!(session.run("f(10)"), Ok(Outcome::Value(Object::Integer(10))));
}

#[test]
fn overlong_operator_chains_are_diagnosed() {
    let source = format!("1{}", "+1".repeat(600));

    match Session::new().run(&source) {
        Ok(Outcome::Diagnostics(errors)) => {
            assert_eq!(errors[0], "expression nesting exceeds 256 levels")
        }
        other => panic!("expected diagnostics, got {:?}", other),
    }
}
