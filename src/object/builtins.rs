use super::{assert_argument_count, EvalError, EvalResult, Object};
use std::fmt;
use std::rc::Rc;

pub type BuiltinFunction = fn(Vec<Object>) -> EvalResult;

/// A native function. Builtins receive evaluated arguments only, never a scope.
#[derive(Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub func: BuiltinFunction,
}

impl Builtin {
    pub fn call(&self, args: Vec<Object>) -> EvalResult {
        (self.func)(args)
    }
}

impl PartialEq for Builtin {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Builtin({})", self.name)
    }
}

/// Natives an identifier falls back to when no binding in scope shadows it.
pub const BUILTINS: &[Builtin] = &[
    Builtin {
        name: "len",
        func: len,
    },
    Builtin {
        name: "first",
        func: first,
    },
    Builtin {
        name: "last",
        func: last,
    },
    Builtin {
        name: "rest",
        func: rest,
    },
    Builtin {
        name: "push",
        func: push,
    },
];

pub fn lookup(name: &str) -> Option<Object> {
    BUILTINS
        .iter()
        .find(|builtin| builtin.name == name)
        .map(|builtin| Object::Builtin(*builtin))
}

fn len(args: Vec<Object>) -> EvalResult {
    assert_argument_count(1, &args)?;

    match &args[0] {
        Object::String(value) => Ok(Object::Integer(value.len() as i64)),
        Object::Array(elements) => Ok(Object::Integer(elements.len() as i64)),
        other => Err(EvalError::UnsupportedArgument("len", other.type_name())),
    }
}

fn array_argument<'a>(name: &'static str, arg: &'a Object) -> Result<&'a [Object], EvalError> {
    match arg {
        Object::Array(elements) => Ok(elements.as_slice()),
        other => Err(EvalError::ExpectedArray(name, other.type_name())),
    }
}

fn first(args: Vec<Object>) -> EvalResult {
    assert_argument_count(1, &args)?;

    let elements = array_argument("first", &args[0])?;
    Ok(elements.first().cloned().unwrap_or(Object::Null))
}

fn last(args: Vec<Object>) -> EvalResult {
    assert_argument_count(1, &args)?;

    let elements = array_argument("last", &args[0])?;
    Ok(elements.last().cloned().unwrap_or(Object::Null))
}

fn rest(args: Vec<Object>) -> EvalResult {
    assert_argument_count(1, &args)?;

    let elements = array_argument("rest", &args[0])?;
    Ok(if elements.is_empty() {
        Object::Null
    } else {
        Object::Array(Rc::new(elements[1..].to_vec()))
    })
}

fn push(args: Vec<Object>) -> EvalResult {
    assert_argument_count(2, &args)?;

    let elements = array_argument("push", &args[0])?;
    let mut new_elements = elements.to_vec();
    new_elements.push(args[1].clone());

    Ok(Object::Array(Rc::new(new_elements)))
}

#[cfg(test)]
mod tests {
    use super::lookup;
    use crate::object::{EvalError, EvalResult, Object};
    use std::rc::Rc;

    fn call(name: &str, args: Vec<Object>) -> EvalResult {
        match lookup(name) {
            Some(Object::Builtin(builtin)) => builtin.call(args),
            other => panic!("no builtin named {}: {:?}", name, other),
        }
    }

    fn array(values: &[i64]) -> Object {
        Object::Array(Rc::new(values.iter().copied().map(Object::Integer).collect()))
    }

    #[test]
    fn unknown_names_are_not_builtins() {
        assert_eq!(lookup("puts"), None);
        assert_eq!(lookup("length"), None);
    }

    #[test]
    fn len() {
        assert_eq!(call("len", vec![Object::String("four".to_owned())]), Ok(Object::Integer(4)));
        assert_eq!(call("len", vec![array(&[1, 2, 3])]), Ok(Object::Integer(3)));
        assert_eq!(
            call("len", vec![Object::Integer(1)]).map_err(|e| e.to_string()),
            Err("argument to `len` not supported, got INTEGER".to_owned())
        );
        assert_eq!(
            call("len", vec![]),
            Err(EvalError::WrongArgumentCount { got: 0, want: 1 })
        );
    }

    #[test]
    fn first_last_rest() {
        assert_eq!(call("first", vec![array(&[1, 2, 3])]), Ok(Object::Integer(1)));
        assert_eq!(call("last", vec![array(&[1, 2, 3])]), Ok(Object::Integer(3)));
        assert_eq!(call("rest", vec![array(&[1, 2, 3])]), Ok(array(&[2, 3])));

        assert_eq!(call("first", vec![array(&[])]), Ok(Object::Null));
        assert_eq!(call("last", vec![array(&[])]), Ok(Object::Null));
        assert_eq!(call("rest", vec![array(&[])]), Ok(Object::Null));

        assert_eq!(
            call("last", vec![Object::Integer(1)]).map_err(|e| e.to_string()),
            Err("argument to `last` must be ARRAY, got INTEGER".to_owned())
        );
    }

    #[test]
    fn push_builds_a_new_array() {
        let original = array(&[1]);

        let pushed = call("push", vec![original.clone(), Object::Integer(2)]);

        assert_eq!(pushed, Ok(array(&[1, 2])));
        assert_eq!(original, array(&[1]));
        assert_eq!(
            call("push", vec![original]),
            Err(EvalError::WrongArgumentCount { got: 1, want: 2 })
        );
    }
}
