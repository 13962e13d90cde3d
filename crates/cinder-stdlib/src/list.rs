use cinder_core::{check_arity, CinderError, Env, Value};

use crate::{integer_arg, register_fn};

fn proper_list(name: &str, value: &Value) -> Result<Vec<Value>, CinderError> {
    value.to_vec().ok_or_else(|| {
        CinderError::type_error(format!("proper list for {name}"), value.type_name())
    })
}

pub fn register(env: &Env) {
    register_fn(env, "car", |args| {
        check_arity!(args, "car", 1);
        match &args[0] {
            Value::Pair(p) => Ok(p.car.clone()),
            other => Err(CinderError::type_error("pair", other.type_name())),
        }
    });

    register_fn(env, "cdr", |args| {
        check_arity!(args, "cdr", 1);
        match &args[0] {
            Value::Pair(p) => Ok(p.cdr.clone()),
            other => Err(CinderError::type_error("pair", other.type_name())),
        }
    });

    register_fn(env, "cons", |args| {
        check_arity!(args, "cons", 2);
        Ok(Value::cons(args[0].clone(), args[1].clone()))
    });

    register_fn(env, "list", |args| Ok(Value::list(args.to_vec())));

    register_fn(env, "length", |args| {
        check_arity!(args, "length", 1);
        Ok(Value::Number(proper_list("length", &args[0])?.len() as f64))
    });

    // Every argument but the last must be a proper list; the last becomes the tail.
    register_fn(env, "append", |args| {
        let Some((last, init)) = args.split_last() else {
            return Ok(Value::Nil);
        };
        let mut items = Vec::new();
        for arg in init {
            items.extend(proper_list("append", arg)?);
        }
        Ok(Value::list_with_tail(items, last.clone()))
    });

    register_fn(env, "reverse", |args| {
        check_arity!(args, "reverse", 1);
        let mut items = proper_list("reverse", &args[0])?;
        items.reverse();
        Ok(Value::list(items))
    });

    register_fn(env, "list-ref", |args| {
        check_arity!(args, "list-ref", 2);
        let items = proper_list("list-ref", &args[0])?;
        let index = integer_arg("list-ref", &args[1])?;
        usize::try_from(index)
            .ok()
            .and_then(|i| items.get(i).cloned())
            .ok_or_else(|| {
                CinderError::eval(format!(
                    "list-ref: index {index} out of range for list of length {}",
                    items.len()
                ))
            })
    });
}

#[cfg(test)]
mod tests {
    use crate::testing::{call, list, num};
    use cinder_core::{CinderError, Value};

    #[test]
    fn test_car_cdr() {
        let pair = Value::cons(num(1.0), num(2.0));
        assert_eq!(call("car", &[pair.clone()]).unwrap(), num(1.0));
        assert_eq!(call("cdr", &[pair]).unwrap(), num(2.0));
        assert!(matches!(
            call("car", &[Value::Nil]),
            Err(CinderError::Type { .. })
        ));
    }

    #[test]
    fn test_list_and_length() {
        assert_eq!(call("list", &[]).unwrap(), Value::Nil);
        assert_eq!(
            call("length", &[list(&[1.0, 2.0, 3.0])]).unwrap(),
            num(3.0)
        );
        assert!(call("length", &[Value::cons(num(1.0), num(2.0))]).is_err());
    }

    #[test]
    fn test_append() {
        let out = call("append", &[list(&[1.0]), list(&[2.0, 3.0])]).unwrap();
        assert_eq!(out.to_string(), "(1 2 3)");
        assert_eq!(call("append", &[]).unwrap(), Value::Nil);
        let dotted = call("append", &[list(&[1.0]), num(2.0)]).unwrap();
        assert_eq!(dotted.to_string(), "(1 . 2)");
    }

    #[test]
    fn test_reverse_and_list_ref() {
        assert_eq!(
            call("reverse", &[list(&[1.0, 2.0, 3.0])]).unwrap().to_string(),
            "(3 2 1)"
        );
        assert_eq!(
            call("list-ref", &[list(&[5.0, 6.0]), num(1.0)]).unwrap(),
            num(6.0)
        );
        assert!(call("list-ref", &[list(&[5.0]), num(3.0)]).is_err());
        assert!(call("list-ref", &[list(&[5.0]), num(-1.0)]).is_err());
    }
}
