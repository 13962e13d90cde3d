use std::rc::Rc;

use cinder_core::{check_arity, CinderError, Env, Matrix, Value};

use crate::{integer_arg, number_arg, register_fn};

fn matrix_arg(name: &str, value: &Value) -> Result<Rc<Matrix>, CinderError> {
    match value {
        Value::Matrix(m) => Ok(m.clone()),
        other => Err(CinderError::type_error(
            format!("matrix for {name}"),
            other.type_name(),
        )),
    }
}

fn index_arg(name: &str, value: &Value) -> Result<usize, CinderError> {
    let n = integer_arg(name, value)?;
    usize::try_from(n).map_err(|_| CinderError::eval(format!("{name}: negative index {n}")))
}

fn matrix_value(m: Matrix) -> Value {
    Value::Matrix(Rc::new(m))
}

/// Build from a list of equal-length row lists of numbers.
fn from_row_lists(rows: &Value) -> Result<Matrix, CinderError> {
    let rows = rows
        .to_vec()
        .ok_or_else(|| CinderError::type_error("list of rows", rows.type_name()))?;
    let parsed = rows
        .iter()
        .map(|row| {
            row.to_vec()
                .ok_or_else(|| CinderError::type_error("row list", row.type_name()))?
                .iter()
                .map(number_arg)
                .collect::<Result<Vec<_>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;
    Matrix::from_rows(parsed)
}

fn is_row_list(value: &Value) -> bool {
    value
        .to_vec()
        .is_some_and(|rows| rows.iter().all(|r| matches!(r, Value::Pair(_))))
}

pub fn register(env: &Env) {
    // (matrix '((1 2) (3 4))) or (matrix '(1 2) '(3 4))
    register_fn(env, "matrix", |args| {
        let rows = match args {
            [single] if is_row_list(single) => single.clone(),
            _ => Value::list(args.to_vec()),
        };
        Ok(matrix_value(from_row_lists(&rows)?))
    });

    register_fn(env, "identity", |args| {
        check_arity!(args, "identity", 1);
        Ok(matrix_value(Matrix::identity(index_arg("identity", &args[0])?)?))
    });

    register_fn(env, "transpose", |args| {
        check_arity!(args, "transpose", 1);
        Ok(matrix_value(matrix_arg("transpose", &args[0])?.transpose()))
    });

    register_fn(env, "trace", |args| {
        check_arity!(args, "trace", 1);
        Ok(Value::Number(matrix_arg("trace", &args[0])?.trace()?))
    });

    register_fn(env, "det", |args| {
        check_arity!(args, "det", 1);
        Ok(Value::Number(matrix_arg("det", &args[0])?.det()?))
    });

    register_fn(env, "rank", |args| {
        check_arity!(args, "rank", 1);
        Ok(Value::Number(matrix_arg("rank", &args[0])?.rank() as f64))
    });

    register_fn(env, "inverse", |args| {
        check_arity!(args, "inverse", 1);
        Ok(matrix_value(matrix_arg("inverse", &args[0])?.inverse()?))
    });

    register_fn(env, "matrix-ref", |args| {
        check_arity!(args, "matrix-ref", 3);
        let m = matrix_arg("matrix-ref", &args[0])?;
        let row = index_arg("matrix-ref", &args[1])?;
        let col = index_arg("matrix-ref", &args[2])?;
        m.get(row, col).map(Value::Number).ok_or_else(|| {
            CinderError::math(format!(
                "matrix-ref: ({row}, {col}) out of bounds for {}x{} matrix",
                m.rows(),
                m.cols()
            ))
        })
    });

    register_fn(env, "rows", |args| {
        check_arity!(args, "rows", 1);
        Ok(Value::Number(matrix_arg("rows", &args[0])?.rows() as f64))
    });

    register_fn(env, "cols", |args| {
        check_arity!(args, "cols", 1);
        Ok(Value::Number(matrix_arg("cols", &args[0])?.cols() as f64))
    });

    register_fn(env, "hadamard", |args| {
        check_arity!(args, "hadamard", 2);
        let a = matrix_arg("hadamard", &args[0])?;
        let b = matrix_arg("hadamard", &args[1])?;
        Ok(matrix_value(a.hadamard(&b)?))
    });
}
