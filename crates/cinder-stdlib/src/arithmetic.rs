use std::rc::Rc;

use cinder_core::{check_arity, CinderError, Env, Matrix, Rational, Value};

use crate::{integer_arg, number_arg, register_fn};

/// A numeric operand: exact only while every input so far has been a rational.
#[derive(Clone, Copy)]
enum Scalar {
    Exact(Rational),
    Inexact(f64),
}

enum Operand {
    Scalar(Scalar),
    Matrix(Rc<Matrix>),
}

impl Scalar {
    fn to_f64(self) -> f64 {
        match self {
            Scalar::Exact(r) => r.to_f64(),
            Scalar::Inexact(n) => n,
        }
    }

    fn into_value(self) -> Value {
        match self {
            Scalar::Exact(r) => Value::Rational(r),
            Scalar::Inexact(n) => Value::Number(n),
        }
    }

    fn combine(
        self,
        other: Scalar,
        exact: fn(&Rational, &Rational) -> Result<Rational, CinderError>,
        inexact: fn(f64, f64) -> f64,
    ) -> Result<Scalar, CinderError> {
        match (self, other) {
            (Scalar::Exact(a), Scalar::Exact(b)) => Ok(Scalar::Exact(exact(&a, &b)?)),
            (a, b) => Ok(Scalar::Inexact(inexact(a.to_f64(), b.to_f64()))),
        }
    }
}

fn operand(value: &Value) -> Result<Operand, CinderError> {
    match value {
        Value::Number(n) => Ok(Operand::Scalar(Scalar::Inexact(*n))),
        Value::Rational(r) => Ok(Operand::Scalar(Scalar::Exact(*r))),
        Value::Matrix(m) => Ok(Operand::Matrix(m.clone())),
        other => Err(CinderError::type_error("number", other.type_name())),
    }
}

fn scalar(value: &Value) -> Result<Scalar, CinderError> {
    match operand(value)? {
        Operand::Scalar(s) => Ok(s),
        Operand::Matrix(_) => Err(CinderError::type_error("number", "matrix")),
    }
}

fn into_value(op: Operand) -> Value {
    match op {
        Operand::Scalar(s) => s.into_value(),
        Operand::Matrix(m) => Value::Matrix(m),
    }
}

fn add(a: Operand, b: Operand) -> Result<Operand, CinderError> {
    match (a, b) {
        (Operand::Scalar(x), Operand::Scalar(y)) => {
            Ok(Operand::Scalar(x.combine(y, Rational::add, |p, q| p + q)?))
        }
        (Operand::Matrix(x), Operand::Matrix(y)) => Ok(Operand::Matrix(Rc::new(x.add(&y)?))),
        _ => Err(CinderError::math("cannot add a matrix and a scalar")),
    }
}

fn sub(a: Operand, b: Operand) -> Result<Operand, CinderError> {
    match (a, b) {
        (Operand::Scalar(x), Operand::Scalar(y)) => {
            Ok(Operand::Scalar(x.combine(y, Rational::sub, |p, q| p - q)?))
        }
        (Operand::Matrix(x), Operand::Matrix(y)) => Ok(Operand::Matrix(Rc::new(x.sub(&y)?))),
        _ => Err(CinderError::math("cannot subtract a matrix and a scalar")),
    }
}

fn mul(a: Operand, b: Operand) -> Result<Operand, CinderError> {
    match (a, b) {
        (Operand::Scalar(x), Operand::Scalar(y)) => {
            Ok(Operand::Scalar(x.combine(y, Rational::mul, |p, q| p * q)?))
        }
        (Operand::Matrix(x), Operand::Matrix(y)) => Ok(Operand::Matrix(Rc::new(x.mul(&y)?))),
        (Operand::Scalar(k), Operand::Matrix(m)) | (Operand::Matrix(m), Operand::Scalar(k)) => {
            Ok(Operand::Matrix(Rc::new(m.scale(k.to_f64()))))
        }
    }
}

fn div(a: Scalar, b: Scalar) -> Result<Scalar, CinderError> {
    if let (Scalar::Inexact(_), _) | (_, Scalar::Inexact(_)) = (a, b) {
        if b.to_f64() == 0.0 {
            return Err(CinderError::eval("division by zero"));
        }
    }
    a.combine(b, Rational::div, |p, q| p / q)
}

fn fold(
    args: &[Value],
    op: fn(Operand, Operand) -> Result<Operand, CinderError>,
) -> Result<Value, CinderError> {
    let mut acc = operand(&args[0])?;
    for arg in &args[1..] {
        acc = op(acc, operand(arg)?)?;
    }
    Ok(into_value(acc))
}

/// Integer division helpers share validation: integral operands and a non-zero divisor.
fn integer_pair(name: &str, args: &[Value]) -> Result<(i64, i64), CinderError> {
    let a = integer_arg(name, &args[0])?;
    let b = integer_arg(name, &args[1])?;
    if b == 0 {
        return Err(CinderError::eval(format!("{name}: division by zero")));
    }
    Ok((a, b))
}

fn overflow(name: &str) -> CinderError {
    CinderError::eval(format!("{name}: integer overflow"))
}

fn exact_power(base: Rational, exp: i64) -> Result<Rational, CinderError> {
    let mut result = Rational::from_integer(1);
    let mut square = base;
    let mut remaining = exp.unsigned_abs();
    while remaining > 0 {
        if remaining & 1 == 1 {
            result = result.mul(&square)?;
        }
        remaining >>= 1;
        if remaining > 0 {
            square = square.mul(&square)?;
        }
    }
    if exp < 0 {
        Rational::from_integer(1).div(&result)
    } else {
        Ok(result)
    }
}

pub fn register(env: &Env) {
    register_fn(env, "+", |args| {
        if args.is_empty() {
            return Ok(Value::Number(0.0));
        }
        fold(args, add)
    });

    register_fn(env, "-", |args| {
        check_arity!(args, "-", 1..);
        if args.len() == 1 {
            return match operand(&args[0])? {
                Operand::Scalar(Scalar::Exact(r)) => Ok(Value::Rational(r.neg()?)),
                Operand::Scalar(Scalar::Inexact(n)) => Ok(Value::Number(-n)),
                Operand::Matrix(m) => Ok(Value::Matrix(Rc::new(m.negate()))),
            };
        }
        fold(args, sub)
    });

    register_fn(env, "*", |args| {
        if args.is_empty() {
            return Ok(Value::Number(1.0));
        }
        fold(args, mul)
    });

    register_fn(env, "/", |args| {
        check_arity!(args, "/", 1..);
        if args.len() == 1 {
            let one = match scalar(&args[0])? {
                Scalar::Exact(_) => Scalar::Exact(Rational::from_integer(1)),
                Scalar::Inexact(_) => Scalar::Inexact(1.0),
            };
            return Ok(div(one, scalar(&args[0])?)?.into_value());
        }
        let mut acc = scalar(&args[0])?;
        for arg in &args[1..] {
            acc = div(acc, scalar(arg)?)?;
        }
        Ok(acc.into_value())
    });

    register_fn(env, "abs", |args| {
        check_arity!(args, "abs", 1);
        Ok(match scalar(&args[0])? {
            Scalar::Exact(r) => Value::Rational(r.abs()?),
            Scalar::Inexact(n) => Value::Number(n.abs()),
        })
    });

    register_fn(env, "expt", |args| {
        check_arity!(args, "expt", 2);
        let base = scalar(&args[0])?;
        let exp = scalar(&args[1])?;
        if base.to_f64() == 0.0 && exp.to_f64() == 0.0 {
            return Err(CinderError::eval("expt: 0 raised to 0 is undefined"));
        }
        match (base, exp) {
            (Scalar::Exact(b), Scalar::Exact(e)) if e.is_integer() => {
                Ok(Value::Rational(exact_power(b, e.numerator())?))
            }
            (b, e) => Ok(Value::Number(b.to_f64().powf(e.to_f64()))),
        }
    });

    register_fn(env, "round", |args| {
        check_arity!(args, "round", 1);
        Ok(Value::Number(number_arg(&args[0])?.round()))
    });

    // Truncates toward zero.
    register_fn(env, "quotient", |args| {
        check_arity!(args, "quotient", 2);
        let (a, b) = integer_pair("quotient", args)?;
        let q = a.checked_div(b).ok_or_else(|| overflow("quotient"))?;
        Ok(Value::Number(q as f64))
    });

    // Result takes the sign of the dividend.
    register_fn(env, "remainder", |args| {
        check_arity!(args, "remainder", 2);
        let (a, b) = integer_pair("remainder", args)?;
        let r = a.checked_rem(b).ok_or_else(|| overflow("remainder"))?;
        Ok(Value::Number(r as f64))
    });

    // Result takes the sign of the divisor.
    register_fn(env, "modulo", |args| {
        check_arity!(args, "modulo", 2);
        let (a, b) = integer_pair("modulo", args)?;
        let r = a.checked_rem(b).ok_or_else(|| overflow("modulo"))?;
        let m = if r != 0 && (r < 0) != (b < 0) { r + b } else { r };
        Ok(Value::Number(m as f64))
    });
}
