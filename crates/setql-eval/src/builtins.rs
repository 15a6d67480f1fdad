//! The builtins table.
//!
//! Operators, casts, and functions are stored in one keyed table of
//! *lifted* implementations: closures from argument multisets to a
//! result multiset. The per-argument cardinality signature is data,
//! consulted both here (to shape the lift) and by the path analyzer
//! (to classify argument positions).

use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::LazyLock;

use rand::rngs::{StdRng, SysRng};
use rand::{RngExt, SeedableRng};

use crate::error::{EvalError, Result};
use crate::value::{dedup, Value};

/// A per-argument cardinality modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// The whole argument multiset is passed in once; the argument is
    /// evaluated as an independent subquery.
    SetOf,
    /// The argument is passed as a zero-or-one multiset.
    Optional,
    /// The argument is element-wise lifted.
    Singleton,
}

/// The namespace a builtin lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinKind {
    /// Binary operators (and the `IF .. ELSE` ternary).
    Binary,
    /// Unary operators.
    Unary,
    /// Type casts.
    Cast,
    /// Functions.
    Function,
}

impl BuiltinKind {
    /// Returns the kind's name for error messages.
    #[must_use]
    pub const fn describe(&self) -> &'static str {
        match self {
            Self::Binary => "operator",
            Self::Unary => "unary operator",
            Self::Cast => "cast",
            Self::Function => "function",
        }
    }
}

/// A lifted implementation: argument multisets in, result multiset out.
pub type LiftedFn = Box<dyn Fn(&[Vec<Value>]) -> Result<Vec<Value>> + Send + Sync>;

use Cardinality::{Optional, SetOf, Singleton};

/// Cardinality signatures. Only builtins with a non-default signature
/// are listed; everything else is element-wise (all `Singleton`).
static SIGNATURES: &[(&str, &[Cardinality])] = &[
    ("count", &[SetOf]),
    ("sum", &[SetOf]),
    ("min", &[SetOf]),
    ("max", &[SetOf]),
    ("all", &[SetOf]),
    ("any", &[SetOf]),
    ("enumerate", &[SetOf]),
    ("IN", &[Singleton, SetOf]),
    ("??", &[Optional, SetOf]),
    ("EXISTS", &[SetOf]),
    ("DISTINCT", &[SetOf]),
    ("IF", &[SetOf, Singleton, SetOf]),
    ("UNION", &[SetOf, SetOf]),
    ("?=", &[Optional, Optional]),
    ("?!=", &[Optional, Optional]),
];

/// Looks up a builtin's cardinality signature, if it has a non-default
/// one.
#[must_use]
pub fn signature(name: &str) -> Option<&'static [Cardinality]> {
    SIGNATURES.iter().find(|(n, _)| *n == name).map(|(_, s)| *s)
}

/// Looks up a builtin's lifted implementation.
#[must_use]
pub fn lookup(kind: BuiltinKind, name: &str) -> Option<&'static LiftedFn> {
    IMPLS.get(&kind).and_then(|table| table.get(name))
}

thread_local! {
    static RNG: RefCell<StdRng> = RefCell::new(StdRng::try_from_rng(&mut SysRng).unwrap());
}

/// Re-seeds the source used by the `random()` builtin, making
/// subsequent draws on this thread reproducible.
pub fn seed_random(seed: u64) {
    RNG.with(|rng| *rng.borrow_mut() = StdRng::seed_from_u64(seed));
}

// ===================================================================
// Lifting
// ===================================================================

/// Enumerates the Cartesian product of the argument multisets, in
/// declared argument order. Any empty argument yields no combinations;
/// zero arguments yield one empty combination.
pub(crate) fn cartesian_product(args: &[Vec<Value>]) -> Vec<Vec<Value>> {
    let mut combos: Vec<Vec<Value>> = vec![Vec::new()];
    for arg in args {
        let mut next = Vec::with_capacity(combos.len() * arg.len());
        for combo in &combos {
            for value in arg {
                let mut extended = combo.clone();
                extended.push(value.clone());
                next.push(extended);
            }
        }
        combos = next;
    }
    combos
}

/// Element-wise lift of a scalar kernel: the kernel is applied to every
/// combination of the argument multisets.
fn lift<F>(kernel: F) -> LiftedFn
where
    F: Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
{
    Box::new(move |args| {
        let mut out = Vec::new();
        for combo in cartesian_product(args) {
            out.push(kernel(&combo)?);
        }
        Ok(out)
    })
}

/// Set-of lift of an aggregate kernel: the kernel sees the whole
/// multiset once and contributes exactly one element.
fn lift_set_of<F>(kernel: F) -> LiftedFn
where
    F: Fn(&[Vec<Value>]) -> Result<Value> + Send + Sync + 'static,
{
    Box::new(move |args| Ok(vec![kernel(args)?]))
}

fn one_set<'a>(args: &'a [Vec<Value>], name: &str) -> Result<&'a [Value]> {
    match args {
        [s] => Ok(s),
        _ => Err(EvalError::TypeError(format!("{name} takes 1 argument"))),
    }
}

fn two_sets<'a>(args: &'a [Vec<Value>], name: &str) -> Result<(&'a [Value], &'a [Value])> {
    match args {
        [x, y] => Ok((x, y)),
        _ => Err(EvalError::TypeError(format!("{name} takes 2 arguments"))),
    }
}

// ===================================================================
// Scalar kernels
// ===================================================================

fn int_overflow() -> EvalError {
    EvalError::TypeError("integer overflow".to_owned())
}

fn numeric_pair(name: &str, args: &[Value]) -> Result<(Value, Value)> {
    match args {
        [a, b] if a.as_f64().is_some() && b.as_f64().is_some() => Ok((a.clone(), b.clone())),
        [a, b] => Err(EvalError::TypeError(format!(
            "'{name}' is not defined on {} and {}",
            a.type_name(),
            b.type_name()
        ))),
        _ => Err(EvalError::TypeError(format!("'{name}' takes 2 arguments"))),
    }
}

fn kernel_add(args: &[Value]) -> Result<Value> {
    match numeric_pair("+", args)? {
        (Value::Int(a), Value::Int(b)) => a.checked_add(b).map(Value::Int).ok_or_else(int_overflow),
        (a, b) => Ok(Value::Float(a.as_f64().unwrap_or(0.0) + b.as_f64().unwrap_or(0.0))),
    }
}

fn kernel_sub(args: &[Value]) -> Result<Value> {
    match numeric_pair("-", args)? {
        (Value::Int(a), Value::Int(b)) => a.checked_sub(b).map(Value::Int).ok_or_else(int_overflow),
        (a, b) => Ok(Value::Float(a.as_f64().unwrap_or(0.0) - b.as_f64().unwrap_or(0.0))),
    }
}

fn kernel_mul(args: &[Value]) -> Result<Value> {
    match numeric_pair("*", args)? {
        (Value::Int(a), Value::Int(b)) => a.checked_mul(b).map(Value::Int).ok_or_else(int_overflow),
        (a, b) => Ok(Value::Float(a.as_f64().unwrap_or(0.0) * b.as_f64().unwrap_or(0.0))),
    }
}

fn division_by_zero() -> EvalError {
    EvalError::TypeError("division by zero".to_owned())
}

/// True division always yields a float.
fn kernel_div(args: &[Value]) -> Result<Value> {
    let (a, b) = numeric_pair("/", args)?;
    let (x, y) = (a.as_f64().unwrap_or(0.0), b.as_f64().unwrap_or(0.0));
    if y == 0.0 {
        return Err(division_by_zero());
    }
    Ok(Value::Float(x / y))
}

/// Floored integer quotient: rounds toward negative infinity.
fn floor_div_i64(a: i64, b: i64) -> i64 {
    let q = a / b;
    if a % b != 0 && (a < 0) != (b < 0) {
        q - 1
    } else {
        q
    }
}

fn kernel_floor_div(args: &[Value]) -> Result<Value> {
    match numeric_pair("//", args)? {
        (Value::Int(a), Value::Int(b)) => {
            if b == 0 {
                return Err(division_by_zero());
            }
            Ok(Value::Int(floor_div_i64(a, b)))
        }
        (a, b) => {
            let (x, y) = (a.as_f64().unwrap_or(0.0), b.as_f64().unwrap_or(0.0));
            if y == 0.0 {
                return Err(division_by_zero());
            }
            Ok(Value::Float((x / y).floor()))
        }
    }
}

/// Floored remainder: the sign follows the divisor.
fn kernel_mod(args: &[Value]) -> Result<Value> {
    match numeric_pair("%", args)? {
        (Value::Int(a), Value::Int(b)) => {
            if b == 0 {
                return Err(division_by_zero());
            }
            Ok(Value::Int(((a % b) + b) % b))
        }
        (a, b) => {
            let (x, y) = (a.as_f64().unwrap_or(0.0), b.as_f64().unwrap_or(0.0));
            if y == 0.0 {
                return Err(division_by_zero());
            }
            Ok(Value::Float(x - (x / y).floor() * y))
        }
    }
}

fn kernel_pow(args: &[Value]) -> Result<Value> {
    match numeric_pair("^", args)? {
        (Value::Int(a), Value::Int(b)) if b >= 0 => {
            let exp = u32::try_from(b).map_err(|_| int_overflow())?;
            a.checked_pow(exp).map(Value::Int).ok_or_else(int_overflow)
        }
        (a, b) => Ok(Value::Float(
            a.as_f64().unwrap_or(0.0).powf(b.as_f64().unwrap_or(0.0)),
        )),
    }
}

fn kernel_concat(args: &[Value]) -> Result<Value> {
    match args {
        [Value::Str(a), Value::Str(b)] => Ok(Value::Str(format!("{a}{b}"))),
        [Value::List(a), Value::List(b)] => {
            let mut out = a.clone();
            out.extend(b.iter().cloned());
            Ok(Value::List(out))
        }
        [a, b] => Err(EvalError::TypeError(format!(
            "'++' is not defined on {} and {}",
            a.type_name(),
            b.type_name()
        ))),
        _ => Err(EvalError::TypeError("'++' takes 2 arguments".to_owned())),
    }
}

fn kernel_eq(args: &[Value]) -> Result<Value> {
    match args {
        [a, b] => Ok(Value::Bool(a == b)),
        _ => Err(EvalError::TypeError("'=' takes 2 arguments".to_owned())),
    }
}

fn kernel_ne(args: &[Value]) -> Result<Value> {
    match args {
        [a, b] => Ok(Value::Bool(a != b)),
        _ => Err(EvalError::TypeError("'!=' takes 2 arguments".to_owned())),
    }
}

fn comparison(args: &[Value], name: &str, accept: fn(Ordering) -> bool) -> Result<Value> {
    match args {
        [a, b] => Ok(Value::Bool(accept(a.compare(b)?))),
        _ => Err(EvalError::TypeError(format!("'{name}' takes 2 arguments"))),
    }
}

fn bool_pair(name: &str, args: &[Value]) -> Result<(bool, bool)> {
    match args {
        [Value::Bool(a), Value::Bool(b)] => Ok((*a, *b)),
        [a, b] => Err(EvalError::TypeError(format!(
            "'{name}' is not defined on {} and {}",
            a.type_name(),
            b.type_name()
        ))),
        _ => Err(EvalError::TypeError(format!("'{name}' takes 2 arguments"))),
    }
}

fn kernel_neg(args: &[Value]) -> Result<Value> {
    match args {
        [Value::Int(a)] => a.checked_neg().map(Value::Int).ok_or_else(int_overflow),
        [Value::Float(a)] => Ok(Value::Float(-a)),
        [a] => Err(EvalError::TypeError(format!(
            "unary '-' is not defined on {}",
            a.type_name()
        ))),
        _ => Err(EvalError::TypeError("unary '-' takes 1 argument".to_owned())),
    }
}

fn kernel_pos(args: &[Value]) -> Result<Value> {
    match args {
        [v @ (Value::Int(_) | Value::Float(_))] => Ok(v.clone()),
        [a] => Err(EvalError::TypeError(format!(
            "unary '+' is not defined on {}",
            a.type_name()
        ))),
        _ => Err(EvalError::TypeError("unary '+' takes 1 argument".to_owned())),
    }
}

fn kernel_not(args: &[Value]) -> Result<Value> {
    match args {
        [Value::Bool(a)] => Ok(Value::Bool(!a)),
        [a] => Err(EvalError::TypeError(format!(
            "NOT is not defined on {}",
            a.type_name()
        ))),
        _ => Err(EvalError::TypeError("NOT takes 1 argument".to_owned())),
    }
}

fn kernel_len(args: &[Value]) -> Result<Value> {
    let n = match args {
        [Value::Str(s)] => s.chars().count(),
        [Value::Tuple(xs) | Value::List(xs)] => xs.len(),
        [Value::NamedTuple(fields)] => fields.len(),
        [a] => {
            return Err(EvalError::TypeError(format!(
                "len is not defined on {}",
                a.type_name()
            )))
        }
        _ => return Err(EvalError::TypeError("len takes 1 argument".to_owned())),
    };
    Ok(Value::Int(i64::try_from(n).map_err(|_| int_overflow())?))
}

fn kernel_contains(args: &[Value]) -> Result<Value> {
    match args {
        [Value::Str(haystack), Value::Str(needle)] => {
            Ok(Value::Bool(haystack.contains(needle.as_str())))
        }
        [Value::Tuple(xs) | Value::List(xs), needle] => Ok(Value::Bool(xs.contains(needle))),
        [a, _] => Err(EvalError::TypeError(format!(
            "contains is not defined on {}",
            a.type_name()
        ))),
        _ => Err(EvalError::TypeError(
            "contains takes 2 arguments".to_owned(),
        )),
    }
}

/// Rounds half to even and yields an integer.
fn kernel_round(args: &[Value]) -> Result<Value> {
    match args {
        [Value::Int(a)] => Ok(Value::Int(*a)),
        [Value::Float(a)] => {
            if !a.is_finite() {
                return Err(EvalError::TypeError(format!("cannot round {a}")));
            }
            let rounded = a.round_ties_even();
            if rounded < i64::MIN as f64 || rounded > i64::MAX as f64 {
                return Err(int_overflow());
            }
            Ok(Value::Int(rounded as i64))
        }
        [a] => Err(EvalError::TypeError(format!(
            "round is not defined on {}",
            a.type_name()
        ))),
        _ => Err(EvalError::TypeError("round takes 1 argument".to_owned())),
    }
}

fn kernel_random(args: &[Value]) -> Result<Value> {
    if !args.is_empty() {
        return Err(EvalError::TypeError("random takes no arguments".to_owned()));
    }
    Ok(Value::Float(RNG.with(|rng| rng.borrow_mut().random::<f64>())))
}

// ===================================================================
// Casts
// ===================================================================

fn cast_str(args: &[Value]) -> Result<Value> {
    match args {
        [Value::Str(s)] => Ok(Value::Str(s.clone())),
        [Value::Int(i)] => Ok(Value::Str(i.to_string())),
        [Value::Float(f)] => Ok(Value::Str(f.to_string())),
        [Value::Bool(b)] => Ok(Value::Str(if *b { "true" } else { "false" }.to_owned())),
        [Value::Uuid(u)] => Ok(Value::Str(u.to_string())),
        [a] => Err(EvalError::TypeError(format!(
            "cannot cast {} to str",
            a.type_name()
        ))),
        _ => Err(EvalError::TypeError("<str> takes 1 argument".to_owned())),
    }
}

fn cast_int(args: &[Value]) -> Result<Value> {
    match args {
        [Value::Int(i)] => Ok(Value::Int(*i)),
        [Value::Float(f)] => {
            if !f.is_finite() {
                return Err(EvalError::TypeError(format!("cannot cast {f} to int")));
            }
            Ok(Value::Int(f.trunc() as i64))
        }
        [Value::Str(s)] => s
            .trim()
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| EvalError::TypeError(format!("cannot cast '{s}' to int"))),
        [Value::Bool(b)] => Ok(Value::Int(i64::from(*b))),
        [a] => Err(EvalError::TypeError(format!(
            "cannot cast {} to int",
            a.type_name()
        ))),
        _ => Err(EvalError::TypeError("int cast takes 1 argument".to_owned())),
    }
}

// ===================================================================
// Set-level implementations
// ===================================================================

fn opt_compare(args: &[Vec<Value>], name: &'static str, negated: bool) -> Result<Vec<Value>> {
    let (x, y) = two_sets(args, name)?;
    if x.is_empty() || y.is_empty() {
        let same = x.len() == y.len();
        return Ok(vec![Value::Bool(same != negated)]);
    }
    let mut out = Vec::with_capacity(x.len() * y.len());
    for a in x {
        for b in y {
            out.push(Value::Bool((a == b) != negated));
        }
    }
    Ok(out)
}

fn impl_membership(args: &[Vec<Value>]) -> Result<Vec<Value>> {
    let (elems, set) = two_sets(args, "IN")?;
    Ok(elems
        .iter()
        .map(|e| Value::Bool(set.contains(e)))
        .collect())
}

fn impl_coalesce(args: &[Vec<Value>]) -> Result<Vec<Value>> {
    let (x, y) = two_sets(args, "??")?;
    Ok(if x.is_empty() { y.to_vec() } else { x.to_vec() })
}

fn impl_union(args: &[Vec<Value>]) -> Result<Vec<Value>> {
    let (x, y) = two_sets(args, "UNION")?;
    let mut out = x.to_vec();
    out.extend(y.iter().cloned());
    Ok(out)
}

fn impl_if_else(args: &[Vec<Value>]) -> Result<Vec<Value>> {
    let [then_set, conds, else_set] = args else {
        return Err(EvalError::TypeError("IF takes 3 arguments".to_owned()));
    };
    let mut out = Vec::new();
    for cond in conds {
        if cond.is_truthy() {
            out.extend(then_set.iter().cloned());
        } else {
            out.extend(else_set.iter().cloned());
        }
    }
    Ok(out)
}

fn impl_distinct(args: &[Vec<Value>]) -> Result<Vec<Value>> {
    Ok(dedup(one_set(args, "DISTINCT")?.to_vec()))
}

fn impl_enumerate(args: &[Vec<Value>]) -> Result<Vec<Value>> {
    Ok(one_set(args, "enumerate")?
        .iter()
        .enumerate()
        .map(|(i, v)| Value::Tuple(vec![Value::Int(i as i64), v.clone()]))
        .collect())
}

fn agg_count(args: &[Vec<Value>]) -> Result<Value> {
    let set = one_set(args, "count")?;
    Ok(Value::Int(i64::try_from(set.len()).map_err(|_| int_overflow())?))
}

fn agg_sum(args: &[Vec<Value>]) -> Result<Value> {
    let set = one_set(args, "sum")?;
    if set.iter().all(|v| matches!(v, Value::Int(_))) {
        let mut total = 0_i64;
        for v in set {
            total = total
                .checked_add(v.as_int().unwrap_or(0))
                .ok_or_else(int_overflow)?;
        }
        return Ok(Value::Int(total));
    }
    let mut total = 0.0;
    for v in set {
        total += v.as_f64().ok_or_else(|| {
            EvalError::TypeError(format!("sum is not defined on {}", v.type_name()))
        })?;
    }
    Ok(Value::Float(total))
}

fn agg_extreme(args: &[Vec<Value>], name: &'static str, keep: Ordering) -> Result<Value> {
    let set = one_set(args, name)?;
    let mut best: Option<&Value> = None;
    for v in set {
        best = match best {
            None => Some(v),
            // Strict comparison keeps the first of equal values.
            Some(b) => {
                if v.compare(b)? == keep {
                    Some(v)
                } else {
                    Some(b)
                }
            }
        };
    }
    best.cloned()
        .ok_or_else(|| EvalError::TypeError(format!("{name} of an empty set is undefined")))
}

fn agg_all(args: &[Vec<Value>]) -> Result<Value> {
    Ok(Value::Bool(
        one_set(args, "all")?.iter().all(Value::is_truthy),
    ))
}

fn agg_any(args: &[Vec<Value>]) -> Result<Value> {
    Ok(Value::Bool(
        one_set(args, "any")?.iter().any(Value::is_truthy),
    ))
}

fn impl_exists(args: &[Vec<Value>]) -> Result<Vec<Value>> {
    Ok(vec![Value::Bool(!one_set(args, "EXISTS")?.is_empty())])
}

// ===================================================================
// The table
// ===================================================================

static IMPLS: LazyLock<HashMap<BuiltinKind, HashMap<&'static str, LiftedFn>>> =
    LazyLock::new(build_table);

fn build_table() -> HashMap<BuiltinKind, HashMap<&'static str, LiftedFn>> {
    let mut binary: HashMap<&'static str, LiftedFn> = HashMap::new();
    binary.insert("+", lift(kernel_add));
    binary.insert("-", lift(kernel_sub));
    binary.insert("*", lift(kernel_mul));
    binary.insert("/", lift(kernel_div));
    binary.insert("//", lift(kernel_floor_div));
    binary.insert("%", lift(kernel_mod));
    binary.insert("^", lift(kernel_pow));
    binary.insert("++", lift(kernel_concat));
    binary.insert("=", lift(kernel_eq));
    binary.insert("!=", lift(kernel_ne));
    binary.insert("<", lift(|args| comparison(args, "<", Ordering::is_lt)));
    binary.insert("<=", lift(|args| comparison(args, "<=", Ordering::is_le)));
    binary.insert(">", lift(|args| comparison(args, ">", Ordering::is_gt)));
    binary.insert(">=", lift(|args| comparison(args, ">=", Ordering::is_ge)));
    binary.insert(
        "OR",
        lift(|args| bool_pair("OR", args).map(|(a, b)| Value::Bool(a || b))),
    );
    binary.insert(
        "AND",
        lift(|args| bool_pair("AND", args).map(|(a, b)| Value::Bool(a && b))),
    );
    binary.insert("?=", Box::new(|args| opt_compare(args, "?=", false)));
    binary.insert("?!=", Box::new(|args| opt_compare(args, "?!=", true)));
    binary.insert("IN", Box::new(impl_membership));
    binary.insert("??", Box::new(impl_coalesce));
    binary.insert("UNION", Box::new(impl_union));
    binary.insert("IF", Box::new(impl_if_else));

    let mut unary: HashMap<&'static str, LiftedFn> = HashMap::new();
    unary.insert("-", lift(kernel_neg));
    unary.insert("+", lift(kernel_pos));
    unary.insert("NOT", lift(kernel_not));
    unary.insert("EXISTS", Box::new(impl_exists));
    unary.insert("DISTINCT", Box::new(impl_distinct));

    let mut cast: HashMap<&'static str, LiftedFn> = HashMap::new();
    cast.insert("str", lift(cast_str));
    cast.insert("int32", lift(cast_int));
    cast.insert("int64", lift(cast_int));

    let mut function: HashMap<&'static str, LiftedFn> = HashMap::new();
    function.insert("enumerate", Box::new(impl_enumerate));
    function.insert("count", lift_set_of(agg_count));
    function.insert("sum", lift_set_of(agg_sum));
    function.insert(
        "min",
        lift_set_of(|args| agg_extreme(args, "min", Ordering::Less)),
    );
    function.insert(
        "max",
        lift_set_of(|args| agg_extreme(args, "max", Ordering::Greater)),
    );
    function.insert("all", lift_set_of(agg_all));
    function.insert("any", lift_set_of(agg_any));
    function.insert("len", lift(kernel_len));
    function.insert("random", lift(kernel_random));
    function.insert("contains", lift(kernel_contains));
    function.insert("round", lift(kernel_round));

    let mut table = HashMap::new();
    table.insert(BuiltinKind::Binary, binary);
    table.insert(BuiltinKind::Unary, unary);
    table.insert(BuiltinKind::Cast, cast);
    table.insert(BuiltinKind::Function, function);
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(vals: &[i64]) -> Vec<Value> {
        vals.iter().copied().map(Value::Int).collect()
    }

    fn apply(kind: BuiltinKind, name: &str, args: &[Vec<Value>]) -> Vec<Value> {
        lookup(kind, name).expect("builtin should exist")(args).expect("builtin should succeed")
    }

    #[test]
    fn element_wise_lift_is_a_cross_product() {
        let out = apply(BuiltinKind::Binary, "+", &[ints(&[1, 2]), ints(&[10, 20, 30])]);
        assert_eq!(out.len(), 6);
        assert_eq!(out[0], Value::Int(11));
        assert_eq!(out[5], Value::Int(32));
    }

    #[test]
    fn element_wise_lift_of_empty_is_empty() {
        let out = apply(BuiltinKind::Binary, "+", &[ints(&[1, 2]), Vec::new()]);
        assert!(out.is_empty());
    }

    #[test]
    fn optional_eq_on_empty_operands() {
        let out = apply(BuiltinKind::Binary, "?=", &[Vec::new(), Vec::new()]);
        assert_eq!(out, vec![Value::Bool(true)]);
        let out = apply(BuiltinKind::Binary, "?=", &[Vec::new(), ints(&[1])]);
        assert_eq!(out, vec![Value::Bool(false)]);
        let out = apply(BuiltinKind::Binary, "?=", &[ints(&[1]), ints(&[1])]);
        assert_eq!(out, vec![Value::Bool(true)]);
    }

    #[test]
    fn coalesce_prefers_the_left_operand() {
        let out = apply(BuiltinKind::Binary, "??", &[ints(&[1, 2]), ints(&[9])]);
        assert_eq!(out, ints(&[1, 2]));
        let out = apply(BuiltinKind::Binary, "??", &[Vec::new(), ints(&[9])]);
        assert_eq!(out, ints(&[9]));
    }

    #[test]
    fn membership_has_left_cardinality() {
        let out = apply(BuiltinKind::Binary, "IN", &[ints(&[1, 5, 1]), ints(&[1, 2, 3])]);
        assert_eq!(
            out,
            vec![Value::Bool(true), Value::Bool(false), Value::Bool(true)]
        );
    }

    #[test]
    fn if_else_switches_per_condition() {
        let conds = vec![Value::Bool(true), Value::Bool(false)];
        let out = apply(BuiltinKind::Binary, "IF", &[ints(&[1]), conds, ints(&[8, 9])]);
        assert_eq!(out, ints(&[1, 8, 9]));
    }

    #[test]
    fn distinct_preserves_first_occurrence_order() {
        let out = apply(BuiltinKind::Unary, "DISTINCT", &[ints(&[3, 1, 3, 2, 1])]);
        assert_eq!(out, ints(&[3, 1, 2]));
    }

    #[test]
    fn aggregates_yield_one_element() {
        for name in ["count", "sum", "all", "any"] {
            let out = apply(BuiltinKind::Function, name, &[ints(&[1, 2, 3])]);
            assert_eq!(out.len(), 1, "{name}");
            let out = apply(BuiltinKind::Function, name, &[Vec::new()]);
            assert_eq!(out.len(), 1, "{name} on empty");
        }
        assert_eq!(
            apply(BuiltinKind::Function, "count", &[ints(&[4, 4])]),
            ints(&[2])
        );
        assert_eq!(
            apply(BuiltinKind::Function, "sum", &[Vec::new()]),
            ints(&[0])
        );
    }

    #[test]
    fn min_max_pick_extremes_and_reject_empty() {
        assert_eq!(
            apply(BuiltinKind::Function, "min", &[ints(&[3, 1, 2])]),
            ints(&[1])
        );
        assert_eq!(
            apply(BuiltinKind::Function, "max", &[ints(&[3, 1, 2])]),
            ints(&[3])
        );
        let f = lookup(BuiltinKind::Function, "min").unwrap();
        assert!(f(&[Vec::new()]).is_err());
    }

    #[test]
    fn enumerate_pairs_values_with_indexes() {
        let out = apply(BuiltinKind::Function, "enumerate", &[ints(&[7, 8])]);
        assert_eq!(
            out,
            vec![
                Value::Tuple(vec![Value::Int(0), Value::Int(7)]),
                Value::Tuple(vec![Value::Int(1), Value::Int(8)]),
            ]
        );
    }

    #[test]
    fn floored_division_and_modulo() {
        assert_eq!(
            apply(BuiltinKind::Binary, "//", &[ints(&[-7]), ints(&[3])]),
            ints(&[-3])
        );
        assert_eq!(
            apply(BuiltinKind::Binary, "%", &[ints(&[-7]), ints(&[3])]),
            ints(&[2])
        );
        assert_eq!(
            apply(BuiltinKind::Binary, "%", &[ints(&[7]), ints(&[-3])]),
            ints(&[-2])
        );
        let f = lookup(BuiltinKind::Binary, "//").unwrap();
        assert!(f(&[ints(&[1]), ints(&[0])]).is_err());
    }

    #[test]
    fn round_is_half_to_even() {
        let halves = vec![Value::Float(0.5), Value::Float(1.5), Value::Float(2.5)];
        let out = apply(BuiltinKind::Function, "round", &[halves]);
        assert_eq!(out, ints(&[0, 2, 2]));
    }

    #[test]
    fn casts() {
        let out = apply(BuiltinKind::Cast, "int64", &[vec![Value::from("  42 ")]]);
        assert_eq!(out, ints(&[42]));
        let out = apply(BuiltinKind::Cast, "str", &[vec![Value::Bool(true)]]);
        assert_eq!(out, vec![Value::from("true")]);
        let f = lookup(BuiltinKind::Cast, "int64").unwrap();
        assert!(f(&[vec![Value::from("four")]]).is_err());
    }

    #[test]
    fn seeded_random_is_reproducible() {
        seed_random(42);
        let a = apply(BuiltinKind::Function, "random", &[]);
        seed_random(42);
        let b = apply(BuiltinKind::Function, "random", &[]);
        assert_eq!(a, b);
        match &a[0] {
            Value::Float(f) => assert!((0.0..1.0).contains(f)),
            other => panic!("expected float, got {other:?}"),
        }
    }
}
