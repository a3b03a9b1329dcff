//! Default single-variable expression compiler.
//!
//! Hosts can plug any `FormulaCompiler`; this one covers the usual calculator
//! syntax (`2x^2 - sin(x)/3`, `-(1/2)*x`, `sqrt(abs(x))`) with `x` as the only
//! free variable. The grammar is written with `nom` combinators.

use nom::{
    IResult,
    branch::alt,
    character::complete::{alpha1, alphanumeric0, char, digit0, digit1, multispace0, one_of},
    combinator::{cut, opt, recognize},
    error::{ErrorKind, ParseError},
    sequence::{pair, preceded, tuple},
};

use crate::core::{Evaluator, FormulaCompiler};
use crate::error::FormulaError;

#[derive(Debug, Clone, Copy, Default)]
pub struct ExpressionCompiler;

impl FormulaCompiler for ExpressionCompiler {
    fn compile(&self, formula: &str) -> Result<Box<dyn Evaluator>, FormulaError> {
        let root = parse_formula(formula).map_err(|message| FormulaError::new(formula, message))?;
        Ok(Box::new(CompiledExpression {
            formula: formula.to_owned(),
            root,
        }))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompiledExpression {
    formula: String,
    root: Expr,
}

impl Evaluator for CompiledExpression {
    fn formula(&self) -> &str {
        &self.formula
    }

    fn eval(&self, x: f64) -> Result<f64, FormulaError> {
        Ok(self.root.eval(x))
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Expr {
    Number(f64),
    Variable,
    Neg(Box<Expr>),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Call {
        function: Function,
        arg: Box<Expr>,
    },
}

impl Expr {
    fn eval(&self, x: f64) -> f64 {
        match self {
            Self::Number(value) => *value,
            Self::Variable => x,
            Self::Neg(inner) => -inner.eval(x),
            Self::Binary { op, lhs, rhs } => {
                let (a, b) = (lhs.eval(x), rhs.eval(x));
                match op {
                    BinaryOp::Add => a + b,
                    BinaryOp::Sub => a - b,
                    BinaryOp::Mul => a * b,
                    BinaryOp::Div => a / b,
                    BinaryOp::Pow => a.powf(b),
                }
            }
            Self::Call { function, arg } => function.apply(arg.eval(x)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Function {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Sqrt,
    Cbrt,
    Abs,
    Exp,
    Ln,
    Log10,
    Log2,
    Floor,
    Ceil,
    Round,
    Sign,
}

impl Function {
    fn from_name(name: &str) -> Option<Self> {
        let function = match name {
            "sin" => Self::Sin,
            "cos" => Self::Cos,
            "tan" => Self::Tan,
            "asin" => Self::Asin,
            "acos" => Self::Acos,
            "atan" => Self::Atan,
            "sinh" => Self::Sinh,
            "cosh" => Self::Cosh,
            "tanh" => Self::Tanh,
            "sqrt" => Self::Sqrt,
            "cbrt" => Self::Cbrt,
            "abs" => Self::Abs,
            "exp" => Self::Exp,
            "ln" | "log" => Self::Ln,
            "log10" => Self::Log10,
            "log2" => Self::Log2,
            "floor" => Self::Floor,
            "ceil" => Self::Ceil,
            "round" => Self::Round,
            "sign" => Self::Sign,
            _ => return None,
        };
        Some(function)
    }

    fn apply(self, v: f64) -> f64 {
        match self {
            Self::Sin => v.sin(),
            Self::Cos => v.cos(),
            Self::Tan => v.tan(),
            Self::Asin => v.asin(),
            Self::Acos => v.acos(),
            Self::Atan => v.atan(),
            Self::Sinh => v.sinh(),
            Self::Cosh => v.cosh(),
            Self::Tanh => v.tanh(),
            Self::Sqrt => v.sqrt(),
            Self::Cbrt => v.cbrt(),
            Self::Abs => v.abs(),
            Self::Exp => v.exp(),
            Self::Ln => v.ln(),
            Self::Log10 => v.log10(),
            Self::Log2 => v.log2(),
            Self::Floor => v.floor(),
            Self::Ceil => v.ceil(),
            Self::Round => v.round(),
            Self::Sign => {
                if v == 0.0 || v.is_nan() {
                    v
                } else {
                    v.signum()
                }
            }
        }
    }
}

type PResult<'a, O> = IResult<&'a str, O, SyntaxError<'a>>;

/// Where parsing stopped and why. `at` is the unparsed remainder, so the
/// byte position is `formula.len() - at.len()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SyntaxError<'a> {
    at: &'a str,
    kind: SyntaxErrorKind<'a>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SyntaxErrorKind<'a> {
    Unexpected,
    UndefinedSymbol(&'a str),
    MissingArgument(&'a str),
    Unclosed,
}

impl<'a> SyntaxError<'a> {
    fn new(at: &'a str, kind: SyntaxErrorKind<'a>) -> Self {
        Self { at, kind }
    }

    fn describe(&self, formula: &str) -> String {
        let position = formula.len() - self.at.len();
        match self.kind {
            SyntaxErrorKind::Unexpected => match self.at.chars().next() {
                Some(found) => format!("unexpected `{found}` at position {position}"),
                None => "unexpected end of expression".to_owned(),
            },
            SyntaxErrorKind::UndefinedSymbol(name) => {
                format!("undefined symbol `{name}` at position {position}")
            }
            SyntaxErrorKind::MissingArgument(name) => format!(
                "function `{name}` at position {position} expects a parenthesized argument"
            ),
            SyntaxErrorKind::Unclosed => {
                format!("parenthesis opened at position {position} is never closed")
            }
        }
    }
}

impl<'a> ParseError<&'a str> for SyntaxError<'a> {
    fn from_error_kind(input: &'a str, _kind: ErrorKind) -> Self {
        Self::new(input, SyntaxErrorKind::Unexpected)
    }

    fn append(_input: &'a str, _kind: ErrorKind, other: Self) -> Self {
        other
    }
}

fn parse_formula(formula: &str) -> Result<Expr, String> {
    let parsed = sum(formula).and_then(|(rest, root)| {
        let (rest, _) = ws(rest)?;
        if rest.is_empty() {
            Ok(root)
        } else {
            Err(nom::Err::Failure(SyntaxError::new(
                rest,
                SyntaxErrorKind::Unexpected,
            )))
        }
    });
    parsed.map_err(|err| match err {
        nom::Err::Error(err) | nom::Err::Failure(err) => err.describe(formula),
        nom::Err::Incomplete(_) => "unexpected end of expression".to_owned(),
    })
}

fn ws(input: &str) -> PResult<'_, &str> {
    multispace0(input)
}

fn operator<'a>(choices: &'static str) -> impl FnMut(&'a str) -> PResult<'a, char> {
    preceded(multispace0, one_of(choices))
}

/// `sum := product (('+' | '-') product)*`
fn sum(input: &str) -> PResult<'_, Expr> {
    let (mut input, mut acc) = product(input)?;
    loop {
        let (rest, op) = opt(operator("+-"))(input)?;
        let Some(op) = op else {
            return Ok((input, acc));
        };
        let (rest, rhs) = cut(product)(rest)?;
        let op = if op == '+' { BinaryOp::Add } else { BinaryOp::Sub };
        acc = binary(op, acc, rhs);
        input = rest;
    }
}

/// `product := unary (('*' | '/') unary | power)*`
///
/// A bare `power` after an operand is implicit multiplication (`2x`,
/// `3(x+1)`). It never starts with a sign, so `x -2` stays a subtraction.
fn product(input: &str) -> PResult<'_, Expr> {
    let (mut input, mut acc) = unary(input)?;
    loop {
        let (rest, op) = opt(operator("*/"))(input)?;
        if let Some(op) = op {
            let (rest, rhs) = cut(unary)(rest)?;
            let op = if op == '*' { BinaryOp::Mul } else { BinaryOp::Div };
            acc = binary(op, acc, rhs);
            input = rest;
            continue;
        }
        match power(input) {
            Ok((rest, rhs)) => {
                acc = binary(BinaryOp::Mul, acc, rhs);
                input = rest;
            }
            Err(nom::Err::Error(_)) => return Ok((input, acc)),
            Err(err) => return Err(err),
        }
    }
}

/// `unary := ('-' | '+') unary | power`, so `-x^2` is `-(x^2)`.
fn unary(input: &str) -> PResult<'_, Expr> {
    let (rest, sign) = opt(operator("+-"))(input)?;
    match sign {
        Some('-') => {
            let (rest, inner) = cut(unary)(rest)?;
            Ok((rest, Expr::Neg(Box::new(inner))))
        }
        Some(_) => cut(unary)(rest),
        None => power(input),
    }
}

/// `power := atom ('^' unary)?`, right-associative through `unary`.
fn power(input: &str) -> PResult<'_, Expr> {
    let (rest, base) = atom(input)?;
    let (after_caret, caret) = opt(operator("^"))(rest)?;
    if caret.is_none() {
        return Ok((rest, base));
    }
    let (rest, exponent) = cut(unary)(after_caret)?;
    Ok((rest, binary(BinaryOp::Pow, base, exponent)))
}

fn atom(input: &str) -> PResult<'_, Expr> {
    preceded(multispace0, alt((number, symbol, group)))(input)
}

fn numeral(input: &str) -> PResult<'_, &str> {
    recognize(pair(
        alt((
            recognize(pair(digit1, opt(pair(char('.'), digit0)))),
            recognize(pair(char('.'), digit1)),
        )),
        opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
    ))(input)
}

fn number(input: &str) -> PResult<'_, Expr> {
    let (rest, text) = numeral(input)?;
    match text.parse::<f64>() {
        Ok(value) => Ok((rest, Expr::Number(value))),
        Err(_) => Err(nom::Err::Failure(SyntaxError::new(
            input,
            SyntaxErrorKind::Unexpected,
        ))),
    }
}

fn name(input: &str) -> PResult<'_, &str> {
    recognize(pair(alpha1, alphanumeric0))(input)
}

/// Variable, constant or function call.
fn symbol(input: &str) -> PResult<'_, Expr> {
    let (rest, ident) = name(input)?;
    match ident {
        "x" => return Ok((rest, Expr::Variable)),
        "pi" | "PI" => return Ok((rest, Expr::Number(std::f64::consts::PI))),
        "e" | "E" => return Ok((rest, Expr::Number(std::f64::consts::E))),
        _ => {}
    }
    let Some(function) = Function::from_name(ident) else {
        return Err(nom::Err::Failure(SyntaxError::new(
            input,
            SyntaxErrorKind::UndefinedSymbol(ident),
        )));
    };

    let (open, _) = ws(rest)?;
    let Ok((rest, _)) = char::<_, SyntaxError<'_>>('(')(open) else {
        return Err(nom::Err::Failure(SyntaxError::new(
            input,
            SyntaxErrorKind::MissingArgument(ident),
        )));
    };
    let (rest, arg) = group_body(open, rest)?;
    Ok((
        rest,
        Expr::Call {
            function,
            arg: Box::new(arg),
        },
    ))
}

fn group(input: &str) -> PResult<'_, Expr> {
    let (rest, _) = char('(')(input)?;
    group_body(input, rest)
}

/// Parses the inside of a parenthesis opened at `open` and its closing `)`.
fn group_body<'a>(open: &'a str, input: &'a str) -> PResult<'a, Expr> {
    let (rest, inner) = cut(sum)(input)?;
    let (rest, _) = ws(rest)?;
    match char::<_, SyntaxError<'_>>(')')(rest) {
        Ok((rest, _)) => Ok((rest, inner)),
        Err(_) if rest.is_empty() => Err(nom::Err::Failure(SyntaxError::new(
            open,
            SyntaxErrorKind::Unclosed,
        ))),
        Err(_) => Err(nom::Err::Failure(SyntaxError::new(
            rest,
            SyntaxErrorKind::Unexpected,
        ))),
    }
}

fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}
