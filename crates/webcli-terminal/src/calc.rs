//! Arithmetic expression evaluator behind `calc`.
//!
//! Recursive descent over a token list. Supports `+ - * / %`, `**` and `^`
//! (right-associative power), parentheses, unary signs, the constants
//! `PI` and `E`, and a handful of math functions. Names may carry a
//! `Math.` prefix.

use std::iter::Peekable;
use std::str::Chars;

/// Parenthesis/function nesting limit.
const EXPR_MAX_DEPTH: usize = 64;

type EvalResult = std::result::Result<f64, String>;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Num(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Pow,
    LParen,
    RParen,
    Comma,
}

/// Evaluate an expression.
pub fn eval_expr(input: &str) -> EvalResult {
    let tokens = tokenize_expr(input)?;
    if tokens.is_empty() {
        return Err("empty expression".to_string());
    }
    let mut parser = Parser { tokens, pos: 0 };
    let value = parser.parse_add_sub(0)?;
    if let Some(tok) = parser.tokens.get(parser.pos) {
        return Err(format!("unexpected token: {}", describe(tok)));
    }
    Ok(value)
}

/// Render a result the way a JavaScript console would: integral values
/// without a decimal point, non-finite values by name.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if value.fract() == 0.0 && value.abs() < 1e15 {
        // Normalizes -0 as well.
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

fn describe(tok: &Token) -> String {
    match tok {
        Token::Num(n) => format_number(*n),
        Token::Ident(s) => s.clone(),
        Token::Plus => "+".into(),
        Token::Minus => "-".into(),
        Token::Star => "*".into(),
        Token::Slash => "/".into(),
        Token::Percent => "%".into(),
        Token::Pow => "**".into(),
        Token::LParen => "(".into(),
        Token::RParen => ")".into(),
        Token::Comma => ",".into(),
    }
}

fn tokenize_expr(input: &str) -> std::result::Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();
    while let Some(&ch) = chars.peek() {
        match ch {
            c if c.is_whitespace() => {
                chars.next();
            },
            c if c.is_ascii_digit() || c == '.' => tokens.push(Token::Num(read_number(&mut chars)?)),
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut name = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_ascii_alphanumeric() || c == '_' || c == '.' {
                        name.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(name));
            },
            '*' => {
                chars.next();
                if chars.peek() == Some(&'*') {
                    chars.next();
                    tokens.push(Token::Pow);
                } else {
                    tokens.push(Token::Star);
                }
            },
            _ => {
                let tok = match ch {
                    '+' => Token::Plus,
                    '-' => Token::Minus,
                    '/' => Token::Slash,
                    '%' => Token::Percent,
                    '^' => Token::Pow,
                    '(' => Token::LParen,
                    ')' => Token::RParen,
                    ',' => Token::Comma,
                    other => return Err(format!("unexpected character: {other}")),
                };
                chars.next();
                tokens.push(tok);
            },
        }
    }
    Ok(tokens)
}

fn read_number(chars: &mut Peekable<Chars<'_>>) -> EvalResult {
    let mut num = String::new();
    while let Some(&c) = chars.peek() {
        if c.is_ascii_digit() || c == '.' {
            num.push(c);
            chars.next();
        } else {
            break;
        }
    }
    // Exponent part: 1e3, 2.5E-4
    if matches!(chars.peek(), Some('e' | 'E')) {
        let mut lookahead = chars.clone();
        lookahead.next();
        let mut exp = String::from("e");
        if let Some(&sign) = lookahead.peek()
            && (sign == '+' || sign == '-')
        {
            exp.push(sign);
            lookahead.next();
        }
        if lookahead.peek().is_some_and(char::is_ascii_digit) {
            while let Some(&c) = lookahead.peek() {
                if !c.is_ascii_digit() {
                    break;
                }
                exp.push(c);
                lookahead.next();
            }
            num.push_str(&exp);
            *chars = lookahead;
        }
    }
    num.parse().map_err(|_| format!("invalid number: {num}"))
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn eat(&mut self, tok: &Token) -> bool {
        if self.peek() == Some(tok) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn parse_add_sub(&mut self, depth: usize) -> EvalResult {
        let mut left = self.parse_mul_div(depth)?;
        loop {
            if self.eat(&Token::Plus) {
                left += self.parse_mul_div(depth)?;
            } else if self.eat(&Token::Minus) {
                left -= self.parse_mul_div(depth)?;
            } else {
                return Ok(left);
            }
        }
    }

    fn parse_mul_div(&mut self, depth: usize) -> EvalResult {
        let mut left = self.parse_unary(depth)?;
        loop {
            let op = match self.peek() {
                Some(op @ (Token::Star | Token::Slash | Token::Percent)) => op.clone(),
                _ => return Ok(left),
            };
            self.pos += 1;
            let right = self.parse_unary(depth)?;
            match op {
                Token::Star => left *= right,
                Token::Slash | Token::Percent if right == 0.0 => {
                    return Err("division by zero".to_string());
                },
                Token::Slash => left /= right,
                _ => left %= right,
            }
        }
    }

    fn parse_unary(&mut self, depth: usize) -> EvalResult {
        if depth >= EXPR_MAX_DEPTH {
            return Err("expression too deeply nested".to_string());
        }
        if self.eat(&Token::Minus) {
            Ok(-self.parse_unary(depth + 1)?)
        } else if self.eat(&Token::Plus) {
            self.parse_unary(depth + 1)
        } else {
            self.parse_power(depth)
        }
    }

    fn parse_power(&mut self, depth: usize) -> EvalResult {
        let base = self.parse_primary(depth)?;
        if self.eat(&Token::Pow) {
            let exp = self.parse_unary(depth + 1)?;
            Ok(base.powf(exp))
        } else {
            Ok(base)
        }
    }

    fn parse_primary(&mut self, depth: usize) -> EvalResult {
        let tok = self
            .peek()
            .cloned()
            .ok_or_else(|| "unexpected end of expression".to_string())?;
        self.pos += 1;
        match tok {
            Token::Num(n) => Ok(n),
            Token::LParen => {
                if depth >= EXPR_MAX_DEPTH {
                    return Err("expression too deeply nested".to_string());
                }
                let val = self.parse_add_sub(depth + 1)?;
                if !self.eat(&Token::RParen) {
                    return Err("missing closing parenthesis".to_string());
                }
                Ok(val)
            },
            Token::Ident(raw) => {
                let name = raw.strip_prefix("Math.").unwrap_or(&raw).to_ascii_lowercase();
                if self.eat(&Token::LParen) {
                    let args = self.parse_args(depth + 1)?;
                    call(&name, &args)
                } else {
                    constant(&name).ok_or_else(|| format!("{raw} is not defined"))
                }
            },
            other => Err(format!("unexpected token: {}", describe(&other))),
        }
    }

    /// Comma-separated arguments up to and including the closing paren.
    fn parse_args(&mut self, depth: usize) -> std::result::Result<Vec<f64>, String> {
        let mut args = Vec::new();
        if self.eat(&Token::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.parse_add_sub(depth)?);
            if self.eat(&Token::Comma) {
                continue;
            }
            if self.eat(&Token::RParen) {
                return Ok(args);
            }
            return Err("missing closing parenthesis".to_string());
        }
    }
}

fn constant(name: &str) -> Option<f64> {
    match name {
        "pi" => Some(std::f64::consts::PI),
        "e" => Some(std::f64::consts::E),
        _ => None,
    }
}

fn call(name: &str, args: &[f64]) -> EvalResult {
    let unary = |f: fn(f64) -> f64| match args {
        [x] => Ok(f(*x)),
        _ => Err(format!("{name} expects 1 argument")),
    };
    match name {
        "sqrt" => unary(f64::sqrt),
        "abs" => unary(f64::abs),
        "floor" => unary(f64::floor),
        "ceil" => unary(f64::ceil),
        "round" => unary(|x| (x + 0.5).floor()),
        "sin" => unary(f64::sin),
        "cos" => unary(f64::cos),
        "tan" => unary(f64::tan),
        "log" => unary(f64::ln),
        "exp" => unary(f64::exp),
        "pow" => match args {
            [b, e] => Ok(b.powf(*e)),
            _ => Err("pow expects 2 arguments".to_string()),
        },
        "min" => Ok(args.iter().copied().fold(f64::INFINITY, f64::min)),
        "max" => Ok(args.iter().copied().fold(f64::NEG_INFINITY, f64::max)),
        _ => Err(format!("{name} is not a function")),
    }
}
