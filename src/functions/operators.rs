use crate::error::{Result, StackgpError};
use serde::{Deserialize, Serialize};

/// Math operators available to a command stack.
///
/// Every operator carries a scalar forward kernel and a reverse kernel. Both
/// are exhaustive matches, so adding an operator without its derivative does
/// not compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Sin,
    Cos,
    Exp,
    Log,
    Pow,
    Abs,
    Sqrt,
}

impl Operator {
    pub const ALL: [Operator; 11] = [
        Operator::Add,
        Operator::Sub,
        Operator::Mul,
        Operator::Div,
        Operator::Sin,
        Operator::Cos,
        Operator::Exp,
        Operator::Log,
        Operator::Pow,
        Operator::Abs,
        Operator::Sqrt,
    ];

    pub fn arity(self) -> usize {
        match self {
            Operator::Add | Operator::Sub | Operator::Mul | Operator::Div | Operator::Pow => 2,
            Operator::Sin
            | Operator::Cos
            | Operator::Exp
            | Operator::Log
            | Operator::Abs
            | Operator::Sqrt => 1,
        }
    }

    /// Forward kernel. `b` is ignored by unary operators.
    ///
    /// Log, Pow and Sqrt act on `|a|` so the function is total; division and
    /// log of zero yield IEEE infinities.
    pub fn forward(self, a: f64, b: f64) -> f64 {
        match self {
            Operator::Add => a + b,
            Operator::Sub => a - b,
            Operator::Mul => a * b,
            Operator::Div => a / b,
            Operator::Sin => a.sin(),
            Operator::Cos => a.cos(),
            Operator::Exp => a.exp(),
            Operator::Log => a.abs().ln(),
            Operator::Pow => a.abs().powf(b),
            Operator::Abs => a.abs(),
            Operator::Sqrt => a.abs().sqrt(),
        }
    }

    /// Reverse kernel: the contributions `upstream` makes to the reverse
    /// values of operands `a` and `b`, given the forward `result` of this
    /// command. The `b` contribution of a unary operator is always zero.
    pub fn reverse(self, upstream: f64, a: f64, b: f64, result: f64) -> (f64, f64) {
        match self {
            Operator::Add => (upstream, upstream),
            Operator::Sub => (upstream, -upstream),
            Operator::Mul => (upstream * b, upstream * a),
            Operator::Div => (upstream / b, -upstream * result / b),
            Operator::Sin => (upstream * a.cos(), 0.0),
            Operator::Cos => (-upstream * a.sin(), 0.0),
            Operator::Exp => (upstream * result, 0.0),
            Operator::Log => (upstream / a, 0.0),
            Operator::Pow => (
                upstream * result * b / a,
                upstream * result * a.abs().ln(),
            ),
            Operator::Abs => (upstream * sign(a), 0.0),
            Operator::Sqrt => (0.5 * upstream * sign(a) / result, 0.0),
        }
    }

    pub fn format_console(self, a: &str, b: &str) -> String {
        match self {
            Operator::Add => format!("{} + {}", a, b),
            Operator::Sub => format!("{} - ({})", a, b),
            Operator::Mul => format!("({})({})", a, b),
            Operator::Div => format!("({})/({})", a, b),
            Operator::Sin => format!("sin({})", a),
            Operator::Cos => format!("cos({})", a),
            Operator::Exp => format!("exp({})", a),
            Operator::Log => format!("log({})", a),
            Operator::Pow => format!("({})^({})", a, b),
            Operator::Abs => format!("|{}|", a),
            Operator::Sqrt => format!("sqrt({})", a),
        }
    }

    pub fn format_latex(self, a: &str, b: &str) -> String {
        match self {
            Operator::Add => format!("{} + {}", a, b),
            Operator::Sub => format!("{} - \\left( {} \\right)", a, b),
            Operator::Mul => format!("\\left( {} \\right)\\left( {} \\right)", a, b),
            Operator::Div => format!("\\frac{{ {} }}{{ {} }}", a, b),
            Operator::Sin => format!("\\sin{{ \\left( {} \\right) }}", a),
            Operator::Cos => format!("\\cos{{ \\left( {} \\right) }}", a),
            Operator::Exp => format!("\\exp{{ \\left( {} \\right) }}", a),
            Operator::Log => format!("\\log{{ \\left| {} \\right| }}", a),
            Operator::Pow => format!("\\left| {} \\right|^{{ {} }}", a, b),
            Operator::Abs => format!("\\left| {} \\right|", a),
            Operator::Sqrt => format!("\\sqrt{{ \\left| {} \\right| }}", a),
        }
    }

    /// Stack-listing template; operands are command positions.
    pub fn format_stack(self, a: i32, b: i32) -> String {
        match self {
            Operator::Add => format!("({}) + ({})", a, b),
            Operator::Sub => format!("({}) - ({})", a, b),
            Operator::Mul => format!("({}) * ({})", a, b),
            Operator::Div => format!("({}) / ({})", a, b),
            Operator::Sin => format!("sin ({})", a),
            Operator::Cos => format!("cos ({})", a),
            Operator::Exp => format!("exp ({})", a),
            Operator::Log => format!("log ({})", a),
            Operator::Pow => format!("({}) ^ ({})", a, b),
            Operator::Abs => format!("abs ({})", a),
            Operator::Sqrt => format!("sqrt ({})", a),
        }
    }
}

/// numpy-style sign: zero maps to zero.
fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        x * 0.0
    }
}

/// The operation a command performs: a load or a math operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Opcode {
    /// Load an input feature column
    Variable,
    /// Load a free constant
    Constant,
    Operator(Operator),
}

impl Opcode {
    pub fn code(self) -> i32 {
        match self {
            Opcode::Variable => 0,
            Opcode::Constant => 1,
            Opcode::Operator(op) => match op {
                Operator::Add => 2,
                Operator::Sub => 3,
                Operator::Mul => 4,
                Operator::Div => 5,
                Operator::Sin => 6,
                Operator::Cos => 7,
                Operator::Exp => 8,
                Operator::Log => 9,
                Operator::Pow => 10,
                Operator::Abs => 11,
                Operator::Sqrt => 12,
            },
        }
    }

    pub fn from_code(code: i32) -> Result<Self> {
        Ok(match code {
            0 => Opcode::Variable,
            1 => Opcode::Constant,
            2 => Operator::Add.into(),
            3 => Operator::Sub.into(),
            4 => Operator::Mul.into(),
            5 => Operator::Div.into(),
            6 => Operator::Sin.into(),
            7 => Operator::Cos.into(),
            8 => Operator::Exp.into(),
            9 => Operator::Log.into(),
            10 => Operator::Pow.into(),
            11 => Operator::Abs.into(),
            12 => Operator::Sqrt.into(),
            other => return Err(StackgpError::UnknownOpcode(other)),
        })
    }

    pub fn arity(self) -> usize {
        match self {
            Opcode::Variable | Opcode::Constant => 0,
            Opcode::Operator(op) => op.arity(),
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Opcode::Variable | Opcode::Constant)
    }
}

impl From<Operator> for Opcode {
    fn from(op: Operator) -> Self {
        Opcode::Operator(op)
    }
}
