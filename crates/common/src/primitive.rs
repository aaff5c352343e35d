//! The native primitive table.
//!
//! This table is the whole contract between the kernel and anything built on
//! top of it. Primitives are registered at reset in the order of
//! [`ALL_PRIMITIVES`], so a primitive's execution token is its index there.

/// A native operation. Stack effects use `before -- after` notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    // Stack
    /// `-- +n` current data stack depth.
    Depth,
    /// `x --`
    Drop,
    /// `x -- x x`
    Dup,
    /// `x1 x2 -- x1 x2 x1`
    Over,
    /// `x1 x2 -- x2 x1`
    Swap,
    /// `x1 x2 x3 -- x2 x3 x1`
    Rot,
    /// `xu ... x0 u -- xu ... x0 xu`
    Pick,
    /// `xu xu-1 ... x0 u -- xu-1 ... x0 xu`
    Roll,
    /// `x -- 0 | x x`
    QuestionDup,
    /// `x1 x2 -- x2`
    Nip,
    /// `x1 x2 -- x2 x1 x2`
    Tuck,
    /// `x1 x2 -- x1 x2 x1 x2`
    TwoDup,
    /// `x1 x2 --`
    TwoDrop,
    /// `x --` (R: `-- x`)
    ToR,
    /// `-- x` (R: `x --`)
    RFrom,
    /// `-- x` (R: `x -- x`)
    RFetch,

    // Data space
    /// `x a-addr --`
    Store,
    /// `a-addr -- x`
    Fetch,
    /// `char c-addr --`
    CStore,
    /// `c-addr -- char`
    CFetch,
    /// `-- addr`
    Here,
    /// `u --`
    Allot,
    /// `--` align HERE.
    Align,
    /// `addr -- a-addr`
    Aligned,
    /// `a-addr1 -- a-addr2`
    CellPlus,
    /// `n1 -- n2`
    Cells,
    /// `-- u` free data space in bytes.
    Unused,
    /// `x --` append a cell at HERE.
    Comma,
    /// `char --` append a byte at HERE.
    CComma,

    // Arithmetic and logic
    /// `n1 n2 -- n3`
    Plus,
    /// `n1 n2 -- n3`
    Minus,
    /// `n1 n2 -- n3`
    Star,
    /// `n1 n2 -- n3`
    Slash,
    /// `n1 n2 -- rem quot`
    SlashMod,
    /// `n1 n2 -- rem`
    Mod,
    /// `n -- -n`
    Negate,
    /// `n -- n+1`
    OnePlus,
    /// `n -- n-1`
    OneMinus,
    /// `x1 x2 -- x3`
    And,
    /// `x1 x2 -- x3`
    Or,
    /// `x1 x2 -- x3`
    Xor,
    /// `x -- ~x`
    Invert,
    /// `x u -- x<<u`
    LShift,
    /// `x u -- x>>u` (logical)
    RShift,
    /// `x1 x2 -- flag`
    Equals,
    /// `n1 n2 -- flag` (signed)
    Less,
    /// `n1 n2 -- flag` (signed)
    Greater,
    /// `u1 u2 -- flag` (unsigned)
    ULess,
    /// `x1 x2 -- flag`
    NotEquals,
    /// `x -- flag`
    ZeroEquals,
    /// `n -- flag`
    ZeroLess,

    // Threaded code
    /// Return from a nested definition.
    Exit,
    /// `-- x` push the cell compiled after this token.
    Literal,
    /// Unconditional relative branch by the offset compiled after this token.
    Branch,
    /// `x --` branch when x is zero.
    ZeroBranch,
    /// `i*x xt -- j*x`
    Execute,

    // Dictionary and compiler state
    /// `c-addr -- 0 | xt 1 | xt -1`
    Find,
    /// `--` list every definition, newest first.
    Words,
    /// `-- xt`
    Latest,
    /// `--` mark the latest definition immediate.
    Immediate,
    /// `xt --` toggle the hidden flag.
    Hidden,
    /// `xt -- a-addr`
    ToBody,
    /// `-- a-addr`
    State,
    /// `--` enter interpretation state.
    LeftBracket,
    /// `--` enter compilation state.
    RightBracket,

    // Input and output
    /// `char --`
    Emit,
    /// `c-addr u --`
    Type,
    /// `--`
    Cr,
    /// `-- a-addr`
    ToIn,
    /// `-- c-addr u`
    Source,
    /// `-- flag`
    Refill,

    // Environment
    /// `-- n`
    ArgCount,
    /// `n -- c-addr u`
    Arg,
    /// End the session successfully.
    Bye,
    /// `u --` sleep for u milliseconds.
    Ms,
    /// `-- sec min hour day month year` local time.
    TimeAndDate,
    /// `-- sec min hour day month year` UTC.
    UtcTimeAndDate,
}

/// Every primitive, in registration order.
pub const ALL_PRIMITIVES: [Primitive; 77] = [
    Primitive::Depth,
    Primitive::Drop,
    Primitive::Dup,
    Primitive::Over,
    Primitive::Swap,
    Primitive::Rot,
    Primitive::Pick,
    Primitive::Roll,
    Primitive::QuestionDup,
    Primitive::Nip,
    Primitive::Tuck,
    Primitive::TwoDup,
    Primitive::TwoDrop,
    Primitive::ToR,
    Primitive::RFrom,
    Primitive::RFetch,
    Primitive::Store,
    Primitive::Fetch,
    Primitive::CStore,
    Primitive::CFetch,
    Primitive::Here,
    Primitive::Allot,
    Primitive::Align,
    Primitive::Aligned,
    Primitive::CellPlus,
    Primitive::Cells,
    Primitive::Unused,
    Primitive::Comma,
    Primitive::CComma,
    Primitive::Plus,
    Primitive::Minus,
    Primitive::Star,
    Primitive::Slash,
    Primitive::SlashMod,
    Primitive::Mod,
    Primitive::Negate,
    Primitive::OnePlus,
    Primitive::OneMinus,
    Primitive::And,
    Primitive::Or,
    Primitive::Xor,
    Primitive::Invert,
    Primitive::LShift,
    Primitive::RShift,
    Primitive::Equals,
    Primitive::Less,
    Primitive::Greater,
    Primitive::ULess,
    Primitive::NotEquals,
    Primitive::ZeroEquals,
    Primitive::ZeroLess,
    Primitive::Exit,
    Primitive::Literal,
    Primitive::Branch,
    Primitive::ZeroBranch,
    Primitive::Execute,
    Primitive::Find,
    Primitive::Words,
    Primitive::Latest,
    Primitive::Immediate,
    Primitive::Hidden,
    Primitive::ToBody,
    Primitive::State,
    Primitive::LeftBracket,
    Primitive::RightBracket,
    Primitive::Emit,
    Primitive::Type,
    Primitive::Cr,
    Primitive::ToIn,
    Primitive::Source,
    Primitive::Refill,
    Primitive::ArgCount,
    Primitive::Arg,
    Primitive::Bye,
    Primitive::Ms,
    Primitive::TimeAndDate,
    Primitive::UtcTimeAndDate,
];

impl Primitive {
    /// The dictionary name, uppercase.
    pub fn name(&self) -> &'static str {
        match self {
            Primitive::Depth => "DEPTH",
            Primitive::Drop => "DROP",
            Primitive::Dup => "DUP",
            Primitive::Over => "OVER",
            Primitive::Swap => "SWAP",
            Primitive::Rot => "ROT",
            Primitive::Pick => "PICK",
            Primitive::Roll => "ROLL",
            Primitive::QuestionDup => "?DUP",
            Primitive::Nip => "NIP",
            Primitive::Tuck => "TUCK",
            Primitive::TwoDup => "2DUP",
            Primitive::TwoDrop => "2DROP",
            Primitive::ToR => ">R",
            Primitive::RFrom => "R>",
            Primitive::RFetch => "R@",
            Primitive::Store => "!",
            Primitive::Fetch => "@",
            Primitive::CStore => "C!",
            Primitive::CFetch => "C@",
            Primitive::Here => "HERE",
            Primitive::Allot => "ALLOT",
            Primitive::Align => "ALIGN",
            Primitive::Aligned => "ALIGNED",
            Primitive::CellPlus => "CELL+",
            Primitive::Cells => "CELLS",
            Primitive::Unused => "UNUSED",
            Primitive::Comma => ",",
            Primitive::CComma => "C,",
            Primitive::Plus => "+",
            Primitive::Minus => "-",
            Primitive::Star => "*",
            Primitive::Slash => "/",
            Primitive::SlashMod => "/MOD",
            Primitive::Mod => "MOD",
            Primitive::Negate => "NEGATE",
            Primitive::OnePlus => "1+",
            Primitive::OneMinus => "1-",
            Primitive::And => "AND",
            Primitive::Or => "OR",
            Primitive::Xor => "XOR",
            Primitive::Invert => "INVERT",
            Primitive::LShift => "LSHIFT",
            Primitive::RShift => "RSHIFT",
            Primitive::Equals => "=",
            Primitive::Less => "<",
            Primitive::Greater => ">",
            Primitive::ULess => "U<",
            Primitive::NotEquals => "<>",
            Primitive::ZeroEquals => "0=",
            Primitive::ZeroLess => "0<",
            Primitive::Exit => "EXIT",
            Primitive::Literal => "(LITERAL)",
            Primitive::Branch => "(BRANCH)",
            Primitive::ZeroBranch => "(0BRANCH)",
            Primitive::Execute => "EXECUTE",
            Primitive::Find => "FIND",
            Primitive::Words => "WORDS",
            Primitive::Latest => "LATEST",
            Primitive::Immediate => "IMMEDIATE",
            Primitive::Hidden => "HIDDEN",
            Primitive::ToBody => ">BODY",
            Primitive::State => "STATE",
            Primitive::LeftBracket => "[",
            Primitive::RightBracket => "]",
            Primitive::Emit => "EMIT",
            Primitive::Type => "TYPE",
            Primitive::Cr => "CR",
            Primitive::ToIn => ">IN",
            Primitive::Source => "SOURCE",
            Primitive::Refill => "REFILL",
            Primitive::ArgCount => "#ARG",
            Primitive::Arg => "ARG",
            Primitive::Bye => "BYE",
            Primitive::Ms => "MS",
            Primitive::TimeAndDate => "TIME&DATE",
            Primitive::UtcTimeAndDate => "UTCTIME&DATE",
        }
    }

    /// Whether the primitive runs immediately while compiling.
    pub fn is_immediate(&self) -> bool {
        matches!(self, Primitive::LeftBracket)
    }

    /// Look up a primitive by name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Primitive> {
        ALL_PRIMITIVES
            .iter()
            .copied()
            .find(|p| p.name().eq_ignore_ascii_case(name))
    }

    /// Position in [`ALL_PRIMITIVES`], which is also the execution token
    /// assigned at reset.
    pub fn index(&self) -> usize {
        ALL_PRIMITIVES
            .iter()
            .position(|p| p == self)
            .unwrap_or(ALL_PRIMITIVES.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn names_are_unique() {
        let names: HashSet<_> = ALL_PRIMITIVES.iter().map(|p| p.name()).collect();
        assert_eq!(names.len(), ALL_PRIMITIVES.len());
    }

    #[test]
    fn names_are_uppercase() {
        for p in ALL_PRIMITIVES {
            let name = p.name();
            assert!(!name.is_empty(), "empty name for {p:?}");
            assert_eq!(name, name.to_uppercase(), "name should be uppercase: {name}");
        }
    }

    #[test]
    fn from_name_ignores_case() {
        assert_eq!(Primitive::from_name("dup"), Some(Primitive::Dup));
        assert_eq!(Primitive::from_name("Time&Date"), Some(Primitive::TimeAndDate));
        assert_eq!(Primitive::from_name("(literal)"), Some(Primitive::Literal));
        assert_eq!(Primitive::from_name("frobnicate"), None);
    }

    #[test]
    fn index_matches_table_order() {
        for (i, p) in ALL_PRIMITIVES.iter().enumerate() {
            assert_eq!(p.index(), i);
        }
    }

    #[test]
    fn only_left_bracket_is_immediate() {
        let immediate: Vec<_> = ALL_PRIMITIVES
            .iter()
            .filter(|p| p.is_immediate())
            .collect();
        assert_eq!(immediate, vec![&Primitive::LeftBracket]);
    }
}
