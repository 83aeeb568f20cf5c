//! Range-query boundaries (§3 "Boundaries"): index, score, and lex
//! endpoints, each encoding to the prefix byte the server grammar expects.

use bytes::Bytes;

use super::float_arg;

/// A closed or open endpoint wrapping a value of type `T`. Plain index
/// boundaries (e.g. `LRANGE`'s start/stop) are just `i64` and never wrapped
/// in this type — only score and lex ranges need the inclusive/exclusive
/// distinction encoded on the wire.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Inclusivity<T> {
    Included(T),
    Excluded(T),
}

/// A score-range endpoint: a finite inclusive/exclusive bound, or one of the
/// `+inf`/`-inf` sentinels. Used by `ZRANGEBYSCORE`-style commands and the
/// `BYSCORE` form of `ZRANGE`/`ZRANGESTORE`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Boundary {
    Score(Inclusivity<f64>),
    NegativeInfinity,
    PositiveInfinity,
}

impl Boundary {
    pub fn included(score: f64) -> Self {
        Boundary::Score(Inclusivity::Included(score))
    }

    pub fn excluded(score: f64) -> Self {
        Boundary::Score(Inclusivity::Excluded(score))
    }

    /// Encodes to the wire token: plain decimal for an inclusive bound, a
    /// `(`-prefixed decimal for an exclusive bound, or the literal `+inf` /
    /// `-inf` sentinel.
    pub fn encode(self) -> Bytes {
        match self {
            Boundary::Score(Inclusivity::Included(v)) => float_arg(v),
            Boundary::Score(Inclusivity::Excluded(v)) => {
                let mut out = Vec::with_capacity(16);
                out.push(b'(');
                out.extend_from_slice(&float_arg(v));
                Bytes::from(out)
            }
            Boundary::NegativeInfinity => Bytes::from_static(b"-inf"),
            Boundary::PositiveInfinity => Bytes::from_static(b"+inf"),
        }
    }
}

/// A lexicographic-range endpoint: inclusive `[member`, exclusive `(member`,
/// or the `+`/`-` sentinels meaning "greatest possible member" / "least
/// possible member". Used by `ZRANGEBYLEX`-style commands and the `BYLEX`
/// form of `ZRANGE`/`ZRANGESTORE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexBoundary {
    Lex(Inclusivity<Bytes>),
    Min,
    Max,
}

impl LexBoundary {
    pub fn included(member: impl AsRef<[u8]>) -> Self {
        LexBoundary::Lex(Inclusivity::Included(Bytes::copy_from_slice(
            member.as_ref(),
        )))
    }

    pub fn excluded(member: impl AsRef<[u8]>) -> Self {
        LexBoundary::Lex(Inclusivity::Excluded(Bytes::copy_from_slice(
            member.as_ref(),
        )))
    }

    pub fn encode(&self) -> Bytes {
        match self {
            LexBoundary::Lex(Inclusivity::Included(member)) => {
                let mut out = Vec::with_capacity(member.len() + 1);
                out.push(b'[');
                out.extend_from_slice(member);
                Bytes::from(out)
            }
            LexBoundary::Lex(Inclusivity::Excluded(member)) => {
                let mut out = Vec::with_capacity(member.len() + 1);
                out.push(b'(');
                out.extend_from_slice(member);
                Bytes::from(out)
            }
            LexBoundary::Min => Bytes::from_static(b"-"),
            LexBoundary::Max => Bytes::from_static(b"+"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn score_boundary_prefixes_exclusive_with_paren() {
        assert_eq!(Boundary::included(1.0).encode(), Bytes::from_static(b"1"));
        assert_eq!(Boundary::excluded(1.0).encode(), Bytes::from_static(b"(1"));
        assert_eq!(
            Boundary::NegativeInfinity.encode(),
            Bytes::from_static(b"-inf")
        );
        assert_eq!(
            Boundary::PositiveInfinity.encode(),
            Bytes::from_static(b"+inf")
        );
    }

    #[test]
    fn lex_boundary_uses_bracket_prefixes() {
        assert_eq!(LexBoundary::included("a").encode(), Bytes::from_static(b"[a"));
        assert_eq!(LexBoundary::excluded("a").encode(), Bytes::from_static(b"(a"));
        assert_eq!(LexBoundary::Min.encode(), Bytes::from_static(b"-"));
        assert_eq!(LexBoundary::Max.encode(), Bytes::from_static(b"+"));
    }
}
