use crate::error::ParseError;

use super::{Axis, Edge, PositionConstraint, SizeConstraint};

// ── Clause ────────────────────────────────────────────────────────────────

/// One parsed `axis:kind:params` clause.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Clause {
    Position(Axis, PositionConstraint),
    Size(Axis, SizeConstraint),
}

// ── Tokens ────────────────────────────────────────────────────────────────

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Kind {
    Pixel,
    Relative,
    Center,
    Fill,
    Ratio,
}

fn axis(word: &str) -> Option<Axis> {
    Some(match word {
        "x"            => Axis::X,
        "y"            => Axis::Y,
        "w" | "width"  => Axis::Width,
        "h" | "height" => Axis::Height,
        _ => return None,
    })
}

fn kind(word: &str) -> Option<Kind> {
    Some(match word {
        "pixel"    => Kind::Pixel,
        "relative" => Kind::Relative,
        "center"   => Kind::Center,
        "fill"     => Kind::Fill,
        "ratio"    => Kind::Ratio,
        _ => return None,
    })
}

fn edge(axis: Axis, word: &str) -> Option<Edge> {
    match (axis, word) {
        (Axis::X, "left") | (Axis::Y, "top") => Some(Edge::Near),
        (Axis::X, "right") | (Axis::Y, "bottom") => Some(Edge::Far),
        _ => None,
    }
}

// ── Parser ────────────────────────────────────────────────────────────────

/// Parses a single whitespace-free clause such as `x:pixel:10:right`.
pub fn parse_clause(clause: &str) -> Result<Clause, ParseError> {
    let tokens: Vec<&str> = clause.split(':').collect();
    let err = |reason: String| ParseError::new(clause, reason);

    let [axis_tok, kind_tok, params @ ..] = tokens.as_slice() else {
        return Err(err("expected `axis:kind:value`".into()));
    };
    let axis = axis(axis_tok).ok_or_else(|| err(format!("unknown axis {axis_tok:?}")))?;
    let kind = kind(kind_tok).ok_or_else(|| err(format!("unknown constraint kind {kind_tok:?}")))?;

    let number = |tok: &str| -> Result<f32, ParseError> {
        tok.parse::<f32>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| ParseError::new(clause, format!("invalid number {tok:?}")))
    };
    let arity = |allowed: &str| err(format!("`{kind_tok}` on {axis} takes {allowed}, got {}", params.len()));

    if axis.is_position() {
        match (kind, params) {
            (Kind::Pixel | Kind::Relative, [value]) | (Kind::Pixel | Kind::Relative, [value, _]) => {
                let value = number(*value)?;
                let edge = match params.get(1) {
                    None => Edge::Near,
                    Some(word) => edge(axis, word)
                        .ok_or_else(|| err(format!("edge {word:?} does not apply to {axis}")))?,
                };
                let c = if kind == Kind::Pixel {
                    PositionConstraint::Pixel { offset: value, edge }
                } else {
                    PositionConstraint::Relative { fraction: value, edge }
                };
                Ok(Clause::Position(axis, c))
            }
            (Kind::Pixel | Kind::Relative, _) => Err(arity("a value and an optional edge")),
            (Kind::Center, [value]) => Ok(Clause::Position(axis, PositionConstraint::Center { offset: number(*value)? })),
            (Kind::Center, _) => Err(arity("exactly one value")),
            (Kind::Fill | Kind::Ratio, _) => Err(err(format!("`{kind_tok}` is a size kind, not valid on {axis}"))),
        }
    } else {
        let [value] = params else {
            return Err(arity("exactly one value"));
        };
        let value = number(*value)?;
        let c = match kind {
            Kind::Pixel    => SizeConstraint::Pixel(value),
            Kind::Relative => SizeConstraint::Relative(value),
            Kind::Fill     => SizeConstraint::Fill { delta: value },
            Kind::Ratio    => SizeConstraint::Ratio(value),
            Kind::Center   => return Err(err(format!("`center` is a position kind, not valid on {axis}"))),
        };
        Ok(Clause::Size(axis, c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reason(clause: &str) -> String {
        let e = parse_clause(clause).unwrap_err();
        assert_eq!(e.clause, clause);
        e.reason
    }

    // ── accepted ──────────────────────────────────────────────────────────

    #[test]
    fn position_clauses() {
        assert_eq!(
            parse_clause("x:pixel:10").unwrap(),
            Clause::Position(Axis::X, PositionConstraint::Pixel { offset: 10.0, edge: Edge::Near })
        );
        assert_eq!(
            parse_clause("y:relative:0.25:bottom").unwrap(),
            Clause::Position(Axis::Y, PositionConstraint::Relative { fraction: 0.25, edge: Edge::Far })
        );
        assert_eq!(
            parse_clause("x:center:-3").unwrap(),
            Clause::Position(Axis::X, PositionConstraint::Center { offset: -3.0 })
        );
    }

    #[test]
    fn size_clauses_and_aliases() {
        assert_eq!(parse_clause("width:fill:-8").unwrap(), Clause::Size(Axis::Width, SizeConstraint::Fill { delta: -8.0 }));
        assert_eq!(parse_clause("h:ratio:1.5").unwrap(), Clause::Size(Axis::Height, SizeConstraint::Ratio(1.5)));
        assert_eq!(parse_clause("height:pixel:40").unwrap(), Clause::Size(Axis::Height, SizeConstraint::Pixel(40.0)));
    }

    // ── rejected ──────────────────────────────────────────────────────────

    #[test]
    fn unknown_tokens() {
        assert!(reason("z:pixel:1").contains("unknown axis"));
        assert!(reason("x:percent:1").contains("unknown constraint kind"));
        assert!(reason("x").contains("expected"));
    }

    #[test]
    fn kind_must_fit_axis() {
        assert!(reason("x:fill:0").contains("size kind"));
        assert!(reason("w:center:0").contains("position kind"));
        assert!(reason("x:pixel:10:top").contains("does not apply"));
        assert!(reason("y:pixel:10:left").contains("does not apply"));
    }

    #[test]
    fn arity_and_numbers() {
        assert!(reason("x:pixel").contains("takes"));
        assert!(reason("x:pixel:1:left:2").contains("takes"));
        assert!(reason("x:center:1:left").contains("takes"));
        assert!(reason("w:pixel:1:2").contains("takes"));
        assert!(reason("w:pixel:abc").contains("invalid number"));
        assert!(reason("w:pixel:NaN").contains("invalid number"));
    }
}
