use thiserror::Error;

use tessera_engine::render::RenderError;

use crate::component::ComponentId;
use crate::constraints::Axis;

/// A constraint-language clause that could not be parsed.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("bad constraint clause `{clause}`: {reason}")]
pub struct ParseError {
    pub clause: String,
    pub reason: String,
}

impl ParseError {
    pub(crate) fn new(clause: &str, reason: impl Into<String>) -> Self {
        Self { clause: clause.to_string(), reason: reason.into() }
    }
}

#[derive(Debug, Error)]
pub enum UiError {
    #[error("constraint set has no {0} constraint")]
    IncompleteConstraints(Axis),
    #[error("{0} would depend on the other size, which already depends on it")]
    CircularSize(Axis),
    #[error("component {0:?} is destroyed")]
    Destroyed(ComponentId),
    #[error("component {0:?} does not exist")]
    NoSuchComponent(ComponentId),
    #[error("parenting {child:?} under {parent:?} would create a cycle")]
    Cycle { child: ComponentId, parent: ComponentId },
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Render(#[from] RenderError),
}
