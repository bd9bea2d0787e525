//! Structural token states.
//!
//! The token state machine sits above the lexical scanner: the scanner knows
//! whether bytes form a valid value, while the token state knows whether a
//! value, comma, colon, or key is grammatically allowed at the cursor. The
//! dispatcher keeps one current state plus a stack of the states it was in
//! when it entered each enclosing container.

/// Grammatical position in the enclosing document structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenState {
    /// At the top level, between concatenated values.
    TopValue,
    /// Just entered an array; a value or `]` may follow.
    ArrayStart,
    /// After an array comma; a value is required.
    ArrayValue,
    /// After an array element; `,` or `]` may follow.
    ArrayComma,
    /// Just entered an object; a key or `}` may follow.
    ObjectStart,
    /// After an object comma; a key is required.
    ObjectKey,
    /// After a key; `:` is required.
    ObjectColon,
    /// After a colon; a value is required.
    ObjectValue,
    /// After a member value; `,` or `}` may follow.
    ObjectComma,
}

impl TokenState {
    /// May a value begin here?
    #[inline]
    pub(crate) fn value_allowed(self) -> bool {
        matches!(
            self,
            Self::TopValue | Self::ArrayStart | Self::ArrayValue | Self::ObjectValue
        )
    }

    /// The state after a value completes in this position.
    #[inline]
    pub(crate) fn after_value(self) -> Self {
        match self {
            Self::ArrayStart | Self::ArrayValue => Self::ArrayComma,
            Self::ObjectValue => Self::ObjectComma,
            other => other,
        }
    }

    /// Context phrase for an unexpected byte seen in this state.
    pub(crate) fn error_context(self) -> &'static str {
        match self {
            Self::TopValue | Self::ArrayStart | Self::ArrayValue | Self::ObjectValue => {
                "looking for beginning of value"
            }
            Self::ArrayComma => "after array element",
            Self::ObjectStart | Self::ObjectKey => "looking for beginning of object key string",
            Self::ObjectColon => "after object key",
            Self::ObjectComma => "after object key:value pair",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_positions() {
        assert!(TokenState::TopValue.value_allowed());
        assert!(TokenState::ArrayStart.value_allowed());
        assert!(TokenState::ObjectValue.value_allowed());
        assert!(!TokenState::ObjectKey.value_allowed());
        assert!(!TokenState::ArrayComma.value_allowed());
    }

    #[test]
    fn comma_states_follow_values() {
        assert_eq!(TokenState::ArrayStart.after_value(), TokenState::ArrayComma);
        assert_eq!(TokenState::ArrayValue.after_value(), TokenState::ArrayComma);
        assert_eq!(TokenState::ObjectValue.after_value(), TokenState::ObjectComma);
        assert_eq!(TokenState::TopValue.after_value(), TokenState::TopValue);
    }
}
