//! The nested-scope stack: tracks whether the parser is at global scope, inside a
//! namespace, or inside a class/struct body, along with the current access-control level.
use crate::error::{ScanError, ScanErrorKind};

/// Fixed capacity of the scope stack, matching the bound the original C++ scanner's
/// array-backed scope stack used.
pub const MAX_SCOPE_DEPTH: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Global,
    Namespace,
    Class,
}

/// Access control in effect for members declared at the current scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessKind {
    Public,
    Protected,
    Private,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    pub kind: ScopeKind,
    pub name: Option<String>,
    pub access: AccessKind,
}

impl Scope {
    pub fn global() -> Self {
        Self {
            kind: ScopeKind::Global,
            name: None,
            access: AccessKind::Public,
        }
    }

    pub fn namespace(name: impl Into<String>) -> Self {
        Self {
            kind: ScopeKind::Namespace,
            name: Some(name.into()),
            access: AccessKind::Public,
        }
    }

    /// A class/struct scope. `default_access` is `Private` for `class`, `Public` for
    /// `struct`, but an explicit base-class access specifier unconditionally resets it to
    /// `Private` (see the open-question decision in the design ledger).
    pub fn class(name: impl Into<String>, default_access: AccessKind) -> Self {
        Self {
            kind: ScopeKind::Class,
            name: Some(name.into()),
            access: default_access,
        }
    }
}

/// A bounded-depth stack of nested [Scope]s, with [Global](ScopeKind::Global) always at
/// the bottom.
pub struct ScopeStack {
    frames: Vec<Scope>,
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeStack {
    pub fn new() -> Self {
        Self {
            frames: vec![Scope::global()],
        }
    }

    pub fn push(&mut self, scope: Scope, line: usize) -> Result<(), ScanError> {
        if self.frames.len() >= MAX_SCOPE_DEPTH {
            return Err(ScanError::new(
                ScanErrorKind::ScopeOverflow,
                line,
                format!("scope nesting exceeds {} levels", MAX_SCOPE_DEPTH),
            ));
        }
        self.frames.push(scope);
        Ok(())
    }

    /// Pop the innermost scope. A no-op at global scope: there is always at least one
    /// frame, and the original scanner tolerates a stray closing brace at top level.
    pub fn pop(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    pub fn current(&self) -> &Scope {
        self.frames.last().expect("global scope is never popped")
    }

    pub fn set_access(&mut self, access: AccessKind) {
        if let Some(top) = self.frames.last_mut() {
            top.access = access;
        }
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// The fully qualified name of the current scope, joined with `::`, or `None` at
    /// global scope.
    pub fn qualified_name(&self) -> Option<String> {
        let names: Vec<&str> = self
            .frames
            .iter()
            .filter_map(|s| s.name.as_deref())
            .collect();
        if names.is_empty() {
            None
        } else {
            Some(names.join("::"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_global_scope() {
        let stack = ScopeStack::new();
        assert_eq!(stack.current().kind, ScopeKind::Global);
        assert_eq!(stack.qualified_name(), None);
    }

    #[test]
    fn push_and_pop_track_qualified_names() {
        let mut stack = ScopeStack::new();
        stack.push(Scope::namespace("app"), 1).unwrap();
        stack.push(Scope::class("Widget", AccessKind::Private), 2).unwrap();
        assert_eq!(stack.qualified_name(), Some("app::Widget".to_string()));
        stack.pop();
        assert_eq!(stack.qualified_name(), Some("app".to_string()));
        stack.pop();
        assert_eq!(stack.qualified_name(), None);
    }

    #[test]
    fn pop_below_global_is_a_no_op() {
        let mut stack = ScopeStack::new();
        stack.pop();
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn push_past_capacity_errors() {
        let mut stack = ScopeStack::new();
        for i in 0..(MAX_SCOPE_DEPTH - 1) {
            stack.push(Scope::namespace(format!("n{i}")), 1).unwrap();
        }
        assert!(stack.push(Scope::namespace("overflow"), 99).is_err());
    }
}
