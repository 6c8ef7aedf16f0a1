use std::collections::HashMap;

use crate::ast::types::Type;

/// What one formal parameter expects of its argument.
#[derive(Debug, Clone)]
pub enum ParamSig {
    /// A value of the given type.
    Value(Type),
    /// A variable of the given type, passed by reference.
    Var(Type),
    /// A procedure with the given parameters.
    Proc(Vec<ParamSig>),
    /// A function with the given parameters and result type.
    Func(Vec<ParamSig>, Type),
}

impl ParamSig {
    pub fn matches(&self, other: &ParamSig) -> bool {
        match (self, other) {
            (ParamSig::Value(a), ParamSig::Value(b)) => a.equals(b),
            (ParamSig::Var(a), ParamSig::Var(b)) => a.equals(b),
            (ParamSig::Proc(a), ParamSig::Proc(b)) => sigs_match(a, b),
            (ParamSig::Func(a, a_result), ParamSig::Func(b, b_result)) => {
                sigs_match(a, b) && a_result.equals(b_result)
            }
            _ => false,
        }
    }
}

pub fn sigs_match(a: &[ParamSig], b: &[ParamSig]) -> bool {
    a.len() == b.len() && a.iter().zip(b.iter()).all(|(a, b)| a.matches(b))
}

/// What a declared identifier stands for, as the checker sees it.
#[derive(Debug, Clone)]
pub enum DeclInfo {
    Constant { ty: Type },
    Variable { ty: Type },
    Procedure { params: Vec<ParamSig> },
    Function { params: Vec<ParamSig>, result: Type },
    TypeName { ty: Type },
}

/// A stack of scope frames mapping spellings to entries.
///
/// A frame is pushed on block or routine entry and popped on exit; lookup
/// walks innermost-first, so inner declarations shadow outer ones. The
/// entry type is generic because the checker and the encoder each run
/// their own traversal over their own stack.
#[derive(Debug)]
pub struct ScopeStack<T> {
    frames: Vec<HashMap<String, T>>,
}

impl<T> ScopeStack<T> {
    pub fn new() -> Self {
        ScopeStack {
            frames: vec![HashMap::new()],
        }
    }

    pub fn open(&mut self) {
        self.frames.push(HashMap::new());
    }

    pub fn close(&mut self) {
        self.frames.pop();
    }

    /// Declares a spelling in the innermost frame. Returns false when the
    /// spelling is already taken in that frame; the existing entry is
    /// kept, so later uses still resolve to the first declaration.
    pub fn declare(&mut self, spelling: &str, entry: T) -> bool {
        let frame = self.frames.last_mut().unwrap();
        if frame.contains_key(spelling) {
            false
        } else {
            frame.insert(spelling.to_string(), entry);
            true
        }
    }

    /// Finds the innermost visible entry for a spelling.
    pub fn lookup(&self, spelling: &str) -> Option<&T> {
        for frame in self.frames.iter().rev() {
            if let Some(entry) = frame.get(spelling) {
                return Some(entry);
            }
        }
        None
    }
}

impl<T> Default for ScopeStack<T> {
    fn default() -> Self {
        Self::new()
    }
}
