//! The optional constant-folding pass.
//!
//! Enabled on request, after checking and before encoding. Rewrites
//! operator applications whose operands are literals into single literal
//! nodes holding the statically computed result. The fold reproduces the
//! target machine's wrapping arithmetic bit-for-bit, and a division or
//! modulo by a literal zero is never folded: the emitted code fails at
//! runtime exactly as unfolded code does. Folding an already-folded tree
//! changes nothing.

pub mod folder;

#[cfg(test)]
mod tests;
