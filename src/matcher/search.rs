//! Searching one decoded opcode sequence for a signature.
//!
//! Two strategies exist. [`contains_run`] is the classic "count up on a hit, start over on a
//! miss" scan. It is what existing signatures were written against, and it misses an
//! occurrence that overlaps a partial match of itself, e.g. `[A, B, A, C]` inside
//! `[A, B, A, B, A, C]`. [`contains_overlapping`] is a prefix-function (Knuth-Morris-Pratt)
//! search that finds every occurrence.

use crate::disassembler::Opcode;

/// Returns `true` if `opcodes` contains `signature` as a contiguous run, restarting on every
/// mismatch.
///
/// After a mismatch, the mismatching opcode may itself begin a new run. An empty signature
/// never matches.
///
/// # Examples
///
/// ```rust
/// use opscope::{disassembler::Opcode::*, matcher::contains_run};
///
/// assert!(contains_run([Ldarg0, Ldarg0, Ret], &[Ldarg0, Ret]));
/// assert!(!contains_run([Ldarg0, Ldarg0, Ldarg0, Ret], &[Ldarg0, Ldarg0, Ret]));
/// ```
pub fn contains_run<I>(opcodes: I, signature: &[Opcode]) -> bool
where
    I: IntoIterator<Item = Opcode>,
{
    let Some(&first) = signature.first() else {
        return false;
    };

    let mut run_length = 0;
    for opcode in opcodes {
        if opcode == signature[run_length] {
            run_length += 1;
        } else {
            run_length = usize::from(opcode == first);
        }

        if run_length == signature.len() {
            return true;
        }
    }

    false
}

/// Returns `true` if `opcodes` contains `signature` as a contiguous run anywhere, including
/// occurrences overlapping a partial match.
///
/// An empty signature never matches.
pub fn contains_overlapping<I>(opcodes: I, signature: &[Opcode]) -> bool
where
    I: IntoIterator<Item = Opcode>,
{
    if signature.is_empty() {
        return false;
    }

    let failure = prefix_function(signature);

    let mut matched = 0;
    for opcode in opcodes {
        while matched > 0 && opcode != signature[matched] {
            matched = failure[matched - 1];
        }
        if opcode == signature[matched] {
            matched += 1;
        }
        if matched == signature.len() {
            return true;
        }
    }

    false
}

/// For every prefix of `pattern`, the length of its longest proper prefix that is also a
/// suffix.
fn prefix_function(pattern: &[Opcode]) -> Vec<usize> {
    let mut failure = vec![0; pattern.len()];
    let mut length = 0;

    for i in 1..pattern.len() {
        while length > 0 && pattern[i] != pattern[length] {
            length = failure[length - 1];
        }
        if pattern[i] == pattern[length] {
            length += 1;
        }
        failure[i] = length;
    }

    failure
}
