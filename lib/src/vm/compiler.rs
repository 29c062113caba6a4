/*! Lowering of a pattern AST into VM instructions.

The compiler walks the tree by recursive descent, appending instructions to
a growing program. Split instructions whose targets lie ahead of the current
position are emitted with placeholder targets and patched once the targets
are known; backward targets are known at emission time.

Repetition lowering follows the classic Thompson construction:

```text
  e+        e*              e?
  L: e      S: split L, B   S: split L, B
  split L,B L: e            L: e
  B: ...    jmp S           B: ...
            B: ...
```

with the split targets swapped when the node is lazy, so that the processor
explores the preferred branch first.
*/

use log::debug;

use crate::errors::CompileError;
use crate::pattern::{Group, GroupMode, Node, NodeKind, Pattern, Repetition, TokenNode};

use super::instr::{Instr, Program};

/// Compiles a pattern into a program for the [`Processor`](super::Processor).
///
/// Fails with [`CompileError::AlternationNotSupported`] if the pattern
/// contains an alternation group at any nesting level; a pattern either
/// compiles fully or not at all.
pub fn compile<T: Clone>(pattern: &Pattern<T>) -> Result<Program<T>, CompileError> {
    Compiler::default().compile(pattern)
}

struct Compiler<T> {
    code: Vec<Instr<T>>,
}

impl<T> Default for Compiler<T> {
    fn default() -> Self {
        Self { code: Vec::new() }
    }
}

impl<T: Clone> Compiler<T> {
    fn compile(mut self, pattern: &Pattern<T>) -> Result<Program<T>, CompileError> {
        if !pattern.match_from_start {
            // An unanchored match may begin at any offset: prepend a lazy
            // zero-or-more wildcard skip, the implicit `.*?`.
            let split = self.emit(Instr::Split([0, 0]));
            self.emit(Instr::Any);
            self.emit(Instr::Jump(split));
            let past = self.code.len();
            self.patch_split(split, [past, split + 1]);
        }

        self.emit(Instr::SaveStart);
        self.emit_group(&pattern.root)?;
        if pattern.match_till_end {
            self.emit(Instr::End);
        }
        self.emit(Instr::SaveEnd);
        self.emit(Instr::Match);

        debug!("compiled pattern into {} instructions", self.code.len());

        Ok(Program::new(self.code))
    }

    fn emit_node(&mut self, node: &Node<T>) -> Result<(), CompileError> {
        match node.repetition {
            Repetition::Once => self.emit_kind(&node.kind)?,
            Repetition::OneOrMore => {
                // Content once unconditionally, then branch between another
                // round and falling through.
                let start = self.code.len();
                self.emit_kind(&node.kind)?;
                let split = self.emit(Instr::Split([0, 0]));
                let past = self.code.len();
                let targets =
                    if node.greedy { [start, past] } else { [past, start] };
                self.patch_split(split, targets);
            }
            Repetition::ZeroOrMore => {
                let split = self.emit(Instr::Split([0, 0]));
                self.emit_kind(&node.kind)?;
                self.emit(Instr::Jump(split));
                let past = self.code.len();
                let targets = if node.greedy {
                    [split + 1, past]
                } else {
                    [past, split + 1]
                };
                self.patch_split(split, targets);
            }
            Repetition::ZeroOrOne => {
                // A bounded zero-or-more: same branch, no loop back.
                let split = self.emit(Instr::Split([0, 0]));
                self.emit_kind(&node.kind)?;
                let past = self.code.len();
                let targets = if node.greedy {
                    [split + 1, past]
                } else {
                    [past, split + 1]
                };
                self.patch_split(split, targets);
            }
        }
        Ok(())
    }

    fn emit_kind(&mut self, kind: &NodeKind<T>) -> Result<(), CompileError> {
        match kind {
            NodeKind::Token(TokenNode::Value(value)) => {
                self.emit(Instr::Token(value.clone()));
                Ok(())
            }
            NodeKind::Token(TokenNode::Any) => {
                self.emit(Instr::Any);
                Ok(())
            }
            NodeKind::Group(group) => self.emit_group(group),
        }
    }

    fn emit_group(&mut self, group: &Group<T>) -> Result<(), CompileError> {
        match group.mode {
            GroupMode::Concatenation => {
                for element in &group.elements {
                    self.emit_node(element)?;
                }
                Ok(())
            }
            GroupMode::Alternation => Err(CompileError::AlternationNotSupported),
        }
    }

    fn emit(&mut self, instr: Instr<T>) -> usize {
        let pc = self.code.len();
        self.code.push(instr);
        pc
    }

    fn patch_split(&mut self, pc: usize, targets: [usize; 2]) {
        match &mut self.code[pc] {
            Instr::Split(placeholder) => *placeholder = targets,
            _ => unreachable!("patch target is not a split"),
        }
    }
}
