/*! The processor that executes compiled programs against a token stream.

The processor maintains a list of live [`Thread`]s, each a program counter
plus the match boundaries recorded so far. List position is priority:
earlier threads represent preferred interpretations of the pattern. One call
to [`Processor::process_token`] advances every thread by exactly one token;
[`Processor::finish`] drains the remaining zero-width work once the stream
is exhausted.

Threads are advanced through zero-width instructions by [`epsilon_closure`],
a depth-first traversal with an explicit stack. When a split is encountered
the lower-priority continuation is pushed first and the higher-priority one
last, so the stack pops threads in strict priority order and the closure
discovers them exactly as compile-time greediness intended.

Two guards keep the simulation linear in the program size, both borrowed
from classic Pike VM practice: a split instruction is executed at most once
per closure (which also terminates nested zero-width loops like `(a*)*`),
and at most one thread per program counter survives into a step. Dropping
the lower-priority duplicate is safe: two threads at one program counter
have identical futures, and the priority rules already guarantee the earlier
one wins every conflict.
*/

use std::fmt::{Display, Formatter};
use std::mem;
use std::ops::Range;

use bitvec::vec::BitVec;
use log::{debug, trace};

use crate::tokens::TokenCodec;

use super::instr::{Instr, Program};

/// The token range covered by a successful match.
///
/// The range is half open: `range().start` is the index of the first matched
/// token, `range().end` the index one past the last. A zero-length match at
/// the beginning of the stream is `0..0`, distinct from "no match", which is
/// the [`None`] returned by [`Processor::last_match`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    start: usize,
    end: usize,
}

impl Match {
    /// The matched token indices, start inclusive, end exclusive.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Number of tokens covered by the match.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// True if the match covers no tokens.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl Display for Match {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Match boundaries under construction. Save instructions fill the fields
/// in; both are guaranteed to be set by the time a finalize instruction is
/// reached, since the compiler brackets every pattern body with them.
#[derive(Debug, Clone, Copy, Default)]
struct Bounds {
    start: Option<usize>,
    end: Option<usize>,
}

/// One logical interpretation path through the program. Threads are
/// value-copied at splits, so no thread ever aliases another's match state.
#[derive(Debug, Clone, Copy)]
struct Thread {
    pc: usize,
    bounds: Bounds,
}

/// The set of threads that will run on the next step. At most one thread
/// per program counter is kept: `insert` drops a thread whose program
/// counter is already present, which, given that threads are inserted in
/// priority order, always drops the lower-priority duplicate. Iteration
/// follows insertion order.
struct ThreadSet {
    items: Vec<Thread>,
    present: BitVec,
}

impl ThreadSet {
    fn new(code_len: usize) -> Self {
        Self { items: Vec::new(), present: BitVec::repeat(false, code_len) }
    }

    fn insert(&mut self, thread: Thread) {
        if !self.present[thread.pc] {
            self.present.set(thread.pc, true);
            self.items.push(thread);
        }
    }

    fn clear(&mut self) {
        self.items.clear();
        self.present.fill(false);
    }
}

/// Reusable state for [`epsilon_closure`]: the traversal stack and a bitmap
/// of the split instructions already executed during the current closure.
/// The bitmap is cleared lazily on the first query after a closure starts.
struct EpsilonClosureState {
    stack: Vec<Thread>,
    executed_splits: BitVec,
    dirty: bool,
}

impl EpsilonClosureState {
    fn new(code_len: usize) -> Self {
        Self {
            stack: Vec::new(),
            executed_splits: BitVec::repeat(false, code_len),
            dirty: false,
        }
    }

    #[inline]
    fn executed(&mut self, pc: usize) -> bool {
        if self.dirty {
            self.executed_splits.fill(false);
            self.dirty = false;
        }
        let executed = self.executed_splits[pc];
        if !executed {
            self.executed_splits.set(pc, true);
        }
        executed
    }
}

/// Advances `seed` through zero-width instructions until every reachable
/// continuation rests at an instruction that needs a token or finalizes a
/// match, inserting those continuations into `closure` in priority order.
///
/// `next_index` is the stream position the next consumed token would have;
/// save instructions record it into the traversing thread's boundaries.
fn epsilon_closure<T>(
    code: &Program<T>,
    seed: Thread,
    next_index: usize,
    state: &mut EpsilonClosureState,
    closure: &mut ThreadSet,
) {
    state.stack.push(seed);
    state.dirty = true;

    while let Some(mut thread) = state.stack.pop() {
        match code.instr(thread.pc) {
            Instr::Token(_) | Instr::Any | Instr::End | Instr::Match => {
                closure.insert(thread);
            }
            Instr::Split(targets) => {
                if !state.executed(thread.pc) {
                    // Low-priority branch first, high-priority branch last:
                    // the stack pops the preferred branch first. This
                    // ordering is what makes greedy/lazy preference work.
                    state.stack.push(Thread { pc: targets[1], ..thread });
                    state.stack.push(Thread { pc: targets[0], ..thread });
                }
            }
            Instr::Jump(target) => {
                thread.pc = *target;
                state.stack.push(thread);
            }
            Instr::SaveStart => {
                thread.bounds.start = Some(next_index);
                thread.pc += 1;
                state.stack.push(thread);
            }
            Instr::SaveEnd => {
                thread.bounds.end = Some(next_index);
                thread.pc += 1;
                state.stack.push(thread);
            }
        }
    }
}

/// Executes a [`Program`] against a stream of tokens, fed one at a time.
///
/// A processor is created from a compiled program and a token codec, and is
/// driven by calling [`process_token`](Self::process_token) for every token
/// of the stream, then [`finish`](Self::finish) once the stream ends. The
/// program is read-only and may be shared by any number of processors; each
/// processor owns its thread list and match state exclusively and is not
/// safe to drive from several places at once without external
/// synchronization.
///
/// ```
/// use tokrex::{compile, CharTokens, Pattern, Processor};
///
/// let codec = CharTokens;
/// let pattern = Pattern::parse("b+", &codec).unwrap();
/// let program = compile(&pattern).unwrap();
///
/// let mut processor = Processor::new(&program, codec);
/// for ch in "abba".chars() {
///     processor.process_token(&ch);
/// }
/// assert!(processor.finish());
/// assert_eq!(processor.last_match().unwrap().range(), 1..3);
/// ```
pub struct Processor<'p, C: TokenCodec> {
    program: &'p Program<C::Token>,
    codec: C,
    /// Live threads, in priority order.
    threads: ThreadSet,
    /// Threads accumulated for the next step.
    next_threads: ThreadSet,
    cache: EpsilonClosureState,
    last_match: Option<Match>,
    /// Number of tokens fed so far; the stream position of the next token.
    tokens_fed: usize,
}

impl<'p, C: TokenCodec> Processor<'p, C> {
    /// Creates a processor executing `program` with the given codec.
    pub fn new(program: &'p Program<C::Token>, codec: C) -> Self {
        let mut processor = Self {
            program,
            codec,
            threads: ThreadSet::new(program.len()),
            next_threads: ThreadSet::new(program.len()),
            cache: EpsilonClosureState::new(program.len()),
            last_match: None,
            tokens_fed: 0,
        };
        processor.reset();
        processor
    }

    /// Discards all matching state, making the processor ready for a fresh
    /// run of the same program.
    pub fn reset(&mut self) {
        self.threads.clear();
        self.next_threads.clear();
        self.last_match = None;
        self.tokens_fed = 0;
        epsilon_closure(
            self.program,
            Thread { pc: 0, bounds: Bounds::default() },
            0,
            &mut self.cache,
            &mut self.threads,
        );
    }

    /// Feeds one token to the processor.
    ///
    /// Returns true while feeding more tokens could still produce or extend
    /// a match; once it returns false the caller may stop early, since no
    /// further input can change the outcome.
    pub fn process_token(&mut self, token: &C::Token) -> bool {
        self.step(Some(token))
    }

    /// Signals the end of the input, draining any threads that were waiting
    /// on an end anchor or a pending finalize.
    ///
    /// Returns true if any match was found during the run.
    pub fn finish(&mut self) -> bool {
        while !self.threads.items.is_empty() {
            self.step(None);
        }
        self.last_match.is_some()
    }

    /// The most recent successful match, if any.
    pub fn last_match(&self) -> Option<Match> {
        self.last_match
    }

    /// Number of currently live threads. Bounded by the program length;
    /// useful as a diagnostic.
    pub fn live_threads(&self) -> usize {
        self.threads.items.len()
    }

    /// Advances every live thread by one token (or by the end-of-input when
    /// `token` is `None`), in priority order.
    fn step(&mut self, token: Option<&C::Token>) -> bool {
        // Set once a thread consumes this step's token; a finalize reached
        // by a lower-priority thread afterwards is superseded, because the
        // consuming thread represents a preferred, still-live
        // interpretation.
        let mut token_consumed = false;

        for &thread in self.threads.items.iter() {
            match self.program.instr(thread.pc) {
                Instr::Token(value) => match token {
                    Some(token) if self.codec.eq(token, value) => {
                        token_consumed = true;
                        epsilon_closure(
                            self.program,
                            Thread { pc: thread.pc + 1, ..thread },
                            self.tokens_fed + 1,
                            &mut self.cache,
                            &mut self.next_threads,
                        );
                    }
                    // Dead end; the thread dies silently.
                    _ => {}
                },
                Instr::Any => {
                    if token.is_some() {
                        token_consumed = true;
                        epsilon_closure(
                            self.program,
                            Thread { pc: thread.pc + 1, ..thread },
                            self.tokens_fed + 1,
                            &mut self.cache,
                            &mut self.next_threads,
                        );
                    }
                }
                Instr::End => {
                    if token.is_none() {
                        epsilon_closure(
                            self.program,
                            Thread { pc: thread.pc + 1, ..thread },
                            self.tokens_fed,
                            &mut self.cache,
                            &mut self.next_threads,
                        );
                    }
                }
                Instr::Match => {
                    if !token_consumed {
                        let found = match thread.bounds {
                            Bounds { start: Some(start), end: Some(end) } => {
                                Match { start, end }
                            }
                            _ => unreachable!(
                                "finalize reached without recorded boundaries"
                            ),
                        };
                        debug!("match found at {found}");
                        self.last_match = Some(found);
                        // All lower-priority threads die.
                        break;
                    }
                }
                Instr::Split(_) | Instr::Jump(_) | Instr::SaveStart
                | Instr::SaveEnd => unreachable!(
                    "zero-width instruction survived epsilon closure"
                ),
            }
        }

        mem::swap(&mut self.threads, &mut self.next_threads);
        self.next_threads.clear();

        if token.is_some() {
            self.tokens_fed += 1;
        }

        trace!(
            "step {}: {} live threads",
            self.tokens_fed,
            self.threads.items.len()
        );

        !self.threads.items.is_empty()
    }
}
