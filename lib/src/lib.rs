/*! A streaming pattern-matching engine for arbitrary token streams.

`tokrex` matches sequences of arbitrary tokens — characters, words, lexer
tokens, sensor events — against a regular-expression-like pattern. Input is
consumed one token at a time, with a match decision available after every
token: nothing is buffered, and there is no backtracking. Patterns are
compiled into a small bytecode executed by a Pike-VM style simulation that
runs every viable interpretation concurrently, so matching time stays linear
even on patterns that make backtracking engines blow up exponentially.

The engine knows nothing about the token type itself; a [`TokenCodec`]
capability supplies parsing, rendering and equality. [`CharTokens`] and
[`StringTokens`] cover the two most common cases.

# Pattern syntax

Tokens are written in their rendered text form, `.` is the wildcard. A
single space concatenates, `|` alternates, parentheses group. A trailing
`+`, `*` or `?` repeats the preceding element (one-or-more, zero-or-more,
zero-or-one); one more `?` after that makes the repetition lazy. A leading
`^` anchors the match to the start of the stream, a trailing `$` to its end.

Alternation parses and round-trips, but the compiler rejects it: it has no
lowering for alternation groups and fails fast rather than approximating.

# Example

```
use tokrex::{compile, CharTokens, Pattern, Processor};

let codec = CharTokens;
let pattern = Pattern::parse("a+ b+", &codec).unwrap();
let program = compile(&pattern).unwrap();

let mut processor = Processor::new(&program, codec);
for ch in "caaabbbc".chars() {
    if !processor.process_token(&ch) {
        break;
    }
}

assert!(processor.finish());
assert_eq!(processor.last_match().unwrap().range(), 1..7);
```
*/

#![deny(missing_docs)]

pub use errors::CompileError;
pub use errors::ParseError;

pub use pattern::Group;
pub use pattern::GroupMode;
pub use pattern::Node;
pub use pattern::NodeKind;
pub use pattern::Pattern;
pub use pattern::Repetition;
pub use pattern::TokenNode;

pub use tokens::CharTokens;
pub use tokens::StringTokens;
pub use tokens::TokenCodec;

pub use vm::compile;
pub use vm::Instr;
pub use vm::Match;
pub use vm::Processor;
pub use vm::Program;

mod errors;
mod pattern;
mod tokens;
mod vm;
