//! Script interpreter and tooling
//!
//! A stack-machine bytecode validator in the style of Bitcoin script,
//! plus the surrounding toolchain: a lazy instruction parser, a text
//! assembler/disassembler, transaction digests for signature checking,
//! and the wire serialization the digests are built on.
//!
//! The interpreter is strict by construction. Malformed encodings (bad
//! push lengths, bad DER under the strict flags, non-minimal numbers)
//! are hard errors; a well-formed signature that simply fails
//! cryptographic verification pushes false instead.
//!
//! ```
//! use bscript::{assemble, eval_script, NoSignatureCheck, SigVersion, Stack, VerifyFlags};
//!
//! let script = assemble("2 3 OP_ADD 5 OP_NUMEQUAL").unwrap();
//! let mut stack = Stack::new();
//! eval_script(&mut stack, &script, VerifyFlags::NONE, &NoSignatureCheck, SigVersion::Base)
//!     .unwrap();
//! assert!(stack.peek_bool().unwrap());
//! ```

pub mod asm;
pub mod checksig;
pub mod constants;
pub mod error;
pub mod flags;
pub mod hashes;
pub mod interpreter;
pub mod num;
pub mod opcodes;
pub mod parser;
pub mod serialization;
pub mod sighash;
pub mod stack;
pub mod types;

pub use asm::{assemble, disassemble};
pub use checksig::{NoSignatureCheck, SignatureChecker, TransactionSignatureChecker};
pub use error::{AsmError, Result, ScriptError, SerializeError};
pub use flags::{SigVersion, VerifyFlags};
pub use interpreter::{eval_script, verify_script};
pub use num::ScriptNum;
pub use stack::Stack;
pub use types::{OutPoint, Transaction, TransactionInput, TransactionOutput};
