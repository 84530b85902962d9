//! sift virtual machine — evaluates compiled filter programs against
//! records.
//!
//! The VM is a stack machine with:
//! - A data stack for intermediate values
//! - A globals map populated from the record under evaluation
//! - A native-function table fixed at construction
//!
//! # Usage
//!
//! ```
//! use sift_common::{literal, Opcode, Program, Value};
//! use sift_vm::{Record, Vm};
//!
//! // status = 'active'  →  LOAD_GLOBAL status, PUSH 'active', OP_EQ
//! let mut code = vec![Opcode::LoadGlobal as u8];
//! literal::encode_name("status", &mut code).unwrap();
//! code.push(Opcode::Push as u8);
//! literal::encode_value(&Value::Str("active".into()), &mut code).unwrap();
//! code.push(Opcode::OpEq as u8);
//!
//! let program = Program::new(code);
//! let mut vm = Vm::new(&program);
//!
//! let record: Record = [("status".to_string(), "active".into())]
//!     .into_iter()
//!     .collect();
//! vm.load_record(&record).unwrap();
//! vm.execute().unwrap();
//! assert!(vm.finish().unwrap());
//! ```

pub mod error;
pub mod execute;
pub mod machine;
pub mod record;

pub use error::{LoadError, NativeError, RuntimeError};
pub use machine::{NativeFn, Vm};
pub use record::{FieldValue, Record};
