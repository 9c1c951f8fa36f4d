pub mod compose;
pub use compose::{compile, compile_count, CompiledQuery};

mod ident;
use ident::Ident;

pub mod translate;
pub use translate::{OutputColumn, Translator};
