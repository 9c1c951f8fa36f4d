mod op;
pub use op::{Direction, Op};

mod scope;
pub use scope::Scope;

mod state;
pub use state::QueryState;

mod value;
pub use value::Value;

mod value_record;
pub use value_record::ValueRecord;
