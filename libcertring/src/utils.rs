mod iter;
pub use iter::PeekIter;

mod string;
pub use string::indent;
