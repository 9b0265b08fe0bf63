//! Lull Parse - reads script text into cons-list ASTs.
//!
//! The reader is deliberately small: every form is a list, a literal, a
//! pre-hashed `:name`, or a symbol. Square and curly brackets are sugar for
//! `(make-array ...)` and `(make-map ...)`.
//!
//! ```text
//! (def add (a b) (+ a b))    ; list of symbols and lists
//! [1 2 3]                    ; (make-array 1 2 3)
//! {:x 1 :y 2}                ; (make-map :x 1 :y 2)
//! ```

mod error;
pub mod lexer;
mod reader;

pub use error::{ParseError, ParseErrorKind};
pub use reader::{parse, ARRAY_CONSTRUCTOR, MAP_CONSTRUCTOR};
