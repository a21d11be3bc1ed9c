//! grammar-to-grammar normalization transforms.
//!
//! Each transform mutates the grammar in place, preserves the generated
//! language (except where a transform's contract says otherwise, like
//! dropping the empty string), and leaves no useless symbols behind.

mod cnf;
mod epsilon;
mod factoring;
mod left_recursion;
mod single;
