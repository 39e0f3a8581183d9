//! # Rule Expression Language - Abstract Syntax Tree
//!
//! This module defines the tokens and the Abstract Syntax Tree (AST) for the
//! rule expression language, a small side-effect-free language for boolean
//! and arithmetic predicates evaluated against caller-supplied variables.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[expressions]** - Expression nodes (literals, identifiers, operations, CASE, IN, HAS)
//! - **[operators]** - Binary and prefix operators
//!
//! ## Quick Start
//!
//! ```text
//! status = 'active' and length(name) between 1 and 40
//! ```
//!
//! ## Core Concepts
//!
//! ### Operator Precedence
//!
//! From loosest to tightest binding:
//!
//! ```text
//! and < or < not < (= <>) < (< <= > >=) < between < (in has is) < (+ -) < (* /) < (
//! ```
//!
//! Note that `and` binds looser than `or`: `a and b or c` reads as `a and (b or c)`.
//!
//! ### Desugaring
//!
//! Some surface forms have no node of their own:
//!
//! - `x is null` → `x = null`, `x is not null` → `x <> null`
//! - `x between 1 and 5` → `x >= 1 and x <= 5`
//! - `x not in (...)` → `Not(In(...))`, `x not has p` → `Not(Has(...))`
//!
//! ## Examples
//!
//! ```text
//! b in ('Blue', 'Green')
//! case when light = 'Green' then 'Go' else 'Stop' end
//! a is not null and length(a) between 4 and 10
//! orders has total > 100
//! ```
pub mod expressions;
pub mod operators;
pub mod tokens;

pub use expressions::{CaseArm, Expression, Literal};
pub use operators::{BinOp, UnaryOp};
pub use tokens::{Token, TokenKind};
