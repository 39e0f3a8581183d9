//! Reference pages for the `docs` command

use super::CliError;

/// Available documentation categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocCategory {
    Syntax,
    Operators,
    Membership,
    Functions,
}

impl DocCategory {
    /// Parse category name from string
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "syntax" => Some(Self::Syntax),
            "operators" | "ops" => Some(Self::Operators),
            "membership" | "in" | "has" => Some(Self::Membership),
            "functions" | "function" | "fn" => Some(Self::Functions),
            _ => None,
        }
    }
}

/// Get the docs overview (category listing)
pub fn get_docs_overview() -> &'static str {
    r#"RULEVAL DOCUMENTATION

A rule is a single expression evaluated against named variables. Rules
cannot change variables, define functions or loop; they compute one value.

DOCUMENTATION CATEGORIES

  syntax        Literals, identifiers, grouping and CASE
  operators     Arithmetic, comparison, logical operators and precedence
  membership    IN, NOT IN, HAS and NOT HAS
  functions     The built-in function table

QUICK REFERENCE

  a = 1 and b <> 'x'          Comparison and logic
  a is null / a is not null   Null checks
  n between 1 and 10          Inclusive numeric range
  c in ('Blue', 'Green')      Membership
  case when ... then ... end  Conditional value

Run 'ruleval docs <category>' for detailed documentation.
"#
}

/// Get documentation for a specific category
pub fn get_doc_category(name: &str) -> Result<&'static str, CliError> {
    match DocCategory::from_name(name) {
        Some(DocCategory::Syntax) => Ok(SYNTAX_DOC),
        Some(DocCategory::Operators) => Ok(OPERATORS_DOC),
        Some(DocCategory::Membership) => Ok(MEMBERSHIP_DOC),
        Some(DocCategory::Functions) => Ok(FUNCTIONS_DOC),
        None => Err(CliError::UnknownCategory(name.to_string())),
    }
}

const SYNTAX_DOC: &str = r#"SYNTAX - Literals, Identifiers and Structure

LITERALS
  42  1.5  .64          Numbers (a decimal point makes a float)
  'text'  "text"        Strings, either quote style, no escapes
  true  false  null     Keywords, case-insensitive

IDENTIFIERS
  status  order_total
    Letters and underscores only. Resolved against the variables at
    evaluation time; an unknown name reads as null.

GROUPING
  (a + b) * c
    Parentheses override precedence.

  ('Blue', 'Green')
    A comma list. Only valid as an operand of IN.

CASE
  case
    when light = 'Green' then 'Go'
    when light = 'Red' then 'Stop'
    else 'Unknown'
  end

    Guards are tried in order; the first truthy one wins. Without a
    matching guard and without ELSE the result is false.
"#;

const OPERATORS_DOC: &str = r#"OPERATORS - Arithmetic, Comparison and Logic

ARITHMETIC
  +  -  *  /
    Integer arithmetic stays exact; a division that does not come out
    even produces a float. + also concatenates strings.

COMPARISON
  =  <>         Equality without type coercion (1 = 1.0 holds)
  <  <=  >  >=  Numbers numerically, strings lexicographically
  a is null             Same as a = null
  a is not null         Same as a <> null
  n between 4 and 10    Same as n >= 4 and n <= 10 (bounds must be numbers)

  Ordering against null is always false.

LOGIC
  and  or
    Both sides are evaluated; the result is a boolean.
    null, false, 0 and '' are falsy.

PRECEDENCE (loosest first)
  and
  or
  not
  =  <>
  <  <=  >  >=
  between
  in  has  is
  +  -
  *  /

  Note: AND binds looser than OR, so
    a and b or c    reads as    a and (b or c)
"#;

const MEMBERSHIP_DOC: &str = r#"MEMBERSHIP - IN and HAS

IN
  color in ('Blue', 'Green')
    True when the variable's value is in the list.

  tags in ('a', 'b', 'c')
    When the variable holds an array, every element must be in the list.

  ('admin', 'ops') in roles
    Every listed value must appear in the variable's array.

  Constraints:
    - One side must be a variable, the other a parenthesized list
    - A variable that must hold a value and is missing is an error

NOT IN
  color not in ('Red')
    The negation of IN.

HAS
  orders has total > 100
    True when some element of the array satisfies the predicate. Inside
    the predicate, names refer to the element's fields.

  tags has 'urgent'
    A literal predicate matches elements equal to it.

  A value that is neither an array nor an object has no elements:
  both HAS and NOT HAS are false for it.
"#;

const FUNCTIONS_DOC: &str = r#"FUNCTIONS - Built-in Function Table

LENGTH
  length(value)
    Number of characters of a string or elements of an array.
    length(null) is null.

    Example:
      Variables: {"a": "asd123asd"}
      Rule:      length(a) = 9
      Result:    true

Any other function name is an error.
"#;
