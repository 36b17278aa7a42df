//! CSS selector subset.
//!
//! Supported: type selectors, `*`, `.class`, `#id`, `[attr]`, `[attr=value]`
//! with bare, single- or double-quoted values, compounds of those, the
//! descendant combinator (whitespace) and selector lists (`,`).
//!
//! Matching is DOM-like: ancestors outside a query scope still participate in
//! descendant combinators.

use smallvec::SmallVec;
use thiserror::Error;

use crate::tree::{NodeId, UiTree};

/// Errors from [`Selector::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
	#[error("empty selector")]
	Empty,
	#[error("unexpected '{ch}' at byte {pos}")]
	UnexpectedChar { ch: char, pos: usize },
	#[error("expected an identifier at byte {pos}")]
	ExpectedIdent { pos: usize },
	#[error("unterminated attribute selector starting at byte {pos}")]
	UnterminatedAttribute { pos: usize },
	#[error("unterminated string starting at byte {pos}")]
	UnterminatedString { pos: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AttrMatch {
	pub name: String,
	pub value: Option<String>,
}

/// One compound selector such as `div.protyle[data-loading='true']`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Compound {
	pub tag: Option<String>,
	pub id: Option<String>,
	pub classes: SmallVec<[String; 2]>,
	pub attrs: SmallVec<[AttrMatch; 1]>,
}

impl Compound {
	fn matches<T: UiTree + ?Sized>(&self, tree: &T, node: NodeId) -> bool {
		if let Some(tag) = &self.tag
			&& !tree.tag(node).is_some_and(|t| t.eq_ignore_ascii_case(tag))
		{
			return false;
		}
		if let Some(id) = &self.id
			&& tree.attr(node, "id") != Some(id.as_str())
		{
			return false;
		}
		if !self.classes.iter().all(|c| tree.has_class(node, c)) {
			return false;
		}
		self.attrs.iter().all(|a| match (&a.value, tree.attr(node, &a.name)) {
			(_, None) => false,
			(None, Some(_)) => true,
			(Some(expected), Some(actual)) => expected == actual,
		})
	}
}

/// Compounds joined by descendant combinators, leftmost first.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Complex {
	compounds: SmallVec<[Compound; 2]>,
}

impl Complex {
	fn matches<T: UiTree + ?Sized>(&self, tree: &T, node: NodeId) -> bool {
		let Some((subject, rest)) = self.compounds.split_last() else {
			return false;
		};
		if !subject.matches(tree, node) {
			return false;
		}
		// Greedy nearest-ancestor matching is exact for descendant-only chains.
		let mut cursor = tree.parent(node);
		for compound in rest.iter().rev() {
			loop {
				let Some(current) = cursor else {
					return false;
				};
				cursor = tree.parent(current);
				if compound.matches(tree, current) {
					break;
				}
			}
		}
		true
	}
}

/// A parsed selector list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
	alternatives: Vec<Complex>,
}

impl Selector {
	pub fn parse(input: &str) -> Result<Self, SelectorError> {
		Parser::new(input).parse_list()
	}

	pub fn matches<T: UiTree + ?Sized>(&self, tree: &T, node: NodeId) -> bool {
		tree.exists(node) && self.alternatives.iter().any(|c| c.matches(tree, node))
	}

	/// Parses a single compound, used to describe nodes to create.
	pub(crate) fn parse_compound(input: &str) -> Result<Compound, SelectorError> {
		let mut parser = Parser::new(input);
		parser.skip_ws();
		let compound = parser.parse_compound()?;
		parser.skip_ws();
		match parser.peek() {
			None => Ok(compound),
			Some(ch) => Err(SelectorError::UnexpectedChar { ch, pos: parser.pos }),
		}
	}
}

impl std::str::FromStr for Selector {
	type Err = SelectorError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

struct Parser<'a> {
	input: &'a str,
	pos: usize,
}

impl<'a> Parser<'a> {
	fn new(input: &'a str) -> Self {
		Self { input, pos: 0 }
	}

	fn peek(&self) -> Option<char> {
		self.input[self.pos..].chars().next()
	}

	fn bump(&mut self) -> Option<char> {
		let ch = self.peek()?;
		self.pos += ch.len_utf8();
		Some(ch)
	}

	fn skip_ws(&mut self) -> bool {
		let start = self.pos;
		while self.peek().is_some_and(char::is_whitespace) {
			self.bump();
		}
		self.pos != start
	}

	fn parse_list(&mut self) -> Result<Selector, SelectorError> {
		let mut alternatives = Vec::new();
		loop {
			self.skip_ws();
			alternatives.push(self.parse_complex()?);
			match self.bump() {
				None => break,
				Some(',') => continue,
				Some(ch) => {
					return Err(SelectorError::UnexpectedChar {
						ch,
						pos: self.pos - ch.len_utf8(),
					});
				}
			}
		}
		Ok(Selector { alternatives })
	}

	fn parse_complex(&mut self) -> Result<Complex, SelectorError> {
		let mut compounds = SmallVec::new();
		loop {
			compounds.push(self.parse_compound()?);
			let had_ws = self.skip_ws();
			match self.peek() {
				None | Some(',') => break,
				Some(_) if had_ws => continue,
				Some(ch) => return Err(SelectorError::UnexpectedChar { ch, pos: self.pos }),
			}
		}
		Ok(Complex { compounds })
	}

	fn parse_compound(&mut self) -> Result<Compound, SelectorError> {
		let start = self.pos;
		let mut compound = Compound::default();

		match self.peek() {
			Some('*') => {
				self.bump();
			}
			Some(ch) if is_ident_char(ch) => compound.tag = Some(self.ident()?.to_ascii_lowercase()),
			_ => {}
		}

		loop {
			match self.peek() {
				Some('.') => {
					self.bump();
					compound.classes.push(self.ident()?.to_string());
				}
				Some('#') => {
					self.bump();
					compound.id = Some(self.ident()?.to_string());
				}
				Some('[') => compound.attrs.push(self.attribute()?),
				_ => break,
			}
		}

		if self.pos == start {
			return Err(match self.peek() {
				None => SelectorError::Empty,
				Some(ch) => SelectorError::UnexpectedChar { ch, pos: self.pos },
			});
		}
		Ok(compound)
	}

	fn attribute(&mut self) -> Result<AttrMatch, SelectorError> {
		let open = self.pos;
		self.bump();
		self.skip_ws();
		let name = self.ident()?.to_string();
		self.skip_ws();
		let value = match self.bump() {
			Some(']') => return Ok(AttrMatch { name, value: None }),
			Some('=') => {
				self.skip_ws();
				match self.peek() {
					Some(quote @ ('\'' | '"')) => Some(self.quoted(quote)?),
					_ => Some(self.ident()?.to_string()),
				}
			}
			Some(_) | None => return Err(SelectorError::UnterminatedAttribute { pos: open }),
		};
		self.skip_ws();
		match self.bump() {
			Some(']') => Ok(AttrMatch { name, value }),
			_ => Err(SelectorError::UnterminatedAttribute { pos: open }),
		}
	}

	fn quoted(&mut self, quote: char) -> Result<String, SelectorError> {
		let open = self.pos;
		self.bump();
		let body_start = self.pos;
		while let Some(ch) = self.bump() {
			if ch == quote {
				return Ok(self.input[body_start..self.pos - 1].to_string());
			}
		}
		Err(SelectorError::UnterminatedString { pos: open })
	}

	fn ident(&mut self) -> Result<&'a str, SelectorError> {
		let start = self.pos;
		while self.peek().is_some_and(is_ident_char) {
			self.bump();
		}
		if self.pos == start {
			return Err(SelectorError::ExpectedIdent { pos: start });
		}
		Ok(&self.input[start..self.pos])
	}
}

fn is_ident_char(ch: char) -> bool {
	ch.is_ascii_alphanumeric() || ch == '-' || ch == '_'
}

#[cfg(test)]
mod tests;
