//! Constant folding of fully literal ternary expressions.
//!
//! After preprocessing, most generation switches collapse to numbers, leaving
//! text like `(8 >= 6) ? 65 : 60`. [`fold`] evaluates such text with a small
//! recursive-descent grammar:
//!
//! ```text
//! ternary    := logic ( '?' ternary ':' ternary )?
//! logic      := comparison ( ('&&' | '||') comparison )*
//! comparison := additive ( ('==' | '!=' | '>=' | '<=' | '>' | '<') additive )?
//! additive   := term ( ('+' | '-') term )*
//! term       := atom ( ('*' | '/') atom )*
//! atom       := INT | '(' ternary ')' | '-' atom
//! ```
//!
//! Comparisons and logic produce `1`/`0`; division truncates toward zero.
//! Anything outside the grammar (identifiers, overflow, division by zero)
//! makes [`fold`] return `None` and callers keep the original text.

crate::static_regex! {
    TERNARY_HINT = r"(\(.*?\)|\d+)(\s*\?\s*(\(.*?\)|\d+)\s*:\s*(\(.*?\)|\d+))+";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Int(i64),
    Question,
    Colon,
    And,
    Or,
    Eq,
    Ne,
    Ge,
    Le,
    Gt,
    Lt,
    Plus,
    Minus,
    Star,
    Slash,
    Open,
    Close,
}

/// Whether `text` looks like a literal ternary worth handing to [`fold`].
#[must_use]
pub fn contains_ternary(text: &str) -> bool {
    TERNARY_HINT.is_match(text)
}

/// Evaluate `text` if it is a literal ternary expression.
///
/// Returns `None` when the pre-check fails or the text does not parse.
#[must_use]
pub fn fold(text: &str) -> Option<i64> {
    if !contains_ternary(text) {
        return None;
    }
    let tokens = tokenize(text)?;
    let mut parser = Parser { tokens, pos: 0 };
    let value = parser.ternary()?;
    (parser.pos == parser.tokens.len()).then_some(value)
}

fn tokenize(text: &str) -> Option<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        let token = match c {
            c if c.is_whitespace() => continue,
            '0'..='9' => {
                let mut digits = String::from(c);
                while let Some(d) = chars.next_if(char::is_ascii_digit) {
                    digits.push(d);
                }
                Token::Int(digits.parse().ok()?)
            }
            '?' => Token::Question,
            ':' => Token::Colon,
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '(' => Token::Open,
            ')' => Token::Close,
            '&' if chars.next_if_eq(&'&').is_some() => Token::And,
            '|' if chars.next_if_eq(&'|').is_some() => Token::Or,
            '=' if chars.next_if_eq(&'=').is_some() => Token::Eq,
            '!' if chars.next_if_eq(&'=').is_some() => Token::Ne,
            '>' if chars.next_if_eq(&'=').is_some() => Token::Ge,
            '<' if chars.next_if_eq(&'=').is_some() => Token::Le,
            '>' => Token::Gt,
            '<' => Token::Lt,
            _ => return None,
        };
        tokens.push(token);
    }
    Some(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn eat(&mut self, token: Token) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn ternary(&mut self) -> Option<i64> {
        let cond = self.logic()?;
        if !self.eat(Token::Question) {
            return Some(cond);
        }
        let when_true = self.ternary()?;
        if !self.eat(Token::Colon) {
            return None;
        }
        let when_false = self.ternary()?;
        Some(if cond != 0 { when_true } else { when_false })
    }

    fn logic(&mut self) -> Option<i64> {
        let mut lhs = self.comparison()?;
        loop {
            if self.eat(Token::And) {
                let rhs = self.comparison()?;
                lhs = i64::from(lhs != 0 && rhs != 0);
            } else if self.eat(Token::Or) {
                let rhs = self.comparison()?;
                lhs = i64::from(lhs != 0 || rhs != 0);
            } else {
                return Some(lhs);
            }
        }
    }

    fn comparison(&mut self) -> Option<i64> {
        let lhs = self.additive()?;
        let op = match self.peek() {
            Some(op @ (Token::Eq | Token::Ne | Token::Ge | Token::Le | Token::Gt | Token::Lt)) => op,
            _ => return Some(lhs),
        };
        self.pos += 1;
        let rhs = self.additive()?;
        let holds = match op {
            Token::Eq => lhs == rhs,
            Token::Ne => lhs != rhs,
            Token::Ge => lhs >= rhs,
            Token::Le => lhs <= rhs,
            Token::Gt => lhs > rhs,
            _ => lhs < rhs,
        };
        Some(i64::from(holds))
    }

    fn additive(&mut self) -> Option<i64> {
        let mut lhs = self.term()?;
        loop {
            if self.eat(Token::Plus) {
                lhs = lhs.checked_add(self.term()?)?;
            } else if self.eat(Token::Minus) {
                lhs = lhs.checked_sub(self.term()?)?;
            } else {
                return Some(lhs);
            }
        }
    }

    fn term(&mut self) -> Option<i64> {
        let mut lhs = self.atom()?;
        loop {
            if self.eat(Token::Star) {
                lhs = lhs.checked_mul(self.atom()?)?;
            } else if self.eat(Token::Slash) {
                lhs = lhs.checked_div(self.atom()?)?;
            } else {
                return Some(lhs);
            }
        }
    }

    fn atom(&mut self) -> Option<i64> {
        match self.peek()? {
            Token::Int(n) => {
                self.pos += 1;
                Some(n)
            }
            Token::Minus => {
                self.pos += 1;
                self.atom()?.checked_neg()
            }
            Token::Open => {
                self.pos += 1;
                let inner = self.ternary()?;
                self.eat(Token::Close).then_some(inner)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_parenthesised_comparison() {
        assert_eq!(fold("(8 >= 6) ? 65 : 60"), Some(65));
        assert_eq!(fold("(3 >= 6) ? 65 : 60"), Some(60));
    }

    #[test]
    fn folds_nested_ternaries_right_associative() {
        assert_eq!(fold("(1 == 2) ? 10 : (2 == 2) ? 20 : 30"), Some(20));
    }

    #[test]
    fn respects_precedence() {
        assert_eq!(fold("(2 + 3 * 4 == 14) ? 1 : 0"), Some(1));
        assert_eq!(fold("(1 && 0 || 1) ? 7 : 8"), Some(7));
    }

    #[test]
    fn division_truncates_and_rejects_zero() {
        assert_eq!(fold("(1 > 0) ? (7 / 2) : 0"), Some(3));
        assert_eq!(fold("(1 > 0) ? (7 / 0) : 0"), None);
    }

    #[test]
    fn plain_literals_skip_the_grammar() {
        assert!(!contains_ternary("45"));
        assert!(!contains_ternary("TYPE_GRASS"));
        assert_eq!(fold("45"), None);
    }

    #[test]
    fn symbolic_text_is_not_folded() {
        assert_eq!(fold("(P_GEN >= 6) ? 65 : 60"), None);
        assert_eq!(fold("(8 >= 6) ? 65 : ITEM_NONE"), None);
    }

    #[test]
    fn trailing_garbage_is_rejected() {
        assert_eq!(fold("(8 >= 6) ? 65 : 60)"), None);
    }
}
